//! Domain types for the Veil steganography client.
//!
//! This crate holds the types every other layer shares: session tokens and
//! credentials, upload specs and normalized results, preview handles, and the
//! `Gateway`/`TokenStore` seams that infrastructure and interaction implement.

pub mod config;
pub mod error;
pub mod gateway;
pub mod media;
pub mod preview;
pub mod session;
pub mod validation;

pub use config::ClientConfig;
pub use error::{Result, VeilError};
pub use gateway::Gateway;
pub use preview::{PreviewHandle, PreviewRegistry};
pub use validation::ValidationError;
