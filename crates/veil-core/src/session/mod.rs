//! Session token and credential types.

pub mod model;
pub mod store;

pub use model::{AuthState, Credentials, Session, SessionToken};
pub use store::{MemoryTokenStore, TokenStore};
