//! Application layer for Veil.
//!
//! Coordinates the domain types with a [`veil_core::Gateway`]: the session
//! store owns authentication state, and one workflow per transformation kind
//! owns its inputs, previews and result.

pub mod error;
pub mod session_store;
pub mod workflow;

#[cfg(test)]
mod test_support;

pub use error::AuthError;
pub use session_store::SessionStore;
pub use workflow::{OperationWorkflow, SubmitOutcome, WorkflowState};
