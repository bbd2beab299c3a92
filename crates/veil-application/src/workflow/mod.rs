//! Operation workflows and result rendering.

mod operation;
pub mod render;

pub use operation::{OperationWorkflow, SubmitOutcome, WorkflowState};
pub use render::{DownloadAffordance, Notification, ResultView, Severity};
