//! Status transitions with best-effort requester notification.
//!
//! An update is two sequential steps with independent results: the record
//! write, which decides success or failure of the whole call, and the email
//! dispatch, whose failure is reported alongside an already-persisted change.

pub mod status_update;

pub use status_update::{
    NotificationOutcome, StatusUpdate, StatusWorkflow, UpdateOutcome, WorkflowError,
};
