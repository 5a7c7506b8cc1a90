//! Off-request notification dispatch.

pub mod dispatcher;

pub use dispatcher::{NotificationDispatcher, SubmitOutcome};
