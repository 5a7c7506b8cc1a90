//! The per-request authentication gate.

pub mod authenticate;
pub mod identity;

pub use authenticate::{AuthenticationGate, GateOutcome};
pub use identity::Identity;
