//! Push connection bookkeeping.

pub mod handle;
pub mod pool;
pub mod registry;

pub use handle::{ConnectionHandle, PushError};
pub use pool::ConnectionPool;
pub use registry::{LocalSubscriptionRegistry, SubscriptionRegistry};
