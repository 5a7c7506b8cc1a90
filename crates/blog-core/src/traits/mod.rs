//! Provider traits implemented by infrastructure crates.

pub mod cache;
pub mod mail;
pub mod storage;

pub use cache::CacheProvider;
pub use mail::{MailSender, OutgoingMail};
pub use storage::{ObjectStorage, UploadFile};
