//! Object storage uploaders.

#[cfg(feature = "local")]
pub mod local;
#[cfg(feature = "s3")]
pub mod s3;

use uuid::Uuid;

/// Build a collision-free object key under `directory`.
///
/// Path separators and whitespace in the client file name are replaced so
/// the key never escapes its directory.
pub fn object_key(directory: &str, file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ' ' => '_',
            other => other,
        })
        .collect();
    let safe = safe.trim_start_matches('.');
    let directory = directory.trim_matches('/');
    format!("{directory}/{}_{safe}", Uuid::new_v4())
}
