//! Tag entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A tag that can be attached to posts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tag {
    /// Tag identifier.
    pub id: i64,
    /// Unique tag name.
    pub name: String,
}

/// Normalize user-supplied tag names: trim, drop empties, dedupe in order.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}
