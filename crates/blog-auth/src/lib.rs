//! # blog-auth
//!
//! Authentication for the blog platform.
//!
//! ## Modules
//!
//! - `jwt`: signed access/refresh token encoding and verification
//! - `session`: the one-refresh-token-per-user session store
//! - `gate`: per-request access check with transparent refresh rotation
//! - `password`: Argon2id password hashing and one-time verification codes

pub mod gate;
pub mod jwt;
pub mod password;
pub mod session;

pub use gate::{AuthenticationGate, GateOutcome, Identity};
pub use jwt::{Claims, TokenCodec, TokenPair, TokenType};
pub use password::PasswordHasher;
pub use session::{CacheSessionStore, SessionStore};
