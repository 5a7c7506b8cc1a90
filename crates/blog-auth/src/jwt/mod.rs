//! JWT access and refresh tokens.

pub mod claims;
pub mod codec;

pub use claims::{Claims, ROLE_DELIMITER, TokenType};
pub use codec::{TokenCodec, TokenPair};
