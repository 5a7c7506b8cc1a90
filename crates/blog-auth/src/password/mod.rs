//! Password hashing and one-time verification codes.

pub mod code;
pub mod hasher;

pub use code::generate_verification_code;
pub use hasher::PasswordHasher;
