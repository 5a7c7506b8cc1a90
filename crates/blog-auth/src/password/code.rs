//! Six-digit email verification codes.

use argon2::password_hash::rand_core::{OsRng, RngCore};

/// Generate a zero-padded six-digit code from the OS RNG.
pub fn generate_verification_code() -> String {
    format!("{:06}", OsRng.next_u32() % 1_000_000)
}
