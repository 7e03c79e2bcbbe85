use bcrypt::{hash, verify, BcryptError};

/// Work factor for stored password hashes.
pub const HASH_COST: u32 = 12;

pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, HASH_COST)
}

/// Malformed hashes count as a mismatch rather than an error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    verify(password, hash).unwrap_or(false)
}
