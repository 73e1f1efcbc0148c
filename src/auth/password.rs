//! Password Hasher
//! Mission: One-way salted hashing and constant-time verification with bcrypt

use crate::auth::error::AuthError;
use bcrypt::{hash, verify};

/// bcrypt hasher with a fixed, configuration-supplied cost
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub const DEFAULT_COST: u32 = 10;
    /// bcrypt only reads this many bytes of input; anything past it is ignored
    pub const MAX_PASSWORD_BYTES: usize = 72;

    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Produce a self-describing hash record (`$2b$<cost>$<salt><digest>`).
    /// A fresh random salt is drawn on every call.
    /// Passwords longer than [`Self::MAX_PASSWORD_BYTES`] are refused rather
    /// than silently truncated.
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        if plaintext.len() > Self::MAX_PASSWORD_BYTES {
            return Err(AuthError::PasswordTooLong);
        }
        Ok(hash(plaintext, self.cost)?)
    }

    /// Recompute with the salt and cost embedded in `record` and compare in
    /// constant time. A wrong password is `Ok(false)`; only a malformed
    /// record is an error.
    pub fn verify(&self, plaintext: &str, record: &str) -> Result<bool, AuthError> {
        // No stored record can come from a longer password
        if plaintext.len() > Self::MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        Ok(verify(plaintext, record)?)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = test_hasher();
        let record = hasher.hash("secret").unwrap();

        assert!(hasher.verify("secret", &record).unwrap());
        assert!(!hasher.verify("wrong", &record).unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = test_hasher();
        let first = hasher.hash("secret").unwrap();
        let second = hasher.hash("secret").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("secret", &first).unwrap());
        assert!(hasher.verify("secret", &second).unwrap());
    }

    #[test]
    fn test_record_embeds_cost() {
        let record = test_hasher().hash("secret").unwrap();
        assert!(record.starts_with("$2b$04$"));
        assert!(!record.contains("secret"));
    }

    #[test]
    fn test_verify_with_other_cost_record() {
        // Parameters come from the record, not from the hasher
        let record = PasswordHasher::new(5).hash("secret").unwrap();
        assert!(test_hasher().verify("secret", &record).unwrap());
    }

    #[test]
    fn test_malformed_record_is_hashing_failure() {
        let result = test_hasher().verify("secret", "not-a-bcrypt-hash");
        assert!(matches!(result, Err(AuthError::HashingFailure(_))));
    }

    #[test]
    fn test_overlong_password_not_truncated() {
        let hasher = test_hasher();
        let prefix = "a".repeat(PasswordHasher::MAX_PASSWORD_BYTES);
        let record = hasher.hash(&prefix).unwrap();

        assert!(hasher.verify(&prefix, &record).unwrap());
        assert!(!hasher.verify(&format!("{prefix}Y"), &record).unwrap());
        assert!(matches!(
            hasher.hash(&format!("{prefix}X")),
            Err(AuthError::PasswordTooLong)
        ));
    }
}
