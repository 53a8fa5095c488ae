//! Password hashing primitives (Argon2)

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_differs_from_plaintext() {
        let hash = hash_password("SuperSecret!").unwrap();
        assert_ne!(hash, "SuperSecret!");
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_fresh_salt_per_hash() {
        let a = hash_password("SuperSecret!").unwrap();
        let b = hash_password("SuperSecret!").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verification_is_the_only_match_path() {
        let hash = hash_password("SuperSecret!").unwrap();
        assert!(verify_password("SuperSecret!", &hash).unwrap());
        for wrong in ["supersecret!", "SuperSecret", "", "hunter2"] {
            assert!(!verify_password(wrong, &hash).unwrap());
        }
    }
}
