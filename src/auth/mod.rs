//! Password hashing and account-linking rules.
//!
//! Passwords are stored as Argon2id PHC strings with a random per-user salt.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::AppError;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Check a password against a stored PHC string. Malformed hashes never verify.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        tracing::warn!("Stored password hash is not a valid PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Which login methods an account has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    PasswordOnly,
    ExternalOnly,
    Linked,
}

impl LinkState {
    /// `None` for a row with neither credential, which registration never produces.
    pub fn from_flags(has_password: bool, has_external: bool) -> Option<Self> {
        match (has_password, has_external) {
            (true, false) => Some(LinkState::PasswordOnly),
            (false, true) => Some(LinkState::ExternalOnly),
            (true, true) => Some(LinkState::Linked),
            (false, false) => None,
        }
    }

    /// State after a successful external-identity login on an existing account.
    pub fn on_external_login(self) -> Self {
        match self {
            LinkState::PasswordOnly => LinkState::Linked,
            other => other,
        }
    }

    /// State after a password is set through change or reset.
    pub fn on_password_set(self) -> Self {
        match self {
            LinkState::ExternalOnly => LinkState::Linked,
            other => other,
        }
    }

    pub fn has_password(self) -> bool {
        matches!(self, LinkState::PasswordOnly | LinkState::Linked)
    }

    pub fn has_external(self) -> bool {
        matches!(self, LinkState::ExternalOnly | LinkState::Linked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let a = hash_password("secret").unwrap();
        let b = hash_password("secret").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("secret", &a));
        assert!(verify_password("secret", &b));
    }

    #[test]
    fn test_legacy_hash_never_verifies() {
        // Base64 SHA-256 digest, the old static-salt format
        assert!(!verify_password(
            "secret",
            "K7gNU3sdo+OL0wNhqoVWhr3g6s1xYv72ol/pe/Unols="
        ));
    }

    #[test]
    fn test_external_login_links_password_accounts() {
        assert_eq!(
            LinkState::PasswordOnly.on_external_login(),
            LinkState::Linked
        );
        assert_eq!(
            LinkState::ExternalOnly.on_external_login(),
            LinkState::ExternalOnly
        );
        assert_eq!(LinkState::Linked.on_external_login(), LinkState::Linked);
    }

    #[test]
    fn test_password_changes_never_drop_external_identity() {
        for state in [
            LinkState::PasswordOnly,
            LinkState::ExternalOnly,
            LinkState::Linked,
        ] {
            let after = state.on_password_set();
            assert!(after.has_password());
            assert_eq!(after.has_external(), state.has_external());
        }
    }

    #[test]
    fn test_from_flags() {
        assert_eq!(LinkState::from_flags(true, false), Some(LinkState::PasswordOnly));
        assert_eq!(LinkState::from_flags(false, true), Some(LinkState::ExternalOnly));
        assert_eq!(LinkState::from_flags(true, true), Some(LinkState::Linked));
        assert_eq!(LinkState::from_flags(false, false), None);
    }
}
