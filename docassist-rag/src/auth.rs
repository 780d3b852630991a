//! Admin credential checking.

use sha2::{Digest, Sha256};

/// Environment variable for the admin user name.
const ADMIN_USERNAME_VAR: &str = "ADMIN_USERNAME";
/// Environment variable for the admin password digest.
const ADMIN_PASSWORD_HASH_VAR: &str = "ADMIN_PASSWORD_HASH";

const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "admin123";

/// SHA-256 digest of a password as lowercase hex.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Admin user name and password digest for the maintenance surface.
///
/// `verify` is a plain string equality over hex digests; the comparison is
/// not constant-time.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    username: String,
    password_hash: String,
}

impl AdminCredentials {
    /// Create credentials from a user name and an already-hashed password.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self { username: username.into(), password_hash: password_hash.into() }
    }

    /// Read credentials from `ADMIN_USERNAME` / `ADMIN_PASSWORD_HASH`,
    /// falling back to the built-in defaults when unset.
    pub fn from_env() -> Self {
        let username =
            std::env::var(ADMIN_USERNAME_VAR).unwrap_or_else(|_| DEFAULT_USERNAME.to_string());
        let password_hash = std::env::var(ADMIN_PASSWORD_HASH_VAR)
            .unwrap_or_else(|_| hash_password(DEFAULT_PASSWORD));
        Self { username, password_hash }
    }

    /// Check a user name and plain-text password against the stored digest.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && hash_password(password) == self.password_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_deterministic() {
        assert_eq!(hash_password("secret"), hash_password("secret"));
        assert_ne!(hash_password("secret"), hash_password("Secret"));
    }

    #[test]
    fn known_digest_matches() {
        assert_eq!(
            hash_password("admin123"),
            "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9"
        );
    }

    #[test]
    fn verify_accepts_the_right_password_only() {
        let credentials = AdminCredentials::new("admin", hash_password("hunter2"));
        assert!(credentials.verify("admin", "hunter2"));
        assert!(!credentials.verify("admin", "hunter3"));
        assert!(!credentials.verify("root", "hunter2"));
    }
}
