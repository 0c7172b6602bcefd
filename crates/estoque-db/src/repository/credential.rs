//! # Credential Repository
//!
//! The credential store: the `users` table.
//!
//! ## Stored Form
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  username  │ password                                                  │
//! │────────────┼───────────────────────────────────────────────────────────│
//! │  admin     │ $argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>              │
//! │  legacy    │ hunter2          ← written by older versions              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! New credentials are always stored as Argon2 PHC strings. A value that is
//! not a PHC string is a legacy plaintext password: it is compared by exact
//! equality and replaced by a hash the first time it verifies.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult, StoreResult};
use estoque_core::validation::{validate_password, validate_username};
use estoque_core::CoreError;

const USERS_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        username TEXT PRIMARY KEY,
        password TEXT NOT NULL
    )
"#;

/// Repository for credentials.
#[derive(Debug, Clone)]
pub struct CredentialRepository {
    pool: SqlitePool,
}

impl CredentialRepository {
    /// Creates a new CredentialRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CredentialRepository { pool }
    }

    /// Guarantees the `users` table exists. Idempotent.
    pub async fn ensure_schema(&self) -> DbResult<()> {
        sqlx::query(USERS_DDL).execute(&self.pool).await?;
        Ok(())
    }

    /// Returns true if at least one credential exists.
    pub async fn has_any_user(&self) -> DbResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users)")
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Counts stored credentials (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Stores a new credential.
    ///
    /// ## Errors
    /// * `Validation` - username or password is empty (checked first)
    /// * `DuplicateUser` - username already exists
    pub async fn create_user(&self, username: &str, password: &str) -> StoreResult<()> {
        validate_username(username)?;
        validate_password(password)?;

        debug!(username = %username, "Creating user");

        let hash = hash_password(password)?;

        let inserted = sqlx::query("INSERT INTO users (username, password) VALUES (?1, ?2)")
            .bind(username)
            .bind(&hash)
            .execute(&self.pool)
            .await
            .map_err(DbError::from);

        match inserted {
            Ok(_) => {}
            Err(DbError::UniqueViolation { .. }) => {
                return Err(CoreError::DuplicateUser(username.to_string()).into());
            }
            Err(other) => return Err(other.into()),
        }

        info!(username = %username, "User created");
        Ok(())
    }

    /// Checks a username/password pair.
    ///
    /// Unknown users yield `false`, never an error.
    pub async fn verify(&self, username: &str, password: &str) -> StoreResult<bool> {
        let stored: Option<String> =
            sqlx::query_scalar("SELECT password FROM users WHERE username = ?1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        let Some(stored) = stored else {
            debug!(username = %username, "Unknown user");
            return Ok(false);
        };

        if is_phc_hash(&stored) {
            return Ok(verify_password(password, &stored));
        }

        if stored != password {
            return Ok(false);
        }

        // Legacy plaintext matched: upgrade in place
        let hash = hash_password(password)?;
        sqlx::query("UPDATE users SET password = ?2 WHERE username = ?1")
            .bind(username)
            .bind(&hash)
            .execute(&self.pool)
            .await?;

        warn!(username = %username, "Upgraded legacy plaintext password to Argon2");
        Ok(true)
    }
}

// =============================================================================
// Hashing Helpers
// =============================================================================

/// Hashes a password into an Argon2 PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Hashing(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verifies a password against an Argon2 PHC string.
///
/// An unparseable hash never verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

fn is_phc_hash(stored: &str) -> bool {
    stored.starts_with("$argon2") && PasswordHash::new(stored).is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use estoque_core::ErrorKind;

    async fn repo() -> CredentialRepository {
        let repo = Database::new(DbConfig::in_memory())
            .await
            .unwrap()
            .credentials();
        repo.ensure_schema().await.unwrap();
        repo
    }

    #[test]
    fn test_hash_roundtrip() {
        let hash = hash_password("secret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert_ne!(hash, hash_password("secret").unwrap());
        assert!(verify_password("secret", &hash));
        assert!(!verify_password("Secret", &hash));
        assert!(!verify_password("secret", "not a hash"));
    }

    #[tokio::test]
    async fn test_create_and_verify() {
        let repo = repo().await;
        assert!(!repo.has_any_user().await.unwrap());

        repo.create_user("a", "b").await.unwrap();

        assert!(repo.has_any_user().await.unwrap());
        assert!(repo.verify("a", "b").await.unwrap());
        assert!(!repo.verify("a", "wrong").await.unwrap());
        assert!(!repo.verify("ghost", "b").await.unwrap());
    }

    #[tokio::test]
    async fn test_password_is_not_stored_in_clear() {
        let repo = repo().await;
        repo.create_user("a", "b").await.unwrap();

        let stored: String = sqlx::query_scalar("SELECT password FROM users WHERE username = 'a'")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_ne!(stored, "b");
        assert!(is_phc_hash(&stored));
    }

    #[tokio::test]
    async fn test_create_user_rejections() {
        let repo = repo().await;

        let err = repo.create_user("", "b").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = repo.create_user("a", "").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        repo.create_user("a", "b").await.unwrap();
        let err = repo.create_user("a", "other").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateUser);

        // Emptiness wins over duplication
        let err = repo.create_user("a", "").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_legacy_plaintext_upgrade() {
        let repo = repo().await;
        sqlx::query("INSERT INTO users (username, password) VALUES ('old', 'hunter2')")
            .execute(&repo.pool)
            .await
            .unwrap();

        assert!(!repo.verify("old", "wrong").await.unwrap());
        assert!(repo.verify("old", "hunter2").await.unwrap());

        let stored: String =
            sqlx::query_scalar("SELECT password FROM users WHERE username = 'old'")
                .fetch_one(&repo.pool)
                .await
                .unwrap();
        assert!(is_phc_hash(&stored));

        // Still verifies after the upgrade
        assert!(repo.verify("old", "hunter2").await.unwrap());
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let repo = repo().await;
        repo.ensure_schema().await.unwrap();
        repo.ensure_schema().await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
