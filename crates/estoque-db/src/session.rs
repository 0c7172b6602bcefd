//! # Session Gate
//!
//! Credential-gated access to the ledger, as a two-state typestate.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   SessionGate::open(db)                                                │
//! │        │  ensure_schema()                                              │
//! │        ▼                                                                │
//! │   ┌──────────────┐  create_first_user(u, p)                            │
//! │   │ SessionGate  │◄─────────────────────── (only while no user exists) │
//! │   │   (locked)   │                                                      │
//! │   └──────┬───────┘                                                      │
//! │          │ unlock(u, p) ── wrong credentials ──► Ok(None), retry       │
//! │          ▼                                                              │
//! │   ┌──────────────┐                                                      │
//! │   │   Session    │ ──► ledger(), checkpoint()                          │
//! │   │  (unlocked)  │     lives until the process exits                   │
//! │   └──────────────┘                                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `unlock` consumes nothing: a failed attempt leaves the gate usable, and
//! there is no throttling or lockout.

use tracing::{info, warn};

use estoque_core::{SaleTotalPolicy, ValidationError};

use crate::error::StoreResult;
use crate::ledger::Ledger;
use crate::pool::Database;

/// The locked state: only credential operations are reachable.
#[derive(Debug, Clone)]
pub struct SessionGate {
    db: Database,
}

impl SessionGate {
    /// Opens the gate over `db`, making sure the credential table exists.
    pub async fn open(db: Database) -> StoreResult<Self> {
        db.credentials().ensure_schema().await?;
        Ok(SessionGate { db })
    }

    /// True while the store holds no credential at all.
    pub async fn requires_first_user(&self) -> StoreResult<bool> {
        Ok(!self.db.credentials().has_any_user().await?)
    }

    /// Creates the initial credential.
    pub async fn create_first_user(&self, username: &str, password: &str) -> StoreResult<()> {
        self.db.credentials().create_user(username, password).await
    }

    /// Checks credentials and, on success, yields a session whose ledger
    /// uses the default sale-total policy.
    pub async fn unlock(&self, username: &str, password: &str) -> StoreResult<Option<Session>> {
        self.unlock_with_policy(username, password, SaleTotalPolicy::default())
            .await
    }

    /// Like [`unlock`](Self::unlock) with an explicit sale-total policy.
    ///
    /// ## Errors
    /// * `Validation` - no credential exists yet; create one first
    pub async fn unlock_with_policy(
        &self,
        username: &str,
        password: &str,
        policy: SaleTotalPolicy,
    ) -> StoreResult<Option<Session>> {
        let credentials = self.db.credentials();

        if !credentials.has_any_user().await? {
            return Err(ValidationError::InvalidFormat {
                field: "credentials".to_string(),
                reason: "no user exists yet".to_string(),
            }
            .into());
        }

        if !credentials.verify(username, password).await? {
            warn!(username = %username, "Login failed");
            return Ok(None);
        }

        info!(username = %username, "Session unlocked");
        Ok(Some(Session {
            db: self.db.clone(),
            username: username.to_string(),
            ledger: self.db.ledger(policy),
        }))
    }
}

/// The unlocked state. The only route from the presentation layer to the
/// ledger.
#[derive(Debug, Clone)]
pub struct Session {
    db: Database,
    username: String,
    ledger: Ledger,
}

impl Session {
    /// The authenticated username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The inventory ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Flushes the WAL into the store file so a file copy holds every
    /// committed write.
    pub async fn checkpoint(&self) -> StoreResult<()> {
        Ok(self.db.checkpoint().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use estoque_core::ErrorKind;

    async fn gate() -> SessionGate {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        SessionGate::open(db).await.unwrap()
    }

    #[tokio::test]
    async fn test_unlock_refused_without_users() {
        let gate = gate().await;
        assert!(gate.requires_first_user().await.unwrap());

        let err = gate.unlock("a", "b").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_first_user_then_unlock() {
        let gate = gate().await;
        gate.create_first_user("admin", "secret").await.unwrap();
        assert!(!gate.requires_first_user().await.unwrap());

        assert!(gate.unlock("admin", "nope").await.unwrap().is_none());
        assert!(gate.unlock("someone", "secret").await.unwrap().is_none());

        // Retries are unlimited
        let session = gate.unlock("admin", "secret").await.unwrap().unwrap();
        assert_eq!(session.username(), "admin");
        assert_eq!(session.ledger().policy(), SaleTotalPolicy::ReplaceWithLatestBatch);
        session.checkpoint().await.unwrap();
        assert_eq!(session.ledger().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unlock_with_policy() {
        let gate = gate().await;
        gate.create_first_user("admin", "secret").await.unwrap();

        let session = gate
            .unlock_with_policy("admin", "secret", SaleTotalPolicy::Accumulate)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.ledger().policy(), SaleTotalPolicy::Accumulate);
    }
}
