//! First-user and login flows.
//!
//! ```text
//! requires_first_user? ──yes──► ask username/password ──► create_first_user
//!        │                            ▲        │ invalid
//!        │                            └────────┘
//!        ▼
//! ask username/password ──► unlock ──None──► "Invalid username or password."
//!        │                    │                      │
//!   empty username          Some                   retry
//!        ▼                    ▼
//!     cancelled            Session
//! ```

use tracing::info;

use estoque_core::SaleTotalPolicy;
use estoque_db::{Session, SessionGate};

use crate::error::{AppError, AppResult, ErrorCode};
use crate::prompt::Prompt;

const INVALID_LOGIN: &str = "Invalid username or password.";

/// Runs the first-user flow if needed, then the login loop.
///
/// Returns `None` when the user cancels by leaving the username empty.
pub async fn open_session(
    gate: &SessionGate,
    policy: SaleTotalPolicy,
    prompt: &mut impl Prompt,
) -> AppResult<Option<Session>> {
    if gate.requires_first_user().await? && !create_first_user(gate, prompt).await? {
        return Ok(None);
    }

    prompt.show("Log in (leave the username empty to quit).");
    loop {
        let username = prompt.input("Username")?;
        if username.is_empty() {
            return Ok(None);
        }
        let password = prompt.password("Password")?;

        match gate.unlock_with_policy(&username, &password, policy).await? {
            Some(session) => {
                prompt.show(&format!("Welcome, {}!", session.username()));
                return Ok(Some(session));
            }
            None => prompt.show(INVALID_LOGIN),
        }
    }
}

/// Returns false when the user cancels.
async fn create_first_user(gate: &SessionGate, prompt: &mut impl Prompt) -> AppResult<bool> {
    prompt.show("No user registered yet. Create the first user.");

    loop {
        let username = prompt.input("New username")?;
        if username.is_empty() {
            return Ok(false);
        }
        let password = prompt.password("New password")?;

        match gate.create_first_user(&username, &password).await {
            Ok(()) => {
                info!(username = %username, "First user created");
                prompt.show("User created.");
                return Ok(true);
            }
            Err(err) => {
                let err = AppError::from(err);
                match err.code {
                    ErrorCode::ValidationError | ErrorCode::DuplicateUser => {
                        prompt.show(&err.message)
                    }
                    _ => return Err(err),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::scripted::{text, ScriptedPrompt};
    use estoque_db::{Database, DbConfig};

    async fn open_gate() -> SessionGate {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        SessionGate::open(db).await.unwrap()
    }

    #[tokio::test]
    async fn test_first_user_then_login() {
        let gate = open_gate().await;
        let mut prompt = ScriptedPrompt::new([
            text("admin"),
            text(""),
            text("admin"),
            text("secret"),
            text("admin"),
            text("secret"),
        ]);

        let session = open_session(&gate, SaleTotalPolicy::default(), &mut prompt)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(session.username(), "admin");
        assert!(prompt.is_exhausted());
        assert!(prompt.shown.iter().any(|m| m == "User created."));
    }

    #[tokio::test]
    async fn test_wrong_password_retries() {
        let gate = open_gate().await;
        gate.create_first_user("admin", "secret").await.unwrap();

        let mut prompt = ScriptedPrompt::new([
            text("admin"),
            text("nope"),
            text("admin"),
            text("secret"),
        ]);

        let session = open_session(&gate, SaleTotalPolicy::default(), &mut prompt)
            .await
            .unwrap();

        assert!(session.is_some());
        assert_eq!(
            prompt.shown.iter().filter(|m| *m == INVALID_LOGIN).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_empty_username_cancels() {
        let gate = open_gate().await;
        gate.create_first_user("admin", "secret").await.unwrap();

        let mut prompt = ScriptedPrompt::new([text("")]);
        let session = open_session(&gate, SaleTotalPolicy::default(), &mut prompt)
            .await
            .unwrap();
        assert!(session.is_none());

        let fresh = open_gate().await;
        let mut prompt = ScriptedPrompt::new([text("")]);
        let session = open_session(&fresh, SaleTotalPolicy::default(), &mut prompt)
            .await
            .unwrap();
        assert!(session.is_none());
        assert!(fresh.requires_first_user().await.unwrap());
    }
}
