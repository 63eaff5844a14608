// Session creation and restoration.
// The raw session envelope is kept in the local store between runs.

use crate::cache::LocalStore;
use crate::error::{BuddyError, Result};

use super::client::Transport;
use super::types::{Envelope, Session};

const SESSION_KIND: &str = "session";
const SESSION_ID: &str = "session";

/// Error codes that mean the stored session is no longer usable.
const BAD_SESSION_CODE: i64 = 401;
const NO_SESSION_CODE: i64 = 441;

/// Log in with username/password and persist the new session.
pub async fn create_session<T: Transport + ?Sized>(
    transport: &T,
    store: &LocalStore,
    username: &str,
    password: &str,
) -> Result<Session> {
    tracing::debug!(username, "starting session");
    let params = [
        ("username", username.to_string()),
        ("password", password.to_string()),
    ];
    let body = transport.post("/api/session", &params).await?;

    let envelope: Envelope<Session> = serde_json::from_str(&body)?;
    let session = envelope.into_result()?;

    if let Err(e) = store.store(SESSION_ID, SESSION_KIND, "json", body.as_bytes()) {
        tracing::warn!(error = %e, "failed to store session");
    }

    tracing::info!(username, session_id = %session.id, "session created");
    Ok(session)
}

/// Load the stored session and check that the remote still accepts it.
pub async fn restore_session<T: Transport + ?Sized>(
    transport: &T,
    store: &LocalStore,
) -> Result<Session> {
    let bytes = match store.read(SESSION_ID, SESSION_KIND, "json") {
        Ok(bytes) => bytes,
        Err(e) if e.is_cache_miss() => return Err(BuddyError::NoSession),
        Err(e) => return Err(e),
    };

    let envelope: Envelope<Session> = serde_json::from_slice(&bytes)?;
    let session = envelope.into_result()?;
    if session.id.is_empty() {
        return Err(BuddyError::NoSession);
    }

    test_connection(transport, &session).await?;
    Ok(session)
}

/// Probe the API with the session. Only bad/missing session codes fail;
/// "admin required" and other domain errors still prove the session is live.
pub async fn test_connection<T: Transport + ?Sized>(transport: &T, session: &Session) -> Result<()> {
    let body = transport
        .get("/api/user", &[("session_id", session.id.clone())])
        .await?;
    let envelope: Envelope<serde_json::Value> = serde_json::from_str(&body)?;

    match envelope.error {
        Some(err) if matches!(err.code, BAD_SESSION_CODE | NO_SESSION_CODE) => {
            tracing::warn!(code = err.code, message = %err.message, "stored session rejected");
            Err(err.into())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tte::testing::FakeTransport;
    use tempfile::TempDir;

    const SESSION_OK: &str =
        r#"{"result": {"id": "S-1", "user_id": "U-1"}, "error": null}"#;

    #[tokio::test]
    async fn test_create_session_stores_envelope() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path());
        let transport = FakeTransport::new().with_response("/api/session", SESSION_OK);

        let session = create_session(&transport, &store, "bob", "pw").await.unwrap();
        assert_eq!(session.id, "S-1");
        assert_eq!(session.user_id, "U-1");

        let stored = store.read("session", "session", "json").unwrap();
        assert_eq!(stored, SESSION_OK.as_bytes());

        let requests = transport.requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].param("username"), Some("bob"));
    }

    #[tokio::test]
    async fn test_create_session_domain_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path());
        let transport = FakeTransport::new().with_response(
            "/api/session",
            r#"{"result": null, "error": {"code": 440, "data": "", "message": "Password incorrect."}}"#,
        );

        let err = create_session(&transport, &store, "bob", "bad").await.unwrap_err();
        assert!(matches!(err, BuddyError::Api(ref e) if e.code == 440));
        assert!(store.read("session", "session", "json").is_err());
    }

    #[tokio::test]
    async fn test_restore_without_stored_session() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path());
        let transport = FakeTransport::new();

        let err = restore_session(&transport, &store).await.unwrap_err();
        assert!(matches!(err, BuddyError::NoSession));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_restore_accepts_admin_required() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path());
        store
            .store("session", "session", "json", SESSION_OK.as_bytes())
            .unwrap();
        let transport = FakeTransport::new().with_response(
            "/api/user",
            r#"{"result": null, "error": {"code": 450, "data": "", "message": "You must be an admin to do that."}}"#,
        );

        let session = restore_session(&transport, &store).await.unwrap();
        assert_eq!(session.id, "S-1");
        assert_eq!(transport.requests()[0].param("session_id"), Some("S-1"));
    }

    #[tokio::test]
    async fn test_restore_rejects_expired_session() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path());
        store
            .store("session", "session", "json", SESSION_OK.as_bytes())
            .unwrap();
        let transport = FakeTransport::new().with_response(
            "/api/user",
            r#"{"result": null, "error": {"code": 441, "data": "S-1", "message": "Session expired."}}"#,
        );

        let err = restore_session(&transport, &store).await.unwrap_err();
        assert!(matches!(err, BuddyError::Api(ref e) if e.code == 441));
    }
}
