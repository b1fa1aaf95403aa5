//! Session keys.
//!
//! A session key lets later calls authenticate without resending a password,
//! and the attachment upload endpoint only accepts session-authenticated
//! requests.

use serde_json::Value;

use super::{WhdClient, READ_TIMEOUT};
use crate::auth::Credentials;
use crate::error::WhdError;

impl WhdClient {
    /// Opens a session with the configured credentials and returns its key.
    ///
    /// # Errors
    ///
    /// Returns `WhdError::Session` if the response has no `sessionKey`.
    pub async fn get_session_key(&self) -> Result<String, WhdError> {
        let response: Value = self.get_json("Session", &[], READ_TIMEOUT).await?;
        session_key_from(&response)
    }

    /// Ends the session identified by `session_key`.
    ///
    /// # Errors
    ///
    /// Returns `WhdError::Session` if the server does not answer `OK`,
    /// including when it answers with an error status. Transport failures
    /// are returned as they are.
    pub async fn terminate_session(&self, session_key: &str) -> Result<(), WhdError> {
        let url = self.api_url("Session");

        let body = self
            .execute("DELETE Session", READ_TIMEOUT, || {
                self.http.delete(&url).query(&[("sessionKey", session_key)])
            })
            .await
            .map_err(|e| match e {
                WhdError::Http(_) | WhdError::Timeout { .. } => e,
                e => WhdError::session(format!(
                    "session termination refused: {}",
                    e.sanitized_display(&[session_key, self.credentials.secret()])
                )),
            })?;

        let text = String::from_utf8_lossy(&body);
        if text.trim() == "OK" {
            tracing::debug!("Session terminated");
            Ok(())
        } else {
            Err(WhdError::session(format!(
                "invalid response to session termination: {}",
                WhdError::clip_body(&text, &[session_key, self.credentials.secret()])
            )))
        }
    }

    /// Opens a session and returns a client that authenticates with it.
    ///
    /// The caller should end the session with
    /// [`terminate_session`](Self::terminate_session) when done.
    pub async fn start_session(&self) -> Result<WhdClient, WhdError> {
        let session_key = self.get_session_key().await?;
        let username = self.credentials.username().map(str::to_string);

        tracing::debug!(scheme = self.credentials.scheme(), "Session opened");

        Ok(self.with_credentials(Credentials::session_key(username, session_key)))
    }
}

/// Reads the `sessionKey` field of a `Session` response.
pub(super) fn session_key_from(response: &Value) -> Result<String, WhdError> {
    response
        .get("sessionKey")
        .and_then(Value::as_str)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .ok_or_else(|| WhdError::session("invalid sessionKey in response"))
}
