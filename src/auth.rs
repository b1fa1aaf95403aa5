//! Authentication for the Web Help Desk REST API.
//!
//! Web Help Desk takes credentials as query parameters on every call rather
//! than in a header. `Credentials` knows which parameters each scheme needs.

use std::fmt;

/// Credentials used to authenticate against Web Help Desk.
///
/// `Debug` output never contains the secret part.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// A technician API key (`apiKey=`).
    ApiKey {
        /// The API key.
        key: String,
    },

    /// A session key obtained from `GET Session` (`username=` + `sessionKey=`).
    SessionKey {
        /// The user the session belongs to, when known.
        username: Option<String>,
        /// The session key.
        session_key: String,
    },

    /// A username and password (`username=` + `password=`).
    Password {
        /// Login name.
        username: String,
        /// Password.
        password: String,
    },
}

impl Credentials {
    /// Creates API key credentials.
    pub fn api_key(key: impl Into<String>) -> Self {
        Credentials::ApiKey { key: key.into() }
    }

    /// Creates password credentials.
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Password {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates session key credentials.
    pub fn session_key(username: Option<String>, session_key: impl Into<String>) -> Self {
        Credentials::SessionKey {
            username,
            session_key: session_key.into(),
        }
    }

    /// Returns the query parameters that authenticate a request.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        match self {
            Credentials::Password { username, password } => {
                vec![("username", username.as_str()), ("password", password.as_str())]
            }
            Credentials::SessionKey {
                username,
                session_key,
            } => {
                let mut pairs = Vec::with_capacity(2);
                if let Some(username) = username {
                    pairs.push(("username", username.as_str()));
                }
                pairs.push(("sessionKey", session_key.as_str()));
                pairs
            }
            Credentials::ApiKey { key } => vec![("apiKey", key.as_str())],
        }
    }

    /// Returns the username, if this scheme carries one.
    pub fn username(&self) -> Option<&str> {
        match self {
            Credentials::ApiKey { .. } => None,
            Credentials::SessionKey { username, .. } => username.as_deref(),
            Credentials::Password { username, .. } => Some(username),
        }
    }

    /// Returns the secret part of the credentials.
    ///
    /// This should ONLY be used for sanitizing messages, never for logging.
    pub(crate) fn secret(&self) -> &str {
        match self {
            Credentials::ApiKey { key } => key,
            Credentials::SessionKey { session_key, .. } => session_key,
            Credentials::Password { password, .. } => password,
        }
    }

    /// Short name of the scheme, safe to log.
    pub fn scheme(&self) -> &'static str {
        match self {
            Credentials::ApiKey { .. } => "api-key",
            Credentials::SessionKey { .. } => "session-key",
            Credentials::Password { .. } => "password",
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("scheme", &self.scheme())
            .field("username", &self.username())
            .finish_non_exhaustive()
    }
}
