//! Attachment download and upload.
//!
//! Downloads go through the REST API. Uploads use the web UI's upload
//! servlet instead, which only accepts a browser-like session: the
//! `JSESSIONID` cookie from `GET Session`, a `wosid` cookie holding the
//! session key, and the session key again as a query parameter.

use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, ACCEPT, CACHE_CONTROL, PRAGMA, SET_COOKIE, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::Value;
use url::Url;

use super::session::session_key_from;
use super::{WhdClient, BULK_TIMEOUT, READ_TIMEOUT};
use crate::error::WhdError;
use crate::models::AttachmentTarget;

/// Path of the upload servlet below the server root.
const UPLOAD_PATH: &str = "/helpdesk/attachment/upload";

/// The servlet only answers clients that identify like the desktop Java applet.
const UPLOAD_USER_AGENT: &str = "Java/1.7.0_55";

const UPLOAD_ACCEPT: &str = "text/html,image/gif,image/jpeg,*;q=.2,*/*;q=.2";

impl WhdClient {
    /// Downloads an attachment's content.
    pub async fn get_attachment(&self, id: u64) -> Result<Vec<u8>, WhdError> {
        let resource = format!("TicketAttachments/{}", id);
        let url = self.api_url(&resource);

        self.execute(&format!("GET {}", resource), BULK_TIMEOUT, || {
            self.authed(Method::GET, &url)
                .header(ACCEPT, "application/octet")
        })
        .await
        .map_err(|e| match e {
            WhdError::NotFound { .. } => WhdError::not_found(format!("attachment {}", id)),
            e => e,
        })
    }

    /// Downloads an attachment and returns it base64-encoded.
    pub async fn get_attachment_as_base64(&self, id: u64) -> Result<String, WhdError> {
        let data = self.get_attachment(id).await?;
        Ok(STANDARD.encode(data))
    }

    /// Uploads a file to a ticket and returns the attachment id.
    pub async fn upload_attachment(
        &self,
        ticket_id: u64,
        file_name: &str,
        data: &[u8],
    ) -> Result<u64, WhdError> {
        self.upload_attachment_to_entity(AttachmentTarget::Ticket, ticket_id, file_name, data)
            .await
    }

    /// Uploads a file to a note and returns the attachment id.
    pub async fn upload_attachment_to_note(
        &self,
        note_id: u64,
        file_name: &str,
        data: &[u8],
    ) -> Result<u64, WhdError> {
        self.upload_attachment_to_entity(AttachmentTarget::Note, note_id, file_name, data)
            .await
    }

    /// Uploads a local file to a ticket, optionally deleting it afterwards.
    pub async fn upload_attachment_to_ticket_from_file(
        &self,
        ticket_id: u64,
        file_name: &str,
        path: impl AsRef<Path>,
        delete_after: bool,
    ) -> Result<u64, WhdError> {
        self.upload_from_file(
            AttachmentTarget::Ticket,
            ticket_id,
            file_name,
            path.as_ref(),
            delete_after,
        )
        .await
    }

    /// Uploads a local file to a note, optionally deleting it afterwards.
    pub async fn upload_attachment_to_note_from_file(
        &self,
        note_id: u64,
        file_name: &str,
        path: impl AsRef<Path>,
        delete_after: bool,
    ) -> Result<u64, WhdError> {
        self.upload_from_file(
            AttachmentTarget::Note,
            note_id,
            file_name,
            path.as_ref(),
            delete_after,
        )
        .await
    }

    async fn upload_from_file(
        &self,
        target: AttachmentTarget,
        entity_id: u64,
        file_name: &str,
        path: &Path,
        delete_after: bool,
    ) -> Result<u64, WhdError> {
        let data = tokio::fs::read(path).await.map_err(|source| WhdError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let attachment_id = self
            .upload_attachment_to_entity(target, entity_id, file_name, &data)
            .await?;

        if delete_after {
            if let Err(e) = tokio::fs::remove_file(path).await {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to delete uploaded file"
                );
            }
        }

        Ok(attachment_id)
    }

    /// Uploads `data` as `file_name` to a ticket or note.
    ///
    /// Opens a fresh session for the upload; its cookies live only for the
    /// duration of this call.
    ///
    /// # Errors
    ///
    /// Returns `WhdError::Validation` for an empty file name, and
    /// `WhdError::Rejected` when the server answers with a `reason` instead
    /// of an attachment id.
    pub async fn upload_attachment_to_entity(
        &self,
        target: AttachmentTarget,
        entity_id: u64,
        file_name: &str,
        data: &[u8],
    ) -> Result<u64, WhdError> {
        if file_name.trim().is_empty() {
            return Err(WhdError::validation("attachment file name must not be empty"));
        }

        let jar = Arc::new(Jar::default());
        let http = Self::http_builder(self.ssl_verify)
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(WhdError::HttpClient)?;

        let session_url = self.api_url("Session");
        let (headers, body) = self
            .execute_with_headers("GET Session", READ_TIMEOUT, || {
                self.authed_with(&http, Method::GET, &session_url)
                    .header(ACCEPT, "application/json")
            })
            .await?;
        let session_key = session_key_from(&self.decode::<Value>(&body)?)?;

        // JSESSIONID is usually scoped to the REST path; the servlet lives
        // outside it, so both cookies are re-scoped to the server root.
        let cookie_scope = Url::parse(&self.base_url)
            .map_err(|e| WhdError::invalid_config(format!("invalid base URL: {}", e)))?;
        match jsessionid_from(&headers) {
            Some(id) => {
                jar.add_cookie_str(&format!("JSESSIONID={}; Path=/", id), &cookie_scope);
            }
            None => tracing::debug!("Session response set no JSESSIONID cookie"),
        }
        jar.add_cookie_str(&format!("wosid={}; Path=/", session_key), &cookie_scope);

        let upload_url = format!("{}{}", self.base_url, UPLOAD_PATH);
        let entity_id_param = entity_id.to_string();

        tracing::debug!(
            entity = %target,
            entity_id,
            file_name = %file_name,
            size = data.len(),
            "Uploading attachment"
        );

        let body = self
            .execute(&format!("POST attachment upload ({})", target), BULK_TIMEOUT, || {
                let part = Part::bytes(data.to_vec()).file_name(file_name.to_string());
                let form = Form::new().part("file", part);

                http.post(&upload_url)
                    .query(&[
                        ("type", target.as_str()),
                        ("entityId", entity_id_param.as_str()),
                        ("returnFields", "id"),
                        ("sessionKey", session_key.as_str()),
                    ])
                    .header(USER_AGENT, UPLOAD_USER_AGENT)
                    .header(ACCEPT, UPLOAD_ACCEPT)
                    .header(PRAGMA, "no-cache")
                    .header(CACHE_CONTROL, "no-cache")
                    .multipart(form)
            })
            .await?;

        let response: Value = self.decode(&body)?;
        let attachment_id = attachment_id_from(&response)?;

        tracing::info!(entity = %target, entity_id, attachment_id, "Attachment uploaded");
        Ok(attachment_id)
    }
}

/// Returns the `JSESSIONID` value from the `Set-Cookie` headers, if any.
fn jsessionid_from(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|cookie| cookie.split(';').next())
        .filter_map(|pair| pair.trim().strip_prefix("JSESSIONID="))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Reads the attachment id from an upload response.
fn attachment_id_from(response: &Value) -> Result<u64, WhdError> {
    if let Some(id) = response
        .get("id")
        .and_then(|id| id.as_u64().or_else(|| id.as_f64().map(|f| f as u64)))
    {
        return Ok(id);
    }

    match response.get("reason").and_then(Value::as_str) {
        Some(reason) => {
            tracing::warn!(reason = %reason, "Unable to upload attachment");
            Err(WhdError::rejected(reason))
        }
        None => Err(WhdError::invalid_response("invalid attachment id in response")),
    }
}
