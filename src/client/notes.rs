//! Ticket notes.

use reqwest::Method;

use super::{WhdClient, NOTE_TIMEOUT, WRITE_TIMEOUT};
use crate::error::WhdError;
use crate::models::Note;

/// How many notes to request for a ticket in one call.
const NOTES_LIMIT: &str = "1000";

impl WhdClient {
    /// Adds a note visible to the client and returns its id.
    pub async fn create_note(&self, ticket_id: u64, text: &str) -> Result<u64, WhdError> {
        self.post_note(Note::new(ticket_id, text)).await
    }

    /// Adds a note hidden from the client and returns its id.
    pub async fn create_hidden_note(&self, ticket_id: u64, text: &str) -> Result<u64, WhdError> {
        self.post_note(Note::new(ticket_id, text).hidden(true)).await
    }

    async fn post_note(&self, note: Note) -> Result<u64, WhdError> {
        if note.note_text.as_deref().map_or(true, |t| t.trim().is_empty()) {
            return Err(WhdError::validation("note text must not be empty"));
        }

        let payload = serde_json::to_value(&note)?;
        let created: Note = self
            .send_json(Method::POST, "TechNotes", &payload, NOTE_TIMEOUT)
            .await?;

        if let Some(reason) = created.failure_reason() {
            tracing::warn!(reason = %reason, "Unable to create note");
            return Err(WhdError::rejected(reason));
        }

        created
            .id
            .ok_or_else(|| WhdError::invalid_response("note creation response has no id"))
    }

    /// Lists the notes on a ticket.
    pub async fn get_notes(&self, ticket_id: u64) -> Result<Vec<Note>, WhdError> {
        let query = [
            ("jobTicketId", ticket_id.to_string()),
            ("limit", NOTES_LIMIT.to_string()),
        ];
        self.get_json("TicketNotes", &query, WRITE_TIMEOUT).await
    }
}
