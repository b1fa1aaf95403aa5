//! Note models for Web Help Desk.
//!
//! Notes are technician comments on tickets. The same record is used for
//! reading (`mobileNoteText` carries the text) and creating (`noteText`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::attachment::Attachment;
use super::common::EntityRef;

/// A note attached to a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique note id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// When the note was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,

    /// Plain-text body as returned when reading notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_note_text: Option<String>,

    /// Relative time of the last update (e.g., "2 hours ago").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pretty_updated_string: Option<String>,

    /// Body sent when creating a note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_text: Option<String>,

    /// Files attached to the note.
    #[serde(
        default,
        deserialize_with = "super::common::null_as_default",
        skip_serializing_if = "Vec::is_empty",
    )]
    pub attachments: Vec<Attachment>,

    /// Whether the note is hidden from the client.
    #[serde(default, deserialize_with = "super::common::null_as_default")]
    pub is_hidden: bool,

    /// Whether the note is a tech-only note.
    #[serde(default, deserialize_with = "super::common::null_as_default")]
    pub is_tech_note: bool,

    /// The ticket the note belongs to.
    #[serde(rename = "jobticket", default, skip_serializing_if = "Option::is_none")]
    pub job_ticket: Option<EntityRef>,

    /// Failure reason returned instead of a note when creation fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Note {
    /// Creates a new note for ticket `ticket_id`.
    pub fn new(ticket_id: u64, text: impl Into<String>) -> Self {
        Self {
            note_text: Some(text.into()),
            job_ticket: Some(EntityRef::new(ticket_id, "JobTicket")),
            ..Default::default()
        }
    }

    /// Marks the note as hidden from the client.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.is_hidden = hidden;
        self
    }

    /// Returns the note text or a placeholder.
    pub fn display_text(&self) -> &str {
        self.mobile_note_text
            .as_deref()
            .or(self.note_text.as_deref())
            .unwrap_or("(No content)")
    }

    /// Returns the failure reason if the server reported one.
    pub fn failure_reason(&self) -> Option<&str> {
        self.reason.as_deref().filter(|r| !r.is_empty())
    }
}
