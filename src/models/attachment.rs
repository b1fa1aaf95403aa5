//! Attachment models for Web Help Desk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about a file attached to a ticket or note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Unique attachment id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Original file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Human-readable size (e.g., "12 KB").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_string: Option<String>,

    /// When the file was uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date_utc: Option<DateTime<Utc>>,
}

/// The kind of record an uploaded file is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentTarget {
    /// A ticket.
    Ticket,
    /// A technician note.
    Note,
}

impl AttachmentTarget {
    /// The `type` value the upload endpoint expects.
    pub fn as_str(self) -> &'static str {
        match self {
            AttachmentTarget::Ticket => "jobTicket",
            AttachmentTarget::Note => "techNote",
        }
    }
}

impl std::fmt::Display for AttachmentTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
