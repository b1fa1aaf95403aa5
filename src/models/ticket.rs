//! Ticket models for Web Help Desk.
//!
//! A `Ticket` is used both for reading and for create/update calls. Writing
//! needs some reshaping first, see [`Ticket::to_payload`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::asset::Asset;
use super::attachment::Attachment;
use super::common::{
    has_id, is_set, rename_custom_fields, strip_empty_custom_fields, CustomField, EntityRef,
};
use super::location::Location;
use super::note::Note;
use super::reference::{ClientTech, OrionAlert, ProblemType, TechGroupLevel};
use crate::error::WhdError;

/// A helpdesk ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Unique ticket id (unset for a ticket that has not been created yet).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Ticket body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Subject line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Last modification time. Read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,

    /// When the ticket was reported. Read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_date_utc: Option<String>,

    /// Shorthand for setting `location` by id when writing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<u64>,

    /// Ticket location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    /// Shorthand for setting `status_type` by id when writing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_type_id: Option<u64>,

    /// Ticket status.
    #[serde(rename = "statustype", default, skip_serializing_if = "Option::is_none")]
    pub status_type: Option<EntityRef>,

    /// Shorthand for setting `priority_type` by id when writing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_type_id: Option<u64>,

    /// Ticket priority.
    #[serde(rename = "prioritytype", default, skip_serializing_if = "Option::is_none")]
    pub priority_type: Option<EntityRef>,

    /// Request type.
    #[serde(rename = "problemtype", default, skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<ProblemType>,

    /// Custom field values.
    #[serde(
        rename = "ticketCustomFields",
        default,
        deserialize_with = "super::common::null_as_default",
        skip_serializing_if = "Vec::is_empty",
    )]
    pub custom_fields: Vec<CustomField>,

    /// Linked assets.
    #[serde(
        default,
        deserialize_with = "super::common::null_as_default",
        skip_serializing_if = "Vec::is_empty",
    )]
    pub assets: Vec<Asset>,

    /// Notes on the ticket.
    #[serde(
        default,
        deserialize_with = "super::common::null_as_default",
        skip_serializing_if = "Vec::is_empty",
    )]
    pub notes: Vec<Note>,

    /// Attached files.
    #[serde(
        default,
        deserialize_with = "super::common::null_as_default",
        skip_serializing_if = "Vec::is_empty",
    )]
    pub attachments: Vec<Attachment>,

    /// Assigned technician.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_tech: Option<ClientTech>,

    /// Routing level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_group_level: Option<TechGroupLevel>,

    /// Monitoring alert that opened the ticket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orion_alert: Option<OrionAlert>,

    /// Whether the technician is emailed about the change.
    #[serde(
        default,
        deserialize_with = "super::common::null_as_default",
        skip_serializing_if = "std::ops::Not::not",
    )]
    pub email_tech: bool,

    /// Whether the client is emailed about the change.
    #[serde(default, deserialize_with = "super::common::null_as_default")]
    pub email_client: bool,
}

impl Ticket {
    /// Creates an empty ticket with a subject and body, ready to be created.
    pub fn new(subject: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            detail: Some(detail.into()),
            ..Default::default()
        }
    }

    /// Returns the subject or a placeholder.
    pub fn display_subject(&self) -> &str {
        self.subject.as_deref().unwrap_or("(No subject)")
    }

    /// Returns true if this ticket has not been created on the server yet.
    pub fn is_new(&self) -> bool {
        !is_set(self.id)
    }

    /// Builds the JSON body for a create or update call.
    ///
    /// - `reportDateUtc` and `lastUpdated` are read-only and never sent
    /// - `locationId`, `priorityTypeId` and `statusTypeId` expand into the
    ///   nested reference objects the server reads
    /// - custom fields with an empty value are dropped, and the list is sent
    ///   as `customFields`
    /// - nested references without an id are dropped; `prioritytype` and
    ///   `statustype` are only sent when set through their id shorthand
    pub fn to_payload(&self) -> Result<Value, WhdError> {
        let mut ticket = self.clone();
        ticket.report_date_utc = None;

        if let Some(id) = ticket.location_id.filter(|id| *id != 0) {
            ticket.location = Some(Location::reference(id));
        }
        if let Some(id) = ticket.priority_type_id.filter(|id| *id != 0) {
            ticket.priority_type = Some(EntityRef::new(id, "PriorityType"));
        }
        if let Some(id) = ticket.status_type_id.filter(|id| *id != 0) {
            ticket.status_type = Some(EntityRef::new(id, "StatusType"));
        }

        strip_empty_custom_fields(&mut ticket.custom_fields);

        let mut value = serde_json::to_value(&ticket)?;
        if let Value::Object(ref mut map) = value {
            map.remove("lastUpdated");
            rename_custom_fields(map, "ticketCustomFields");

            if !has_id(map.get("problemtype")) {
                map.remove("problemtype");
            }
            if !has_id(map.get("location")) {
                map.remove("location");
            }
            if !is_set(ticket.priority_type_id) {
                map.remove("prioritytype");
            }
            if !is_set(ticket.status_type_id) {
                map.remove("statustype");
            }
        }

        Ok(value)
    }
}
