//! Lookup-table models: request types, problem types and the like.

use serde::{Deserialize, Serialize};

/// A request type (the server calls them problem types) from the
/// `RequestTypes` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RequestType {
    /// Unique id.
    #[serde(default, deserialize_with = "super::common::null_as_default")]
    pub id: u64,

    /// Id of the parent request type (0 for top level).
    #[serde(default, deserialize_with = "super::common::null_as_default")]
    pub parent_id: u64,

    /// Display name.
    #[serde(
        rename = "problemTypeName",
        default,
        deserialize_with = "super::common::null_as_default",
    )]
    pub name: String,
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// The request type a ticket is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProblemType {
    /// Request type id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Entity type name, "RequestType".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Full path name (e.g., "Hardware / Printer").
    #[serde(rename = "detailDisplayName", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A client or technician referenced from a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClientTech {
    /// Person id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Entity type name ("Client" or "Tech").
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// The tech group level a ticket is routed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TechGroupLevel {
    /// Level id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Entity type name, "TechGroupLevel".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Numeric level within the group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,

    /// Level name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_name: Option<String>,

    /// Abbreviated level name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_level_name: Option<String>,
}

/// Monitoring alert data attached to tickets opened by SolarWinds Orion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OrionAlert {
    /// Alert id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Alert properties.
    #[serde(
        default,
        deserialize_with = "super::common::null_as_default",
        skip_serializing_if = "std::collections::HashMap::is_empty",
    )]
    pub data: std::collections::HashMap<String, String>,
}
