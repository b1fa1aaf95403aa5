//! Common types shared across Web Help Desk models.
//!
//! This module defines custom fields, typed entity references, list paging
//! and the helpers that reshape records into create/update payloads.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Default page size the server uses when none is given.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Largest page size the server accepts for ticket and asset searches.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A custom field value attached to a ticket, asset or location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CustomField {
    /// Id of the custom field definition.
    #[serde(rename = "definitionId", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// The value as the REST API renders it.
    #[serde(
        rename = "restValue",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty",
    )]
    pub value: String,
}

impl CustomField {
    /// Creates a custom field value.
    pub fn new(definition_id: u64, value: impl Into<String>) -> Self {
        Self {
            id: Some(definition_id),
            value: value.into(),
        }
    }
}

/// A reference to another entity by id and type name.
///
/// Used for status types, priority types and the ticket a note belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EntityRef {
    /// Entity id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Entity type name (e.g., "StatusType").
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl EntityRef {
    /// Creates a reference to entity `id` of type `kind`.
    pub fn new(id: u64, kind: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            kind: Some(kind.into()),
        }
    }
}

/// Qualifier search with paging, used for ticket and asset searches.
///
/// The qualifier uses the server's query syntax, for example
/// `(statustype.statusTypeName = 'Open')`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    qualifier: String,
    limit: u32,
    page: u32,
}

impl ListQuery {
    /// Creates a query for the first page with the default page size.
    pub fn new(qualifier: impl Into<String>) -> Self {
        Self {
            qualifier: qualifier.into(),
            limit: 0,
            page: 0,
        }
    }

    /// Sets the page size (0 means default, values above 100 are capped).
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the 1-based page number (0 means the first page).
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// The qualifier expression.
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// The effective page size.
    pub fn limit(&self) -> u32 {
        match self.limit {
            0 => DEFAULT_PAGE_SIZE,
            n => n.min(MAX_PAGE_SIZE),
        }
    }

    /// The effective page number.
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    /// Query parameters for the request.
    pub(crate) fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("qualifier", self.qualifier.clone()),
            ("limit", self.limit().to_string()),
            ("page", self.page().to_string()),
        ]
    }
}

/// Drops custom fields whose value is empty.
pub(crate) fn strip_empty_custom_fields(fields: &mut Vec<CustomField>) {
    fields.retain(|cf| !cf.value.is_empty());
}

/// Moves the entity-specific custom field list to the `customFields` key
/// that create and update calls expect.
pub(crate) fn rename_custom_fields(map: &mut Map<String, Value>, from: &str) {
    if let Some(fields) = map.remove(from) {
        map.insert("customFields".to_string(), fields);
    }
}

/// Returns true if `value` is an object with a non-zero numeric `id`.
pub(crate) fn has_id(value: Option<&Value>) -> bool {
    value
        .and_then(|v| v.get("id"))
        .and_then(Value::as_u64)
        .is_some_and(|id| id != 0)
}

/// Reads a field the server may send as `null`, falling back to the
/// type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Returns true if the optional id is set and non-zero.
pub(crate) fn is_set(id: Option<u64>) -> bool {
    id.is_some_and(|id| id != 0)
}
