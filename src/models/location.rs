//! Location models for Web Help Desk.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{rename_custom_fields, strip_empty_custom_fields, CustomField};
use crate::error::WhdError;

/// A site or office that tickets and assets belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Unique location id (unset for a location that has not been created yet).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Entity type name, "Location".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// City.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Display name.
    #[serde(rename = "locationName", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    /// State or region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Custom field values.
    #[serde(
        rename = "locationCustomFields",
        default,
        deserialize_with = "super::common::null_as_default",
        skip_serializing_if = "Vec::is_empty",
    )]
    pub custom_fields: Vec<CustomField>,
}

impl Location {
    /// Creates a bare reference to location `id`, as tickets embed it.
    pub fn reference(id: u64) -> Self {
        Self {
            id: Some(id),
            kind: Some("Location".to_string()),
            ..Default::default()
        }
    }

    /// Returns the location name or a placeholder.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(Unnamed location)")
    }

    /// Appends every custom field of `existing` whose definition is not
    /// already present on `self`, so an update does not clear them.
    pub fn merge_missing_custom_fields(&mut self, existing: &Location) {
        let missing: Vec<CustomField> = existing
            .custom_fields
            .iter()
            .filter(|cf| !self.custom_fields.iter().any(|ncf| ncf.id == cf.id))
            .cloned()
            .collect();
        self.custom_fields.extend(missing);
    }

    /// Builds the JSON body for a create or update call.
    ///
    /// Empty custom fields are dropped, `locationCustomFields` becomes
    /// `customFields`, and the read-only `lastUpdated` is removed.
    pub fn to_payload(&self) -> Result<Value, WhdError> {
        let mut location = self.clone();
        strip_empty_custom_fields(&mut location.custom_fields);

        let mut value = serde_json::to_value(&location)?;
        if let Value::Object(ref mut map) = value {
            map.remove("lastUpdated");
            rename_custom_fields(map, "locationCustomFields");
        }
        Ok(value)
    }
}
