//! Asset models for Web Help Desk.

use serde::{Deserialize, Serialize};

use super::common::CustomField;
use super::location::Location;

/// A piece of tracked equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Unique asset id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Entity type name, "Asset".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Asset tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_number: Option<String>,

    /// Manufacturer serial number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    /// IP address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_address: Option<String>,

    /// Host name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_name: Option<String>,

    /// Where the asset lives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    /// Custom field values.
    #[serde(
        rename = "assetCustomFields",
        default,
        deserialize_with = "super::common::null_as_default",
        skip_serializing_if = "Vec::is_empty",
    )]
    pub custom_fields: Vec<CustomField>,
}

impl Asset {
    /// Returns the asset number, falling back to the serial number.
    pub fn display_number(&self) -> &str {
        self.asset_number
            .as_deref()
            .or(self.serial_number.as_deref())
            .unwrap_or("(No asset number)")
    }
}
