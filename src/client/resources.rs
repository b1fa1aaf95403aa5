//! Locations and the reference lists used to fill in tickets.

use std::collections::HashMap;

use serde_json::Value;

use super::{WhdClient, READ_TIMEOUT};
use crate::error::WhdError;
use crate::models::{Location, RequestType};

/// Qualifier that hides deleted locations.
const ACTIVE_LOCATIONS: &str = "((deleted=null)or(deleted=0))";

impl WhdClient {
    /// Gets a single location by id.
    pub async fn get_location(&self, id: u64) -> Result<Location, WhdError> {
        self.get_json(&format!("Location/{}", id), &[], READ_TIMEOUT)
            .await
            .map_err(|e| match e {
                WhdError::NotFound { .. } => WhdError::not_found(format!("location {}", id)),
                e => e,
            })
    }

    /// Creates the location if it has no id, otherwise updates it.
    ///
    /// On update, custom fields the server already holds but `location`
    /// does not mention are carried over, so they are not cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing location cannot be read, or if the
    /// server refuses the write.
    pub async fn create_update_location(&self, location: &Location) -> Result<u64, WhdError> {
        let mut location = location.clone();

        if let Some(id) = location.id.filter(|id| *id != 0) {
            let existing = self.get_location(id).await?;
            location.merge_missing_custom_fields(&existing);
        }

        let payload = location.to_payload()?;
        let id = self
            .save_entity("Locations", "Locations", location.id, &payload)
            .await?;

        tracing::info!(location_id = id, "Location saved");
        Ok(id)
    }

    /// Lists every request type, keyed by id.
    pub async fn get_request_type_list(&self) -> Result<HashMap<u64, RequestType>, WhdError> {
        let types: Vec<RequestType> = self
            .fetch_all_pages("RequestTypes", 75, &[("list", "all")])
            .await?;

        Ok(types.into_iter().map(|t| (t.id, t)).collect())
    }

    /// Maps status type ids to names.
    pub async fn get_status_type_list(&self) -> Result<HashMap<u64, String>, WhdError> {
        self.fetch_name_map("StatusTypes", 50, &[], "statusTypeName")
            .await
    }

    /// Maps ticket custom field definition ids to labels.
    pub async fn get_custom_field_list(&self) -> Result<HashMap<u64, String>, WhdError> {
        self.fetch_name_map("CustomFieldDefinitions", 50, &[], "label")
            .await
    }

    /// Maps location custom field definition ids to labels.
    pub async fn get_location_custom_field_list(&self) -> Result<HashMap<u64, String>, WhdError> {
        self.fetch_name_map("CustomFieldDefinitions/Location", 50, &[], "label")
            .await
    }

    /// Maps asset custom field definition ids to labels.
    pub async fn get_asset_custom_field_list(&self) -> Result<HashMap<u64, String>, WhdError> {
        self.fetch_name_map("CustomFieldDefinitions/Asset", 50, &[], "label")
            .await
    }

    /// Maps technician ids to display names.
    pub async fn get_tech_list(&self) -> Result<HashMap<u64, String>, WhdError> {
        self.fetch_name_map("Techs", 50, &[], "displayName").await
    }

    /// Maps ids of locations that are not deleted to their names.
    pub async fn get_location_list(&self) -> Result<HashMap<u64, String>, WhdError> {
        self.fetch_name_map("Locations", 250, &[("qualifier", ACTIVE_LOCATIONS)], "locationName")
            .await
    }

    /// Maps priority type ids to names.
    pub async fn get_priority_type_list(&self) -> Result<HashMap<u64, String>, WhdError> {
        self.fetch_name_map("PriorityTypes", 10, &[], "priorityTypeName")
            .await
    }

    async fn fetch_name_map(
        &self,
        resource: &str,
        limit: u32,
        params: &[(&str, &str)],
        field: &str,
    ) -> Result<HashMap<u64, String>, WhdError> {
        let entries: Vec<Value> = self.fetch_all_pages(resource, limit, params).await?;
        let map = index_by_name(&entries, field)?;

        tracing::debug!(resource = %resource, count = map.len(), "Reference list loaded");
        Ok(map)
    }
}

/// Builds an id -> `field` map from list entries.
fn index_by_name(entries: &[Value], field: &str) -> Result<HashMap<u64, String>, WhdError> {
    entries
        .iter()
        .map(|entry| {
            let id = entry
                .get("id")
                .and_then(Value::as_u64)
                .ok_or_else(|| WhdError::invalid_response("list entry has no numeric id"))?;
            let name = entry
                .get(field)
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    WhdError::invalid_response(format!("list entry {} has no {}", id, field))
                })?;
            Ok((id, name.to_string()))
        })
        .collect()
}
