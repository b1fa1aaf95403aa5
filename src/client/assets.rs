//! Asset lookups.

use super::{WhdClient, READ_TIMEOUT};
use crate::error::WhdError;
use crate::models::{Asset, ListQuery};

impl WhdClient {
    /// Finds assets by asset number.
    ///
    /// The server matches on the number and may return several assets.
    pub async fn get_asset(&self, asset_number: &str) -> Result<Vec<Asset>, WhdError> {
        let query = [("assetNumber", asset_number.to_string())];
        self.get_json("Assets", &query, READ_TIMEOUT).await
    }

    /// Gets a single asset by id.
    pub async fn get_asset_by_id(&self, id: u64) -> Result<Asset, WhdError> {
        self.get_json(&format!("Assets/{}", id), &[], READ_TIMEOUT)
            .await
            .map_err(|e| match e {
                WhdError::NotFound { .. } => WhdError::not_found(format!("asset {}", id)),
                e => e,
            })
    }

    /// Searches assets matching a qualifier.
    pub async fn get_assets(&self, query: &ListQuery) -> Result<Vec<Asset>, WhdError> {
        self.get_json("Assets", &query.to_query_pairs(), READ_TIMEOUT)
            .await
    }
}
