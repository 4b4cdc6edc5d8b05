use serde::{Deserialize, Serialize};

use super::repo_types::InventoryItem;

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub barcode: String,
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub item: InventoryItem,
    /// False when the lookup gave nothing and a placeholder was stored.
    pub found: bool,
}
