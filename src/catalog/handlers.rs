use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use super::{
    dto::{ScanRequest, ScanResponse},
    repo_types::{InventoryItem, Product},
};
use crate::{auth::AuthUser, lookup::is_valid_barcode, state::AppState};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/foods", get(list_items))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/foods/:id", delete(delete_item))
        .route("/scan", post(scan))
}

#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<InventoryItem>>, (StatusCode, String)> {
    match state.inventory.items().await {
        Ok(items) => Ok(Json(items)),
        Err(e) => {
            error!(error = %e, "loading inventory failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    match state.inventory.remove(id).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err((StatusCode::NOT_FOUND, "Item not found".into())),
        Err(e) => {
            error!(error = %e, item_id = id, "remove failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// Resolve a barcode and record it. Unresolved barcodes are still stored,
/// under an "Unknown" placeholder product.
#[instrument(skip(state, body), fields(barcode = %body.barcode))]
pub async fn scan(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(body): Json<ScanRequest>,
) -> Result<(StatusCode, Json<ScanResponse>), (StatusCode, String)> {
    let barcode = body.barcode.trim();
    if !is_valid_barcode(barcode) {
        return Err((StatusCode::BAD_REQUEST, "Invalid barcode".into()));
    }

    let (product, found) = match state.lookup.lookup(barcode).await {
        Some(p) => (p, true),
        None => {
            warn!("product not found, saving placeholder");
            (Product::unknown(), false)
        }
    };

    let item = state.inventory.add(barcode, product).await.map_err(|e| {
        error!(error = %e, "saving scanned item failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    info!(item_id = item.id, found, "scanned");

    Ok((StatusCode::CREATED, Json(ScanResponse { item, found })))
}
