mod dto;
pub mod handlers;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use repo_types::{FoodItem, InventoryDocument, InventoryItem, Product};
pub use services::{add_item, foods_from_inventory, load_foods, next_item_id, remove_item, Inventory};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
