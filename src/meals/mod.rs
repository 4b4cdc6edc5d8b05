mod dto;
pub mod filter;
pub mod generator;
pub mod handlers;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use filter::{is_safe, permitted_categories, safe_foods, Rejection};
pub use generator::{generate_meal, meal_times, recommend_meals, Meal, MealFood, MealTime};
pub use services::{get_meal_recommendations, recommendations_for};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
