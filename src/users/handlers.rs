use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{error, instrument};

use super::dto::ElderlyListItem;
use crate::{auth::AuthUser, state::AppState};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_elderly))
}

/// Elderly users with their caretaker attached. A missing or broken users
/// file yields an empty list.
#[instrument(skip(state))]
pub async fn list_elderly(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<ElderlyListItem>>, (StatusCode, String)> {
    let joined = match state.users.elderly_with_caretakers().await {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "loading users failed");
            Vec::new()
        }
    };
    Ok(Json(joined.into_iter().map(ElderlyListItem::from).collect()))
}
