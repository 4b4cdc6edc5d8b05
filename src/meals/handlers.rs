use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, instrument, warn};

use super::{
    dto::{DeleteMealRequest, DeletedMeals, LogMealRequest, MealsOverview, RecommendationQuery},
    filter::safe_foods,
    generator::{meal_times, Meal, MealTime},
    services::recommendations_for,
};
use crate::{
    auth::AuthUser,
    state::AppState,
    users::{MealLogEntry, MealLogError},
};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals/recommendations", get(recommendations))
        .route("/meal-times", get(list_meal_times))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route(
        "/meals",
        get(meals_overview).post(log_meal).delete(delete_meal),
    )
}

// --- handlers ---

/// The caller's log, the foods safe for them, and their allergies.
#[instrument(skip(state))]
pub async fn meals_overview(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<MealsOverview>, (StatusCode, String)> {
    let Some(profile) = state
        .users
        .profile_as(user.id, user.role)
        .await
        .map_err(internal)?
    else {
        warn!(user_id = user.id, "user not found");
        return Err((StatusCode::UNAUTHORIZED, "User not found".into()));
    };
    let user_meals = state
        .users
        .meal_log(user.id, user.role)
        .await
        .map_err(internal)?
        .unwrap_or_default();

    let foods = match state.inventory.foods().await {
        Ok(f) => f,
        Err(e) => {
            warn!(error = %e, "loading foods failed");
            Vec::new()
        }
    };

    Ok(Json(MealsOverview {
        user_meals,
        foods: safe_foods(&foods, &profile).into_iter().cloned().collect(),
        user_allergies: profile.allergies,
    }))
}

#[instrument(skip(state, body))]
pub async fn log_meal(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<LogMealRequest>,
) -> Result<(StatusCode, Json<MealLogEntry>), (StatusCode, String)> {
    if !body.quantity.is_finite() || body.quantity <= 0.0 {
        return Err((StatusCode::BAD_REQUEST, "quantity must be positive".into()));
    }
    if body.meal_type.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "meal_type is required".into()));
    }

    // food_id is the inventory id shown by GET /foods
    let foods = state.inventory.foods().await.map_err(internal)?;
    let Some(food) = foods.iter().find(|f| f.item_id == body.food_id) else {
        return Err((StatusCode::NOT_FOUND, "Food not found".into()));
    };

    match state
        .users
        .log_meal(user.id, user.role, food, body.quantity, &body.meal_type)
        .await
    {
        Ok(entry) => Ok((StatusCode::CREATED, Json(entry))),
        Err(MealLogError::UnknownUser(id)) => {
            warn!(user_id = id, "meal log for unknown user");
            Err((StatusCode::NOT_FOUND, "User not found".into()))
        }
        Err(e @ MealLogError::UnsafeFood { .. }) => {
            warn!(error = %e, user_id = user.id, "unsafe food refused");
            Err((StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
        }
        Err(e) => {
            error!(error = %e, user_id = user.id, "log_meal failed");
            Err(internal(e))
        }
    }
}

#[instrument(skip(state, body))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<DeleteMealRequest>,
) -> Result<Json<DeletedMeals>, (StatusCode, String)> {
    let removed = state
        .users
        .delete_meals(user.id, user.role, &body.timestamp)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = user.id, "delete_meals failed");
            internal(e)
        })?;
    Ok(Json(DeletedMeals { removed }))
}

#[instrument(skip(state))]
pub async fn recommendations(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(q): Query<RecommendationQuery>,
) -> Result<Json<Vec<Meal>>, (StatusCode, String)> {
    let meal_time: MealTime = q
        .meal_time
        .parse()
        .map_err(|e: super::generator::UnknownMealTime| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let profile = match state.users.profile_as(user.id, user.role).await {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "loading users failed");
            None
        }
    };
    let meals = match profile {
        Some(p) => recommendations_for(&state.inventory, &p, meal_time).await,
        None => Vec::new(),
    };
    Ok(Json(meals))
}

pub async fn list_meal_times() -> Json<&'static [MealTime]> {
    Json(meal_times())
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
