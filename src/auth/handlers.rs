use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RefreshRequest, RegisterCaretakerRequest, RegisterElderlyRequest},
        jwt::{AuthUser, JwtKeys, SessionUser},
        services::{issue_tokens, validate_registration},
    },
    state::AppState,
    users::{ContactInformation, NewCaretaker, NewElderly, RegisterError, UserProfile},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register/elderly", post(register_elderly))
        .route("/auth/register/caretaker", post(register_caretaker))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn registered(
    state: &AppState,
    result: Result<UserProfile, RegisterError>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, String)> {
    let profile = match result {
        Ok(p) => p,
        Err(RegisterError::UsernameTaken) => {
            return Err((StatusCode::CONFLICT, "Username already exists".into()));
        }
        Err(e) => {
            error!(error = %e, "registration failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let keys = JwtKeys::from_ref(state);
    let response = match issue_tokens(&keys, SessionUser::from(&profile)) {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "jwt sign failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    info!(user_id = profile.id, role = %profile.role, "user registered");
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state, payload))]
pub async fn register_elderly(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterElderlyRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, String)> {
    payload.username = payload.username.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    if let Err(reason) = validate_registration(&payload.username, &payload.password, &payload.email) {
        warn!(username = %payload.username, reason, "registration rejected");
        return Err((StatusCode::BAD_REQUEST, reason.into()));
    }

    let new = NewElderly {
        username: payload.username,
        password: payload.password,
        first_name: payload.first_name,
        last_name: payload.last_name,
        age: payload.age,
        weight_lbs: payload.weight_lbs,
        height_in: payload.height_in,
        medications: payload.medications,
        allergies: payload.allergies,
        dietary_restrictions: payload.dietary_restrictions,
        cooking_skill: payload.cooking_skill,
        preferred_cuisines: payload.preferred_cuisines,
        contact: ContactInformation {
            phone: payload.phone,
            email: payload.email,
        },
    };
    let result = state.users.register_elderly(new).await;
    registered(&state, result)
}

#[instrument(skip(state, payload))]
pub async fn register_caretaker(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterCaretakerRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, String)> {
    payload.username = payload.username.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    if let Err(reason) = validate_registration(&payload.username, &payload.password, &payload.email) {
        warn!(username = %payload.username, reason, "registration rejected");
        return Err((StatusCode::BAD_REQUEST, reason.into()));
    }

    let new = NewCaretaker {
        username: payload.username,
        password: payload.password,
        name: payload.name,
        association: payload.association,
        contact: ContactInformation {
            phone: payload.phone,
            email: payload.email,
        },
        elderly_user_ids: payload.elderly_user_ids,
    };
    let result = state.users.register_caretaker(new).await;
    registered(&state, result)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let username = payload.username.trim();

    let profile = match state.users.authenticate(username, &payload.password).await {
        Ok(Some(p)) => p,
        Ok(None) => {
            warn!(%username, "login rejected");
            return Err((
                StatusCode::UNAUTHORIZED,
                "Invalid username or password.".into(),
            ));
        }
        Err(e) => {
            error!(error = %e, "authenticate failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let keys = JwtKeys::from_ref(&state);
    let response = match issue_tokens(&keys, SessionUser::from(&profile)) {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "jwt sign failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    info!(user_id = profile.id, role = %profile.role, "user logged in");
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| (StatusCode::UNAUTHORIZED, format!("{}", e)))?;

    // The account may have disappeared since the token was issued.
    let profile = state
        .users
        .profile_as(claims.sub, claims.role)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    let response = issue_tokens(&keys, SessionUser::from(&profile))
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(response))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserProfile>, (StatusCode, String)> {
    match state.users.profile_as(user.id, user.role).await {
        Ok(Some(profile)) => Ok(Json(profile)),
        Ok(None) => {
            warn!(user_id = user.id, "user not found");
            Err((StatusCode::UNAUTHORIZED, "User not found".into()))
        }
        Err(e) => {
            error!(error = %e, user_id = user.id, "profile load failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
