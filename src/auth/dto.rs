use serde::{Deserialize, Serialize};

use super::jwt::SessionUser;

/// Request body for elderly registration.
#[derive(Debug, Deserialize)]
pub struct RegisterElderlyRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    #[serde(default)]
    pub weight_lbs: Option<u32>,
    #[serde(default)]
    pub height_in: Option<u32>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub cooking_skill: u8,
    #[serde(default, alias = "cuisines")]
    pub preferred_cuisines: Vec<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// Request body for caretaker registration.
#[derive(Debug, Deserialize)]
pub struct RegisterCaretakerRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub association: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "elderly_ids")]
    pub elderly_user_ids: Vec<i64>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response returned after login, register or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: SessionUser,
}
