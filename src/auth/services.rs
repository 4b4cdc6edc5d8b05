use lazy_static::lazy_static;
use regex::Regex;

use super::{
    dto::AuthResponse,
    jwt::{JwtKeys, SessionUser},
};
use crate::users::UserProfile;

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_.\-]{3,32}$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

/// Shared checks for both registration forms. Contact email is optional.
pub(crate) fn validate_registration(
    username: &str,
    password: &str,
    email: &str,
) -> Result<(), &'static str> {
    if !is_valid_username(username) {
        return Err("Invalid username");
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err("Password too short");
    }
    if !email.is_empty() && !is_valid_email(email) {
        return Err("Invalid email");
    }
    Ok(())
}

impl From<&UserProfile> for SessionUser {
    fn from(p: &UserProfile) -> Self {
        Self {
            id: p.id,
            role: p.role,
            name: p.name.clone(),
        }
    }
}

pub(crate) fn issue_tokens(keys: &JwtKeys, user: SessionUser) -> anyhow::Result<AuthResponse> {
    Ok(AuthResponse {
        access_token: keys.sign_access(&user)?,
        refresh_token: keys.sign_refresh(&user)?,
        user,
    })
}
