mod dto;
pub mod handlers;
mod profile;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use profile::{normalize_terms, Role, UserProfile};
pub use repo_types::{
    Account, CaretakerRecord, ContactInformation, ElderlyRecord, MealLogEntry, UserDocument,
};
pub use services::{
    elderly_with_caretakers, find_profile, hash_plaintext_passwords, load_profiles,
    ElderlyWithCaretaker, MealLogError, NewCaretaker, NewElderly, RegisterError, UserDirectory,
};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::read_routes())
}
