use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ProductApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://world.openfoodfacts.org/api/v0/product".into(),
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub catalog_path: PathBuf,
    pub users_path: PathBuf,
    pub jwt: JwtConfig,
    pub product_api: ProductApiConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "carepantry".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "carepantry-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let (catalog_path, users_path) = data_paths();
        Ok(Self {
            catalog_path,
            users_path,
            jwt,
            product_api: product_api_from_env(),
        })
    }
}

/// Catalog and users file locations. Shared with the command-line tools,
/// which need the files but not the JWT settings.
pub fn data_paths() -> (PathBuf, PathBuf) {
    let catalog = std::env::var("CATALOG_PATH").unwrap_or_else(|_| "data/sample_food.json".into());
    let users = std::env::var("USERS_PATH").unwrap_or_else(|_| "data/sample_user.json".into());
    (catalog.into(), users.into())
}

pub fn product_api_from_env() -> ProductApiConfig {
    let defaults = ProductApiConfig::default();
    ProductApiConfig {
        base_url: std::env::var("PRODUCT_API_URL").unwrap_or(defaults.base_url),
        timeout_secs: std::env::var("PRODUCT_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.timeout_secs),
    }
}
