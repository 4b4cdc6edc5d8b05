use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{catalog::Product, config::ProductApiConfig};

/// Barcode → product resolution. Failures of any kind come back as `None`.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn lookup(&self, barcode: &str) -> Option<Product>;
}

pub fn is_valid_barcode(barcode: &str) -> bool {
    lazy_static! {
        static ref BARCODE_RE: Regex = Regex::new(r"^[0-9]{6,14}$").unwrap();
    }
    BARCODE_RE.is_match(barcode)
}

/// Open Food Facts v0 product API.
#[derive(Debug, Clone)]
pub struct OpenFoodFacts {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct OffResponse {
    #[serde(default)]
    status: Option<i64>,
    product: Option<OffProduct>,
}

#[derive(Debug, Deserialize)]
struct OffProduct {
    product_name: Option<String>,
    brands: Option<String>,
    categories: Option<String>,
    #[serde(default)]
    nutriments: OffNutriments,
    #[serde(default)]
    allergens_tags: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OffNutriments {
    #[serde(rename = "energy-kcal_100g")]
    energy_kcal_100g: Option<f64>,
}

fn or_unknown(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "Unknown".into())
}

impl From<OffProduct> for Product {
    fn from(p: OffProduct) -> Self {
        Self {
            name: or_unknown(p.product_name),
            brand: or_unknown(p.brands),
            category: or_unknown(p.categories),
            calories: p.nutriments.energy_kcal_100g,
            // tags look like "en:milk"
            allergens: p
                .allergens_tags
                .iter()
                .map(|t| t.split_once(':').map_or(t.as_str(), |(_, v)| v).to_string())
                .collect(),
        }
    }
}

impl OpenFoodFacts {
    pub fn new(config: &ProductApiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("carepantry/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build product lookup client")?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(&self, barcode: &str) -> anyhow::Result<Option<Product>> {
        let url = format!("{}/{}.json", self.base_url, barcode);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("product lookup request")?;

        if !response.status().is_success() {
            warn!(status = %response.status(), barcode, "product lookup returned error status");
            return Ok(None);
        }

        let body: OffResponse = response.json().await.context("decode product lookup")?;
        if body.status != Some(1) {
            debug!(barcode, "product not found");
            return Ok(None);
        }
        Ok(body.product.map(Product::from))
    }
}

#[async_trait]
impl ProductLookup for OpenFoodFacts {
    async fn lookup(&self, barcode: &str) -> Option<Product> {
        match self.fetch(barcode).await {
            Ok(product) => product,
            Err(e) => {
                warn!(error = %format!("{e:#}"), barcode, "product lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn client_for(server: &MockServer) -> OpenFoodFacts {
        OpenFoodFacts::new(&ProductApiConfig {
            base_url: format!("{}/api/v0/product/", server.uri()),
            timeout_secs: 2,
        })
        .unwrap()
    }

    #[test]
    fn barcode_validation() {
        assert!(is_valid_barcode("737628064502"));
        assert!(is_valid_barcode("123456"));
        assert!(!is_valid_barcode("12345"));
        assert!(!is_valid_barcode("12345abc"));
        assert!(!is_valid_barcode(""));
    }

    #[tokio::test]
    async fn maps_found_product() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v0/product/737628064502.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": 1,
                "product": {
                    "product_name": "Rice Noodles",
                    "brands": "Thai Kitchen",
                    "categories": "grain",
                    "nutriments": { "energy-kcal_100g": 385.0 },
                    "allergens_tags": ["en:peanuts", "soybeans"]
                }
            })))
            .mount(&server)
            .await;

        let product = client_for(&server).lookup("737628064502").await.expect("found");
        assert_eq!(product.name, "Rice Noodles");
        assert_eq!(product.brand, "Thai Kitchen");
        assert_eq!(product.category, "grain");
        assert_eq!(product.calories, Some(385.0));
        assert_eq!(product.allergens, vec!["peanuts", "soybeans"]);
    }

    #[tokio::test]
    async fn absent_fields_fall_back_to_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v0/product/123456.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": 1,
                "product": { "product_name": "" }
            })))
            .mount(&server)
            .await;

        let product = client_for(&server).lookup("123456").await.expect("found");
        assert_eq!(product, Product::unknown());
    }

    #[tokio::test]
    async fn status_zero_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": 0,
                "status_verbose": "product not found"
            })))
            .mount(&server)
            .await;

        assert!(client_for(&server).lookup("000000").await.is_none());
    }

    #[tokio::test]
    async fn server_errors_and_garbage_are_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v0/product/500500.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v0/product/200200.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.lookup("500500").await.is_none());
        assert!(client.lookup("200200").await.is_none());
    }

    #[tokio::test]
    async fn unreachable_host_is_not_found() {
        let client = OpenFoodFacts::new(&ProductApiConfig {
            base_url: "http://127.0.0.1:9/api/v0/product".into(),
            timeout_secs: 1,
        })
        .unwrap();
        assert!(client.lookup("123456").await.is_none());
    }
}
