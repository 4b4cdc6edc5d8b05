use serde::{Deserialize, Serialize};

/// Persisted inventory: `{ "items": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryDocument {
    #[serde(default)]
    pub items: Vec<InventoryItem>,
}

/// One scanned item as stored in the inventory file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub barcode: String,
    pub product: Product,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub expiration_date: Option<String>,
    pub added_at: String, // ISO-8601
}

fn default_quantity() -> u32 {
    1
}

/// Product data as returned by the barcode lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(default = "unknown")]
    pub brand: String,
    #[serde(default = "unknown")]
    pub category: String,
    pub calories: Option<f64>, // kcal per 100g
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allergens: Vec<String>,
}

fn unknown() -> String {
    "Unknown".into()
}

impl Product {
    /// Placeholder recorded when a barcode cannot be resolved.
    pub fn unknown() -> Self {
        Self {
            name: unknown(),
            brand: unknown(),
            category: unknown(),
            calories: None,
            allergens: Vec::new(),
        }
    }
}

/// A food the meal generator can draw from.
///
/// `id` is the position among loadable foods (1, 2, 3… in document order) and
/// shifts when the catalog changes. `item_id` is the stored inventory id; it
/// is stable and is what meal logs reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodItem {
    pub id: i64,
    pub item_id: i64,
    pub name: String,
    pub calories: f64,
    pub category: String,
    pub allergens: Vec<String>,
}

impl FoodItem {
    pub fn new(id: i64, name: impl Into<String>, calories: f64, category: impl Into<String>) -> Self {
        Self {
            id,
            item_id: id,
            name: name.into(),
            calories,
            category: category.into(),
            allergens: Vec::new(),
        }
    }

    pub fn with_item_id(mut self, item_id: i64) -> Self {
        self.item_id = item_id;
        self
    }

    pub fn with_allergens<I, S>(mut self, allergens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allergens = allergens.into_iter().map(Into::into).collect();
        self
    }
}
