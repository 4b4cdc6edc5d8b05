use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::repo_types::{FoodItem, InventoryDocument, InventoryItem, Product};
use crate::{
    clock::now_rfc3339,
    error::LoadError,
    storage::{load_or_default, JsonStore},
};

/// Load the catalog as foods, ids 1, 2, 3… in document order.
pub async fn load_foods(
    store: &dyn JsonStore<InventoryDocument>,
) -> Result<Vec<FoodItem>, LoadError> {
    let doc = store.load().await?;
    Ok(foods_from_inventory(&doc))
}

/// Items without a calorie value cannot take part in a meal and get no id.
pub fn foods_from_inventory(doc: &InventoryDocument) -> Vec<FoodItem> {
    let mut foods = Vec::with_capacity(doc.items.len());
    for item in &doc.items {
        let Some(calories) = item.product.calories else {
            warn!(item_id = item.id, barcode = %item.barcode, "skipping item without calorie data");
            continue;
        };
        let id = foods.len() as i64 + 1;
        foods.push(
            FoodItem::new(id, item.product.name.clone(), calories, item.product.category.clone())
                .with_item_id(item.id)
                .with_allergens(item.product.allergens.iter().cloned()),
        );
    }
    foods
}

pub fn next_item_id(items: &[InventoryItem]) -> i64 {
    items.iter().map(|i| i.id).max().unwrap_or(0) + 1
}

/// Append a freshly scanned product. Returns the document and the new id.
pub fn add_item(
    mut doc: InventoryDocument,
    barcode: &str,
    product: Product,
    added_at: String,
) -> (InventoryDocument, i64) {
    let id = next_item_id(&doc.items);
    doc.items.push(InventoryItem {
        id,
        barcode: barcode.to_string(),
        product,
        quantity: 1,
        expiration_date: None,
        added_at,
    });
    (doc, id)
}

/// Drop the item with `id`; unknown ids leave the document untouched.
pub fn remove_item(mut doc: InventoryDocument, id: i64) -> InventoryDocument {
    doc.items.retain(|item| item.id != id);
    doc
}

/// Inventory backed by a store. Writers in this process are serialized;
/// anything else editing the same file can still race with us.
pub struct Inventory {
    store: Arc<dyn JsonStore<InventoryDocument>>,
    write_lock: Mutex<()>,
}

impl Inventory {
    pub fn new(store: Arc<dyn JsonStore<InventoryDocument>>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn items(&self) -> Result<Vec<InventoryItem>, LoadError> {
        Ok(load_or_default(self.store.as_ref()).await?.items)
    }

    pub async fn foods(&self) -> Result<Vec<FoodItem>, LoadError> {
        load_foods(self.store.as_ref()).await
    }

    #[instrument(skip(self, product), fields(product = %product.name))]
    pub async fn add(&self, barcode: &str, product: Product) -> anyhow::Result<InventoryItem> {
        let _guard = self.write_lock.lock().await;
        let doc = load_or_default(self.store.as_ref()).await?;
        let (doc, id) = add_item(doc, barcode, product, now_rfc3339());
        self.store.save(&doc).await?;
        let item = doc
            .items
            .into_iter()
            .find(|i| i.id == id)
            .ok_or_else(|| anyhow::anyhow!("item {id} vanished after insert"))?;
        info!(item_id = id, "item added to inventory");
        Ok(item)
    }

    /// Returns whether an item was removed.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: i64) -> anyhow::Result<bool> {
        let _guard = self.write_lock.lock().await;
        let doc = load_or_default(self.store.as_ref()).await?;
        let before = doc.items.len();
        let doc = remove_item(doc, id);
        let removed = doc.items.len() != before;
        self.store.save(&doc).await?;
        if removed {
            info!(item_id = id, "item removed from inventory");
        }
        Ok(removed)
    }
}
