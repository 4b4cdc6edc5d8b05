use crate::catalog::{Inventory, InventoryDocument, Product};
use crate::config::{AppConfig, JwtConfig, ProductApiConfig};
use crate::lookup::{OpenFoodFacts, ProductLookup};
use crate::storage::{FileStore, JsonStore, MemoryStore};
use crate::users::{UserDirectory, UserDocument};
use axum::async_trait;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub inventory: Arc<Inventory>,
    pub users: Arc<UserDirectory>,
    pub lookup: Arc<dyn ProductLookup>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let catalog = Arc::new(FileStore::<InventoryDocument>::new(config.catalog_path.clone()))
            as Arc<dyn JsonStore<InventoryDocument>>;
        let users = Arc::new(FileStore::<UserDocument>::new(config.users_path.clone()))
            as Arc<dyn JsonStore<UserDocument>>;
        let lookup = Arc::new(OpenFoodFacts::new(&config.product_api)?) as Arc<dyn ProductLookup>;

        tracing::info!(
            catalog = %config.catalog_path.display(),
            users = %config.users_path.display(),
            "data files configured"
        );

        Ok(Self::from_parts(config, catalog, users, lookup))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        catalog: Arc<dyn JsonStore<InventoryDocument>>,
        users: Arc<dyn JsonStore<UserDocument>>,
        lookup: Arc<dyn ProductLookup>,
    ) -> Self {
        Self {
            config,
            inventory: Arc::new(Inventory::new(catalog)),
            users: Arc::new(UserDirectory::new(users)),
            lookup,
        }
    }

    /// In-memory state with empty data and a lookup that resolves nothing.
    pub fn fake() -> Self {
        #[derive(Clone)]
        struct FakeLookup;
        #[async_trait]
        impl ProductLookup for FakeLookup {
            async fn lookup(&self, _barcode: &str) -> Option<Product> {
                None
            }
        }

        Self::fake_with(
            InventoryDocument::default(),
            UserDocument::default(),
            Arc::new(FakeLookup),
        )
    }

    pub fn fake_with(
        catalog: InventoryDocument,
        users: UserDocument,
        lookup: Arc<dyn ProductLookup>,
    ) -> Self {
        let config = Arc::new(AppConfig {
            catalog_path: "memory://catalog".into(),
            users_path: "memory://users".into(),
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test".into(),
                audience: "test".into(),
                ttl_minutes: 5,
                refresh_ttl_minutes: 60,
            },
            product_api: ProductApiConfig::default(),
        });

        Self::from_parts(
            config,
            Arc::new(MemoryStore::new(catalog)),
            Arc::new(MemoryStore::new(users)),
            lookup,
        )
    }
}
