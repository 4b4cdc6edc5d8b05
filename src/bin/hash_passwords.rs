//! Rewrites plain-text passwords in the users file as argon2 hashes.

use anyhow::Context;
use carepantry::{
    config::data_paths,
    storage::{FileStore, JsonStore},
    telemetry,
    users::{hash_plaintext_passwords, UserDocument},
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init("carepantry=info");

    let (_, users_path) = data_paths();
    let store = FileStore::<UserDocument>::new(users_path);
    let mut doc = store
        .load()
        .await
        .with_context(|| format!("load {}", store.path().display()))?;

    let hashed = hash_plaintext_passwords(&mut doc)?;
    if hashed > 0 {
        store.save(&doc).await?;
    }
    info!(hashed, path = %store.path().display(), "password migration finished");
    Ok(())
}
