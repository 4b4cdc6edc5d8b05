//! Interactive barcode scanner. Reads one barcode per line from stdin and
//! records it in the catalog; `exit` quits.

use std::sync::Arc;

use carepantry::{
    catalog::{Inventory, InventoryDocument, Product},
    config::{data_paths, product_api_from_env},
    lookup::{is_valid_barcode, OpenFoodFacts, ProductLookup},
    storage::FileStore,
    telemetry,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init("carepantry=info");

    let (catalog_path, _) = data_paths();
    let inventory = Inventory::new(Arc::new(FileStore::<InventoryDocument>::new(catalog_path)));
    let lookup = OpenFoodFacts::new(&product_api_from_env())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"Scan a barcode (or type 'exit'): ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let barcode = line.trim();
        if barcode.eq_ignore_ascii_case("exit") {
            break;
        }
        if !is_valid_barcode(barcode) {
            warn!(barcode, "not a barcode, ignoring");
            continue;
        }

        let product = match lookup.lookup(barcode).await {
            Some(p) => p,
            None => {
                warn!(barcode, "product not found, saving as Unknown");
                Product::unknown()
            }
        };

        match inventory.add(barcode, product).await {
            Ok(item) => {
                let msg = format!("Saved #{}: {} ({})\n", item.id, item.product.name, item.product.brand);
                stdout.write_all(msg.as_bytes()).await?;
            }
            Err(e) => error!(error = %e, barcode, "saving scanned item failed"),
        }
    }
    Ok(())
}
