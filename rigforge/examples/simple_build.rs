//! Example: build a cart from a catalog file and print its summary.
//! Run with: cargo run --example simple_build [path/to/catalog.json] [id...]

use anyhow::Context;
use rigforge::persistence::MemoryStore;
use rigforge::prelude::*;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/catalog.json"));
    let mut ids: Vec<String> = args.collect();
    if ids.is_empty() {
        ids = ["cpu-r7-7800x3d", "mb-b650-tomahawk", "ram-ddr5-32", "gpu-4060", "case-full"]
            .iter()
            .map(|s| s.to_string())
            .collect();
    }

    let catalog = rigforge::load_catalog(&path)
        .with_context(|| format!("failed to load catalog {}", path.display()))?;
    let store = rigforge::catalog::InMemoryCatalog::with_products(catalog);

    let mut session = Configurator::new(MemoryStore::new(), EngineConfig::default());
    for id in &ids {
        session.add_by_id(&store, id, 1)?;
    }

    let summary = session.summary();
    println!("Build ({} parts)", session.cart().len());
    for group in &summary.groups {
        println!("  {}: {}", group.category.label(), group.item_ids.join(", "));
    }
    for diagnostic in &summary.diagnostics {
        println!("  ! {}: {}", diagnostic.item_id, diagnostic.message);
    }
    println!("Estimated draw: {} W", summary.total_draw_w);
    println!("Recommended PSU: {} W", summary.recommended_psu_w);
    println!();
    print!("{}", session.share_text());
    Ok(())
}
