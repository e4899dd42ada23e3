//! Example: adding a rule to the compatibility engine.
//! Run with: cargo run --example custom_rules [path/to/build.json]

use rigforge::build::BuildState;
use rigforge::{CartItem, Category, CompatibilityEngine, Rule};
use std::path::Path;
use std::sync::Arc;

/// Flags a build that has a graphics card but no power supply yet.
struct PsuRequiredRule;

impl Rule for PsuRequiredRule {
    fn id(&self) -> &str {
        "psu_required"
    }

    fn name(&self) -> &str {
        "PSU Required"
    }

    fn description(&self) -> &str {
        "A dedicated graphics card needs a power supply in the build"
    }

    fn check(&self, item: &CartItem, build: &BuildState<'_>) -> Option<String> {
        if item.category() == Category::Gpu && !build.has(Category::Psu) {
            Some("No power supply selected for this graphics card".to_string())
        } else {
            None
        }
    }
}

fn main() -> Result<(), rigforge::RigforgeError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/build_conflicts.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example custom_rules [path/to/build.json]");
        std::process::exit(1);
    }

    let cart = rigforge::load_build(path)?;
    let mut engine = CompatibilityEngine::with_default_rules();
    engine.add_rule(Arc::new(PsuRequiredRule));

    let diagnostics = engine.diagnose(&cart);
    println!("Found {} conflicts in {}", diagnostics.len(), path.display());
    for diagnostic in &diagnostics {
        println!("  [{}] {}: {}", diagnostic.rule_id, diagnostic.item_id, diagnostic.message);
    }

    if !diagnostics.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
