//! Rigforge CLI - PC build compatibility checks and catalog search from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rigforge::catalog::{import_records, CatalogStore, JsonFileCatalog};
use rigforge::export::render_share_text;
use rigforge::search::{parse_filter_args, ActiveFilters};
use rigforge::{
    filter_products, smart_options, sort_products, summarize, BuildSummary, CategoryFilter,
    CompatibilityEngine, EngineConfig, Product, SortOrder,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rigforge")]
#[command(about = "PC build compatibility checker and component catalog search", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a product catalog
    Search {
        /// Catalog JSON file (array of products)
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,

        /// Free-text query; `|` separates alternatives, spaces require all terms
        #[arg(short, long, default_value = "")]
        query: String,

        /// Category name or label, or "all"
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter,

        /// Spec filter as key=value (repeatable, comma-separated values)
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,

        /// Sort order: price-asc, price-desc or name
        #[arg(long)]
        sort: Option<SortOrder>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// List the selectable values of one spec key
    Facets {
        /// Catalog JSON file (array of products)
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,

        /// Spec key to list values for
        #[arg(short, long)]
        key: String,

        #[arg(short, long, default_value = "")]
        query: String,

        #[arg(short, long, default_value = "all")]
        category: CategoryFilter,

        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,

        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Check a saved build for conflicts and compute its power budget
    Check {
        /// Saved build JSON file
        #[arg(long, value_name = "FILE")]
        build: PathBuf,

        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if any conflict is found
        #[arg(long)]
        fail_on_conflict: bool,

        /// Engine config JSON file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Print a shareable text summary of a saved build
    Export {
        #[arg(long, value_name = "FILE")]
        build: PathBuf,
    },

    /// Validate loose product records and write the valid ones to a catalog
    Import {
        /// JSON array of product records
        #[arg(long, value_name = "FILE")]
        input: PathBuf,

        /// Catalog file to merge into (printed to stdout when omitted)
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List compatibility rules in evaluation order
    Rules {
        /// Show rule descriptions
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripting
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Search {
            catalog,
            query,
            category,
            filters,
            sort,
            format,
        } => handle_search(&catalog, &query, category, &filters, sort, format),
        Commands::Facets {
            catalog,
            key,
            query,
            category,
            filters,
            format,
        } => handle_facets(&catalog, &key, &query, category, &filters, format),
        Commands::Check {
            build,
            format,
            fail_on_conflict,
            config,
        } => handle_check(&build, format, fail_on_conflict, config.as_deref()),
        Commands::Export { build } => handle_export(&build),
        Commands::Import { input, output } => handle_import(&input, output.as_deref()),
        Commands::Rules { verbose } => {
            handle_rules(verbose);
            Ok(0)
        }
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };
    process::exit(exit_code);
}

fn load_catalog(path: &Path) -> Result<Vec<Product>> {
    rigforge::load_catalog(path).with_context(|| format!("failed to load catalog {}", path.display()))
}

fn parse_filters(raw: &[String]) -> Result<ActiveFilters> {
    parse_filter_args(raw).map_err(anyhow::Error::msg)
}

fn handle_search(
    catalog: &Path,
    query: &str,
    category: CategoryFilter,
    filters: &[String],
    sort: Option<SortOrder>,
    format: OutputFormat,
) -> Result<i32> {
    let products = load_catalog(catalog)?;
    let filters = parse_filters(filters)?;

    let mut matches = filter_products(&products, query, category, &filters);
    if let Some(order) = sort {
        sort_products(&mut matches, order);
    }

    match format {
        OutputFormat::Human => {
            if matches.is_empty() {
                println!("No products found");
            }
            for product in &matches {
                println!(
                    "{:<20} {:<16} {:>8}  {}",
                    product.id,
                    product.category.label(),
                    product.price,
                    product.name
                );
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&matches)?),
    }
    Ok(0)
}

fn handle_facets(
    catalog: &Path,
    key: &str,
    query: &str,
    category: CategoryFilter,
    filters: &[String],
    format: OutputFormat,
) -> Result<i32> {
    let products = load_catalog(catalog)?;
    let filters = parse_filters(filters)?;

    let options = smart_options(&products, category, key, query, &filters);
    match format {
        OutputFormat::Human => {
            for option in &options {
                println!("{}", option);
            }
        }
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "key": key, "options": options }))?
        ),
    }
    Ok(0)
}

fn handle_check(build: &Path, format: OutputFormat, fail_on_conflict: bool, config: Option<&Path>) -> Result<i32> {
    let config = match config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let cart = rigforge::load_build(build).with_context(|| format!("failed to load build {}", build.display()))?;
    let summary = summarize(&cart, &CompatibilityEngine::with_default_rules(), &config.power);

    match format {
        OutputFormat::Human => output_human(build, &summary),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    if fail_on_conflict && summary.has_conflicts() {
        return Ok(1);
    }
    Ok(0)
}

fn output_human(build: &Path, summary: &BuildSummary) {
    println!("\nBuild: {}", build.display());
    println!("{}", "─".repeat(60));

    for group in &summary.groups {
        println!("  {:<16} {}", group.category.label(), group.item_ids.join(", "));
    }

    if summary.has_conflicts() {
        println!("\n  CONFLICTS:");
        for diagnostic in &summary.diagnostics {
            println!("    - {}", diagnostic.message);
            println!("      Part: {} ({})", diagnostic.item_id, diagnostic.rule_id);
        }
    } else {
        println!("\n  No conflicts found");
    }

    println!("\n  Summary:");
    println!("    Estimated draw:  {} W", summary.total_draw_w);
    println!("    Recommended PSU: {} W", summary.recommended_psu_w);
    println!("    Total price:     {}", summary.total_price);
}

fn handle_export(build: &Path) -> Result<i32> {
    let cart = rigforge::load_build(build).with_context(|| format!("failed to load build {}", build.display()))?;
    print!("{}", render_share_text(&cart));
    Ok(0)
}

fn handle_import(input: &Path, output: Option<&Path>) -> Result<i32> {
    let content =
        std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;
    let records: serde_json::Value =
        serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", input.display()))?;

    let report = import_records(&records);
    for error in &report.errors {
        eprintln!(
            "Record {} ({}): {}",
            error.index,
            error.id.as_deref().unwrap_or("no id"),
            error.reason
        );
    }

    let imported = report.products.len();
    match output {
        Some(path) => {
            let mut catalog = JsonFileCatalog::open(path)
                .with_context(|| format!("failed to open catalog {}", path.display()))?;
            catalog
                .bulk_upsert(report.products)
                .with_context(|| format!("failed to write catalog {}", path.display()))?;
            println!(
                "Imported {} products into {} ({} rejected)",
                imported,
                path.display(),
                report.errors.len()
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&report.products)?),
    }

    Ok(if report.errors.is_empty() { 0 } else { 1 })
}

fn handle_rules(verbose: bool) {
    println!("Compatibility rules (evaluation order):\n");

    let engine = CompatibilityEngine::with_default_rules();
    for rule in engine.rules() {
        println!("  {:<24} {}", rule.id(), rule.name());
        if verbose {
            println!("    {}", rule.description());
        }
    }
}
