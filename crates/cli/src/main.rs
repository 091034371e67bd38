//! catalog-cli: drives the trend & viability analysis engine over a batch
//! of products and prints a ranked report.
//!
//! The real scraper/browser-session/persistence collaborators are out of
//! scope for the engine (see analysis-core); this binary stands in for them
//! by reading a JSON fixture of already-materialized products + histories.
//!
//! Usage:
//!   cargo run -p catalog-cli -- --fixture products.json
//!   cargo run -p catalog-cli -- --fixture products.json --min-sales 80 --top 10
//!   cargo run -p catalog-cli -- --fixture products.json --country MX --debug

use analysis_core::{Config, Country, HistoryResponse, ProductRecord};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct FixtureEntry {
    product: ProductRecord,
    history: HistoryResponse,
}

struct CliArgs {
    fixture: String,
    min_sales: Option<u32>,
    max_products: Option<usize>,
    #[allow(dead_code)]
    max_pages: Option<u32>,
    country: Option<String>,
    top: usize,
    #[allow(dead_code)]
    visible: bool,
    debug: bool,
    #[allow(dead_code)]
    no_ai: bool,
    show_descartados: bool,
}

fn parse_args(args: &[String]) -> Option<CliArgs> {
    let flag_value = |name: &str| -> Option<String> {
        args.iter()
            .position(|a| a == name)
            .and_then(|i| args.get(i + 1))
            .cloned()
    };

    let fixture = flag_value("--fixture")?;

    Some(CliArgs {
        fixture,
        min_sales: flag_value("--min-sales").and_then(|v| v.parse().ok()),
        max_products: flag_value("--max-products").and_then(|v| v.parse().ok()),
        max_pages: flag_value("--max-pages").and_then(|v| v.parse().ok()),
        country: flag_value("--country"),
        top: flag_value("--top").and_then(|v| v.parse().ok()).unwrap_or(20),
        visible: args.iter().any(|a| a == "--visible"),
        debug: args.iter().any(|a| a == "--debug"),
        no_ai: args.iter().any(|a| a == "--no-ai"),
        show_descartados: args.iter().any(|a| a == "--show-descartados"),
    })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  catalog-cli --fixture FILE.json [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --min-sales N         override Config.min_sales_7d");
    eprintln!("  --max-products N      analyze at most N products from the fixture");
    eprintln!("  --max-pages N         accepted for collaborator parity, unused by the engine");
    eprintln!("  --country CODE        CO | MX | EC (default CO)");
    eprintln!("  --top N               print the top N ranked products (default 20)");
    eprintln!("  --visible             accepted for collaborator parity, unused by the engine");
    eprintln!("  --debug               verbose tracing output");
    eprintln!("  --no-ai               accepted for collaborator parity, unused by the engine");
    eprintln!("  --show-descartados    also print the discard-reason histogram");
}

fn country_override(code: &str) -> Country {
    match code {
        "MX" => Country { shipping_cost: 15_000, cpa: 22_000 },
        "EC" => Country { shipping_cost: 16_000, cpa: 20_000 },
        _ => Country::default(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let parsed = match parse_args(&args[1..]) {
        Some(p) => p,
        None => {
            print_usage();
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            if parsed.debug {
                "catalog_cli=debug,analysis_orchestrator=debug".into()
            } else {
                "catalog_cli=info,analysis_orchestrator=info".into()
            }
        }))
        .init();

    let mut config = Config::default();
    if let Some(country_code) = &parsed.country {
        config.country = country_override(country_code);
    }
    if let Some(min_sales) = parsed.min_sales {
        config.min_sales_7d = min_sales;
    }

    let raw = tokio::fs::read_to_string(&parsed.fixture).await.map_err(|e| {
        anyhow::anyhow!("failed to read fixture {}: {e}", parsed.fixture)
    })?;
    let mut entries: Vec<FixtureEntry> = serde_json::from_str(&raw)?;
    if let Some(max_products) = parsed.max_products {
        entries.truncate(max_products);
    }

    tracing::info!("loaded {} products from {}", entries.len(), parsed.fixture);

    let products: Vec<(ProductRecord, HistoryResponse)> =
        entries.into_iter().map(|e| (e.product, e.history)).collect();

    let analyzed = analysis_orchestrator::analyze_population_parallel(&products, &config);
    let (ranked, stats, _summary) = ranker::rank_and_summarize(&analyzed);

    println!(
        "Analyzed {} products: {} passed, {} discarded",
        stats.total, stats.passed, stats.discarded
    );

    if ranked.is_empty() {
        println!("No products passed the viability filter. Discard histogram:");
        let mut reasons: Vec<(&String, &usize)> = stats.discard_histogram.iter().collect();
        reasons.sort_by(|a, b| b.1.cmp(a.1));
        for (reason, count) in reasons {
            println!("  {reason}: {count}");
        }
        std::process::exit(0);
    }

    for (rank, product) in ranked.iter().take(parsed.top).enumerate() {
        println!(
            "{:>3}. {:<40} pattern={:<22} score={:>3} roi={:>6.1}% price={}",
            rank + 1,
            product.product.name,
            product.trend.pattern.label(),
            product.trend.score,
            product.margin.roi_pct,
            product.margin.optimal_price,
        );
    }

    if parsed.show_descartados {
        println!("\nDiscard histogram:");
        let mut reasons: Vec<(&String, &usize)> = stats.discard_histogram.iter().collect();
        reasons.sort_by(|a, b| b.1.cmp(a.1));
        for (reason, count) in reasons {
            println!("  {reason}: {count}");
        }
    }

    Ok(())
}
