use coach_synth::catalog::loader_from_config;
use coach_synth::checkout::{Cart, CheckoutLinks};
use coach_synth::config::{load_config, AppConfig};
use coach_synth::matcher::{MatcherRules, SharedMatcher};
use coach_synth::synthesizer::{detection_text, synthesize_or_fallback, LlmClient, Synthesizer};
use coach_synth::utils::report_filename;
use futures::future::join_all;
use std::env;
use std::error::Error;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage:
  coach-synth report <source-file>...   synthesize a report and build the checkout link
  coach-synth scan <text-file>          list products mentioned in a file
  coach-synth search <query>            search the catalog by name
  coach-synth sku <sku>                 look up one product";

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{}", USAGE);
        return;
    };

    // Load configuration from file
    let config_path = env::var("COACH_SYNTH_CONFIG").unwrap_or_else(|_| "config.json".into());
    let config = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error ({}): {}", config_path, e);
            return;
        }
    };

    let rules = match MatcherRules::from_config(&config.matcher) {
        Ok(r) => r,
        Err(e) => {
            error!("Matcher rules error: {}", e);
            return;
        }
    };
    info!(
        "Matcher rules: {} keyword phrases, {} exclusion patterns",
        rules.keywords.len(),
        rules.exclusions.len()
    );

    let matcher = SharedMatcher::new(rules, config.matcher.clone());
    let loader = match loader_from_config(&config.catalog) {
        Ok(l) => l,
        Err(e) => {
            error!("Catalog loader error: {}", e);
            return;
        }
    };
    if let Err(e) = matcher.initialize(loader.as_ref()).await {
        error!("Failed to load catalog: {}", e);
        return;
    }

    let result = match command.as_str() {
        "report" => run_report(&config, &matcher, rest).await,
        "scan" => run_scan(&matcher, rest).await,
        "search" => {
            run_search(&matcher, &rest.join(" "));
            Ok(())
        }
        "sku" => {
            run_lookup(&matcher, rest);
            Ok(())
        }
        _ => {
            eprintln!("{}", USAGE);
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{} failed: {}", command, e);
    }
}

/// Synthesizes the report, detects products, prints the cart and writes the report file.
async fn run_report(
    config: &AppConfig,
    matcher: &SharedMatcher,
    paths: &[String],
) -> Result<(), Box<dyn Error>> {
    let mut session = config.session.clone();
    session.sources = read_sources(paths).await?;
    session.validate()?;

    let request = session.synthesis_request();
    let client = match LlmClient::from_config(&config.llm) {
        Ok(c) => Some(c),
        Err(e) => {
            warn!("LLM client unavailable: {}", e);
            None
        }
    };
    let report = synthesize_or_fallback(client.as_ref().map(|c| c as &dyn Synthesizer), &request).await;
    if let Some(e) = &report.error {
        println!("Synthesis failed, using fallback report: {}", e);
    }

    let text = detection_text(&request, &report.article);
    let cart = Cart::from_detected(matcher.find_products_in_text(&text));
    info!("Detected {} products", cart.items().len());

    println!("Products:");
    for item in cart.selected() {
        println!(
            "  [{}] {} x{} @ {:.2}",
            item.product.sku, item.product.name, item.quantity, item.product.price
        );
    }
    println!("Total: {:.2}", cart.total());

    let links = CheckoutLinks::new(&config.checkout)?;
    match links.generate(&session.distributor_id, cart.items()) {
        Some(url) => println!("Checkout: {}", url),
        None => println!("Checkout: no products selected"),
    }

    let dir = config.output_dir.clone().unwrap_or_else(|| PathBuf::from("reports"));
    tokio::fs::create_dir_all(&dir).await?;
    let path = dir.join(report_filename(
        &session.client_name,
        chrono::Local::now().date_naive(),
    ));
    tokio::fs::write(&path, &report.article).await?;
    println!("Report: {}", path.display());
    Ok(())
}

async fn run_scan(matcher: &SharedMatcher, paths: &[String]) -> Result<(), Box<dyn Error>> {
    let text = read_sources(paths).await?.join(" ");
    let products = matcher.find_products_in_text(&text);
    if products.is_empty() {
        println!("No products detected.");
    }
    for p in products {
        println!("[{}] {} {:.2}", p.sku, p.name, p.price);
    }
    Ok(())
}

fn run_search(matcher: &SharedMatcher, query: &str) {
    for p in matcher.search_products(query) {
        println!("[{}] {} {:.2}", p.sku, p.name, p.price);
    }
}

fn run_lookup(matcher: &SharedMatcher, args: &[String]) {
    let sku = args.first().map(String::as_str).unwrap_or_default();
    match matcher.get_product_by_sku(sku) {
        Some(p) => println!("[{}] {} {:.2}", p.sku, p.name, p.price),
        None => println!("No product with sku '{}'", sku),
    }
}

/// Reads all files concurrently, keeping argument order.
async fn read_sources(paths: &[String]) -> Result<Vec<String>, std::io::Error> {
    join_all(paths.iter().map(tokio::fs::read_to_string))
        .await
        .into_iter()
        .collect()
}
