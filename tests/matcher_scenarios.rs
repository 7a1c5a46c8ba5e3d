use coach_synth::catalog::JsonFileLoader;
use coach_synth::checkout::{calculate_total, Cart, CheckoutLinks};
use coach_synth::config::{parse_config, CheckoutConfig};
use coach_synth::matcher::{MatcherRules, SharedMatcher};

const CATALOG: &str = r#"[
    {"name": "Beyond Tangy Tangerine 2.0", "sku": "USYG100076", "price": 45.00},
    {"name": "Lavender Essential Oil", "sku": "EO100", "price": 20.00}
]"#;

async fn shared_matcher(catalog_json: &str, config_json: &str) -> (SharedMatcher, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.json");
    std::fs::write(&path, catalog_json).unwrap();

    let config = parse_config(config_json).unwrap();
    let rules = MatcherRules::from_config(&config.matcher).unwrap();
    let matcher = SharedMatcher::new(rules, config.matcher);
    matcher
        .initialize(&JsonFileLoader::new(&path))
        .await
        .unwrap();
    (matcher, dir)
}

#[tokio::test]
async fn detects_named_product_and_skips_essential_oil() {
    let (matcher, _dir) = shared_matcher(CATALOG, "{}").await;

    let found = matcher.find_products_in_text(
        "I recommend Beyond Tangy Tangerine 2.0 and some Lavender Essential Oil.",
    );

    let skus: Vec<&str> = found.iter().map(|p| p.sku.as_str()).collect();
    assert_eq!(skus, vec!["USYG100076"]);
}

#[tokio::test]
async fn detected_product_feeds_checkout_total() {
    let (matcher, _dir) = shared_matcher(CATALOG, "{}").await;

    let mut cart = Cart::from_detected(matcher.find_products_in_text("BTT every morning"));
    assert_eq!(cart.set_quantity("USYG100076", 2), Some(2));
    assert_eq!(calculate_total(cart.items()), 90.00);

    let url = CheckoutLinks::new(&CheckoutConfig::default())
        .unwrap()
        .generate("123456", cart.items())
        .unwrap();
    assert!(url.contains("item-1=USYG100076%7C2"));
}

#[tokio::test]
async fn keyword_table_file_replaces_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let keywords = dir.path().join("keywords.json");
    std::fs::write(
        &keywords,
        r#"[{"phrase": "orange drink", "prefixes": ["USYG100076"]}]"#,
    )
    .unwrap();
    let config = format!(
        r#"{{"matcher": {{"keywords_path": {}}}}}"#,
        serde_json::to_string(&keywords).unwrap()
    );

    let (matcher, _catalog_dir) = shared_matcher(CATALOG, &config).await;

    assert_eq!(matcher.find_products_in_text("an orange drink").len(), 1);
    // "btt" belongs to the built-in table only.
    assert!(matcher.find_products_in_text("btt").is_empty());
}

#[tokio::test]
async fn custom_exclusions_apply_to_every_stage() {
    let (matcher, _dir) =
        shared_matcher(CATALOG, r#"{"matcher": {"exclusion_patterns": ["tangerine"]}}"#).await;

    assert!(matcher
        .find_products_in_text("USYG100076 Beyond Tangy Tangerine 2.0")
        .is_empty());
    let found = matcher.find_products_in_text("Lavender Essential Oil EO100");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].sku, "EO100");
}

#[tokio::test]
async fn manual_search_and_lookup_see_whole_catalog() {
    let (matcher, _dir) = shared_matcher(CATALOG, "{}").await;

    assert!(matcher.search_products("l").is_empty());
    let results = matcher.search_products("lavendr");
    assert_eq!(results.first().map(|p| p.sku.as_str()), Some("EO100"));

    assert_eq!(matcher.get_product_by_sku("EO100").unwrap().price, 20.00);
    assert!(matcher.get_product_by_sku("EO999").is_none());
}
