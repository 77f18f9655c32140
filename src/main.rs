use catalog_matcher::config::load_config;
use catalog_matcher::dataset::load_dataset;
use catalog_matcher::extractor::AttributeExtractor;
use catalog_matcher::llm::{ChatCompletionsClient, RequestOptions};
use catalog_matcher::pipeline;
use catalog_matcher::scorer::MatchScorer;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    let config_path = std::env::var("MATCHER_CONFIG").unwrap_or_else(|_| "config.json".into());
    let config = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let data = match load_dataset(&config.data_path) {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to load {}: {}", config.data_path, e);
            return;
        }
    };
    info!(
        "Loaded {} external products and {} catalog entries",
        data.external_products.len(),
        data.internal_catalog.len()
    );

    let client = match ChatCompletionsClient::new(&config.llm) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create LLM client: {}", e);
            return;
        }
    };
    if !client.has_api_key() {
        warn!("No API key (GROQ_API_KEY or llm.api_key); every product will use keyword fallback");
    }

    let options = RequestOptions {
        temperature: config.llm.temperature,
        max_tokens: config.llm.max_tokens,
    };
    let extractor = AttributeExtractor::new(client, options, config.vocabulary.clone());
    let scorer = MatchScorer::new(config.scoring.clone());

    let report = pipeline::run(
        &data.external_products,
        &data.internal_catalog,
        &extractor,
        &scorer,
    )
    .await;

    info!(
        "Done: {} products, {} matched, {} unmatched, {} fallback extractions",
        data.external_products.len(),
        report.mappings.len(),
        report.unmatched,
        report.fallbacks
    );

    match serde_json::to_string_pretty(&report.mappings) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize mappings: {}", e),
    }
}
