//! Utility to score a product file and print the report
//!
//! Accepts either product facts or a saved Open Food Facts response (an
//! object with `code` and `product`).

use std::path::PathBuf;

use serde_json::Value;
use tracing_subscriber::EnvFilter;

use nutriscan::config::EngineConfig;
use nutriscan::models::ProductFacts;
use nutriscan::sources::open_food_facts;
use nutriscan::ScoreError;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutriscan=warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let path = match std::env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => {
            eprintln!("Usage: score_file <product.json>");
            std::process::exit(2);
        }
    };

    let text = std::fs::read_to_string(&path)?;
    let value: Value = serde_json::from_str(&text)?;

    let facts = if value.get("product").is_some() {
        let code = value
            .get("code")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        open_food_facts::parse_response(&code, &value)?
    } else {
        serde_json::from_value::<ProductFacts>(value).map_err(ScoreError::InvalidProduct)?
    };

    let engine = EngineConfig::from_env()?.build_engine()?;
    let report = engine.analyze(&facts);

    eprintln!(
        "{}: {} ({})",
        report.name,
        report.score.overall,
        report.score.label.as_str()
    );
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
