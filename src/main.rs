//! NutriScan
//!
//! An MCP server exposing the nutrition scoring engine.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use nutriscan::build_info;
use nutriscan::config::EngineConfig;
use nutriscan::mcp::NutriScanService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutriscan=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Load configuration and report it on stderr
    let config = EngineConfig::from_env()?;
    eprintln!("{}", build_info::startup_banner(&config));

    let engine = config.build_engine()?;

    // Create the NutriScan service
    let service = NutriScanService::new(config, engine);

    eprintln!("Starting MCP server on stdio...");

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
