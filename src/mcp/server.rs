//! NutriScan MCP Server Implementation
//!
//! Implements the MCP server with all NutriScan tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::cache::{InMemoryResultCache, ResultCache};
use crate::config::EngineConfig;
use crate::error::ScoreError;
use crate::scoring::ScoringEngine;
use crate::tools::analyze;
use crate::tools::status::StatusTracker;

/// NutriScan MCP Service
#[derive(Clone)]
pub struct NutriScanService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    engine: Arc<ScoringEngine>,
    cache: Arc<dyn ResultCache>,
    tool_router: ToolRouter<NutriScanService>,
}

impl NutriScanService {
    pub fn new(config: EngineConfig, engine: ScoringEngine) -> Self {
        let cache = Arc::new(InMemoryResultCache::new(config.cache_ttl, config.cache_max_entries));
        Self::with_cache(config, engine, cache)
    }

    /// Use a caller-supplied result cache
    pub fn with_cache(config: EngineConfig, engine: ScoringEngine, cache: Arc<dyn ResultCache>) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(config))),
            engine: Arc::new(engine),
            cache,
            tool_router: Self::tool_router(),
        }
    }
}

/// Map engine errors onto MCP errors
fn to_mcp_error(err: ScoreError) -> McpError {
    match err {
        ScoreError::Config(e) => McpError::internal_error(e.to_string(), None),
        other => McpError::invalid_params(other.to_string(), None),
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeProductParams {
    /// Product facts: name, category, basis, serving_size, nutrients, additives,
    /// nova_group, ingredients, ingredients_text, organic
    pub product: serde_json::Value,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ScoreOpenFoodFactsParams {
    /// Product barcode, 8 to 14 digits
    pub barcode: String,
    /// Full JSON response of the Open Food Facts v2 product endpoint
    pub response: serde_json::Value,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CleanIngredientsParams {
    /// Array of ingredient names or {name, description, is_harmful} objects
    pub ingredients: serde_json::Value,
    /// Raw label text the ingredients were read from
    pub source_text: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PortionAnalysisParams {
    #[serde(default)]
    pub sugar_g: f64,
    #[serde(default)]
    pub sodium_mg: f64,
    #[serde(default)]
    pub saturated_fat_g: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ClassifyProductParams {
    pub name: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NormalizeNutrientsParams {
    /// Nutrient bundle, e.g. {"energy_kcal": 120, "sugars_g": "4.5 g", "salt_g": 0.3}
    pub nutrients: serde_json::Value,
    /// per100g, per100ml or per_serving (default per100g)
    pub basis: Option<String>,
    /// Serving size in g or ml, required for per_serving
    pub serving_size: Option<f64>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl NutriScanService {
    // --- Status ---

    #[tool(description = "Get the current status of the NutriScan service including build info, scoring configuration, cache size, and process information")]
    async fn nutriscan_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(self.cache.len());
        json_result(&status)
    }

    #[tool(description = "Get instructions for scoring products. Call this before the first scoring request or when unsure how to shape product facts.")]
    fn scoring_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::SCORING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(SCORING_INSTRUCTIONS)]))
    }

    // --- Scoring ---

    #[tool(description = "Score a product from label facts. Returns the 0-100 score, label, sub-scores, applied caps, cleaned ingredients and portion advice per age group.")]
    fn analyze_product(&self, Parameters(p): Parameters<AnalyzeProductParams>) -> Result<CallToolResult, McpError> {
        let report = analyze::analyze_product(&self.engine, p.product).map_err(to_mcp_error)?;
        json_result(&report)
    }

    #[tool(description = "Score a product from an Open Food Facts API response you already fetched. Results are cached by barcode.")]
    fn score_open_food_facts_product(&self, Parameters(p): Parameters<ScoreOpenFoodFactsParams>) -> Result<CallToolResult, McpError> {
        let scored = analyze::score_food_database_product(&self.engine, self.cache.as_ref(), &p.barcode, &p.response)
            .map_err(to_mcp_error)?;
        json_result(&scored)
    }

    // --- Building Blocks ---

    #[tool(description = "Normalize, deduplicate and filter an ingredient list. Reports dropped tokens with a reason and flags harmful additives.")]
    fn clean_ingredients(&self, Parameters(p): Parameters<CleanIngredientsParams>) -> Result<CallToolResult, McpError> {
        let cleaned = analyze::clean_ingredients(&self.engine, &p.ingredients, p.source_text.as_deref())
            .map_err(to_mcp_error)?;
        json_result(&cleaned)
    }

    #[tool(description = "Compare absolute sugar (g), sodium (mg) and saturated fat (g) amounts with daily limits for Children 4-8, Adults 19-50 and Seniors 51+")]
    fn portion_analysis(&self, Parameters(p): Parameters<PortionAnalysisParams>) -> Result<CallToolResult, McpError> {
        let analysis = analyze::portion_analysis(&self.engine, p.sugar_g, p.sodium_mg, p.saturated_fat_g);
        json_result(&analysis)
    }

    #[tool(description = "Classify a product as foods, beverages or beverages-water from its name and category")]
    fn classify_product(&self, Parameters(p): Parameters<ClassifyProductParams>) -> Result<CallToolResult, McpError> {
        let classification = analyze::classify_product(
            &self.engine,
            &p.name,
            p.category.as_deref(),
            p.subcategory.as_deref(),
        );
        json_result(&classification)
    }

    #[tool(description = "Convert a nutrient bundle to canonical per-100g/ml values (energy in kJ, sodium in mg)")]
    fn normalize_nutrients(&self, Parameters(p): Parameters<NormalizeNutrientsParams>) -> Result<CallToolResult, McpError> {
        let normalized = analyze::normalize_nutrients(&self.engine, &p.nutrients, p.basis.as_deref(), p.serving_size)
            .map_err(to_mcp_error)?;
        json_result(&normalized)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutriScanService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutriscan".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("NutriScan".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "NutriScan - nutrition normalization and health scoring. \
                 IMPORTANT: Call scoring_instructions before the first scoring request. \
                 Scoring: analyze_product (label facts), score_open_food_facts_product (barcode + fetched response). \
                 Building blocks: clean_ingredients, classify_product, normalize_nutrients, portion_analysis. \
                 Status: nutriscan_status."
                    .into(),
            ),
        }
    }
}
