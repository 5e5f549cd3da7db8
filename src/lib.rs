//! NutriScan Library
//!
//! Nutrition normalization and health scoring: unit normalization,
//! ingredient cleaning, category classification, sub-scores, the composed
//! 0-100 score and age-group portion advice.

pub mod build_info;
pub mod cache;
pub mod config;
pub mod error;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod scoring;
pub mod sources;
pub mod tools;

pub use error::{EngineResult, ScoreError};
pub use scoring::{AnalysisReport, ScoringEngine};
