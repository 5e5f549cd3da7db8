//! Scoring engine
//!
//! Ingredient cleaning, classification, the three sub-scorers, the composer
//! and the portion advisor, chained together by [`ScoringEngine`].

pub mod additives;
pub mod category;
pub mod composer;
pub mod engine;
pub mod ingredients;
pub mod keywords;
pub mod nutri;
pub mod portion;

pub use additives::{score_additives, score_processing, AdditivePenalties};
pub use category::classify;
pub use composer::{blend, caps_for, compose, ThirdScore, WeightProfile};
pub use engine::{AdditiveSource, AnalysisReport, ScoringEngine, ScoringPolicy};
pub use ingredients::{clean, clean_json};
pub use keywords::{KeywordConfig, Keywords};
pub use nutri::score_nutrition;
pub use portion::{advise_portions, DailyLimits, PortionScale};
