//! Product data sources
//!
//! Adapters from third-party product documents to [`ProductFacts`]. Fetching
//! the documents is left to the caller.
//!
//! [`ProductFacts`]: crate::models::ProductFacts

pub mod open_food_facts;
