//! Category classifier
//!
//! Decides which threshold table a product is scored against.

use tracing::debug;

use super::keywords::Keywords;
use crate::models::{ClassificationConfidence, ProductClassification, ProductKind};

/// Classify a product from its free-text name and category fields
pub fn classify(
    keywords: &Keywords,
    name: &str,
    category: &str,
    subcategory: &str,
) -> ProductClassification {
    let haystack = format!("{} {} {}", name, category, subcategory).to_lowercase();

    let is_dairy_like = keywords.is_dairy(&haystack);
    let is_cheese = keywords.is_cheese(&haystack);

    let (kind, confidence) = if keywords.is_water(&haystack) {
        (ProductKind::BeveragesWater, ClassificationConfidence::Keyword)
    } else if keywords.is_beverage(&haystack) {
        if is_dairy_like {
            (ProductKind::Foods, ClassificationConfidence::Keyword)
        } else {
            (ProductKind::Beverages, ClassificationConfidence::Keyword)
        }
    } else if is_dairy_like || is_cheese {
        (ProductKind::Foods, ClassificationConfidence::Keyword)
    } else {
        (ProductKind::Foods, ClassificationConfidence::Default)
    };

    debug!(
        "Classified '{}' as {} ({:?})",
        name.trim(),
        kind.as_str(),
        confidence
    );

    ProductClassification {
        kind,
        is_dairy_like,
        is_cheese,
        confidence,
    }
}
