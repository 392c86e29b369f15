//! Structured insight types returned by the search assistant
//!
//! These are the value types the generative backend is instructed to emit and
//! that the synthesis engine produces when no live backend is usable. Field
//! names serialize in camelCase so a parsed model response and a synthesized
//! one are indistinguishable on the wire.

use serde::{Deserialize, Serialize};

/// A ranked category guess for a query or product set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
    pub category: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
}

impl ProductCategory {
    pub fn new(category: &str, subcategory: &str, confidence: f64) -> Self {
        Self {
            category: category.to_string(),
            confidence,
            subcategory: Some(subcategory.to_string()),
        }
    }
}

/// Direction of recent prices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketTrend {
    Increasing,
    Decreasing,
    Stable,
}

impl MarketTrend {
    pub const ALL: [MarketTrend; 3] = [
        MarketTrend::Increasing,
        MarketTrend::Decreasing,
        MarketTrend::Stable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        }
    }
}

/// Price and timing outlook for a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysis {
    /// Formatted as `"₹<lower> - ₹<upper>"`
    pub price_range: String,
    pub market_trend: MarketTrend,
    pub best_time_to_buy: String,
    pub price_prediction: String,
    pub market_insights: Vec<String>,
}

impl MarketAnalysis {
    /// Split the price range into its lower and upper bound substrings
    ///
    /// Returns the whole string twice when the separator is missing, so callers
    /// always get something printable.
    pub fn price_bounds(&self) -> (&str, &str) {
        match self.price_range.split_once(PRICE_RANGE_SEPARATOR) {
            Some((lower, upper)) => (lower.trim(), upper.trim()),
            None => (self.price_range.as_str(), self.price_range.as_str()),
        }
    }
}

/// Separator between the bounds of a formatted price range
pub const PRICE_RANGE_SEPARATOR: &str = " - ";

/// A suggested product with an estimated price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecommendation {
    pub product_name: String,
    pub reason: String,
    pub category: String,
    pub estimated_price: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
}

/// Aggregate returned by the query enhancement operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartSearchResult {
    pub enhanced_query: String,
    pub categories: Vec<ProductCategory>,
    pub market_analysis: MarketAnalysis,
    pub recommendations: Vec<ProductRecommendation>,
    pub search_tips: Vec<String>,
}

/// Lightweight product descriptor supplied by callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub title: String,
    #[serde(default)]
    pub price: String,
}

/// One prior message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

/// Shape checks applied to values recovered from model output
///
/// Anything a downstream consumer would have to distrust is rejected here so
/// the caller can substitute a synthesized result instead.
pub trait ValidateShape {
    fn validate_shape(&self) -> Result<(), String>;
}

fn check_confidence(what: &str, confidence: f64) -> Result<(), String> {
    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
        return Err(format!(
            "{} confidence must be within [0, 1], got {}",
            what, confidence
        ));
    }
    Ok(())
}

impl ValidateShape for ProductCategory {
    fn validate_shape(&self) -> Result<(), String> {
        if self.category.trim().is_empty() {
            return Err("category name is empty".to_string());
        }
        check_confidence("category", self.confidence)
    }
}

impl ValidateShape for ProductRecommendation {
    fn validate_shape(&self) -> Result<(), String> {
        if self.product_name.trim().is_empty() {
            return Err("recommendation product name is empty".to_string());
        }
        check_confidence("recommendation", self.confidence)
    }
}

impl ValidateShape for MarketAnalysis {
    fn validate_shape(&self) -> Result<(), String> {
        if self.price_range.trim().is_empty() {
            return Err("price range is empty".to_string());
        }
        Ok(())
    }
}

impl<T: ValidateShape> ValidateShape for Vec<T> {
    fn validate_shape(&self) -> Result<(), String> {
        if self.is_empty() {
            return Err("expected at least one entry".to_string());
        }
        self.iter().try_for_each(ValidateShape::validate_shape)
    }
}

impl ValidateShape for SmartSearchResult {
    fn validate_shape(&self) -> Result<(), String> {
        if self.enhanced_query.trim().is_empty() {
            return Err("enhanced query is empty".to_string());
        }
        self.categories.validate_shape()?;
        self.market_analysis.validate_shape()?;
        self.recommendations
            .iter()
            .try_for_each(ValidateShape::validate_shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_analysis() -> MarketAnalysis {
        MarketAnalysis {
            price_range: "₹10,000 - ₹50,000".to_string(),
            market_trend: MarketTrend::Stable,
            best_time_to_buy: "Now".to_string(),
            price_prediction: "Flat".to_string(),
            market_insights: vec!["Plenty of stock".to_string()],
        }
    }

    #[test]
    fn test_market_trend_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&MarketTrend::Decreasing).unwrap(),
            r#""decreasing""#
        );
        assert_eq!(
            serde_json::from_str::<MarketTrend>(r#""increasing""#).unwrap(),
            MarketTrend::Increasing
        );
        assert!(serde_json::from_str::<MarketTrend>(r#""sideways""#).is_err());
    }

    #[test]
    fn test_market_analysis_uses_camel_case_fields() {
        let value = serde_json::to_value(sample_analysis()).unwrap();
        assert!(value.get("priceRange").is_some());
        assert!(value.get("marketTrend").is_some());
        assert!(value.get("bestTimeToBuy").is_some());
        assert!(value.get("pricePrediction").is_some());
        assert!(value.get("marketInsights").is_some());
    }

    #[test]
    fn test_price_bounds_split_on_separator() {
        let analysis = sample_analysis();
        assert_eq!(analysis.price_bounds(), ("₹10,000", "₹50,000"));
    }

    #[test]
    fn test_price_bounds_without_separator_repeats_whole_string() {
        let mut analysis = sample_analysis();
        analysis.price_range = "₹999".to_string();
        assert_eq!(analysis.price_bounds(), ("₹999", "₹999"));
    }

    #[test]
    fn test_category_subcategory_is_optional() {
        let parsed: ProductCategory =
            serde_json::from_str(r#"{"category": "Books", "confidence": 0.9}"#).unwrap();
        assert_eq!(parsed.subcategory, None);
        assert!(parsed.validate_shape().is_ok());
    }

    #[test]
    fn test_confidence_out_of_range_is_rejected() {
        let category = ProductCategory::new("Electronics", "Laptops", 1.4);
        let err = category.validate_shape().unwrap_err();
        assert!(err.contains("within [0, 1]"), "unexpected: {}", err);

        let nan = ProductCategory::new("Electronics", "Laptops", f64::NAN);
        assert!(nan.validate_shape().is_err());
    }

    #[test]
    fn test_empty_category_list_is_rejected() {
        let empty: Vec<ProductCategory> = Vec::new();
        assert!(empty.validate_shape().is_err());
    }

    #[test]
    fn test_smart_search_result_rejects_bad_recommendation() {
        let result = SmartSearchResult {
            enhanced_query: "laptop best deals 2024".to_string(),
            categories: vec![ProductCategory::new("Electronics", "Laptops", 0.93)],
            market_analysis: sample_analysis(),
            recommendations: vec![ProductRecommendation {
                product_name: "Laptop".to_string(),
                reason: "Good".to_string(),
                category: "Electronics".to_string(),
                estimated_price: "₹50,000".to_string(),
                confidence: -0.1,
            }],
            search_tips: vec![],
        };
        assert!(result.validate_shape().is_err());
    }
}
