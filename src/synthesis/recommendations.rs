//! Recommendation synthesis

use super::profile::QueryProfile;
use crate::insights::{MarketAnalysis, ProductCategory, ProductRecommendation};

pub const PREMIUM_PICK_CONFIDENCE: f64 = 0.85;
pub const VALUE_PICK_CONFIDENCE: f64 = 0.78;

/// Two picks for a query, priced at the upper and lower end of its bracket
pub fn for_query(
    profile: &QueryProfile,
    enhanced_query: &str,
    categories: &[ProductCategory],
    analysis: &MarketAnalysis,
) -> Vec<ProductRecommendation> {
    let (lower, upper) = analysis.price_bounds();
    let category = categories
        .first()
        .map(|c| c.category.as_str())
        .unwrap_or("General");
    let name = profile.original();

    vec![
        ProductRecommendation {
            product_name: format!("{} - Premium Pick", name),
            reason: format!(
                "Top-rated option for \"{}\" with strong reviews and reliable sellers",
                enhanced_query
            ),
            category: category.to_string(),
            estimated_price: upper.to_string(),
            confidence: PREMIUM_PICK_CONFIDENCE,
        },
        ProductRecommendation {
            product_name: format!("{} - Best Value", name),
            reason: format!(
                "Best balance of price and features for \"{}\"",
                enhanced_query
            ),
            category: category.to_string(),
            estimated_price: lower.to_string(),
            confidence: VALUE_PICK_CONFIDENCE,
        },
    ]
}

/// Fixed picks for requests that carry no query
pub fn generic() -> Vec<ProductRecommendation> {
    [
        (
            "Wireless Bluetooth Earbuds",
            "Popular everyday gadget with frequent discounts",
            "Electronics",
            "₹2,999",
            0.8,
        ),
        (
            "Smart Fitness Band",
            "Trending health tracker with long battery life",
            "Electronics",
            "₹3,499",
            0.75,
        ),
        (
            "Fast-Charging Power Bank",
            "Practical accessory that suits most buyers",
            "Mobile Accessories",
            "₹1,499",
            0.72,
        ),
    ]
    .into_iter()
    .map(
        |(product_name, reason, category, estimated_price, confidence)| ProductRecommendation {
            product_name: product_name.to_string(),
            reason: reason.to_string(),
            category: category.to_string(),
            estimated_price: estimated_price.to_string(),
            confidence,
        },
    )
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::MarketTrend;
    use crate::synthesis::{categories, market};

    fn analysis(range: &str) -> MarketAnalysis {
        MarketAnalysis {
            price_range: range.to_string(),
            market_trend: MarketTrend::Stable,
            best_time_to_buy: String::new(),
            price_prediction: String::new(),
            market_insights: Vec::new(),
        }
    }

    #[test]
    fn test_query_picks_use_bracket_bounds() {
        let profile = QueryProfile::new("Gaming Laptop");
        let categories = categories::classify(&profile);
        let picks = for_query(
            &profile,
            "Gaming Laptop best deals 2024",
            &categories,
            &analysis(market::ELECTRONICS_RANGE),
        );

        assert_eq!(picks.len(), 2);
        assert_eq!(picks[0].estimated_price, "₹50,000");
        assert_eq!(picks[0].confidence, PREMIUM_PICK_CONFIDENCE);
        assert_eq!(picks[1].estimated_price, "₹10,000");
        assert_eq!(picks[1].confidence, VALUE_PICK_CONFIDENCE);
        assert_eq!(picks[0].category, "Electronics");
        assert!(picks[0].product_name.starts_with("Gaming Laptop"));
        assert!(picks[1].reason.contains("Gaming Laptop best deals 2024"));
    }

    #[test]
    fn test_generic_list_has_three_valid_entries() {
        let picks = generic();
        assert_eq!(picks.len(), 3);
        assert!(
            picks
                .iter()
                .all(|p| p.confidence > 0.0 && p.confidence <= 1.0 && p.estimated_price.starts_with('₹'))
        );
    }
}
