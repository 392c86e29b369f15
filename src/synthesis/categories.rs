//! Category classification from query keywords

use super::profile::{KeywordGroup, QueryProfile};
use crate::insights::ProductCategory;

/// Two ranked categories for the first matching keyword group
///
/// Always returns exactly two entries; unmatched queries get the generic
/// General/Retail pair.
pub fn classify(profile: &QueryProfile) -> Vec<ProductCategory> {
    let [(primary, primary_sub, primary_conf), (secondary, secondary_sub, secondary_conf)] =
        match profile.group() {
            Some(group) => ranked_pair(group),
            None => DEFAULT_PAIR,
        };

    vec![
        ProductCategory::new(primary, primary_sub, primary_conf),
        ProductCategory::new(secondary, secondary_sub, secondary_conf),
    ]
}

type Ranked = [(&'static str, &'static str, f64); 2];

const DEFAULT_PAIR: Ranked = [
    ("General", "Retail", 0.6),
    ("Shopping", "Online Marketplace", 0.5),
];

fn ranked_pair(group: KeywordGroup) -> Ranked {
    match group {
        KeywordGroup::Phone => [
            ("Electronics", "Smartphones", 0.95),
            ("Mobile Accessories", "Cases & Chargers", 0.75),
        ],
        KeywordGroup::Laptop => [
            ("Electronics", "Laptops & Computers", 0.93),
            ("Computer Accessories", "Peripherals", 0.72),
        ],
        KeywordGroup::Display => [
            ("Electronics", "Televisions & Monitors", 0.92),
            ("Home Entertainment", "Streaming Devices", 0.7),
        ],
        KeywordGroup::Audio => [
            ("Electronics", "Audio", 0.9),
            ("Accessories", "Audio Accessories", 0.68),
        ],
        KeywordGroup::Watch => [
            ("Electronics", "Wearables", 0.88),
            ("Fashion", "Watches", 0.74),
        ],
        KeywordGroup::Apparel => [
            ("Fashion", "Clothing", 0.91),
            ("Fashion Accessories", "Apparel Accessories", 0.65),
        ],
        KeywordGroup::Footwear => [
            ("Fashion", "Footwear", 0.9),
            ("Sports", "Athletic Footwear", 0.7),
        ],
        KeywordGroup::Book => [
            ("Books", "Literature & Guides", 0.94),
            ("Education", "Learning Resources", 0.66),
        ],
        KeywordGroup::Home => [
            ("Home & Kitchen", "Furniture & Decor", 0.89),
            ("Home Improvement", "Decor Accessories", 0.67),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_query(query: &str) -> Vec<ProductCategory> {
        classify(&QueryProfile::new(query))
    }

    #[test]
    fn test_iphone_is_smartphone_first() {
        let categories = classify_query("iphone");
        assert_eq!(
            categories[0],
            ProductCategory::new("Electronics", "Smartphones", 0.95)
        );
    }

    #[test]
    fn test_every_group_yields_two_entries_with_valid_confidence() {
        for query in [
            "android phone",
            "gaming laptop",
            "4k tv",
            "bluetooth speaker",
            "fitness watch",
            "denim jeans",
            "running shoes",
            "cooking guide",
            "home decor",
            "yoga mat",
        ] {
            let categories = classify_query(query);
            assert_eq!(categories.len(), 2, "query {:?}", query);
            for category in &categories {
                assert!(
                    category.confidence > 0.0 && category.confidence <= 1.0,
                    "query {:?} produced confidence {}",
                    query,
                    category.confidence
                );
            }
            assert!(categories[0].confidence >= categories[1].confidence);
        }
    }

    #[test]
    fn test_unmatched_query_gets_general_retail() {
        let categories = classify_query("yoga mat");
        assert_eq!(categories[0].category, "General");
        assert_eq!(categories[0].subcategory.as_deref(), Some("Retail"));
        assert_eq!(categories.len(), 2);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(classify_query("MacBook Air"), classify_query("macbook air"));
        assert_eq!(classify_query("MacBook Air")[0].category, "Electronics");
    }
}
