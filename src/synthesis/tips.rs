//! Search tips

use super::profile::{QueryProfile, Segment};

pub const UNIVERSAL_TIP: &str = "Compare prices across multiple platforms before buying";

const ELECTRONICS_TIPS: &[&str] = &[
    "Check warranty coverage and buy from authorized sellers",
    "Look for bank card and exchange offers",
    "Compare specifications, not just brand names",
    "Read reviews about after-sales service",
];

const FASHION_TIPS: &[&str] = &[
    "Check the size chart and fabric details",
    "Look for end-of-season sale discounts",
    "Verify return and exchange policies",
];

const BOOK_TIPS: &[&str] = &[
    "Compare paperback, hardcover and e-book prices",
    "Check for combo offers on series",
    "Look for used copies in good condition",
];

const DEFAULT_TIPS: &[&str] = &[
    "Read verified buyer reviews",
    "Set price alerts for products you like",
    "Check delivery time and return policy",
];

/// The universal tip followed by the segment's tips
pub fn for_query(profile: &QueryProfile) -> Vec<String> {
    let specific = match profile.segment() {
        Segment::Electronics => ELECTRONICS_TIPS,
        Segment::Clothing => FASHION_TIPS,
        Segment::Book => BOOK_TIPS,
        Segment::Home | Segment::General => DEFAULT_TIPS,
    };

    std::iter::once(UNIVERSAL_TIP)
        .chain(specific.iter().copied())
        .map(str::to_string)
        .collect()
}
