//! Market analysis synthesis
//!
//! Price brackets, seasonal trends, timing advice and insights are all pure
//! functions of the query profile and the calendar date. The single exception
//! is the trend for segments without a seasonal rule, which is drawn at random.

use super::profile::{QueryProfile, Segment};
use crate::insights::{MarketAnalysis, MarketTrend};
use chrono::{Datelike, NaiveDate};
use rand::Rng;

/// Price brackets, most specific first
pub const APPLE_PREMIUM_RANGE: &str = "₹1,00,000 - ₹2,00,000";
pub const APPLE_RANGE: &str = "₹50,000 - ₹1,00,000";
pub const ELECTRONICS_PREMIUM_RANGE: &str = "₹60,000 - ₹1,50,000";
pub const ELECTRONICS_RANGE: &str = "₹10,000 - ₹50,000";
pub const CLOTHING_RANGE: &str = "₹500 - ₹5,000";
pub const HOME_RANGE: &str = "₹2,000 - ₹50,000";
pub const BOOK_RANGE: &str = "₹200 - ₹2,000";
pub const GENERAL_RANGE: &str = "₹1,000 - ₹25,000";

/// Months (0-based) in which end-of-season clothing sales run
const CLOTHING_SALE_MONTHS: [u32; 3] = [0, 5, 6];

/// First month (0-based) of the festive sale season
const FESTIVE_SEASON_START: u32 = 8;

/// Apple brackets apply only to Apple electronics, so "apple juice" stays general
pub fn price_range(profile: &QueryProfile) -> &'static str {
    match (
        profile.electronics,
        profile.apple,
        profile.premium,
        profile.clothing,
        profile.home,
        profile.book,
    ) {
        (true, true, true, _, _, _) => APPLE_PREMIUM_RANGE,
        (true, true, false, _, _, _) => APPLE_RANGE,
        (true, false, true, _, _, _) => ELECTRONICS_PREMIUM_RANGE,
        (true, false, false, _, _, _) => ELECTRONICS_RANGE,
        (false, _, _, true, _, _) => CLOTHING_RANGE,
        (false, _, _, false, true, _) => HOME_RANGE,
        (false, _, _, false, false, true) => BOOK_RANGE,
        (false, _, _, false, false, false) => GENERAL_RANGE,
    }
}

/// Seasonal trend, or a uniform random pick when the segment has no rule
pub fn trend<R: Rng>(profile: &QueryProfile, date: NaiveDate, rng: &mut R) -> MarketTrend {
    let month = date.month0();
    match profile.segment() {
        Segment::Electronics if month >= FESTIVE_SEASON_START => MarketTrend::Decreasing,
        Segment::Electronics => MarketTrend::Stable,
        Segment::Clothing if CLOTHING_SALE_MONTHS.contains(&month) => MarketTrend::Decreasing,
        Segment::Clothing => MarketTrend::Stable,
        Segment::Home | Segment::Book | Segment::General => {
            MarketTrend::ALL[rng.random_range(0..MarketTrend::ALL.len())]
        }
    }
}

/// Best time to buy and price prediction for the segment and date
pub fn timing(profile: &QueryProfile, date: NaiveDate) -> (&'static str, &'static str) {
    let month = date.month0();
    match profile.segment() {
        Segment::Electronics if month >= FESTIVE_SEASON_START => (
            "Now - festive season sales like Diwali and Big Billion Days bring the lowest prices of the year",
            "Prices expected to drop 10-15% during the ongoing festive sales",
        ),
        Segment::Electronics if month <= 2 => (
            "Wait for new model launches in March-April, when older models get discounted",
            "Prices likely to dip 5-10% after the upcoming launches",
        ),
        Segment::Electronics => (
            "Wait for festive season sales starting in October",
            "Prices stable now, expected to drop 10-20% during festive sales",
        ),
        Segment::Clothing if CLOTHING_SALE_MONTHS.contains(&month) => (
            "Now - end-of-season sales are live",
            "Prices at seasonal lows, expected to rise once new collections arrive",
        ),
        Segment::Clothing => (
            "Wait for end-of-season sales in January or June-July",
            "Prices stable with occasional brand discounts",
        ),
        Segment::Home if month >= FESTIVE_SEASON_START => (
            "Now - festive home makeover sales offer strong discounts",
            "Prices expected to rise after the festive season",
        ),
        Segment::Home => (
            "Wait for festive sales in October-November",
            "Prices stable with seasonal offers",
        ),
        Segment::Book => (
            "Anytime - books are discounted regularly across retailers",
            "Prices expected to remain stable",
        ),
        Segment::General => match date.day() {
            1..=10 => (
                "Now - early month sales and bank offers are active",
                "Prices stable with minor fluctuations",
            ),
            11..=20 => (
                "Mid-month - watch for flash sales and lightning deals",
                "Prices may dip briefly during flash sales",
            ),
            _ => (
                "Wait for month-end and salary-day sales",
                "Prices expected to drop slightly during month-end sales",
            ),
        },
    }
}

/// Ordered market insights for the segment
pub fn insights(profile: &QueryProfile, date: NaiveDate) -> Vec<String> {
    let segment = profile.segment();
    let base: &[&str] = match segment {
        Segment::Electronics => &[
            "New model launches typically push older models down in price",
            "Bank card offers and exchange deals can save an extra 5-10%",
            "Compare specifications across brands before deciding",
        ],
        Segment::Clothing => &[
            "End-of-season sales offer 40-70% discounts",
            "Online exclusives often undercut in-store prices",
            "Check size charts and return policies before buying",
        ],
        Segment::Home => &[
            "Festive and year-end sales bring the best furniture discounts",
            "No-cost EMI options are widely available on larger purchases",
            "Factor in delivery and assembly charges when comparing prices",
        ],
        Segment::Book => &[
            "Paperback editions are usually 30-50% cheaper than hardcover",
            "E-book versions are often available at lower prices",
            "Combo packs and series bundles give extra savings",
        ],
        Segment::General => &[
            "Prices vary significantly across retailers",
            "Seasonal sales and bank offers provide the best savings",
            "Read verified buyer reviews before purchasing",
        ],
    };

    let mut insights: Vec<String> = base.iter().map(|s| s.to_string()).collect();
    if segment == Segment::Electronics && date.month0() >= FESTIVE_SEASON_START {
        insights.push(
            "Festive season sales are underway with the deepest electronics discounts of the year"
                .to_string(),
        );
    }
    insights
}

pub fn analyze<R: Rng>(profile: &QueryProfile, date: NaiveDate, rng: &mut R) -> MarketAnalysis {
    let (best_time_to_buy, price_prediction) = timing(profile, date);
    MarketAnalysis {
        price_range: price_range(profile).to_string(),
        market_trend: trend(profile, date, rng),
        best_time_to_buy: best_time_to_buy.to_string(),
        price_prediction: price_prediction.to_string(),
        market_insights: insights(profile, date),
    }
}
