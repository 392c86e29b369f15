//! Keyword profile of a search query
//!
//! Every synthesis rule keys off the same lowercase keyword tests, so they are
//! computed once here. The original-cased query is kept alongside for
//! interpolation into output strings.

use regex::Regex;
use std::sync::LazyLock;

/// Ordered keyword groups used for category classification
///
/// Order matters: the first matching group wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordGroup {
    Phone,
    Laptop,
    Display,
    Audio,
    Watch,
    Apparel,
    Footwear,
    Book,
    Home,
}

impl KeywordGroup {
    pub const ORDERED: [KeywordGroup; 9] = [
        KeywordGroup::Phone,
        KeywordGroup::Laptop,
        KeywordGroup::Display,
        KeywordGroup::Audio,
        KeywordGroup::Watch,
        KeywordGroup::Apparel,
        KeywordGroup::Footwear,
        KeywordGroup::Book,
        KeywordGroup::Home,
    ];

    fn pattern(&self) -> &'static Regex {
        match self {
            Self::Phone => &PHONE,
            Self::Laptop => &LAPTOP,
            Self::Display => &DISPLAY,
            Self::Audio => &AUDIO,
            Self::Watch => &WATCH,
            Self::Apparel => &APPAREL,
            Self::Footwear => &FOOTWEAR,
            Self::Book => &BOOK,
            Self::Home => &HOME,
        }
    }

    pub fn matches(&self, lowercase_query: &str) -> bool {
        self.pattern().is_match(lowercase_query)
    }

    fn is_electronics(&self) -> bool {
        matches!(
            self,
            Self::Phone | Self::Laptop | Self::Display | Self::Audio | Self::Watch
        )
    }
}

fn keyword_pattern(pattern: &str) -> Regex {
    Regex::new(pattern).expect("keyword pattern is valid")
}

// "headphone" must not fall into the phone group, hence the word boundary
// before the optional i/smart prefix.
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| keyword_pattern(r"\b(?:i|smart)?phones?|\bmobiles?"));
static LAPTOP: LazyLock<Regex> = LazyLock::new(|| {
    keyword_pattern(r"\blaptops?|\bcomputers?|\bpcs?\b|\bmacbook|\bnotebook")
});
static DISPLAY: LazyLock<Regex> =
    LazyLock::new(|| keyword_pattern(r"\btvs?\b|\btelevision|\bmonitors?"));
static AUDIO: LazyLock<Regex> = LazyLock::new(|| {
    keyword_pattern(r"headphone|earphone|earbud|\bspeakers?|\baudio|airpods")
});
static WATCH: LazyLock<Regex> = LazyLock::new(|| keyword_pattern(r"watch"));
static APPAREL: LazyLock<Regex> = LazyLock::new(|| {
    keyword_pattern(r"\bshirts?|t-shirt|\bjeans|\bdress|\bfashion|\bclothing|\bkurta")
});
static FOOTWEAR: LazyLock<Regex> =
    LazyLock::new(|| keyword_pattern(r"\bshoes?\b|\bfootwear|\bsneakers?"));
static BOOK: LazyLock<Regex> =
    LazyLock::new(|| keyword_pattern(r"\bbooks?\b|\bnovels?|\bguides?\b"));
static HOME: LazyLock<Regex> =
    LazyLock::new(|| keyword_pattern(r"\bfurniture|\bhome\b|\bdecor|\bsofa"));

static EXTRA_ELECTRONICS: LazyLock<Regex> = LazyLock::new(|| {
    keyword_pattern(r"\belectronics?|\bcamera|\btablet|\bipad|\bimac|\bgadget|\bconsole")
});
static APPLE: LazyLock<Regex> = LazyLock::new(|| {
    keyword_pattern(r"\bapple\b|iphone|\bipad|macbook|airpods|\bimac")
});
static EXTRA_HOME: LazyLock<Regex> = LazyLock::new(|| keyword_pattern(r"\bkitchen"));
static PREMIUM: LazyLock<Regex> =
    LazyLock::new(|| keyword_pattern(r"\b(?:pro|max|ultra|premium|flagship)\b"));

/// Market segment driving price, timing, insight and tip tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Electronics,
    Clothing,
    Home,
    Book,
    General,
}

/// Derived keyword facts about one query
#[derive(Debug, Clone)]
pub struct QueryProfile {
    original: String,
    lowercase: String,
    group: Option<KeywordGroup>,
    pub electronics: bool,
    pub apple: bool,
    pub clothing: bool,
    pub home: bool,
    pub book: bool,
    /// Marketing adjectives (pro/max/ultra/premium/flagship) used as a tier proxy
    pub premium: bool,
}

impl QueryProfile {
    pub fn new(query: &str) -> Self {
        let original = query.trim().to_string();
        let lowercase = original.to_lowercase();
        let group = KeywordGroup::ORDERED
            .into_iter()
            .find(|group| group.matches(&lowercase));
        let any = |candidates: &[KeywordGroup]| candidates.iter().any(|g| g.matches(&lowercase));

        let electronics = KeywordGroup::ORDERED
            .iter()
            .filter(|g| g.is_electronics())
            .any(|g| g.matches(&lowercase))
            || EXTRA_ELECTRONICS.is_match(&lowercase);
        let clothing = any(&[KeywordGroup::Apparel, KeywordGroup::Footwear]);
        let home = any(&[KeywordGroup::Home]) || EXTRA_HOME.is_match(&lowercase);
        let book = any(&[KeywordGroup::Book]);

        Self {
            apple: APPLE.is_match(&lowercase),
            premium: PREMIUM.is_match(&lowercase),
            original,
            lowercase,
            group,
            electronics,
            clothing,
            home,
            book,
        }
    }

    /// Query as typed, trimmed
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Lowercase copy used for keyword tests
    pub fn lowercase(&self) -> &str {
        &self.lowercase
    }

    /// First matching category keyword group, if any
    pub fn group(&self) -> Option<KeywordGroup> {
        self.group
    }

    pub fn segment(&self) -> Segment {
        if self.electronics {
            Segment::Electronics
        } else if self.clothing {
            Segment::Clothing
        } else if self.home {
            Segment::Home
        } else if self.book {
            Segment::Book
        } else {
            Segment::General
        }
    }
}
