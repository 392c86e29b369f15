//! Canned conversational replies
//!
//! The user's question is pulled out of the surrounding instruction prompt,
//! classified against ordered intent buckets by keyword, and answered with a
//! reply drawn uniformly from that bucket's pool.

use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

static MARKED_QUESTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:user\s+(?:asked|says|is\s+asking)|question)\s*:?\s*"([^"]+)""#)
        .expect("marked question pattern is valid")
});
static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("quoted pattern is valid"));

/// Intent buckets, checked in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Phone,
    Laptop,
    Price,
    Audio,
    Trend,
    Comparison,
    Warranty,
    Advice,
    Thanks,
}

impl Intent {
    const ORDERED: [Intent; 10] = [
        Intent::Greeting,
        Intent::Phone,
        Intent::Laptop,
        Intent::Price,
        Intent::Audio,
        Intent::Trend,
        Intent::Comparison,
        Intent::Warranty,
        Intent::Advice,
        Intent::Thanks,
    ];

    /// Short keywords that must appear as whole words
    fn words(&self) -> &'static [&'static str] {
        match self {
            Self::Greeting => &["hi", "hello", "hey", "namaste", "hola"],
            Self::Phone => &["phone", "phones"],
            Self::Comparison => &["vs"],
            _ => &[],
        }
    }

    /// Keywords tested as plain substrings
    fn phrases(&self) -> &'static [&'static str] {
        match self {
            Self::Greeting => &["good morning", "good evening", "good afternoon"],
            Self::Phone => &["smartphone", "iphone", "mobile"],
            Self::Laptop => &["laptop", "computer", "macbook", "notebook"],
            Self::Price => &["price", "deal", "cheap", "discount", "offer", "budget", "cost"],
            Self::Audio => &["headphone", "earphone", "earbud", "speaker", "audio"],
            Self::Trend => &["trend", "market", "popular", "latest"],
            Self::Comparison => &["compare", "versus", "better", "difference"],
            Self::Warranty => &["warranty", "guarantee", "return", "refund"],
            Self::Advice => &["should i", "recommend", "suggest", "advice", "which"],
            Self::Thanks => &["thank"],
        }
    }

    fn matches(&self, question: &str) -> bool {
        let words = self.words();
        self.phrases().iter().any(|p| question.contains(p))
            || (!words.is_empty()
                && question
                    .split(|c: char| !c.is_alphanumeric())
                    .any(|token| words.contains(&token)))
    }

    fn replies(&self) -> &'static [&'static str] {
        match self {
            Self::Greeting => &[
                "Hello! I can help you find the best deals. What are you shopping for today?",
                "Hi there! Tell me what product you have in mind and I'll help you compare options.",
                "Hey! Looking for something specific? I can share prices, trends and buying tips.",
            ],
            Self::Phone => &[
                "For smartphones, decide on your budget first: ₹15,000-₹25,000 covers excellent mid-range phones, while flagships start around ₹60,000.",
                "When choosing a phone, compare camera quality, battery life and the number of years of software updates promised.",
                "Festive sales and bank offers usually bring the best smartphone prices. Exchange offers can cut the price further.",
                "Check whether the phone supports 5G bands used in your area and look at after-sales service options nearby.",
            ],
            Self::Laptop => &[
                "For laptops, match the processor and RAM to your use: 16GB RAM is a comfortable baseline for work and light creative tasks.",
                "Students usually get great value in the ₹40,000-₹60,000 range. Look out for education discounts too.",
                "Check the display quality, battery life and weight if you'll carry the laptop often.",
            ],
            Self::Price => &[
                "The best deals usually appear during festive sales, end-of-season sales and bank card promotions.",
                "Set a price alert and compare the same product across several platforms. Prices can differ by 10% or more.",
                "Combine sale prices with bank offers and cashback for the biggest savings.",
                "Check the price history before buying to make sure a discount is genuine.",
            ],
            Self::Audio => &[
                "For headphones, consider whether you need noise cancellation, and prefer codecs your phone supports.",
                "Good wireless earbuds start around ₹2,000, while premium noise-cancelling models cost ₹15,000 and up.",
                "Try to read reviews that mention call quality and comfort during long listening sessions.",
            ],
            Self::Trend => &[
                "Electronics prices typically fall during the festive season, while fashion sees its lowest prices at end-of-season sales.",
                "Right now, value-focused products with strong reviews are what most shoppers are buying.",
                "New launches usually push down the price of previous models, which is often the sweet spot for value.",
            ],
            Self::Comparison => &[
                "When comparing products, list the three features you care about most and compare only those.",
                "A side-by-side comparison of specifications, warranty and verified reviews usually makes the choice clear.",
                "Don't just compare prices. Compare total value including warranty, service and accessories in the box.",
            ],
            Self::Warranty => &[
                "Always buy from authorized sellers so the manufacturer warranty is honoured.",
                "Check the return window and whether returns are free before you order.",
                "Extended warranties can be worth it for expensive electronics, but read what they actually cover.",
            ],
            Self::Advice => &[
                "Tell me your budget and main use, and I can suggest a good fit.",
                "I'd recommend shortlisting two or three options with strong reviews, then waiting for a sale if you can.",
                "The best choice depends on how you'll use it. What matters most to you: price, performance or brand?",
            ],
            Self::Thanks => &[
                "You're welcome! Happy shopping!",
                "Glad I could help. Let me know if you need anything else!",
                "Anytime! Good luck finding a great deal.",
            ],
        }
    }
}

const DEFAULT_REPLIES: &[&str] = &[
    "I can help you compare products, track price trends and find the best time to buy. What are you looking for?",
    "Tell me a bit more about what you're shopping for and your budget, and I'll share some tips.",
    "Great question! Comparing prices across platforms and checking verified reviews is always a good start.",
    "I'm here to help with product research. Try asking about a specific product, a price range or current deals.",
];

/// Pull the user's literal question out of an instruction prompt
///
/// Prefers the last explicit `User asked: "..."` style marker, then the first
/// quoted substring, then the whole prompt.
pub fn extract_question(prompt: &str) -> &str {
    MARKED_QUESTION
        .captures_iter(prompt)
        .last()
        .or_else(|| QUOTED.captures(prompt))
        .and_then(|c| c.get(1))
        .map(|question| question.as_str())
        .unwrap_or_else(|| prompt.trim())
}

/// First intent whose keywords appear in the lowercased question
pub fn classify(question: &str) -> Option<Intent> {
    let lowercase = question.to_lowercase();
    Intent::ORDERED
        .into_iter()
        .find(|intent| intent.matches(&lowercase))
}

/// Reply to a conversational prompt
pub fn reply<R: Rng>(prompt: &str, rng: &mut R) -> String {
    let question = extract_question(prompt);
    let pool = match classify(question) {
        Some(intent) => intent.replies(),
        None => DEFAULT_REPLIES,
    };
    pool[rng.random_range(0..pool.len())].to_string()
}
