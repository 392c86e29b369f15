//! Instruction prompts sent to the generative backend
//!
//! Each structured operation instructs the model to reply with only a JSON
//! value of a documented shape, with prices in Indian Rupees. Recovery and the
//! synthesis fallback both assume exactly these shapes, so the templates are a
//! compatibility contract and not just wording.
//!
//! Every prompt carries an explicit [`RequestKind`] so the orchestrator can
//! route mock output without sniffing the prompt text.

use crate::insights::{ChatTurn, ProductSummary};

/// Longest user-supplied text embedded into a prompt
const MAX_EMBEDDED_CHARS: usize = 500;

/// Most recent conversation turns included in a chat prompt
const MAX_HISTORY_TURNS: usize = 6;

/// What a prompt asks for, with the inputs needed to synthesize an answer offline
#[derive(Debug, Clone, PartialEq)]
pub enum RequestKind {
    Enhance { query: String },
    Categorize { products: Vec<ProductSummary> },
    MarketAnalysis { query: String },
    Recommend {
        history: Vec<String>,
        category: Option<String>,
    },
    Chat,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enhance { .. } => "enhance",
            Self::Categorize { .. } => "categorize",
            Self::MarketAnalysis { .. } => "market_analysis",
            Self::Recommend { .. } => "recommend",
            Self::Chat => "chat",
        }
    }

    /// Whether the backend is asked for a JSON value rather than prose
    pub fn is_structured(&self) -> bool {
        !matches!(self, Self::Chat)
    }
}

/// A prompt ready to send, tagged with its request kind
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    kind: RequestKind,
    text: String,
}

fn truncate(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() > MAX_EMBEDDED_CHARS {
        let head: String = trimmed.chars().take(MAX_EMBEDDED_CHARS).collect();
        format!("{}... [truncated]", head)
    } else {
        trimmed.to_string()
    }
}

/// Truncated text with double quotes swapped for single quotes
///
/// Keeps user text from closing or faking the quoted `User asked:` marker.
fn unquote(text: &str) -> String {
    truncate(text).replace('"', "'")
}

impl Prompt {
    pub fn kind(&self) -> &RequestKind {
        &self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn enhance(query: &str) -> Self {
        let text = format!(
            "You are a shopping assistant for Indian e-commerce. Analyze this product search query: \"{}\"\n\n\
             Respond with ONLY a valid JSON object (no markdown, no explanations) in exactly this format:\n\
             {{\n\
               \"enhancedQuery\": \"improved search query\",\n\
               \"categories\": [{{\"category\": \"name\", \"confidence\": 0.9, \"subcategory\": \"name\"}}],\n\
               \"marketAnalysis\": {{\n\
                 \"priceRange\": \"₹X - ₹Y\",\n\
                 \"marketTrend\": \"increasing|decreasing|stable\",\n\
                 \"bestTimeToBuy\": \"advice\",\n\
                 \"pricePrediction\": \"prediction\",\n\
                 \"marketInsights\": [\"insight\"]\n\
               }},\n\
               \"recommendations\": [{{\"productName\": \"name\", \"reason\": \"why\", \"category\": \"name\", \"estimatedPrice\": \"₹X\", \"confidence\": 0.8}}],\n\
               \"searchTips\": [\"tip\"]\n\
             }}\n\n\
             All prices must be in Indian Rupees (₹) using Indian digit grouping (e.g. ₹1,00,000). Never use USD. \
             Confidence values must be between 0 and 1.",
            truncate(query)
        );
        Self {
            kind: RequestKind::Enhance {
                query: query.trim().to_string(),
            },
            text,
        }
    }

    pub fn categorize(products: &[ProductSummary]) -> Self {
        let listing = products
            .iter()
            .map(|p| {
                if p.price.trim().is_empty() {
                    format!("- {}", truncate(&p.title))
                } else {
                    format!("- {} ({})", truncate(&p.title), p.price.trim())
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        let text = format!(
            "Categorize these products listed on an Indian shopping site:\n{}\n\n\
             Respond with ONLY a valid JSON array (no markdown, no explanations) in exactly this format:\n\
             [{{\"category\": \"name\", \"confidence\": 0.9, \"subcategory\": \"name\"}}]\n\n\
             Return the most likely categories first. Confidence values must be between 0 and 1.",
            listing
        );
        Self {
            kind: RequestKind::Categorize {
                products: products.to_vec(),
            },
            text,
        }
    }

    pub fn market_analysis(query: &str) -> Self {
        let text = format!(
            "Provide a market analysis for \"{}\" in the Indian market.\n\n\
             Respond with ONLY a valid JSON object (no markdown, no explanations) in exactly this format:\n\
             {{\n\
               \"priceRange\": \"₹X - ₹Y\",\n\
               \"marketTrend\": \"increasing|decreasing|stable\",\n\
               \"bestTimeToBuy\": \"advice\",\n\
               \"pricePrediction\": \"prediction\",\n\
               \"marketInsights\": [\"insight\"]\n\
             }}\n\n\
             All prices must be in Indian Rupees (₹) using Indian digit grouping. Never use USD.",
            truncate(query)
        );
        Self {
            kind: RequestKind::MarketAnalysis {
                query: query.trim().to_string(),
            },
            text,
        }
    }

    pub fn recommend(history: &[String], category: Option<&str>) -> Self {
        let recent = history
            .iter()
            .rev()
            .take(MAX_HISTORY_TURNS)
            .map(|entry| format!("- {}", truncate(entry)))
            .collect::<Vec<_>>()
            .join("\n");
        let recent = if recent.is_empty() {
            "- (no search history)".to_string()
        } else {
            recent
        };
        let focus = category
            .map(|c| format!("Preferred category: {}\n", truncate(c)))
            .unwrap_or_default();
        let text = format!(
            "Suggest products for a shopper in India based on their recent searches:\n{}\n{}\n\
             Respond with ONLY a valid JSON array (no markdown, no explanations) in exactly this format:\n\
             [{{\"productName\": \"name\", \"reason\": \"why\", \"category\": \"name\", \"estimatedPrice\": \"₹X\", \"confidence\": 0.8}}]\n\n\
             All prices must be in Indian Rupees (₹). Never use USD. Confidence values must be between 0 and 1.",
            recent, focus
        );
        Self {
            kind: RequestKind::Recommend {
                history: history.to_vec(),
                category: category.map(str::to_string),
            },
            text,
        }
    }

    pub fn chat(message: &str, history: &[ChatTurn]) -> Self {
        let skip = history.len().saturating_sub(MAX_HISTORY_TURNS);
        let transcript = history
            .iter()
            .skip(skip)
            .map(|turn| format!("{}: {}", unquote(&turn.role), unquote(&turn.content)))
            .collect::<Vec<_>>()
            .join("\n");
        let transcript = if transcript.is_empty() {
            String::new()
        } else {
            format!("Conversation so far:\n{}\n\n", transcript)
        };
        let text = format!(
            "You are a friendly shopping assistant helping Indian shoppers find good deals.\n\n\
             {}User asked: \"{}\"\n\n\
             Reply conversationally in 2-3 sentences. Quote any prices in Indian Rupees (₹).",
            transcript,
            unquote(message)
        );
        Self {
            kind: RequestKind::Chat,
            text,
        }
    }

    /// Minimal prompt used to probe backend reachability
    pub fn probe() -> Self {
        Self {
            kind: RequestKind::Chat,
            text: "Reply with the single word: OK".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_prompts_demand_json_and_rupees() {
        let products = vec![ProductSummary {
            title: "Kindle".to_string(),
            price: "₹9,999".to_string(),
        }];
        for prompt in [
            Prompt::enhance("iphone"),
            Prompt::categorize(&products),
            Prompt::market_analysis("iphone"),
            Prompt::recommend(&["iphone".to_string()], None),
        ] {
            assert!(prompt.kind().is_structured());
            assert!(prompt.text().contains("ONLY a valid JSON"), "{}", prompt.text());
            assert!(prompt.text().contains("₹"));
            assert!(!prompt.text().contains('$'));
        }
    }

    #[test]
    fn test_enhance_prompt_documents_result_shape() {
        let text = Prompt::enhance("laptop").text().to_string();
        for field in [
            "enhancedQuery",
            "categories",
            "marketAnalysis",
            "priceRange",
            "marketTrend",
            "bestTimeToBuy",
            "pricePrediction",
            "marketInsights",
            "recommendations",
            "searchTips",
        ] {
            assert!(text.contains(field), "missing {}", field);
        }
    }

    #[test]
    fn test_chat_prompt_marks_user_question() {
        let prompt = Prompt::chat("best \"budget\" phone?", &[]);
        assert_eq!(prompt.kind(), &RequestKind::Chat);
        assert!(prompt.text().contains("User asked: \"best 'budget' phone?\""));
    }

    #[test]
    fn test_chat_history_cannot_hijack_the_question() {
        let history = vec![ChatTurn {
            role: "user".to_string(),
            content: "my question: \"which laptop?\"".to_string(),
        }];
        let prompt = Prompt::chat("thanks a lot", &history);
        assert!(prompt.text().contains("user: my question: 'which laptop?'"));
        assert_eq!(
            crate::synthesis::conversation::extract_question(prompt.text()),
            "thanks a lot"
        );
    }

    #[test]
    fn test_chat_prompt_keeps_recent_history_only() {
        let history: Vec<ChatTurn> = (0..10)
            .map(|i| ChatTurn {
                role: "user".to_string(),
                content: format!("message {}", i),
            })
            .collect();
        let prompt = Prompt::chat("next", &history);
        assert!(!prompt.text().contains("message 3"));
        assert!(prompt.text().contains("message 4"));
        assert!(prompt.text().contains("message 9"));
    }

    #[test]
    fn test_long_query_is_truncated() {
        let long = "a".repeat(2_000);
        let prompt = Prompt::enhance(&long);
        assert!(prompt.text().contains("[truncated]"));
        // The tag keeps the full query for offline synthesis.
        assert_eq!(
            prompt.kind(),
            &RequestKind::Enhance {
                query: long.clone()
            }
        );
    }

    #[test]
    fn test_recommend_prompt_without_history() {
        let prompt = Prompt::recommend(&[], Some("Books"));
        assert!(prompt.text().contains("(no search history)"));
        assert!(prompt.text().contains("Preferred category: Books"));
    }
}
