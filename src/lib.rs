//! Searchlight - resilient AI insights for product search
//!
//! This library enriches product-search queries with structured insights
//! (categories, market analysis, recommendations, tips) from a generative AI
//! backend, and synthesizes equivalent results locally whenever the backend
//! is unconfigured, unreachable, rate limited or returns unusable output.

pub mod cli;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod insights;
pub mod metrics;
pub mod middleware;
pub mod prompts;
pub mod recovery;
pub mod service;
pub mod synthesis;
pub mod telemetry;
