//! Command-line interface for Searchlight
//!
//! Provides argument parsing and subcommand handling for the searchlight binary.

use clap::{Parser, Subcommand};

/// AI-enriched product search insights with an offline fallback
#[derive(Parser)]
#[command(name = "searchlight")]
#[command(version)]
#[command(about = "AI-enriched product search insights with an offline fallback")]
#[command(
    long_about = "Searchlight enriches product-search queries with categories, market analysis, \
    recommendations and tips from a generative AI backend. When the backend is unavailable, \
    rate limited or misconfigured it synthesizes equivalent results locally."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Enhance a single query and print the result as JSON
    Enhance {
        /// Free-text product search query
        query: String,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# Searchlight Configuration
# =========================
#
# Every section is optional. Without an API key Searchlight runs entirely on
# locally synthesized results.

# ─────────────────────────────────────────────────────────────────────────────
# SERVER CONFIGURATION
# ─────────────────────────────────────────────────────────────────────────────

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "127.0.0.1"

# Port to listen on
port = 3000

# ─────────────────────────────────────────────────────────────────────────────
# GENERATIVE BACKEND
# ─────────────────────────────────────────────────────────────────────────────

[assistant]
# API key for the generateContent API. When omitted, the SEARCHLIGHT_API_KEY
# environment variable is used. A missing or malformed key enables mock mode.
# api_key = "AIza..."

# Informational only; requests go to the fully-qualified endpoints below
base_url = "https://generativelanguage.googleapis.com"

# Model-version endpoints, tried strictly in this order (at least 2)
endpoints = [
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent",
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent",
    "https://generativelanguage.googleapis.com/v1/models/gemini-pro:generateContent",
]

# Log every swallowed backend failure at warn level with a timestamp
debug = false

# "development" or "production". Production never contacts the backend.
environment = "development"

# ─────────────────────────────────────────────────────────────────────────────
# RETRY AND BACKOFF
# ─────────────────────────────────────────────────────────────────────────────

[retry]
# Rate-limited (HTTP 429) responses tolerated per endpoint before mock mode
# is forced for the rest of the process (0-10)
max_retries = 2

# Rate-limit backoff: base * 2^n plus up to jitter milliseconds
rate_limit_base_delay_ms = 2000
rate_limit_jitter_ms = 1000

# Single retry after a connection-level failure waits within this range
transport_retry_min_delay_ms = 1000
transport_retry_max_delay_ms = 2000

# ─────────────────────────────────────────────────────────────────────────────
# TIMEOUTS
# ─────────────────────────────────────────────────────────────────────────────

[timeouts]
# Deadline for one request across all endpoints and retries (1-300)
request_timeout_seconds = 30

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
log_level = "info"

# Prometheus metrics are always available at /metrics on the server port
"#
}
