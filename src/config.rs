use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Gemini API key
    pub gemini_api_key: String,

    /// Gemini API base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Gemini model supporting Google Maps grounding
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Timeout for the upstream AI call, in seconds
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,

    /// Optional cap on cached recommendation entries; unbounded when unset
    #[serde(default)]
    pub cache_max_entries: Option<usize>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
