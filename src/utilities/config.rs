//! Application configuration, loaded from the environment.

/// Default OpenRouter API base URL.
pub const OPENROUTER_DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
/// Default model for chat and generation calls.
pub const DEFAULT_MODEL: &str = "x-ai/grok-4";
pub const DEFAULT_HTTP_REFERER: &str = "https://app.moodybot.ai";
pub const DEFAULT_X_TITLE: &str = "MoodyBot";

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 256;
pub const DYNAMIC_TEMPERATURE: f64 = 0.85;
pub const DYNAMIC_MAX_TOKENS: u32 = 1200;

/// CORS origins when `MOODYBOT_ENV=production` and no explicit list is set.
pub const PRODUCTION_ORIGINS: [&str; 2] = ["https://moodybot.ai", "https://www.moodybot.ai"];
/// CORS origins for every other environment.
pub const DEVELOPMENT_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:5000",
    "http://127.0.0.1:5000",
];

fn default_origins(production: bool) -> Vec<String> {
    let origins: &[&str] = if production {
        &PRODUCTION_ORIGINS
    } else {
        &DEVELOPMENT_ORIGINS
    };
    origins.iter().map(|o| o.to_string()).collect()
}

/// Server and provider configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// OpenRouter API key. Empty when unset; calls then fail fast.
    pub api_key: String,
    pub base_url: String,
    /// Model for chat, journal, quote, and analysis calls.
    pub model_dynamic: String,
    /// Model for the validation endpoint.
    pub model_validation: String,
    pub http_referer: String,
    pub x_title: String,
    pub host: String,
    pub port: u16,
    /// CORS origins, sent with credentials allowed.
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: OPENROUTER_DEFAULT_BASE_URL.into(),
            model_dynamic: DEFAULT_MODEL.into(),
            model_validation: DEFAULT_MODEL.into(),
            http_referer: DEFAULT_HTTP_REFERER.into(),
            x_title: DEFAULT_X_TITLE.into(),
            host: "0.0.0.0".into(),
            port: 5000,
            allowed_origins: default_origins(false),
        }
    }
}

impl AppConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let production = get("MOODYBOT_ENV").is_some_and(|env| env.trim() == "production");

        Self {
            api_key: get("OPENROUTER_API_KEY")
                .or_else(|| get("OPENAI_API_KEY"))
                .unwrap_or_default(),
            base_url: get("OPENROUTER_BASE_URL").unwrap_or(defaults.base_url),
            model_dynamic: get("OPENROUTER_MODEL_DYNAMIC").unwrap_or(defaults.model_dynamic),
            model_validation: get("OPENROUTER_MODEL_VALIDATION")
                .unwrap_or(defaults.model_validation),
            http_referer: get("OPENROUTER_HTTP_REFERER").unwrap_or(defaults.http_referer),
            x_title: get("OPENROUTER_X_TITLE").unwrap_or(defaults.x_title),
            host: get("HOST").unwrap_or(defaults.host),
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            allowed_origins: get("MOODYBOT_ALLOWED_ORIGINS")
                .map(|list| {
                    list.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect::<Vec<_>>()
                })
                .filter(|list| !list.is_empty())
                .unwrap_or_else(|| default_origins(production)),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
