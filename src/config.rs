use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub classify_timeout_secs: u64,
    pub token_prefix: String,
    pub token_region: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            classify_timeout_secs: env::var("CLASSIFY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            token_prefix: env::var("TOKEN_PREFIX").unwrap_or_else(|_| "TT".to_string()),
            token_region: env::var("TOKEN_REGION").unwrap_or_else(|_| "IND".to_string()),
        }
    }
}
