use crate::errors::AppError;

/// Application configuration loaded once at startup and handed to each component.
/// Every required variable is checked here, before any network call is made.
#[derive(Debug, Clone)]
pub struct Config {
    pub mongodb_uri: String,
    pub db_name: String,
    pub collection_name: String,
    pub openai_api_key: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            mongodb_uri: require_env(&lookup, "MONGODB_URI")?,
            db_name: require_env(&lookup, "DB_NAME")?,
            collection_name: require_env(&lookup, "COLLECTION_NAME")?,
            openai_api_key: require_env(&lookup, "OPENAI_API_KEY")?,
            rust_log: lookup("RUST_LOG")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env<F>(lookup: &F, key: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            AppError::Configuration(format!("Required environment variable '{key}' is not set"))
        })
}
