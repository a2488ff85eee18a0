use crate::error::{LecsumError, Result};

pub const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const TRANSCRIPTIONS_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// Endpoints plus the bearer credential. The key is an opaque string here;
/// how it is provisioned is the embedding application's concern.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub chat_url: String,
    pub transcribe_url: String,
    pub api_key: String,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            chat_url: CHAT_COMPLETIONS_URL.to_string(),
            transcribe_url: TRANSCRIPTIONS_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Reads the API key from the environment, failing up front when it is
    /// absent so a run never gets halfway before discovering the missing
    /// credential.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV_VAR).map_err(|_| LecsumError::MissingApiKey {
            env_var: API_KEY_ENV_VAR,
        })?;
        Ok(Self::new(api_key))
    }
}
