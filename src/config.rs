const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const PREDICT_PATH: &str = "/mushrooms/api/predict";

/// Environment variable that overrides the prediction service origin.
pub const BASE_URL_ENV: &str = "MUSHROOM_API_BASE_URL";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub endpoint_path: &'static str,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint_path: PREDICT_PATH,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Default config, with the origin taken from `MUSHROOM_API_BASE_URL` when set.
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::with_base_url(url.trim()),
            _ => Self::default(),
        }
    }

    pub fn predict_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.endpoint_path)
    }
}
