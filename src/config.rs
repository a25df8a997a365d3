use std::env;

/// Connection settings for the records service.
///
/// Built once at startup and injected into [`crate::api::ApiClient`];
/// nothing reads the environment after this point.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    /// Reads `FINANCE_API_BASE`, falling back to the local dev server.
    pub fn from_env() -> Self {
        let base_url = env::var("FINANCE_API_BASE")
            .unwrap_or_else(|_| "http://127.0.0.1:5000/api".to_string());
        Self { base_url }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
