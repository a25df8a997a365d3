// src/api.rs
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::ApiConfig;
use crate::model::{
    CategoryFilter, FinancialRecord, Message, NetWorthData, NewRecord, RecordUpdate,
};

const GENERIC_ERROR: &str = "an error occurred";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API configuration: {0}")]
    Config(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Status { status: StatusCode, message: String },
    #[error("{0}")]
    Validation(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Typed client for the records service. Every call is a fresh round
/// trip: no retries, no caching. The scope argument selects the
/// per-individual path variant; `None` is single-user mode.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::Config(format!("bad base url '{}': {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "base url '{}' has no path to extend",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { http, base_url })
    }

    // ============= Individuals =============

    pub async fn list_individuals(&self) -> ApiResult<Vec<String>> {
        let url = self.url(&["individuals"])?;
        decode(self.http.get(url).send().await?).await
    }

    pub async fn add_individual(&self, name: &str) -> ApiResult<Message> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("name cannot be empty".into()));
        }
        let url = self.url(&["individuals"])?;
        let body = serde_json::json!({ "name": name });
        decode(self.http.post(url).json(&body).send().await?).await
    }

    // ============= Records =============

    pub async fn list_records(
        &self,
        scope: Option<&str>,
        filter: Option<CategoryFilter>,
    ) -> ApiResult<Vec<FinancialRecord>> {
        let url = self.url(&scoped("records", scope))?;
        let mut req = self.http.get(url);
        if let Some(f) = filter {
            req = req.query(&[("type", f.query_value())]);
        }
        let rows: Vec<FinancialRecord> = decode(req.send().await?).await?;
        Ok(rows.into_iter().map(FinancialRecord::normalized).collect())
    }

    pub async fn create_record(
        &self,
        scope: Option<&str>,
        record: &NewRecord,
    ) -> ApiResult<Message> {
        let url = self.url(&scoped("records", scope))?;
        decode(self.http.post(url).json(record).send().await?).await
    }

    pub async fn update_record(
        &self,
        scope: Option<&str>,
        id: uuid::Uuid,
        record: &RecordUpdate,
    ) -> ApiResult<Message> {
        let id = id.to_string();
        let mut path = scoped("records", scope);
        path.push(&id);
        let url = self.url(&path)?;
        decode(self.http.put(url).json(record).send().await?).await
    }

    pub async fn delete_record(&self, scope: Option<&str>, id: uuid::Uuid) -> ApiResult<Message> {
        let id = id.to_string();
        let mut path = scoped("records", scope);
        path.push(&id);
        let url = self.url(&path)?;
        decode(self.http.delete(url).send().await?).await
    }

    // ============= Net worth =============

    pub async fn net_worth(&self, scope: Option<&str>) -> ApiResult<NetWorthData> {
        let url = self.url(&scoped("net-worth", scope))?;
        let agg: NetWorthData = decode(self.http.get(url).send().await?).await?;
        Ok(agg.normalized())
    }

    fn url(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Config("base url has no path to extend".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn scoped<'a>(root: &'a str, scope: Option<&'a str>) -> Vec<&'a str> {
    match scope {
        Some(individual) => vec![root, individual],
        None => vec![root],
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> ApiResult<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let message = extract_error_message(&body);
        log::warn!("records service returned {status}: {message}");
        return Err(ApiError::Status { status, message });
    }
    Ok(resp.json().await?)
}

/// Best-effort message from a JSON error body; the service answers with
/// either `{"error": ...}` or `{"message": ...}` depending on the route.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| GENERIC_ERROR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(ApiConfig {
            base_url: "http://127.0.0.1:5000/api".into(),
        })
        .unwrap()
    }

    #[test]
    fn unscoped_and_scoped_paths() {
        let c = client();
        assert_eq!(
            c.url(&scoped("records", None)).unwrap().as_str(),
            "http://127.0.0.1:5000/api/records"
        );
        assert_eq!(
            c.url(&scoped("net-worth", Some("Alice"))).unwrap().as_str(),
            "http://127.0.0.1:5000/api/net-worth/Alice"
        );
    }

    #[test]
    fn individual_names_are_percent_encoded() {
        let c = client();
        let url = c.url(&scoped("records", Some("Mary Anne"))).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/api/records/Mary%20Anne");
    }

    #[test]
    fn rejects_base_url_without_a_base() {
        let err = ApiClient::new(ApiConfig {
            base_url: "not a url".into(),
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[tokio::test]
    async fn whitespace_name_fails_locally() {
        let err = client().add_individual("   ").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn error_message_extraction() {
        assert_eq!(extract_error_message(r#"{"error":"nope"}"#), "nope");
        assert_eq!(extract_error_message(r#"{"message":"busy"}"#), "busy");
        assert_eq!(extract_error_message("<html>502</html>"), GENERIC_ERROR);
        assert_eq!(extract_error_message(""), GENERIC_ERROR);
        assert_eq!(extract_error_message(r#"{"error":42}"#), GENERIC_ERROR);
    }
}
