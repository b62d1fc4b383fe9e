//! Search provider client.

use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    config::SearchConfig,
    error::{Result, SearchError},
};

/// Provider engine selected by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engine {
    GoogleHotels,
    GoogleFlights,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::GoogleHotels => "google_hotels",
            Engine::GoogleFlights => "google_flights",
        }
    }
}

/// Flat provider parameters: an engine plus string key/value pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    engine: Engine,
    params: BTreeMap<String, String>,
}

impl SearchParams {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            params: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    pub fn with_optional(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Query pairs in key order, starting with `engine`.
    pub fn to_query(&self) -> Vec<(&str, &str)> {
        std::iter::once(("engine", self.engine.as_str()))
            .chain(self.params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .collect()
    }
}

/// Anything that can turn search parameters into a raw provider response.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, params: &SearchParams) -> Result<Value>;
}

/// SerpAPI over HTTPS.
#[derive(Clone)]
pub struct SerpApiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl SerpApiClient {
    /// Build a client; fails when no API key is configured.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        config.validate()?;
        let api_key = config.require_api_key()?.to_string();
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }
}

impl std::fmt::Debug for SerpApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpApiClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SearchClient for SerpApiClient {
    async fn search(&self, params: &SearchParams) -> Result<Value> {
        let mut query = params.to_query();
        query.push(("output", "json"));
        query.push(("api_key", self.api_key.as_str()));

        debug!(
            "Requesting {} from {}",
            params.engine().as_str(),
            self.endpoint
        );
        let response = self.http.get(&self.endpoint).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = provider_error(&body).unwrap_or(body);
            return Err(SearchError::Status {
                status: status.as_u16(),
                body: body.chars().take(512).collect(),
            });
        }

        let body: Value = response.json().await?;
        check_payload(body)
    }
}

/// The provider's `"error"` message, when the body is JSON carrying one.
fn provider_error(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .map(str::to_string)
}

/// The provider reports an empty result set as an `"error"` on a successful search.
fn is_empty_result(body: &Value, message: &str) -> bool {
    body.pointer("/search_metadata/status")
        .and_then(Value::as_str)
        .is_some_and(|status| status.eq_ignore_ascii_case("success"))
        || message.contains("hasn't returned any results")
}

fn check_payload(body: Value) -> Result<Value> {
    if let Some(message) = body.get("error").and_then(Value::as_str) {
        if is_empty_result(&body, message) {
            debug!("Search provider returned no results: {}", message);
            return Ok(body);
        }
        return Err(SearchError::provider(message));
    }
    if !body.is_object() {
        return Err(SearchError::MalformedResponse(
            "expected a JSON object at the top level".to_string(),
        ));
    }
    Ok(body)
}

/// Offline client answering every request with the same payload or failure.
///
/// Records how often it was called and the last parameters it saw.
#[derive(Debug)]
pub struct StaticClient {
    response: std::result::Result<Value, String>,
    calls: AtomicUsize,
    last_params: Mutex<Option<SearchParams>>,
}

impl StaticClient {
    /// Answer with `payload`.
    pub fn new(payload: Value) -> Self {
        Self {
            response: Ok(payload),
            calls: AtomicUsize::new(0),
            last_params: Mutex::new(None),
        }
    }

    /// Fail every request with a provider error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            calls: AtomicUsize::new(0),
            last_params: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn last_params(&self) -> Option<SearchParams> {
        self.last_params.lock().await.clone()
    }
}

#[async_trait]
impl SearchClient for StaticClient {
    async fn search(&self, params: &SearchParams) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_params.lock().await = Some(params.clone());
        match &self.response {
            Ok(payload) => Ok(payload.clone()),
            Err(message) => Err(SearchError::provider(message.clone())),
        }
    }
}
