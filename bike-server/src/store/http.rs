//! REST document store client.
//!
//! Talks to a document store exposing a `stations` collection:
//!
//! - `GET  {base}/stations` lists every document
//! - `GET  {base}/stations/{key}` reads one (404 when absent)
//! - `POST {base}/stations` creates (409 when the key exists)
//! - `PUT  {base}/stations/{key}` upserts

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::model::Station;

use super::PrimaryStore;
use super::error::StoreError;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the HTTP document store client.
#[derive(Debug, Clone)]
pub struct HttpStoreConfig {
    /// API key for x-apikey header authentication
    pub api_key: String,
    /// Base URL of the store, without trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl HttpStoreConfig {
    /// Create a new config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_key: String::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Primary store backed by a REST document store.
#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDocumentStore {
    /// Create a new client.
    pub fn new(config: HttpStoreConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();

        if !config.api_key.is_empty() {
            let api_key =
                HeaderValue::from_str(&config.api_key).map_err(|_| StoreError::Api {
                    status: 0,
                    message: "Invalid API key format".to_string(),
                })?;
            headers.insert(HeaderName::from_static("x-apikey"), api_key);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/stations", self.base_url)
    }

    fn document_url(&self, key: &str) -> String {
        format!("{}/stations/{}", self.base_url, key)
    }
}

/// Map non-success statuses to errors, passing successful responses through.
async fn check_status(response: Response, key: Option<&str>) -> Result<Response, StoreError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(StoreError::Unauthorized);
    }

    if status == StatusCode::CONFLICT
        && let Some(key) = key
    {
        return Err(StoreError::Conflict {
            key: key.to_string(),
        });
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(StoreError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    Ok(response)
}

async fn parse_body<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| StoreError::Json {
        message: e.to_string(),
    })
}

impl PrimaryStore for HttpDocumentStore {
    fn list_all(&self) -> BoxFuture<'_, Result<Vec<Station>, StoreError>> {
        Box::pin(async move {
            let response = self.http.get(self.collection_url()).send().await?;
            let response = check_status(response, None).await?;
            let stations: Vec<Station> = parse_body(response).await?;
            debug!(count = stations.len(), "listed stations from document store");
            Ok(stations)
        })
    }

    fn read_by_key<'a>(
        &'a self,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Option<Station>, StoreError>> {
        Box::pin(async move {
            let response = self.http.get(self.document_url(key)).send().await?;
            if response.status() == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            let response = check_status(response, None).await?;
            Ok(Some(parse_body(response).await?))
        })
    }

    fn create<'a>(&'a self, station: &'a Station) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let key = station.key();
            let response = self
                .http
                .post(self.collection_url())
                .json(station)
                .send()
                .await?;
            check_status(response, Some(key.as_str())).await?;
            Ok(())
        })
    }

    fn upsert<'a>(&'a self, station: &'a Station) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let response = self
                .http
                .put(self.document_url(&station.key()))
                .json(station)
                .send()
                .await?;
            check_status(response, None).await?;
            Ok(())
        })
    }
}
