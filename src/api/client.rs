//! HTTP client for the hosted services API

use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, trace};

use crate::api::response::ApiResponse;
use crate::config::Config;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("API error ({status}): {body}")]
    Status { status: StatusCode, body: String },

    #[error("API errors: {0}")]
    Api(String),

    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response for {0} contained no result")]
    EmptyResult(String),
}

/// API client
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    per_page: u32,
}

impl ApiClient {
    /// Create a new API client. Fails when no API key is configured.
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let client = Client::builder()
            .user_agent(concat!("edgectl/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            api_key,
            per_page: config.per_page,
        })
    }

    /// Build request with authentication headers
    fn build_request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("APIKey {}", self.api_key))
            .header("Accept", "application/json")
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse<T>, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .build_request(Method::GET, &url)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        trace!("Response: {}", text);

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(ApiError::Status { status, body: text });
        }

        let api_response: ApiResponse<T> = serde_json::from_str(&text)?;

        if !api_response.success {
            return Err(ApiError::Api(api_response.error_summary()));
        }

        Ok(api_response)
    }

    /// Make a GET request and return its `result`
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_with_query(path, &[]).await
    }

    /// GET with query parameters; values are URL-encoded
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.send(path, query)
            .await?
            .result
            .ok_or_else(|| ApiError::EmptyResult(path.to_string()))
    }

    /// GET every page of a list endpoint
    pub async fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut page: u32 = 1;

        loop {
            let query = [("page", page.to_string()), ("per_page", self.per_page.to_string())];
            let response: ApiResponse<Vec<T>> = self.send(path, &query).await?;
            let batch = response.result.unwrap_or_default();
            let fetched = batch.len();
            items.extend(batch);

            let total_pages = response
                .result_info
                .as_ref()
                .and_then(|info| info.total_pages)
                .unwrap_or(page);

            if page >= total_pages || fetched == 0 {
                break;
            }
            page += 1;
        }

        debug!("Fetched {} items from {}", items.len(), path);
        Ok(items)
    }
}
