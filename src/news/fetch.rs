use super::model::{Article, SearchResponse};
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://newsapi.org/v2/everything";
pub const MAX_PAGE_SIZE: u8 = 100;

// 5 MB cap on a single response body
const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("invalid endpoint {endpoint}: {source}")]
    Endpoint {
        endpoint: String,
        source: url::ParseError,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned status {status:?}: {payload}")]
    Api {
        status: String,
        code: Option<String>,
        message: Option<String>,
        payload: String,
    },

    #[error("response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response body exceeded {0} bytes")]
    BodyTooLarge(usize),
}

/// Query for one page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub language: String,
    pub sort_by: String,
    pub page_size: u8,
    pub domains: Vec<String>,
}

impl SearchParams {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.query.clone()),
            ("language", self.language.clone()),
            ("sortBy", self.sort_by.clone()),
            ("pageSize", self.page_size.clamp(1, MAX_PAGE_SIZE).to_string()),
            ("domains", self.domains.join(",")),
        ]
    }
}

/// Client for the news search endpoint. Holds its credential explicitly.
pub struct NewsClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl NewsClient {
    pub fn new(endpoint: &str, api_key: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .user_agent(concat!("cyber-news/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .connect_timeout(Duration::from_secs(5));
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Self::with_client(builder.build()?, endpoint, api_key)
    }

    pub(crate) fn with_client(client: Client, endpoint: &str, api_key: &str) -> Result<Self, FetchError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(FetchError::MissingApiKey);
        }
        let endpoint = Url::parse(endpoint).map_err(|source| FetchError::Endpoint {
            endpoint: endpoint.to_string(),
            source,
        })?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
        })
    }

    /// Fetch a single page. An "ok" response with no articles is an empty
    /// `Vec`, not an error.
    pub async fn search(&self, params: &SearchParams) -> Result<Vec<Article>, FetchError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            page_size = params.page_size,
            domains = params.domains.len(),
            "searching news"
        );

        let mut query = params.query_pairs();
        query.push(("apiKey", self.api_key.clone()));

        let resp = self
            .client
            .get(self.endpoint.clone())
            .query(&query)
            .send()
            .await
            .inspect_err(|err| tracing::warn!(%err, "news request failed"))?;
        let status = resp.status();

        // Stream with a max size limit
        let mut stream = resp.bytes_stream();
        let mut buf: Vec<u8> = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if buf.len() + chunk.len() > MAX_BODY_BYTES {
                tracing::warn!(limit = MAX_BODY_BYTES, "news response too large");
                return Err(FetchError::BodyTooLarge(MAX_BODY_BYTES));
            }
            buf.extend_from_slice(&chunk);
        }

        let articles = interpret(status, &buf)
            .inspect_err(|err| tracing::warn!(%status, %err, "news API rejected the search"))?;
        tracing::info!(count = articles.len(), "fetched articles");
        Ok(articles)
    }
}

/// Turn a raw response into articles or the matching [`FetchError`].
pub fn interpret(status: StatusCode, body: &[u8]) -> Result<Vec<Article>, FetchError> {
    let payload = || String::from_utf8_lossy(body).into_owned();
    match serde_json::from_slice::<SearchResponse>(body) {
        Ok(resp) if resp.is_ok() => {
            tracing::debug!(total = resp.total_results, "search matched");
            Ok(resp.articles.unwrap_or_default())
        }
        Ok(resp) => Err(FetchError::Api {
            status: resp.status.unwrap_or_else(|| "missing".into()),
            code: resp.code,
            message: resp.message,
            payload: payload(),
        }),
        Err(_) if !status.is_success() => Err(FetchError::Api {
            status: format!("HTTP {}", status.as_u16()),
            code: None,
            message: status.canonical_reason().map(str::to_string),
            payload: payload(),
        }),
        Err(err) => Err(FetchError::Decode(err)),
    }
}
