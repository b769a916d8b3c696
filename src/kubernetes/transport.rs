// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Resource list wire types and HTTP transport
//!
//! The provider only needs `GET(url) -> list of raw items`; everything
//! else about the Kubernetes API stays outside this crate. The shipped
//! [`HttpTransport`] follows continuation tokens so callers always see
//! the complete list, and retries transient failures with exponential
//! backoff.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Timeout for connecting to the API
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for reading API responses
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum retry attempts for transient failures
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (doubles each retry)
const RETRY_BASE_DELAY: Duration = Duration::from_millis(100);

/// Page size for paginated list requests
/// Smaller pages reduce memory pressure and allow faster initial response
const PAGE_LIMIT: u32 = 500;

/// Continuation metadata of a list response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMeta {
    /// Continue token; present when the server has more pages
    #[serde(rename = "continue")]
    pub continue_: Option<String>,
    #[serde(rename = "resourceVersion")]
    pub resource_version: Option<String>,
}

/// One page (or the concatenation of all pages) of a resource list
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceList<S> {
    // An explicit default path keeps serde from requiring S: Default
    // on the derived Deserialize impl.
    #[serde(default = "Vec::new")]
    pub items: Vec<S>,
    #[serde(default)]
    pub metadata: ListMeta,
}

/// Fetches a raw resource list from a URL.
///
/// The provider treats any non-success outcome as an opaque failure to
/// propagate; implementations decide what is worth retrying internally.
#[async_trait]
pub trait ListTransport<S>: Send + Sync {
    async fn list(&self, url: &str) -> Result<ResourceList<S>>;
}

/// reqwest-backed transport with retry and continue-token pagination
pub struct HttpTransport {
    client: reqwest::Client,
    page_limit: u32,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(READ_TIMEOUT)
            .build()
            .map_err(|e| Error::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client))
    }

    /// Use a caller-configured client (auth headers, proxies, TLS).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            page_limit: PAGE_LIMIT,
        }
    }

    /// Append paging parameters to a list URL
    fn page_url(url: &str, limit: u32, token: Option<&str>) -> String {
        let sep = if url.contains('?') { '&' } else { '?' };
        match token {
            Some(token) => format!("{url}{sep}limit={limit}&continue={token}"),
            None => format!("{url}{sep}limit={limit}"),
        }
    }

    /// Check if an HTTP status is worth retrying (transient failures)
    fn is_retryable_status(status: u16) -> bool {
        matches!(status, 429 | 503 | 504)
    }

    /// Fetch a single page with retry logic
    async fn get_page<S>(&self, url: String) -> Result<ResourceList<S>>
    where
        S: DeserializeOwned,
    {
        let url = url.as_str();
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            let retryable = match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json::<ResourceList<S>>().await.map_err(|e| {
                            Error::Transport(format!("malformed resource list from {url}: {e}"))
                        });
                    }
                    if !Self::is_retryable_status(status.as_u16()) {
                        return Err(Error::Transport(format!("HTTP {status} from {url}")));
                    }
                    format!("HTTP {status}")
                }
                Err(e) if e.is_connect() || e.is_timeout() => e.to_string(),
                Err(e) => return Err(Error::Transport(format!("request to {url} failed: {e}"))),
            };

            let delay = RETRY_BASE_DELAY * 2u32.pow(attempt);
            warn!(
                url = %url,
                attempt = attempt + 1,
                max_attempts = MAX_RETRIES,
                delay_ms = delay.as_millis() as u64,
                error = %retryable,
                "Retryable error, backing off"
            );
            tokio::time::sleep(delay).await;
            last_error = Some(retryable);
        }

        Err(Error::Transport(format!(
            "failed after {} retries: {}",
            MAX_RETRIES,
            last_error.unwrap_or_default()
        )))
    }
}

/// Follow continue tokens until the server stops returning one,
/// concatenating items in arrival order
async fn collect_pages<S, F, Fut>(url: &str, limit: u32, mut fetch_page: F) -> Result<ResourceList<S>>
where
    F: FnMut(String) -> Fut,
    Fut: std::future::Future<Output = Result<ResourceList<S>>>,
{
    let mut all_items = Vec::new();
    let mut continue_token: Option<String> = None;
    let mut resource_version = None;
    let mut page_count = 0u32;

    loop {
        let page_url = HttpTransport::page_url(url, limit, continue_token.as_deref());
        let page = fetch_page(page_url).await?;

        let items_this_page = page.items.len();
        all_items.extend(page.items);
        page_count += 1;
        if page.metadata.resource_version.is_some() {
            resource_version = page.metadata.resource_version;
        }

        match page.metadata.continue_ {
            Some(token) if !token.is_empty() => {
                debug!(
                    url = %url,
                    page = page_count,
                    items_this_page,
                    total_so_far = all_items.len(),
                    "Fetched page, continuing"
                );
                continue_token = Some(token);
            }
            _ => break,
        }
    }

    debug!(url = %url, pages = page_count, total_items = all_items.len(), "List complete");

    Ok(ResourceList {
        items: all_items,
        metadata: ListMeta {
            continue_: None,
            resource_version,
        },
    })
}

#[async_trait]
impl<S> ListTransport<S> for HttpTransport
where
    S: DeserializeOwned + Send + 'static,
{
    /// List all items, following continue tokens until exhausted
    async fn list(&self, url: &str) -> Result<ResourceList<S>> {
        collect_pages(url, self.page_limit, |page_url| self.get_page(page_url)).await
    }
}
