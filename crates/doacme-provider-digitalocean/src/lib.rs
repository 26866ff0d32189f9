// # DigitalOcean Record Store
//
// This crate provides a DigitalOcean domain-records implementation of the
// doacme `RecordStore` trait.
//
// ## Behavior
//
// - One HTTP request per trait call
// - Errors are mapped from HTTP status codes and returned; never retried
// - HTTP timeout configured on the client (30 seconds)
// - Pagination follows `links.pages.next` from the listing response
// - Dry-run mode: listings are real, mutations are logged and answered locally
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - An empty token is rejected at construction
//
// ## API Reference
//
// - DigitalOcean API v2: https://docs.digitalocean.com/reference/api/
// - List records:  GET    `/v2/domains/:domain/records?page=N&per_page=M`
// - Create record: POST   `/v2/domains/:domain/records`
// - Update record: PUT    `/v2/domains/:domain/records/:id`
// - Delete record: DELETE `/v2/domains/:domain/records/:id`

use async_trait::async_trait;
use doacme_core::traits::{PageToken, RecordPage, RecordRequest, RecordStore};
use doacme_core::{Error, RemoteRecord, Result};
use serde::Deserialize;
use std::time::Duration;

/// DigitalOcean API base URL
pub const DIGITALOCEAN_API_BASE: &str = "https://api.digitalocean.com/v2";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of records requested per listing page (API maximum is 200)
pub const DEFAULT_PAGE_SIZE: u32 = 100;

const PROVIDER: &str = "digitalocean";

/// DigitalOcean record store
///
/// Stateless and single-shot: every trait call is exactly one HTTP request
/// (none at all for mutations in dry-run mode).
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the store will:
/// - Perform listing requests
/// - Log the intended POST/PUT/DELETE payload
/// - **NOT** modify any record, answering as if the call succeeded
pub struct DigitalOceanStore {
    /// DigitalOcean API token
    /// ⚠️ NEVER log this value
    token: String,

    /// API base URL, without trailing slash
    base_url: String,

    /// Records requested per listing page
    page_size: u32,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform listings but skip mutations
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for DigitalOceanStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigitalOceanStore")
            .field("token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl DigitalOceanStore {
    /// Create a new DigitalOcean store
    ///
    /// # Parameters
    ///
    /// - `token`: DigitalOcean API token with domain write scope
    /// - `dry_run`: If true, perform listings but skip mutations
    ///
    /// # Returns
    ///
    /// `Err(Error::Config)` if the token is empty
    pub fn new(token: impl Into<String>, dry_run: bool) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::config("DigitalOcean API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            token,
            base_url: DIGITALOCEAN_API_BASE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            client,
            dry_run,
        })
    }

    /// Create a new store in live mode
    pub fn new_live(token: impl Into<String>) -> Result<Self> {
        Self::new(token, false)
    }

    /// Create a new store in dry-run mode
    pub fn new_dry_run(token: impl Into<String>) -> Result<Self> {
        Self::new(token, true)
    }

    /// Point the store at a different API root (e.g. a proxy or test server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the number of records requested per page (clamped to 1..=200)
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, 200);
        self
    }

    /// Whether mutations are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn records_url(&self, domain: &str) -> String {
        format!("{}/domains/{}/records", self.base_url, domain)
    }

    fn record_url(&self, domain: &str, record_id: &str) -> String {
        format!("{}/domains/{}/records/{}", self.base_url, domain, record_id)
    }

    /// Send an authenticated request and map non-success statuses to errors
    async fn send(&self, request: reqwest::RequestBuilder, context: &str) -> Result<reqwest::Response> {
        let response = request
            .bearer_auth(&self.token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::http(format!("{}: request failed: {}", context, e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        Err(match status.as_u16() {
            401 | 403 => Error::auth(format!(
                "Invalid API token or insufficient permissions. Status: {}",
                status
            )),
            404 => Error::not_found(format!("{}: {}", context, error_text)),
            429 => Error::rate_limited(format!(
                "Rate limit exceeded. Please retry later. Status: {}",
                status
            )),
            500..=599 => Error::provider(
                PROVIDER,
                format!("DigitalOcean server error (transient): {} - {}", status, error_text),
            ),
            _ => Error::provider(
                PROVIDER,
                format!("{} failed: {} - {}", context, status, error_text),
            ),
        })
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to parse response: {}", e)))
    }
}

/// Extract the `page` query parameter from a `links.pages.next` URL
fn next_page_token(next: &str) -> Result<PageToken> {
    let url = reqwest::Url::parse(next)
        .map_err(|e| Error::provider(PROVIDER, format!("Invalid next page link: {}", e)))?;

    url.query_pairs()
        .find(|(key, _)| key == "page")
        .map(|(_, value)| PageToken::new(value.into_owned()))
        .ok_or_else(|| {
            Error::provider(PROVIDER, format!("Next page link has no page number: {}", next))
        })
}

/// Listing response body
#[derive(Debug, Deserialize)]
struct RecordsResponse {
    domain_records: Vec<ApiRecord>,
    #[serde(default)]
    links: Links,
}

#[derive(Debug, Default, Deserialize)]
struct Links {
    #[serde(default)]
    pages: Option<Pages>,
}

#[derive(Debug, Deserialize)]
struct Pages {
    #[serde(default)]
    next: Option<String>,
}

/// Single-record response body (create and update)
#[derive(Debug, Deserialize)]
struct RecordResponse {
    domain_record: ApiRecord,
}

/// A domain record as returned by the API
#[derive(Debug, Deserialize)]
struct ApiRecord {
    id: u64,
    #[serde(rename = "type")]
    record_type: String,
    name: String,
    #[serde(default)]
    data: String,
    #[serde(default)]
    ttl: u32,
    #[serde(default)]
    priority: Option<u32>,
    #[serde(default)]
    port: Option<u32>,
    #[serde(default)]
    weight: Option<u32>,
}

impl From<ApiRecord> for RemoteRecord {
    fn from(record: ApiRecord) -> Self {
        Self {
            id: record.id.to_string(),
            record_type: record.record_type,
            name: record.name,
            data: record.data,
            ttl: record.ttl,
            priority: record.priority,
            port: record.port,
            weight: record.weight,
        }
    }
}

#[async_trait]
impl RecordStore for DigitalOceanStore {
    /// List one page of domain records
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /v2/domains/:domain/records?page=N&per_page=M
    /// Authorization: Bearer <token>
    /// ```
    async fn list_records(&self, domain: &str, page: Option<PageToken>) -> Result<RecordPage> {
        let page_number = page.as_ref().map_or("1", PageToken::as_str);
        let page_size = self.page_size.to_string();
        tracing::debug!("Listing DigitalOcean records for {} (page {})", domain, page_number);

        let request = self
            .client
            .get(self.records_url(domain))
            .query(&[("page", page_number), ("per_page", page_size.as_str())]);
        let response = self.send(request, "List records").await?;
        let body: RecordsResponse = Self::parse(response).await?;

        let next = match body.links.pages.and_then(|pages| pages.next) {
            Some(link) => Some(next_page_token(&link)?),
            None => None,
        };

        Ok(RecordPage {
            records: body.domain_records.into_iter().map(RemoteRecord::from).collect(),
            next,
        })
    }

    /// Create a domain record
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /v2/domains/:domain/records
    /// { "type": "TXT", "name": "...", "data": "...", "ttl": 3600 }
    /// ```
    async fn create_record(&self, domain: &str, request: &RecordRequest) -> Result<RemoteRecord> {
        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send POST request to {} with payload: {}",
                self.records_url(domain),
                serde_json::to_string(request)?
            );
            return Ok(RemoteRecord::from_request("dry-run", request));
        }

        let http = self.client.post(self.records_url(domain)).json(request);
        let response = self.send(http, "Create record").await?;
        let body: RecordResponse = Self::parse(response).await?;

        Ok(body.domain_record.into())
    }

    /// Update a domain record
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /v2/domains/:domain/records/:id
    /// { "type": "TXT", "name": "...", "data": "...", "ttl": 3600 }
    /// ```
    async fn edit_record(
        &self,
        domain: &str,
        record_id: &str,
        request: &RecordRequest,
    ) -> Result<RemoteRecord> {
        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PUT request to {} with payload: {}",
                self.record_url(domain, record_id),
                serde_json::to_string(request)?
            );
            return Ok(RemoteRecord::from_request(record_id, request));
        }

        let http = self.client.put(self.record_url(domain, record_id)).json(request);
        let response = self.send(http, "Update record").await?;
        let body: RecordResponse = Self::parse(response).await?;

        Ok(body.domain_record.into())
    }

    /// Delete a domain record
    ///
    /// # API Call
    ///
    /// ```http
    /// DELETE /v2/domains/:domain/records/:id
    /// ```
    async fn delete_record(&self, domain: &str, record_id: &str) -> Result<()> {
        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send DELETE request to {}",
                self.record_url(domain, record_id)
            );
            return Ok(());
        }

        let http = self.client.delete(self.record_url(domain, record_id));
        self.send(http, "Delete record").await?;
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        PROVIDER
    }
}
