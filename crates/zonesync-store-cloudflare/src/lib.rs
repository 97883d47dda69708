//! Cloudflare record store adapter
//!
//! Implements [`RecordStore`] over the Cloudflare API v4:
//!
//! - query: GET `/zones/:zone_id/dns_records` with `name`/`type`/`comment`
//!   parameters for exact filters, or `comment.startswith` for prefix
//!   filters
//! - update: PATCH `/zones/:zone_id/dns_records/:record_id` with a full
//!   replacement of the `name`/`type`/`content`/`comment` fields
//!
//! The adapter is deliberately thin: no retries, no caching, no cardinality
//! checks — all of that is engine policy. It owns one long-lived HTTP
//! client and maps failures onto the shared error taxonomy.
//!
//! # Security
//!
//! The API token never appears in logs; the `Debug` implementation redacts
//! it.
//!
//! # Dry-run mode
//!
//! With dry-run enabled the adapter performs queries normally but logs
//! intended patches instead of sending them, so a deployment can be
//! validated without touching the zone.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};
use zonesync_core::error::{Error, Result};
use zonesync_core::record::{Filter, Record};
use zonesync_core::traits::RecordStore;

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// HTTP timeout for API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Record store over the Cloudflare API v4
pub struct CloudflareStore {
    api_token: String,
    zone_id: String,
    client: reqwest::Client,
    dry_run: bool,
}

impl fmt::Debug for CloudflareStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudflareStore")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// Query response envelope; only the record list is consumed
#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    result: Vec<Record>,
}

/// Patch body: the identifier is addressed in the URL, never in the body
#[derive(Serialize)]
struct PatchBody<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    content: &'a str,
    comment: &'a str,
}

impl CloudflareStore {
    /// Create a store adapter for one zone.
    ///
    /// # Errors
    ///
    /// Fails with a configuration error on an empty token or zone ID, and
    /// with a transport error if the HTTP client cannot be built.
    pub fn new(api_token: impl Into<String>, zone_id: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();
        let zone_id = zone_id.into();

        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }
        if zone_id.is_empty() {
            return Err(Error::config("Cloudflare zone ID cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_token,
            zone_id,
            client,
            dry_run: false,
        })
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn records_url(&self) -> String {
        format!("{CLOUDFLARE_API_BASE}/zones/{}/dns_records", self.zone_id)
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/{}", self.records_url(), id)
    }

    fn query_params(filter: &Filter) -> Vec<(&'static str, String)> {
        match filter {
            Filter::Exact { name, kind, tag } => {
                let mut params = vec![
                    ("name", name.clone()),
                    ("type", kind.as_str().to_string()),
                ];
                if let Some(tag) = tag {
                    params.push(("comment", tag.clone()));
                }
                params
            }
            Filter::TagPrefix(prefix) => vec![("comment.startswith", prefix.clone())],
        }
    }
}

#[async_trait]
impl RecordStore for CloudflareStore {
    async fn query(&self, filter: &Filter) -> Result<Vec<Record>> {
        debug!("querying records [{}]", filter);

        let response = self
            .client
            .get(self.records_url())
            .bearer_auth(&self.api_token)
            .query(&Self::query_params(filter))
            .send()
            .await
            .map_err(|e| Error::transport(format!("record query failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(format!(
                "record query returned status {status}"
            )));
        }

        let list: ListResponse = response
            .json()
            .await
            .map_err(|e| Error::decode(format!("record list body: {e}")))?;
        Ok(list.result)
    }

    async fn update(&self, record: &Record) -> Result<()> {
        let id = record
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                Error::config(format!(
                    "record {} has no identifier; it must come from a prior query",
                    record.name
                ))
            })?;

        if self.dry_run {
            info!(
                "dry-run: would patch {} {} -> {}",
                record.kind, record.name, record.content
            );
            return Ok(());
        }

        let body = PatchBody {
            name: &record.name,
            kind: record.kind.as_str(),
            content: &record.content,
            comment: &record.tag,
        };

        let response = self
            .client
            .patch(self.record_url(id))
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::transport(format!("record patch failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            debug!("patch request for {} succeeded", record.name);
            Ok(())
        } else {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error response".to_string());
            Err(Error::RemoteRejected {
                status: status.as_u16(),
                detail,
            })
        }
    }
}
