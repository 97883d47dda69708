//! HTTP-based public address discovery
//!
//! Asks an ipinfo.io-style service "what address do you see me as?", one
//! endpoint per address family. The service answers with a small JSON body
//! (`{"ip": "..."}`); the returned literal is parsed and checked against
//! the requested family, since a misrouted request (e.g. an IPv4-mapped
//! answer from the v6 endpoint) would otherwise poison every A or AAAA
//! record in the next cycle.
//!
//! Each family is resolved by an independent request; a failure on one
//! family carries no state that could affect the other.

use async_trait::async_trait;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;
use zonesync_core::error::{Error, Result};
use zonesync_core::traits::{AddressFamily, AddressSource};

/// Default IPv4 discovery endpoint
pub const DEFAULT_V4_URL: &str = "https://ipinfo.io";

/// Default IPv6 discovery endpoint
pub const DEFAULT_V6_URL: &str = "https://v6.ipinfo.io";

/// HTTP timeout for discovery requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Discovery service response; only the address field is consumed
#[derive(Debug, Deserialize)]
struct AddressResponse {
    ip: String,
}

/// Public address source over per-family HTTP endpoints
pub struct HttpAddressSource {
    v4_url: String,
    v6_url: String,
    client: reqwest::Client,
}

impl HttpAddressSource {
    /// Create a source using the default ipinfo.io endpoints
    pub fn new() -> Result<Self> {
        Self::with_urls(DEFAULT_V4_URL, DEFAULT_V6_URL)
    }

    /// Create a source with custom per-family endpoints
    pub fn with_urls(v4_url: impl Into<String>, v6_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            v4_url: v4_url.into(),
            v6_url: v6_url.into(),
            client,
        })
    }

    fn url_for(&self, family: AddressFamily) -> &str {
        match family {
            AddressFamily::V4 => &self.v4_url,
            AddressFamily::V6 => &self.v6_url,
        }
    }
}

#[async_trait]
impl AddressSource for HttpAddressSource {
    async fn resolve(&self, family: AddressFamily) -> Result<IpAddr> {
        let url = self.url_for(family);
        debug!("resolving {} address via {}", family, url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::transport(format!("address request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(format!(
                "address service returned status {status}"
            )));
        }

        let body: AddressResponse = response
            .json()
            .await
            .map_err(|e| Error::decode(format!("address response body: {e}")))?;

        let address: IpAddr = body
            .ip
            .trim()
            .parse()
            .map_err(|_| Error::decode(format!("invalid address literal: {:?}", body.ip)))?;

        if !family.matches(address) {
            return Err(Error::decode(format!(
                "expected an {family} address, got {address}"
            )));
        }

        Ok(address)
    }
}
