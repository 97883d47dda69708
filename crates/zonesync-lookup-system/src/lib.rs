//! Convergence lookups over the system resolver
//!
//! Implements the [`Lookup`] seam with ordinary DNS resolution through the
//! platform's configured nameservers. This is the independent observation
//! channel the convergence verifier polls: it must not share a path with
//! the store adapter, or "the update is visible" would mean nothing.
//!
//! An NXDOMAIN or empty answer is reported as an empty value set — that is
//! propagation lag, which the verifier is built to wait through. Every
//! other resolution failure is a transport error.

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use tracing::warn;
use zonesync_core::error::{Error, Result};
use zonesync_core::record::RecordKind;
use zonesync_core::traits::Lookup;

/// Lookup channel over the system resolver
pub struct SystemLookup {
    resolver: TokioAsyncResolver,
}

impl SystemLookup {
    /// Create a lookup channel from the system resolver configuration
    /// (`/etc/resolv.conf` on Unix), falling back to well-known public
    /// defaults when it cannot be read.
    pub fn new() -> Self {
        let resolver = match TokioAsyncResolver::tokio_from_system_conf() {
            Ok(resolver) => resolver,
            Err(e) => {
                warn!(
                    "failed to read system resolver configuration ({}); using defaults",
                    e
                );
                TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
            }
        };
        Self { resolver }
    }
}

impl Default for SystemLookup {
    fn default() -> Self {
        Self::new()
    }
}

/// "The name has no such records yet" as opposed to "resolution broke"
fn absent(err: &ResolveError) -> bool {
    matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. })
}

#[async_trait]
impl Lookup for SystemLookup {
    async fn lookup(&self, name: &str, kind: RecordKind) -> Result<Vec<String>> {
        let result: std::result::Result<Vec<String>, ResolveError> = match kind {
            RecordKind::Txt => self.resolver.txt_lookup(name).await.map(|lookup| {
                lookup
                    .iter()
                    .map(|txt| {
                        // A TXT record is a sequence of byte chunks; the
                        // published value is their concatenation.
                        txt.iter()
                            .map(|data| String::from_utf8_lossy(data).to_string())
                            .collect::<Vec<_>>()
                            .join("")
                    })
                    .collect()
            }),
            RecordKind::A => self
                .resolver
                .ipv4_lookup(name)
                .await
                .map(|lookup| lookup.iter().map(|a| a.to_string()).collect()),
            RecordKind::Aaaa => self
                .resolver
                .ipv6_lookup(name)
                .await
                .map(|lookup| lookup.iter().map(|aaaa| aaaa.to_string()).collect()),
        };

        match result {
            Ok(values) => Ok(values),
            Err(e) if absent(&e) => Ok(Vec::new()),
            Err(e) => Err(Error::transport(format!("lookup of {name} failed: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn constructs_from_system_configuration_or_defaults() {
        // Construction must not panic whether or not a resolv.conf exists.
        let _ = SystemLookup::new();
    }
}
