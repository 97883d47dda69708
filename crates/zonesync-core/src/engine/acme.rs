//! ACME DNS-01 validation-token flow
//!
//! Single pass: locate exactly one `_acme-challenge` TXT record, replace its
//! content with the validation token, then confirm the new value is visible
//! through independent resolution.
//!
//! A confirmation timeout is deliberately non-fatal. This tool's job is
//! best-effort confirmation — the certificate issuer may still observe the
//! value after this process has given up waiting.

use crate::config::AcmeConfig;
use crate::error::{Error, Result};
use crate::record::{Filter, RecordKind};
use crate::traits::RecordStore;
use crate::verify::{Convergence, ConvergenceVerifier};
use std::time::Duration;
use tracing::{info, warn};

/// Single-record validation-token replacement flow
pub struct AcmeFlow {
    store: Box<dyn RecordStore>,
    verifier: ConvergenceVerifier,
    config: AcmeConfig,
}

impl AcmeFlow {
    /// Create the flow; fails fast on invalid configuration
    pub fn new(
        store: Box<dyn RecordStore>,
        verifier: ConvergenceVerifier,
        config: AcmeConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            verifier,
            config,
        })
    }

    /// The challenge record name for a domain
    pub fn challenge_name(domain: &str) -> String {
        format!("_acme-challenge.{domain}")
    }

    /// Publish the validation token and wait for it to become visible.
    ///
    /// # Errors
    ///
    /// - [`Error::AmbiguousOrMissing`] when the filter does not match
    ///   exactly one record — misconfiguration, not transient state, so no
    ///   update is issued and nothing is retried
    /// - any store or lookup error, all of which are fatal in this flow
    pub async fn run(&self) -> Result<Convergence> {
        let filter = Filter::Exact {
            name: Self::challenge_name(&self.config.domain),
            kind: RecordKind::Txt,
            tag: self.config.tag.clone(),
        };

        let mut matches = self.store.query(&filter).await?;
        if matches.len() != 1 {
            return Err(Error::AmbiguousOrMissing {
                filter: filter.to_string(),
                found: matches.len(),
            });
        }

        // Replace the validation content only; name, type, tag, and
        // identifier are carried over from the queried record.
        let record = matches.remove(0).with_content(self.config.token.clone());
        info!("publishing validation token to {}", record.name);
        self.store.update(&record).await?;

        let outcome = self
            .verifier
            .confirm(
                &record.name,
                record.kind,
                &self.config.token,
                self.config.confirm_attempts,
                Duration::from_secs(self.config.confirm_delay_secs),
            )
            .await?;

        match outcome {
            Convergence::Converged { attempts } => {
                info!(
                    "validation record confirmed visible after {} lookup(s)",
                    attempts
                );
            }
            Convergence::TimedOut { attempts } => {
                warn!(
                    "validation record not visible after {} lookup(s); propagation may still complete",
                    attempts
                );
            }
        }

        Ok(outcome)
    }
}
