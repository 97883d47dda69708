//! Dynamic DNS reconciliation flow
//!
//! Runs forever on a fixed interval, strictly sequentially: a cycle starts
//! only after the previous one fully completed. Each cycle resolves the
//! host's public addresses and patches every managed record whose type has
//! an address this cycle.
//!
//! The managed set is discovered once per process start from the tag-prefix
//! query and cached for the process lifetime; new records tagged at runtime
//! are picked up on the next restart. That limitation is deliberate.
//!
//! Partial failure is the normal case, not the exception: one family's
//! resolution failing skips that family's records for the cycle, and one
//! record's rejection never blocks its siblings.

use crate::config::SyncConfig;
use crate::error::{Error, Result};
use crate::record::{Filter, Record, RecordKind};
use crate::traits::{AddressFamily, AddressSource, RecordStore};
use chrono::{SecondsFormat, Utc};
use std::collections::HashSet;
use std::net::IpAddr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Summary of one reconciliation cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Records patched successfully
    pub updated: usize,
    /// Records left untouched because their family had no address this cycle
    pub skipped: usize,
    /// Records whose patch the store rejected or that failed in transit
    pub failed: usize,
}

/// Addresses resolved for the current cycle; never reused across cycles
#[derive(Debug, Clone, Copy, Default)]
struct ResolvedAddresses {
    v4: Option<IpAddr>,
    v6: Option<IpAddr>,
}

impl ResolvedAddresses {
    fn get(&self, family: AddressFamily) -> Option<IpAddr> {
        match family {
            AddressFamily::V4 => self.v4,
            AddressFamily::V6 => self.v6,
        }
    }
}

/// Multi-record tagged-set IP synchronization engine
pub struct SyncEngine {
    store: Box<dyn RecordStore>,
    addresses: Box<dyn AddressSource>,
    config: SyncConfig,
}

impl SyncEngine {
    /// Create the engine; fails fast on invalid configuration
    pub fn new(
        store: Box<dyn RecordStore>,
        addresses: Box<dyn AddressSource>,
        config: SyncConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            addresses,
            config,
        })
    }

    /// Query the managed record set and validate it.
    ///
    /// Called once per process start; the returned set is reused for every
    /// cycle. Duplicate (name, type) pairs are reported but kept — updates
    /// to them are last-writer-wins by design.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] when the tagged set contains a record whose type
    /// cannot be satisfied in this deployment: a type that never carries an
    /// address (TXT), or one whose family is not enabled. The operator is
    /// expected to tag only records this deployment can resolve.
    pub async fn discover(&self) -> Result<Vec<Record>> {
        let filter = Filter::TagPrefix(self.config.tag_prefix.clone());
        let records = self.store.query(&filter).await?;
        info!(
            "managing {} record(s) tagged with prefix '{}'",
            records.len(),
            self.config.tag_prefix
        );

        for (name, kind) in duplicate_keys(&records) {
            warn!(
                "tag prefix matches more than one {} record named {}; their updates will overwrite each other",
                kind, name
            );
        }

        for record in &records {
            let Some(family) = AddressFamily::for_record(record.kind) else {
                return Err(Error::config(format!(
                    "tagged record {} has type {}, which cannot carry a public address",
                    record.name, record.kind
                )));
            };
            if !self.config.families.contains(&family) {
                return Err(Error::config(format!(
                    "tagged record {} needs an {} address, but that family is not enabled here",
                    record.name, family
                )));
            }
            if record.id.as_deref().unwrap_or("").is_empty() {
                return Err(Error::decode(format!(
                    "store returned record {} without an identifier",
                    record.name
                )));
            }
        }

        Ok(records)
    }

    /// Run one reconciliation cycle over the cached record set.
    ///
    /// Issues at most one update per record, and only for records whose
    /// type has a freshly resolved address. Per-record failures are logged
    /// and counted, never propagated.
    pub async fn run_cycle(&self, records: &[Record]) -> Result<CycleReport> {
        if records.is_empty() {
            info!("nothing to update");
            return Ok(CycleReport::default());
        }

        let addresses = self.resolve_addresses().await;
        let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        // The stamp extends the selection prefix so restamped records still
        // match the filter on the next discovery.
        let tag = format!("{}updated/{}", self.config.tag_prefix, stamp);

        let mut report = CycleReport::default();
        for record in records {
            let family = AddressFamily::for_record(record.kind).ok_or_else(|| {
                Error::config(format!(
                    "tagged record {} has type {}, which cannot carry a public address",
                    record.name, record.kind
                ))
            })?;

            let Some(address) = addresses.get(family) else {
                debug!(
                    "no {} address available this cycle; leaving {} untouched",
                    family, record.name
                );
                report.skipped += 1;
                continue;
            };

            let update = record
                .clone()
                .with_content(address.to_string())
                .with_tag(tag.clone());
            match self.store.update(&update).await {
                Ok(()) => {
                    info!("updated {} {} -> {}", update.kind, update.name, update.content);
                    report.updated += 1;
                }
                Err(e) => {
                    warn!("failed to update record {}: {}", record.name, e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    /// Discover the managed set, then reconcile forever.
    ///
    /// There is no cancellation point mid-cycle; process termination is the
    /// only stop signal, and each cycle is small enough for that to be an
    /// acceptable shutdown contract.
    pub async fn run(&self) -> Result<()> {
        let records = self.discover().await?;
        let interval = Duration::from_secs(self.config.interval_secs);

        loop {
            self.run_cycle(&records).await?;
            tokio::time::sleep(interval).await;
        }
    }

    /// Resolve every enabled family concurrently. Both resolutions complete
    /// (or are individually marked failed) before the update phase begins;
    /// an address is never carried over from a previous cycle.
    async fn resolve_addresses(&self) -> ResolvedAddresses {
        let (v4, v6) = tokio::join!(
            self.resolve_family(AddressFamily::V4),
            self.resolve_family(AddressFamily::V6),
        );
        ResolvedAddresses { v4, v6 }
    }

    async fn resolve_family(&self, family: AddressFamily) -> Option<IpAddr> {
        if !self.config.families.contains(&family) {
            return None;
        }
        match self.addresses.resolve(family).await {
            Ok(address) => {
                info!("current {} address is {}", family, address);
                Some(address)
            }
            Err(e) => {
                warn!("failed to resolve {} address: {}", family, e);
                None
            }
        }
    }
}

/// Return every (name, type) pair that appears more than once in `records`.
///
/// The prefix query has no cardinality contract, so collisions are possible
/// and must be reported rather than silently updated.
pub fn duplicate_keys(records: &[Record]) -> Vec<(String, RecordKind)> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for record in records {
        let key = (record.name.clone(), record.kind);
        if !seen.insert(key.clone()) && !duplicates.contains(&key) {
            duplicates.push(key);
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, kind: RecordKind) -> Record {
        Record {
            name: name.to_string(),
            kind,
            content: String::new(),
            tag: "ddns/".to_string(),
            id: Some("id".to_string()),
        }
    }

    #[test]
    fn duplicate_keys_reports_each_collision_once() {
        let records = vec![
            record("a.example.com", RecordKind::A),
            record("a.example.com", RecordKind::A),
            record("a.example.com", RecordKind::A),
            record("a.example.com", RecordKind::Aaaa),
            record("b.example.com", RecordKind::A),
        ];

        let duplicates = duplicate_keys(&records);
        assert_eq!(
            duplicates,
            vec![("a.example.com".to_string(), RecordKind::A)]
        );
    }

    #[test]
    fn duplicate_keys_is_empty_for_distinct_records() {
        let records = vec![
            record("a.example.com", RecordKind::A),
            record("a.example.com", RecordKind::Aaaa),
        ];
        assert!(duplicate_keys(&records).is_empty());
    }
}
