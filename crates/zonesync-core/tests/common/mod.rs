//! Test doubles and shared helpers for the flow contract tests
//!
//! The doubles implement the core traits over in-memory state with atomic
//! call counters, so tests can assert exactly which remote operations a
//! flow issued. Cloning a double shares its counters and recorded calls.

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use zonesync_core::error::{Error, Result};
use zonesync_core::record::{Filter, Record, RecordKind};
use zonesync_core::traits::{AddressFamily, AddressSource, Lookup, RecordStore};

/// Build a record the way a store query would return it
pub fn record(name: &str, kind: RecordKind, content: &str, tag: &str, id: &str) -> Record {
    Record {
        name: name.to_string(),
        kind,
        content: content.to_string(),
        tag: tag.to_string(),
        id: Some(id.to_string()),
    }
}

/// A record store over a fixed record set, tracking queries and updates
#[derive(Clone, Default)]
pub struct MockRecordStore {
    records: Arc<Mutex<Vec<Record>>>,
    queries: Arc<Mutex<Vec<Filter>>>,
    updates: Arc<Mutex<Vec<Record>>>,
    update_calls: Arc<AtomicUsize>,
    rejected_ids: Arc<Mutex<HashSet<String>>>,
}

impl MockRecordStore {
    /// Store whose every query returns `records`
    pub fn with_records(records: Vec<Record>) -> Self {
        let store = Self::default();
        *store.records.lock().unwrap() = records;
        store
    }

    /// Make updates against the given identifier fail with `RemoteRejected`
    pub fn rejecting(self, id: &str) -> Self {
        self.rejected_ids.lock().unwrap().insert(id.to_string());
        self
    }

    /// Filters passed to `query`, in order
    pub fn queries(&self) -> Vec<Filter> {
        self.queries.lock().unwrap().clone()
    }

    /// Records passed to `update`, in order, including rejected attempts
    pub fn updates(&self) -> Vec<Record> {
        self.updates.lock().unwrap().clone()
    }

    /// Number of times `update` was called
    pub fn update_call_count(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RecordStore for MockRecordStore {
    async fn query(&self, filter: &Filter) -> Result<Vec<Record>> {
        self.queries.lock().unwrap().push(filter.clone());
        Ok(self.records.lock().unwrap().clone())
    }

    async fn update(&self, record: &Record) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.updates.lock().unwrap().push(record.clone());

        let rejected = record
            .id
            .as_deref()
            .is_some_and(|id| self.rejected_ids.lock().unwrap().contains(id));
        if rejected {
            return Err(Error::RemoteRejected {
                status: 400,
                detail: "record is locked".to_string(),
            });
        }
        Ok(())
    }
}

/// An address source with a fixed per-family outcome
#[derive(Clone, Default)]
pub struct MockAddressSource {
    v4: Option<IpAddr>,
    v6: Option<IpAddr>,
    resolve_calls: Arc<AtomicUsize>,
}

impl MockAddressSource {
    /// Source where `None` for a family means its resolution fails
    pub fn new(v4: Option<IpAddr>, v6: Option<IpAddr>) -> Self {
        Self {
            v4,
            v6,
            resolve_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times `resolve` was called, across both families
    pub fn resolve_call_count(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AddressSource for MockAddressSource {
    async fn resolve(&self, family: AddressFamily) -> Result<IpAddr> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        let address = match family {
            AddressFamily::V4 => self.v4,
            AddressFamily::V6 => self.v6,
        };
        address.ok_or_else(|| Error::transport(format!("{family} address service unreachable")))
    }
}

/// A lookup channel that replays a scripted sequence of answers
///
/// Each `lookup` call consumes the next scripted result; once the script is
/// exhausted, every further call returns an empty (not-yet-propagated)
/// answer set.
#[derive(Clone, Default)]
pub struct ScriptedLookup {
    script: Arc<Mutex<VecDeque<Result<Vec<String>>>>>,
    lookup_calls: Arc<AtomicUsize>,
}

impl ScriptedLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one answer set to the script
    pub fn answer(&self, values: &[&str]) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(values.iter().map(|v| v.to_string()).collect()));
    }

    /// Append one transport failure to the script
    pub fn fail(&self) {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(Error::transport("resolver unreachable")));
    }

    /// Number of times `lookup` was called
    pub fn lookup_call_count(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Lookup for ScriptedLookup {
    async fn lookup(&self, _name: &str, _kind: RecordKind) -> Result<Vec<String>> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(Vec::new()),
        }
    }
}
