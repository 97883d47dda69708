//! Remote record store trait
//!
//! The store is an opaque remote collection of DNS records with query and
//! patch semantics. The engines own all policy: cardinality enforcement,
//! retry budgets, and partial-failure handling never live behind this seam.
//!
//! Implementations must be thread-safe, stateless between calls, and must
//! not retry on their own — an error is returned to the engine, which
//! decides whether it is fatal.

use crate::error::Result;
use crate::record::{Filter, Record};
use async_trait::async_trait;

/// Trait for remote record store adapters
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Return every record matching `filter`.
    ///
    /// An empty result is not an error: a tag-prefix filter may legitimately
    /// match nothing. Cardinality is NOT enforced here — a caller expecting
    /// exactly one record must check the count itself.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`](crate::Error::Transport) on network failure or
    ///   a non-success status
    /// - [`Error::Decode`](crate::Error::Decode) on a malformed response body
    async fn query(&self, filter: &Filter) -> Result<Vec<Record>>;

    /// Replace the stored record identified by `record.id` with exactly the
    /// fields `name`, `kind`, `content`, and `tag` of `record`.
    ///
    /// Mutates exactly one remote record; no other record is touched. The
    /// call is not idempotent at the store level (each call is a write) but
    /// is idempotent in effect.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`](crate::Error::Config) if `record.id` is absent —
    ///   updates require an identifier obtained from a prior query
    /// - [`Error::Transport`](crate::Error::Transport) on network failure
    /// - [`Error::RemoteRejected`](crate::Error::RemoteRejected) on a
    ///   non-success status from the store
    async fn update(&self, record: &Record) -> Result<()>;
}
