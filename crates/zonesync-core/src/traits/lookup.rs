//! Independent DNS lookup trait
//!
//! The convergence check observes updates through a channel independent of
//! the store: ordinary DNS resolution. This trait is that channel.

use crate::error::Result;
use crate::record::RecordKind;
use async_trait::async_trait;

/// Trait for the convergence lookup channel
#[async_trait]
pub trait Lookup: Send + Sync {
    /// Return every value currently visible for `name` under record type
    /// `kind`.
    ///
    /// "Nothing resolves yet" (NXDOMAIN, empty answer) is an empty vector,
    /// not an error — that is exactly the propagation lag the verifier
    /// polls through. A transport failure IS an error: a broken resolver is
    /// a different condition from a slow zone.
    async fn lookup(&self, name: &str, kind: RecordKind) -> Result<Vec<String>>;
}
