//! # zonesync-core
//!
//! Core library for the zonesync DNS reconciliation tooling.
//!
//! zonesync keeps records on a remote authoritative DNS provider in line with
//! reality in two ways:
//!
//! - **ACME flow** ([`AcmeFlow`]): replace the content of a single
//!   `_acme-challenge` TXT record with a validation token, then confirm the
//!   new value is visible through independent DNS resolution.
//! - **Dynamic DNS flow** ([`SyncEngine`]): periodically patch every record
//!   carrying a given tag prefix with the host's current public address.
//!
//! The library owns the reconciliation logic only. All I/O goes through three
//! injectable seams:
//!
//! - [`RecordStore`]: query/patch operations against the provider API
//! - [`AddressSource`]: public address discovery per address family
//! - [`Lookup`]: independent DNS resolution used by the convergence check
//!
//! Implementations live in sibling crates (`zonesync-store-cloudflare`,
//! `zonesync-ip-http`, `zonesync-lookup-system`); test doubles substitute
//! them freely.

pub mod config;
pub mod engine;
pub mod error;
pub mod record;
pub mod traits;
pub mod verify;

// Re-export core types for convenience
pub use config::{AcmeConfig, SyncConfig};
pub use engine::{AcmeFlow, CycleReport, SyncEngine};
pub use error::{Error, Result};
pub use record::{Filter, Record, RecordKind};
pub use traits::{AddressFamily, AddressSource, Lookup, RecordStore};
pub use verify::{Convergence, ConvergenceVerifier};
