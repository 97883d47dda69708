//! Core traits for the zonesync system
//!
//! This module defines the abstract interfaces the engines depend on.
//!
//! - [`RecordStore`]: query/patch records at the remote DNS provider
//! - [`AddressSource`]: discover the host's current public address
//! - [`Lookup`]: independent DNS resolution for the convergence check

pub mod address_source;
pub mod lookup;
pub mod record_store;

pub use address_source::{AddressFamily, AddressSource};
pub use lookup::Lookup;
pub use record_store::RecordStore;
