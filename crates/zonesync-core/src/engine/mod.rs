//! Reconciliation engines
//!
//! Two workflows share the same seams but own different policies:
//!
//! - [`AcmeFlow`]: single-record validation-token replacement. Exactly one
//!   record must match; any store failure is fatal; a confirmation timeout
//!   is reported, not fatal.
//! - [`SyncEngine`]: multi-record tagged-set IP synchronization. Runs
//!   forever on a fixed interval; one record's failure never blocks its
//!   siblings; only configuration errors abort the process.
//!
//! ```text
//! ┌──────────────┐   query/update    ┌──────────────┐
//! │ RecordStore  │◄──────────────────│    Engine    │
//! └──────────────┘                   └──────┬───────┘
//!                                           │
//!                   ┌───────────────────────┼──────────────────────┐
//!                   ▼                       ▼                      ▼
//!           ┌──────────────┐      ┌──────────────────┐     ┌──────────────┐
//!           │AddressSource │      │ConvergenceVerifier│    │   tracing    │
//!           │ (ddns flow)  │      │   (acme flow)     │    │  (reports)   │
//!           └──────────────┘      └──────────────────┘     └──────────────┘
//! ```

pub mod acme;
pub mod sync;

pub use acme::AcmeFlow;
pub use sync::{CycleReport, SyncEngine, duplicate_keys};
