//! Convergence verifier
//!
//! After an update is accepted by the store, the only trustworthy evidence
//! that it took effect is seeing the new value through independent DNS
//! resolution. The verifier polls for that with a bounded attempt budget and
//! a fixed inter-attempt delay.
//!
//! Running out of budget is NOT a failure: propagation delay is expected,
//! so exhaustion is reported as [`Convergence::TimedOut`] and left to the
//! caller. A lookup transport failure, by contrast, is surfaced as an error
//! immediately — retrying a broken resolver would only disguise it as lag.

use crate::error::Result;
use crate::record::RecordKind;
use crate::traits::Lookup;
use std::time::Duration;
use tracing::debug;

/// Terminal outcome of a convergence check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    /// The expected value appeared in a lookup's result set
    Converged {
        /// Lookups performed, including the one that matched
        attempts: usize,
    },
    /// The attempt budget ran out without a sighting
    TimedOut {
        /// Lookups performed
        attempts: usize,
    },
}

impl Convergence {
    /// Whether the expected value was observed
    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Converged { .. })
    }
}

/// Polls independent DNS resolution until an expected value appears or the
/// attempt budget runs out.
pub struct ConvergenceVerifier {
    lookup: Box<dyn Lookup>,
}

impl ConvergenceVerifier {
    /// Create a verifier over the given lookup channel
    pub fn new(lookup: Box<dyn Lookup>) -> Self {
        Self { lookup }
    }

    /// Wait for `expected` to become visible at `name`.
    ///
    /// Performs at most `max_attempts + 1` lookups, each preceded by a wait
    /// of `delay`. Returns [`Convergence::Converged`] the moment `expected`
    /// appears anywhere in a lookup's result set, with no further waiting.
    ///
    /// # Errors
    ///
    /// Propagates the first lookup failure. Absent values do not error;
    /// they are what the loop exists to wait through.
    pub async fn confirm(
        &self,
        name: &str,
        kind: RecordKind,
        expected: &str,
        max_attempts: usize,
        delay: Duration,
    ) -> Result<Convergence> {
        let budget = max_attempts + 1;
        for attempt in 1..=budget {
            tokio::time::sleep(delay).await;
            debug!("checking visibility of {} ({} of {})", name, attempt, budget);

            let values = self.lookup.lookup(name, kind).await?;
            if values.iter().any(|value| value == expected) {
                return Ok(Convergence::Converged { attempts: attempt });
            }
        }

        Ok(Convergence::TimedOut { attempts: budget })
    }
}
