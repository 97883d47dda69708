//! Contract tests for the convergence verifier
//!
//! Pinned behavior:
//! - returns `Converged` as soon as the expected value appears, with no
//!   further lookups
//! - never performs more than `max_attempts + 1` lookups
//! - a lookup transport failure is an error, not a retried attempt

mod common;

use common::ScriptedLookup;
use std::time::Duration;
use zonesync_core::error::Error;
use zonesync_core::record::RecordKind;
use zonesync_core::verify::{Convergence, ConvergenceVerifier};

const DELAY: Duration = Duration::from_millis(1);

fn verifier(lookup: &ScriptedLookup) -> ConvergenceVerifier {
    ConvergenceVerifier::new(Box::new(lookup.clone()))
}

#[tokio::test]
async fn converges_on_first_sighting() {
    let lookup = ScriptedLookup::new();
    lookup.answer(&["expected"]);

    let outcome = verifier(&lookup)
        .confirm("example.com", RecordKind::Txt, "expected", 5, DELAY)
        .await
        .unwrap();

    assert_eq!(outcome, Convergence::Converged { attempts: 1 });
    assert_eq!(lookup.lookup_call_count(), 1);
}

#[tokio::test]
async fn converges_mid_budget_without_extra_lookups() {
    let lookup = ScriptedLookup::new();
    lookup.answer(&[]);
    lookup.answer(&["unrelated"]);
    lookup.answer(&["unrelated", "expected"]);

    let outcome = verifier(&lookup)
        .confirm("example.com", RecordKind::Txt, "expected", 9, DELAY)
        .await
        .unwrap();

    assert_eq!(outcome, Convergence::Converged { attempts: 3 });
    assert_eq!(lookup.lookup_call_count(), 3);
}

#[tokio::test]
async fn budget_bounds_the_lookup_count() {
    let lookup = ScriptedLookup::new();

    let outcome = verifier(&lookup)
        .confirm("example.com", RecordKind::A, "203.0.113.5", 3, DELAY)
        .await
        .unwrap();

    assert_eq!(outcome, Convergence::TimedOut { attempts: 4 });
    assert_eq!(lookup.lookup_call_count(), 4);
}

#[tokio::test]
async fn zero_attempt_budget_still_looks_up_once() {
    let lookup = ScriptedLookup::new();
    lookup.answer(&["expected"]);

    let outcome = verifier(&lookup)
        .confirm("example.com", RecordKind::Txt, "expected", 0, DELAY)
        .await
        .unwrap();

    assert_eq!(outcome, Convergence::Converged { attempts: 1 });
    assert_eq!(lookup.lookup_call_count(), 1);
}

#[tokio::test]
async fn lookup_failure_is_surfaced_immediately() {
    let lookup = ScriptedLookup::new();
    lookup.fail();
    lookup.answer(&["expected"]);

    let err = verifier(&lookup)
        .confirm("example.com", RecordKind::Txt, "expected", 5, DELAY)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    // Failure is terminal: the scripted success afterwards is never reached.
    assert_eq!(lookup.lookup_call_count(), 1);
}

#[tokio::test]
async fn comparison_is_whole_value_equality() {
    let lookup = ScriptedLookup::new();
    lookup.answer(&["expected-but-longer"]);
    lookup.answer(&["expect"]);

    let outcome = verifier(&lookup)
        .confirm("example.com", RecordKind::Txt, "expected", 1, DELAY)
        .await
        .unwrap();

    assert_eq!(outcome, Convergence::TimedOut { attempts: 2 });
}
