//! Batch connect/disconnect dispatch.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::pairing::PortPair;
use crate::patchbay::{Patchbay, TransportError, TransportResult};

/// What to do with each pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Connect,
    Disconnect,
}

impl Action {
    /// Present participle used in progress messages.
    #[must_use]
    pub fn verb(self) -> &'static str {
        match self {
            Self::Connect => "connecting",
            Self::Disconnect => "disconnecting",
        }
    }

    /// Arrow drawn between source and destination.
    #[must_use]
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Connect => "->",
            Self::Disconnect => "-|>",
        }
    }

    fn method(self) -> &'static str {
        match self {
            Self::Connect => "ConnectPortsByName",
            Self::Disconnect => "DisconnectPortsByName",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
        })
    }
}

/// What happens to the rest of a batch after one pair fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Attempt every pair and collect failures
    #[default]
    BestEffort,
    /// Stop at the first failure; remaining pairs are skipped
    FailFast,
}

/// A single pair action that the patchbay rejected.
#[derive(Debug, Error)]
#[error("{action} {pair} failed: {source}")]
pub struct ActionError {
    pub action: Action,
    pub pair: PortPair,
    #[source]
    pub source: TransportError,
}

/// Result of one pair in a batch.
#[derive(Debug)]
pub enum ActionStatus {
    Applied,
    Failed(TransportError),
    /// Not attempted because an earlier pair failed under [`FailurePolicy::FailFast`]
    Skipped,
}

/// One pair and what happened to it.
#[derive(Debug)]
pub struct ActionOutcome {
    pub pair: PortPair,
    pub status: ActionStatus,
}

/// Per-pair outcomes of a batch, in dispatch order.
#[derive(Debug)]
pub struct BatchReport {
    pub action: Action,
    pub outcomes: Vec<ActionOutcome>,
}

impl BatchReport {
    #[must_use]
    pub fn applied(&self) -> usize {
        self.count(|s| matches!(s, ActionStatus::Applied))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, ActionStatus::Failed(_)))
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, ActionStatus::Skipped))
    }

    /// Check that every pair was applied.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.skipped() == 0
    }

    /// Collect the failed pairs as errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<ActionError> {
        let action = self.action;
        self.outcomes
            .into_iter()
            .filter_map(|outcome| match outcome.status {
                ActionStatus::Failed(source) => {
                    Some(ActionError { action, pair: outcome.pair, source })
                }
                _ => None,
            })
            .collect()
    }

    /// Number of applied pairs, or the first failure.
    ///
    /// # Errors
    /// Returns [`Error::Action`] for the first failed pair.
    pub fn into_result(self) -> Result<usize> {
        let applied = self.applied();
        match self.into_errors().into_iter().next() {
            Some(err) => Err(Error::Action(err)),
            None => Ok(applied),
        }
    }

    fn count(&self, predicate: impl Fn(&ActionStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(&o.status)).count()
    }
}

/// Applies connect/disconnect to pairs, strictly in order.
pub struct Dispatcher<'a, P: Patchbay + ?Sized> {
    patchbay: &'a P,
    policy: FailurePolicy,
}

impl<'a, P: Patchbay + ?Sized> Dispatcher<'a, P> {
    /// Create a dispatcher with the given failure policy.
    #[must_use]
    pub fn new(patchbay: &'a P, policy: FailurePolicy) -> Self {
        Self { patchbay, policy }
    }

    /// Apply `action` to every pair and report each outcome.
    ///
    /// Each attempt is logged before the call is made.
    pub fn run(&self, action: Action, pairs: Vec<PortPair>) -> BatchReport {
        self.run_with(action, pairs, |_| {})
    }

    /// Like [`Dispatcher::run`], calling `on_outcome` as soon as each pair
    /// has been handled.
    pub fn run_with(
        &self,
        action: Action,
        pairs: Vec<PortPair>,
        mut on_outcome: impl FnMut(&ActionOutcome),
    ) -> BatchReport {
        let mut outcomes = Vec::with_capacity(pairs.len());
        let mut halted = false;

        for pair in pairs {
            if halted {
                let outcome = ActionOutcome { pair, status: ActionStatus::Skipped };
                on_outcome(&outcome);
                outcomes.push(outcome);
                continue;
            }

            info!(%action, source = %pair.source, dest = %pair.dest, "Applying pair");

            let status = match self.apply(action, &pair) {
                Ok(()) => ActionStatus::Applied,
                Err(e) => {
                    warn!(%action, %pair, method = action.method(), error = %e, "Pair action failed");
                    halted = self.policy == FailurePolicy::FailFast;
                    ActionStatus::Failed(e)
                }
            };
            let outcome = ActionOutcome { pair, status };
            on_outcome(&outcome);
            outcomes.push(outcome);
        }

        BatchReport { action, outcomes }
    }

    fn apply(&self, action: Action, pair: &PortPair) -> TransportResult<()> {
        let (source, dest) = (&pair.source, &pair.dest);
        match action {
            Action::Connect => {
                self.patchbay.connect_ports(source.client(), source.name(), dest.client(), dest.name())
            }
            Action::Disconnect => self.patchbay.disconnect_ports(
                source.client(),
                source.name(),
                dest.client(),
                dest.name(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use assert_matches::assert_matches;
    use mockall::Sequence;

    use super::*;
    use crate::patchbay::MockPatchbay;
    use crate::port::{MediaType, Port, PortFlags};

    fn pairs(names: &[(&str, &str)]) -> Vec<PortPair> {
        names
            .iter()
            .zip(0u64..)
            .map(|((s, d), id)| PortPair {
                source: Port::new(1, "system", id, s, MediaType::Audio, PortFlags::OUTPUT),
                dest: Port::new(2, "ardour", id, d, MediaType::Audio, PortFlags::INPUT),
            })
            .collect()
    }

    fn recording_patchbay(fail_on: &'static str) -> (MockPatchbay, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut patchbay = MockPatchbay::new();
        let recorded = Arc::clone(&calls);
        patchbay.expect_connect_ports().returning(move |sc, sp, dc, dp| {
            recorded.lock().unwrap().push(format!("{sc}:{sp}>{dc}:{dp}"));
            if sp == fail_on {
                Err(TransportError::method_failed("ConnectPortsByName", "Failed to connect ports"))
            } else {
                Ok(())
            }
        });
        (patchbay, calls)
    }

    #[test]
    fn test_connect_in_order() {
        let (patchbay, calls) = recording_patchbay("");
        let report = Dispatcher::new(&patchbay, FailurePolicy::BestEffort)
            .run(Action::Connect, pairs(&[("capture_1", "in_1"), ("capture_2", "in_2")]));

        assert!(report.is_success());
        assert_eq!(report.applied(), 2);
        assert_eq!(
            *calls.lock().unwrap(),
            ["system:capture_1>ardour:in_1", "system:capture_2>ardour:in_2"]
        );
    }

    #[test]
    fn test_disconnect_uses_disconnect_method() {
        let mut patchbay = MockPatchbay::new();
        let mut seq = Sequence::new();
        patchbay.expect_connect_ports().never();
        patchbay
            .expect_disconnect_ports()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, sp, _, _| {
                assert_eq!(sp, "capture_1");
                Ok(())
            });
        patchbay
            .expect_disconnect_ports()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, sp, _, _| {
                assert_eq!(sp, "capture_2");
                Ok(())
            });

        let report = Dispatcher::new(&patchbay, FailurePolicy::BestEffort)
            .run(Action::Disconnect, pairs(&[("capture_1", "in_1"), ("capture_2", "in_2")]));

        assert_eq!(report.action, Action::Disconnect);
        assert_eq!(report.applied(), 2);
    }

    #[test]
    fn test_best_effort_continues_after_failure() {
        let (patchbay, calls) = recording_patchbay("b");
        let report = Dispatcher::new(&patchbay, FailurePolicy::BestEffort)
            .run(Action::Connect, pairs(&[("a", "x"), ("b", "y"), ("c", "z")]));

        assert_eq!(calls.lock().unwrap().len(), 3);
        assert_eq!(report.applied(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 0);
        assert!(!report.is_success());

        let errors = report.into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].pair.source.name(), "b");
    }

    #[test]
    fn test_fail_fast_skips_remaining() {
        let (patchbay, calls) = recording_patchbay("a");
        let report = Dispatcher::new(&patchbay, FailurePolicy::FailFast)
            .run(Action::Connect, pairs(&[("a", "x"), ("b", "y"), ("c", "z")]));

        assert_eq!(calls.lock().unwrap().len(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 2);
        assert_matches!(report.outcomes[2].status, ActionStatus::Skipped);
        assert_matches!(report.into_result(), Err(Error::Action(ActionError { action: Action::Connect, .. })));
    }

    #[test]
    fn test_run_with_reports_every_pair_in_order() {
        let (patchbay, _calls) = recording_patchbay("b");
        let mut seen = Vec::new();
        Dispatcher::new(&patchbay, FailurePolicy::FailFast).run_with(
            Action::Connect,
            pairs(&[("a", "x"), ("b", "y"), ("c", "z")]),
            |outcome| {
                let tag = match outcome.status {
                    ActionStatus::Applied => "applied",
                    ActionStatus::Failed(_) => "failed",
                    ActionStatus::Skipped => "skipped",
                };
                seen.push(format!("{}:{tag}", outcome.pair.source.name()));
            },
        );

        assert_eq!(seen, ["a:applied", "b:failed", "c:skipped"]);
    }

    #[test]
    fn test_empty_batch() {
        let patchbay = MockPatchbay::new();
        let report = Dispatcher::new(&patchbay, FailurePolicy::FailFast).run(Action::Connect, vec![]);

        assert!(report.is_success());
        assert_eq!(report.into_result().unwrap(), 0);
    }

    #[test]
    fn test_action_error_display() {
        let err = ActionError {
            action: Action::Connect,
            pair: pairs(&[("capture_1", "in_1")]).remove(0),
            source: TransportError::ReadOnly,
        };
        assert_eq!(
            err.to_string(),
            "connect system:capture_1 -> ardour:in_1 failed: Patchbay is read-only"
        );
    }

    #[test]
    fn test_policy_serde() {
        let policy: FailurePolicy = serde_json::from_str("\"fail-fast\"").unwrap();
        assert_eq!(policy, FailurePolicy::FailFast);
    }
}
