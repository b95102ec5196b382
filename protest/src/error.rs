//! Error taxonomy for property and stateful runs.
//!
//! Failures are represented, not thrown: everything propagates through
//! `Result` rather than panics, except for `Precondition`, which is a
//! named variant the runner pattern-matches rather than treats as a
//! genuine failure.

use std::fmt;

/// A single recorded shrink step: which argument position changed, and
/// the debug-serialized value it changed to.
#[derive(Debug, Clone)]
pub struct ShrinkStep {
    pub arg_index: usize,
    pub value: String,
}

/// Every way a property or stateful run can end without success.
#[derive(Debug, Clone)]
pub enum PropertyError {
    /// The predicate's declared arity didn't match the number of
    /// generators supplied. Raised before any sample is drawn.
    Arity { expected: usize, actual: usize },

    /// A sample was discarded — not a failure, just "try another one".
    Precondition(String),

    /// The predicate returned false, or raised, on some sample. Carries
    /// the smallest arguments the shrink search found.
    Failure {
        args: Vec<String>,
        shrink_history: Vec<ShrinkStep>,
        cause: String,
    },

    /// Cumulative precondition skips exceeded the configured bound.
    TooManyPreconditions { skipped: usize, bound: usize },

    /// Every combination in a `matrix` run was discarded by a
    /// precondition, so no combination ever actually exercised the
    /// predicate.
    AllPreconditions { combinations: usize },

    /// An action or post-check raised during a stateful run.
    StatefulFailure {
        trace: Vec<String>,
        initial_state: String,
        cause: String,
    },
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyError::Arity { expected, actual } => write!(
                f,
                "generator count mismatch: predicate expects {expected} argument(s), got {actual} generator(s)"
            ),
            PropertyError::Precondition(reason) => write!(f, "precondition failed: {reason}"),
            PropertyError::Failure {
                args,
                shrink_history,
                cause,
            } => {
                write!(f, "property failed with args [{}]: {cause}", args.join(", "))?;
                if !shrink_history.is_empty() {
                    write!(f, " (after {} shrink step(s))", shrink_history.len())?;
                }
                Ok(())
            }
            PropertyError::TooManyPreconditions { skipped, bound } => write!(
                f,
                "too many preconditions: skipped {skipped} of {bound} allowed run(s)"
            ),
            PropertyError::AllPreconditions { combinations } => write!(
                f,
                "all {combinations} combination(s) were discarded by a precondition"
            ),
            PropertyError::StatefulFailure {
                trace,
                initial_state,
                cause,
            } => write!(
                f,
                "stateful property failed from initial state {initial_state} after trace [{}]: {cause}",
                trace.join(" -> ")
            ),
        }
    }
}

impl std::error::Error for PropertyError {}

impl PropertyError {
    pub fn arity(expected: usize, actual: usize) -> Self {
        PropertyError::Arity { expected, actual }
    }

    pub fn precondition(reason: impl Into<String>) -> Self {
        PropertyError::Precondition(reason.into())
    }

    pub fn failure(
        args: Vec<String>,
        shrink_history: Vec<ShrinkStep>,
        cause: impl Into<String>,
    ) -> Self {
        PropertyError::Failure {
            args,
            shrink_history,
            cause: cause.into(),
        }
    }

    pub fn too_many_preconditions(skipped: usize, bound: usize) -> Self {
        PropertyError::TooManyPreconditions { skipped, bound }
    }

    pub fn all_preconditions(combinations: usize) -> Self {
        PropertyError::AllPreconditions { combinations }
    }

    pub fn stateful_failure(
        trace: Vec<String>,
        initial_state: impl Into<String>,
        cause: impl Into<String>,
    ) -> Self {
        PropertyError::StatefulFailure {
            trace,
            initial_state: initial_state.into(),
            cause: cause.into(),
        }
    }

    /// True for the one variant that means "discard this sample", not
    /// "the property failed".
    pub fn is_precondition(&self) -> bool {
        matches!(self, PropertyError::Precondition(_))
    }
}

/// What the predicate under test returns. A plain `bool` result is lifted
/// into this via `PredicateOutcome::from`, so ordinary closures returning
/// `bool` work directly with the runner.
pub enum PredicateOutcome {
    Pass,
    Fail(String),
    Precondition(String),
}

impl From<bool> for PredicateOutcome {
    fn from(value: bool) -> Self {
        if value {
            PredicateOutcome::Pass
        } else {
            PredicateOutcome::Fail("predicate returned false".to_string())
        }
    }
}

impl From<()> for PredicateOutcome {
    fn from(_: ()) -> Self {
        PredicateOutcome::Pass
    }
}

impl From<Result<(), PropertyError>> for PredicateOutcome {
    fn from(value: Result<(), PropertyError>) -> Self {
        match value {
            Ok(()) => PredicateOutcome::Pass,
            Err(PropertyError::Precondition(reason)) => PredicateOutcome::Precondition(reason),
            Err(other) => PredicateOutcome::Fail(other.to_string()),
        }
    }
}
