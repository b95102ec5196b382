//! Async mirror of the property runner, gated behind the `asynchronous`
//! feature. The predicate returns a future instead of a `PredicateOutcome`
//! directly; everything else follows [`crate::property::for_all`] exactly,
//! using `futures_lite::future::block_on` to drive each future during the
//! (inherently sequential) shrink search, without pulling in a full async
//! runtime as a dependency.

use std::future::Future;

use crate::config::TestConfig;
use crate::error::{PredicateOutcome, PropertyError, ShrinkStep};
use crate::generator::Arbitrary;
use crate::property::RunReport;
use crate::rng::Rng;
use crate::serialize::debug_string;
use crate::shrinkable::Shrinkable;

fn shrink_slot_async<T, Fut, O>(
    start: Shrinkable<T>,
    arg_index: usize,
    mut cause: String,
    mut test: impl FnMut(&T) -> Fut,
) -> (Shrinkable<T>, Vec<ShrinkStep>, String)
where
    T: Clone + 'static,
    Fut: Future<Output = O>,
    O: Into<PredicateOutcome>,
{
    let mut current = start;
    let mut history = Vec::new();
    loop {
        let mut advanced = None;
        for child in current.children().iter() {
            let outcome: PredicateOutcome = futures_lite::future::block_on(test(&child.value)).into();
            if let PredicateOutcome::Fail(next_cause) = outcome {
                advanced = Some((child, next_cause));
                break;
            }
        }
        match advanced {
            Some((child, next_cause)) => {
                history.push(ShrinkStep {
                    arg_index,
                    value: debug_string(&child.value),
                });
                current = child;
                cause = next_cause;
            }
            None => break,
        }
    }
    (current, history, cause)
}

/// Single-argument async property check: the predicate returns a future
/// resolving to anything `Into<PredicateOutcome>`.
pub async fn for_all_async<A, Fut, O>(
    gen: &Arbitrary<A>,
    predicate: impl Fn(&A) -> Fut,
    opts: &TestConfig,
) -> Result<RunReport, PropertyError>
where
    A: Clone + 'static,
    Fut: Future<Output = O>,
    O: Into<PredicateOutcome>,
{
    let mut rng = Rng::from_seed_string(&opts.seed);
    let bound = opts.num_runs;
    let mut skips = 0usize;
    for run in 0..opts.num_runs {
        let saved_rng = rng.clone();
        let sample = gen.generate(&mut rng);
        if opts.verbose {
            println!("run {run}: {}", debug_string(&sample.value));
        }
        match predicate(&sample.value).await.into() {
            PredicateOutcome::Pass => continue,
            PredicateOutcome::Precondition(_) => {
                skips += 1;
                if skips > bound {
                    return Err(PropertyError::too_many_preconditions(skips, bound));
                }
                continue;
            }
            PredicateOutcome::Fail(cause) => {
                let mut replay_rng = saved_rng;
                let initial = gen.generate(&mut replay_rng);
                let (shrunk, history, cause) =
                    shrink_slot_async(initial, 0, cause, |value| predicate(value));
                return Err(PropertyError::failure(
                    vec![debug_string(&shrunk.value)],
                    history,
                    cause,
                ));
            }
        }
    }
    Ok(RunReport {
        runs: opts.num_runs,
        precondition_skips: skips,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::integer::integer;

    #[test]
    fn async_for_all_shrinks_like_the_sync_runner() {
        let gen = integer(0, 1000);
        let opts = TestConfig {
            seed: "async-shrink".to_string(),
            ..TestConfig::default()
        };
        let result = futures_lite::future::block_on(for_all_async(
            &gen,
            |n: &i64| {
                let n = *n;
                async move { n < 50 }
            },
            &opts,
        ));
        let err = result.unwrap_err();
        match err {
            PropertyError::Failure { args, .. } => {
                let value: i64 = args[0].parse().unwrap();
                assert!(value >= 50);
            }
            other => panic!("expected a failure, got {other:?}"),
        }
    }
}
