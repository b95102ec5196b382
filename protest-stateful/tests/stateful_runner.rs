//! Cross-module integration tests for the stateful runner: a counter
//! driven by generated actions, checked against a plain invariant and
//! against an explicit reference model.

use std::rc::Rc;

use protest::combinators::{just, one_of, WeightedValue};
use protest::error::PredicateOutcome;
use protest::integer;
use protest::PropertyError;
use protest_stateful::{simple_stateful_property, stateful_property, Action, SimpleAction};

#[derive(Debug, Clone)]
struct Counter {
    value: i64,
}

fn counter_action_gen(
    _state: &Counter,
) -> protest::Arbitrary<Rc<dyn Action<Counter, ()>>> {
    one_of(vec![
        WeightedValue::new(just(()).map(|_| {
            Rc::new(SimpleAction::new("increment", |state: &mut Counter| {
                state.value += 1;
                PredicateOutcome::Pass
            })) as Rc<dyn Action<Counter, ()>>
        })),
        WeightedValue::new(just(()).map(|_| {
            Rc::new(SimpleAction::new("decrement", |state: &mut Counter| {
                if state.value <= 0 {
                    return PredicateOutcome::Precondition("counter already at zero".into());
                }
                state.value -= 1;
                PredicateOutcome::Pass
            })) as Rc<dyn Action<Counter, ()>>
        })),
        WeightedValue::new(just(()).map(|_| {
            Rc::new(SimpleAction::new("reset", |state: &mut Counter| {
                state.value = 0;
                PredicateOutcome::Pass
            })) as Rc<dyn Action<Counter, ()>>
        })),
    ])
}

#[test]
fn counter_stays_non_negative_across_random_traces() {
    let init_gen = just(Counter { value: 0 });
    let property = simple_stateful_property(init_gen, counter_action_gen)
        .set_seed("counter-ok")
        .set_num_runs(80)
        .set_min_actions(1)
        .set_max_actions(20)
        .set_post_check(|state: &Counter, _model: &()| {
            if state.value < 0 {
                Err(PropertyError::failure(vec![], vec![], "counter went negative"))
            } else {
                Ok(())
            }
        });

    assert!(property.go().is_ok());
}

#[test]
fn a_broken_invariant_reports_a_shrunk_trace() {
    // This invariant is deliberately too strict: three increments in a row
    // without an intervening reset or decrement violates it.
    let init_gen = just(Counter { value: 0 });
    let property = simple_stateful_property(init_gen, |_state: &Counter| {
        just(()).map(|_| {
            Rc::new(SimpleAction::new("increment", |state: &mut Counter| {
                state.value += 1;
                PredicateOutcome::Pass
            })) as Rc<dyn Action<Counter, ()>>
        })
    })
    .set_seed("counter-break")
    .set_num_runs(5)
    .set_min_actions(5)
    .set_max_actions(5)
    .set_post_check(|state: &Counter, _model: &()| {
        if state.value >= 3 {
            Err(PropertyError::failure(vec![], vec![], "counter reached 3"))
        } else {
            Ok(())
        }
    });

    let err = property.go().unwrap_err();
    match err {
        PropertyError::StatefulFailure { trace, .. } => {
            // The minimal failing trace is exactly three increments, not
            // five: trace-length shrinking must find it.
            assert_eq!(trace.len(), 3);
            assert!(trace.iter().all(|name| name == "increment"));
        }
        other => panic!("expected a stateful failure, got {other:?}"),
    }
}

#[test]
fn model_backed_run_keeps_state_and_model_in_sync() {
    // The model is a plain running total; the system-under-test is the
    // same counter. An action drifts them apart on purpose so the
    // post-check can catch the discrepancy.
    let init_gen = just(Counter { value: 0 });
    let property = stateful_property(
        init_gen,
        |_t: &Counter| 0i64,
        |_state: &Counter, _model: &i64| {
            one_of(vec![
                WeightedValue::new(integer(1, 5).map(|delta| {
                    Rc::new(DriftingIncrement { delta }) as Rc<dyn Action<Counter, i64>>
                })),
            ])
        },
    )
    .set_seed("model-drift")
    .set_num_runs(10)
    .set_min_actions(2)
    .set_max_actions(4)
    .set_post_check(|state: &Counter, model: &i64| {
        if state.value as i64 != *model {
            Err(PropertyError::failure(vec![], vec![], "state and model diverged"))
        } else {
            Ok(())
        }
    });

    let err = property.go().unwrap_err();
    assert!(matches!(err, PropertyError::StatefulFailure { .. }));
}

struct DriftingIncrement {
    delta: i64,
}

impl Action<Counter, i64> for DriftingIncrement {
    fn apply(&self, state: &mut Counter, model: &mut i64) -> PredicateOutcome {
        state.value += self.delta;
        // The model always advances by one less than it should, so the
        // post-check's cross-check eventually fails.
        *model += self.delta - 1;
        PredicateOutcome::Pass
    }

    fn name(&self) -> String {
        format!("drift({})", self.delta)
    }
}
