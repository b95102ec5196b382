//! The RNG-driven stateful property runner: `StatefulProperty<T, M>`.
//!
//! Given a generator for the initial state, a model factory, and a factory
//! that produces an action generator from the current `(state, model)`,
//! this draws random action sequences the same way
//! [`protest::property::for_all`] draws argument tuples, and shrinks a
//! failing trace on two axes — the initial state's own shrink tree, then
//! the trace length by prefix truncation.

use std::fmt::Debug;
use std::rc::Rc;

use protest::error::PredicateOutcome;
use protest::serialize::debug_string;
use protest::{Arbitrary, PropertyError, Rng, StatefulConfig};

/// One step that can be applied to a system-under-test `T` and its
/// reference model `M`. `M` is `()` for the model-less degenerate case
/// ([`SimpleAction`]).
pub trait Action<T, M> {
    /// Apply this action to the state and model in place. A
    /// `Precondition` outcome aborts only this step — the caller leaves
    /// `state`/`model` exactly as this call left them and moves on to the
    /// next action, per the stateful protocol's "precondition aborts only
    /// the step" rule.
    fn apply(&self, state: &mut T, model: &mut M) -> PredicateOutcome;

    /// Name recorded in the action trace reported on failure.
    fn name(&self) -> String;
}

/// A model-less [`Action`]: a named function over `T` alone.
pub struct SimpleAction<T> {
    name: String,
    apply_fn: Rc<dyn Fn(&mut T) -> PredicateOutcome>,
}

impl<T> SimpleAction<T> {
    pub fn new(name: impl Into<String>, apply_fn: impl Fn(&mut T) -> PredicateOutcome + 'static) -> Self {
        SimpleAction {
            name: name.into(),
            apply_fn: Rc::new(apply_fn),
        }
    }
}

impl<T> Action<T, ()> for SimpleAction<T> {
    fn apply(&self, state: &mut T, _model: &mut ()) -> PredicateOutcome {
        (self.apply_fn)(state)
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// A single generated and (possibly) applied action, kept around so a
/// failing trace can be replayed verbatim against a shrunk initial state.
type BoxedAction<T, M> = Rc<dyn Action<T, M>>;

enum RunOutcome<T, M> {
    Success {
        state: T,
        model: M,
        trace: Vec<BoxedAction<T, M>>,
    },
    Failure {
        trace: Vec<BoxedAction<T, M>>,
        cause: String,
    },
}

/// Builder for an RNG-driven stateful property, mirroring
/// `statefulProperty(initGen, modelFactory, actionGenFactory)` from the
/// external interface: `.setSeed/.setNumRuns/.setMinActions/.setMaxActions
/// /.setVerbosity/.setPostCheck/.setOnStartup/.setOnCleanup` then `.go()`.
pub struct StatefulProperty<T, M> {
    init_gen: Arbitrary<T>,
    model_factory: Rc<dyn Fn(&T) -> M>,
    action_gen_factory: Rc<dyn Fn(&T, &M) -> Arbitrary<BoxedAction<T, M>>>,
    config: StatefulConfig,
    on_startup: Option<Rc<dyn Fn()>>,
    on_cleanup: Option<Rc<dyn Fn()>>,
    post_check: Option<Rc<dyn Fn(&T, &M) -> Result<(), PropertyError>>>,
}

impl<T, M> StatefulProperty<T, M>
where
    T: Clone + Debug + 'static,
    M: Clone + 'static,
{
    pub fn new(
        init_gen: Arbitrary<T>,
        model_factory: impl Fn(&T) -> M + 'static,
        action_gen_factory: impl Fn(&T, &M) -> Arbitrary<BoxedAction<T, M>> + 'static,
    ) -> Self {
        StatefulProperty {
            init_gen,
            model_factory: Rc::new(model_factory),
            action_gen_factory: Rc::new(action_gen_factory),
            config: StatefulConfig::default(),
            on_startup: None,
            on_cleanup: None,
            post_check: None,
        }
    }

    pub fn set_seed(mut self, seed: impl Into<String>) -> Self {
        self.config.base.seed = seed.into();
        self
    }

    pub fn set_num_runs(mut self, num_runs: usize) -> Self {
        self.config.base.num_runs = num_runs;
        self
    }

    pub fn set_min_actions(mut self, min_actions: usize) -> Self {
        self.config.min_actions = min_actions;
        self
    }

    pub fn set_max_actions(mut self, max_actions: usize) -> Self {
        self.config.max_actions = max_actions;
        self
    }

    pub fn set_verbosity(mut self, verbose: bool) -> Self {
        self.config.base.verbose = verbose;
        self
    }

    pub fn set_post_check(mut self, hook: impl Fn(&T, &M) -> Result<(), PropertyError> + 'static) -> Self {
        self.post_check = Some(Rc::new(hook));
        self
    }

    pub fn set_on_startup(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_startup = Some(Rc::new(hook));
        self
    }

    pub fn set_on_cleanup(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_cleanup = Some(Rc::new(hook));
        self
    }

    /// Run `numRuns` random traces, each of a random length in
    /// `[minActions, maxActions]`, against a fresh initial state. On the
    /// first failing trace, shrink it (initial state, then trace length)
    /// and report a `StatefulFailure`.
    pub fn go(&self) -> Result<(), PropertyError> {
        let mut rng = Rng::from_seed_string(&self.config.base.seed);
        for _ in 0..self.config.base.num_runs {
            let saved_rng = rng.clone();
            let init_shrinkable = self.init_gen.generate(&mut rng);
            let t0 = init_shrinkable.value.clone();
            let m0 = (self.model_factory)(&t0);

            if let Some(startup) = &self.on_startup {
                startup();
            }

            let count = self.choose_action_count(&mut rng);
            let outcome = self.run_trace(t0.clone(), m0.clone(), count, &mut rng);

            match outcome {
                RunOutcome::Success {
                    state: final_state,
                    model: final_model,
                    trace,
                } => {
                    if let Some(cleanup) = &self.on_cleanup {
                        cleanup();
                    }
                    if let Some(post) = &self.post_check {
                        if let Err(e) = post(&final_state, &final_model) {
                            return Err(self.shrink_and_report(saved_rng, t0, trace, e.to_string()));
                        }
                    }
                }
                RunOutcome::Failure { trace, cause } => {
                    return Err(self.shrink_and_report(saved_rng, t0, trace, cause));
                }
            }
        }
        Ok(())
    }

    fn choose_action_count(&self, rng: &mut Rng) -> usize {
        let min = self.config.min_actions;
        let max = self.config.max_actions;
        if min >= max {
            min
        } else {
            rng.gen_range_usize(min, max)
        }
    }

    /// Execute exactly `count` action-generation steps against a fresh
    /// `(state, model)`, recording the action trace as it unfolds. A
    /// precondition discards just that step; any other failure (or a
    /// post-check run separately by the caller) ends the run.
    fn run_trace(&self, mut state: T, mut model: M, count: usize, rng: &mut Rng) -> RunOutcome<T, M> {
        let mut trace: Vec<BoxedAction<T, M>> = Vec::new();
        for _ in 0..count {
            let action_gen = (self.action_gen_factory)(&state, &model);
            let action = action_gen.generate(rng).value;
            if self.config.base.verbose {
                println!("action: {}", action.name());
            }
            match action.apply(&mut state, &mut model) {
                PredicateOutcome::Pass => {
                    trace.push(action);
                }
                PredicateOutcome::Precondition(_) => continue,
                PredicateOutcome::Fail(cause) => {
                    trace.push(action);
                    return RunOutcome::Failure { trace, cause };
                }
            }
        }
        RunOutcome::Success { state, model, trace }
    }

    /// Replay `trace` against `state`/a freshly built model, applying
    /// each action in order. Used to confirm a shrink candidate (a
    /// smaller initial state, or a truncated trace) still fails.
    fn replay(&self, state: &T, trace: &[BoxedAction<T, M>]) -> Option<String> {
        let mut state = state.clone();
        let mut model = (self.model_factory)(&state);
        for action in trace {
            match action.apply(&mut state, &mut model) {
                PredicateOutcome::Pass => continue,
                PredicateOutcome::Precondition(_) => continue,
                PredicateOutcome::Fail(cause) => return Some(cause),
            }
        }
        if let Some(post) = &self.post_check {
            if let Err(e) = post(&state, &model) {
                return Some(e.to_string());
            }
        }
        None
    }

    /// Two shrink axes, tried in order: (a) the initial state's own
    /// shrink tree, replaying the recorded trace against each candidate;
    /// (b) the trace length, binary-searching toward `minActions`.
    fn shrink_and_report(
        &self,
        saved_rng: Rng,
        original_initial: T,
        original_trace: Vec<BoxedAction<T, M>>,
        cause: String,
    ) -> PropertyError {
        let mut replay_rng = saved_rng;
        let initial_shrinkable = self.init_gen.generate(&mut replay_rng);

        let mut best_initial = original_initial;
        let mut best_tree = initial_shrinkable;
        let mut best_trace = original_trace;
        let mut best_cause = cause;

        loop {
            let mut advanced = None;
            for child in best_tree.children().iter() {
                if let Some(next_cause) = self.replay(&child.value, &best_trace) {
                    advanced = Some((child, next_cause));
                    break;
                }
            }
            match advanced {
                Some((child, next_cause)) => {
                    if self.config.base.verbose {
                        println!("shrink initial state -> {}", debug_string(&child.value));
                    }
                    best_initial = child.value.clone();
                    best_cause = next_cause;
                    best_tree = child;
                }
                None => break,
            }
        }

        best_trace = self.shrink_trace_length(&best_initial, best_trace, &mut best_cause);

        let trace_names: Vec<String> = best_trace.iter().map(|a| a.name()).collect();
        PropertyError::stateful_failure(trace_names, debug_string(&best_initial), best_cause)
    }

    /// Binary search the trace length toward `minActions`, keeping the
    /// shortest confirmed-failing prefix.
    fn shrink_trace_length(
        &self,
        initial: &T,
        trace: Vec<BoxedAction<T, M>>,
        cause: &mut String,
    ) -> Vec<BoxedAction<T, M>> {
        let min_len = self.config.min_actions.min(trace.len());
        let mut current = trace;
        loop {
            if current.len() <= min_len {
                break;
            }
            let mid = min_len + (current.len() - min_len) / 2;
            if mid == current.len() {
                break;
            }
            let prefix: Vec<BoxedAction<T, M>> = current[..mid].to_vec();
            match self.replay(initial, &prefix) {
                Some(next_cause) => {
                    if self.config.base.verbose {
                        println!("shrink trace length -> {}", prefix.len());
                    }
                    *cause = next_cause;
                    current = prefix;
                }
                None => break,
            }
        }
        current
    }
}

/// `statefulProperty(initGen, modelFactory, actionGenFactory)`.
pub fn stateful_property<T, M>(
    init_gen: Arbitrary<T>,
    model_factory: impl Fn(&T) -> M + 'static,
    action_gen_factory: impl Fn(&T, &M) -> Arbitrary<BoxedAction<T, M>> + 'static,
) -> StatefulProperty<T, M>
where
    T: Clone + Debug + 'static,
    M: Clone + 'static,
{
    StatefulProperty::new(init_gen, model_factory, action_gen_factory)
}

/// `simpleStatefulProperty(initGen, simpleActionGenFactory)`: the
/// model-less degenerate case, `M = ()`.
pub fn simple_stateful_property<T>(
    init_gen: Arbitrary<T>,
    action_gen_factory: impl Fn(&T) -> Arbitrary<BoxedAction<T, ()>> + 'static,
) -> StatefulProperty<T, ()>
where
    T: Clone + Debug + 'static,
{
    StatefulProperty::new(init_gen, |_: &T| (), move |state: &T, _model: &()| {
        action_gen_factory(state)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use protest::combinators::{just, one_of, WeightedValue};
    use protest::integer;

    fn push_action(value: i64) -> BoxedAction<Vec<i64>, ()> {
        Rc::new(SimpleAction::new(format!("push({value})"), move |state: &mut Vec<i64>| {
            state.push(value);
            PredicateOutcome::Pass
        }))
    }

    fn pop_action() -> BoxedAction<Vec<i64>, ()> {
        Rc::new(SimpleAction::new("pop", |state: &mut Vec<i64>| {
            if state.is_empty() {
                return PredicateOutcome::Precondition("stack is empty".into());
            }
            state.pop();
            PredicateOutcome::Pass
        }))
    }

    #[test]
    fn passing_stack_property_reports_success() {
        let init_gen = just(Vec::<i64>::new());
        let property = simple_stateful_property(init_gen, |_state| {
            one_of(vec![
                WeightedValue::new(integer(0, 10).map(push_action)),
                WeightedValue::new(just(()).map(|_| pop_action())),
            ])
        })
        .set_seed("stack-ok")
        .set_num_runs(30)
        .set_min_actions(1)
        .set_max_actions(8);

        assert!(property.go().is_ok());
    }

    #[test]
    fn failing_invariant_is_reported_with_a_trace_and_shrinks_the_initial_state() {
        // A stack whose `push` secretly corrupts state once length exceeds 2:
        // the property (postCheck) requires length <= 2 at every step.
        let init_gen = just(Vec::<i64>::new());
        let property = simple_stateful_property(init_gen, |_state| {
            just(()).map(|_| push_action(1))
        })
        .set_seed("stack-fail")
        .set_num_runs(5)
        .set_min_actions(3)
        .set_max_actions(5)
        .set_post_check(|state: &Vec<i64>, _model: &()| {
            if state.len() > 2 {
                Err(PropertyError::failure(vec![], vec![], "stack grew past 2"))
            } else {
                Ok(())
            }
        });

        let err = property.go().unwrap_err();
        match err {
            PropertyError::StatefulFailure { trace, .. } => {
                assert!(trace.len() >= 3);
            }
            other => panic!("expected a stateful failure, got {other:?}"),
        }
    }

    #[test]
    fn precondition_inside_an_action_skips_only_that_step() {
        let init_gen = just(Vec::<i64>::new());
        let property = simple_stateful_property(init_gen, |_state| just(()).map(|_| pop_action()))
            .set_seed("pop-only")
            .set_num_runs(10)
            .set_min_actions(3)
            .set_max_actions(3);

        // Every pop on an empty stack raises Precondition, never a failure.
        assert!(property.go().is_ok());
    }
}
