//! The property runner: draws samples from generators, evaluates a
//! predicate, and on the first failure shrinks toward a minimal
//! counterexample before reporting it.
//!
//! Every entry point here follows the same per-run protocol: clone the
//! RNG *before* drawing a sample, so that if the sample fails, the clone
//! can be replayed to regenerate the exact same `Shrinkable` tree for the
//! shrink search without the runner ever stashing the tree itself.

use crate::config::TestConfig;
use crate::error::{PredicateOutcome, PropertyError, ShrinkStep};
use crate::generator::Arbitrary;
use crate::rng::Rng;
use crate::serialize::{debug_string, serialize_args};
use crate::shrinkable::Shrinkable;
use crate::typed::{Typed1, Typed2, Typed3, Typed4, Typed5};

/// How many samples were evaluated and how many were discarded by a
/// precondition, for a run that completed without failing.
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub runs: usize,
    pub precondition_skips: usize,
}

fn precondition_bound(num_runs: usize, fraction: f64) -> usize {
    ((num_runs as f64) * fraction).ceil() as usize
}

/// Walk one argument's shrink tree, trying each child against `test` in
/// the order the tree presents them and descending into the first one
/// that still fails. A level that produces no failing child ends the
/// walk for this slot.
fn shrink_slot<T: Clone + 'static>(
    start: Shrinkable<T>,
    arg_index: usize,
    mut cause: String,
    mut test: impl FnMut(&T) -> PredicateOutcome,
) -> (Shrinkable<T>, Vec<ShrinkStep>, String) {
    let mut current = start;
    let mut history = Vec::new();
    loop {
        let mut advanced = None;
        for child in current.children().iter() {
            if let PredicateOutcome::Fail(next_cause) = test(&child.value) {
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

// ---------------------------------------------------------------------
// forAll / forAllN: one generator per argument, independently typed.
// ---------------------------------------------------------------------

/// Single-argument property check. This is also what `forAllN` reduces
/// to for N=1.
pub fn for_all<A, O>(
    gen: &Arbitrary<A>,
    predicate: impl Fn(&A) -> O,
    opts: &TestConfig,
) -> Result<RunReport, PropertyError>
where
    A: Clone + 'static,
    O: Into<PredicateOutcome>,
{
    for_all_bounded(gen, predicate, opts, 1.0)
}

fn for_all_bounded<A, O>(
    gen: &Arbitrary<A>,
    predicate: impl Fn(&A) -> O,
    opts: &TestConfig,
    bound_fraction: f64,
) -> Result<RunReport, PropertyError>
where
    A: Clone + 'static,
    O: Into<PredicateOutcome>,
{
    let mut rng = Rng::from_seed_string(&opts.seed);
    let bound = precondition_bound(opts.num_runs, bound_fraction);
    let mut skips = 0usize;
    for run in 0..opts.num_runs {
        let saved_rng = rng.clone();
        let sample = gen.generate(&mut rng);
        if opts.verbose {
            println!("run {run}: {}", debug_string(&sample.value));
        }
        match predicate(&sample.value).into() {
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
                    shrink_slot(initial, 0, cause, |value| predicate(value).into());
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

/// Generates `forAllK`/`forAllK_bounded` for a fixed arity `K`, each
/// argument independently typed. Every macro expansion follows the same
/// shape as `for_all`/`for_all_bounded` above: draw one sample per slot,
/// and on failure regenerate from the saved RNG and shrink slot 0 to
/// completion before moving to slot 1, and so on.
macro_rules! for_all_n {
    ($name:ident, $bounded:ident, ($(($gen:ident, $sample:ident, $ty:ident, $idx:tt)),+)) => {
        #[allow(clippy::too_many_arguments)]
        pub fn $name<$($ty,)+ O>(
            $($gen: &Arbitrary<$ty>,)+
            predicate: impl Fn($(&$ty),+) -> O,
            opts: &TestConfig,
        ) -> Result<RunReport, PropertyError>
        where
            $($ty: Clone + 'static,)+
            O: Into<PredicateOutcome>,
        {
            $bounded($($gen,)+ predicate, opts, 1.0)
        }

        #[allow(clippy::too_many_arguments)]
        fn $bounded<$($ty,)+ O>(
            $($gen: &Arbitrary<$ty>,)+
            predicate: impl Fn($(&$ty),+) -> O,
            opts: &TestConfig,
            bound_fraction: f64,
        ) -> Result<RunReport, PropertyError>
        where
            $($ty: Clone + 'static,)+
            O: Into<PredicateOutcome>,
        {
            let mut rng = Rng::from_seed_string(&opts.seed);
            let bound = precondition_bound(opts.num_runs, bound_fraction);
            let mut skips = 0usize;
            for run in 0..opts.num_runs {
                let saved_rng = rng.clone();
                $(let $sample = $gen.generate(&mut rng);)+
                if opts.verbose {
                    println!(
                        "run {run}: {}",
                        serialize_args(&[$(debug_string(&$sample.value)),+])
                    );
                }
                match predicate($(&$sample.value),+).into() {
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
                        $(let mut $sample = $gen.generate(&mut replay_rng);)+
                        let mut history = Vec::new();
                        let mut cause = cause;
                        $(
                            {
                                let fixed = ($($sample.value.clone(),)+);
                                let (shrunk, hist, new_cause) = shrink_slot(
                                    $sample.clone(),
                                    $idx,
                                    cause,
                                    |candidate| {
                                        let mut args = fixed.clone();
                                        args.$idx = candidate.clone();
                                        let ($($sample,)+) = args;
                                        predicate($(&$sample),+).into()
                                    },
                                );
                                $sample = shrunk;
                                history.extend(hist);
                                cause = new_cause;
                            }
                        )+
                        return Err(PropertyError::failure(
                            vec![$(debug_string(&$sample.value)),+],
                            history,
                            cause,
                        ));
                    }
                }
            }
            Ok(RunReport { runs: opts.num_runs, precondition_skips: skips })
        }
    };
}

for_all_n!(for_all2, for_all2_bounded, ((gen_a, sample_a, A, 0), (gen_b, sample_b, B, 1)));
for_all_n!(
    for_all3,
    for_all3_bounded,
    ((gen_a, sample_a, A, 0), (gen_b, sample_b, B, 1), (gen_c, sample_c, C, 2))
);
for_all_n!(
    for_all4,
    for_all4_bounded,
    (
        (gen_a, sample_a, A, 0),
        (gen_b, sample_b, B, 1),
        (gen_c, sample_c, C, 2),
        (gen_d, sample_d, D, 3)
    )
);
for_all_n!(
    for_all5,
    for_all5_bounded,
    (
        (gen_a, sample_a, A, 0),
        (gen_b, sample_b, B, 1),
        (gen_c, sample_c, C, 2),
        (gen_d, sample_d, D, 3),
        (gen_e, sample_e, E, 4)
    )
);

// ---------------------------------------------------------------------
// forAllLegacy: one homogeneous type, a caller-chosen number of slots,
// predicate receives the whole argument list.
// ---------------------------------------------------------------------

pub fn for_all_legacy<T, O>(
    gens: &[Arbitrary<T>],
    predicate: impl Fn(&[T]) -> O,
    opts: &TestConfig,
) -> Result<RunReport, PropertyError>
where
    T: Clone + 'static,
    O: Into<PredicateOutcome>,
{
    for_all_legacy_with_hooks(gens, predicate, opts, None, None)
}

/// `for_all_legacy`'s actual implementation, parameterized over
/// `onStartup`/`onCleanup` so [`Property`] can thread its hooks through
/// per-sample (§4.6 "Per-run protocol" steps 3 and 5): `onStartup` fires
/// before every sample, and `onCleanup` fires only after a sample that
/// passed — never after a precondition skip or a failure headed into
/// shrinking.
fn for_all_legacy_with_hooks<T, O>(
    gens: &[Arbitrary<T>],
    predicate: impl Fn(&[T]) -> O,
    opts: &TestConfig,
    on_startup: Option<&dyn Fn()>,
    on_cleanup: Option<&dyn Fn()>,
) -> Result<RunReport, PropertyError>
where
    T: Clone + 'static,
    O: Into<PredicateOutcome>,
{
    let slots = gens.len();
    let mut rng = Rng::from_seed_string(&opts.seed);
    let bound = precondition_bound(opts.num_runs, 1.0);
    let mut skips = 0usize;
    for run in 0..opts.num_runs {
        let saved_rng = rng.clone();
        let samples: Vec<Shrinkable<T>> = gens.iter().map(|g| g.generate(&mut rng)).collect();
        let values: Vec<T> = samples.iter().map(|s| s.value.clone()).collect();
        if opts.verbose {
            let rendered: Vec<String> = values.iter().map(debug_string).collect();
            println!("run {run}: {}", serialize_args(&rendered));
        }
        if let Some(startup) = on_startup {
            startup();
        }
        match predicate(&values).into() {
            PredicateOutcome::Pass => {
                if let Some(cleanup) = on_cleanup {
                    cleanup();
                }
                continue;
            }
            PredicateOutcome::Precondition(_) => {
                skips += 1;
                if skips > bound {
                    return Err(PropertyError::too_many_preconditions(skips, bound));
                }
                continue;
            }
            PredicateOutcome::Fail(cause) => {
                let mut replay_rng = saved_rng;
                let mut current: Vec<Shrinkable<T>> =
                    gens.iter().map(|g| g.generate(&mut replay_rng)).collect();
                let mut history = Vec::new();
                let mut cause = cause;
                for slot in 0..slots {
                    let fixed: Vec<T> = current.iter().map(|s| s.value.clone()).collect();
                    let (shrunk, hist, new_cause) = shrink_slot(current[slot].clone(), slot, cause, |candidate| {
                        let mut trial = fixed.clone();
                        trial[slot] = candidate.clone();
                        predicate(&trial).into()
                    });
                    current[slot] = shrunk;
                    history.extend(hist);
                    cause = new_cause;
                }
                let final_values: Vec<String> =
                    current.iter().map(|s| debug_string(&s.value)).collect();
                return Err(PropertyError::failure(final_values, history, cause));
            }
        }
    }
    Ok(RunReport {
        runs: opts.num_runs,
        precondition_skips: skips,
    })
}

// ---------------------------------------------------------------------
// forAllTyped: same per-slot search as forAllN, but bounded to 50% of
// numRuns (rather than 100%), with richer type-annotated failure
// context and an up-front arity check.
// ---------------------------------------------------------------------

const TYPED_PRECONDITION_FRACTION: f64 = 0.5;

fn check_arity(declared: usize, supplied: usize) -> Result<(), PropertyError> {
    if declared != supplied {
        return Err(PropertyError::arity(declared, supplied));
    }
    Ok(())
}

pub fn for_all_typed1<A, O, F>(
    typed: &Typed1<A, F>,
    gen: &Arbitrary<A>,
    opts: &TestConfig,
) -> Result<RunReport, PropertyError>
where
    A: Clone + 'static,
    O: Into<PredicateOutcome>,
    F: Fn(&A) -> O,
{
    check_arity(typed.arity(), 1)?;
    for_all_bounded(gen, |a| typed.call(a), opts, TYPED_PRECONDITION_FRACTION)
}

pub fn for_all_typed2<A, B, O, F>(
    typed: &Typed2<A, B, F>,
    gen_a: &Arbitrary<A>,
    gen_b: &Arbitrary<B>,
    opts: &TestConfig,
) -> Result<RunReport, PropertyError>
where
    A: Clone + 'static,
    B: Clone + 'static,
    O: Into<PredicateOutcome>,
    F: Fn(&A, &B) -> O,
{
    check_arity(typed.arity(), 2)?;
    for_all2_bounded(gen_a, gen_b, |a, b| typed.call(a, b), opts, TYPED_PRECONDITION_FRACTION)
}

pub fn for_all_typed3<A, B, C, O, F>(
    typed: &Typed3<A, B, C, F>,
    gen_a: &Arbitrary<A>,
    gen_b: &Arbitrary<B>,
    gen_c: &Arbitrary<C>,
    opts: &TestConfig,
) -> Result<RunReport, PropertyError>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    O: Into<PredicateOutcome>,
    F: Fn(&A, &B, &C) -> O,
{
    check_arity(typed.arity(), 3)?;
    for_all3_bounded(
        gen_a,
        gen_b,
        gen_c,
        |a, b, c| typed.call(a, b, c),
        opts,
        TYPED_PRECONDITION_FRACTION,
    )
}

pub fn for_all_typed4<A, B, C, D, O, F>(
    typed: &Typed4<A, B, C, D, F>,
    gen_a: &Arbitrary<A>,
    gen_b: &Arbitrary<B>,
    gen_c: &Arbitrary<C>,
    gen_d: &Arbitrary<D>,
    opts: &TestConfig,
) -> Result<RunReport, PropertyError>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    D: Clone + 'static,
    O: Into<PredicateOutcome>,
    F: Fn(&A, &B, &C, &D) -> O,
{
    check_arity(typed.arity(), 4)?;
    for_all4_bounded(
        gen_a,
        gen_b,
        gen_c,
        gen_d,
        |a, b, c, d| typed.call(a, b, c, d),
        opts,
        TYPED_PRECONDITION_FRACTION,
    )
}

pub fn for_all_typed5<A, B, C, D, E, O, F>(
    typed: &Typed5<A, B, C, D, E, F>,
    gen_a: &Arbitrary<A>,
    gen_b: &Arbitrary<B>,
    gen_c: &Arbitrary<C>,
    gen_d: &Arbitrary<D>,
    gen_e: &Arbitrary<E>,
    opts: &TestConfig,
) -> Result<RunReport, PropertyError>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    D: Clone + 'static,
    E: Clone + 'static,
    O: Into<PredicateOutcome>,
    F: Fn(&A, &B, &C, &D, &E) -> O,
{
    check_arity(typed.arity(), 5)?;
    for_all5_bounded(
        gen_a,
        gen_b,
        gen_c,
        gen_d,
        gen_e,
        |a, b, c, d, e| typed.call(a, b, c, d, e),
        opts,
        TYPED_PRECONDITION_FRACTION,
    )
}

// ---------------------------------------------------------------------
// Property<T>: a fluent builder over forAllLegacy, plus `example` and
// `matrix` for exhaustive, non-random checks.
// ---------------------------------------------------------------------

/// Builds up a `TestConfig` and lifecycle hooks around a homogeneous
/// list predicate, then hands off to `for_all_legacy`.
pub struct Property<T, F> {
    predicate: F,
    config: TestConfig,
    on_startup: Option<Box<dyn Fn()>>,
    on_cleanup: Option<Box<dyn Fn()>>,
    post_check: Option<Box<dyn Fn() -> Result<(), PropertyError>>>,
    _marker: std::marker::PhantomData<T>,
}

impl<T, O, F> Property<T, F>
where
    T: Clone + 'static,
    O: Into<PredicateOutcome>,
    F: Fn(&[T]) -> O,
{
    pub fn new(predicate: F) -> Self {
        Self {
            predicate,
            config: TestConfig::default(),
            on_startup: None,
            on_cleanup: None,
            post_check: None,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn set_num_runs(mut self, num_runs: usize) -> Self {
        self.config.num_runs = num_runs;
        self
    }

    pub fn set_seed(mut self, seed: impl Into<String>) -> Self {
        self.config.seed = seed.into();
        self
    }

    pub fn set_verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn set_on_startup(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_startup = Some(Box::new(hook));
        self
    }

    pub fn set_on_cleanup(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_cleanup = Some(Box::new(hook));
        self
    }

    pub fn set_post_check(mut self, hook: impl Fn() -> Result<(), PropertyError> + 'static) -> Self {
        self.post_check = Some(Box::new(hook));
        self
    }

    /// Run `forAllLegacy` with the generators supplied for each slot.
    /// `onStartup`/`onCleanup` fire once per sample (cleanup only after a
    /// pass), and `onPostCheck` fires once after the whole run succeeds.
    pub fn for_all_legacy(&self, gens: &[Arbitrary<T>]) -> Result<RunReport, PropertyError> {
        let on_startup = self.on_startup.as_deref();
        let on_cleanup = self.on_cleanup.as_deref();
        let report = for_all_legacy_with_hooks(
            gens,
            |values| (self.predicate)(values),
            &self.config,
            on_startup,
            on_cleanup,
        )?;
        if let Some(post) = &self.post_check {
            post()?;
        }
        Ok(report)
    }

    /// Run the predicate against exactly one fixed, caller-chosen input.
    /// No generation, no shrinking: a failure is reported as-is.
    pub fn example(&self, values: Vec<T>) -> Result<(), PropertyError> {
        if let Some(startup) = &self.on_startup {
            startup();
        }
        match (self.predicate)(&values).into() {
            PredicateOutcome::Pass => {
                if let Some(cleanup) = &self.on_cleanup {
                    cleanup();
                }
                if let Some(post) = &self.post_check {
                    post()?;
                }
                Ok(())
            }
            PredicateOutcome::Precondition(reason) => Err(PropertyError::precondition(reason)),
            PredicateOutcome::Fail(cause) => Err(PropertyError::failure(
                values.iter().map(debug_string).collect(),
                Vec::new(),
                cause,
            )),
        }
    }

    /// Run the predicate over the cartesian product of the given value
    /// lists, one slot per list, stopping at the first failure. Hooks fire
    /// once per combination, same policy as `for_all_legacy`.
    pub fn matrix(&self, slots: Vec<Vec<T>>) -> Result<(), PropertyError> {
        let combos = cartesian_product(slots);
        let total = combos.len();
        let mut precondition_skips = 0usize;
        for combo in combos {
            if let Some(startup) = &self.on_startup {
                startup();
            }
            match (self.predicate)(&combo).into() {
                PredicateOutcome::Pass => {
                    if let Some(cleanup) = &self.on_cleanup {
                        cleanup();
                    }
                    continue;
                }
                PredicateOutcome::Precondition(_) => {
                    precondition_skips += 1;
                    continue;
                }
                PredicateOutcome::Fail(cause) => {
                    return Err(PropertyError::failure(
                        combo.iter().map(debug_string).collect(),
                        Vec::new(),
                        cause,
                    ));
                }
            }
        }
        if total > 0 && precondition_skips == total {
            return Err(PropertyError::all_preconditions(total));
        }
        if let Some(post) = &self.post_check {
            post()?;
        }
        Ok(())
    }
}

fn cartesian_product<T: Clone>(slots: Vec<Vec<T>>) -> Vec<Vec<T>> {
    slots.into_iter().fold(vec![Vec::new()], |acc, slot| {
        let mut next = Vec::with_capacity(acc.len() * slot.len().max(1));
        for prefix in &acc {
            for value in &slot {
                let mut combo = prefix.clone();
                combo.push(value.clone());
                next.push(combo);
            }
        }
        next
    })
}
