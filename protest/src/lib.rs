#![allow(clippy::too_many_arguments)]

//! # protest
//!
//! A property-based testing engine: generators with integrated shrinking,
//! a small combinator algebra, and a seeded property runner.
//!
//! Generators are values (`Arbitrary<T>`), not trait objects: build one
//! from a primitive (`integer`, `string`, ...), combine it with the
//! others in [`combinators`], and hand it to [`property::for_all`] (or
//! one of its `forAllN`/`forAllTyped`/`forAllLegacy` siblings) along with
//! a predicate.
//!
//! ```
//! use protest::{combinators::just, primitives::integer, property};
//!
//! let gen = integer(0, 100);
//! let result = property::for_all(&gen, |n: &i64| *n >= 0, &protest::config::TestConfig::default());
//! assert!(result.is_ok());
//! let _ = just(0); // combinators are reachable from the crate root too
//! ```

pub mod combinators;
pub mod config;
pub mod default_generator;
pub mod error;
pub mod generator;
pub mod lazy_stream;
pub mod primitives;
pub mod property;
pub mod rng;
pub mod serialize;
pub mod shrinkable;
pub mod typed;
pub mod vector_shrink;

#[cfg(feature = "asynchronous")]
pub mod asynchronous;

pub use combinators::{
    chain_tuple, construct2, construct3, element_of, just, lazy, one_of, WeightedValue,
};
pub use config::{ConfigError, GeneratorConfig, StatefulConfig, TestConfig};
pub use default_generator::DefaultGenerator;
pub use error::{PredicateOutcome, PropertyError, ShrinkStep};
pub use generator::{Arbitrary, Generator};
pub use lazy_stream::LazyStream;
pub use primitives::{
    array, boolean, dictionary, float, integer, integer_sized, non_negative_integer, permutation,
    set, string, tuple2, tuple3, tuple4, tuple5,
};
pub use property::{
    for_all, for_all2, for_all3, for_all4, for_all5, for_all_legacy, for_all_typed1,
    for_all_typed2, for_all_typed3, for_all_typed4, for_all_typed5, Property, RunReport,
};
pub use rng::Rng;
pub use shrinkable::Shrinkable;
pub use typed::{Typed1, Typed2, Typed3, Typed4, Typed5};
pub use vector_shrink::shrink_vector;

#[cfg(feature = "asynchronous")]
pub use asynchronous::for_all_async;

#[cfg(feature = "derive")]
pub use protest_derive::{property_test, Arbitrary};
