//! # protest-stateful
//!
//! Stateful property testing on top of [`protest`]: generate a random
//! initial state, draw a sequence of actions against it and an optional
//! reference model, and shrink a failing trace on two axes (the initial
//! state, then the trace length) the same way [`protest::property`]
//! shrinks argument tuples.
//!
//! ## Quick example
//!
//! ```rust
//! use protest::combinators::{one_of, WeightedValue};
//! use protest::error::PredicateOutcome;
//! use protest::integer;
//! use protest_stateful::{simple_stateful_property, SimpleAction};
//! use std::rc::Rc;
//!
//! let init_gen = protest::combinators::just(Vec::<i64>::new());
//! let property = simple_stateful_property(init_gen, |_state: &Vec<i64>| {
//!     one_of(vec![
//!         WeightedValue::new(integer(0, 100).map(|v| {
//!             Rc::new(SimpleAction::new(format!("push({v})"), move |state: &mut Vec<i64>| {
//!                 state.push(v);
//!                 PredicateOutcome::Pass
//!             })) as Rc<dyn protest_stateful::Action<Vec<i64>, ()>>
//!         })),
//!         WeightedValue::new(protest::combinators::just(Rc::new(SimpleAction::new(
//!             "pop",
//!             |state: &mut Vec<i64>| {
//!                 if state.is_empty() {
//!                     return PredicateOutcome::Precondition("stack is empty".into());
//!                 }
//!                 state.pop();
//!                 PredicateOutcome::Pass
//!             },
//!         )) as Rc<dyn protest_stateful::Action<Vec<i64>, ()>>)),
//!     ])
//! })
//! .set_num_runs(50);
//!
//! assert!(property.go().is_ok());
//! ```

pub mod property;

pub use property::{
    simple_stateful_property, stateful_property, Action, SimpleAction, StatefulProperty,
};

/// Convenience re-exports.
pub mod prelude {
    pub use crate::property::{
        simple_stateful_property, stateful_property, Action, SimpleAction, StatefulProperty,
    };
}
