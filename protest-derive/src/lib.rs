//! Derive macros for the `protest` property testing library.
//!
//! `#[derive(Arbitrary)]` builds a `protest::Arbitrary<T>` generator for a
//! struct or enum, field by field (or variant by variant), the same way a
//! caller would hand-assemble one from `protest::combinators::{construct2,
//! one_of}`. `#[property_test]` is sugar over `protest::property::for_all`
//! for an ordinary `#[test]`-shaped function.
//!
//! # `#[derive(Arbitrary)]`
//!
//! ```ignore
//! use protest::Arbitrary;
//!
//! #[derive(Arbitrary, Clone, Debug)]
//! struct User {
//!     #[generator(protest::integer(0, 150).map(|v| v as u32))]
//!     age: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let gen = User::arbitrary();
//! ```
//!
//! A field with no `#[generator(...)]` attribute falls back to its type's
//! `protest::DefaultGenerator` implementation. Enum variants may carry
//! `#[weight(N)]`, combined via `protest::one_of`'s weight policy.
//!
//! # `#[property_test]`
//!
//! ```ignore
//! #[protest::property_test]
//! fn addition_commutes(a: i64, b: i64) {
//!     assert_eq!(a + b, b + a);
//! }
//! ```
//!
//! expands to a `#[test]` function that draws `a`/`b` from
//! `i64::default_generator()` and runs the body through `forAll2`,
//! shrinking on panic (including a failed `assert!`/`assert_eq!`) the same
//! way the core runner shrinks on `PredicateOutcome::Fail`.

use proc_macro::TokenStream;

mod derive;

#[proc_macro_derive(Arbitrary, attributes(generator, weight))]
pub fn derive_arbitrary(input: TokenStream) -> TokenStream {
    derive::derive_arbitrary_impl(input)
}

/// `#[property_test(num_runs = 200, seed = "...", verbose = false)]`, all
/// arguments optional and defaulting the same way `protest::TestConfig`
/// does.
#[proc_macro_attribute]
pub fn property_test(args: TokenStream, input: TokenStream) -> TokenStream {
    property_test::property_test_impl(args, input)
}
