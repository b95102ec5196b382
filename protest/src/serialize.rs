//! Deterministic, compact debug serialization used when reporting
//! counterexamples and shrink steps. Delegates to `Debug` for leaf
//! values, but gives the runner one place to reformat composite shapes
//! (lists, maps) consistently regardless of what container a generator
//! happens to produce.

use std::fmt::Debug;

/// Render a value the way a failure report should show it.
pub fn debug_string<T: Debug>(value: &T) -> String {
    format!("{value:?}")
}

/// Render a fixed-size group of already-serialized argument strings as
/// the bracketed list that appears in `PropertyError::Failure`.
pub fn serialize_args(args: &[String]) -> String {
    format!("[{}]", args.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_string_matches_debug_format() {
        assert_eq!(debug_string(&42), "42");
        assert_eq!(debug_string(&vec![1, 2, 3]), "[1, 2, 3]");
        assert_eq!(debug_string(&"hi".to_string()), "\"hi\"");
    }

    #[test]
    fn serialize_args_brackets_and_joins() {
        assert_eq!(
            serialize_args(&["1".to_string(), "\"x\"".to_string()]),
            "[1, \"x\"]"
        );
    }
}
