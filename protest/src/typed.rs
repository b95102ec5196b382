//! Typed-function wrappers for `forAllTyped`: a predicate bundled with
//! the argument type names it was declared against, so a failure report
//! can say what was expected rather than just what was observed.

use crate::error::PredicateOutcome;

macro_rules! typed_function {
    ($name:ident, $arity:expr, ($($arg:ident : $ty:ident),+), $call:ident($($pos:tt),+)) => {
        pub struct $name<$($ty,)+ F> {
            f: F,
            type_names: [&'static str; $arity],
            _marker: std::marker::PhantomData<($($ty,)+)>,
        }

        impl<$($ty: 'static,)+ O, F> $name<$($ty,)+ F>
        where
            F: Fn($(&$ty),+) -> O,
            O: Into<PredicateOutcome>,
        {
            pub fn new(f: F) -> Self {
                Self {
                    f,
                    type_names: [$(std::any::type_name::<$ty>()),+],
                    _marker: std::marker::PhantomData,
                }
            }

            pub fn arity(&self) -> usize {
                $arity
            }

            pub fn type_names(&self) -> &[&'static str] {
                &self.type_names
            }

            pub fn $call(&self, $($arg: &$ty),+) -> PredicateOutcome {
                (self.f)($($pos),+).into()
            }
        }
    };
}

typed_function!(Typed1, 1, (a: A), call(a));
typed_function!(Typed2, 2, (a: A, b: B), call(a, b));
typed_function!(Typed3, 3, (a: A, b: B, c: C), call(a, b, c));
typed_function!(Typed4, 4, (a: A, b: B, c: C, d: D), call(a, b, c, d));
typed_function!(Typed5, 5, (a: A, b: B, c: C, d: D, e: E), call(a, b, c, d, e));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_declared_arity_and_type_names() {
        let typed = Typed2::<i64, String, _>::new(|a: &i64, b: &String| *a as usize == b.len());
        assert_eq!(typed.arity(), 2);
        assert!(typed.type_names()[0].contains("i64"));
        assert!(typed.type_names()[1].contains("String"));
    }

    #[test]
    fn call_forwards_into_predicate_outcome() {
        let typed = Typed1::<i64, _>::new(|a: &i64| *a > 0);
        assert!(matches!(typed.call(&1), PredicateOutcome::Pass));
        assert!(matches!(typed.call(&-1), PredicateOutcome::Fail(_)));
    }
}
