//! Primitive generators and their shrinkers: boolean, integer, float,
//! string, array, set, dictionary, tuple, permutation.

pub mod array;
pub mod boolean;
pub mod dictionary;
pub mod float;
pub mod integer;
pub mod permutation;
pub mod set;
pub mod string;
pub mod tuple;

pub use array::array;
pub use boolean::boolean;
pub use dictionary::dictionary;
pub use float::float;
pub use integer::{integer, integer_sized, non_negative_integer};
pub use permutation::permutation;
pub use set::set;
pub use string::string;
pub use tuple::{tuple2, tuple3, tuple4, tuple5};
