//! Expressions and values.
//!
//! Sprig is homoiconic: a read expression, an expanded canonical form and a
//! runtime result are all [`Value`]s.

pub mod number;
pub mod value;

pub use number::{Complex, Number};
pub use value::Value;
