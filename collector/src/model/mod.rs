//! Model types: declared field sets and the instances mapped onto them.
//!
//! A model type is a struct of [`Field`] markers deriving [`ModelSchema`];
//! [`Model`] carries the values of one record of that type together with
//! its identity and collection binding.

mod field;
mod model;

pub use field::*;
pub use model::*;
