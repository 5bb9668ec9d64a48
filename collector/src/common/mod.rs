//! Common types shared by every other module: values, records, constants and
//! small helpers.

mod constants;
mod param;
mod record;
mod util;
mod value;

pub use constants::*;
pub use param::*;
pub use record::*;
pub use util::*;
pub use value::*;
