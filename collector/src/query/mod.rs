//! Query chains and their results.
//!
//! Queries are built fluently from a model through [`QueryApi`]:
//!
//! ```rust,ignore
//! use collector::query::QueryApi;
//!
//! let hits = model
//!     .prefix(["ba"])
//!     .when(Some(1_600_000_000_000), None)
//!     .execute()?
//!     .all()?;
//! ```
//!
//! Each call adds a node to a persistent chain. On execution the chain is
//! compiled into wire parameters ordered by node kind: prefixes first, then
//! the time range, then key selections, and finally the metadata request.

mod query;
mod query_result;

pub use query::*;
pub use query_result::*;
