#![allow(clippy::module_inception, clippy::should_implement_trait)]
//! # Collector - Object-mapped client for remote key-value collections
//!
//! Collector maps the records of a remote collection store onto typed model
//! instances and lets them be queried through fluent, composable query chains.
//!
//! ## Key Features
//!
//! - **Declared fields**: model types list their fields; only those are saved
//! - **Identity**: every record carries an immutable `_key` and `_ts`
//! - **Query chains**: key selection, time ranges and key prefixes combine in
//!   any order and compile to a canonical parameter list
//! - **Lazy results**: responses are decoded one record at a time
//! - **Pluggable bindings**: the remote HTTP API or a process-local store
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use collector::collection::HttpCollection;
//! use collector::model::{Field, Model};
//! use collector::query::QueryApi;
//! use collector_derive::ModelSchema;
//!
//! #[derive(ModelSchema)]
//! pub struct Product {
//!     name: Field,
//!     price: Field,
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let collection = HttpCollection::builder()
//!     .project_id(1234)
//!     .collection("products")
//!     .build_collection()?;
//!
//! let products = Model::<Product>::empty(collection);
//! for product in &products.prefix(["shoe-"]).execute()? {
//!     let product = product?;
//!     println!("{} {}", product.key().unwrap_or_default(), product.name());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`codec`] - JSON-lines encoding of records
//! - [`collection`] - Collection bindings and their configuration
//! - [`common`] - Values, records and shared constants
//! - [`errors`] - Error types and result definitions
//! - [`model`] - Field declarations and model instances
//! - [`query`] - Query chains and query results
//! - [`transport`] - Blocking HTTP transport

pub mod codec;
pub mod collection;
pub mod common;
pub mod errors;
pub mod model;
pub mod query;
pub mod transport;

pub use errors::{CollectorError, CollectorResult, ErrorKind};
