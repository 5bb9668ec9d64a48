//! Collection bindings: the remote endpoint a model reads from and writes to.
//!
//! [`Collection`] is the shared handle models hold. [`HttpCollection`] talks
//! to the remote collections API; [`InMemoryCollection`] keeps records in the
//! process and answers the same wire protocol.

mod collection;
mod config;
mod http_collection;
mod memory;

pub use collection::*;
pub use config::*;
pub use http_collection::*;
pub use memory::*;
