//! Blocking HTTP transport used by [`crate::collection::HttpCollection`].

mod http_connection;

pub use http_connection::*;
