//! Line-record codec for the remote store's newline-delimited JSON protocol.

mod json_lines;

pub use json_lines::*;
