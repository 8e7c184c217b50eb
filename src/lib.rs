//! An embeddable, concatenative, always-be-compiling stack language: a
//! tokenizer/compiler (`runtime::interpret`) that appends every word it
//! reads to a compilation target immediately, running only the words
//! marked `immediate`, and an executor (`runtime::query`/`inner_next`)
//! that threads through the resulting compiled bodies one cell at a time.
//!
//! An embedder builds a dictionary once with [`Runtime::bootstrap`], then
//! hands out a fresh [`Runtime::new_ctx`] per independent session, sharing
//! the same dictionary and a [`host::HostBridge`] of its choosing.

pub mod boot;
pub mod context;
pub mod cursor;
pub mod dictionary;
pub mod error;
pub mod host;
pub mod internals;
pub mod runtime;
pub mod value;

pub use context::Context;
pub use dictionary::{Dictionary, DictionaryEntry};
pub use error::ForthError;
pub use host::{HostBridge, PlainObjectHost};
pub use runtime::Runtime;
pub use value::Value;
