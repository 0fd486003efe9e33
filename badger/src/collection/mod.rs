//! Typed document storage.
//!
//! A [`Collection`] stores documents of one [`Document`] type, described by a
//! [`Schema`], and exposes the [`DocumentSource`] matching primitives that
//! queries are evaluated against.

mod builder;
mod config;
mod doc_id;
mod doc_set;
mod doc_source;
mod document_collection;
mod schema;
mod text_index;

pub use builder::*;
pub use config::*;
pub use doc_id::*;
pub use doc_set::*;
pub use doc_source::*;
pub use document_collection::*;
pub use schema::*;
