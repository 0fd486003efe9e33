//! # Badger - in-process document store
//!
//! Badger keeps typed records in memory and finds them with a small boolean
//! query language:
//!
//! ```text
//! tags:fruit AND date:[2010-01-01 TO 2010-12-31] -title:"banana split"
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use badger::collection::{Collection, Document, Schema};
//! use badger::errors::BadgerResult;
//!
//! struct Article {
//!     title: String,
//!     tags: Vec<String>,
//!     content: String,
//! }
//!
//! impl Document for Article {
//!     fn schema() -> BadgerResult<Schema<Self>> {
//!         Schema::builder()
//!             .string("title", |a: &Article| a.title.as_str())
//!             .string_list("tags", |a: &Article| a.tags.as_slice())
//!             .string("content", |a: &Article| a.content.as_str())
//!             .build()
//!     }
//! }
//!
//! # fn main() -> BadgerResult<()> {
//! let articles = Collection::<Article>::builder()
//!     .default_field("title")
//!     .whole_word_field("content")
//!     .build()?;
//!
//! articles.insert(Article {
//!     title: "Weekly Citrus Roundup".into(),
//!     tags: vec!["citrus".into()],
//!     content: "Grapefruit are awesome.".into(),
//! });
//!
//! assert_eq!(articles.search("tags:citrus")?.len(), 1);
//! assert!(articles.search("content:grape")?.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! Structs can derive their schema with `#[derive(Document)]` from the
//! `badger_derive` crate instead of writing it by hand.
//!
//! ## Module Organization
//!
//! - [`collection`] - Documents, schemas, and the collection store
//! - [`common`] - Locking and text tokenization
//! - [`errors`] - Error types and result definitions
//! - [`query`] - Lexer, parser, query tree, and evaluation

pub mod collection;
pub mod common;
pub mod errors;
pub mod query;
