//! The query language.
//!
//! A query string is lexed into [`Token`]s, parsed into a [`Query`] tree and
//! evaluated against a [`DocumentSource`](crate::collection::DocumentSource).
//!
//! ```text
//! tags:(cheese OR moon) -title:"recipe" date:[2010-01-01 TO 2010-12-31]
//! ```

mod ast;
mod engine;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::*;
pub use parser::*;
