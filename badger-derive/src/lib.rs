#![recursion_limit = "128"]
//! # Badger Derive Macros
//!
//! This crate provides the `Document` derive macro, which generates the
//! schema a `badger::collection::Collection` needs from a struct definition.
//!
//! ## Field mapping
//!
//! | field type       | schema kind          |
//! |------------------|----------------------|
//! | `String`         | string               |
//! | `Option<String>` | string (`None` reads as `""`) |
//! | `Vec<String>`    | string list          |
//! | anything else    | unsupported (listed, not searchable) |
//!
//! ## Field attributes
//!
//! - `#[badger(rename = "name")]` - use a different field name in queries
//! - `#[badger(skip)]` - leave the field out of the schema
//! - `#[badger(embed)]` - include the fields of a nested `Document` as `field.child`
//! - `#[badger(flatten)]` - include the fields of a nested `Document` without a prefix
//!
//! # Examples
//!
//! ```rust,ignore
//! use badger_derive::Document;
//!
//! #[derive(Document)]
//! pub struct Details {
//!     pub name: String,
//!     pub shoe_size: u32,
//! }
//!
//! #[derive(Document)]
//! pub struct Shoe {
//!     pub id: i64,
//!     pub colour: String,
//!     pub tags: Vec<String>,
//!     #[badger(embed)]
//!     pub details: Details,
//! }
//!
//! // fields: id, colour, tags, details.name, details.shoe_size
//! ```

extern crate proc_macro;
mod document;

use crate::document::generate_document_for_struct;
use proc_macro::TokenStream;
use syn::{Data, DeriveInput};

/// Derives `badger::collection::Document` for a struct with named fields.
///
/// # Errors
///
/// Returns a compile error if:
/// - The type is an enum or a union
/// - The struct is a tuple or unit struct
/// - A `#[badger(...)]` attribute is unknown or combined inconsistently
#[proc_macro_derive(Document, attributes(badger))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    match ast.data {
        Data::Struct(ref data) => match generate_document_for_struct(&ast, data) {
            Ok(token_stream) => token_stream,
            Err(e) => e.to_compile_error().into(),
        },
        Data::Enum(_) => {
            let error = syn::Error::new_spanned(
                &ast,
                "Cannot derive Document for enums. Only structs with named fields are supported.",
            );
            error.to_compile_error().into()
        }
        Data::Union(_) => {
            let error = syn::Error::new_spanned(
                &ast,
                "Cannot derive Document for unions. Only structs with named fields are supported.",
            );
            error.to_compile_error().into()
        }
    }
}
