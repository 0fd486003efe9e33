//! Shared building blocks: locking and text tokenization.

mod lock;
mod tokenizer;

pub use lock::*;
pub use tokenizer::*;
