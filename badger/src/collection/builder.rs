use crate::collection::{Collection, CollectionConfig, Document};
use crate::common::{Tokenizer, TokenizerProvider};
use crate::errors::{BadgerError, BadgerResult};
use std::marker::PhantomData;

/// Fluent construction of a [`Collection`].
///
/// Errors raised by individual settings are held back and reported by
/// [`build`](CollectionBuilder::build).
///
/// ```rust
/// use badger::collection::{Collection, Document, Schema};
/// use badger::errors::BadgerResult;
///
/// struct Article {
///     title: String,
///     content: String,
/// }
///
/// impl Document for Article {
///     fn schema() -> BadgerResult<Schema<Self>> {
///         Schema::builder()
///             .string("title", |a: &Article| a.title.as_str())
///             .string("content", |a: &Article| a.content.as_str())
///             .build()
///     }
/// }
///
/// let articles = Collection::<Article>::builder()
///     .default_field("title")
///     .whole_word_field("content")
///     .build()
///     .unwrap();
/// assert_eq!(articles.default_field(), Some("title"));
/// ```
pub struct CollectionBuilder<D: Document> {
    config: CollectionConfig,
    tokenizer: Tokenizer,
    error: Option<BadgerError>,
    _marker: PhantomData<fn() -> D>,
}

impl<D: Document> CollectionBuilder<D> {
    pub fn new() -> Self {
        CollectionBuilder {
            config: CollectionConfig::new(),
            tokenizer: Tokenizer::default(),
            error: None,
            _marker: PhantomData,
        }
    }

    pub fn default_field(mut self, name: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_default_field(name) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn whole_word_field(mut self, name: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.add_whole_word_field(name) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Replaces the whole configuration, discarding earlier settings.
    pub fn config(mut self, config: CollectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the tokenizer used for whole-word fields.
    pub fn tokenizer<T: TokenizerProvider + 'static>(mut self, tokenizer: T) -> Self {
        self.tokenizer = Tokenizer::new(tokenizer);
        self
    }

    /// Builds the collection.
    ///
    /// # Errors
    ///
    /// Returns the first error captured by a setter, or a `SchemaError` if the
    /// document schema is invalid or a configured field does not exist.
    pub fn build(self) -> BadgerResult<Collection<D>> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Collection::with_config(self.config, self.tokenizer)
    }
}

impl<D: Document> Default for CollectionBuilder<D> {
    fn default() -> Self {
        CollectionBuilder::new()
    }
}
