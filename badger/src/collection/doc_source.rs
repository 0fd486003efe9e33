use crate::collection::DocSet;
use crate::errors::BadgerResult;

/// Field-level matching primitives a query is evaluated against.
///
/// [`Collection`](crate::collection::Collection) implements this by taking a
/// shared lock per call. Inside the collection the same trait is implemented
/// over already-locked state, so a whole query runs under one lock.
pub trait DocumentSource {
    /// Returns every document identity.
    fn find_all(&self) -> DocSet;

    /// Returns the documents whose `field` satisfies `predicate`.
    ///
    /// For a string-list field a single matching element is enough.
    ///
    /// # Errors
    ///
    /// Returns a `SchemaError` if `field` is unknown or unsupported.
    fn match_field(&self, field: &str, predicate: &dyn Fn(&str) -> bool) -> BadgerResult<DocSet>;

    /// Returns `true` if contains-queries on `field` match whole words only.
    ///
    /// # Errors
    ///
    /// Returns a `SchemaError` if `field` is unknown or unsupported.
    fn is_whole_word(&self, field: &str) -> BadgerResult<bool>;

    /// Returns the documents whose `field` contains the words of `phrase` as
    /// one contiguous run.
    ///
    /// # Errors
    ///
    /// Returns a `SchemaError` if `field` is unknown or unsupported.
    fn match_phrase(&self, field: &str, phrase: &str) -> BadgerResult<DocSet>;
}
