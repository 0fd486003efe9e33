use std::fmt::Debug;
use std::ops::Deref;
use std::sync::Arc;

/// Splits free text into normalized search terms.
///
/// A `TokenizerProvider` decides what a "word" is for whole-word matching.
/// The same provider is used to build a collection's inverted index and to
/// break a query phrase apart, so both sides always agree on term boundaries.
///
/// Implementations must be pure: the same input always yields the same terms.
pub trait TokenizerProvider: Send + Sync + Debug {
    /// Tokenizes `text` into an ordered list of terms.
    ///
    /// # Arguments
    /// * `text` - The text to tokenize
    ///
    /// # Returns
    /// The terms in the order they occur, duplicates preserved.
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Default word tokenizer.
///
/// Lowercases the input, splits it on whitespace, strips every character that
/// is not a letter or a digit from each chunk and drops chunks left empty.
///
/// Letters are alphabetic characters outside the numeric categories, so
/// roman numerals such as `Ⅻ` are dropped. Digits are `0`-`9` only;
/// superscripts, fractions and non-ASCII decimal digits are dropped too.
///
/// ```rust
/// use badger::common::{TokenizerProvider, WordTokenizer};
///
/// let terms = WordTokenizer.tokenize("Fred's hat!");
/// assert_eq!(terms, vec!["freds", "hat"]);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct WordTokenizer;

impl TokenizerProvider for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split_whitespace()
            .map(|chunk| chunk.chars().filter(|c| is_word_char(*c)).collect::<String>())
            .filter(|term| !term.is_empty())
            .collect()
    }
}

fn is_word_char(c: char) -> bool {
    (c.is_alphabetic() && !c.is_numeric()) || c.is_ascii_digit()
}

/// Shared handle to a [`TokenizerProvider`].
///
/// Cloning is cheap; all clones share the same provider.
#[derive(Clone, Debug)]
pub struct Tokenizer {
    inner: Arc<dyn TokenizerProvider>,
}

impl Tokenizer {
    pub fn new<T: TokenizerProvider + 'static>(provider: T) -> Self {
        Tokenizer {
            inner: Arc::new(provider),
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Tokenizer::new(WordTokenizer)
    }
}

impl Deref for Tokenizer {
    type Target = Arc<dyn TokenizerProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Tokenizes `text` with the default [`WordTokenizer`].
///
/// ```rust
/// use badger::common::tokenize;
///
/// assert_eq!(tokenize("Hello There"), vec!["hello", "there"]);
/// assert!(tokenize("  !? ").is_empty());
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    WordTokenizer.tokenize(text)
}

/// Returns `true` when `needle` occurs in `haystack` as one contiguous run.
///
/// An empty needle occurs everywhere.
pub fn contains_run(haystack: &[String], needle: &[String]) -> bool {
    if needle.is_empty() {
        return true;
    }
    if needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}
