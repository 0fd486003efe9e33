use crate::errors::{BadgerError, BadgerResult, ErrorKind};

/// Settings a [`Collection`](crate::collection::Collection) is built from.
///
/// With the `serde` feature (on by default) the configuration can be loaded
/// from any serde format; missing keys fall back to their defaults.
///
/// ```rust
/// use badger::collection::CollectionConfig;
///
/// let mut config = CollectionConfig::new();
/// config.set_default_field("title").unwrap();
/// config.add_whole_word_field("content").unwrap();
/// assert_eq!(config.default_field(), Some("title"));
/// assert_eq!(config.whole_word_fields(), &["content".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CollectionConfig {
    default_field: Option<String>,
    whole_word_fields: Vec<String>,
}

impl CollectionConfig {
    pub fn new() -> Self {
        CollectionConfig::default()
    }

    /// Field searched by query terms that carry no `field:` qualifier.
    pub fn default_field(&self) -> Option<&str> {
        self.default_field.as_deref()
    }

    /// Sets the default field.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if `name` is blank.
    pub fn set_default_field(&mut self, name: &str) -> BadgerResult<()> {
        let name = check_name(name, "default field")?;
        self.default_field = Some(name.to_string());
        Ok(())
    }

    /// Fields whose contains-queries match on word boundaries.
    pub fn whole_word_fields(&self) -> &[String] {
        &self.whole_word_fields
    }

    /// Marks a field as whole-word. Adding a field twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if `name` is blank.
    pub fn add_whole_word_field(&mut self, name: &str) -> BadgerResult<()> {
        let name = check_name(name, "whole-word field")?;
        let folded = name.to_lowercase();
        if !self
            .whole_word_fields
            .iter()
            .any(|f| f.to_lowercase() == folded)
        {
            self.whole_word_fields.push(name.to_string());
        }
        Ok(())
    }
}

fn check_name<'a>(name: &'a str, what: &str) -> BadgerResult<&'a str> {
    let name = name.trim();
    if name.is_empty() {
        log::error!("Blank {} name", what);
        return Err(BadgerError::new(
            &format!("{} name cannot be blank", what),
            ErrorKind::InvalidOperation,
        ));
    }
    Ok(name)
}
