use crate::errors::{BadgerError, BadgerResult, ErrorKind};
use indexmap::IndexMap;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// A record type that can be stored in a [`Collection`](crate::collection::Collection).
///
/// The schema is produced once when a collection is built and fixes the
/// searchable fields for every document of the type. It is usually generated
/// with `#[derive(Document)]` from the `badger_derive` crate, but can be
/// written by hand with a [`SchemaBuilder`].
///
/// ```rust
/// use badger::collection::{Document, Schema};
/// use badger::errors::BadgerResult;
///
/// struct Note {
///     title: String,
///     tags: Vec<String>,
/// }
///
/// impl Document for Note {
///     fn schema() -> BadgerResult<Schema<Self>> {
///         Schema::builder()
///             .string("title", |n: &Note| n.title.as_str())
///             .string_list("tags", |n: &Note| n.tags.as_slice())
///             .build()
///     }
/// }
///
/// let schema = Note::schema().unwrap();
/// assert_eq!(schema.field_names(), vec!["title", "tags"]);
/// ```
pub trait Document: Send + Sync + 'static {
    fn schema() -> BadgerResult<Schema<Self>>
    where
        Self: Sized;
}

/// Kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A single string
    String,
    /// A list of strings; a match on any element matches the document
    StringList,
    /// A field that exists but cannot be searched
    Unsupported,
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::StringList => write!(f, "string list"),
            FieldKind::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// A borrowed view of one field of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Str(&'a str),
    List(&'a [String]),
}

impl<'a> FieldValue<'a> {
    /// Returns `true` if `predicate` holds for the string, or for any element
    /// of the list.
    pub fn any<P: Fn(&str) -> bool + ?Sized>(&self, predicate: &P) -> bool {
        match *self {
            FieldValue::Str(s) => predicate(s),
            FieldValue::List(items) => items.iter().any(|s| predicate(s.as_str())),
        }
    }

    /// Iterates the individual strings of the value.
    pub fn strings(&self) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        match *self {
            FieldValue::Str(s) => Box::new(std::iter::once(s)),
            FieldValue::List(items) => Box::new(items.iter().map(String::as_str)),
        }
    }
}

/// Reads one field out of a document.
pub type Accessor<D> = Arc<dyn for<'a> Fn(&'a D) -> FieldValue<'a> + Send + Sync>;

fn accessor<D, F>(f: F) -> Accessor<D>
where
    F: for<'a> Fn(&'a D) -> FieldValue<'a> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Name, kind and accessor of a single field.
pub struct FieldDescriptor<D> {
    name: String,
    kind: FieldKind,
    accessor: Option<Accessor<D>>,
}

impl<D> FieldDescriptor<D> {
    /// Field name as declared, including any dotted prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Reads the field from `doc`. Unsupported fields have no value.
    pub fn value<'a>(&self, doc: &'a D) -> Option<FieldValue<'a>> {
        self.accessor.as_ref().map(|read| read(doc))
    }
}

impl<D> Clone for FieldDescriptor<D> {
    fn clone(&self) -> Self {
        FieldDescriptor {
            name: self.name.clone(),
            kind: self.kind,
            accessor: self.accessor.clone(),
        }
    }
}

impl<D> Debug for FieldDescriptor<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// The fixed set of fields of a document type.
///
/// Fields keep their declaration order and are looked up case-insensitively.
pub struct Schema<D> {
    fields: IndexMap<String, FieldDescriptor<D>>,
}

impl<D: 'static> Schema<D> {
    /// Starts a new [`SchemaBuilder`].
    pub fn builder() -> SchemaBuilder<D> {
        SchemaBuilder::new()
    }

    /// Returns the field names in declaration order.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.values().map(|f| f.name.clone()).collect()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor<D>> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks a field up by name, ignoring case, without checking its kind.
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor<D>> {
        self.fields.get(&name.to_lowercase())
    }

    /// Resolves a field that can be matched against.
    ///
    /// # Errors
    ///
    /// Returns a `SchemaError` when the field does not exist or has an
    /// unsupported kind.
    pub fn resolve(&self, name: &str) -> BadgerResult<&FieldDescriptor<D>> {
        match self.get(name) {
            Some(field) if field.kind == FieldKind::Unsupported => {
                log::error!("Field {} has an unsupported type", field.name);
                Err(BadgerError::new(
                    &format!("field {} has an unsupported type", field.name),
                    ErrorKind::SchemaError,
                ))
            }
            Some(field) => Ok(field),
            None => {
                log::error!("Couldn't resolve field {}", name);
                Err(BadgerError::new(
                    &format!("couldn't resolve field {}", name),
                    ErrorKind::SchemaError,
                ))
            }
        }
    }
}

impl<D> Clone for Schema<D> {
    fn clone(&self) -> Self {
        Schema {
            fields: self.fields.clone(),
        }
    }
}

impl<D> Debug for Schema<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.fields.values()).finish()
    }
}

/// Builds a [`Schema`] field by field.
///
/// The first error hit while adding fields is kept and returned by
/// [`build`](SchemaBuilder::build); later calls are ignored.
pub struct SchemaBuilder<D> {
    fields: Vec<FieldDescriptor<D>>,
    error: Option<BadgerError>,
}

impl<D: 'static> SchemaBuilder<D> {
    pub fn new() -> Self {
        SchemaBuilder {
            fields: Vec::new(),
            error: None,
        }
    }

    /// Adds a string field.
    pub fn string<F>(mut self, name: &str, read: F) -> Self
    where
        F: for<'a> Fn(&'a D) -> &'a str + Send + Sync + 'static,
    {
        self.push(name, FieldKind::String, Some(accessor(move |d| FieldValue::Str(read(d)))));
        self
    }

    /// Adds an optional string field. A missing value reads as the empty string.
    pub fn optional_string<F>(mut self, name: &str, read: F) -> Self
    where
        F: for<'a> Fn(&'a D) -> Option<&'a str> + Send + Sync + 'static,
    {
        self.push(
            name,
            FieldKind::String,
            Some(accessor(move |d| FieldValue::Str(read(d).unwrap_or("")))),
        );
        self
    }

    /// Adds a string-list field.
    pub fn string_list<F>(mut self, name: &str, read: F) -> Self
    where
        F: for<'a> Fn(&'a D) -> &'a [String] + Send + Sync + 'static,
    {
        self.push(name, FieldKind::StringList, Some(accessor(move |d| FieldValue::List(read(d)))));
        self
    }

    /// Adds a field that is listed but cannot be searched.
    pub fn unsupported(mut self, name: &str) -> Self {
        self.push(name, FieldKind::Unsupported, None);
        self
    }

    /// Adds the fields of an embedded record under `prefix.`.
    pub fn embed<S, F>(self, prefix: &str, project: F) -> Self
    where
        S: Document,
        F: for<'a> Fn(&'a D) -> &'a S + Send + Sync + 'static,
    {
        if prefix.trim().is_empty() {
            return self.fail("embedded record needs a non-empty prefix");
        }
        self.nest(Some(prefix), project)
    }

    /// Adds the fields of an embedded record without a prefix.
    pub fn flatten<S, F>(self, project: F) -> Self
    where
        S: Document,
        F: for<'a> Fn(&'a D) -> &'a S + Send + Sync + 'static,
    {
        self.nest(None, project)
    }

    /// Validates the collected fields and builds the schema.
    ///
    /// # Errors
    ///
    /// Returns a `SchemaError` for an empty schema, an empty field name, a
    /// duplicate (case-insensitive) field name, or any error captured while
    /// adding fields.
    pub fn build(self) -> BadgerResult<Schema<D>> {
        if let Some(err) = self.error {
            return Err(err);
        }

        if self.fields.is_empty() {
            log::error!("Schema has no fields");
            return Err(BadgerError::new("schema has no fields", ErrorKind::SchemaError));
        }

        let mut fields = IndexMap::with_capacity(self.fields.len());
        for field in self.fields {
            let key = field.name.to_lowercase();
            if fields.contains_key(&key) {
                log::error!("Duplicate field {} in schema", field.name);
                return Err(BadgerError::new(
                    &format!("duplicate field {}", field.name),
                    ErrorKind::SchemaError,
                ));
            }
            fields.insert(key, field);
        }
        Ok(Schema { fields })
    }

    fn nest<S, F>(mut self, prefix: Option<&str>, project: F) -> Self
    where
        S: Document,
        F: for<'a> Fn(&'a D) -> &'a S + Send + Sync + 'static,
    {
        if self.error.is_some() {
            return self;
        }

        let child = match S::schema() {
            Ok(schema) => schema,
            Err(err) => {
                let message = format!(
                    "failed to build schema of embedded {}",
                    prefix.unwrap_or("record")
                );
                log::error!("{}", message);
                self.error = Some(BadgerError::new_with_cause(
                    &message,
                    ErrorKind::SchemaError,
                    err,
                ));
                return self;
            }
        };

        let project = Arc::new(project);
        for field in child.fields.into_values() {
            let name = match prefix {
                Some(prefix) => format!("{}.{}", prefix, field.name),
                None => field.name,
            };
            let composed = field.accessor.map(|read| {
                let project = Arc::clone(&project);
                accessor(move |d: &D| read(project(d)))
            });
            self.push(&name, field.kind, composed);
        }
        self
    }

    fn push(&mut self, name: &str, kind: FieldKind, accessor: Option<Accessor<D>>) {
        if self.error.is_some() {
            return;
        }
        if name.trim().is_empty() {
            log::error!("Schema field name is empty");
            self.error = Some(BadgerError::new(
                "field name cannot be empty",
                ErrorKind::SchemaError,
            ));
            return;
        }
        self.fields.push(FieldDescriptor {
            name: name.to_string(),
            kind,
            accessor,
        });
    }

    fn fail(mut self, message: &str) -> Self {
        if self.error.is_none() {
            log::error!("{}", message);
            self.error = Some(BadgerError::new(message, ErrorKind::SchemaError));
        }
        self
    }
}

impl<D: 'static> Default for SchemaBuilder<D> {
    fn default() -> Self {
        SchemaBuilder::new()
    }
}
