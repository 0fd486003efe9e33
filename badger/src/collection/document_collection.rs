use crate::collection::text_index::TextIndex;
use crate::collection::{
    CollectionBuilder, CollectionConfig, DocId, DocSet, Document, DocumentSource, Schema,
};
use crate::common::{contains_run, LockHandle, Tokenizer};
use crate::errors::{BadgerError, BadgerResult, ErrorKind};
use crate::query::{parse, Query};
use indexmap::IndexMap;
use std::any::Any;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// An in-memory store of documents of one type.
///
/// Documents are held behind `Arc` and handed out shared, never copied. Reads
/// (`get`, `find`, `search`, the [`DocumentSource`] methods) take a shared
/// lock; `insert`, `remove`, `update` and `set_whole_word_field` take it
/// exclusively. Clones share the same underlying store.
///
/// # Examples
///
/// ```rust
/// use badger::collection::{Collection, Document, Schema};
/// use badger::errors::BadgerResult;
///
/// struct Fruit {
///     name: String,
///     tags: Vec<String>,
/// }
///
/// impl Document for Fruit {
///     fn schema() -> BadgerResult<Schema<Self>> {
///         Schema::builder()
///             .string("name", |f: &Fruit| f.name.as_str())
///             .string_list("tags", |f: &Fruit| f.tags.as_slice())
///             .build()
///     }
/// }
///
/// let fruit = Collection::<Fruit>::builder().default_field("name").build().unwrap();
/// fruit.insert(Fruit { name: "Lemon".into(), tags: vec!["citrus".into()] });
/// fruit.insert(Fruit { name: "Grape".into(), tags: vec![] });
///
/// let citrus = fruit.search("tags:citrus").unwrap();
/// assert_eq!(citrus[0].name, "Lemon");
/// assert_eq!(fruit.search("-lemon").unwrap()[0].name, "Grape");
/// ```
pub struct Collection<D: Document> {
    inner: Arc<CollectionInner<D>>,
}

impl<D: Document> Collection<D> {
    /// Creates an empty collection with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns a `SchemaError` if `D`'s schema is invalid.
    pub fn new() -> BadgerResult<Self> {
        Collection::with_config(CollectionConfig::new(), Tokenizer::default())
    }

    /// Starts building a collection.
    pub fn builder() -> CollectionBuilder<D> {
        CollectionBuilder::new()
    }

    pub(crate) fn with_config(config: CollectionConfig, tokenizer: Tokenizer) -> BadgerResult<Self> {
        let schema = D::schema()?;

        let default_field = match config.default_field() {
            Some(name) => Some(schema.resolve(name)?.name().to_string()),
            None => None,
        };

        let mut text_indexes = IndexMap::new();
        for name in config.whole_word_fields() {
            let field = schema.resolve(name)?;
            text_indexes.insert(field.name().to_lowercase(), TextIndex::new());
        }

        log::debug!(
            "Created collection with fields {:?}, default field {:?}, whole-word fields {:?}",
            schema.field_names(),
            default_field,
            config.whole_word_fields()
        );

        Ok(Collection {
            inner: Arc::new(CollectionInner {
                schema,
                tokenizer,
                default_field,
                state: LockHandle::new(CollectionState {
                    slots: Vec::new(),
                    free: Vec::new(),
                    live: 0,
                    text_indexes,
                }),
            }),
        })
    }

    /// Stores a document and returns its identity.
    pub fn insert(&self, doc: D) -> DocId {
        self.insert_shared(Arc::new(doc))
    }

    /// Stores an already shared document without copying it.
    pub fn insert_shared(&self, doc: Arc<D>) -> DocId {
        let inner = &self.inner;
        let mut state = inner.state.write();
        let id = state.allocate(doc);
        state.reindex(id, &inner.schema, &inner.tokenizer);
        id
    }

    /// Stores a type-erased document.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if `doc` is not a `D`.
    pub fn insert_any(&self, doc: Arc<dyn Any + Send + Sync>) -> BadgerResult<DocId> {
        match doc.downcast::<D>() {
            Ok(doc) => Ok(self.insert_shared(doc)),
            Err(_) => {
                log::error!(
                    "Document is not of type {} expected by the collection",
                    std::any::type_name::<D>()
                );
                Err(BadgerError::new(
                    &format!("expected a document of type {}", std::any::type_name::<D>()),
                    ErrorKind::TypeMismatch,
                ))
            }
        }
    }

    /// Returns the document stored under `id`, if it is still present.
    pub fn get(&self, id: DocId) -> Option<Arc<D>> {
        self.inner.state.read().get(id).cloned()
    }

    /// Removes and returns the document stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `id` was never issued or was already removed.
    pub fn remove(&self, id: DocId) -> BadgerResult<Arc<D>> {
        let mut state = self.inner.state.write();
        match state.release(id) {
            Some(doc) => Ok(doc),
            None => {
                log::error!("Document {} not found", id);
                Err(BadgerError::new(
                    &format!("document {} not found", id),
                    ErrorKind::NotFound,
                ))
            }
        }
    }

    /// Number of stored documents.
    pub fn count(&self) -> usize {
        self.inner.state.read().live
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Identities of all stored documents, in ascending order.
    pub fn ids(&self) -> Vec<DocId> {
        self.inner.state.read().ids().collect()
    }

    /// Evaluates `query` and returns the matching identities.
    pub fn find_ids(&self, query: &Query) -> BadgerResult<DocSet> {
        let state = self.inner.state.read();
        query.evaluate(&self.inner.view(&state))
    }

    /// Evaluates `query` and returns the matching documents in identity order.
    ///
    /// # Errors
    ///
    /// Returns a `SchemaError` if the query names a field the schema cannot
    /// match against.
    pub fn find(&self, query: &Query) -> BadgerResult<Vec<Arc<D>>> {
        let state = self.inner.state.read();
        let ids = query.evaluate(&self.inner.view(&state))?;
        Ok(ids.iter().filter_map(|id| state.get(*id).cloned()).collect())
    }

    /// Parses `query` against this collection's fields and default field, then
    /// finds the matching documents.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` for malformed queries or unknown fields, and the
    /// errors of [`find`](Collection::find).
    pub fn search(&self, query: &str) -> BadgerResult<Vec<Arc<D>>> {
        let default_field = self.inner.default_field.as_deref().unwrap_or("");
        let parsed = parse(query, &self.valid_fields(), default_field)?;
        self.find(&parsed)
    }

    /// Applies `visit` to every document matching `query`, returning how many
    /// were visited.
    ///
    /// The exclusive lock is held for the whole call. Documents are updated
    /// copy-on-write, so `Arc`s handed out earlier keep their old contents.
    pub fn update<F>(&self, query: &Query, mut visit: F) -> BadgerResult<usize>
    where
        D: Clone,
        F: FnMut(&mut D),
    {
        let inner = &self.inner;
        let mut state = inner.state.write();
        let ids = query.evaluate(&inner.view(&state))?;

        for id in &ids {
            if let Some(doc) = state.get_mut(*id) {
                visit(Arc::make_mut(doc));
            }
            state.reindex(*id, &inner.schema, &inner.tokenizer);
        }
        log::debug!("Updated {} documents matching {}", ids.len(), query);
        Ok(ids.len())
    }

    /// Field names a query may use, in schema order.
    pub fn valid_fields(&self) -> Vec<String> {
        self.inner.schema.field_names()
    }

    pub fn schema(&self) -> &Schema<D> {
        &self.inner.schema
    }

    pub fn default_field(&self) -> Option<&str> {
        self.inner.default_field.as_deref()
    }

    /// Makes contains-queries on `field` match whole words only and indexes
    /// the documents already stored.
    ///
    /// # Errors
    ///
    /// Returns a `SchemaError` if `field` is unknown or unsupported.
    pub fn set_whole_word_field(&self, field: &str) -> BadgerResult<()> {
        let inner = &self.inner;
        let descriptor = inner.schema.resolve(field)?;
        let key = descriptor.name().to_lowercase();

        let mut state = inner.state.write();
        if state.text_indexes.contains_key(&key) {
            return Ok(());
        }

        let mut index = TextIndex::new();
        for (id, doc) in state.documents() {
            if let Some(value) = descriptor.value(doc) {
                index.index(id, value, &inner.tokenizer);
            }
        }
        state.text_indexes.insert(key, index);
        log::debug!("Field {} is now whole-word", descriptor.name());
        Ok(())
    }

    /// Names of the whole-word fields.
    pub fn whole_word_fields(&self) -> Vec<String> {
        let state = self.inner.state.read();
        state
            .text_indexes
            .keys()
            .filter_map(|key| self.inner.schema.get(key))
            .map(|field| field.name().to_string())
            .collect()
    }
}

impl<D: Document> Clone for Collection<D> {
    fn clone(&self) -> Self {
        Collection {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: Document> Debug for Collection<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("fields", &self.valid_fields())
            .field("default_field", &self.inner.default_field)
            .field("count", &self.count())
            .finish()
    }
}

impl<D: Document> DocumentSource for Collection<D> {
    fn find_all(&self) -> DocSet {
        let state = self.inner.state.read();
        self.inner.view(&state).find_all()
    }

    fn match_field(&self, field: &str, predicate: &dyn Fn(&str) -> bool) -> BadgerResult<DocSet> {
        let state = self.inner.state.read();
        self.inner.view(&state).match_field(field, predicate)
    }

    fn is_whole_word(&self, field: &str) -> BadgerResult<bool> {
        let state = self.inner.state.read();
        self.inner.view(&state).is_whole_word(field)
    }

    fn match_phrase(&self, field: &str, phrase: &str) -> BadgerResult<DocSet> {
        let state = self.inner.state.read();
        self.inner.view(&state).match_phrase(field, phrase)
    }
}

struct CollectionInner<D: Document> {
    schema: Schema<D>,
    tokenizer: Tokenizer,
    default_field: Option<String>,
    state: LockHandle<CollectionState<D>>,
}

impl<D: Document> CollectionInner<D> {
    fn view<'a>(&'a self, state: &'a CollectionState<D>) -> CollectionView<'a, D> {
        CollectionView {
            schema: &self.schema,
            tokenizer: &self.tokenizer,
            state,
        }
    }
}

struct Slot<D> {
    generation: u32,
    doc: Option<Arc<D>>,
}

struct CollectionState<D> {
    slots: Vec<Slot<D>>,
    free: Vec<u32>,
    live: usize,
    // keyed by lowercase field name
    text_indexes: IndexMap<String, TextIndex>,
}

impl<D: Document> CollectionState<D> {
    fn allocate(&mut self, doc: Arc<D>) -> DocId {
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.doc = Some(doc);
                DocId::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    doc: Some(doc),
                });
                DocId::new(index, 0)
            }
        }
    }

    fn release(&mut self, id: DocId) -> Option<Arc<D>> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        let doc = slot.doc.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        self.live -= 1;
        for index in self.text_indexes.values_mut() {
            index.remove(id);
        }
        Some(doc)
    }

    fn get(&self, id: DocId) -> Option<&Arc<D>> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.doc.as_ref())
    }

    fn get_mut(&mut self, id: DocId) -> Option<&mut Arc<D>> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.doc.as_mut())
    }

    fn documents(&self) -> impl Iterator<Item = (DocId, &Arc<D>)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.doc
                .as_ref()
                .map(|doc| (DocId::new(index as u32, slot.generation), doc))
        })
    }

    fn ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.documents().map(|(id, _)| id)
    }

    /// Refreshes the whole-word indexes for `id`.
    fn reindex(&mut self, id: DocId, schema: &Schema<D>, tokenizer: &Tokenizer) {
        let Some(doc) = self.get(id).cloned() else {
            return;
        };
        for (key, index) in self.text_indexes.iter_mut() {
            if let Some(value) = schema.get(key).and_then(|field| field.value(&doc)) {
                index.index(id, value, tokenizer);
            }
        }
    }
}

struct CollectionView<'a, D: Document> {
    schema: &'a Schema<D>,
    tokenizer: &'a Tokenizer,
    state: &'a CollectionState<D>,
}

impl<D: Document> DocumentSource for CollectionView<'_, D> {
    fn find_all(&self) -> DocSet {
        self.state.ids().collect()
    }

    fn match_field(&self, field: &str, predicate: &dyn Fn(&str) -> bool) -> BadgerResult<DocSet> {
        let field = self.schema.resolve(field)?;
        Ok(self
            .state
            .documents()
            .filter(|(_, doc)| {
                field
                    .value(doc)
                    .map(|value| value.any(predicate))
                    .unwrap_or(false)
            })
            .map(|(id, _)| id)
            .collect())
    }

    fn is_whole_word(&self, field: &str) -> BadgerResult<bool> {
        let field = self.schema.resolve(field)?;
        Ok(self.state.text_indexes.contains_key(&field.name().to_lowercase()))
    }

    fn match_phrase(&self, field: &str, phrase: &str) -> BadgerResult<DocSet> {
        let descriptor = self.schema.resolve(field)?;
        let terms = self.tokenizer.tokenize(phrase);

        if let Some(index) = self.state.text_indexes.get(&descriptor.name().to_lowercase()) {
            return Ok(index.match_phrase(&terms));
        }

        // not indexed, tokenize each value on the fly
        Ok(self
            .state
            .documents()
            .filter(|(_, doc)| {
                descriptor
                    .value(doc)
                    .map(|value| {
                        value
                            .strings()
                            .any(|s| contains_run(&self.tokenizer.tokenize(s), &terms))
                    })
                    .unwrap_or(false)
            })
            .map(|(id, _)| id)
            .collect())
    }
}
