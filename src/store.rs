use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Documents are JSON-like records addressed by dotted field paths.
pub type Document = Value;

/// Field-path → value equality filter. Dotted paths reach nested fields.
pub type FieldFilter = HashMap<String, Value>;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// A filter or unique key unexpectedly matched more than one document.
    MultipleDocuments { collection: String, description: String },
    /// A dotted field path does not exist in a document.
    KeyNotFound { key: String, document: String },
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::MultipleDocuments { collection, description } => {
                write!(f, "Multiple documents for '{description}' were found in '{collection}'")
            }
            StoreError::KeyNotFound { key, document } => {
                write!(f, "Key '{key}' is not found in document '{document}'")
            }
            StoreError::Backend(msg) => write!(f, "Store error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Minimal document-store surface the pipeline persists through. The
/// integrity checks (single-match guarantees) live in the helpers below,
/// not in implementations.
pub trait DocumentStore {
    fn find(&self, collection: &str, filter: &FieldFilter) -> StoreResult<Vec<Document>>;

    /// Append-only batch insert.
    fn insert(&mut self, collection: &str, documents: Vec<Document>) -> StoreResult<()>;

    /// Replace the first document matching `filter`; insert when nothing
    /// matches and `upsert` is set, otherwise leave the collection unchanged.
    fn replace_one(
        &mut self,
        collection: &str,
        filter: &FieldFilter,
        document: Document,
        upsert: bool,
    ) -> StoreResult<()>;
}

// ---------------------------------------------------------------------------
// Caller-side operations over the store trait
// ---------------------------------------------------------------------------

pub fn get_documents(
    store: &dyn DocumentStore,
    collection: &str,
    filter: &FieldFilter,
) -> StoreResult<Vec<Document>> {
    store.find(collection, filter)
}

/// Single match or none; ≥2 matches is an integrity error.
pub fn get_document(
    store: &dyn DocumentStore,
    collection: &str,
    filter: &FieldFilter,
) -> StoreResult<Option<Document>> {
    let mut matches = store.find(collection, filter)?;
    match matches.len() {
        0 => Ok(None),
        1 => Ok(matches.pop()),
        _ => Err(StoreError::MultipleDocuments {
            collection: collection.to_owned(),
            description: describe_filter(filter),
        }),
    }
}

pub fn put_documents(
    store: &mut dyn DocumentStore,
    collection: &str,
    documents: Vec<Document>,
) -> StoreResult<()> {
    store.insert(collection, documents)
}

/// Replace (or, with `upsert`, insert) each document keyed by the value at
/// `unique_key`. A key value shared by several stored documents is an
/// integrity error; a document missing the key path is a lookup error.
pub fn update_documents(
    store: &mut dyn DocumentStore,
    collection: &str,
    documents: Vec<Document>,
    unique_key: &str,
    upsert: bool,
) -> StoreResult<()> {
    for document in documents {
        let key_value = value_at_path(unique_key, &document)?.clone();
        let filter = FieldFilter::from([(unique_key.to_owned(), key_value)]);
        if store.find(collection, &filter)?.len() > 1 {
            return Err(StoreError::MultipleDocuments {
                collection: collection.to_owned(),
                description: describe_filter(&filter),
            });
        }
        store.replace_one(collection, &filter, document, upsert)?;
    }
    Ok(())
}

/// Resolve a dotted field path inside a document.
pub fn value_at_path<'a>(path: &str, document: &'a Document) -> StoreResult<&'a Value> {
    let mut current = document;
    for segment in path.split('.') {
        current = current.get(segment).ok_or_else(|| StoreError::KeyNotFound {
            key: path.to_owned(),
            document: document.to_string(),
        })?;
    }
    Ok(current)
}

fn matches_filter(document: &Document, filter: &FieldFilter) -> bool {
    filter
        .iter()
        .all(|(path, expected)| value_at_path(path, document).is_ok_and(|v| v == expected))
}

fn describe_filter(filter: &FieldFilter) -> String {
    let mut pairs: Vec<String> =
        filter.iter().map(|(path, value)| format!("{path}={value}")).collect();
    pairs.sort_unstable();
    pairs.join(", ")
}

// ---------------------------------------------------------------------------
// Implementations
// ---------------------------------------------------------------------------

/// In-memory store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: HashMap<String, Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_collections(collections: HashMap<String, Vec<Document>>) -> Self {
        Self { collections }
    }
}

impl DocumentStore for MemoryStore {
    fn find(&self, collection: &str, filter: &FieldFilter) -> StoreResult<Vec<Document>> {
        Ok(self
            .collections
            .get(collection)
            .into_iter()
            .flatten()
            .filter(|doc| matches_filter(doc, filter))
            .cloned()
            .collect())
    }

    fn insert(&mut self, collection: &str, documents: Vec<Document>) -> StoreResult<()> {
        self.collections.entry(collection.to_owned()).or_default().extend(documents);
        Ok(())
    }

    fn replace_one(
        &mut self,
        collection: &str,
        filter: &FieldFilter,
        document: Document,
        upsert: bool,
    ) -> StoreResult<()> {
        let docs = self.collections.entry(collection.to_owned()).or_default();
        match docs.iter_mut().find(|doc| matches_filter(doc, filter)) {
            Some(existing) => *existing = document,
            None if upsert => docs.push(document),
            None => {}
        }
        Ok(())
    }
}

/// Store persisted as one JSON object on disk ({collection: [documents]}),
/// loaded on open and rewritten after each mutation.
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let inner = if path.exists() {
            let raw = fs::read_to_string(&path)
                .map_err(|e| StoreError::Backend(format!("read {}: {e}", path.display())))?;
            let collections: HashMap<String, Vec<Document>> = serde_json::from_str(&raw)
                .map_err(|e| StoreError::Backend(format!("parse {}: {e}", path.display())))?;
            MemoryStore::from_collections(collections)
        } else {
            MemoryStore::new()
        };
        Ok(Self { path, inner })
    }

    fn persist(&self) -> StoreResult<()> {
        let raw = serde_json::to_string_pretty(&self.inner.collections)
            .map_err(|e| StoreError::Backend(format!("serialize store: {e}")))?;
        fs::write(&self.path, raw)
            .map_err(|e| StoreError::Backend(format!("write {}: {e}", self.path.display())))
    }
}

impl DocumentStore for JsonFileStore {
    fn find(&self, collection: &str, filter: &FieldFilter) -> StoreResult<Vec<Document>> {
        self.inner.find(collection, filter)
    }

    fn insert(&mut self, collection: &str, documents: Vec<Document>) -> StoreResult<()> {
        self.inner.insert(collection, documents)?;
        self.persist()
    }

    fn replace_one(
        &mut self,
        collection: &str,
        filter: &FieldFilter,
        document: Document,
        upsert: bool,
    ) -> StoreResult<()> {
        self.inner.replace_one(collection, filter, document, upsert)?;
        self.persist()
    }
}
