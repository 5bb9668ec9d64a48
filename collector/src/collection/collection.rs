use crate::codec::Payload;
use crate::common::QueryParam;
use crate::errors::CollectorResult;
use std::ops::Deref;
use std::sync::Arc;

/// Trait defining the interface of a remote collection binding.
///
/// A collection is the endpoint a model is bound to. It knows how to reach the
/// store and speaks its wire protocol: reads take a flat, ordered list of query
/// parameters, writes take JSON-lines payloads, and every call returns the raw
/// response text. Endpoint construction and authentication stay inside the
/// implementation.
pub trait CollectionProvider: Send + Sync {
    /// Reads records matching `params` and returns the JSON-lines response.
    fn request(&self, params: &[QueryParam]) -> CollectorResult<String>;

    /// Writes (upserts) one or more records.
    fn post(&self, payload: &Payload) -> CollectorResult<String>;

    /// Removes the record stored under `key`.
    fn delete(&self, key: &str) -> CollectorResult<String>;

    /// Returns the name of this collection.
    fn name(&self) -> String;
}

/// A shared handle to a collection binding.
///
/// Cloning is cheap; every clone talks to the same provider. Models keep a
/// `Collection` and never own the provider exclusively.
///
/// # Examples
///
/// ```rust,ignore
/// use collector::collection::{Collection, InMemoryCollection};
///
/// let collection = Collection::new(InMemoryCollection::new("items"));
/// let text = collection.request(&[])?;
/// ```
#[derive(Clone)]
pub struct Collection {
    inner: Arc<dyn CollectionProvider>,
}

impl Collection {
    /// Creates a new `Collection` from a provider implementation.
    pub fn new<T: CollectionProvider + 'static>(inner: T) -> Self {
        Collection { inner: Arc::new(inner) }
    }

    /// Returns true when both handles share the same provider.
    pub fn same_as(&self, other: &Collection) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Deref for Collection {
    type Target = Arc<dyn CollectionProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection").field("name", &self.inner.name()).finish()
    }
}
