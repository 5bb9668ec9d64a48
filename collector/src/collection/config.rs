//! Configuration of a remote collection binding.

use crate::collection::{Collection, HttpCollection};
use crate::common::{APIKEY_ENV_VAR, DEFAULT_BASE_URI};
use crate::errors::{CollectorError, CollectorResult, ErrorKind};
use secure_string::SecureString;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Storage flavour of a remote collection, encoded as a short path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreType {
    /// `s`: regular store
    #[default]
    Standard,
    /// `cs`: regular store with a cache in front
    CachedStandard,
    /// `vs`: versioned store
    Versioned,
    /// `vcs`: versioned store with a cache in front
    VersionedCached,
}

impl StoreType {
    pub const ALLOWED: [&'static str; 4] = ["s", "cs", "vs", "vcs"];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreType::Standard => "s",
            StoreType::CachedStandard => "cs",
            StoreType::Versioned => "vs",
            StoreType::VersionedCached => "vcs",
        }
    }
}

impl Display for StoreType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StoreType {
    type Err = CollectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s" => Ok(StoreType::Standard),
            "cs" => Ok(StoreType::CachedStandard),
            "vs" => Ok(StoreType::Versioned),
            "vcs" => Ok(StoreType::VersionedCached),
            _ => {
                log::error!("Invalid store type {}", s);
                Err(CollectorError::new(
                    &format!(
                        "Invalid store type {} (allowed store types: {})",
                        s,
                        StoreType::ALLOWED.join(", ")
                    ),
                    ErrorKind::ConfigurationError,
                ))
            }
        }
    }
}

/// Resolved settings of an HTTP collection binding.
///
/// Produced by [`CollectionBuilder`]; every field has been validated and the
/// API key is always present.
#[derive(Clone)]
pub struct CollectionConfig {
    project_id: String,
    collection: String,
    apikey: Arc<SecureString>,
    store_type: StoreType,
    base_uri: String,
    timeout: Option<Duration>,
}

impl CollectionConfig {
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn apikey(&self) -> &str {
        self.apikey.unsecure()
    }

    pub fn store_type(&self) -> StoreType {
        self.store_type
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the collection endpoint: `<base>/<project>/<store type>/<collection>`.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_uri.trim_end_matches('/'),
            self.project_id,
            self.store_type,
            self.collection
        )
    }
}

impl Debug for CollectionConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionConfig")
            .field("project_id", &self.project_id)
            .field("collection", &self.collection)
            .field("store_type", &self.store_type)
            .field("base_uri", &self.base_uri)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for an HTTP collection binding.
///
/// Follows the fluent builder pattern: setters never fail, the first invalid
/// setting is captured and returned from [`CollectionBuilder::build`].
/// Configuration errors fail fast and are never retried.
///
/// # Examples
///
/// ```rust,ignore
/// use collector::collection::HttpCollection;
///
/// let collection = HttpCollection::builder()
///     .project_id(1234)
///     .collection("products")
///     .store_type("cs")
///     .apikey("0123456789abcdef")
///     .build()?;
/// ```
pub struct CollectionBuilder {
    error: Option<CollectorError>,
    project_id: String,
    collection: String,
    apikey: Option<String>,
    store_type: StoreType,
    base_uri: String,
    timeout: Option<Duration>,
}

impl Default for CollectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionBuilder {
    pub fn new() -> Self {
        CollectionBuilder {
            error: None,
            project_id: String::new(),
            collection: String::new(),
            apikey: None,
            store_type: StoreType::default(),
            base_uri: DEFAULT_BASE_URI.to_string(),
            timeout: None,
        }
    }

    pub fn project_id<T: Display>(mut self, project_id: T) -> Self {
        self.project_id = project_id.to_string();
        self
    }

    pub fn collection(mut self, collection: &str) -> Self {
        self.collection = collection.to_string();
        self
    }

    /// Sets the API key. Without it, `SH_APIKEY` is read at build time.
    pub fn apikey(mut self, apikey: &str) -> Self {
        self.apikey = Some(apikey.to_string());
        self
    }

    /// Sets the store type from its short code (`s`, `cs`, `vs`, `vcs`).
    pub fn store_type(mut self, store_type: &str) -> Self {
        if self.error.is_none() {
            match store_type.parse::<StoreType>() {
                Ok(store_type) => self.store_type = store_type,
                Err(e) => self.error = Some(e),
            }
        }
        self
    }

    pub fn base_uri(mut self, base_uri: &str) -> Self {
        self.base_uri = base_uri.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validates the settings and resolves the API key.
    pub fn config(self) -> CollectorResult<CollectionConfig> {
        if let Some(error) = self.error {
            return Err(error);
        }

        if self.project_id.trim().is_empty() {
            log::error!("Project id must be provided");
            return Err(CollectorError::new(
                "Project id must be provided",
                ErrorKind::ConfigurationError,
            ));
        }

        if self.collection.trim().is_empty() {
            log::error!("Collection name must be provided");
            return Err(CollectorError::new(
                "Collection name must be provided",
                ErrorKind::ConfigurationError,
            ));
        }

        let apikey = resolve_apikey(self.apikey, std::env::var(APIKEY_ENV_VAR).ok())?;

        Ok(CollectionConfig {
            project_id: self.project_id,
            collection: self.collection,
            apikey: Arc::new(SecureString::from(apikey)),
            store_type: self.store_type,
            base_uri: self.base_uri,
            timeout: self.timeout,
        })
    }

    /// Builds the HTTP collection binding.
    pub fn build(self) -> CollectorResult<HttpCollection> {
        Ok(HttpCollection::new(self.config()?))
    }

    /// Builds the binding wrapped in a shareable [`Collection`] handle.
    pub fn build_collection(self) -> CollectorResult<Collection> {
        Ok(Collection::new(self.build()?))
    }
}

/// Picks the explicit API key, falling back to the environment value.
pub(crate) fn resolve_apikey(
    explicit: Option<String>,
    from_env: Option<String>,
) -> CollectorResult<String> {
    match explicit.or(from_env).filter(|key| !key.is_empty()) {
        Some(apikey) => Ok(apikey),
        None => {
            log::error!("Apikey must be provided or set as env var {}", APIKEY_ENV_VAR);
            Err(CollectorError::new(
                &format!("Apikey must be provided or set as env var {}", APIKEY_ENV_VAR),
                ErrorKind::ConfigurationError,
            ))
        }
    }
}
