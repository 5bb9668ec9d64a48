use crate::codec::{JsonLinesCodec, Payload};
use crate::collection::{CollectionBuilder, CollectionConfig, CollectionProvider};
use crate::common::QueryParam;
use crate::errors::{CollectorError, CollectorResult, ErrorKind};
use crate::transport::HttpConnection;
use itertools::Itertools;
use url::Url;

/// Collection binding backed by the remote collections API.
///
/// Reads hit the collection endpoint with the query parameters appended as a
/// URL query string, writes post a JSON-lines body to the same endpoint and
/// deletes address `endpoint/<key>`.
#[derive(Debug, Clone)]
pub struct HttpCollection {
    config: CollectionConfig,
    endpoint: String,
    connection: HttpConnection,
}

impl HttpCollection {
    /// Returns a builder for configuring a new binding.
    pub fn builder() -> CollectionBuilder {
        CollectionBuilder::new()
    }

    pub fn new(config: CollectionConfig) -> Self {
        let connection = HttpConnection::new(config.apikey(), "", config.timeout());
        HttpCollection {
            endpoint: config.endpoint(),
            config,
            connection,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// Returns the address of a single record: the endpoint with `key`
    /// appended as one percent-encoded path segment.
    pub fn record_url(&self, key: &str) -> CollectorResult<String> {
        let mut url = Url::parse(&self.endpoint).map_err(|err| {
            log::error!("Invalid collection endpoint {}: {}", self.endpoint, err);
            CollectorError::new(
                &format!("Invalid collection endpoint {}: {}", self.endpoint, err),
                ErrorKind::ConfigurationError,
            )
        })?;

        match url.path_segments_mut() {
            Ok(mut segments) => {
                segments.pop_if_empty().push(key);
            }
            Err(_) => {
                log::error!("Collection endpoint {} cannot take a path", self.endpoint);
                return Err(CollectorError::new(
                    &format!("Collection endpoint {} cannot take a path", self.endpoint),
                    ErrorKind::ConfigurationError,
                ));
            }
        }
        Ok(url.to_string())
    }
}

impl CollectionProvider for HttpCollection {
    fn request(&self, params: &[QueryParam]) -> CollectorResult<String> {
        log::debug!(
            "Requesting: {}?{}",
            self.endpoint,
            params.iter().map(|(k, v)| format!("{}={}", k, v)).join("&")
        );
        self.connection.get(&self.endpoint, params)
    }

    fn post(&self, payload: &Payload) -> CollectorResult<String> {
        let body = JsonLinesCodec::serialize(payload)?;
        log::debug!("Posting: {} (data: {:?})", self.endpoint, body);
        self.connection.post(&self.endpoint, &body)
    }

    fn delete(&self, key: &str) -> CollectorResult<String> {
        log::debug!("Deleting: {}.", key);
        self.connection.delete(&self.record_url(key)?)
    }

    fn name(&self) -> String {
        self.config.collection().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection() -> HttpCollection {
        HttpCollection::builder()
            .base_uri("http://127.0.0.1:9/collections/")
            .project_id(42)
            .collection("items")
            .store_type("cs")
            .apikey("key")
            .build()
            .unwrap()
    }

    #[test]
    fn test_endpoint_and_name() {
        let collection = collection();
        assert_eq!(collection.endpoint(), "http://127.0.0.1:9/collections/42/cs/items");
        assert_eq!(collection.name(), "items");
    }

    #[test]
    fn test_record_url_encodes_key_as_one_segment() {
        let collection = collection();
        assert_eq!(
            collection.record_url("foo").unwrap(),
            "http://127.0.0.1:9/collections/42/cs/items/foo"
        );
        assert_eq!(
            collection.record_url("foo?bar").unwrap(),
            "http://127.0.0.1:9/collections/42/cs/items/foo%3Fbar"
        );
        assert_eq!(
            collection.record_url("a/b#c%d").unwrap(),
            "http://127.0.0.1:9/collections/42/cs/items/a%2Fb%23c%25d"
        );
    }

    #[test]
    fn test_invalid_store_type_fails_fast() {
        let result = HttpCollection::builder()
            .project_id(42)
            .collection("items")
            .store_type("nope")
            .apikey("key")
            .build();
        assert!(result.is_err());
    }
}
