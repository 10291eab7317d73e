//! Sources for a user's stored verified claims.
//!
//! The mapper retrieves the user's `verified_claims` record either from the
//! local attribute store or from an external HTTP store, selected by
//! configuration. Both are unreliable collaborators: anything that goes
//! wrong while fetching degrades to "no data" at the mapper, never to a
//! client-facing failure.

use assura_claims::constants::VERIFIED_CLAIMS;
use assura_claims::{Fields, Value};
use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;
use url::Url;

use crate::error::{MapperError, MapperResult, SourceError};

/// A provider of user verified-claims records.
///
/// Implementations return the user's full record, an object expected to
/// carry a `verified_claims` key. `Ok(None)` means the user has no record.
#[async_trait]
pub trait ClaimsSource {
    /// Retrieve the verified-claims record for `user_id`
    async fn verified_claims(&self, user_id: &str) -> Result<Option<Value>, SourceError>;
}

/// Claims source backed by the user's local attribute store.
///
/// A user may carry any number of `verified_claims` attribute values, each
/// a JSON document holding one or more verified-claims elements. Attributes
/// that are not valid JSON or lack the `verified_claims` key are skipped
/// with a log line; the survivors are flattened into a single list.
#[derive(Debug, Clone, Default)]
pub struct LocalAttributeSource {
    attributes: Vec<String>,
}

impl LocalAttributeSource {
    /// Create a source over the user's `verified_claims` attribute values
    pub fn new(attributes: Vec<String>) -> Self {
        Self { attributes }
    }
}

#[async_trait]
impl ClaimsSource for LocalAttributeSource {
    async fn verified_claims(&self, _user_id: &str) -> Result<Option<Value>, SourceError> {
        let mut collected: Vec<Value> = Vec::new();

        for attribute in &self.attributes {
            let parsed = match Value::from_json_str(attribute) {
                Ok(parsed) => parsed,
                Err(error) => {
                    warn!("Skipping verified_claims attribute that is not valid JSON: {error}");
                    continue;
                }
            };

            match parsed.get(VERIFIED_CLAIMS) {
                Some(Value::Array(elements)) => collected.extend(elements.iter().cloned()),
                Some(element) => collected.push(element.clone()),
                None => {
                    warn!("Skipping attribute without a verified_claims element");
                }
            }
        }

        if collected.is_empty() {
            return Ok(None);
        }

        let mut record = Fields::new();
        record.insert(VERIFIED_CLAIMS.to_string(), Value::Array(collected));
        Ok(Some(Value::Object(record)))
    }
}

/// Configuration for the external HTTP claims store
#[derive(Debug, Clone)]
pub struct HttpStoreConfig {
    /// Base URL of the store; queried with GET `{endpoint}?userId={id}`
    pub endpoint: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: Option<u64>,
}

impl HttpStoreConfig {
    /// Create a configuration for the given endpoint URL
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_seconds: Some(30),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Validate the configured endpoint. Run at configuration time so that
    /// a missing or unparsable URL surfaces to the administrator instead of
    /// degrading every token request.
    pub fn validate(&self) -> MapperResult<Url> {
        if self.endpoint.is_empty() {
            return Err(MapperError::Configuration(
                "no external claims store URL specified".to_string(),
            ));
        }

        Url::parse(&self.endpoint).map_err(|error| {
            MapperError::Configuration(format!(
                "invalid external claims store URL {:?}: {error}",
                self.endpoint
            ))
        })
    }
}

/// Claims source backed by an external HTTP store
#[derive(Debug, Clone)]
pub struct HttpStoreSource {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpStoreSource {
    /// Build a source from a validated configuration
    pub fn new(config: HttpStoreConfig) -> MapperResult<Self> {
        let endpoint = config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder
            .build()
            .map_err(|error| MapperError::Configuration(error.to_string()))?;

        Ok(Self { endpoint, client })
    }
}

#[async_trait]
impl ClaimsSource for HttpStoreSource {
    async fn verified_claims(&self, user_id: &str) -> Result<Option<Value>, SourceError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("userId", user_id);

        let response = self.client.get(url).send().await?;
        let body = response.error_for_status()?.text().await?;
        let record = Value::from_json_str(&body)?;

        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_requires_an_endpoint_url() {
        let config = HttpStoreConfig::new("");
        assert!(matches!(
            config.validate(),
            Err(MapperError::Configuration(_))
        ));
    }

    #[test]
    fn it_rejects_unparsable_endpoint_urls() {
        let config = HttpStoreConfig::new("not a url");
        assert!(matches!(
            config.validate(),
            Err(MapperError::Configuration(_))
        ));
    }

    #[test]
    fn it_accepts_well_formed_endpoint_urls() {
        let config = HttpStoreConfig::new("https://claims.example.com/store").with_timeout(5);
        assert!(config.validate().is_ok());
        assert!(HttpStoreSource::new(config).is_ok());
    }

    #[tokio::test]
    async fn it_merges_local_attributes_into_one_record() {
        let source = LocalAttributeSource::new(vec![
            r#"{"verified_claims":{"verification":{"trust_framework":"eidas"},"claims":{"given_name":"Eva"}}}"#.to_string(),
            r#"{"verified_claims":[{"verification":{"trust_framework":"de_aml"},"claims":{"given_name":"Max"}}]}"#.to_string(),
        ]);

        let record = source.verified_claims("alice").await.unwrap().unwrap();
        let sets = record
            .get(VERIFIED_CLAIMS)
            .and_then(Value::as_array)
            .unwrap();
        assert_eq!(sets.len(), 2);
    }

    #[tokio::test]
    async fn it_skips_invalid_local_attributes() {
        let source = LocalAttributeSource::new(vec![
            "not json".to_string(),
            r#"{"something_else": 1}"#.to_string(),
            r#"{"verified_claims":{"claims":{"given_name":"Max"}}}"#.to_string(),
        ]);

        let record = source.verified_claims("alice").await.unwrap().unwrap();
        let sets = record
            .get(VERIFIED_CLAIMS)
            .and_then(Value::as_array)
            .unwrap();
        assert_eq!(sets.len(), 1);
    }

    #[tokio::test]
    async fn it_reports_no_data_for_an_empty_attribute_store() {
        let source = LocalAttributeSource::default();
        assert!(source.verified_claims("alice").await.unwrap().is_none());
    }
}
