//! HTTP resolver backed by the bryk DID resolution service.

use crate::domain::did::Did;
use crate::domain::document::DidDocument;
use crate::domain::errors::IdentityError;
use crate::ports::outbound::DidResolver;
use std::time::Duration;
use tracing::debug;

/// Public bryk resolution endpoint.
pub const DEFAULT_RESOLVER_ENDPOINT: &str = "https://did.bryk.io/v1/retrieve";

/// Fetches documents with `GET <endpoint>?subject=<subject>`.
#[derive(Debug, Clone)]
pub struct HttpDidResolver {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpDidResolver {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IdentityError::ResolutionFailed(format!("http client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl DidResolver for HttpDidResolver {
    async fn fetch_document(&self, did: &Did) -> Result<DidDocument, IdentityError> {
        debug!(did = %did, endpoint = %self.endpoint, "Fetching DID document");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("subject", did.subject())])
            .send()
            .await
            .map_err(|e| IdentityError::ResolutionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::ResolutionFailed(format!(
                "resolver returned HTTP {status}"
            )));
        }

        response
            .json::<DidDocument>()
            .await
            .map_err(|e| IdentityError::ResolutionFailed(format!("invalid document: {e}")))
    }
}
