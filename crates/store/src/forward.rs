//! Remote forwarder
//!
//! Delivers one encoded payload per batch to the ingestion endpoint.
//! No retry and no backoff: failure is surfaced verbatim and the caller
//! decides whether to resubmit the whole batch. Non-2xx responses are
//! errors; a sink that accepted the connection but rejected the payload
//! has not ingested anything.

use bytes::Bytes;
use tracing::debug;

use crate::error::Result;

/// HTTP forwarder bound to one import URL
pub(crate) struct Forwarder {
    client: reqwest::Client,
    import_url: String,
}

impl Forwarder {
    pub(crate) fn new(import_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            import_url,
        }
    }

    pub(crate) fn import_url(&self) -> &str {
        &self.import_url
    }

    /// POST the payload bytes as the request body
    pub(crate) async fn export(&self, payload: Bytes) -> Result<()> {
        let bytes = payload.len();
        let response = self
            .client
            .post(&self.import_url)
            .body(payload)
            .send()
            .await?;
        response.error_for_status()?;

        debug!(bytes, "exported metric batch");
        Ok(())
    }
}
