// SPDX-License-Identifier: AGPL-3.0-or-later

//! Remote enclave pass-through client.
//!
//! Enclaves are reachable at `https://{enclave_id}.{domain}`. This client
//! forwards registration and query payloads verbatim and relays the JSON
//! response; it performs no interpretation of either side beyond the
//! transport decode done by the HTTP layer.

use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The enclave answered with a non-success status.
    #[error("enclave responded with status {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The request never completed (DNS, TLS, connect, body errors).
    #[error("enclave unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

/// HTTP client for remote enclave endpoints.
#[derive(Debug, Clone)]
pub struct EnclaveGateway {
    client: reqwest::Client,
    domain: String,
}

impl EnclaveGateway {
    /// Create a gateway addressing enclaves under `domain`.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            domain: domain.into(),
        }
    }

    fn endpoint(&self, enclave_id: &str, path: &str) -> String {
        format!("https://{enclave_id}.{}/{path}", self.domain)
    }

    /// Forward a register-user payload to the enclave.
    pub async fn register_user(
        &self,
        enclave_id: &str,
        signed_cert: &str,
        public_key: &str,
    ) -> Result<serde_json::Value, GatewayError> {
        self.post(
            enclave_id,
            "register-user",
            json!({
                "signed_cert": signed_cert,
                "public_key": public_key,
            }),
        )
        .await
    }

    /// Forward an encrypted query and its signature to the enclave.
    pub async fn process_query(
        &self,
        enclave_id: &str,
        encrypted_query: &str,
        signed_query: &str,
    ) -> Result<serde_json::Value, GatewayError> {
        self.post(
            enclave_id,
            "process-query",
            json!({
                "encrypted_query": encrypted_query,
                "signed_query": signed_query,
            }),
        )
        .await
    }

    async fn post(
        &self,
        enclave_id: &str,
        path: &str,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        let url = self.endpoint(enclave_id, path);
        tracing::debug!(%url, "forwarding to enclave");

        let response = self.client.post(&url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
