// SPDX-License-Identifier: AGPL-3.0-or-later

//! # API Data Models
//!
//! Request and response data structures for the REST API. All types derive
//! `Serialize`, `Deserialize`, and `ToSchema` for automatic JSON handling
//! and OpenAPI documentation.
//!
//! ## Enclave Id Type
//!
//! The [`EnclaveId`] newtype wraps the opaque enclave identifier. The id is
//! used as a certificate Common Name and as the subdomain of the remote
//! enclave endpoint, so it is validated to a DNS-label charset before any
//! CA operation (see [`crate::ca::validate_enclave_id`]).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Enclave Id Type
// =============================================================================

/// Opaque enclave identifier wrapper.
///
/// Provides type safety for enclave ids throughout the API.
/// Valid ids are lowercase DNS labels: `[a-z0-9]` and interior hyphens,
/// at most 63 characters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnclaveId(pub String);

impl std::fmt::Display for EnclaveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EnclaveId {
    fn from(value: String) -> Self {
        EnclaveId(value)
    }
}

impl From<&str> for EnclaveId {
    fn from(value: &str) -> Self {
        EnclaveId(value.to_string())
    }
}

impl From<EnclaveId> for String {
    fn from(value: EnclaveId) -> Self {
        value.0
    }
}

impl AsRef<str> for EnclaveId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// CA / CSR Models
// =============================================================================

/// Request body for `POST /v1/sign-csr`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignCsrRequest {
    /// Enclave whose CA should sign the request.
    pub enclave_id: EnclaveId,
    /// Base64-wrapped PEM certificate-signing-request.
    pub csr_pem: String,
}

/// Response body for `POST /v1/sign-csr`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignCsrResponse {
    /// PEM-encoded leaf certificate signed by the enclave's CA.
    pub signed_cert: String,
}

/// Response body for `POST /v1/generate-ca/{enclave_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateCaResponse {
    /// The enclave id the CA was issued for.
    pub enclave_id: EnclaveId,
    /// PEM-encoded self-signed CA root certificate (public material).
    pub ca_cert: String,
}

// =============================================================================
// Enclave Gateway Models
// =============================================================================

/// Request body for `POST /v1/register-user`.
///
/// `signed_cert` and `public_key` arrive base64-wrapped and are decoded
/// before being forwarded to the enclave.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    /// Target enclave.
    pub enclave_id: EnclaveId,
    /// Base64-wrapped PEM certificate previously signed by the enclave CA.
    pub signed_cert: String,
    /// Base64-wrapped PEM public key.
    pub public_key: String,
}

/// Request body for `POST /v1/process-query`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProcessQueryRequest {
    /// Target enclave.
    pub enclave_id: EnclaveId,
    /// Ciphertext query payload, opaque to this service.
    pub encrypted_query: String,
    /// Detached signature over the query, opaque to this service.
    pub signed_query: String,
}
