// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error taxonomy for certificate issuance and signing.
//!
//! All variants are terminal for the request that produced them; the core
//! never retries internally. The HTTP layer maps each kind to a status code
//! in [`crate::error`].

use crate::storage::{RegistryError, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum CaError {
    /// Transport payload was not valid base64 or did not contain PEM.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),

    /// CSR could not be parsed, or its self-signature did not verify
    /// against the embedded public key.
    #[error("invalid CSR: {0}")]
    InvalidCsr(String),

    /// No CA record exists for the requested enclave id.
    #[error("no CA found for enclave {0}")]
    UnknownEnclave(String),

    /// Enclave id failed validation (must be a DNS-label-like string).
    #[error("invalid enclave id: {0}")]
    InvalidEnclaveId(String),

    /// RSA key generation failed.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// CA material or the registry record could not be persisted.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// CA key material could not be loaded, or certificate signing failed.
    #[error("signing failure: {0}")]
    Signing(String),
}

impl From<StorageError> for CaError {
    fn from(e: StorageError) -> Self {
        CaError::Persistence(e.to_string())
    }
}

impl From<RegistryError> for CaError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::NotFound(id) => CaError::UnknownEnclave(id),
            other => CaError::Persistence(other.to_string()),
        }
    }
}
