// SPDX-License-Identifier: AGPL-3.0-or-later

//! CSR signing against a per-enclave CA.
//!
//! The signer never mutates the registry. CA key material is loaded from
//! the artifact store for the duration of a single request and dropped
//! afterwards; keys are deliberately not cached across requests to keep
//! the exposure window short.

use std::time::Duration;

use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, LineEnding};
use rsa::signature::Verifier;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use x509_cert::builder::{Builder, CertificateBuilder, Profile};
use x509_cert::der::{DecodePem, Encode, EncodePem};
use x509_cert::request::CertReq;
use x509_cert::time::Validity;
use x509_cert::Certificate;

use super::{random_serial, CaError};
use crate::storage::{ArtifactStore, CaRegistry, RegistryError};

/// Leaf certificate validity window.
pub const LEAF_VALIDITY_DAYS: u64 = 365;

/// Signs CSRs with the CA of the requested enclave.
pub struct CsrSigner<'a> {
    registry: &'a CaRegistry,
    artifacts: &'a ArtifactStore,
}

impl<'a> CsrSigner<'a> {
    pub fn new(registry: &'a CaRegistry, artifacts: &'a ArtifactStore) -> Self {
        Self {
            registry,
            artifacts,
        }
    }

    /// Sign a PEM-encoded CSR with the CA for `enclave_id`.
    ///
    /// Returns the PEM-encoded leaf certificate: subject and public key
    /// from the CSR, issuer from the CA, 365-day validity, CA:false
    /// critical, random serial, SHA-256 with RSA.
    pub fn sign(&self, enclave_id: &str, csr_pem: &[u8]) -> Result<String, CaError> {
        let csr = parse_and_verify_csr(csr_pem)?;

        let record = match self.registry.get(enclave_id) {
            Ok(record) => record,
            Err(RegistryError::NotFound(id)) => return Err(CaError::UnknownEnclave(id)),
            Err(e) => return Err(CaError::Signing(e.to_string())),
        };

        // Key material lives only for this scope.
        let ca_key = self.load_ca_key(&record.private_key_ref)?;
        let ca_cert_pem = self
            .artifacts
            .read(&record.certificate_ref)
            .map_err(|e| CaError::Signing(e.to_string()))?;
        let ca_cert = Certificate::from_pem(&ca_cert_pem)
            .map_err(|e| CaError::Signing(format!("stored CA certificate unreadable: {e}")))?;

        let profile = Profile::Leaf {
            issuer: ca_cert.tbs_certificate.subject.clone(),
            enable_key_agreement: false,
            enable_key_encipherment: true,
            include_subject_key_identifier: true,
        };
        let serial = random_serial().map_err(|e| CaError::Signing(e.to_string()))?;
        let validity = Validity::from_now(Duration::from_secs(LEAF_VALIDITY_DAYS * 86_400))
            .map_err(|e| CaError::Signing(e.to_string()))?;

        let signing_key: SigningKey<Sha256> = SigningKey::new(ca_key);
        let builder = CertificateBuilder::new(
            profile,
            serial,
            validity,
            csr.info.subject.clone(),
            csr.info.public_key.clone(),
            &signing_key,
        )
        .map_err(|e| CaError::Signing(e.to_string()))?;

        let cert = builder
            .build::<Signature>()
            .map_err(|e| CaError::Signing(e.to_string()))?;

        tracing::debug!(enclave_id, subject = %cert.tbs_certificate.subject, "signed CSR");
        cert.to_pem(LineEnding::LF)
            .map_err(|e| CaError::Signing(e.to_string()))
    }

    fn load_ca_key(&self, key_ref: &str) -> Result<RsaPrivateKey, CaError> {
        let key_pem = self
            .artifacts
            .read(key_ref)
            .map_err(|e| CaError::Signing(e.to_string()))?;
        let key_pem = std::str::from_utf8(&key_pem)
            .map_err(|e| CaError::Signing(format!("stored CA key unreadable: {e}")))?;
        RsaPrivateKey::from_pkcs8_pem(key_pem)
            .map_err(|e| CaError::Signing(format!("stored CA key unreadable: {e}")))
    }
}

/// Parse a PEM CSR and check its self-signature against the embedded
/// public key (proof of possession).
fn parse_and_verify_csr(csr_pem: &[u8]) -> Result<CertReq, CaError> {
    let csr = CertReq::from_pem(csr_pem)
        .map_err(|e| CaError::InvalidCsr(format!("parse failure: {e}")))?;

    let spki_der = csr
        .info
        .public_key
        .to_der()
        .map_err(|e| CaError::InvalidCsr(e.to_string()))?;
    let public_key = RsaPublicKey::from_public_key_der(&spki_der)
        .map_err(|e| CaError::InvalidCsr(format!("unsupported public key: {e}")))?;

    let info_der = csr
        .info
        .to_der()
        .map_err(|e| CaError::InvalidCsr(e.to_string()))?;
    let signature = Signature::try_from(csr.signature.raw_bytes())
        .map_err(|e| CaError::InvalidCsr(format!("malformed signature: {e}")))?;

    VerifyingKey::<Sha256>::new(public_key)
        .verify(&info_der, &signature)
        .map_err(|_| CaError::InvalidCsr("self-signature does not verify".to_string()))?;

    Ok(csr)
}
