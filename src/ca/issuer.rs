// SPDX-License-Identifier: AGPL-3.0-or-later

//! Per-enclave CA issuance.
//!
//! `issue` generates a fresh RSA keypair and a self-signed root
//! certificate, persists both artifacts, and records the mapping in the
//! registry. A failure after the first artifact write rolls the new
//! artifacts back so no orphaned key material remains.

use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use x509_cert::builder::{Builder, CertificateBuilder, Profile};
use x509_cert::der::EncodePem;
use x509_cert::name::Name;
use x509_cert::spki::SubjectPublicKeyInfoOwned;
use x509_cert::time::Validity;

use super::{random_serial, validate_enclave_id, CaError};
use crate::storage::{ArtifactStore, CaPaths, CaRegistry, EnclaveCaRecord};

/// RSA modulus size for CA keys.
pub const CA_KEY_BITS: usize = 2048;

/// CA root certificate validity window.
pub const CA_VALIDITY_DAYS: u64 = 3650;

/// Result of a successful issuance.
#[derive(Debug, Clone)]
pub struct IssuedCa {
    /// The registry record now active for the enclave.
    pub record: EnclaveCaRecord,
    /// PEM-encoded self-signed root certificate (public, safe to return).
    pub ca_cert_pem: String,
}

/// Issues per-enclave CA material.
pub struct CaIssuer<'a> {
    registry: &'a CaRegistry,
    artifacts: &'a ArtifactStore,
}

impl<'a> CaIssuer<'a> {
    pub fn new(registry: &'a CaRegistry, artifacts: &'a ArtifactStore) -> Self {
        Self {
            registry,
            artifacts,
        }
    }

    /// Generate and persist a CA for `enclave_id`.
    ///
    /// Re-issuing for an existing id writes fresh artifacts under a new
    /// version, then replaces the record (last writer wins); whichever
    /// record the put displaced has its artifacts removed once the new
    /// record is durable.
    pub fn issue(&self, enclave_id: &str) -> Result<IssuedCa, CaError> {
        validate_enclave_id(enclave_id)?;

        let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), CA_KEY_BITS)
            .map_err(|e| CaError::KeyGeneration(e.to_string()))?;
        let public_key = RsaPublicKey::from(&private_key);

        let cert_pem = build_root_certificate(enclave_id, &private_key, public_key)?;
        let key_pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| CaError::KeyGeneration(e.to_string()))?;

        let created_at = Utc::now();
        // The random suffix keeps concurrent issuances for the same id
        // from ever sharing a version, so no issuance can write into
        // another's refs.
        let version = format!(
            "{}-{:08x}",
            created_at.timestamp_millis(),
            rand::random::<u32>()
        );
        let key_ref = CaPaths::ca_key_ref(enclave_id, &version);
        let cert_ref = CaPaths::ca_cert_ref(enclave_id, &version);

        self.artifacts.write(&key_ref, key_pem.as_bytes())?;
        if let Err(e) = self.artifacts.write(&cert_ref, cert_pem.as_bytes()) {
            let _ = self.artifacts.delete(&key_ref);
            return Err(e.into());
        }

        let record = EnclaveCaRecord {
            enclave_id: enclave_id.to_string(),
            private_key_ref: key_ref.clone(),
            certificate_ref: cert_ref.clone(),
            created_at,
        };
        let replaced = match self.registry.put(&record) {
            Ok(replaced) => replaced,
            Err(e) => {
                let _ = self.artifacts.delete(&key_ref);
                let _ = self.artifacts.delete(&cert_ref);
                return Err(CaError::Persistence(e.to_string()));
            }
        };

        if let Some(old) = replaced {
            // Best effort; the displaced record is already unreachable.
            let _ = self.artifacts.delete(&old.private_key_ref);
            let _ = self.artifacts.delete(&old.certificate_ref);
        }

        tracing::info!(enclave_id, "issued CA");
        Ok(IssuedCa {
            record,
            ca_cert_pem: cert_pem,
        })
    }
}

/// Build the self-signed root: subject = issuer = `CN=<enclave_id>`,
/// BasicConstraints CA:true critical, SHA-256 with RSA.
fn build_root_certificate(
    enclave_id: &str,
    private_key: &RsaPrivateKey,
    public_key: RsaPublicKey,
) -> Result<String, CaError> {
    let subject = Name::from_str(&format!("CN={enclave_id}"))
        .map_err(|e| CaError::KeyGeneration(format!("invalid subject name: {e}")))?;
    let spki = SubjectPublicKeyInfoOwned::from_key(public_key)
        .map_err(|e| CaError::KeyGeneration(format!("public key encoding: {e}")))?;
    let serial = random_serial().map_err(|e| CaError::KeyGeneration(e.to_string()))?;
    let validity = Validity::from_now(Duration::from_secs(CA_VALIDITY_DAYS * 86_400))
        .map_err(|e| CaError::KeyGeneration(e.to_string()))?;

    let signing_key: SigningKey<Sha256> = SigningKey::new(private_key.clone());
    let builder = CertificateBuilder::new(
        Profile::Root,
        serial,
        validity,
        subject,
        spki,
        &signing_key,
    )
    .map_err(|e| CaError::KeyGeneration(e.to_string()))?;

    let cert = builder
        .build::<rsa::pkcs1v15::Signature>()
        .map_err(|e| CaError::KeyGeneration(e.to_string()))?;
    cert.to_pem(LineEnding::LF)
        .map_err(|e| CaError::KeyGeneration(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
    use tempfile::TempDir;
    use x509_cert::der::asn1::ObjectIdentifier;
    use x509_cert::der::{Decode, DecodePem, Encode};
    use x509_cert::ext::pkix::BasicConstraints;
    use x509_cert::Certificate;

    const BASIC_CONSTRAINTS_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.19");

    struct Fixture {
        _dir: TempDir,
        registry: CaRegistry,
        artifacts: ArtifactStore,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().expect("temp dir");
        let registry = CaRegistry::open(&dir.path().join("registry.redb")).expect("registry");
        let artifacts = ArtifactStore::open(dir.path().join("enclaves")).expect("artifacts");
        Fixture {
            _dir: dir,
            registry,
            artifacts,
        }
    }

    fn subject_cn(cert: &Certificate) -> String {
        cert.tbs_certificate.subject.to_string()
    }

    #[test]
    fn issue_then_get_returns_matching_record() {
        let fx = fixture();
        let issuer = CaIssuer::new(&fx.registry, &fx.artifacts);

        let issued = issuer.issue("acme").unwrap();
        let record = fx.registry.get("acme").unwrap();
        assert_eq!(record, issued.record);

        let cert_pem = fx.artifacts.read(&record.certificate_ref).unwrap();
        let cert = Certificate::from_pem(&cert_pem).unwrap();
        assert_eq!(subject_cn(&cert), "CN=acme");
        // Self-signed: issuer equals subject
        assert_eq!(
            cert.tbs_certificate.issuer,
            cert.tbs_certificate.subject
        );
    }

    #[test]
    fn root_asserts_ca_true_critical() {
        let fx = fixture();
        let issued = CaIssuer::new(&fx.registry, &fx.artifacts)
            .issue("acme")
            .unwrap();

        let cert = Certificate::from_pem(issued.ca_cert_pem.as_bytes()).unwrap();
        let extensions = cert.tbs_certificate.extensions.as_ref().unwrap();
        let bc_ext = extensions
            .iter()
            .find(|ext| ext.extn_id == BASIC_CONSTRAINTS_OID)
            .expect("basic constraints present");
        assert!(bc_ext.critical);

        let bc = BasicConstraints::from_der(bc_ext.extn_value.as_bytes()).unwrap();
        assert!(bc.ca);
    }

    #[test]
    fn distinct_ids_get_distinct_serials_and_keys() {
        let fx = fixture();
        let issuer = CaIssuer::new(&fx.registry, &fx.artifacts);

        let a = issuer.issue("acme").unwrap();
        let b = issuer.issue("globex").unwrap();

        let cert_a = Certificate::from_pem(a.ca_cert_pem.as_bytes()).unwrap();
        let cert_b = Certificate::from_pem(b.ca_cert_pem.as_bytes()).unwrap();
        assert_ne!(
            cert_a.tbs_certificate.serial_number,
            cert_b.tbs_certificate.serial_number
        );
        assert_ne!(
            cert_a.tbs_certificate.subject_public_key_info,
            cert_b.tbs_certificate.subject_public_key_info
        );

        let key_a = fx.artifacts.read(&a.record.private_key_ref).unwrap();
        let key_b = fx.artifacts.read(&b.record.private_key_ref).unwrap();
        assert_ne!(key_a, key_b);
    }

    #[test]
    fn reissue_replaces_record_and_removes_old_artifacts() {
        let fx = fixture();
        let issuer = CaIssuer::new(&fx.registry, &fx.artifacts);

        let first = issuer.issue("acme").unwrap();
        let second = issuer.issue("acme").unwrap();

        let record = fx.registry.get("acme").unwrap();
        assert_eq!(record, second.record);
        assert_ne!(first.record.private_key_ref, second.record.private_key_ref);

        assert!(!fx.artifacts.exists(&first.record.private_key_ref));
        assert!(!fx.artifacts.exists(&first.record.certificate_ref));
        assert!(fx.artifacts.exists(&second.record.private_key_ref));
    }

    #[test]
    fn concurrent_reissue_leaves_one_consistent_version() {
        let fx = fixture();

        std::thread::scope(|s| {
            for _ in 0..2 {
                s.spawn(|| {
                    CaIssuer::new(&fx.registry, &fx.artifacts)
                        .issue("acme")
                        .unwrap();
                });
            }
        });

        let record = fx.registry.get("acme").unwrap();
        assert!(fx.artifacts.exists(&record.private_key_ref));
        assert!(fx.artifacts.exists(&record.certificate_ref));

        // The displaced issuance's artifacts are gone; only the surviving
        // record's version directory remains, even when both issuances
        // land in the same millisecond.
        let versions: Vec<_> = std::fs::read_dir(fx.artifacts.root().join("acme"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(versions.len(), 1);
        assert!(record
            .private_key_ref
            .contains(versions[0].to_str().unwrap()));

        // The surviving key and certificate belong to the same issuance.
        let key_pem = fx.artifacts.read(&record.private_key_ref).unwrap();
        let key =
            RsaPrivateKey::from_pkcs8_pem(std::str::from_utf8(&key_pem).unwrap()).unwrap();
        let cert_pem = fx.artifacts.read(&record.certificate_ref).unwrap();
        let cert = Certificate::from_pem(&cert_pem).unwrap();
        let spki_der = cert
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .unwrap();
        let cert_key = RsaPublicKey::from_public_key_der(&spki_der).unwrap();
        assert_eq!(cert_key, RsaPublicKey::from(&key));
    }

    #[test]
    fn invalid_id_is_rejected_before_any_write() {
        let fx = fixture();
        let issuer = CaIssuer::new(&fx.registry, &fx.artifacts);

        let result = issuer.issue("Not A Label");
        assert!(matches!(result, Err(CaError::InvalidEnclaveId(_))));
        assert!(matches!(
            fx.registry.get("Not A Label"),
            Err(crate::storage::RegistryError::NotFound(_))
        ));
    }
}
