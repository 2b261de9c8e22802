// SPDX-License-Identifier: AGPL-3.0-or-later

//! Certificate authority core: per-enclave CA issuance, CSR signing, and
//! the transport codec.
//!
//! Components only reach CA material through the registry and artifact
//! store interfaces; nothing here holds key material beyond the single
//! operation that loaded it.

pub mod codec;
pub mod error;
pub mod issuer;
pub mod signer;

pub use error::CaError;
pub use issuer::{CaIssuer, IssuedCa};
pub use signer::CsrSigner;

use rand::RngCore;
use x509_cert::serial_number::SerialNumber;

/// Validate an enclave id for use as a certificate CN and subdomain.
///
/// Accepts DNS labels: lowercase alphanumeric with interior hyphens, at
/// most 63 characters.
pub fn validate_enclave_id(id: &str) -> Result<(), CaError> {
    let valid_chars = id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if id.is_empty()
        || id.len() > 63
        || !valid_chars
        || id.starts_with('-')
        || id.ends_with('-')
    {
        return Err(CaError::InvalidEnclaveId(id.to_string()));
    }
    Ok(())
}

/// Generate a cryptographically random certificate serial number.
///
/// Serials are unpredictable but not checked for global uniqueness; a
/// 16-byte random value makes collision probability negligible at this
/// issuance volume.
pub(crate) fn random_serial() -> x509_cert::der::Result<SerialNumber> {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    // Force a positive, fixed-width INTEGER that is never zero.
    bytes[0] = (bytes[0] & 0x7f) | 0x40;
    SerialNumber::new(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_enclave_ids_pass() {
        for id in ["acme", "acme-1", "a", "enclave-42-prod", "0day"] {
            assert!(validate_enclave_id(id).is_ok(), "{id} should be valid");
        }
    }

    #[test]
    fn invalid_enclave_ids_fail() {
        let too_long = "a".repeat(64);
        for id in [
            "",
            "-acme",
            "acme-",
            "Acme",
            "ac_me",
            "ac.me",
            "ac me",
            "acme;rm -rf /",
            too_long.as_str(),
        ] {
            assert!(
                matches!(validate_enclave_id(id), Err(CaError::InvalidEnclaveId(_))),
                "{id:?} should be rejected"
            );
        }
    }

    #[test]
    fn serials_are_positive_and_distinct() {
        let a = random_serial().unwrap();
        let b = random_serial().unwrap();
        assert_ne!(a, b);

        // 16 bytes, sign bit clear, leading byte nonzero
        let bytes = a.as_bytes();
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes[0] & 0x80, 0);
        assert_ne!(bytes[0], 0);
    }
}
