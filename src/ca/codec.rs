// SPDX-License-Identifier: AGPL-3.0-or-later

//! Transport codec for certificate material.
//!
//! The wire format wraps PEM text in standard base64 so it survives
//! JSON transport untouched. Both directions are pure functions.

use base64ct::{Base64, Encoding};

use super::CaError;

/// Decode a base64-wrapped PEM payload, verifying both layers.
///
/// Fails with [`CaError::MalformedEncoding`] when the input is not valid
/// base64 or the decoded payload is not PEM.
pub fn decode_pem(encoded: &str) -> Result<Vec<u8>, CaError> {
    let bytes = Base64::decode_vec(encoded.trim())
        .map_err(|e| CaError::MalformedEncoding(format!("invalid base64: {e}")))?;

    pem::parse(&bytes)
        .map_err(|e| CaError::MalformedEncoding(format!("payload is not PEM: {e}")))?;

    Ok(bytes)
}

/// Encode PEM bytes as base64 for transport.
pub fn encode_pem(pem_bytes: &[u8]) -> String {
    Base64::encode_string(pem_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PEM: &str =
        "-----BEGIN CERTIFICATE REQUEST-----\nTUlJQ1pqQ0NBVTRD\n-----END CERTIFICATE REQUEST-----\n";

    #[test]
    fn round_trip_preserves_payload() {
        let encoded = encode_pem(SAMPLE_PEM.as_bytes());
        let decoded = decode_pem(&encoded).unwrap();
        assert_eq!(decoded, SAMPLE_PEM.as_bytes());
        assert_eq!(encode_pem(&decoded), encoded);
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let result = decode_pem("not//valid==base64!!");
        assert!(matches!(result, Err(CaError::MalformedEncoding(_))));
    }

    #[test]
    fn valid_base64_of_non_pem_is_rejected() {
        let encoded = encode_pem(b"just some text, no PEM armor");
        let result = decode_pem(&encoded);
        assert!(matches!(result, Err(CaError::MalformedEncoding(_))));
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let encoded = format!("  {}\n", encode_pem(SAMPLE_PEM.as_bytes()));
        let decoded = decode_pem(&encoded).unwrap();
        assert_eq!(decoded, SAMPLE_PEM.as_bytes());
    }
}
