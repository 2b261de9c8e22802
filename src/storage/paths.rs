// SPDX-License-Identifier: AGPL-3.0-or-later

//! Storage layout for CA material and the registry database.
//!
//! The layout is only assembled here; everything else addresses artifacts
//! through opaque refs resolved by [`super::ArtifactStore`].

use std::path::{Path, PathBuf};

/// Storage path utilities for the data directory.
#[derive(Debug, Clone)]
pub struct CaPaths {
    root: PathBuf,
}

impl CaPaths {
    /// Create a new CaPaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persistent data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding per-enclave CA artifacts.
    pub fn enclaves_dir(&self) -> PathBuf {
        self.root.join("enclaves")
    }

    /// Path to the registry database file.
    pub fn registry_db(&self) -> PathBuf {
        self.root.join("registry.redb")
    }

    // ========== Artifact Refs ==========
    //
    // Refs are relative strings, not paths; the artifact store resolves
    // them under `enclaves_dir`. The registry persists these strings.
    //
    // Refs carry an issuance version so a re-issue writes fresh artifacts
    // and flips the registry record atomically; a signer holding the old
    // record keeps resolving the old material until it finishes. The
    // version must be unique per issuance, so concurrent re-issues for
    // the same id never write to each other's refs.

    /// Opaque ref for an enclave's CA private key artifact.
    pub fn ca_key_ref(enclave_id: &str, version: &str) -> String {
        format!("{enclave_id}/{version}/ca_key.pem")
    }

    /// Opaque ref for an enclave's CA certificate artifact.
    pub fn ca_cert_ref(enclave_id: &str, version: &str) -> String {
        format!("{enclave_id}/{version}/ca_cert.pem")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_root_for_testing() {
        let paths = CaPaths::new("/tmp/test-data");
        assert_eq!(paths.root(), Path::new("/tmp/test-data"));
        assert_eq!(
            paths.enclaves_dir(),
            PathBuf::from("/tmp/test-data/enclaves")
        );
        assert_eq!(
            paths.registry_db(),
            PathBuf::from("/tmp/test-data/registry.redb")
        );
    }

    #[test]
    fn artifact_refs_are_relative_and_versioned() {
        assert_eq!(
            CaPaths::ca_key_ref("acme", "1706400000-00c0ffee"),
            "acme/1706400000-00c0ffee/ca_key.pem"
        );
        assert_eq!(
            CaPaths::ca_cert_ref("acme", "1706400000-00c0ffee"),
            "acme/1706400000-00c0ffee/ca_cert.pem"
        );
    }
}
