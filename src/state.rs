// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::Arc;

use crate::gateway::EnclaveGateway;
use crate::storage::{ArtifactStore, CaRegistry};

/// Shared application state, constructed once in `main` and cloned into
/// handlers. All collaborators are owned here; nothing is process-global.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<CaRegistry>,
    pub artifacts: Arc<ArtifactStore>,
    pub gateway: Arc<EnclaveGateway>,
}

impl AppState {
    pub fn new(registry: CaRegistry, artifacts: ArtifactStore, gateway: EnclaveGateway) -> Self {
        Self {
            registry: Arc::new(registry),
            artifacts: Arc::new(artifacts),
            gateway: Arc::new(gateway),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> (tempfile::TempDir, AppState) {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let registry =
        CaRegistry::open(&dir.path().join("registry.redb")).expect("open test registry");
    let artifacts =
        ArtifactStore::open(dir.path().join("enclaves")).expect("open test artifact store");
    let gateway = EnclaveGateway::new("enclave.test");
    (dir, AppState::new(registry, artifacts, gateway))
}
