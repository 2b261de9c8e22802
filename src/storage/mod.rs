// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Persistent Storage Module
//!
//! Two durable stores live under the data directory:
//!
//! - the **artifact store**: raw PEM key/certificate material, addressed
//!   by opaque string refs
//! - the **CA registry**: redb database mapping enclave ids to the refs of
//!   their CA material
//!
//! ## Storage Layout
//!
//! ```text
//! $DATA_DIR/
//!   registry.redb           # enclave_id -> EnclaveCaRecord
//!   enclaves/{enclave_id}/{version}/
//!     ca_key.pem            # CA private key (NEVER exposed via API)
//!     ca_cert.pem           # CA self-signed root certificate
//! ```
//!
//! Components never bypass these interfaces to touch CA material directly;
//! the registry owns the mapping and the artifact store owns the bytes.

pub mod artifacts;
pub mod paths;
pub mod registry;

pub use artifacts::{ArtifactStore, StorageError, StorageResult};
pub use paths::CaPaths;
pub use registry::{CaRegistry, EnclaveCaRecord, RegistryError, RegistryResult};
