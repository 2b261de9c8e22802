// SPDX-License-Identifier: AGPL-3.0-or-later

//! CA registry backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `enclave_cas`: enclave_id → serialized EnclaveCaRecord (JSON bytes)
//!
//! A `put` replaces the whole record inside a single write transaction, so
//! a concurrent `get` observes either the previous record or the new one,
//! never a torn mix. Puts for different enclave ids never interfere.

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};

/// Primary table: enclave_id → serialized EnclaveCaRecord (JSON bytes).
const ENCLAVE_CAS: TableDefinition<&str, &[u8]> = TableDefinition::new("enclave_cas");

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("no CA record for enclave {0}")]
    NotFound(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Durable mapping entry from enclave id to that enclave's CA material.
///
/// The refs are opaque; only [`super::ArtifactStore`] resolves them.
/// `private_key_ref` names secret material and is never transmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnclaveCaRecord {
    /// Unique enclave identifier (registry key).
    pub enclave_id: String,
    /// Opaque ref to the CA private signing key artifact.
    pub private_key_ref: String,
    /// Opaque ref to the CA self-signed root certificate artifact.
    pub certificate_ref: String,
    /// When this CA was issued (replaced on re-issuance).
    pub created_at: DateTime<Utc>,
}

/// Embedded ACID registry of enclave CAs.
pub struct CaRegistry {
    db: Database,
}

impl CaRegistry {
    /// Open (or create) the registry database at the given path.
    pub fn open(path: &Path) -> RegistryResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create the table so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ENCLAVE_CAS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Insert or replace the CA record for an enclave id, returning the
    /// record that was replaced (if any).
    ///
    /// Re-issuance is last-writer-wins: the previous record is replaced
    /// whole and the old key material becomes unreachable through the
    /// registry. The returned record tells the caller exactly which
    /// artifacts were displaced, even when concurrent puts race.
    pub fn put(&self, record: &EnclaveCaRecord) -> RegistryResult<Option<EnclaveCaRecord>> {
        let json = serde_json::to_vec(record)?;

        let write_txn = self.db.begin_write()?;
        let replaced = {
            let mut table = write_txn.open_table(ENCLAVE_CAS)?;
            let replaced = match table.insert(record.enclave_id.as_str(), json.as_slice())? {
                Some(old) => Some(serde_json::from_slice(old.value())?),
                None => None,
            };
            replaced
        };
        write_txn.commit()?;
        Ok(replaced)
    }

    /// Look up the CA record for an enclave id.
    pub fn get(&self, enclave_id: &str) -> RegistryResult<EnclaveCaRecord> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ENCLAVE_CAS)?;
        match table.get(enclave_id)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Err(RegistryError::NotFound(enclave_id.to_string())),
        }
    }

    /// List all registered enclave ids.
    pub fn list_ids(&self) -> RegistryResult<Vec<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ENCLAVE_CAS)?;
        let mut ids = Vec::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            ids.push(key.value().to_string());
        }
        Ok(ids)
    }
}
