// SPDX-License-Identifier: AGPL-3.0-or-later

//! Enclave CA Server - Per-Enclave Certificate Authority Service
//!
//! Every enclave id gets its own CA trust root. This crate generates the
//! per-enclave CA material, signs certificate-signing-requests against the
//! matching CA, and forwards registration/query payloads to the remote
//! enclave endpoints.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `ca` - Certificate issuance and CSR signing
//! - `storage` - Artifact storage and the CA registry
//! - `gateway` - Remote enclave pass-through client

pub mod api;
pub mod ca;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod state;
pub mod storage;
