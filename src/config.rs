// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for CA material and the registry | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `ENCLAVE_GATEWAY_DOMAIN` | Domain suffix for remote enclave endpoints | `enclave.localhost` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Environment variable name for the data directory path.
///
/// Private keys, CA certificates, and the registry database all live under
/// this directory. It should be on an encrypted or otherwise protected
/// volume in production deployments.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Default data directory when `DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the remote enclave domain suffix.
///
/// Enclave endpoints are addressed as `https://{enclave_id}.{domain}`.
pub const GATEWAY_DOMAIN_ENV: &str = "ENCLAVE_GATEWAY_DOMAIN";

/// Default gateway domain when `ENCLAVE_GATEWAY_DOMAIN` is unset. Only
/// suitable for local development; deployments set the real domain.
pub const DEFAULT_GATEWAY_DOMAIN: &str = "enclave.localhost";

/// Environment variable name for the log output format (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
