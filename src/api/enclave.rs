// SPDX-License-Identifier: AGPL-3.0-or-later

//! Pass-through endpoints for the remote enclave service.
//!
//! These handlers decode the transport wrapping, forward the payload to
//! `https://{enclave_id}.{domain}` via the gateway, and relay the JSON
//! response unchanged.

use axum::{extract::State, Json};

use crate::{
    ca::{codec, validate_enclave_id},
    error::ApiError,
    models::{ProcessQueryRequest, RegisterUserRequest},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/v1/register-user",
    request_body = RegisterUserRequest,
    tag = "Enclave",
    responses(
        (status = 200, description = "Enclave response relayed verbatim"),
        (status = 400, description = "Invalid enclave id or encoding"),
        (status = 502, description = "Enclave unreachable")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_enclave_id(request.enclave_id.as_ref())?;

    let signed_cert = decode_pem_utf8(&request.signed_cert, "signed_cert")?;
    let public_key = decode_pem_utf8(&request.public_key, "public_key")?;

    let response = state
        .gateway
        .register_user(request.enclave_id.as_ref(), &signed_cert, &public_key)
        .await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/v1/process-query",
    request_body = ProcessQueryRequest,
    tag = "Enclave",
    responses(
        (status = 200, description = "Enclave response relayed verbatim"),
        (status = 400, description = "Invalid enclave id"),
        (status = 502, description = "Enclave unreachable")
    )
)]
pub async fn process_query(
    State(state): State<AppState>,
    Json(request): Json<ProcessQueryRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_enclave_id(request.enclave_id.as_ref())?;

    let response = state
        .gateway
        .process_query(
            request.enclave_id.as_ref(),
            &request.encrypted_query,
            &request.signed_query,
        )
        .await?;
    Ok(Json(response))
}

/// Unwrap a base64-wrapped PEM field into its PEM text.
fn decode_pem_utf8(encoded: &str, field: &str) -> Result<String, ApiError> {
    let bytes = codec::decode_pem(encoded)?;
    String::from_utf8(bytes).map_err(|_| ApiError::bad_request(format!("{field} is not UTF-8")))
}
