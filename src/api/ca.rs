// SPDX-License-Identifier: AGPL-3.0-or-later

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    ca::{codec, CaIssuer, CsrSigner},
    error::ApiError,
    models::{EnclaveId, GenerateCaResponse, SignCsrRequest, SignCsrResponse},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/v1/generate-ca/{enclave_id}",
    params(
        ("enclave_id" = String, Path, description = "Enclave to issue a CA for")
    ),
    tag = "CA",
    responses(
        (status = 200, body = GenerateCaResponse),
        (status = 400, description = "Invalid enclave id"),
        (status = 500, description = "Key generation or persistence failure")
    )
)]
pub async fn generate_ca(
    Path(enclave_id): Path<EnclaveId>,
    State(state): State<AppState>,
) -> Result<Json<GenerateCaResponse>, ApiError> {
    // RSA keygen is CPU-heavy; keep it off the async workers.
    let issued = tokio::task::spawn_blocking(move || {
        CaIssuer::new(&state.registry, &state.artifacts).issue(enclave_id.as_ref())
    })
    .await
    .map_err(|e| ApiError::internal(format!("issuance task failed: {e}")))??;

    Ok(Json(GenerateCaResponse {
        enclave_id: EnclaveId::from(issued.record.enclave_id.clone()),
        ca_cert: issued.ca_cert_pem,
    }))
}

#[utoipa::path(
    post,
    path = "/v1/sign-csr",
    request_body = SignCsrRequest,
    tag = "CA",
    responses(
        (status = 200, body = SignCsrResponse),
        (status = 400, description = "Malformed encoding or invalid CSR"),
        (status = 404, description = "No CA for this enclave"),
        (status = 500, description = "Signing failure")
    )
)]
pub async fn sign_csr(
    State(state): State<AppState>,
    Json(request): Json<SignCsrRequest>,
) -> Result<Json<SignCsrResponse>, ApiError> {
    let csr_pem = codec::decode_pem(&request.csr_pem)?;

    let signed_cert = tokio::task::spawn_blocking(move || {
        CsrSigner::new(&state.registry, &state.artifacts).sign(request.enclave_id.as_ref(), &csr_pem)
    })
    .await
    .map_err(|e| ApiError::internal(format!("signing task failed: {e}")))??;

    Ok(Json(SignCsrResponse { signed_cert }))
}
