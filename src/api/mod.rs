// SPDX-License-Identifier: AGPL-3.0-or-later

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        GenerateCaResponse, ProcessQueryRequest, RegisterUserRequest, SignCsrRequest,
        SignCsrResponse,
    },
    state::AppState,
};

pub mod ca;
pub mod enclave;
pub mod health;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/sign-csr", post(ca::sign_csr))
        .route("/generate-ca/{enclave_id}", post(ca::generate_ca))
        .route("/register-user", post(enclave::register_user))
        .route("/process-query", post(enclave::process_query))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        ca::generate_ca,
        ca::sign_csr,
        enclave::register_user,
        enclave::process_query,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            SignCsrRequest,
            SignCsrResponse,
            GenerateCaResponse,
            RegisterUserRequest,
            ProcessQueryRequest
        )
    ),
    tags(
        (name = "CA", description = "Per-enclave certificate authority operations"),
        (name = "Enclave", description = "Pass-through to remote enclave endpoints"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (_dir, state) = test_state();
        let app = router(state);
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }
}
