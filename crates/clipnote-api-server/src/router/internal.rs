use axum::extract::State;
use std::sync::Arc;
use tracing::trace;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    logic::internal::{HealthResponse, check_health},
    repository::Repository,
};
use shared::{adapters::openapi::JsonResponse, error::CommonError};

pub const SERVICE_ROUTE_KEY: &str = "_internal";

const GREETING: &str = "Hello from clipnote!";

pub fn create_router() -> OpenApiRouter<Arc<InternalService>> {
    OpenApiRouter::new()
        .routes(routes!(route_root))
        .routes(routes!(route_health))
}

#[utoipa::path(
    get,
    path = "/",
    tags = [SERVICE_ROUTE_KEY],
    responses(
        (status = 200, description = "Plaintext greeting", body = String, content_type = "text/plain"),
    ),
    summary = "Greeting",
    description = "Plaintext greeting confirming the gateway is up",
    operation_id = "root-greeting",
)]
async fn route_root() -> &'static str {
    GREETING
}

#[utoipa::path(
    get,
    path = "/api/health",
    tags = [SERVICE_ROUTE_KEY],
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 500, description = "Store unreachable", body = CommonError),
    ),
    summary = "Health check",
    description = "Check that the gateway can reach the store",
    operation_id = "health-check",
)]
async fn route_health(
    State(ctx): State<Arc<InternalService>>,
) -> JsonResponse<HealthResponse, CommonError> {
    trace!("Checking store health");
    let response = check_health(&ctx.repository).await;
    trace!(success = response.is_ok(), "Checking store health completed");
    JsonResponse::from(response)
}

pub struct InternalService {
    repository: Repository,
}

impl InternalService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }
}
