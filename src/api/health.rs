//! Health check endpoints.

use actix_web::{HttpResponse, get, web};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::Config;

/// Health check response.
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

/// Readiness check response.
#[derive(Serialize, ToSchema)]
pub struct ReadyResponse {
    status: &'static str,
    /// Whether the API key and delivery token are set (reads)
    delivery: &'static str,
    /// Whether the management token is set (registration writes)
    management: &'static str,
    region: String,
    environment: String,
}

fn configured(present: bool) -> &'static str {
    if present { "configured" } else { "missing" }
}

/// Health check endpoint.
///
/// Returns 200 if the service is running.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check endpoint.
///
/// Returns 200 when delivery credentials are configured, 503 otherwise.
/// Nothing is sent to Contentstack.
#[utoipa::path(
    get,
    path = "/api/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Contentstack credentials missing", body = ReadyResponse)
    )
)]
#[get("/ready")]
pub async fn ready(config: web::Data<Config>) -> HttpResponse {
    let cms = &config.cms;
    let can_read = cms.has_delivery_credentials();
    let body = ReadyResponse {
        status: if can_read { "ready" } else { "not_configured" },
        delivery: configured(can_read),
        management: configured(cms.has_management_credentials()),
        region: cms.region.to_string(),
        environment: cms.environment.clone(),
    };

    if can_read {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

/// Configure health routes.
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(ready);
}
