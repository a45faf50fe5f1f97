//! Test-run entry API handlers.

use actix_web::{HttpResponse, web};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{EntryFilter, EntryListResponse, TestRunEntry};
use crate::services::ContentRepository;
use crate::services::entries;

/// List all test-run entries, optionally filtered by environment and module.
#[utoipa::path(
    get,
    path = "/api/entries",
    tag = "Entries",
    params(EntryFilter),
    responses(
        (status = 200, description = "Normalized entries with facet lists", body = EntryListResponse),
    )
)]
pub async fn list_entries(
    repo: web::Data<dyn ContentRepository>,
    config: web::Data<Config>,
    query: web::Query<EntryFilter>,
) -> AppResult<HttpResponse> {
    let all = entries::list_entries(repo.get_ref(), &config.cms.content_type).await;
    Ok(HttpResponse::Ok().json(entries::summarize(all, &query)))
}

/// Get a single test-run entry.
#[utoipa::path(
    get,
    path = "/api/entries/{uid}",
    tag = "Entries",
    params(
        ("uid" = String, Path, description = "Contentstack entry UID")
    ),
    responses(
        (status = 200, description = "Entry found", body = TestRunEntry),
        (status = 404, description = "Entry not found or could not be loaded", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_entry(
    repo: web::Data<dyn ContentRepository>,
    config: web::Data<Config>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let uid = path.into_inner();
    let entry = entries::get_entry(repo.get_ref(), &config.cms.content_type, &uid)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Entry {}", uid)))?;

    Ok(HttpResponse::Ok().json(entry))
}

/// Configure entry routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/entries").route(web::get().to(list_entries)))
        .service(web::resource("/entries/{uid}").route(web::get().to(get_entry)));
}
