//! User registration API handlers.

use actix_web::{HttpResponse, web};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{
    CheckUserRequest, CheckUserResponse, CreateUserRequest, CreateUserResponse, UserSummary,
};
use crate::services::ContentRepository;
use crate::services::users;

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Check whether an email is already registered.
///
/// The comparison is case-insensitive and scans the whole `users` collection.
#[utoipa::path(
    post,
    path = "/api/user/check",
    tag = "Users",
    request_body = CheckUserRequest,
    responses(
        (status = 200, description = "Lookup result", body = CheckUserResponse),
        (status = 400, description = "Email missing", body = crate::error::ErrorResponse),
    )
)]
pub async fn check_user(
    repo: web::Data<dyn ContentRepository>,
    body: web::Json<CheckUserRequest>,
) -> AppResult<HttpResponse> {
    let email = required(&body.email)
        .ok_or_else(|| AppError::InvalidInput("Email is required".to_string()))?;

    let user = users::find_by_email(repo.get_ref(), email).await;

    Ok(HttpResponse::Ok().json(CheckUserResponse {
        exists: user.is_some(),
        user: user.map(UserSummary::from),
    }))
}

/// Create and publish a `users` entry.
///
/// No existence check is made here; callers run `/api/user/check` first.
#[utoipa::path(
    post,
    path = "/api/user",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User saved and published", body = CreateUserResponse),
        (status = 400, description = "Username or email missing", body = crate::error::ErrorResponse),
        (status = 500, description = "Contentstack create or publish failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_user(
    repo: web::Data<dyn ContentRepository>,
    body: web::Json<CreateUserRequest>,
) -> AppResult<HttpResponse> {
    let (Some(username), Some(email)) = (required(&body.username), required(&body.email)) else {
        return Err(AppError::InvalidInput(
            "Username and email are required".to_string(),
        ));
    };

    let entry_uid = users::register(repo.get_ref(), username, email)
        .await
        .map_err(|e| AppError::upstream("Failed to save user information", e))?;

    info!(uid = %entry_uid, "User entry created via API");

    Ok(HttpResponse::Ok().json(CreateUserResponse {
        success: true,
        entry_uid,
        message: "User information saved and published successfully".to_string(),
    }))
}

/// Configure user routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/user").route(web::post().to(create_user)))
        .service(web::resource("/user/check").route(web::post().to(check_user)));
}
