//! HTTP endpoint modules.

pub mod dashboard;
pub mod entries;
pub mod health;
pub mod openapi;
pub mod users;

use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use dashboard::configure_routes as configure_page_routes;
pub use entries::configure_routes as configure_entry_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use users::configure_routes as configure_user_routes;

/// Mount the JSON API under `/api`, the Swagger UI, and the HTML pages.
///
/// Expects `Data<dyn ContentRepository>`, `Data<Config>` and `Data<Views>`
/// to be registered on the app.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(configure_health_routes)
            .configure(configure_user_routes)
            .configure(configure_entry_routes),
    )
    .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()))
    .configure(configure_page_routes);
}
