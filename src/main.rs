//! QA Dashboard Server - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, http::header, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use qa_dashboard_lib::api;
use qa_dashboard_lib::config::Config;
use qa_dashboard_lib::middleware::RequestLogger;
use qa_dashboard_lib::services::{ContentRepository, ContentstackClient};
use qa_dashboard_lib::views::Views;

/// Perform health check (for Docker healthcheck).
fn health_check() -> bool {
    // Simple check - just verify we can load config
    Config::from_env().is_ok()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Check for --health-check flag (used by Docker HEALTHCHECK)
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        if health_check() {
            std::process::exit(0);
        } else {
            std::process::exit(1);
        }
    }

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        std::process::exit(1);
    }

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - CONTENTSTACK_REGION must be one of us, eu, azure-na, azure-eu");
            error!("  - QAD_PORT must be a valid port number");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  QA Dashboard Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    info!(
        region = %config.cms.region,
        environment = %config.cms.environment,
        content_type = %config.cms.content_type,
        "Contentstack stack configured"
    );
    if !config.cms.has_delivery_credentials() {
        warn!(
            "CONTENTSTACK_API_KEY / CONTENTSTACK_DELIVERY_TOKEN not set - \
             the dashboard will show a configuration notice instead of entries"
        );
    }
    if !config.cms.has_management_credentials() {
        warn!("CONTENTSTACK_MANAGEMENT_TOKEN not set - user registration will fail");
    }

    let views = match Views::new() {
        Ok(views) => views,
        Err(e) => {
            error!("Failed to load templates: {}", e);
            std::process::exit(1);
        }
    };

    // Prepare shared state
    let bind_address = config.bind_address();
    let static_dir = config.static_dir.clone();
    let is_development = config.is_development();
    let repo: Arc<dyn ContentRepository> = Arc::new(ContentstackClient::new(config.cms.clone()));
    let config = web::Data::new(config);
    let views = web::Data::new(views);

    if static_dir.is_some() {
        info!("Static file serving enabled from {:?}", static_dir);
    }

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    // Start HTTP server
    let server = HttpServer::new(move || {
        // Configure CORS
        let cors = if is_development {
            // Permissive CORS for development
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .supports_credentials()
                .max_age(3600)
        } else {
            // Restrictive CORS for production (same-origin only)
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        };

        let mut app = App::new()
            // Add CORS middleware (must be before other middleware)
            .wrap(cors)
            // Add request logging middleware
            .wrap(RequestLogger)
            // Add shared state
            .app_data(web::Data::from(repo.clone()))
            .app_data(config.clone())
            .app_data(views.clone());

        // Serve static assets (css, images) when QAD_STATIC_DIR is set
        if let Some(ref dir) = static_dir {
            app = app.service(Files::new("/assets", dir.clone()).prefer_utf8(true));
        }

        app.configure(api::configure_app)
    });

    // Set worker count
    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
