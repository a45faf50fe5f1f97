//! Server-rendered dashboard pages and the registration form.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use tracing::info;

use crate::config::{Config, SESSION_COOKIE};
use crate::middleware::PageOutcome;
use crate::models::{CreateUserRequest, EntryFilter, LocalSession, SessionState};
use crate::services::registration::{self, Notice, RegistrationOutcome};
use crate::services::{ContentRepository, entries};
use crate::views::{DashboardPage, RegistrationForm, Views};

/// Query parameters of the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub env: Option<String>,
    pub module: Option<String>,
    /// `new` right after a successful first registration
    pub welcome: Option<String>,
}

impl DashboardQuery {
    fn filter(&self) -> EntryFilter {
        EntryFilter {
            env: self.env.clone(),
            module: self.module.clone(),
        }
    }
}

/// Fetch, normalize and filter entries for the dashboard.
///
/// Without delivery credentials no request is made and the page shows the
/// configuration banner instead.
async fn build_page(
    repo: &dyn ContentRepository,
    config: &Config,
    filter: &EntryFilter,
) -> DashboardPage {
    let configured = config.cms.has_delivery_credentials();
    let all = if configured {
        entries::list_entries(repo, &config.cms.content_type).await
    } else {
        Vec::new()
    };
    DashboardPage::new(
        configured,
        &config.cms.content_type,
        entries::summarize(all, filter),
        filter,
    )
}

fn session_state(req: &HttpRequest) -> SessionState {
    let cookie = req.cookie(SESSION_COOKIE);
    SessionState::from_cookie(cookie.as_ref().map(|c| c.value()))
}

fn session_cookie(session: &LocalSession, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, session.to_cookie_value());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(secure);
    cookie.make_permanent();
    cookie
}

/// Dashboard: entry table with env/module filters.
///
/// GET /?env=...&module=...
pub async fn dashboard(
    req: HttpRequest,
    repo: web::Data<dyn ContentRepository>,
    config: web::Data<Config>,
    views: web::Data<Views>,
    query: web::Query<DashboardQuery>,
) -> HttpResponse {
    let filter = query.filter();
    let mut page = build_page(repo.get_ref(), &config, &filter).await;

    match session_state(&req) {
        SessionState::Returning(session) => {
            page.notice = Some(if query.welcome.as_deref() == Some("new") {
                Notice::created(&session.username)
            } else {
                Notice::welcome_back(&session.username)
            });
            page.username = Some(session.username);
        }
        SessionState::Unknown => {
            page.registration.open = true;
        }
    }

    let response = views.dashboard(&page);
    if page.configured {
        response
    } else {
        PageOutcome::Unconfigured.tag(response)
    }
}

/// Registration form submission.
///
/// POST /register
pub async fn register(
    repo: web::Data<dyn ContentRepository>,
    config: web::Data<Config>,
    views: web::Data<Views>,
    form: web::Form<CreateUserRequest>,
) -> HttpResponse {
    let form = form.into_inner();

    match registration::submit(repo.get_ref(), &form).await {
        Ok(outcome) => {
            let (location, logged) = match &outcome {
                RegistrationOutcome::Created { entry_uid, .. } => {
                    info!(uid = %entry_uid, "New user registered");
                    ("/?welcome=new", PageOutcome::Registered)
                }
                RegistrationOutcome::WelcomeBack { .. } => ("/", PageOutcome::WelcomeBack),
            };
            let cookie = session_cookie(outcome.session(), config.environment.is_production());

            logged.tag(
                HttpResponse::SeeOther()
                    .cookie(cookie)
                    .append_header((header::LOCATION, location))
                    .finish(),
            )
        }
        Err(e) => {
            let mut page = build_page(repo.get_ref(), &config, &EntryFilter::default()).await;
            page.registration = RegistrationForm {
                open: true,
                username: form.username.unwrap_or_default(),
                email: form.email.unwrap_or_default(),
                error: Some(e.to_string()),
            };
            PageOutcome::RegistrationRejected.tag(views.dashboard(&page))
        }
    }
}

/// Entry detail page; renders a 404 page when the entry cannot be loaded.
///
/// GET /entry/{uid}
pub async fn entry_detail(
    repo: web::Data<dyn ContentRepository>,
    config: web::Data<Config>,
    views: web::Data<Views>,
    path: web::Path<String>,
) -> HttpResponse {
    let uid = path.into_inner();
    match entries::get_entry(repo.get_ref(), &config.cms.content_type, &uid).await {
        Some(entry) => views.entry(&entry),
        None => PageOutcome::EntryMissing.tag(views.not_found(&uid)),
    }
}

/// Configure page routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(dashboard)))
        .service(web::resource("/register").route(web::post().to(register)))
        .service(web::resource("/entry/{uid}").route(web::get().to(entry_detail)));
}
