//! One log line per request under the `api` target.
//!
//! Page handlers may attach a [`PageOutcome`] to their response; it is
//! logged with the request so a banner page or a rejected registration shows
//! up without reading the HTML.

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{Error, HttpResponse};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::SESSION_COOKIE;

/// Coarse route family, used to pick a log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Api,
    Asset,
    Page,
}

impl RequestKind {
    pub fn of(path: &str) -> Self {
        if path.starts_with("/assets/") {
            Self::Asset
        } else if path == "/api"
            || path.starts_with("/api/")
            || path.starts_with("/api-docs/")
            || path.starts_with("/swagger-ui/")
        {
            Self::Api
        } else {
            Self::Page
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Asset => "asset",
            Self::Page => "page",
        }
    }
}

/// What a page request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Delivery credentials missing; the configuration banner was shown
    Unconfigured,
    /// Registration created a new user
    Registered,
    /// Registration matched an existing user
    WelcomeBack,
    /// Registration failed validation or the save; the form was re-shown
    RegistrationRejected,
    /// Entry page could not load its entry
    EntryMissing,
}

impl PageOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::Registered => "registered",
            Self::WelcomeBack => "welcome_back",
            Self::RegistrationRejected => "registration_rejected",
            Self::EntryMissing => "entry_missing",
        }
    }

    /// Attach this outcome to `response` for the request log.
    pub fn tag(self, mut response: HttpResponse) -> HttpResponse {
        response.extensions_mut().insert(self);
        response
    }
}

/// Request logger middleware factory.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_string();
        let kind = RequestKind::of(&path);
        // Only pages branch on the session
        let session = kind == RequestKind::Page && req.cookie(SESSION_COOKIE).is_some();

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let status = res.status().as_u16();
            let duration_ms = start.elapsed().as_millis() as u64;
            let outcome = res
                .response()
                .extensions()
                .get::<PageOutcome>()
                .map_or("-", PageOutcome::as_str);

            if res.status().is_server_error() {
                warn!(
                    target: "api",
                    %method, %path, kind = kind.as_str(), status, duration_ms, outcome,
                    "request failed"
                );
            } else if kind == RequestKind::Asset {
                debug!(target: "api", %path, status, duration_ms, "asset");
            } else {
                info!(
                    target: "api",
                    %method, %path, kind = kind.as_str(), status, duration_ms, session, outcome,
                    "request"
                );
            }

            Ok(res)
        })
    }
}
