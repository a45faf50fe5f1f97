//! Mock Contentstack stack for E2E tests.
//!
//! Starts an in-process HTTP server answering the delivery and management
//! entry endpoints the dashboard uses. Seeded records count as published;
//! created records only show up in listings once published.

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, delete, get, post, put, web};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

pub const API_KEY: &str = "blt-test-api-key";
pub const DELIVERY_TOKEN: &str = "cs-test-delivery-token";
pub const MANAGEMENT_TOKEN: &str = "cs-test-management-token";

/// One request seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
struct StoredRecord {
    content_type: String,
    value: Value,
    published: bool,
}

/// Shared state for the mock stack.
#[derive(Default)]
pub struct MockStackState {
    records: Vec<StoredRecord>,
    next_uid: usize,
    pub fail_publish: bool,
    pub requests: Vec<RecordedRequest>,
}

impl MockStackState {
    fn visible(&self, content_type: &str) -> Vec<Value> {
        self.records
            .iter()
            .filter(|r| r.content_type == content_type && r.published)
            .map(|r| r.value.clone())
            .collect()
    }

    fn find_mut(&mut self, content_type: &str, uid: &str) -> Option<&mut StoredRecord> {
        self.records
            .iter_mut()
            .find(|r| r.content_type == content_type && r.value["uid"] == uid)
    }

    fn record(&mut self, req: &HttpRequest, body: Option<Value>) {
        let query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
            .map(|q| q.into_inner())
            .unwrap_or_default();
        self.requests.push(RecordedRequest {
            method: req.method().to_string(),
            path: req.path().to_string(),
            query,
            body,
        });
    }
}

type SharedState = web::Data<Arc<Mutex<MockStackState>>>;

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

fn error(status: u16, message: &str, code: u32) -> HttpResponse {
    let status = actix_web::http::StatusCode::from_u16(status).unwrap();
    HttpResponse::build(status).json(json!({
        "error_message": message,
        "error_code": code,
    }))
}

fn delivery_denied(req: &HttpRequest) -> Option<HttpResponse> {
    if header(req, "api_key") != Some(API_KEY) || header(req, "access_token") != Some(DELIVERY_TOKEN)
    {
        return Some(error(412, "Access token or api key is invalid.", 109));
    }
    None
}

fn management_denied(req: &HttpRequest) -> Option<HttpResponse> {
    if header(req, "api_key") != Some(API_KEY)
        || header(req, "authorization") != Some(MANAGEMENT_TOKEN)
    {
        return Some(error(
            401,
            "You're not allowed in here unless you're logged in.",
            105,
        ));
    }
    None
}

fn not_found() -> HttpResponse {
    error(404, "The requested object doesn't exist.", 141)
}

fn parse_body(body: &web::Bytes) -> Option<Value> {
    serde_json::from_slice(body).ok()
}

#[get("/v3/content_types/{content_type}/entries")]
async fn list_entries(
    state: SharedState,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    let mut state = state.lock().unwrap();
    state.record(&req, None);
    if let Some(denied) = delivery_denied(&req) {
        return denied;
    }

    let query = state.requests.last().map(|r| r.query.clone()).unwrap_or_default();
    let skip: usize = query.get("skip").and_then(|s| s.parse().ok()).unwrap_or(0);
    let limit: usize = query.get("limit").and_then(|s| s.parse().ok()).unwrap_or(100);

    let page: Vec<Value> = state
        .visible(&path)
        .into_iter()
        .skip(skip)
        .take(limit)
        .collect();
    HttpResponse::Ok().json(json!({ "entries": page }))
}

#[get("/v3/content_types/{content_type}/entries/{uid}")]
async fn fetch_entry(
    state: SharedState,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let mut state = state.lock().unwrap();
    state.record(&req, None);
    if let Some(denied) = delivery_denied(&req) {
        return denied;
    }

    let (content_type, uid) = path.into_inner();
    match state
        .visible(&content_type)
        .into_iter()
        .find(|v| v["uid"] == uid.as_str())
    {
        Some(entry) => HttpResponse::Ok().json(json!({ "entry": entry })),
        None => not_found(),
    }
}

#[post("/v3/content_types/{content_type}/entries")]
async fn create_entry(
    state: SharedState,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    let mut state = state.lock().unwrap();
    let body = parse_body(&body);
    state.record(&req, body.clone());
    if let Some(denied) = management_denied(&req) {
        return denied;
    }

    let Some(Value::Object(mut fields)) = body.and_then(|b| b.get("entry").cloned()) else {
        return error(422, "Entry is required.", 119);
    };

    state.next_uid += 1;
    let uid = format!("blt{:016x}", state.next_uid);
    fields.insert("uid".to_string(), json!(uid));
    fields.insert("created_at".to_string(), json!("2026-03-05T14:30:00.000Z"));
    let value = Value::Object(fields);

    state.records.push(StoredRecord {
        content_type: path.into_inner(),
        value: value.clone(),
        published: false,
    });

    HttpResponse::Created().json(json!({
        "notice": "Entry created successfully.",
        "entry": value,
    }))
}

#[post("/v3/content_types/{content_type}/entries/{uid}/publish")]
async fn publish_entry(
    state: SharedState,
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: web::Bytes,
) -> HttpResponse {
    let mut state = state.lock().unwrap();
    state.record(&req, parse_body(&body));
    if let Some(denied) = management_denied(&req) {
        return denied;
    }
    if state.fail_publish {
        return error(422, "Entry publishing failed.", 141);
    }

    let (content_type, uid) = path.into_inner();
    match state.find_mut(&content_type, &uid) {
        Some(record) => {
            record.published = true;
            HttpResponse::Ok().json(json!({
                "notice": "The requested action has been performed."
            }))
        }
        None => not_found(),
    }
}

#[post("/v3/content_types/{content_type}/entries/{uid}/unpublish")]
async fn unpublish_entry(
    state: SharedState,
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: web::Bytes,
) -> HttpResponse {
    let mut state = state.lock().unwrap();
    state.record(&req, parse_body(&body));
    if let Some(denied) = management_denied(&req) {
        return denied;
    }

    let (content_type, uid) = path.into_inner();
    match state.find_mut(&content_type, &uid) {
        Some(record) => {
            record.published = false;
            HttpResponse::Ok().json(json!({
                "notice": "The requested action has been performed."
            }))
        }
        None => not_found(),
    }
}

#[put("/v3/content_types/{content_type}/entries/{uid}")]
async fn update_entry(
    state: SharedState,
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: web::Bytes,
) -> HttpResponse {
    let mut state = state.lock().unwrap();
    let body = parse_body(&body);
    state.record(&req, body.clone());
    if let Some(denied) = management_denied(&req) {
        return denied;
    }

    let Some(Value::Object(fields)) = body.and_then(|b| b.get("entry").cloned()) else {
        return error(422, "Entry is required.", 119);
    };

    let (content_type, uid) = path.into_inner();
    match state.find_mut(&content_type, &uid) {
        Some(record) => {
            if let Value::Object(existing) = &mut record.value {
                existing.extend(fields);
            }
            HttpResponse::Ok().json(json!({
                "notice": "Entry updated successfully.",
                "entry": record.value,
            }))
        }
        None => not_found(),
    }
}

#[delete("/v3/content_types/{content_type}/entries/{uid}")]
async fn delete_entry(
    state: SharedState,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let mut state = state.lock().unwrap();
    state.record(&req, None);
    if let Some(denied) = management_denied(&req) {
        return denied;
    }

    let (content_type, uid) = path.into_inner();
    let before = state.records.len();
    state
        .records
        .retain(|r| !(r.content_type == content_type && r.value["uid"] == uid.as_str()));
    if state.records.len() == before {
        return not_found();
    }
    HttpResponse::Ok().json(json!({ "notice": "Entry deleted successfully." }))
}

/// Mock Contentstack stack serving delivery and management endpoints.
pub struct MockContentstack {
    pub base_url: String,
    pub state: Arc<Mutex<MockStackState>>,
}

impl MockContentstack {
    /// Start the mock stack on an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(MockStackState::default()));

        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let state_data = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state_data.clone()))
                .service(list_entries)
                .service(fetch_entry)
                .service(create_entry)
                .service(publish_entry)
                .service(unpublish_entry)
                .service(update_entry)
                .service(delete_entry)
        })
        .workers(1)
        .listen(listener)
        .expect("failed to listen")
        .disable_signals()
        .run();

        // Fire and forget - server lives for the process lifetime
        tokio::spawn(server);

        MockContentstack { base_url, state }
    }

    /// Seed published records into a content type.
    pub fn seed(&self, content_type: &str, records: Vec<Value>) {
        let mut state = self.state.lock().unwrap();
        state
            .records
            .extend(records.into_iter().map(|value| StoredRecord {
                content_type: content_type.to_string(),
                value,
                published: true,
            }));
    }

    /// Make every publish call fail with HTTP 422.
    pub fn fail_publish(&self, fail: bool) {
        self.state.lock().unwrap().fail_publish = fail;
    }

    /// All records of a content type, published or not.
    pub fn stored(&self, content_type: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .records
            .iter()
            .filter(|r| r.content_type == content_type)
            .map(|r| r.value.clone())
            .collect()
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Requests whose method and path match.
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}
