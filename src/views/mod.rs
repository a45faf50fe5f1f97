//! Server-rendered HTML pages (Tera templates compiled into the binary).

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tera::{Context, Tera};
use tracing::error;

use crate::models::{EntryFilter, EntryListResponse, TestRunEntry};
use crate::services::Notice;

const TEMPLATES: [(&str, &str); 4] = [
    ("base.html", include_str!("../../templates/base.html")),
    ("dashboard.html", include_str!("../../templates/dashboard.html")),
    ("entry.html", include_str!("../../templates/entry.html")),
    ("not_found.html", include_str!("../../templates/not_found.html")),
];

/// Environment variables listed on the "Configuration Required" banner.
const REQUIRED_VARIABLES: [&str; 5] = [
    "CONTENTSTACK_API_KEY",
    "CONTENTSTACK_DELIVERY_TOKEN",
    "CONTENTSTACK_ENVIRONMENT (optional, defaults to 'production')",
    "CONTENTSTACK_REGION (optional, defaults to 'us')",
    "CONTENTSTACK_CONTENT_TYPE (optional, defaults to 'entry')",
];

/// Template engine shared by all page handlers.
#[derive(Clone)]
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self { tera })
    }

    fn render(&self, template: &str, context: &Context, status: StatusCode) -> HttpResponse {
        match self.tera.render(template, context) {
            Ok(html) => HttpResponse::build(status)
                .content_type("text/html; charset=utf-8")
                .body(html),
            Err(e) => {
                error!(template, "Failed to render template: {:?}", e);
                HttpResponse::InternalServerError()
                    .content_type("text/plain; charset=utf-8")
                    .body("Failed to render page")
            }
        }
    }

    pub fn dashboard(&self, page: &DashboardPage) -> HttpResponse {
        let mut context = Context::new();
        context.insert("page", page);
        context.insert("required_variables", &REQUIRED_VARIABLES);
        context.insert("last_updated", &Utc::now().format("%b %-d, %Y, %H:%M:%S UTC").to_string());
        self.render("dashboard.html", &context, StatusCode::OK)
    }

    pub fn entry(&self, entry: &TestRunEntry) -> HttpResponse {
        let mut context = Context::new();
        context.insert("entry", &EntryDetailView::from(entry));
        self.render("entry.html", &context, StatusCode::OK)
    }

    pub fn not_found(&self, uid: &str) -> HttpResponse {
        let mut context = Context::new();
        context.insert("uid", uid);
        self.render("not_found.html", &context, StatusCode::NOT_FOUND)
    }
}

/// Registration modal state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistrationForm {
    pub open: bool,
    pub username: String,
    pub email: String,
    pub error: Option<String>,
}

/// Everything the dashboard template needs.
#[derive(Debug, Serialize)]
pub struct DashboardPage {
    pub configured: bool,
    pub content_type: String,
    pub total: usize,
    pub filtered: usize,
    pub filter_active: bool,
    pub environments: Vec<FacetLink>,
    pub modules: Vec<FacetLink>,
    pub clear_href: String,
    pub rows: Vec<EntryRow>,
    pub notice: Option<Notice>,
    pub username: Option<String>,
    pub registration: RegistrationForm,
}

impl DashboardPage {
    pub fn new(
        configured: bool,
        content_type: &str,
        summary: EntryListResponse,
        filter: &EntryFilter,
    ) -> Self {
        let env = filter.env();
        let module = filter.module();

        let environments = summary
            .environments
            .iter()
            .map(|value| FacetLink {
                href: filter_href(Some(value.as_str()), module),
                active: env == Some(value.as_str()),
                label: value.clone(),
            })
            .collect();
        let modules = summary
            .modules
            .iter()
            .map(|value| FacetLink {
                href: filter_href(env, Some(value.as_str())),
                active: module == Some(value.as_str()),
                label: value.clone(),
            })
            .collect();

        Self {
            configured,
            content_type: content_type.to_string(),
            total: summary.total,
            filtered: summary.filtered,
            filter_active: filter.is_active(),
            environments,
            modules,
            clear_href: "/".to_string(),
            rows: summary.entries.iter().map(EntryRow::from).collect(),
            notice: None,
            username: None,
            registration: RegistrationForm::default(),
        }
    }
}

/// Query values are percent-encoded, so templates emit the result unescaped.
fn filter_href(env: Option<&str>, module: Option<&str>) -> String {
    let params: Vec<String> = [("env", env), ("module", module)]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| format!("{}={}", key, urlencoding::encode(v))))
        .collect();
    if params.is_empty() {
        "/".to_string()
    } else {
        format!("/?{}", params.join("&"))
    }
}

/// Sidebar filter link.
#[derive(Debug, Clone, Serialize)]
pub struct FacetLink {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// One table row.
#[derive(Debug, Clone, Serialize)]
pub struct EntryRow {
    pub href: String,
    pub name: String,
    pub date: String,
    pub environment: String,
    pub module: String,
    pub total: String,
    pub passed: String,
    pub failed: String,
    pub report_url: Option<String>,
}

fn count(value: Option<u64>) -> String {
    value.map_or_else(|| crate::models::entry::NOT_AVAILABLE.to_string(), |n| n.to_string())
}

impl From<&TestRunEntry> for EntryRow {
    fn from(entry: &TestRunEntry) -> Self {
        Self {
            href: format!("/entry/{}", urlencoding::encode(&entry.uid)),
            name: entry.display_name().to_string(),
            date: entry.display_date(),
            environment: entry.display_environment().to_string(),
            module: entry.display_module().to_string(),
            total: count(entry.total),
            passed: count(entry.passed),
            failed: count(entry.failed),
            report_url: entry.primary_report_url().map(str::to_string),
        }
    }
}

/// Detail page model.
#[derive(Debug, Serialize)]
pub struct EntryDetailView {
    pub uid: String,
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<FieldView>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<&TestRunEntry> for EntryDetailView {
    fn from(entry: &TestRunEntry) -> Self {
        Self {
            uid: entry.uid.clone(),
            title: entry
                .name
                .clone()
                .unwrap_or_else(|| match entry.display_name() {
                    "Untitled" => "Untitled Entry".to_string(),
                    other => other.to_string(),
                }),
            description: entry.description.clone(),
            fields: entry
                .extra
                .iter()
                .map(|(key, value)| FieldView::new(key, value))
                .collect(),
            created_at: entry.created_at.as_ref().map(|d| d.display()),
            updated_at: entry.updated_at.as_ref().map(|d| d.display()),
        }
    }
}

/// How a field value is rendered on the detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Unset,
    Boolean,
    List,
    Json,
    Link,
    Text,
}

/// One "Additional Information" row.
#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub label: String,
    pub kind: FieldKind,
    pub text: String,
    pub flag: bool,
    pub items: Vec<String>,
}

impl FieldView {
    pub fn new(key: &str, value: &Value) -> Self {
        let mut view = Self {
            label: field_label(key),
            kind: FieldKind::Text,
            text: String::new(),
            flag: false,
            items: Vec::new(),
        };

        match value {
            Value::Null => view.kind = FieldKind::Unset,
            Value::Bool(b) => {
                view.kind = FieldKind::Boolean;
                view.flag = *b;
                view.text = if *b { "Yes" } else { "No" }.to_string();
            }
            Value::Array(items) => {
                view.kind = FieldKind::List;
                view.items = items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        Value::Object(_) | Value::Array(_) => {
                            serde_json::to_string_pretty(item).unwrap_or_default()
                        }
                        other => other.to_string(),
                    })
                    .collect();
            }
            Value::Object(_) => {
                view.kind = FieldKind::Json;
                view.text = serde_json::to_string_pretty(value).unwrap_or_default();
            }
            Value::String(s) if s.starts_with("http") => {
                view.kind = FieldKind::Link;
                view.text = s.clone();
            }
            Value::String(s) => view.text = s.clone(),
            Value::Number(n) => view.text = n.to_string(),
        }
        view
    }
}

/// `html_report` → `Html Report`.
pub fn field_label(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
