//! Test-run entry model.
//!
//! Contentstack records carry no enforced schema. [`TestRunEntry::from_value`]
//! maps a raw record into a fixed shape once, so render sites never repeat
//! field-name fallbacks.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Placeholder rendered for missing values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Fields that are modelled explicitly or are CMS bookkeeping, and therefore
/// not repeated in [`TestRunEntry::extra`].
pub const EXCLUDED_FIELDS: [&str; 12] = [
    "uid",
    "title",
    "name",
    "description",
    "summary",
    "_version",
    "created_at",
    "updated_at",
    "created_by",
    "updated_by",
    "ACL",
    "publish_details",
];

/// A point in time as recorded by the CMS.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum EntryDate {
    /// RFC 3339 timestamp or `YYYY-MM-DD` date
    Parsed(DateTime<Utc>),
    /// Unparseable text, shown verbatim
    Raw(String),
}

impl EntryDate {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self::Parsed(dt.with_timezone(&Utc)));
        }
        // Date-only values count as midnight UTC
        let midnight = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0));
        Some(match midnight {
            Some(dt) => Self::Parsed(dt.and_utc()),
            None => Self::Raw(raw.to_string()),
        })
    }

    /// Human-readable form, e.g. `Mar 4, 2025, 09:15 AM`.
    pub fn display(&self) -> String {
        match self {
            Self::Parsed(dt) => dt.format("%b %-d, %Y, %I:%M %p").to_string(),
            Self::Raw(raw) => raw.clone(),
        }
    }
}

/// A QA test-run entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TestRunEntry {
    /// Contentstack entry UID
    pub uid: String,
    /// Run name (`name`, then `title`)
    pub name: Option<String>,
    /// Run date (`date`, then `created_at`)
    pub date: Option<EntryDate>,
    /// Environment (`env`, then `environment`)
    pub environment: Option<String>,
    /// Module (`module`, then `module_name`)
    pub module: Option<String>,
    pub total: Option<u64>,
    pub passed: Option<u64>,
    pub failed: Option<u64>,
    /// HTML report links (`html_report`)
    pub report_urls: Vec<String>,
    /// Free text (`description`, then `summary`)
    pub description: Option<String>,
    pub created_at: Option<EntryDate>,
    pub updated_at: Option<EntryDate>,
    /// Remaining fields, shown on the detail page
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

impl TestRunEntry {
    /// Normalize a raw record. Returns `None` when the record is not an
    /// object or has no UID.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let uid = string_field(obj, &["uid"])?;

        let extra = obj
            .iter()
            .filter(|(key, _)| !EXCLUDED_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Some(Self {
            uid,
            name: string_field(obj, &["name", "title"]),
            date: string_field(obj, &["date", "created_at"]).and_then(|d| EntryDate::parse(&d)),
            environment: string_field(obj, &["env", "environment"]),
            module: string_field(obj, &["module", "module_name"]),
            total: count_field(obj, "total"),
            passed: count_field(obj, "passed"),
            failed: count_field(obj, "failed"),
            report_urls: report_urls(obj.get("html_report")),
            description: string_field(obj, &["description", "summary"]),
            created_at: string_field(obj, &["created_at"]).and_then(|d| EntryDate::parse(&d)),
            updated_at: string_field(obj, &["updated_at"]).and_then(|d| EntryDate::parse(&d)),
            extra,
        })
    }

    /// Name shown in tables and headings.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(Some(self.uid.as_str()).filter(|uid| !uid.is_empty()))
            .unwrap_or("Untitled")
    }

    pub fn display_environment(&self) -> &str {
        self.environment.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn display_module(&self) -> &str {
        self.module.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn display_date(&self) -> String {
        self.date
            .as_ref()
            .map(EntryDate::display)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// First HTML report link, if any.
    pub fn primary_report_url(&self) -> Option<&str> {
        self.report_urls.first().map(String::as_str)
    }
}

/// First non-empty string among `keys`. Numbers are accepted and stringified.
fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn count_field(obj: &Map<String, Value>, key: &str) -> Option<u64> {
    match obj.get(key)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Report links: a list of `{url}` objects or plain strings, or a single one.
fn report_urls(value: Option<&Value>) -> Vec<String> {
    fn link(item: &Value) -> Option<String> {
        let url = match item {
            Value::String(s) => Some(s.trim()),
            Value::Object(o) => o.get("url").and_then(Value::as_str).map(str::trim),
            _ => None,
        };
        url.filter(|s| !s.is_empty()).map(str::to_string)
    }

    match value {
        Some(Value::Array(items)) => items.iter().filter_map(link).collect(),
        Some(item) => link(item).into_iter().collect(),
        None => Vec::new(),
    }
}
