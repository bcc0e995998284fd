//! Node normalization.
//!
//! The backend is a separate service that changes on its own schedule, so a
//! raw node may be missing any field or carry it with the wrong type. Every
//! field of `NormalizedNode` has a default and `normalize` never fails.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Title used when a node has none.
pub const UNTITLED: &str = "(untitled)";

/// Taxonomy value used when domain/field/subfield is absent.
pub const UNKNOWN: &str = "Unknown";

/// Relevance assumed when a node carries no numeric relevance.
pub const DEFAULT_RELEVANCE: f64 = 0.2;

/// An untrusted node record exactly as received.
///
/// Anything that is not a JSON object behaves like an empty object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawNode(pub Value);

impl From<Value> for RawNode {
    fn from(value: Value) -> Self {
        RawNode(value)
    }
}

impl RawNode {
    /// The `title` field, only when it is a string.
    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }
}

/// A node with every field present and type-stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedNode {
    /// Render key. Not stable across refetches when it had to be generated.
    pub id: String,
    pub title: String,
    pub tldr: String,
    pub year: i64,
    pub keywords: Vec<String>,
    pub doi: String,
    pub citations: u64,
    pub topic: String,
    pub related_topics: Vec<String>,
    pub domain: String,
    pub field: String,
    pub subfield: String,
    /// Nominally in [0, 1]; never clamped.
    pub relevance: f64,
    pub authors: String,
}

/// Typed, non-coercing reads over an optional JSON object.
#[derive(Clone, Copy)]
struct Fields<'a>(Option<&'a Map<String, Value>>);

impl<'a> Fields<'a> {
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.and_then(|m| m.get(key))
    }

    fn str(&self, key: &str) -> Option<&'a str> {
        self.get(key).and_then(Value::as_str)
    }

    fn non_empty_str(&self, key: &str) -> Option<&'a str> {
        self.str(key).filter(|s| !s.is_empty())
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    fn strings(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Normalize one raw node. Total: every input yields a node.
pub fn normalize(raw: &RawNode) -> NormalizedNode {
    let f = Fields(raw.0.as_object());

    let id = f
        .non_empty_str("paperId")
        .or_else(|| f.non_empty_str("id"))
        .or_else(|| f.non_empty_str("title"))
        .map(str::to_string)
        .unwrap_or_else(generated_id);

    NormalizedNode {
        id,
        title: f.str("title").unwrap_or(UNTITLED).to_string(),
        tldr: tldr_text(f.get("tldr")),
        year: f.number("year").map(|y| y as i64).unwrap_or(0),
        keywords: f.strings("keywords"),
        doi: f.str("doi").unwrap_or_default().to_string(),
        citations: f.number("citations").map(|c| c.max(0.0) as u64).unwrap_or(0),
        topic: f.str("topic").unwrap_or_default().to_string(),
        related_topics: f.strings("related_topics"),
        domain: f.str("domain").unwrap_or(UNKNOWN).to_string(),
        field: f.str("field").unwrap_or(UNKNOWN).to_string(),
        subfield: f.str("subfield").unwrap_or(UNKNOWN).to_string(),
        relevance: f.number("relevance").unwrap_or(DEFAULT_RELEVANCE),
        authors: author_names(f.get("authors")),
    }
}

fn generated_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// `tldr` is either plain text or `{ "text": ... }`.
fn tldr_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(m)) => m
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

/// `authors` is either a display string or a list of names/author records.
fn author_names(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(author_name)
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}

fn author_name(item: &Value) -> Option<&str> {
    match item {
        Value::String(s) => Some(s.as_str()),
        Value::Object(m) => m
            .get("name")
            .or_else(|| m.get("display_name"))
            .and_then(Value::as_str)
            .or_else(|| {
                m.get("author")
                    .and_then(|a| a.get("display_name"))
                    .and_then(Value::as_str)
            }),
        _ => None,
    }
}
