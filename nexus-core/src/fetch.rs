//! Request descriptions and response classification for graph fetches.
//!
//! The host performs the HTTP call; this module says what to send and turns
//! what came back into either a `GraphPayload` or a typed `FetchError`.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::SessionConfig;
use crate::error::FetchError;
use crate::graph::GraphPayload;

/// Which relation graph of the paper.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// Works the paper references.
    Main,
    /// Works citing the paper.
    CitedBy,
}

impl ViewKind {
    pub fn other(self) -> Self {
        match self {
            ViewKind::Main => ViewKind::CitedBy,
            ViewKind::CitedBy => ViewKind::Main,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "main" => Some(ViewKind::Main),
            "cited_by" => Some(ViewKind::CitedBy),
            _ => None,
        }
    }
}

/// What identifies the paper to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphQuery {
    /// A full work record from the search results, sent as `{ "work": ... }`.
    Work(Value),
    /// Just the paper id, sent as a query parameter.
    PaperId(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

/// A request for the host to perform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// What the host got back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

pub fn build_request(view: ViewKind, query: &GraphQuery, cfg: &SessionConfig) -> HttpRequest {
    let endpoint = match view {
        ViewKind::Main => &cfg.main_endpoint,
        ViewKind::CitedBy => &cfg.cited_by_endpoint,
    };
    let base = format!("{}{}", cfg.base_url, endpoint);

    match query {
        GraphQuery::Work(work) => HttpRequest {
            method: HttpMethod::Post,
            url: base,
            body: Some(json!({ "work": work }).to_string()),
        },
        GraphQuery::PaperId(id) => HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}?{}={}", base, encode_component(&cfg.paper_id_param), encode_component(id)),
            body: None,
        },
    }
}

/// Classify a response: status first, then payload shape.
pub fn read_response(response: &HttpResponse) -> Result<GraphPayload, FetchError> {
    if !(200..300).contains(&response.status) {
        return Err(FetchError::Status { status: response.status });
    }
    Ok(GraphPayload::from_json(&response.body)?)
}

/// Everything outside the RFC 3986 unreserved set.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}
