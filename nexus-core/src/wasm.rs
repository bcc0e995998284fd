//! WASM bindings for the nexus-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.
//! Structured values cross the boundary as JSON strings.

use log::{error, info, Level};
use serde::Serialize;
use serde_json::json;
use wasm_bindgen::prelude::*;

use crate::config::{LayoutConfig, SessionConfig};
use crate::error::{FetchError, GraphError};
use crate::fetch::{GraphQuery, HttpResponse, ViewKind};
use crate::graph::GraphPayload;
use crate::interaction::{HoverTarget, InteractionState};
use crate::layout::{layout_graph as run_layout, PointF};
use crate::output::{ErrorInfo, RenderFrame};
use crate::session::{FetchTicket, GraphSession, Resolution};

/// Install console logging and the panic hook.
#[wasm_bindgen]
pub fn init_logging() {
    let _ = console_log::init_with_level(Level::Debug);
    console_error_panic_hook::set_once();
    info!("Logging initialized");
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        error!("Error serializing output: {}", e);
        json!({ "error": { "kind": "layout", "code": "SERIALIZATION", "message": e.to_string() } }).to_string()
    })
}

fn error_json(error: &GraphError) -> String {
    to_json(&json!({ "error": ErrorInfo::from(error) }))
}

fn parse_layout_config(config_json: &str) -> Result<LayoutConfig, String> {
    if config_json.trim().is_empty() {
        return Ok(LayoutConfig::default());
    }
    serde_json::from_str(config_json).map_err(|e| format!("Invalid layout config: {}", e))
}

/// Lay out one payload without any session state.
#[wasm_bindgen]
pub fn layout_graph(payload_json: &str, max_radius: f64) -> String {
    let payload = match GraphPayload::from_json(payload_json) {
        Ok(p) => p,
        Err(e) => {
            error!("Error reading payload: {}", e);
            return error_json(&GraphError::from(FetchError::from(e)));
        }
    };
    let cfg = LayoutConfig::default();
    match run_layout(&payload, &cfg, max_radius) {
        Ok(layout) => to_json(&RenderFrame::build(Some(&layout), &InteractionState::new(), &cfg)),
        Err(e) => {
            error!("Error laying out graph: {}", e);
            error_json(&GraphError::from(e))
        }
    }
}

#[wasm_bindgen]
pub fn max_radius_for_viewport(shortest_dimension: f64) -> f64 {
    LayoutConfig::default().max_radius_for_viewport(shortest_dimension)
}

/// Shorter side of the browser window, or `None` outside a window context.
fn window_shortest_dimension() -> Option<f64> {
    let window = web_sys::window()?;
    let w = window.inner_width().ok()?.as_f64()?;
    let h = window.inner_height().ok()?.as_f64()?;
    Some(w.min(h))
}

/// A session handle for one result page.
#[wasm_bindgen]
pub struct GraphView {
    session: GraphSession,
}

#[wasm_bindgen]
impl GraphView {
    /// `layout_config_json` and `session_config_json` may be empty or partial.
    #[wasm_bindgen(constructor)]
    pub fn new(layout_config_json: &str, session_config_json: &str) -> Result<GraphView, JsValue> {
        let layout_cfg = parse_layout_config(layout_config_json).map_err(|e| JsValue::from_str(&e))?;
        let session_cfg: SessionConfig = if session_config_json.trim().is_empty() {
            SessionConfig::default()
        } else {
            serde_json::from_str(session_config_json)
                .map_err(|e| JsValue::from_str(&format!("Invalid session config: {}", e)))?
        };
        let session = GraphSession::new(layout_cfg, session_cfg).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(GraphView { session })
    }

    /// Start a fetch. Returns `{ticket, request, superseded?}` or `null` after teardown.
    pub fn begin_fetch(&mut self, view: &str, query_json: &str, now_ms: f64) -> Result<String, JsValue> {
        let view = ViewKind::parse(view).ok_or_else(|| JsValue::from_str(&format!("Unknown view '{}'", view)))?;
        let query: GraphQuery =
            serde_json::from_str(query_json).map_err(|e| JsValue::from_str(&format!("Invalid query: {}", e)))?;
        Ok(to_json(&self.session.begin_fetch(view, &query, now_ms)))
    }

    /// Report an HTTP response for `ticket_json`.
    pub fn resolve_fetch(&mut self, ticket_json: &str, status: u16, body: String) -> Result<String, JsValue> {
        let ticket = parse_ticket(ticket_json)?;
        let resolution = self.session.resolve(ticket, Ok(HttpResponse { status, body }));
        Ok(resolution_json(&resolution))
    }

    /// Report a network failure for `ticket_json`.
    pub fn fail_fetch(&mut self, ticket_json: &str, message: &str) -> Result<String, JsValue> {
        let ticket = parse_ticket(ticket_json)?;
        let resolution = self
            .session
            .resolve(ticket, Err(FetchError::Transport { message: message.to_string() }));
        Ok(resolution_json(&resolution))
    }

    /// Returns the tickets of fetches that were cancelled for taking too long.
    pub fn poll_timeouts(&mut self, now_ms: f64) -> String {
        to_json(&self.session.poll_timeouts(now_ms))
    }

    /// Returns the tickets of fetches the host should abort.
    pub fn teardown(&mut self) -> String {
        to_json(&self.session.teardown())
    }

    pub fn toggle_view(&mut self) -> String {
        to_json(&self.session.toggle_view())
    }

    pub fn resize(&mut self, shortest_dimension: f64) -> Result<(), JsValue> {
        self.session
            .resize(shortest_dimension)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Resize from the current browser window.
    pub fn resize_to_window(&mut self) -> Result<(), JsValue> {
        let shortest = window_shortest_dimension().ok_or_else(|| JsValue::from_str("No window available"))?;
        self.resize(shortest)
    }

    pub fn pointer_enter(&mut self, target_json: &str, x: f64, y: f64) -> Result<(), JsValue> {
        let target = parse_target(target_json)?;
        self.session.pointer_enter(target, PointF::new(x, y));
        Ok(())
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.session.pointer_move(PointF::new(x, y))
    }

    pub fn pointer_leave(&mut self, target_json: &str) -> Result<bool, JsValue> {
        let target = parse_target(target_json)?;
        Ok(self.session.pointer_leave(&target))
    }

    /// Current render frame as JSON.
    pub fn frame(&self) -> String {
        to_json(&self.session.frame())
    }
}

fn parse_ticket(ticket_json: &str) -> Result<FetchTicket, JsValue> {
    serde_json::from_str(ticket_json).map_err(|e| JsValue::from_str(&format!("Invalid ticket: {}", e)))
}

fn parse_target(target_json: &str) -> Result<HoverTarget, JsValue> {
    serde_json::from_str(target_json).map_err(|e| JsValue::from_str(&format!("Invalid hover target: {}", e)))
}

fn resolution_json(resolution: &Resolution) -> String {
    let value = match resolution {
        Resolution::Applied => json!({ "outcome": "applied" }),
        Resolution::Failed(e) => json!({ "outcome": "failed", "error": ErrorInfo::from(e) }),
        Resolution::Discarded(reason) => json!({ "outcome": "discarded", "reason": reason }),
    };
    to_json(&value)
}
