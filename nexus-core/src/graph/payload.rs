//! Graph payloads and the center/peer split.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::node::{normalize, NormalizedNode, RawNode};
use crate::error::PayloadError;

/// `{ nodes: RawNode[], primary_node_id: string }` as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphPayload {
    pub nodes: Vec<RawNode>,
    /// Title of the center node. Absent or non-string means no center.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_node_id: Option<String>,
}

impl GraphPayload {
    /// Parse a response body. Only the outer shape is checked here; the
    /// individual nodes are left for the normalizer.
    pub fn from_json(body: &str) -> Result<Self, PayloadError> {
        let value: Value = serde_json::from_str(body).map_err(|e| PayloadError::NotJson {
            message: e.to_string(),
        })?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        let Value::Object(mut map) = value else {
            return Err(PayloadError::NotAnObject);
        };
        let nodes = match map.remove("nodes") {
            Some(Value::Array(items)) => items.into_iter().map(RawNode).collect(),
            _ => return Err(PayloadError::MissingNodes),
        };
        let primary_node_id = match map.remove("primary_node_id") {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        Ok(GraphPayload { nodes, primary_node_id })
    }
}

/// The center node (if any) and the remaining peers, all normalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitGraph {
    pub center: Option<NormalizedNode>,
    pub peers: Vec<NormalizedNode>,
}

/// Separate the center from its peers.
///
/// A node is the center iff its raw `title` equals `primary_node_id`. Titles
/// are not unique in general: when several nodes match, the first becomes the
/// center and all of them are left out of the peers.
pub fn split(payload: &GraphPayload) -> SplitGraph {
    let primary = payload.primary_node_id.as_deref();
    let is_center = |raw: &RawNode| primary.is_some() && raw.title() == primary;

    let mut center = None;
    let mut matches = 0usize;
    let mut peers = Vec::with_capacity(payload.nodes.len());

    for raw in &payload.nodes {
        if is_center(raw) {
            matches += 1;
            if center.is_none() {
                center = Some(normalize(raw));
            }
        } else {
            peers.push(normalize(raw));
        }
    }

    if matches > 1 {
        warn!(
            "{} nodes share the primary title {:?}; using the first as center",
            matches,
            primary.unwrap_or_default()
        );
    }
    debug!(
        "split graph: center={} peers={}",
        center.is_some(),
        peers.len()
    );

    SplitGraph { center, peers }
}
