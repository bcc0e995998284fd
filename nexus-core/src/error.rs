//! Error types for the graph pipeline.
//!
//! Three families, kept apart so the presenter can word them differently:
//! - `PayloadError`: the backend answered, but not with a graph payload
//! - `FetchError`: the request itself failed (transport, status, timeout)
//! - `LayoutError`: the layout stages were handed structurally invalid input
//!
//! Malformed fields inside individual nodes are never errors; the normalizer
//! absorbs them.

use thiserror::Error;

/// Result alias for the layout stages.
pub type LayoutResult<T> = std::result::Result<T, LayoutError>;

/// The response body could not be read as a `GraphPayload`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PayloadError {
    #[error("Response body is not valid JSON: {message}")]
    NotJson { message: String },

    #[error("Response body is not a JSON object")]
    NotAnObject,

    #[error("Response body has no `nodes` array")]
    MissingNodes,
}

impl PayloadError {
    /// Machine-readable code for the output `error` object.
    pub fn code(&self) -> &'static str {
        match self {
            PayloadError::NotJson { .. } => "PAYLOAD_NOT_JSON",
            PayloadError::NotAnObject => "PAYLOAD_NOT_OBJECT",
            PayloadError::MissingNodes => "PAYLOAD_MISSING_NODES",
        }
    }
}

/// A graph fetch that did not produce a usable payload.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Network error: {message}")]
    Transport { message: String },

    #[error("Server responded with HTTP {status}")]
    Status { status: u16 },

    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Request was cancelled")]
    Cancelled,

    #[error("Malformed graph data: {0}")]
    Payload(#[from] PayloadError),
}

impl FetchError {
    /// Machine-readable code for the output `error` object.
    pub fn code(&self) -> &'static str {
        match self {
            FetchError::Transport { .. } => "TRANSPORT_ERROR",
            FetchError::Status { .. } => "HTTP_STATUS",
            FetchError::Timeout { .. } => "TIMEOUT",
            FetchError::Cancelled => "CANCELLED",
            FetchError::Payload(e) => e.code(),
        }
    }

    /// True for failures of the connection rather than of the data.
    pub fn is_transport(&self) -> bool {
        !matches!(self, FetchError::Payload(_))
    }
}

/// Structurally invalid input reached a layout stage.
///
/// Well-shaped payloads never produce these; they guard direct construction
/// of groups and arranged nodes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Compression factor must be in (0, 1], got {value}")]
    InvalidCompression { value: f64 },

    #[error("Radius `{name}` must be finite and non-negative, got {value}")]
    InvalidRadius { name: &'static str, value: f64 },

    #[error("Node `{id}` has non-finite {quantity}: {value}")]
    NonFinite {
        id: String,
        quantity: &'static str,
        value: f64,
    },

    #[error("Zone `{subfield}` has non-finite {quantity}: {value}")]
    NonFiniteZone {
        subfield: String,
        quantity: &'static str,
        value: f64,
    },

    #[error("Node `{id}` belongs to subfield `{subfield}`, which is not among the groups")]
    UnknownGroup { id: String, subfield: String },
}

impl LayoutError {
    /// Machine-readable code for the output `error` object.
    pub fn code(&self) -> &'static str {
        match self {
            LayoutError::InvalidCompression { .. } => "LAYOUT_INVALID_COMPRESSION",
            LayoutError::InvalidRadius { .. } => "LAYOUT_INVALID_RADIUS",
            LayoutError::NonFinite { .. } | LayoutError::NonFiniteZone { .. } => "LAYOUT_NON_FINITE",
            LayoutError::UnknownGroup { .. } => "LAYOUT_UNKNOWN_GROUP",
        }
    }
}

/// Any failure that leaves a view without a graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl GraphError {
    pub fn code(&self) -> &'static str {
        match self {
            GraphError::Fetch(e) => e.code(),
            GraphError::Layout(e) => e.code(),
        }
    }

    /// Coarse category for user-facing wording: "transport", "payload" or "layout".
    pub fn kind(&self) -> &'static str {
        match self {
            GraphError::Fetch(e) if e.is_transport() => "transport",
            GraphError::Fetch(_) => "payload",
            GraphError::Layout(_) => "layout",
        }
    }
}
