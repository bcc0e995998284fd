//! Paper-graph normalization and radial layout.
//!
//! Takes the graph payload a citation backend returns for one paper, cleans up
//! every node into a uniform record, and places the peers around the paper on
//! a radial map: one angular sector per subfield, distance from the center by
//! relevance, and a translucent zone around each subfield cluster.
//!
//! The pipeline is `graph` (payload, normalization, center split) then
//! `layout` (grouping, sectors, projection, zones). `session` keeps the
//! per-view fetch state, `interaction` the hover state, and `output` builds
//! the JSON frame the page draws. `wasm` exposes all of it to JavaScript.

pub mod config;
pub mod error;
pub mod fetch;
pub mod graph;
pub mod interaction;
pub mod layout;
pub mod output;
pub mod session;
pub mod wasm;

pub use config::{LayoutConfig, SessionConfig};
pub use error::{FetchError, GraphError, LayoutError, LayoutResult, PayloadError};
pub use graph::{normalize, split, GraphPayload, NormalizedNode, RawNode, SplitGraph};
pub use layout::{arrange, place, Arrangement, GraphLayout};
pub use output::RenderFrame;
pub use session::{FetchTicket, GraphSession, Resolution};
