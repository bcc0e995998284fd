mod node;
mod payload;

pub use node::{normalize, NormalizedNode, RawNode, DEFAULT_RELEVANCE, UNKNOWN, UNTITLED};
pub use payload::{split, GraphPayload, SplitGraph};
