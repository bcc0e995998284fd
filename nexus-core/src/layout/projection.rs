// Radial projection.
//
// distance = max_radius * (1 - relevance * RELEVANCE_PULL)
//
// relevance 0 sits on the max radius, relevance 1 at 30% of it. Values
// outside [0, 1] extrapolate past either end and are left that way.
// Angles are in math orientation; flipping y for the screen is up to the
// presenter.

use serde::Serialize;

use super::sectors::ArrangedNode;
use crate::config::{check_radius, LayoutConfig};
use crate::error::{LayoutError, LayoutResult};
use crate::graph::NormalizedNode;

/// Share of the max radius that full relevance pulls a node inward.
pub const RELEVANCE_PULL: f64 = 0.7;

#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &PointF) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Line from the rim of the center marker to the rim of a node marker.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Spoke {
    pub start: PointF,
    pub end: PointF,
}

/// An arranged node placed relative to the shared center.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub node: NormalizedNode,
    pub angle: f64,
    pub subfield: String,
    pub x: f64,
    pub y: f64,
    /// Distance from the center, before the marker radius.
    pub distance: f64,
    pub spoke: Spoke,
}

impl PositionedNode {
    pub fn position(&self) -> PointF {
        PointF::new(self.x, self.y)
    }
}

/// Distance from the center for a relevance score. Not clamped.
pub fn distance_for(relevance: f64, max_radius: f64) -> f64 {
    max_radius * (1.0 - relevance * RELEVANCE_PULL)
}

/// Place every arranged node around the center.
pub fn project(
    arranged: &[ArrangedNode],
    cfg: &LayoutConfig,
    max_radius: f64,
) -> LayoutResult<Vec<PositionedNode>> {
    check_radius("max_radius", max_radius)?;
    check_radius("center_radius", cfg.center_radius)?;
    check_radius("node_radius", cfg.node_radius)?;

    arranged
        .iter()
        .map(|a| {
            finite(&a.node.id, "angle", a.angle)?;
            finite(&a.node.id, "relevance", a.node.relevance)?;

            let (sin, cos) = a.angle.sin_cos();
            let distance = distance_for(a.node.relevance, max_radius);
            let x = distance * cos;
            let y = distance * sin;
            finite(&a.node.id, "distance", distance)?;
            finite(&a.node.id, "x", x)?;
            finite(&a.node.id, "y", y)?;

            Ok(PositionedNode {
                node: a.node.clone(),
                angle: a.angle,
                subfield: a.subfield.clone(),
                x,
                y,
                distance,
                spoke: Spoke {
                    start: PointF::new(cfg.center_radius * cos, cfg.center_radius * sin),
                    end: PointF::new(x - cfg.node_radius * cos, y - cfg.node_radius * sin),
                },
            })
        })
        .collect()
}

fn finite(id: &str, quantity: &'static str, value: f64) -> LayoutResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LayoutError::NonFinite { id: id.to_string(), quantity, value })
    }
}
