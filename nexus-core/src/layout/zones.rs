// Cluster zones.
//
// One bounding circle per group: centered on the mean of the member offsets,
// radius = farthest member from that centroid + margin. A zone only looks at
// its own group's members. Groups without positioned members get radius 0,
// which the presenter skips.

use std::collections::HashSet;

use serde::Serialize;

use super::grouping::Group;
use super::projection::{PointF, PositionedNode};
use crate::config::check_radius;
use crate::error::{LayoutError, LayoutResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub subfield: String,
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl Zone {
    /// Zones with radius 0 belong to empty groups and are not drawn.
    pub fn is_renderable(&self) -> bool {
        self.radius > 0.0
    }

    pub fn center(&self) -> PointF {
        PointF::new(self.center_x, self.center_y)
    }
}

/// Bounding circles for every group, in group order.
pub fn compute_zones(
    positioned: &[PositionedNode],
    groups: &[Group],
    margin: f64,
) -> LayoutResult<Vec<Zone>> {
    check_radius("zone_margin", margin)?;

    let known: HashSet<&str> = groups.iter().map(|g| g.subfield.as_str()).collect();
    if let Some(stray) = positioned.iter().find(|p| !known.contains(p.subfield.as_str())) {
        return Err(LayoutError::UnknownGroup {
            id: stray.node.id.clone(),
            subfield: stray.subfield.clone(),
        });
    }

    groups
        .iter()
        .map(|g| {
            let members: Vec<PointF> = positioned
                .iter()
                .filter(|p| p.subfield == g.subfield)
                .map(PositionedNode::position)
                .collect();
            zone_for(&g.subfield, &members, margin)
        })
        .collect()
}

fn zone_for(subfield: &str, members: &[PointF], margin: f64) -> LayoutResult<Zone> {
    if members.is_empty() {
        return Ok(Zone { subfield: subfield.to_string(), center_x: 0.0, center_y: 0.0, radius: 0.0 });
    }

    let n = members.len() as f64;
    let centroid = PointF::new(
        members.iter().map(|p| p.x).sum::<f64>() / n,
        members.iter().map(|p| p.y).sum::<f64>() / n,
    );
    let reach = members
        .iter()
        .map(|p| p.distance_to(&centroid))
        .fold(0.0f64, f64::max);
    let radius = reach + margin;

    for (quantity, value) in [("centroid x", centroid.x), ("centroid y", centroid.y), ("radius", radius)] {
        if !value.is_finite() {
            return Err(LayoutError::NonFiniteZone { subfield: subfield.to_string(), quantity, value });
        }
    }

    Ok(Zone {
        subfield: subfield.to_string(),
        center_x: centroid.x,
        center_y: centroid.y,
        radius,
    })
}
