// Sector allocation.
//
// The circle is split into N equal arcs, one per non-empty group, in group
// order starting at angle 0. Each arc is then shrunk symmetrically to
// `compression` of its width; the members of the group are spread over the
// shrunk arc at j/m steps, so the arc end itself is never used. The unused
// part of every arc shows up as a gap between neighbouring clusters.

use std::f64::consts::TAU;

use super::grouping::Group;
use crate::config::check_compression;
use crate::error::LayoutResult;
use crate::graph::NormalizedNode;

/// The arc owned by one group.
#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    pub subfield: String,
    pub start: f64,
    pub end: f64,
    /// Start of the compressed arc actually used for placement.
    pub inner_start: f64,
    /// Width of the compressed arc.
    pub inner_width: f64,
}

impl Sector {
    pub fn inner_end(&self) -> f64 {
        self.inner_start + self.inner_width
    }

    /// True when `angle` lies in `[inner_start, inner_end)`.
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.inner_start && angle < self.inner_end()
    }
}

/// A peer with its assigned angle.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrangedNode {
    pub node: NormalizedNode,
    /// Radians in [0, 2π), math orientation.
    pub angle: f64,
    /// Key of the group the node was placed with.
    pub subfield: String,
}

/// Arcs for the non-empty groups, in group order.
pub fn sectors(groups: &[Group], compression: f64) -> LayoutResult<Vec<Sector>> {
    check_compression(compression)?;

    let live: Vec<&Group> = groups.iter().filter(|g| !g.members.is_empty()).collect();
    let n = live.len() as f64;

    Ok(live
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let start = (i as f64 / n) * TAU;
            let end = ((i + 1) as f64 / n) * TAU;
            let width = end - start;
            let inner_width = width * compression;
            let offset = (width - inner_width) / 2.0;
            Sector {
                subfield: g.subfield.clone(),
                start,
                end,
                inner_start: start + offset,
                inner_width,
            }
        })
        .collect())
}

/// Assign every group member an angle inside its group's compressed arc.
pub fn allocate(groups: &[Group], compression: f64) -> LayoutResult<Vec<ArrangedNode>> {
    let arcs = sectors(groups, compression)?;
    let live = groups.iter().filter(|g| !g.members.is_empty());

    let mut out = Vec::with_capacity(groups.iter().map(|g| g.members.len()).sum());
    for (sector, group) in arcs.iter().zip(live) {
        let m = group.members.len() as f64;
        for (j, node) in group.members.iter().enumerate() {
            out.push(ArrangedNode {
                node: node.clone(),
                angle: sector.inner_start + (j as f64 / m) * sector.inner_width,
                subfield: group.subfield.clone(),
            });
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::graph::{normalize, RawNode};
    use serde_json::json;
    use std::f64::consts::PI;

    fn grp(subfield: &str, count: usize) -> Group {
        Group {
            subfield: subfield.to_string(),
            members: (0..count)
                .map(|i| normalize(&RawNode(json!({ "title": format!("{subfield}-{i}"), "subfield": subfield }))))
                .collect(),
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_two_groups_split_circle() {
        let arcs = sectors(&[grp("X", 2), grp("Y", 1)], 0.6).unwrap();
        assert_eq!(arcs.len(), 2);
        assert!(close(arcs[0].start, 0.0));
        assert!(close(arcs[0].end, PI));
        assert!(close(arcs[1].start, PI));
        assert!(close(arcs[1].end, TAU));
        // 0.6 of a half circle, centered: offset 0.2π
        assert!(close(arcs[0].inner_start, 0.2 * PI));
        assert!(close(arcs[0].inner_width, 0.6 * PI));
    }

    #[test]
    fn test_member_angles_step_through_inner_arc() {
        let arranged = allocate(&[grp("X", 2), grp("Y", 1)], 0.6).unwrap();
        let angles: Vec<f64> = arranged.iter().map(|a| a.angle).collect();
        assert!(close(angles[0], 0.2 * PI));
        assert!(close(angles[1], 0.2 * PI + 0.3 * PI));
        assert!(close(angles[2], PI + 0.2 * PI));
        assert_eq!(arranged[2].subfield, "Y");
    }

    #[test]
    fn test_single_group_gets_compressed_full_circle() {
        let arcs = sectors(&[grp("Solo", 4)], 0.5).unwrap();
        assert!(close(arcs[0].inner_start, PI / 2.0));
        assert!(close(arcs[0].inner_width, PI));
    }

    #[test]
    fn test_empty_groups_take_no_sector() {
        let groups = [grp("X", 1), grp("Empty", 0), grp("Y", 1)];
        let arcs = sectors(&groups, 1.0).unwrap();
        assert_eq!(arcs.len(), 2);
        assert_eq!(arcs[1].subfield, "Y");
        assert!(close(arcs[1].start, PI));

        let arranged = allocate(&groups, 1.0).unwrap();
        assert_eq!(arranged.len(), 2);
        assert!(arranged.iter().all(|a| a.angle.is_finite()));
    }

    #[test]
    fn test_no_groups_no_nodes() {
        assert!(allocate(&[], 0.6).unwrap().is_empty());
        assert!(allocate(&[grp("Empty", 0)], 0.6).unwrap().is_empty());
    }

    #[test]
    fn test_angles_inside_own_sector() {
        let groups = [grp("A", 3), grp("B", 5), grp("C", 1), grp("D", 7)];
        let arcs = sectors(&groups, 0.6).unwrap();
        for a in allocate(&groups, 0.6).unwrap() {
            let sector = arcs.iter().find(|s| s.subfield == a.subfield).unwrap();
            assert!(sector.contains(a.angle));
            assert!(a.angle >= 0.0 && a.angle < TAU);
        }
    }

    #[test]
    fn test_invalid_compression_rejected() {
        for bad in [0.0, -0.2, 1.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                allocate(&[grp("X", 1)], bad),
                Err(LayoutError::InvalidCompression { .. })
            ));
        }
    }
}
