// Radial layout for a paper graph.
//
// Goals:
// - Deterministic: the same payload, compression and radius always give the
//   same angles, positions and zones
// - Pure: every stage takes its input by reference and returns fresh values
// - Two phases, so a viewport change does not redo the grouping:
//     arrange: peers -> groups -> angles          (depends on the payload)
//     place:   angles -> positions -> zones       (depends on max_radius)
//
// Submodules:
// - grouping: taxonomy sort + subfield partition
// - sectors: angular arcs and member angles
// - projection: polar -> Cartesian, spokes
// - zones: per-group bounding circles

mod grouping;
mod projection;
mod sectors;
mod zones;

pub use grouping::{group, group_key, sort_peers, taxonomy_cmp, Group};
pub use projection::{distance_for, project, PointF, PositionedNode, Spoke, RELEVANCE_PULL};
pub use sectors::{allocate, sectors, ArrangedNode, Sector};
pub use zones::{compute_zones, Zone};

use log::debug;

use crate::config::LayoutConfig;
use crate::error::LayoutResult;
use crate::graph::{split, GraphPayload, NormalizedNode, SplitGraph};

/// Output of the radius-independent phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    pub center: Option<NormalizedNode>,
    pub groups: Vec<Group>,
    pub arranged: Vec<ArrangedNode>,
}

/// Everything the presenter needs for one graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphLayout {
    pub center: Option<NormalizedNode>,
    pub nodes: Vec<PositionedNode>,
    pub zones: Vec<Zone>,
    pub max_radius: f64,
}

/// Group the peers and assign their angles.
pub fn arrange(graph: &SplitGraph, cfg: &LayoutConfig) -> LayoutResult<Arrangement> {
    let groups = group(&graph.peers);
    let arranged = allocate(&groups, cfg.compression_factor)?;
    debug!("arranged {} peers into {} groups", arranged.len(), groups.len());
    Ok(Arrangement { center: graph.center.clone(), groups, arranged })
}

/// Project an arrangement at `max_radius` and derive its zones.
pub fn place(arrangement: &Arrangement, cfg: &LayoutConfig, max_radius: f64) -> LayoutResult<GraphLayout> {
    let nodes = project(&arrangement.arranged, cfg, max_radius)?;
    let zones = compute_zones(&nodes, &arrangement.groups, cfg.zone_margin)?;
    debug!("placed {} nodes, {} zones at radius {}", nodes.len(), zones.len(), max_radius);
    Ok(GraphLayout { center: arrangement.center.clone(), nodes, zones, max_radius })
}

/// Full pipeline: split, arrange, place.
pub fn layout_graph(payload: &GraphPayload, cfg: &LayoutConfig, max_radius: f64) -> LayoutResult<GraphLayout> {
    let arrangement = arrange(&split(payload), cfg)?;
    place(&arrangement, cfg, max_radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use serde_json::json;

    fn scenario() -> GraphPayload {
        GraphPayload::from_value(json!({
            "primary_node_id": "A",
            "nodes": [
                {"title": "A"},
                {"title": "B", "subfield": "X", "relevance": 1},
                {"title": "C", "subfield": "X", "relevance": 0},
                {"title": "D", "subfield": "Y", "relevance": 0.5},
            ],
        }))
        .unwrap()
    }

    fn by_title<'a>(layout: &'a GraphLayout, title: &str) -> &'a PositionedNode {
        layout.nodes.iter().find(|n| n.node.title == title).unwrap()
    }

    #[test]
    fn test_reference_scenario() {
        let layout = layout_graph(&scenario(), &LayoutConfig::default(), 550.0).unwrap();

        assert_eq!(layout.center.as_ref().unwrap().title, "A");
        assert_eq!(layout.nodes.len(), 3);

        assert!((by_title(&layout, "B").distance - 165.0).abs() < 1e-9);
        assert!((by_title(&layout, "C").distance - 550.0).abs() < 1e-9);
        assert!((by_title(&layout, "D").distance - 357.5).abs() < 1e-9);

        let subfields: Vec<_> = layout.zones.iter().map(|z| z.subfield.as_str()).collect();
        assert_eq!(subfields, vec!["X", "Y"]);
        assert!((layout.zones[1].radius - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_arrangement_groups() {
        let arrangement = arrange(&split(&scenario()), &LayoutConfig::default()).unwrap();
        assert_eq!(arrangement.groups.len(), 2);
        assert_eq!(arrangement.groups[0].members.len(), 2);
        assert_eq!(arrangement.groups[1].members.len(), 1);
    }

    #[test]
    fn test_missing_center_still_lays_out() {
        let payload = GraphPayload::from_value(json!({
            "primary_node_id": "nobody",
            "nodes": [{"title": "A"}, {"title": "B", "subfield": "X"}],
        }))
        .unwrap();
        let layout = layout_graph(&payload, &LayoutConfig::default(), 300.0).unwrap();
        assert!(layout.center.is_none());
        assert_eq!(layout.nodes.len(), 2);
        assert!(layout.zones.iter().all(|z| z.radius >= 80.0));
    }

    #[test]
    fn test_place_only_depends_on_radius() {
        let cfg = LayoutConfig::default();
        let arrangement = arrange(&split(&scenario()), &cfg).unwrap();
        let small = place(&arrangement, &cfg, 100.0).unwrap();
        let large = place(&arrangement, &cfg, 200.0).unwrap();
        for (s, l) in small.nodes.iter().zip(&large.nodes) {
            assert_eq!(s.angle, l.angle);
            assert!((l.distance - 2.0 * s.distance).abs() < 1e-9);
        }
    }

    #[test]
    fn test_repeated_runs_identical() {
        let cfg = LayoutConfig::default();
        let a = layout_graph(&scenario(), &cfg, 550.0).unwrap();
        let b = layout_graph(&scenario(), &cfg, 550.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bad_compression_fails_fast() {
        let cfg = LayoutConfig { compression_factor: 0.0, ..LayoutConfig::default() };
        assert!(matches!(
            layout_graph(&scenario(), &cfg, 550.0),
            Err(LayoutError::InvalidCompression { .. })
        ));
    }

    #[test]
    fn test_huge_relevance_fails_instead_of_infinite_geometry() {
        let payload = GraphPayload::from_value(json!({
            "nodes": [
                {"title": "B", "subfield": "X", "relevance": 1e308},
                {"title": "C", "subfield": "X", "relevance": 1e300},
                {"title": "D", "subfield": "X", "relevance": -1e300},
            ],
        }))
        .unwrap();
        let err = layout_graph(&payload, &LayoutConfig::default(), 550.0).unwrap_err();
        assert!(matches!(err, LayoutError::NonFinite { ref id, .. } if id == "B"));
    }
}
