use std::collections::HashSet;
use std::f64::consts::TAU;

use nexus_core::graph::{normalize, split, GraphPayload, RawNode};
use nexus_core::layout::{distance_for, group, layout_graph, sectors};
use nexus_core::LayoutConfig;
use proptest::prelude::*;
use serde_json::{json, Value};

const SUBFIELDS: &[&str] = &["", "Optics", "Algebra", "algebra", "Zoology", "Ökologie"];
const NODE_KEYS: &[&str] = &["title", "paperId", "year", "keywords", "authors", "tldr", "relevance"];

fn raw_node() -> impl Strategy<Value = Value> {
    (
        0usize..12,
        prop::sample::select(SUBFIELDS),
        prop_oneof![Just(Value::Null), (0.0f64..=1.0).prop_map(|r| json!(r)), Just(json!("high"))],
        any::<bool>(),
    )
        .prop_map(|(t, subfield, relevance, with_id)| {
            let mut node = json!({ "title": format!("Paper {}", t), "subfield": subfield });
            if !relevance.is_null() {
                node["relevance"] = relevance;
            }
            if with_id {
                node["paperId"] = json!(format!("W{}", t));
            }
            node
        })
}

fn payload() -> impl Strategy<Value = GraphPayload> {
    (prop::collection::vec(raw_node(), 0..25), 0usize..12).prop_map(|(nodes, center)| {
        GraphPayload::from_value(json!({
            "primary_node_id": format!("Paper {}", center),
            "nodes": nodes,
        }))
        .unwrap()
    })
}

fn arbitrary_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,8}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::hash_map(
                prop::sample::select(NODE_KEYS),
                inner,
                0..5,
            )
            .prop_map(|m| json!(m)),
        ]
    })
}

proptest! {
    #[test]
    fn normalize_is_total_and_idempotent(value in arbitrary_json()) {
        let once = normalize(&RawNode(value));
        let again = normalize(&RawNode(serde_json::to_value(&once).unwrap()));
        prop_assert!(!once.id.is_empty());
        prop_assert_eq!(once, again);
    }

    #[test]
    fn groups_partition_the_peers(p in payload()) {
        let graph = split(&p);
        let groups = group(&graph.peers);

        let total: usize = groups.iter().map(|g| g.members.len()).sum();
        prop_assert_eq!(total, graph.peers.len());

        let keys: HashSet<_> = groups.iter().map(|g| g.subfield.as_str()).collect();
        prop_assert_eq!(keys.len(), groups.len());
        for g in &groups {
            prop_assert!(!g.members.is_empty());
            prop_assert!(!g.subfield.is_empty());
        }
    }

    #[test]
    fn angles_stay_inside_their_sector(p in payload(), compression in 0.05f64..=1.0) {
        let cfg = LayoutConfig { compression_factor: compression, ..LayoutConfig::default() };
        let graph = split(&p);
        let groups = group(&graph.peers);
        let arcs = sectors(&groups, compression).unwrap();
        let layout = layout_graph(&p, &cfg, 550.0).unwrap();

        for n in &layout.nodes {
            prop_assert!(n.angle >= 0.0 && n.angle < TAU);
            let arc = arcs.iter().find(|s| s.subfield == n.subfield).unwrap();
            prop_assert!(
                n.angle >= arc.inner_start - 1e-9 && n.angle <= arc.inner_end() + 1e-9,
                "{} outside {:?}", n.angle, arc
            );
        }
    }

    #[test]
    fn arcs_never_overlap(p in payload(), compression in 0.05f64..=1.0) {
        let groups = group(&split(&p).peers);
        let arcs = sectors(&groups, compression).unwrap();
        for pair in arcs.windows(2) {
            prop_assert!(pair[0].inner_end() <= pair[1].inner_start + 1e-9);
        }
    }

    #[test]
    fn layout_is_deterministic(p in payload()) {
        let cfg = LayoutConfig::default();
        let a = layout_graph(&p, &cfg, 420.0).unwrap();
        let b = layout_graph(&p, &cfg, 420.0).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn zones_contain_their_members(p in payload()) {
        let cfg = LayoutConfig::default();
        let layout = layout_graph(&p, &cfg, 550.0).unwrap();
        for zone in &layout.zones {
            for n in layout.nodes.iter().filter(|n| n.subfield == zone.subfield) {
                let d = zone.center().distance_to(&n.position());
                prop_assert!(d + cfg.zone_margin <= zone.radius + 1e-6);
            }
        }
    }

    #[test]
    fn higher_relevance_is_strictly_closer(lo in 0.0f64..0.99, step in 0.01f64..=1.0, r in 1.0f64..2000.0) {
        let hi = (lo + step).min(1.0);
        prop_assume!(lo < hi);
        prop_assert!(distance_for(hi, r) < distance_for(lo, r));
    }
}
