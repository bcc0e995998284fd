// Subfield grouping.
//
// Sort-then-partition:
// 1. Stable sort of the peers by (domain, field, subfield)
// 2. Walk the sorted peers and bucket by subfield, emitting buckets in the
//    order their subfield first appears
//
// Because of (1), subfields of the same domain/field end up next to each
// other around the circle even though the sector allocator only sees the
// subfield key.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::graph::{NormalizedNode, UNKNOWN};

/// Peers sharing one subfield, in sorted arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub subfield: String,
    pub members: Vec<NormalizedNode>,
}

/// Locale-style comparison: case-insensitive first, exact order as tie-break.
pub fn taxonomy_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

/// Group key for a node. An empty subfield is filed under "Unknown".
pub fn group_key(node: &NormalizedNode) -> &str {
    if node.subfield.is_empty() {
        UNKNOWN
    } else {
        &node.subfield
    }
}

/// Sort peers by domain, then field, then subfield. Stable.
pub fn sort_peers(peers: &[NormalizedNode]) -> Vec<NormalizedNode> {
    let mut sorted = peers.to_vec();
    sorted.sort_by(|a, b| {
        taxonomy_cmp(&a.domain, &b.domain)
            .then_with(|| taxonomy_cmp(&a.field, &b.field))
            .then_with(|| taxonomy_cmp(&a.subfield, &b.subfield))
    });
    sorted
}

/// Partition peers into subfield groups. Every peer lands in exactly one group.
pub fn group(peers: &[NormalizedNode]) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for node in sort_peers(peers) {
        let key = group_key(&node).to_string();
        let gi = match index.get(&key) {
            Some(&gi) => gi,
            None => {
                groups.push(Group { subfield: key.clone(), members: Vec::new() });
                index.insert(key, groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[gi].members.push(node);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{normalize, RawNode};
    use serde_json::json;

    fn node(title: &str, domain: &str, field: &str, subfield: &str) -> NormalizedNode {
        normalize(&RawNode(json!({
            "title": title,
            "domain": domain,
            "field": field,
            "subfield": subfield,
        })))
    }

    fn keys(groups: &[Group]) -> Vec<&str> {
        groups.iter().map(|g| g.subfield.as_str()).collect()
    }

    #[test]
    fn test_groups_follow_taxonomy_sort() {
        let peers = vec![
            node("1", "Physical Sciences", "Physics", "Optics"),
            node("2", "Life Sciences", "Biology", "Genetics"),
            node("3", "Physical Sciences", "Computer Science", "Vision"),
            node("4", "Life Sciences", "Biology", "Ecology"),
        ];
        let groups = group(&peers);
        assert_eq!(keys(&groups), vec!["Ecology", "Genetics", "Vision", "Optics"]);
    }

    #[test]
    fn test_arrival_order_kept_within_group() {
        let peers = vec![
            node("b", "D", "F", "X"),
            node("a", "D", "F", "X"),
            node("c", "D", "F", "X"),
        ];
        let groups = group(&peers);
        assert_eq!(groups.len(), 1);
        let titles: Vec<_> = groups[0].members.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_same_subfield_under_different_fields_merges() {
        // First-seen order decides the group position; later members append.
        let peers = vec![
            node("1", "B", "F", "Shared"),
            node("2", "A", "F", "Other"),
            node("3", "A", "F", "Shared"),
        ];
        let groups = group(&peers);
        assert_eq!(keys(&groups), vec!["Other", "Shared"]);
        let titles: Vec<_> = groups[1].members.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["3", "1"]);
    }

    #[test]
    fn test_case_insensitive_ordering() {
        assert_eq!(taxonomy_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(taxonomy_cmp("Zeta", "alpha"), Ordering::Greater);
        assert_ne!(taxonomy_cmp("a", "A"), Ordering::Equal);
    }

    #[test]
    fn test_empty_subfield_grouped_as_unknown() {
        let peers = vec![node("1", "D", "F", ""), node("2", "D", "F", "Unknown")];
        let groups = group(&peers);
        assert_eq!(keys(&groups), vec![UNKNOWN]);
        assert_eq!(groups[0].members.len(), 2);
    }

    #[test]
    fn test_empty_peers_give_no_groups() {
        assert!(group(&[]).is_empty());
    }
}
