use crate::dataset::FlowLink;
use std::collections::BTreeSet;

/// Stages transitively connected to `start`, following links both with and
/// against their direction, including `start` itself.
///
/// The stage graph is a pipeline by convention but nothing enforces that, so
/// the traversal marks stages before expanding them and stays correct on
/// cyclic or otherwise malformed link lists. A stage that appears in no link
/// yields the singleton set.
pub fn connected_stages(links: &[FlowLink], start: &str) -> BTreeSet<String> {
    let mut visited: BTreeSet<String> = BTreeSet::new();
    visited.insert(start.to_string());
    let mut worklist: Vec<String> = vec![start.to_string()];

    while let Some(current) = worklist.pop() {
        for link in links {
            if link.source == current && visited.insert(link.target.clone()) {
                worklist.push(link.target.clone());
            }
            if link.target == current && visited.insert(link.source.clone()) {
                worklist.push(link.source.clone());
            }
        }
    }

    visited
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(source: &str, target: &str) -> FlowLink {
        FlowLink {
            source: source.to_string(),
            source_country: "AAA".to_string(),
            target: target.to_string(),
            target_country: "BBB".to_string(),
            value: 1.0,
        }
    }

    fn chain() -> Vec<FlowLink> {
        vec![
            link("Mining", "Processing"),
            link("Processing", "Manufacturing"),
            link("Manufacturing", "Distribution"),
        ]
    }

    #[test]
    fn includes_the_start_stage() {
        let links = chain();
        for stage in ["Mining", "Processing", "Manufacturing", "Distribution"] {
            assert!(connected_stages(&links, stage).contains(stage));
        }
    }

    #[test]
    fn direct_edges_are_reachable_both_ways() {
        let links = chain();
        for l in &links {
            assert!(connected_stages(&links, &l.source).contains(&l.target));
            assert!(connected_stages(&links, &l.target).contains(&l.source));
        }
    }

    #[test]
    fn middle_stage_reaches_the_whole_chain() {
        let connected = connected_stages(&chain(), "Manufacturing");
        let expected: BTreeSet<String> =
            ["Mining", "Processing", "Manufacturing", "Distribution"]
                .iter()
                .map(|s| s.to_string())
                .collect();
        assert_eq!(connected, expected);
    }

    #[test]
    fn isolated_stage_yields_singleton() {
        let connected = connected_stages(&chain(), "Recycling");
        assert_eq!(connected.len(), 1);
        assert!(connected.contains("Recycling"));
    }

    #[test]
    fn empty_link_list_yields_singleton() {
        let connected = connected_stages(&[], "Mining");
        assert_eq!(connected.len(), 1);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let links = chain();
        let first = connected_stages(&links, "Processing");
        let second = connected_stages(&links, "Processing");
        assert_eq!(first, second);
    }

    #[test]
    fn cycles_terminate() {
        let links = vec![link("A", "B"), link("B", "C"), link("C", "A")];
        let connected = connected_stages(&links, "A");
        assert_eq!(connected.len(), 3);
    }

    #[test]
    fn fan_in_connects_through_the_shared_target() {
        // A -> B <- C: B trades with both, so all three highlight together.
        let links = vec![link("A", "B"), link("C", "B")];
        let connected = connected_stages(&links, "A");
        assert!(connected.contains("B"));
        assert!(connected.contains("C"));
    }

    #[test]
    fn does_not_cross_disconnected_components() {
        let links = vec![link("A", "B"), link("X", "Y")];
        let connected = connected_stages(&links, "A");
        assert!(!connected.contains("X"));
        assert!(!connected.contains("Y"));
    }
}
