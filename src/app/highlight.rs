use std::collections::HashSet;

use crate::tags::TagGraph;

/// Nodes and links accented around a focused node.
#[derive(Clone, Debug, Default, PartialEq)]
pub(in crate::app) struct HighlightState {
    pub related_nodes: HashSet<usize>,
    pub related_links: HashSet<usize>,
}

impl HighlightState {
    pub(in crate::app) fn node(&self, index: usize) -> bool {
        self.related_nodes.contains(&index)
    }

    pub(in crate::app) fn link(&self, index: usize) -> bool {
        self.related_links.contains(&index)
    }
}

pub(in crate::app) fn build_highlight_state(
    graph: &TagGraph,
    focus: Option<usize>,
) -> HighlightState {
    let Some(focus) = focus.filter(|&index| index < graph.node_count()) else {
        return HighlightState::default();
    };

    let mut related_nodes = HashSet::new();
    let mut related_links = HashSet::new();
    for &link in graph.links_of(focus) {
        related_links.insert(link);
        if let Some(other) = graph.links[link].other(focus) {
            related_nodes.insert(other);
        }
    }

    HighlightState {
        related_nodes,
        related_links,
    }
}

/// Co-occurring tags of `index`, strongest link first.
pub(in crate::app) fn ranked_neighbors(graph: &TagGraph, index: usize) -> Vec<(usize, u32)> {
    let mut ranked = graph
        .links_of(index)
        .iter()
        .filter_map(|&link| {
            let link = &graph.links[link];
            link.other(index).map(|other| (other, link.count))
        })
        .collect::<Vec<_>>();

    ranked.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| graph.nodes[a.0].id.cmp(&graph.nodes[b.0].id))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use crate::tags::{BuildOptions, build_tag_graph};

    use super::*;

    #[test]
    fn focus_marks_direct_neighbors_only() {
        let graph = build_tag_graph(["a, b", "b, c", "c, d"], BuildOptions::default())
            .expect("payloads contain tags");
        let b = graph.index_of("b").expect("b exists");
        let state = build_highlight_state(&graph, Some(b));

        let mut ids = state
            .related_nodes
            .iter()
            .map(|&index| graph.nodes[index].id.as_str())
            .collect::<Vec<_>>();
        ids.sort_unstable();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(!state.node(b));
        assert_eq!(state.related_links.len(), 2);
        assert!(!state.node(graph.index_of("d").expect("d exists")));
    }

    #[test]
    fn focus_is_not_connected_to_itself() {
        let graph = build_tag_graph(["a, b"], BuildOptions::default()).expect("tags");
        let a = graph.index_of("a").expect("a exists");
        let state = build_highlight_state(&graph, Some(a));

        assert!(!state.node(a));
        assert!(state.node(graph.index_of("b").expect("b exists")));
        assert_eq!(state.related_links.len(), 1);
    }

    #[test]
    fn isolated_focus_highlights_nothing() {
        let graph = build_tag_graph(["solo", "a, b"], BuildOptions::default()).expect("tags");
        let solo = graph.index_of("solo").expect("solo exists");
        let state = build_highlight_state(&graph, Some(solo));

        assert_eq!(state, HighlightState::default());
    }

    #[test]
    fn no_focus_highlights_nothing() {
        let graph = build_tag_graph(["a, b"], BuildOptions::default()).expect("tags");
        assert_eq!(build_highlight_state(&graph, None), HighlightState::default());
        assert_eq!(build_highlight_state(&graph, Some(9)), HighlightState::default());
    }

    #[test]
    fn neighbors_rank_by_link_count_then_id() {
        let graph = build_tag_graph(
            ["hub, z", "hub, y", "hub, y", "hub, x"],
            BuildOptions::default(),
        )
        .expect("tags");
        let hub = graph.index_of("hub").expect("hub exists");
        let ranked = ranked_neighbors(&graph, hub)
            .into_iter()
            .map(|(index, count)| (graph.nodes[index].id.as_str(), count))
            .collect::<Vec<_>>();
        assert_eq!(ranked, vec![("y", 2), ("x", 1), ("z", 1)]);
    }
}
