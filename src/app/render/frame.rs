use eframe::egui::Vec2;

use crate::tags::TagGraph;

use super::super::highlight::HighlightState;
use super::super::interaction::{InteractionState, NodeFill, ViewTransform};
use super::super::physics::LayoutSnapshot;

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct NodeSprite {
    pub center: Vec2,
    pub radius: f32,
    pub fill: NodeFill,
    pub highlighted: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct LinkSprite {
    pub from: Vec2,
    pub to: Vec2,
    pub width: f32,
    pub visible: bool,
    pub highlighted: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct LabelSprite {
    pub anchor: Vec2,
    pub text: String,
    pub visible: bool,
}

/// One declarative batch of draw state, in world coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub(in crate::app) struct RenderFrame {
    pub transform: ViewTransform,
    pub nodes: Vec<NodeSprite>,
    pub links: Vec<LinkSprite>,
    pub labels: Vec<LabelSprite>,
}

impl RenderFrame {
    pub(in crate::app) fn compose(
        graph: &TagGraph,
        snapshot: &LayoutSnapshot,
        interaction: &InteractionState,
        highlight: &HighlightState,
    ) -> Self {
        let transform = interaction.transform;
        let detail = transform.detail();
        let position = |index: usize| snapshot.positions.get(index).copied().unwrap_or_default();

        let links = graph
            .links
            .iter()
            .enumerate()
            .map(|(index, link)| {
                let (from, to) = snapshot
                    .link_endpoints
                    .get(index)
                    .copied()
                    .unwrap_or_else(|| (position(link.source), position(link.target)));
                LinkSprite {
                    from,
                    to,
                    width: (link.count as f32).sqrt(),
                    visible: interaction.is_link_visible(index),
                    highlighted: highlight.link(index),
                }
            })
            .collect();

        let nodes = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| NodeSprite {
                center: position(index),
                radius: node.radius(),
                fill: detail.node_fill,
                highlighted: highlight.node(index),
            })
            .collect();

        let labels = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| LabelSprite {
                anchor: position(index),
                text: node.id.clone(),
                visible: detail.labels_visible,
            })
            .collect();

        Self {
            transform,
            nodes,
            links,
            labels,
        }
    }

    /// Topmost node whose circle contains `world`.
    pub(in crate::app) fn node_at(&self, world: Vec2) -> Option<usize> {
        self.nodes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, node)| (node.center - world).length_sq() <= node.radius * node.radius)
            .map(|(index, _)| index)
    }
}
