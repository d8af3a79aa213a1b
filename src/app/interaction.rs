use eframe::egui::{Pos2, Rect, Vec2};
use tracing::debug;

use crate::tags::TagGraph;

use super::physics::Simulation;

/// Pan offset in screen points plus a uniform scale factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct ViewTransform {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl ViewTransform {
    pub(in crate::app) fn world_to_screen(self, rect: Rect, world: Vec2) -> Pos2 {
        rect.center() + self.pan + world * self.zoom
    }

    pub(in crate::app) fn screen_to_world(self, rect: Rect, screen: Pos2) -> Vec2 {
        (screen - rect.center() - self.pan) / self.zoom
    }

    /// Scales by `factor` while keeping the world point under `pointer` still.
    pub(in crate::app) fn zoom_about(
        &mut self,
        rect: Rect,
        pointer: Pos2,
        factor: f32,
        min_zoom: f32,
        max_zoom: f32,
    ) {
        let world_before = self.screen_to_world(rect, pointer);
        self.zoom = (self.zoom * factor).clamp(min_zoom, max_zoom);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    pub(in crate::app) fn detail(self) -> DetailTier {
        DetailTier::for_zoom(self.zoom)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum NodeFill {
    Light,
    Muted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) struct DetailTier {
    pub labels_visible: bool,
    pub node_fill: NodeFill,
}

impl DetailTier {
    pub(in crate::app) fn for_zoom(zoom: f32) -> Self {
        Self {
            labels_visible: zoom > 1.0,
            node_fill: if zoom < 0.5 {
                NodeFill::Muted
            } else {
                NodeFill::Light
            },
        }
    }
}

/// Minimum link count shown for a 0..=100 filter control.
///
/// 0 hides every link, 100 shows every link.
pub(in crate::app) fn link_count_cutoff(max_link_count: u32, control: u8) -> f64 {
    let fraction = f64::from(control.min(100)) / 100.0;
    if fraction == 0.0 {
        f64::from(max_link_count) + 1.0
    } else {
        f64::from(max_link_count) * (1.0 - fraction)
    }
}

pub(in crate::app) fn link_visibility(graph: &TagGraph, control: u8) -> Vec<bool> {
    let cutoff = link_count_cutoff(graph.max_link_count(), control);
    graph
        .links
        .iter()
        .map(|link| f64::from(link.count) >= cutoff)
        .collect()
}

/// Transient view state for one loaded graph.
///
/// A pinned node freezes the highlight until it is unpinned, and no hover or
/// click lands while another node is being dragged. A pointer leave during a
/// drag is held back and applied when the drag ends.
pub(in crate::app) struct InteractionState {
    hovered: Option<usize>,
    pinned: Option<usize>,
    dragged: Option<usize>,
    leave_pending: bool,
    link_filter: u8,
    link_visibility: Vec<bool>,
    pub transform: ViewTransform,
}

impl InteractionState {
    pub(in crate::app) fn new(graph: &TagGraph, link_filter: u8) -> Self {
        let link_filter = link_filter.min(100);
        Self {
            hovered: None,
            pinned: None,
            dragged: None,
            leave_pending: false,
            link_filter,
            link_visibility: link_visibility(graph, link_filter),
            transform: ViewTransform::default(),
        }
    }

    pub(in crate::app) fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub(in crate::app) fn pinned(&self) -> Option<usize> {
        self.pinned
    }

    pub(in crate::app) fn dragged(&self) -> Option<usize> {
        self.dragged
    }

    /// The node whose neighborhood is highlighted.
    pub(in crate::app) fn focus(&self) -> Option<usize> {
        self.pinned.or(self.hovered)
    }

    pub(in crate::app) fn pointer_enter(&mut self, index: usize) -> bool {
        if self.dragged.is_some() && self.hovered == Some(index) {
            self.leave_pending = false;
        }
        if self.pinned.is_some() || self.dragged.is_some() || self.hovered == Some(index) {
            return false;
        }
        self.hovered = Some(index);
        true
    }

    pub(in crate::app) fn pointer_leave(&mut self, index: usize) -> bool {
        if self.pinned.is_some() || self.hovered != Some(index) {
            return false;
        }
        if self.dragged.is_some() {
            self.leave_pending = true;
            return false;
        }
        self.hovered = None;
        true
    }

    /// Pins `index`, or unpins it when it is already pinned.
    pub(in crate::app) fn click(&mut self, index: usize) -> bool {
        if self.dragged.is_some_and(|dragged| dragged != index) {
            return false;
        }

        self.hovered = None;
        self.leave_pending = false;
        if self.pinned == Some(index) {
            self.pinned = None;
            debug!(index, "unpinned node");
        } else {
            self.pinned = Some(index);
            debug!(index, "pinned node");
        }
        true
    }

    pub(in crate::app) fn pin(&mut self, index: usize) {
        if self.pinned != Some(index) {
            self.click(index);
        }
    }

    pub(in crate::app) fn unpin(&mut self) {
        self.pinned = None;
        self.hovered = None;
        self.leave_pending = false;
    }

    pub(in crate::app) fn begin_drag(&mut self, index: usize, simulation: &mut Simulation) -> bool {
        if self.dragged.is_some() {
            return false;
        }
        let Some(position) = simulation.position(index) else {
            return false;
        };

        simulation.reheat();
        simulation.fix(index, position);
        self.dragged = Some(index);
        true
    }

    pub(in crate::app) fn drag_to(&mut self, world: Vec2, simulation: &mut Simulation) {
        if let Some(index) = self.dragged {
            simulation.fix(index, world);
        }
    }

    /// Releases the held node. Returns whether the hover changed because the
    /// pointer left during the drag.
    pub(in crate::app) fn end_drag(&mut self, simulation: &mut Simulation) -> bool {
        let Some(index) = self.dragged.take() else {
            return false;
        };
        simulation.release(index);
        simulation.cool();

        if std::mem::take(&mut self.leave_pending) && self.pinned.is_none() {
            self.hovered = None;
            return true;
        }
        false
    }

    pub(in crate::app) fn link_filter(&self) -> u8 {
        self.link_filter
    }

    /// Stores a new control value and recomputes every link's visibility.
    pub(in crate::app) fn set_link_filter(&mut self, graph: &TagGraph, control: u8) {
        self.link_filter = control.min(100);
        self.link_visibility = link_visibility(graph, self.link_filter);
    }

    pub(in crate::app) fn is_link_visible(&self, link: usize) -> bool {
        self.link_visibility.get(link).copied().unwrap_or(false)
    }

    pub(in crate::app) fn visible_link_count(&self) -> usize {
        self.link_visibility.iter().filter(|visible| **visible).count()
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};
    use proptest::prelude::*;

    use crate::config::LayoutConfig;
    use crate::tags::{BuildOptions, build_tag_graph};

    use super::*;

    fn graph() -> TagGraph {
        build_tag_graph(
            ["a, b", "a, b", "a, b", "b, c", "c, d, c"],
            BuildOptions::default(),
        )
        .expect("payloads contain tags")
    }

    #[test]
    fn cutoff_endpoints() {
        assert_eq!(link_count_cutoff(7, 0), 8.0);
        assert_eq!(link_count_cutoff(7, 100), 0.0);
        assert_eq!(link_count_cutoff(10, 50), 5.0);
        assert_eq!(link_count_cutoff(0, 0), 1.0);
    }

    #[test]
    fn filter_extremes_hide_or_show_everything() {
        let graph = graph();
        let mut state = InteractionState::new(&graph, 0);
        assert_eq!(state.visible_link_count(), 0);

        state.set_link_filter(&graph, 100);
        assert_eq!(state.visible_link_count(), graph.link_count());

        state.set_link_filter(&graph, 40);
        let cutoff = link_count_cutoff(graph.max_link_count(), 40);
        for (index, link) in graph.links.iter().enumerate() {
            assert_eq!(state.is_link_visible(index), f64::from(link.count) >= cutoff);
        }
        assert_eq!(state.link_filter(), 40);
    }

    #[test]
    fn rapid_filter_changes_leave_no_stale_state() {
        let graph = graph();
        let mut state = InteractionState::new(&graph, 100);
        for control in [5, 90, 0, 33, 100, 61] {
            state.set_link_filter(&graph, control);
        }
        assert_eq!(state.link_visibility, link_visibility(&graph, 61));
    }

    #[test]
    fn hover_tracks_pointer_until_pinned() {
        let graph = graph();
        let mut state = InteractionState::new(&graph, 100);

        assert!(state.pointer_enter(1));
        assert_eq!(state.focus(), Some(1));
        assert!(state.pointer_leave(1));
        assert_eq!(state.focus(), None);

        assert!(state.click(2));
        assert_eq!(state.pinned(), Some(2));
        assert!(!state.pointer_enter(0));
        assert!(!state.pointer_leave(2));
        assert_eq!(state.focus(), Some(2));
    }

    #[test]
    fn clicking_pinned_node_unpins_and_other_node_moves_pin() {
        let graph = graph();
        let mut state = InteractionState::new(&graph, 100);

        state.click(0);
        state.click(3);
        assert_eq!(state.pinned(), Some(3));
        state.click(3);
        assert_eq!(state.pinned(), None);
        assert_eq!(state.focus(), None);

        state.pin(1);
        state.pin(1);
        assert_eq!(state.pinned(), Some(1));
        state.unpin();
        assert_eq!(state.focus(), None);
    }

    #[test]
    fn drag_reheats_and_holds_the_node() {
        let graph = graph();
        let mut simulation = Simulation::new(&graph, LayoutConfig::default());
        while simulation.is_running() {
            simulation.step();
        }

        let mut state = InteractionState::new(&graph, 100);
        state.pointer_enter(0);
        assert!(state.begin_drag(0, &mut simulation));
        assert!(simulation.is_running());
        assert!(simulation.is_fixed(0));
        assert!(!state.begin_drag(1, &mut simulation));

        state.drag_to(vec2(42.0, 7.0), &mut simulation);
        assert_eq!(simulation.step().positions[0], vec2(42.0, 7.0));

        assert!(!state.pointer_enter(2));
        assert!(!state.click(2));
        assert_eq!(state.hovered(), Some(0));
        assert_eq!(state.pinned(), None);

        assert!(!state.end_drag(&mut simulation));
        assert_eq!(state.hovered(), Some(0));
        assert_eq!(state.dragged(), None);
        assert!(!simulation.is_fixed(0));
        while simulation.is_running() {
            simulation.step();
        }
        assert!(simulation.alpha() < LayoutConfig::default().alpha_min);
    }

    #[test]
    fn leave_during_drag_clears_hover_when_released() {
        let graph = graph();
        let mut simulation = Simulation::new(&graph, LayoutConfig::default());
        let mut state = InteractionState::new(&graph, 100);

        state.pointer_enter(0);
        state.begin_drag(0, &mut simulation);
        assert!(!state.pointer_leave(0));
        assert_eq!(state.focus(), Some(0));

        assert!(state.end_drag(&mut simulation));
        assert_eq!(state.hovered(), None);
        assert_eq!(state.focus(), None);
    }

    #[test]
    fn reentering_during_drag_cancels_the_pending_leave() {
        let graph = graph();
        let mut simulation = Simulation::new(&graph, LayoutConfig::default());
        let mut state = InteractionState::new(&graph, 100);

        state.pointer_enter(1);
        state.begin_drag(1, &mut simulation);
        state.pointer_leave(1);
        state.pointer_enter(1);

        assert!(!state.end_drag(&mut simulation));
        assert_eq!(state.hovered(), Some(1));
    }

    #[test]
    fn zoom_tiers() {
        assert_eq!(
            DetailTier::for_zoom(1.5),
            DetailTier {
                labels_visible: true,
                node_fill: NodeFill::Light
            }
        );
        assert_eq!(
            DetailTier::for_zoom(1.0),
            DetailTier {
                labels_visible: false,
                node_fill: NodeFill::Light
            }
        );
        assert_eq!(DetailTier::for_zoom(0.5).node_fill, NodeFill::Light);
        assert_eq!(
            DetailTier::for_zoom(0.3),
            DetailTier {
                labels_visible: false,
                node_fill: NodeFill::Muted
            }
        );
    }

    #[test]
    fn zoom_keeps_the_pointer_anchored() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0));
        let mut transform = ViewTransform::default();
        let pointer = pos2(620.0, 130.0);
        let anchored = transform.screen_to_world(rect, pointer);

        transform.zoom_about(rect, pointer, 1.15, 0.1, 10.0);
        let after = transform.screen_to_world(rect, pointer);
        assert!((after - anchored).length() < 1e-3);

        for _ in 0..100 {
            transform.zoom_about(rect, pointer, 1.15, 0.1, 10.0);
        }
        assert_eq!(transform.zoom, 10.0);
        assert_eq!(transform.world_to_screen(rect, anchored).round(), pointer);
    }

    proptest! {
        #[test]
        fn cutoff_decreases_with_control(max in 0u32..10_000, low in 0u8..=100, high in 0u8..=100) {
            prop_assume!(low < high);
            prop_assert!(link_count_cutoff(max, low) > link_count_cutoff(max, high)
                || (max == 0 && low > 0));
        }

        #[test]
        fn pin_blocks_hover_changes(
            pinned in 0usize..4,
            events in prop::collection::vec((0usize..4, any::<bool>()), 0..20),
        ) {
            let graph = graph();
            let mut state = InteractionState::new(&graph, 100);
            state.click(pinned);
            for (index, enter) in events {
                if enter {
                    state.pointer_enter(index);
                } else {
                    state.pointer_leave(index);
                }
                prop_assert_eq!(state.focus(), Some(pinned));
            }
        }
    }
}
