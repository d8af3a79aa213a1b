use std::time::Instant;

use super::super::ViewModel;
use super::super::highlight::build_highlight_state;
use super::super::physics::LayoutSnapshot;
use super::super::render::RenderFrame;

impl ViewModel {
    /// Advances the layout one tick and publishes positions at most once per
    /// render interval. The settled layout is always published.
    pub(in crate::app) fn advance_layout(&mut self, now: Instant) -> bool {
        if !self.simulation.is_running() {
            return false;
        }

        let snapshot = self.simulation.step();
        let settled = !self.simulation.is_running();
        if self.throttle.ready(now) || settled {
            self.publish_snapshot(snapshot);
        }
        true
    }

    pub(in crate::app) fn publish_snapshot(&mut self, snapshot: LayoutSnapshot) {
        self.snapshot = snapshot;
        self.frame_dirty = true;
    }

    pub(in crate::app) fn refresh_highlight(&mut self) {
        self.highlight = build_highlight_state(&self.graph, self.interaction.focus());
        self.frame_dirty = true;
    }

    pub(in crate::app) fn mark_view_changed(&mut self) {
        self.frame_dirty = true;
    }

    pub(in crate::app) fn recompose_frame(&mut self) {
        if !self.frame_dirty {
            return;
        }
        self.frame = RenderFrame::compose(
            &self.graph,
            &self.snapshot,
            &self.interaction,
            &self.highlight,
        );
        self.frame_dirty = false;
    }

    pub(in crate::app) fn pin_tag(&mut self, index: usize) {
        self.interaction.pin(index);
        self.refresh_highlight();
    }

    pub(in crate::app) fn unpin_tag(&mut self) {
        self.interaction.unpin();
        self.refresh_highlight();
    }

    pub(in crate::app) fn set_link_filter(&mut self, control: u8) {
        self.interaction.set_link_filter(&self.graph, control);
        self.frame_dirty = true;
    }

    /// Restarts the layout at full energy from where the nodes are now.
    pub(in crate::app) fn reheat_layout(&mut self) {
        self.simulation.kick();
    }
}
