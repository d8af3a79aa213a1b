use eframe::egui::{self, PointerButton, Rect, Ui};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.interaction.transform.zoom_about(
            rect,
            pointer,
            zoom_factor,
            self.view_config.min_zoom,
            self.view_config.max_zoom,
        );
        self.mark_view_changed();
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        let background_drag =
            response.dragged_by(PointerButton::Primary) && self.interaction.dragged().is_none();
        if background_drag
            || response.dragged_by(PointerButton::Secondary)
            || response.dragged_by(PointerButton::Middle)
        {
            let delta = response.drag_delta();
            if delta != egui::Vec2::ZERO {
                self.interaction.transform.pan += delta;
                self.mark_view_changed();
            }
        }
    }

    /// Turns pointer motion over the canvas into enter/leave events.
    pub(in crate::app) fn handle_graph_hover(&mut self, rect: Rect, response: &egui::Response) {
        let transform = self.interaction.transform;
        let under_pointer = response
            .hover_pos()
            .and_then(|pointer| self.frame.node_at(transform.screen_to_world(rect, pointer)));
        if under_pointer == self.pointer_over {
            return;
        }

        let mut changed = false;
        if let Some(previous) = self.pointer_over {
            changed |= self.interaction.pointer_leave(previous);
        }
        if let Some(next) = under_pointer {
            changed |= self.interaction.pointer_enter(next);
        }
        self.pointer_over = under_pointer;

        if changed {
            self.refresh_highlight();
        }
    }

    pub(in crate::app) fn handle_graph_click(&mut self, rect: Rect, response: &egui::Response) {
        if !response.clicked_by(PointerButton::Primary) {
            return;
        }
        let Some(pointer) = response.interact_pointer_pos() else {
            return;
        };

        let world = self.interaction.transform.screen_to_world(rect, pointer);
        if let Some(index) = self.frame.node_at(world)
            && self.interaction.click(index)
        {
            self.refresh_highlight();
        }
    }

    /// Primary drags that start on a node hold it under the pointer.
    pub(in crate::app) fn handle_graph_drag(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        let transform = self.interaction.transform;

        if response.drag_started_by(PointerButton::Primary) {
            let origin = ui
                .input(|input| input.pointer.press_origin())
                .map(|pointer| transform.screen_to_world(rect, pointer));
            if let Some(index) = origin.and_then(|world| self.frame.node_at(world)) {
                self.interaction.begin_drag(index, &mut self.simulation);
            }
        }

        if self.interaction.dragged().is_some()
            && response.dragged_by(PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            let world = transform.screen_to_world(rect, pointer);
            self.interaction.drag_to(world, &mut self.simulation);
        }

        if response.drag_stopped()
            && self.interaction.dragged().is_some()
            && self.interaction.end_drag(&mut self.simulation)
        {
            self.refresh_highlight();
        }
    }
}
