use eframe::egui::{self, Key, Response, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::tags::TagGraph;
use crate::util::{percent_label, short_label};

use super::super::ViewModel;
use super::super::interaction::ViewTransform;

const SEARCH_RESULT_LIMIT: usize = 12;
const SLIDER_KEY_BASE_RATE: f32 = 10.0;
const SLIDER_KEY_ACCEL_PER_SEC: f32 = 9.0;
const SLIDER_KEY_ACCEL_MAX: f32 = 40.0;

#[derive(Clone, Copy, Default)]
struct SliderKeyHoldState {
    held_secs: f32,
    integer_carry: f32,
}

fn slider_key_accel_multiplier(hold_secs: f32) -> f32 {
    let ramp = hold_secs * SLIDER_KEY_ACCEL_PER_SEC;
    (1.0 + ramp + ramp * ramp * 0.15).min(SLIDER_KEY_ACCEL_MAX)
}

/// Arrow keys nudge a focused percent slider, speeding up while held.
fn apply_slider_arrow_acceleration(ui: &Ui, response: &Response, value: &mut u8) -> bool {
    let state_id = response.id.with("arrow_key_hold_state");
    let mut hold_state = ui.ctx().data(|data| {
        data.get_temp::<SliderKeyHoldState>(state_id)
            .unwrap_or_default()
    });

    let (delta_time, increase_down, decrease_down) = ui.input(|input| {
        (
            input.stable_dt.min(0.1),
            input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp),
            input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown),
        )
    });
    let direction = (increase_down as i8) - (decrease_down as i8);

    if !response.has_focus() || direction == 0 {
        ui.ctx().data_mut(|data| {
            data.insert_temp(state_id, SliderKeyHoldState::default())
        });
        return false;
    }

    hold_state.held_secs += delta_time;
    let speed = SLIDER_KEY_BASE_RATE * slider_key_accel_multiplier(hold_state.held_secs);
    hold_state.integer_carry += direction as f32 * speed * delta_time;

    let whole_delta = hold_state.integer_carry.trunc() as i16;
    hold_state.integer_carry -= whole_delta as f32;

    let old_value = *value;
    *value = (i16::from(*value) + whole_delta).clamp(0, 100) as u8;

    ui.ctx().request_repaint();
    ui.ctx()
        .data_mut(|data| data.insert_temp(state_id, hold_state));
    *value != old_value
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

/// Tag indices matching `query`, best score first, ties by id.
pub(in crate::app) fn search_tags(graph: &TagGraph, query: &str, limit: usize) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = graph
        .nodes
        .iter()
        .enumerate()
        .filter_map(|(index, node)| {
            fuzzy_match_score(&matcher, &node.id, query).map(|score| (index, score))
        })
        .collect::<Vec<_>>();

    let exact = graph.index_of(query);
    scored.sort_by(|a, b| {
        (Some(b.0) == exact)
            .cmp(&(Some(a.0) == exact))
            .then_with(|| b.1.cmp(&a.1))
            .then_with(|| graph.nodes[a.0].id.cmp(&graph.nodes[b.0].id))
    });
    scored.truncate(limit);
    scored.into_iter().map(|(index, _)| index).collect()
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("View");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Link filter")
            .on_hover_text("Show only links whose co-occurrence count is near the strongest one.");
        let mut control = self.interaction.link_filter();
        let mut changed = false;
        ui.horizontal(|ui| {
            let response = ui.add(egui::Slider::new(&mut control, 0..=100).show_value(false));
            changed |= response.changed();
            changed |= apply_slider_arrow_acceleration(ui, &response, &mut control);
            ui.label(percent_label(control));
        });
        if changed {
            self.set_link_filter(control);
        }

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui
                .button("Reheat layout")
                .on_hover_text("Restart the simulation from the current positions.")
                .clicked()
            {
                self.reheat_layout();
            }
            if ui.button("Reset view").clicked() {
                self.interaction.transform = ViewTransform::default();
                self.mark_view_changed();
            }
        });

        ui.separator();
        ui.label("Search tags");
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Fuzzy-match tag names, then click a result to pin it.");

        let results = search_tags(&self.graph, &self.search, SEARCH_RESULT_LIMIT);
        if results.is_empty() {
            if !self.search.trim().is_empty() {
                ui.label("No matching tags.");
            }
            return;
        }

        let mut chosen = None;
        for index in results {
            let node = &self.graph.nodes[index];
            let label = format!("{}  ({})", short_label(&node.id, 32), node.count);
            if ui.link(label).on_hover_text(node.id.as_str()).clicked() {
                chosen = Some(index);
            }
        }
        if let Some(index) = chosen {
            self.pin_tag(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::tags::{BuildOptions, build_tag_graph};

    use super::*;

    #[test]
    fn search_ranks_closer_matches_first() {
        let graph = build_tag_graph(
            ["landscape, land, portrait", "Landmark, sky"],
            BuildOptions::default(),
        )
        .expect("payloads contain tags");

        let ids = search_tags(&graph, "land", 10)
            .into_iter()
            .map(|index| graph.nodes[index].id.as_str())
            .collect::<Vec<_>>();
        assert!(ids.contains(&"land"));
        assert!(ids.contains(&"landscape"));
        assert!(ids.contains(&"Landmark"));
        assert!(!ids.contains(&"sky"));

        assert_eq!(ids[0], "land");
        assert_eq!(search_tags(&graph, "land", 1).len(), 1);
        assert!(search_tags(&graph, "   ", 10).is_empty());
        assert!(search_tags(&graph, "zzz", 10).is_empty());
    }

    #[test]
    fn exact_id_outranks_fuzzy_scores() {
        let graph = build_tag_graph(["sky, skyline, blue sky"], BuildOptions::default())
            .expect("payloads contain tags");
        let sky = graph.index_of("sky").expect("sky exists");

        assert_eq!(search_tags(&graph, "sky", 10).first(), Some(&sky));
        assert_eq!(search_tags(&graph, " sky ", 1), vec![sky]);
    }

    #[test]
    fn acceleration_ramps_and_caps() {
        assert_eq!(slider_key_accel_multiplier(0.0), 1.0);
        assert!(slider_key_accel_multiplier(0.5) > slider_key_accel_multiplier(0.1));
        assert_eq!(slider_key_accel_multiplier(60.0), SLIDER_KEY_ACCEL_MAX);
    }
}
