use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, vec2};

use super::super::interaction::NodeFill;
use super::frame::RenderFrame;

const BACKGROUND: Color32 = Color32::BLACK;
const ACCENT: Color32 = Color32::RED;
const ACCENT_WIDTH: f32 = 2.0;
const LABEL_FONT_SIZE: f32 = 12.0;

fn link_color() -> Color32 {
    Color32::from_rgba_unmultiplied(255, 255, 255, 26)
}

fn fill_color(fill: NodeFill) -> Color32 {
    match fill {
        NodeFill::Light => Color32::WHITE,
        NodeFill::Muted => Color32::from_rgb(0x33, 0x33, 0x33),
    }
}

pub(in crate::app) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(in crate::app) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    if max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom() {
        return false;
    }

    if rect.contains(start) || rect.contains(end) {
        return true;
    }

    let top_left = rect.left_top();
    let top_right = rect.right_top();
    let bottom_left = rect.left_bottom();
    let bottom_right = rect.right_bottom();

    segments_intersect(start, end, top_left, top_right)
        || segments_intersect(start, end, top_right, bottom_right)
        || segments_intersect(start, end, bottom_right, bottom_left)
        || segments_intersect(start, end, bottom_left, top_left)
}

fn segments_intersect(a1: Pos2, a2: Pos2, b1: Pos2, b2: Pos2) -> bool {
    fn cross(o: Pos2, a: Pos2, b: Pos2) -> f32 {
        let oa = a - o;
        let ob = b - o;
        (oa.x * ob.y) - (oa.y * ob.x)
    }

    let c1 = cross(a1, a2, b1);
    let c2 = cross(a1, a2, b2);
    let c3 = cross(b1, b2, a1);
    let c4 = cross(b1, b2, a2);

    (c1 <= 0.0 && c2 >= 0.0 || c1 >= 0.0 && c2 <= 0.0)
        && (c3 <= 0.0 && c4 >= 0.0 || c3 >= 0.0 && c4 <= 0.0)
}

/// Draws `frame` into `rect`: links, then nodes, then labels.
///
/// Returns the number of links actually drawn.
pub(in crate::app) fn paint_frame(painter: &Painter, rect: Rect, frame: &RenderFrame) -> usize {
    painter.rect_filled(rect, 0.0, BACKGROUND);

    let transform = frame.transform;
    let zoom = transform.zoom;
    let mut drawn_links = 0;

    for link in &frame.links {
        if !link.visible {
            continue;
        }
        let start = transform.world_to_screen(rect, link.from);
        let end = transform.world_to_screen(rect, link.to);
        if !edge_visible(rect, start, end, 2.0) {
            continue;
        }

        let stroke = if link.highlighted {
            Stroke::new(ACCENT_WIDTH * zoom, ACCENT)
        } else {
            Stroke::new((link.width * zoom).max(0.5), link_color())
        };
        painter.line_segment([start, end], stroke);
        drawn_links += 1;
    }

    for node in &frame.nodes {
        let center = transform.world_to_screen(rect, node.center);
        let radius = node.radius * zoom;
        if !circle_visible(rect, center, radius + ACCENT_WIDTH) {
            continue;
        }

        let stroke = if node.highlighted {
            Stroke::new(ACCENT_WIDTH * zoom, ACCENT)
        } else {
            Stroke::NONE
        };
        painter.circle(center, radius, fill_color(node.fill), stroke);
    }

    let font = FontId::proportional(LABEL_FONT_SIZE * zoom);
    for label in &frame.labels {
        if !label.visible {
            continue;
        }
        let anchor = transform.world_to_screen(rect, label.anchor);
        if !rect.expand(120.0 * zoom).contains(anchor) {
            continue;
        }

        for offset in [vec2(-1.0, 0.0), vec2(1.0, 0.0), vec2(0.0, -1.0), vec2(0.0, 1.0)] {
            painter.text(
                anchor + offset,
                Align2::CENTER_CENTER,
                &label.text,
                font.clone(),
                Color32::WHITE,
            );
        }
        painter.text(
            anchor,
            Align2::CENTER_CENTER,
            &label.text,
            font.clone(),
            Color32::BLACK,
        );
    }

    drawn_links
}
