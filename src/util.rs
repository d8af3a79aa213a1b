use eframe::egui::{Vec2, vec2};

/// Shortens `text` to at most `max_chars` characters, ending in an ellipsis.
pub fn short_label(text: &str, max_chars: usize) -> std::borrow::Cow<'_, str> {
    if text.chars().count() <= max_chars {
        return text.into();
    }

    let kept = text.chars().take(max_chars.saturating_sub(1)).collect::<String>();
    format!("{kept}…").into()
}

pub fn percent_label(value: u8) -> String {
    format!("{value}%")
}

/// Tiny deterministic offset used to separate coincident points.
pub fn jiggle(a: usize, b: usize) -> Vec2 {
    let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin()) * 1.0e-6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_label_truncates_on_char_boundaries() {
        assert_eq!(short_label("landscape", 20), "landscape");
        assert_eq!(short_label("ひらがなカタカナ", 4), "ひらが…");
    }

    #[test]
    fn jiggle_is_tiny_and_stable() {
        let first = jiggle(3, 7);
        assert_eq!(first, jiggle(3, 7));
        assert!(first.length() > 0.0 && first.length() < 1.0e-5);
    }
}
