use crate::config::LayoutConfig;
use crate::text_metrics;
use crate::theme::Theme;

use super::TextBlock;

pub(super) fn measure_label(text: &str, theme: &Theme, config: &LayoutConfig) -> TextBlock {
    let lines: Vec<String> = if text.is_empty() {
        vec![String::new()]
    } else {
        text.split('\n').map(|line| line.trim().to_string()).collect()
    };

    let width = lines
        .iter()
        .map(|line| {
            text_width(
                line,
                theme.font_size,
                &theme.font_family,
                config.fast_text_metrics,
            )
        })
        .fold(0.0, f32::max);
    let height = lines.len() as f32 * theme.font_size * config.label_line_height;

    TextBlock {
        lines,
        width,
        height,
    }
}

fn text_width(text: &str, font_size: f32, font_family: &str, fast_metrics: bool) -> f32 {
    if fast_metrics {
        return heuristic_width(text, font_size);
    }
    text_metrics::measure_text_width(text, font_size, font_family)
        .unwrap_or_else(|| heuristic_width(text, font_size))
}

// Rough advance classes for when no system font is available.
fn heuristic_width(text: &str, font_size: f32) -> f32 {
    let factor = |ch: char| -> f32 {
        match ch {
            'i' | 'j' | 'l' | '.' | ',' | '\'' | '|' => 0.28,
            'f' | 'r' | 't' | ' ' | '(' | ')' => 0.35,
            'm' | 'w' | 'M' | 'W' | '@' => 0.9,
            ch if ch.is_ascii_uppercase() => 0.68,
            ch if ch.is_ascii_digit() => 0.6,
            _ => 0.55,
        }
    };
    text.chars().map(factor).sum::<f32>() * font_size
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> LayoutConfig {
        LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn single_line_label() {
        let block = measure_label("Processing", &Theme::dashboard(), &fast_config());
        assert_eq!(block.lines, vec!["Processing"]);
        assert!(block.width > 0.0);
        assert!(block.height > 0.0);
    }

    #[test]
    fn empty_label_keeps_one_line() {
        let block = measure_label("", &Theme::dashboard(), &fast_config());
        assert_eq!(block.lines.len(), 1);
        assert_eq!(block.width, 0.0);
    }

    #[test]
    fn multi_line_label_takes_widest_line() {
        let block = measure_label("EV\nDistribution", &Theme::dashboard(), &fast_config());
        assert_eq!(block.lines.len(), 2);
        let wide = measure_label("Distribution", &Theme::dashboard(), &fast_config());
        assert_eq!(block.width, wide.width);
    }

    #[test]
    fn heuristic_width_scales_with_font_size() {
        let narrow = heuristic_width("Mining", 13.0);
        let wide = heuristic_width("Mining", 26.0);
        assert!((wide - narrow * 2.0).abs() < 0.01);
    }
}
