use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Curvature intensity for flow arcs.
    pub curve_offset: f64,
    /// Bezier sample segments per arc.
    pub arc_steps: usize,
    pub min_line_width: f32,
    pub max_line_width: f32,
    /// Marker radius is sqrt(magnitude) * marker_scale, clamped below.
    pub marker_scale: f32,
    pub min_marker_radius: f32,
    pub max_marker_radius: f32,
    /// Canvas padding around the projected map.
    pub padding: f32,
    /// Graticule spacing in degrees; 0 disables the grid.
    pub graticule_step: f64,
    pub label_line_height: f32,
    /// Skip system-font lookup and use the heuristic width table.
    pub fast_text_metrics: bool,
    pub chain: ChainLayoutConfig,
    pub opacity: OpacityConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            curve_offset: 0.2,
            arc_steps: 30,
            min_line_width: 2.0,
            max_line_width: 12.0,
            marker_scale: 0.35,
            min_marker_radius: 5.0,
            max_marker_radius: 26.0,
            padding: 24.0,
            graticule_step: 30.0,
            label_line_height: 1.5,
            fast_text_metrics: false,
            chain: ChainLayoutConfig::default(),
            opacity: OpacityConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainLayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    pub node_gap: f32,
    pub band_gap: f32,
}

impl Default for ChainLayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 140.0,
            node_height: 64.0,
            node_gap: 120.0,
            band_gap: 10.0,
        }
    }
}

/// Highlight opacities applied from the connectivity set and selection.
/// Values follow the dashboard convention: bright for elements touching the
/// selection, faint for the rest, a neutral level when nothing is selected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpacityConfig {
    pub marker_connected: f32,
    pub marker_dimmed: f32,
    pub marker_idle: f32,
    pub arc_active: f32,
    pub arc_dimmed: f32,
    pub arc_idle: f32,
    pub chain_node_selected: f32,
    pub chain_node_dimmed: f32,
    pub chain_node_idle: f32,
    pub chain_band_active: f32,
    pub chain_band_dimmed: f32,
    pub chain_band_idle: f32,
}

impl Default for OpacityConfig {
    fn default() -> Self {
        Self {
            marker_connected: 0.8,
            marker_dimmed: 0.3,
            marker_idle: 0.8,
            arc_active: 0.7,
            arc_dimmed: 0.1,
            arc_idle: 0.5,
            chain_node_selected: 0.8,
            chain_node_dimmed: 0.3,
            chain_node_idle: 0.8,
            chain_band_active: 0.6,
            chain_band_dimmed: 0.2,
            chain_band_idle: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

/// Partial config file: every field optional, merged over the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    stage_colors: Option<Vec<(String, String)>>,
    curve_offset: Option<f64>,
    arc_steps: Option<usize>,
    min_line_width: Option<f32>,
    max_line_width: Option<f32>,
    marker_scale: Option<f32>,
    padding: Option<f32>,
    graticule_step: Option<f64>,
    fast_text_metrics: Option<bool>,
    width: Option<f32>,
    height: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = if path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json5"))
        .unwrap_or(false)
    {
        json5::from_str(&contents)?
    } else {
        serde_json::from_str(&contents)?
    };

    if let Some(v) = parsed.font_family {
        config.theme.font_family = v;
    }
    if let Some(v) = parsed.font_size {
        config.theme.font_size = v;
    }
    if let Some(v) = parsed.background {
        config.theme.background = v;
    }
    if let Some(v) = parsed.stage_colors {
        config.theme.stage_colors = v;
    }
    if let Some(v) = parsed.curve_offset {
        config.layout.curve_offset = v;
    }
    if let Some(v) = parsed.arc_steps {
        config.layout.arc_steps = v;
    }
    if let Some(v) = parsed.min_line_width {
        config.layout.min_line_width = v;
    }
    if let Some(v) = parsed.max_line_width {
        config.layout.max_line_width = v;
    }
    if let Some(v) = parsed.marker_scale {
        config.layout.marker_scale = v;
    }
    if let Some(v) = parsed.padding {
        config.layout.padding = v;
    }
    if let Some(v) = parsed.graticule_step {
        config.layout.graticule_step = v;
    }
    if let Some(v) = parsed.fast_text_metrics {
        config.layout.fast_text_metrics = v;
    }
    if let Some(v) = parsed.width {
        config.render.width = v;
    }
    if let Some(v) = parsed.height {
        config.render.height = v;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).expect("defaults failed");
        assert_eq!(config.layout.arc_steps, 30);
        assert_eq!(config.layout.curve_offset, 0.2);
        assert_eq!(config.layout.min_line_width, 2.0);
        assert_eq!(config.layout.max_line_width, 12.0);
    }

    #[test]
    fn partial_file_merges_over_defaults() {
        let dir = std::env::temp_dir();
        let path = dir.join("oreflow-config-test.json");
        std::fs::write(&path, r#"{ "curveOffset": 0.35, "width": 640 }"#)
            .expect("write failed");

        let config = load_config(Some(&path)).expect("load failed");
        assert_eq!(config.layout.curve_offset, 0.35);
        assert_eq!(config.render.width, 640.0);
        // Untouched fields keep their defaults.
        assert_eq!(config.render.height, 800.0);
        assert_eq!(config.layout.arc_steps, 30);

        let _ = std::fs::remove_file(&path);
    }
}
