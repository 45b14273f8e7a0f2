use serde::{Deserialize, Serialize};

const STAGE_PALETTE: [&str; 8] = [
    "#0A84FF", "#30B82C", "#FF9F0A", "#FF375F", "#BF5AF2", "#64D2FF", "#FFD60A", "#AC8E68",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub text_color: String,
    pub muted_text_color: String,
    pub graticule_color: String,
    pub marker_stroke: String,
    pub legend_background: String,
    /// Explicit per-stage colors, keyed by stage id. Stages without an entry
    /// cycle through the palette in pipeline order.
    pub stage_colors: Vec<(String, String)>,
}

impl Theme {
    pub fn dashboard() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            background: "#FFFFFF".to_string(),
            text_color: "#1C2430".to_string(),
            muted_text_color: "#6B7686".to_string(),
            graticule_color: "#E4E9F1".to_string(),
            marker_stroke: "#FFFFFF".to_string(),
            legend_background: "#F7FAFF".to_string(),
            stage_colors: vec![
                ("Mining".to_string(), "#0A84FF".to_string()),
                ("Processing".to_string(), "#30B82C".to_string()),
                ("Cathode".to_string(), "#FF9F0A".to_string()),
                ("EV".to_string(), "#FF375F".to_string()),
            ],
        }
    }

    /// Color for a stage. `pipeline_index` selects the palette fallback for
    /// stages with no explicit entry, so renames in the dataset never produce
    /// an undefined color.
    pub fn stage_color(&self, stage: &str, pipeline_index: usize) -> &str {
        self.stage_colors
            .iter()
            .find(|(id, _)| id == stage)
            .map(|(_, color)| color.as_str())
            .unwrap_or(STAGE_PALETTE[pipeline_index % STAGE_PALETTE.len()])
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dashboard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_stage_uses_its_entry() {
        let theme = Theme::dashboard();
        assert_eq!(theme.stage_color("Mining", 0), "#0A84FF");
        assert_eq!(theme.stage_color("EV", 3), "#FF375F");
    }

    #[test]
    fn unknown_stage_falls_back_to_palette() {
        let theme = Theme::dashboard();
        let color = theme.stage_color("Recycling", 4);
        assert!(color.starts_with('#'));
        assert_eq!(color, "#BF5AF2");
    }

    #[test]
    fn palette_fallback_wraps() {
        let theme = Theme::dashboard();
        assert_eq!(theme.stage_color("X", 8), theme.stage_color("X", 0));
    }
}
