use crate::config::LayoutConfig;
use crate::layout::{ChainLayout, Layout, MapLayout, TextBlock, ViewData};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(layout: &Layout, theme: &Theme, config: &LayoutConfig) -> String {
    let mut svg = String::new();
    let width = layout.width;
    let height = layout.height;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    match &layout.data {
        ViewData::Map(map) => render_map(&mut svg, map, theme),
        ViewData::Chain(chain) => render_chain(&mut svg, chain, theme, config),
    }

    svg.push_str("</svg>");
    svg
}

fn render_map(svg: &mut String, map: &MapLayout, theme: &Theme) {
    for line in &map.graticule {
        svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"0.6\"/>",
            line.from.0, line.from.1, line.to.0, line.to.1, theme.graticule_color
        ));
    }

    for arc in &map.arcs {
        let d = points_to_path(&arc.points);
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\" stroke-opacity=\"{:.2}\" stroke-linecap=\"round\"/>",
            d, arc.color, arc.width, arc.opacity
        ));
        // Arrow at the arc midpoint; the bearing is degrees clockwise from
        // north, matching SVG's rotate direction with north pointing up.
        svg.push_str(&format!(
            "<g transform=\"translate({:.2} {:.2}) rotate({:.2})\"><path d=\"M 0 -6 L 4 4 L 0 1.5 L -4 4 Z\" fill=\"{}\" fill-opacity=\"{:.2}\"/></g>",
            arc.arrow_at.0, arc.arrow_at.1, arc.angle_deg, arc.color, arc.opacity
        ));
    }

    for marker in &map.markers {
        svg.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\" fill-opacity=\"{:.2}\" stroke=\"{}\" stroke-width=\"2\">",
            marker.x, marker.y, marker.radius, marker.color, marker.opacity, theme.marker_stroke
        ));
        svg.push_str(&format!(
            "<title>{} | {} | {} | {} | volume {}</title>",
            escape_xml(&marker.stage),
            escape_xml(&marker.company),
            escape_xml(&marker.site),
            escape_xml(&marker.country),
            marker.magnitude
        ));
        svg.push_str("</circle>");
    }

    for entry in &map.legend {
        svg.push_str(&format!(
            "<g opacity=\"{:.2}\">",
            entry.opacity
        ));
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"12\" height=\"12\" rx=\"2\" fill=\"{}\"/>",
            entry.x, entry.y, entry.color
        ));
        let text_x = entry.x + 18.0;
        let text_y = entry.y + 10.0;
        svg.push_str(&format!(
            "<text x=\"{text_x:.2}\" y=\"{text_y:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            theme.font_family,
            theme.font_size,
            theme.text_color,
            escape_xml(entry.label.lines.first().map(String::as_str).unwrap_or(""))
        ));
        svg.push_str("</g>");
    }
}

fn render_chain(svg: &mut String, chain: &ChainLayout, theme: &Theme, config: &LayoutConfig) {
    for band in &chain.bands {
        svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{:.2}\" stroke-opacity=\"{:.2}\" stroke-linecap=\"round\"/>",
            band.from.0, band.from.1, band.to.0, band.to.1, band.color, band.width, band.opacity
        ));
        let mid_x = (band.from.0 + band.to.0) / 2.0;
        let mid_y = (band.from.1 + band.to.1) / 2.0 - band.width / 2.0 - 4.0;
        svg.push_str(&format!(
            "<text x=\"{mid_x:.2}\" y=\"{mid_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            theme.font_family,
            theme.font_size * 0.85,
            theme.muted_text_color,
            band.value
        ));
    }

    for node in &chain.nodes {
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"10\" ry=\"10\" fill=\"{}\" fill-opacity=\"{:.2}\"/>",
            node.x, node.y, node.width, node.height, node.color, node.opacity
        ));
        let center_x = node.x + node.width / 2.0;
        let center_y = node.y + node.height / 2.0;
        svg.push_str(&text_block_svg(
            center_x,
            center_y,
            &node.label,
            "#FFFFFF",
            theme,
            config,
        ));
        let total_y = node.y + node.height + theme.font_size + 6.0;
        svg.push_str(&format!(
            "<text x=\"{center_x:.2}\" y=\"{total_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            theme.font_family,
            theme.font_size * 0.85,
            theme.muted_text_color,
            node.total
        ));
    }
}

fn text_block_svg(
    x: f32,
    y: f32,
    label: &TextBlock,
    fill: &str,
    theme: &Theme,
    config: &LayoutConfig,
) -> String {
    let line_height = theme.font_size * config.label_line_height;
    let total_height = label.lines.len() as f32 * line_height;
    let start_y = y - total_height / 2.0 + theme.font_size;
    let mut text = String::new();

    text.push_str(&format!(
        "<text x=\"{x:.2}\" y=\"{start_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{fill}\">",
        theme.font_family, theme.font_size
    ));
    for (idx, line) in label.lines.iter().enumerate() {
        let dy = if idx == 0 { 0.0 } else { line_height };
        text.push_str(&format!(
            "<tspan x=\"{x:.2}\" dy=\"{dy:.2}\">{}</tspan>",
            escape_xml(line)
        ));
    }
    text.push_str("</text>");
    text
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].0, points[0].1));
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, width: f32, height: f32) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size =
        usvg::Size::from_wh(width, height).unwrap_or(usvg::Size::from_wh(800.0, 600.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LayoutConfig, RenderConfig};
    use crate::layout::{Selection, ViewKind, compute_layout};
    use crate::sample::sample_catalog;

    fn render_view(view: ViewKind, stage: Option<&str>) -> String {
        let catalog = sample_catalog();
        let dataset = catalog.commodity("Lithium").expect("commodity missing");
        let theme = Theme::dashboard();
        let config = LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        };
        let selection = Selection {
            year: 2020,
            stage: stage.map(|s| s.to_string()),
        };
        let layout = compute_layout(
            dataset,
            view,
            &selection,
            &theme,
            &config,
            &RenderConfig::default(),
        )
        .expect("layout failed");
        render_svg(&layout, &theme, &config)
    }

    #[test]
    fn map_svg_has_expected_elements() {
        let svg = render_view(ViewKind::Map, None);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), 8);
        // One curved path per link plus one arrow path each.
        assert_eq!(svg.matches("stroke-linecap=\"round\"").count(), 6);
        assert!(svg.contains("Mining"));
        assert!(svg.contains("Pilgangoora Operation"));
    }

    #[test]
    fn chain_svg_has_nodes_and_bands() {
        let svg = render_view(ViewKind::Chain, Some("Processing"));
        assert!(svg.contains("<rect"));
        assert!(svg.contains("<line"));
        assert!(svg.contains("Cathode"));
    }

    #[test]
    fn escapes_xml_in_labels() {
        assert_eq!(escape_xml("A&B <x>"), "A&amp;B &lt;x&gt;");
    }
}
