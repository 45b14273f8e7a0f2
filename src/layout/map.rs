use std::collections::BTreeSet;

use crate::config::{LayoutConfig, RenderConfig};
use crate::connectivity::connected_stages;
use crate::dataset::{CommodityDataset, DatasetError};
use crate::geometry::{ArcConfig, GeoPoint, WidthScale, flow_arc};
use crate::theme::Theme;

use super::text::measure_label;
use super::{
    ArcLayout, GraticuleLine, Layout, LegendEntry, MapLayout, MarkerLayout, Selection, ViewData,
    ViewKind, stage_index,
};

pub(super) fn compute_map_layout(
    dataset: &CommodityDataset,
    selection: &Selection,
    theme: &Theme,
    config: &LayoutConfig,
    render: &RenderConfig,
) -> Result<Layout, DatasetError> {
    let snapshot = dataset.snapshot(selection.year)?;
    let width = render.width.max(200.0);
    let height = render.height.max(200.0);
    let projector = Projector::new(width, height, config.padding);

    let connected: BTreeSet<String> = match &selection.stage {
        Some(stage) => connected_stages(&snapshot.links, stage),
        None => BTreeSet::new(),
    };

    let mut scale = WidthScale::from_values(snapshot.links.iter().map(|link| link.value.max(0.0)));
    scale.min_width = config.min_line_width;
    scale.max_width = config.max_line_width;

    let arc_config = ArcConfig {
        curve_offset: config.curve_offset,
        steps: config.arc_steps,
    };

    let mut arcs = Vec::new();
    let mut skipped_links = 0usize;
    for link in &snapshot.links {
        let from = dataset.resolve_location(&link.source, &link.source_country, selection.year);
        let to = dataset.resolve_location(&link.target, &link.target_country, selection.year);
        let (Some(from), Some(to)) = (from, to) else {
            // Validation reports these; layout just degrades.
            skipped_links += 1;
            continue;
        };

        let arc = flow_arc(
            GeoPoint::new(from.lon(), from.lat()),
            GeoPoint::new(to.lon(), to.lat()),
            &arc_config,
        );
        let points: Vec<(f32, f32)> = arc.points.iter().map(|p| projector.project(*p)).collect();
        let arrow_at = points[points.len() / 2];

        arcs.push(ArcLayout {
            source: link.source.clone(),
            source_country: link.source_country.clone(),
            target: link.target.clone(),
            target_country: link.target_country.clone(),
            value: link.value,
            points,
            width: scale.width_for(link.value.max(0.0)),
            angle_deg: arc.midpoint_angle_deg,
            arrow_at,
            color: theme
                .stage_color(&link.source, stage_index(dataset, &link.source))
                .to_string(),
            opacity: arc_opacity(selection, &link.source, &link.target, config),
        });
    }

    let mut markers = Vec::new();
    for node in &dataset.nodes {
        let index = stage_index(dataset, &node.id);
        let color = theme.stage_color(&node.id, index).to_string();
        for location in dataset.stage_locations(&node.id, selection.year) {
            let magnitude = location.value.unwrap_or_else(|| {
                snapshot
                    .links
                    .iter()
                    .filter(|link| {
                        (link.source == node.id && link.source_country == location.country)
                            || (link.target == node.id && link.target_country == location.country)
                    })
                    .map(|link| link.value.max(0.0))
                    .sum()
            });
            let radius = (magnitude.max(0.0).sqrt() as f32 * config.marker_scale)
                .clamp(config.min_marker_radius, config.max_marker_radius);
            let (x, y) = projector.project(GeoPoint::new(location.lon(), location.lat()));

            markers.push(MarkerLayout {
                stage: node.id.clone(),
                country: location.country.clone(),
                company: location.company.clone(),
                site: location.site.clone(),
                x,
                y,
                radius,
                magnitude,
                color: color.clone(),
                opacity: marker_opacity(selection, &connected, &node.id, config),
            });
        }
    }

    let graticule = build_graticule(&projector, config.graticule_step);
    let legend = build_legend(dataset, selection, theme, config);

    Ok(Layout {
        view: ViewKind::Map,
        width,
        height,
        data: ViewData::Map(MapLayout {
            markers,
            arcs,
            graticule,
            legend,
            connected,
            skipped_links,
        }),
    })
}

fn arc_opacity(selection: &Selection, source: &str, target: &str, config: &LayoutConfig) -> f32 {
    match &selection.stage {
        Some(stage) if stage == source || stage == target => config.opacity.arc_active,
        Some(_) => config.opacity.arc_dimmed,
        None => config.opacity.arc_idle,
    }
}

fn marker_opacity(
    selection: &Selection,
    connected: &BTreeSet<String>,
    stage: &str,
    config: &LayoutConfig,
) -> f32 {
    if selection.stage.is_none() {
        return config.opacity.marker_idle;
    }
    if connected.contains(stage) {
        config.opacity.marker_connected
    } else {
        config.opacity.marker_dimmed
    }
}

fn build_graticule(projector: &Projector, step: f64) -> Vec<GraticuleLine> {
    let mut lines = Vec::new();
    if step <= 0.0 {
        return lines;
    }
    let mut lon = -180.0;
    while lon <= 180.0 {
        lines.push(GraticuleLine {
            from: projector.project(GeoPoint::new(lon, 90.0)),
            to: projector.project(GeoPoint::new(lon, -90.0)),
        });
        lon += step;
    }
    let mut lat = -90.0;
    while lat <= 90.0 {
        lines.push(GraticuleLine {
            from: projector.project(GeoPoint::new(-180.0, lat)),
            to: projector.project(GeoPoint::new(180.0, lat)),
        });
        lat += step;
    }
    lines
}

fn build_legend(
    dataset: &CommodityDataset,
    selection: &Selection,
    theme: &Theme,
    config: &LayoutConfig,
) -> Vec<LegendEntry> {
    const SWATCH: f32 = 12.0;
    const SWATCH_GAP: f32 = 6.0;
    const ENTRY_GAP: f32 = 18.0;

    let mut entries = Vec::new();
    let mut x = config.padding;
    let y = config.padding;
    for node in &dataset.nodes {
        let label = measure_label(&node.name, theme, config);
        let advance = SWATCH + SWATCH_GAP + label.width + ENTRY_GAP;
        let opacity = match &selection.stage {
            Some(stage) if stage == &node.id => 1.0,
            Some(_) => 0.5,
            None => 1.0,
        };
        entries.push(LegendEntry {
            stage: node.id.clone(),
            color: theme
                .stage_color(&node.id, stage_index(dataset, &node.id))
                .to_string(),
            x,
            y,
            label,
            opacity,
        });
        x += advance;
    }
    entries
}

/// Equirectangular projection onto the padded canvas.
struct Projector {
    width: f32,
    height: f32,
    padding: f32,
}

impl Projector {
    fn new(width: f32, height: f32, padding: f32) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }

    fn project(&self, point: GeoPoint) -> (f32, f32) {
        let usable_w = (self.width - 2.0 * self.padding).max(1.0) as f64;
        let usable_h = (self.height - 2.0 * self.padding).max(1.0) as f64;
        let x = self.padding as f64 + (point.lon + 180.0) / 360.0 * usable_w;
        let y = self.padding as f64 + (90.0 - point.lat) / 180.0 * usable_h;
        (x as f32, y as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::sample::sample_catalog;

    fn layout_for(stage: Option<&str>) -> MapLayout {
        let catalog = sample_catalog();
        let dataset = catalog.commodity("Lithium").expect("commodity missing");
        let selection = Selection {
            year: 2020,
            stage: stage.map(|s| s.to_string()),
        };
        let layout = compute_map_layout(
            dataset,
            &selection,
            &Theme::dashboard(),
            &LayoutConfig::default(),
            &RenderConfig::default(),
        )
        .expect("layout failed");
        match layout.data {
            ViewData::Map(map) => map,
            ViewData::Chain(_) => panic!("expected map layout"),
        }
    }

    #[test]
    fn one_arc_per_resolved_link() {
        let map = layout_for(None);
        assert_eq!(map.arcs.len(), 6);
        assert_eq!(map.skipped_links, 0);
    }

    #[test]
    fn one_marker_per_location() {
        let map = layout_for(None);
        assert_eq!(map.markers.len(), 8);
        for marker in &map.markers {
            assert!(marker.radius >= 5.0);
            assert!(marker.x.is_finite() && marker.y.is_finite());
        }
    }

    #[test]
    fn selection_drives_opacities() {
        let map = layout_for(Some("Mining"));
        for arc in &map.arcs {
            if arc.source == "Mining" || arc.target == "Mining" {
                assert_eq!(arc.opacity, 0.7);
            } else {
                assert_eq!(arc.opacity, 0.1);
            }
        }
        // The sample chain is fully connected, so every marker is bright.
        for marker in &map.markers {
            assert_eq!(marker.opacity, 0.8);
        }
    }

    #[test]
    fn no_selection_means_idle_opacities() {
        let map = layout_for(None);
        assert!(map.connected.is_empty());
        for arc in &map.arcs {
            assert_eq!(arc.opacity, 0.5);
        }
    }

    #[test]
    fn unresolvable_link_is_skipped_not_fatal() {
        let mut catalog = sample_catalog();
        let dataset = &mut catalog.commodities[0];
        dataset
            .data_by_year
            .get_mut("2020")
            .expect("year missing")
            .links[0]
            .source_country = "ZZZ".to_string();

        let selection = Selection {
            year: 2020,
            stage: None,
        };
        let layout = compute_map_layout(
            dataset,
            &selection,
            &Theme::dashboard(),
            &LayoutConfig::default(),
            &RenderConfig::default(),
        )
        .expect("layout failed");
        let ViewData::Map(map) = layout.data else {
            panic!("expected map layout");
        };
        assert_eq!(map.arcs.len(), 5);
        assert_eq!(map.skipped_links, 1);
    }

    #[test]
    fn coincident_endpoints_produce_finite_arcs() {
        // Cathode/USA -> EV/USA share coordinates in the sample data.
        let map = layout_for(None);
        let arc = map
            .arcs
            .iter()
            .find(|arc| arc.source == "Cathode" && arc.target_country == "USA")
            .expect("same-country arc missing");
        for (x, y) in &arc.points {
            assert!(x.is_finite() && y.is_finite());
        }
        assert!(arc.angle_deg.is_finite());
        assert!(arc.width.is_finite());
    }

    #[test]
    fn legend_lists_every_stage_in_order() {
        let map = layout_for(None);
        let stages: Vec<&str> = map.legend.iter().map(|entry| entry.stage.as_str()).collect();
        assert_eq!(stages, vec!["Mining", "Processing", "Cathode", "EV"]);
        // Entries advance left to right without overlap.
        for pair in map.legend.windows(2) {
            assert!(pair[1].x > pair[0].x);
        }
    }

    #[test]
    fn unknown_year_is_an_error() {
        let catalog = sample_catalog();
        let dataset = catalog.commodity("Lithium").expect("commodity missing");
        let selection = Selection {
            year: 1999,
            stage: None,
        };
        assert!(
            compute_map_layout(
                dataset,
                &selection,
                &Theme::dashboard(),
                &LayoutConfig::default(),
                &RenderConfig::default(),
            )
            .is_err()
        );
    }
}
