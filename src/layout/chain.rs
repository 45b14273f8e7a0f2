use std::collections::{BTreeMap, BTreeSet};

use crate::config::{LayoutConfig, RenderConfig};
use crate::connectivity::connected_stages;
use crate::dataset::{CommodityDataset, DatasetError};
use crate::geometry::WidthScale;
use crate::theme::Theme;

use super::text::measure_label;
use super::{
    ChainBandLayout, ChainLayout, ChainNodeLayout, Layout, Selection, ViewData, ViewKind,
    stage_index,
};

/// Stage-strip diagram: one box per stage in pipeline order, one band per
/// (source, target) stage pair with parallel links' values summed.
pub(super) fn compute_chain_layout(
    dataset: &CommodityDataset,
    selection: &Selection,
    theme: &Theme,
    config: &LayoutConfig,
    render: &RenderConfig,
) -> Result<Layout, DatasetError> {
    let snapshot = dataset.snapshot(selection.year)?;
    let width = render.width.max(200.0);
    let height = render.height.max(200.0);

    let connected: BTreeSet<String> = match &selection.stage {
        Some(stage) => connected_stages(&snapshot.links, stage),
        None => BTreeSet::new(),
    };

    // Aggregate parallel links per stage pair; BTreeMap keeps band order
    // deterministic.
    let mut totals_by_pair: BTreeMap<(String, String), f64> = BTreeMap::new();
    let mut inbound: BTreeMap<String, f64> = BTreeMap::new();
    let mut outbound: BTreeMap<String, f64> = BTreeMap::new();
    for link in &snapshot.links {
        let value = link.value.max(0.0);
        *totals_by_pair
            .entry((link.source.clone(), link.target.clone()))
            .or_insert(0.0) += value;
        *outbound.entry(link.source.clone()).or_insert(0.0) += value;
        *inbound.entry(link.target.clone()).or_insert(0.0) += value;
    }

    let mut scale = WidthScale::from_values(totals_by_pair.values().copied());
    scale.min_width = config.min_line_width;
    scale.max_width = config.max_line_width;

    let chain = &config.chain;
    let column = chain.node_width + chain.node_gap;
    let x0 = config.padding;
    let node_y = (height - chain.node_height) / 2.0;

    let mut nodes = Vec::with_capacity(dataset.nodes.len());
    for (index, stage) in dataset.nodes.iter().enumerate() {
        let total = inbound
            .get(&stage.id)
            .copied()
            .unwrap_or(0.0)
            .max(outbound.get(&stage.id).copied().unwrap_or(0.0));
        nodes.push(ChainNodeLayout {
            stage: stage.id.clone(),
            name: stage.name.clone(),
            x: x0 + index as f32 * column,
            y: node_y,
            width: chain.node_width,
            height: chain.node_height,
            total,
            label: measure_label(&stage.name, theme, config),
            color: theme.stage_color(&stage.id, index).to_string(),
            opacity: node_opacity(selection, &connected, &stage.id, config),
        });
    }

    // Attachment points: distribute bands evenly along the node edge they
    // leave from or arrive at, in band order.
    let mut out_seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut in_seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut out_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut in_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for (source, target) in totals_by_pair.keys() {
        *out_counts.entry(source.as_str()).or_insert(0) += 1;
        *in_counts.entry(target.as_str()).or_insert(0) += 1;
    }

    let mut bands = Vec::with_capacity(totals_by_pair.len());
    for ((source, target), value) in &totals_by_pair {
        let source_index = stage_index(dataset, source);
        let (Some(from_node), Some(to_node)) = (
            nodes.iter().find(|node| &node.stage == source),
            nodes.iter().find(|node| &node.stage == target),
        ) else {
            continue;
        };

        let out_slot = *out_seen.entry(source.clone()).and_modify(|n| *n += 1).or_insert(0);
        let in_slot = *in_seen.entry(target.clone()).and_modify(|n| *n += 1).or_insert(0);
        let from_y = edge_offset(
            from_node.y,
            from_node.height,
            out_slot,
            out_counts[source.as_str()],
        );
        let to_y = edge_offset(
            to_node.y,
            to_node.height,
            in_slot,
            in_counts[target.as_str()],
        );

        bands.push(ChainBandLayout {
            source: source.clone(),
            target: target.clone(),
            value: *value,
            width: scale.width_for(*value),
            from: (from_node.x + from_node.width, from_y),
            to: (to_node.x, to_y),
            color: theme.stage_color(source, source_index).to_string(),
            opacity: band_opacity(selection, source, target, config),
        });
    }

    Ok(Layout {
        view: ViewKind::Chain,
        width,
        height,
        data: ViewData::Chain(ChainLayout {
            nodes,
            bands,
            connected,
        }),
    })
}

fn edge_offset(node_y: f32, node_height: f32, slot: usize, count: usize) -> f32 {
    let count = count.max(1);
    node_y + node_height * (slot as f32 + 1.0) / (count as f32 + 1.0)
}

fn node_opacity(
    selection: &Selection,
    connected: &BTreeSet<String>,
    stage: &str,
    config: &LayoutConfig,
) -> f32 {
    if selection.stage.is_none() {
        return config.opacity.chain_node_idle;
    }
    if connected.contains(stage) {
        config.opacity.chain_node_selected
    } else {
        config.opacity.chain_node_dimmed
    }
}

fn band_opacity(selection: &Selection, source: &str, target: &str, config: &LayoutConfig) -> f32 {
    match &selection.stage {
        Some(stage) if stage == source || stage == target => config.opacity.chain_band_active,
        Some(_) => config.opacity.chain_band_dimmed,
        None => config.opacity.chain_band_idle,
    }
}
