mod chain;
mod map;
mod text;
mod types;

pub use types::*;

use crate::config::{LayoutConfig, RenderConfig};
use crate::dataset::{CommodityDataset, DatasetError};
use crate::theme::Theme;

pub fn compute_layout(
    dataset: &CommodityDataset,
    view: ViewKind,
    selection: &Selection,
    theme: &Theme,
    config: &LayoutConfig,
    render: &RenderConfig,
) -> Result<Layout, DatasetError> {
    match view {
        ViewKind::Map => map::compute_map_layout(dataset, selection, theme, config, render),
        ViewKind::Chain => chain::compute_chain_layout(dataset, selection, theme, config, render),
    }
}

/// Pipeline index of a stage, from the ordered node list. Drives palette
/// fallback and chain column order.
pub(crate) fn stage_index(dataset: &CommodityDataset, stage: &str) -> usize {
    dataset
        .nodes
        .iter()
        .position(|node| node.id == stage)
        .unwrap_or(dataset.nodes.len())
}
