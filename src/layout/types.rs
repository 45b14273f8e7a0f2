use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Map,
    Chain,
}

/// The caller's interactive state: which year to render and, optionally,
/// which stage is highlighted. No global selection state exists anywhere.
#[derive(Debug, Clone)]
pub struct Selection {
    pub year: i32,
    pub stage: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub view: ViewKind,
    pub width: f32,
    pub height: f32,
    pub data: ViewData,
}

#[derive(Debug, Clone)]
pub enum ViewData {
    Map(MapLayout),
    Chain(ChainLayout),
}

#[derive(Debug, Clone)]
pub struct MapLayout {
    pub markers: Vec<MarkerLayout>,
    pub arcs: Vec<ArcLayout>,
    pub graticule: Vec<GraticuleLine>,
    pub legend: Vec<LegendEntry>,
    /// Stages connected to the selection; empty when nothing is selected.
    pub connected: BTreeSet<String>,
    pub skipped_links: usize,
}

#[derive(Debug, Clone)]
pub struct MarkerLayout {
    pub stage: String,
    pub country: String,
    pub company: String,
    pub site: String,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub magnitude: f64,
    pub color: String,
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub struct ArcLayout {
    pub source: String,
    pub source_country: String,
    pub target: String,
    pub target_country: String,
    pub value: f64,
    /// Projected canvas polyline.
    pub points: Vec<(f32, f32)>,
    pub width: f32,
    /// Arrow bearing at the arc midpoint, degrees clockwise from north.
    pub angle_deg: f64,
    pub arrow_at: (f32, f32),
    pub color: String,
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub struct GraticuleLine {
    pub from: (f32, f32),
    pub to: (f32, f32),
}

#[derive(Debug, Clone)]
pub struct LegendEntry {
    pub stage: String,
    pub color: String,
    pub x: f32,
    pub y: f32,
    pub label: TextBlock,
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone)]
pub struct ChainLayout {
    pub nodes: Vec<ChainNodeLayout>,
    pub bands: Vec<ChainBandLayout>,
    pub connected: BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub struct ChainNodeLayout {
    pub stage: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Larger of total inbound and outbound flow through the stage.
    pub total: f64,
    pub label: TextBlock,
    pub color: String,
    pub opacity: f32,
}

/// One aggregated band per (source, target) stage pair; parallel links'
/// values are summed.
#[derive(Debug, Clone)]
pub struct ChainBandLayout {
    pub source: String,
    pub target: String,
    pub value: f64,
    pub width: f32,
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub color: String,
    pub opacity: f32,
}
