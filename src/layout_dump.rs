use crate::layout::{Layout, ViewData, ViewKind};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Serializable mirror of a computed layout. Exposes the queryable facts
/// behind the picture: connectivity membership, magnitudes, widths, angles
/// and opacities per element.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub view: String,
    pub width: f32,
    pub height: f32,
    pub connected: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arcs: Vec<ArcDump>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<MarkerDump>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub chain_nodes: Vec<ChainNodeDump>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub chain_bands: Vec<ChainBandDump>,
    pub skipped_links: usize,
}

#[derive(Debug, Serialize)]
pub struct ArcDump {
    pub source: String,
    pub source_country: String,
    pub target: String,
    pub target_country: String,
    pub value: f64,
    pub width: f32,
    pub angle_deg: f64,
    pub opacity: f32,
    pub points: Vec<[f32; 2]>,
}

#[derive(Debug, Serialize)]
pub struct MarkerDump {
    pub stage: String,
    pub country: String,
    pub company: String,
    pub site: String,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub magnitude: f64,
    pub opacity: f32,
}

#[derive(Debug, Serialize)]
pub struct ChainNodeDump {
    pub stage: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub total: f64,
    pub opacity: f32,
}

#[derive(Debug, Serialize)]
pub struct ChainBandDump {
    pub source: String,
    pub target: String,
    pub value: f64,
    pub width: f32,
    pub opacity: f32,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let view = match layout.view {
            ViewKind::Map => "map",
            ViewKind::Chain => "chain",
        }
        .to_string();

        let mut dump = LayoutDump {
            view,
            width: layout.width,
            height: layout.height,
            connected: Vec::new(),
            arcs: Vec::new(),
            markers: Vec::new(),
            chain_nodes: Vec::new(),
            chain_bands: Vec::new(),
            skipped_links: 0,
        };

        match &layout.data {
            ViewData::Map(map) => {
                dump.connected = map.connected.iter().cloned().collect();
                dump.skipped_links = map.skipped_links;
                dump.arcs = map
                    .arcs
                    .iter()
                    .map(|arc| ArcDump {
                        source: arc.source.clone(),
                        source_country: arc.source_country.clone(),
                        target: arc.target.clone(),
                        target_country: arc.target_country.clone(),
                        value: arc.value,
                        width: arc.width,
                        angle_deg: arc.angle_deg,
                        opacity: arc.opacity,
                        points: arc.points.iter().map(|(x, y)| [*x, *y]).collect(),
                    })
                    .collect();
                dump.markers = map
                    .markers
                    .iter()
                    .map(|marker| MarkerDump {
                        stage: marker.stage.clone(),
                        country: marker.country.clone(),
                        company: marker.company.clone(),
                        site: marker.site.clone(),
                        x: marker.x,
                        y: marker.y,
                        radius: marker.radius,
                        magnitude: marker.magnitude,
                        opacity: marker.opacity,
                    })
                    .collect();
            }
            ViewData::Chain(chain) => {
                dump.connected = chain.connected.iter().cloned().collect();
                dump.chain_nodes = chain
                    .nodes
                    .iter()
                    .map(|node| ChainNodeDump {
                        stage: node.stage.clone(),
                        x: node.x,
                        y: node.y,
                        width: node.width,
                        height: node.height,
                        total: node.total,
                        opacity: node.opacity,
                    })
                    .collect();
                dump.chain_bands = chain
                    .bands
                    .iter()
                    .map(|band| ChainBandDump {
                        source: band.source.clone(),
                        target: band.target.clone(),
                        value: band.value,
                        width: band.width,
                        opacity: band.opacity,
                    })
                    .collect();
            }
        }

        dump
    }
}

pub fn layout_to_json(layout: &Layout) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&LayoutDump::from_layout(
        layout,
    ))?)
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &LayoutDump::from_layout(layout))?;
    Ok(())
}
