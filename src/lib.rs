pub mod cli;
pub mod config;
pub mod connectivity;
pub mod dataset;
pub mod geometry;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod sample;
pub mod text_metrics;
pub mod theme;
pub mod validate;

pub use cli::run;
pub use config::{Config, LayoutConfig};
pub use connectivity::connected_stages;
pub use dataset::{Catalog, CommodityDataset, FlowLink, Location, YearSnapshot};
pub use geometry::{ArcConfig, FlowArc, GeoPoint, WidthScale, flow_arc};
pub use layout::{Layout, Selection, ViewKind, compute_layout};
pub use render::render_svg;
pub use theme::Theme;
pub use validate::{ValidationReport, validate_dataset};
