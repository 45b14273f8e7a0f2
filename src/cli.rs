use crate::config::load_config;
use crate::dataset::Catalog;
use crate::layout::{Selection, ViewKind, compute_layout};
use crate::layout_dump::{layout_to_json, write_layout_dump};
use crate::render::{render_svg, write_output_svg};
use crate::sample::sample_catalog;
use crate::validate::validate_dataset;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "oreflow", version, about = "Supply-chain flow map renderer")]
pub struct Args {
    /// Catalog file (.json/.json5). Omit to use the embedded sample data.
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG/JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file merged over the defaults
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Commodity to render (default: first in the catalog)
    #[arg(long = "commodity")]
    pub commodity: Option<String>,

    /// Year to render (default: first listed year)
    #[arg(long = "year")]
    pub year: Option<i32>,

    /// Highlight a stage and everything connected to it
    #[arg(long = "stage")]
    pub stage: Option<String>,

    /// View to render
    #[arg(long = "view", value_enum, default_value = "map")]
    pub view: View,

    /// Width
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f32,

    /// Height
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum View {
    Map,
    Chain,
}

impl From<View> for ViewKind {
    fn from(view: View) -> Self {
        match view {
            View::Map => ViewKind::Map,
            View::Chain => ViewKind::Chain,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    config.render.width = args.width;
    config.render.height = args.height;

    let catalog = match args.input.as_deref() {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load catalog from {}", path.display()))?,
        None => sample_catalog(),
    };

    let dataset = match args.commodity.as_deref() {
        Some(name) => catalog.commodity(name)?,
        None => catalog.first()?,
    };

    let year = match args.year {
        Some(year) => year,
        None => *dataset
            .years
            .first()
            .ok_or_else(|| anyhow::anyhow!("dataset '{}' lists no years", dataset.commodity))?,
    };

    // Findings degrade the render, never abort it.
    let report = validate_dataset(dataset);
    for finding in &report.findings {
        let suffix = if finding.kind.skips_link() {
            " (link skipped)"
        } else {
            ""
        };
        eprintln!("warning: {finding}{suffix}");
    }

    let selection = Selection {
        year,
        stage: args.stage.clone(),
    };
    let layout = compute_layout(
        dataset,
        args.view.into(),
        &selection,
        &config.theme,
        &config.layout,
        &config.render,
    )?;

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &config.theme, &config.layout);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let svg = render_svg(&layout, &config.theme, &config.layout);
            let output = args
                .output
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
            write_png(&svg, output, config.render.width, config.render.height)?;
        }
        OutputFormat::Json => match args.output.as_deref() {
            Some(path) => write_layout_dump(path, &layout)?,
            None => print!("{}", layout_to_json(&layout)?),
        },
    }

    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &std::path::Path, width: f32, height: f32) -> Result<()> {
    crate::render::write_output_png(svg, output, width, height)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &std::path::Path, _width: f32, _height: f32) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires building with the 'png' feature"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_maps_to_layout_kind() {
        assert_eq!(ViewKind::from(View::Map), ViewKind::Map);
        assert_eq!(ViewKind::from(View::Chain), ViewKind::Chain);
    }

    #[test]
    fn args_parse_defaults() {
        let args = Args::parse_from(["oreflow"]);
        assert!(args.input.is_none());
        assert!(matches!(args.output_format, OutputFormat::Svg));
        assert!(matches!(args.view, View::Map));
        assert_eq!(args.width, 1200.0);
    }

    #[test]
    fn args_parse_selection_flags() {
        let args = Args::parse_from([
            "oreflow",
            "--commodity",
            "Nickel",
            "--year",
            "2023",
            "--stage",
            "Processing",
            "--view",
            "chain",
            "-e",
            "json",
        ]);
        assert_eq!(args.commodity.as_deref(), Some("Nickel"));
        assert_eq!(args.year, Some(2023));
        assert_eq!(args.stage.as_deref(), Some("Processing"));
        assert!(matches!(args.view, View::Chain));
        assert!(matches!(args.output_format, OutputFormat::Json));
    }
}
