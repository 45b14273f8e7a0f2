use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse dataset: {0}")]
    Parse(String),
    #[error("unknown commodity: {0}")]
    UnknownCommodity(String),
    #[error("no data for year {0}")]
    UnknownYear(i32),
    #[error("catalog contains no commodities")]
    EmptyCatalog,
}

/// Multi-commodity dataset document. One file carries every commodity so a
/// single catalog can back all renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub commodities: Vec<CommodityDataset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommodityDataset {
    pub commodity: String,
    pub nodes: Vec<StageNode>,
    pub locations: BTreeMap<String, Vec<Location>>,
    pub years: Vec<i32>,
    /// Keyed by year as a string (JSON object keys are strings).
    #[serde(rename = "dataByYear")]
    pub data_by_year: BTreeMap<String, YearSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Source,
    Process,
    Target,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    /// `[longitude, latitude]` in degrees, matching the hand-authored order.
    pub coordinates: [f64; 2],
    pub company: String,
    pub site: String,
    /// Per-year magnitude override; absent in most datasets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl Location {
    pub fn lon(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn lat(&self) -> f64 {
        self.coordinates[1]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowLink {
    pub source: String,
    #[serde(rename = "sourceCountry")]
    pub source_country: String,
    pub target: String,
    #[serde(rename = "targetCountry")]
    pub target_country: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearSnapshot {
    pub links: Vec<FlowLink>,
    /// Optional per-stage location overrides for this year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<BTreeMap<String, Vec<Location>>>,
}

impl Catalog {
    pub fn from_json(input: &str) -> Result<Self, DatasetError> {
        serde_json::from_str(input).map_err(|err| DatasetError::Parse(err.to_string()))
    }

    pub fn from_json5(input: &str) -> Result<Self, DatasetError> {
        json5::from_str(input).map_err(|err| DatasetError::Parse(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let contents = std::fs::read_to_string(path)?;
        let is_json5 = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json5"))
            .unwrap_or(false);
        if is_json5 {
            Self::from_json5(&contents)
        } else {
            Self::from_json(&contents)
        }
    }

    pub fn commodity(&self, name: &str) -> Result<&CommodityDataset, DatasetError> {
        self.commodities
            .iter()
            .find(|dataset| dataset.commodity == name)
            .ok_or_else(|| DatasetError::UnknownCommodity(name.to_string()))
    }

    pub fn first(&self) -> Result<&CommodityDataset, DatasetError> {
        self.commodities.first().ok_or(DatasetError::EmptyCatalog)
    }
}

impl CommodityDataset {
    pub fn snapshot(&self, year: i32) -> Result<&YearSnapshot, DatasetError> {
        self.data_by_year
            .get(&year.to_string())
            .ok_or(DatasetError::UnknownYear(year))
    }

    pub fn has_stage(&self, stage: &str) -> bool {
        self.nodes.iter().any(|node| node.id == stage)
    }

    /// Locations for a stage in a given year, honoring the snapshot's
    /// per-year overrides when present.
    pub fn stage_locations(&self, stage: &str, year: i32) -> &[Location] {
        if let Some(snapshot) = self.data_by_year.get(&year.to_string())
            && let Some(overrides) = &snapshot.locations
            && let Some(locations) = overrides.get(stage)
        {
            return locations;
        }
        self.locations
            .get(stage)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Resolves a link endpoint to a concrete site. Multiple locations may
    /// share a (stage, country) pair; the first-listed one wins.
    pub fn resolve_location(&self, stage: &str, country: &str, year: i32) -> Option<&Location> {
        self.stage_locations(stage, year)
            .iter()
            .find(|location| location.country == country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "commodities": [{
            "commodity": "Lithium",
            "nodes": [
                { "id": "Mining", "name": "Mining", "type": "source" },
                { "id": "EV", "name": "EV", "type": "target" }
            ],
            "locations": {
                "Mining": [{
                    "country": "AUS",
                    "coordinates": [133.7751, -25.2744],
                    "company": "Pilbara Minerals",
                    "site": "Pilgangoora Operation"
                }],
                "EV": [{
                    "country": "USA",
                    "coordinates": [-95.7129, 37.0902],
                    "company": "US EV",
                    "site": "National Network"
                }]
            },
            "years": [2024],
            "dataByYear": {
                "2024": {
                    "links": [{
                        "source": "Mining",
                        "sourceCountry": "AUS",
                        "target": "EV",
                        "targetCountry": "USA",
                        "value": 1500
                    }]
                }
            }
        }]
    }"#;

    #[test]
    fn parses_minimal_catalog() {
        let catalog = Catalog::from_json(MINIMAL).expect("parse failed");
        let dataset = catalog.commodity("Lithium").expect("commodity missing");
        assert_eq!(dataset.nodes.len(), 2);
        assert_eq!(dataset.snapshot(2024).expect("year missing").links.len(), 1);
    }

    #[test]
    fn parses_json5_with_comments() {
        let input = MINIMAL.replace(
            "\"commodities\"",
            "// hand-authored catalog\n\"commodities\"",
        );
        let catalog = Catalog::from_json5(&input).expect("json5 parse failed");
        assert_eq!(catalog.commodities.len(), 1);
    }

    #[test]
    fn unknown_commodity_is_an_error() {
        let catalog = Catalog::from_json(MINIMAL).expect("parse failed");
        assert!(matches!(
            catalog.commodity("Unobtanium"),
            Err(DatasetError::UnknownCommodity(_))
        ));
    }

    #[test]
    fn unknown_year_is_an_error() {
        let catalog = Catalog::from_json(MINIMAL).expect("parse failed");
        let dataset = catalog.first().expect("empty catalog");
        assert!(matches!(
            dataset.snapshot(1999),
            Err(DatasetError::UnknownYear(1999))
        ));
    }

    #[test]
    fn resolve_location_prefers_first_listed() {
        let mut catalog = Catalog::from_json(MINIMAL).expect("parse failed");
        let dataset = &mut catalog.commodities[0];
        let mut duplicate = dataset.locations["Mining"][0].clone();
        duplicate.site = "Second Site".to_string();
        dataset
            .locations
            .get_mut("Mining")
            .expect("stage missing")
            .push(duplicate);

        let resolved = dataset
            .resolve_location("Mining", "AUS", 2024)
            .expect("resolution failed");
        assert_eq!(resolved.site, "Pilgangoora Operation");
    }

    #[test]
    fn year_overrides_take_precedence() {
        let mut catalog = Catalog::from_json(MINIMAL).expect("parse failed");
        let dataset = &mut catalog.commodities[0];
        let mut overridden = dataset.locations["Mining"][0].clone();
        overridden.value = Some(900.0);
        let mut overrides = BTreeMap::new();
        overrides.insert("Mining".to_string(), vec![overridden]);
        dataset
            .data_by_year
            .get_mut("2024")
            .expect("year missing")
            .locations = Some(overrides);

        let resolved = dataset
            .resolve_location("Mining", "AUS", 2024)
            .expect("resolution failed");
        assert_eq!(resolved.value, Some(900.0));
    }
}
