//! Embedded sample catalog: Lithium, Cobalt and Nickel chains over 2020-2024.
//! Hand-curated demo data, not market figures.

use crate::dataset::{
    Catalog, CommodityDataset, FlowLink, Location, NodeKind, StageNode, YearSnapshot,
};
use std::collections::BTreeMap;

type LinkRow = (&'static str, &'static str, &'static str, &'static str, f64);

pub fn sample_catalog() -> Catalog {
    Catalog {
        commodities: vec![lithium(), cobalt(), nickel()],
    }
}

fn lithium() -> CommodityDataset {
    let locations = [
        (
            "Mining",
            vec![
                loc("AUS", 133.7751, -25.2744, "Pilbara Minerals", "Pilgangoora Operation"),
                loc("CHL", -71.5430, -35.6751, "SQM", "Salar de Atacama"),
            ],
        ),
        (
            "Processing",
            vec![
                loc("CHN", 104.1954, 35.8617, "Ganfeng Lithium", "Xinyu Processing Facility"),
                loc("USA", -95.7129, 37.0902, "Albemarle", "Silver Peak"),
            ],
        ),
        (
            "Cathode",
            vec![
                loc("USA", -95.7129, 37.0902, "Tesla", "Gigafactory Nevada"),
                loc("DEU", 10.4515, 51.1657, "BASF", "Schwarzheide Plant"),
            ],
        ),
        (
            "EV",
            vec![
                loc("USA", -95.7129, 37.0902, "US EV", "National Network"),
                loc("DEU", 10.4515, 51.1657, "EU EV", "European Network"),
            ],
        ),
    ];

    let years: [(i32, Vec<LinkRow>); 5] = [
        (
            2020,
            vec![
                ("Mining", "AUS", "Processing", "CHN", 1500.0),
                ("Mining", "CHL", "Processing", "CHN", 2000.0),
                ("Processing", "CHN", "Cathode", "USA", 1800.0),
                ("Processing", "CHN", "Cathode", "DEU", 1500.0),
                ("Cathode", "USA", "EV", "USA", 1600.0),
                ("Cathode", "DEU", "EV", "DEU", 1400.0),
            ],
        ),
        (
            2021,
            vec![
                ("Mining", "AUS", "Processing", "CHN", 1800.0),
                ("Mining", "CHL", "Processing", "USA", 1200.0),
                ("Processing", "CHN", "Cathode", "USA", 1600.0),
                ("Processing", "USA", "Cathode", "DEU", 1000.0),
                ("Cathode", "USA", "EV", "USA", 1400.0),
                ("Cathode", "DEU", "EV", "DEU", 1200.0),
            ],
        ),
        (
            2022,
            vec![
                ("Mining", "AUS", "Processing", "USA", 2000.0),
                ("Mining", "CHL", "Processing", "CHN", 1800.0),
                ("Processing", "USA", "Cathode", "USA", 1900.0),
                ("Processing", "CHN", "Cathode", "DEU", 1700.0),
                ("Cathode", "USA", "EV", "USA", 1800.0),
                ("Cathode", "DEU", "EV", "DEU", 1600.0),
            ],
        ),
        (
            2023,
            vec![
                ("Mining", "AUS", "Processing", "USA", 2200.0),
                ("Mining", "CHL", "Processing", "USA", 2000.0),
                ("Processing", "USA", "Cathode", "USA", 2100.0),
                ("Processing", "USA", "Cathode", "DEU", 1900.0),
                ("Cathode", "USA", "EV", "USA", 2000.0),
                ("Cathode", "DEU", "EV", "DEU", 1800.0),
            ],
        ),
        (
            2024,
            vec![
                ("Mining", "AUS", "Processing", "USA", 2500.0),
                ("Mining", "CHL", "Processing", "USA", 2300.0),
                ("Processing", "USA", "Cathode", "USA", 2400.0),
                ("Processing", "USA", "Cathode", "DEU", 2200.0),
                ("Cathode", "USA", "EV", "USA", 2300.0),
                ("Cathode", "DEU", "EV", "DEU", 2100.0),
            ],
        ),
    ];

    dataset("Lithium", locations, years)
}

fn cobalt() -> CommodityDataset {
    let locations = [
        (
            "Mining",
            vec![
                loc("COD", 21.7587, -4.0383, "Glencore", "Mutanda Mining"),
                loc("ZMB", 27.8493, -13.1339, "ZCCM", "Chambishi Mine"),
            ],
        ),
        (
            "Processing",
            vec![
                loc("CHN", 104.1954, 35.8617, "Huayou Cobalt", "Tongxiang Facility"),
                loc("FIN", 25.7482, 61.9241, "Umicore", "Kokkola Plant"),
            ],
        ),
        (
            "Cathode",
            vec![
                loc("JPN", 138.2529, 36.2048, "Panasonic", "Kasai Plant"),
                loc("KOR", 127.7669, 35.9078, "Samsung SDI", "Ulsan Plant"),
            ],
        ),
        (
            "EV",
            vec![
                loc("JPN", 138.2529, 36.2048, "Asian EV", "Regional Network"),
                loc("DEU", 10.4515, 51.1657, "EU EV", "European Network"),
            ],
        ),
    ];

    let years: [(i32, Vec<LinkRow>); 5] = [
        (
            2020,
            vec![
                ("Mining", "COD", "Processing", "CHN", 1600.0),
                ("Mining", "ZMB", "Processing", "CHN", 1400.0),
                ("Processing", "CHN", "Cathode", "JPN", 1500.0),
                ("Processing", "CHN", "Cathode", "KOR", 1300.0),
                ("Cathode", "JPN", "EV", "JPN", 1400.0),
                ("Cathode", "KOR", "EV", "DEU", 1200.0),
            ],
        ),
        (
            2021,
            vec![
                ("Mining", "COD", "Processing", "FIN", 1800.0),
                ("Mining", "ZMB", "Processing", "CHN", 1500.0),
                ("Processing", "FIN", "Cathode", "JPN", 1700.0),
                ("Processing", "CHN", "Cathode", "KOR", 1400.0),
                ("Cathode", "JPN", "EV", "JPN", 1600.0),
                ("Cathode", "KOR", "EV", "DEU", 1300.0),
            ],
        ),
        (
            2022,
            vec![
                ("Mining", "COD", "Processing", "FIN", 2000.0),
                ("Mining", "ZMB", "Processing", "FIN", 1700.0),
                ("Processing", "FIN", "Cathode", "KOR", 1900.0),
                ("Processing", "FIN", "Cathode", "JPN", 1600.0),
                ("Cathode", "KOR", "EV", "DEU", 1800.0),
                ("Cathode", "JPN", "EV", "JPN", 1500.0),
            ],
        ),
        (
            2023,
            vec![
                ("Mining", "COD", "Processing", "FIN", 2200.0),
                ("Mining", "ZMB", "Processing", "FIN", 1900.0),
                ("Processing", "FIN", "Cathode", "KOR", 2100.0),
                ("Processing", "FIN", "Cathode", "JPN", 1800.0),
                ("Cathode", "KOR", "EV", "DEU", 2000.0),
                ("Cathode", "JPN", "EV", "JPN", 1700.0),
            ],
        ),
        (
            2024,
            vec![
                ("Mining", "COD", "Processing", "FIN", 2400.0),
                ("Mining", "ZMB", "Processing", "FIN", 2100.0),
                ("Processing", "FIN", "Cathode", "KOR", 2300.0),
                ("Processing", "FIN", "Cathode", "JPN", 2000.0),
                ("Cathode", "KOR", "EV", "DEU", 2200.0),
                ("Cathode", "JPN", "EV", "JPN", 1900.0),
            ],
        ),
    ];

    dataset("Cobalt", locations, years)
}

fn nickel() -> CommodityDataset {
    let locations = [
        (
            "Mining",
            vec![
                loc("IDN", 113.9213, -0.7893, "Vale Indonesia", "Sorowako Mine"),
                loc("PHL", 121.7740, 12.8797, "Nickel Asia", "Taganito Mine"),
            ],
        ),
        (
            "Processing",
            vec![
                loc("CHN", 104.1954, 35.8617, "Tsingshan", "Morowali Industrial Park"),
                loc("JPN", 138.2529, 36.2048, "Sumitomo Metal", "Niihama Refinery"),
            ],
        ),
        (
            "Cathode",
            vec![
                loc("KOR", 127.7669, 35.9078, "LG Chem", "Ochang Plant"),
                loc("CHN", 104.1954, 35.8617, "CATL", "Ningde Factory"),
            ],
        ),
        (
            "EV",
            vec![
                loc("KOR", 127.7669, 35.9078, "Asian EV", "Regional Network"),
                loc("USA", -95.7129, 37.0902, "US EV", "National Network"),
            ],
        ),
    ];

    let years: [(i32, Vec<LinkRow>); 5] = [
        (
            2020,
            vec![
                ("Mining", "IDN", "Processing", "CHN", 1700.0),
                ("Mining", "PHL", "Processing", "JPN", 1500.0),
                ("Processing", "CHN", "Cathode", "CHN", 1600.0),
                ("Processing", "JPN", "Cathode", "KOR", 1400.0),
                ("Cathode", "CHN", "EV", "USA", 1500.0),
                ("Cathode", "KOR", "EV", "KOR", 1300.0),
            ],
        ),
        (
            2021,
            vec![
                ("Mining", "IDN", "Processing", "CHN", 1900.0),
                ("Mining", "PHL", "Processing", "JPN", 1600.0),
                ("Processing", "CHN", "Cathode", "CHN", 1800.0),
                ("Processing", "JPN", "Cathode", "KOR", 1500.0),
                ("Cathode", "CHN", "EV", "USA", 1700.0),
                ("Cathode", "KOR", "EV", "KOR", 1400.0),
            ],
        ),
        (
            2022,
            vec![
                ("Mining", "IDN", "Processing", "JPN", 2100.0),
                ("Mining", "PHL", "Processing", "JPN", 1800.0),
                ("Processing", "JPN", "Cathode", "KOR", 2000.0),
                ("Processing", "JPN", "Cathode", "CHN", 1700.0),
                ("Cathode", "KOR", "EV", "KOR", 1900.0),
                ("Cathode", "CHN", "EV", "USA", 1600.0),
            ],
        ),
        (
            2023,
            vec![
                ("Mining", "IDN", "Processing", "JPN", 2300.0),
                ("Mining", "PHL", "Processing", "JPN", 2000.0),
                ("Processing", "JPN", "Cathode", "KOR", 2200.0),
                ("Processing", "JPN", "Cathode", "CHN", 1900.0),
                ("Cathode", "KOR", "EV", "KOR", 2100.0),
                ("Cathode", "CHN", "EV", "USA", 1800.0),
            ],
        ),
        (
            2024,
            vec![
                ("Mining", "IDN", "Processing", "JPN", 2500.0),
                ("Mining", "PHL", "Processing", "JPN", 2200.0),
                ("Processing", "JPN", "Cathode", "KOR", 2400.0),
                ("Processing", "JPN", "Cathode", "CHN", 2100.0),
                ("Cathode", "KOR", "EV", "KOR", 2300.0),
                ("Cathode", "CHN", "EV", "USA", 2000.0),
            ],
        ),
    ];

    dataset("Nickel", locations, years)
}

fn dataset<const N: usize>(
    commodity: &str,
    locations: [(&str, Vec<Location>); 4],
    years: [(i32, Vec<LinkRow>); N],
) -> CommodityDataset {
    let nodes = vec![
        stage("Mining", NodeKind::Source),
        stage("Processing", NodeKind::Process),
        stage("Cathode", NodeKind::Process),
        stage("EV", NodeKind::Target),
    ];

    let mut location_map = BTreeMap::new();
    for (id, sites) in locations {
        location_map.insert(id.to_string(), sites);
    }

    let mut data_by_year = BTreeMap::new();
    let mut year_list = Vec::with_capacity(N);
    for (year, rows) in years {
        year_list.push(year);
        let links = rows
            .into_iter()
            .map(|(source, source_country, target, target_country, value)| FlowLink {
                source: source.to_string(),
                source_country: source_country.to_string(),
                target: target.to_string(),
                target_country: target_country.to_string(),
                value,
            })
            .collect();
        data_by_year.insert(
            year.to_string(),
            YearSnapshot {
                links,
                locations: None,
            },
        );
    }

    CommodityDataset {
        commodity: commodity.to_string(),
        nodes,
        locations: location_map,
        years: year_list,
        data_by_year,
    }
}

fn stage(id: &str, kind: NodeKind) -> StageNode {
    StageNode {
        id: id.to_string(),
        name: id.to_string(),
        kind,
    }
}

fn loc(country: &str, lon: f64, lat: f64, company: &str, site: &str) -> Location {
    Location {
        country: country.to_string(),
        coordinates: [lon, lat],
        company: company.to_string(),
        site: site.to_string(),
        value: None,
    }
}
