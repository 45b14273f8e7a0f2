use crate::dataset::CommodityDataset;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

static COUNTRY_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2,3}$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FindingKind {
    /// A link endpoint's (stage, country) pair resolves to no location.
    MissingLocation,
    /// A link references a stage id absent from the node list.
    UnknownStage,
    /// A year appears in `years` but has no snapshot.
    MissingYearSnapshot,
    NegativeFlowValue,
    SelfLoopLink,
    /// More than one location shares a (stage, country) pair; the
    /// first-listed one wins at render time.
    AmbiguousLocation,
    MalformedCountryCode,
}

impl FindingKind {
    /// Whether layout drops the offending link entirely.
    pub fn skips_link(self) -> bool {
        matches!(self, Self::MissingLocation | Self::UnknownStage)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub year: i32,
    pub kind: FindingKind,
    pub detail: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {:?}: {}", self.year, self.kind, self.detail)
    }
}

/// Outcome of a dataset pass. No finding is fatal: the renderer skips what it
/// cannot resolve and degrades gracefully instead of crashing on bad data.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
    pub total_links: usize,
    pub skipped_links: usize,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Checks every year's links against the stage list and location table.
pub fn validate_dataset(dataset: &CommodityDataset) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_country_codes(dataset, &mut report);
    check_ambiguous_locations(dataset, &mut report);

    for &year in &dataset.years {
        let Ok(snapshot) = dataset.snapshot(year) else {
            report.findings.push(Finding {
                year,
                kind: FindingKind::MissingYearSnapshot,
                detail: format!("year {year} is listed but has no snapshot"),
            });
            continue;
        };

        for link in &snapshot.links {
            report.total_links += 1;
            let mut skipped = false;

            for (stage, country) in [
                (&link.source, &link.source_country),
                (&link.target, &link.target_country),
            ] {
                if !dataset.has_stage(stage) {
                    tracing::warn!(year, stage = %stage, "link references unknown stage");
                    report.findings.push(Finding {
                        year,
                        kind: FindingKind::UnknownStage,
                        detail: format!("link references stage '{stage}' not in the node list"),
                    });
                    skipped = true;
                } else if dataset.resolve_location(stage, country, year).is_none() {
                    tracing::warn!(year, stage = %stage, country = %country, "unresolvable link endpoint");
                    report.findings.push(Finding {
                        year,
                        kind: FindingKind::MissingLocation,
                        detail: format!("no location for ({stage}, {country})"),
                    });
                    skipped = true;
                }
            }

            if link.value < 0.0 {
                report.findings.push(Finding {
                    year,
                    kind: FindingKind::NegativeFlowValue,
                    detail: format!(
                        "{} -> {} has negative value {}",
                        link.source, link.target, link.value
                    ),
                });
            }
            if link.source == link.target {
                report.findings.push(Finding {
                    year,
                    kind: FindingKind::SelfLoopLink,
                    detail: format!("self-loop on stage '{}'", link.source),
                });
            }

            if skipped {
                report.skipped_links += 1;
            }
        }
    }

    report
}

fn check_country_codes(dataset: &CommodityDataset, report: &mut ValidationReport) {
    let year = dataset.years.first().copied().unwrap_or(0);
    for (stage, locations) in &dataset.locations {
        for location in locations {
            if !COUNTRY_CODE.is_match(&location.country) {
                report.findings.push(Finding {
                    year,
                    kind: FindingKind::MalformedCountryCode,
                    detail: format!(
                        "location '{}' in stage '{}' has country code '{}'",
                        location.site, stage, location.country
                    ),
                });
            }
        }
    }
}

fn check_ambiguous_locations(dataset: &CommodityDataset, report: &mut ValidationReport) {
    let year = dataset.years.first().copied().unwrap_or(0);
    for (stage, locations) in &dataset.locations {
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for location in locations {
            *seen.entry(location.country.as_str()).or_insert(0) += 1;
        }
        for (country, count) in seen {
            if count > 1 {
                report.findings.push(Finding {
                    year,
                    kind: FindingKind::AmbiguousLocation,
                    detail: format!(
                        "{count} locations share ({stage}, {country}); first-listed wins"
                    ),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_catalog;

    #[test]
    fn sample_catalog_is_clean() {
        let catalog = sample_catalog();
        for dataset in &catalog.commodities {
            let report = validate_dataset(dataset);
            assert!(
                report.is_clean(),
                "{}: {:?}",
                dataset.commodity,
                report.findings
            );
            assert_eq!(report.skipped_links, 0);
        }
    }

    #[test]
    fn missing_location_is_reported_and_skipped() {
        let mut catalog = sample_catalog();
        let dataset = &mut catalog.commodities[0];
        dataset
            .data_by_year
            .get_mut("2020")
            .expect("year missing")
            .links[0]
            .source_country = "ZZZ".to_string();

        let report = validate_dataset(dataset);
        assert_eq!(report.skipped_links, 1);
        assert!(report
            .findings
            .iter()
            .any(|finding| finding.kind == FindingKind::MissingLocation));
    }

    #[test]
    fn unknown_stage_is_reported() {
        let mut catalog = sample_catalog();
        let dataset = &mut catalog.commodities[0];
        dataset
            .data_by_year
            .get_mut("2020")
            .expect("year missing")
            .links[0]
            .target = "Smelting".to_string();

        let report = validate_dataset(dataset);
        assert!(report
            .findings
            .iter()
            .any(|finding| finding.kind == FindingKind::UnknownStage));
        assert_eq!(report.skipped_links, 1);
    }

    #[test]
    fn negative_value_and_self_loop_are_warnings_not_skips() {
        let mut catalog = sample_catalog();
        let dataset = &mut catalog.commodities[0];
        let links = &mut dataset
            .data_by_year
            .get_mut("2020")
            .expect("year missing")
            .links;
        links[0].value = -5.0;
        links[1].target = links[1].source.clone();
        links[1].target_country = links[1].source_country.clone();

        let report = validate_dataset(dataset);
        assert_eq!(report.skipped_links, 0);
        assert!(report
            .findings
            .iter()
            .any(|finding| finding.kind == FindingKind::NegativeFlowValue));
        assert!(report
            .findings
            .iter()
            .any(|finding| finding.kind == FindingKind::SelfLoopLink));
    }

    #[test]
    fn duplicate_country_in_stage_is_ambiguous() {
        let mut catalog = sample_catalog();
        let dataset = &mut catalog.commodities[0];
        let duplicate = dataset.locations["Mining"][0].clone();
        dataset
            .locations
            .get_mut("Mining")
            .expect("stage missing")
            .push(duplicate);

        let report = validate_dataset(dataset);
        assert!(report
            .findings
            .iter()
            .any(|finding| finding.kind == FindingKind::AmbiguousLocation));
    }

    #[test]
    fn lowercase_country_code_is_flagged() {
        let mut catalog = sample_catalog();
        let dataset = &mut catalog.commodities[0];
        dataset
            .locations
            .get_mut("Mining")
            .expect("stage missing")[0]
            .country = "aus".to_string();

        let report = validate_dataset(dataset);
        assert!(report
            .findings
            .iter()
            .any(|finding| finding.kind == FindingKind::MalformedCountryCode));
    }
}
