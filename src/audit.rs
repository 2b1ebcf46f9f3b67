use crate::catalogue::CatalogueStore;
use crate::error::SourceError;
use crate::normalize::same_folded;
use crate::resolver::{LocationResolver, format_location_label};
use crate::taxonomy::{CanonicalMethod, canonicalize, supported_labels};
use crate::types::{SpeciesId, SpeciesRecord, null_as_default, text_or_number};
use crate::validator::{Diagnostic, Validator, record_matches};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

pub const DEFAULT_SAMPLE_LIMIT: usize = 25;

/// A row from the live record set checked by the external sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalRecord {
    #[serde(deserialize_with = "text_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    pub species_id: SpeciesId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
}

/// A source row that could not be decoded into an [`ExternalRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_id: Option<String>,
    pub message: String,
}

pub type ExternalRow = Result<ExternalRecord, RejectedRow>;

/// `Err` is reserved for the source itself failing; bad rows come back as
/// `Err` entries inside the `Ok` vector.
pub trait ExternalRecordSource {
    fn fetch(&self, owner: Option<&str>) -> Result<Vec<ExternalRow>, SourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditOptions {
    pub owner: Option<String>,
    pub sample_limit: usize,
    pub probe_labels: Vec<String>,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            owner: None,
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            probe_labels: supported_labels(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogueFailure {
    pub species_id: SpeciesId,
    pub species_name: String,
    pub region: Option<String>,
    pub area: Option<String>,
    pub method_label: String,
    pub canonical: CanonicalMethod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    pub row_id: String,
    pub display_name: String,
    pub note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub near_match: Option<String>,
    pub diagnostic: Diagnostic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExternalFailure {
    Row(RowFailure),
    Rejected(RejectedRow),
    Source { message: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub combos_checked: usize,
    pub catalogue_failures: usize,
    pub external_rows_checked: usize,
    pub external_failures: usize,
}

#[must_use]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub summary: AuditSummary,
    pub catalogue_failure_sample: Vec<CatalogueFailure>,
    pub failures_by_method: BTreeMap<CanonicalMethod, usize>,
    pub unclassified_labels: BTreeMap<String, usize>,
    pub external_failures: Vec<ExternalFailure>,
}

impl AuditReport {
    pub fn has_failures(&self) -> bool {
        self.summary.catalogue_failures > 0 || self.summary.external_failures > 0
    }

    pub fn exit_code(&self) -> u8 {
        u8::from(self.has_failures())
    }

    pub fn summary_lines(&self, artifact: Option<&Path>) -> Vec<String> {
        let mut lines = vec![
            format!("Combinations checked: {}", self.summary.combos_checked),
            format!("Catalogue failures: {}", self.summary.catalogue_failures),
            format!("External rows checked: {}", self.summary.external_rows_checked),
            format!("External failures: {}", self.summary.external_failures),
        ];
        if let Some(path) = artifact {
            lines.push(format!("Full report: {}", path.display()));
        }
        lines
    }
}

/// Sweeps the catalogue and an optional live record set for defects.
#[derive(Debug, Clone)]
pub struct Auditor {
    resolver: LocationResolver,
    validator: Validator,
}

impl Auditor {
    pub fn new(store: Arc<CatalogueStore>) -> Self {
        Self {
            resolver: LocationResolver::new(Arc::clone(&store)),
            validator: Validator::new(store),
        }
    }

    pub fn run(
        &self,
        source: Option<&dyn ExternalRecordSource>,
        options: &AuditOptions,
    ) -> AuditReport {
        let mut report = AuditReport::default();
        self.sweep_catalogue(options, &mut report);
        if let Some(source) = source {
            self.sweep_external(source, options, &mut report);
        }
        tracing::info!(
            combos = report.summary.combos_checked,
            catalogue_failures = report.summary.catalogue_failures,
            external_rows = report.summary.external_rows_checked,
            external_failures = report.summary.external_failures,
            "audit complete"
        );
        report
    }

    fn sweep_catalogue(&self, options: &AuditOptions, report: &mut AuditReport) {
        let mut probes = Vec::with_capacity(options.probe_labels.len());
        for label in &options.probe_labels {
            let method = canonicalize(label);
            if method.is_known() {
                probes.push((label.as_str(), method));
            } else {
                tracing::warn!(label = %label, "probe label does not classify; skipping");
            }
        }

        for species in self.resolver.store().species() {
            self.count_unclassified(species, report);
            let places = self.resolver.distinct_places(species.id);
            tracing::debug!(species = %species.name, places = places.len(), "sweeping species");
            for (region, area) in &places {
                for &(label, method) in &probes {
                    report.summary.combos_checked += 1;
                    let valid = self.validator.is_method_valid_for_location(
                        species.id,
                        region.as_deref(),
                        area.as_deref(),
                        label,
                    );
                    if valid {
                        continue;
                    }
                    report.summary.catalogue_failures += 1;
                    *report.failures_by_method.entry(method).or_insert(0) += 1;
                    if report.catalogue_failure_sample.len() < options.sample_limit {
                        report.catalogue_failure_sample.push(CatalogueFailure {
                            species_id: species.id,
                            species_name: species.name.clone(),
                            region: region.clone(),
                            area: area.clone(),
                            method_label: label.to_string(),
                            canonical: method,
                        });
                    }
                }
            }
        }
    }

    fn count_unclassified(&self, species: &SpeciesRecord, report: &mut AuditReport) {
        for label in self.resolver.get_methods_for_species(species.id) {
            if !canonicalize(&label).is_known() {
                tracing::warn!(
                    species = %species.name,
                    label = %label,
                    "unclassified method label"
                );
                *report.unclassified_labels.entry(label).or_insert(0) += 1;
            }
        }
    }

    fn sweep_external(
        &self,
        source: &dyn ExternalRecordSource,
        options: &AuditOptions,
        report: &mut AuditReport,
    ) {
        let rows = match source.fetch(options.owner.as_deref()) {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!(error = %err, "external record fetch failed");
                report.summary.external_failures += 1;
                report.external_failures.push(ExternalFailure::Source {
                    message: err.to_string(),
                });
                return;
            }
        };

        for row in rows {
            report.summary.external_rows_checked += 1;
            let row = match row {
                Ok(row) => row,
                Err(rejected) => {
                    tracing::warn!(
                        index = rejected.index,
                        error = %rejected.message,
                        "rejected external row"
                    );
                    report.summary.external_failures += 1;
                    report.external_failures.push(ExternalFailure::Rejected(rejected));
                    continue;
                }
            };
            let outcome = self.validator.diagnose(
                row.species_id,
                row.region.as_deref(),
                row.area.as_deref(),
                &row.method,
            );
            if outcome.valid {
                continue;
            }
            report.summary.external_failures += 1;
            report.external_failures.push(ExternalFailure::Row(RowFailure {
                row_id: row.id.clone(),
                display_name: row.display_name.clone(),
                note: self.failure_note(&row, &outcome.diagnostic),
                near_match: self.near_match(&row, outcome.diagnostic.canonical),
                diagnostic: outcome.diagnostic,
            }));
        }
    }

    fn failure_note(&self, row: &ExternalRecord, diagnostic: &Diagnostic) -> String {
        if !diagnostic.canonical.is_known() {
            return format!(
                "normalize method label '{}' to one of the supported labels",
                row.method.trim()
            );
        }
        if self.resolver.store().find_species(row.species_id).is_none() {
            return format!("species {} is not in the catalogue", row.species_id);
        }
        format!(
            "validator/dataset mismatch: {} '{}' at {}",
            diagnostic.canonical,
            row.method.trim(),
            format_location_label(row.region.as_deref(), row.area.as_deref())
        )
    }

    // A record that matches once accents and dash styles are folded away.
    fn near_match(&self, row: &ExternalRecord, method: CanonicalMethod) -> Option<String> {
        if !method.carries_location() {
            return None;
        }
        self.resolver
            .store()
            .list_raw_locations(row.species_id)
            .iter()
            .filter(|r| r.is_usable() && record_matches(method, r))
            .find(|r| {
                same_folded(r.region.as_deref(), row.region.as_deref())
                    && same_folded(r.area.as_deref(), row.area.as_deref())
            })
            .map(|r| format_location_label(r.region.as_deref(), r.area.as_deref()))
    }
}

pub fn run_audit(
    store: Arc<CatalogueStore>,
    source: Option<&dyn ExternalRecordSource>,
    options: &AuditOptions,
) -> AuditReport {
    Auditor::new(store).run(source, options)
}
