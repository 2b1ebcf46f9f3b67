//! Encounter legality checks.
//!
//! Two policies live here and they disagree on purpose:
//!
//! * [`Validator::is_method_valid_for_location`] is categorical. The label is
//!   canonicalized and candidate records are matched by loose label/rarity
//!   heuristics. Interactive forms use it to guide choices.
//! * [`Validator::validate_encounter`] is strict. It needs a raw record with
//!   the same trimmed method label and the exact region and area.
//!
//! A differently spelled label such as `"5X HORDE"` passes the categorical
//! check and fails the strict one.

use crate::catalogue::CatalogueStore;
use crate::taxonomy::{CanonicalMethod, canonicalize, supported_labels};
use crate::types::{RawLocationRecord, SpeciesId, non_blank};
use serde::Serialize;
use std::sync::Arc;

const SINGLE_LURE_RARITIES: [&str; 6] = [
    "very common",
    "common",
    "uncommon",
    "rare",
    "very rare",
    "lure",
];

fn rarity_is(record: &RawLocationRecord, wanted: &str) -> bool {
    record
        .rarity
        .as_deref()
        .is_some_and(|r| r.trim().eq_ignore_ascii_case(wanted))
}

/// Whether `record` can satisfy an encounter of category `method`.
pub(crate) fn record_matches(method: CanonicalMethod, record: &RawLocationRecord) -> bool {
    let label = record.method_label.to_lowercase();
    match method {
        CanonicalMethod::Horde => label.contains("horde") || rarity_is(record, "horde"),
        CanonicalMethod::SingleLures => record.rarity.as_deref().is_some_and(|r| {
            let r = r.trim().to_lowercase();
            SINGLE_LURE_RARITIES.contains(&r.as_str())
        }),
        CanonicalMethod::Fishing => {
            label.contains("rod")
                || label.contains("fishing")
                || ((label.contains("water") || label.contains("surf"))
                    && rarity_is(record, "lure"))
        }
        CanonicalMethod::Safari => label.contains("safari"),
        CanonicalMethod::Fossil => label.contains("fossil"),
        CanonicalMethod::Egg
        | CanonicalMethod::AlphaEgg
        | CanonicalMethod::Honey
        | CanonicalMethod::Unknown => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EncounterQuery {
    pub region: Option<String>,
    pub area: Option<String>,
    pub method: String,
}

impl EncounterQuery {
    pub fn new(method: impl AsRef<str>, region: Option<&str>, area: Option<&str>) -> Self {
        Self {
            region: region.map(ToString::to_string),
            area: area.map(ToString::to_string),
            method: method.as_ref().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub species_id: SpeciesId,
    pub canonical: CanonicalMethod,
    pub method_label: String,
    pub region: Option<String>,
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub diagnostic: Diagnostic,
}

#[derive(Debug, Clone)]
pub struct Validator {
    store: Arc<CatalogueStore>,
}

impl Validator {
    pub fn new(store: Arc<CatalogueStore>) -> Self {
        Self { store }
    }

    fn candidates<'a>(
        &'a self,
        id: SpeciesId,
        region: Option<&'a str>,
        area: Option<&'a str>,
    ) -> impl Iterator<Item = &'a RawLocationRecord> + 'a {
        self.store
            .list_raw_locations(id)
            .iter()
            .filter(move |r| r.is_usable() && r.place() == (region, area))
    }

    /// Categorical policy. See the module docs for how it differs from
    /// [`Validator::validate_encounter`].
    pub fn is_method_valid_for_location(
        &self,
        id: SpeciesId,
        region: Option<&str>,
        area: Option<&str>,
        method_label: &str,
    ) -> bool {
        let method = canonicalize(method_label);
        if !method.carries_location() {
            return false;
        }
        let region = non_blank(region);
        let area = non_blank(area);
        let found = self
            .candidates(id, region.as_deref(), area.as_deref())
            .any(|r| record_matches(method, r));
        found
    }

    /// Strict policy: exact raw-record match, no canonicalization.
    ///
    /// Only the method label is trimmed. Region and area must equal the
    /// stored values as given; a blank one means absent. Stored values are
    /// trimmed when the catalogue loads, so `" Hoenn"` never matches.
    pub fn validate_encounter(&self, id: SpeciesId, query: &EncounterQuery) -> bool {
        let method = query.method.trim();
        if method.is_empty() {
            return false;
        }
        let region = query.region.as_deref().filter(|v| !v.trim().is_empty());
        let area = query.area.as_deref().filter(|v| !v.trim().is_empty());
        let found = self
            .candidates(id, region, area)
            .any(|r| r.method_label.trim() == method);
        found
    }

    /// Categorical policy with the diagnostic record used by audits.
    pub fn diagnose(
        &self,
        id: SpeciesId,
        region: Option<&str>,
        area: Option<&str>,
        method_label: &str,
    ) -> ValidationOutcome {
        let canonical = canonicalize(method_label);
        let suggestions = if canonical.is_known() {
            Vec::new()
        } else {
            supported_labels()
        };
        ValidationOutcome {
            valid: self.is_method_valid_for_location(id, region, area, method_label),
            diagnostic: Diagnostic {
                species_id: id,
                canonical,
                method_label: method_label.to_string(),
                region: region.map(ToString::to_string),
                area: area.map(ToString::to_string),
                suggestions,
            },
        }
    }
}
