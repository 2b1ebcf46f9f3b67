use crate::catalogue::CatalogueStore;
use crate::taxonomy::canonicalize;
use crate::types::{RawLocationRecord, SpeciesId};
use crate::validator::record_matches;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

pub const UNKNOWN_REGION: &str = "Unknown Region";
pub const UNKNOWN_AREA: &str = "UNKNOWN AREA";
const LABEL_SEPARATOR: &str = " \u{2014} ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationOption {
    pub key: String,
    pub label: String,
    pub region: Option<String>,
    pub area: Option<String>,
    pub method_label: String,
    pub rarity: Option<String>,
}

impl LocationOption {
    fn from_record(key: String, record: &RawLocationRecord) -> Self {
        Self {
            key,
            label: format_location_label(record.region.as_deref(), record.area.as_deref()),
            region: record.region.clone(),
            area: record.area.clone(),
            method_label: record.method_label.trim().to_string(),
            rarity: record.rarity.clone(),
        }
    }
}

pub fn format_location_label(region: Option<&str>, area: Option<&str>) -> String {
    let region = region.unwrap_or(UNKNOWN_REGION);
    let area = area
        .map(str::to_uppercase)
        .unwrap_or_else(|| UNKNOWN_AREA.to_string());
    format!("{region}{LABEL_SEPARATOR}{area}")
}

type Entry<'a> = (Option<&'a str>, Option<&'a str>, &'a str, Option<&'a str>);

fn entry_of(record: &RawLocationRecord) -> Entry<'_> {
    (
        record.region.as_deref(),
        record.area.as_deref(),
        record.method_label.trim(),
        record.rarity.as_deref(),
    )
}

// Display only. `|` can occur inside a field, so dedup compares the tuples.
fn place_key(record: &RawLocationRecord) -> String {
    format!(
        "{}|{}",
        record.region.as_deref().unwrap_or_default(),
        record.area.as_deref().unwrap_or_default()
    )
}

fn full_key(record: &RawLocationRecord) -> String {
    format!(
        "{}|{}|{}",
        place_key(record),
        record.method_label.trim(),
        record.rarity.as_deref().unwrap_or_default()
    )
}

/// Derives selectable locations from the raw catalogue records.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    store: Arc<CatalogueStore>,
}

impl LocationResolver {
    pub fn new(store: Arc<CatalogueStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CatalogueStore {
        &self.store
    }

    fn usable_records(&self, id: SpeciesId) -> impl Iterator<Item = &RawLocationRecord> {
        self.store
            .list_raw_locations(id)
            .iter()
            .filter(|r| r.is_usable())
    }

    /// Every distinct (region, area, method, rarity) entry, first-seen order.
    pub fn get_valid_locations(&self, id: SpeciesId) -> Vec<LocationOption> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for record in self.usable_records(id) {
            if seen.insert(entry_of(record)) {
                out.push(LocationOption::from_record(full_key(record), record));
            }
        }
        out
    }

    /// Locations reachable with `method_label`, one entry per (region, area).
    pub fn get_locations_for_method(
        &self,
        id: SpeciesId,
        method_label: &str,
    ) -> Vec<LocationOption> {
        let method = canonicalize(method_label);
        if !method.carries_location() {
            return Vec::new();
        }
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for record in self.usable_records(id).filter(|r| record_matches(method, r)) {
            if seen.insert(record.place()) {
                out.push(LocationOption::from_record(place_key(record), record));
            }
        }
        out
    }

    pub fn get_methods_for_species(&self, id: SpeciesId) -> Vec<String> {
        let mut seen = HashSet::new();
        self.usable_records(id)
            .map(|r| r.method_label.trim().to_string())
            .filter(|label| seen.insert(label.clone()))
            .collect()
    }

    /// Distinct (region, area) pairs across the species' usable records.
    pub fn distinct_places(&self, id: SpeciesId) -> Vec<(Option<String>, Option<String>)> {
        let mut seen = HashSet::new();
        self.usable_records(id)
            .filter(|&r| seen.insert(r.place()))
            .map(|r| (r.region.clone(), r.area.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::tests::fixture_store;
    use crate::types::SpeciesRecord;

    fn resolver() -> LocationResolver {
        LocationResolver::new(Arc::new(fixture_store()))
    }

    const BELDUM: SpeciesId = SpeciesId::new(374);
    const MAGIKARP: SpeciesId = SpeciesId::new(129);

    #[test]
    fn label_formatting_uses_placeholders() {
        assert_eq!(
            format_location_label(Some("Hoenn"), Some("Meteor Falls")),
            "Hoenn \u{2014} METEOR FALLS"
        );
        assert_eq!(
            format_location_label(None, None),
            "Unknown Region \u{2014} UNKNOWN AREA"
        );
    }

    #[test]
    fn valid_locations_dedup_on_full_key() {
        let options = resolver().get_valid_locations(BELDUM);
        let keys: Vec<&str> = options.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "Hoenn|METEOR FALLS|Single/Lures|rare",
                "Hoenn|METEOR FALLS|5x Horde|horde",
                "Hoenn|METEOR FALLS|Single/Lures|very rare",
            ]
        );
    }

    #[test]
    fn valid_locations_skip_blank_methods() {
        let options = resolver().get_valid_locations(BELDUM);
        assert!(options.iter().all(|o| o.area.as_deref() != Some("GRANITE CAVE")));
    }

    #[test]
    fn no_duplicate_keys_for_any_species() {
        let resolver = resolver();
        for species in resolver.store().list_species() {
            let full = resolver.get_valid_locations(species.id);
            let unique: HashSet<_> = full
                .iter()
                .map(|o| (&o.region, &o.area, &o.method_label, &o.rarity))
                .collect();
            assert_eq!(unique.len(), full.len());

            for method in resolver.get_methods_for_species(species.id) {
                let scoped = resolver.get_locations_for_method(species.id, &method);
                let unique: HashSet<_> = scoped.iter().map(|o| (&o.region, &o.area)).collect();
                assert_eq!(unique.len(), scoped.len());
            }
        }
    }

    #[test]
    fn method_scoped_view_collapses_rarity_variants() {
        let options = resolver().get_locations_for_method(BELDUM, "Single/Lures");
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].key, "Hoenn|METEOR FALLS");
        assert_eq!(options[0].label, "Hoenn \u{2014} METEOR FALLS");
        assert_eq!(options[0].rarity.as_deref(), Some("rare"));
    }

    #[test]
    fn method_scoped_view_uses_category_not_label() {
        let options = resolver().get_locations_for_method(MAGIKARP, "Super Rod");
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Kanto \u{2014} ROUTE 4",
                "Johto \u{2014} LAKE OF RAGE",
                "Unova \u{2014} ROUTE 17",
                "Unknown Region \u{2014} UNKNOWN AREA",
            ]
        );
    }

    #[test]
    fn method_scoped_view_is_empty_for_egg_and_unknown() {
        let resolver = resolver();
        assert!(resolver.get_locations_for_method(BELDUM, "Egg Hunt").is_empty());
        assert!(resolver.get_locations_for_method(BELDUM, "Teleport").is_empty());
        assert!(resolver.get_locations_for_method(BELDUM, "").is_empty());
    }

    #[test]
    fn separator_in_fields_does_not_merge_places() {
        let store = CatalogueStore::from_species(vec![
            SpeciesRecord::new(25u32, "Pikachu")
                .with_location(RawLocationRecord::new(
                    "Single/Lures",
                    Some("A|B"),
                    Some("C"),
                    Some("common"),
                ))
                .with_location(RawLocationRecord::new(
                    "Single/Lures",
                    Some("A"),
                    Some("B|C"),
                    Some("common"),
                )),
        ])
        .unwrap();
        let resolver = LocationResolver::new(Arc::new(store));
        let pikachu = SpeciesId::new(25);

        let full = resolver.get_valid_locations(pikachu);
        assert_eq!(full.len(), 2);
        assert_eq!(full[0].key, full[1].key);

        let scoped = resolver.get_locations_for_method(pikachu, "Single/Lures");
        let places: Vec<(Option<&str>, Option<&str>)> = scoped
            .iter()
            .map(|o| (o.region.as_deref(), o.area.as_deref()))
            .collect();
        assert_eq!(places, vec![(Some("A|B"), Some("C")), (Some("A"), Some("B|C"))]);
        assert_eq!(resolver.distinct_places(pikachu).len(), 2);
    }

    #[test]
    fn methods_listed_in_first_seen_order() {
        let resolver = resolver();
        assert_eq!(
            resolver.get_methods_for_species(BELDUM),
            vec!["Single/Lures".to_string(), "5x Horde".to_string()]
        );
        assert_eq!(
            resolver.get_methods_for_species(MAGIKARP),
            vec!["Old Rod", "Good Rod", "Super Rod", "Surfing", "Fishing"]
        );
    }

    #[test]
    fn unknown_species_yields_empty_views() {
        let resolver = resolver();
        let missing = SpeciesId::new(4242);
        assert!(resolver.get_valid_locations(missing).is_empty());
        assert!(resolver.get_locations_for_method(missing, "Fishing").is_empty());
        assert!(resolver.get_methods_for_species(missing).is_empty());
        assert!(resolver.distinct_places(missing).is_empty());
    }

    #[test]
    fn distinct_places_exclude_blank_method_records() {
        let places = resolver().distinct_places(BELDUM);
        assert_eq!(
            places,
            vec![(Some("Hoenn".to_string()), Some("METEOR FALLS".to_string()))]
        );
    }
}
