use crate::error::CatalogueError;
use crate::normalize::fold_text;
use crate::types::{RawLocationRecord, SpeciesId, SpeciesRecord, SpeciesSummary};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CatalogueDocument {
    #[serde(default)]
    species: Vec<SpeciesRecord>,
}

/// Read-only species catalogue. Built once, then shared.
#[derive(Debug, Clone, Default)]
pub struct CatalogueStore {
    species: Vec<SpeciesRecord>,
    index: HashMap<SpeciesId, usize>,
}

impl CatalogueStore {
    pub fn from_species(species: Vec<SpeciesRecord>) -> Result<Self, CatalogueError> {
        let mut index = HashMap::with_capacity(species.len());
        for (pos, record) in species.iter().enumerate() {
            if record.id.get() == 0 {
                return Err(CatalogueError::InvalidSpeciesId(record.name.clone()));
            }
            if index.insert(record.id, pos).is_some() {
                return Err(CatalogueError::DuplicateSpecies(record.id));
            }
        }
        let store = Self { species, index };
        if store.is_empty() {
            tracing::warn!("catalogue has no species");
        }
        let locations: usize = store.species().map(|s| s.locations.len()).sum();
        tracing::info!(species = store.len(), locations, "catalogue loaded");
        Ok(store)
    }

    pub fn from_json_str(input: &str) -> Result<Self, CatalogueError> {
        let doc: CatalogueDocument = serde_json::from_str(input)?;
        Self::from_species(doc.species)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, CatalogueError> {
        let doc: CatalogueDocument = serde_yaml::from_str(input)?;
        Self::from_species(doc.species)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogueError> {
        let path_ref = path.as_ref();
        let raw = fs::read_to_string(path_ref).map_err(|source| CatalogueError::Io {
            path: path_ref.to_path_buf(),
            source,
        })?;
        let ext = path_ref
            .extension()
            .and_then(|v| v.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&raw),
            "json" => Self::from_json_str(&raw),
            _ => Err(CatalogueError::UnsupportedExtension(ext)),
        }
    }

    pub fn find_species(&self, id: SpeciesId) -> Option<&SpeciesRecord> {
        self.index.get(&id).map(|&pos| &self.species[pos])
    }

    pub fn find_species_by_name(&self, name: &str) -> Option<&SpeciesRecord> {
        let wanted = fold_text(name);
        if wanted.is_empty() {
            return None;
        }
        self.species.iter().find(|s| fold_text(&s.name) == wanted)
    }

    /// Species in load order.
    pub fn list_species(&self) -> Vec<SpeciesSummary> {
        self.species
            .iter()
            .map(|s| SpeciesSummary {
                id: s.id,
                name: s.name.clone(),
            })
            .collect()
    }

    pub fn list_raw_locations(&self, id: SpeciesId) -> &[RawLocationRecord] {
        self.find_species(id)
            .map(|s| s.locations.as_slice())
            .unwrap_or(&[])
    }

    pub fn species(&self) -> impl Iterator<Item = &SpeciesRecord> {
        self.species.iter()
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}
