//! Read-only species and move lookup.
//!
//! Records are keyed by a normalized id (lowercase ASCII alphanumerics), so "Double-Edge",
//! "double edge" and "doubleedge" all resolve to the same move. Species may also be looked up by
//! national dex number.

use crate::errors::{CatalogError, CatalogResult};
use schema::{MoveData, SpeciesData};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

const BUILTIN_SPECIES: &str = include_str!("../data/species.ron");
const BUILTIN_MOVES: &str = include_str!("../data/moves.ron");

/// Normalize a display name into a lookup id.
pub fn normalize_id(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    species: HashMap<String, SpeciesData>,
    species_by_dex: HashMap<u16, String>,
    moves: HashMap<String, MoveData>,
}

impl Catalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_ron_strs(BUILTIN_SPECIES, BUILTIN_MOVES)
    }

    pub fn from_ron_strs(species_ron: &str, moves_ron: &str) -> CatalogResult<Self> {
        let species: Vec<SpeciesData> = ron::from_str(species_ron)
            .map_err(|e| CatalogError::MalformedData(format!("species: {}", e)))?;
        let moves: Vec<MoveData> = ron::from_str(moves_ron)
            .map_err(|e| CatalogError::MalformedData(format!("moves: {}", e)))?;
        Self::from_records(species, moves)
    }

    /// Loads `species.ron` and `moves.ron` from a directory.
    pub fn load_from_dir(dir: &Path) -> CatalogResult<Self> {
        let read = |file: &str| {
            let path = dir.join(file);
            fs::read_to_string(&path).map_err(|e| CatalogError::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        };
        let species = read("species.ron")?;
        let moves = read("moves.ron")?;
        Self::from_ron_strs(&species, &moves)
    }

    pub fn from_records(species: Vec<SpeciesData>, moves: Vec<MoveData>) -> CatalogResult<Self> {
        let mut catalog = Catalog::default();

        for record in species {
            let id = normalize_id(&record.name);
            if record.types.is_empty() || record.types.len() > 2 {
                return Err(CatalogError::MalformedData(format!(
                    "species {} must have one or two types",
                    record.name
                )));
            }
            if catalog.species.contains_key(&id) {
                return Err(CatalogError::MalformedData(format!(
                    "duplicate species {}",
                    record.name
                )));
            }
            catalog.species_by_dex.insert(record.dex_number, id.clone());
            catalog.species.insert(id, record);
        }

        for record in moves {
            let id = normalize_id(&record.name);
            if catalog.moves.contains_key(&id) {
                return Err(CatalogError::MalformedData(format!(
                    "duplicate move {}",
                    record.name
                )));
            }
            catalog.moves.insert(id, record);
        }

        debug!(
            species = catalog.species.len(),
            moves = catalog.moves.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn lookup_species(&self, name: &str) -> CatalogResult<&SpeciesData> {
        self.species
            .get(&normalize_id(name))
            .ok_or_else(|| CatalogError::SpeciesNotFound(name.to_string()))
    }

    pub fn lookup_species_by_dex(&self, dex_number: u16) -> CatalogResult<&SpeciesData> {
        self.species_by_dex
            .get(&dex_number)
            .and_then(|id| self.species.get(id))
            .ok_or_else(|| CatalogError::SpeciesNotFound(format!("#{}", dex_number)))
    }

    pub fn lookup_move(&self, name: &str) -> CatalogResult<&MoveData> {
        self.moves
            .get(&normalize_id(name))
            .ok_or_else(|| CatalogError::MoveNotFound(name.to_string()))
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schema::{MoveCategory, PokemonType};

    #[test]
    fn builtin_catalog_parses() {
        let catalog = Catalog::builtin().expect("builtin catalog should parse");
        assert!(catalog.species_count() > 50);
        assert!(catalog.move_count() > 50);
    }

    #[test]
    fn lookups_ignore_case_and_punctuation() {
        let catalog = Catalog::builtin().unwrap();
        let edge = catalog.lookup_move("double edge").unwrap();
        assert_eq!(edge.name, "Double-Edge");
        assert_eq!(edge.effects.recoil, Some(33));

        let tackle = catalog.lookup_move("TACKLE").unwrap();
        assert_eq!(tackle.power, Some(40));
        assert_eq!(tackle.category, MoveCategory::Physical);
        assert!(tackle.contact);
    }

    #[test]
    fn species_by_dex_number() {
        let catalog = Catalog::builtin().unwrap();
        let bulbasaur = catalog.lookup_species_by_dex(1).unwrap();
        assert_eq!(bulbasaur.name, "Bulbasaur");
        assert_eq!(bulbasaur.types, vec![PokemonType::Grass, PokemonType::Poison]);
    }

    #[test]
    fn unknown_names_are_lookup_failures() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(
            catalog.lookup_species("Missingno").unwrap_err(),
            CatalogError::SpeciesNotFound("Missingno".to_string())
        );
        assert_eq!(
            catalog.lookup_move("Splash Dance").unwrap_err(),
            CatalogError::MoveNotFound("Splash Dance".to_string())
        );
    }

    #[test]
    fn loading_from_a_directory_matches_the_builtin_data() {
        let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let loaded = Catalog::load_from_dir(&data_dir).unwrap();
        let builtin = Catalog::builtin().unwrap();
        assert_eq!(loaded.species_count(), builtin.species_count());
        assert_eq!(loaded.move_count(), builtin.move_count());
        assert_eq!(loaded.lookup_move("Ember").unwrap(), builtin.lookup_move("Ember").unwrap());
    }

    #[test]
    fn missing_data_directory_is_an_io_error() {
        let err = Catalog::load_from_dir(Path::new("no/such/data")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn malformed_ron_is_reported() {
        let err = Catalog::from_ron_strs("[(", "[]").unwrap_err();
        assert!(matches!(err, CatalogError::MalformedData(_)));
    }
}
