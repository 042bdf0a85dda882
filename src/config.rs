//! Battle setup files.
//!
//! A battle is described in RON: an id, an optional RNG seed, and one roster per side. Building
//! the config against a [`Catalog`] resolves every species and move name and yields a
//! [`BattleState`] ready for `start_battle`.
//!
//! ```ron
//! (
//!     battle_id: "exhibition",
//!     seed: Some(42),
//!     host: (
//!         name: "Red",
//!         roster: [
//!             (species: "Pikachu", level: 50, moves: ["Thunderbolt", "Quick Attack"]),
//!         ],
//!     ),
//!     client: (
//!         name: "Blue",
//!         roster: [
//!             (species: "Gyarados", level: 50, ability: Some("Intimidate"), moves: ["Waterfall"]),
//!         ],
//!     ),
//! )
//! ```

use crate::battle::rng::TurnRng;
use crate::battle::state::{BattleState, Side};
use crate::catalog::Catalog;
use crate::errors::{BattleResult, ConfigError};
use crate::pokemon::{Combatant, CombatantBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantSpec {
    pub species: String,
    pub level: u8,
    /// Defaults to perfect IVs.
    #[serde(default)]
    pub ivs: Option<[u8; 6]>,
    #[serde(default)]
    pub evs: Option<[u8; 6]>,
    /// Defaults to the species' first listed ability.
    #[serde(default)]
    pub ability: Option<String>,
    pub moves: Vec<String>,
}

impl CombatantSpec {
    pub fn build(&self, catalog: &Catalog) -> BattleResult<Combatant> {
        if self.moves.is_empty() || self.moves.len() > 4 {
            return Err(ConfigError::InvalidMoveCount {
                species: self.species.clone(),
                count: self.moves.len(),
            }
            .into());
        }
        let mut builder = CombatantBuilder::new(&self.species, self.level).moves(self.moves.iter().cloned());
        if let Some(ivs) = self.ivs {
            builder = builder.ivs(ivs);
        }
        if let Some(evs) = self.evs {
            builder = builder.evs(evs);
        }
        if let Some(ability) = &self.ability {
            builder = builder.ability(ability);
        }
        builder.build(catalog)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideConfig {
    pub name: String,
    pub roster: Vec<CombatantSpec>,
}

impl SideConfig {
    fn build(&self, catalog: &Catalog) -> BattleResult<Side> {
        let roster = self
            .roster
            .iter()
            .map(|spec| spec.build(catalog))
            .collect::<BattleResult<Vec<_>>>()?;
        Side::new(&self.name, roster)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleConfig {
    pub battle_id: String,
    /// `None` seeds from system entropy, which makes the battle unreproducible.
    #[serde(default)]
    pub seed: Option<u64>,
    pub host: SideConfig,
    pub client: SideConfig,
}

impl BattleConfig {
    pub fn from_ron_str(text: &str) -> BattleResult<Self> {
        ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    pub fn load(path: &Path) -> BattleResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_ron_str(&text)
    }

    pub fn build(&self, catalog: &Catalog) -> BattleResult<BattleState> {
        let host = self.host.build(catalog)?;
        let client = self.client.build(catalog)?;
        let rng = match self.seed {
            Some(seed) => TurnRng::seeded(seed),
            None => TurnRng::new_random(),
        };
        info!(
            battle_id = %self.battle_id,
            seed = ?self.seed,
            host = host.roster.len(),
            client = client.roster.len(),
            "battle configured"
        );
        Ok(BattleState::new(&self.battle_id, host, client, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{BattleEngineError, CatalogError};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const EXHIBITION: &str = r#"(
        battle_id: "exhibition",
        seed: Some(42),
        host: (
            name: "Red",
            roster: [
                (species: "Pikachu", level: 50, moves: ["Thunderbolt", "Quick Attack"]),
                (species: "Bulbasaur", level: 48, ivs: Some((0, 0, 0, 0, 0, 0)), moves: ["Vine Whip"]),
            ],
        ),
        client: (
            name: "Blue",
            roster: [
                (species: "Pikachu", level: 50, ability: Some("Lightning Rod"), moves: ["Thunderbolt"]),
            ],
        ),
    )"#;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn builds_a_ready_battle() {
        let config = BattleConfig::from_ron_str(EXHIBITION).unwrap();
        let state = config.build(&catalog()).unwrap();

        assert_eq!(state.battle_id, "exhibition");
        assert_eq!(state.turn_number, 1);
        assert_eq!(state.sides[0].name, "Red");
        assert_eq!(state.sides[0].roster.len(), 2);
        assert_eq!(state.sides[0].roster[0].ability, "Static");
        assert_eq!(state.sides[0].roster[1].ivs, [0; 6]);
        assert_eq!(state.sides[1].roster[0].ability, "Lightning Rod");
    }

    #[test]
    fn the_same_seed_gives_the_same_stream() {
        let config = BattleConfig::from_ron_str(EXHIBITION).unwrap();
        let mut first = config.build(&catalog()).unwrap().rng;
        let mut second = config.build(&catalog()).unwrap().rng;
        let a: Vec<u8> = (0..16).map(|_| first.next_outcome("test")).collect();
        let b: Vec<u8> = (0..16).map(|_| second.next_outcome("test")).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_species_propagates_the_lookup_failure() {
        let text = EXHIBITION.replace("Bulbasaur", "Missingno");
        let err = BattleConfig::from_ron_str(&text).unwrap().build(&catalog()).unwrap_err();
        assert_eq!(
            err,
            BattleEngineError::Catalog(CatalogError::SpeciesNotFound("Missingno".to_string()))
        );
    }

    #[rstest]
    #[case(r#"["Tackle", "Growl", "Leer", "Scratch", "Ember"]"#, 5)]
    #[case("[]", 0)]
    fn move_count_is_checked(#[case] moves: &str, #[case] count: usize) {
        let text = EXHIBITION.replace(r#"["Vine Whip"]"#, moves);
        let err = BattleConfig::from_ron_str(&text).unwrap().build(&catalog()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidMoveCount {
                species: "Bulbasaur".to_string(),
                count,
            }
            .into()
        );
    }

    #[test]
    fn malformed_text_is_a_parse_error() {
        let err = BattleConfig::from_ron_str("(battle_id: 7)").unwrap_err();
        assert!(matches!(err, BattleEngineError::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = BattleConfig::load(Path::new("does/not/exist.ron")).unwrap_err();
        assert!(matches!(err, BattleEngineError::Config(ConfigError::Io { .. })));
    }
}
