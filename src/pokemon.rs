use crate::battle::state::CombatantRef;
use crate::catalog::Catalog;
use crate::errors::{BattleResult, ConfigError};
use schema::{BaseStats, MoveData, PokemonType, StatType, StatusKind};
use serde::{Deserialize, Serialize};

pub const MIN_STAGE: i8 = -6;
pub const MAX_STAGE: i8 = 6;

/// Used when a combatant is built without an explicit move list.
pub const DEFAULT_MOVE: &str = "Tackle";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCondition {
    Paralysis,
    Burn,
    Poison,
    /// Stacking counter n; the next end-of-turn tick deals n/16.
    Toxic(u8),
    Freeze,
    /// Turns of sleep remaining.
    Sleep(u8),
}

impl StatusCondition {
    pub fn kind(&self) -> StatusKind {
        match self {
            StatusCondition::Paralysis => StatusKind::Paralysis,
            StatusCondition::Burn => StatusKind::Burn,
            StatusCondition::Poison => StatusKind::Poison,
            StatusCondition::Toxic(_) => StatusKind::Toxic,
            StatusCondition::Freeze => StatusKind::Freeze,
            StatusCondition::Sleep(_) => StatusKind::Sleep,
        }
    }

    pub fn is_poison(&self) -> bool {
        matches!(self, StatusCondition::Poison | StatusCondition::Toxic(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub raw: u16,
    pub stage: i8,
}

impl Stat {
    fn new(raw: u16) -> Self {
        Self { raw, stage: 0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveSlot {
    pub data: MoveData,
    pub pp: u8,
}

impl MoveSlot {
    pub fn new(data: MoveData) -> Self {
        let pp = data.max_pp;
        Self { data, pp }
    }
}

/// Per-battle counters cleared when the combatant leaves the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolatileState {
    pub confusion_turns: u8,
    pub taunt_turns: u8,
    pub infatuated_with: Option<CombatantRef>,
    pub flinched: bool,
    pub loafing: bool,
    /// Sturdy-style survival already used since this switch-in.
    pub last_stand_used: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub species: String,
    pub level: u8,
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    pub ivs: [u8; 6], // HP, ATK, DEF, SP.ATK, SP.DEF, SPD
    pub evs: [u8; 6],
    pub max_hp: u16,
    pub current_hp: u16,
    /// ATK, DEF, SP.ATK, SP.DEF, SPD
    pub stats: [Stat; 5],
    pub accuracy_stage: i8,
    pub evasion_stage: i8,
    pub status: Option<StatusCondition>,
    pub ability: String,
    /// Restored on switch-out after Trace or a similar copy replaced `ability`.
    pub original_ability: String,
    pub type_override: Option<PokemonType>,
    /// Type whose outgoing damage stays boosted for the rest of the battle once an
    /// absorb-and-boost ability fired. Survives switching out.
    pub type_boost: Option<PokemonType>,
    pub moves: [Option<MoveSlot>; 4],
    pub volatile: VolatileState,
}

fn stat_index(stat: StatType) -> Option<usize> {
    match stat {
        StatType::Attack => Some(0),
        StatType::Defense => Some(1),
        StatType::SpecialAttack => Some(2),
        StatType::SpecialDefense => Some(3),
        StatType::Speed => Some(4),
        StatType::Accuracy | StatType::Evasion => None,
    }
}

impl Combatant {
    /// Uses the Gen 3+ stat calculation formula without natures
    pub fn calculate_stats(base_stats: &BaseStats, level: u8, ivs: &[u8; 6], evs: &[u8; 6]) -> [u16; 6] {
        let base = base_stats.as_array();
        let mut stats = [0u16; 6];

        for i in 0..6 {
            let base_calculation = 2 * base[i] as u32 + ivs[i] as u32 + (evs[i] as u32 / 4);
            let scaled = base_calculation * level as u32 / 100;
            stats[i] = if i == 0 {
                // A base of 1 always yields exactly 1 HP
                if base[i] == 1 {
                    1
                } else {
                    (scaled + level as u32 + 10) as u16
                }
            } else {
                (scaled + 5) as u16
            };
        }

        stats
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn is_full_hp(&self) -> bool {
        self.current_hp == self.max_hp
    }

    /// Battle type: the override while one is set, otherwise the species' types.
    pub fn current_types(&self) -> Vec<PokemonType> {
        match self.type_override {
            Some(t) => vec![t],
            None => self.types.clone(),
        }
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.current_types().contains(&pokemon_type)
    }

    pub fn raw_stat(&self, stat: StatType) -> u16 {
        stat_index(stat).map(|i| self.stats[i].raw).unwrap_or(0)
    }

    pub fn stat_stage(&self, stat: StatType) -> i8 {
        match stat {
            StatType::Accuracy => self.accuracy_stage,
            StatType::Evasion => self.evasion_stage,
            other => stat_index(other).map(|i| self.stats[i].stage).unwrap_or(0),
        }
    }

    pub fn set_stat_stage(&mut self, stat: StatType, stage: i8) {
        let stage = stage.clamp(MIN_STAGE, MAX_STAGE);
        match stat {
            StatType::Accuracy => self.accuracy_stage = stage,
            StatType::Evasion => self.evasion_stage = stage,
            other => {
                if let Some(i) = stat_index(other) {
                    self.stats[i].stage = stage;
                }
            }
        }
    }

    /// `max_hp / denominator`, at least 1.
    pub fn hp_fraction(&self, denominator: u16) -> u16 {
        (self.max_hp / denominator).max(1)
    }

    pub fn move_slot(&self, slot: usize) -> Option<&MoveSlot> {
        self.moves.get(slot).and_then(|m| m.as_ref())
    }

    /// Leaving the field clears stages, volatiles, overrides and copied abilities.
    pub fn reset_on_switch_out(&mut self) {
        for stat in &mut self.stats {
            stat.stage = 0;
        }
        self.accuracy_stage = 0;
        self.evasion_stage = 0;
        self.volatile = VolatileState::default();
        self.type_override = None;
        self.ability = self.original_ability.clone();
        if let Some(StatusCondition::Toxic(_)) = self.status {
            self.status = Some(StatusCondition::Toxic(1));
        }
    }
}

/// Builds battle-ready combatants from catalog records.
///
/// # Example
/// ```
/// use pokemon_turn_engine::{Catalog, CombatantBuilder};
///
/// let catalog = Catalog::builtin().unwrap();
/// let pikachu = CombatantBuilder::new("Pikachu", 50)
///     .moves(["Thunderbolt", "Quick Attack"])
///     .build(&catalog)
///     .unwrap();
/// assert_eq!(pikachu.ability, "Static");
/// ```
#[derive(Debug, Clone)]
pub struct CombatantBuilder {
    species: String,
    level: u8,
    ivs: [u8; 6],
    evs: [u8; 6],
    ability: Option<String>,
    moves: Option<Vec<String>>,
}

impl CombatantBuilder {
    /// Defaults to perfect IVs and no EVs.
    pub fn new(species: &str, level: u8) -> Self {
        Self {
            species: species.to_string(),
            level,
            ivs: [31; 6],
            evs: [0; 6],
            ability: None,
            moves: None,
        }
    }

    pub fn ivs(mut self, ivs: [u8; 6]) -> Self {
        self.ivs = ivs.map(|iv| iv.min(31));
        self
    }

    pub fn evs(mut self, evs: [u8; 6]) -> Self {
        self.evs = evs;
        self
    }

    pub fn ability(mut self, ability: &str) -> Self {
        self.ability = Some(ability.to_string());
        self
    }

    pub fn moves<I, S>(mut self, moves: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.moves = Some(moves.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self, catalog: &Catalog) -> BattleResult<Combatant> {
        if !(1..=100).contains(&self.level) {
            return Err(ConfigError::InvalidLevel(self.level).into());
        }
        let species = catalog.lookup_species(&self.species)?;

        let move_names = self
            .moves
            .unwrap_or_else(|| vec![DEFAULT_MOVE.to_string()]);
        if move_names.is_empty() || move_names.len() > 4 {
            return Err(ConfigError::InvalidMoveCount {
                species: species.name.clone(),
                count: move_names.len(),
            }
            .into());
        }

        let mut moves: [Option<MoveSlot>; 4] = [const { None }; 4];
        for (slot, name) in move_names.iter().enumerate() {
            moves[slot] = Some(MoveSlot::new(catalog.lookup_move(name)?.clone()));
        }

        let ability = self
            .ability
            .or_else(|| species.default_ability().map(str::to_string))
            .unwrap_or_default();

        let stats = Combatant::calculate_stats(&species.base_stats, self.level, &self.ivs, &self.evs);

        Ok(Combatant {
            name: species.name.clone(),
            species: species.name.clone(),
            level: self.level,
            types: species.types.clone(),
            base_stats: species.base_stats.clone(),
            ivs: self.ivs,
            evs: self.evs,
            max_hp: stats[0],
            current_hp: stats[0],
            stats: [
                Stat::new(stats[1]),
                Stat::new(stats[2]),
                Stat::new(stats[3]),
                Stat::new(stats[4]),
                Stat::new(stats[5]),
            ],
            accuracy_stage: 0,
            evasion_stage: 0,
            status: None,
            original_ability: ability.clone(),
            ability,
            type_override: None,
            type_boost: None,
            moves,
            volatile: VolatileState::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{BattleEngineError, CatalogError};
    use pretty_assertions::assert_eq;

    #[test]
    fn level_100_bulbasaur_stats() {
        let catalog = Catalog::builtin().unwrap();
        let bulbasaur = CombatantBuilder::new("Bulbasaur", 100).build(&catalog).unwrap();
        // (2*45+31)*100/100 + 100 + 10
        assert_eq!(bulbasaur.max_hp, 231);
        assert_eq!(bulbasaur.raw_stat(StatType::Attack), 134);
        assert_eq!(bulbasaur.raw_stat(StatType::Defense), 134);
        assert_eq!(bulbasaur.ability, "Overgrow");
        assert_eq!(bulbasaur.move_slot(0).unwrap().data.name, "Tackle");
    }

    #[test]
    fn single_hp_species_stays_at_one() {
        let catalog = Catalog::builtin().unwrap();
        let shedinja = CombatantBuilder::new("Shedinja", 50).build(&catalog).unwrap();
        assert_eq!(shedinja.max_hp, 1);
    }

    #[test]
    fn overrides_apply() {
        let catalog = Catalog::builtin().unwrap();
        let pikachu = CombatantBuilder::new("Pikachu", 50)
            .ability("Lightning Rod")
            .moves(["Thunderbolt", "Quick Attack"])
            .build(&catalog)
            .unwrap();
        assert_eq!(pikachu.ability, "Lightning Rod");
        assert_eq!(pikachu.move_slot(1).unwrap().pp, 30);
        assert!(pikachu.move_slot(2).is_none());
    }

    #[test]
    fn unknown_move_propagates_lookup_failure() {
        let catalog = Catalog::builtin().unwrap();
        let err = CombatantBuilder::new("Pikachu", 50)
            .moves(["Thunderbolt", "Volt Tackle"])
            .build(&catalog)
            .unwrap_err();
        assert_eq!(
            err,
            BattleEngineError::Catalog(CatalogError::MoveNotFound("Volt Tackle".to_string()))
        );
    }

    #[test]
    fn stages_are_clamped_and_reset_on_switch_out() {
        let catalog = Catalog::builtin().unwrap();
        let mut pokemon = CombatantBuilder::new("Squirtle", 30).build(&catalog).unwrap();
        pokemon.set_stat_stage(StatType::Attack, 9);
        pokemon.set_stat_stage(StatType::Evasion, -8);
        assert_eq!(pokemon.stat_stage(StatType::Attack), MAX_STAGE);
        assert_eq!(pokemon.stat_stage(StatType::Evasion), MIN_STAGE);

        pokemon.status = Some(StatusCondition::Toxic(4));
        pokemon.ability = "Drizzle".to_string();
        pokemon.reset_on_switch_out();
        assert_eq!(pokemon.stat_stage(StatType::Attack), 0);
        assert_eq!(pokemon.stat_stage(StatType::Evasion), 0);
        assert_eq!(pokemon.status, Some(StatusCondition::Toxic(1)));
        assert_eq!(pokemon.ability, "Torrent");
    }
}
