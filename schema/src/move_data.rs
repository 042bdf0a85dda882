use crate::{PokemonType, StatType, Weather};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MoveTarget {
    User,
    #[default]
    Opponent,
}

/// Major status a move may inflict. Toxic and sleep counters are chosen at infliction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum StatusKind {
    Paralysis,
    Burn,
    Poison,
    Toxic,
    Freeze,
    Sleep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum VolatileKind {
    Confusion,
    Taunt,
    Infatuation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatChange {
    #[serde(default)]
    pub target: MoveTarget,
    pub stat: StatType,
    pub stages: i8,
}

/// Secondary payload of a move. Every field is optional in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MoveEffects {
    /// Percentage chance for the secondary effects. `None` means they always apply.
    pub chance: Option<u8>,
    pub status: Option<StatusKind>,
    pub volatile: Option<VolatileKind>,
    pub stat_changes: Vec<StatChange>,
    /// Percentage of damage dealt taken back by the attacker.
    pub recoil: Option<u8>,
    /// Percentage of damage dealt restored to the attacker.
    pub drain: Option<u8>,
    /// Percentage chance of flinching the target.
    pub flinch: Option<u8>,
    /// Percentage of max HP restored to the user.
    pub heal: Option<u8>,
    pub weather: Option<Weather>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub name: String,
    pub power: Option<u16>,
    /// `None` never misses.
    pub accuracy: Option<u8>,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    pub max_pp: u8,
    #[serde(default)]
    pub priority: i8,
    #[serde(default)]
    pub target: MoveTarget,
    #[serde(default)]
    pub contact: bool,
    #[serde(default)]
    pub high_crit: bool,
    #[serde(default)]
    pub effects: MoveEffects,
}

impl MoveData {
    pub fn is_status(&self) -> bool {
        self.category == MoveCategory::Status
    }

    pub fn deals_damage(&self) -> bool {
        !self.is_status() && self.power.is_some_and(|p| p > 0)
    }

    /// True when the move lowers the opponent's speed or raises the user's.
    pub fn corrects_speed(&self) -> bool {
        self.effects.stat_changes.iter().any(|change| {
            change.stat == StatType::Speed
                && match change.target {
                    MoveTarget::Opponent => change.stages < 0,
                    MoveTarget::User => change.stages > 0,
                }
        })
    }
}
