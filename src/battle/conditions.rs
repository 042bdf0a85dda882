use crate::battle::rng::TurnRng;
use crate::battle::state::ActionFailureReason;
use crate::pokemon::{Combatant, StatusCondition};
use schema::{PokemonType, StatusKind};

pub const FULL_PARALYSIS_CHANCE: u8 = 25;
pub const THAW_CHANCE: u8 = 20;
pub const CONFUSION_SELF_HIT_CHANCE: u8 = 50;
pub const INFATUATION_CHANCE: u8 = 50;
pub const TAUNT_TURNS: u8 = 3;
const MAX_TOXIC_COUNTER: u8 = 15;

#[derive(Debug, Clone, PartialEq)]
pub enum PreActionOutcome {
    Proceed,
    /// The status ends and the holder acts this turn.
    Cured,
    Blocked(ActionFailureReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTick {
    Unchanged,
    Progress(StatusCondition),
    Cure,
}

/// Behaviour intrinsic to a major status, dispatched like an ability.
pub trait ConditionHooks: Sync {
    fn kind(&self) -> StatusKind;

    fn before_action(&self, _status: StatusCondition, _rng: &mut TurnRng) -> PreActionOutcome {
        PreActionOutcome::Proceed
    }

    /// HP lost at the end of the turn.
    fn end_of_turn_damage(&self, _status: StatusCondition, _holder: &Combatant) -> Option<u16> {
        None
    }

    fn end_of_turn_tick(&self, _status: StatusCondition) -> StatusTick {
        StatusTick::Unchanged
    }

    /// Types that can never carry this status.
    fn immune_types(&self) -> &'static [PokemonType] {
        &[]
    }
}

struct Paralysis;

impl ConditionHooks for Paralysis {
    fn kind(&self) -> StatusKind {
        StatusKind::Paralysis
    }

    fn before_action(&self, _status: StatusCondition, rng: &mut TurnRng) -> PreActionOutcome {
        if rng.chance(FULL_PARALYSIS_CHANCE, "full paralysis") {
            PreActionOutcome::Blocked(ActionFailureReason::IsParalyzed)
        } else {
            PreActionOutcome::Proceed
        }
    }

    fn immune_types(&self) -> &'static [PokemonType] {
        &[PokemonType::Electric]
    }
}

struct Burn;

impl ConditionHooks for Burn {
    fn kind(&self) -> StatusKind {
        StatusKind::Burn
    }

    fn end_of_turn_damage(&self, _status: StatusCondition, holder: &Combatant) -> Option<u16> {
        Some(holder.hp_fraction(8))
    }

    fn immune_types(&self) -> &'static [PokemonType] {
        &[PokemonType::Fire]
    }
}

struct Poison;

impl ConditionHooks for Poison {
    fn kind(&self) -> StatusKind {
        StatusKind::Poison
    }

    fn end_of_turn_damage(&self, _status: StatusCondition, holder: &Combatant) -> Option<u16> {
        Some(holder.hp_fraction(8))
    }

    fn immune_types(&self) -> &'static [PokemonType] {
        &[PokemonType::Poison, PokemonType::Steel]
    }
}

struct Toxic;

impl ConditionHooks for Toxic {
    fn kind(&self) -> StatusKind {
        StatusKind::Toxic
    }

    fn end_of_turn_damage(&self, status: StatusCondition, holder: &Combatant) -> Option<u16> {
        let counter = match status {
            StatusCondition::Toxic(n) => n.max(1) as u32,
            _ => 1,
        };
        Some(((holder.max_hp as u32 * counter / 16).max(1)) as u16)
    }

    fn end_of_turn_tick(&self, status: StatusCondition) -> StatusTick {
        match status {
            StatusCondition::Toxic(n) if n < MAX_TOXIC_COUNTER => {
                StatusTick::Progress(StatusCondition::Toxic(n + 1))
            }
            _ => StatusTick::Unchanged,
        }
    }

    fn immune_types(&self) -> &'static [PokemonType] {
        &[PokemonType::Poison, PokemonType::Steel]
    }
}

struct Freeze;

impl ConditionHooks for Freeze {
    fn kind(&self) -> StatusKind {
        StatusKind::Freeze
    }

    fn before_action(&self, _status: StatusCondition, rng: &mut TurnRng) -> PreActionOutcome {
        if rng.chance(THAW_CHANCE, "thaw") {
            PreActionOutcome::Cured
        } else {
            PreActionOutcome::Blocked(ActionFailureReason::IsFrozen)
        }
    }

    fn immune_types(&self) -> &'static [PokemonType] {
        &[PokemonType::Ice]
    }
}

/// Sleep skips every action while turns remain; the counter drops at end of turn.
struct Sleep;

impl ConditionHooks for Sleep {
    fn kind(&self) -> StatusKind {
        StatusKind::Sleep
    }

    fn before_action(&self, status: StatusCondition, _rng: &mut TurnRng) -> PreActionOutcome {
        match status {
            StatusCondition::Sleep(0) => PreActionOutcome::Cured,
            _ => PreActionOutcome::Blocked(ActionFailureReason::IsAsleep),
        }
    }

    fn end_of_turn_tick(&self, status: StatusCondition) -> StatusTick {
        match status {
            StatusCondition::Sleep(turns) if turns > 1 => {
                StatusTick::Progress(StatusCondition::Sleep(turns - 1))
            }
            _ => StatusTick::Cure,
        }
    }
}

static PARALYSIS: Paralysis = Paralysis;
static BURN: Burn = Burn;
static POISON: Poison = Poison;
static TOXIC: Toxic = Toxic;
static FREEZE: Freeze = Freeze;
static SLEEP: Sleep = Sleep;

pub fn condition_hooks(kind: StatusKind) -> &'static dyn ConditionHooks {
    match kind {
        StatusKind::Paralysis => &PARALYSIS,
        StatusKind::Burn => &BURN,
        StatusKind::Poison => &POISON,
        StatusKind::Toxic => &TOXIC,
        StatusKind::Freeze => &FREEZE,
        StatusKind::Sleep => &SLEEP,
    }
}

/// Fresh status value for an infliction. Sleep draws its duration here.
pub fn new_status(kind: StatusKind, rng: &mut TurnRng) -> StatusCondition {
    match kind {
        StatusKind::Paralysis => StatusCondition::Paralysis,
        StatusKind::Burn => StatusCondition::Burn,
        StatusKind::Poison => StatusCondition::Poison,
        StatusKind::Toxic => StatusCondition::Toxic(1),
        StatusKind::Freeze => StatusCondition::Freeze,
        StatusKind::Sleep => StatusCondition::Sleep(rng.range(1, 3, "sleep duration")),
    }
}

pub fn type_blocks_status(combatant: &Combatant, kind: StatusKind) -> bool {
    condition_hooks(kind)
        .immune_types()
        .iter()
        .any(|&t| combatant.has_type(t))
}

pub fn confusion_duration(rng: &mut TurnRng) -> u8 {
    rng.range(2, 5, "confusion duration")
}

pub fn confusion_self_hit(rng: &mut TurnRng) -> bool {
    rng.chance(CONFUSION_SELF_HIT_CHANCE, "confusion self-hit")
}

pub fn infatuation_blocks(rng: &mut TurnRng) -> bool {
    rng.chance(INFATUATION_CHANCE, "infatuation")
}
