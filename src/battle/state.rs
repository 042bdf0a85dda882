use crate::battle::rng::TurnRng;
use crate::errors::{BattleResult, BattleStateError};
use crate::pokemon::{Combatant, StatusCondition};
use schema::{PokemonType, StatType, StatusKind, VolatileKind, Weather};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_ROSTER_SIZE: usize = 6;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SideId {
    Host,
    Client,
}

impl SideId {
    pub const BOTH: [SideId; 2] = [SideId::Host, SideId::Client];

    pub fn to_index(self) -> usize {
        match self {
            SideId::Host => 0,
            SideId::Client => 1,
        }
    }

    pub fn opponent(self) -> SideId {
        match self {
            SideId::Host => SideId::Client,
            SideId::Client => SideId::Host,
        }
    }
}

/// A roster entry on one side.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CombatantRef {
    pub side: SideId,
    pub slot: usize,
}

impl CombatantRef {
    pub fn new(side: SideId, slot: usize) -> Self {
        Self { side, slot }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Side {
    pub name: String,
    pub roster: Vec<Combatant>,
    pub active: usize,
    /// The active combatant fainted and a replacement is owed.
    pub pending_replacement: bool,
    pub defeated: bool,
}

impl Side {
    pub fn new(name: &str, roster: Vec<Combatant>) -> BattleResult<Self> {
        if roster.is_empty() || roster.len() > MAX_ROSTER_SIZE {
            return Err(BattleStateError::InvalidRosterSize(roster.len()).into());
        }
        let active = roster.iter().position(|c| !c.is_fainted()).unwrap_or(0);
        let defeated = roster.iter().all(Combatant::is_fainted);
        Ok(Self {
            name: name.to_string(),
            roster,
            active,
            pending_replacement: false,
            defeated,
        })
    }

    pub fn has_living_reserve(&self) -> bool {
        self.roster
            .iter()
            .enumerate()
            .any(|(slot, c)| slot != self.active && !c.is_fainted())
    }
}

/// Field state shared by both sides.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Field {
    pub weather: Option<Weather>,
    /// Turns left for move-set weather; `None` lasts indefinitely.
    pub weather_turns: Option<u8>,
    /// Active combatants currently nullifying weather effects. The underlying weather is kept.
    pub suppressors: Vec<CombatantRef>,
}

impl Field {
    /// Weather as seen by gameplay effects.
    pub fn effective_weather(&self) -> Option<Weather> {
        if self.suppressors.is_empty() {
            self.weather
        } else {
            None
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Winner(SideId),
    Draw,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Attack { side: SideId, move_slot: usize },
    Switch { side: SideId, roster_slot: usize },
}

impl Action {
    pub fn side(&self) -> SideId {
        match self {
            Action::Attack { side, .. } | Action::Switch { side, .. } => *side,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Attack { side, move_slot } => write!(f, "{:?} attacks with move {}", side, move_slot),
            Action::Switch { side, roster_slot } => write!(f, "{:?} switches to {}", side, roster_slot),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleState {
    pub battle_id: String,
    pub sides: [Side; 2],
    pub field: Field,
    pub turn_number: u32,
    pub rng: TurnRng,
}

impl BattleState {
    pub fn new(id: &str, host: Side, client: Side, rng: TurnRng) -> Self {
        Self {
            battle_id: id.to_string(),
            sides: [host, client],
            field: Field::default(),
            turn_number: 1,
            rng,
        }
    }

    pub fn side(&self, side: SideId) -> &Side {
        &self.sides[side.to_index()]
    }

    pub fn side_mut(&mut self, side: SideId) -> &mut Side {
        &mut self.sides[side.to_index()]
    }

    pub fn active_ref(&self, side: SideId) -> CombatantRef {
        CombatantRef::new(side, self.side(side).active)
    }

    pub fn combatant(&self, target: CombatantRef) -> BattleResult<&Combatant> {
        self.side(target.side)
            .roster
            .get(target.slot)
            .ok_or_else(|| invalid_slot(target).into())
    }

    pub fn combatant_mut(&mut self, target: CombatantRef) -> BattleResult<&mut Combatant> {
        self.side_mut(target.side)
            .roster
            .get_mut(target.slot)
            .ok_or_else(|| invalid_slot(target).into())
    }

    pub fn active(&self, side: SideId) -> BattleResult<&Combatant> {
        self.combatant(self.active_ref(side))
    }

    pub fn is_active(&self, target: CombatantRef) -> bool {
        self.side(target.side).active == target.slot
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        match (self.sides[0].defeated, self.sides[1].defeated) {
            (true, true) => Some(BattleOutcome::Draw),
            (true, false) => Some(BattleOutcome::Winner(SideId::Client)),
            (false, true) => Some(BattleOutcome::Winner(SideId::Host)),
            (false, false) => None,
        }
    }

    /// Sides owed a forced switch before the next regular turn.
    pub fn awaiting_replacement(&self) -> Vec<SideId> {
        SideId::BOTH
            .into_iter()
            .filter(|&side| self.side(side).pending_replacement && !self.side(side).defeated)
            .collect()
    }
}

fn invalid_slot(target: CombatantRef) -> BattleStateError {
    BattleStateError::InvalidRosterSlot {
        side: target.side,
        slot: target.slot,
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ActionFailureReason {
    IsAsleep,
    IsFrozen,
    IsParalyzed,
    IsFlinching,
    IsConfused,
    IsInfatuated,
    IsLoafing,
    TauntBlocked,
    IsTrapped { by: String },
    NoTarget,
    /// An ability or type made the target immune.
    NoEffect,
    AlreadyInEffect,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum StatChangeBlockReason {
    Ability(String),
    AtMaximum,
    AtMinimum,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum IndirectCause {
    Recoil,
    Weather(Weather),
    Status(StatusKind),
    Ability(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum WeatherSource {
    Ability { holder: CombatantRef, ability: String },
    Move { user: CombatantRef },
    Expired,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum VolatileStatus {
    Confusion { turns: u8 },
    Taunt { turns: u8 },
    Infatuation { with: CombatantRef },
}

impl VolatileStatus {
    pub fn kind(&self) -> VolatileKind {
        match self {
            VolatileStatus::Confusion { .. } => VolatileKind::Confusion,
            VolatileStatus::Taunt { .. } => VolatileKind::Taunt,
            VolatileStatus::Infatuation { .. } => VolatileKind::Infatuation,
        }
    }
}

/// One atomic state change. Every field is an absolute value, so applying an event never
/// re-derives a random outcome.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn management
    TurnStarted {
        turn_number: u32,
    },
    TurnEnded {
        turn_number: u32,
    },
    RngAdvanced {
        cursor: u64,
    },

    // Moves
    MoveUsed {
        user: CombatantRef,
        move_name: String,
    },
    PpDecremented {
        user: CombatantRef,
        move_slot: usize,
        remaining: u8,
    },
    MoveMissed {
        user: CombatantRef,
        target: CombatantRef,
    },
    CriticalHit {
        target: CombatantRef,
    },
    TypeEffectiveness {
        target: CombatantRef,
        multiplier: f32,
    },

    // Hit points
    DamageDealt {
        target: CombatantRef,
        amount: u16,
        remaining_hp: u16,
    },
    IndirectDamage {
        target: CombatantRef,
        cause: IndirectCause,
        amount: u16,
        remaining_hp: u16,
    },
    Healed {
        target: CombatantRef,
        amount: u16,
        new_hp: u16,
    },

    // Major status
    StatusInflicted {
        target: CombatantRef,
        status: StatusCondition,
    },
    StatusProgressed {
        target: CombatantRef,
        status: StatusCondition,
    },
    StatusCured {
        target: CombatantRef,
        status: StatusCondition,
    },

    // Stages
    StatStageChanged {
        target: CombatantRef,
        stat: StatType,
        old_stage: i8,
        new_stage: i8,
    },
    StatChangeBlocked {
        target: CombatantRef,
        stat: StatType,
        reason: StatChangeBlockReason,
    },

    // Volatile conditions
    VolatileApplied {
        target: CombatantRef,
        volatile: VolatileStatus,
    },
    VolatileTicked {
        target: CombatantRef,
        volatile: VolatileKind,
        remaining: u8,
    },
    VolatileEnded {
        target: CombatantRef,
        volatile: VolatileKind,
    },
    Flinched {
        target: CombatantRef,
    },
    FlinchCleared {
        target: CombatantRef,
    },
    LoafingSet {
        target: CombatantRef,
        loafing: bool,
    },

    // Field
    WeatherChanged {
        weather: Option<Weather>,
        source: WeatherSource,
        turns: Option<u8>,
    },
    WeatherTicked {
        remaining: u8,
    },
    WeatherSuppressorAdded {
        holder: CombatantRef,
    },
    WeatherSuppressorRemoved {
        holder: CombatantRef,
    },

    // Abilities
    AbilityTriggered {
        holder: CombatantRef,
        ability: String,
    },
    AbilityChanged {
        holder: CombatantRef,
        ability: String,
    },
    TypeOverrideSet {
        holder: CombatantRef,
        override_type: Option<PokemonType>,
    },
    TypeBoostActivated {
        holder: CombatantRef,
        boosted_type: PokemonType,
    },
    LastStandConsumed {
        holder: CombatantRef,
    },

    // Switching and fainting
    SwitchedOut {
        side: SideId,
        slot: usize,
    },
    SwitchedIn {
        side: SideId,
        slot: usize,
    },
    Fainted {
        target: CombatantRef,
    },
    ForcedSwitchRequired {
        side: SideId,
    },
    SideDefeated {
        side: SideId,
    },

    ActionFailed {
        side: SideId,
        reason: ActionFailureReason,
    },
}

/// Event bus for collecting battle events in resolution order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }

    /// Compact binary form for replay or network sync.
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(&self.events)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        let events: Vec<BattleEvent> = postcard::from_bytes(bytes)?;
        Ok(Self { events })
    }
}

impl From<Vec<BattleEvent>> for EventBus {
    fn from(events: Vec<BattleEvent>) -> Self {
        Self { events }
    }
}

impl fmt::Display for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}
