use crate::battle::state::SideId;
use thiserror::Error;

/// Main error type for the turn engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleEngineError {
    /// A submitted action was rejected before any event was produced
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
    /// Species or move lookup failed, or catalog data was malformed
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// An event or query referenced something the battle state does not hold
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    /// Battle configuration could not be read or built
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Invalid actions. Rejected in their entirety; no partial event log is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{side:?} has no move in slot {slot}")]
    InvalidMoveSlot { side: SideId, slot: usize },
    #[error("{side:?} has no PP left for the move in slot {slot}")]
    NoPpRemaining { side: SideId, slot: usize },
    #[error("{side:?} has no roster entry at slot {slot}")]
    InvalidRosterSlot { side: SideId, slot: usize },
    #[error("{side:?} cannot switch into fainted slot {slot}")]
    TargetFainted { side: SideId, slot: usize },
    #[error("{side:?} slot {slot} is already active")]
    AlreadyActive { side: SideId, slot: usize },
    #[error("{0:?} submitted more than one action")]
    DuplicateAction(SideId),
    #[error("{0:?} has no combatant able to act")]
    NoActiveCombatant(SideId),
    #[error("the battle is already decided")]
    BattleFinished,
    #[error("{0:?} must send in a replacement before the turn can continue")]
    ReplacementRequired(SideId),
    #[error("{0:?} is not waiting for a replacement")]
    NotAwaitingReplacement(SideId),
}

/// Errors related to catalog lookups and catalog data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Species not found: {0}")]
    SpeciesNotFound(String),
    #[error("Move not found: {0}")]
    MoveNotFound(String),
    #[error("Malformed catalog data: {0}")]
    MalformedData(String),
    #[error("Could not read catalog file {path}: {reason}")]
    Io { path: String, reason: String },
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    #[error("{side:?} has no roster slot {slot}")]
    InvalidRosterSlot { side: SideId, slot: usize },
    #[error("combatant at {side:?} slot {slot} has no move in slot {move_slot}")]
    InvalidMoveSlot {
        side: SideId,
        slot: usize,
        move_slot: usize,
    },
    #[error("a side must field between 1 and 6 combatants, got {0}")]
    InvalidRosterSize(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Could not read battle config {path}: {reason}")]
    Io { path: String, reason: String },
    #[error("Could not parse battle config: {0}")]
    Parse(String),
    #[error("Combatant {species} must know between 1 and 4 moves, got {count}")]
    InvalidMoveCount { species: String, count: usize },
    #[error("Level {0} is outside 1..=100")]
    InvalidLevel(u8),
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;
