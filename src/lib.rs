// In: src/lib.rs

//! Pokemon Turn Engine
//!
//! Resolves one turn of a two-sided, single-active-combatant battle into an ordered event log.
//! Resolution never mutates the state it is given; applying the log is the only way a battle
//! advances, which keeps replays and remote copies exact.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod pokemon;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
// Catalog record types and static enums.
pub use schema::{
    BaseStats, MoveCategory, MoveData, MoveEffects, MoveTarget, PokemonType, SpeciesData, StatChange,
    StatType, StatusKind, VolatileKind, Weather,
};

// --- From this crate's modules (`src/`) ---

// Turn resolution and event application.
pub use battle::ai::{choose_action, Behavior, ScoringAI};
pub use battle::apply::apply;
pub use battle::rng::TurnRng;
pub use battle::state::{
    Action, ActionFailureReason, BattleEvent, BattleOutcome, BattleState, CombatantRef, EventBus,
    Side, SideId,
};
pub use battle::turn_orchestrator::{resolve_turn, start_battle};

// Runtime combatants and their data sources.
pub use catalog::Catalog;
pub use config::{BattleConfig, CombatantSpec, SideConfig};
pub use pokemon::{Combatant, CombatantBuilder, StatusCondition};

// Crate-specific error and result types.
pub use errors::{
    ActionError, BattleEngineError, BattleResult, BattleStateError, CatalogError, CatalogResult,
    ConfigError,
};
