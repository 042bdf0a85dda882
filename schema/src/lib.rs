// Turn Engine Schema - Catalog record definitions
// The species/move records and the static enums they are built from. The engine
// consumes these as read-only facts; nothing in this crate knows about battles.

pub use battle_data::*;
pub use move_data::*;
pub use pokemon_types::*;
pub use species_data::*;

pub mod battle_data;
pub mod move_data;
pub mod pokemon_types;
pub mod species_data;
