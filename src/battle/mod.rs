pub mod abilities;
pub mod ai;
pub mod apply;
pub mod calculators;
pub mod conditions;
pub mod engine;
pub mod move_effects;
pub mod rng;
pub mod state;
pub mod stats;
pub mod switching;
pub mod turn_orchestrator;

#[cfg(test)]
mod tests;
