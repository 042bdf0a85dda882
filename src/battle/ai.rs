//! Move selection for non-human sides.

use crate::battle::calculators::expected_damage;
use crate::battle::state::{Action, BattleState, SideId};
use crate::battle::turn_orchestrator::predicted_speed;
use crate::errors::BattleResult;
use crate::pokemon::{Combatant, MAX_STAGE, MIN_STAGE};
use ordered_float::OrderedFloat;
use schema::{MoveData, MoveTarget, StatType};
use std::cmp::Reverse;
use tracing::debug;

/// Anything that can pick an action for a side.
pub trait Behavior {
    /// `None` when the side has nothing to submit this resolution.
    fn decide_action(&self, side: SideId, state: &BattleState) -> BattleResult<Option<Action>>;
}

/// Single-ply heuristic: hit as hard as possible, unless outsped without a knockout in reach,
/// in which case fix the speed gap first.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScoringAI;

impl ScoringAI {
    pub fn new() -> Self {
        Self
    }

    /// Deterministic damage estimate; status moves score zero.
    fn score_move(&self, attacker: &Combatant, defender: &Combatant, move_data: &MoveData, state: &BattleState) -> f64 {
        if !move_data.deals_damage() {
            return 0.0;
        }
        expected_damage(attacker, defender, move_data, state.field.effective_weather())
    }

    /// The reserve that threatens the opposing active the most.
    fn choose_replacement(&self, side: SideId, state: &BattleState) -> BattleResult<Option<Action>> {
        let side_state = state.side(side);
        let defender = state.active(side.opponent())?;
        let best = side_state
            .roster
            .iter()
            .enumerate()
            .filter(|&(slot, c)| slot != side_state.active && !c.is_fainted())
            .map(|(slot, candidate)| {
                let threat = candidate
                    .moves
                    .iter()
                    .flatten()
                    .filter(|m| m.pp > 0)
                    .map(|m| OrderedFloat(self.score_move(candidate, defender, &m.data, state)))
                    .max()
                    .unwrap_or(OrderedFloat(0.0));
                (slot, threat)
            })
            .max_by_key(|&(slot, threat)| (threat, Reverse(slot)));

        Ok(best.map(|(roster_slot, _)| Action::Switch { side, roster_slot }))
    }

    fn speed_fix_is_useful(&self, attacker: &Combatant, defender: &Combatant, move_data: &MoveData) -> bool {
        move_data.effects.stat_changes.iter().any(|change| {
            change.stat == StatType::Speed
                && match change.target {
                    MoveTarget::Opponent => change.stages < 0 && defender.stat_stage(StatType::Speed) > MIN_STAGE,
                    MoveTarget::User => change.stages > 0 && attacker.stat_stage(StatType::Speed) < MAX_STAGE,
                }
        })
    }
}

impl Behavior for ScoringAI {
    fn decide_action(&self, side: SideId, state: &BattleState) -> BattleResult<Option<Action>> {
        if state.outcome().is_some() {
            return Ok(None);
        }
        let owed = state.awaiting_replacement();
        if owed.contains(&side) {
            return self.choose_replacement(side, state);
        }
        if !owed.is_empty() {
            return Ok(None);
        }

        let attacker = state.active(side)?;
        let defender = state.active(side.opponent())?;
        let taunted = attacker.volatile.taunt_turns > 0;
        let usable: Vec<(usize, &MoveData)> = attacker
            .moves
            .iter()
            .enumerate()
            .filter_map(|(slot, m)| m.as_ref().map(|m| (slot, m)))
            .filter(|(_, m)| m.pp > 0 && !(taunted && m.data.is_status()))
            .map(|(slot, m)| (slot, &m.data))
            .collect();

        let best = usable
            .iter()
            .map(|&(slot, data)| (slot, OrderedFloat(self.score_move(attacker, defender, data, state))))
            .max_by_key(|&(slot, score)| (score, Reverse(slot)));
        let Some((best_slot, best_damage)) = best else {
            // Nothing usable: fall back to a switch if one exists.
            return self.choose_replacement(side, state);
        };

        let outsped = predicted_speed(state, side)? < predicted_speed(state, side.opponent())?;
        let decisive = best_damage.into_inner() >= defender.current_hp as f64;
        if outsped && !decisive {
            if let Some(&(slot, _)) = usable
                .iter()
                .find(|(_, data)| data.corrects_speed() && self.speed_fix_is_useful(attacker, defender, data))
            {
                debug!(?side, slot, "choosing speed control");
                return Ok(Some(Action::Attack { side, move_slot: slot }));
            }
        }

        debug!(?side, slot = best_slot, expected = best_damage.into_inner(), "choosing strongest move");
        Ok(Some(Action::Attack {
            side,
            move_slot: best_slot,
        }))
    }
}

/// Convenience entry point using the default heuristic.
pub fn choose_action(state: &BattleState, side: SideId) -> BattleResult<Option<Action>> {
    ScoringAI::new().decide_action(side, state)
}
