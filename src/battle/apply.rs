//! Event applier: the only code that writes to a `BattleState`.
//!
//! Every event carries absolute values, so applying one is a plain write with no randomness
//! and no rule evaluation.

use crate::battle::state::{BattleEvent, BattleState, CombatantRef, VolatileStatus};
use crate::errors::{BattleResult, BattleStateError};
use crate::pokemon::Combatant;
use schema::VolatileKind;

/// Replays `events` against `state` in order.
///
/// Stops at the first event that references a slot the state does not have; events before it
/// stay applied.
pub fn apply(state: &mut BattleState, events: &[BattleEvent]) -> BattleResult<()> {
    for event in events {
        apply_event(state, event)?;
    }
    Ok(())
}

/// Helper for events that write a single combatant.
fn with_combatant<F>(state: &mut BattleState, target: CombatantRef, operation: F) -> BattleResult<()>
where
    F: FnOnce(&mut Combatant) -> BattleResult<()>,
{
    operation(state.combatant_mut(target)?)
}

fn set_volatile_turns(combatant: &mut Combatant, volatile: VolatileKind, turns: u8) {
    match volatile {
        VolatileKind::Confusion => combatant.volatile.confusion_turns = turns,
        VolatileKind::Taunt => combatant.volatile.taunt_turns = turns,
        VolatileKind::Infatuation => {
            if turns == 0 {
                combatant.volatile.infatuated_with = None;
            }
        }
    }
}

pub fn apply_event(state: &mut BattleState, event: &BattleEvent) -> BattleResult<()> {
    match event {
        BattleEvent::TurnStarted { turn_number } => {
            state.turn_number = *turn_number;
            Ok(())
        }
        BattleEvent::TurnEnded { turn_number } => {
            state.turn_number = turn_number + 1;
            Ok(())
        }
        BattleEvent::RngAdvanced { cursor } => {
            state.rng.set_cursor(*cursor);
            Ok(())
        }

        BattleEvent::PpDecremented {
            user,
            move_slot,
            remaining,
        } => with_combatant(state, *user, |combatant| {
            let slot = combatant
                .moves
                .get_mut(*move_slot)
                .and_then(|m| m.as_mut())
                .ok_or(BattleStateError::InvalidMoveSlot {
                    side: user.side,
                    slot: user.slot,
                    move_slot: *move_slot,
                })?;
            slot.pp = *remaining;
            Ok(())
        }),

        BattleEvent::DamageDealt {
            target,
            remaining_hp,
            ..
        }
        | BattleEvent::IndirectDamage {
            target,
            remaining_hp,
            ..
        }
        | BattleEvent::Healed {
            target,
            new_hp: remaining_hp,
            ..
        } => with_combatant(state, *target, |combatant| {
            combatant.current_hp = (*remaining_hp).min(combatant.max_hp);
            Ok(())
        }),

        BattleEvent::StatusInflicted { target, status }
        | BattleEvent::StatusProgressed { target, status } => {
            with_combatant(state, *target, |combatant| {
                combatant.status = Some(*status);
                Ok(())
            })
        }
        BattleEvent::StatusCured { target, .. } => with_combatant(state, *target, |combatant| {
            combatant.status = None;
            Ok(())
        }),

        BattleEvent::StatStageChanged {
            target,
            stat,
            new_stage,
            ..
        } => with_combatant(state, *target, |combatant| {
            combatant.set_stat_stage(*stat, *new_stage);
            Ok(())
        }),

        BattleEvent::VolatileApplied { target, volatile } => {
            with_combatant(state, *target, |combatant| {
                match volatile {
                    VolatileStatus::Confusion { turns } => combatant.volatile.confusion_turns = *turns,
                    VolatileStatus::Taunt { turns } => combatant.volatile.taunt_turns = *turns,
                    VolatileStatus::Infatuation { with } => {
                        combatant.volatile.infatuated_with = Some(*with)
                    }
                }
                Ok(())
            })
        }
        BattleEvent::VolatileTicked {
            target,
            volatile,
            remaining,
        } => with_combatant(state, *target, |combatant| {
            set_volatile_turns(combatant, *volatile, *remaining);
            Ok(())
        }),
        BattleEvent::VolatileEnded { target, volatile } => {
            with_combatant(state, *target, |combatant| {
                set_volatile_turns(combatant, *volatile, 0);
                Ok(())
            })
        }
        BattleEvent::Flinched { target } => with_combatant(state, *target, |combatant| {
            combatant.volatile.flinched = true;
            Ok(())
        }),
        BattleEvent::FlinchCleared { target } => with_combatant(state, *target, |combatant| {
            combatant.volatile.flinched = false;
            Ok(())
        }),
        BattleEvent::LoafingSet { target, loafing } => {
            with_combatant(state, *target, |combatant| {
                combatant.volatile.loafing = *loafing;
                Ok(())
            })
        }

        BattleEvent::WeatherChanged { weather, turns, .. } => {
            state.field.weather = *weather;
            state.field.weather_turns = *turns;
            Ok(())
        }
        BattleEvent::WeatherTicked { remaining } => {
            state.field.weather_turns = Some(*remaining);
            Ok(())
        }
        BattleEvent::WeatherSuppressorAdded { holder } => {
            if !state.field.suppressors.contains(holder) {
                state.field.suppressors.push(*holder);
            }
            Ok(())
        }
        BattleEvent::WeatherSuppressorRemoved { holder } => {
            state.field.suppressors.retain(|s| s != holder);
            Ok(())
        }

        BattleEvent::AbilityChanged { holder, ability } => {
            with_combatant(state, *holder, |combatant| {
                combatant.ability = ability.clone();
                Ok(())
            })
        }
        BattleEvent::TypeOverrideSet {
            holder,
            override_type,
        } => with_combatant(state, *holder, |combatant| {
            combatant.type_override = *override_type;
            Ok(())
        }),
        BattleEvent::TypeBoostActivated {
            holder,
            boosted_type,
        } => with_combatant(state, *holder, |combatant| {
            combatant.type_boost = Some(*boosted_type);
            Ok(())
        }),
        BattleEvent::LastStandConsumed { holder } => {
            with_combatant(state, *holder, |combatant| {
                combatant.volatile.last_stand_used = true;
                Ok(())
            })
        }

        BattleEvent::SwitchedOut { side, slot } => {
            with_combatant(state, CombatantRef::new(*side, *slot), |combatant| {
                combatant.reset_on_switch_out();
                Ok(())
            })
        }
        BattleEvent::SwitchedIn { side, slot } => {
            // Validates the slot before moving the active index onto it.
            state.combatant(CombatantRef::new(*side, *slot))?;
            let side = state.side_mut(*side);
            side.active = *slot;
            side.pending_replacement = false;
            Ok(())
        }
        BattleEvent::Fainted { target } => with_combatant(state, *target, |combatant| {
            combatant.current_hp = 0;
            Ok(())
        }),
        BattleEvent::ForcedSwitchRequired { side } => {
            state.side_mut(*side).pending_replacement = true;
            Ok(())
        }
        BattleEvent::SideDefeated { side } => {
            let side = state.side_mut(*side);
            side.defeated = true;
            side.pending_replacement = false;
            Ok(())
        }

        // Informational only.
        BattleEvent::MoveUsed { .. }
        | BattleEvent::MoveMissed { .. }
        | BattleEvent::CriticalHit { .. }
        | BattleEvent::TypeEffectiveness { .. }
        | BattleEvent::StatChangeBlocked { .. }
        | BattleEvent::AbilityTriggered { .. }
        | BattleEvent::ActionFailed { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::{IndirectCause, SideId, WeatherSource};
    use crate::battle::tests::common::{create_test_battle, TestCombatantBuilder};
    use crate::errors::BattleEngineError;
    use crate::pokemon::StatusCondition;
    use pretty_assertions::assert_eq;
    use schema::{StatType, Weather};

    fn battle() -> BattleState {
        create_test_battle(
            TestCombatantBuilder::new("Pikachu", 50).build(),
            TestCombatantBuilder::new("Squirtle", 50).build(),
        )
    }

    #[test]
    fn events_write_recorded_values() {
        let mut state = battle();
        let target = CombatantRef::new(SideId::Client, 0);
        apply(
            &mut state,
            &[
                BattleEvent::DamageDealt {
                    target,
                    amount: 20,
                    remaining_hp: 85,
                },
                BattleEvent::StatusInflicted {
                    target,
                    status: StatusCondition::Burn,
                },
                BattleEvent::StatStageChanged {
                    target,
                    stat: StatType::Speed,
                    old_stage: 0,
                    new_stage: -2,
                },
                BattleEvent::WeatherChanged {
                    weather: Some(Weather::Rain),
                    source: WeatherSource::Move {
                        user: CombatantRef::new(SideId::Host, 0),
                    },
                    turns: Some(5),
                },
                BattleEvent::RngAdvanced { cursor: 7 },
            ],
        )
        .unwrap();

        let squirtle = state.combatant(target).unwrap();
        assert_eq!(squirtle.current_hp, 85);
        assert_eq!(squirtle.status, Some(StatusCondition::Burn));
        assert_eq!(squirtle.stat_stage(StatType::Speed), -2);
        assert_eq!(state.field.weather, Some(Weather::Rain));
        assert_eq!(state.field.weather_turns, Some(5));
        assert_eq!(state.rng.cursor(), 7);
    }

    #[test]
    fn suppressors_are_a_set() {
        let mut state = battle();
        let holder = CombatantRef::new(SideId::Host, 0);
        let other = CombatantRef::new(SideId::Client, 0);
        apply(
            &mut state,
            &[
                BattleEvent::WeatherSuppressorAdded { holder },
                BattleEvent::WeatherSuppressorAdded { holder: other },
                BattleEvent::WeatherSuppressorAdded { holder },
                BattleEvent::WeatherSuppressorRemoved { holder },
            ],
        )
        .unwrap();
        assert_eq!(state.field.suppressors, vec![other]);
    }

    #[test]
    fn turn_end_advances_the_counter() {
        let mut state = battle();
        apply_event(&mut state, &BattleEvent::TurnEnded { turn_number: 1 }).unwrap();
        assert_eq!(state.turn_number, 2);
    }

    #[test]
    fn unknown_slot_is_a_state_error() {
        let mut state = battle();
        let err = apply_event(
            &mut state,
            &BattleEvent::IndirectDamage {
                target: CombatantRef::new(SideId::Host, 4),
                cause: IndirectCause::Recoil,
                amount: 1,
                remaining_hp: 1,
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            BattleEngineError::BattleState(BattleStateError::InvalidRosterSlot {
                side: SideId::Host,
                slot: 4
            })
        );

        let err = apply_event(
            &mut state,
            &BattleEvent::PpDecremented {
                user: CombatantRef::new(SideId::Host, 0),
                move_slot: 3,
                remaining: 0,
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BattleEngineError::BattleState(BattleStateError::InvalidMoveSlot { move_slot: 3, .. })
        ));
    }
}
