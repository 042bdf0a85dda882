//! Resolution context shared by every phase of a turn.
//!
//! `TurnContext` owns a scratch copy of the battle state. Every state change is expressed as a
//! `BattleEvent`, applied to the scratch copy through the event applier and then recorded, so
//! the caller's state is never touched and the recorded log reproduces the scratch state exactly.

use crate::battle::abilities::{hooks_for, Affliction, Directive, HookContext, HookEffect};
use crate::battle::apply::apply_event;
use crate::battle::conditions::{confusion_duration, new_status, type_blocks_status, TAUNT_TURNS};
use crate::battle::rng::TurnRng;
use crate::battle::state::{
    BattleEvent, BattleState, CombatantRef, EventBus, IndirectCause, SideId,
    StatChangeBlockReason, VolatileStatus, WeatherSource,
};
use crate::battle::stats::effective_speed;
use crate::errors::BattleResult;
use crate::pokemon::{Combatant, MAX_STAGE, MIN_STAGE};
use schema::{StatType, StatusKind, VolatileKind, Weather};
use tracing::debug;

/// Who is imposing a stat change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatChangeOrigin<'a> {
    /// The holder's own move or ability; never filtered by its own hooks.
    Own,
    /// The opposing side, optionally through an ability of the given name.
    Opponent { by_ability: Option<&'a str> },
}

/// Result of trying to afflict a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InflictOutcome {
    Inflicted,
    AlreadyAfflicted,
    Immune,
}

pub struct TurnContext {
    /// Scratch state, kept in sync with every emitted event.
    pub state: BattleState,
    pub rng: TurnRng,
    pub bus: EventBus,
    /// Combatants that switched in during this resolution.
    pub entered_this_turn: Vec<CombatantRef>,
}

/// Builds a hook context without borrowing the whole `TurnContext`, so the stream can be lent
/// to the same hook call.
pub fn hook_context<'a>(
    state: &'a BattleState,
    entered: &[CombatantRef],
    holder: CombatantRef,
) -> BattleResult<HookContext<'a>> {
    Ok(HookContext::new(state, holder)?.entered_this_turn(entered.contains(&holder)))
}

impl TurnContext {
    pub fn new(state: &BattleState) -> Self {
        Self {
            state: state.clone(),
            rng: state.rng.clone(),
            bus: EventBus::new(),
            entered_this_turn: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: BattleEvent) -> BattleResult<()> {
        apply_event(&mut self.state, &event)?;
        self.bus.push(event);
        Ok(())
    }

    /// Records the final stream position and hands back the log.
    pub fn finish(mut self) -> BattleResult<EventBus> {
        let cursor = self.rng.cursor();
        self.emit(BattleEvent::RngAdvanced { cursor })?;
        Ok(self.bus)
    }

    pub fn combatant(&self, target: CombatantRef) -> BattleResult<&Combatant> {
        self.state.combatant(target)
    }

    pub fn weather(&self) -> Option<Weather> {
        self.state.field.effective_weather()
    }

    /// On the field and still standing.
    pub fn is_standing(&self, target: CombatantRef) -> bool {
        self.state.is_active(target)
            && self
                .state
                .combatant(target)
                .is_ok_and(|c| !c.is_fainted())
    }

    pub fn battle_over(&self) -> bool {
        self.state.outcome().is_some()
    }

    /// Orders two sides by effective speed, faster first. A tie takes one draw; 50 or below
    /// favours the host.
    pub fn speed_order(&mut self) -> BattleResult<[SideId; 2]> {
        let weather = self.weather();
        let host = effective_speed(self.state.active(SideId::Host)?, weather);
        let client = effective_speed(self.state.active(SideId::Client)?, weather);
        let host_first = match host.cmp(&client) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => self.rng.next_outcome("speed tie") <= 50,
        };
        Ok(if host_first {
            [SideId::Host, SideId::Client]
        } else {
            [SideId::Client, SideId::Host]
        })
    }

    // --- Hook effects ---

    /// Announces an ability activation and carries out what it asked for. `attacker` is the
    /// combatant on the receiving end of contact reactions.
    pub fn trigger_ability(
        &mut self,
        holder: CombatantRef,
        ability: &str,
        effects: Vec<HookEffect>,
        attacker: Option<CombatantRef>,
    ) -> BattleResult<()> {
        debug!(?holder, ability, effects = effects.len(), "ability triggered");
        self.emit(BattleEvent::AbilityTriggered {
            holder,
            ability: ability.to_string(),
        })?;
        for effect in effects {
            self.execute_hook_effect(holder, ability, effect, attacker)?;
        }
        Ok(())
    }

    fn execute_hook_effect(
        &mut self,
        holder: CombatantRef,
        ability: &str,
        effect: HookEffect,
        attacker: Option<CombatantRef>,
    ) -> BattleResult<()> {
        match effect {
            HookEffect::SetWeather(weather) => self.set_weather(
                Some(weather),
                WeatherSource::Ability {
                    holder,
                    ability: ability.to_string(),
                },
                None,
            ),
            HookEffect::AddWeatherSuppressor => {
                if !self.state.field.suppressors.contains(&holder) {
                    self.emit(BattleEvent::WeatherSuppressorAdded { holder })?;
                    self.notify_weather_change()?;
                }
                Ok(())
            }
            HookEffect::RemoveWeatherSuppressor => self.remove_suppressor(holder),
            HookEffect::ChangeOpponentStat { stat, stages } => {
                let target = self.state.active_ref(holder.side.opponent());
                if !self.is_standing(target) {
                    return Ok(());
                }
                self.change_stat(
                    target,
                    stat,
                    stages,
                    StatChangeOrigin::Opponent {
                        by_ability: Some(ability),
                    },
                )
            }
            HookEffect::ChangeOwnStat { stat, stages } => {
                self.change_stat(holder, stat, stages, StatChangeOrigin::Own)
            }
            HookEffect::CopyOpponentAbility => self.copy_opponent_ability(holder),
            HookEffect::SetTypeOverride(override_type) => self.emit(BattleEvent::TypeOverrideSet {
                holder,
                override_type,
            }),
            HookEffect::CureOwnStatus => self.cure_status(holder),
            HookEffect::HealFraction(denominator) => {
                let amount = self.combatant(holder)?.hp_fraction(denominator);
                self.heal(holder, amount)
            }
            HookEffect::DamageFraction(denominator) => {
                let amount = self.combatant(holder)?.hp_fraction(denominator);
                self.indirect_damage(holder, IndirectCause::Ability(ability.to_string()), amount)
            }
            HookEffect::ToggleLoafing => {
                let loafing = !self.combatant(holder)?.volatile.loafing;
                self.emit(BattleEvent::LoafingSet {
                    target: holder,
                    loafing,
                })
            }
            HookEffect::ActivateTypeBoost(boosted_type) => {
                if self.combatant(holder)?.type_boost == Some(boosted_type) {
                    return Ok(());
                }
                self.emit(BattleEvent::TypeBoostActivated {
                    holder,
                    boosted_type,
                })
            }
            HookEffect::ConsumeLastStand => self.emit(BattleEvent::LastStandConsumed { holder }),
            HookEffect::AttackerStatus(kind) => match attacker {
                Some(attacker) => self.inflict_status(attacker, kind).map(|_| ()),
                None => Ok(()),
            },
            HookEffect::InfatuateAttacker => match attacker {
                Some(attacker) => self
                    .apply_volatile(attacker, VolatileKind::Infatuation, holder)
                    .map(|_| ()),
                None => Ok(()),
            },
            HookEffect::DamageAttackerFraction(denominator) => match attacker {
                Some(attacker) => {
                    let amount = self.combatant(attacker)?.hp_fraction(denominator);
                    self.indirect_damage(attacker, IndirectCause::Ability(ability.to_string()), amount)
                }
                None => Ok(()),
            },
        }
    }

    fn copy_opponent_ability(&mut self, holder: CombatantRef) -> BattleResult<()> {
        let opponent = self.state.active_ref(holder.side.opponent());
        if !self.is_standing(opponent) {
            return Ok(());
        }
        let copied = self.combatant(opponent)?.ability.clone();
        self.emit(BattleEvent::AbilityChanged {
            holder,
            ability: copied,
        })?;
        // The copied ability gets its own entrance.
        self.run_switch_in_hooks(holder)
    }

    // --- Switch-in and field ---

    pub fn run_switch_in_hooks(&mut self, holder: CombatantRef) -> BattleResult<()> {
        if !self.is_standing(holder) {
            return Ok(());
        }
        let combatant = self.combatant(holder)?;
        let Some(hooks) = hooks_for(combatant) else {
            return Ok(());
        };
        let ctx = hook_context(&self.state, &self.entered_this_turn, holder)?;
        let effects = hooks.on_switch_in(&ctx);
        if effects.is_empty() {
            return Ok(());
        }
        self.trigger_ability(holder, hooks.name(), effects, None)
    }

    pub fn set_weather(
        &mut self,
        weather: Option<Weather>,
        source: WeatherSource,
        turns: Option<u8>,
    ) -> BattleResult<()> {
        debug!(?weather, ?turns, "weather changed");
        self.emit(BattleEvent::WeatherChanged {
            weather,
            source,
            turns,
        })?;
        self.notify_weather_change()
    }

    /// Lets weather-reactive abilities on the field re-evaluate.
    pub fn notify_weather_change(&mut self) -> BattleResult<()> {
        for side in SideId::BOTH {
            let holder = self.state.active_ref(side);
            if !self.is_standing(holder) {
                continue;
            }
            let Some(hooks) = hooks_for(self.combatant(holder)?) else {
                continue;
            };
            let ctx = hook_context(&self.state, &self.entered_this_turn, holder)?;
            let effects = hooks.on_weather_set(&ctx);
            if !effects.is_empty() {
                self.trigger_ability(holder, hooks.name(), effects, None)?;
            }
        }
        Ok(())
    }

    fn remove_suppressor(&mut self, holder: CombatantRef) -> BattleResult<()> {
        if self.state.field.suppressors.contains(&holder) {
            self.emit(BattleEvent::WeatherSuppressorRemoved { holder })?;
            self.notify_weather_change()?;
        }
        Ok(())
    }

    /// Cleanup for any combatant leaving the field, by switch or by fainting.
    pub fn leave_field(&mut self, leaver: CombatantRef) -> BattleResult<()> {
        self.remove_suppressor(leaver)?;
        let opponent = self.state.active_ref(leaver.side.opponent());
        if self.combatant(opponent)?.volatile.infatuated_with == Some(leaver) {
            self.emit(BattleEvent::VolatileEnded {
                target: opponent,
                volatile: VolatileKind::Infatuation,
            })?;
        }
        Ok(())
    }

    // --- Stats ---

    pub fn change_stat(
        &mut self,
        target: CombatantRef,
        stat: StatType,
        stages: i8,
        origin: StatChangeOrigin,
    ) -> BattleResult<()> {
        if self.combatant(target)?.is_fainted() || stages == 0 {
            return Ok(());
        }

        let mut stages = stages;
        if let StatChangeOrigin::Opponent { by_ability } = origin {
            if let Some(hooks) = hooks_for(self.combatant(target)?) {
                let ctx = hook_context(&self.state, &self.entered_this_turn, target)?;
                match hooks.on_stat_change_attempt(&ctx, stat, stages, by_ability) {
                    Directive::NoOp => {}
                    Directive::Modify { value, effects } => {
                        stages = value;
                        self.trigger_ability(target, hooks.name(), effects, None)?;
                    }
                    Directive::ShortCircuit(effects) => {
                        self.trigger_ability(target, hooks.name(), effects, None)?;
                        return self.emit(BattleEvent::StatChangeBlocked {
                            target,
                            stat,
                            reason: StatChangeBlockReason::Ability(hooks.name().to_string()),
                        });
                    }
                }
            }
        }

        let old_stage = self.combatant(target)?.stat_stage(stat);
        let new_stage = (old_stage as i16 + stages as i16).clamp(MIN_STAGE as i16, MAX_STAGE as i16) as i8;
        if new_stage == old_stage {
            let reason = if stages > 0 {
                StatChangeBlockReason::AtMaximum
            } else {
                StatChangeBlockReason::AtMinimum
            };
            return self.emit(BattleEvent::StatChangeBlocked {
                target,
                stat,
                reason,
            });
        }
        self.emit(BattleEvent::StatStageChanged {
            target,
            stat,
            old_stage,
            new_stage,
        })
    }

    // --- Afflictions ---

    /// Runs the target's ability against an affliction. `true` means the ability refused it.
    fn ability_refuses(&mut self, target: CombatantRef, affliction: Affliction) -> BattleResult<bool> {
        let Some(hooks) = hooks_for(self.combatant(target)?) else {
            return Ok(false);
        };
        let ctx = hook_context(&self.state, &self.entered_this_turn, target)?;
        match hooks.on_status_attempt(&ctx, affliction) {
            Directive::ShortCircuit(effects) => {
                self.trigger_ability(target, hooks.name(), effects, None)?;
                Ok(true)
            }
            Directive::Modify { effects, .. } => {
                self.trigger_ability(target, hooks.name(), effects, None)?;
                Ok(false)
            }
            Directive::NoOp => Ok(false),
        }
    }

    pub fn inflict_status(&mut self, target: CombatantRef, kind: StatusKind) -> BattleResult<InflictOutcome> {
        let combatant = self.combatant(target)?;
        if combatant.is_fainted() {
            return Ok(InflictOutcome::Immune);
        }
        if combatant.status.is_some() {
            return Ok(InflictOutcome::AlreadyAfflicted);
        }
        if type_blocks_status(combatant, kind) {
            return Ok(InflictOutcome::Immune);
        }
        if self.ability_refuses(target, Affliction::Status(kind))? {
            return Ok(InflictOutcome::Immune);
        }
        let status = new_status(kind, &mut self.rng);
        self.emit(BattleEvent::StatusInflicted { target, status })?;
        Ok(InflictOutcome::Inflicted)
    }

    pub fn cure_status(&mut self, target: CombatantRef) -> BattleResult<()> {
        if let Some(status) = self.combatant(target)?.status {
            self.emit(BattleEvent::StatusCured { target, status })?;
        }
        Ok(())
    }

    pub fn apply_volatile(
        &mut self,
        target: CombatantRef,
        kind: VolatileKind,
        source: CombatantRef,
    ) -> BattleResult<InflictOutcome> {
        let combatant = self.combatant(target)?;
        if combatant.is_fainted() {
            return Ok(InflictOutcome::Immune);
        }
        let already = match kind {
            VolatileKind::Confusion => combatant.volatile.confusion_turns > 0,
            VolatileKind::Taunt => combatant.volatile.taunt_turns > 0,
            VolatileKind::Infatuation => combatant.volatile.infatuated_with.is_some(),
        };
        if already {
            return Ok(InflictOutcome::AlreadyAfflicted);
        }
        if self.ability_refuses(target, Affliction::Volatile(kind))? {
            return Ok(InflictOutcome::Immune);
        }
        let volatile = match kind {
            VolatileKind::Confusion => VolatileStatus::Confusion {
                turns: confusion_duration(&mut self.rng),
            },
            VolatileKind::Taunt => VolatileStatus::Taunt { turns: TAUNT_TURNS },
            VolatileKind::Infatuation => VolatileStatus::Infatuation { with: source },
        };
        self.emit(BattleEvent::VolatileApplied { target, volatile })?;
        Ok(InflictOutcome::Inflicted)
    }

    pub fn apply_flinch(&mut self, target: CombatantRef) -> BattleResult<()> {
        if self.combatant(target)?.is_fainted() || self.ability_refuses(target, Affliction::Flinch)? {
            return Ok(());
        }
        self.emit(BattleEvent::Flinched { target })
    }

    // --- Hit points ---

    /// Direct damage from a move. Capped at the target's remaining HP.
    pub fn deal_damage(&mut self, target: CombatantRef, amount: u16) -> BattleResult<()> {
        let current = self.combatant(target)?.current_hp;
        let amount = amount.min(current);
        self.emit(BattleEvent::DamageDealt {
            target,
            amount,
            remaining_hp: current - amount,
        })
    }

    /// Damage from anything but a direct hit. Abilities that block indirect damage stop it.
    pub fn indirect_damage(
        &mut self,
        target: CombatantRef,
        cause: IndirectCause,
        amount: u16,
    ) -> BattleResult<()> {
        let combatant = self.combatant(target)?;
        if combatant.is_fainted() || hooks_for(combatant).is_some_and(|h| h.blocks_indirect_damage()) {
            return Ok(());
        }
        let current = combatant.current_hp;
        let amount = amount.min(current);
        self.emit(BattleEvent::IndirectDamage {
            target,
            cause,
            amount,
            remaining_hp: current - amount,
        })
    }

    pub fn heal(&mut self, target: CombatantRef, amount: u16) -> BattleResult<()> {
        let combatant = self.combatant(target)?;
        if combatant.is_fainted() || combatant.is_full_hp() || amount == 0 {
            return Ok(());
        }
        let current = combatant.current_hp;
        let new_hp = current.saturating_add(amount).min(combatant.max_hp);
        self.emit(BattleEvent::Healed {
            target,
            amount: new_hp - current,
            new_hp,
        })
    }

    // --- Fainting ---

    /// Processes every active combatant at 0 HP that has not been handled yet, in the given
    /// side order.
    pub fn resolve_faints(&mut self, order: [SideId; 2]) -> BattleResult<()> {
        for side in order {
            let target = self.state.active_ref(side);
            let side_state = self.state.side(side);
            let handled = side_state.pending_replacement || side_state.defeated;
            if handled || !self.combatant(target)?.is_fainted() {
                continue;
            }

            debug!(?target, "fainted");
            self.emit(BattleEvent::Fainted { target })?;
            self.leave_field(target)?;
            if self.state.side(side).has_living_reserve() {
                self.emit(BattleEvent::ForcedSwitchRequired { side })?;
            } else {
                self.emit(BattleEvent::SideDefeated { side })?;
            }
        }
        Ok(())
    }
}
