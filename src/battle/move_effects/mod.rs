//! Attack resolution: everything between "side X uses move slot N" and the faint check.

mod damage_effects;
mod special_effects;
mod stat_effects;
mod status_effects;

use self::{damage_effects::*, special_effects::*, stat_effects::*, status_effects::*};
use crate::battle::abilities::{hooks_for, Directive};
use crate::battle::conditions::{
    condition_hooks, confusion_self_hit, infatuation_blocks, PreActionOutcome,
};
use crate::battle::engine::{hook_context, TurnContext};
use crate::battle::state::{ActionFailureReason, BattleEvent, CombatantRef, SideId};
use crate::battle::stats::hit_threshold;
use crate::errors::BattleResult;
use crate::pokemon::StatusCondition;
use schema::{MoveData, MoveTarget};
use tracing::debug;

/// Who is using which move against whom.
#[derive(Debug, Clone)]
pub struct EffectContext {
    pub attacker: CombatantRef,
    pub defender: CombatantRef,
    pub move_data: MoveData,
}

impl EffectContext {
    pub fn new(attacker: CombatantRef, defender: CombatantRef, move_data: MoveData) -> Self {
        Self {
            attacker,
            defender,
            move_data,
        }
    }

    pub fn target_ref(&self, target: MoveTarget) -> CombatantRef {
        match target {
            MoveTarget::User => self.attacker,
            MoveTarget::Opponent => self.defender,
        }
    }
}

/// Resolves `side`'s attack with the move in `move_slot`, ending with a faint check.
pub fn execute_attack(ctx: &mut TurnContext, side: SideId, move_slot: usize) -> BattleResult<()> {
    let attacker = ctx.state.active_ref(side);
    let defender = ctx.state.active_ref(side.opponent());
    let faint_order = [side.opponent(), side];

    // Fainted earlier this turn, or replaced by a switch that made this action stale.
    if !ctx.is_standing(attacker) {
        return Ok(());
    }

    if !check_action_prevention(ctx, attacker)? {
        return ctx.resolve_faints(faint_order);
    }

    let Some(slot) = ctx.combatant(attacker)?.move_slot(move_slot).cloned() else {
        return Ok(());
    };
    if slot.pp == 0 {
        return Ok(());
    }
    if slot.data.is_status() && ctx.combatant(attacker)?.volatile.taunt_turns > 0 {
        return ctx.emit(BattleEvent::ActionFailed {
            side,
            reason: ActionFailureReason::TauntBlocked,
        });
    }

    debug!(?attacker, move_name = %slot.data.name, "move used");
    ctx.emit(BattleEvent::MoveUsed {
        user: attacker,
        move_name: slot.data.name.clone(),
    })?;
    ctx.emit(BattleEvent::PpDecremented {
        user: attacker,
        move_slot,
        remaining: slot.pp - 1,
    })?;

    let effect_ctx = EffectContext::new(attacker, defender, slot.data);
    match effect_ctx.move_data.target {
        MoveTarget::User => execute_self_targeted(ctx, &effect_ctx)?,
        MoveTarget::Opponent => execute_opponent_targeted(ctx, &effect_ctx)?,
    }

    ctx.resolve_faints(faint_order)
}

/// Runs every check that can stop a combatant from acting, in a fixed order. Returns whether
/// the combatant goes on to use its move.
fn check_action_prevention(ctx: &mut TurnContext, attacker: CombatantRef) -> BattleResult<bool> {
    let side = attacker.side;
    let combatant = ctx.combatant(attacker)?;

    if combatant.volatile.loafing {
        ctx.emit(BattleEvent::ActionFailed {
            side,
            reason: ActionFailureReason::IsLoafing,
        })?;
        return Ok(false);
    }

    if let Some(status @ (StatusCondition::Sleep(_) | StatusCondition::Freeze)) = combatant.status {
        if !run_status_check(ctx, attacker, status)? {
            return Ok(false);
        }
    }

    let volatile = ctx.combatant(attacker)?.volatile.clone();
    if volatile.flinched {
        ctx.emit(BattleEvent::ActionFailed {
            side,
            reason: ActionFailureReason::IsFlinching,
        })?;
        return Ok(false);
    }

    if volatile.confusion_turns > 0 && confusion_self_hit(&mut ctx.rng) {
        ctx.emit(BattleEvent::ActionFailed {
            side,
            reason: ActionFailureReason::IsConfused,
        })?;
        apply_confusion_self_hit(ctx, attacker)?;
        return Ok(false);
    }

    if let Some(with) = volatile.infatuated_with {
        if ctx.is_standing(with) && infatuation_blocks(&mut ctx.rng) {
            ctx.emit(BattleEvent::ActionFailed {
                side,
                reason: ActionFailureReason::IsInfatuated,
            })?;
            return Ok(false);
        }
    }

    if let Some(status @ StatusCondition::Paralysis) = ctx.combatant(attacker)?.status {
        if !run_status_check(ctx, attacker, status)? {
            return Ok(false);
        }
    }

    Ok(true)
}

fn run_status_check(
    ctx: &mut TurnContext,
    attacker: CombatantRef,
    status: StatusCondition,
) -> BattleResult<bool> {
    match condition_hooks(status.kind()).before_action(status, &mut ctx.rng) {
        PreActionOutcome::Proceed => Ok(true),
        PreActionOutcome::Cured => {
            ctx.emit(BattleEvent::StatusCured {
                target: attacker,
                status,
            })?;
            Ok(true)
        }
        PreActionOutcome::Blocked(reason) => {
            ctx.emit(BattleEvent::ActionFailed {
                side: attacker.side,
                reason,
            })?;
            Ok(false)
        }
    }
}

fn execute_self_targeted(ctx: &mut TurnContext, effect_ctx: &EffectContext) -> BattleResult<()> {
    let effects = &effect_ctx.move_data.effects;
    apply_stat_changes(ctx, effect_ctx, &effects.stat_changes)?;
    if let Some(weather) = effects.weather {
        apply_weather_effect(ctx, effect_ctx, weather)?;
    }
    if let Some(percent) = effects.heal {
        apply_heal_effect(ctx, effect_ctx, percent)?;
    }
    Ok(())
}

fn execute_opponent_targeted(ctx: &mut TurnContext, effect_ctx: &EffectContext) -> BattleResult<()> {
    let EffectContext {
        attacker,
        defender,
        ref move_data,
    } = *effect_ctx;

    if !ctx.is_standing(defender) {
        return ctx.emit(BattleEvent::ActionFailed {
            side: attacker.side,
            reason: ActionFailureReason::NoTarget,
        });
    }

    if intercepted_before_hit(ctx, effect_ctx)? {
        return Ok(());
    }

    let threshold = hit_threshold(ctx.combatant(attacker)?, ctx.combatant(defender)?, move_data);
    if let Some(threshold) = threshold {
        if ctx.rng.next_outcome("accuracy") as u32 > threshold {
            return ctx.emit(BattleEvent::MoveMissed {
                user: attacker,
                target: defender,
            });
        }
    }

    if redirected_on_damage(ctx, effect_ctx)? {
        return Ok(());
    }

    if move_data.deals_damage() {
        let Some(damage) = execute_hit(ctx, effect_ctx)? else {
            return Ok(());
        };
        apply_secondary_effects(ctx, effect_ctx)?;
        apply_drain_effect(ctx, effect_ctx, damage)?;
        apply_recoil_effect(ctx, effect_ctx, damage)?;
        apply_contact_reactions(ctx, effect_ctx)
    } else {
        apply_primary_effects(ctx, effect_ctx)
    }
}

/// The defender's pre-hit hook, for abilities that absorb a move before it can miss.
fn intercepted_before_hit(ctx: &mut TurnContext, effect_ctx: &EffectContext) -> BattleResult<bool> {
    let defender = effect_ctx.defender;
    let Some(hooks) = hooks_for(ctx.combatant(defender)?) else {
        return Ok(false);
    };
    let hook_ctx = hook_context(&ctx.state, &ctx.entered_this_turn, defender)?;
    let directive = hooks.on_pre_hit(&hook_ctx, &effect_ctx.move_data);
    match directive {
        Directive::ShortCircuit(effects) => {
            ctx.trigger_ability(defender, hooks.name(), effects, Some(effect_ctx.attacker))?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// The defender's damaged hook, for abilities that turn a connecting move into a boost.
fn redirected_on_damage(ctx: &mut TurnContext, effect_ctx: &EffectContext) -> BattleResult<bool> {
    let defender = effect_ctx.defender;
    let Some(hooks) = hooks_for(ctx.combatant(defender)?) else {
        return Ok(false);
    };
    let hook_ctx = hook_context(&ctx.state, &ctx.entered_this_turn, defender)?;
    match hooks.on_damaged(&hook_ctx, &effect_ctx.move_data) {
        Directive::ShortCircuit(effects) => {
            ctx.trigger_ability(defender, hooks.name(), effects, Some(effect_ctx.attacker))?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Chance-gated effects riding on a damaging move. One roll covers the status, volatile and
/// stat parts; flinch rolls separately.
fn apply_secondary_effects(ctx: &mut TurnContext, effect_ctx: &EffectContext) -> BattleResult<()> {
    let effects = &effect_ctx.move_data.effects;
    let has_gated = effects.status.is_some() || effects.volatile.is_some() || !effects.stat_changes.is_empty();
    if has_gated {
        let passes = match effects.chance {
            Some(chance) if chance < 100 => ctx.rng.chance(chance, "secondary effect"),
            _ => true,
        };
        if passes {
            if let Some(kind) = effects.status {
                apply_status_effect(ctx, effect_ctx, kind, false)?;
            }
            if let Some(kind) = effects.volatile {
                apply_volatile_effect(ctx, effect_ctx, kind, false)?;
            }
            apply_stat_changes(ctx, effect_ctx, &effects.stat_changes)?;
        }
    }
    if let Some(chance) = effects.flinch {
        apply_flinch_effect(ctx, effect_ctx, chance)?;
    }
    Ok(())
}

/// Effects of a status move that connected. Failures are reported.
fn apply_primary_effects(ctx: &mut TurnContext, effect_ctx: &EffectContext) -> BattleResult<()> {
    let effects = &effect_ctx.move_data.effects;
    if let Some(kind) = effects.status {
        apply_status_effect(ctx, effect_ctx, kind, true)?;
    }
    if let Some(kind) = effects.volatile {
        apply_volatile_effect(ctx, effect_ctx, kind, true)?;
    }
    apply_stat_changes(ctx, effect_ctx, &effects.stat_changes)?;
    if let Some(weather) = effects.weather {
        apply_weather_effect(ctx, effect_ctx, weather)?;
    }
    Ok(())
}
