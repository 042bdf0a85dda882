use super::EffectContext;
use crate::battle::abilities::{hooks_for, Directive};
use crate::battle::calculators::{calculate_damage, confusion_damage, roll_critical, type_multiplier};
use crate::battle::engine::{hook_context, TurnContext};
use crate::battle::state::{ActionFailureReason, BattleEvent, CombatantRef, IndirectCause};
use crate::errors::BattleResult;
use schema::PokemonType;

/// Lands a damaging move on the defender. Returns the HP actually removed, or `None` when the
/// matchup made the move ineffective.
pub(super) fn execute_hit(ctx: &mut TurnContext, effect_ctx: &EffectContext) -> BattleResult<Option<u16>> {
    let EffectContext {
        attacker,
        defender,
        ref move_data,
    } = *effect_ctx;
    let weather = ctx.weather();

    let defender_combatant = ctx.state.combatant(defender)?;
    let effectiveness = type_multiplier(defender_combatant, move_data);
    if effectiveness == 0.0 {
        let chart = PokemonType::effectiveness_against(move_data.move_type, &defender_combatant.current_types());
        let blocking_ability = hooks_for(defender_combatant)
            .filter(|_| chart != 0.0)
            .map(|hooks| hooks.name());
        if let Some(ability) = blocking_ability {
            ctx.trigger_ability(defender, ability, Vec::new(), Some(attacker))?;
        }
        ctx.emit(BattleEvent::TypeEffectiveness {
            target: defender,
            multiplier: 0.0,
        })?;
        ctx.emit(BattleEvent::ActionFailed {
            side: attacker.side,
            reason: ActionFailureReason::NoEffect,
        })?;
        return Ok(None);
    }

    let critical = roll_critical(defender_combatant, move_data, &mut ctx.rng);
    let mut damage = calculate_damage(
        ctx.state.combatant(attacker)?,
        ctx.state.combatant(defender)?,
        move_data,
        critical,
        weather,
        &mut ctx.rng,
    );
    if critical {
        ctx.emit(BattleEvent::CriticalHit { target: defender })?;
    }
    if effectiveness != 1.0 {
        ctx.emit(BattleEvent::TypeEffectiveness {
            target: defender,
            multiplier: effectiveness,
        })?;
    }

    if let Some(hooks) = hooks_for(ctx.combatant(defender)?) {
        let hook_ctx = hook_context(&ctx.state, &ctx.entered_this_turn, defender)?;
        match hooks.on_hit(&hook_ctx, damage) {
            Directive::NoOp => {}
            Directive::Modify { value, effects } => {
                damage = value;
                ctx.trigger_ability(defender, hooks.name(), effects, Some(attacker))?;
            }
            Directive::ShortCircuit(effects) => {
                ctx.trigger_ability(defender, hooks.name(), effects, Some(attacker))?;
                return Ok(None);
            }
        }
    }

    let dealt = damage.min(ctx.combatant(defender)?.current_hp);
    ctx.deal_damage(defender, dealt)?;

    if ctx.is_standing(defender) {
        if let Some(hooks) = hooks_for(ctx.combatant(defender)?) {
            let hook_ctx = hook_context(&ctx.state, &ctx.entered_this_turn, defender)?;
            let effects = hooks.after_damaged(&hook_ctx, move_data);
            if !effects.is_empty() {
                ctx.trigger_ability(defender, hooks.name(), effects, Some(attacker))?;
            }
        }
    }

    Ok(Some(dealt))
}

pub(super) fn apply_drain_effect(ctx: &mut TurnContext, effect_ctx: &EffectContext, dealt: u16) -> BattleResult<()> {
    let Some(percent) = effect_ctx.move_data.effects.drain else {
        return Ok(());
    };
    if dealt == 0 {
        return Ok(());
    }
    let amount = ((dealt as u32 * percent as u32 / 100) as u16).max(1);
    ctx.heal(effect_ctx.attacker, amount)
}

pub(super) fn apply_recoil_effect(ctx: &mut TurnContext, effect_ctx: &EffectContext, dealt: u16) -> BattleResult<()> {
    let Some(percent) = effect_ctx.move_data.effects.recoil else {
        return Ok(());
    };
    let attacker = effect_ctx.attacker;
    if dealt == 0 || hooks_for(ctx.combatant(attacker)?).is_some_and(|h| h.negates_recoil()) {
        return Ok(());
    }
    let amount = ((dealt as u32 * percent as u32 / 100) as u16).max(1);
    ctx.indirect_damage(attacker, IndirectCause::Recoil, amount)
}

/// The defender's reactions to being touched. Skipped if the attacker already went down.
pub(super) fn apply_contact_reactions(ctx: &mut TurnContext, effect_ctx: &EffectContext) -> BattleResult<()> {
    let EffectContext {
        attacker, defender, ..
    } = *effect_ctx;
    if !effect_ctx.move_data.contact || !ctx.is_standing(attacker) {
        return Ok(());
    }
    let Some(hooks) = hooks_for(ctx.combatant(defender)?) else {
        return Ok(());
    };
    let hook_ctx = hook_context(&ctx.state, &ctx.entered_this_turn, defender)?;
    let effects = hooks.on_contact(&hook_ctx, &mut ctx.rng);
    if effects.is_empty() {
        return Ok(());
    }
    ctx.trigger_ability(defender, hooks.name(), effects, Some(attacker))
}

pub(super) fn apply_confusion_self_hit(ctx: &mut TurnContext, target: CombatantRef) -> BattleResult<()> {
    let damage = confusion_damage(ctx.state.combatant(target)?, &mut ctx.rng);
    ctx.deal_damage(target, damage)
}
