use crate::battle::abilities::hooks_for;
use crate::battle::engine::{hook_context, TurnContext};
use crate::battle::state::{ActionFailureReason, BattleEvent, CombatantRef, SideId};
use crate::errors::BattleResult;
use schema::PokemonType;
use tracing::debug;

/// Name of the opposing ability keeping `side`'s active combatant on the field, if any.
///
/// Ghost types always escape.
pub fn trapped_by(ctx: &TurnContext, side: SideId) -> BattleResult<Option<&'static str>> {
    let escaper = ctx.state.active(side)?;
    if escaper.has_type(PokemonType::Ghost) {
        return Ok(None);
    }
    let trapper = ctx.state.active_ref(side.opponent());
    if !ctx.is_standing(trapper) {
        return Ok(None);
    }
    let Some(hooks) = hooks_for(ctx.combatant(trapper)?) else {
        return Ok(None);
    };
    let hook_ctx = hook_context(&ctx.state, &ctx.entered_this_turn, trapper)?;
    if hooks.on_switch_out_attempt(&hook_ctx, escaper).blocks() {
        Ok(Some(hooks.name()))
    } else {
        Ok(None)
    }
}

/// A switch chosen as the side's action for the turn.
pub fn execute_switch(ctx: &mut TurnContext, side: SideId, roster_slot: usize) -> BattleResult<()> {
    let outgoing = ctx.state.active_ref(side);
    if ctx.state.side(side).pending_replacement || ctx.state.side(side).defeated {
        return Ok(());
    }

    if let Some(trapper) = trapped_by(ctx, side)? {
        debug!(?side, trapper, "switch blocked");
        let holder = ctx.state.active_ref(side.opponent());
        ctx.emit(BattleEvent::AbilityTriggered {
            holder,
            ability: trapper.to_string(),
        })?;
        return ctx.emit(BattleEvent::ActionFailed {
            side,
            reason: ActionFailureReason::IsTrapped {
                by: trapper.to_string(),
            },
        });
    }

    switch_out(ctx, outgoing)?;
    switch_in(ctx, side, roster_slot)?;
    ctx.run_switch_in_hooks(CombatantRef::new(side, roster_slot))
}

/// Removes the active combatant from the field. Leaving hooks only run for a combatant that is
/// still standing.
pub fn switch_out(ctx: &mut TurnContext, outgoing: CombatantRef) -> BattleResult<()> {
    if ctx.is_standing(outgoing) {
        if let Some(hooks) = hooks_for(ctx.combatant(outgoing)?) {
            let hook_ctx = hook_context(&ctx.state, &ctx.entered_this_turn, outgoing)?;
            let effects = hooks.on_switch_out(&hook_ctx);
            if !effects.is_empty() {
                ctx.trigger_ability(outgoing, hooks.name(), effects, None)?;
            }
        }
    }
    ctx.leave_field(outgoing)?;
    ctx.emit(BattleEvent::SwitchedOut {
        side: outgoing.side,
        slot: outgoing.slot,
    })
}

/// Puts `roster_slot` on the field. Entry hooks are run separately so simultaneous entries can
/// be ordered by speed.
pub fn switch_in(ctx: &mut TurnContext, side: SideId, roster_slot: usize) -> BattleResult<()> {
    debug!(?side, roster_slot, "switched in");
    ctx.emit(BattleEvent::SwitchedIn {
        side,
        slot: roster_slot,
    })?;
    ctx.entered_this_turn.push(CombatantRef::new(side, roster_slot));
    Ok(())
}

/// Entry hooks for both active combatants after a simultaneous entry, faster first.
pub fn run_simultaneous_entry_hooks(ctx: &mut TurnContext, sides: &[SideId]) -> BattleResult<()> {
    if let [side] = sides {
        let holder = ctx.state.active_ref(*side);
        return ctx.run_switch_in_hooks(holder);
    }
    let order = ctx.speed_order()?;
    for side in order {
        if sides.contains(&side) {
            let holder = ctx.state.active_ref(side);
            ctx.run_switch_in_hooks(holder)?;
        }
    }
    Ok(())
}
