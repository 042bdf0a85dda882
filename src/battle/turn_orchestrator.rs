//! Turn resolution entry points.
//!
//! `resolve_turn` never touches the state it is given. It validates the submitted actions,
//! resolves them against a scratch copy, and returns the event log; the caller commits the turn
//! by handing that log to [`crate::battle::apply::apply`].

use crate::battle::abilities::{hooks_for, HookEffect};
use crate::battle::conditions::{condition_hooks, StatusTick};
use crate::battle::engine::{hook_context, TurnContext};
use crate::battle::move_effects::execute_attack;
use crate::battle::state::{
    Action, BattleEvent, BattleState, CombatantRef, EventBus, IndirectCause, SideId,
    WeatherSource,
};
use crate::battle::stats::effective_speed;
use crate::battle::switching::{execute_switch, run_simultaneous_entry_hooks, switch_in, switch_out};
use crate::errors::{ActionError, BattleResult};
use schema::{PokemonType, VolatileKind, Weather};
use std::cmp::Ordering;
use tracing::{debug, info};

/// Sends both leads onto the field and runs their entry hooks, faster lead first.
pub fn start_battle(state: &BattleState) -> BattleResult<EventBus> {
    if state.outcome().is_some() {
        return Err(ActionError::BattleFinished.into());
    }
    let mut ctx = TurnContext::new(state);
    for side in SideId::BOTH {
        let slot = ctx.state.side(side).active;
        switch_in(&mut ctx, side, slot)?;
    }
    run_simultaneous_entry_hooks(&mut ctx, &SideId::BOTH)?;
    ctx.resolve_faints(SideId::BOTH)?;
    info!(battle_id = %state.battle_id, "battle started");
    ctx.finish()
}

/// Resolves one turn. While a side is owed a replacement, the call resolves the replacement
/// phase instead and only accepts those switches.
pub fn resolve_turn(state: &BattleState, actions: &[Action]) -> BattleResult<EventBus> {
    if state.outcome().is_some() {
        return Err(ActionError::BattleFinished.into());
    }
    let owed = state.awaiting_replacement();
    if !owed.is_empty() {
        return resolve_replacements(state, actions, &owed);
    }

    validate_turn_actions(state, actions)?;

    let mut ctx = TurnContext::new(state);
    let turn_number = state.turn_number;
    ctx.emit(BattleEvent::TurnStarted { turn_number })?;

    for action in ordered_actions(&mut ctx, actions)? {
        if ctx.battle_over() {
            break;
        }
        debug!(%action, "resolving action");
        match action {
            Action::Switch { side, roster_slot } => execute_switch(&mut ctx, side, roster_slot)?,
            Action::Attack { side, move_slot } => execute_attack(&mut ctx, side, move_slot)?,
        }
    }

    if !ctx.battle_over() {
        execute_end_of_turn(&mut ctx)?;
    }

    ctx.emit(BattleEvent::TurnEnded { turn_number })?;
    info!(
        battle_id = %state.battle_id,
        turn = turn_number,
        events = ctx.bus.len(),
        "turn resolved"
    );
    ctx.finish()
}

// --- Validation ---

fn reject_duplicates(actions: &[Action]) -> BattleResult<()> {
    for side in SideId::BOTH {
        if actions.iter().filter(|a| a.side() == side).count() > 1 {
            return Err(ActionError::DuplicateAction(side).into());
        }
    }
    Ok(())
}

fn validate_switch_target(state: &BattleState, side: SideId, roster_slot: usize) -> BattleResult<()> {
    let side_state = state.side(side);
    let Some(target) = side_state.roster.get(roster_slot) else {
        return Err(ActionError::InvalidRosterSlot {
            side,
            slot: roster_slot,
        }
        .into());
    };
    if target.is_fainted() {
        return Err(ActionError::TargetFainted {
            side,
            slot: roster_slot,
        }
        .into());
    }
    if side_state.active == roster_slot {
        return Err(ActionError::AlreadyActive {
            side,
            slot: roster_slot,
        }
        .into());
    }
    Ok(())
}

/// Rejects the whole submission before any event exists.
fn validate_turn_actions(state: &BattleState, actions: &[Action]) -> BattleResult<()> {
    reject_duplicates(actions)?;
    for action in actions {
        let side = action.side();
        let active = state.active(side)?;
        match *action {
            Action::Attack { move_slot, .. } => {
                if active.is_fainted() {
                    return Err(ActionError::NoActiveCombatant(side).into());
                }
                let Some(slot) = active.move_slot(move_slot) else {
                    return Err(ActionError::InvalidMoveSlot {
                        side,
                        slot: move_slot,
                    }
                    .into());
                };
                if slot.pp == 0 {
                    return Err(ActionError::NoPpRemaining {
                        side,
                        slot: move_slot,
                    }
                    .into());
                }
            }
            Action::Switch { roster_slot, .. } => validate_switch_target(state, side, roster_slot)?,
        }
    }
    Ok(())
}

// --- Ordering ---

fn attack_priority(ctx: &TurnContext, side: SideId, move_slot: usize) -> BattleResult<i8> {
    Ok(ctx
        .state
        .active(side)?
        .move_slot(move_slot)
        .map_or(0, |slot| slot.data.priority))
}

/// Switches first, host before client. Attacks after, by priority tier then effective speed.
fn ordered_actions(ctx: &mut TurnContext, actions: &[Action]) -> BattleResult<Vec<Action>> {
    let mut ordered: Vec<Action> = SideId::BOTH
        .into_iter()
        .filter_map(|side| {
            actions
                .iter()
                .find(|a| a.side() == side && matches!(a, Action::Switch { .. }))
                .copied()
        })
        .collect();

    let mut attacks: Vec<(Action, i8)> = Vec::with_capacity(2);
    for action in actions {
        if let Action::Attack { side, move_slot } = *action {
            attacks.push((*action, attack_priority(ctx, side, move_slot)?));
        }
    }

    match attacks.as_slice() {
        [] => {}
        [(only, _)] => ordered.push(*only),
        [(first, first_priority), (second, second_priority), ..] => {
            let first_goes_first = match first_priority.cmp(second_priority) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => ctx.speed_order()?[0] == first.side(),
            };
            if first_goes_first {
                ordered.extend([*first, *second]);
            } else {
                ordered.extend([*second, *first]);
            }
        }
    }
    Ok(ordered)
}

// --- Replacement phase ---

fn resolve_replacements(state: &BattleState, actions: &[Action], owed: &[SideId]) -> BattleResult<EventBus> {
    reject_duplicates(actions)?;
    for action in actions {
        let side = action.side();
        match *action {
            _ if !owed.contains(&side) => return Err(ActionError::NotAwaitingReplacement(side).into()),
            Action::Attack { .. } => return Err(ActionError::ReplacementRequired(side).into()),
            Action::Switch { roster_slot, .. } => validate_switch_target(state, side, roster_slot)?,
        }
    }
    if let Some(&missing) = owed.iter().find(|&&side| !actions.iter().any(|a| a.side() == side)) {
        return Err(ActionError::ReplacementRequired(missing).into());
    }

    let mut ctx = TurnContext::new(state);
    for action in actions {
        if let Action::Switch { side, roster_slot } = *action {
            let fainted = ctx.state.active_ref(side);
            switch_out(&mut ctx, fainted)?;
            switch_in(&mut ctx, side, roster_slot)?;
        }
    }
    run_simultaneous_entry_hooks(&mut ctx, owed)?;
    ctx.resolve_faints(SideId::BOTH)?;
    info!(battle_id = %state.battle_id, sides = owed.len(), "replacements resolved");
    ctx.finish()
}

// --- End of turn ---

fn execute_end_of_turn(ctx: &mut TurnContext) -> BattleResult<()> {
    let order = SideId::BOTH;

    tick_weather(ctx)?;
    apply_weather_damage(ctx)?;
    ctx.resolve_faints(order)?;

    apply_status_damage(ctx)?;
    ctx.resolve_faints(order)?;

    apply_ability_end_of_turn(ctx)?;
    ctx.resolve_faints(order)?;

    tick_counters(ctx)
}

fn standing_actives(ctx: &TurnContext) -> Vec<CombatantRef> {
    SideId::BOTH
        .into_iter()
        .map(|side| ctx.state.active_ref(side))
        .filter(|&r| ctx.is_standing(r))
        .collect()
}

/// Counts down move-set weather; ability weather has no counter and never expires.
fn tick_weather(ctx: &mut TurnContext) -> BattleResult<()> {
    if ctx.state.field.weather.is_none() {
        return Ok(());
    }
    match ctx.state.field.weather_turns {
        Some(turns) if turns <= 1 => ctx.set_weather(None, WeatherSource::Expired, None),
        Some(turns) => ctx.emit(BattleEvent::WeatherTicked { remaining: turns - 1 }),
        None => Ok(()),
    }
}

fn weather_exempt_types(weather: Weather) -> &'static [PokemonType] {
    match weather {
        Weather::Sandstorm => &[PokemonType::Rock, PokemonType::Ground, PokemonType::Steel],
        Weather::Hail => &[PokemonType::Ice],
        Weather::Rain | Weather::Sun => &[],
    }
}

fn apply_weather_damage(ctx: &mut TurnContext) -> BattleResult<()> {
    let Some(weather @ (Weather::Sandstorm | Weather::Hail)) = ctx.weather() else {
        return Ok(());
    };
    for target in standing_actives(ctx) {
        let combatant = ctx.combatant(target)?;
        let exempt = weather_exempt_types(weather).iter().any(|&t| combatant.has_type(t))
            || hooks_for(combatant).is_some_and(|h| h.weather_immune(weather));
        if exempt {
            continue;
        }
        let amount = combatant.hp_fraction(16);
        ctx.indirect_damage(target, IndirectCause::Weather(weather), amount)?;
    }
    Ok(())
}

fn apply_status_damage(ctx: &mut TurnContext) -> BattleResult<()> {
    for target in standing_actives(ctx) {
        let combatant = ctx.combatant(target)?;
        let Some(status) = combatant.status else {
            continue;
        };
        let hooks = hooks_for(combatant);
        if status.is_poison() && hooks.is_some_and(|h| h.heals_from_poison()) {
            if let Some(hooks) = hooks {
                ctx.trigger_ability(target, hooks.name(), vec![HookEffect::HealFraction(8)], None)?;
            }
            continue;
        }
        if let Some(amount) = condition_hooks(status.kind()).end_of_turn_damage(status, combatant) {
            ctx.indirect_damage(target, IndirectCause::Status(status.kind()), amount)?;
        }
    }
    Ok(())
}

fn apply_ability_end_of_turn(ctx: &mut TurnContext) -> BattleResult<()> {
    for holder in standing_actives(ctx) {
        // An earlier holder's effect may have knocked this one out.
        if !ctx.is_standing(holder) {
            continue;
        }
        let Some(hooks) = hooks_for(ctx.state.combatant(holder)?) else {
            continue;
        };
        let hook_ctx = hook_context(&ctx.state, &ctx.entered_this_turn, holder)?;
        let effects = hooks.on_end_of_turn(&hook_ctx, &mut ctx.rng);
        if !effects.is_empty() {
            ctx.trigger_ability(holder, hooks.name(), effects, None)?;
        }
    }
    Ok(())
}

fn tick_volatile(ctx: &mut TurnContext, target: CombatantRef, volatile: VolatileKind, turns: u8) -> BattleResult<()> {
    match turns {
        0 => Ok(()),
        1 => ctx.emit(BattleEvent::VolatileEnded { target, volatile }),
        _ => ctx.emit(BattleEvent::VolatileTicked {
            target,
            volatile,
            remaining: turns - 1,
        }),
    }
}

/// Sleep and toxic counters, confusion and taunt timers, and the per-turn flinch flag.
fn tick_counters(ctx: &mut TurnContext) -> BattleResult<()> {
    for target in standing_actives(ctx) {
        let combatant = ctx.combatant(target)?;
        let status = combatant.status;
        let volatile = combatant.volatile.clone();

        if let Some(status) = status {
            match condition_hooks(status.kind()).end_of_turn_tick(status) {
                StatusTick::Unchanged => {}
                StatusTick::Progress(next) => ctx.emit(BattleEvent::StatusProgressed {
                    target,
                    status: next,
                })?,
                StatusTick::Cure => ctx.emit(BattleEvent::StatusCured { target, status })?,
            }
        }
        tick_volatile(ctx, target, VolatileKind::Confusion, volatile.confusion_turns)?;
        tick_volatile(ctx, target, VolatileKind::Taunt, volatile.taunt_turns)?;
        if volatile.flinched {
            ctx.emit(BattleEvent::FlinchCleared { target })?;
        }
    }
    Ok(())
}

/// Effective speed of a side's active combatant under the current weather. Used by the move
/// selector to predict turn order without drawing from the stream.
pub fn predicted_speed(state: &BattleState, side: SideId) -> BattleResult<u32> {
    Ok(effective_speed(state.active(side)?, state.field.effective_weather()))
}
