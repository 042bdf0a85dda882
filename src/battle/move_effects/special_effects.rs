use super::EffectContext;
use crate::battle::engine::TurnContext;
use crate::battle::state::{ActionFailureReason, BattleEvent, WeatherSource};
use crate::errors::BattleResult;
use schema::Weather;

/// Weather summoned by a move lasts this many end-of-turn passes.
pub const MOVE_WEATHER_TURNS: u8 = 5;

pub(super) fn apply_weather_effect(
    ctx: &mut TurnContext,
    effect_ctx: &EffectContext,
    weather: Weather,
) -> BattleResult<()> {
    let user = effect_ctx.attacker;
    if ctx.state.field.weather == Some(weather) {
        return ctx.emit(BattleEvent::ActionFailed {
            side: user.side,
            reason: ActionFailureReason::AlreadyInEffect,
        });
    }
    ctx.set_weather(
        Some(weather),
        WeatherSource::Move { user },
        Some(MOVE_WEATHER_TURNS),
    )
}

/// Heals the user by a percentage of its max HP.
pub(super) fn apply_heal_effect(ctx: &mut TurnContext, effect_ctx: &EffectContext, percent: u8) -> BattleResult<()> {
    let user = effect_ctx.attacker;
    let combatant = ctx.combatant(user)?;
    if combatant.is_full_hp() {
        return ctx.emit(BattleEvent::ActionFailed {
            side: user.side,
            reason: ActionFailureReason::AlreadyInEffect,
        });
    }
    let amount = ((combatant.max_hp as u32 * percent as u32 / 100) as u16).max(1);
    ctx.heal(user, amount)
}
