use super::EffectContext;
use crate::battle::engine::{InflictOutcome, TurnContext};
use crate::battle::state::{ActionFailureReason, BattleEvent, SideId};
use crate::errors::BattleResult;
use schema::{StatusKind, VolatileKind};

/// Primary effects report why they failed; secondary effects fail quietly.
fn report_outcome(ctx: &mut TurnContext, side: SideId, outcome: InflictOutcome, primary: bool) -> BattleResult<()> {
    if !primary {
        return Ok(());
    }
    let reason = match outcome {
        InflictOutcome::Inflicted => return Ok(()),
        InflictOutcome::AlreadyAfflicted => ActionFailureReason::AlreadyInEffect,
        InflictOutcome::Immune => ActionFailureReason::NoEffect,
    };
    ctx.emit(BattleEvent::ActionFailed { side, reason })
}

pub(super) fn apply_status_effect(
    ctx: &mut TurnContext,
    effect_ctx: &EffectContext,
    kind: StatusKind,
    primary: bool,
) -> BattleResult<()> {
    let outcome = ctx.inflict_status(effect_ctx.defender, kind)?;
    report_outcome(ctx, effect_ctx.attacker.side, outcome, primary)
}

pub(super) fn apply_volatile_effect(
    ctx: &mut TurnContext,
    effect_ctx: &EffectContext,
    kind: VolatileKind,
    primary: bool,
) -> BattleResult<()> {
    let outcome = ctx.apply_volatile(effect_ctx.defender, kind, effect_ctx.attacker)?;
    report_outcome(ctx, effect_ctx.attacker.side, outcome, primary)
}

pub(super) fn apply_flinch_effect(ctx: &mut TurnContext, effect_ctx: &EffectContext, chance: u8) -> BattleResult<()> {
    if !ctx.is_standing(effect_ctx.defender) {
        return Ok(());
    }
    if ctx.rng.chance(chance, "flinch") {
        ctx.apply_flinch(effect_ctx.defender)?;
    }
    Ok(())
}
