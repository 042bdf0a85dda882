use super::EffectContext;
use crate::battle::engine::{StatChangeOrigin, TurnContext};
use crate::errors::BattleResult;
use schema::StatChange;

/// Applies each stage change to its own target. Changes aimed at the opponent pass through the
/// opponent's stat-change hooks; the user's own changes never do.
pub(super) fn apply_stat_changes(
    ctx: &mut TurnContext,
    effect_ctx: &EffectContext,
    changes: &[StatChange],
) -> BattleResult<()> {
    for change in changes {
        let target = effect_ctx.target_ref(change.target);
        let origin = if target == effect_ctx.attacker {
            StatChangeOrigin::Own
        } else {
            StatChangeOrigin::Opponent { by_ability: None }
        };
        ctx.change_stat(target, change.stat, change.stages, origin)?;
    }
    Ok(())
}
