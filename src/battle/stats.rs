use crate::battle::abilities::{hooks_for, AbilityHooks};
use crate::pokemon::{Combatant, StatusCondition};
use schema::{MoveCategory, MoveData, StatType, StatusKind, Weather};

/// Stat stage multiplier as an exact fraction: `(2+s)/2` above zero, `2/(2-s)` below.
pub fn stage_fraction(stage: i8) -> (u32, u32) {
    let stage = stage.clamp(-6, 6) as i32;
    if stage >= 0 {
        ((2 + stage) as u32, 2)
    } else {
        (2, (2 - stage) as u32)
    }
}

/// Accuracy/evasion stage multiplier: `(3+s)/3` above zero, `3/(3-s)` below.
pub fn accuracy_stage_fraction(stage: i8) -> (u32, u32) {
    let stage = stage.clamp(-6, 6) as i32;
    if stage >= 0 {
        ((3 + stage) as u32, 3)
    } else {
        (3, (3 - stage) as u32)
    }
}

pub fn stage_multiplier(stage: i8) -> f64 {
    let (num, den) = stage_fraction(stage);
    num as f64 / den as f64
}

pub fn accuracy_stage_multiplier(stage: i8) -> f64 {
    let (num, den) = accuracy_stage_fraction(stage);
    num as f64 / den as f64
}

/// Scales a raw stat by its stage, truncating.
pub fn apply_stat_stage_multiplier(value: u32, stage: i8) -> u32 {
    let (num, den) = stage_fraction(stage);
    value * num / den
}

fn ignores_penalty(hooks: Option<&'static dyn AbilityHooks>, status: StatusKind) -> bool {
    hooks.is_some_and(|h| h.ignores_status_penalty(status))
}

/// Speed used for turn order: stage, ability and paralysis applied.
pub fn effective_speed(combatant: &Combatant, weather: Option<Weather>) -> u32 {
    let hooks = hooks_for(combatant);
    let mut speed = apply_stat_stage_multiplier(
        combatant.raw_stat(StatType::Speed) as u32,
        combatant.stat_stage(StatType::Speed),
    );

    if let Some(hooks) = hooks {
        speed = hooks.modify_speed(combatant, weather, speed);
    }

    if combatant.status == Some(StatusCondition::Paralysis)
        && !ignores_penalty(hooks, StatusKind::Paralysis)
    {
        speed /= 2;
    }

    speed
}

fn attack_stat(category: MoveCategory) -> Option<StatType> {
    match category {
        MoveCategory::Physical => Some(StatType::Attack),
        MoveCategory::Special => Some(StatType::SpecialAttack),
        MoveCategory::Status => None,
    }
}

fn defense_stat(category: MoveCategory) -> Option<StatType> {
    match category {
        MoveCategory::Physical => Some(StatType::Defense),
        MoveCategory::Special => Some(StatType::SpecialDefense),
        MoveCategory::Status => None,
    }
}

/// Attacking stat for `move_data`, including stages, both sides' abilities and burn.
/// A critical hit ignores the attacker's negative stages.
pub fn effective_attack(
    attacker: &Combatant,
    defender: &Combatant,
    move_data: &MoveData,
    critical: bool,
) -> u32 {
    let Some(stat) = attack_stat(move_data.category) else {
        return 0;
    };

    let mut stage = attacker.stat_stage(stat);
    if critical && stage < 0 {
        stage = 0;
    }
    let mut attack = apply_stat_stage_multiplier(attacker.raw_stat(stat) as u32, stage);

    let attacker_hooks = hooks_for(attacker);
    if let Some(hooks) = attacker_hooks {
        attack = hooks.modify_attack(attacker, move_data, attack);
    }
    if let Some(hooks) = hooks_for(defender) {
        attack = hooks.modify_incoming_attack(move_data, attack);
    }

    if move_data.category == MoveCategory::Physical
        && attacker.status == Some(StatusCondition::Burn)
        && !ignores_penalty(attacker_hooks, StatusKind::Burn)
    {
        attack /= 2;
    }

    attack.max(1)
}

/// Defending stat for `move_data`. A critical hit ignores the defender's positive stages.
pub fn effective_defense(defender: &Combatant, move_data: &MoveData, critical: bool) -> u32 {
    let Some(stat) = defense_stat(move_data.category) else {
        return 1;
    };

    let mut stage = defender.stat_stage(stat);
    if critical && stage > 0 {
        stage = 0;
    }
    let mut defense = apply_stat_stage_multiplier(defender.raw_stat(stat) as u32, stage);

    if let Some(hooks) = hooks_for(defender) {
        defense = hooks.modify_defense(defender, move_data, defense);
    }

    defense.max(1)
}

/// Percentage threshold a 1..=100 roll must not exceed to hit, or `None` if the move cannot
/// miss.
pub fn hit_threshold(attacker: &Combatant, defender: &Combatant, move_data: &MoveData) -> Option<u32> {
    let base_accuracy = move_data.accuracy?;

    let attacker_hooks = hooks_for(attacker);
    let no_guard = attacker_hooks.is_some_and(|h| h.always_hits())
        || hooks_for(defender).is_some_and(|h| h.always_hits());
    if no_guard {
        return None;
    }

    let (acc_num, acc_den) = accuracy_stage_fraction(attacker.stat_stage(StatType::Accuracy));
    let (eva_num, eva_den) = accuracy_stage_fraction(-defender.stat_stage(StatType::Evasion));
    let mut accuracy = base_accuracy as u32 * acc_num / acc_den * eva_num / eva_den;

    if let Some(hooks) = attacker_hooks {
        accuracy = hooks.modify_accuracy(move_data, accuracy);
    }

    Some(accuracy.max(1))
}
