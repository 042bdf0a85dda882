//! Damage formula.
//!
//! `base = (((2*level/5 + 2) * power * A / D) / 50) + 2`, then crit, STAB, weather, type
//! effectiveness, type boost and the random factor, each floored in that order.

use crate::battle::abilities::hooks_for;
use crate::battle::rng::TurnRng;
use crate::battle::stats::{effective_attack, effective_defense};
use crate::pokemon::Combatant;
use schema::{MoveCategory, MoveData, MoveEffects, MoveTarget, PokemonType, Weather};

pub const DEFAULT_CRIT_MULTIPLIER: f32 = 1.5;
pub const STAB_MULTIPLIER: f32 = 1.5;
pub const TYPE_BOOST_MULTIPLIER: f32 = 1.5;

/// Crit lands on a roll at or below this value.
const CRIT_THRESHOLD: u8 = 6;
const HIGH_CRIT_THRESHOLD: u8 = 12;

fn apply_modifier(value: u32, modifier: f32) -> u32 {
    (value as f32 * modifier).floor() as u32
}

/// Maps a 1..=100 roll onto the 85..=100 percent variance range.
pub fn random_percent(roll: u8) -> u32 {
    85 + (roll.clamp(1, 100) as u32 - 1) * 16 / 100
}

fn apply_random_factor(value: u32, percent: u32) -> u32 {
    value * percent / 100
}

/// Combined type multiplier against the defender's current battle type, after the defender's
/// ability had its say (Levitate, Wonder Guard).
pub fn type_multiplier(defender: &Combatant, move_data: &MoveData) -> f32 {
    let computed = PokemonType::effectiveness_against(move_data.move_type, &defender.current_types());
    match hooks_for(defender) {
        Some(hooks) => hooks.modify_effectiveness(move_data.move_type, computed),
        None => computed,
    }
}

pub fn weather_multiplier(move_type: PokemonType, weather: Option<Weather>) -> f32 {
    match (weather, move_type) {
        (Some(Weather::Sun), PokemonType::Fire) | (Some(Weather::Rain), PokemonType::Water) => 1.5,
        (Some(Weather::Sun), PokemonType::Water) | (Some(Weather::Rain), PokemonType::Fire) => 0.5,
        _ => 1.0,
    }
}

pub fn crit_multiplier(attacker: &Combatant) -> f32 {
    hooks_for(attacker)
        .and_then(|hooks| hooks.crit_multiplier())
        .unwrap_or(DEFAULT_CRIT_MULTIPLIER)
}

fn base_damage(attacker: &Combatant, defender: &Combatant, move_data: &MoveData, critical: bool) -> u32 {
    let power = move_data.power.unwrap_or(0) as u32;
    let level = attacker.level as u32;
    let attack = effective_attack(attacker, defender, move_data, critical);
    let defense = effective_defense(defender, move_data, critical);
    ((2 * level / 5 + 2) * power * attack / defense) / 50 + 2
}

/// Damage with every modifier except the random factor. `None` when the move deals no damage
/// (status move, zero power, or a 0x type matchup).
pub fn damage_before_random(
    attacker: &Combatant,
    defender: &Combatant,
    move_data: &MoveData,
    critical: bool,
    weather: Option<Weather>,
) -> Option<u32> {
    if !move_data.deals_damage() {
        return None;
    }
    let effectiveness = type_multiplier(defender, move_data);
    if effectiveness == 0.0 {
        return None;
    }

    let mut damage = base_damage(attacker, defender, move_data, critical);
    if critical {
        damage = apply_modifier(damage, crit_multiplier(attacker));
    }
    if move_data.move_type != PokemonType::Typeless && attacker.has_type(move_data.move_type) {
        damage = apply_modifier(damage, STAB_MULTIPLIER);
    }
    damage = apply_modifier(damage, weather_multiplier(move_data.move_type, weather));
    damage = apply_modifier(damage, effectiveness);
    if attacker.type_boost == Some(move_data.move_type) {
        damage = apply_modifier(damage, TYPE_BOOST_MULTIPLIER);
    }
    Some(damage)
}

/// Damage of a single hit. Consumes exactly one draw unless the matchup is 0x.
pub fn calculate_damage(
    attacker: &Combatant,
    defender: &Combatant,
    move_data: &MoveData,
    critical: bool,
    weather: Option<Weather>,
    rng: &mut TurnRng,
) -> u16 {
    let Some(damage) = damage_before_random(attacker, defender, move_data, critical, weather) else {
        return 0;
    };
    let roll = rng.next_outcome("damage roll");
    apply_random_factor(damage, random_percent(roll)).clamp(1, u16::MAX as u32) as u16
}

/// Deterministic midpoint used for previews: the mean of the minimum and maximum rolls.
pub fn expected_damage(
    attacker: &Combatant,
    defender: &Combatant,
    move_data: &MoveData,
    weather: Option<Weather>,
) -> f64 {
    match damage_before_random(attacker, defender, move_data, false, weather) {
        Some(damage) => {
            let low = apply_random_factor(damage, 85).max(1);
            let high = apply_random_factor(damage, 100).max(1);
            (low + high) as f64 / 2.0
        }
        None => 0.0,
    }
}

/// Rolls for a critical hit. No draw is consumed against a crit-immune defender.
pub fn roll_critical(defender: &Combatant, move_data: &MoveData, rng: &mut TurnRng) -> bool {
    if hooks_for(defender).is_some_and(|hooks| hooks.prevents_crit()) {
        return false;
    }
    let threshold = if move_data.high_crit {
        HIGH_CRIT_THRESHOLD
    } else {
        CRIT_THRESHOLD
    };
    rng.next_outcome("critical hit") <= threshold
}

/// The typeless 40-power physical hit a confused combatant deals to itself.
pub fn confusion_self_hit_move() -> MoveData {
    MoveData {
        name: "Confusion self-hit".to_string(),
        power: Some(40),
        accuracy: None,
        move_type: PokemonType::Typeless,
        category: MoveCategory::Physical,
        max_pp: 0,
        priority: 0,
        target: MoveTarget::User,
        contact: false,
        high_crit: false,
        effects: MoveEffects::default(),
    }
}

pub fn confusion_damage(combatant: &Combatant, rng: &mut TurnRng) -> u16 {
    let move_data = confusion_self_hit_move();
    let base = base_damage(combatant, combatant, &move_data, false);
    let roll = rng.next_outcome("confusion self-hit damage");
    apply_random_factor(base, random_percent(roll)).clamp(1, u16::MAX as u32) as u16
}
