//! Ability hook registry.
//!
//! Each registered ability is a small record implementing only the hooks it cares about; every
//! other hook falls through to the trait's no-op default. The registry is a static map from the
//! normalized ability id to that record, so a hook site is one lookup and one virtual call.

use crate::battle::rng::TurnRng;
use crate::battle::state::{BattleState, CombatantRef};
use crate::catalog::normalize_id;
use crate::errors::BattleResult;
use crate::pokemon::Combatant;
use phf::phf_map;
use schema::{MoveCategory, MoveData, PokemonType, StatType, StatusKind, VolatileKind, Weather};

/// What a hook tells the caller to do with the default outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive<T> {
    NoOp,
    /// Replace the value the caller was about to use, and run `effects` for the holder.
    Modify { value: T, effects: Vec<HookEffect> },
    /// Skip the default outcome entirely; run `effects` instead.
    ShortCircuit(Vec<HookEffect>),
}

impl<T> Directive<T> {
    pub fn blocks(&self) -> bool {
        matches!(self, Directive::ShortCircuit(_))
    }
}

/// Side effects a hook asks the resolver to carry out on its holder's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum HookEffect {
    SetWeather(Weather),
    AddWeatherSuppressor,
    RemoveWeatherSuppressor,
    /// Subject to the opposing combatant's own stat-change hooks.
    ChangeOpponentStat { stat: StatType, stages: i8 },
    ChangeOwnStat { stat: StatType, stages: i8 },
    CopyOpponentAbility,
    SetTypeOverride(Option<PokemonType>),
    CureOwnStatus,
    /// Heal `max_hp / n`.
    HealFraction(u16),
    /// Lose `max_hp / n`.
    DamageFraction(u16),
    ToggleLoafing,
    ActivateTypeBoost(PokemonType),
    ConsumeLastStand,
    /// Contact reactions aimed at the attacker.
    AttackerStatus(StatusKind),
    InfatuateAttacker,
    DamageAttackerFraction(u16),
}

/// Something a combatant can be afflicted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affliction {
    Status(StatusKind),
    Volatile(VolatileKind),
    Flinch,
}

/// Read-only view handed to a hook.
pub struct HookContext<'a> {
    pub state: &'a BattleState,
    pub holder: CombatantRef,
    pub combatant: &'a Combatant,
    /// The holder switched in during the turn being resolved.
    pub entered_this_turn: bool,
}

impl<'a> HookContext<'a> {
    pub fn new(state: &'a BattleState, holder: CombatantRef) -> BattleResult<Self> {
        Ok(Self {
            state,
            holder,
            combatant: state.combatant(holder)?,
            entered_this_turn: false,
        })
    }

    pub fn entered_this_turn(mut self, entered: bool) -> Self {
        self.entered_this_turn = entered;
        self
    }

    /// The opposing active combatant, if it is still standing.
    pub fn opponent(&self) -> Option<&'a Combatant> {
        self.state
            .active(self.holder.side.opponent())
            .ok()
            .filter(|c| !c.is_fainted())
    }

    pub fn weather(&self) -> Option<Weather> {
        self.state.field.effective_weather()
    }
}

pub trait AbilityHooks: Sync {
    fn name(&self) -> &'static str;

    fn on_switch_in(&self, _ctx: &HookContext) -> Vec<HookEffect> {
        Vec::new()
    }

    fn on_switch_out(&self, _ctx: &HookContext) -> Vec<HookEffect> {
        Vec::new()
    }

    /// Fires whenever the effective weather may have changed.
    fn on_weather_set(&self, _ctx: &HookContext) -> Vec<HookEffect> {
        Vec::new()
    }

    /// Only externally imposed changes reach this hook. `by_ability` names the opposing ability
    /// that caused it, if any.
    fn on_stat_change_attempt(
        &self,
        _ctx: &HookContext,
        _stat: StatType,
        _stages: i8,
        _by_ability: Option<&str>,
    ) -> Directive<i8> {
        Directive::NoOp
    }

    fn on_status_attempt(&self, _ctx: &HookContext, _affliction: Affliction) -> Directive<()> {
        Directive::NoOp
    }

    /// Runs as the defender before accuracy; a short-circuit absorbs the move.
    fn on_pre_hit(&self, _ctx: &HookContext, _move_data: &MoveData) -> Directive<()> {
        Directive::NoOp
    }

    /// Runs as the defender once the move is known to connect; a short-circuit converts the hit.
    fn on_damaged(&self, _ctx: &HookContext, _move_data: &MoveData) -> Directive<()> {
        Directive::NoOp
    }

    /// Runs as the defender with the computed damage.
    fn on_hit(&self, _ctx: &HookContext, _damage: u16) -> Directive<u16> {
        Directive::NoOp
    }

    fn after_damaged(&self, _ctx: &HookContext, _move_data: &MoveData) -> Vec<HookEffect> {
        Vec::new()
    }

    fn on_contact(&self, _ctx: &HookContext, _rng: &mut TurnRng) -> Vec<HookEffect> {
        Vec::new()
    }

    /// Runs for the trapper; a short-circuit keeps `escaper` on the field.
    fn on_switch_out_attempt(&self, _ctx: &HookContext, _escaper: &Combatant) -> Directive<()> {
        Directive::NoOp
    }

    fn on_end_of_turn(&self, _ctx: &HookContext, _rng: &mut TurnRng) -> Vec<HookEffect> {
        Vec::new()
    }

    fn modify_speed(&self, _holder: &Combatant, _weather: Option<Weather>, speed: u32) -> u32 {
        speed
    }

    fn modify_attack(&self, _holder: &Combatant, _move_data: &MoveData, attack: u32) -> u32 {
        attack
    }

    /// The holder is the defender; scales the attacker's stat.
    fn modify_incoming_attack(&self, _move_data: &MoveData, attack: u32) -> u32 {
        attack
    }

    fn modify_defense(&self, _holder: &Combatant, _move_data: &MoveData, defense: u32) -> u32 {
        defense
    }

    fn modify_accuracy(&self, _move_data: &MoveData, accuracy: u32) -> u32 {
        accuracy
    }

    /// The holder is the defender.
    fn modify_effectiveness(&self, _move_type: PokemonType, multiplier: f32) -> f32 {
        multiplier
    }

    fn crit_multiplier(&self) -> Option<f32> {
        None
    }

    fn prevents_crit(&self) -> bool {
        false
    }

    fn always_hits(&self) -> bool {
        false
    }

    fn negates_recoil(&self) -> bool {
        false
    }

    fn ignores_status_penalty(&self, _status: StatusKind) -> bool {
        false
    }

    fn weather_immune(&self, _weather: Weather) -> bool {
        false
    }

    fn blocks_indirect_damage(&self) -> bool {
        false
    }

    fn heals_from_poison(&self) -> bool {
        false
    }
}

static ABILITIES: phf::Map<&'static str, &'static dyn AbilityHooks> = phf_map! {
    "drizzle" => &WeatherSetter { name: "Drizzle", weather: Weather::Rain },
    "drought" => &WeatherSetter { name: "Drought", weather: Weather::Sun },
    "sandstream" => &WeatherSetter { name: "Sand Stream", weather: Weather::Sandstorm },
    "snowwarning" => &WeatherSetter { name: "Snow Warning", weather: Weather::Hail },
    "intimidate" => &Intimidate,
    "trace" => &Trace,
    "forecast" => &Forecast,
    "cloudnine" => &WeatherNullifier { name: "Cloud Nine" },
    "airlock" => &WeatherNullifier { name: "Air Lock" },
    "colorchange" => &ColorChange,
    "clearbody" => &StatDropImmunity { name: "Clear Body", stat: None },
    "whitesmoke" => &StatDropImmunity { name: "White Smoke", stat: None },
    "hypercutter" => &StatDropImmunity { name: "Hyper Cutter", stat: Some(StatType::Attack) },
    "keeneye" => &StatDropImmunity { name: "Keen Eye", stat: Some(StatType::Accuracy) },
    "bigpecks" => &StatDropImmunity { name: "Big Pecks", stat: Some(StatType::Defense) },
    "oblivious" => &Oblivious,
    "owntempo" => &AfflictionImmunity { name: "Own Tempo", blocks: &[Affliction::Volatile(VolatileKind::Confusion)] },
    "insomnia" => &AfflictionImmunity { name: "Insomnia", blocks: &[Affliction::Status(StatusKind::Sleep)] },
    "vitalspirit" => &AfflictionImmunity { name: "Vital Spirit", blocks: &[Affliction::Status(StatusKind::Sleep)] },
    "limber" => &AfflictionImmunity { name: "Limber", blocks: &[Affliction::Status(StatusKind::Paralysis)] },
    "waterveil" => &AfflictionImmunity { name: "Water Veil", blocks: &[Affliction::Status(StatusKind::Burn)] },
    "immunity" => &AfflictionImmunity {
        name: "Immunity",
        blocks: &[Affliction::Status(StatusKind::Poison), Affliction::Status(StatusKind::Toxic)],
    },
    "magmaarmor" => &AfflictionImmunity { name: "Magma Armor", blocks: &[Affliction::Status(StatusKind::Freeze)] },
    "innerfocus" => &AfflictionImmunity { name: "Inner Focus", blocks: &[Affliction::Flinch] },
    "voltabsorb" => &TypeAbsorber { name: "Volt Absorb", absorbs: PokemonType::Electric },
    "waterabsorb" => &TypeAbsorber { name: "Water Absorb", absorbs: PokemonType::Water },
    "dryskin" => &DrySkin,
    "flashfire" => &FlashFire,
    "levitate" => &Levitate,
    "wonderguard" => &WonderGuard,
    "sturdy" => &Sturdy,
    "lightningrod" => &StatRedirect { name: "Lightning Rod", absorbs: PokemonType::Electric, stat: StatType::SpecialAttack },
    "stormdrain" => &StatRedirect { name: "Storm Drain", absorbs: PokemonType::Water, stat: StatType::SpecialAttack },
    "motordrive" => &StatRedirect { name: "Motor Drive", absorbs: PokemonType::Electric, stat: StatType::Speed },
    "sapsipper" => &StatRedirect { name: "Sap Sipper", absorbs: PokemonType::Grass, stat: StatType::Attack },
    "shadowtag" => &ShadowTag,
    "arenatrap" => &ArenaTrap,
    "magnetpull" => &MagnetPull,
    "speedboost" => &SpeedBoost,
    "raindish" => &WeatherHealer { name: "Rain Dish", weather: Weather::Rain },
    "icebody" => &WeatherHealer { name: "Ice Body", weather: Weather::Hail },
    "shedskin" => &ShedSkin,
    "truant" => &Truant,
    "naturalcure" => &NaturalCure,
    "static" => &ContactStatus { name: "Static", status: StatusKind::Paralysis },
    "flamebody" => &ContactStatus { name: "Flame Body", status: StatusKind::Burn },
    "poisonpoint" => &ContactStatus { name: "Poison Point", status: StatusKind::Poison },
    "cutecharm" => &CuteCharm,
    "roughskin" => &RoughSkin,
    "swiftswim" => &WeatherSpeed { name: "Swift Swim", weather: Weather::Rain },
    "chlorophyll" => &WeatherSpeed { name: "Chlorophyll", weather: Weather::Sun },
    "sandrush" => &WeatherSpeed { name: "Sand Rush", weather: Weather::Sandstorm },
    "quickfeet" => &QuickFeet,
    "hugepower" => &PowerDoubler { name: "Huge Power" },
    "purepower" => &PowerDoubler { name: "Pure Power" },
    "guts" => &Guts,
    "hustle" => &Hustle,
    "blaze" => &Pinch { name: "Blaze", boosted: PokemonType::Fire },
    "torrent" => &Pinch { name: "Torrent", boosted: PokemonType::Water },
    "overgrow" => &Pinch { name: "Overgrow", boosted: PokemonType::Grass },
    "swarm" => &Pinch { name: "Swarm", boosted: PokemonType::Bug },
    "thickfat" => &ThickFat,
    "marvelscale" => &MarvelScale,
    "noguard" => &NoGuard,
    "compoundeyes" => &CompoundEyes,
    "battlearmor" => &CritBlocker { name: "Battle Armor" },
    "shellarmor" => &CritBlocker { name: "Shell Armor" },
    "sniper" => &Sniper,
    "rockhead" => &RockHead,
    "magicguard" => &MagicGuard,
    "poisonheal" => &PoisonHeal,
    "sandveil" => &WeatherShield { name: "Sand Veil", weathers: &[Weather::Sandstorm] },
    "overcoat" => &WeatherShield { name: "Overcoat", weathers: &[Weather::Sandstorm, Weather::Hail] },
    "snowcloak" => &WeatherShield { name: "Snow Cloak", weathers: &[Weather::Hail] },
};

/// Hooks for an ability name. Unregistered names are legal and simply have no hooks.
pub fn ability_hooks(name: &str) -> Option<&'static dyn AbilityHooks> {
    ABILITIES.get(normalize_id(name).as_str()).copied()
}

pub fn hooks_for(combatant: &Combatant) -> Option<&'static dyn AbilityHooks> {
    ability_hooks(&combatant.ability)
}

pub fn has_ability(combatant: &Combatant, name: &str) -> bool {
    normalize_id(&combatant.ability) == normalize_id(name)
}

// --- Switch-in and field abilities ---

struct WeatherSetter {
    name: &'static str,
    weather: Weather,
}

impl AbilityHooks for WeatherSetter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_switch_in(&self, _ctx: &HookContext) -> Vec<HookEffect> {
        vec![HookEffect::SetWeather(self.weather)]
    }
}

struct Intimidate;

impl AbilityHooks for Intimidate {
    fn name(&self) -> &'static str {
        "Intimidate"
    }

    fn on_switch_in(&self, ctx: &HookContext) -> Vec<HookEffect> {
        match ctx.opponent() {
            Some(_) => vec![HookEffect::ChangeOpponentStat {
                stat: StatType::Attack,
                stages: -1,
            }],
            None => Vec::new(),
        }
    }
}

struct Trace;

impl AbilityHooks for Trace {
    fn name(&self) -> &'static str {
        "Trace"
    }

    fn on_switch_in(&self, ctx: &HookContext) -> Vec<HookEffect> {
        match ctx.opponent() {
            Some(opponent) if !opponent.ability.is_empty() && !has_ability(opponent, "Trace") => {
                vec![HookEffect::CopyOpponentAbility]
            }
            _ => Vec::new(),
        }
    }
}

struct Forecast;

impl Forecast {
    fn form_for(weather: Option<Weather>) -> Option<PokemonType> {
        match weather {
            Some(Weather::Rain) => Some(PokemonType::Water),
            Some(Weather::Sun) => Some(PokemonType::Fire),
            Some(Weather::Hail) => Some(PokemonType::Ice),
            Some(Weather::Sandstorm) | None => None,
        }
    }

    fn update(ctx: &HookContext) -> Vec<HookEffect> {
        let form = Self::form_for(ctx.weather());
        if ctx.combatant.type_override == form {
            Vec::new()
        } else {
            vec![HookEffect::SetTypeOverride(form)]
        }
    }
}

impl AbilityHooks for Forecast {
    fn name(&self) -> &'static str {
        "Forecast"
    }

    fn on_switch_in(&self, ctx: &HookContext) -> Vec<HookEffect> {
        Self::update(ctx)
    }

    fn on_weather_set(&self, ctx: &HookContext) -> Vec<HookEffect> {
        Self::update(ctx)
    }
}

struct WeatherNullifier {
    name: &'static str,
}

impl AbilityHooks for WeatherNullifier {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_switch_in(&self, _ctx: &HookContext) -> Vec<HookEffect> {
        vec![HookEffect::AddWeatherSuppressor]
    }

    fn on_switch_out(&self, _ctx: &HookContext) -> Vec<HookEffect> {
        vec![HookEffect::RemoveWeatherSuppressor]
    }
}

struct ColorChange;

impl AbilityHooks for ColorChange {
    fn name(&self) -> &'static str {
        "Color Change"
    }

    fn after_damaged(&self, ctx: &HookContext, move_data: &MoveData) -> Vec<HookEffect> {
        if move_data.move_type == PokemonType::Typeless
            || ctx.combatant.current_types() == vec![move_data.move_type]
        {
            return Vec::new();
        }
        vec![HookEffect::SetTypeOverride(Some(move_data.move_type))]
    }
}

// --- Stat and status immunities ---

struct StatDropImmunity {
    name: &'static str,
    /// `None` protects every stat.
    stat: Option<StatType>,
}

impl AbilityHooks for StatDropImmunity {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_stat_change_attempt(
        &self,
        _ctx: &HookContext,
        stat: StatType,
        stages: i8,
        _by_ability: Option<&str>,
    ) -> Directive<i8> {
        let protected = self.stat.is_none_or(|protected| protected == stat);
        if stages < 0 && protected {
            Directive::ShortCircuit(Vec::new())
        } else {
            Directive::NoOp
        }
    }
}

/// Blocks infatuation and taunt. Also shrugs off Intimidate, which the traditional ability does
/// not do.
struct Oblivious;

impl AbilityHooks for Oblivious {
    fn name(&self) -> &'static str {
        "Oblivious"
    }

    fn on_stat_change_attempt(
        &self,
        _ctx: &HookContext,
        _stat: StatType,
        stages: i8,
        by_ability: Option<&str>,
    ) -> Directive<i8> {
        let intimidated = by_ability.is_some_and(|a| normalize_id(a) == "intimidate");
        if stages < 0 && intimidated {
            Directive::ShortCircuit(Vec::new())
        } else {
            Directive::NoOp
        }
    }

    fn on_status_attempt(&self, _ctx: &HookContext, affliction: Affliction) -> Directive<()> {
        match affliction {
            Affliction::Volatile(VolatileKind::Infatuation | VolatileKind::Taunt) => {
                Directive::ShortCircuit(Vec::new())
            }
            _ => Directive::NoOp,
        }
    }
}

struct AfflictionImmunity {
    name: &'static str,
    blocks: &'static [Affliction],
}

impl AbilityHooks for AfflictionImmunity {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_status_attempt(&self, _ctx: &HookContext, affliction: Affliction) -> Directive<()> {
        if self.blocks.contains(&affliction) {
            Directive::ShortCircuit(Vec::new())
        } else {
            Directive::NoOp
        }
    }
}

// --- Hit interception ---

struct TypeAbsorber {
    name: &'static str,
    absorbs: PokemonType,
}

impl AbilityHooks for TypeAbsorber {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_pre_hit(&self, _ctx: &HookContext, move_data: &MoveData) -> Directive<()> {
        if move_data.move_type == self.absorbs {
            Directive::ShortCircuit(vec![HookEffect::HealFraction(4)])
        } else {
            Directive::NoOp
        }
    }
}

struct DrySkin;

impl AbilityHooks for DrySkin {
    fn name(&self) -> &'static str {
        "Dry Skin"
    }

    fn on_pre_hit(&self, _ctx: &HookContext, move_data: &MoveData) -> Directive<()> {
        if move_data.move_type == PokemonType::Water {
            Directive::ShortCircuit(vec![HookEffect::HealFraction(4)])
        } else {
            Directive::NoOp
        }
    }

    fn on_end_of_turn(&self, ctx: &HookContext, _rng: &mut TurnRng) -> Vec<HookEffect> {
        match ctx.weather() {
            Some(Weather::Rain) if !ctx.combatant.is_full_hp() => vec![HookEffect::HealFraction(8)],
            Some(Weather::Sun) => vec![HookEffect::DamageFraction(8)],
            _ => Vec::new(),
        }
    }
}

struct FlashFire;

impl AbilityHooks for FlashFire {
    fn name(&self) -> &'static str {
        "Flash Fire"
    }

    fn on_pre_hit(&self, _ctx: &HookContext, move_data: &MoveData) -> Directive<()> {
        if move_data.move_type == PokemonType::Fire {
            Directive::ShortCircuit(vec![HookEffect::ActivateTypeBoost(PokemonType::Fire)])
        } else {
            Directive::NoOp
        }
    }
}

struct Levitate;

impl AbilityHooks for Levitate {
    fn name(&self) -> &'static str {
        "Levitate"
    }

    fn modify_effectiveness(&self, move_type: PokemonType, multiplier: f32) -> f32 {
        if move_type == PokemonType::Ground {
            0.0
        } else {
            multiplier
        }
    }
}

struct WonderGuard;

impl AbilityHooks for WonderGuard {
    fn name(&self) -> &'static str {
        "Wonder Guard"
    }

    fn modify_effectiveness(&self, _move_type: PokemonType, multiplier: f32) -> f32 {
        if multiplier >= 2.0 {
            multiplier
        } else {
            0.0
        }
    }
}

/// Survives a lethal hit at 1 HP from full health, once per switch-in.
struct Sturdy;

impl AbilityHooks for Sturdy {
    fn name(&self) -> &'static str {
        "Sturdy"
    }

    fn on_hit(&self, ctx: &HookContext, damage: u16) -> Directive<u16> {
        let holder = ctx.combatant;
        if holder.is_full_hp() && damage >= holder.current_hp && !holder.volatile.last_stand_used {
            Directive::Modify {
                value: holder.current_hp.saturating_sub(1),
                effects: vec![HookEffect::ConsumeLastStand],
            }
        } else {
            Directive::NoOp
        }
    }
}

struct StatRedirect {
    name: &'static str,
    absorbs: PokemonType,
    stat: StatType,
}

impl AbilityHooks for StatRedirect {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_damaged(&self, _ctx: &HookContext, move_data: &MoveData) -> Directive<()> {
        if move_data.move_type == self.absorbs {
            Directive::ShortCircuit(vec![HookEffect::ChangeOwnStat {
                stat: self.stat,
                stages: 1,
            }])
        } else {
            Directive::NoOp
        }
    }
}

// --- Trapping ---

struct ShadowTag;

impl AbilityHooks for ShadowTag {
    fn name(&self) -> &'static str {
        "Shadow Tag"
    }

    fn on_switch_out_attempt(&self, _ctx: &HookContext, escaper: &Combatant) -> Directive<()> {
        if has_ability(escaper, "Shadow Tag") {
            Directive::NoOp
        } else {
            Directive::ShortCircuit(Vec::new())
        }
    }
}

struct ArenaTrap;

impl AbilityHooks for ArenaTrap {
    fn name(&self) -> &'static str {
        "Arena Trap"
    }

    fn on_switch_out_attempt(&self, _ctx: &HookContext, escaper: &Combatant) -> Directive<()> {
        if escaper.has_type(PokemonType::Flying) || has_ability(escaper, "Levitate") {
            Directive::NoOp
        } else {
            Directive::ShortCircuit(Vec::new())
        }
    }
}

struct MagnetPull;

impl AbilityHooks for MagnetPull {
    fn name(&self) -> &'static str {
        "Magnet Pull"
    }

    fn on_switch_out_attempt(&self, _ctx: &HookContext, escaper: &Combatant) -> Directive<()> {
        if escaper.has_type(PokemonType::Steel) {
            Directive::ShortCircuit(Vec::new())
        } else {
            Directive::NoOp
        }
    }
}

// --- End of turn ---

struct SpeedBoost;

impl AbilityHooks for SpeedBoost {
    fn name(&self) -> &'static str {
        "Speed Boost"
    }

    fn on_end_of_turn(&self, ctx: &HookContext, _rng: &mut TurnRng) -> Vec<HookEffect> {
        if ctx.entered_this_turn {
            return Vec::new();
        }
        vec![HookEffect::ChangeOwnStat {
            stat: StatType::Speed,
            stages: 1,
        }]
    }
}

struct WeatherHealer {
    name: &'static str,
    weather: Weather,
}

impl AbilityHooks for WeatherHealer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_end_of_turn(&self, ctx: &HookContext, _rng: &mut TurnRng) -> Vec<HookEffect> {
        if ctx.weather() == Some(self.weather) && !ctx.combatant.is_full_hp() {
            vec![HookEffect::HealFraction(16)]
        } else {
            Vec::new()
        }
    }

    fn weather_immune(&self, weather: Weather) -> bool {
        weather == Weather::Hail && self.weather == Weather::Hail
    }
}

struct ShedSkin;

impl AbilityHooks for ShedSkin {
    fn name(&self) -> &'static str {
        "Shed Skin"
    }

    fn on_end_of_turn(&self, ctx: &HookContext, rng: &mut TurnRng) -> Vec<HookEffect> {
        if ctx.combatant.status.is_some() && rng.chance(30, "Shed Skin cure") {
            vec![HookEffect::CureOwnStatus]
        } else {
            Vec::new()
        }
    }
}

struct Truant;

impl AbilityHooks for Truant {
    fn name(&self) -> &'static str {
        "Truant"
    }

    fn on_end_of_turn(&self, ctx: &HookContext, _rng: &mut TurnRng) -> Vec<HookEffect> {
        if ctx.entered_this_turn {
            return Vec::new();
        }
        vec![HookEffect::ToggleLoafing]
    }
}

struct NaturalCure;

impl AbilityHooks for NaturalCure {
    fn name(&self) -> &'static str {
        "Natural Cure"
    }

    fn on_switch_out(&self, ctx: &HookContext) -> Vec<HookEffect> {
        if ctx.combatant.status.is_some() {
            vec![HookEffect::CureOwnStatus]
        } else {
            Vec::new()
        }
    }
}

// --- Contact reactions ---

struct ContactStatus {
    name: &'static str,
    status: StatusKind,
}

impl AbilityHooks for ContactStatus {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_contact(&self, _ctx: &HookContext, rng: &mut TurnRng) -> Vec<HookEffect> {
        if rng.chance(30, self.name) {
            vec![HookEffect::AttackerStatus(self.status)]
        } else {
            Vec::new()
        }
    }
}

struct CuteCharm;

impl AbilityHooks for CuteCharm {
    fn name(&self) -> &'static str {
        "Cute Charm"
    }

    fn on_contact(&self, _ctx: &HookContext, rng: &mut TurnRng) -> Vec<HookEffect> {
        if rng.chance(30, "Cute Charm") {
            vec![HookEffect::InfatuateAttacker]
        } else {
            Vec::new()
        }
    }
}

struct RoughSkin;

impl AbilityHooks for RoughSkin {
    fn name(&self) -> &'static str {
        "Rough Skin"
    }

    fn on_contact(&self, _ctx: &HookContext, _rng: &mut TurnRng) -> Vec<HookEffect> {
        vec![HookEffect::DamageAttackerFraction(8)]
    }
}

// --- Stat modifiers ---

struct WeatherSpeed {
    name: &'static str,
    weather: Weather,
}

impl AbilityHooks for WeatherSpeed {
    fn name(&self) -> &'static str {
        self.name
    }

    fn modify_speed(&self, _holder: &Combatant, weather: Option<Weather>, speed: u32) -> u32 {
        if weather == Some(self.weather) {
            speed * 2
        } else {
            speed
        }
    }
}

struct QuickFeet;

impl AbilityHooks for QuickFeet {
    fn name(&self) -> &'static str {
        "Quick Feet"
    }

    fn modify_speed(&self, holder: &Combatant, _weather: Option<Weather>, speed: u32) -> u32 {
        if holder.status.is_some() {
            speed * 3 / 2
        } else {
            speed
        }
    }

    fn ignores_status_penalty(&self, status: StatusKind) -> bool {
        status == StatusKind::Paralysis
    }
}

struct PowerDoubler {
    name: &'static str,
}

impl AbilityHooks for PowerDoubler {
    fn name(&self) -> &'static str {
        self.name
    }

    fn modify_attack(&self, _holder: &Combatant, move_data: &MoveData, attack: u32) -> u32 {
        if move_data.category == MoveCategory::Physical {
            attack * 2
        } else {
            attack
        }
    }
}

struct Guts;

impl AbilityHooks for Guts {
    fn name(&self) -> &'static str {
        "Guts"
    }

    fn modify_attack(&self, holder: &Combatant, move_data: &MoveData, attack: u32) -> u32 {
        if holder.status.is_some() && move_data.category == MoveCategory::Physical {
            attack * 3 / 2
        } else {
            attack
        }
    }

    fn ignores_status_penalty(&self, status: StatusKind) -> bool {
        status == StatusKind::Burn
    }
}

struct Hustle;

impl AbilityHooks for Hustle {
    fn name(&self) -> &'static str {
        "Hustle"
    }

    fn modify_attack(&self, _holder: &Combatant, move_data: &MoveData, attack: u32) -> u32 {
        if move_data.category == MoveCategory::Physical {
            attack * 3 / 2
        } else {
            attack
        }
    }

    fn modify_accuracy(&self, move_data: &MoveData, accuracy: u32) -> u32 {
        if move_data.category == MoveCategory::Physical {
            accuracy * 80 / 100
        } else {
            accuracy
        }
    }
}

/// Boosts moves of one type while the holder is at or below a third of its HP.
struct Pinch {
    name: &'static str,
    boosted: PokemonType,
}

impl AbilityHooks for Pinch {
    fn name(&self) -> &'static str {
        self.name
    }

    fn modify_attack(&self, holder: &Combatant, move_data: &MoveData, attack: u32) -> u32 {
        let in_pinch = holder.current_hp as u32 * 3 <= holder.max_hp as u32;
        if in_pinch && move_data.move_type == self.boosted {
            attack * 3 / 2
        } else {
            attack
        }
    }
}

struct ThickFat;

impl AbilityHooks for ThickFat {
    fn name(&self) -> &'static str {
        "Thick Fat"
    }

    fn modify_incoming_attack(&self, move_data: &MoveData, attack: u32) -> u32 {
        match move_data.move_type {
            PokemonType::Fire | PokemonType::Ice => attack / 2,
            _ => attack,
        }
    }
}

struct MarvelScale;

impl AbilityHooks for MarvelScale {
    fn name(&self) -> &'static str {
        "Marvel Scale"
    }

    fn modify_defense(&self, holder: &Combatant, move_data: &MoveData, defense: u32) -> u32 {
        if holder.status.is_some() && move_data.category == MoveCategory::Physical {
            defense * 3 / 2
        } else {
            defense
        }
    }
}

struct NoGuard;

impl AbilityHooks for NoGuard {
    fn name(&self) -> &'static str {
        "No Guard"
    }

    fn always_hits(&self) -> bool {
        true
    }
}

struct CompoundEyes;

impl AbilityHooks for CompoundEyes {
    fn name(&self) -> &'static str {
        "Compound Eyes"
    }

    fn modify_accuracy(&self, _move_data: &MoveData, accuracy: u32) -> u32 {
        accuracy * 130 / 100
    }
}

struct CritBlocker {
    name: &'static str,
}

impl AbilityHooks for CritBlocker {
    fn name(&self) -> &'static str {
        self.name
    }

    fn prevents_crit(&self) -> bool {
        true
    }
}

struct Sniper;

impl AbilityHooks for Sniper {
    fn name(&self) -> &'static str {
        "Sniper"
    }

    fn crit_multiplier(&self) -> Option<f32> {
        Some(2.25)
    }
}

struct RockHead;

impl AbilityHooks for RockHead {
    fn name(&self) -> &'static str {
        "Rock Head"
    }

    fn negates_recoil(&self) -> bool {
        true
    }
}

struct MagicGuard;

impl AbilityHooks for MagicGuard {
    fn name(&self) -> &'static str {
        "Magic Guard"
    }

    fn blocks_indirect_damage(&self) -> bool {
        true
    }
}

struct PoisonHeal;

impl AbilityHooks for PoisonHeal {
    fn name(&self) -> &'static str {
        "Poison Heal"
    }

    fn heals_from_poison(&self) -> bool {
        true
    }
}

struct WeatherShield {
    name: &'static str,
    weathers: &'static [Weather],
}

impl AbilityHooks for WeatherShield {
    fn name(&self) -> &'static str {
        self.name
    }

    fn weather_immune(&self, weather: Weather) -> bool {
        self.weathers.contains(&weather)
    }
}
