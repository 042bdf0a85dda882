use crate::battle::apply::apply;
use crate::battle::state::{Action, BattleEvent, BattleState, CombatantRef, SideId};
use crate::battle::tests::common::{create_test_battle, create_test_battle_with_rosters, play_turn, TestCombatantBuilder};
use crate::battle::turn_orchestrator::start_battle;
use crate::pokemon::StatusCondition;
use pretty_assertions::assert_eq;
use schema::{PokemonType, StatType, Weather};

const HOST_LEAD: CombatantRef = CombatantRef {
    side: SideId::Host,
    slot: 0,
};
const HOST_RESERVE: CombatantRef = CombatantRef {
    side: SideId::Host,
    slot: 1,
};
const CLIENT: CombatantRef = CombatantRef {
    side: SideId::Client,
    slot: 0,
};

fn switch(side: SideId, roster_slot: usize) -> Action {
    Action::Switch { side, roster_slot }
}

fn start(state: &mut BattleState) -> Vec<BattleEvent> {
    let bus = start_battle(state).unwrap();
    apply(state, bus.events()).unwrap();
    bus.into_events()
}

#[test]
fn switching_out_clears_stages_and_volatiles() {
    let mut lead = TestCombatantBuilder::new("Bulbasaur", 50).build();
    lead.set_stat_stage(StatType::Attack, 2);
    lead.set_stat_stage(StatType::Speed, -1);
    lead.volatile.confusion_turns = 3;
    let host = vec![lead, TestCombatantBuilder::new("Squirtle", 50).build()];
    let client = vec![TestCombatantBuilder::new("Snorlax", 50).build()];
    let mut state = create_test_battle_with_rosters(host, client);

    let bus = play_turn(&mut state, &[switch(SideId::Host, 1)]);

    assert!(bus.events().contains(&BattleEvent::SwitchedOut {
        side: SideId::Host,
        slot: 0
    }));
    assert_eq!(state.side(SideId::Host).active, 1);
    let benched = state.combatant(HOST_LEAD).unwrap();
    assert_eq!(benched.stat_stage(StatType::Attack), 0);
    assert_eq!(benched.stat_stage(StatType::Speed), 0);
    assert_eq!(benched.volatile.confusion_turns, 0);
}

#[test]
fn major_status_survives_a_switch_but_toxic_restarts() {
    let host = vec![
        TestCombatantBuilder::new("Bulbasaur", 50)
            .status(StatusCondition::Paralysis)
            .build(),
        TestCombatantBuilder::new("Snorlax", 50)
            .status(StatusCondition::Toxic(4))
            .build(),
    ];
    let client = vec![TestCombatantBuilder::new("Squirtle", 50).build()];
    let mut state = create_test_battle_with_rosters(host, client);

    play_turn(&mut state, &[switch(SideId::Host, 1)]);
    assert_eq!(
        state.combatant(HOST_LEAD).unwrap().status,
        Some(StatusCondition::Paralysis)
    );

    play_turn(&mut state, &[switch(SideId::Host, 0)]);
    // Toxic(4) ticked once to Toxic(5) while on the field, then reset on the way out.
    assert_eq!(
        state.combatant(HOST_RESERVE).unwrap().status,
        Some(StatusCondition::Toxic(1))
    );
}

#[test]
fn natural_cure_heals_on_the_way_out() {
    let host = vec![
        TestCombatantBuilder::new("Starmie", 50)
            .status(StatusCondition::Burn)
            .build(),
        TestCombatantBuilder::new("Bulbasaur", 50).build(),
    ];
    let client = vec![TestCombatantBuilder::new("Snorlax", 50).build()];
    let mut state = create_test_battle_with_rosters(host, client);

    let bus = play_turn(&mut state, &[switch(SideId::Host, 1)]);

    assert!(bus.events().contains(&BattleEvent::AbilityTriggered {
        holder: HOST_LEAD,
        ability: "Natural Cure".to_string(),
    }));
    assert_eq!(state.combatant(HOST_LEAD).unwrap().status, None);
}

#[test]
fn trace_copies_on_entry_and_reverts_on_exit() {
    let host = vec![
        TestCombatantBuilder::new("Bulbasaur", 50).build(),
        TestCombatantBuilder::new("Porygon", 50).build(),
    ];
    let client = vec![TestCombatantBuilder::new("Gyarados", 50).build()];
    let mut state = create_test_battle_with_rosters(host, client);

    let bus = play_turn(&mut state, &[switch(SideId::Host, 1)]);
    assert!(bus.events().contains(&BattleEvent::AbilityChanged {
        holder: HOST_RESERVE,
        ability: "Intimidate".to_string(),
    }));
    // The copied Intimidate gets its own entrance.
    assert_eq!(state.combatant(CLIENT).unwrap().stat_stage(StatType::Attack), -1);

    play_turn(&mut state, &[switch(SideId::Host, 0)]);
    assert_eq!(state.combatant(HOST_RESERVE).unwrap().ability, "Trace");
}

#[test]
fn forecast_follows_the_weather() {
    let host = TestCombatantBuilder::new("Castform", 50).build();
    let client = TestCombatantBuilder::new("Bulbasaur", 50).build();
    let mut state = create_test_battle(host, client);
    state.field.weather = Some(Weather::Rain);

    start(&mut state);

    let castform = state.combatant(HOST_LEAD).unwrap();
    assert_eq!(castform.type_override, Some(PokemonType::Water));
    assert_eq!(castform.current_types(), vec![PokemonType::Water]);
}

#[test]
fn simultaneous_entries_run_faster_first() {
    // Politoed outspeeds Tyranitar, so the sandstorm lands last and sticks.
    let host = TestCombatantBuilder::new("Politoed", 50).build();
    let client = TestCombatantBuilder::new("Tyranitar", 50).build();
    let mut state = create_test_battle(host, client);

    let events = start(&mut state);

    let weathers: Vec<Option<Weather>> = events
        .iter()
        .filter_map(|e| match e {
            BattleEvent::WeatherChanged { weather, .. } => Some(*weather),
            _ => None,
        })
        .collect();
    assert_eq!(weathers, vec![Some(Weather::Rain), Some(Weather::Sandstorm)]);
    assert_eq!(state.field.weather, Some(Weather::Sandstorm));
}

#[test]
fn a_replacement_runs_its_entry_hooks() {
    let host = vec![TestCombatantBuilder::new("Pikachu", 100).moves(["Thunderbolt"]).build()];
    let client = vec![
        TestCombatantBuilder::new("Squirtle", 5).build(),
        TestCombatantBuilder::new("Gyarados", 50).build(),
    ];
    let mut state = create_test_battle_with_rosters(host, client);

    play_turn(
        &mut state,
        &[Action::Attack {
            side: SideId::Host,
            move_slot: 0,
        }],
    );
    assert_eq!(state.awaiting_replacement(), vec![SideId::Client]);

    let bus = play_turn(&mut state, &[switch(SideId::Client, 1)]);
    assert!(bus.events().contains(&BattleEvent::AbilityTriggered {
        holder: CombatantRef::new(SideId::Client, 1),
        ability: "Intimidate".to_string(),
    }));
    assert_eq!(state.combatant(HOST_LEAD).unwrap().stat_stage(StatType::Attack), -1);
}

#[test]
fn a_trapped_switch_keeps_the_turn_going() {
    let host = vec![TestCombatantBuilder::new("Dugtrio", 50).build()];
    let client = vec![
        TestCombatantBuilder::new("Bulbasaur", 50).build(),
        TestCombatantBuilder::new("Squirtle", 50).build(),
    ];
    let mut state = create_test_battle_with_rosters(host, client);

    let bus = play_turn(
        &mut state,
        &[
            switch(SideId::Client, 1),
            Action::Attack {
                side: SideId::Host,
                move_slot: 0,
            },
        ],
    );

    assert_eq!(state.side(SideId::Client).active, 0);
    // The host's attack still lands on the trapped combatant.
    let bulbasaur = state.combatant(CLIENT).unwrap();
    assert!(bulbasaur.current_hp < bulbasaur.max_hp);
    assert!(bus
        .events()
        .iter()
        .any(|e| matches!(e, BattleEvent::TurnEnded { .. })));
}
