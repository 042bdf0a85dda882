use crate::battle::apply::apply;
use crate::battle::rng::TurnRng;
use crate::battle::state::{Action, BattleEvent, BattleOutcome, CombatantRef, SideId};
use crate::battle::tests::common::{
    create_test_battle, create_test_battle_with_rosters, init_tracing, play_turn, TestCombatantBuilder,
};
use crate::battle::turn_orchestrator::resolve_turn;
use crate::errors::ActionError;
use pretty_assertions::assert_eq;
use rstest::rstest;

const HOST: CombatantRef = CombatantRef {
    side: SideId::Host,
    slot: 0,
};
const CLIENT: CombatantRef = CombatantRef {
    side: SideId::Client,
    slot: 0,
};

fn attack(side: SideId, move_slot: usize) -> Action {
    Action::Attack { side, move_slot }
}

fn first_mover(events: &[BattleEvent]) -> Option<SideId> {
    events.iter().find_map(|e| match e {
        BattleEvent::MoveUsed { user, .. } => Some(user.side),
        _ => None,
    })
}

#[test]
fn identical_inputs_give_identical_logs() {
    init_tracing();
    let host = TestCombatantBuilder::new("Pikachu", 50)
        .moves(["Thunderbolt", "Quick Attack"])
        .build();
    let client = TestCombatantBuilder::new("Gyarados", 50)
        .moves(["Waterfall", "Bite"])
        .build();
    let mut state = create_test_battle(host, client);
    state.rng = TurnRng::seeded(0xC0FFEE);
    let actions = [attack(SideId::Host, 0), attack(SideId::Client, 1)];

    let first = resolve_turn(&state, &actions).unwrap();
    let second = resolve_turn(&state, &actions).unwrap();
    assert_eq!(first, second);

    // Two detached copies replaying the same log end up identical.
    let mut replica = state.clone();
    apply(&mut state, first.events()).unwrap();
    apply(&mut replica, second.events()).unwrap();
    assert_eq!(state, replica);
}

#[test]
fn applied_log_matches_the_reported_damage() {
    let attacker = TestCombatantBuilder::new("Bulbasaur", 100).build();
    let defender = TestCombatantBuilder::new("Bulbasaur", 100).build();
    let mut state = create_test_battle(attacker, defender);

    let bus = play_turn(&mut state, &[attack(SideId::Host, 0)]);

    // Roll 50 maps to 92% of the 35-point maximum.
    assert!(bus.events().contains(&BattleEvent::DamageDealt {
        target: CLIENT,
        amount: 32,
        remaining_hp: 199,
    }));
    assert_eq!(state.combatant(CLIENT).unwrap().current_hp, 199);
    assert_eq!(state.combatant(HOST).unwrap().move_slot(0).unwrap().pp, 34);
}

#[rstest]
#[case(vec![50], SideId::Host)]
#[case(vec![51], SideId::Client)]
fn speed_ties_take_one_draw(#[case] rolls: Vec<u8>, #[case] expected: SideId) {
    let host = TestCombatantBuilder::new("Bulbasaur", 50).build();
    let client = TestCombatantBuilder::new("Bulbasaur", 50).build();
    let mut state = create_test_battle(host, client);
    state.rng = TurnRng::new_for_test(rolls);

    let bus = resolve_turn(&state, &[attack(SideId::Host, 0), attack(SideId::Client, 0)]).unwrap();
    assert_eq!(first_mover(bus.events()), Some(expected));
}

#[test]
fn switches_resolve_before_attacks() {
    let host = vec![
        TestCombatantBuilder::new("Snorlax", 50).build(),
        TestCombatantBuilder::new("Bulbasaur", 50).build(),
    ];
    let client = vec![TestCombatantBuilder::new("Jolteon", 50).moves(["Quick Attack"]).build()];
    let mut state = create_test_battle_with_rosters(host, client);

    let bus = play_turn(
        &mut state,
        &[
            attack(SideId::Client, 0),
            Action::Switch {
                side: SideId::Host,
                roster_slot: 1,
            },
        ],
    );

    let switch_at = bus
        .events()
        .iter()
        .position(|e| matches!(e, BattleEvent::SwitchedIn { side: SideId::Host, slot: 1 }));
    let attack_at = bus
        .events()
        .iter()
        .position(|e| matches!(e, BattleEvent::MoveUsed { .. }));
    assert!(switch_at < attack_at);
    // The incoming combatant takes the hit.
    let bulbasaur = state.combatant(CombatantRef::new(SideId::Host, 1)).unwrap();
    assert!(bulbasaur.current_hp < bulbasaur.max_hp);
}

#[test]
fn a_fainted_combatant_takes_no_further_action() {
    let host = TestCombatantBuilder::new("Pikachu", 100).moves(["Thunderbolt"]).build();
    let client = TestCombatantBuilder::new("Squirtle", 5).build();
    let mut state = create_test_battle(host, client);

    let bus = play_turn(&mut state, &[attack(SideId::Host, 0), attack(SideId::Client, 0)]);

    let moves_used = bus
        .events()
        .iter()
        .filter(|e| matches!(e, BattleEvent::MoveUsed { .. }))
        .count();
    assert_eq!(moves_used, 1);
    assert!(bus.events().contains(&BattleEvent::Fainted { target: CLIENT }));
    assert!(bus
        .events()
        .contains(&BattleEvent::SideDefeated { side: SideId::Client }));
    assert_eq!(state.outcome(), Some(BattleOutcome::Winner(SideId::Host)));

    let err = resolve_turn(&state, &[attack(SideId::Host, 0)]).unwrap_err();
    assert_eq!(err, ActionError::BattleFinished.into());
}

#[test]
fn a_forced_switch_is_resolved_in_its_own_phase() {
    let host = vec![TestCombatantBuilder::new("Pikachu", 100).moves(["Thunderbolt"]).build()];
    let client = vec![
        TestCombatantBuilder::new("Squirtle", 5).build(),
        TestCombatantBuilder::new("Bulbasaur", 50).build(),
    ];
    let mut state = create_test_battle_with_rosters(host, client);

    let bus = play_turn(&mut state, &[attack(SideId::Host, 0)]);
    assert!(bus
        .events()
        .contains(&BattleEvent::ForcedSwitchRequired { side: SideId::Client }));
    assert_eq!(state.awaiting_replacement(), vec![SideId::Client]);
    assert_eq!(state.turn_number, 2);

    let err = resolve_turn(&state, &[attack(SideId::Host, 0)]).unwrap_err();
    assert_eq!(err, ActionError::NotAwaitingReplacement(SideId::Host).into());
    let err = resolve_turn(&state, &[attack(SideId::Client, 0)]).unwrap_err();
    assert_eq!(err, ActionError::ReplacementRequired(SideId::Client).into());
    let err = resolve_turn(&state, &[]).unwrap_err();
    assert_eq!(err, ActionError::ReplacementRequired(SideId::Client).into());

    let bus = play_turn(
        &mut state,
        &[Action::Switch {
            side: SideId::Client,
            roster_slot: 1,
        }],
    );
    assert!(bus.events().contains(&BattleEvent::SwitchedIn {
        side: SideId::Client,
        slot: 1
    }));
    assert!(!bus
        .events()
        .iter()
        .any(|e| matches!(e, BattleEvent::TurnStarted { .. } | BattleEvent::TurnEnded { .. })));
    assert_eq!(state.side(SideId::Client).active, 1);
    assert!(state.awaiting_replacement().is_empty());
    assert_eq!(state.turn_number, 2);

    // Back to regular turns.
    let bus = play_turn(&mut state, &[attack(SideId::Host, 0), attack(SideId::Client, 0)]);
    assert!(bus
        .events()
        .contains(&BattleEvent::TurnStarted { turn_number: 2 }));
}

#[test]
fn switching_into_a_fainted_slot_is_rejected() {
    let host = vec![
        TestCombatantBuilder::new("Pikachu", 50).build(),
        TestCombatantBuilder::new("Bulbasaur", 50).hp(0).build(),
    ];
    let client = vec![TestCombatantBuilder::new("Squirtle", 50).build()];
    let state = create_test_battle_with_rosters(host, client);

    let err = resolve_turn(
        &state,
        &[Action::Switch {
            side: SideId::Host,
            roster_slot: 1,
        }],
    )
    .unwrap_err();
    assert_eq!(
        err,
        ActionError::TargetFainted {
            side: SideId::Host,
            slot: 1
        }
        .into()
    );

    let err = resolve_turn(
        &state,
        &[Action::Switch {
            side: SideId::Host,
            roster_slot: 4,
        }],
    )
    .unwrap_err();
    assert_eq!(
        err,
        ActionError::InvalidRosterSlot {
            side: SideId::Host,
            slot: 4
        }
        .into()
    );
}
