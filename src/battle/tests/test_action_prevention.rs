use crate::battle::rng::TurnRng;
use crate::battle::state::{Action, ActionFailureReason, BattleEvent, BattleState, CombatantRef, SideId};
use crate::battle::tests::common::{count_events, create_test_battle, play_turn, TestCombatantBuilder};
use crate::pokemon::{Combatant, StatusCondition};
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

const HOST_TACKLE: Action = Action::Attack {
    side: SideId::Host,
    move_slot: 0,
};

fn battle_with_rolls(host: Combatant, rolls: Vec<u8>) -> BattleState {
    let client = TestCombatantBuilder::new("Snorlax", 50).build();
    let mut state = create_test_battle(host, client);
    state.rng = TurnRng::new_for_test(rolls);
    state
}

fn host_moved(events: &[BattleEvent]) -> bool {
    events
        .iter()
        .any(|e| matches!(e, BattleEvent::MoveUsed { user, .. } if *user == HOST))
}

fn host_failed(events: &[BattleEvent], reason: ActionFailureReason) -> bool {
    events.contains(&BattleEvent::ActionFailed {
        side: SideId::Host,
        reason,
    })
}

#[rstest]
#[case(vec![25], false)]
#[case(vec![26], true)]
fn full_paralysis_is_a_quarter_chance(#[case] rolls: Vec<u8>, #[case] acts: bool) {
    let host = TestCombatantBuilder::new("Bulbasaur", 50)
        .status(StatusCondition::Paralysis)
        .build();
    let mut state = battle_with_rolls(host, rolls);

    let bus = play_turn(&mut state, &[HOST_TACKLE]);

    assert_eq!(host_moved(bus.events()), acts);
    assert_eq!(host_failed(bus.events(), ActionFailureReason::IsParalyzed), !acts);
    // Paralysis persists either way.
    assert_eq!(state.combatant(HOST).unwrap().status, Some(StatusCondition::Paralysis));
}

#[rstest]
#[case(vec![20], true)]
#[case(vec![21], false)]
fn freeze_thaws_a_fifth_of_the_time(#[case] rolls: Vec<u8>, #[case] thaws: bool) {
    let host = TestCombatantBuilder::new("Bulbasaur", 50)
        .status(StatusCondition::Freeze)
        .build();
    let mut state = battle_with_rolls(host, rolls);

    let bus = play_turn(&mut state, &[HOST_TACKLE]);

    assert_eq!(host_moved(bus.events()), thaws);
    assert_eq!(host_failed(bus.events(), ActionFailureReason::IsFrozen), !thaws);
    let expected = if thaws { None } else { Some(StatusCondition::Freeze) };
    assert_eq!(state.combatant(HOST).unwrap().status, expected);
}

#[test]
fn sleep_blocks_the_move() {
    let host = TestCombatantBuilder::new("Bulbasaur", 50)
        .status(StatusCondition::Sleep(2))
        .build();
    let mut state = battle_with_rolls(host, vec![50]);

    let bus = play_turn(&mut state, &[HOST_TACKLE]);

    assert!(!host_moved(bus.events()));
    assert!(host_failed(bus.events(), ActionFailureReason::IsAsleep));
    // The move was never used, so no PP was spent.
    assert_eq!(state.combatant(HOST).unwrap().move_slot(0).unwrap().pp, 35);
}

#[rstest]
#[case(vec![50], true)]
#[case(vec![51], false)]
fn confusion_hits_self_half_the_time(#[case] rolls: Vec<u8>, #[case] self_hit: bool) {
    let mut host = TestCombatantBuilder::new("Bulbasaur", 50).build();
    host.volatile.confusion_turns = 3;
    let mut state = battle_with_rolls(host, rolls);

    let bus = play_turn(&mut state, &[HOST_TACKLE]);

    assert_eq!(host_failed(bus.events(), ActionFailureReason::IsConfused), self_hit);
    assert_eq!(host_moved(bus.events()), !self_hit);
    let hurt_itself = bus
        .events()
        .iter()
        .any(|e| matches!(e, BattleEvent::DamageDealt { target, .. } if *target == HOST));
    assert_eq!(hurt_itself, self_hit);
    assert_eq!(state.combatant(HOST).unwrap().volatile.confusion_turns, 2);
}

#[test]
fn confusion_wears_off() {
    let mut host = TestCombatantBuilder::new("Bulbasaur", 50).build();
    host.volatile.confusion_turns = 1;
    let mut state = battle_with_rolls(host, vec![51]);

    let bus = play_turn(&mut state, &[HOST_TACKLE]);

    assert_eq!(
        count_events(&bus, |e| matches!(e, BattleEvent::VolatileEnded { target, .. } if *target == HOST)),
        1
    );
    assert_eq!(state.combatant(HOST).unwrap().volatile.confusion_turns, 0);
}

#[rstest]
#[case(vec![50], true)]
#[case(vec![51], false)]
fn infatuation_blocks_half_the_time(#[case] rolls: Vec<u8>, #[case] blocked: bool) {
    let mut host = TestCombatantBuilder::new("Bulbasaur", 50).build();
    host.volatile.infatuated_with = Some(CLIENT);
    let mut state = battle_with_rolls(host, rolls);

    let bus = play_turn(&mut state, &[HOST_TACKLE]);

    assert_eq!(host_failed(bus.events(), ActionFailureReason::IsInfatuated), blocked);
    assert_eq!(host_moved(bus.events()), !blocked);
}

#[test]
fn headbutt_flinches_a_slower_target() {
    let host = TestCombatantBuilder::new("Pikachu", 50).moves(["Headbutt"]).build();
    let client = TestCombatantBuilder::new("Bulbasaur", 50).build();
    let mut state = create_test_battle(host, client);
    state.rng = TurnRng::new_for_test(vec![30]);

    let bus = play_turn(
        &mut state,
        &[
            HOST_TACKLE,
            Action::Attack {
                side: SideId::Client,
                move_slot: 0,
            },
        ],
    );

    assert!(bus.events().contains(&BattleEvent::Flinched { target: CLIENT }));
    assert!(bus.events().contains(&BattleEvent::ActionFailed {
        side: SideId::Client,
        reason: ActionFailureReason::IsFlinching,
    }));
    // Flinch never outlives the turn.
    assert!(bus.events().contains(&BattleEvent::FlinchCleared { target: CLIENT }));
    assert!(!state.combatant(CLIENT).unwrap().volatile.flinched);
}

#[test]
fn inner_focus_prevents_flinching() {
    let host = TestCombatantBuilder::new("Pikachu", 50).moves(["Headbutt"]).build();
    let client = TestCombatantBuilder::new("Dragonite", 50).build();
    let mut state = create_test_battle(host, client);
    state.rng = TurnRng::new_for_test(vec![30]);

    let bus = play_turn(
        &mut state,
        &[
            HOST_TACKLE,
            Action::Attack {
                side: SideId::Client,
                move_slot: 0,
            },
        ],
    );

    assert_eq!(count_events(&bus, |e| matches!(e, BattleEvent::Flinched { .. })), 0);
    assert!(bus
        .events()
        .iter()
        .any(|e| matches!(e, BattleEvent::MoveUsed { user, .. } if *user == CLIENT)));
}

#[test]
fn taunt_blocks_status_moves_only() {
    let mut host = TestCombatantBuilder::new("Bulbasaur", 50)
        .moves(["Growl", "Tackle"])
        .build();
    host.volatile.taunt_turns = 3;
    let mut state = battle_with_rolls(host, vec![50]);

    let bus = play_turn(&mut state, &[HOST_TACKLE]);
    assert!(host_failed(bus.events(), ActionFailureReason::TauntBlocked));
    assert_eq!(state.combatant(HOST).unwrap().move_slot(0).unwrap().pp, 40);
    assert_eq!(state.combatant(HOST).unwrap().volatile.taunt_turns, 2);

    let bus = play_turn(
        &mut state,
        &[Action::Attack {
            side: SideId::Host,
            move_slot: 1,
        }],
    );
    assert!(host_moved(bus.events()));
}

#[test]
fn a_successful_move_spends_one_pp() {
    let host = TestCombatantBuilder::new("Bulbasaur", 50).build();
    let mut state = battle_with_rolls(host, vec![50]);

    let bus = play_turn(&mut state, &[HOST_TACKLE]);

    assert!(bus.events().contains(&BattleEvent::PpDecremented {
        user: HOST,
        move_slot: 0,
        remaining: 34,
    }));
    assert_eq!(state.combatant(HOST).unwrap().move_slot(0).unwrap().pp, 34);
}
