use crate::battle::apply::apply;
use crate::battle::rng::TurnRng;
use crate::battle::state::{Action, BattleEvent, BattleState, EventBus, Side};
use crate::battle::turn_orchestrator::resolve_turn;
use crate::catalog::Catalog;
use crate::errors::BattleResult;
use crate::pokemon::{Combatant, CombatantBuilder, StatusCondition};
use schema::MoveData;
use std::sync::OnceLock;

fn catalog() -> &'static Catalog {
    static CATALOG: OnceLock<Catalog> = OnceLock::new();
    CATALOG.get_or_init(|| match Catalog::builtin() {
        Ok(catalog) => catalog,
        Err(err) => panic!("Failed to load the builtin catalog: {}", err),
    })
}

/// A builder for creating test combatants with common defaults.
///
/// # Example
/// ```ignore
/// let pikachu = TestCombatantBuilder::new("Pikachu", 25)
///     .moves(["Tackle"])
///     .status(StatusCondition::Paralysis)
///     .build();
/// ```
pub struct TestCombatantBuilder {
    inner: CombatantBuilder,
    species: String,
    status: Option<StatusCondition>,
    current_hp: Option<u16>,
}

impl TestCombatantBuilder {
    /// Perfect IVs, no EVs, the species' first ability and Tackle unless told otherwise.
    pub fn new(species: &str, level: u8) -> Self {
        Self {
            inner: CombatantBuilder::new(species, level),
            species: species.to_string(),
            status: None,
            current_hp: None,
        }
    }

    pub fn ability(mut self, ability: &str) -> Self {
        self.inner = self.inner.ability(ability);
        self
    }

    pub fn moves<I, S>(mut self, moves: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner = self.inner.moves(moves);
        self
    }

    pub fn status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn build(self) -> Combatant {
        let mut combatant = match self.inner.build(catalog()) {
            Ok(combatant) => combatant,
            Err(err) => panic!("Failed to build test combatant {}: {}", self.species, err),
        };
        combatant.status = self.status;
        if let Some(hp) = self.current_hp {
            combatant.current_hp = hp.min(combatant.max_hp);
        }
        combatant
    }

    /// Catalog record for a move, for calculator-level tests.
    pub fn move_data(name: &str) -> MoveData {
        match catalog().lookup_move(name) {
            Ok(data) => data.clone(),
            Err(err) => panic!("Unknown test move {}: {}", name, err),
        }
    }
}

/// Creates a battle from full rosters. Uses the mid-range scripted stream.
pub fn create_test_battle_with_rosters(host: Vec<Combatant>, client: Vec<Combatant>) -> BattleState {
    let host = assert_ok(Side::new("Host", host));
    let client = assert_ok(Side::new("Client", client));
    BattleState::new("test_battle", host, client, predictable_rng())
}

/// Creates a standard 1v1 battle state for testing.
pub fn create_test_battle(host: Combatant, client: Combatant) -> BattleState {
    create_test_battle_with_rosters(vec![host], vec![client])
}

/// Every draw is 50: no crits, no misses, no 30% procs, and mid-range damage.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50])
}

/// Installs a test-writer subscriber once; set `RUST_LOG` to see the engine's traces.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Resolves a turn and commits it, returning the log.
pub fn play_turn(state: &mut BattleState, actions: &[Action]) -> EventBus {
    init_tracing();
    let bus = assert_ok(resolve_turn(state, actions));
    assert_ok(apply(state, bus.events()));
    bus
}

pub fn count_events(bus: &EventBus, matches: impl Fn(&BattleEvent) -> bool) -> usize {
    bus.events().iter().filter(|e| matches(e)).count()
}

/// Helper function to assert that a Result is Ok and return the value.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
