use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum RngSource {
    /// Values replayed in order, cycling once exhausted.
    Scripted(Vec<u8>),
    /// A seeded stream; the value at a cursor is fully determined by `(seed, cursor)`.
    Seeded(u64),
}

/// Generator positioned at a cursor, kept so sequential draws do not replay the stream.
/// Never part of equality or serialization: it is rebuilt from `(seed, cursor)` on demand.
#[derive(Debug, Clone, Default)]
struct StreamCache(Option<(u64, StdRng)>);

impl StreamCache {
    /// Generator positioned at `cursor`. Moves forward from the cached position when it can,
    /// otherwise replays the stream from the seed.
    fn seek(&mut self, seed: u64, cursor: u64) -> StdRng {
        let (mut position, mut rng) = match self.0.take() {
            Some((position, rng)) if position <= cursor => (position, rng),
            _ => (0, StdRng::seed_from_u64(seed)),
        };
        while position < cursor {
            rng.random_range(1..=100u8);
            position += 1;
        }
        rng
    }

    fn position_at(&mut self, seed: u64, cursor: u64) {
        let rng = self.seek(seed, cursor);
        self.0 = Some((cursor, rng));
    }

    fn draw(&mut self, seed: u64, cursor: u64) -> u8 {
        let mut rng = self.seek(seed, cursor);
        let value = rng.random_range(1..=100u8);
        self.0 = Some((cursor + 1, rng));
        value
    }

    #[cfg(test)]
    fn position(&self) -> Option<u64> {
        self.0.as_ref().map(|(position, _)| *position)
    }
}

impl PartialEq for StreamCache {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl Eq for StreamCache {}

/// The random stream threaded through turn resolution.
///
/// Every draw yields a value in `1..=100` and advances `cursor` by one. The stream position is
/// part of the battle state, so cloning a state and resolving against the clone reproduces the
/// exact same draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRng {
    source: RngSource,
    cursor: u64,
    #[serde(skip)]
    cache: StreamCache,
}

impl TurnRng {
    /// Scripted outcomes for tests. `vec![1]` always rolls the minimum, `vec![100]` the maximum.
    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        let outcomes = if outcomes.is_empty() { vec![50] } else { outcomes };
        Self {
            source: RngSource::Scripted(outcomes.into_iter().map(|o| o.clamp(1, 100)).collect()),
            cursor: 0,
            cache: StreamCache::default(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            source: RngSource::Seeded(seed),
            cursor: 0,
            cache: StreamCache::default(),
        }
    }

    /// Seeds from the operating system's entropy.
    pub fn new_random() -> Self {
        Self::seeded(rand::rng().random())
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Moves the stream to `cursor`. A seeded stream keeps its generator positioned there, so
    /// the next resolution against this state continues without replaying earlier draws.
    pub fn set_cursor(&mut self, cursor: u64) {
        if let RngSource::Seeded(seed) = self.source {
            self.cache.position_at(seed, cursor);
        }
        self.cursor = cursor;
    }

    pub fn next_outcome(&mut self, reason: &str) -> u8 {
        let outcome = match &self.source {
            RngSource::Scripted(outcomes) => {
                outcomes[(self.cursor % outcomes.len() as u64) as usize]
            }
            RngSource::Seeded(seed) => self.cache.draw(*seed, self.cursor),
        };

        trace!(outcome, cursor = self.cursor, reason, "rng draw");
        self.cursor += 1;
        outcome
    }

    /// True with `percent`% probability.
    pub fn chance(&mut self, percent: u8, reason: &str) -> bool {
        self.next_outcome(reason) <= percent
    }

    /// Uniform value in `min..=max` from a single draw.
    pub fn range(&mut self, min: u8, max: u8, reason: &str) -> u8 {
        let span = (max - min) as u16 + 1;
        let outcome = self.next_outcome(reason) as u16;
        min + ((outcome - 1) * span / 100) as u8
    }
}
