#[cfg(test)]
#[path = "reveal_scheduler_test.rs"]
mod tests;

use std::collections::BTreeMap;
use std::time::Duration;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ExchangeId;
use crate::domain::models::RevealState;

/// Drives every typing animation from one loop. Each tick advances the
/// states whose deadline has passed by one character and gives them a new
/// random deadline.
pub struct RevealScheduler {
    states: BTreeMap<ExchangeId, RevealState>,
    rng: StdRng,
    min_delay_ms: u64,
    max_delay_ms: u64,
}

impl Default for RevealScheduler {
    fn default() -> RevealScheduler {
        return RevealScheduler::new(
            StdRng::from_entropy(),
            Config::get_u64(ConfigKey::RevealMinMs),
            Config::get_u64(ConfigKey::RevealMaxMs),
        );
    }
}

fn random_delay(rng: &mut StdRng, min_ms: u64, max_ms: u64) -> Duration {
    return Duration::from_millis(rng.gen_range(min_ms..=max_ms));
}

impl RevealScheduler {
    pub fn new(rng: StdRng, min_delay_ms: u64, max_delay_ms: u64) -> RevealScheduler {
        return RevealScheduler {
            states: BTreeMap::new(),
            rng,
            min_delay_ms: min_delay_ms.min(max_delay_ms),
            max_delay_ms: max_delay_ms.max(min_delay_ms),
        };
    }

    pub fn get(&self, id: ExchangeId) -> Option<&RevealState> {
        return self.states.get(&id);
    }

    #[cfg(test)]
    pub fn is_animating(&self) -> bool {
        return self.states.values().any(|state| return !state.is_done());
    }

    pub fn start(&mut self, id: ExchangeId, text: &str, now: Instant) {
        let mut state = RevealState::new(text);
        state.arm(now + random_delay(&mut self.rng, self.min_delay_ms, self.max_delay_ms));
        self.states.insert(id, state);
    }

    /// Returns true when at least one character was revealed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut advanced = false;

        for state in self.states.values_mut() {
            let due = match state.due_at() {
                Some(due_at) => due_at <= now,
                None => false,
            };
            if !due {
                continue;
            }

            advanced = true;
            if state.advance() {
                state.arm(now + random_delay(&mut self.rng, self.min_delay_ms, self.max_delay_ms));
            }
        }

        return advanced;
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        return self
            .states
            .values()
            .filter_map(|state| return state.due_at())
            .min();
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}
