use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::profile::DifficultyProfile;

/// Progressive difficulty over session play time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingCurve {
    /// Spawn interval at the start of a session.
    pub base_interval_ms: f32,
    /// The interval never drops below this.
    pub floor_interval_ms: f32,
    /// Interval multiplier applied once per `decay_period_ms` of play.
    pub decay: f32,
    pub decay_period_ms: f32,
    /// Speed multiplier gained per minute of play.
    pub speed_ramp_per_minute: f32,
    pub max_speed_multiplier: f32,
}

impl Default for PacingCurve {
    fn default() -> Self {
        Self {
            base_interval_ms: 2000.0,
            floor_interval_ms: 600.0,
            decay: 0.9,
            decay_period_ms: 30_000.0,
            speed_ramp_per_minute: 0.2,
            max_speed_multiplier: 1.8,
        }
    }
}

impl PacingCurve {
    /// `max(floor, base * decay^(elapsed / period))`.
    pub fn spawn_interval_ms(&self, elapsed_ms: f32) -> f32 {
        let periods = if self.decay_period_ms > 0.0 {
            elapsed_ms.max(0.0) / self.decay_period_ms
        } else {
            0.0
        };
        (self.base_interval_ms * self.decay.powf(periods)).max(self.floor_interval_ms)
    }

    pub fn speed_multiplier(&self, elapsed_ms: f32) -> f32 {
        let minutes = elapsed_ms.max(0.0) / 60_000.0;
        (1.0 + self.speed_ramp_per_minute * minutes).clamp(1.0, self.max_speed_multiplier.max(1.0))
    }
}

/// Spawn cadence and random choices for one session.
#[derive(Debug, Clone)]
pub struct Spawner {
    curve: PacingCurve,
    since_last_ms: f32,
    rng: StdRng,
}

impl Spawner {
    pub fn new(curve: PacingCurve, seed: u64) -> Self {
        Self {
            curve,
            // Due immediately so the first spawn lands on the first tick.
            since_last_ms: f32::INFINITY,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn curve(&self) -> &PacingCurve {
        &self.curve
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Make the next `ready` call succeed regardless of elapsed time.
    pub fn force_due(&mut self) {
        self.since_last_ms = f32::INFINITY;
    }

    /// Restart cadence and reseed for a fresh session.
    pub fn reset(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.force_due();
    }

    /// Accumulate `dt_ms` and report whether a spawn is due. Spawning is
    /// refused while `active >= cap`; the accumulated time is kept so the
    /// spawn happens as soon as room frees up.
    pub fn ready(&mut self, dt_ms: f32, elapsed_ms: f32, active: usize, cap: usize) -> bool {
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.since_last_ms += dt_ms;
        }
        if active >= cap {
            return false;
        }
        if self.since_last_ms >= self.curve.spawn_interval_ms(elapsed_ms) {
            self.since_last_ms = 0.0;
            return true;
        }
        false
    }

    /// Random speed within the profile's range, scaled by the pacing ramp.
    pub fn speed(&mut self, profile: &DifficultyProfile, elapsed_ms: f32) -> f32 {
        let base = if profile.max_speed > profile.min_speed {
            self.rng.random_range(profile.min_speed..=profile.max_speed)
        } else {
            profile.min_speed
        };
        base * self.curve.speed_multiplier(elapsed_ms)
    }

    /// Whether the next spawn should be a correct target.
    ///
    /// With `single_correct`, a missing correct target forces one and an
    /// existing one forbids a second.
    pub fn choose_correct(&mut self, has_correct: bool, single_correct: bool, chance: f32) -> bool {
        if single_correct {
            return !has_correct;
        }
        self.rng.random_bool(f64::from(chance.clamp(0.0, 1.0)))
    }

    pub fn range(&mut self, low: f32, high: f32) -> f32 {
        if high > low {
            self.rng.random_range(low..high)
        } else {
            low
        }
    }
}

/// Pick a random slot in `0..slot_count` not present in `occupied`.
pub fn pick_free_slot<R: Rng>(rng: &mut R, slot_count: usize, occupied: &[usize]) -> Option<usize> {
    let free: Vec<usize> = (0..slot_count).filter(|s| !occupied.contains(s)).collect();
    if free.is_empty() {
        return None;
    }
    Some(free[rng.random_range(0..free.len())])
}

/// Choose `count` horizontal positions in `[min_x, max_x]` at least
/// `min_separation` apart.
///
/// Each position gets up to `max_retries` random draws; if none satisfies the
/// separation, the draw farthest from its neighbours is used instead.
pub fn spread_positions<R: Rng>(
    rng: &mut R,
    count: usize,
    min_x: f32,
    max_x: f32,
    min_separation: f32,
    max_retries: u32,
) -> Vec<f32> {
    let mut placed: Vec<f32> = Vec::with_capacity(count);
    let attempts = max_retries.max(1);
    for _ in 0..count {
        let mut best = min_x;
        let mut best_gap = f32::NEG_INFINITY;
        for _ in 0..attempts {
            let candidate = if max_x > min_x {
                rng.random_range(min_x..=max_x)
            } else {
                min_x
            };
            let gap = placed
                .iter()
                .map(|p| (p - candidate).abs())
                .fold(f32::INFINITY, f32::min);
            if gap >= min_separation {
                best = candidate;
                break;
            }
            if gap > best_gap {
                best_gap = gap;
                best = candidate;
            }
        }
        placed.push(best);
    }
    placed
}
