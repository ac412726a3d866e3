use serde::{Deserialize, Serialize};

use crate::target::{Point, Target, TargetRegistry};

/// Reference frame length; velocities are expressed per frame of this size.
pub const FRAME_MS: f32 = 16.67;
/// Longest frame delta fed to motion. Longer gaps (a backgrounded tab, a
/// debugger pause) are clamped so targets do not teleport.
pub const MAX_FRAME_DELTA_MS: f32 = 100.0;
/// Targets beyond these percentage-space edges, moving outward, are gone.
pub const BOUNDS_MIN: f32 = -15.0;
pub const BOUNDS_MAX: f32 = 115.0;
/// Default progress scale at which an approaching target has passed the player.
pub const DEFAULT_PASS_SCALE: f32 = 1.2;

/// How targets move between ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionMode {
    /// Straight-line travel (falling words, asteroids).
    Linear,
    /// Straight-line travel plus a sinusoidal float on y and a cosinusoidal
    /// wobble on x. With a band, vertical motion reflects off its edges.
    Drift {
        float_amplitude: f32,
        /// Radians per second.
        float_frequency: f32,
        wobble_amplitude: f32,
        /// Radians per second.
        wobble_frequency: f32,
        band: Option<(f32, f32)>,
    },
    /// Targets grow from `origin` toward their destination as their progress
    /// scale rises; past `pass_scale` they have reached the player.
    Approach { origin: Point, pass_scale: f32 },
    /// Targets stay put (grid slots) until hit or expired.
    Stationary,
}

impl MotionMode {
    pub fn approach() -> Self {
        Self::Approach {
            origin: Point::CENTER,
            pass_scale: DEFAULT_PASS_SCALE,
        }
    }
}

/// Why the physics step removed a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DespawnReason {
    OutOfBounds,
    PassedPlayer,
    Expired,
}

/// A target removed by the physics step.
#[derive(Debug, Clone, PartialEq)]
pub struct Despawn {
    pub target: Target,
    pub reason: DespawnReason,
}

/// Convert a frame delta to the per-frame multiplier applied to velocities.
pub fn frame_factor(dt_ms: f32) -> f32 {
    if !dt_ms.is_finite() || dt_ms <= 0.0 {
        return 0.0;
    }
    dt_ms.min(MAX_FRAME_DELTA_MS) / FRAME_MS
}

/// Advance every target by one tick and remove the ones that left play.
///
/// `now_ms` is session play time, used for lifetimes and the cosmetic offsets.
pub fn step(
    registry: &mut TargetRegistry,
    motion: &MotionMode,
    dt_ms: f32,
    now_ms: f32,
) -> Vec<Despawn> {
    let f = frame_factor(dt_ms);
    for target in registry.iter_mut() {
        advance_target(target, motion, f, now_ms);
    }

    let mut despawned = Vec::new();
    for target in registry.drain_where(|t| despawn_reason(t, motion, now_ms).is_some()) {
        if let Some(reason) = despawn_reason(&target, motion, now_ms) {
            tracing::trace!(id = %target.id, ?reason, "Target despawned");
            despawned.push(Despawn { target, reason });
        }
    }
    despawned
}

fn advance_target(target: &mut Target, motion: &MotionMode, f: f32, now_ms: f32) {
    match motion {
        MotionMode::Linear => {
            target.anchor.x += target.velocity.vx * f;
            target.anchor.y += target.velocity.vy * f;
            target.position = target.anchor;
        },
        MotionMode::Drift {
            float_amplitude,
            float_frequency,
            wobble_amplitude,
            wobble_frequency,
            band,
        } => {
            target.anchor.x += target.velocity.vx * f;
            target.anchor.y += target.velocity.vy * f;
            if let Some((low, high)) = *band {
                if target.anchor.y < low {
                    target.anchor.y = low;
                    target.velocity.vy = target.velocity.vy.abs();
                } else if target.anchor.y > high {
                    target.anchor.y = high;
                    target.velocity.vy = -target.velocity.vy.abs();
                }
            }
            let (dx, dy) = drift_offset(
                target.id.0,
                now_ms,
                *float_amplitude,
                *float_frequency,
                *wobble_amplitude,
                *wobble_frequency,
            );
            target.position = Point::new(target.anchor.x + dx, target.anchor.y + dy);
        },
        MotionMode::Approach { origin, .. } => {
            target.progress_scale += target.approach_speed * f;
            let destination = target.destination.unwrap_or(*origin);
            target.position = origin.lerp(&destination, approach_fraction(target.progress_scale));
            target.anchor = target.position;
        },
        MotionMode::Stationary => {},
    }
}

/// Cosmetic (x, y) offsets for a drifting target, keyed by play time and id so
/// neighbouring targets do not bob in lockstep.
pub fn drift_offset(
    id: u32,
    now_ms: f32,
    float_amplitude: f32,
    float_frequency: f32,
    wobble_amplitude: f32,
    wobble_frequency: f32,
) -> (f32, f32) {
    let t = now_ms / 1000.0;
    let phase = id as f32;
    let dy = (t * float_frequency + phase * 0.7).sin() * float_amplitude;
    let dx = (t * wobble_frequency + phase * 1.3).cos() * wobble_amplitude;
    (dx, dy)
}

/// Fraction of the origin→destination path covered at a progress scale.
pub fn approach_fraction(progress_scale: f32) -> f32 {
    ((progress_scale - 0.1) / 0.9).clamp(0.0, 1.0)
}

fn despawn_reason(target: &Target, motion: &MotionMode, now_ms: f32) -> Option<DespawnReason> {
    if let MotionMode::Approach { pass_scale, .. } = motion
        && target.progress_scale >= *pass_scale
    {
        return Some(DespawnReason::PassedPlayer);
    }
    if let Some(lifetime) = target.lifetime_ms
        && target.age_ms(now_ms) >= lifetime
    {
        return Some(DespawnReason::Expired);
    }
    if is_out_of_bounds(target) {
        return Some(DespawnReason::OutOfBounds);
    }
    None
}

/// Outside the playable area and still moving away from it. A target entering
/// from beyond an edge is left alone.
pub fn is_out_of_bounds(target: &Target) -> bool {
    let p = target.anchor;
    let v = target.velocity;
    (p.x < BOUNDS_MIN && v.vx <= 0.0)
        || (p.x > BOUNDS_MAX && v.vx >= 0.0)
        || (p.y < BOUNDS_MIN && v.vy <= 0.0)
        || (p.y > BOUNDS_MAX && v.vy >= 0.0)
}
