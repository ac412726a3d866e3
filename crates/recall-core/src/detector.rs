use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cursor::{CursorSet, LandmarkName, TrackedPoint};
use crate::target::{Target, TargetId, TargetRegistry};

/// Default depth-velocity threshold for a punch (normalized z per tracker frame).
pub const DEFAULT_PUNCH_THRESHOLD: f32 = 0.008;
/// Default vertical-velocity threshold for a slap (normalized y per tracker frame).
pub const DEFAULT_SLAP_THRESHOLD: f32 = 0.015;
/// Default per-landmark cooldown after a gesture hit.
pub const DEFAULT_GESTURE_COOLDOWN_MS: f32 = 400.0;
/// Default distance from a slot center that still counts as on the slot.
pub const DEFAULT_WHACK_TOLERANCE: f32 = 12.0;

/// How a tracked point hits a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InteractionMode {
    /// Touching a target is enough. The radius scales with the target's
    /// progress scale; targets smaller than `min_scale` cannot be caught yet.
    Catch { hit_radius: f32, min_scale: f32 },
    /// The point must be on the target and spike forward (punch) or downward
    /// (slap) in the same frame.
    Whack {
        tolerance: f32,
        punch_threshold: f32,
        slap_threshold: f32,
        cooldown_ms: f32,
    },
}

impl InteractionMode {
    pub fn catch(hit_radius: f32) -> Self {
        Self::Catch {
            hit_radius,
            min_scale: 0.0,
        }
    }

    pub fn whack() -> Self {
        Self::Whack {
            tolerance: DEFAULT_WHACK_TOLERANCE,
            punch_threshold: DEFAULT_PUNCH_THRESHOLD,
            slap_threshold: DEFAULT_SLAP_THRESHOLD,
            cooldown_ms: DEFAULT_GESTURE_COOLDOWN_MS,
        }
    }
}

/// What kind of contact produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    Touch,
    Punch,
    Slap,
    /// Fallback input (click or tap) from the presentation layer.
    Pointer,
}

/// A qualifying hit. The target has already left the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub target: Target,
    pub x: f32,
    pub y: f32,
    /// `None` for pointer hits.
    pub by: Option<LandmarkName>,
    pub gesture: Gesture,
}

impl Hit {
    pub fn target_id(&self) -> TargetId {
        self.target.id
    }

    pub fn is_correct(&self) -> bool {
        self.target.is_correct
    }
}

/// Classify a frame-to-frame spike. Punch wins when both axes qualify.
pub fn classify_gesture(
    point: &TrackedPoint,
    punch_threshold: f32,
    slap_threshold: f32,
) -> Option<Gesture> {
    if point.depth_velocity().is_some_and(|v| v > punch_threshold) {
        return Some(Gesture::Punch);
    }
    if point.vertical_velocity().is_some_and(|v| v > slap_threshold) {
        return Some(Gesture::Slap);
    }
    None
}

/// Hit testing against the registry, with per-landmark gesture cooldowns.
///
/// A spike stays visible on a [`TrackedPoint`] until the tracker publishes a
/// newer frame, so each landmark also remembers the `seq` its last gesture
/// fired on. One tracker sample yields at most one gesture hit.
#[derive(Debug, Clone)]
pub struct Detector {
    mode: InteractionMode,
    cooldowns: BTreeMap<LandmarkName, f32>,
    fired_seq: BTreeMap<LandmarkName, u64>,
}

impl Detector {
    pub fn new(mode: InteractionMode) -> Self {
        Self {
            mode,
            cooldowns: BTreeMap::new(),
            fired_seq: BTreeMap::new(),
        }
    }

    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    pub fn reset(&mut self) {
        self.cooldowns.clear();
        self.fired_seq.clear();
    }

    /// Remaining cooldown for a landmark, 0 when ready.
    pub fn cooldown_remaining(&self, name: LandmarkName) -> f32 {
        self.cooldowns.get(&name).copied().unwrap_or(0.0)
    }

    /// Test every visible point against the registry and remove hit targets.
    ///
    /// Points are visited in landmark order and targets in registry order;
    /// the first qualifying target wins and each target is hit at most once.
    pub fn detect(
        &mut self,
        cursors: &CursorSet,
        registry: &mut TargetRegistry,
        dt_ms: f32,
    ) -> Vec<Hit> {
        if dt_ms.is_finite() && dt_ms > 0.0 {
            for remaining in self.cooldowns.values_mut() {
                *remaining = (*remaining - dt_ms).max(0.0);
            }
        }

        let mut hits = Vec::new();
        for point in cursors.visible() {
            let Some((id, gesture)) = self.first_hit(point, registry) else {
                continue;
            };
            let Some(target) = registry.remove(id) else {
                continue;
            };
            if let InteractionMode::Whack { cooldown_ms, .. } = self.mode {
                self.cooldowns.insert(point.name, cooldown_ms);
                self.fired_seq.insert(point.name, point.seq);
            }
            tracing::debug!(
                target_id = %id,
                by = point.name.as_str(),
                ?gesture,
                correct = target.is_correct,
                "Target hit"
            );
            hits.push(Hit {
                target,
                x: point.screen.x,
                y: point.screen.y,
                by: Some(point.name),
                gesture,
            });
        }
        hits
    }

    fn first_hit(&self, point: &TrackedPoint, registry: &TargetRegistry) -> Option<(TargetId, Gesture)> {
        match self.mode {
            InteractionMode::Catch {
                hit_radius,
                min_scale,
            } => registry
                .iter()
                .find(|t| {
                    t.scale() >= min_scale
                        && point.screen.distance(&t.position) < hit_radius * t.scale()
                })
                .map(|t| (t.id, Gesture::Touch)),
            InteractionMode::Whack {
                tolerance,
                punch_threshold,
                slap_threshold,
                ..
            } => {
                if self.cooldown_remaining(point.name) > 0.0 {
                    return None;
                }
                if self.fired_seq.get(&point.name).is_some_and(|&seq| seq >= point.seq) {
                    return None;
                }
                let gesture = classify_gesture(point, punch_threshold, slap_threshold)?;
                registry
                    .iter()
                    .find(|t| point.screen.distance(&t.position) <= tolerance)
                    .map(|t| (t.id, gesture))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{RawLandmark, TrackerFrame};
    use crate::target::{Point, TargetSpawn};

    fn frame(seq: u64, name: LandmarkName, raw: RawLandmark) -> TrackerFrame {
        TrackerFrame {
            seq,
            points: vec![(name, raw)],
        }
    }

    fn registry_with(points: &[(f32, f32, bool)]) -> (TargetRegistry, Vec<TargetId>) {
        let mut reg = TargetRegistry::new();
        let ids = points
            .iter()
            .map(|&(x, y, correct)| reg.spawn(TargetSpawn::new("t", correct, Point::new(x, y)), 0.0))
            .collect();
        (reg, ids)
    }

    #[test]
    fn catch_hits_within_radius() {
        // Raw x 0.3 mirrors to screen x 70.
        let (mut reg, ids) = registry_with(&[(72.0, 50.0, true)]);
        let mut cursors = CursorSet::new(&LandmarkName::HANDS);
        cursors.apply(&frame(1, LandmarkName::LeftHand, RawLandmark::new(0.3, 0.5)));
        let mut det = Detector::new(InteractionMode::catch(8.0));

        let hits = det.detect(&cursors, &mut reg, 16.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target_id(), ids[0]);
        assert!(hits[0].is_correct());
        assert_eq!(hits[0].gesture, Gesture::Touch);
        assert!(reg.is_empty(), "hit target must leave the registry");
    }

    #[test]
    fn catch_misses_outside_radius() {
        let (mut reg, _) = registry_with(&[(90.0, 50.0, true)]);
        let mut cursors = CursorSet::new(&LandmarkName::HANDS);
        cursors.apply(&frame(1, LandmarkName::LeftHand, RawLandmark::new(0.3, 0.5)));
        let mut det = Detector::new(InteractionMode::catch(8.0));
        assert!(det.detect(&cursors, &mut reg, 16.0).is_empty());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn catch_first_registry_target_wins() {
        let (mut reg, ids) = registry_with(&[(70.0, 52.0, false), (70.0, 50.0, true)]);
        let mut cursors = CursorSet::new(&LandmarkName::HANDS);
        cursors.apply(&frame(1, LandmarkName::RightHand, RawLandmark::new(0.3, 0.5)));
        let mut det = Detector::new(InteractionMode::catch(8.0));
        let hits = det.detect(&cursors, &mut reg, 16.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target_id(), ids[0]);
    }

    #[test]
    fn two_hands_cannot_hit_the_same_target() {
        let (mut reg, _) = registry_with(&[(50.0, 50.0, true)]);
        let mut cursors = CursorSet::new(&LandmarkName::HANDS);
        cursors.apply(&TrackerFrame {
            seq: 1,
            points: vec![
                (LandmarkName::LeftHand, RawLandmark::new(0.5, 0.5)),
                (LandmarkName::RightHand, RawLandmark::new(0.51, 0.5)),
            ],
        });
        let mut det = Detector::new(InteractionMode::catch(8.0));
        assert_eq!(det.detect(&cursors, &mut reg, 16.0).len(), 1);
    }

    #[test]
    fn catch_respects_min_scale() {
        let mut reg = TargetRegistry::new();
        let mut spec = TargetSpawn::new("ball", true, Point::CENTER);
        spec.approach_speed = Some(0.01);
        let id = reg.spawn(spec, 0.0);
        let mut cursors = CursorSet::new(&[LandmarkName::Nose]);
        cursors.apply(&frame(1, LandmarkName::Nose, RawLandmark::new(0.5, 0.5)));
        let mut det = Detector::new(InteractionMode::Catch {
            hit_radius: 10.0,
            min_scale: 0.7,
        });

        assert!(det.detect(&cursors, &mut reg, 16.0).is_empty());
        reg.get_mut(id).unwrap().progress_scale = 0.9;
        assert_eq!(det.detect(&cursors, &mut reg, 16.0).len(), 1);
    }

    #[test]
    fn whack_requires_a_spike() {
        let (mut reg, _) = registry_with(&[(50.0, 50.0, true)]);
        let mut cursors = CursorSet::new(&LandmarkName::HANDS);
        let mut det = Detector::new(InteractionMode::whack());

        // Hovering over the slot without moving does nothing.
        cursors.apply(&frame(1, LandmarkName::RightHand, RawLandmark::with_z(0.5, 0.5, -0.1)));
        cursors.apply(&frame(2, LandmarkName::RightHand, RawLandmark::with_z(0.5, 0.5, -0.1)));
        assert!(det.detect(&cursors, &mut reg, 16.0).is_empty());

        // Punch toward the camera.
        cursors.apply(&frame(3, LandmarkName::RightHand, RawLandmark::with_z(0.5, 0.5, -0.12)));
        let hits = det.detect(&cursors, &mut reg, 16.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].gesture, Gesture::Punch);
    }

    #[test]
    fn whack_slap_without_depth() {
        let (mut reg, _) = registry_with(&[(50.0, 52.0, false)]);
        let mut cursors = CursorSet::new(&LandmarkName::HANDS);
        let mut det = Detector::new(InteractionMode::whack());
        cursors.apply(&frame(1, LandmarkName::LeftHand, RawLandmark::new(0.5, 0.48)));
        cursors.apply(&frame(2, LandmarkName::LeftHand, RawLandmark::new(0.5, 0.52)));
        let hits = det.detect(&cursors, &mut reg, 16.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].gesture, Gesture::Slap);
        assert!(!hits[0].is_correct());
    }

    #[test]
    fn whack_spike_away_from_slot_misses() {
        let (mut reg, _) = registry_with(&[(20.0, 20.0, true)]);
        let mut cursors = CursorSet::new(&LandmarkName::HANDS);
        let mut det = Detector::new(InteractionMode::whack());
        cursors.apply(&frame(1, LandmarkName::LeftHand, RawLandmark::with_z(0.5, 0.5, 0.0)));
        cursors.apply(&frame(2, LandmarkName::LeftHand, RawLandmark::with_z(0.5, 0.5, -0.05)));
        assert!(det.detect(&cursors, &mut reg, 16.0).is_empty());
        assert_eq!(det.cooldown_remaining(LandmarkName::LeftHand), 0.0);
    }

    #[test]
    fn cooldown_suppresses_second_spike() {
        let (mut reg, _) = registry_with(&[(50.0, 50.0, true), (50.0, 50.0, false)]);
        let mut cursors = CursorSet::new(&LandmarkName::HANDS);
        let mut det = Detector::new(InteractionMode::whack());

        cursors.apply(&frame(1, LandmarkName::RightHand, RawLandmark::with_z(0.5, 0.5, 0.0)));
        cursors.apply(&frame(2, LandmarkName::RightHand, RawLandmark::with_z(0.5, 0.5, -0.02)));
        assert_eq!(det.detect(&cursors, &mut reg, 16.0).len(), 1);

        // Second spike 100 ms later, still inside the 400 ms window.
        cursors.apply(&frame(3, LandmarkName::RightHand, RawLandmark::with_z(0.5, 0.5, -0.04)));
        assert!(det.detect(&cursors, &mut reg, 100.0).is_empty());
        assert_eq!(reg.len(), 1);

        // Once the window has passed the other hand's cooldown is untouched
        // and this hand is ready again.
        assert_eq!(det.cooldown_remaining(LandmarkName::LeftHand), 0.0);
        cursors.apply(&frame(4, LandmarkName::RightHand, RawLandmark::with_z(0.5, 0.5, -0.06)));
        assert_eq!(det.detect(&cursors, &mut reg, 400.0).len(), 1);
    }

    #[test]
    fn stale_spike_does_not_refire_after_cooldown() {
        let mut reg = TargetRegistry::new();
        let mut cursors = CursorSet::new(&LandmarkName::HANDS);
        let mut det = Detector::new(InteractionMode::whack());

        cursors.apply(&frame(1, LandmarkName::RightHand, RawLandmark::with_z(0.5, 0.5, 0.0)));
        let spike = frame(2, LandmarkName::RightHand, RawLandmark::with_z(0.5, 0.5, -0.02));
        cursors.apply(&spike);

        let mut hits = 0;
        for _ in 0..3 {
            reg.spawn(TargetSpawn::new("mole", true, Point::new(50.0, 50.0)), 0.0);
            // Tracker stalled: the same snapshot is read again after the window.
            cursors.apply(&spike);
            hits += det.detect(&cursors, &mut reg, 500.0).len();
        }
        assert_eq!(hits, 1);
        assert_eq!(reg.len(), 2);

        // A fresh spike on a newer frame still lands.
        cursors.apply(&frame(3, LandmarkName::RightHand, RawLandmark::with_z(0.5, 0.5, -0.04)));
        assert_eq!(det.detect(&cursors, &mut reg, 500.0).len(), 1);
    }

    #[test]
    fn reset_forgets_fired_frames() {
        let (mut reg, _) = registry_with(&[(50.0, 50.0, true), (50.0, 50.0, true)]);
        let mut cursors = CursorSet::new(&LandmarkName::HANDS);
        let mut det = Detector::new(InteractionMode::whack());
        cursors.apply(&frame(1, LandmarkName::LeftHand, RawLandmark::with_z(0.5, 0.5, 0.0)));
        cursors.apply(&frame(2, LandmarkName::LeftHand, RawLandmark::with_z(0.5, 0.5, -0.02)));
        assert_eq!(det.detect(&cursors, &mut reg, 16.0).len(), 1);

        det.reset();
        assert_eq!(det.detect(&cursors, &mut reg, 16.0).len(), 1);
    }

    #[test]
    fn classify_prefers_punch() {
        let point = TrackedPoint {
            name: LandmarkName::RightHand,
            raw: RawLandmark::with_z(0.5, 0.6, -0.2),
            previous: Some(RawLandmark::with_z(0.5, 0.5, -0.1)),
            screen: Point::CENTER,
            seq: 2,
        };
        assert_eq!(classify_gesture(&point, 0.008, 0.015), Some(Gesture::Punch));
        assert_eq!(classify_gesture(&point, 1.0, 0.015), Some(Gesture::Slap));
        assert_eq!(classify_gesture(&point, 1.0, 1.0), None);
    }
}
