use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::target::Point;

/// Body landmarks a game can follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LandmarkName {
    LeftHand,
    RightHand,
    Nose,
}

impl LandmarkName {
    pub const HANDS: [LandmarkName; 2] = [LandmarkName::LeftHand, LandmarkName::RightHand];

    pub fn as_str(&self) -> &'static str {
        match self {
            LandmarkName::LeftHand => "left-hand",
            LandmarkName::RightHand => "right-hand",
            LandmarkName::Nose => "nose",
        }
    }
}

/// A tracker sample in normalized camera space: `x` grows rightward in the
/// camera image, `y` grows downward, `z` (when reported) shrinks toward the
/// camera.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLandmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: Option<f32>,
}

impl RawLandmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: None }
    }

    pub fn with_z(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z: Some(z) }
    }

    fn is_usable(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_none_or(f32::is_finite)
    }
}

/// One tracker callback's worth of points. Any subset may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerFrame {
    /// Increases with every callback; 0 means "no tracker data yet".
    pub seq: u64,
    pub points: Vec<(LandmarkName, RawLandmark)>,
}

impl TrackerFrame {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, name: LandmarkName) -> Option<RawLandmark> {
        self.points
            .iter()
            .rev()
            .find(|(n, _)| *n == name)
            .map(|(_, p)| *p)
    }
}

/// Mirror a camera-space sample into percentage screen space so moving a hand
/// right moves the cursor right.
pub fn to_screen(raw: &RawLandmark) -> Point {
    Point {
        x: (1.0 - raw.x) * 100.0,
        y: raw.y * 100.0,
    }
}

/// Last known state of one visible landmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedPoint {
    pub name: LandmarkName,
    pub raw: RawLandmark,
    /// Sample from the immediately preceding tracker frame, if the point was
    /// visible then too.
    pub previous: Option<RawLandmark>,
    pub screen: Point,
    /// Tracker `seq` of the frame that produced `raw`.
    pub seq: u64,
}

impl TrackedPoint {
    /// Frame-to-frame movement toward the camera (positive when `z` drops).
    pub fn depth_velocity(&self) -> Option<f32> {
        let prev = self.previous?;
        Some(prev.z? - self.raw.z?)
    }

    /// Frame-to-frame downward movement in normalized units.
    pub fn vertical_velocity(&self) -> Option<f32> {
        self.previous.map(|prev| self.raw.y - prev.y)
    }
}

/// Screen cursors for the landmarks a game follows.
///
/// Points that are absent from a frame are hidden, so "not visible" is never
/// confused with a point at (0,0). Velocities need two consecutive frames in
/// which the point was visible.
#[derive(Debug, Clone, Default)]
pub struct CursorSet {
    followed: Vec<LandmarkName>,
    points: BTreeMap<LandmarkName, TrackedPoint>,
    last_seq: Option<u64>,
}

impl CursorSet {
    pub fn new(followed: &[LandmarkName]) -> Self {
        let mut followed = followed.to_vec();
        followed.sort();
        followed.dedup();
        Self {
            followed,
            points: BTreeMap::new(),
            last_seq: None,
        }
    }

    pub fn followed(&self) -> &[LandmarkName] {
        &self.followed
    }

    /// Apply a tracker frame. A frame already applied (same `seq`) is a no-op,
    /// so a tick loop faster than the tracker does not zero out velocities.
    pub fn apply(&mut self, frame: &TrackerFrame) {
        if self.last_seq == Some(frame.seq) {
            return;
        }
        self.last_seq = Some(frame.seq);

        for &name in &self.followed {
            match frame.get(name).filter(RawLandmark::is_usable) {
                Some(raw) => {
                    let previous = self.points.get(&name).map(|p| p.raw);
                    self.points.insert(
                        name,
                        TrackedPoint {
                            name,
                            raw,
                            previous,
                            screen: to_screen(&raw),
                            seq: frame.seq,
                        },
                    );
                },
                None => {
                    self.points.remove(&name);
                },
            }
        }
    }

    pub fn get(&self, name: LandmarkName) -> Option<&TrackedPoint> {
        self.points.get(&name)
    }

    /// Visible points in a fixed order (left hand, right hand, nose).
    pub fn visible(&self) -> impl Iterator<Item = &TrackedPoint> {
        self.points.values()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.last_seq = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(seq: u64, points: &[(LandmarkName, RawLandmark)]) -> TrackerFrame {
        TrackerFrame {
            seq,
            points: points.to_vec(),
        }
    }

    #[test]
    fn mirrors_x_only() {
        let p = to_screen(&RawLandmark::new(0.2, 0.3));
        assert!((p.x - 80.0).abs() < 1e-4);
        assert!((p.y - 30.0).abs() < 1e-4);
    }

    #[test]
    fn empty_frame_is_harmless() {
        let mut cursors = CursorSet::new(&LandmarkName::HANDS);
        cursors.apply(&TrackerFrame::empty());
        assert!(cursors.is_empty());
    }

    #[test]
    fn missing_points_are_hidden_not_zeroed() {
        let mut cursors = CursorSet::new(&LandmarkName::HANDS);
        cursors.apply(&frame(
            1,
            &[
                (LandmarkName::LeftHand, RawLandmark::new(0.1, 0.1)),
                (LandmarkName::RightHand, RawLandmark::new(0.9, 0.1)),
            ],
        ));
        cursors.apply(&frame(2, &[(LandmarkName::RightHand, RawLandmark::new(0.8, 0.1))]));
        assert!(cursors.get(LandmarkName::LeftHand).is_none());
        assert!(cursors.get(LandmarkName::RightHand).is_some());
    }

    #[test]
    fn unfollowed_points_are_ignored() {
        let mut cursors = CursorSet::new(&[LandmarkName::Nose]);
        cursors.apply(&frame(1, &[(LandmarkName::LeftHand, RawLandmark::new(0.5, 0.5))]));
        assert!(cursors.is_empty());
    }

    #[test]
    fn non_finite_samples_are_dropped() {
        let mut cursors = CursorSet::new(&[LandmarkName::Nose]);
        cursors.apply(&frame(1, &[(LandmarkName::Nose, RawLandmark::new(f32::NAN, 0.5))]));
        assert!(cursors.is_empty());
    }

    #[test]
    fn velocity_needs_consecutive_frames() {
        let mut cursors = CursorSet::new(&[LandmarkName::RightHand]);
        cursors.apply(&frame(1, &[(LandmarkName::RightHand, RawLandmark::with_z(0.5, 0.4, -0.10))]));
        assert_eq!(cursors.get(LandmarkName::RightHand).unwrap().depth_velocity(), None);

        cursors.apply(&frame(2, &[(LandmarkName::RightHand, RawLandmark::with_z(0.5, 0.45, -0.12))]));
        let p = cursors.get(LandmarkName::RightHand).unwrap();
        assert!((p.depth_velocity().unwrap() - 0.02).abs() < 1e-6);
        assert!((p.vertical_velocity().unwrap() - 0.05).abs() < 1e-6);

        // A dropout breaks the chain.
        cursors.apply(&frame(3, &[]));
        cursors.apply(&frame(4, &[(LandmarkName::RightHand, RawLandmark::with_z(0.5, 0.5, -0.2))]));
        assert_eq!(cursors.get(LandmarkName::RightHand).unwrap().vertical_velocity(), None);
    }

    #[test]
    fn repeated_frame_keeps_velocity() {
        let mut cursors = CursorSet::new(&[LandmarkName::LeftHand]);
        cursors.apply(&frame(1, &[(LandmarkName::LeftHand, RawLandmark::new(0.5, 0.4))]));
        let second = frame(2, &[(LandmarkName::LeftHand, RawLandmark::new(0.5, 0.5))]);
        cursors.apply(&second);
        cursors.apply(&second);
        let p = cursors.get(LandmarkName::LeftHand).unwrap();
        assert!((p.vertical_velocity().unwrap() - 0.1).abs() < 1e-6);
        assert_eq!(p.seq, 2);
    }

    #[test]
    fn visible_order_is_stable() {
        let mut cursors = CursorSet::new(&[LandmarkName::Nose, LandmarkName::RightHand, LandmarkName::LeftHand]);
        cursors.apply(&frame(
            1,
            &[
                (LandmarkName::Nose, RawLandmark::new(0.5, 0.2)),
                (LandmarkName::RightHand, RawLandmark::new(0.3, 0.6)),
                (LandmarkName::LeftHand, RawLandmark::new(0.7, 0.6)),
            ],
        ));
        let order: Vec<LandmarkName> = cursors.visible().map(|p| p.name).collect();
        assert_eq!(
            order,
            vec![LandmarkName::LeftHand, LandmarkName::RightHand, LandmarkName::Nose]
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn mirroring_ignores_y(x in 0.0f32..=1.0, y1 in 0.0f32..=1.0, y2 in 0.0f32..=1.0) {
                let a = to_screen(&RawLandmark::new(x, y1));
                let b = to_screen(&RawLandmark::new(x, y2));
                prop_assert_eq!(a.x, b.x);
                prop_assert!((a.x + x * 100.0 - 100.0).abs() < 1e-3);
            }
        }
    }
}
