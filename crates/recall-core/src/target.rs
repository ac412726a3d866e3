use serde::{Deserialize, Serialize};

/// A position in percentage space: (0,0) is the top-left of the play area,
/// (100,100) the bottom-right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const CENTER: Point = Point { x: 50.0, y: 50.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation toward `other` by `t` in `[0, 1]`.
    pub fn lerp(&self, other: &Point, t: f32) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Per-frame displacement in percentage space (one frame = 16.67 ms).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f32,
    pub vy: f32,
}

/// Stable identifier handed out by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u32);

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Initial progress scale of an approaching target.
pub const APPROACH_START_SCALE: f32 = 0.1;

/// One on-screen answer option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub display_text: String,
    /// Whether this target answers the current prompt.
    pub is_correct: bool,
    /// Where the target is drawn and hit-tested, cosmetic offsets included.
    pub position: Point,
    /// Integrated position before cosmetic float/wobble offsets.
    pub anchor: Point,
    pub velocity: Velocity,
    /// Depth progress for approaching targets (0.1 at spawn, 1.0 at the
    /// player). Stays 1.0 for flat games, where it doubles as the hit scale.
    pub progress_scale: f32,
    /// Progress-scale units per frame for approaching targets.
    pub approach_speed: f32,
    /// Where an approaching target ends up.
    pub destination: Option<Point>,
    /// Grid slot held by the target in slot games.
    pub slot: Option<usize>,
    pub spawned_at_ms: f32,
    pub lifetime_ms: Option<f32>,
}

impl Target {
    pub fn scale(&self) -> f32 {
        self.progress_scale
    }

    pub fn age_ms(&self, now_ms: f32) -> f32 {
        now_ms - self.spawned_at_ms
    }
}

/// Everything needed to create a target; the registry assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSpawn {
    pub display_text: String,
    pub is_correct: bool,
    pub position: Point,
    pub velocity: Velocity,
    pub approach_speed: Option<f32>,
    pub destination: Option<Point>,
    pub slot: Option<usize>,
    pub lifetime_ms: Option<f32>,
}

impl TargetSpawn {
    pub fn new(display_text: impl Into<String>, is_correct: bool, position: Point) -> Self {
        Self {
            display_text: display_text.into(),
            is_correct,
            position,
            velocity: Velocity::default(),
            approach_speed: None,
            destination: None,
            slot: None,
            lifetime_ms: None,
        }
    }
}

/// Owned set of active targets.
///
/// Targets live in one contiguous `Vec` in spawn order; ids are never reused
/// within a registry, so a stale id simply finds nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetRegistry {
    targets: Vec<Target>,
    next_id: u32,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::with_capacity(16)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            targets: Vec::with_capacity(capacity),
            next_id: 1,
        }
    }

    pub fn spawn(&mut self, spec: TargetSpawn, now_ms: f32) -> TargetId {
        let id = TargetId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        let progress_scale = if spec.approach_speed.is_some() {
            APPROACH_START_SCALE
        } else {
            1.0
        };
        self.targets.push(Target {
            id,
            display_text: spec.display_text,
            is_correct: spec.is_correct,
            position: spec.position,
            anchor: spec.position,
            velocity: spec.velocity,
            progress_scale,
            approach_speed: spec.approach_speed.unwrap_or(0.0),
            destination: spec.destination,
            slot: spec.slot,
            spawned_at_ms: now_ms,
            lifetime_ms: spec.lifetime_ms,
        });
        id
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut Target> {
        self.targets.iter_mut().find(|t| t.id == id)
    }

    /// Remove a target, preserving the order of the rest.
    pub fn remove(&mut self, id: TargetId) -> Option<Target> {
        let index = self.targets.iter().position(|t| t.id == id)?;
        Some(self.targets.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Target> {
        self.targets.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn has_correct(&self) -> bool {
        self.targets.iter().any(|t| t.is_correct)
    }

    pub fn correct_count(&self) -> usize {
        self.targets.iter().filter(|t| t.is_correct).count()
    }

    /// Slots currently held by a target.
    pub fn occupied_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.targets.iter().filter_map(|t| t.slot)
    }

    /// Remove every target matching `remove`, returning them in registry order.
    pub fn drain_where(&mut self, mut remove: impl FnMut(&Target) -> bool) -> Vec<Target> {
        let mut removed = Vec::new();
        let mut i = 0;
        while i < self.targets.len() {
            if remove(&self.targets[i]) {
                removed.push(self.targets.remove(i));
            } else {
                i += 1;
            }
        }
        removed
    }

    /// Remove all targets. Ids keep counting up.
    pub fn clear(&mut self) {
        self.targets.clear();
    }
}
