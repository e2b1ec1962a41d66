//! Frame snapshot model.
//!
//! Units follow the device: millimetres for positions, millimetres per
//! second for velocities.  `+y` points up from the device, `+z` toward the
//! user.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Vec3
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { x, y, z }
    }

    pub const fn zero() -> Self {
        Vec3 { x: 0.0, y: 0.0, z: 0.0 }
    }

    pub fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn scale(self, k: f32) -> Vec3 {
        Vec3::new(self.x * k, self.y * k, self.z * k)
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TouchZone
// ════════════════════════════════════════════════════════════════════════════

/// Where a pointable sits relative to the virtual touch plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchZone {
    /// Outside the touch region altogether.
    #[default]
    None,
    Hovering,
    Touching,
}

impl TouchZone {
    /// Zero or negative touch distance means contact with the plane.
    pub fn from_distance(touch_distance: f32) -> Self {
        if touch_distance <= 0.0 {
            TouchZone::Touching
        } else {
            TouchZone::Hovering
        }
    }

    pub fn is_touching(self) -> bool {
        self == TouchZone::Touching
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Pointable / Hand
// ════════════════════════════════════════════════════════════════════════════

/// A finger or tool seen in one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pointable {
    pub id: i32,
    /// Owning hand, `-1` when the device could not attribute one.
    pub hand_id: i32,
    pub tip_position: Vec3,
    /// Tip position with jitter filtered out; preferred for on-screen pointers.
    pub stabilized_tip_position: Vec3,
    pub tip_velocity: Vec3,
    /// Normalised `+1.0` (far hover) … `0.0` (plane) … `-1.0` (pushed through).
    pub touch_distance: f32,
    pub touch_zone: TouchZone,
}

impl Pointable {
    /// Pointable at `tip` with no motion; zone derived from `touch_distance`.
    pub fn at(id: i32, tip: Vec3, touch_distance: f32) -> Self {
        Pointable {
            id,
            hand_id: -1,
            tip_position: tip,
            stabilized_tip_position: tip,
            tip_velocity: Vec3::zero(),
            touch_distance,
            touch_zone: TouchZone::from_distance(touch_distance),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub id: i32,
    pub palm_position: Vec3,
    pub palm_velocity: Vec3,
}

// ════════════════════════════════════════════════════════════════════════════
// InteractionBox
// ════════════════════════════════════════════════════════════════════════════

/// The device's reported sensing volume, used to normalise positions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InteractionBox {
    pub center: Vec3,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Default for InteractionBox {
    /// Stock volume reported by a desktop controller.
    fn default() -> Self {
        InteractionBox {
            center: Vec3::new(0.0, 200.0, 0.0),
            width: 235.0,
            height: 235.0,
            depth: 147.0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Gestures
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    ScreenTap,
    KeyTap,
    Swipe,
    Circle,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gesture {
    pub id: i32,
    pub kind: GestureKind,
    pub pointable_ids: Vec<i32>,
}

// ════════════════════════════════════════════════════════════════════════════
// FrameSnapshot
// ════════════════════════════════════════════════════════════════════════════

/// Everything the device reported for one tracking frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub id: i64,
    pub timestamp_us: i64,
    /// Ordered as reported; tutorials treat index 0 as "the" finger.
    pub pointables: Vec<Pointable>,
    pub hands: Vec<Hand>,
    pub interaction_box: InteractionBox,
    pub gestures: Vec<Gesture>,
}

impl FrameSnapshot {
    pub fn first_pointable(&self) -> Option<&Pointable> {
        self.pointables.first()
    }

    /// True if any pointable is in contact with the touch plane.
    pub fn is_touching(&self) -> bool {
        self.pointables.iter().any(|p| p.touch_zone.is_touching())
    }

    pub fn hand(&self, id: i32) -> Option<&Hand> {
        self.hands.iter().find(|h| h.id == id)
    }

    /// Average palm displacement from `since` to `self` over the hands
    /// visible in both frames.  Zero when no hand carried over.
    pub fn translation(&self, since: &FrameSnapshot) -> Vec3 {
        let mut total = Vec3::zero();
        let mut n = 0u32;
        for hand in &self.hands {
            if let Some(old) = since.hand(hand.id) {
                total = total.add(hand.palm_position.sub(old.palm_position));
                n += 1;
            }
        }
        if n == 0 {
            Vec3::zero()
        } else {
            total.scale(1.0 / n as f32)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
