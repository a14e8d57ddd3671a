//! Hand-gesture control values.
//!
//! A landmark detector runs outside the crate, possibly on its own thread,
//! and reports zero or one hand per inference. [`GestureTracker`] turns each
//! report into two scalars, openness and rotation intent, and stores them in
//! a shared [`ControlRecord`]. The Saturn scene reads the record once per
//! tick and smooths the values itself.
//!
//! Landmark indices follow the common 21-point hand model: 0 is the wrist,
//! 8/12/16/20 are the index, middle, ring and pinky fingertips.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::easing::inverse_lerp;

/// Index of the wrist landmark.
pub const WRIST: usize = 0;
/// Indices of the four fingertip landmarks (thumb excluded).
pub const FINGERTIPS: [usize; 4] = [8, 12, 16, 20];
/// Landmarks per hand.
pub const HAND_LANDMARKS: usize = 21;

/// A normalized image-space landmark, both axes in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Mapping from landmark geometry to control values.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Mean wrist-to-fingertip distance of a closed fist (openness 0).
    pub fist_distance: f32,
    /// Mean wrist-to-fingertip distance of an open palm (openness 1).
    pub palm_distance: f32,
    /// Half-width of the central band where the hand causes no rotation.
    pub dead_zone: f32,
    /// Rotation intent at the frame edge, radians per tick.
    pub max_rotation: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            fist_distance: 0.1,
            palm_distance: 0.35,
            dead_zone: 0.15,
            max_rotation: 0.02,
        }
    }
}

/// Openness in `[0, 1]` from the mean wrist-to-fingertip distance.
///
/// Returns `None` for landmark sets too short to hold a hand.
pub fn openness(landmarks: &[Landmark], config: &GestureConfig) -> Option<f32> {
    if landmarks.len() < HAND_LANDMARKS {
        return None;
    }
    let wrist = landmarks[WRIST].to_vec2();
    let total: f32 = FINGERTIPS
        .iter()
        .map(|&i| landmarks[i].to_vec2().distance(wrist))
        .sum();
    let mean = total / FINGERTIPS.len() as f32;
    Some(inverse_lerp(config.fist_distance, config.palm_distance, mean).clamp(0.0, 1.0))
}

/// Rotation intent from the wrist's horizontal position.
///
/// Zero inside the dead zone, ramping to `max_rotation` at the frame edge.
/// A hand on the right spins the model clockwise (negative).
pub fn rotation_intent(wrist_x: f32, config: &GestureConfig) -> f32 {
    let right_edge = 0.5 + config.dead_zone;
    let left_edge = 0.5 - config.dead_zone;
    let ramp = 0.5 - config.dead_zone;

    if wrist_x > right_edge {
        -((wrist_x - right_edge) / ramp).clamp(0.0, 1.0) * config.max_rotation
    } else if wrist_x < left_edge {
        ((left_edge - wrist_x) / ramp).clamp(0.0, 1.0) * config.max_rotation
    } else {
        0.0
    }
}

/// Snapshot of the raw control values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlValues {
    pub openness: f32,
    pub rotation: f32,
}

/// Lock-free record shared between the inference callback and the scene.
///
/// Each value is an independent `f32` stored as bits; readers may see one
/// value from the latest report and the other from the previous one, which
/// is harmless at frame rate.
#[derive(Debug, Default)]
pub struct ControlRecord {
    openness: AtomicU32,
    rotation: AtomicU32,
}

impl ControlRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, values: ControlValues) {
        self.openness.store(values.openness.to_bits(), Ordering::Relaxed);
        self.rotation.store(values.rotation.to_bits(), Ordering::Relaxed);
    }

    pub fn load(&self) -> ControlValues {
        ControlValues {
            openness: f32::from_bits(self.openness.load(Ordering::Relaxed)),
            rotation: f32::from_bits(self.rotation.load(Ordering::Relaxed)),
        }
    }
}

/// Writer side of the control record, handed to the inference callback.
#[derive(Clone, Debug)]
pub struct GestureTracker {
    record: Arc<ControlRecord>,
    config: GestureConfig,
}

impl GestureTracker {
    pub fn new(record: Arc<ControlRecord>, config: GestureConfig) -> Self {
        Self { record, config }
    }

    /// Handle one inference result: the first detected hand, or none.
    ///
    /// No hand resets both values to zero.
    pub fn on_results(&self, hand: Option<&[Landmark]>) {
        let values = hand
            .and_then(|landmarks| {
                let openness = openness(landmarks, &self.config)?;
                let rotation = rotation_intent(landmarks[WRIST].x, &self.config);
                Some(ControlValues { openness, rotation })
            })
            .unwrap_or_default();
        self.record.store(values);
    }

    pub fn record(&self) -> &Arc<ControlRecord> {
        &self.record
    }
}

/// Exponential smoothing: `value += (target - value) * factor` per step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Smoothed {
    pub value: f32,
    pub factor: f32,
}

impl Smoothed {
    pub fn new(factor: f32) -> Self {
        Self { value: 0.0, factor }
    }

    #[inline]
    pub fn step(&mut self, target: f32) -> f32 {
        self.value += (target - self.value) * self.factor;
        self.value
    }
}

/// Build a plausible 21-point hand with the wrist at `wrist` and the given
/// openness.
///
/// Lets hosts without a camera (and tests) drive the gesture pipeline, e.g.
/// from the mouse.
pub fn synthetic_hand(wrist: Vec2, openness: f32, config: &GestureConfig) -> Vec<Landmark> {
    let reach = config.fist_distance + (config.palm_distance - config.fist_distance) * openness.clamp(0.0, 1.0);
    let mut landmarks = vec![Landmark::new(wrist.x, wrist.y); HAND_LANDMARKS];

    // Five fingers of four joints each, fanned upward from the wrist.
    for finger in 0..5 {
        let angle = (finger as f32 - 2.0) * 0.25;
        let dir = Vec2::new(angle.sin(), -angle.cos());
        for joint in 0..4 {
            let along = reach * (joint + 1) as f32 / 4.0;
            let p = wrist + dir * along;
            landmarks[1 + finger * 4 + joint] = Landmark::new(p.x, p.y);
        }
    }
    landmarks
}
