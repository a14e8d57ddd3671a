use std::sync::Arc;
use std::time::Duration;

use glam::{Mat4, UVec2, Vec2, Vec3};
use rand::rngs::SmallRng;

use super::{scene_rng, Scene};
use crate::camera::OrbitCamera;
use crate::config::{Config, SaturnConfig};
use crate::easing::ease_in_out_cubic;
use crate::gesture::{synthetic_hand, ControlRecord, GestureTracker, Smoothed};
use crate::input::{Pointer, PointerButton};
use crate::surface::{PointStyle, Surface};
use crate::volume::{chaos_factor, Core, Ring};

const CORE_OPACITY: f32 = 0.9;
const RING_OPACITY: f32 = 0.6;

/// Control-derived values of one Saturn tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SaturnFrame {
    /// Smoothed openness in `[0, 1]`.
    pub openness: f32,
    /// `ease_in_out_cubic(openness)`.
    pub eased: f32,
    /// Smoothed rotation intent, radians per tick.
    pub rotation: f32,
    pub scale: f32,
    pub camera_distance: f32,
    pub light: f32,
    pub chaos: f32,
}

/// The 3D point-cloud planet.
///
/// Gesture values are read from a shared [`ControlRecord`] once per tick.
/// Without an external detector the scene drives that record from the
/// mouse: the cursor is the wrist and holding the secondary button opens
/// the palm. Dragging with the primary button orbits the camera.
#[derive(Debug)]
pub struct Saturn {
    config: SaturnConfig,
    core: Core,
    ring: Ring,
    camera: OrbitCamera,
    record: Arc<ControlRecord>,
    mouse_hand: Option<GestureTracker>,
    openness: Smoothed,
    rotation: Smoothed,
    yaw: f32,
    elapsed: Duration,
    rng: SmallRng,
    bounds: UVec2,
    pointer: Pointer,
    palm_open: bool,
    frame: SaturnFrame,
}

impl Saturn {
    /// Build the scene with mouse-driven gestures.
    pub fn new(config: &Config) -> Self {
        let record = Arc::new(ControlRecord::new());
        let tracker = GestureTracker::new(record.clone(), config.saturn.gesture);
        let mut scene = Self::with_record(config, record);
        scene.mouse_hand = Some(tracker);
        scene
    }

    /// Build the scene reading gestures from an external `record`.
    ///
    /// Hand a [`GestureTracker`] on the same record to the detector thread.
    pub fn with_record(config: &Config, record: Arc<ControlRecord>) -> Self {
        let saturn = config.saturn.clone();
        let mut rng = scene_rng(config.seed);
        let core = Core::new(&saturn.core, &mut rng);
        let ring = Ring::new(&saturn.ring, &mut rng);

        log::info!(
            "saturn: {} core points, {} ring points, seed {:?}",
            core.len(),
            ring.len(),
            config.seed,
        );

        Self {
            camera: OrbitCamera::new(
                saturn.camera_distance.start,
                saturn.fov_degrees.to_radians(),
                saturn.damping,
            ),
            openness: Smoothed::new(saturn.openness_smoothing),
            rotation: Smoothed::new(saturn.rotation_smoothing),
            core,
            ring,
            record,
            mouse_hand: None,
            yaw: 0.0,
            elapsed: Duration::ZERO,
            rng,
            bounds: UVec2::new(config.width.max(1), config.height.max(1)),
            pointer: Pointer::default(),
            palm_open: false,
            frame: SaturnFrame::default(),
            config: saturn,
        }
    }

    /// A tracker writing into this scene's control record.
    pub fn tracker(&self) -> GestureTracker {
        GestureTracker::new(self.record.clone(), self.config.gesture)
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Accumulated group rotation about Y.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Values of the last tick.
    pub fn frame(&self) -> SaturnFrame {
        self.frame
    }

    /// Run one tick and report the derived control values.
    pub fn step(&mut self, dt: Duration, surface: &mut dyn Surface) -> SaturnFrame {
        self.elapsed += dt;
        let cfg = &self.config;

        let raw = self.record.load();
        let openness = self.openness.step(raw.openness);
        let rotation = self.rotation.step(raw.rotation);
        let eased = ease_in_out_cubic(openness);
        let frame = SaturnFrame {
            openness,
            eased,
            rotation,
            scale: cfg.scale.lerp(eased),
            camera_distance: cfg.camera_distance.lerp(eased),
            light: cfg.light.lerp(eased),
            chaos: chaos_factor(eased, cfg.chaos_threshold),
        };

        self.core.update(self.elapsed.as_secs_f32());
        self.ring
            .update(dt.as_secs_f32(), frame.chaos, cfg.chaos_strength, &mut self.rng);

        self.yaw += frame.rotation;
        self.camera.distance = frame.camera_distance;
        self.camera.update();

        surface.clear(Vec3::ZERO);
        let size = surface.size().as_vec2();
        let view_proj = self.camera.view_projection(size.x / size.y.max(1.0));
        let group = Mat4::from_rotation_y(self.yaw) * Mat4::from_scale(Vec3::splat(frame.scale));
        let ring_model = group * Mat4::from_rotation_x(cfg.ring.tilt);

        surface.draw_points(
            self.core.cloud_mut(),
            view_proj * group,
            PointStyle {
                color: cfg.core.color * frame.light,
                size: cfg.core.size,
                opacity: CORE_OPACITY,
            },
        );
        surface.draw_points(
            self.ring.cloud_mut(),
            view_proj * ring_model,
            PointStyle {
                color: cfg.ring.colors[0],
                size: cfg.ring.size,
                opacity: RING_OPACITY,
            },
        );

        self.frame = frame;
        frame
    }

    /// Report the mouse hand to the control record.
    fn report_mouse_hand(&self) {
        let Some(tracker) = &self.mouse_hand else {
            return;
        };
        match self.pointer.position {
            Some(at) => {
                let wrist = at / self.bounds.as_vec2();
                let openness = if self.palm_open { 1.0 } else { 0.0 };
                tracker.on_results(Some(&synthetic_hand(wrist, openness, &self.config.gesture)));
            }
            None => tracker.on_results(None),
        }
    }
}

impl Scene for Saturn {
    fn title(&self) -> &str {
        "emberglow: saturn"
    }

    fn tick(&mut self, dt: Duration, surface: &mut dyn Surface) {
        let frame = self.step(dt, surface);
        log::trace!("{frame:?}");
    }

    fn resize(&mut self, size: UVec2) {
        self.bounds = size.max(UVec2::ONE);
    }

    fn pointer_moved(&mut self, position: Option<Vec2>) {
        let motion = self.pointer.move_to(position);
        if self.pointer.down {
            self.camera.rotate(-motion * self.config.orbit_sensitivity);
        }
        self.report_mouse_hand();
    }

    fn pointer_button(&mut self, button: PointerButton, pressed: bool) {
        match button {
            PointerButton::Primary => self.pointer.down = pressed,
            PointerButton::Secondary => {
                self.palm_open = pressed;
                self.report_mouse_hand();
            }
            PointerButton::Middle => {}
        }
    }
}
