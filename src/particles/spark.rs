use std::convert::Infallible;
use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::Rng;

use super::{fade, Kinematics, Render, Step, Trail};
use crate::config::SparkConfig;
use crate::surface::{Stroke, Surface};

/// A fading spark thrown in a random direction.
///
/// Speed decays by friction every tick while gravity pulls the position
/// (not the velocity) down by a constant amount.
#[derive(Clone, Debug, PartialEq)]
pub struct Spark {
    pub position: Vec2,
    /// Direction of travel in radians, fixed at creation.
    pub angle: f32,
    pub speed: f32,
    pub friction: f32,
    pub gravity: f32,
    pub alpha: f32,
    pub decay: f32,
    /// Stroke width in pixels.
    pub width: f32,
    pub color: Vec3,
    pub trail: Trail,
}

impl Spark {
    /// A spark at `position` with randomized direction, speed, decay and
    /// width drawn from `config`.
    pub fn new<R: Rng + ?Sized>(position: Vec2, color: Vec3, config: &SparkConfig, rng: &mut R) -> Self {
        Self {
            position,
            angle: rng.gen::<f32>() * TAU,
            speed: config.speed.sample(rng),
            friction: config.friction,
            gravity: config.gravity,
            alpha: 1.0,
            decay: config.decay.sample(rng),
            width: config.width.sample(rng),
            color,
            trail: Trail::new(config.trail),
        }
    }
}

impl Kinematics for Spark {
    type Spawn = Infallible;

    fn step<R: Rng + ?Sized>(mut self, _rng: &mut R) -> Step<Self, Infallible> {
        self.trail.push(self.position);
        self.speed *= self.friction;
        self.position += Vec2::from_angle(self.angle) * self.speed + Vec2::new(0.0, self.gravity);

        if fade(&mut self.alpha, self.decay) {
            Step::Terminated(Vec::new())
        } else {
            Step::Alive(self)
        }
    }
}

impl Render for Spark {
    fn render(&self, surface: &mut dyn Surface) {
        surface.stroke(
            self.trail.points(),
            Stroke {
                color: self.color,
                width: self.width,
                alpha: self.alpha,
            },
        );
    }
}
