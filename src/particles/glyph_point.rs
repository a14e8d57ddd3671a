use std::convert::Infallible;

use glam::{Vec2, Vec3};
use rand::Rng;

use super::{fade, Kinematics, Render, Step};
use crate::color::random_hue;
use crate::config::GlyphConfig;
use crate::surface::{Paint, Surface};

/// One sampled pixel of the finale mask, blown outward from where it sat.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphPoint {
    /// Position of the mask sample it was born at.
    pub origin: Vec2,
    pub position: Vec2,
    pub velocity: Vec2,
    pub friction: f32,
    pub gravity: f32,
    pub alpha: f32,
    pub decay: f32,
    /// Disc radius in pixels.
    pub size: f32,
    pub color: Vec3,
}

impl GlyphPoint {
    pub fn new<R: Rng + ?Sized>(origin: Vec2, config: &GlyphConfig, rng: &mut R) -> Self {
        let velocity = Vec2::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5) * config.spread;
        Self {
            origin,
            position: origin,
            velocity,
            friction: config.friction.sample(rng),
            gravity: config.gravity,
            alpha: 1.0,
            decay: config.decay.sample(rng),
            size: config.size,
            color: random_hue(rng),
        }
    }
}

impl Kinematics for GlyphPoint {
    type Spawn = Infallible;

    fn step<R: Rng + ?Sized>(mut self, _rng: &mut R) -> Step<Self, Infallible> {
        self.velocity *= self.friction;
        self.velocity.y += self.gravity;
        self.position += self.velocity;

        if fade(&mut self.alpha, self.decay) {
            Step::Terminated(Vec::new())
        } else {
            Step::Alive(self)
        }
    }
}

impl Render for GlyphPoint {
    fn render(&self, surface: &mut dyn Surface) {
        surface.fill_disc(
            self.position,
            self.size,
            Paint {
                color: self.color,
                alpha: self.alpha,
            },
        );
    }
}
