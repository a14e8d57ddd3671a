use glam::{Vec2, Vec3};
use rand::Rng;

use super::{Kinematics, Render, Spark, Step, Trail};
use crate::config::{ProjectileConfig, SparkConfig};
use crate::surface::{Stroke, Surface};

/// What a projectile leaves behind when it bursts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Burst {
    /// Minimum number of sparks.
    pub min: u32,
    /// Up to this many extra sparks, chosen uniformly.
    pub extra: u32,
    pub spark: SparkConfig,
}

impl Burst {
    /// Spawn the burst's sparks at `position`, all in `color`.
    pub fn spawn<R: Rng + ?Sized>(&self, position: Vec2, color: Vec3, rng: &mut R) -> Vec<Spark> {
        let count = self.min + if self.extra > 0 { rng.gen_range(0..self.extra) } else { 0 };
        (0..count)
            .map(|_| Spark::new(position, color, &self.spark, rng))
            .collect()
    }
}

/// A rising shell heading in a straight line toward its target.
///
/// Speed grows geometrically, so every projectile bursts within a bounded
/// number of ticks: either it climbs past its target altitude or its speed
/// crosses the ceiling.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub position: Vec2,
    pub target: Vec2,
    /// Heading in radians, fixed at launch.
    pub angle: f32,
    pub speed: f32,
    pub growth: f32,
    pub ceiling: f32,
    pub color: Vec3,
    /// Trail stroke width in pixels.
    pub width: f32,
    pub trail: Trail,
    pub burst: Burst,
}

impl Projectile {
    /// Launch from `origin` toward `target` with a randomized initial speed.
    pub fn launch<R: Rng + ?Sized>(
        origin: Vec2,
        target: Vec2,
        color: Vec3,
        config: &ProjectileConfig,
        burst: &SparkConfig,
        rng: &mut R,
    ) -> Self {
        let heading = target - origin;
        Self {
            position: origin,
            target,
            angle: heading.y.atan2(heading.x),
            speed: config.speed.sample(rng),
            growth: config.growth,
            ceiling: config.ceiling,
            color,
            width: config.width,
            trail: Trail::new(config.trail),
            burst: Burst {
                min: config.burst_min,
                extra: config.burst_extra,
                spark: *burst,
            },
        }
    }

    /// Whether the projectile has reached its burst condition.
    #[inline]
    pub fn should_burst(&self) -> bool {
        self.position.y < self.target.y || self.speed > self.ceiling
    }
}

impl Kinematics for Projectile {
    type Spawn = Spark;

    fn step<R: Rng + ?Sized>(mut self, rng: &mut R) -> Step<Self, Spark> {
        self.trail.push(self.position);
        self.position += Vec2::from_angle(self.angle) * self.speed;
        self.speed *= self.growth;

        if self.should_burst() {
            Step::Terminated(self.burst.spawn(self.position, self.color, rng))
        } else {
            Step::Alive(self)
        }
    }
}

impl Render for Projectile {
    fn render(&self, surface: &mut dyn Surface) {
        surface.stroke(
            self.trail.points(),
            Stroke {
                color: self.color,
                width: self.width,
                alpha: 1.0,
            },
        );
    }
}
