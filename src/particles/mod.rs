//! Transient 2D entities and their update rules.
//!
//! Every entity kind implements [`Kinematics`]: one call advances it by one
//! tick and either hands back the next state or reports that it died,
//! together with whatever it spawned on the way out. A [`Pool`] runs that
//! step over all of its entities in one pass.
//!
//! | Kind | Motion | Dies when | Spawns |
//! |------|--------|-----------|--------|
//! | [`Projectile`] | straight line, accelerating | above its target or too fast | a burst of [`Spark`]s |
//! | [`Spark`] | polar velocity with friction, gravity on position | faded out | nothing |
//! | [`GlyphPoint`] | vector velocity with friction, gravity on velocity | faded out | nothing |
//!
//! [`Pool`]: crate::Pool

mod glyph_point;
mod projectile;
mod spark;

pub use glyph_point::GlyphPoint;
pub use projectile::{Burst, Projectile};
pub use spark::Spark;

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;

use crate::surface::Surface;

/// Outcome of advancing one entity by one tick.
#[derive(Debug)]
pub enum Step<T, S> {
    /// Still alive, with its next state.
    Alive(T),
    /// Dead; the pool drops it and collects what it spawned.
    Terminated(Vec<S>),
}

/// Per-tick update rule of an entity kind.
pub trait Kinematics: Sized {
    /// Entities created when this one dies.
    type Spawn;

    /// Advance by one tick.
    fn step<R: Rng + ?Sized>(self, rng: &mut R) -> Step<Self, Self::Spawn>;
}

/// Draws one entity from its current state.
pub trait Render {
    fn render(&self, surface: &mut dyn Surface);
}

/// The last `cap` positions of an entity, oldest first.
///
/// Kept contiguous after every push so renderers can stroke it as one slice.
#[derive(Clone, Debug, PartialEq)]
pub struct Trail {
    points: VecDeque<Vec2>,
    cap: usize,
}

impl Trail {
    pub fn new(cap: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Append a position, dropping the oldest once full.
    pub fn push(&mut self, point: Vec2) {
        if self.cap == 0 {
            return;
        }
        if self.points.len() == self.cap {
            self.points.pop_front();
        }
        self.points.push_back(point);
        self.points.make_contiguous();
    }

    pub fn points(&self) -> &[Vec2] {
        let (head, tail) = self.points.as_slices();
        debug_assert!(tail.is_empty());
        head
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Fade-out shared by sparks and glyph points: subtract `decay`, then die
/// once the remaining alpha would not survive another step.
#[inline]
fn fade(alpha: &mut f32, decay: f32) -> bool {
    *alpha -= decay;
    *alpha <= decay
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_drops_oldest() {
        let mut trail = Trail::new(3);
        for i in 0..5 {
            trail.push(Vec2::splat(i as f32));
        }
        assert_eq!(trail.points(), &[Vec2::splat(2.0), Vec2::splat(3.0), Vec2::splat(4.0)]);
    }

    #[test]
    fn test_trail_stays_ordered_across_wraparound() {
        let mut trail = Trail::new(10);
        for i in 0..37u32 {
            trail.push(Vec2::new(i as f32, 0.0));
            let expected: Vec<Vec2> = (i.saturating_sub(9)..=i).map(|j| Vec2::new(j as f32, 0.0)).collect();
            assert_eq!(trail.points(), expected.as_slice());
        }
    }

    #[test]
    fn test_zero_length_trail_stays_empty() {
        let mut trail = Trail::new(0);
        trail.push(Vec2::ONE);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_fade_predicate() {
        let mut alpha = 1.0;
        assert!(!fade(&mut alpha, 0.25));
        assert!(!fade(&mut alpha, 0.25));
        assert!(fade(&mut alpha, 0.25));
        assert_eq!(alpha, 0.25);
    }
}
