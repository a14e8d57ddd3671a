//! Ordered collections of live entities.

use rand::Rng;

use crate::particles::{GlyphPoint, Kinematics, Projectile, Render, Spark, Step};
use crate::surface::Surface;

/// What one update pass removed and produced.
#[derive(Debug)]
pub struct Culled<S> {
    /// Entities that died this pass.
    pub terminated: usize,
    /// Everything the dead entities spawned, in pool order.
    pub spawned: Vec<S>,
}

/// An ordered pool of one entity kind.
///
/// Updates are two-phase: every entity is stepped once and the survivors are
/// collected, in their original order, into a second buffer that then
/// replaces the first. The two buffers are swapped rather than reallocated.
#[derive(Clone, Debug)]
pub struct Pool<T> {
    live: Vec<T>,
    scratch: Vec<T>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self {
            live: Vec::new(),
            scratch: Vec::new(),
        }
    }
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the end.
    pub fn push(&mut self, entity: T) {
        self.live.push(entity);
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.live.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.live
    }
}

impl<T> Extend<T> for Pool<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.live.extend(iter);
    }
}

impl<'a, T> IntoIterator for &'a Pool<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.live.iter()
    }
}

impl<T: Kinematics> Pool<T> {
    /// Step every entity once and drop the dead ones.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Culled<T::Spawn> {
        let mut culled = Culled {
            terminated: 0,
            spawned: Vec::new(),
        };

        self.scratch.clear();
        self.scratch.reserve(self.live.len());
        for entity in self.live.drain(..) {
            match entity.step(rng) {
                Step::Alive(next) => self.scratch.push(next),
                Step::Terminated(spawn) => {
                    culled.terminated += 1;
                    culled.spawned.extend(spawn);
                }
            }
        }
        std::mem::swap(&mut self.live, &mut self.scratch);

        culled
    }
}

impl<T: Render> Pool<T> {
    /// Draw every entity in order.
    pub fn render_all(&self, surface: &mut dyn Surface) {
        for entity in &self.live {
            entity.render(surface);
        }
    }
}

/// The three pools of the fireworks scene.
#[derive(Clone, Debug, Default)]
pub struct FireworkPools {
    pub projectiles: Pool<Projectile>,
    pub sparks: Pool<Spark>,
    pub glyphs: Pool<GlyphPoint>,
}

impl FireworkPools {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total live entities across all pools.
    pub fn total(&self) -> usize {
        self.projectiles.len() + self.sparks.len() + self.glyphs.len()
    }
}
