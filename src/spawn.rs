//! Spawn context for particle initialization and recycling.
//!
//! Animations never touch the engine's RNG directly. The engine lends them a
//! [`SpawnContext`] carrying the current surface bounds and helpers for the
//! handful of distributions the effects use.

use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::Rng;

/// Context handed to [`Animation::populate`](crate::Animation::populate) and
/// [`Animation::update`](crate::Animation::update).
pub struct SpawnContext<'a> {
    /// Surface size in pixels.
    pub bounds: Vec2,
    rng: &'a mut SmallRng,
}

impl<'a> SpawnContext<'a> {
    pub(crate) fn new(bounds: Vec2, rng: &'a mut SmallRng) -> Self {
        Self { bounds, rng }
    }

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`. Returns `min` for an empty range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Random usize in `[min, max)`. Returns `min` for an empty range.
    #[inline]
    pub fn random_index(&mut self, min: usize, max: usize) -> usize {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Random u32 in `[min, max)`. Returns `min` for an empty range.
    #[inline]
    pub fn random_uint(&mut self, min: u32, max: u32) -> u32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Random point on the surface, uniform over `[0, w) x [0, h)`.
    pub fn random_in_bounds(&mut self) -> Vec2 {
        Vec2::new(
            self.random_range(0.0, self.bounds.x),
            self.random_range(0.0, self.bounds.y),
        )
    }

    /// Random 2D velocity with each component in `[-span/2, span/2)`.
    pub fn random_velocity(&mut self, span: f32) -> Vec2 {
        Vec2::new(
            (self.random() - 0.5) * span,
            (self.random() - 0.5) * span,
        )
    }

    /// Random point on the surface at a random depth in `[0, max_depth)`.
    pub fn random_in_volume(&mut self, max_depth: f32) -> Vec3 {
        self.random_in_bounds().extend(self.random_range(0.0, max_depth))
    }

    /// Uniformly pick one element. `None` for an empty slice.
    pub fn choose<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            None
        } else {
            Some(items[self.rng.gen_range(0..items.len())])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_random_in_bounds() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut ctx = SpawnContext::new(Vec2::new(100.0, 50.0), &mut rng);
        for _ in 0..1000 {
            let p = ctx.random_in_bounds();
            assert!((0.0..100.0).contains(&p.x));
            assert!((0.0..50.0).contains(&p.y));
        }
    }

    #[test]
    fn test_empty_ranges_do_not_panic() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut ctx = SpawnContext::new(Vec2::ZERO, &mut rng);
        assert_eq!(ctx.random_in_bounds(), Vec2::ZERO);
        assert_eq!(ctx.random_range(3.0, 3.0), 3.0);
        assert_eq!(ctx.random_index(4, 2), 4);
        assert_eq!(ctx.random_uint(0, 0), 0);
        assert_eq!(ctx.choose::<char>(&[]), None);
    }

    #[test]
    fn test_random_velocity_span() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut ctx = SpawnContext::new(Vec2::ONE, &mut rng);
        for _ in 0..1000 {
            let v = ctx.random_velocity(0.5);
            assert!(v.x >= -0.25 && v.x < 0.25);
            assert!(v.y >= -0.25 && v.y < 0.25);
        }
    }

    #[test]
    fn test_choose_only_returns_members() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut ctx = SpawnContext::new(Vec2::ONE, &mut rng);
        let glyphs = ['0', '1', 'ア'];
        for _ in 0..100 {
            assert!(glyphs.contains(&ctx.choose(&glyphs).unwrap()));
        }
    }
}
