//! Perspective particle field.
//!
//! Motes fly towards the viewer: every frame they drift sideways, lose depth
//! and age by one. A mote that reaches the viewer (`z <= 0`) or runs out of
//! life is recycled in place at the back of the field. Drawing projects each
//! mote with a perspective divide, so near motes are larger and further from
//! the centre.

use crate::config::DepthConfig;
use crate::spawn::SpawnContext;
use crate::surface::{Fill, Rgba, Surface};
use crate::time::Time;
use crate::Animation;
use glam::{Vec2, Vec3};

const MOTE_COLOR: Rgba = Rgba::new(100, 200, 255, 1.0);

/// One particle of the depth field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mote {
    /// x/y in surface pixels, z in depth units.
    pub position: Vec3,
    /// x/y drift per frame; z is the approach speed, subtracted each frame.
    pub velocity: Vec3,
    /// Frames left before recycling.
    pub life: u32,
    pub max_life: u32,
}

impl Mote {
    /// Remaining life as a fraction in `[0, 1]`.
    pub fn opacity(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        (self.life as f32 / self.max_life as f32).min(1.0)
    }

    /// Whether the mote must be recycled.
    pub fn expired(&self) -> bool {
        self.position.z <= 0.0 || self.life == 0
    }

    /// Project onto a surface of size `bounds`.
    ///
    /// `None` when the mote is at or behind the viewer.
    pub fn project(&self, bounds: Vec2, focal_length: f32) -> Option<Projection> {
        if self.position.z <= 0.0 {
            return None;
        }
        let scale = focal_length / self.position.z;
        Some(Projection {
            center: self.position.truncate() * scale + bounds * 0.5,
            scale,
        })
    }
}

/// A mote's on-screen placement for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub center: Vec2,
    /// Perspective scale, `focal_length / z`.
    pub scale: f32,
}

/// The depth particle animation.
#[derive(Debug, Clone)]
pub struct DepthAnimation {
    config: DepthConfig,
    motes: Vec<Mote>,
}

impl DepthAnimation {
    /// An empty field; the engine populates it on build.
    pub fn new(config: DepthConfig) -> Self {
        Self {
            config,
            motes: Vec::new(),
        }
    }

    pub fn config(&self) -> &DepthConfig {
        &self.config
    }

    pub fn motes(&self) -> &[Mote] {
        &self.motes
    }

    fn spawn(&self, ctx: &mut SpawnContext) -> Mote {
        Mote {
            position: ctx.random_in_volume(self.config.max_depth),
            velocity: ctx
                .random_velocity(self.config.lateral_speed)
                .extend(ctx.random_range(self.config.min_approach, self.config.max_approach)),
            life: ctx.random_uint(0, self.config.max_life),
            max_life: self.config.max_life,
        }
    }

    fn recycle(&self, mote: &mut Mote, ctx: &mut SpawnContext) {
        mote.position = ctx.random_in_bounds().extend(self.config.max_depth);
        mote.life = mote.max_life;
    }
}

impl Animation for DepthAnimation {
    fn name(&self) -> &'static str {
        "depth"
    }

    fn len(&self) -> usize {
        self.motes.len()
    }

    fn fade_color(&self) -> Rgba {
        Rgba::BLACK.with_alpha(self.config.fade)
    }

    fn populate(&mut self, ctx: &mut SpawnContext) {
        let motes: Vec<Mote> = (0..self.config.count).map(|_| self.spawn(ctx)).collect();
        self.motes = motes;
    }

    fn update(&mut self, ctx: &mut SpawnContext) {
        let mut motes = std::mem::take(&mut self.motes);
        for mote in &mut motes {
            mote.position.x += mote.velocity.x;
            mote.position.y += mote.velocity.y;
            mote.position.z -= mote.velocity.z;
            mote.life = mote.life.saturating_sub(1);

            if mote.expired() {
                self.recycle(mote, ctx);
            }
        }
        self.motes = motes;
    }

    fn draw(&self, surface: &mut dyn Surface, _time: &Time) {
        let bounds = surface.bounds();
        for mote in &self.motes {
            let Some(projection) = mote.project(bounds, self.config.focal_length) else {
                continue;
            };
            surface.fill_circle(
                projection.center,
                projection.scale * self.config.size,
                Fill::Solid(MOTE_COLOR.with_alpha(mote.opacity())),
            );
        }
    }
}
