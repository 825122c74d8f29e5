//! Glyph rain ("matrix") animation.
//!
//! One drop per fixed-width column falls at its own constant speed. A drop
//! that leaves the bottom edge restarts just above the top with a new glyph.
//! Brightness is a sine of the drop's height, so drops pulse as they fall.

use crate::config::RainConfig;
use crate::spawn::SpawnContext;
use crate::surface::{Rgba, Surface};
use crate::time::Time;
use crate::Animation;
use glam::Vec2;

const GLYPH_COLOR: Rgba = Rgba::new(0, 255, 0, 1.0);

/// One falling glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Raindrop {
    /// Left edge of the column; never changes.
    pub x: f32,
    pub y: f32,
    /// Fall speed in px/frame.
    pub speed: f32,
    pub glyph: char,
}

/// The glyph rain animation.
#[derive(Debug, Clone)]
pub struct RainAnimation {
    config: RainConfig,
    glyphs: Vec<char>,
    drops: Vec<Raindrop>,
}

impl RainAnimation {
    /// An empty rain; the engine populates it on build.
    ///
    /// An empty glyph set falls back to the default one.
    pub fn new(config: RainConfig) -> Self {
        let mut glyphs: Vec<char> = config.glyphs.chars().collect();
        if glyphs.is_empty() {
            log::warn!("rain glyph set is empty, using the default set");
            glyphs = RainConfig::default().glyphs.chars().collect();
        }
        Self {
            config,
            glyphs,
            drops: Vec::new(),
        }
    }

    pub fn config(&self) -> &RainConfig {
        &self.config
    }

    pub fn drops(&self) -> &[Raindrop] {
        &self.drops
    }

    /// The glyphs a drop can show.
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    /// Number of columns that fit in `width`.
    pub fn column_count(&self, width: f32) -> usize {
        if self.config.column_width > 0.0 && width > 0.0 {
            (width / self.config.column_width).floor() as usize
        } else {
            0
        }
    }

    /// Brightness of a drop at height `y`, in `[0, 1]`.
    pub fn brightness(&self, y: f32) -> f32 {
        (y * self.config.wave).sin() * 0.5 + 0.5
    }

    fn pick_glyph(&self, ctx: &mut SpawnContext) -> char {
        ctx.choose(&self.glyphs).unwrap_or('0')
    }
}

impl Animation for RainAnimation {
    fn name(&self) -> &'static str {
        "rain"
    }

    fn len(&self) -> usize {
        self.drops.len()
    }

    fn fade_color(&self) -> Rgba {
        Rgba::BLACK.with_alpha(self.config.fade)
    }

    fn populate(&mut self, ctx: &mut SpawnContext) {
        let columns = self.column_count(ctx.bounds.x);
        let drops: Vec<Raindrop> = (0..columns)
            .map(|i| Raindrop {
                x: i as f32 * self.config.column_width,
                y: ctx.random_range(0.0, ctx.bounds.y),
                speed: ctx.random_range(self.config.min_speed, self.config.max_speed),
                glyph: self.pick_glyph(ctx),
            })
            .collect();
        self.drops = drops;
    }

    fn update(&mut self, ctx: &mut SpawnContext) {
        let height = ctx.bounds.y;
        for drop in &mut self.drops {
            drop.y += drop.speed;
            if drop.y > height {
                drop.y = self.config.respawn_y;
                drop.glyph = ctx.choose(&self.glyphs).unwrap_or('0');
            }
        }
    }

    fn draw(&self, surface: &mut dyn Surface, _time: &Time) {
        let mut buf = [0u8; 4];
        for drop in &self.drops {
            let alpha = self.brightness(drop.y) * self.config.max_opacity;
            surface.fill_text(
                drop.glyph.encode_utf8(&mut buf),
                Vec2::new(drop.x, drop.y),
                self.config.font_px,
                GLYPH_COLOR.with_alpha(alpha),
            );
        }
    }
}
