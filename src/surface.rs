//! Drawing surfaces.
//!
//! Animations never talk to a concrete canvas. They draw through the
//! [`Surface`] trait, which mirrors the handful of 2D canvas operations the
//! effects need. Hosts hand surfaces out through [`SurfaceHost`] by a stable
//! id, so a missing canvas simply means no engine.
//!
//! Two surfaces live here and in [`crate::raster`]:
//!
//! | Surface | Use |
//! |---------|-----|
//! | [`RecordingSurface`] | Records [`DrawCommand`]s for tests and inspection |
//! | [`RasterSurface`](crate::raster::RasterSurface) | Software rasterizer, PNG export |
//!
//! The `web` feature adds a canvas-backed surface for wasm32.

use glam::{UVec2, Vec2};
use std::collections::HashMap;
use std::fmt;

/// An sRGB colour with a straight (non-premultiplied) alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour, different alpha. Alpha is clamped to `[0, 1]`.
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS `rgba()` notation, as accepted by canvas `fillStyle`.
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// How a circle is filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    /// One flat colour.
    Solid(Rgba),
    /// Radial gradient from the centre (`inner`) to the rim (`outer`).
    Radial { inner: Rgba, outer: Rgba },
}

/// One drawing operation, as captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize { width: u32, height: u32 },
    Rect { origin: Vec2, size: Vec2, color: Rgba },
    Line { from: Vec2, to: Vec2, width: f32, color: Rgba },
    Circle { center: Vec2, radius: f32, fill: Fill },
    Text { text: String, origin: Vec2, font_px: f32, color: Rgba },
}

/// A 2D drawing target sized in pixels.
pub trait Surface {
    /// Current size in pixels.
    fn size(&self) -> UVec2;

    /// Resize the drawing buffer. Existing content may be discarded.
    fn set_size(&mut self, size: UVec2);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba);

    /// Stroke a straight line segment.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);

    /// Fill a circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Fill);

    /// Draw monospace text with its baseline at `origin.y`.
    fn fill_text(&mut self, text: &str, origin: Vec2, font_px: f32, color: Rgba);

    /// Size as floating point bounds.
    fn bounds(&self) -> Vec2 {
        self.size().as_vec2()
    }

    /// Paint a translucent rectangle over the whole surface.
    ///
    /// This is the only way old frames decay; nothing is ever erased.
    fn fade(&mut self, color: Rgba) {
        let bounds = self.bounds();
        self.fill_rect(Vec2::ZERO, bounds, color);
    }
}

/// Resolves drawing surfaces by id.
pub trait SurfaceHost {
    type Surface: Surface;

    /// Look up a surface. `None` when no such target exists.
    fn resolve(&self, id: &str) -> Option<Self::Surface>;
}

/// A surface that remembers what was drawn on it.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: UVec2,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(size: UVec2) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    /// All commands recorded since creation or the last [`take`](Self::take).
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the recorded commands.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Recorded line strokes.
    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    /// Recorded circle fills.
    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    /// Recorded text draws.
    pub fn texts(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { .. }))
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> UVec2 {
        self.size
    }

    fn set_size(&mut self, size: UVec2) {
        self.size = size;
        self.commands.push(DrawCommand::Resize {
            width: size.x,
            height: size.y,
        });
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        self.commands.push(DrawCommand::Rect {
            origin,
            size,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Fill) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            fill,
        });
    }

    fn fill_text(&mut self, text: &str, origin: Vec2, font_px: f32, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            origin,
            font_px,
            color,
        });
    }
}

/// A host with a fixed set of named recording surfaces.
///
/// Useful for headless runs where only some effects should start.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    surfaces: HashMap<String, UVec2>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a surface id with its initial size.
    pub fn with_surface(mut self, id: impl Into<String>, size: UVec2) -> Self {
        self.surfaces.insert(id.into(), size);
        self
    }
}

impl SurfaceHost for RecordingHost {
    type Surface = RecordingSurface;

    fn resolve(&self, id: &str) -> Option<RecordingSurface> {
        self.surfaces.get(id).map(|size| RecordingSurface::new(*size))
    }
}
