//! # backdrop - Frame-driven canvas backdrops
//!
//! Particle and graph animations for a portfolio page, plus the small
//! page effects around them (typing text, mouse trail, scroll styling,
//! mobile menu, contact form).
//!
//! The animations are plain Rust: they draw into anything implementing
//! [`Surface`], so the same code runs headless in tests, renders PNG frames
//! natively, and drives real `<canvas>` elements under the `web` feature.
//!
//! ## Quick Start
//!
//! ```
//! use backdrop::prelude::*;
//!
//! let mut engine = EngineBuilder::new(GraphAnimation::new(GraphConfig::default()))
//!     .with_seed(7)
//!     .build(RecordingSurface::default(), UVec2::new(800, 600));
//!
//! assert_eq!(engine.run_frames(3), 3);
//! engine.teardown();
//! assert_eq!(engine.frame(), FrameStatus::Stopped);
//! ```
//!
//! ## Core Concepts
//!
//! ### Animations
//!
//! An [`Animation`] owns a fixed-size collection of records. The engine asks
//! it to populate the collection when it starts and whenever the viewport
//! changes, then once per frame to update and draw it:
//!
//! 1. fade the previous frame with a translucent rectangle
//! 2. advance every record one step and apply the boundary policy
//! 3. draw every record
//!
//! ### Surfaces
//!
//! A [`Surface`] is a 2D drawing target with rectangles, lines, circles and
//! text. A [`SurfaceHost`] resolves surfaces by id; an engine attached to a
//! missing id simply never starts.
//!
//! ### Time and randomness
//!
//! Frame time comes from a [`Clock`]; randomness from a seedable RNG. Both
//! can be pinned with [`EngineBuilder::with_clock`] and
//! [`EngineBuilder::with_seed`] for reproducible output.
//!
//! ## Feature Overview
//!
//! | Effect | Type |
//! |--------|------|
//! | Node graph | [`GraphAnimation`] |
//! | Glyph rain | [`RainAnimation`] |
//! | Depth particles | [`DepthAnimation`] |
//! | Typing text | [`typing::Typewriter`] |
//! | Pointer trail and orbit | [`trail::MouseTrail`], [`trail::Orbit`] |
//! | Scroll effects | [`scroll`] |
//! | Mobile menu | [`menu::MobileMenu`] |
//! | Contact form | [`contact::ContactForm`] |
//! | Outbound links | [`links`] |

pub mod config;
pub mod contact;
pub mod depth;
mod engine;
mod error;
pub mod graph;
pub mod links;
pub mod menu;
pub mod rain;
pub mod raster;
pub mod scroll;
mod spawn;
pub mod surface;
pub mod time;
pub mod trail;
pub mod typing;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use config::BackdropConfig;
pub use depth::DepthAnimation;
pub use engine::{CancelToken, Engine, EngineBuilder, FrameStatus};
pub use error::{Error, Result};
pub use glam::{UVec2, Vec2, Vec3};
pub use graph::GraphAnimation;
pub use rain::RainAnimation;
pub use raster::RasterSurface;
pub use spawn::SpawnContext;
pub use surface::{DrawCommand, Fill, RecordingSurface, Rgba, Surface, SurfaceHost};
pub use time::{Clock, ManualClock, SystemClock, Time};

/// A frame-driven effect over a fixed-size collection of records.
///
/// Implemented by [`GraphAnimation`], [`RainAnimation`] and
/// [`DepthAnimation`]. The engine drives it; nothing else should call
/// `populate` or `update`.
///
/// # Contract
///
/// - `populate` replaces the whole collection. Its size depends only on the
///   config and the surface bounds.
/// - `update` advances every record exactly one step and applies the
///   boundary policy, so after it returns every record is in a drawable
///   state.
/// - `draw` is a pure read of the collection; derived visuals (radius,
///   opacity, colour) come from record state and `time`.
pub trait Animation {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Number of records in the collection.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Colour of the translucent rectangle painted before each frame.
    fn fade_color(&self) -> Rgba;

    /// Replace the collection for the surface described by `ctx`.
    fn populate(&mut self, ctx: &mut SpawnContext);

    /// Advance one frame step.
    fn update(&mut self, ctx: &mut SpawnContext);

    /// Draw the current state.
    fn draw(&self, surface: &mut dyn Surface, time: &Time);
}

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```
/// use backdrop::prelude::*;
/// ```
///
/// This imports:
/// - [`EngineBuilder`], [`Engine`], [`FrameStatus`] - building and running
/// - [`GraphAnimation`], [`RainAnimation`], [`DepthAnimation`] - the effects
/// - their config sections
/// - [`Surface`], [`RecordingSurface`], [`RasterSurface`] - drawing targets
/// - [`Vec2`], [`Vec3`], [`UVec2`] - glam vector types
pub mod prelude {
    pub use crate::config::{BackdropConfig, DepthConfig, GraphConfig, RainConfig};
    pub use crate::depth::DepthAnimation;
    pub use crate::engine::{CancelToken, Engine, EngineBuilder, FrameStatus};
    pub use crate::graph::GraphAnimation;
    pub use crate::rain::RainAnimation;
    pub use crate::raster::RasterSurface;
    pub use crate::spawn::SpawnContext;
    pub use crate::surface::{Fill, RecordingSurface, Rgba, Surface, SurfaceHost};
    pub use crate::time::{Clock, ManualClock, SystemClock, Time};
    pub use crate::Animation;
    pub use crate::{UVec2, Vec2, Vec3};
}
