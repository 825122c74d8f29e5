//! Engine builder and frame runner.
//!
//! An [`Engine`] owns one animation, one surface, a clock and an RNG. The
//! host calls [`Engine::frame`] once per display refresh and
//! [`Engine::resize`] whenever the viewport changes. Both take `&mut self`,
//! so a resize always completes before the next frame reads the collection.

use crate::spawn::SpawnContext;
use crate::surface::{Surface, SurfaceHost};
use crate::time::{Clock, SystemClock, Time};
use crate::Animation;
use glam::UVec2;
use log::{debug, info, trace};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::cell::Cell;
use std::rc::Rc;

/// How often frame statistics are traced, in frames.
const STATS_INTERVAL: u64 = 600;

/// Outcome of one [`Engine::frame`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// A frame was drawn; schedule another.
    Continue,
    /// The engine was torn down; nothing was drawn.
    Stopped,
}

/// Shared cancellation flag.
///
/// Clones observe the same flag. Once cancelled it stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Builder for an [`Engine`].
///
/// Use method chaining to configure, then call `.build()` with a surface or
/// `.attach()` with a host.
pub struct EngineBuilder<A: Animation> {
    animation: A,
    seed: Option<u64>,
    clock: Option<Box<dyn Clock>>,
}

impl<A: Animation> EngineBuilder<A> {
    /// Start configuring an engine for `animation`.
    pub fn new(animation: A) -> Self {
        Self {
            animation,
            seed: None,
            clock: None,
        }
    }

    /// Seed the RNG for reproducible populations.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Use a specific time source instead of the system clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Size `surface` to `viewport`, populate the animation and return the
    /// engine ready for its first frame.
    pub fn build<S: Surface>(self, mut surface: S, viewport: UVec2) -> Engine<A, S> {
        let clock = self
            .clock
            .unwrap_or_else(|| Box::new(SystemClock::new()) as Box<dyn Clock>);
        let rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        surface.set_size(viewport);

        let mut engine = Engine {
            time: Time::new(clock.now()),
            animation: self.animation,
            surface,
            clock,
            rng,
            cancel: CancelToken::new(),
        };
        engine.populate();

        info!(
            "{} animation started at {}x{} with {} particles",
            engine.animation.name(),
            viewport.x,
            viewport.y,
            engine.animation.len()
        );
        engine
    }

    /// Resolve surface `id` from `host` and build on it.
    ///
    /// Returns `None` when the host has no such surface; nothing is started.
    pub fn attach<H: SurfaceHost>(self, host: &H, id: &str, viewport: UVec2) -> Option<Engine<A, H::Surface>> {
        let Some(surface) = host.resolve(id) else {
            debug!("surface '{id}' not found, {} animation not started", self.animation.name());
            return None;
        };
        Some(self.build(surface, viewport))
    }
}

/// A running animation bound to a surface.
pub struct Engine<A: Animation, S: Surface> {
    animation: A,
    surface: S,
    time: Time,
    clock: Box<dyn Clock>,
    rng: SmallRng,
    cancel: CancelToken,
}

impl<A: Animation, S: Surface> Engine<A, S> {
    /// Advance one step and draw it.
    ///
    /// After [`teardown`](Self::teardown) this returns
    /// [`FrameStatus::Stopped`] without touching any state.
    pub fn frame(&mut self) -> FrameStatus {
        if self.cancel.is_cancelled() {
            return FrameStatus::Stopped;
        }

        self.time.update(self.clock.now());

        let fade = self.animation.fade_color();
        self.surface.fade(fade);

        let mut ctx = SpawnContext::new(self.surface.bounds(), &mut self.rng);
        self.animation.update(&mut ctx);
        self.animation.draw(&mut self.surface, &self.time);

        if self.time.frame() % STATS_INTERVAL == 0 {
            trace!(
                "{}: frame {} at {:.1} fps",
                self.animation.name(),
                self.time.frame(),
                self.time.fps()
            );
        }

        FrameStatus::Continue
    }

    /// Run up to `frames` frames, stopping early on teardown.
    ///
    /// Returns the number of frames drawn.
    pub fn run_frames(&mut self, frames: usize) -> usize {
        let mut drawn = 0;
        while drawn < frames && self.frame() == FrameStatus::Continue {
            drawn += 1;
        }
        drawn
    }

    /// Resize the surface to `viewport` and regenerate the collection.
    ///
    /// Ignored after teardown.
    pub fn resize(&mut self, viewport: UVec2) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.surface.set_size(viewport);
        self.populate();
        debug!(
            "{} animation resized to {}x{}, {} particles",
            self.animation.name(),
            viewport.x,
            viewport.y,
            self.animation.len()
        );
    }

    /// Stop the engine. Safe to call more than once.
    pub fn teardown(&self) {
        if !self.cancel.is_cancelled() {
            info!("{} animation torn down after {} frames", self.animation.name(), self.time.frame());
            self.cancel.cancel();
        }
    }

    /// Whether frames are still being produced.
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// A handle that tears the engine down when cancelled.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn animation(&self) -> &A {
        &self.animation
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    fn populate(&mut self) {
        let mut ctx = SpawnContext::new(self.surface.bounds(), &mut self.rng);
        self.animation.populate(&mut ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DepthConfig, GraphConfig, RainConfig};
    use crate::depth::DepthAnimation;
    use crate::graph::GraphAnimation;
    use crate::rain::RainAnimation;
    use crate::surface::{DrawCommand, RecordingHost, RecordingSurface};
    use crate::time::ManualClock;

    fn graph_engine(viewport: UVec2) -> Engine<GraphAnimation, RecordingSurface> {
        EngineBuilder::new(GraphAnimation::new(GraphConfig::default()))
            .with_seed(1)
            .with_clock(ManualClock::new())
            .build(RecordingSurface::default(), viewport)
    }

    #[test]
    fn test_build_sizes_surface_and_populates() {
        let engine = graph_engine(UVec2::new(800, 600));
        assert_eq!(engine.surface().size(), UVec2::new(800, 600));
        assert_eq!(engine.animation().len(), 50);
        assert!(engine.is_running());
    }

    #[test]
    fn test_frame_fades_first() {
        let mut engine = graph_engine(UVec2::new(800, 600));
        engine.surface_mut().take();
        assert_eq!(engine.frame(), FrameStatus::Continue);

        let commands = engine.surface().commands();
        assert!(matches!(
            commands[0],
            DrawCommand::Rect { color, .. } if color.a == 0.05
        ));
        assert_eq!(engine.time().frame(), 1);
    }

    #[test]
    fn test_resize_regenerates_collection() {
        let mut engine = EngineBuilder::new(RainAnimation::new(RainConfig::default()))
            .with_seed(3)
            .build(RecordingSurface::default(), UVec2::new(400, 300));
        assert_eq!(engine.animation().len(), 20);

        engine.resize(UVec2::new(1000, 300));
        assert_eq!(engine.surface().size(), UVec2::new(1000, 300));
        assert_eq!(engine.animation().len(), 50);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let mut engine = graph_engine(UVec2::new(800, 600));
        engine.run_frames(2);

        engine.teardown();
        engine.teardown();
        assert!(!engine.is_running());

        let before = engine.surface().commands().len();
        assert_eq!(engine.frame(), FrameStatus::Stopped);
        assert_eq!(engine.run_frames(10), 0);
        engine.resize(UVec2::new(10, 10));
        assert_eq!(engine.surface().commands().len(), before);
        assert_eq!(engine.time().frame(), 2);
    }

    #[test]
    fn test_cancel_token_stops_engine() {
        let mut engine = EngineBuilder::new(DepthAnimation::new(DepthConfig::default()))
            .with_seed(9)
            .build(RecordingSurface::default(), UVec2::new(320, 240));
        let token = engine.cancel_token();
        assert_eq!(engine.run_frames(3), 3);
        token.cancel();
        assert_eq!(engine.frame(), FrameStatus::Stopped);
    }

    #[test]
    fn test_attach_missing_surface_is_none() {
        let host = RecordingHost::new().with_surface("neuralCanvas", UVec2::new(10, 10));
        let missing = EngineBuilder::new(RainAnimation::new(RainConfig::default()))
            .attach(&host, "matrixCanvas", UVec2::new(100, 100));
        assert!(missing.is_none());

        let found = EngineBuilder::new(GraphAnimation::new(GraphConfig::default()))
            .attach(&host, "neuralCanvas", UVec2::new(100, 100))
            .unwrap();
        assert_eq!(found.surface().size(), UVec2::new(100, 100));
    }

    #[test]
    fn test_same_seed_same_population() {
        let a = graph_engine(UVec2::new(800, 600));
        let b = graph_engine(UVec2::new(800, 600));
        assert_eq!(a.animation().nodes(), b.animation().nodes());
    }
}
