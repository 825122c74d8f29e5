//! Pointer-following effects.
//!
//! [`MouseTrail`] is a chain of points where the head sits on the pointer
//! and every other point eases towards its predecessor. [`Orbit`] rings a
//! set of points around the pointer, rotating with time.

use crate::config::{OrbitConfig, TrailConfig};
use glam::Vec2;
use std::f32::consts::TAU;

/// Placement of one trail element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailStyle {
    pub left: f32,
    pub top: f32,
    pub size: f32,
    pub opacity: f32,
}

/// A fading chain of points behind the pointer.
#[derive(Debug, Clone)]
pub struct MouseTrail {
    config: TrailConfig,
    pointer: Vec2,
    points: Vec<Vec2>,
}

impl MouseTrail {
    /// All points start at the origin, as does the pointer.
    pub fn new(config: TrailConfig) -> Self {
        Self {
            points: vec![Vec2::ZERO; config.length],
            pointer: Vec2::ZERO,
            config,
        }
    }

    pub fn set_pointer(&mut self, pointer: Vec2) {
        self.pointer = pointer;
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Move the head to the pointer and ease the rest one frame.
    pub fn step(&mut self) {
        let Some(head) = self.points.first_mut() else {
            return;
        };
        *head = self.pointer;
        for i in 1..self.points.len() {
            let prev = self.points[i - 1];
            let p = self.points[i];
            self.points[i] = p + (prev - p) * self.config.follow;
        }
    }

    /// Opacity of point `index`, 1 at the head falling towards 0.
    pub fn opacity(&self, index: usize) -> f32 {
        let len = self.points.len() as f32;
        (len - index as f32) / len
    }

    /// Current style of every point, head first.
    pub fn styles(&self) -> impl Iterator<Item = TrailStyle> + '_ {
        self.points.iter().enumerate().map(|(i, p)| {
            let opacity = self.opacity(i);
            let size = opacity * self.config.size_range + self.config.min_size;
            TrailStyle {
                left: p.x - size / 2.0,
                top: p.y - size / 2.0,
                size,
                opacity,
            }
        })
    }
}

/// Points circling the pointer.
#[derive(Debug, Clone)]
pub struct Orbit {
    config: OrbitConfig,
    center: Vec2,
}

impl Orbit {
    /// Orbit around the middle of `viewport` until the pointer moves.
    pub fn new(config: OrbitConfig, viewport: Vec2) -> Self {
        Self {
            config,
            center: viewport / 2.0,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    /// Position of every particle at `seconds`.
    pub fn positions(&self, seconds: f64) -> impl Iterator<Item = Vec2> + '_ {
        let count = self.config.count;
        let spin = (seconds * self.config.angular_speed as f64) as f32;
        (0..count).map(move |i| {
            let angle = i as f32 / count as f32 * TAU + spin;
            self.center + Vec2::new(angle.cos(), angle.sin()) * self.config.radius
        })
    }
}
