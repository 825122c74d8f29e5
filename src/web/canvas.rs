//! `<canvas>` surfaces.

use crate::surface::{Fill, Rgba, Surface, SurfaceHost};
use crate::{Error, Result};
use glam::{UVec2, Vec2};
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

/// A canvas element and its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| Error::Js("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| Error::Js("not a 2d context".into()))?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> UVec2 {
        UVec2::new(self.canvas.width(), self.canvas.height())
    }

    fn set_size(&mut self, size: UVec2) {
        self.canvas.set_width(size.x);
        self.canvas.set_height(size.y);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Fill) {
        let (x, y, r) = (center.x as f64, center.y as f64, radius as f64);
        match fill {
            Fill::Solid(color) => self.ctx.set_fill_style_str(&color.to_css()),
            Fill::Radial { inner, outer } => match self.ctx.create_radial_gradient(x, y, 0.0, x, y, r) {
                Ok(gradient) => {
                    // Stop offsets are constants in [0, 1]; colours are valid CSS.
                    let _ = gradient.add_color_stop(0.0, &inner.to_css());
                    let _ = gradient.add_color_stop(1.0, &outer.to_css());
                    self.ctx.set_fill_style_canvas_gradient(&gradient);
                }
                Err(_) => self.ctx.set_fill_style_str(&inner.to_css()),
            },
        }
        self.ctx.begin_path();
        if self.ctx.arc(x, y, r, 0.0, TAU).is_ok() {
            self.ctx.fill();
        }
    }

    fn fill_text(&mut self, text: &str, origin: Vec2, font_px: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.set_font(&format!("{font_px}px monospace"));
        let _ = self.ctx.fill_text(text, origin.x as f64, origin.y as f64);
    }
}

/// Resolves canvases by element id.
pub struct DocumentHost {
    document: Document,
}

impl DocumentHost {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl SurfaceHost for DocumentHost {
    type Surface = CanvasSurface;

    fn resolve(&self, id: &str) -> Option<CanvasSurface> {
        let canvas = self
            .document
            .get_element_by_id(id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        match CanvasSurface::new(canvas) {
            Ok(surface) => Some(surface),
            Err(e) => {
                log::warn!("canvas '{id}' has no usable context: {e}");
                None
            }
        }
    }
}
