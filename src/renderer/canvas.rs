//! `DrawSurface` over a browser `CanvasRenderingContext2d`
//!
//! Drawing calls are best-effort: a failing path call leaves the frame
//! incomplete rather than aborting it.

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::surface::{DrawSurface, Rgba};

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// Reset the transform to a uniform device-pixel scale
    pub fn set_scale(&mut self, scale: f32) {
        let s = scale as f64;
        let _ = self.ctx.set_transform(s, 0.0, 0.0, s, 0.0, 0.0);
    }
}

impl DrawSurface for CanvasSurface {
    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.clear_rect(x as f64, y as f64, w as f64, h as f64);
    }
    fn save(&mut self) {
        self.ctx.save();
    }
    fn restore(&mut self) {
        self.ctx.restore();
    }
    fn translate(&mut self, x: f32, y: f32) {
        let _ = self.ctx.translate(x as f64, y as f64);
    }
    fn rotate(&mut self, angle: f32) {
        let _ = self.ctx.rotate(angle as f64);
    }
    fn set_stroke_style(&mut self, color: Rgba) {
        self.ctx.set_stroke_style_str(&color.to_css());
    }
    fn set_fill_style(&mut self, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
    }
    fn set_line_width(&mut self, width: f32) {
        self.ctx.set_line_width(width as f64);
    }
    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }
    fn move_to(&mut self, x: f32, y: f32) {
        self.ctx.move_to(x as f64, y as f64);
    }
    fn line_to(&mut self, x: f32, y: f32) {
        self.ctx.line_to(x as f64, y as f64);
    }
    fn close_path(&mut self) {
        self.ctx.close_path();
    }
    fn circle(&mut self, x: f32, y: f32, r: f32) {
        let _ = self.ctx.arc(x as f64, y as f64, r as f64, 0.0, TAU);
    }
    fn ellipse(&mut self, x: f32, y: f32, rx: f32, ry: f32) {
        let _ = self
            .ctx
            .ellipse(x as f64, y as f64, rx as f64, ry as f64, 0.0, 0.0, TAU);
    }
    fn stroke(&mut self) {
        self.ctx.stroke();
    }
    fn fill(&mut self) {
        self.ctx.fill();
    }
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }
}
