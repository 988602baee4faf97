//! Drawing-surface capability
//!
//! The scene is expressed against `DrawSurface`, a small subset of the
//! Canvas 2D path API. `CommandList` records calls for inspection; the
//! browser adapter lives in `canvas`.

use serde::Serialize;

/// Straight (non-premultiplied) colour, alpha in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub fn new([r, g, b]: [u8; 3], a: f32) -> Self {
        Self {
            r,
            g,
            b,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// CSS `rgba()` string
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Canvas-style immediate-mode drawing
pub trait DrawSurface {
    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, angle: f32);
    fn set_stroke_style(&mut self, color: Rgba);
    fn set_fill_style(&mut self, color: Rgba);
    fn set_line_width(&mut self, width: f32);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn close_path(&mut self);
    /// Full circle of radius `r`
    fn circle(&mut self, x: f32, y: f32, r: f32);
    /// Full axis-aligned ellipse
    fn ellipse(&mut self, x: f32, y: f32, rx: f32, ry: f32);
    fn stroke(&mut self);
    fn fill(&mut self);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
}

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    ClearRect { x: f32, y: f32, w: f32, h: f32 },
    Save,
    Restore,
    Translate { x: f32, y: f32 },
    Rotate { angle: f32 },
    StrokeStyle(Rgba),
    FillStyle(Rgba),
    LineWidth(f32),
    BeginPath,
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    ClosePath,
    Circle { x: f32, y: f32, r: f32 },
    Ellipse { x: f32, y: f32, rx: f32, ry: f32 },
    Stroke,
    Fill,
    FillRect { x: f32, y: f32, w: f32, h: f32 },
}

/// Surface that records every call
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    pub commands: Vec<DrawCommand>,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Replay the recorded calls onto another surface
    pub fn replay(&self, surface: &mut impl DrawSurface) {
        for cmd in &self.commands {
            match *cmd {
                DrawCommand::ClearRect { x, y, w, h } => surface.clear_rect(x, y, w, h),
                DrawCommand::Save => surface.save(),
                DrawCommand::Restore => surface.restore(),
                DrawCommand::Translate { x, y } => surface.translate(x, y),
                DrawCommand::Rotate { angle } => surface.rotate(angle),
                DrawCommand::StrokeStyle(c) => surface.set_stroke_style(c),
                DrawCommand::FillStyle(c) => surface.set_fill_style(c),
                DrawCommand::LineWidth(w) => surface.set_line_width(w),
                DrawCommand::BeginPath => surface.begin_path(),
                DrawCommand::MoveTo { x, y } => surface.move_to(x, y),
                DrawCommand::LineTo { x, y } => surface.line_to(x, y),
                DrawCommand::ClosePath => surface.close_path(),
                DrawCommand::Circle { x, y, r } => surface.circle(x, y, r),
                DrawCommand::Ellipse { x, y, rx, ry } => surface.ellipse(x, y, rx, ry),
                DrawCommand::Stroke => surface.stroke(),
                DrawCommand::Fill => surface.fill(),
                DrawCommand::FillRect { x, y, w, h } => surface.fill_rect(x, y, w, h),
            }
        }
    }
}

impl DrawSurface for CommandList {
    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::ClearRect { x, y, w, h });
    }
    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }
    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }
    fn translate(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::Translate { x, y });
    }
    fn rotate(&mut self, angle: f32) {
        self.commands.push(DrawCommand::Rotate { angle });
    }
    fn set_stroke_style(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::StrokeStyle(color));
    }
    fn set_fill_style(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::FillStyle(color));
    }
    fn set_line_width(&mut self, width: f32) {
        self.commands.push(DrawCommand::LineWidth(width));
    }
    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }
    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }
    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }
    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }
    fn circle(&mut self, x: f32, y: f32, r: f32) {
        self.commands.push(DrawCommand::Circle { x, y, r });
    }
    fn ellipse(&mut self, x: f32, y: f32, rx: f32, ry: f32) {
        self.commands.push(DrawCommand::Ellipse { x, y, rx, ry });
    }
    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }
    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::FillRect { x, y, w, h });
    }
}
