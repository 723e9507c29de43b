use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::{BirdError, Result};

/// The subset of a 2d canvas context the bird draws with.
pub trait Surface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;

    fn set_fill_style(&mut self, style: &str);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    fn fill(&mut self);
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn from_element_id(id: &str) -> Result<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| BirdError::SurfaceUnavailable("no document".into()))?;

        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| BirdError::SurfaceUnavailable(format!("no element with id {id:?}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| BirdError::SurfaceUnavailable(format!("#{id} is not a canvas")))?;

        Self::from_canvas(canvas)
    }

    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Self> {
        let context = canvas
            .get_context("2d")
            .map_err(|e| BirdError::SurfaceUnavailable(format!("{:?}", e)))?
            .ok_or_else(|| BirdError::SurfaceUnavailable("2d context not supported".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| BirdError::SurfaceUnavailable("not a 2d context".into()))?;

        Ok(Self { canvas, context })
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> f64 {
        self.canvas.width().into()
    }

    fn height(&self) -> f64 {
        self.canvas.height().into()
    }

    fn set_fill_style(&mut self, style: &str) {
        self.context.set_fill_style(&JsValue::from_str(style));
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.context.fill_rect(x, y, w, h);
    }

    fn begin_path(&mut self) {
        self.context.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.context.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.context.line_to(x, y);
    }

    fn close_path(&mut self) {
        self.context.close_path();
    }

    fn fill(&mut self) {
        self.context.fill();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillStyle(String),
    FillRect(f64, f64, f64, f64),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    ClosePath,
    Fill,
}

/// Keeps every command in memory instead of painting.
#[derive(Debug, Default)]
pub struct Recorder {
    width: f64,
    height: f64,
    pub commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, commands: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of filled paths, not counting `fill_rect`.
    pub fn fills(&self) -> usize {
        self.commands.iter().filter(|c| **c == DrawCommand::Fill).count()
    }
}

impl Surface for Recorder {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn set_fill_style(&mut self, style: &str) {
        self.commands.push(DrawCommand::FillStyle(style.to_owned()));
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.commands.push(DrawCommand::FillRect(x, y, w, h));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo(x, y));
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }
}
