//! Canvas 2D backend

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::Renderer;
use crate::consts::ENDPOINT_RADIUS;
use crate::error::{NotedropError, Result};

const BG: &str = "black";
const FG: &str = "white";

/// Renders onto an `HtmlCanvasElement` appended to the page body
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Create the canvas and its 2D context. Fails if the page has no body
    /// or the browser refuses a 2D context.
    pub fn new() -> Result<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| NotedropError::MissingCanvas("no document".into()))?;
        let body = document
            .body()
            .ok_or_else(|| NotedropError::MissingCanvas("no body".into()))?;

        let canvas = document
            .create_element("canvas")
            .map_err(|e| NotedropError::MissingCanvas(format!("{:?}", e)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| NotedropError::MissingCanvas("not a canvas".into()))?;
        body.append_child(&canvas)
            .map_err(|e| NotedropError::MissingCanvas(format!("{:?}", e)))?;

        let ctx = canvas
            .get_context("2d")
            .map_err(|e| NotedropError::MissingCanvas(format!("{:?}", e)))?
            .ok_or_else(|| NotedropError::MissingCanvas("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| NotedropError::MissingCanvas("unexpected context type".into()))?;

        canvas.style().set_property("background-color", BG).ok();
        canvas.focus().ok();

        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Match the window size. Resizing resets the context styles.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.ctx.set_stroke_style_str(FG);
        self.ctx.set_fill_style_str(FG);
    }
}

impl Renderer for CanvasRenderer {
    fn size(&self) -> Vec2 {
        Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear(&mut self) {
        let size = self.size();
        self.ctx.clear_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2) {
        self.draw_circle(from, ENDPOINT_RADIUS, false);
        self.draw_circle(to, ENDPOINT_RADIUS, false);

        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
        self.ctx.close_path();
    }

    fn draw_circle(&mut self, centre: Vec2, radius: f32, stroke: bool) {
        self.ctx.begin_path();
        self.ctx
            .arc(
                centre.x as f64,
                centre.y as f64,
                radius as f64,
                0.0,
                std::f64::consts::TAU,
            )
            .ok();
        if stroke {
            self.ctx.stroke();
        } else {
            self.ctx.fill();
        }
        self.ctx.close_path();
    }

    fn translate_pointer(&self, client_x: f32, client_y: f32) -> Vec2 {
        let rect = self.canvas.get_bounding_client_rect();
        Vec2::new(client_x - rect.x() as f32, client_y - rect.y() as f32)
    }
}
