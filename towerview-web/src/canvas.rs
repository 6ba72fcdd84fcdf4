/// Canvas 2D renderer: painter's algorithm over projected triangles
use std::cmp::Ordering;
use towerview_core::{FrameRenderer, Rgb, Scene, ScreenTriangle};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    background: Rgb,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, context: CanvasRenderingContext2d, background: Rgb) -> Self {
        Self {
            canvas,
            context,
            background,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn fill_triangle(&self, triangle: &ScreenTriangle) {
        let [a, b, c] = triangle.points;
        let color = triangle.color.scaled(0.35 + 0.65 * triangle.brightness);

        self.context.begin_path();
        self.context.move_to(a.x as f64, a.y as f64);
        self.context.line_to(b.x as f64, b.y as f64);
        self.context.line_to(c.x as f64, c.y as f64);
        self.context.close_path();
        self.context.set_fill_style_str(&color.to_css());
        self.context.fill();
    }
}

impl FrameRenderer for CanvasRenderer {
    type Error = String;

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn render(&mut self, scene: &Scene) -> Result<(), String> {
        let (width, height) = self.size();
        self.context.set_fill_style_str(&self.background.to_css());
        self.context.fill_rect(0.0, 0.0, width as f64, height as f64);

        for triangle in painter_order(scene.project(width, height)) {
            self.fill_triangle(&triangle);
        }
        Ok(())
    }
}

/// Sort triangles farthest first so nearer ones paint over them
pub fn painter_order(mut triangles: Vec<ScreenTriangle>) -> Vec<ScreenTriangle> {
    triangles.sort_by(|a, b| {
        b.mean_depth()
            .partial_cmp(&a.mean_depth())
            .unwrap_or(Ordering::Equal)
    });
    triangles
}
