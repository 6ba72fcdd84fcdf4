/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::convert::Infallible;
use std::io::Write;
use towerview_core::{FrameRenderer, Rgb, Scene, ScreenTriangle};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: Rgb,
}

const EMPTY: Cell = Cell {
    character: ' ',
    color: Rgb(0),
};

/// ASCII renderer that converts the scene to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![EMPTY; size],
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(EMPTY);
    }

    /// Character at a cell, `' '` where nothing was drawn
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x].character)
    }

    /// Number of cells covered by geometry
    pub fn covered(&self) -> usize {
        self.cells.iter().filter(|c| c.character != ' ').count()
    }

    pub fn rasterize(&mut self, triangle: &ScreenTriangle) {
        let [v0, v1, v2] = triangle.points;

        let char_index = (triangle.brightness * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
        let cell = Cell {
            character: LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)],
            color: triangle.color.scaled(0.35 + 0.65 * triangle.brightness),
        };

        // Bounding box, clipped to screen bounds
        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(0.0) as usize;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil().min(self.width as f32 - 1.0);
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(0.0) as usize;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil().min(self.height as f32 - 1.0);
        if max_x < 0.0 || max_y < 0.0 {
            return;
        }
        let (max_x, max_y) = (max_x as usize, max_y as usize);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                let Some((w0, w1, w2)) = barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                let idx = y * self.width + x;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.cells[idx] = cell;
                }
            }
        }
    }

    /// Write the frame, one row per terminal line
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            let mut current = None;
            for cell in &self.cells[y * self.width..(y + 1) * self.width] {
                if current != Some(cell.color) {
                    let c = cell.color;
                    writer.queue(SetForegroundColor(Color::Rgb {
                        r: c.r(),
                        g: c.g(),
                        b: c.b(),
                    }))?;
                    current = Some(c);
                }
                writer.queue(Print(cell.character))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl FrameRenderer for AsciiRenderer {
    type Error = Infallible;

    fn resize(&mut self, width: u32, height: u32) {
        // The camera gets a doubled height for cell aspect; the buffer does not
        let rows = (height / 2) as usize;
        if (width as usize, rows) != (self.width, self.height) {
            *self = Self::new(width as usize, rows);
        }
    }

    fn render(&mut self, scene: &Scene) -> Result<(), Infallible> {
        self.clear();
        for triangle in scene.project(self.width as u32, self.height as u32) {
            self.rasterize(&triangle);
        }
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
