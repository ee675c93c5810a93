//! Character-cell renderer for running the demo in a terminal

use std::io::Write;

use scene_engine::foundation::math::Vec2;
use scene_engine::render::{DrawCommand, Frame, RenderError, Renderer};

/// Pixels covered by one character cell
const CELL: (f32, f32) = (8.0, 16.0);

/// Rasterizes frames into a character grid and writes every `every`th one
pub struct AsciiRenderer<W: Write> {
    out: W,
    every: u64,
    presented: u64,
    cols: usize,
    rows: usize,
}

impl<W: Write> AsciiRenderer<W> {
    /// Renderer writing to `out`
    pub fn new(out: W, width: u32, height: u32, every: u64) -> Self {
        let (cols, rows) = Self::grid(width, height);
        Self {
            out,
            every: every.max(1),
            presented: 0,
            cols,
            rows,
        }
    }

    /// Frames presented so far
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// The writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn grid(width: u32, height: u32) -> (usize, usize) {
        (
            ((width as f32 / CELL.0) as usize).max(1),
            ((height as f32 / CELL.1) as usize).max(1),
        )
    }

    /// Rasterize `frame` into rows of text
    pub fn rasterize(&self, frame: &Frame) -> Vec<String> {
        let mut grid = vec![vec![' '; self.cols]; self.rows];
        for item in frame.paint_order() {
            match &item.command {
                DrawCommand::Clear(_) => {
                    for row in &mut grid {
                        row.fill(' ');
                    }
                }
                DrawCommand::Rect { rect, filled, .. } => {
                    let (c0, r0) = self.cell(rect.origin);
                    let (c1, r1) = self.cell(rect.origin + rect.size);
                    for r in r0..=r1.min(self.rows - 1) {
                        for c in c0..=c1.min(self.cols - 1) {
                            let edge = r == r0 || r == r1 || c == c0 || c == c1;
                            if *filled {
                                grid[r][c] = '=';
                            } else if edge {
                                grid[r][c] = if r == r0 || r == r1 { '-' } else { '|' };
                            }
                        }
                    }
                }
                DrawCommand::Line { from, to, .. } => {
                    let steps = ((*to - *from).norm() / CELL.0).ceil().max(1.0) as usize;
                    for i in 0..=steps {
                        let point = *from + (*to - *from) * (i as f32 / steps as f32);
                        self.plot(&mut grid, point, '.');
                    }
                }
                DrawCommand::Circle { center, .. } => self.plot(&mut grid, *center, 'o'),
                DrawCommand::Text { position, text, .. } => {
                    let (c0, r) = self.cell(*position);
                    for (i, ch) in text.chars().enumerate() {
                        if let Some(cell) = grid.get_mut(r).and_then(|row| row.get_mut(c0 + i)) {
                            *cell = ch;
                        }
                    }
                }
                DrawCommand::Sprite { position, .. } => self.plot(&mut grid, *position, '#'),
            }
        }
        grid.into_iter().map(|row| row.into_iter().collect()).collect()
    }

    fn cell(&self, point: Vec2) -> (usize, usize) {
        let col = (point.x / CELL.0).max(0.0) as usize;
        let row = (point.y / CELL.1).max(0.0) as usize;
        (col.min(self.cols - 1), row.min(self.rows - 1))
    }

    fn plot(&self, grid: &mut [Vec<char>], point: Vec2, ch: char) {
        let (col, row) = self.cell(point);
        grid[row][col] = ch;
    }

    fn write_frame(&mut self, frame: &Frame) -> std::io::Result<()> {
        let rows = self.rasterize(frame);
        writeln!(self.out, "+{}+", "-".repeat(self.cols))?;
        for row in rows {
            writeln!(self.out, "|{row}|")?;
        }
        writeln!(self.out, "+{}+ frame {}", "-".repeat(self.cols), self.presented)?;
        self.out.flush()
    }
}

impl<W: Write> Renderer for AsciiRenderer<W> {
    fn present(&mut self, frame: &Frame) -> Result<(), RenderError> {
        if self.presented % self.every == 0 {
            self.write_frame(frame)
                .map_err(|e| RenderError::Backend(e.to_string()))?;
        }
        self.presented += 1;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        let (cols, rows) = Self::grid(width, height);
        self.cols = cols;
        self.rows = rows;
        log::debug!("Terminal grid is now {}x{}", cols, rows);
    }
}
