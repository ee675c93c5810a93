//! Renderer collaborator interface and the frame target
//!
//! Drawable objects never talk to a graphics API. They append
//! [`DrawCommand`]s to a [`Frame`]; once every scene has drawn, the loop hands
//! the finished frame to a [`Renderer`] to present.

pub mod headless;

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Rect, Vec2};

pub use headless::RecordingRenderer;

/// Renderer errors
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// The output surface is gone (window closed, device lost)
    #[error("Render surface lost: {0}")]
    SurfaceLost(String),

    /// Backend failure
    #[error("Render backend error: {0}")]
    Backend(String),
}

/// Presents finished frames
pub trait Renderer {
    /// Display `frame`. Called once per rendered frame.
    fn present(&mut self, frame: &Frame) -> Result<(), RenderError>;

    /// The output surface changed size
    fn resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }
}

impl<T: Renderer + ?Sized> Renderer for Box<T> {
    fn present(&mut self, frame: &Frame) -> Result<(), RenderError> {
        (**self).present(frame)
    }

    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height);
    }
}

/// RGBA color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Color {
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque red
    pub const RED: Self = Self::rgb(220, 50, 47);
    /// Opaque green
    pub const GREEN: Self = Self::rgb(133, 153, 0);
    /// Opaque blue
    pub const BLUE: Self = Self::rgb(38, 139, 210);
    /// Opaque yellow
    pub const YELLOW: Self = Self::rgb(181, 137, 0);
    /// Fully transparent
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with alpha
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// One drawing instruction
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole target
    Clear(Color),
    /// Axis-aligned rectangle
    Rect {
        /// Bounds
        rect: Rect,
        /// Fill or outline color
        color: Color,
        /// Filled or outlined
        filled: bool,
    },
    /// Line segment
    Line {
        /// Start point
        from: Vec2,
        /// End point
        to: Vec2,
        /// Stroke color
        color: Color,
    },
    /// Filled circle
    Circle {
        /// Centre
        center: Vec2,
        /// Radius in pixels
        radius: f32,
        /// Fill color
        color: Color,
    },
    /// Text run anchored at its top-left corner
    Text {
        /// Anchor
        position: Vec2,
        /// Contents
        text: String,
        /// Glyph color
        color: Color,
        /// Glyph height in pixels
        size: f32,
    },
    /// Named image owned by the renderer's asset store
    Sprite {
        /// Asset name
        asset: String,
        /// Top-left corner
        position: Vec2,
        /// Uniform scale
        scale: f32,
    },
}

/// Draw command tagged with its layer and submission order
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    /// Layer; higher draws later
    pub z: i32,
    /// Submission order within the frame
    pub order: u32,
    /// The instruction
    pub command: DrawCommand,
}

/// Renderer-agnostic frame target
///
/// Commands are painted by ascending layer, ties broken by submission order.
/// The current layer is set by the dispatcher to each object's z-index before
/// its `render` call, so most objects only ever call [`push`](Self::push).
#[derive(Debug, Clone)]
pub struct Frame {
    width: u32,
    height: u32,
    clear_color: Color,
    layer: i32,
    next_order: u32,
    items: Vec<DrawItem>,
}

impl Frame {
    /// Create an empty frame of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            clear_color: Color::BLACK,
            layer: 0,
            next_order: 0,
            items: Vec::new(),
        }
    }

    /// Target width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Target height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Change the target size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Background color the renderer clears to
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// Set the background color
    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    /// Layer new commands are submitted to
    pub fn layer(&self) -> i32 {
        self.layer
    }

    /// Set the layer for subsequent [`push`](Self::push) calls
    pub fn set_layer(&mut self, z: i32) {
        self.layer = z;
    }

    /// Submit a command on the current layer
    pub fn push(&mut self, command: DrawCommand) {
        self.push_at(self.layer, command);
    }

    /// Submit a command on an explicit layer
    pub fn push_at(&mut self, z: i32, command: DrawCommand) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        self.items.push(DrawItem { z, order, command });
    }

    /// Filled rectangle
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.push(DrawCommand::Rect { rect, color, filled: true });
    }

    /// Text run
    pub fn text(&mut self, position: Vec2, text: impl Into<String>, color: Color, size: f32) {
        self.push(DrawCommand::Text {
            position,
            text: text.into(),
            color,
            size,
        });
    }

    /// Filled circle
    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.push(DrawCommand::Circle { center, radius, color });
    }

    /// Commands in submission order
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    /// Commands in paint order
    pub fn paint_order(&self) -> Vec<&DrawItem> {
        let mut items: Vec<&DrawItem> = self.items.iter().collect();
        items.sort_by_key(|item| (item.z, item.order));
        items
    }

    /// Number of submitted commands
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing has been submitted
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop all commands and reset the layer, keeping size and clear color
    pub fn reset(&mut self) {
        self.items.clear();
        self.layer = 0;
        self.next_order = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_order_sorts_by_layer_then_submission() {
        let mut frame = Frame::new(100, 100);
        frame.set_layer(5);
        frame.push(DrawCommand::Clear(Color::RED));
        frame.set_layer(-1);
        frame.push(DrawCommand::Clear(Color::GREEN));
        frame.push(DrawCommand::Clear(Color::BLUE));

        let colors: Vec<_> = frame
            .paint_order()
            .into_iter()
            .map(|item| match item.command {
                DrawCommand::Clear(color) => color,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(colors, vec![Color::GREEN, Color::BLUE, Color::RED]);
    }

    #[test]
    fn test_reset_keeps_size() {
        let mut frame = Frame::new(32, 16);
        frame.set_clear_color(Color::WHITE);
        frame.set_layer(3);
        frame.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::RED);
        frame.reset();

        assert!(frame.is_empty());
        assert_eq!(frame.layer(), 0);
        assert_eq!((frame.width(), frame.height()), (32, 16));
        assert_eq!(frame.clear_color(), Color::WHITE);
    }

    #[test]
    fn test_color_helpers() {
        assert_eq!(Color::WHITE.with_alpha(10).a, 10);
        assert_eq!(Color::default(), Color::BLACK);
    }
}
