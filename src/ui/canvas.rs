//! Drawing surface abstraction.
//!
//! Widgets never talk to the OLED driver directly. They draw through the
//! [`Canvas`] trait, which exposes the handful of primitives the UI needs
//! (frames, filled boxes, lines, text, circles) plus a begin/present pair
//! wrapped around every full draw pass by [`Frame`].
//!
//! [`GraphicsCanvas`] implements the trait for any `embedded-graphics`
//! binary-colour target that can also clear and flush its frame buffer,
//! such as the buffered SSD1306 driver.

use core::ops::{Deref, DerefMut};

use embedded_graphics::mono_font::ascii::FONT_4X6;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;

/// Primitive drawing capability shared by all widgets.
///
/// Coordinates are in pixels with the origin at the top-left corner.
/// Text is drawn with `(x, y)` on the baseline of the first glyph.
pub trait Canvas {
    /// Start a new frame (clears the back buffer).
    fn begin_frame(&mut self);

    /// Push the finished frame to the panel.
    fn present(&mut self);

    /// Outline of a rectangle.
    fn draw_frame(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Filled rectangle.
    fn draw_box(&mut self, x: i32, y: i32, width: u32, height: u32);

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32);

    fn draw_text(&mut self, x: i32, y: i32, text: &str);

    /// Circle outline centred on `(cx, cy)`.
    fn draw_circle(&mut self, cx: i32, cy: i32, radius: u32);
}

/// Scoped frame acquisition.
///
/// Calls [`Canvas::begin_frame`] on creation and [`Canvas::present`] when
/// dropped, so the presentation step runs on every exit path of a draw
/// pass.
pub struct Frame<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
}

impl<'a, C: Canvas + ?Sized> Frame<'a, C> {
    pub fn begin(canvas: &'a mut C) -> Self {
        canvas.begin_frame();
        Self { canvas }
    }
}

impl<C: Canvas + ?Sized> Deref for Frame<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> DerefMut for Frame<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> Drop for Frame<'_, C> {
    fn drop(&mut self) {
        self.canvas.present();
    }
}

/// Frame buffer control for a buffered display driver.
pub trait FrameBuffer {
    /// Clear the off-screen buffer.
    fn clear_frame(&mut self);

    /// Transfer the off-screen buffer to the panel.
    fn flush_frame(&mut self);
}

/// [`Canvas`] adapter for `embedded-graphics` binary-colour targets.
///
/// Draw errors are ignored: a failed I²C transfer only costs one frame,
/// the next draw pass repaints everything.
pub struct GraphicsCanvas<D> {
    target: D,
}

impl<D> GraphicsCanvas<D>
where
    D: DrawTarget<Color = BinaryColor> + FrameBuffer,
{
    pub fn new(target: D) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_4X6)
        .text_color(BinaryColor::On)
        .build()
}

impl<D> Canvas for GraphicsCanvas<D>
where
    D: DrawTarget<Color = BinaryColor> + FrameBuffer,
{
    fn begin_frame(&mut self) {
        self.target.clear_frame();
    }

    fn present(&mut self) {
        self.target.flush_frame();
    }

    fn draw_frame(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let _ = Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut self.target);
    }

    fn draw_box(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let _ = Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut self.target);
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let _ = Line::new(Point::new(x0, y0), Point::new(x1, y1))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut self.target);
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) {
        let _ = Text::new(text, Point::new(x, y), text_style()).draw(&mut self.target);
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, radius: u32) {
        let _ = Circle::with_center(Point::new(cx, cy), radius * 2 + 1)
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut self.target);
    }
}

/// Canvas that records every call, for host tests.
#[cfg(test)]
pub(crate) mod recording {
    use super::Canvas;
    use std::string::String;
    use std::vec::Vec;

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum DrawOp {
        Frame { x: i32, y: i32, width: u32, height: u32 },
        Box { x: i32, y: i32, width: u32, height: u32 },
        Line { x0: i32, y0: i32, x1: i32, y1: i32 },
        Text { x: i32, y: i32, text: String },
        Circle { cx: i32, cy: i32, radius: u32 },
    }

    #[derive(Default)]
    pub struct RecordingCanvas {
        pub ops: Vec<DrawOp>,
        pub begun: u32,
        pub presented: u32,
    }

    impl RecordingCanvas {
        pub fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub fn clear(&mut self) {
            self.ops.clear();
        }
    }

    impl Canvas for RecordingCanvas {
        fn begin_frame(&mut self) {
            self.begun += 1;
        }

        fn present(&mut self) {
            self.presented += 1;
        }

        fn draw_frame(&mut self, x: i32, y: i32, width: u32, height: u32) {
            self.ops.push(DrawOp::Frame { x, y, width, height });
        }

        fn draw_box(&mut self, x: i32, y: i32, width: u32, height: u32) {
            self.ops.push(DrawOp::Box { x, y, width, height });
        }

        fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
            self.ops.push(DrawOp::Line { x0, y0, x1, y1 });
        }

        fn draw_text(&mut self, x: i32, y: i32, text: &str) {
            self.ops.push(DrawOp::Text {
                x,
                y,
                text: String::from(text),
            });
        }

        fn draw_circle(&mut self, cx: i32, cy: i32, radius: u32) {
            self.ops.push(DrawOp::Circle { cx, cy, radius });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    /// 128x64 in-memory panel.
    struct TestPanel {
        pixels: [[bool; 128]; 64],
        cleared: u32,
        flushed: u32,
    }

    impl TestPanel {
        fn new() -> Self {
            Self {
                pixels: [[false; 128]; 64],
                cleared: 0,
                flushed: 0,
            }
        }

        fn lit(&self) -> usize {
            self.pixels.iter().flatten().filter(|p| **p).count()
        }
    }

    impl OriginDimensions for TestPanel {
        fn size(&self) -> Size {
            Size::new(128, 64)
        }
    }

    impl DrawTarget for TestPanel {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                if (0..128).contains(&point.x) && (0..64).contains(&point.y) {
                    self.pixels[point.y as usize][point.x as usize] = color.is_on();
                }
            }
            Ok(())
        }
    }

    impl FrameBuffer for TestPanel {
        fn clear_frame(&mut self) {
            self.pixels = [[false; 128]; 64];
            self.cleared += 1;
        }

        fn flush_frame(&mut self) {
            self.flushed += 1;
        }
    }

    #[test]
    fn frame_guard_presents_on_drop() {
        let mut canvas = GraphicsCanvas::new(TestPanel::new());
        {
            let mut frame = Frame::begin(&mut canvas);
            frame.draw_box(0, 0, 4, 4);
            assert_eq!(frame.target().flushed, 0);
        }
        assert_eq!(canvas.target().cleared, 1);
        assert_eq!(canvas.target().flushed, 1);
    }

    #[test]
    fn filled_box_lights_exact_area() {
        let mut canvas = GraphicsCanvas::new(TestPanel::new());
        canvas.draw_box(10, 10, 5, 3);
        assert_eq!(canvas.target().lit(), 15);
        assert!(canvas.target().pixels[10][10]);
        assert!(!canvas.target().pixels[13][10]);
    }

    #[test]
    fn frame_outline_leaves_interior_dark() {
        let mut canvas = GraphicsCanvas::new(TestPanel::new());
        canvas.draw_frame(0, 0, 4, 4);
        // 4x4 outline = 12 edge pixels.
        assert_eq!(canvas.target().lit(), 12);
        assert!(!canvas.target().pixels[1][1]);
    }

    #[test]
    fn begin_frame_clears_previous_content() {
        let mut canvas = GraphicsCanvas::new(TestPanel::new());
        canvas.draw_box(0, 0, 8, 8);
        canvas.begin_frame();
        assert_eq!(canvas.target().lit(), 0);
    }

    #[test]
    fn text_and_circle_draw_something() {
        let mut canvas = GraphicsCanvas::new(TestPanel::new());
        canvas.draw_text(0, 10, "LX");
        let after_text = canvas.target().lit();
        assert!(after_text > 0);
        canvas.draw_circle(60, 30, 1);
        assert!(canvas.target().lit() > after_text);
    }
}
