//! rc-remote - firmware library for a hand-held RC transmitter.
//!
//! Everything that does not touch hardware lives here and is tested on
//! the host: the UI framework, button processing, navigation, channel
//! calibration and the radio payload.
//!
//! Usage: `cargo test` (host) or `cargo build --release --features embedded
//! --target thumbv7em-none-eabihf` (nRF52840 firmware).
//!
//! The embedded binary (`src/main.rs`) links this library and adds the
//! hardware glue enabled by the `embedded` feature.

#![cfg_attr(not(test), no_std)]

// ═══════════════════════════════════════════════════════════════════════════
// Pure logic (host + embedded)
// ═══════════════════════════════════════════════════════════════════════════

pub mod calibration;
pub mod config;
pub mod error;
pub mod payload;
pub mod ui;

pub use error::{Error, UiError};

// ═══════════════════════════════════════════════════════════════════════════
// Hardware glue (embedded only)
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(feature = "embedded")]
pub mod storage;

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests - whole UI rendered through embedded-graphics
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use embedded_graphics::pixelcolor::BinaryColor;
    use embedded_graphics::prelude::*;

    use super::calibration::Calibration;
    use super::config::{CHANNEL_NAMES, SCREEN_HEIGHT, SCREEN_WIDTH};
    use super::ui::{ChannelInput, CommStatus, FrameBuffer, GraphicsCanvas, RawInputs, UiManager};

    const PIXELS: usize = (SCREEN_WIDTH * SCREEN_HEIGHT) as usize;

    /// 128x64 monochrome frame buffer with a flush counter.
    struct Panel {
        back: [bool; PIXELS],
        front: [bool; PIXELS],
        flushes: usize,
    }

    impl Panel {
        fn new() -> Self {
            Self {
                back: [false; PIXELS],
                front: [false; PIXELS],
                flushes: 0,
            }
        }

        fn lit(&self) -> usize {
            self.front.iter().filter(|p| **p).count()
        }
    }

    impl OriginDimensions for Panel {
        fn size(&self) -> Size {
            Size::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32)
        }
    }

    impl DrawTarget for Panel {
        type Color = BinaryColor;
        type Error = core::convert::Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                if (0..SCREEN_WIDTH).contains(&point.x) && (0..SCREEN_HEIGHT).contains(&point.y) {
                    self.back[(point.y * SCREEN_WIDTH + point.x) as usize] = color.is_on();
                }
            }
            Ok(())
        }
    }

    impl FrameBuffer for Panel {
        fn clear_frame(&mut self) {
            self.back = [false; PIXELS];
        }

        fn flush_frame(&mut self) {
            self.front = self.back;
            self.flushes += 1;
        }
    }

    fn channels(value: u16) -> [ChannelInput<'static>; 6] {
        core::array::from_fn(|i| ChannelInput {
            name: CHANNEL_NAMES[i],
            value,
        })
    }

    #[test]
    fn monitoring_page_reaches_the_panel() {
        let mut ui = UiManager::new(Calibration::default(), true).unwrap();
        let mut canvas = GraphicsCanvas::new(Panel::new());

        ui.update(&RawInputs::default(), &channels(0), CommStatus::default(), 0, &mut canvas)
            .unwrap();
        let empty_bars = canvas.target().lit();
        assert!(empty_bars > 0);
        assert_eq!(canvas.target().flushes, 1);

        ui.update(&RawInputs::default(), &channels(1023), CommStatus::default(), 20, &mut canvas)
            .unwrap();
        assert!(canvas.target().lit() > empty_bars);
        assert_eq!(canvas.target().flushes, 2);
    }

    #[test]
    fn each_cycle_starts_from_a_blank_frame() {
        let mut ui = UiManager::new(Calibration::default(), true).unwrap();
        let mut canvas = GraphicsCanvas::new(Panel::new());

        ui.update(&RawInputs::default(), &channels(1023), CommStatus::default(), 0, &mut canvas)
            .unwrap();
        let full = canvas.target().lit();
        ui.update(&RawInputs::default(), &channels(0), CommStatus::default(), 20, &mut canvas)
            .unwrap();
        assert!(canvas.target().lit() < full);
    }
}
