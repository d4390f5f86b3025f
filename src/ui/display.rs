//! SSD1306 OLED display wrapper.

use defmt::warn;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

use super::canvas::{FrameBuffer, GraphicsCanvas};
use crate::error::Error;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Initialise the SSD1306, blank the panel and wrap it as a canvas.
pub fn init<I2C>(i2c: I2C) -> Result<GraphicsCanvas<Display<I2C>>, Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    display.init().map_err(|_| Error::Display)?;
    display.clear_buffer();
    display.flush().map_err(|_| Error::Display)?;
    Ok(GraphicsCanvas::new(display))
}

impl<I2C> FrameBuffer for Display<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn clear_frame(&mut self) {
        self.clear_buffer();
    }

    fn flush_frame(&mut self) {
        if self.flush().is_err() {
            warn!("Display: flush failed");
        }
    }
}
