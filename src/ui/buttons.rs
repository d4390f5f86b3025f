//! GPIO navigation buttons.
//!
//! Three physical buttons (active-low with internal pull-up):
//!   - LEFT   - previous menu entry; hold to go back to monitoring
//!   - RIGHT  - next menu entry
//!   - SELECT - activate / confirm
//!
//! Levels are polled once per main-loop cycle. Edge and hold detection
//! happen in [`InputProcessor`](super::input_logic::InputProcessor), so no
//! per-button task or debounce timer is needed here: the loop period
//! already spaces the samples.

use embassy_nrf::gpio::{AnyPin, Input, Pull};

use super::input_logic::RawInputs;

pub struct Buttons<'d> {
    left: Input<'d>,
    right: Input<'d>,
    select: Input<'d>,
}

impl<'d> Buttons<'d> {
    pub fn new(left: AnyPin, right: AnyPin, select: AnyPin) -> Self {
        Self {
            left: Input::new(left, Pull::Up),
            right: Input::new(right, Pull::Up),
            select: Input::new(select, Pull::Up),
        }
    }

    /// Raw levels of all buttons plus the wheel reading.
    pub fn sample(&self, wheel: u16) -> RawInputs {
        RawInputs {
            left: self.left.is_high(),
            right: self.right.is_high(),
            select: self.select.is_high(),
            wheel,
        }
    }
}
