//! Button edge and hold detection.
//!
//! Raw button levels are sampled once per main-loop cycle. Each
//! [`ButtonState`] turns the sampled level into at most one rising-edge
//! event per press and at most one hold event per press that stays active
//! for [`HOLD_THRESHOLD_MS`].

use crate::config::{ANALOG_MAX, HOLD_THRESHOLD_MS};

/// Physical navigation buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Move to the previous menu entry.
    Left,
    /// Move to the next menu entry.
    Right,
    /// Activate / confirm.
    Select,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::Left, Button::Right, Button::Select];

    const fn slot(self) -> usize {
        match self {
            Button::Left => 0,
            Button::Right => 1,
            Button::Select => 2,
        }
    }
}

/// True when the level changed this cycle and is now the active level.
pub fn rising_edge(previous: bool, current: bool, active_level: bool) -> bool {
    previous != current && current == active_level
}

/// Edge/hold tracker for one button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonState {
    active_level: bool,
    level: bool,
    previous: bool,
    rising: bool,
    hold: bool,
    hold_fired: bool,
    pressed_at_ms: Option<u64>,
}

impl ButtonState {
    /// A released button. `active_level` is the raw level of a pressed
    /// button (`false` for active-low switches with pull-ups).
    pub const fn new(active_level: bool) -> Self {
        Self {
            active_level,
            level: !active_level,
            previous: !active_level,
            rising: false,
            hold: false,
            hold_fired: false,
            pressed_at_ms: None,
        }
    }

    /// Feed the level sampled at `now_ms`.
    pub fn sample(&mut self, level: bool, now_ms: u64) {
        self.previous = self.level;
        self.level = level;
        self.rising = rising_edge(self.previous, self.level, self.active_level);
        self.hold = false;

        if !self.is_active() {
            self.pressed_at_ms = None;
            self.hold_fired = false;
            return;
        }

        if self.rising {
            self.pressed_at_ms = Some(now_ms);
            self.hold_fired = false;
        }

        if let Some(start) = self.pressed_at_ms {
            if !self.hold_fired && now_ms.saturating_sub(start) >= HOLD_THRESHOLD_MS {
                self.hold = true;
                self.hold_fired = true;
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.level == self.active_level
    }

    /// Pressed this cycle.
    pub fn rising_edge(&self) -> bool {
        self.rising
    }

    /// Held past the threshold this cycle.
    pub fn hold(&self) -> bool {
        self.hold
    }
}

/// Raw levels read from the hardware in one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawInputs {
    pub left: bool,
    pub right: bool,
    pub select: bool,
    /// Adjustment wheel position.
    pub wheel: u16,
}

impl RawInputs {
    fn level(&self, button: Button) -> bool {
        match button {
            Button::Left => self.left,
            Button::Right => self.right,
            Button::Select => self.select,
        }
    }
}

/// Events derived from one cycle of raw inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputEvents {
    pressed: [bool; 3],
    held: [bool; 3],
    /// Adjustment wheel, clamped to the analog range.
    pub wheel: u16,
}

impl InputEvents {
    pub fn pressed(&self, button: Button) -> bool {
        self.pressed[button.slot()]
    }

    pub fn held(&self, button: Button) -> bool {
        self.held[button.slot()]
    }
}

/// Edge/hold trackers for all navigation buttons.
#[derive(Clone, Debug)]
pub struct InputProcessor {
    buttons: [ButtonState; 3],
}

impl InputProcessor {
    pub const fn new(active_level: bool) -> Self {
        Self {
            buttons: [ButtonState::new(active_level); 3],
        }
    }

    pub fn button(&self, button: Button) -> &ButtonState {
        &self.buttons[button.slot()]
    }

    pub fn process(&mut self, raw: &RawInputs, now_ms: u64) -> InputEvents {
        let mut events = InputEvents {
            wheel: raw.wheel.min(ANALOG_MAX),
            ..InputEvents::default()
        };
        for button in Button::ALL {
            let state = &mut self.buttons[button.slot()];
            state.sample(raw.level(button), now_ms);
            events.pressed[button.slot()] = state.rising_edge();
            events.held[button.slot()] = state.hold();
        }
        events
    }
}
