//! Application-wide constants and compile-time configuration.
//!
//! All capacities, timing parameters, screen geometry and hardware pin
//! assignments live here so they can be tuned in one place.

// UI framework capacities

/// Maximum number of pages the UI core can register.
pub const MAX_PAGES: usize = 4;

/// Maximum number of widgets a single page can hold.
pub const MAX_WIDGETS_PER_PAGE: usize = 16;

/// Total widget arena size across all pages.
pub const MAX_WIDGETS: usize = MAX_PAGES * MAX_WIDGETS_PER_PAGE;

/// Maximum number of items in one menu list.
pub const MAX_MENU_ITEMS: usize = 8;

/// Maximum number of characters stored by a text widget or menu label.
/// Longer strings are truncated.
pub const MAX_TEXT_CHARS: usize = 10;

// Analog range

/// Largest value a channel (10-bit ADC) can report.
pub const ANALOG_MAX: u16 = 1023;

/// Neutral stick position.
pub const ANALOG_CENTER: u16 = 512;

// Channels

/// Number of analog channels shown and transmitted:
/// left stick X/Y, right stick X/Y, left pot, right pot.
pub const N_CHANNELS: usize = 6;

/// Short display names, in channel order.
pub const CHANNEL_NAMES: [&str; N_CHANNELS] = ["LX", "LY", "RX", "RY", "PL", "PR"];

// Input timing

/// How long a button must stay active before a hold event fires (ms).
pub const HOLD_THRESHOLD_MS: u64 = 1500;

/// Main loop period (ms). Input sampling, UI update and radio send all
/// run once per period.
pub const LOOP_PERIOD_MS: u64 = 20;

/// Blink period of the "No comm!" indicator (ms).
pub const NO_COMM_BLINK_MS: u64 = 1000;

// OLED geometry (SSD1306 128x64)

pub const SCREEN_WIDTH: i32 = 128;
pub const SCREEN_HEIGHT: i32 = 64;

/// Pixel width of a channel bar on the monitoring page.
pub const MONITOR_BAR_WIDTH: u32 = 108;
/// Pixel height of a channel bar.
pub const MONITOR_BAR_HEIGHT: u32 = 6;

/// Outline of the two-point adjustment widget.
pub const ADJUST_FRAME_WIDTH: u32 = 122;
pub const ADJUST_FRAME_HEIGHT: u32 = 13;
/// Leftmost and rightmost marker x coordinates.
pub const ADJUST_MARKER_MIN_X: i32 = 3;
pub const ADJUST_MARKER_MAX_X: i32 = 125;

// GPIO pin assignments (nRF52840 board)
//
// Logical names only; the concrete `embassy_nrf::peripherals::*` pins are
// selected in `main.rs`.
//
//   Left stick X/Y   → P0.02 / P0.03 (AIN0 / AIN1)
//   Right stick X/Y  → P0.04 / P0.05 (AIN2 / AIN3)
//   Left/right pot   → P0.28 / P0.29 (AIN4 / AIN5)
//   Adjust wheel     → P0.30 (AIN6)
//   Button LEFT      → P0.11
//   Button RIGHT     → P0.12
//   Button SELECT    → P0.24
//   I²C SDA / SCL    → P0.26 / P0.27

// Calibration storage

/// Flash page index where calibration storage starts (4 KB per page).
pub const STORAGE_FLASH_PAGE_START: u32 = 240;

/// Number of flash pages reserved for calibration storage.
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 2;

// Buttons

/// Raw level of a pressed navigation button (switches pull to ground).
pub const BUTTON_ACTIVE_LEVEL: bool = false;
