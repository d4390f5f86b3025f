//! User interface subsystem - widget framework, input handling and
//! navigation for the 128×64 OLED.
//!
//! ## Layers
//!
//! - **Canvas**: drawing primitives, implemented over `embedded-graphics`
//! - **Widgets / menus / pages**: the building blocks of a screen
//! - **Core** ([`UiCore`]): page registry, widget arena, update and draw
//!   dispatch for the active page
//! - **Input**: button edge/hold detection
//! - **Manager** ([`UiManager`]): the transmitter's pages and the
//!   trim/endpoint editing flow
//!
//! The `display` and `buttons` modules bind the UI to the SSD1306 and the
//! nRF52840 GPIOs and are only built for the firmware.

pub mod canvas;
pub mod context;
pub mod input_logic;
pub mod manager;
pub mod menu;
pub mod page;
pub mod widget;

#[cfg(feature = "embedded")]
pub mod buttons;
#[cfg(feature = "embedded")]
pub mod display;

pub use canvas::{Canvas, Frame, FrameBuffer, GraphicsCanvas};
pub use context::{Activation, UiCore};
pub use input_logic::{Button, ButtonState, InputEvents, InputProcessor, RawInputs};
pub use manager::{ChannelInput, CommStatus, EditMode, EditState, MenuAction, Screen, UiManager};
pub use menu::{MenuCallback, MenuInput, MenuItem, MenuList};
pub use page::{Page, PageId};
pub use widget::{Adjustment, ComponentData, Widget, WidgetId, WidgetKind, WidgetValue};
