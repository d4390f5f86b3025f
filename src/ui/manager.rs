//! Application UI: page composition, navigation and calibration editing.
//!
//! Three pages are built once at start-up:
//!
//! - **Monitoring**: one bar per channel, a channel menu and the link
//!   status line.
//! - **Options**: Trim / Endpoint / Invert for the selected channel.
//! - **Configuration**: a two-marker adjustment driven by the wheel.
//!
//! Each call to [`UiManager::update`] is one cycle: inputs are turned into
//! events, events into menu steps and edits, widgets are refreshed, the
//! active page is drawn, and only then is a requested page change
//! committed.

use core::fmt::Write;

use super::canvas::Canvas;
use super::context::{Activation, UiCore};
use super::input_logic::{Button, InputEvents, InputProcessor, RawInputs};
use super::menu::MenuInput;
use super::page::PageId;
use super::widget::{bounded_label, Adjustment, ComponentData, Label, WidgetId, WidgetKind, WidgetValue};
use crate::calibration::{Calibration, ChannelConfig};
use crate::config::{CHANNEL_NAMES, N_CHANNELS, NO_COMM_BLINK_MS};
use crate::error::UiError;

/// One analog channel as shown on the monitoring page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelInput<'a> {
    pub name: &'a str,
    pub value: u16,
}

/// Radio link status shown on the monitoring page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommStatus {
    pub connection_lost: bool,
    /// Duration of the last transmission (µs).
    pub last_tx_us: u32,
}

/// Actions produced by menu item callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuAction {
    SelectChannel(u8),
    Trim,
    Endpoint,
    Invert,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    Monitoring,
    Options,
    Configuration,
}

/// What the configuration page is editing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditMode {
    Trim,
    Endpoint,
}

/// Progress of a two-stage endpoint edit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditState {
    #[default]
    Idle,
    /// The low endpoint was captured; the next confirm sets the high one.
    AwaitSecondEndpoint { first: u16 },
}

const INVALID_LABEL: &str = "Invalid";
const NO_COMM_LABEL: &str = "No comm!";
const SLOW_TX_LABEL: &str = ">99s";
const MAX_SHOWN_TX_US: u32 = 100_000_000;

fn bar_y(channel: usize) -> i32 {
    channel as i32 * 7 + 15
}

fn trim_action(_: u8) -> MenuAction {
    MenuAction::Trim
}

fn endpoint_action(_: u8) -> MenuAction {
    MenuAction::Endpoint
}

fn invert_action(_: u8) -> MenuAction {
    MenuAction::Invert
}

struct MonitoringPage {
    page: PageId,
    comm: WidgetId,
    bars: [WidgetId; N_CHANNELS],
    menu: WidgetId,
    items: [WidgetId; N_CHANNELS],
}

impl MonitoringPage {
    fn compose(core: &mut UiCore<MenuAction>) -> Result<Self, UiError> {
        let page = core.new_page()?;
        let comm = core.add_component(page, WidgetKind::Text, ComponentData::at(4, 8))?;

        let mut bars = [WidgetId(0); N_CHANNELS];
        for (i, bar) in bars.iter_mut().enumerate() {
            *bar = core.add_component(
                page,
                WidgetKind::AnalogMonitor,
                ComponentData::at(18, bar_y(i)),
            )?;
        }

        let menu = core.add_component(page, WidgetKind::MenuList, ComponentData::at(0, 0))?;
        let mut items = [WidgetId(0); N_CHANNELS];
        for (i, item) in items.iter_mut().enumerate() {
            *item = core.add_component(
                page,
                WidgetKind::MenuItem,
                ComponentData::at(4, bar_y(i) + 6)
                    .label(CHANNEL_NAMES[i])
                    .callback(MenuAction::SelectChannel),
            )?;
        }

        Ok(Self {
            page,
            comm,
            bars,
            menu,
            items,
        })
    }
}

struct OptionsPage {
    page: PageId,
    title: WidgetId,
    menu: WidgetId,
}

impl OptionsPage {
    fn compose(core: &mut UiCore<MenuAction>) -> Result<Self, UiError> {
        let page = core.new_page()?;
        let title = core.add_component(page, WidgetKind::Text, ComponentData::at(4, 8))?;
        let menu = core.add_component(page, WidgetKind::MenuList, ComponentData::at(0, 0))?;

        let entries: [(&str, fn(u8) -> MenuAction); 3] = [
            ("Trim", trim_action),
            ("Endpoint", endpoint_action),
            ("Invert", invert_action),
        ];
        for (i, (label, action)) in entries.into_iter().enumerate() {
            core.add_component(
                page,
                WidgetKind::MenuItem,
                ComponentData::at(10, 24 + 12 * i as i32)
                    .label(label)
                    .callback(action),
            )?;
        }

        Ok(Self { page, title, menu })
    }
}

struct ConfigurationPage {
    page: PageId,
    channel: WidgetId,
    prompt: WidgetId,
    status: WidgetId,
    adjust: WidgetId,
}

impl ConfigurationPage {
    fn compose(core: &mut UiCore<MenuAction>) -> Result<Self, UiError> {
        let page = core.new_page()?;
        Ok(Self {
            page,
            channel: core.add_component(page, WidgetKind::Text, ComponentData::at(4, 8))?,
            prompt: core.add_component(page, WidgetKind::Text, ComponentData::at(40, 8))?,
            status: core.add_component(page, WidgetKind::Text, ComponentData::at(90, 8))?,
            adjust: core.add_component(
                page,
                WidgetKind::AnalogAdjustment,
                ComponentData::at(3, 30),
            )?,
        })
    }
}

pub struct UiManager {
    core: UiCore<MenuAction>,
    input: InputProcessor,
    calibration: Calibration,

    monitoring: MonitoringPage,
    options: OptionsPage,
    configuration: ConfigurationPage,

    screen: Screen,
    pending: Option<Screen>,

    channel: usize,
    mode: EditMode,
    edit: EditState,
    invalid: bool,
}

impl UiManager {
    /// Compose all pages. `button_active_level` is the raw level of a
    /// pressed button.
    ///
    /// Any composition failure is returned and the UI must not be used.
    pub fn new(calibration: Calibration, button_active_level: bool) -> Result<Self, UiError> {
        let mut core = UiCore::new();
        let monitoring = MonitoringPage::compose(&mut core)?;
        let options = OptionsPage::compose(&mut core)?;
        let configuration = ConfigurationPage::compose(&mut core)?;

        Ok(Self {
            core,
            input: InputProcessor::new(button_active_level),
            calibration,
            monitoring,
            options,
            configuration,
            screen: Screen::Monitoring,
            pending: None,
            channel: 0,
            mode: EditMode::Trim,
            edit: EditState::Idle,
            invalid: false,
        })
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Page change requested this cycle and not yet committed.
    pub fn pending_screen(&self) -> Option<Screen> {
        self.pending
    }

    pub fn page_id(&self, screen: Screen) -> PageId {
        match screen {
            Screen::Monitoring => self.monitoring.page,
            Screen::Options => self.options.page,
            Screen::Configuration => self.configuration.page,
        }
    }

    pub fn core(&self) -> &UiCore<MenuAction> {
        &self.core
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Whether calibration changed since the last call.
    pub fn take_config_changed(&mut self) -> bool {
        self.calibration.take_changed()
    }

    pub fn selected_channel(&self) -> usize {
        self.channel
    }

    pub fn edit_mode(&self) -> EditMode {
        self.mode
    }

    pub fn edit_state(&self) -> EditState {
        self.edit
    }

    pub fn is_showing_invalid(&self) -> bool {
        self.invalid
    }

    /// Run one UI cycle.
    pub fn update<C: Canvas + ?Sized>(
        &mut self,
        raw: &RawInputs,
        channels: &[ChannelInput<'_>],
        comm: CommStatus,
        now_ms: u64,
        canvas: &mut C,
    ) -> Result<(), UiError> {
        let events = self.input.process(raw, now_ms);

        if events.held(Button::Left) && self.screen != Screen::Monitoring {
            self.abandon_edit();
        }

        let menu_input = MenuInput {
            next: events.pressed(Button::Right),
            previous: events.pressed(Button::Left),
            activate: events.pressed(Button::Select),
        };
        for menu in [self.monitoring.menu, self.options.menu] {
            if let Some(activation) = self.core.update_component(menu, WidgetValue::Menu(menu_input))? {
                self.on_activation(activation)?;
            }
        }

        if self.screen == Screen::Configuration && events.pressed(Button::Select) {
            self.confirm(events.wheel)?;
        }

        self.refresh_widgets(&events, channels, comm, now_ms)?;
        self.core.draw(canvas);
        self.commit_page()
    }

    fn request(&mut self, screen: Screen) {
        self.pending = Some(screen);
    }

    fn commit_page(&mut self) -> Result<(), UiError> {
        if let Some(next) = self.pending.take() {
            self.core.change_page(self.page_id(next))?;
            self.screen = next;

            #[cfg(feature = "defmt")]
            defmt::debug!("UI: screen -> {}", next);
        }
        Ok(())
    }

    fn abandon_edit(&mut self) {
        self.edit = EditState::Idle;
        self.invalid = false;
        self.request(Screen::Monitoring);
    }

    fn channel_config(&self) -> ChannelConfig {
        self.calibration
            .channel(self.channel)
            .copied()
            .unwrap_or_default()
    }

    fn on_activation(&mut self, activation: Activation<MenuAction>) -> Result<(), UiError> {
        let Some(action) = activation.action else {
            return Ok(());
        };

        match action {
            MenuAction::SelectChannel(channel) => {
                self.channel = usize::from(channel).min(N_CHANNELS - 1);
                self.request(Screen::Options);
            }
            MenuAction::Trim | MenuAction::Endpoint => {
                self.mode = if action == MenuAction::Trim {
                    EditMode::Trim
                } else {
                    EditMode::Endpoint
                };
                self.edit = EditState::Idle;
                self.invalid = false;
                self.request(Screen::Configuration);
            }
            MenuAction::Invert => {
                let config = self.channel_config().toggled_invert();
                self.calibration.set(self.channel, config)?;
                self.request(Screen::Monitoring);
            }
        }
        Ok(())
    }

    /// Handle a confirm press on the configuration page.
    fn confirm(&mut self, wheel: u16) -> Result<(), UiError> {
        let config = self.channel_config();

        let edited = match (self.mode, self.edit) {
            (EditMode::Trim, _) => config.with_trim(wheel),
            (EditMode::Endpoint, EditState::Idle) => {
                self.edit = EditState::AwaitSecondEndpoint { first: wheel };
                self.invalid = false;
                return Ok(());
            }
            (EditMode::Endpoint, EditState::AwaitSecondEndpoint { first }) => {
                self.edit = EditState::Idle;
                config.with_endpoints(first, wheel)
            }
        };

        match edited {
            Ok(config) => {
                self.calibration.set(self.channel, config)?;
                self.invalid = false;
                self.request(Screen::Monitoring);

                #[cfg(feature = "defmt")]
                defmt::info!("UI: channel {} calibration {}", self.channel, config);
            }
            Err(UiError::InvalidConfiguration) => {
                self.invalid = true;

                #[cfg(feature = "defmt")]
                defmt::warn!("UI: rejected {} edit on channel {}", self.mode, self.channel);
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    fn refresh_widgets(
        &mut self,
        events: &InputEvents,
        channels: &[ChannelInput<'_>],
        comm: CommStatus,
        now_ms: u64,
    ) -> Result<(), UiError> {
        // Monitoring
        let status_line = comm_label(comm, now_ms);
        self.core
            .update_component(self.monitoring.comm, WidgetValue::Text(&status_line))?;
        let rows = self.monitoring.bars.iter().zip(&self.monitoring.items);
        for ((bar, item), channel) in rows.zip(channels) {
            self.core
                .update_component(*bar, WidgetValue::Analog(channel.value))?;
            self.core
                .update_component(*item, WidgetValue::Text(channel.name))?;
        }

        let name = channels
            .get(self.channel)
            .map_or(CHANNEL_NAMES[self.channel], |channel| channel.name);

        // Options
        self.core
            .update_component(self.options.title, WidgetValue::Text(name))?;

        // Configuration
        let config = self.channel_config();
        let wheel = events.wheel;
        let (prompt, adjustment) = match (self.mode, self.edit) {
            (EditMode::Trim, _) => ("Trim", Adjustment::new(wheel, config.trim)),
            (EditMode::Endpoint, EditState::Idle) => ("Low", Adjustment::new(wheel, config.high)),
            (EditMode::Endpoint, EditState::AwaitSecondEndpoint { first }) => {
                ("High", Adjustment::new(first, wheel))
            }
        };
        let status = if self.invalid { INVALID_LABEL } else { "" };

        let page = &self.configuration;
        let updates = [
            (page.channel, WidgetValue::Text(name)),
            (page.prompt, WidgetValue::Text(prompt)),
            (page.status, WidgetValue::Text(status)),
            (page.adjust, WidgetValue::Adjustment(adjustment)),
        ];
        for (id, value) in updates {
            self.core.update_component(id, value)?;
        }
        Ok(())
    }
}

/// Status line: the last transmission time in milliseconds, or a blinking
/// "No comm!" while the link is down.
///
/// "99999.99ms" is the widest value that fits a label; slower
/// transmissions show `SLOW_TX_LABEL`.
fn comm_label(comm: CommStatus, now_ms: u64) -> Label {
    if comm.connection_lost {
        let visible = (now_ms / NO_COMM_BLINK_MS) % 2 == 0;
        return bounded_label(if visible { NO_COMM_LABEL } else { "" });
    }
    if comm.last_tx_us >= MAX_SHOWN_TX_US {
        return bounded_label(SLOW_TX_LABEL);
    }

    let mut label = Label::new();
    let _ = write!(
        label,
        "{}.{:02}ms",
        comm.last_tx_us / 1000,
        (comm.last_tx_us % 1000) / 10
    );
    label
}
