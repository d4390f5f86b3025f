//! Widgets: the drawable, updatable building blocks of a page.
//!
//! Every widget is a position plus a [`Payload`]. Drawing and updating
//! dispatch on the payload variant; the UI core never needs to know which
//! concrete widget it is holding.

use core::fmt::Write;

use embedded_graphics::prelude::Point;
use heapless::String;

use super::canvas::Canvas;
use super::menu::{MenuCallback, MenuInput, MenuItem, MenuList};
use crate::config::{
    ADJUST_FRAME_HEIGHT, ADJUST_FRAME_WIDTH, ADJUST_MARKER_MAX_X, ADJUST_MARKER_MIN_X, ANALOG_MAX,
    MAX_TEXT_CHARS, MONITOR_BAR_HEIGHT, MONITOR_BAR_WIDTH,
};
use crate::error::UiError;

/// Bounded text storage for labels.
pub type Label = String<MAX_TEXT_CHARS>;

/// Copy `text` into a [`Label`], dropping whatever does not fit.
pub fn bounded_label(text: &str) -> Label {
    let mut label = Label::new();
    for c in text.chars() {
        if label.push(c).is_err() {
            break;
        }
    }
    label
}

/// Linear rescale of `value` in `0..=ANALOG_MAX` onto `out_min..=out_max`.
/// Values above the analog range are clamped.
pub fn rescale(value: u16, out_min: i32, out_max: i32) -> i32 {
    let value = i32::from(value.min(ANALOG_MAX));
    out_min + value * (out_max - out_min) / i32::from(ANALOG_MAX)
}

/// Handle to a widget stored in the UI core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WidgetId(pub(crate) u8);

impl WidgetId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WidgetKind {
    Text,
    /// Progress bar showing one analog value.
    AnalogMonitor,
    /// Two markers on a shared scale, e.g. low/high endpoints.
    AnalogAdjustment,
    MenuItem,
    MenuList,
}

/// The two values shown by an analog adjustment widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Adjustment {
    pub first: u16,
    pub second: u16,
}

impl Adjustment {
    pub const fn new(first: u16, second: u16) -> Self {
        Self { first, second }
    }
}

/// Value carried by an update call. Which variant a widget accepts
/// depends on its kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetValue<'a> {
    /// Text widgets and menu item labels.
    Text(&'a str),
    /// Analog monitors.
    Analog(u16),
    /// Analog adjustments.
    Adjustment(Adjustment),
    /// Menu lists.
    Menu(MenuInput),
}

/// Parameters used to initialise a widget in `add_component`.
pub struct ComponentData<'a, A> {
    pub at: Point,
    pub label: Option<&'a str>,
    pub callback: Option<MenuCallback<A>>,
}

impl<'a, A> ComponentData<'a, A> {
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            at: Point::new(x, y),
            label: None,
            callback: None,
        }
    }

    pub fn label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn callback(mut self, callback: MenuCallback<A>) -> Self {
        self.callback = Some(callback);
        self
    }
}

/// Type-specific widget state.
#[derive(Clone, Debug)]
pub enum Payload<A> {
    Text(Label),
    AnalogMonitor(u16),
    AnalogAdjustment(Adjustment),
    MenuItem(MenuItem<A>),
    MenuList(MenuList),
}

#[derive(Clone, Debug)]
pub struct Widget<A> {
    position: Point,
    pub(crate) payload: Payload<A>,
}

impl<A> Widget<A> {
    pub(crate) fn from_data(kind: WidgetKind, data: &ComponentData<'_, A>) -> Self {
        let label = bounded_label(data.label.unwrap_or(""));
        let payload = match kind {
            WidgetKind::Text => Payload::Text(label),
            WidgetKind::AnalogMonitor => Payload::AnalogMonitor(0),
            WidgetKind::AnalogAdjustment => Payload::AnalogAdjustment(Adjustment::default()),
            WidgetKind::MenuItem => Payload::MenuItem(MenuItem::new(label, data.callback)),
            WidgetKind::MenuList => Payload::MenuList(MenuList::new()),
        };
        Self {
            position: data.at,
            payload,
        }
    }

    pub fn kind(&self) -> WidgetKind {
        match self.payload {
            Payload::Text(_) => WidgetKind::Text,
            Payload::AnalogMonitor(_) => WidgetKind::AnalogMonitor,
            Payload::AnalogAdjustment(_) => WidgetKind::AnalogAdjustment,
            Payload::MenuItem(_) => WidgetKind::MenuItem,
            Payload::MenuList(_) => WidgetKind::MenuList,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Text of a text widget or label of a menu item.
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text(text) => Some(text.as_str()),
            Payload::MenuItem(item) => Some(item.label()),
            _ => None,
        }
    }

    pub fn analog(&self) -> Option<u16> {
        match self.payload {
            Payload::AnalogMonitor(value) => Some(value),
            _ => None,
        }
    }

    pub fn adjustment(&self) -> Option<Adjustment> {
        match self.payload {
            Payload::AnalogAdjustment(adjustment) => Some(adjustment),
            _ => None,
        }
    }

    pub fn menu_item(&self) -> Option<&MenuItem<A>> {
        match &self.payload {
            Payload::MenuItem(item) => Some(item),
            _ => None,
        }
    }

    pub fn menu_list(&self) -> Option<&MenuList> {
        match &self.payload {
            Payload::MenuList(list) => Some(list),
            _ => None,
        }
    }

    /// Apply a value update. Menu list navigation needs access to the
    /// item widgets and is handled by the UI core instead.
    pub(crate) fn update(&mut self, value: &WidgetValue<'_>) -> Result<(), UiError> {
        match (&mut self.payload, value) {
            (Payload::Text(text), WidgetValue::Text(new)) => {
                *text = bounded_label(new);
            }
            (Payload::MenuItem(item), WidgetValue::Text(new)) => {
                item.label = bounded_label(new);
            }
            (Payload::AnalogMonitor(current), WidgetValue::Analog(new)) => {
                *current = (*new).min(ANALOG_MAX);
            }
            (Payload::AnalogAdjustment(current), WidgetValue::Adjustment(new)) => {
                *current = Adjustment::new(new.first.min(ANALOG_MAX), new.second.min(ANALOG_MAX));
            }
            _ => return Err(UiError::ValueMismatch),
        }
        Ok(())
    }

    /// Render the widget's own payload. A menu list has no chrome of its
    /// own; its items are drawn through their own widgets.
    pub(crate) fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let Point { x, y } = self.position;
        match &self.payload {
            Payload::Text(text) => canvas.draw_text(x, y, text),
            Payload::AnalogMonitor(value) => {
                let fill = rescale(*value, 0, MONITOR_BAR_WIDTH as i32) as u32;
                canvas.draw_frame(x, y, MONITOR_BAR_WIDTH, MONITOR_BAR_HEIGHT);
                canvas.draw_box(x, y, fill, MONITOR_BAR_HEIGHT);
            }
            Payload::AnalogAdjustment(adjustment) => draw_adjustment(canvas, x, y, adjustment),
            Payload::MenuItem(item) => {
                canvas.draw_text(x, y, item.label());
                if item.selected {
                    canvas.draw_circle(x - 3, y - 2, 1);
                }
            }
            Payload::MenuList(_) => {}
        }
    }
}

fn draw_adjustment<C: Canvas + ?Sized>(canvas: &mut C, x: i32, y: i32, adjustment: &Adjustment) {
    let x1 = rescale(adjustment.first, ADJUST_MARKER_MIN_X, ADJUST_MARKER_MAX_X);
    let x2 = rescale(adjustment.second, ADJUST_MARKER_MIN_X, ADJUST_MARKER_MAX_X);

    canvas.draw_frame(x, y, ADJUST_FRAME_WIDTH, ADJUST_FRAME_HEIGHT);
    canvas.draw_line(x1, y - 3, x1, y + 16);
    canvas.draw_line(x2, y - 3, x2, y + 16);

    // Numbers near the right edge are shifted left so they stay on screen.
    let mut number: String<6> = String::new();
    let _ = write!(number, "{}", adjustment.first);
    let label_x = if adjustment.first > 950 { x1 - 16 } else { x1 };
    canvas.draw_text(label_x, y + 20, &number);

    number.clear();
    let _ = write!(number, "{}", adjustment.second);
    let label_x = if adjustment.second > 950 { x2 - 16 } else { x2 };
    canvas.draw_text(label_x, y - 5, &number);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::canvas::recording::{DrawOp, RecordingCanvas};

    fn widget(kind: WidgetKind) -> Widget<()> {
        Widget::from_data(kind, &ComponentData::at(18, 15))
    }

    #[test]
    fn text_update_truncates_long_strings() {
        let mut w = widget(WidgetKind::Text);
        w.update(&WidgetValue::Text("ConnectionLost")).unwrap();
        assert_eq!(w.text(), Some("Connection"));
        assert_eq!(w.text().unwrap().len(), MAX_TEXT_CHARS);
    }

    #[test]
    fn bounded_label_keeps_short_strings() {
        assert_eq!(bounded_label("Trim").as_str(), "Trim");
        assert_eq!(bounded_label("").as_str(), "");
    }

    #[test]
    fn analog_update_clamps_to_range() {
        let mut w = widget(WidgetKind::AnalogMonitor);
        w.update(&WidgetValue::Analog(600)).unwrap();
        assert_eq!(w.analog(), Some(600));
        w.update(&WidgetValue::Analog(4000)).unwrap();
        assert_eq!(w.analog(), Some(ANALOG_MAX));
    }

    #[test]
    fn adjustment_update_sets_both_values_at_once() {
        let mut w = widget(WidgetKind::AnalogAdjustment);
        w.update(&WidgetValue::Adjustment(Adjustment::new(200, 800)))
            .unwrap();
        assert_eq!(w.adjustment(), Some(Adjustment::new(200, 800)));
    }

    #[test]
    fn mismatched_value_is_refused_and_ignored() {
        let mut w = widget(WidgetKind::AnalogMonitor);
        w.update(&WidgetValue::Analog(10)).unwrap();
        assert_eq!(
            w.update(&WidgetValue::Text("oops")),
            Err(UiError::ValueMismatch)
        );
        assert_eq!(w.analog(), Some(10));

        let mut list = widget(WidgetKind::MenuList);
        assert_eq!(
            list.update(&WidgetValue::Menu(MenuInput::next())),
            Err(UiError::ValueMismatch)
        );
    }

    #[test]
    fn menu_item_text_update_relabels() {
        let mut w = widget(WidgetKind::MenuItem);
        w.update(&WidgetValue::Text("LX")).unwrap();
        assert_eq!(w.menu_item().map(|i| i.label()), Some("LX"));
        assert_eq!(w.kind(), WidgetKind::MenuItem);
    }

    #[test]
    fn rescale_maps_full_range() {
        assert_eq!(rescale(0, 0, 108), 0);
        assert_eq!(rescale(ANALOG_MAX, 0, 108), 108);
        assert_eq!(rescale(512, 0, 108), 54);
        assert_eq!(rescale(0, 3, 125), 3);
        assert_eq!(rescale(ANALOG_MAX, 3, 125), 125);
    }

    #[test]
    fn analog_monitor_fill_tracks_value() {
        let mut w = widget(WidgetKind::AnalogMonitor);
        w.update(&WidgetValue::Analog(ANALOG_MAX)).unwrap();
        let mut canvas = RecordingCanvas::default();
        w.draw(&mut canvas);
        assert_eq!(
            canvas.ops,
            [
                DrawOp::Frame {
                    x: 18,
                    y: 15,
                    width: MONITOR_BAR_WIDTH,
                    height: MONITOR_BAR_HEIGHT
                },
                DrawOp::Box {
                    x: 18,
                    y: 15,
                    width: MONITOR_BAR_WIDTH,
                    height: MONITOR_BAR_HEIGHT
                },
            ]
        );
    }

    #[test]
    fn adjustment_draws_two_markers_and_values() {
        let mut w = widget(WidgetKind::AnalogAdjustment);
        w.update(&WidgetValue::Adjustment(Adjustment::new(0, ANALOG_MAX)))
            .unwrap();
        let mut canvas = RecordingCanvas::default();
        w.draw(&mut canvas);

        let lines: std::vec::Vec<_> = canvas
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Line { .. }))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(canvas.texts(), ["0", "1023"]);
    }

    #[test]
    fn selected_menu_item_draws_marker() {
        let mut w = widget(WidgetKind::MenuItem);
        let mut canvas = RecordingCanvas::default();
        w.draw(&mut canvas);
        assert_eq!(canvas.ops.len(), 1);

        if let Payload::MenuItem(item) = &mut w.payload {
            item.selected = true;
        }
        canvas.clear();
        w.draw(&mut canvas);
        assert!(canvas
            .ops
            .contains(&DrawOp::Circle { cx: 15, cy: 13, radius: 1 }));
    }
}
