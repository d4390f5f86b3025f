//! Pages: bounded, ordered collections of widget handles.

use heapless::Vec;

use super::widget::WidgetId;
use crate::config::MAX_WIDGETS_PER_PAGE;
use crate::error::UiError;

/// Handle to a page registered in the UI core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PageId(pub(crate) u8);

impl PageId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, Default)]
pub struct Page {
    widgets: Vec<WidgetId, MAX_WIDGETS_PER_PAGE>,
}

impl Page {
    pub const fn new() -> Self {
        Self { widgets: Vec::new() }
    }

    /// Widgets in insertion (draw) order.
    pub fn widgets(&self) -> &[WidgetId] {
        &self.widgets
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.widgets.is_full()
    }

    pub fn contains(&self, widget: WidgetId) -> bool {
        self.widgets.contains(&widget)
    }

    pub(crate) fn push(&mut self, widget: WidgetId) -> Result<(), UiError> {
        self.widgets
            .push(widget)
            .map_err(|_| UiError::CapacityExceeded)
    }
}
