//! Menu list selection state machine.
//!
//! A [`MenuList`] keeps the handles of its [`MenuItem`] widgets and a
//! selection cursor. Each update pass applies at most one navigation event,
//! chosen by priority `next > previous > activate`; the UI core then
//! rewrites the item flags so exactly one item is selected.

use heapless::Vec;

use super::widget::{Label, WidgetId};
use crate::config::MAX_MENU_ITEMS;
use crate::error::UiError;

/// Callback attached to a menu item. Receives the item's index in its
/// list and returns the application action to run.
pub type MenuCallback<A> = fn(u8) -> A;

/// Navigation signals for one update pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuInput {
    pub next: bool,
    pub previous: bool,
    pub activate: bool,
}

impl MenuInput {
    pub const NONE: Self = Self {
        next: false,
        previous: false,
        activate: false,
    };

    pub const fn next() -> Self {
        Self {
            next: true,
            ..Self::NONE
        }
    }

    pub const fn previous() -> Self {
        Self {
            previous: true,
            ..Self::NONE
        }
    }

    pub const fn activate() -> Self {
        Self {
            activate: true,
            ..Self::NONE
        }
    }
}

/// One entry of a menu list.
#[derive(Clone, Debug)]
pub struct MenuItem<A> {
    pub(crate) label: Label,
    pub(crate) selected: bool,
    pub(crate) clicked: bool,
    pub(crate) callback: Option<MenuCallback<A>>,
}

impl<A> MenuItem<A> {
    pub fn new(label: Label, callback: Option<MenuCallback<A>>) -> Self {
        Self {
            label,
            selected: false,
            clicked: false,
            callback,
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// True only during the update pass in which the item was activated.
    pub fn is_clicked(&self) -> bool {
        self.clicked
    }
}

/// Ordered, single-selection list of menu items.
#[derive(Clone, Debug, Default)]
pub struct MenuList {
    items: Vec<WidgetId, MAX_MENU_ITEMS>,
    selected: usize,
}

impl MenuList {
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn items(&self) -> &[WidgetId] {
        &self.items
    }

    pub(crate) fn has_room(&self) -> bool {
        !self.items.is_full()
    }

    pub(crate) fn push(&mut self, item: WidgetId) -> Result<(), UiError> {
        self.items.push(item).map_err(|_| UiError::CapacityExceeded)
    }

    /// Apply one navigation step.
    ///
    /// Returns the index of the activated item, if the step was an
    /// activation. An empty list ignores every signal.
    pub fn step(&mut self, input: MenuInput) -> Option<usize> {
        let count = self.items.len();
        if count == 0 {
            return None;
        }

        if input.next {
            self.selected = (self.selected + 1) % count;
            None
        } else if input.previous {
            self.selected = if self.selected == 0 {
                count - 1
            } else {
                self.selected - 1
            };
            None
        } else if input.activate {
            Some(self.selected)
        } else {
            None
        }
    }
}
