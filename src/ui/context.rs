//! UI core: page registry, widget arena and per-cycle dispatch.
//!
//! The core owns every page and widget for the life of the program.
//! Widgets live in one fixed-capacity arena and are addressed by
//! [`WidgetId`]; pages hold ordered lists of those handles.
//!
//! Only the active page takes part in a cycle: updates aimed at widgets of
//! any other page are skipped, and [`UiCore::draw`] renders the active page
//! alone.

use heapless::Vec;

use super::canvas::{Canvas, Frame};
use super::menu::MenuInput;
use super::page::{Page, PageId};
use super::widget::{ComponentData, Payload, Widget, WidgetId, WidgetKind, WidgetValue};
use crate::config::{MAX_PAGES, MAX_WIDGETS};
use crate::error::UiError;

/// Result of activating a menu item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Activation<A> {
    /// The clicked menu item widget.
    pub item: WidgetId,
    /// Position of the item in its list.
    pub index: u8,
    /// Value returned by the item's callback, if it has one.
    pub action: Option<A>,
}

pub struct UiCore<A> {
    widgets: Vec<Widget<A>, MAX_WIDGETS>,
    pages: Vec<Page, MAX_PAGES>,
    active: Option<PageId>,
    error: Option<UiError>,
}

impl<A: Copy> Default for UiCore<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Copy> UiCore<A> {
    pub const fn new() -> Self {
        Self {
            widgets: Vec::new(),
            pages: Vec::new(),
            active: None,
            error: None,
        }
    }

    // Page handling

    /// Register a new empty page. The first page registered becomes the
    /// active page.
    pub fn new_page(&mut self) -> Result<PageId, UiError> {
        let id = PageId(self.pages.len() as u8);
        self.pages
            .push(Page::new())
            .map_err(|_| UiError::RegistryFull)?;

        if self.active.is_none() {
            self.active = Some(id);
        }
        Ok(id)
    }

    /// Make `target` the active page immediately.
    ///
    /// Clicks on the page being left are cleared, since its menus receive
    /// no further updates while it is hidden.
    pub fn change_page(&mut self, target: PageId) -> Result<(), UiError> {
        if target.index() >= self.pages.len() {
            return Err(UiError::UnknownPage);
        }
        if let Some(left) = self.active.filter(|id| *id != target) {
            self.clear_clicks(left);
        }
        self.active = Some(target);
        Ok(())
    }

    fn clear_clicks(&mut self, page: PageId) {
        for id in self.pages[page.index()].widgets() {
            if let Payload::MenuItem(item) = &mut self.widgets[id.index()].payload {
                item.clicked = false;
            }
        }
    }

    pub fn active_page(&self) -> Option<PageId> {
        self.active
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.get(id.index())
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget<A>> {
        self.widgets.get(id.index())
    }

    pub fn is_in_active_page(&self, id: WidgetId) -> bool {
        self.active
            .and_then(|page| self.page(page))
            .is_some_and(|page| page.contains(id))
    }

    // Error handling

    /// Outcome of the most recent `add_component` call.
    pub fn error_state(&self) -> Option<UiError> {
        self.error
    }

    // Component handling

    /// Create a widget of `kind` from `data` and append it to `page`.
    ///
    /// A menu item is also attached to the most recently added menu list
    /// of the same page. Nothing is modified when any step would fail.
    pub fn add_component(
        &mut self,
        page: PageId,
        kind: WidgetKind,
        data: ComponentData<'_, A>,
    ) -> Result<WidgetId, UiError> {
        let result = self.try_add_component(page, kind, &data);
        self.error = result.err();

        #[cfg(feature = "defmt")]
        {
            if let Err(e) = result {
                defmt::warn!("UiCore: cannot add {} to page {}: {}", kind, page, e);
            }
        }

        result
    }

    fn try_add_component(
        &mut self,
        page: PageId,
        kind: WidgetKind,
        data: &ComponentData<'_, A>,
    ) -> Result<WidgetId, UiError> {
        let target = self.pages.get(page.index()).ok_or(UiError::UnknownPage)?;
        if target.is_full() {
            return Err(UiError::CapacityExceeded);
        }
        if self.widgets.is_full() {
            return Err(UiError::RegistryFull);
        }

        let parent = if kind == WidgetKind::MenuItem {
            let parent = self.last_menu_list(page).ok_or(UiError::NoParentMenu)?;
            let has_room = self.widgets[parent.index()]
                .menu_list()
                .is_some_and(|list| list.has_room());
            if !has_room {
                return Err(UiError::CapacityExceeded);
            }
            Some(parent)
        } else {
            None
        };

        let id = WidgetId(self.widgets.len() as u8);
        self.widgets
            .push(Widget::from_data(kind, data))
            .map_err(|_| UiError::RegistryFull)?;
        self.pages[page.index()].push(id)?;

        if let Some(parent) = parent {
            if let Payload::MenuList(list) = &mut self.widgets[parent.index()].payload {
                list.push(id)?;
            }
        }
        Ok(id)
    }

    fn last_menu_list(&self, page: PageId) -> Option<WidgetId> {
        self.pages[page.index()]
            .widgets()
            .iter()
            .rev()
            .copied()
            .find(|id| self.widgets[id.index()].kind() == WidgetKind::MenuList)
    }

    /// Apply `value` to a widget of the active page.
    ///
    /// Widgets on other pages are left untouched and `Ok(None)` is
    /// returned. Activating a menu item returns its [`Activation`].
    pub fn update_component(
        &mut self,
        id: WidgetId,
        value: WidgetValue<'_>,
    ) -> Result<Option<Activation<A>>, UiError> {
        if id.index() >= self.widgets.len() {
            return Err(UiError::UnknownWidget);
        }
        if !self.is_in_active_page(id) {
            return Ok(None);
        }

        match value {
            WidgetValue::Menu(input) => self.update_menu_list(id, input),
            other => self.widgets[id.index()].update(&other).map(|()| None),
        }
    }

    fn update_menu_list(
        &mut self,
        id: WidgetId,
        input: MenuInput,
    ) -> Result<Option<Activation<A>>, UiError> {
        let (list, activated) = match &mut self.widgets[id.index()].payload {
            Payload::MenuList(list) => {
                let activated = list.step(input);
                (list.clone(), activated)
            }
            _ => return Err(UiError::ValueMismatch),
        };

        let mut activation = None;
        for (index, item_id) in list.items().iter().enumerate() {
            if let Payload::MenuItem(item) = &mut self.widgets[item_id.index()].payload {
                item.selected = index == list.selected();
                item.clicked = activated == Some(index);
                if item.clicked {
                    activation = Some(Activation {
                        item: *item_id,
                        index: index as u8,
                        action: item.callback.map(|callback| callback(index as u8)),
                    });
                }
            }
        }
        Ok(activation)
    }

    /// Draw the active page inside one frame.
    ///
    /// Menu items are drawn by their parent list, in list order.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let mut frame = Frame::begin(canvas);
        let Some(page) = self.active.and_then(|id| self.page(id)) else {
            return;
        };

        for id in page.widgets() {
            let widget = &self.widgets[id.index()];
            match &widget.payload {
                Payload::MenuItem(_) => {}
                Payload::MenuList(list) => {
                    widget.draw(&mut *frame);
                    for item in list.items() {
                        self.widgets[item.index()].draw(&mut *frame);
                    }
                }
                _ => widget.draw(&mut *frame),
            }
        }
    }
}
