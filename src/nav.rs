//! Mobile navigation menu: disclosure toggle, dismissal, and focus trap.
//!
//! DESIGN
//! ======
//! Open state lives on the page as a class on the menu; the trigger's
//! `aria-expanded` is written alongside it on every transition so the two never
//! disagree. The controller holds only element handles resolved once at
//! construction.

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;

use std::rc::Rc;

use crate::config::NavConfig;
use crate::host::{Disposition, Dom, Event, EventKind, Events, Target};

/// Handles for the navigation trigger, menu, and its focusable links.
pub struct NavController<D: Dom> {
    dom: D,
    toggle: D::Element,
    menu: D::Element,
    links: Vec<D::Element>,
    open_class: String,
}

impl<D: Dom> NavController<D> {
    /// Resolve the trigger and menu. Returns `None` if either is missing.
    pub fn new(dom: D, config: &NavConfig) -> Option<Self> {
        let Some(toggle) = dom.query(&config.toggle) else {
            log::debug!("nav: no {} on page; controller inert", config.toggle);
            return None;
        };
        let Some(menu) = dom.query(&config.menu) else {
            log::debug!("nav: no {} on page; controller inert", config.menu);
            return None;
        };
        let links = dom.query_within(&menu, &config.link);
        dom.set_attribute(&toggle, "aria-expanded", "false");
        log::debug!("nav: bound with {} focusable links", links.len());
        Some(Self { dom, toggle, menu, links, open_class: config.open_class.clone() })
    }

    /// Whether the menu currently carries the open marker.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.dom.has_class(&self.menu, &self.open_class)
    }

    pub fn toggle(&self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    /// Show the menu and focus its first link, if any.
    pub fn open(&self) {
        self.dom.add_class(&self.menu, &self.open_class);
        self.dom.set_attribute(&self.toggle, "aria-expanded", "true");
        if let Some(first) = self.links.first() {
            self.dom.focus(first);
        }
    }

    /// Hide the menu. Focus stays where it is.
    pub fn close(&self) {
        self.dom.remove_class(&self.menu, &self.open_class);
        self.dom.set_attribute(&self.toggle, "aria-expanded", "false");
    }

    /// Document click: close unless the click landed on the trigger or inside the menu.
    pub fn on_document_click(&self, event: &Event<D::Element>) -> Disposition {
        let inside = event
            .target
            .as_ref()
            .is_some_and(|t| self.dom.contains(&self.toggle, t) || self.dom.contains(&self.menu, t));
        if !inside {
            self.close();
        }
        Disposition::Continue
    }

    /// Document keydown: Escape closes an open menu and returns focus to the trigger.
    pub fn on_document_key(&self, event: &Event<D::Element>) -> Disposition {
        if event.is_escape() && self.is_open() {
            self.close();
            self.dom.focus(&self.toggle);
        }
        Disposition::Continue
    }

    /// Menu keydown: wrap Tab / Shift+Tab at the ends of the link list.
    pub fn on_menu_key(&self, event: &Event<D::Element>) -> Disposition {
        if !event.is_tab() || !self.is_open() {
            return Disposition::Continue;
        }
        let (Some(first), Some(last)) = (self.links.first(), self.links.last()) else {
            return Disposition::Continue;
        };
        let Some(active) = self.dom.active_element() else {
            return Disposition::Continue;
        };

        if event.modifiers.shift && active == *first {
            self.dom.focus(last);
            Disposition::PreventDefault
        } else if !event.modifiers.shift && active == *last {
            self.dom.focus(first);
            Disposition::PreventDefault
        } else {
            Disposition::Continue
        }
    }
}

impl<D: Events + 'static> NavController<D> {
    /// Attach trigger, document, and menu listeners.
    pub fn bind(self: &Rc<Self>) {
        let this = Rc::clone(self);
        self.dom.listen(
            &Target::Element(self.toggle.clone()),
            EventKind::Click,
            Box::new(move |_| {
                this.toggle();
                Disposition::Continue
            }),
        );

        let this = Rc::clone(self);
        self.dom.listen(&Target::Document, EventKind::Click, Box::new(move |ev| this.on_document_click(ev)));

        let this = Rc::clone(self);
        self.dom.listen(&Target::Document, EventKind::KeyDown, Box::new(move |ev| this.on_document_key(ev)));

        let this = Rc::clone(self);
        self.dom.listen(
            &Target::Element(self.menu.clone()),
            EventKind::KeyDown,
            Box::new(move |ev| this.on_menu_key(ev)),
        );
    }
}
