//! Gallery lightbox: full-size image overlay.
//!
//! DESIGN
//! ======
//! Visibility is a class on the overlay. While it is shown, the body's
//! `overflow` is pinned to `hidden` so the page behind does not scroll. The
//! only state carried between openings is the image currently copied into
//! the overlay.

#[cfg(test)]
#[path = "lightbox_test.rs"]
mod lightbox_test;

use std::rc::Rc;

use crate::config::LightboxConfig;
use crate::host::{Disposition, Dom, Event, EventKind, Events, Target};

pub struct LightboxController<D: Dom> {
    dom: D,
    overlay: D::Element,
    image: D::Element,
    close: D::Element,
    items: Vec<D::Element>,
    visible_class: String,
}

impl<D: Dom> LightboxController<D> {
    /// Resolve the overlay parts and gallery images.
    ///
    /// Returns `None` if the overlay, its image, its close control, or every
    /// gallery image is missing.
    pub fn new(dom: D, config: &LightboxConfig) -> Option<Self> {
        let items = dom.query_all(&config.items);
        if items.is_empty() {
            log::debug!("lightbox: no {} on page; controller inert", config.items);
            return None;
        }
        let (Some(overlay), Some(image), Some(close)) =
            (dom.query(&config.overlay), dom.query(&config.image), dom.query(&config.close))
        else {
            log::debug!("lightbox: overlay markup incomplete; controller inert");
            return None;
        };

        for item in &items {
            if dom.attribute(item, "tabindex").is_none() {
                dom.set_attribute(item, "tabindex", "0");
            }
        }
        log::debug!("lightbox: bound to {} gallery images", items.len());
        Some(Self { dom, overlay, image, close, items, visible_class: config.visible_class.clone() })
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.dom.has_class(&self.overlay, &self.visible_class)
    }

    /// Gallery images this controller opens from.
    #[must_use]
    pub fn items(&self) -> &[D::Element] {
        &self.items
    }

    /// Show `item` in the overlay and lock page scrolling.
    pub fn open(&self, item: &D::Element) {
        let src = self.dom.attribute(item, "src").unwrap_or_default();
        let alt = self.dom.attribute(item, "alt").unwrap_or_default();
        self.dom.set_attribute(&self.image, "src", &src);
        self.dom.set_attribute(&self.image, "alt", &alt);
        self.dom.add_class(&self.overlay, &self.visible_class);
        if let Some(body) = self.dom.body() {
            self.dom.set_style(&body, "overflow", "hidden");
        }
        self.dom.focus(&self.close);
    }

    /// Hide the overlay and release the scroll lock.
    pub fn close(&self) {
        self.dom.remove_class(&self.overlay, &self.visible_class);
        if let Some(body) = self.dom.body() {
            self.dom.set_style(&body, "overflow", "");
        }
    }

    /// Overlay click: close only when the backdrop itself was hit.
    pub fn on_overlay_click(&self, event: &Event<D::Element>) -> Disposition {
        if event.target.as_ref() == Some(&self.overlay) {
            self.close();
        }
        Disposition::Continue
    }

    /// Document keydown: Escape closes a visible overlay.
    pub fn on_document_key(&self, event: &Event<D::Element>) -> Disposition {
        if event.is_escape() && self.is_visible() {
            self.close();
        }
        Disposition::Continue
    }
}

impl<D: Events + 'static> LightboxController<D> {
    pub fn bind(self: &Rc<Self>) {
        for item in &self.items {
            let this = Rc::clone(self);
            let clicked = item.clone();
            self.dom.listen(
                &Target::Element(item.clone()),
                EventKind::Click,
                Box::new(move |_| {
                    this.open(&clicked);
                    Disposition::Continue
                }),
            );

            let this = Rc::clone(self);
            let pressed = item.clone();
            self.dom.listen(
                &Target::Element(item.clone()),
                EventKind::KeyDown,
                Box::new(move |ev| {
                    if ev.is_enter() {
                        this.open(&pressed);
                    }
                    Disposition::Continue
                }),
            );
        }

        let this = Rc::clone(self);
        self.dom.listen(
            &Target::Element(self.close.clone()),
            EventKind::Click,
            Box::new(move |_| {
                this.close();
                Disposition::Continue
            }),
        );

        let this = Rc::clone(self);
        self.dom.listen(
            &Target::Element(self.overlay.clone()),
            EventKind::Click,
            Box::new(move |ev| this.on_overlay_click(ev)),
        );

        let this = Rc::clone(self);
        self.dom.listen(&Target::Document, EventKind::KeyDown, Box::new(move |ev| this.on_document_key(ev)));
    }
}
