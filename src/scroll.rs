//! Smooth scrolling for same-page anchors.
//!
//! Only anchors present at construction are bound; links inserted later keep
//! plain browser behavior.

#[cfg(test)]
#[path = "scroll_test.rs"]
mod scroll_test;

use std::rc::Rc;

use crate::config::ScrollConfig;
use crate::host::{Disposition, Dom, EventKind, Events, Target};

pub struct SmoothScroll<D: Dom> {
    dom: D,
    anchors: Vec<D::Element>,
}

impl<D: Dom> SmoothScroll<D> {
    #[must_use]
    pub fn new(dom: D, config: &ScrollConfig) -> Self {
        let anchors = dom.query_all(&config.anchors);
        log::debug!("scroll: {} in-page anchors", anchors.len());
        Self { dom, anchors }
    }

    /// Anchors this controller is bound to.
    #[must_use]
    pub fn anchors(&self) -> &[D::Element] {
        &self.anchors
    }

    /// Scroll to and focus the anchor's target.
    ///
    /// A bare `#` or a fragment with no matching element leaves the click to
    /// the browser.
    pub fn follow(&self, anchor: &D::Element) -> Disposition {
        let Some(href) = self.dom.attribute(anchor, "href") else {
            return Disposition::Continue;
        };
        if href == "#" {
            return Disposition::Continue;
        }
        let Some(target) = self.dom.query(&href) else {
            log::debug!("scroll: no element for {href}; leaving click to the browser");
            return Disposition::Continue;
        };

        self.dom.scroll_to(&target);
        if self.dom.attribute(&target, "tabindex").is_none() {
            self.dom.set_attribute(&target, "tabindex", "-1");
        }
        self.dom.focus_in_place(&target);
        Disposition::PreventDefault
    }
}

impl<D: Events + 'static> SmoothScroll<D> {
    pub fn bind(self: &Rc<Self>) {
        for anchor in &self.anchors {
            let this = Rc::clone(self);
            let clicked = anchor.clone();
            self.dom.listen(
                &Target::Element(anchor.clone()),
                EventKind::Click,
                Box::new(move |_| this.follow(&clicked)),
            );
        }
    }
}
