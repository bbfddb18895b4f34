//! # portfolio-ui
//!
//! WASM interaction layer for a static portfolio site. The markup and styles
//! are plain HTML/CSS; this crate attaches the behavior: the mobile menu,
//! in-page smooth scrolling, current-page link highlighting, the light/dark
//! switch, and the gallery lightbox.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`host`] | `Dom` / `Events` / `Platform` traits the controllers run against |
//! | [`config`] | DOM contract (selectors, classes, storage key) and log level |
//! | [`nav`] | Mobile menu toggle, dismissal, focus trap |
//! | [`scroll`] | Smooth scrolling for `#fragment` anchors |
//! | [`active_link`] | Marks the navigation link for the current page |
//! | [`theme`] | Light/dark theme resolution, toggle, persistence |
//! | [`lightbox`] | Gallery overlay |
//! | `browser` | `web-sys` host and the WASM entry point (`hydrate` feature) |
//!
//! Controllers are independent of each other and share nothing but the page.

pub mod active_link;
#[cfg(feature = "hydrate")]
pub mod browser;
pub mod config;
pub mod host;
pub mod lightbox;
pub mod nav;
pub mod scroll;
pub mod theme;

#[cfg(test)]
#[path = "fake_dom_test.rs"]
mod fake_dom;


use std::rc::Rc;

use crate::config::Config;
use crate::host::{Events, Platform};
use crate::lightbox::LightboxController;
use crate::nav::NavController;
use crate::scroll::SmoothScroll;
use crate::theme::ThemeController;

/// Live controllers for one page. `None` marks a unit whose markup is absent.
pub struct Ui<D: Events, P: Platform> {
    pub nav: Option<Rc<NavController<D>>>,
    pub scroll: Rc<SmoothScroll<D>>,
    /// Number of navigation links marked as the current page.
    pub active_links: usize,
    pub theme: Option<Rc<ThemeController<D, P>>>,
    pub lightbox: Option<Rc<LightboxController<D>>>,
}

/// Build and bind every controller against `dom`, in page order.
///
/// Call once per page load; a second call attaches duplicate listeners.
pub fn init<D, P>(dom: &D, platform: &P, config: &Config) -> Ui<D, P>
where
    D: Events + Clone + 'static,
    P: Platform + Clone + 'static,
{
    let nav = NavController::new(dom.clone(), &config.nav).map(Rc::new);
    if let Some(nav) = &nav {
        nav.bind();
    }

    let scroll = Rc::new(SmoothScroll::new(dom.clone(), &config.scroll));
    scroll.bind();

    let active_links = active_link::mark_active_links(dom, &platform.path(), &config.active_link);

    let theme = ThemeController::new(dom.clone(), platform.clone(), &config.theme).map(Rc::new);
    if let Some(theme) = &theme {
        theme.bind();
    }

    let lightbox = LightboxController::new(dom.clone(), &config.lightbox).map(Rc::new);
    if let Some(lightbox) = &lightbox {
        lightbox.bind();
    }

    log::info!(
        "portfolio-ui ready (nav: {}, anchors: {}, theme: {}, lightbox: {})",
        nav.is_some(),
        scroll.anchors().len(),
        theme.is_some(),
        lightbox.is_some()
    );
    Ui { nav, scroll, active_links, theme, lightbox }
}
