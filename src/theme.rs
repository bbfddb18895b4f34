//! Light/dark theme initialization and toggle.
//!
//! Reads the visitor's preference from local storage, falling back to the
//! `prefers-color-scheme` media query, and applies it as a `data-theme`
//! attribute on `<html>`. Toggling writes the new value back to storage.
//!
//! TRADE-OFFS
//! ==========
//! Light is the page's unmarked default: initialization only ever writes the
//! dark marker, while a toggle writes whichever value it switched to. Anything
//! on the root other than `dark` reads as light.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::config::ThemeConfig;
use crate::host::{Disposition, Dom, EventKind, Events, Platform, Target};

/// Visual mode of the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Error returned when a stored or applied value is not a theme name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown theme {0:?}")]
pub struct ThemeParseError(pub String);

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Stored preference first, then the environment's color-scheme preference.
    #[must_use]
    pub fn resolve(stored: Option<Self>, prefers_dark: bool) -> Self {
        stored.unwrap_or(if prefers_dark { Self::Dark } else { Self::Light })
    }
}

impl FromStr for Theme {
    type Err = ThemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ThemeParseError(other.to_owned())),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Theme switch bound to the page root and a toggle button.
pub struct ThemeController<D: Dom, P: Platform> {
    dom: D,
    platform: P,
    toggle: D::Element,
    root: D::Element,
    config: ThemeConfig,
}

impl<D: Dom, P: Platform> ThemeController<D, P> {
    /// Resolve the toggle and root, then apply the initial theme.
    ///
    /// Returns `None` without touching the page if there is no toggle.
    pub fn new(dom: D, platform: P, config: &ThemeConfig) -> Option<Self> {
        let Some(toggle) = dom.query(&config.toggle) else {
            log::debug!("theme: no {} on page; controller inert", config.toggle);
            return None;
        };
        let root = dom.root()?;
        let controller = Self { dom, platform, toggle, root, config: config.clone() };
        controller.apply_initial();
        Some(controller)
    }

    /// The persisted preference. A present but unrecognized value counts as
    /// light; only an absent key defers to the environment.
    fn stored(&self) -> Option<Theme> {
        let raw = self.platform.stored(&self.config.storage_key)?;
        match raw.parse() {
            Ok(theme) => Some(theme),
            Err(err) => {
                log::warn!("theme: treating stored preference as light: {err}");
                Some(Theme::Light)
            }
        }
    }

    fn apply_initial(&self) {
        let theme = Theme::resolve(self.stored(), self.platform.prefers_dark());
        if theme == Theme::Dark {
            self.dom.set_attribute(&self.root, &self.config.attribute, Theme::Dark.as_str());
        }
        log::debug!("theme: initial {theme}");
    }

    /// The theme currently applied to the root.
    #[must_use]
    pub fn current(&self) -> Theme {
        match self.dom.attribute(&self.root, &self.config.attribute) {
            Some(value) if value == Theme::Dark.as_str() => Theme::Dark,
            _ => Theme::Light,
        }
    }

    /// Label describing what the toggle will do next while `theme` is applied.
    #[must_use]
    pub fn label_for(&self, theme: Theme) -> &str {
        match theme {
            Theme::Dark => &self.config.to_light_label,
            Theme::Light => &self.config.to_dark_label,
        }
    }

    /// Switch to the opposite theme, persist it, and relabel the toggle.
    pub fn toggle(&self) -> Theme {
        let next = self.current().opposite();
        self.dom.set_attribute(&self.root, &self.config.attribute, next.as_str());
        if let Err(err) = self.platform.store(&self.config.storage_key, next.as_str()) {
            log::warn!("theme: preference not saved: {err}");
        }
        self.dom.set_attribute(&self.toggle, "aria-label", self.label_for(next));
        log::info!("theme: switched to {next}");
        next
    }
}

impl<D: Events + 'static, P: Platform + 'static> ThemeController<D, P> {
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
    }
}
