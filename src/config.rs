//! DOM contract and runtime settings.
//!
//! Every selector, class name, attribute and storage key the controllers use
//! lives here, so markup and styling can change without touching controller
//! logic. Defaults match the stock portfolio markup; a page can override any
//! subset by embedding a JSON document (see [`Config::from_json`]).

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

/// Element id of the optional inline JSON override.
pub const CONFIG_ELEMENT_ID: &str = "portfolio-ui-config";

/// Error returned by [`Config::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document is not valid JSON or does not fit the config schema.
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    /// A selector or name that must be non-empty was blank.
    #[error("config field `{0}` must not be empty")]
    Empty(&'static str),
}

/// Full configuration for all controllers.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub log_level: LogLevel,
    pub nav: NavConfig,
    pub scroll: ScrollConfig,
    pub active_link: ActiveLinkConfig,
    pub theme: ThemeConfig,
    pub lightbox: LightboxConfig,
}

/// Console log verbosity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct LogLevel(pub log::Level);

impl Default for LogLevel {
    fn default() -> Self {
        Self(log::Level::Info)
    }
}

/// Mobile navigation menu.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    pub toggle: String,
    pub menu: String,
    pub link: String,
    /// Class marking the menu as open.
    pub open_class: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            toggle: ".nav-toggle".to_owned(),
            menu: ".nav-menu".to_owned(),
            link: ".nav-link".to_owned(),
            open_class: "active".to_owned(),
        }
    }
}

/// Same-page anchor scrolling.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    pub anchors: String,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self { anchors: "a[href^=\"#\"]".to_owned() }
    }
}

/// Current-page highlighting in the navigation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActiveLinkConfig {
    pub link: String,
    pub active_class: String,
    /// File name served at the site root.
    pub home_page: String,
}

impl Default for ActiveLinkConfig {
    fn default() -> Self {
        Self {
            link: ".nav-link".to_owned(),
            active_class: "active".to_owned(),
            home_page: "index.html".to_owned(),
        }
    }
}

/// Light/dark theme switch.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub toggle: String,
    /// Attribute on `<html>` carrying the applied theme.
    pub attribute: String,
    pub storage_key: String,
    /// Toggle label while the page is dark.
    pub to_light_label: String,
    /// Toggle label while the page is light.
    pub to_dark_label: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            toggle: ".theme-toggle".to_owned(),
            attribute: "data-theme".to_owned(),
            storage_key: "theme".to_owned(),
            to_light_label: "Switch to light mode".to_owned(),
            to_dark_label: "Switch to dark mode".to_owned(),
        }
    }
}

/// Gallery overlay.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightboxConfig {
    pub overlay: String,
    pub image: String,
    pub close: String,
    pub items: String,
    /// Class marking the overlay as visible.
    pub visible_class: String,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            overlay: "#lightbox".to_owned(),
            image: "#lightbox-img".to_owned(),
            close: ".lightbox-close".to_owned(),
            items: ".gallery-item img".to_owned(),
            visible_class: "active".to_owned(),
        }
    }
}

impl Config {
    /// Parse a JSON override. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields, and
    /// [`ConfigError::Empty`] when a required name is blank.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject blank selectors and names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Empty`] naming the first blank field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields: [(&'static str, &str); 18] = [
            ("nav.toggle", self.nav.toggle.as_str()),
            ("nav.menu", self.nav.menu.as_str()),
            ("nav.link", self.nav.link.as_str()),
            ("nav.open_class", self.nav.open_class.as_str()),
            ("scroll.anchors", self.scroll.anchors.as_str()),
            ("active_link.link", self.active_link.link.as_str()),
            ("active_link.active_class", self.active_link.active_class.as_str()),
            ("active_link.home_page", self.active_link.home_page.as_str()),
            ("theme.toggle", self.theme.toggle.as_str()),
            ("theme.attribute", self.theme.attribute.as_str()),
            ("theme.storage_key", self.theme.storage_key.as_str()),
            ("theme.to_light_label", self.theme.to_light_label.as_str()),
            ("theme.to_dark_label", self.theme.to_dark_label.as_str()),
            ("lightbox.overlay", self.lightbox.overlay.as_str()),
            ("lightbox.image", self.lightbox.image.as_str()),
            ("lightbox.close", self.lightbox.close.as_str()),
            ("lightbox.items", self.lightbox.items.as_str()),
            ("lightbox.visible_class", self.lightbox.visible_class.as_str()),
        ];
        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some(&(name, _)) => Err(ConfigError::Empty(name)),
            None => Ok(()),
        }
    }
}
