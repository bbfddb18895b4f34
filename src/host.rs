//! Host model: the page capabilities the controllers are written against.
//!
//! Controllers never touch `web-sys` directly. They see the page through three
//! traits: [`Dom`] for element queries and mutation, [`Events`] for listener
//! registration, and [`Platform`] for the location, the color-scheme query,
//! and local key-value storage. The browser binding implements all three over
//! `web-sys`; tests implement them over an in-memory tree.
//!
//! All methods take `&self`. Browser handles are interior-mutable references
//! into the page, and the test fake mirrors that with `RefCell`.

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

/// Errors surfaced by fallible [`Platform`] operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HostError {
    /// Local storage is disabled or not exposed by the browser.
    #[error("local storage is unavailable")]
    StorageUnavailable,
    /// The browser rejected a storage write (quota, private mode).
    #[error("failed to write storage key {key:?}: {reason}")]
    StorageWrite { key: String, reason: String },
}

/// DOM event types the controllers subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    KeyDown,
}

impl EventKind {
    /// The DOM event type name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::KeyDown => "keydown",
        }
    }
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Tab"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }

    #[must_use]
    pub fn is_tab(&self) -> bool {
        self.0 == "Tab"
    }

    #[must_use]
    pub fn is_enter(&self) -> bool {
        self.0 == "Enter"
    }
}

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// A DOM event as seen by a controller handler.
#[derive(Debug, Clone)]
pub struct Event<E> {
    /// Which event fired.
    pub kind: EventKind,
    /// The element the event was dispatched to, if it was an element.
    pub target: Option<E>,
    /// The pressed key, for keyboard events.
    pub key: Option<Key>,
    /// Modifier state at dispatch time.
    pub modifiers: Modifiers,
}

impl<E> Event<E> {
    /// A click on `target`.
    #[must_use]
    pub fn click(target: Option<E>) -> Self {
        Self { kind: EventKind::Click, target, key: None, modifiers: Modifiers::default() }
    }

    /// A keydown of `key` on `target`.
    #[must_use]
    pub fn key_down(target: Option<E>, key: Key, modifiers: Modifiers) -> Self {
        Self { kind: EventKind::KeyDown, target, key: Some(key), modifiers }
    }

    /// Whether this is a keydown of Escape.
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.key.as_ref().is_some_and(Key::is_escape)
    }

    /// Whether this is a keydown of Enter.
    #[must_use]
    pub fn is_enter(&self) -> bool {
        self.key.as_ref().is_some_and(Key::is_enter)
    }

    /// Whether this is a keydown of Tab, with or without Shift.
    #[must_use]
    pub fn is_tab(&self) -> bool {
        self.key.as_ref().is_some_and(Key::is_tab)
    }
}

/// What the host should do with the event's default action after a handler ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Disposition {
    /// Let the browser default proceed.
    #[default]
    Continue,
    /// Suppress the browser default (`preventDefault`).
    PreventDefault,
}

impl Disposition {
    /// Combine two dispositions; suppression wins.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        if self == Self::PreventDefault || other == Self::PreventDefault {
            Self::PreventDefault
        } else {
            Self::Continue
        }
    }
}

/// Where a listener is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<E> {
    /// The document itself; sees every bubbling event.
    Document,
    /// A specific element and, through bubbling, its descendants.
    Element(E),
}

/// A registered event handler.
pub type Handler<E> = Box<dyn FnMut(&Event<E>) -> Disposition>;

/// Element queries and mutations.
pub trait Dom {
    /// An element handle. Equality is node identity.
    type Element: Clone + PartialEq;

    /// First element in the document matching `selector`.
    ///
    /// An invalid selector yields `None`.
    fn query(&self, selector: &str) -> Option<Self::Element>;

    /// All elements in the document matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    /// All descendants of `root` matching `selector`, in document order.
    fn query_within(&self, root: &Self::Element, selector: &str) -> Vec<Self::Element>;

    /// The `<html>` element.
    fn root(&self) -> Option<Self::Element>;

    /// The `<body>` element.
    fn body(&self) -> Option<Self::Element>;

    /// The element that currently holds keyboard focus.
    fn active_element(&self) -> Option<Self::Element>;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Element, node: &Self::Element) -> bool;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;
    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str);
    fn remove_attribute(&self, element: &Self::Element, name: &str);

    fn has_class(&self, element: &Self::Element, class: &str) -> bool;
    fn add_class(&self, element: &Self::Element, class: &str);
    fn remove_class(&self, element: &Self::Element, class: &str);

    /// Set an inline style property. An empty `value` removes the property.
    fn set_style(&self, element: &Self::Element, property: &str, value: &str);

    /// Move keyboard focus to `element`.
    fn focus(&self, element: &Self::Element);

    /// Move keyboard focus to `element` without scrolling it into view.
    fn focus_in_place(&self, element: &Self::Element);

    /// Smoothly scroll so `element` sits at the top of the viewport.
    fn scroll_to(&self, element: &Self::Element);
}

/// Event subscription.
pub trait Events: Dom {
    /// Attach `handler` for `kind` events reaching `target`.
    ///
    /// Listeners live for the lifetime of the page.
    fn listen(&self, target: &Target<Self::Element>, kind: EventKind, handler: Handler<Self::Element>);
}

/// Environment outside the DOM tree.
pub trait Platform {
    /// Path component of the current location (e.g. `/about.html`).
    fn path(&self) -> String;

    /// Whether the environment reports a dark color-scheme preference.
    fn prefers_dark(&self) -> bool;

    /// Read a value from local storage.
    fn stored(&self, key: &str) -> Option<String>;

    /// Write a value to local storage.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if storage is unavailable or rejects the write.
    fn store(&self, key: &str, value: &str) -> Result<(), HostError>;
}
