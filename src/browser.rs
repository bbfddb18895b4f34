//! Browser host: `web-sys` implementations of [`Dom`], [`Events`] and
//! [`Platform`], plus the WASM start hook.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the only module that touches `web-sys`. Browser calls that can
//! throw (storage, attribute writes, invalid selectors) are logged and treated
//! as "not present" so a page with partial markup degrades to doing less.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, KeyboardEvent, Node, NodeList, ScrollBehavior,
    ScrollIntoViewOptions, ScrollLogicalPosition, Storage, Window,
};

use crate::config::{CONFIG_ELEMENT_ID, Config, ConfigError};
use crate::host::{Disposition, Dom, Event, EventKind, Events, Handler, HostError, Key, Modifiers, Platform, Target};

const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_ref::<Element>().cloned())
        .collect()
}

fn focus_without_scroll(element: &HtmlElement) -> Result<(), JsValue> {
    let options = js_sys::Object::new();
    js_sys::Reflect::set(&options, &JsValue::from_str("preventScroll"), &JsValue::TRUE)?;
    let focus: js_sys::Function = js_sys::Reflect::get(element, &JsValue::from_str("focus"))?.dyn_into()?;
    focus.call1(element, &options)?;
    Ok(())
}

/// The live document.
#[derive(Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl Dom for WebDom {
    type Element = Element;

    fn query(&self, selector: &str) -> Option<Element> {
        match self.document.query_selector(selector) {
            Ok(found) => found,
            Err(err) => {
                log::debug!("query {selector:?} rejected: {}", describe(&err));
                None
            }
        }
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        match self.document.query_selector_all(selector) {
            Ok(list) => elements(&list),
            Err(err) => {
                log::debug!("query {selector:?} rejected: {}", describe(&err));
                Vec::new()
            }
        }
    }

    fn query_within(&self, root: &Element, selector: &str) -> Vec<Element> {
        match root.query_selector_all(selector) {
            Ok(list) => elements(&list),
            Err(err) => {
                log::debug!("query {selector:?} rejected: {}", describe(&err));
                Vec::new()
            }
        }
    }

    fn root(&self) -> Option<Element> {
        self.document.document_element()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn active_element(&self) -> Option<Element> {
        self.document.active_element()
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        let node: &Node = node;
        ancestor.contains(Some(node))
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn set_attribute(&self, element: &Element, name: &str, value: &str) {
        if let Err(err) = element.set_attribute(name, value) {
            log::warn!("set {name}={value:?} failed: {}", describe(&err));
        }
    }

    fn remove_attribute(&self, element: &Element, name: &str) {
        if let Err(err) = element.remove_attribute(name) {
            log::warn!("remove {name} failed: {}", describe(&err));
        }
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn add_class(&self, element: &Element, class: &str) {
        if let Err(err) = element.class_list().add_1(class) {
            log::warn!("add class {class:?} failed: {}", describe(&err));
        }
    }

    fn remove_class(&self, element: &Element, class: &str) {
        if let Err(err) = element.class_list().remove_1(class) {
            log::warn!("remove class {class:?} failed: {}", describe(&err));
        }
    }

    fn set_style(&self, element: &Element, property: &str, value: &str) {
        let Some(html) = element.dyn_ref::<HtmlElement>() else {
            log::debug!("style {property} skipped: not an HTML element");
            return;
        };
        let style = html.style();
        let result = if value.is_empty() {
            style.remove_property(property).map(drop)
        } else {
            style.set_property(property, value)
        };
        if let Err(err) = result {
            log::warn!("style {property}={value:?} failed: {}", describe(&err));
        }
    }

    fn focus(&self, element: &Element) {
        let Some(html) = element.dyn_ref::<HtmlElement>() else {
            return;
        };
        if let Err(err) = html.focus() {
            log::warn!("focus failed: {}", describe(&err));
        }
    }

    fn focus_in_place(&self, element: &Element) {
        let Some(html) = element.dyn_ref::<HtmlElement>() else {
            return;
        };
        if let Err(err) = focus_without_scroll(html) {
            log::warn!("focus failed: {}", describe(&err));
        }
    }

    fn scroll_to(&self, element: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        element.scroll_into_view_with_scroll_into_view_options(&options);
    }
}

fn translate(kind: EventKind, ev: &web_sys::Event) -> Event<Element> {
    let target = ev.target().and_then(|t| t.dyn_ref::<Element>().cloned());
    match ev.dyn_ref::<KeyboardEvent>() {
        Some(key_ev) => Event {
            kind,
            target,
            key: Some(Key::new(key_ev.key())),
            modifiers: Modifiers {
                shift: key_ev.shift_key(),
                ctrl: key_ev.ctrl_key(),
                alt: key_ev.alt_key(),
                meta: key_ev.meta_key(),
            },
        },
        None => Event { kind, target, key: None, modifiers: Modifiers::default() },
    }
}

impl Events for WebDom {
    fn listen(&self, target: &Target<Element>, kind: EventKind, mut handler: Handler<Element>) {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |ev: web_sys::Event| {
            if handler(&translate(kind, &ev)) == Disposition::PreventDefault {
                ev.prevent_default();
            }
        });
        let added = match target {
            Target::Document => self
                .document
                .add_event_listener_with_callback(kind.as_str(), callback.as_ref().unchecked_ref()),
            Target::Element(element) => {
                element.add_event_listener_with_callback(kind.as_str(), callback.as_ref().unchecked_ref())
            }
        };
        match added {
            // Page-lifetime listener.
            Ok(()) => callback.forget(),
            Err(err) => log::warn!("{} listener not attached: {}", kind.as_str(), describe(&err)),
        }
    }
}

/// Location, media queries and `localStorage` of the current window.
#[derive(Clone)]
pub struct BrowserPlatform {
    window: Window,
}

impl BrowserPlatform {
    #[must_use]
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn storage(&self) -> Result<Storage, HostError> {
        match self.window.local_storage() {
            Ok(Some(storage)) => Ok(storage),
            Ok(None) => Err(HostError::StorageUnavailable),
            Err(err) => {
                log::debug!("localStorage access denied: {}", describe(&err));
                Err(HostError::StorageUnavailable)
            }
        }
    }
}

impl Platform for BrowserPlatform {
    fn path(&self) -> String {
        match self.window.location().pathname() {
            Ok(path) => path,
            Err(err) => {
                log::warn!("location unavailable: {}", describe(&err));
                "/".to_owned()
            }
        }
    }

    fn prefers_dark(&self) -> bool {
        match self.window.match_media(DARK_QUERY) {
            Ok(Some(query)) => query.matches(),
            Ok(None) => false,
            Err(err) => {
                log::debug!("matchMedia failed: {}", describe(&err));
                false
            }
        }
    }

    fn stored(&self, key: &str) -> Option<String> {
        let storage = match self.storage() {
            Ok(storage) => storage,
            Err(err) => {
                log::debug!("read {key:?} skipped: {err}");
                return None;
            }
        };
        match storage.get_item(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("read {key:?} failed: {}", describe(&err));
                None
            }
        }
    }

    fn store(&self, key: &str, value: &str) -> Result<(), HostError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| HostError::StorageWrite { key: key.to_owned(), reason: describe(&err) })
    }
}

/// Read the inline JSON override, if the page has one.
fn config_from_page(document: &Document) -> Result<Config, ConfigError> {
    match document.get_element_by_id(CONFIG_ELEMENT_ID).and_then(|el| el.text_content()) {
        Some(raw) => Config::from_json(&raw),
        None => Ok(Config::default()),
    }
}

fn boot(config: &Config) {
    let Some(window) = web_sys::window() else {
        log::warn!("no window; nothing to bind");
        return;
    };
    let Some(document) = window.document() else {
        log::warn!("no document; nothing to bind");
        return;
    };
    // Listeners hold the controllers; the returned handles can go.
    crate::init(&WebDom::new(document), &BrowserPlatform::new(window), config);
}

/// WASM entry point: bind now if the DOM is parsed, else on `DOMContentLoaded`.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let (config, rejected) = match config_from_page(&document) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    if let Err(err) = console_log::init_with_level(config.log_level.0) {
        log::warn!("console logger not installed: {err}");
    }
    if let Some(err) = rejected {
        log::warn!("{CONFIG_ELEMENT_ID} ignored: {err}");
    }

    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(move || boot(&config));
        if let Err(err) = document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref()) {
            log::error!("DOMContentLoaded listener not attached: {}", describe(&err));
        }
    } else {
        boot(&config);
    }
}
