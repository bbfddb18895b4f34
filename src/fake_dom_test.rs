//! In-memory page used by controller tests.
//!
//! Nodes live in an arena indexed by creation order, which doubles as document
//! order as long as tests build the tree top-down. Selector support covers what
//! the stock config uses: tag, `.class`, `#id`, `[attr]`, `[attr="v"]`,
//! `[attr^="v"]`, and the descendant combinator.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::host::{Disposition, Dom, Event, EventKind, Events, Handler, HostError, Key, Modifiers, Platform, Target};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct Node {
    tag: String,
    parent: Option<usize>,
    attrs: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
}

impl Node {
    fn classes(&self) -> impl Iterator<Item = &str> {
        self.attrs.get("class").map(String::as_str).unwrap_or_default().split_whitespace()
    }
}

struct Listener {
    target: Target<NodeId>,
    kind: EventKind,
    handler: Rc<RefCell<Handler<NodeId>>>,
}

#[derive(Default)]
struct State {
    nodes: Vec<Node>,
    focused: Option<usize>,
    focus_log: Vec<NodeId>,
    scrolled: Vec<NodeId>,
}

/// Shared handle to an in-memory page. Clones alias the same page.
#[derive(Clone)]
pub struct FakeDom {
    state: Rc<RefCell<State>>,
    listeners: Rc<RefCell<Vec<Listener>>>,
}

impl FakeDom {
    pub const HTML: NodeId = NodeId(0);
    pub const BODY: NodeId = NodeId(1);

    /// An empty page: `<html><body></body></html>`.
    pub fn new() -> Self {
        let mut state = State::default();
        state.nodes.push(Node { tag: "html".into(), ..Node::default() });
        state.nodes.push(Node { tag: "body".into(), parent: Some(0), ..Node::default() });
        Self { state: Rc::new(RefCell::new(state)), listeners: Rc::new(RefCell::new(Vec::new())) }
    }

    /// Append a `tag` element under `parent` with the given attributes.
    pub fn add(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut state = self.state.borrow_mut();
        let id = state.nodes.len();
        state.nodes.push(Node {
            tag: tag.into(),
            parent: Some(parent.0),
            attrs: attrs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect(),
            style: BTreeMap::new(),
        });
        NodeId(id)
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.state.borrow().nodes[node.0].attrs.get(name).cloned()
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.state.borrow().nodes[node.0].style.get(property).cloned()
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.state.borrow().focused.map(NodeId)
    }

    /// Every element that received focus, in order.
    pub fn focus_log(&self) -> Vec<NodeId> {
        self.state.borrow().focus_log.clone()
    }

    /// Every element that was scrolled to, in order.
    pub fn scrolled(&self) -> Vec<NodeId> {
        self.state.borrow().scrolled.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Put focus on `node` as if the user had tabbed to it.
    pub fn set_focus(&self, node: NodeId) {
        self.state.borrow_mut().focused = Some(node.0);
    }

    /// Dispatch `event` to its target, bubbling through ancestors to the document.
    pub fn dispatch(&self, event: &Event<NodeId>) -> Disposition {
        let mut path: Vec<Target<NodeId>> = Vec::new();
        if let Some(target) = event.target {
            let state = self.state.borrow();
            let mut cursor = Some(target.0);
            while let Some(idx) = cursor {
                path.push(Target::Element(NodeId(idx)));
                cursor = state.nodes[idx].parent;
            }
        }
        path.push(Target::Document);

        let mut result = Disposition::Continue;
        for hop in path {
            let handlers: Vec<_> = self
                .listeners
                .borrow()
                .iter()
                .filter(|l| l.target == hop && l.kind == event.kind)
                .map(|l| Rc::clone(&l.handler))
                .collect();
            for handler in handlers {
                let disposition = (*handler.borrow_mut())(event);
                result = result.merge(disposition);
            }
        }
        result
    }

    pub fn click(&self, node: NodeId) -> Disposition {
        self.dispatch(&Event::click(Some(node)))
    }

    /// Keydown on the focused element (or `<body>` when nothing is focused).
    pub fn press(&self, key: &str) -> Disposition {
        self.press_with(key, Modifiers::default())
    }

    pub fn press_shift(&self, key: &str) -> Disposition {
        self.press_with(key, Modifiers { shift: true, ..Modifiers::default() })
    }

    fn press_with(&self, key: &str, modifiers: Modifiers) -> Disposition {
        let target = self.focused().unwrap_or(Self::BODY);
        self.dispatch(&Event::key_down(Some(target), Key::new(key), modifiers))
    }

    fn matching(&self, selector: &str, within: Option<NodeId>) -> Vec<NodeId> {
        let Some(compounds) = parse_selector(selector) else {
            return Vec::new();
        };
        let state = self.state.borrow();
        (0..state.nodes.len())
            .filter(|&idx| within.is_none_or(|root| idx != root.0 && is_descendant(&state, root.0, idx)))
            .filter(|&idx| matches_selector(&state, idx, &compounds))
            .map(NodeId)
            .collect()
    }
}

fn is_descendant(state: &State, ancestor: usize, node: usize) -> bool {
    let mut cursor = Some(node);
    while let Some(idx) = cursor {
        if idx == ancestor {
            return true;
        }
        cursor = state.nodes[idx].parent;
    }
    false
}

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

#[derive(Debug)]
enum AttrTest {
    Present(String),
    Equals(String, String),
    Prefix(String, String),
}

fn parse_selector(selector: &str) -> Option<Vec<Compound>> {
    let compounds: Option<Vec<_>> = selector.split_whitespace().map(parse_compound).collect();
    compounds.filter(|c| !c.is_empty())
}

fn parse_compound(raw: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let chars: Vec<char> = raw.chars().collect();
    let mut i = 0;

    let read_name = |i: &mut usize| -> String {
        let start = *i;
        while *i < chars.len() && (chars[*i].is_alphanumeric() || chars[*i] == '-' || chars[*i] == '_') {
            *i += 1;
        }
        chars[start..*i].iter().collect()
    };

    let tag = read_name(&mut i);
    if !tag.is_empty() {
        compound.tag = Some(tag);
    }
    while i < chars.len() {
        match chars[i] {
            '.' => {
                i += 1;
                let name = read_name(&mut i);
                if name.is_empty() {
                    return None;
                }
                compound.classes.push(name);
            }
            '#' => {
                i += 1;
                let name = read_name(&mut i);
                if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
                    return None;
                }
                compound.id = Some(name);
            }
            '[' => {
                let close = chars[i..].iter().position(|&c| c == ']')? + i;
                let body: String = chars[i + 1..close].iter().collect();
                compound.attrs.push(parse_attr(&body)?);
                i = close + 1;
            }
            _ => return None,
        }
    }
    Some(compound)
}

fn parse_attr(body: &str) -> Option<AttrTest> {
    let unquote = |v: &str| v.trim_matches('"').trim_matches('\'').to_owned();
    if let Some((name, value)) = body.split_once("^=") {
        return Some(AttrTest::Prefix(name.to_owned(), unquote(value)));
    }
    if let Some((name, value)) = body.split_once('=') {
        return Some(AttrTest::Equals(name.to_owned(), unquote(value)));
    }
    if body.is_empty() { None } else { Some(AttrTest::Present(body.to_owned())) }
}

fn matches_compound(node: &Node, compound: &Compound) -> bool {
    if compound.tag.as_ref().is_some_and(|t| *t != node.tag) {
        return false;
    }
    if compound.id.as_ref().is_some_and(|id| node.attrs.get("id") != Some(id)) {
        return false;
    }
    if !compound.classes.iter().all(|c| node.classes().any(|have| have == c)) {
        return false;
    }
    compound.attrs.iter().all(|test| match test {
        AttrTest::Present(name) => node.attrs.contains_key(name),
        AttrTest::Equals(name, value) => node.attrs.get(name) == Some(value),
        AttrTest::Prefix(name, value) => node.attrs.get(name).is_some_and(|v| v.starts_with(value.as_str())),
    })
}

fn matches_selector(state: &State, idx: usize, compounds: &[Compound]) -> bool {
    let Some((last, ancestors)) = compounds.split_last() else {
        return false;
    };
    if !matches_compound(&state.nodes[idx], last) {
        return false;
    }
    let mut cursor = state.nodes[idx].parent;
    for compound in ancestors.iter().rev() {
        loop {
            let Some(up) = cursor else {
                return false;
            };
            cursor = state.nodes[up].parent;
            if matches_compound(&state.nodes[up], compound) {
                break;
            }
        }
    }
    true
}

impl Dom for FakeDom {
    type Element = NodeId;

    fn query(&self, selector: &str) -> Option<NodeId> {
        self.matching(selector, None).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.matching(selector, None)
    }

    fn query_within(&self, root: &NodeId, selector: &str) -> Vec<NodeId> {
        self.matching(selector, Some(*root))
    }

    fn root(&self) -> Option<NodeId> {
        Some(Self::HTML)
    }

    fn body(&self) -> Option<NodeId> {
        Some(Self::BODY)
    }

    fn active_element(&self) -> Option<NodeId> {
        Some(self.focused().unwrap_or(Self::BODY))
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        is_descendant(&self.state.borrow(), ancestor.0, node.0)
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.attr(*element, name)
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) {
        self.state.borrow_mut().nodes[element.0].attrs.insert(name.to_owned(), value.to_owned());
    }

    fn remove_attribute(&self, element: &NodeId, name: &str) {
        self.state.borrow_mut().nodes[element.0].attrs.remove(name);
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.state.borrow().nodes[element.0].classes().any(|c| c == class)
    }

    fn add_class(&self, element: &NodeId, class: &str) {
        if self.has_class(element, class) {
            return;
        }
        let mut state = self.state.borrow_mut();
        let attrs = &mut state.nodes[element.0].attrs;
        let next = match attrs.get("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{existing} {class}"),
            _ => class.to_owned(),
        };
        attrs.insert("class".to_owned(), next);
    }

    fn remove_class(&self, element: &NodeId, class: &str) {
        let mut state = self.state.borrow_mut();
        let node = &mut state.nodes[element.0];
        let next: Vec<String> = node.classes().filter(|c| *c != class).map(str::to_owned).collect();
        if node.attrs.contains_key("class") {
            node.attrs.insert("class".to_owned(), next.join(" "));
        }
    }

    fn set_style(&self, element: &NodeId, property: &str, value: &str) {
        let mut state = self.state.borrow_mut();
        let style = &mut state.nodes[element.0].style;
        if value.is_empty() {
            style.remove(property);
        } else {
            style.insert(property.to_owned(), value.to_owned());
        }
    }

    fn focus(&self, element: &NodeId) {
        let mut state = self.state.borrow_mut();
        state.focused = Some(element.0);
        state.focus_log.push(*element);
    }

    fn focus_in_place(&self, element: &NodeId) {
        self.focus(element);
    }

    fn scroll_to(&self, element: &NodeId) {
        self.state.borrow_mut().scrolled.push(*element);
    }
}

impl Events for FakeDom {
    fn listen(&self, target: &Target<NodeId>, kind: EventKind, handler: Handler<NodeId>) {
        self.listeners.borrow_mut().push(Listener {
            target: target.clone(),
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });
    }
}

#[derive(Default)]
struct PlatformState {
    path: String,
    prefers_dark: bool,
    storage: BTreeMap<String, String>,
    reject_writes: bool,
}

/// In-memory location, media query and local storage.
#[derive(Clone, Default)]
pub struct FakePlatform {
    inner: Rc<RefCell<PlatformState>>,
}

impl FakePlatform {
    pub fn at(path: &str) -> Self {
        let platform = Self::default();
        platform.inner.borrow_mut().path = path.to_owned();
        platform
    }

    pub fn preferring_dark(self) -> Self {
        self.inner.borrow_mut().prefers_dark = true;
        self
    }

    pub fn with_stored(self, key: &str, value: &str) -> Self {
        self.inner.borrow_mut().storage.insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn rejecting_writes(self) -> Self {
        self.inner.borrow_mut().reject_writes = true;
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.borrow().storage.get(key).cloned()
    }
}

impl Platform for FakePlatform {
    fn path(&self) -> String {
        self.inner.borrow().path.clone()
    }

    fn prefers_dark(&self) -> bool {
        self.inner.borrow().prefers_dark
    }

    fn stored(&self, key: &str) -> Option<String> {
        self.get(key)
    }

    fn store(&self, key: &str, value: &str) -> Result<(), HostError> {
        let mut inner = self.inner.borrow_mut();
        if inner.reject_writes {
            return Err(HostError::StorageWrite { key: key.to_owned(), reason: "quota exceeded".to_owned() });
        }
        inner.storage.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

// =============================================================
// Self-checks for the fake itself
// =============================================================

#[test]
fn selector_matches_descendant_and_prefix() {
    let dom = FakeDom::new();
    let item = dom.add(FakeDom::BODY, "div", &[("class", "gallery-item")]);
    let img = dom.add(item, "img", &[("src", "a.jpg")]);
    let stray = dom.add(FakeDom::BODY, "img", &[("src", "b.jpg")]);
    let anchor = dom.add(FakeDom::BODY, "a", &[("href", "#about")]);
    let external = dom.add(FakeDom::BODY, "a", &[("href", "https://x")]);

    assert_eq!(dom.query_all(".gallery-item img"), vec![img]);
    assert!(!dom.query_all("img").is_empty());
    assert!(dom.query_all(".gallery-item img").iter().all(|n| *n != stray));
    assert_eq!(dom.query_all("a[href^=\"#\"]"), vec![anchor]);
    assert_ne!(dom.query("a[href^=\"#\"]"), Some(external));
}

#[test]
fn invalid_selectors_match_nothing() {
    let dom = FakeDom::new();
    dom.add(FakeDom::BODY, "section", &[("id", "top")]);
    assert_eq!(dom.query("#"), None);
    assert_eq!(dom.query("#1up"), None);
    assert!(dom.query("#top").is_some());
}

#[test]
fn class_edits_round_trip() {
    let dom = FakeDom::new();
    let el = dom.add(FakeDom::BODY, "ul", &[("class", "nav-menu")]);
    dom.add_class(&el, "active");
    assert_eq!(dom.attr(el, "class").as_deref(), Some("nav-menu active"));
    dom.add_class(&el, "active");
    assert_eq!(dom.attr(el, "class").as_deref(), Some("nav-menu active"));
    dom.remove_class(&el, "active");
    assert!(!dom.has_class(&el, "active"));
    assert!(dom.has_class(&el, "nav-menu"));
}

#[test]
fn dispatch_bubbles_to_document() {
    let dom = FakeDom::new();
    let outer = dom.add(FakeDom::BODY, "div", &[]);
    let inner = dom.add(outer, "span", &[]);
    let hits = Rc::new(RefCell::new(Vec::new()));
    for target in [Target::Element(outer), Target::Document] {
        let hits = Rc::clone(&hits);
        let label = if target == Target::Document { "doc" } else { "outer" };
        dom.listen(
            &target,
            EventKind::Click,
            Box::new(move |_| {
                hits.borrow_mut().push(label);
                Disposition::Continue
            }),
        );
    }
    dom.click(inner);
    assert_eq!(*hits.borrow(), vec!["outer", "doc"]);
}
