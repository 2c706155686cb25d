//! In-memory page binding.
//!
//! Elements live in a slab and are looked up by id or class the way a
//! browser document would. Slab keys are recycled, so every handle also
//! carries the generation of the element it was issued for; a handle to a
//! removed element never resolves to whatever reuses its slot. Listeners are registered under a [`Namespace`],
//! so one editor can drop its own listeners without touching anybody else's.
//!
//! The page is single-threaded and cheap to clone; every clone shares the
//! same element tree.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use slab::Slab;

use crate::error::DomError;

/// Handle to an element on a [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId {
    key: usize,
    generation: u64,
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<element {}#{}>", self.key, self.generation)
    }
}

/// Low-level interaction events a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyPress,
    KeyUp,
    Change,
    Focus,
    Blur,
    Click,
    MouseDown,
    MouseUp,
}

impl EventKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KeyPress => "keypress",
            Self::KeyUp => "keyup",
            Self::Change => "change",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Click => "click",
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
        }
    }
}

/// Isolation tag for a group of listeners.
///
/// Tokens come from [`Page::next_namespace`] and are never reused on the
/// same page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(u64);

impl Namespace {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "inkmount{}", self.0)
    }
}

type Handler = Rc<dyn Fn(&Page, EventKind)>;

#[derive(Debug, Default)]
struct Element {
    generation: u64,
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: HashMap<String, String>,
    value: String,
    value_writes: usize,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

struct Listener {
    target: ElementId,
    kind: EventKind,
    namespace: Namespace,
    handler: Handler,
}

#[derive(Default)]
struct PageInner {
    elements: Slab<Element>,
    ids: HashMap<String, ElementId>,
    listeners: Slab<Listener>,
    next_generation: u64,
    next_namespace: u64,
}

impl PageInner {
    fn element(&self, el: ElementId) -> Result<&Element, DomError> {
        self.elements
            .get(el.key)
            .filter(|e| e.generation == el.generation)
            .ok_or(DomError::MissingElement(el))
    }

    fn element_mut(&mut self, el: ElementId) -> Result<&mut Element, DomError> {
        self.elements
            .get_mut(el.key)
            .filter(|e| e.generation == el.generation)
            .ok_or(DomError::MissingElement(el))
    }
}

/// A document holding form fields, editor chrome and their listeners.
#[derive(Clone, Default)]
pub struct Page {
    inner: Rc<RefCell<PageInner>>,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Page")
            .field("elements", &inner.elements.len())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an element with no parent.
    pub fn create_element(&self, tag: &str) -> ElementId {
        let mut inner = self.inner.borrow_mut();
        inner.next_generation += 1;
        let generation = inner.next_generation;
        let key = inner.elements.insert(Element {
            generation,
            tag: tag.to_string(),
            ..Element::default()
        });
        ElementId { key, generation }
    }

    /// Whether `el` is still on the page. Handles to removed elements stay
    /// dead even after their slot is reused.
    pub fn contains(&self, el: ElementId) -> bool {
        self.inner.borrow().element(el).is_ok()
    }

    pub fn tag(&self, el: ElementId) -> Option<String> {
        self.inner.borrow().element(el).ok().map(|e| e.tag.clone())
    }

    /// Give `el` a document-wide id, replacing any previous one.
    ///
    /// # Errors
    /// Returns [`DomError::MissingElement`] if `el` is not on the page.
    pub fn set_id(&self, el: ElementId, id: &str) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        let previous = inner.element_mut(el)?.id.replace(id.to_string());
        if let Some(previous) = previous {
            inner.ids.remove(&previous);
        }
        inner.ids.insert(id.to_string(), el);
        Ok(())
    }

    pub fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.inner.borrow().ids.get(id).copied()
    }

    /// # Errors
    /// Returns [`DomError::MissingElement`] if either element is missing.
    pub fn append_child(&self, parent: ElementId, child: ElementId) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        inner.element(parent)?;
        let old_parent = inner.element_mut(child)?.parent.replace(parent);
        if let Some(old_parent) = old_parent
            && let Ok(old) = inner.element_mut(old_parent)
        {
            old.children.retain(|c| *c != child);
        }
        inner.element_mut(parent)?.children.push(child);
        Ok(())
    }

    pub fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.inner.borrow().element(el).ok().and_then(|e| e.parent)
    }

    /// Remove `el` and its subtree along with every listener targeting them.
    ///
    /// # Errors
    /// Returns [`DomError::MissingElement`] if `el` is not on the page.
    pub fn remove_element(&self, el: ElementId) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        let parent = inner.element(el)?.parent;
        if let Some(parent) = parent
            && let Ok(parent) = inner.element_mut(parent)
        {
            parent.children.retain(|c| *c != el);
        }

        let mut stack = vec![el];
        while let Some(next) = stack.pop() {
            let removed = inner.elements.remove(next.key);
            if let Some(id) = removed.id {
                inner.ids.remove(&id);
            }
            stack.extend(removed.children);
            inner.listeners.retain(|_, l| l.target != next);
        }
        Ok(())
    }

    /// # Errors
    /// Returns [`DomError::MissingElement`] if `el` is not on the page.
    pub fn add_class(&self, el: ElementId, class: &str) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        let element = inner.element_mut(el)?;
        if !element.classes.iter().any(|c| c == class) {
            element.classes.push(class.to_string());
        }
        Ok(())
    }

    pub fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.inner
            .borrow()
            .element(el)
            .is_ok_and(|e| e.classes.iter().any(|c| c == class))
    }

    /// First descendant of `root` (depth first, document order) carrying
    /// `class`. `root` itself is not considered.
    pub fn find_by_class(&self, root: ElementId, class: &str) -> Option<ElementId> {
        let inner = self.inner.borrow();
        let mut stack: Vec<ElementId> =
            inner.element(root).ok()?.children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            let element = inner.element(next).ok()?;
            if element.classes.iter().any(|c| c == class) {
                return Some(next);
            }
            stack.extend(element.children.iter().rev().copied());
        }
        None
    }

    pub fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.inner
            .borrow()
            .element(el)
            .ok()
            .and_then(|e| e.attributes.get(name).cloned())
    }

    /// # Errors
    /// Returns [`DomError::MissingElement`] if `el` is not on the page.
    pub fn set_attribute(&self, el: ElementId, name: &str, value: &str) -> Result<(), DomError> {
        self.inner
            .borrow_mut()
            .element_mut(el)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    /// # Errors
    /// Returns [`DomError::MissingElement`] if `el` is not on the page.
    pub fn remove_attribute(&self, el: ElementId, name: &str) -> Result<(), DomError> {
        self.inner
            .borrow_mut()
            .element_mut(el)?
            .attributes
            .remove(name);
        Ok(())
    }

    /// Current form value of `el`.
    pub fn value(&self, el: ElementId) -> Option<String> {
        self.inner.borrow().element(el).ok().map(|e| e.value.clone())
    }

    /// Replace the form value of `el`.
    ///
    /// # Errors
    /// Returns [`DomError::MissingElement`] if `el` is not on the page.
    pub fn set_value(&self, el: ElementId, value: &str) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        let element = inner.element_mut(el)?;
        value.clone_into(&mut element.value);
        element.value_writes += 1;
        Ok(())
    }

    /// How many times the value of `el` has been written.
    pub fn value_writes(&self, el: ElementId) -> usize {
        self.inner.borrow().element(el).map_or(0, |e| e.value_writes)
    }

    /// Hand out a namespace token nobody else on this page holds.
    pub fn next_namespace(&self) -> Namespace {
        let mut inner = self.inner.borrow_mut();
        inner.next_namespace += 1;
        Namespace(inner.next_namespace)
    }

    /// Attach `handler` to `kind` events on `target` under `namespace`.
    ///
    /// # Errors
    /// Returns [`DomError::MissingElement`] if `target` is not on the page.
    pub fn listen(
        &self,
        target: ElementId,
        kind: EventKind,
        namespace: Namespace,
        handler: impl Fn(&Self, EventKind) + 'static,
    ) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        inner.element(target)?;
        inner.listeners.insert(Listener {
            target,
            kind,
            namespace,
            handler: Rc::new(handler),
        });
        Ok(())
    }

    /// Detach every listener on `target` registered under `namespace`.
    /// Returns how many were removed.
    pub fn unlisten_namespace(&self, target: ElementId, namespace: Namespace) -> usize {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner
            .listeners
            .retain(|_, l| !(l.target == target && l.namespace == namespace));
        before - inner.listeners.len()
    }

    /// Number of listeners anywhere on the page under `namespace`.
    pub fn listener_count(&self, namespace: Namespace) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|(_, l)| l.namespace == namespace)
            .count()
    }

    pub fn total_listeners(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Fire `kind` on `target`, running every matching handler in
    /// registration order. Returns the number of handlers run.
    pub fn dispatch(&self, target: ElementId, kind: EventKind) -> usize {
        let handlers: Vec<Handler> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|(_, l)| l.target == target && l.kind == kind)
            .map(|(_, l)| Rc::clone(&l.handler))
            .collect();
        // The borrow is released here so handlers can write to the page.
        for handler in &handlers {
            handler(self, kind);
        }
        handlers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_element_by_id_follows_renames() {
        let page = Page::new();
        let field = page.create_element("textarea");
        page.set_id(field, "body").unwrap();
        assert_eq!(page.element_by_id("body"), Some(field));

        page.set_id(field, "summary").unwrap();
        assert_eq!(page.element_by_id("body"), None);
        assert_eq!(page.element_by_id("summary"), Some(field));
    }

    #[test]
    fn test_find_by_class_searches_descendants_in_document_order() {
        let page = Page::new();
        let root = page.create_element("div");
        let first = page.create_element("div");
        let nested = page.create_element("div");
        let second = page.create_element("div");
        page.append_child(root, first).unwrap();
        page.append_child(first, nested).unwrap();
        page.append_child(root, second).unwrap();
        page.add_class(root, "area").unwrap();
        page.add_class(nested, "area").unwrap();
        page.add_class(second, "area").unwrap();

        assert_eq!(page.find_by_class(root, "area"), Some(nested));
        assert_eq!(page.find_by_class(root, "missing"), None);
    }

    #[test]
    fn test_remove_element_drops_subtree_ids_and_listeners() {
        let page = Page::new();
        let root = page.create_element("div");
        let child = page.create_element("div");
        page.append_child(root, child).unwrap();
        page.set_id(child, "child").unwrap();
        let ns = page.next_namespace();
        page.listen(child, EventKind::Click, ns, |_, _| {}).unwrap();

        page.remove_element(root).unwrap();
        assert!(!page.contains(child));
        assert_eq!(page.element_by_id("child"), None);
        assert_eq!(page.listener_count(ns), 0);
    }

    #[test]
    fn test_unlisten_namespace_leaves_other_namespaces_alone() {
        let page = Page::new();
        let target = page.create_element("div");
        let a = page.next_namespace();
        let b = page.next_namespace();
        assert_ne!(a, b);

        page.listen(target, EventKind::KeyUp, a, |_, _| {}).unwrap();
        page.listen(target, EventKind::Click, a, |_, _| {}).unwrap();
        page.listen(target, EventKind::KeyUp, b, |_, _| {}).unwrap();

        assert_eq!(page.unlisten_namespace(target, a), 2);
        assert_eq!(page.listener_count(a), 0);
        assert_eq!(page.listener_count(b), 1);
    }

    #[test]
    fn test_reused_slot_does_not_revive_removed_element() {
        let page = Page::new();
        let field = page.create_element("textarea");
        page.set_value(field, "old").unwrap();
        page.remove_element(field).unwrap();

        let other = page.create_element("input");
        assert_ne!(other, field);
        assert!(!page.contains(field));
        assert!(page.contains(other));
        assert_eq!(page.tag(field), None);
        assert_eq!(page.tag(other).as_deref(), Some("input"));
        assert_eq!(page.set_value(field, "stale"), Err(DomError::MissingElement(field)));
        assert_eq!(page.value(other).as_deref(), Some(""));
        assert_eq!(page.value_writes(other), 0);
    }

    #[test]
    fn test_listen_on_missing_element_fails() {
        let page = Page::new();
        let el = page.create_element("div");
        page.remove_element(el).unwrap();
        let err = page
            .listen(el, EventKind::Click, page.next_namespace(), |_, _| {})
            .unwrap_err();
        assert_eq!(err, DomError::MissingElement(el));
    }

    #[test]
    fn test_dispatch_runs_matching_handlers_which_may_write_to_the_page() {
        let page = Page::new();
        let target = page.create_element("div");
        let field = page.create_element("input");
        let ns = page.next_namespace();
        let clicks = Rc::new(Cell::new(0));
        let seen = Rc::clone(&clicks);
        page.listen(target, EventKind::Click, ns, move |page, kind| {
            seen.set(seen.get() + 1);
            page.set_value(field, kind.as_str()).unwrap();
        })
        .unwrap();

        assert_eq!(page.dispatch(target, EventKind::KeyUp), 0);
        assert_eq!(page.dispatch(target, EventKind::Click), 1);
        assert_eq!(clicks.get(), 1);
        assert_eq!(page.value(field).as_deref(), Some("click"));
        assert_eq!(page.value_writes(field), 1);
    }

    #[test]
    fn test_namespace_display_is_prefixed() {
        let page = Page::new();
        assert_eq!(page.next_namespace().to_string(), "inkmount1");
        assert_eq!(page.next_namespace().to_string(), "inkmount2");
    }
}
