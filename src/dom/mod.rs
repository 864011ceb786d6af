mod event;
mod selector;

pub use event::{DataTransfer, DataTransferItem, DropEffect, Event, EventDetail};

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use thiserror::Error;

use crate::file_utils::IngestFile;

pub(crate) const DOCUMENT_TAG: &str = "#document";

/// Registration and removal compare listeners by `Rc` identity.
pub type Listener = Rc<dyn Fn(&mut Event)>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("HierarchyRequestError: cannot append {child} under itself or its descendant {parent}")]
    HierarchyRequest { parent: String, child: String },
}

struct Node {
    tag: String,
    attributes: RefCell<BTreeMap<String, String>>,
    classes: RefCell<Vec<String>>,
    files: RefCell<Option<Vec<IngestFile>>>,
    parent: RefCell<Weak<Node>>,
    children: RefCell<Vec<Element>>,
    listeners: RefCell<Vec<(String, Listener)>>,
}

#[derive(Clone)]
pub struct Element(Rc<Node>);

impl Element {
    pub fn new(tag: &str) -> Self {
        Element(Rc::new(Node {
            tag: tag.to_ascii_lowercase(),
            attributes: RefCell::new(BTreeMap::new()),
            classes: RefCell::new(Vec::new()),
            files: RefCell::new(None),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
        }))
    }

    pub fn tag_name(&self) -> &str {
        &self.0.tag
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        if name == "class" {
            let classes = self.0.classes.borrow();
            return (!classes.is_empty()).then(|| classes.join(" "));
        }
        self.0.attributes.borrow().get(name).cloned()
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        if name == "class" {
            *self.0.classes.borrow_mut() = Vec::new();
            self.add_classes(value.split_whitespace());
            return;
        }
        self.0
            .attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attribute(&self, name: &str) {
        if name == "class" {
            self.0.classes.borrow_mut().clear();
            return;
        }
        self.0.attributes.borrow_mut().remove(name);
    }

    pub fn attributes(&self) -> Vec<(String, String)> {
        let mut attributes: Vec<_> = self
            .0
            .attributes
            .borrow()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        if let Some(classes) = self.get_attribute("class") {
            attributes.push(("class".to_string(), classes));
        }
        attributes
    }

    pub fn add_classes<I, S>(&self, classes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = self.0.classes.borrow_mut();
        for class in classes {
            let class = class.as_ref();
            if !list.iter().any(|existing| existing == class) {
                list.push(class.to_string());
            }
        }
    }

    pub fn remove_classes<I, S>(&self, classes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = self.0.classes.borrow_mut();
        for class in classes {
            list.retain(|existing| existing != class.as_ref());
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.classes.borrow().iter().any(|existing| existing == class)
    }

    pub fn class_names(&self) -> Vec<String> {
        self.0.classes.borrow().clone()
    }

    pub fn set_files(&self, files: Vec<IngestFile>) {
        *self.0.files.borrow_mut() = Some(files);
    }

    pub fn files(&self) -> Option<Vec<IngestFile>> {
        self.0.files.borrow().clone()
    }

    pub fn append_child(&self, child: &Element) -> Result<(), DomError> {
        if self == child || self.is_descendant_of(child) {
            return Err(DomError::HierarchyRequest {
                parent: format!("{:?}", self),
                child: format!("{:?}", child),
            });
        }
        self.attach(child);
        Ok(())
    }

    fn attach(&self, child: &Element) {
        if let Some(old_parent) = child.parent() {
            old_parent
                .0
                .children
                .borrow_mut()
                .retain(|existing| existing != child);
        }
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        self.0.children.borrow_mut().push(child.clone());
    }

    pub fn parent(&self) -> Option<Element> {
        self.0.parent.borrow().upgrade().map(Element)
    }

    pub fn children(&self) -> Vec<Element> {
        self.0.children.borrow().clone()
    }

    pub fn is_descendant_of(&self, ancestor: &Element) -> bool {
        let mut current = self.parent();
        while let Some(node) = current {
            if &node == ancestor {
                return true;
            }
            current = node.parent();
        }
        false
    }

    fn root(&self) -> Element {
        let mut root = self.clone();
        while let Some(parent) = root.parent() {
            root = parent;
        }
        root
    }

    pub fn matches(&self, selector: &str) -> bool {
        selector::select(self, selector).contains(self)
    }

    pub fn query_selector(&self, selector: &str) -> Option<Element> {
        selector::select(self, selector)
            .into_iter()
            .find(|found| found.is_descendant_of(self))
    }

    pub fn add_event_listener(&self, kind: &str, listener: &Listener) {
        if !self.has_event_listener(kind, listener) {
            self.0
                .listeners
                .borrow_mut()
                .push((kind.to_string(), Rc::clone(listener)));
        }
    }

    pub fn remove_event_listener(&self, kind: &str, listener: &Listener) {
        self.0
            .listeners
            .borrow_mut()
            .retain(|(existing_kind, existing)| !(existing_kind == kind && Rc::ptr_eq(existing, listener)));
    }

    pub fn has_event_listener(&self, kind: &str, listener: &Listener) -> bool {
        self.0
            .listeners
            .borrow()
            .iter()
            .any(|(existing_kind, existing)| existing_kind == kind && Rc::ptr_eq(existing, listener))
    }

    pub fn listener_count(&self, kind: &str) -> usize {
        self.0
            .listeners
            .borrow()
            .iter()
            .filter(|(existing_kind, _)| existing_kind == kind)
            .count()
    }

    pub fn dispatch_event(&self, event: &mut Event) -> bool {
        event.set_target(self.clone());

        let mut current = Some(self.clone());
        while let Some(node) = current {
            let listeners: Vec<Listener> = node
                .0
                .listeners
                .borrow()
                .iter()
                .filter(|(kind, _)| kind == event.kind())
                .map(|(_, listener)| Rc::clone(listener))
                .collect();

            event.set_current_target(Some(node.clone()));
            for listener in listeners {
                // removed by an earlier listener of this dispatch
                if !node.has_event_listener(event.kind(), &listener) {
                    continue;
                }
                listener(event);
            }

            current = if event.bubbles() { node.parent() } else { None };
        }
        event.set_current_target(None);

        !event.default_prevented()
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Element");
        out.field("tag", &self.0.tag);
        if let Some(id) = self.get_attribute("id") {
            out.field("id", &id);
        }
        out.field("classes", &*self.0.classes.borrow()).finish()
    }
}

#[derive(Clone, Debug)]
pub struct Document {
    node: Element,
    root: Element,
    body: Element,
}

impl Document {
    pub fn new() -> Self {
        let node = Element::new(DOCUMENT_TAG);
        let root = Element::new("html");
        let body = Element::new("body");
        node.attach(&root);
        root.attach(&body);
        Self { node, root, body }
    }

    pub fn document_element(&self) -> &Element {
        &self.root
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    pub fn create_element(&self, tag: &str) -> Element {
        Element::new(tag)
    }

    pub fn query_selector(&self, selector: &str) -> Option<Element> {
        self.node.query_selector(selector)
    }

    pub fn add_event_listener(&self, kind: &str, listener: &Listener) {
        self.node.add_event_listener(kind, listener);
    }

    pub fn remove_event_listener(&self, kind: &str, listener: &Listener) {
        self.node.remove_event_listener(kind, listener);
    }

    pub fn listener_count(&self, kind: &str) -> usize {
        self.node.listener_count(kind)
    }

    pub fn dispatch_event(&self, event: &mut Event) -> bool {
        self.node.dispatch_event(event)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
