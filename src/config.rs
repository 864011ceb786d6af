use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Deserializer};

use crate::dom::Element;
use crate::error::IngestError;
use crate::file_utils::IngestResult;
use crate::mime_utils::ACCEPT_ALL;

pub const DEFAULT_EVENT_PREFIX: &str = "file-ingest";

pub type Callback = Rc<dyn Fn(&IngestResult)>;

#[derive(Debug, Clone, PartialEq)]
pub enum TargetRef {
    Selector(String),
    Element(Element),
}

impl From<&str> for TargetRef {
    fn from(selector: &str) -> Self {
        TargetRef::Selector(selector.to_string())
    }
}

impl From<String> for TargetRef {
    fn from(selector: String) -> Self {
        TargetRef::Selector(selector)
    }
}

impl From<Element> for TargetRef {
    fn from(element: Element) -> Self {
        TargetRef::Element(element)
    }
}

impl From<&Element> for TargetRef {
    fn from(element: &Element) -> Self {
        TargetRef::Element(element.clone())
    }
}

impl<'de> Deserialize<'de> for TargetRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(TargetRef::Selector)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ClassNames {
    One(String),
    Many(Vec<String>),
}

impl ClassNames {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            ClassNames::One(class) => vec![class],
            ClassNames::Many(classes) => classes,
        }
    }
}

impl From<&str> for ClassNames {
    fn from(class: &str) -> Self {
        ClassNames::One(class.to_string())
    }
}

impl From<Vec<&str>> for ClassNames {
    fn from(classes: Vec<&str>) -> Self {
        ClassNames::Many(classes.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DragState {
    DragEnter,
    DragOver,
    DragLeave,
    Drop,
}

impl DragState {
    pub const ALL: [DragState; 4] = [
        DragState::DragOver,
        DragState::DragEnter,
        DragState::DragLeave,
        DragState::Drop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DragState::DragEnter => "dragenter",
            DragState::DragOver => "dragover",
            DragState::DragLeave => "dragleave",
            DragState::Drop => "drop",
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IngestOptions {
    pub target: Option<TargetRef>,
    pub accept: String,
    pub paste: bool,
    pub drop: bool,
    pub change: bool,
    pub drag_classes: BTreeMap<String, ClassNames>,
    pub prevent_default: bool,
    pub apply_drag_classes: bool,
    pub ignore_paste_on_input: bool,
    pub event_prefix: String,
    pub event_target: Option<TargetRef>,
    #[serde(skip)]
    pub callback: Option<Callback>,
    pub include_rejected_files: bool,
    pub emit_when_empty: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            target: None,
            accept: ACCEPT_ALL.to_string(),
            paste: true,
            drop: true,
            change: true,
            drag_classes: default_drag_classes(),
            prevent_default: true,
            apply_drag_classes: true,
            ignore_paste_on_input: true,
            event_prefix: DEFAULT_EVENT_PREFIX.to_string(),
            event_target: None,
            callback: None,
            include_rejected_files: false,
            emit_when_empty: false,
        }
    }
}

pub fn default_drag_classes() -> BTreeMap<String, ClassNames> {
    DragState::ALL
        .iter()
        .map(|state| {
            let class = format!("{}-{}", DEFAULT_EVENT_PREFIX, state.as_str());
            (state.as_str().to_string(), ClassNames::One(class))
        })
        .collect()
}

impl IngestOptions {
    /// Present keys replace defaults wholesale, `dragClasses` included.
    pub fn from_json(json: &str) -> Result<Self, IngestError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&IngestResult) + 'static,
    {
        self.callback = Some(Rc::new(callback));
        self
    }

    pub(crate) fn canonicalize(self) -> IngestConfig {
        IngestConfig {
            accept: self.accept,
            paste: self.paste,
            drop: self.drop,
            change: self.change,
            drag_classes: self
                .drag_classes
                .into_iter()
                .map(|(state, classes)| (state, classes.into_vec()))
                .collect(),
            prevent_default: self.prevent_default,
            apply_drag_classes: self.apply_drag_classes,
            ignore_paste_on_input: self.ignore_paste_on_input,
            event_prefix: self.event_prefix,
            callback: self.callback,
            include_rejected_files: self.include_rejected_files,
            emit_when_empty: self.emit_when_empty,
        }
    }
}

impl fmt::Debug for IngestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestOptions")
            .field("target", &self.target)
            .field("accept", &self.accept)
            .field("paste", &self.paste)
            .field("drop", &self.drop)
            .field("change", &self.change)
            .field("drag_classes", &self.drag_classes)
            .field("prevent_default", &self.prevent_default)
            .field("apply_drag_classes", &self.apply_drag_classes)
            .field("ignore_paste_on_input", &self.ignore_paste_on_input)
            .field("event_prefix", &self.event_prefix)
            .field("event_target", &self.event_target)
            .field("callback", &self.callback.is_some())
            .field("include_rejected_files", &self.include_rejected_files)
            .field("emit_when_empty", &self.emit_when_empty)
            .finish()
    }
}

#[derive(Clone)]
pub struct IngestConfig {
    pub accept: String,
    pub paste: bool,
    pub drop: bool,
    pub change: bool,
    pub drag_classes: BTreeMap<String, Vec<String>>,
    pub prevent_default: bool,
    pub apply_drag_classes: bool,
    pub ignore_paste_on_input: bool,
    pub event_prefix: String,
    pub callback: Option<Callback>,
    pub include_rejected_files: bool,
    pub emit_when_empty: bool,
}

impl IngestConfig {
    pub fn classes(&self, state: DragState) -> &[String] {
        self.drag_classes
            .get(state.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn event_name(&self) -> String {
        format!("{}:files", self.event_prefix)
    }
}

impl fmt::Debug for IngestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestConfig")
            .field("accept", &self.accept)
            .field("paste", &self.paste)
            .field("drop", &self.drop)
            .field("change", &self.change)
            .field("drag_classes", &self.drag_classes)
            .field("prevent_default", &self.prevent_default)
            .field("apply_drag_classes", &self.apply_drag_classes)
            .field("ignore_paste_on_input", &self.ignore_paste_on_input)
            .field("event_prefix", &self.event_prefix)
            .field("callback", &self.callback.is_some())
            .field("include_rejected_files", &self.include_rejected_files)
            .field("emit_when_empty", &self.emit_when_empty)
            .finish()
    }
}
