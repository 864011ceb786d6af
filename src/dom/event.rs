use std::fmt;

use super::Element;
use crate::file_utils::{IngestFile, IngestResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DropEffect {
    #[default]
    None,
    Copy,
    Link,
    Move,
}

impl fmt::Display for DropEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DropEffect::None => "none",
            DropEffect::Copy => "copy",
            DropEffect::Link => "link",
            DropEffect::Move => "move",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ItemKind {
    File(IngestFile),
    String { mime_type: String, data: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTransferItem {
    kind: ItemKind,
}

impl DataTransferItem {
    pub fn file(file: IngestFile) -> Self {
        Self { kind: ItemKind::File(file) }
    }

    pub fn string(mime_type: &str, data: &str) -> Self {
        Self {
            kind: ItemKind::String {
                mime_type: mime_type.to_string(),
                data: data.to_string(),
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self.kind {
            ItemKind::File(_) => "file",
            ItemKind::String { .. } => "string",
        }
    }

    pub fn get_as_file(&self) -> Option<IngestFile> {
        match &self.kind {
            ItemKind::File(file) => Some(file.clone()),
            ItemKind::String { .. } => None,
        }
    }

    pub fn string_data(&self) -> Option<(&str, &str)> {
        match &self.kind {
            ItemKind::String { mime_type, data } => Some((mime_type.as_str(), data.as_str())),
            ItemKind::File(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTransfer {
    drop_effect: DropEffect,
    items: Vec<DataTransferItem>,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(files: impl IntoIterator<Item = IngestFile>) -> Self {
        Self {
            drop_effect: DropEffect::None,
            items: files.into_iter().map(DataTransferItem::file).collect(),
        }
    }

    pub fn push_item(&mut self, item: DataTransferItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[DataTransferItem] {
        &self.items
    }

    pub fn files(&self) -> Vec<IngestFile> {
        self.items.iter().filter_map(DataTransferItem::get_as_file).collect()
    }

    pub fn drop_effect(&self) -> DropEffect {
        self.drop_effect
    }

    pub fn set_drop_effect(&mut self, effect: DropEffect) {
        self.drop_effect = effect;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDetail {
    None,
    Transfer(DataTransfer),
    Ingest(IngestResult),
}

#[derive(Debug, Clone)]
pub struct Event {
    kind: String,
    bubbles: bool,
    default_prevented: bool,
    target: Option<Element>,
    current_target: Option<Element>,
    detail: EventDetail,
}

impl Event {
    pub fn new(kind: impl Into<String>, bubbles: bool, detail: EventDetail) -> Self {
        Self {
            kind: kind.into(),
            bubbles,
            default_prevented: false,
            target: None,
            current_target: None,
            detail,
        }
    }

    pub fn drag(kind: &str, data: DataTransfer) -> Self {
        Self::new(kind, true, EventDetail::Transfer(data))
    }

    pub fn drop(data: DataTransfer) -> Self {
        Self::drag("drop", data)
    }

    pub fn paste(clipboard: DataTransfer) -> Self {
        Self::new("paste", true, EventDetail::Transfer(clipboard))
    }

    pub fn change() -> Self {
        Self::new("change", true, EventDetail::None)
    }

    pub fn custom(kind: impl Into<String>, detail: IngestResult) -> Self {
        Self::new(kind, false, EventDetail::Ingest(detail))
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn target(&self) -> Option<&Element> {
        self.target.as_ref()
    }

    pub fn current_target(&self) -> Option<&Element> {
        self.current_target.as_ref()
    }

    pub(super) fn set_target(&mut self, target: Element) {
        self.target = Some(target);
    }

    pub(super) fn set_current_target(&mut self, target: Option<Element>) {
        self.current_target = target;
    }

    pub fn detail(&self) -> &EventDetail {
        &self.detail
    }

    pub fn data_transfer(&self) -> Option<&DataTransfer> {
        match &self.detail {
            EventDetail::Transfer(data) => Some(data),
            _ => None,
        }
    }

    pub fn data_transfer_mut(&mut self) -> Option<&mut DataTransfer> {
        match &mut self.detail {
            EventDetail::Transfer(data) => Some(data),
            _ => None,
        }
    }

    pub fn ingest_result(&self) -> Option<&IngestResult> {
        match &self.detail {
            EventDetail::Ingest(result) => Some(result),
            _ => None,
        }
    }
}
