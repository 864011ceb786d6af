use log::{debug, trace};

use crate::config::{DragState, IngestConfig};
use crate::dom::{DataTransfer, DataTransferItem, DropEffect, Element, Event};
use crate::file_utils::{IngestFile, IngestResult};
use crate::mime_utils::AcceptTable;

pub const PASTE: &str = "paste";
pub const DRAGENTER: &str = "dragenter";
pub const DRAGOVER: &str = "dragover";
pub const DRAGLEAVE: &str = "dragleave";
pub const DROP: &str = "drop";
pub const CHANGE: &str = "change";

const TEXT_FIELDS: &str = "input, textarea";

pub(crate) struct IngestState {
    pub(crate) config: IngestConfig,
    pub(crate) accept: AcceptTable,
    pub(crate) target: Element,
    pub(crate) event_target: Element,
}

impl IngestState {
    fn prevent_default(&self, event: &mut Event) {
        if self.config.prevent_default {
            event.prevent_default();
        }
    }

    fn clear_drag_classes(&self) {
        if self.config.apply_drag_classes {
            self.target.remove_classes(self.config.classes(DragState::DragEnter));
            self.target.remove_classes(self.config.classes(DragState::DragOver));
        }
    }

    pub(crate) fn dragenter(&self, event: &mut Event) {
        self.prevent_default(event);
        // entering paints the drop-state classes, not the dragenter ones
        if self.config.apply_drag_classes {
            self.target.add_classes(self.config.classes(DragState::Drop));
        }
    }

    pub(crate) fn dragover(&self, event: &mut Event) {
        self.prevent_default(event);
        if let Some(data) = event.data_transfer_mut() {
            data.set_drop_effect(DropEffect::Copy);
        }
        if self.config.apply_drag_classes {
            self.target.add_classes(self.config.classes(DragState::DragOver));
        }
    }

    pub(crate) fn dragleave(&self, event: &mut Event) {
        self.prevent_default(event);
        self.clear_drag_classes();
    }

    pub(crate) fn drop(&self, event: &mut Event) {
        self.prevent_default(event);
        self.clear_drag_classes();

        let files = event.data_transfer().map(DataTransfer::files).unwrap_or_default();
        if !files.is_empty() {
            self.handle_files(files);
        }
    }

    pub(crate) fn change(&self, event: &mut Event) {
        let Some(input) = event.target().cloned() else {
            return;
        };
        if input.get_attribute("type").as_deref() != Some("file") {
            trace!("Ignoring change from non-file element {:?}", input);
            return;
        }
        let Some(files) = input.files() else {
            return;
        };

        self.prevent_default(event);
        if !files.is_empty() {
            self.handle_files(files);
        }
    }

    pub(crate) fn paste(&self, event: &mut Event) {
        if self.config.ignore_paste_on_input {
            if let Some(origin) = event.target() {
                if is_text_field(origin) {
                    trace!("Leaving paste into {:?} to the browser", origin);
                    return;
                }
            }
        }

        self.prevent_default(event);

        let files: Vec<IngestFile> = event
            .data_transfer()
            .map(|clipboard| {
                clipboard
                    .items()
                    .iter()
                    .filter(|item| item.kind() == "file")
                    .filter_map(DataTransferItem::get_as_file)
                    .collect()
            })
            .unwrap_or_default();

        if !files.is_empty() {
            self.handle_files(files);
        }
    }

    // event first, then callback
    pub(crate) fn handle_files(&self, files: Vec<IngestFile>) -> Option<IngestResult> {
        let count = files.len();
        let mut result = self.accept.classify(files);

        if result.is_empty() && !self.config.emit_when_empty {
            debug!("No accepted files among {}, nothing emitted", count);
            return None;
        }

        if !self.config.include_rejected_files {
            result = result.without_rejected();
        }

        let name = self.config.event_name();
        debug!(
            "Emitting {} with {} of {} files accepted",
            name,
            result.files.len(),
            count
        );
        self.event_target
            .dispatch_event(&mut Event::custom(name, result.clone()));

        if let Some(callback) = &self.config.callback {
            callback(&result);
        }

        Some(result)
    }
}

fn is_text_field(element: &Element) -> bool {
    element.matches(TEXT_FIELDS) || element.get_attribute("contenteditable").as_deref() == Some("true")
}
