mod config;
mod error;
mod handlers;
mod ingest;
pub mod dom;
pub mod file_utils;
pub mod mime_utils;

pub use config::{
    default_drag_classes, Callback, ClassNames, DragState, IngestConfig, IngestOptions, TargetRef,
    DEFAULT_EVENT_PREFIX,
};
pub use dom::{DataTransfer, DataTransferItem, DomError, Document, DropEffect, Element, Event, Listener};
pub use error::IngestError;
pub use file_utils::{IngestFile, IngestResult};
pub use handlers::{CHANGE, DRAGENTER, DRAGLEAVE, DRAGOVER, DROP, PASTE};
pub use ingest::FileIngest;
pub use mime_utils::{AcceptTable, Subtypes};
