use std::rc::Rc;

use log::{debug, info};

use crate::config::{IngestConfig, IngestOptions, TargetRef};
use crate::dom::{Document, Element, Event, Listener};
use crate::error::IngestError;
use crate::file_utils::{IngestFile, IngestResult};
use crate::handlers::{IngestState, CHANGE, DRAGENTER, DRAGLEAVE, DRAGOVER, DROP, PASTE};
use crate::mime_utils::AcceptTable;

struct Listeners {
    dragenter: Listener,
    dragover: Listener,
    dragleave: Listener,
    drop: Listener,
    change: Listener,
    paste: Listener,
}

impl Listeners {
    fn bind(state: &Rc<IngestState>) -> Self {
        let bind = |handler: fn(&IngestState, &mut Event)| -> Listener {
            let state = Rc::clone(state);
            Rc::new(move |event: &mut Event| handler(&state, event))
        };
        Self {
            dragenter: bind(IngestState::dragenter),
            dragover: bind(IngestState::dragover),
            dragleave: bind(IngestState::dragleave),
            drop: bind(IngestState::drop),
            change: bind(IngestState::change),
            paste: bind(IngestState::paste),
        }
    }

    fn drop_family(&self) -> [(&'static str, &Listener); 4] {
        [
            (DRAGENTER, &self.dragenter),
            (DRAGOVER, &self.dragover),
            (DRAGLEAVE, &self.dragleave),
            (DROP, &self.drop),
        ]
    }
}

/// Listeners keep the state alive until `destroy`; dropping the handle does not detach them.
pub struct FileIngest {
    document: Document,
    state: Rc<IngestState>,
    listeners: Listeners,
}

impl FileIngest {
    pub fn new(document: &Document, options: IngestOptions) -> Result<Self, IngestError> {
        let target = match &options.target {
            Some(target) => resolve(document, target).ok_or_else(|| IngestError::TargetNotFound {
                selector: describe(target),
            })?,
            None => document.document_element().clone(),
        };

        let event_target = match &options.event_target {
            Some(event_target) => {
                resolve(document, event_target).ok_or_else(|| IngestError::EventTargetNotFound {
                    selector: describe(event_target),
                })?
            }
            None => target.clone(),
        };

        let config = options.canonicalize();
        let accept = AcceptTable::parse(&config.accept);
        debug!("Accept table for {:?}: {}", config.accept, accept);

        let state = Rc::new(IngestState {
            config,
            accept,
            target,
            event_target,
        });
        let ingest = Self {
            document: document.clone(),
            listeners: Listeners::bind(&state),
            state,
        };

        if ingest.state.config.paste {
            ingest.register_paste_handler();
        }
        if ingest.state.config.drop {
            ingest.register_drop_handler();
        }
        if ingest.state.config.change {
            ingest.register_change_handler();
        }

        info!(
            "File ingest attached to {:?} (paste: {}, drop: {}, change: {})",
            ingest.state.target, ingest.state.config.paste, ingest.state.config.drop, ingest.state.config.change
        );
        Ok(ingest)
    }

    pub fn target(&self) -> &Element {
        &self.state.target
    }

    pub fn event_target(&self) -> &Element {
        &self.state.event_target
    }

    pub fn accept_table(&self) -> &AcceptTable {
        &self.state.accept
    }

    pub fn config(&self) -> &IngestConfig {
        &self.state.config
    }

    pub fn register_paste_handler(&self) {
        self.document.add_event_listener(PASTE, &self.listeners.paste);
    }

    pub fn unregister_paste_handler(&self) {
        self.document.remove_event_listener(PASTE, &self.listeners.paste);
    }

    pub fn register_drop_handler(&self) {
        for (kind, listener) in self.listeners.drop_family() {
            self.state.target.add_event_listener(kind, listener);
        }
    }

    pub fn unregister_drop_handler(&self) {
        for (kind, listener) in self.listeners.drop_family() {
            self.state.target.remove_event_listener(kind, listener);
        }
    }

    pub fn register_change_handler(&self) {
        self.state.target.add_event_listener(CHANGE, &self.listeners.change);
    }

    pub fn unregister_change_handler(&self) {
        self.state.target.remove_event_listener(CHANGE, &self.listeners.change);
    }

    pub fn handle_files<I>(&self, files: I) -> Option<IngestResult>
    where
        I: IntoIterator<Item = IngestFile>,
    {
        self.state.handle_files(files.into_iter().collect())
    }

    pub fn destroy(&self) {
        let config = &self.state.config;
        if config.paste {
            self.unregister_paste_handler();
        }
        if config.drop {
            self.unregister_drop_handler();
        }
        if config.change {
            self.unregister_change_handler();
        }
        debug!("File ingest detached from {:?}", self.state.target);
    }
}

fn resolve(document: &Document, target: &TargetRef) -> Option<Element> {
    match target {
        TargetRef::Selector(selector) => document.query_selector(selector),
        TargetRef::Element(element) => Some(element.clone()),
    }
}

fn describe(target: &TargetRef) -> String {
    match target {
        TargetRef::Selector(selector) => selector.clone(),
        TargetRef::Element(element) => format!("{:?}", element),
    }
}
