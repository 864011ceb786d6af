use std::cell::RefCell;
use std::rc::Rc;

use file_ingest::{
    DataTransfer, DataTransferItem, Document, Element, Event, FileIngest, IngestFile, IngestOptions,
    IngestResult, Listener,
};

#[cfg(test)]
fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct Page {
    document: Document,
    zone: Element,
    input: Element,
    text: Element,
}

fn build_page() -> Page {
    let document = Document::new();
    let zone = document.create_element("div");
    zone.set_attribute("id", "drop-zone");
    let input = document.create_element("input");
    input.set_attribute("type", "file");
    input.set_attribute("id", "picker");
    let text = document.create_element("input");
    text.set_attribute("type", "text");
    zone.append_child(&input).unwrap();
    document.body().append_child(&zone).unwrap();
    document.body().append_child(&text).unwrap();
    Page {
        document,
        zone,
        input,
        text,
    }
}

/// Collects every `<prefix>:files` event dispatched on `element`.
fn record_events(element: &Element, name: &str) -> (Rc<RefCell<Vec<IngestResult>>>, Listener) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let listener: Listener = Rc::new(move |event: &mut Event| {
        if let Some(result) = event.ingest_result() {
            sink.borrow_mut().push(result.clone());
        }
    });
    element.add_event_listener(name, &listener);
    (seen, listener)
}

fn png() -> IngestFile {
    IngestFile::new("photo.png", "image/png", 2048)
}

fn txt() -> IngestFile {
    IngestFile::new("notes.txt", "text/plain", 12)
}

fn on_zone(accept: &str) -> IngestOptions {
    IngestOptions {
        target: Some("#drop-zone".into()),
        accept: accept.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_drop_end_to_end() {
    init_test_logger();
    let page = build_page();
    let (seen, _listener) = record_events(&page.zone, "file-ingest:files");
    let _ingest = FileIngest::new(
        &page.document,
        IngestOptions {
            drop: true,
            change: false,
            paste: false,
            ..on_zone("image/png")
        },
    )
    .unwrap();

    let mut event = Event::drop(DataTransfer::with_files(vec![png(), txt()]));
    let proceed = page.zone.dispatch_event(&mut event);

    assert!(!proceed, "drop default should be suppressed");
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].files, vec![png()]);
    assert_eq!(seen[0].rejected, None);
}

#[test]
fn test_drop_clears_drag_classes() {
    init_test_logger();
    let page = build_page();
    let _ingest = FileIngest::new(&page.document, on_zone("*/*")).unwrap();

    page.zone.add_classes(["file-ingest-dragenter"]);
    page.zone.dispatch_event(&mut Event::drag("dragover", DataTransfer::new()));
    assert!(page.zone.has_class("file-ingest-dragover"));

    page.zone.dispatch_event(&mut Event::drop(DataTransfer::new()));
    assert!(!page.zone.has_class("file-ingest-dragover"));
    assert!(!page.zone.has_class("file-ingest-dragenter"));
}

#[test]
fn test_rejected_files_included_on_request() {
    init_test_logger();
    let page = build_page();
    let (seen, _listener) = record_events(&page.zone, "file-ingest:files");
    let ingest = FileIngest::new(
        &page.document,
        IngestOptions {
            include_rejected_files: true,
            ..on_zone("image/*")
        },
    )
    .unwrap();

    let result = ingest.handle_files(vec![txt(), png()]).unwrap();
    assert_eq!(result.files, vec![png()]);
    assert_eq!(result.rejected, Some(vec![txt()]));
    assert_eq!(seen.borrow().as_slice(), &[result]);
}

#[test]
fn test_rejected_files_never_emitted_by_default() {
    init_test_logger();
    let page = build_page();
    let ingest = FileIngest::new(&page.document, on_zone("image/png")).unwrap();

    let result = ingest.handle_files(vec![png(), txt()]).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert!(json.get("rejected").is_none());
    assert_eq!(json["files"].as_array().unwrap().len(), 1);
}

#[test]
fn test_all_rejected_emits_nothing() {
    init_test_logger();
    let page = build_page();
    let (seen, _listener) = record_events(&page.zone, "file-ingest:files");
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let ingest = FileIngest::new(
        &page.document,
        on_zone("image/png").with_callback(move |_| *counter.borrow_mut() += 1),
    )
    .unwrap();

    assert_eq!(ingest.handle_files(vec![txt()]), None);
    page.zone.dispatch_event(&mut Event::drop(DataTransfer::with_files(vec![txt()])));
    assert!(seen.borrow().is_empty());
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn test_emit_when_empty() {
    init_test_logger();
    let page = build_page();
    let (seen, _listener) = record_events(&page.zone, "file-ingest:files");
    let calls = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&calls);
    let _ingest = FileIngest::new(
        &page.document,
        IngestOptions {
            emit_when_empty: true,
            ..on_zone("image/png")
        }
        .with_callback(move |result| sink.borrow_mut().push(result.clone())),
    )
    .unwrap();

    page.zone.dispatch_event(&mut Event::drop(DataTransfer::with_files(vec![txt()])));
    assert_eq!(seen.borrow().len(), 1);
    assert!(seen.borrow()[0].files.is_empty());
    assert_eq!(*calls.borrow(), *seen.borrow());
}

#[test]
fn test_empty_drop_emits_nothing_even_when_empty_allowed() {
    init_test_logger();
    let page = build_page();
    let (seen, _listener) = record_events(&page.zone, "file-ingest:files");
    let _ingest = FileIngest::new(
        &page.document,
        IngestOptions {
            emit_when_empty: true,
            ..on_zone("*/*")
        },
    )
    .unwrap();

    page.zone.dispatch_event(&mut Event::drop(DataTransfer::new()));
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_change_from_file_input() {
    init_test_logger();
    let page = build_page();
    let (seen, _listener) = record_events(&page.zone, "file-ingest:files");
    let _ingest = FileIngest::new(&page.document, on_zone("image/*, text/plain")).unwrap();

    page.input.set_files(vec![png(), txt()]);
    let mut event = Event::change();
    assert!(!page.input.dispatch_event(&mut event));
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(seen.borrow()[0].files, vec![png(), txt()]);
}

#[test]
fn test_change_ignored_for_non_file_inputs() {
    init_test_logger();
    let page = build_page();
    let (seen, _listener) = record_events(&page.zone, "file-ingest:files");
    let _ingest = FileIngest::new(&page.document, on_zone("*/*")).unwrap();

    let select = page.document.create_element("input");
    select.set_attribute("type", "checkbox");
    select.set_files(vec![png()]);
    page.zone.append_child(&select).unwrap();
    let mut event = Event::change();
    assert!(select.dispatch_event(&mut event), "default must not be suppressed");

    let untyped = page.document.create_element("input");
    page.zone.append_child(&untyped).unwrap();
    untyped.dispatch_event(&mut Event::change());

    // a file input that never carried a list
    let bare = page.document.create_element("input");
    bare.set_attribute("type", "file");
    page.zone.append_child(&bare).unwrap();
    assert!(bare.dispatch_event(&mut Event::change()));

    assert!(seen.borrow().is_empty());
}

#[test]
fn test_paste_collects_file_items_in_order() {
    init_test_logger();
    let page = build_page();
    let (seen, _listener) = record_events(&page.zone, "file-ingest:files");
    let _ingest = FileIngest::new(&page.document, on_zone("*/*")).unwrap();

    let mut clipboard = DataTransfer::new();
    clipboard.push_item(DataTransferItem::file(txt()));
    clipboard.push_item(DataTransferItem::string("text/plain", "hello"));
    clipboard.push_item(DataTransferItem::file(png()));

    let mut event = Event::paste(clipboard);
    assert!(!page.document.body().dispatch_event(&mut event));
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(seen.borrow()[0].files, vec![txt(), png()]);
}

#[test]
fn test_paste_into_text_field_is_left_alone() {
    init_test_logger();
    let page = build_page();
    let (seen, _listener) = record_events(&page.zone, "file-ingest:files");
    let _ingest = FileIngest::new(&page.document, on_zone("*/*")).unwrap();

    let editor = page.document.create_element("div");
    editor.set_attribute("contenteditable", "true");
    page.document.body().append_child(&editor).unwrap();
    let area = page.document.create_element("textarea");
    page.document.body().append_child(&area).unwrap();

    for field in [&page.text, &editor, &area] {
        let mut event = Event::paste(DataTransfer::with_files(vec![png()]));
        assert!(field.dispatch_event(&mut event), "native paste must proceed");
    }
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_paste_into_text_field_when_not_ignored() {
    init_test_logger();
    let page = build_page();
    let (seen, _listener) = record_events(&page.zone, "file-ingest:files");
    let _ingest = FileIngest::new(
        &page.document,
        IngestOptions {
            ignore_paste_on_input: false,
            ..on_zone("*/*")
        },
    )
    .unwrap();

    page.text.dispatch_event(&mut Event::paste(DataTransfer::with_files(vec![png()])));
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_destroy_detaches_everything() {
    init_test_logger();
    let page = build_page();
    let (seen, _listener) = record_events(&page.zone, "file-ingest:files");
    let ingest = FileIngest::new(&page.document, on_zone("*/*")).unwrap();

    ingest.destroy();
    ingest.destroy();

    page.zone.dispatch_event(&mut Event::drop(DataTransfer::with_files(vec![png()])));
    page.document.body().dispatch_event(&mut Event::paste(DataTransfer::with_files(vec![png()])));
    page.input.set_files(vec![png()]);
    page.input.dispatch_event(&mut Event::change());

    assert!(seen.borrow().is_empty());
    for kind in ["paste", "dragenter", "dragover", "dragleave", "drop", "change"] {
        assert_eq!(page.zone.listener_count(kind), 0, "{}", kind);
        assert_eq!(page.document.listener_count(kind), 0, "{}", kind);
    }
}

#[test]
fn test_separate_event_target() {
    init_test_logger();
    let page = build_page();
    let status = page.document.create_element("output");
    status.set_attribute("id", "status");
    page.document.body().append_child(&status).unwrap();
    let (on_status, _a) = record_events(&status, "uploads:files");
    let (on_zone_events, _b) = record_events(&page.zone, "uploads:files");

    let ingest = FileIngest::new(
        &page.document,
        IngestOptions {
            event_target: Some("#status".into()),
            event_prefix: "uploads".into(),
            ..on_zone("*/*")
        },
    )
    .unwrap();
    assert_eq!(ingest.event_target(), &status);

    page.zone.dispatch_event(&mut Event::drop(DataTransfer::with_files(vec![png()])));
    assert_eq!(on_status.borrow().len(), 1);
    assert!(on_zone_events.borrow().is_empty());
}

#[test]
fn test_two_instances_both_receive_paste() {
    init_test_logger();
    let page = build_page();
    let order = Rc::new(RefCell::new(Vec::new()));

    let first = Rc::clone(&order);
    let _images = FileIngest::new(
        &page.document,
        IngestOptions {
            event_prefix: "images".into(),
            ..on_zone("image/*")
        }
        .with_callback(move |_| first.borrow_mut().push("images")),
    )
    .unwrap();
    let second = Rc::clone(&order);
    let _anything = FileIngest::new(
        &page.document,
        IngestOptions {
            event_prefix: "anything".into(),
            ..on_zone("*/*")
        }
        .with_callback(move |_| second.borrow_mut().push("anything")),
    )
    .unwrap();

    page.document.body().dispatch_event(&mut Event::paste(DataTransfer::with_files(vec![png()])));
    assert_eq!(*order.borrow(), vec!["images", "anything"]);
}

#[test]
fn test_options_from_json() {
    init_test_logger();
    let page = build_page();
    let options = IngestOptions::from_json(
        r##"{"target": "#drop-zone", "accept": "image/png", "includeRejectedFiles": true, "paste": false}"##,
    )
    .unwrap();
    let ingest = FileIngest::new(&page.document, options).unwrap();
    assert_eq!(ingest.target(), &page.zone);
    assert_eq!(page.document.listener_count("paste"), 0);

    let result = ingest.handle_files(vec![png(), txt()]).unwrap();
    assert_eq!(result.rejected, Some(vec![txt()]));
}

#[test]
fn test_files_from_disk() {
    init_test_logger();
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("scan.jpg");
    let notes = dir.path().join("notes.md");
    std::fs::write(&image, [0xFFu8, 0xD8, 0xFF]).unwrap();
    std::fs::write(&notes, "# notes").unwrap();

    let page = build_page();
    let ingest = FileIngest::new(&page.document, on_zone("image/jpeg")).unwrap();
    let files = vec![
        IngestFile::from_path(&image).unwrap(),
        IngestFile::from_path(&notes).unwrap(),
    ];
    let result = ingest.handle_files(files).unwrap();
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].name(), "scan.jpg");
    assert_eq!(result.files[0].size(), 3);
}

#[test]
fn test_destroy_from_earlier_callback_stops_later_instance() {
    init_test_logger();
    let page = build_page();
    let order = Rc::new(RefCell::new(Vec::new()));
    let second_slot: Rc<RefCell<Option<FileIngest>>> = Rc::new(RefCell::new(None));

    let first_log = Rc::clone(&order);
    let slot = Rc::clone(&second_slot);
    let _first = FileIngest::new(
        &page.document,
        on_zone("*/*").with_callback(move |_| {
            first_log.borrow_mut().push("first");
            if let Some(second) = slot.borrow().as_ref() {
                second.destroy();
            }
        }),
    )
    .unwrap();

    let second_log = Rc::clone(&order);
    let second = FileIngest::new(
        &page.document,
        on_zone("*/*").with_callback(move |_| second_log.borrow_mut().push("second")),
    )
    .unwrap();
    *second_slot.borrow_mut() = Some(second);

    page.document.body().dispatch_event(&mut Event::paste(DataTransfer::with_files(vec![png()])));
    assert_eq!(*order.borrow(), vec!["first"]);
    assert_eq!(page.document.listener_count("paste"), 1);
}

#[test]
fn test_defaults_left_alone_without_prevent_default() {
    init_test_logger();
    let page = build_page();
    let (seen, _listener) = record_events(&page.zone, "file-ingest:files");
    let _ingest = FileIngest::new(
        &page.document,
        IngestOptions {
            prevent_default: false,
            ..on_zone("*/*")
        },
    )
    .unwrap();

    let mut drop = Event::drop(DataTransfer::with_files(vec![png()]));
    assert!(page.zone.dispatch_event(&mut drop));

    let mut paste = Event::paste(DataTransfer::with_files(vec![png()]));
    assert!(page.document.body().dispatch_event(&mut paste));

    page.input.set_files(vec![png()]);
    let mut change = Event::change();
    assert!(page.input.dispatch_event(&mut change));

    for kind in ["dragenter", "dragover", "dragleave"] {
        let mut event = Event::drag(kind, DataTransfer::new());
        assert!(page.zone.dispatch_event(&mut event), "{}", kind);
    }

    assert_eq!(seen.borrow().len(), 3);
}

#[test]
fn test_targets_resolved_with_complex_selectors() {
    init_test_logger();
    let document = Document::new();
    let form = document.create_element("form");
    form.set_attribute("id", "upload");
    let input = document.create_element("input");
    input.set_attribute("type", "file");
    form.append_child(&input).unwrap();
    document.body().append_child(&form).unwrap();

    for selector in [
        "#upload input",
        "form > input",
        "input:not([type=text])",
        "#upload input[type=file]",
    ] {
        let ingest = FileIngest::new(
            &document,
            IngestOptions {
                target: Some(selector.into()),
                event_target: Some("body > form".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(ingest.target(), &input, "{}", selector);
        assert_eq!(ingest.event_target(), &form, "{}", selector);
        ingest.destroy();
    }
}
