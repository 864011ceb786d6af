use std::env;
use std::error::Error;

use file_ingest::{DataTransfer, Document, Event, FileIngest, IngestFile, IngestOptions};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let accept = env::var("FILE_INGEST_ACCEPT").unwrap_or_else(|_| "*/*".to_string());
    let include_rejected_files = env::var("FILE_INGEST_INCLUDE_REJECTED")
        .map(|value| matches!(value.as_str(), "1" | "true"))
        .unwrap_or(false);

    let files = env::args()
        .skip(1)
        .map(IngestFile::from_path)
        .collect::<Result<Vec<_>, _>>()?;
    log::info!("Dropping {} files with accept {:?}", files.len(), accept);

    let document = Document::new();
    let zone = document.create_element("div");
    zone.set_attribute("id", "drop-zone");
    document.body().append_child(&zone)?;

    let ingest = FileIngest::new(
        &document,
        IngestOptions {
            target: Some("#drop-zone".into()),
            accept,
            paste: false,
            change: false,
            include_rejected_files,
            emit_when_empty: true,
            ..Default::default()
        }
        .with_callback(|result| match serde_json::to_string_pretty(result) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to render result: {}", e),
        }),
    )?;

    zone.dispatch_event(&mut Event::drop(DataTransfer::with_files(files)));
    ingest.destroy();
    Ok(())
}
