use std::io;
use std::path::Path;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestFile {
    name: String,
    #[serde(rename = "type")]
    mime_type: String,
    size: u64,
}

impl IngestFile {
    pub fn new(name: &str, mime_type: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            size,
        }
    }

    pub fn guessed(name: &str, size: u64) -> Self {
        let mime_type = mime_guess::from_path(name)
            .first()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default();
        Self::new(name, &mime_type, size)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            ));
        }
        let name = extract_file_name(path);
        Ok(Self::guessed(&name, metadata.len()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn mime(&self) -> Option<mime::Mime> {
        self.mime_type.parse().ok()
    }
}

pub fn extract_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestResult {
    pub files: Vec<IngestFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<Vec<IngestFile>>,
}

impl IngestResult {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn without_rejected(mut self) -> Self {
        self.rejected = None;
        self
    }
}
