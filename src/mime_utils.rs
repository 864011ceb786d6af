use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use log::warn;

use crate::file_utils::{IngestFile, IngestResult};

pub const WILDCARD: &str = "*";
pub const ACCEPT_ALL: &str = "*/*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subtypes {
    Any,
    Only(Vec<String>),
}

impl Subtypes {
    pub fn contains(&self, subtype: &str) -> bool {
        match self {
            Subtypes::Any => true,
            Subtypes::Only(list) => list.iter().any(|s| s == subtype),
        }
    }
}

/// A `*` top-level key accepts every file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptTable {
    entries: Vec<(String, Subtypes)>,
}

impl AcceptTable {
    pub fn universal() -> Self {
        Self {
            entries: vec![(WILDCARD.to_string(), Subtypes::Any)],
        }
    }

    pub fn parse(accept: &str) -> Self {
        if accept == ACCEPT_ALL {
            return Self::universal();
        }

        let mut table = Self { entries: Vec::new() };
        for pair in accept.split(',').map(str::trim) {
            let mut parts = pair.split('/');
            let (Some(top), Some(subtype)) = (parts.next(), parts.next()) else {
                if !pair.is_empty() {
                    warn!("Ignoring accept entry without subtype: {:?}", pair);
                }
                continue;
            };
            table.insert(top, subtype);
        }
        table
    }

    fn insert(&mut self, top: &str, subtype: &str) {
        let index = match self.entries.iter().position(|(t, _)| t == top) {
            Some(index) => index,
            None => {
                self.entries.push((top.to_string(), Subtypes::Only(Vec::new())));
                self.entries.len() - 1
            }
        };

        let subtypes = &mut self.entries[index].1;
        if let Subtypes::Only(list) = subtypes {
            list.push(subtype.to_string());
            if list.iter().any(|s| s == WILDCARD) {
                *subtypes = Subtypes::Any;
            }
        }
    }

    pub fn is_universal(&self) -> bool {
        self.get(WILDCARD).is_some()
    }

    pub fn get(&self, top: &str) -> Option<&Subtypes> {
        self.entries
            .iter()
            .find(|(t, _)| t == top)
            .map(|(_, subtypes)| subtypes)
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn accepts(&self, mime_type: &str) -> bool {
        if self.is_universal() {
            return true;
        }
        let mut parts = mime_type.split('/');
        let (Some(top), Some(subtype)) = (parts.next(), parts.next()) else {
            return false;
        };
        self.get(top).map_or(false, |subtypes| subtypes.contains(subtype))
    }

    pub fn accepts_mime(&self, mime: &mime::Mime) -> bool {
        self.accepts(mime.essence_str())
    }

    pub fn classify(&self, files: impl IntoIterator<Item = IngestFile>) -> IngestResult {
        let (accepted, rejected): (Vec<_>, Vec<_>) = files
            .into_iter()
            .partition(|file| self.accepts(file.mime_type()));
        IngestResult {
            files: accepted,
            rejected: Some(rejected),
        }
    }
}

impl Default for AcceptTable {
    fn default() -> Self {
        Self::universal()
    }
}

impl FromStr for AcceptTable {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for AcceptTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (top, subtypes) in &self.entries {
            let subtypes = match subtypes {
                Subtypes::Any => vec![WILDCARD],
                Subtypes::Only(list) => list.iter().map(String::as_str).collect(),
            };
            for subtype in subtypes {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{}/{}", top, subtype)?;
                first = false;
            }
        }
        Ok(())
    }
}
