//! Definition providers

use crate::edition::Edition;
use crate::model::{CodeTable, MessageDef, SegmentDef};
use crate::xml;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Supplies the definitions of an edition
pub trait DefinitionSource {
    /// All segments of the edition, in document order
    fn segments(&self, edition: &Edition) -> Result<Vec<SegmentDef>>;

    /// Names of the edition's messages, in a stable order
    fn message_names(&self, edition: &Edition) -> Result<Vec<String>>;

    /// A single message structure by name
    fn message(&self, edition: &Edition, name: &str) -> Result<MessageDef>;

    /// Code table of the edition
    fn code_table(&self, edition: &Edition) -> Result<CodeTable>;
}

/// Mapping package on disk
///
/// Layout per edition:
/// `<root>/<EDITION>/segments.xml`, `<root>/<EDITION>/codes.xml`,
/// `<root>/<EDITION>/messages/<name>.xml`.
#[derive(Debug, Clone)]
pub struct MappingDirectory {
    root: PathBuf,
}

impl MappingDirectory {
    pub const SEGMENTS_FILE: &'static str = "segments.xml";
    pub const CODES_FILE: &'static str = "codes.xml";
    pub const MESSAGES_DIR: &'static str = "messages";

    /// Create a source rooted at a mapping package directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the mapping package
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn edition_dir(&self, edition: &Edition) -> PathBuf {
        self.root.join(edition.as_str())
    }

    fn messages_dir(&self, edition: &Edition) -> PathBuf {
        self.edition_dir(edition).join(Self::MESSAGES_DIR)
    }

    fn read(&self, edition: &Edition, resource: &str, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(Error::not_found(edition.as_str(), resource, path));
        }
        trace!("Reading {} for {} from {:?}", resource, edition, path);
        std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl DefinitionSource for MappingDirectory {
    fn segments(&self, edition: &Edition) -> Result<Vec<SegmentDef>> {
        let path = self.edition_dir(edition).join(Self::SEGMENTS_FILE);
        let resource = format!("{}/{}", edition, Self::SEGMENTS_FILE);
        let content = self.read(edition, "segment list", &path)?;
        xml::parse_segments(&content, &resource)
    }

    fn message_names(&self, edition: &Edition) -> Result<Vec<String>> {
        let dir = self.messages_dir(edition);
        if !dir.is_dir() {
            return Err(Error::not_found(edition.as_str(), "message directory", dir));
        }

        let entries = std::fs::read_dir(&dir).map_err(|source| Error::Io {
            path: dir.clone(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| Error::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != "xml") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();

        debug!("Found {} messages for {}", names.len(), edition);
        Ok(names)
    }

    fn message(&self, edition: &Edition, name: &str) -> Result<MessageDef> {
        let path = self.messages_dir(edition).join(format!("{name}.xml"));
        let resource = format!("{}/{}/{}.xml", edition, Self::MESSAGES_DIR, name);
        let content = self.read(edition, &format!("message '{name}'"), &path)?;
        xml::parse_message(name, &content, &resource)
    }

    fn code_table(&self, edition: &Edition) -> Result<CodeTable> {
        let path = self.edition_dir(edition).join(Self::CODES_FILE);
        let resource = format!("{}/{}", edition, Self::CODES_FILE);
        let content = self.read(edition, "code table", &path)?;
        xml::parse_codes(&content, &resource)
    }
}
