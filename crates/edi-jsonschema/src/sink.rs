//! Destinations for generated documents

use crate::document::{SchemaDocument, SchemaKind};
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Receives rendered schema documents
pub trait SchemaSink {
    /// Prepare the destination before the first write of an edition
    fn prepare(&mut self) -> Result<()> {
        Ok(())
    }

    /// Store one document
    fn write(&mut self, kind: SchemaKind, identifier: &str, document: &SchemaDocument)
    -> Result<()>;
}

/// Writes documents under `<output>/<edition>/<subtree>/`
#[derive(Debug, Clone)]
pub struct DirectorySink {
    edition_dir: PathBuf,
}

impl DirectorySink {
    pub fn new(output_dir: impl AsRef<Path>, edition: &str) -> Self {
        Self {
            edition_dir: output_dir.as_ref().join(edition),
        }
    }

    pub fn edition_dir(&self) -> &Path {
        &self.edition_dir
    }

    /// Path a document of the given kind and identifier is written to
    pub fn path_for(&self, kind: SchemaKind, identifier: &str) -> PathBuf {
        self.edition_dir
            .join(kind.dir_name())
            .join(SchemaKind::file_name(identifier))
    }
}

impl SchemaSink for DirectorySink {
    fn prepare(&mut self) -> Result<()> {
        for kind in SchemaKind::ALL {
            let dir = self.edition_dir.join(kind.dir_name());
            std::fs::create_dir_all(&dir).map_err(|source| Error::Write {
                path: dir.clone(),
                source,
            })?;
        }
        debug!("Prepared output directory {:?}", self.edition_dir);
        Ok(())
    }

    fn write(
        &mut self,
        kind: SchemaKind,
        identifier: &str,
        document: &SchemaDocument,
    ) -> Result<()> {
        let path = self.path_for(kind, identifier);
        let bytes = document.render()?;
        std::fs::write(&path, bytes).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?;
        trace!("Wrote {:?}", path);
        Ok(())
    }
}

/// Keeps rendered documents in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    documents: BTreeMap<(SchemaKind, String), Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered bytes of a document
    pub fn get(&self, kind: SchemaKind, identifier: &str) -> Option<&[u8]> {
        self.documents
            .get(&(kind, identifier.to_string()))
            .map(Vec::as_slice)
    }

    /// A document parsed back into a JSON value
    pub fn json(&self, kind: SchemaKind, identifier: &str) -> Option<serde_json::Value> {
        self.get(kind, identifier)
            .and_then(|bytes| serde_json::from_slice(bytes).ok())
    }

    /// Identifiers stored for one kind, sorted
    pub fn identifiers(&self, kind: SchemaKind) -> Vec<&str> {
        self.documents
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, id)| id.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl SchemaSink for MemorySink {
    fn write(
        &mut self,
        kind: SchemaKind,
        identifier: &str,
        document: &SchemaDocument,
    ) -> Result<()> {
        self.documents
            .insert((kind, identifier.to_string()), document.render()?);
        Ok(())
    }
}
