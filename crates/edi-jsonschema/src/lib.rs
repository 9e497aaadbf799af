//! # edi-jsonschema
//!
//! JSON Schema generation for EDIFACT editions.
//!
//! Every data element, composite data element, segment and message of an
//! edition becomes one JSON Schema document. Segments, composites and data
//! elements reference each other through `$ref` URIs; messages inline the
//! property maps of the segments they use.

pub mod document;
pub mod edition;
pub mod generator;
pub mod naming;
pub mod registry;
pub mod sink;

pub use document::{
    DEFAULT_BASE_URL, JSON_SCHEMA_DRAFT, Property, PropertyMap, SchemaDocument, SchemaKind,
    SchemaUris,
};
pub use edition::{EditionGenerator, EditionReport};
pub use generator::SchemaGenerator;
pub use naming::NameScope;
pub use registry::SegmentRegistry;
pub use sink::{DirectorySink, MemorySink, SchemaSink};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating schemas
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Definitions(#[from] edi_defs::Error),

    #[error("Message {message} references segment {segment}, which is not in the segment list")]
    UnknownSegment { message: String, segment: String },

    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error")]
    Serialize(#[from] serde_json::Error),

    #[error("Edition {edition} failed")]
    Edition {
        edition: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Build an unknown-segment error for a message expansion.
    pub fn unknown_segment(message: impl Into<String>, segment: impl Into<String>) -> Self {
        Self::UnknownSegment {
            message: message.into(),
            segment: segment.into(),
        }
    }

    /// Attach the edition being generated to an error.
    pub fn in_edition(self, edition: impl Into<String>) -> Self {
        match self {
            Self::Edition { .. } => self,
            other => Self::Edition {
                edition: edition.into(),
                source: Box::new(other),
            },
        }
    }
}

/// Crate-local result type for schema generation.
pub type Result<T> = std::result::Result<T, Error>;
