//! # edi-defs
//!
//! EDIFACT edition catalogue, definition model, and mapping XML loader.
//!
//! This crate provides the source-of-truth side of schema generation:
//! which editions exist, what segments, composites, data elements and
//! messages an edition defines, and the code tables attached to its
//! data elements.

/// Known editions and edition selection.
pub mod edition;
/// Definition model for segments, composites, data elements and messages.
pub mod model;
/// Providers that supply definitions for an edition.
pub mod source;
/// Parsers for the mapping XML documents.
pub mod xml;

pub use edition::{DEFAULT_EDITION, Edition, EditionSelection, KNOWN_EDITIONS};
pub use model::{
    CodeTable, CompositeDef, DataElementDef, MessageDef, MessageNode, SegmentChild, SegmentDef,
};
pub use source::{DefinitionSource, MappingDirectory};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading definitions
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown edition '{0}' (expected one of the known editions or 'all')")]
    UnknownEdition(String),

    #[error("{resource} for edition {edition} not found at {}", path.display())]
    NotFound {
        edition: String,
        resource: String,
        path: PathBuf,
    },

    #[error("Invalid XML in {resource}: {message}")]
    InvalidXml { resource: String, message: String },

    #[error("Missing attribute '{attribute}' on <{element}> in {resource}")]
    MissingAttribute {
        resource: String,
        element: String,
        attribute: String,
    },

    #[error("IO error reading {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Build a not-found error for an edition resource.
    pub fn not_found(
        edition: impl Into<String>,
        resource: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self::NotFound {
            edition: edition.into(),
            resource: resource.into(),
            path: path.into(),
        }
    }

    /// Build an invalid-XML error with the offending resource name.
    pub fn invalid_xml(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidXml {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Build a missing-attribute error.
    pub fn missing_attribute(
        resource: impl Into<String>,
        element: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        Self::MissingAttribute {
            resource: resource.into(),
            element: element.into(),
            attribute: attribute.into(),
        }
    }
}

/// Crate-local result type for definition loading.
pub type Result<T> = std::result::Result<T, Error>;
