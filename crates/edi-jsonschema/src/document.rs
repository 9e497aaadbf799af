//! Generated JSON Schema document model

use crate::Result;
use edi_defs::Edition;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Meta-schema every generated document declares
pub const JSON_SCHEMA_DRAFT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Root under which the generated schemas are published
pub const DEFAULT_BASE_URL: &str = "https://php-edifact.github.io/edifact-schema";

/// File name suffix shared by every generated document
pub const FILE_SUFFIX: &str = ".edifact.schema.json";

const OBJECT: &str = "object";
const STRING: &str = "string";

/// The four families of generated documents, one output subtree each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchemaKind {
    DataElement,
    CompositeDataElement,
    Segment,
    Message,
}

impl SchemaKind {
    pub const ALL: [SchemaKind; 4] = [
        SchemaKind::DataElement,
        SchemaKind::CompositeDataElement,
        SchemaKind::Segment,
        SchemaKind::Message,
    ];

    /// Subdirectory (and URI path segment) for this kind
    pub fn dir_name(self) -> &'static str {
        match self {
            SchemaKind::DataElement => "dataelement",
            SchemaKind::CompositeDataElement => "compositedataelement",
            SchemaKind::Segment => "segment",
            SchemaKind::Message => "message",
        }
    }

    /// File name of the document for an identifier
    pub fn file_name(identifier: &str) -> String {
        format!("{identifier}{FILE_SUFFIX}")
    }
}

/// Builds `$id` and `$ref` URIs for one edition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaUris {
    base_url: String,
    edition: String,
}

impl SchemaUris {
    pub fn new(base_url: &str, edition: &Edition) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            edition: edition.as_str().to_string(),
        }
    }

    /// `<base>/<edition>/<subtree>/<identifier>.edifact.schema.json`
    pub fn uri(&self, kind: SchemaKind, identifier: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url,
            self.edition,
            kind.dir_name(),
            SchemaKind::file_name(identifier)
        )
    }
}

/// Ordered property map of an object schema
pub type PropertyMap = IndexMap<String, Property>;

/// One enumerated code of a data element value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeConst {
    #[serde(rename = "const")]
    pub value: String,
    pub description: String,
}

/// A property inside a generated schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Property {
    /// Reference to another generated document
    Ref {
        #[serde(rename = "$ref")]
        reference: String,
    },

    /// The `value` of a data element
    Value {
        description: String,
        #[serde(rename = "type")]
        schema_type: &'static str,
        #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
        max_length: Option<u32>,
        #[serde(rename = "oneOf", skip_serializing_if = "Vec::is_empty")]
        one_of: Vec<CodeConst>,
    },

    /// A segment inlined into a message
    Segment {
        description: String,
        #[serde(rename = "type")]
        schema_type: &'static str,
        properties: PropertyMap,
    },

    /// A segment group inside a message
    Group {
        description: String,
        #[serde(rename = "type")]
        schema_type: &'static str,
        properties: PropertyMap,
        required: Vec<String>,
    },
}

impl Property {
    pub fn reference(uri: impl Into<String>) -> Self {
        Self::Ref {
            reference: uri.into(),
        }
    }

    pub fn value(max_length: Option<u32>, one_of: Vec<CodeConst>) -> Self {
        Self::Value {
            description: "Value".to_string(),
            schema_type: STRING,
            max_length,
            one_of,
        }
    }

    pub fn segment(segment_id: &str, properties: PropertyMap) -> Self {
        Self::Segment {
            description: format!("Segment {segment_id}"),
            schema_type: OBJECT,
            properties,
        }
    }

    pub fn group(group_id: &str, properties: PropertyMap, required: Vec<String>) -> Self {
        Self::Group {
            description: format!("Group {group_id}"),
            schema_type: OBJECT,
            properties,
            required,
        }
    }

    /// Nested properties of an object property
    pub fn properties(&self) -> Option<&PropertyMap> {
        match self {
            Self::Segment { properties, .. } | Self::Group { properties, .. } => Some(properties),
            Self::Ref { .. } | Self::Value { .. } => None,
        }
    }

    /// Required keys of a group property
    pub fn required(&self) -> Option<&[String]> {
        match self {
            Self::Group { required, .. } => Some(required.as_slice()),
            _ => None,
        }
    }
}

/// One generated JSON Schema file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaDocument {
    #[serde(rename = "$schema")]
    pub schema: &'static str,
    #[serde(rename = "$id")]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub schema_type: &'static str,
    pub properties: PropertyMap,
    pub required: Vec<String>,
}

impl SchemaDocument {
    pub fn new(id: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            schema: JSON_SCHEMA_DRAFT,
            id: id.into(),
            title: title.into(),
            description: description.into(),
            schema_type: OBJECT,
            properties: PropertyMap::new(),
            required: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties = properties;
        self
    }

    #[must_use]
    pub fn with_required(mut self, required: Vec<String>) -> Self {
        self.required = required;
        self
    }

    /// Pretty-printed JSON with four-space indentation
    pub fn render(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)?;
        Ok(buffer)
    }
}
