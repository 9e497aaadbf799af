//! Definition model for an EDIFACT edition

use indexmap::IndexMap;
use std::collections::HashMap;

/// Enumerated code values per data element, keyed by data element id
///
/// Codes keep their document order so generated enumerations are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    entries: HashMap<String, IndexMap<String, String>>,
}

impl CodeTable {
    /// Create an empty code table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a code for a data element. A repeated code keeps its position and
    /// takes the newer description.
    pub fn insert(
        &mut self,
        element_id: impl Into<String>,
        code: impl Into<String>,
        description: impl Into<String>,
    ) {
        self.entries
            .entry(element_id.into())
            .or_default()
            .insert(code.into(), description.into());
    }

    /// Make sure an entry exists for a data element, even without codes.
    pub fn ensure_element(&mut self, element_id: impl Into<String>) {
        self.entries.entry(element_id.into()).or_default();
    }

    /// Codes for a data element, in table order
    pub fn codes(&self, element_id: &str) -> Option<&IndexMap<String, String>> {
        self.entries.get(element_id)
    }

    /// Number of data elements with an entry
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Definition of a simple data element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataElementDef {
    pub id: String,
    /// Display name, used as the property key in the parent
    pub name: String,
    pub description: String,
    /// Declared maximum length; `None` when absent or not numeric
    pub max_length: Option<u32>,
}

impl DataElementDef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            max_length: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }
}

/// Definition of a composite data element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeDef {
    pub id: String,
    /// Display name, used as the property key in the parent segment
    pub name: String,
    pub description: String,
    pub elements: Vec<DataElementDef>,
}

impl CompositeDef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            elements: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_element(mut self, element: DataElementDef) -> Self {
        self.elements.push(element);
        self
    }
}

/// A child of a segment: either a simple or a composite data element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentChild {
    DataElement(DataElementDef),
    Composite(CompositeDef),
}

impl SegmentChild {
    /// Display name used as the property key
    pub fn name(&self) -> &str {
        match self {
            Self::DataElement(element) => &element.name,
            Self::Composite(composite) => &composite.name,
        }
    }
}

/// Definition of a segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentDef {
    pub id: String,
    pub description: String,
    pub children: Vec<SegmentChild>,
}

impl SegmentDef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_element(mut self, element: DataElementDef) -> Self {
        self.children.push(SegmentChild::DataElement(element));
        self
    }

    #[must_use]
    pub fn with_composite(mut self, composite: CompositeDef) -> Self {
        self.children.push(SegmentChild::Composite(composite));
        self
    }
}

/// A node in a message structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageNode {
    /// Reference to a segment defined in the edition's segment list
    Segment { id: String, required: bool },
    /// Segment group with nested segments and groups
    Group {
        id: String,
        required: bool,
        children: Vec<MessageNode>,
    },
}

impl MessageNode {
    pub fn segment(id: impl Into<String>, required: bool) -> Self {
        Self::Segment {
            id: id.into(),
            required,
        }
    }

    pub fn group(id: impl Into<String>, required: bool, children: Vec<MessageNode>) -> Self {
        Self::Group {
            id: id.into(),
            required,
            children,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Segment { id, .. } | Self::Group { id, .. } => id,
        }
    }

    pub fn is_required(&self) -> bool {
        match self {
            Self::Segment { required, .. } | Self::Group { required, .. } => *required,
        }
    }
}

/// Definition of a message: its name and top-level structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDef {
    /// Message name as listed by the source (e.g. `aperak`)
    pub name: String,
    pub description: String,
    pub nodes: Vec<MessageNode>,
}

impl MessageDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            nodes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_node(mut self, node: MessageNode) -> Self {
        self.nodes.push(node);
        self
    }
}
