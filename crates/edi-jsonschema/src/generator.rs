//! Schema generators for data elements, composites, segments and messages

use crate::document::{CodeConst, Property, PropertyMap, SchemaDocument, SchemaKind, SchemaUris};
use crate::naming::NameScope;
use crate::registry::SegmentRegistry;
use crate::sink::SchemaSink;
use crate::{Error, Result};
use edi_defs::{
    CodeTable, CompositeDef, DataElementDef, MessageDef, MessageNode, SegmentChild, SegmentDef,
};
use std::collections::BTreeSet;
use tracing::debug;

/// Generates the documents of one edition
///
/// Holds the per-edition state: the code table, the registry of segment
/// property maps, and the sink documents are written to. Segments must be
/// generated before any message that uses them.
pub struct SchemaGenerator<'a> {
    uris: SchemaUris,
    codes: &'a CodeTable,
    sink: &'a mut dyn SchemaSink,
    registry: SegmentRegistry,
    data_elements: BTreeSet<String>,
    composites: BTreeSet<String>,
}

impl<'a> SchemaGenerator<'a> {
    pub fn new(uris: SchemaUris, codes: &'a CodeTable, sink: &'a mut dyn SchemaSink) -> Self {
        Self {
            uris,
            codes,
            sink,
            registry: SegmentRegistry::new(),
            data_elements: BTreeSet::new(),
            composites: BTreeSet::new(),
        }
    }

    /// Segments registered so far
    pub fn registry(&self) -> &SegmentRegistry {
        &self.registry
    }

    /// Distinct data elements written so far
    pub fn data_element_count(&self) -> usize {
        self.data_elements.len()
    }

    /// Distinct composites written so far
    pub fn composite_count(&self) -> usize {
        self.composites.len()
    }

    /// Write the document of a data element.
    ///
    /// The single `value` property is a string limited to the declared
    /// maximum length, enumerated by `oneOf` when the code table lists codes
    /// for the element.
    pub fn data_element(&mut self, element: &DataElementDef) -> Result<()> {
        let one_of: Vec<CodeConst> = self
            .codes
            .codes(&element.id)
            .map(|codes| {
                codes
                    .iter()
                    .map(|(value, description)| CodeConst {
                        value: value.clone(),
                        description: description.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut properties = PropertyMap::new();
        properties.insert("value".to_string(), Property::value(element.max_length, one_of));

        let document = SchemaDocument::new(
            self.uris.uri(SchemaKind::DataElement, &element.id),
            &element.name,
            &element.description,
        )
        .with_properties(properties);

        debug!("Generating data element {}", element.id);
        self.sink.write(SchemaKind::DataElement, &element.id, &document)?;
        self.data_elements.insert(element.id.clone());
        Ok(())
    }

    /// Write the document of a composite and of each of its data elements.
    pub fn composite(&mut self, composite: &CompositeDef) -> Result<()> {
        let mut scope = NameScope::new();
        let mut properties = PropertyMap::new();

        for element in &composite.elements {
            let key = scope.claim(&element.name);
            properties.insert(
                key,
                Property::reference(self.uris.uri(SchemaKind::DataElement, &element.id)),
            );
            self.data_element(element)?;
        }

        let document = SchemaDocument::new(
            self.uris.uri(SchemaKind::CompositeDataElement, &composite.id),
            &composite.id,
            &composite.description,
        )
        .with_properties(properties);

        debug!("Generating composite {}", composite.id);
        self.sink
            .write(SchemaKind::CompositeDataElement, &composite.id, &document)?;
        self.composites.insert(composite.id.clone());
        Ok(())
    }

    /// Write the document of a segment and its children, then register its
    /// property map for message expansion.
    pub fn segment(&mut self, segment: &SegmentDef) -> Result<()> {
        let mut scope = NameScope::new();
        let mut properties = PropertyMap::new();

        for child in &segment.children {
            let key = scope.claim(child.name());
            match child {
                SegmentChild::DataElement(element) => {
                    properties.insert(
                        key,
                        Property::reference(self.uris.uri(SchemaKind::DataElement, &element.id)),
                    );
                    self.data_element(element)?;
                }
                SegmentChild::Composite(composite) => {
                    properties.insert(
                        key,
                        Property::reference(
                            self.uris.uri(SchemaKind::CompositeDataElement, &composite.id),
                        ),
                    );
                    self.composite(composite)?;
                }
            }
        }

        let document = SchemaDocument::new(
            self.uris.uri(SchemaKind::Segment, &segment.id),
            &segment.id,
            &segment.description,
        )
        .with_properties(properties);

        debug!("Generating segment {}", segment.id);
        self.registry.register(&segment.id, document.properties.clone());
        self.sink.write(SchemaKind::Segment, &segment.id, &document)?;
        Ok(())
    }

    /// Write the document of a message, inlining the registered segments.
    pub fn message(&mut self, message: &MessageDef) -> Result<()> {
        let title = message.name.to_uppercase();
        let (properties, required) = self.expand(&title, &message.nodes)?;

        let document = SchemaDocument::new(
            self.uris.uri(SchemaKind::Message, &title),
            &title,
            &message.description,
        )
        .with_properties(properties)
        .with_required(required);

        debug!("Generating message {}", title);
        self.sink.write(SchemaKind::Message, &title, &document)?;
        Ok(())
    }

    /// Build the properties and required keys of one level of a message.
    /// Each level, the message root or a group, gets its own name scope.
    fn expand(&self, message: &str, nodes: &[MessageNode]) -> Result<(PropertyMap, Vec<String>)> {
        let mut scope = NameScope::new();
        let mut properties = PropertyMap::new();
        let mut required = Vec::new();

        for node in nodes {
            let key = scope.claim(node.id());
            let property = match node {
                MessageNode::Segment { id, .. } => {
                    let segment = self
                        .registry
                        .get(id)
                        .ok_or_else(|| Error::unknown_segment(message, id.as_str()))?;
                    Property::segment(id, segment.clone())
                }
                MessageNode::Group { id, children, .. } => {
                    let (group_properties, group_required) = self.expand(message, children)?;
                    Property::group(id, group_properties, group_required)
                }
            };

            if node.is_required() {
                required.push(key.clone());
            }
            properties.insert(key, property);
        }

        Ok((properties, required))
    }
}
