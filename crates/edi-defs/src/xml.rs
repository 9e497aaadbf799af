//! Parsers for the mapping XML documents
//!
//! Three document shapes are read per edition: the segment list, one
//! document per message, and the code table.

use crate::model::{
    CodeTable, CompositeDef, DataElementDef, MessageDef, MessageNode, SegmentChild, SegmentDef,
};
use crate::{Error, Result};
use roxmltree::{Document, Node};
use tracing::trace;

const SEGMENT: &str = "segment";
const GROUP: &str = "group";
const DATA_ELEMENT: &str = "data_element";
const COMPOSITE_DATA_ELEMENT: &str = "composite_data_element";

/// Parse a segment list document.
pub fn parse_segments(source: &str, resource: &str) -> Result<Vec<SegmentDef>> {
    let document = parse_document(source, resource)?;

    let mut segments = Vec::new();
    for node in elements(document.root_element()) {
        if node.tag_name().name() != SEGMENT {
            continue;
        }
        segments.push(parse_segment(node, resource)?);
    }

    trace!("Parsed {} segments from {}", segments.len(), resource);
    Ok(segments)
}

/// Parse a message document. `name` is the message name as listed by the source.
pub fn parse_message(name: &str, source: &str, resource: &str) -> Result<MessageDef> {
    let document = parse_document(source, resource)?;
    let root = document.root_element();

    Ok(MessageDef {
        name: name.to_string(),
        description: root.attribute("desc").unwrap_or_default().to_string(),
        nodes: parse_message_nodes(root, resource)?,
    })
}

/// Parse a code table document.
pub fn parse_codes(source: &str, resource: &str) -> Result<CodeTable> {
    let document = parse_document(source, resource)?;

    let mut table = CodeTable::new();
    for element in elements(document.root_element()) {
        let element_id = required_attribute(element, "id", resource)?;
        table.ensure_element(element_id);
        for code in elements(element) {
            let value = required_attribute(code, "id", resource)?;
            let description = code.attribute("desc").unwrap_or_default();
            table.insert(element_id, value, description);
        }
    }

    trace!("Parsed code table for {} data elements from {}", table.len(), resource);
    Ok(table)
}

fn parse_document<'input>(source: &'input str, resource: &str) -> Result<Document<'input>> {
    Document::parse(source).map_err(|e| Error::invalid_xml(resource, e.to_string()))
}

fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

fn required_attribute<'a>(node: Node<'a, '_>, attribute: &str, resource: &str) -> Result<&'a str> {
    node.attribute(attribute)
        .ok_or_else(|| Error::missing_attribute(resource, node.tag_name().name(), attribute))
}

fn description(node: Node<'_, '_>) -> String {
    node.attribute("desc").unwrap_or_default().to_string()
}

/// Display name, falling back to the identifier when the source omits it.
fn display_name(node: Node<'_, '_>, id: &str) -> String {
    node.attribute("name").unwrap_or(id).to_string()
}

fn parse_segment(node: Node<'_, '_>, resource: &str) -> Result<SegmentDef> {
    let id = required_attribute(node, "id", resource)?;

    let mut children = Vec::new();
    for child in elements(node) {
        match child.tag_name().name() {
            DATA_ELEMENT => {
                children.push(SegmentChild::DataElement(parse_data_element(child, resource)?));
            }
            COMPOSITE_DATA_ELEMENT => {
                children.push(SegmentChild::Composite(parse_composite(child, resource)?));
            }
            _ => {}
        }
    }

    Ok(SegmentDef {
        id: id.to_string(),
        description: description(node),
        children,
    })
}

fn parse_composite(node: Node<'_, '_>, resource: &str) -> Result<CompositeDef> {
    let id = required_attribute(node, "id", resource)?;

    let mut elements_out = Vec::new();
    for child in elements(node) {
        if child.tag_name().name() == DATA_ELEMENT {
            elements_out.push(parse_data_element(child, resource)?);
        }
    }

    Ok(CompositeDef {
        id: id.to_string(),
        name: display_name(node, id),
        description: description(node),
        elements: elements_out,
    })
}

fn parse_data_element(node: Node<'_, '_>, resource: &str) -> Result<DataElementDef> {
    let id = required_attribute(node, "id", resource)?;

    Ok(DataElementDef {
        id: id.to_string(),
        name: display_name(node, id),
        description: description(node),
        max_length: node
            .attribute("maxlength")
            .and_then(|value| value.trim().parse::<u32>().ok()),
    })
}

fn parse_message_nodes(node: Node<'_, '_>, resource: &str) -> Result<Vec<MessageNode>> {
    let mut nodes = Vec::new();
    for child in elements(node) {
        match child.tag_name().name() {
            SEGMENT => nodes.push(MessageNode::Segment {
                id: required_attribute(child, "id", resource)?.to_string(),
                required: is_required(child),
            }),
            GROUP => nodes.push(MessageNode::Group {
                id: required_attribute(child, "id", resource)?.to_string(),
                required: is_required(child),
                children: parse_message_nodes(child, resource)?,
            }),
            // `defaults` and anything else carry no structure
            _ => {}
        }
    }
    Ok(nodes)
}

fn is_required(node: Node<'_, '_>) -> bool {
    node.attribute("required") == Some("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEGMENTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<segments>
  <segment id="ADR" name="ADDRESS" desc="To specify an address.">
    <composite_data_element id="C817" name="addressUsage" desc="To describe the usage of an address.">
      <data_element id="3299" name="addressPurposeCode" desc="Code specifying the purpose of an address." type="an" maxlength="3"/>
      <data_element id="3131" name="addressTypeCode" desc="Code specifying the type of an address." type="an" maxlength="3"/>
    </composite_data_element>
    <data_element id="3164" name="cityName" desc="Name of a city." type="an" maxlength="35"/>
  </segment>
  <segment id="BGM" desc="Beginning of message">
    <data_element id="1225" maxlength="n/a"/>
  </segment>
</segments>"#;

    #[test]
    fn test_parse_segments() {
        let segments = parse_segments(SEGMENTS, "segments.xml").unwrap();
        assert_eq!(segments.len(), 2);

        let adr = &segments[0];
        assert_eq!(adr.id, "ADR");
        assert_eq!(adr.description, "To specify an address.");
        assert_eq!(adr.children.len(), 2);

        match &adr.children[0] {
            SegmentChild::Composite(composite) => {
                assert_eq!(composite.id, "C817");
                assert_eq!(composite.name, "addressUsage");
                assert_eq!(composite.elements.len(), 2);
                assert_eq!(composite.elements[1].id, "3131");
                assert_eq!(composite.elements[1].max_length, Some(3));
            }
            other => panic!("Expected composite, got {:?}", other),
        }
        match &adr.children[1] {
            SegmentChild::DataElement(element) => {
                assert_eq!(element.name, "cityName");
                assert_eq!(element.max_length, Some(35));
            }
            other => panic!("Expected data element, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_segments_name_falls_back_to_id() {
        let segments = parse_segments(SEGMENTS, "segments.xml").unwrap();
        match &segments[1].children[0] {
            SegmentChild::DataElement(element) => {
                assert_eq!(element.name, "1225");
                assert_eq!(element.description, "");
                assert_eq!(element.max_length, None);
            }
            other => panic!("Expected data element, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_segments_missing_id() {
        let xml = r#"<segments><segment desc="no id"/></segments>"#;
        match parse_segments(xml, "segments.xml") {
            Err(Error::MissingAttribute {
                element, attribute, ..
            }) => {
                assert_eq!(element, "segment");
                assert_eq!(attribute, "id");
            }
            other => panic!("Expected MissingAttribute, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_segments_invalid_xml() {
        let result = parse_segments("<segments><segment id=\"ADR\">", "segments.xml");
        match result {
            Err(Error::InvalidXml { resource, .. }) => assert_eq!(resource, "segments.xml"),
            other => panic!("Expected InvalidXml, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_message_nested_groups() {
        let xml = r#"<message desc="Application error and acknowledgement message">
  <defaults>
    <data_element id="0065" value="APERAK"/>
  </defaults>
  <segment id="UNH" maxrepeat="1" required="true"/>
  <group id="SG1" maxrepeat="9">
    <segment id="RFF" required="true"/>
    <group id="SG2" required="true">
      <group id="SG3">
        <segment id="DTM" required="false"/>
      </group>
    </group>
  </group>
</message>"#;

        let message = parse_message("aperak", xml, "aperak.xml").unwrap();
        assert_eq!(message.name, "aperak");
        assert_eq!(message.description, "Application error and acknowledgement message");
        assert_eq!(
            message.nodes,
            vec![
                MessageNode::segment("UNH", true),
                MessageNode::group(
                    "SG1",
                    false,
                    vec![
                        MessageNode::segment("RFF", true),
                        MessageNode::group(
                            "SG2",
                            true,
                            vec![MessageNode::group(
                                "SG3",
                                false,
                                vec![MessageNode::segment("DTM", false)]
                            )]
                        ),
                    ]
                ),
            ]
        );
    }

    #[test]
    fn test_parse_message_required_only_for_literal_true() {
        let xml = r#"<message><segment id="UNH" required="TRUE"/><segment id="BGM" required="1"/></message>"#;
        let message = parse_message("x", xml, "x.xml").unwrap();
        assert!(message.nodes.iter().all(|node| !node.is_required()));
    }

    #[test]
    fn test_parse_codes() {
        let xml = r#"<data_elements>
  <data_element id="1001" desc="Document name code">
    <code id="1" desc="Certificate of analysis"/>
    <code id="220" desc="Order"/>
  </data_element>
  <data_element id="4343"/>
</data_elements>"#;

        let table = parse_codes(xml, "codes.xml").unwrap();
        let codes = table.codes("1001").unwrap();
        assert_eq!(codes.len(), 2);
        assert_eq!(codes.get("220").map(String::as_str), Some("Order"));
        assert!(table.codes("4343").unwrap().is_empty());
    }

    #[test]
    fn test_parse_codes_missing_code_id() {
        let xml = r#"<data_elements><data_element id="1001"><code desc="x"/></data_element></data_elements>"#;
        assert!(matches!(
            parse_codes(xml, "codes.xml"),
            Err(Error::MissingAttribute { .. })
        ));
    }
}
