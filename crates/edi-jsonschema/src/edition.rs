//! Edition orchestration

use crate::document::{DEFAULT_BASE_URL, SchemaUris};
use crate::generator::SchemaGenerator;
use crate::sink::SchemaSink;
use crate::Result;
use edi_defs::{DefinitionSource, Edition};
use std::fmt;
use tracing::{debug, info};

/// Outcome of one edition run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditionReport {
    pub edition: Edition,
    pub segments: usize,
    pub composites: usize,
    pub data_elements: usize,
    pub messages: usize,
}

impl fmt::Display for EditionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} messages, {} segments, {} composites, {} data elements",
            self.edition, self.messages, self.segments, self.composites, self.data_elements
        )
    }
}

/// Drives the generation of whole editions
///
/// Each run loads the code table, prepares the sink, generates every segment
/// (with its composites and data elements) and then every message. Segment
/// state is created fresh per run and dropped with it.
pub struct EditionGenerator<'s> {
    source: &'s dyn DefinitionSource,
    base_url: String,
}

impl<'s> EditionGenerator<'s> {
    pub fn new(source: &'s dyn DefinitionSource) -> Self {
        Self {
            source,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Publish the documents under a different root URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Generate one edition into `sink`. Any failure aborts the edition and
    /// is reported with the edition attached.
    pub fn run(&self, edition: &Edition, sink: &mut dyn SchemaSink) -> Result<EditionReport> {
        self.run_edition(edition, sink)
            .map_err(|e| e.in_edition(edition.as_str()))
    }

    fn run_edition(&self, edition: &Edition, sink: &mut dyn SchemaSink) -> Result<EditionReport> {
        info!("Generating edition {}", edition);

        let codes = self.source.code_table(edition)?;
        debug!("Loaded code table with {} entries", codes.len());

        sink.prepare()?;

        let segments = self.source.segments(edition)?;
        let message_names = self.source.message_names(edition)?;

        let uris = SchemaUris::new(&self.base_url, edition);
        let mut generator = SchemaGenerator::new(uris, &codes, &mut *sink);

        for segment in &segments {
            generator.segment(segment)?;
        }
        for name in &message_names {
            let message = self.source.message(edition, name)?;
            generator.message(&message)?;
        }

        let report = EditionReport {
            edition: edition.clone(),
            segments: generator.registry().len(),
            composites: generator.composite_count(),
            data_elements: generator.data_element_count(),
            messages: message_names.len(),
        };
        info!("Finished {}", report);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{SchemaDocument, SchemaKind};
    use crate::sink::MemorySink;
    use crate::Error;
    use edi_defs::{
        CodeTable, CompositeDef, DataElementDef, MessageDef, MessageNode, SegmentDef,
    };
    use std::collections::BTreeMap;
    use std::error::Error as _;
    use std::path::PathBuf;

    #[derive(Default)]
    struct StaticSource {
        segments: Vec<SegmentDef>,
        messages: BTreeMap<String, MessageDef>,
        codes: CodeTable,
    }

    impl DefinitionSource for StaticSource {
        fn segments(&self, _edition: &Edition) -> edi_defs::Result<Vec<SegmentDef>> {
            Ok(self.segments.clone())
        }

        fn message_names(&self, _edition: &Edition) -> edi_defs::Result<Vec<String>> {
            Ok(self.messages.keys().cloned().collect())
        }

        fn message(&self, edition: &Edition, name: &str) -> edi_defs::Result<MessageDef> {
            self.messages.get(name).cloned().ok_or_else(|| {
                edi_defs::Error::not_found(edition.as_str(), format!("message '{name}'"), name)
            })
        }

        fn code_table(&self, _edition: &Edition) -> edi_defs::Result<CodeTable> {
            Ok(self.codes.clone())
        }
    }

    fn sample_source() -> StaticSource {
        let mut codes = CodeTable::new();
        codes.insert("3035", "BY", "Buyer");
        codes.insert("3035", "SU", "Supplier");

        let nad = SegmentDef::new("NAD")
            .with_element(DataElementDef::new("3035", "partyFunctionCodeQualifier").with_max_length(3))
            .with_composite(
                CompositeDef::new("C080", "partyName")
                    .with_element(DataElementDef::new("3036", "partyName").with_max_length(35))
                    .with_element(DataElementDef::new("3036", "partyName").with_max_length(35)),
            );
        let unh = SegmentDef::new("UNH")
            .with_element(DataElementDef::new("0062", "messageReferenceNumber").with_max_length(14));

        let mut messages = BTreeMap::new();
        messages.insert(
            "orders".to_string(),
            MessageDef::new("orders")
                .with_node(MessageNode::segment("UNH", true))
                .with_node(MessageNode::group(
                    "SG2",
                    false,
                    vec![MessageNode::segment("NAD", true)],
                )),
        );
        messages.insert(
            "aperak".to_string(),
            MessageDef::new("aperak").with_node(MessageNode::segment("UNH", true)),
        );

        StaticSource {
            segments: vec![unh, nad],
            messages,
            codes,
        }
    }

    /// Accepts writes until the `fail_at`-th one, which fails
    struct FailingSink {
        fail_at: usize,
        attempts: usize,
        written: Vec<(SchemaKind, String)>,
    }

    impl FailingSink {
        fn new(fail_at: usize) -> Self {
            Self {
                fail_at,
                attempts: 0,
                written: Vec::new(),
            }
        }
    }

    impl SchemaSink for FailingSink {
        fn write(
            &mut self,
            kind: SchemaKind,
            identifier: &str,
            _document: &SchemaDocument,
        ) -> Result<()> {
            self.attempts += 1;
            if self.attempts == self.fail_at {
                return Err(Error::Write {
                    path: PathBuf::from(identifier),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.written.push((kind, identifier.to_string()));
            Ok(())
        }
    }

    fn d96a() -> Edition {
        Edition::parse("D96A").unwrap()
    }

    #[test]
    fn test_run_generates_every_document() {
        let source = sample_source();
        let mut sink = MemorySink::new();
        let report = EditionGenerator::new(&source).run(&d96a(), &mut sink).unwrap();

        assert_eq!(report.messages, 2);
        assert_eq!(report.segments, 2);
        assert_eq!(report.composites, 1);
        assert_eq!(report.data_elements, 3);

        assert_eq!(sink.identifiers(SchemaKind::Message), vec!["APERAK", "ORDERS"]);
        assert_eq!(sink.identifiers(SchemaKind::Segment), vec!["NAD", "UNH"]);
        assert_eq!(sink.identifiers(SchemaKind::CompositeDataElement), vec!["C080"]);
        assert_eq!(sink.identifiers(SchemaKind::DataElement), vec!["0062", "3035", "3036"]);
    }

    #[test]
    fn test_inlined_segments_match_segment_documents() {
        let source = sample_source();
        let mut sink = MemorySink::new();
        EditionGenerator::new(&source).run(&d96a(), &mut sink).unwrap();

        let nad = sink.json(SchemaKind::Segment, "NAD").unwrap();
        let orders = sink.json(SchemaKind::Message, "ORDERS").unwrap();
        assert_eq!(
            orders["properties"]["SG2"]["properties"]["NAD"]["properties"],
            nad["properties"]
        );
    }

    #[test]
    fn test_base_url_override() {
        let source = sample_source();
        let mut sink = MemorySink::new();
        EditionGenerator::new(&source)
            .with_base_url("https://schemas.example.org/edifact/")
            .run(&d96a(), &mut sink)
            .unwrap();

        let unh = sink.json(SchemaKind::Segment, "UNH").unwrap();
        assert_eq!(
            unh["$id"],
            "https://schemas.example.org/edifact/D96A/segment/UNH.edifact.schema.json"
        );
    }

    #[test]
    fn test_unknown_segment_is_reported_with_edition() {
        let mut source = sample_source();
        source.messages.insert(
            "invoic".to_string(),
            MessageDef::new("invoic").with_node(MessageNode::segment("BGM", true)),
        );
        let mut sink = MemorySink::new();

        let err = EditionGenerator::new(&source).run(&d96a(), &mut sink).unwrap_err();
        match &err {
            Error::Edition { edition, source } => {
                assert_eq!(edition, "D96A");
                assert!(matches!(**source, Error::UnknownSegment { .. }));
            }
            other => panic!("Expected Edition error, got {:?}", other),
        }
        assert!(err.to_string().contains("D96A"));
    }

    #[test]
    fn test_runs_are_deterministic() {
        let source = sample_source();
        let generator = EditionGenerator::new(&source);
        let mut first = MemorySink::new();
        let mut second = MemorySink::new();
        generator.run(&d96a(), &mut first).unwrap();
        generator.run(&d96a(), &mut second).unwrap();

        for kind in SchemaKind::ALL {
            for id in first.identifiers(kind) {
                assert_eq!(first.get(kind, id), second.get(kind, id), "{id} differs");
            }
        }
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn test_write_failure_stops_the_edition() {
        let source = sample_source();
        let mut sink = FailingSink::new(3);

        let err = EditionGenerator::new(&source).run(&d96a(), &mut sink).unwrap_err();
        match &err {
            Error::Edition { edition, source } => {
                assert_eq!(edition, "D96A");
                assert!(matches!(**source, Error::Write { .. }));
            }
            other => panic!("Expected Edition error, got {:?}", other),
        }

        assert_eq!(sink.attempts, 3);
        assert_eq!(
            sink.written,
            vec![
                (SchemaKind::DataElement, "0062".to_string()),
                (SchemaKind::Segment, "UNH".to_string()),
            ]
        );
    }

    #[test]
    fn test_write_failure_in_message_phase_stops_remaining_messages() {
        let source = sample_source();
        // written before the first message: 0062, UNH, 3035, 3036, 3036, C080, NAD
        let mut sink = FailingSink::new(8);

        EditionGenerator::new(&source).run(&d96a(), &mut sink).unwrap_err();

        assert_eq!(sink.attempts, 8);
        assert_eq!(sink.written.len(), 7);
        assert!(sink.written.iter().all(|(kind, _)| *kind != SchemaKind::Message));
    }

    #[test]
    fn test_error_chain_names_each_cause_once() {
        let mut source = sample_source();
        source.messages.insert(
            "invoic".to_string(),
            MessageDef::new("invoic").with_node(MessageNode::segment("BGM", true)),
        );
        let mut sink = MemorySink::new();

        let err = EditionGenerator::new(&source).run(&d96a(), &mut sink).unwrap_err();
        assert_eq!(err.to_string(), "Edition D96A failed");

        let cause = err.source().map(|cause| cause.to_string());
        assert_eq!(
            cause.as_deref(),
            Some("Message INVOIC references segment BGM, which is not in the segment list")
        );
        assert!(err.source().and_then(|cause| cause.source()).is_none());
    }
}
