//! Segment registry for one edition run

use crate::document::PropertyMap;
use std::collections::HashMap;

/// Property maps of the segments generated so far, keyed by segment id
///
/// Messages inline these maps, so every segment has to be registered
/// before the first message of the edition is expanded.
#[derive(Debug, Default)]
pub struct SegmentRegistry {
    segments: HashMap<String, PropertyMap>,
}

impl SegmentRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the property map of a segment
    pub fn register(&mut self, segment_id: impl Into<String>, properties: PropertyMap) {
        self.segments.insert(segment_id.into(), properties);
    }

    /// Get the property map of a segment
    pub fn get(&self, segment_id: &str) -> Option<&PropertyMap> {
        self.segments.get(segment_id)
    }

    /// Check if a segment is registered
    pub fn contains(&self, segment_id: &str) -> bool {
        self.segments.contains_key(segment_id)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Property;

    #[test]
    fn test_register_and_get() {
        let mut registry = SegmentRegistry::new();
        let mut properties = PropertyMap::new();
        properties.insert("cityName".to_string(), Property::reference("x"));
        registry.register("ADR", properties.clone());

        assert!(registry.contains("ADR"));
        assert_eq!(registry.get("ADR"), Some(&properties));
        assert!(registry.get("NAD").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = SegmentRegistry::new();
        registry.register("ADR", PropertyMap::new());
        let mut properties = PropertyMap::new();
        properties.insert("a".to_string(), Property::reference("y"));
        registry.register("ADR", properties);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("ADR").unwrap().len(), 1);
    }
}
