use crate::size::{compression_ratio_string, savings};
use std::fmt;
use std::sync::Arc;

/// Session-local identity of an accepted file. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u64);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An accepted input image in the working set.
#[derive(Debug)]
pub struct SourceItem {
    pub id: SourceId,
    pub payload: Vec<u8>,
    pub display_name: String,
    pub original_size: u64,
    pub media_type: String,
}

impl SourceItem {
    pub fn new(id: SourceId, display_name: String, media_type: String, payload: Vec<u8>) -> Self {
        Self {
            id,
            original_size: payload.len() as u64,
            payload,
            display_name,
            media_type,
        }
    }
}

/// The outcome of one successful conversion. Immutable once built.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    source: Arc<SourceItem>,
    output_payload: Vec<u8>,
    output_name: String,
    converted_size: u64,
    compression_ratio: String,
}

impl ConversionResult {
    pub(crate) fn new(
        source: Arc<SourceItem>,
        output_payload: Vec<u8>,
        output_name: String,
    ) -> Self {
        let converted_size = output_payload.len() as u64;
        let compression_ratio = compression_ratio_string(source.original_size, converted_size);
        Self {
            source,
            output_payload,
            output_name,
            converted_size,
            compression_ratio,
        }
    }

    pub fn source(&self) -> &Arc<SourceItem> {
        &self.source
    }

    pub fn source_id(&self) -> SourceId {
        self.source.id
    }

    /// True when this result was produced from exactly this item, not merely
    /// an item with the same id.
    pub fn is_derived_from(&self, item: &Arc<SourceItem>) -> bool {
        Arc::ptr_eq(&self.source, item)
    }

    pub fn output_payload(&self) -> &[u8] {
        &self.output_payload
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    pub fn original_size(&self) -> u64 {
        self.source.original_size
    }

    pub fn converted_size(&self) -> u64 {
        self.converted_size
    }

    /// Percentage with one decimal, e.g. `"60.0"`; negative when the output grew.
    pub fn compression_ratio(&self) -> &str {
        &self.compression_ratio
    }

    pub fn savings(&self) -> i64 {
        savings(self.original_size(), self.converted_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, size: usize) -> Arc<SourceItem> {
        Arc::new(SourceItem::new(
            SourceId(id),
            format!("img{}.png", id),
            "image/png".to_string(),
            vec![0u8; size],
        ))
    }

    #[test]
    fn test_result_metrics() {
        let source = item(1, 1000);
        let result = ConversionResult::new(source, vec![1u8; 400], "img1.webp".to_string());

        assert_eq!(result.original_size(), 1000);
        assert_eq!(result.converted_size(), 400);
        assert_eq!(result.compression_ratio(), "60.0");
        assert_eq!(result.savings(), 600);
        assert_eq!(result.source_id(), SourceId(1));
    }

    #[test]
    fn test_result_can_grow() {
        let result = ConversionResult::new(item(1, 100), vec![0u8; 150], "x.webp".to_string());
        assert_eq!(result.compression_ratio(), "-50.0");
        assert_eq!(result.savings(), -50);
    }

    #[test]
    fn test_is_derived_from_matches_reference_not_id() {
        let original = item(7, 10);
        let impostor = item(7, 10);
        let result = ConversionResult::new(original.clone(), vec![0u8; 5], "img7.webp".to_string());

        assert!(result.is_derived_from(&original));
        assert!(!result.is_derived_from(&impostor));
    }

    #[test]
    fn test_source_id_display() {
        assert_eq!(SourceId(42).to_string(), "#42");
    }
}
