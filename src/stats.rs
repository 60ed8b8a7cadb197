use crate::model::ConversionResult;
use crate::size::{compression_ratio_string, savings};

/// Aggregate numbers for one completed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchStats {
    /// Items attempted, including those that failed to convert.
    pub total_files: usize,
    pub total_original_size: u64,
    pub total_converted_size: u64,
    pub total_savings: i64,
    pub compression_ratio: String,
}

impl BatchStats {
    /// Reduce a batch's results into totals.
    ///
    /// Sizes are summed over successful results only, while `total_files`
    /// counts every attempted item. With no successful results the ratio is
    /// `"0.0"`.
    pub fn aggregate(attempted: usize, results: &[ConversionResult]) -> Self {
        let (total_original_size, total_converted_size) =
            results.iter().fold((0u64, 0u64), |(orig, conv), result| {
                (orig + result.original_size(), conv + result.converted_size())
            });

        Self {
            total_files: attempted,
            total_original_size,
            total_converted_size,
            total_savings: savings(total_original_size, total_converted_size),
            compression_ratio: compression_ratio_string(total_original_size, total_converted_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SourceId, SourceItem};
    use std::sync::Arc;

    fn result(id: u64, original: usize, converted: usize) -> ConversionResult {
        let source = Arc::new(SourceItem::new(
            SourceId(id),
            format!("{}.png", id),
            "image/png".to_string(),
            vec![0u8; original],
        ));
        ConversionResult::new(source, vec![0u8; converted], format!("{}.webp", id))
    }

    #[test]
    fn test_aggregate_three_files() {
        let results = vec![
            result(1, 1_000_000, 400_000),
            result(2, 500_000, 200_000),
            result(3, 250_000, 100_000),
        ];
        let stats = BatchStats::aggregate(3, &results);

        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_original_size, 1_750_000);
        assert_eq!(stats.total_converted_size, 700_000);
        assert_eq!(stats.total_savings, 1_050_000);
        assert_eq!(stats.compression_ratio, "60.0");
    }

    #[test]
    fn test_aggregate_empty_uses_sentinel() {
        let stats = BatchStats::aggregate(2, &[]);
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.total_original_size, 0);
        assert_eq!(stats.total_converted_size, 0);
        assert_eq!(stats.total_savings, 0);
        assert_eq!(stats.compression_ratio, "0.0");
    }

    #[test]
    fn test_aggregate_negative_savings() {
        let stats = BatchStats::aggregate(1, &[result(1, 100, 180)]);
        assert_eq!(stats.total_savings, -80);
        assert_eq!(stats.compression_ratio, "-80.0");
    }
}
