use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QualityStats {
    pub overall_avg_quality: f64,
    pub avg_per_read_quality: f64,
    pub low_quality_percentage: f64,
    pub high_quality_percentage: f64,
    /// Number of reads with a quality mean. Read-level approximation, not a base count.
    pub total_bases: u64,
    /// Number of reads whose mean is below the low threshold.
    pub low_quality_bases: u64,
    /// Decoded score -> occurrences across all bases.
    pub quality_counts: BTreeMap<i32, u64>,
}

impl QualityStats {
    /// Reduce per-read means and the decoded histogram into the report structure.
    pub fn finalize(
        per_read: &[f64],
        quality_counts: BTreeMap<i32, u64>,
        quality_threshold: i32,
        high_quality_threshold: i32,
    ) -> Self {
        if per_read.is_empty() {
            return Self {
                quality_counts,
                ..Self::default()
            };
        }

        let n = per_read.len() as f64;
        let mean = per_read.iter().sum::<f64>() / n;
        let low = f64::from(quality_threshold);
        let high = f64::from(high_quality_threshold);
        let low_reads = per_read.iter().filter(|&&q| q < low).count() as u64;
        let high_reads = per_read.iter().filter(|&&q| q >= high).count() as u64;

        Self {
            overall_avg_quality: mean,
            avg_per_read_quality: mean,
            low_quality_percentage: low_reads as f64 / n * 100.0,
            high_quality_percentage: high_reads as f64 / n * 100.0,
            total_bases: per_read.len() as u64,
            low_quality_bases: low_reads,
            quality_counts,
        }
    }
}
