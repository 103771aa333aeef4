//! Incremental statistics over a FASTQ record stream.
//!
//! Each chunk of records is fanned out to three accumulators (length/GC,
//! quality, per-base matrix). Accumulators are plain values: the parallel
//! path builds one per chunk and merges them in stream order, which yields
//! the same result as feeding every record to a single accumulator.

use crate::config::{Encoding, StatsConfig};
use crate::record::FastqRecord;

mod length_gc;
mod n50;
mod per_base;
mod quality;
mod selection;
mod summary;

pub use length_gc::{LengthGcAccumulator, RunningTotals, count_gc, gc_percent};
pub use n50::n50;
pub use per_base::{BaseCounts, PerBaseContentRow, PerBaseMatrix};
pub use quality::{QualityAccumulator, RawQualHist, decode_score, detect_encoding};
pub use selection::LengthSelection;
pub use summary::QualityStats;

/// All running accumulators of one analysis pass (or one chunk of it).
#[derive(Clone, Debug)]
pub struct StatsAccumulator {
    pub length_gc: LengthGcAccumulator,
    pub quality: QualityAccumulator,
    /// `None` when per-base analysis is skipped.
    pub per_base: Option<PerBaseMatrix>,
}

impl StatsAccumulator {
    pub fn new(encoding: Encoding, skip_perbase: bool) -> Self {
        Self {
            length_gc: LengthGcAccumulator::new(),
            quality: QualityAccumulator::new(encoding),
            per_base: (!skip_perbase).then(PerBaseMatrix::new),
        }
    }

    #[inline]
    pub fn update(&mut self, rec: &FastqRecord) {
        self.length_gc.update(rec);
        self.quality.update(rec);
        if let Some(pb) = self.per_base.as_mut() {
            pb.update(rec);
        }
    }

    pub fn consume_chunk(&mut self, chunk: &[FastqRecord]) {
        for rec in chunk {
            self.update(rec);
        }
    }

    /// Append `other`, which must cover input that follows `self` in the stream.
    pub fn merge(&mut self, other: StatsAccumulator) {
        self.length_gc.merge(other.length_gc);
        self.quality.merge(other.quality);
        match (self.per_base.as_mut(), other.per_base.as_ref()) {
            (Some(dst), Some(src)) => dst.merge(src),
            (None, Some(src)) => self.per_base = Some(src.clone()),
            _ => {}
        }
    }

    pub fn totals(&self) -> RunningTotals {
        self.length_gc.totals
    }

    /// Freeze into the final snapshot. Runs N50 and the quality summary.
    pub fn finalize(self, poor_quality_sequences: u64, cfg: &StatsConfig) -> FinalStatistics {
        let totals = self.length_gc.totals;
        let encoding = self.quality.encoding();

        let n50_value = if cfg.skip_n50 {
            0
        } else {
            let selection = LengthSelection {
                min_length: cfg.min_length,
                max_length: cfg.max_length,
                subsample: cfg.subsample,
                seed: cfg.subsample_seed,
            };
            if selection.is_identity() {
                n50(&self.length_gc.lengths)
            } else {
                n50(&selection.apply(&self.length_gc.lengths))
            }
        };

        let quality_stats = QualityStats::finalize(
            &self.quality.per_read,
            self.quality.decoded_counts(),
            cfg.quality_threshold,
            cfg.high_quality_threshold,
        );

        let average_length = if totals.total_sequences > 0 {
            totals.total_length as f64 / totals.total_sequences as f64
        } else {
            0.0
        };

        FinalStatistics {
            total_sequences: totals.total_sequences,
            poor_quality_sequences,
            total_length: totals.total_length,
            lengths: self.length_gc.lengths,
            gc_count: totals.gc_count,
            gc_contents: self.length_gc.gc_contents,
            per_base_content: self.per_base.map(|pb| pb.finalize()),
            quality_stats,
            n50_value,
            average_length,
            gc_content: gc_percent(totals.gc_count, totals.total_length),
            encoding,
        }
    }
}

/// Result of one analysis pass. Built once, never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct FinalStatistics {
    pub total_sequences: u64,
    /// Malformed records skipped by the reader.
    pub poor_quality_sequences: u64,
    pub total_length: u64,
    pub lengths: Vec<usize>,
    pub gc_count: u64,
    pub gc_contents: Vec<f64>,
    /// `None` when per-base analysis was skipped.
    pub per_base_content: Option<Vec<PerBaseContentRow>>,
    pub quality_stats: QualityStats,
    pub n50_value: usize,
    pub average_length: f64,
    /// Overall GC percentage.
    pub gc_content: f64,
    pub encoding: Encoding,
}
