use crate::record::FastqRecord;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunningTotals {
    pub total_sequences: u64,
    pub total_length: u64,
    pub gc_count: u64,
}

/// Per-read length and GC series plus their running totals.
#[derive(Clone, Debug, Default)]
pub struct LengthGcAccumulator {
    pub totals: RunningTotals,
    pub lengths: Vec<usize>,
    pub gc_contents: Vec<f64>,
}

impl LengthGcAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, rec: &FastqRecord) {
        let len = rec.seq.len();
        let gc = count_gc(&rec.seq);

        self.totals.total_sequences += 1;
        self.totals.total_length += len as u64;
        self.totals.gc_count += gc;
        self.lengths.push(len);
        self.gc_contents.push(gc_percent(gc, len as u64));
    }

    pub fn merge(&mut self, other: LengthGcAccumulator) {
        self.totals.total_sequences += other.totals.total_sequences;
        self.totals.total_length += other.totals.total_length;
        self.totals.gc_count += other.totals.gc_count;
        self.lengths.extend(other.lengths);
        self.gc_contents.extend(other.gc_contents);
    }
}

/// G/C count, case-insensitive.
#[inline]
pub fn count_gc(seq: &[u8]) -> u64 {
    seq.iter()
        .filter(|&&b| matches!(b.to_ascii_uppercase(), b'G' | b'C'))
        .count() as u64
}

/// `gc / len * 100`, or 0 for an empty denominator.
#[inline]
pub fn gc_percent(gc: u64, len: u64) -> f64 {
    if len == 0 {
        0.0
    } else {
        gc as f64 / len as f64 * 100.0
    }
}
