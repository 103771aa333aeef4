use crate::config::Encoding;
use crate::record::FastqRecord;
use std::collections::BTreeMap;

/// Counts indexed by the raw quality byte.
pub type RawQualHist = [u64; 256];

/// Per-read mean quality and the all-bases quality histogram.
#[derive(Clone, Debug)]
pub struct QualityAccumulator {
    encoding: Encoding,
    pub per_read: Vec<f64>,
    pub hist: RawQualHist,
}

impl QualityAccumulator {
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            per_read: Vec::new(),
            hist: [0u64; 256],
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Reads with an empty quality string are skipped entirely.
    pub fn update(&mut self, rec: &FastqRecord) {
        if rec.qual.is_empty() {
            return;
        }
        let offset = i64::from(self.encoding.offset());
        let mut sum: i64 = 0;
        for &q in &rec.qual {
            self.hist[q as usize] += 1;
            sum += i64::from(q) - offset;
        }
        self.per_read.push(sum as f64 / rec.qual.len() as f64);
    }

    pub fn merge(&mut self, other: QualityAccumulator) {
        debug_assert_eq!(self.encoding, other.encoding);
        self.per_read.extend(other.per_read);
        for (dst, src) in self.hist.iter_mut().zip(other.hist.iter()) {
            *dst += *src;
        }
    }

    /// Histogram keyed by decoded score; only observed scores appear.
    pub fn decoded_counts(&self) -> BTreeMap<i32, u64> {
        self.hist
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(byte, &count)| (decode_score(byte as u8, self.encoding), count))
            .collect()
    }
}

#[inline]
pub fn decode_score(q: u8, encoding: Encoding) -> i32 {
    i32::from(q) - i32::from(encoding.offset())
}

/// Guess the encoding from a sample of quality bytes.
///
/// Phred+33 files almost always contain bytes below ';' (58); Phred+64 never
/// goes below '@' (64). Anything in between is treated as Phred+33.
pub fn detect_encoding(sample: &[u8]) -> Encoding {
    match sample.iter().min() {
        None => Encoding::Phred33,
        Some(&min) if min < 58 => Encoding::Phred33,
        Some(&min) if min >= 64 => Encoding::Phred64,
        Some(_) => Encoding::Phred33,
    }
}
