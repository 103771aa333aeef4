use crate::record::FastqRecord;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BaseCounts {
    pub a: u64,
    pub t: u64,
    pub g: u64,
    pub c: u64,
    /// N and every other symbol.
    pub n: u64,
}

impl BaseCounts {
    #[inline]
    fn add(&mut self, base: u8) {
        match base.to_ascii_uppercase() {
            b'A' => self.a += 1,
            b'T' => self.t += 1,
            b'G' => self.g += 1,
            b'C' => self.c += 1,
            _ => self.n += 1,
        }
    }

    fn add_assign(&mut self, other: &BaseCounts) {
        self.a += other.a;
        self.t += other.t;
        self.g += other.g;
        self.c += other.c;
        self.n += other.n;
    }

    #[inline]
    pub fn total(&self) -> u64 {
        self.a + self.t + self.g + self.c + self.n
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PerBaseContentRow {
    pub position: usize,
    pub a: f64,
    pub t: f64,
    pub g: f64,
    pub c: f64,
}

/// Base counts indexed by read position, grown to the longest read seen.
#[derive(Clone, Debug, Default)]
pub struct PerBaseMatrix {
    positions: Vec<BaseCounts>,
}

impl PerBaseMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, rec: &FastqRecord) {
        let len = rec.seq.len();
        if self.positions.len() < len {
            self.positions.resize(len, BaseCounts::default());
        }
        for (cell, &base) in self.positions.iter_mut().zip(rec.seq.iter()) {
            cell.add(base);
        }
    }

    pub fn merge(&mut self, other: &PerBaseMatrix) {
        if self.positions.len() < other.positions.len() {
            self.positions
                .resize(other.positions.len(), BaseCounts::default());
        }
        for (dst, src) in self.positions.iter_mut().zip(other.positions.iter()) {
            dst.add_assign(src);
        }
    }

    /// Longest read length observed.
    pub fn max_position(&self) -> usize {
        self.positions.len()
    }

    pub fn counts(&self) -> &[BaseCounts] {
        &self.positions
    }

    /// Percentages per position, normalised by the reads that reached it.
    pub fn finalize(&self) -> Vec<PerBaseContentRow> {
        self.positions
            .iter()
            .enumerate()
            .map(|(position, bc)| {
                let total = bc.total();
                let pct = |v: u64| {
                    if total == 0 {
                        0.0
                    } else {
                        v as f64 / total as f64 * 100.0
                    }
                };
                PerBaseContentRow {
                    position,
                    a: pct(bc.a),
                    t: pct(bc.t),
                    g: pct(bc.g),
                    c: pct(bc.c),
                }
            })
            .collect()
    }
}
