//! Record batching between the reader and the accumulators.

use crate::record::FastqRecord;
use std::mem;

pub type Chunk = Vec<FastqRecord>;

/// Collects records into chunks of at most `capacity`.
pub struct Chunker {
    capacity: usize,
    buf: Chunk,
}

impl Chunker {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            buf: Vec::with_capacity(capacity.min(1 << 16)),
        }
    }

    /// Add a record; returns the chunk once it is full.
    pub fn push(&mut self, rec: FastqRecord) -> Option<Chunk> {
        self.buf.push(rec);
        if self.buf.len() >= self.capacity {
            let next = Vec::with_capacity(self.capacity.min(1 << 16));
            Some(mem::replace(&mut self.buf, next))
        } else {
            None
        }
    }

    /// Remaining partial chunk, if any.
    pub fn finish(self) -> Option<Chunk> {
        if self.buf.is_empty() {
            None
        } else {
            Some(self.buf)
        }
    }

    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

/// Periodic progress notification.
pub struct ProgressTracker {
    interval: u64,
    seen: u64,
}

impl ProgressTracker {
    pub fn new(interval: u64) -> Self {
        Self { interval, seen: 0 }
    }

    pub fn tick(&mut self) {
        self.seen += 1;
        if self.interval > 0 && self.seen % self.interval == 0 {
            log::info!("processed {} sequences", self.seen);
        }
    }

    pub fn seen(&self) -> u64 {
        self.seen
    }
}
