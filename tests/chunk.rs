use kira_fastq_stats::FastqRecord;
use kira_fastq_stats::chunk::{Chunker, ProgressTracker};
use kira_fastq_stats::stats::{PerBaseMatrix, StatsAccumulator};
use kira_fastq_stats::Encoding;

fn rec(seq: &str) -> FastqRecord {
    FastqRecord::new("r", seq, "I".repeat(seq.len()))
}

#[test]
fn chunker_emits_full_chunks_and_remainder() {
    let mut chunker = Chunker::new(3);
    let mut full = Vec::new();
    for i in 0..7 {
        if let Some(chunk) = chunker.push(rec(&"A".repeat(i))) {
            full.push(chunk.len());
        }
    }
    assert_eq!(full, vec![3, 3]);
    assert_eq!(chunker.pending(), 1);
    assert_eq!(chunker.finish().map(|c| c.len()), Some(1));

    let empty = Chunker::new(3);
    assert!(empty.finish().is_none());
}

#[test]
fn progress_counts_every_record() {
    let mut progress = ProgressTracker::new(2);
    for _ in 0..5 {
        progress.tick();
    }
    assert_eq!(progress.seen(), 5);
}

#[test]
fn per_base_matrix_grows_to_longest_read() {
    let mut m = PerBaseMatrix::new();
    m.update(&rec("AC"));
    m.update(&rec("GGGGG"));
    assert_eq!(m.max_position(), 5);
    let counts = m.counts();
    assert_eq!(counts[0].total(), 2);
    assert_eq!(counts[4].total(), 1);
    assert_eq!(counts[1].c + counts[1].g, 2);
}

#[test]
fn merged_accumulators_equal_single_pass() {
    let reads = ["ACGT", "GG", "", "NNNAC", "tta"];

    let mut single = StatsAccumulator::new(Encoding::Phred33, false);
    for r in reads {
        single.update(&rec(r));
    }

    let mut left = StatsAccumulator::new(Encoding::Phred33, false);
    left.consume_chunk(&[rec(reads[0]), rec(reads[1])]);
    let mut right = StatsAccumulator::new(Encoding::Phred33, false);
    right.consume_chunk(&[rec(reads[2]), rec(reads[3]), rec(reads[4])]);
    left.merge(right);

    assert_eq!(left.totals(), single.totals());
    assert_eq!(left.length_gc.lengths, single.length_gc.lengths);
    assert_eq!(left.quality.per_read, single.quality.per_read);
    assert_eq!(
        left.per_base.as_ref().map(|m| m.counts().to_vec()),
        single.per_base.as_ref().map(|m| m.counts().to_vec())
    );
}
