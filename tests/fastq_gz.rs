use kira_fastq_stats::{FastqReader, ReaderOptions, StatsConfig, analyze_path};
use std::fs::File;
use std::io::Write;
use tempfile::tempdir;

#[cfg(feature = "gzip")]
fn write_gz(path: &std::path::Path, members: &[&str]) {
    let mut f = File::create(path).unwrap();
    for text in members {
        let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
        enc.write_all(text.as_bytes()).unwrap();
        f.write_all(&enc.finish().unwrap()).unwrap();
    }
}

#[cfg(feature = "gzip")]
#[test]
fn parse_gz_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sample.fastq.gz");
    write_gz(&path, &["@x\nACGT\n+\n!!!!\n"]);

    let mut fq = FastqReader::from_path(&path, ReaderOptions::default()).expect("open gz");

    let rec = fq.next().unwrap().unwrap();
    assert_eq!(rec.id, "x");
    assert_eq!(rec.seq, b"ACGT");
    assert_eq!(rec.qual, b"!!!!");
    assert!(fq.next().is_none());
}

#[cfg(feature = "gzip")]
#[test]
fn gzip_detected_by_magic_without_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("reads.fq");
    write_gz(&path, &["@a\nGGCC\n+\nIIII\n", "@b\nAT\n+\nII\n"]);

    let stats = analyze_path(&path, &StatsConfig::default()).unwrap();
    assert_eq!(stats.total_sequences, 2);
    assert_eq!(stats.total_length, 6);
    assert_eq!(stats.gc_count, 4);
}

#[cfg(feature = "gzip")]
#[test]
fn plain_and_gz_give_same_statistics() {
    let text = "@a\nGGCCAT\n+\nIIII##\n@b\nACGTAC\n+\n55555I\n@c\nNNA\n+\n!!!\n";
    let dir = tempdir().unwrap();
    let plain = dir.path().join("reads.fastq");
    std::fs::write(&plain, text).unwrap();
    let gz = dir.path().join("reads.fastq.gz");
    write_gz(&gz, &[text]);

    let cfg = StatsConfig::default();
    let a = analyze_path(&plain, &cfg).unwrap();
    let b = analyze_path(&gz, &cfg).unwrap();
    assert_eq!(a, b);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = analyze_path(dir.path().join("absent.fastq"), &StatsConfig::default()).unwrap_err();
    match err {
        kira_fastq_stats::AnalysisError::Read(kira_fastq_stats::FastqError::Io { .. }) => {}
        other => panic!("expected I/O error, got {other:?}"),
    }
}

#[cfg(feature = "gzip")]
#[test]
fn truncated_gz_fails_the_pass() {
    let mut text = String::new();
    for i in 0..5_000 {
        text.push_str(&format!("@r{i}\nACGTTGCA{}\n+\nIIII#III{}\n", i % 10, i % 10));
    }
    let dir = tempdir().unwrap();
    let full = dir.path().join("full.fastq.gz");
    write_gz(&full, &[&text]);
    let bytes = std::fs::read(&full).unwrap();
    let cut = dir.path().join("cut.fastq.gz");
    std::fs::write(&cut, &bytes[..bytes.len() / 2]).unwrap();

    for threads in [1usize, 3] {
        let cfg = StatsConfig {
            threads,
            chunk_size: 100,
            encoding: kira_fastq_stats::EncodingChoice::Fixed(kira_fastq_stats::Encoding::Phred33),
            ..StatsConfig::default()
        };
        match analyze_path(&cut, &cfg) {
            Err(kira_fastq_stats::AnalysisError::Read(kira_fastq_stats::FastqError::Io {
                ..
            })) => {}
            other => panic!("threads {threads}: expected I/O error, got {other:?}"),
        }
    }
}
