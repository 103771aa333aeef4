use kira_fastq_stats::{ErrorPolicy, FastqError, FastqReader, FormatError, ReaderOptions};
use std::io::BufReader;

const SAMPLE: &str = "\
@read1 desc
ACGTN
+
!!!!!
@read2
ACGT
+read2
####";

fn strict() -> ReaderOptions {
    ReaderOptions {
        error_policy: ErrorPolicy::Return,
        check_alphabet: false,
    }
}

fn reader(text: &'static str, opts: ReaderOptions) -> FastqReader {
    FastqReader::from_bufread(BufReader::new(text.as_bytes()), opts)
}

#[test]
fn parse_two_records() {
    let mut fq = reader(SAMPLE, strict());

    let r1 = fq.next().unwrap().unwrap();
    assert_eq!(r1.id, "read1");
    assert_eq!(r1.desc.as_deref(), Some("desc"));
    assert_eq!(r1.seq, b"ACGTN");
    assert_eq!(r1.qual, b"!!!!!");
    assert_eq!(r1.len(), 5);

    let r2 = fq.next().unwrap().unwrap();
    assert_eq!(r2.id, "read2");
    assert_eq!(r2.desc, None);
    assert_eq!(r2.seq, b"ACGT");
    assert_eq!(r2.qual, b"####");

    assert!(fq.next().is_none());
    assert_eq!(fq.malformed(), 0);
}

#[test]
fn crlf_line_endings() {
    let mut fq = reader("@r1\r\nACGT\r\n+\r\nIIII\r\n", strict());
    let r = fq.next().unwrap().unwrap();
    assert_eq!(r.seq, b"ACGT");
    assert_eq!(r.qual, b"IIII");
    assert!(fq.next().is_none());
}

#[test]
fn blank_header_line_ends_stream() {
    let text = "@r1\nA\n+\nI\n\n@r2\nC\n+\nI\n";
    let fq = reader(text, strict());
    let ids: Vec<String> = fq.map(|r| r.unwrap().id).collect();
    assert_eq!(ids, vec!["r1".to_string()]);
}

#[test]
fn missing_plus_reported_in_return_mode() {
    let bad = "\
@r1
ACG
T
####
";
    let mut fq = reader(bad, strict());
    match fq.next().unwrap().unwrap_err() {
        FastqError::Format {
            source: FormatError::MissingPlus,
            ctx,
        } => assert_eq!(ctx.line_num, 0),
        other => panic!("expected MissingPlus, got {other:?}"),
    }
    assert_eq!(fq.malformed(), 1);
}

#[test]
fn fasta_header_detected() {
    let mut fq = reader(">r1\nACGT\n+\nIIII\n", strict());
    let err = fq.next().unwrap().unwrap_err();
    assert!(matches!(
        err,
        FastqError::Format {
            source: FormatError::FastaHeaderDetected,
            ..
        }
    ));
}

#[test]
fn length_mismatch_skipped_in_skip_mode() {
    let bad = "\
@r1
ACGT
+
###
@r2
A
+
#";
    let mut fq = reader(bad, ReaderOptions::default());

    // r1 is consumed as one four-line group and dropped
    let r = fq.next().unwrap().unwrap();
    assert_eq!(r.id, "r2");
    assert_eq!(r.seq, b"A");
    assert_eq!(r.qual, b"#");
    assert!(fq.next().is_none());
    assert_eq!(fq.malformed(), 1);
}

#[test]
fn skip_mode_does_not_resync() {
    // The bad group is exactly four lines; the next group starts right after.
    let text = "\
r1
ACGT
+
IIII
@r2
GG
+
II
";
    let mut fq = reader(text, ReaderOptions::default());
    let r = fq.next().unwrap().unwrap();
    assert_eq!(r.id, "r2");
    assert!(fq.next().is_none());
    assert_eq!(fq.malformed(), 1);
}

#[test]
fn truncated_trailing_record_is_malformed() {
    let text = "\
@r1
ACGT
+
IIII
@r2
ACGT
";
    let mut fq = reader(text, ReaderOptions::default());
    assert_eq!(fq.next().unwrap().unwrap().id, "r1");
    assert!(fq.next().is_none());
    assert_eq!(fq.malformed(), 1);

    let mut fq = reader(text, strict());
    fq.next().unwrap().unwrap();
    let err = fq.next().unwrap().unwrap_err();
    assert!(matches!(
        err,
        FastqError::Format {
            source: FormatError::UnexpectedEof,
            ..
        }
    ));
}

#[test]
fn alphabet_check_rejects_unknown_symbols() {
    let text = "@r1\nACXT\n+\nIIII\n@r2\nacgtn\n+\nIIIII\n";
    let mut fq = reader(
        text,
        ReaderOptions {
            error_policy: ErrorPolicy::Return,
            check_alphabet: true,
        },
    );
    match fq.next().unwrap().unwrap_err() {
        FastqError::Format {
            source: FormatError::InvalidBase { symbol, offset },
            ..
        } => {
            assert_eq!(symbol, 'X');
            assert_eq!(offset, 2);
        }
        other => panic!("expected InvalidBase, got {other:?}"),
    }
    // lower case and ambiguity codes are fine
    assert_eq!(fq.next().unwrap().unwrap().id, "r2");
}

#[test]
fn empty_input_yields_nothing() {
    let mut fq = reader("", ReaderOptions::default());
    assert!(fq.next().is_none());
    assert_eq!(fq.malformed(), 0);
}

#[test]
fn non_utf8_quality_byte_is_malformed_not_fatal() {
    let text: &'static [u8] = b"@r1\nACGT\n+\nII\xffI\n@r2\nGG\n+\nII\n";
    let mut fq = FastqReader::from_bufread(text, ReaderOptions::default());
    let r = fq.next().unwrap().unwrap();
    assert_eq!(r.id, "r2");
    assert!(fq.next().is_none());
    assert_eq!(fq.malformed(), 1);

    let mut fq = FastqReader::from_bufread(text, strict());
    match fq.next().unwrap().unwrap_err() {
        FastqError::Format {
            source: FormatError::InvalidQuality { byte, offset },
            ..
        } => {
            assert_eq!(byte, 0xff);
            assert_eq!(offset, 2);
        }
        other => panic!("expected InvalidQuality, got {other:?}"),
    }
    // the stream is still usable after the bad record
    assert_eq!(fq.next().unwrap().unwrap().id, "r2");
}

#[test]
fn non_utf8_header_and_sequence_are_malformed() {
    let text: &'static [u8] = b"@r\xc3\x28\nACGT\n+\nIIII\n@r2\nA\xe9GT\n+\nIIII\n@r3\nAC\n+\nII\n";
    let mut fq = FastqReader::from_bufread(text, strict());
    assert!(matches!(
        fq.next().unwrap().unwrap_err(),
        FastqError::Format {
            source: FormatError::InvalidUtf8,
            ..
        }
    ));
    assert!(matches!(
        fq.next().unwrap().unwrap_err(),
        FastqError::Format {
            source: FormatError::InvalidBase { offset: 1, .. },
            ..
        }
    ));
    assert_eq!(fq.next().unwrap().unwrap().id, "r3");
    assert_eq!(fq.malformed(), 2);
}

#[test]
fn header_surrounding_whitespace_is_trimmed() {
    let mut fq = reader(" @r1 lane:2 \nACGT\n+\nIIII\n", strict());
    let r = fq.next().unwrap().unwrap();
    assert_eq!(r.id, "r1");
    assert_eq!(r.desc.as_deref(), Some("lane:2"));
    assert!(fq.next().is_none());
    assert_eq!(fq.malformed(), 0);
}
