use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy)]
pub struct IoContext {
    pub byte_pos: u64,
    pub line_num: u64,
}

impl IoContext {
    pub(crate) const START: IoContext = IoContext {
        byte_pos: 0,
        line_num: 0,
    };
}

/// Why a four-line group was rejected as a record.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("expected header '@' at start of record")]
    MissingHeader,
    #[error("found FASTA header '>' where FASTQ '@' expected")]
    FastaHeaderDetected,
    #[error("missing '+' separator line")]
    MissingPlus,
    #[error("unexpected EOF inside record")]
    UnexpectedEof,
    #[error("quality length ({qual}) does not match sequence length ({seq})")]
    LengthMismatch { seq: usize, qual: usize },
    #[error("header line is not valid UTF-8")]
    InvalidUtf8,
    #[error("quality byte 0x{byte:02x} at offset {offset} is outside '!'..='~'")]
    InvalidQuality { byte: u8, offset: usize },
    #[error("invalid nucleotide symbol {symbol:?} at sequence offset {offset}")]
    InvalidBase { symbol: char, offset: usize },
}

#[derive(Debug, Error)]
pub enum FastqError {
    #[error("I/O error at {ctx:?}: {source}")]
    Io {
        #[source]
        source: io::Error,
        ctx: IoContext,
    },
    #[error("format error at {ctx:?}: {source}")]
    Format {
        #[source]
        source: FormatError,
        ctx: IoContext,
    },
}

impl FastqError {
    pub(crate) fn io_err(source: io::Error, ctx: IoContext) -> Self {
        Self::Io { source, ctx }
    }
    pub(crate) fn fmt_err(source: FormatError, ctx: IoContext) -> Self {
        Self::Format { source, ctx }
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}

/// Rejected analysis settings. Raised before any input is opened.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("quality threshold ({low}) must be less than high quality threshold ({high})")]
    ThresholdOrder { low: i32, high: i32 },
    #[error("chunk size must be at least 1")]
    ZeroChunkSize,
    #[error("thread count must be at least 1")]
    ZeroThreads,
    #[error("unknown quality encoding {0:?} (expected phred33, phred64 or auto)")]
    UnknownEncoding(String),
    #[error("max length ({max}) must be greater than min length ({min})")]
    LengthRange { min: usize, max: usize },
    #[error("subsample size must be at least 1")]
    ZeroSubsample,
}

/// Error returned by the analysis entry points.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Read(#[from] FastqError),
}
