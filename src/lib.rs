//! Streaming FASTQ quality-control statistics.
//!
//! - Plain and `.gz` input (auto-detect), or any `BufRead`.
//! - Strict four-line records; malformed records are skipped and counted.
//! - Records are batched into chunks and fed to length/GC, quality and
//!   per-base accumulators in one pass; chunk size never changes results.
//! - N50 and the quality summary are computed once the stream is exhausted.
//! - Optional chunk-parallel accumulation (`StatsConfig::threads`).
//! - Optional `mmap` for plain files; `zlib` feature for system-zlib parity.
//! - Optional async API behind `async` feature.

pub mod chunk;
pub mod config;
pub mod engine;
pub mod error;
pub mod policy;
pub mod reader;
pub mod record;
pub mod stats;
mod util;

#[cfg(feature = "async")]
pub mod async_reader;

pub use crate::config::{Encoding, EncodingChoice, StatsConfig};
pub use crate::engine::{analyze_path, analyze_reader, analyze_records};
pub use crate::error::{AnalysisError, ConfigError, FastqError, FormatError, IoContext};
pub use crate::policy::{ErrorPolicy, ReaderOptions};
pub use crate::reader::{FastqReader, Source};
pub use crate::record::FastqRecord;
pub use crate::stats::{FinalStatistics, PerBaseContentRow, QualityStats, n50};

#[cfg(feature = "async")]
pub use crate::async_reader::AsyncFastqReader;
#[cfg(feature = "async")]
pub use crate::engine::analyze_path_async;
