use crate::error::ConfigError;
use crate::policy::ReaderOptions;
use std::fmt;
use std::str::FromStr;

/// Quality score encoding: score = byte - offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Sanger / Illumina 1.8+.
    Phred33,
    /// Illumina 1.3-1.7.
    Phred64,
}

impl Encoding {
    #[inline]
    pub fn offset(self) -> u8 {
        match self {
            Encoding::Phred33 => 33,
            Encoding::Phred64 => 64,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::Phred33 => "phred33",
            Encoding::Phred64 => "phred64",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoding requested by the caller; `Auto` is resolved from a sample of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingChoice {
    Fixed(Encoding),
    Auto,
}

impl Default for EncodingChoice {
    fn default() -> Self {
        EncodingChoice::Fixed(Encoding::Phred33)
    }
}

impl FromStr for EncodingChoice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "phred33" | "33" | "sanger" => Ok(EncodingChoice::Fixed(Encoding::Phred33)),
            "phred64" | "64" => Ok(EncodingChoice::Fixed(Encoding::Phred64)),
            "auto" => Ok(EncodingChoice::Auto),
            _ => Err(ConfigError::UnknownEncoding(s.to_string())),
        }
    }
}

/// Knobs for one analysis pass.
#[derive(Debug, Clone)]
pub struct StatsConfig {
    /// Reads with a mean quality below this are low quality.
    pub quality_threshold: i32,
    /// Reads with a mean quality at or above this are high quality.
    pub high_quality_threshold: i32,
    pub encoding: EncodingChoice,
    /// Records per chunk. Affects memory and throughput only.
    pub chunk_size: usize,
    /// Do not build the per-position base matrix at all.
    pub skip_perbase: bool,
    pub skip_n50: bool,
    /// Shortest length fed to N50 (inclusive); 0 keeps everything.
    pub min_length: usize,
    /// Longest length fed to N50 (inclusive).
    pub max_length: Option<usize>,
    /// Draw this many lengths for N50 when the series is longer.
    pub subsample: Option<usize>,
    pub subsample_seed: u64,
    /// Worker threads for chunk accumulation; 1 keeps everything on the caller's thread.
    pub threads: usize,
    /// Log progress every N sequences; 0 disables.
    pub progress_interval: u64,
    pub reader: ReaderOptions,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            quality_threshold: 20,
            high_quality_threshold: 30,
            encoding: EncodingChoice::default(),
            chunk_size: 10_000,
            skip_perbase: false,
            skip_n50: false,
            min_length: 0,
            max_length: None,
            subsample: None,
            subsample_seed: 42,
            threads: 1,
            progress_interval: 50_000,
            reader: ReaderOptions::default(),
        }
    }
}

impl StatsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quality_threshold >= self.high_quality_threshold {
            return Err(ConfigError::ThresholdOrder {
                low: self.quality_threshold,
                high: self.high_quality_threshold,
            });
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        if let Some(max) = self.max_length {
            if max <= self.min_length {
                return Err(ConfigError::LengthRange {
                    min: self.min_length,
                    max,
                });
            }
        }
        if self.subsample == Some(0) {
            return Err(ConfigError::ZeroSubsample);
        }
        Ok(())
    }
}
