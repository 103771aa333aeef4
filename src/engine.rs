//! Analysis driver: reader → chunker → accumulators → final statistics.

use crate::chunk::{Chunk, Chunker, ProgressTracker};
use crate::config::{Encoding, EncodingChoice, StatsConfig};
use crate::error::{AnalysisError, FastqError};
use crate::reader::{FastqReader, Source};
use crate::record::FastqRecord;
use crate::stats::{FinalStatistics, StatsAccumulator, detect_encoding};

use crossbeam_channel as channel;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;
use std::thread;

/// Records buffered to resolve [`EncodingChoice::Auto`].
pub const ENCODING_SAMPLE_RECORDS: usize = 1_000;

/// Analyze a FASTQ file (plain or gzip).
pub fn analyze_path<P: AsRef<Path>>(
    path: P,
    cfg: &StatsConfig,
) -> Result<FinalStatistics, AnalysisError> {
    cfg.validate()?;
    let mut reader = FastqReader::from_path(path, cfg.reader.clone())?;
    run(&mut reader, cfg)
}

/// Analyze FASTQ text from any buffered reader (stdin, in-memory, ...).
pub fn analyze_reader<R: BufRead + Send + 'static>(
    reader: R,
    cfg: &StatsConfig,
) -> Result<FinalStatistics, AnalysisError> {
    cfg.validate()?;
    let mut reader = FastqReader::from_bufread(reader, cfg.reader.clone());
    run(&mut reader, cfg)
}

/// Analyze records parsed elsewhere. `poor_quality_sequences` is reported as-is.
pub fn analyze_records<I>(
    records: I,
    poor_quality_sequences: u64,
    cfg: &StatsConfig,
) -> Result<FinalStatistics, AnalysisError>
where
    I: IntoIterator<Item = FastqRecord>,
{
    cfg.validate()?;
    let acc = accumulate(records.into_iter().map(Ok::<_, FastqError>), cfg)?;
    Ok(finish(acc, poor_quality_sequences, cfg))
}

fn run(reader: &mut FastqReader, cfg: &StatsConfig) -> Result<FinalStatistics, AnalysisError> {
    match reader.source() {
        Source::Path(p) => log::info!("analyzing {}", p.display()),
        Source::Reader => log::info!("analyzing stream input"),
    }
    log::debug!("{cfg:?}");

    let acc = accumulate(&mut *reader, cfg)?;
    Ok(finish(acc, reader.malformed(), cfg))
}

fn finish(acc: StatsAccumulator, malformed: u64, cfg: &StatsConfig) -> FinalStatistics {
    let stats = acc.finalize(malformed, cfg);
    log::info!(
        "processed {} sequences with {} total bases ({} malformed records skipped)",
        stats.total_sequences,
        stats.total_length,
        stats.poor_quality_sequences
    );
    log::debug!(
        "average length {:.1}, GC {:.1}%, N50 {}, average quality {:.1}",
        stats.average_length,
        stats.gc_content,
        stats.n50_value,
        stats.quality_stats.overall_avg_quality
    );
    stats
}

fn accumulate<I>(mut records: I, cfg: &StatsConfig) -> Result<StatsAccumulator, FastqError>
where
    I: Iterator<Item = Result<FastqRecord, FastqError>>,
{
    let (encoding, sampled) = resolve_encoding(&mut records, cfg.encoding)?;
    let records = sampled.into_iter().map(Ok::<_, FastqError>).chain(records);
    if cfg.threads > 1 {
        accumulate_parallel(records, encoding, cfg)
    } else {
        let mut pass = Pass::new(encoding, cfg);
        for item in records {
            pass.push(item?);
        }
        Ok(pass.finish())
    }
}

/// Resolve the quality encoding. For `Auto`, the sampled records are returned
/// so the caller can feed them back in front of the rest of the stream.
fn resolve_encoding<I>(
    records: &mut I,
    choice: EncodingChoice,
) -> Result<(Encoding, Vec<FastqRecord>), FastqError>
where
    I: Iterator<Item = Result<FastqRecord, FastqError>>,
{
    match choice {
        EncodingChoice::Fixed(encoding) => Ok((encoding, Vec::new())),
        EncodingChoice::Auto => {
            let mut sample = Vec::with_capacity(ENCODING_SAMPLE_RECORDS);
            for item in records.by_ref().take(ENCODING_SAMPLE_RECORDS) {
                sample.push(item?);
            }
            let encoding = encoding_of(&sample);
            log::debug!(
                "detected {encoding} from {} sampled records",
                sample.len()
            );
            Ok((encoding, sample))
        }
    }
}

pub(crate) fn encoding_of(sample: &[FastqRecord]) -> Encoding {
    let quals: Vec<u8> = sample.iter().flat_map(|r| r.qual.iter().copied()).collect();
    detect_encoding(&quals)
}

/// Sequential pass state: one accumulator fed chunk by chunk.
pub(crate) struct Pass {
    acc: StatsAccumulator,
    chunker: Chunker,
    progress: ProgressTracker,
}

impl Pass {
    pub(crate) fn new(encoding: Encoding, cfg: &StatsConfig) -> Self {
        Self {
            acc: StatsAccumulator::new(encoding, cfg.skip_perbase),
            chunker: Chunker::new(cfg.chunk_size),
            progress: ProgressTracker::new(cfg.progress_interval),
        }
    }

    pub(crate) fn push(&mut self, rec: FastqRecord) {
        self.progress.tick();
        if let Some(chunk) = self.chunker.push(rec) {
            log::trace!("dispatching chunk of {} records", chunk.len());
            self.acc.consume_chunk(&chunk);
        }
    }

    pub(crate) fn finish(mut self) -> StatsAccumulator {
        if let Some(chunk) = self.chunker.finish() {
            log::trace!("dispatching final chunk of {} records", chunk.len());
            self.acc.consume_chunk(&chunk);
        }
        self.acc
    }
}

/// Merges chunk-local accumulators strictly in chunk order.
struct OrderedMerge {
    merged: StatsAccumulator,
    pending: BTreeMap<usize, StatsAccumulator>,
    next: usize,
}

impl OrderedMerge {
    fn new(merged: StatsAccumulator) -> Self {
        Self {
            merged,
            pending: BTreeMap::new(),
            next: 0,
        }
    }

    fn push(&mut self, index: usize, acc: StatsAccumulator) {
        self.pending.insert(index, acc);
        while let Some(acc) = self.pending.remove(&self.next) {
            self.merged.merge(acc);
            self.next += 1;
        }
    }

    fn finish(self) -> StatsAccumulator {
        debug_assert!(self.pending.is_empty());
        self.merged
    }
}

fn accumulate_parallel<I>(
    records: I,
    encoding: Encoding,
    cfg: &StatsConfig,
) -> Result<StatsAccumulator, FastqError>
where
    I: Iterator<Item = Result<FastqRecord, FastqError>>,
{
    let skip_perbase = cfg.skip_perbase;
    log::debug!("accumulating with {} worker threads", cfg.threads);

    thread::scope(|scope| {
        let (chunk_tx, chunk_rx) = channel::bounded::<(usize, Chunk)>(cfg.threads * 2);
        let (result_tx, result_rx) = channel::unbounded::<(usize, StatsAccumulator)>();

        for _ in 0..cfg.threads {
            let rx = chunk_rx.clone();
            let tx = result_tx.clone();
            scope.spawn(move || {
                for (index, chunk) in rx.iter() {
                    let mut acc = StatsAccumulator::new(encoding, skip_perbase);
                    acc.consume_chunk(&chunk);
                    if tx.send((index, acc)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(chunk_rx);
        drop(result_tx);

        let mut merge = OrderedMerge::new(StatsAccumulator::new(encoding, skip_perbase));
        let produced = feed_chunks(records, cfg, &chunk_tx, &result_rx, &mut merge);
        // Closing the chunk channel lets the workers drain and exit.
        drop(chunk_tx);
        produced?;

        for (index, acc) in result_rx.iter() {
            merge.push(index, acc);
        }
        Ok(merge.finish())
    })
}

fn feed_chunks<I>(
    records: I,
    cfg: &StatsConfig,
    chunk_tx: &channel::Sender<(usize, Chunk)>,
    result_rx: &channel::Receiver<(usize, StatsAccumulator)>,
    merge: &mut OrderedMerge,
) -> Result<(), FastqError>
where
    I: Iterator<Item = Result<FastqRecord, FastqError>>,
{
    let mut chunker = Chunker::new(cfg.chunk_size);
    let mut progress = ProgressTracker::new(cfg.progress_interval);
    let mut index = 0usize;

    for item in records {
        let rec = item?;
        progress.tick();
        if let Some(chunk) = chunker.push(rec) {
            if chunk_tx.send((index, chunk)).is_err() {
                log::debug!("workers gone; stopped dispatching at chunk {index}");
                return Ok(());
            }
            index += 1;
            for (i, acc) in result_rx.try_iter() {
                merge.push(i, acc);
            }
        }
    }
    if let Some(chunk) = chunker.finish() {
        if chunk_tx.send((index, chunk)).is_err() {
            log::debug!("workers gone; final chunk {index} not dispatched");
        }
    }
    Ok(())
}

/// Async variant of [`analyze_path`]; accumulation runs sequentially.
#[cfg(feature = "async")]
pub async fn analyze_path_async<P: AsRef<Path>>(
    path: P,
    cfg: &StatsConfig,
) -> Result<FinalStatistics, AnalysisError> {
    use crate::async_reader::AsyncFastqReader;

    cfg.validate()?;
    let path = path.as_ref();
    log::info!("analyzing {}", path.display());
    let mut reader = AsyncFastqReader::from_path(path, cfg.reader.clone()).await?;

    let mut sampled = Vec::new();
    let encoding = match cfg.encoding {
        EncodingChoice::Fixed(encoding) => encoding,
        EncodingChoice::Auto => {
            while sampled.len() < ENCODING_SAMPLE_RECORDS {
                match reader.next_record().await {
                    Some(item) => sampled.push(item?),
                    None => break,
                }
            }
            let encoding = encoding_of(&sampled);
            log::debug!("detected {encoding} from {} sampled records", sampled.len());
            encoding
        }
    };

    let mut pass = Pass::new(encoding, cfg);
    for rec in sampled {
        pass.push(rec);
    }
    while let Some(item) = reader.next_record().await {
        pass.push(item?);
    }
    Ok(finish(pass.finish(), reader.malformed(), cfg))
}
