#![cfg(feature = "async")]

use crate::error::{FastqError, FormatError, IoContext};
use crate::policy::{ErrorPolicy, ReaderOptions};
use crate::reader::parse_record;
use crate::record::FastqRecord;
use crate::util::{chomp, has_gz_extension};

use async_compression::tokio::bufread::GzipDecoder;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::io::{AsyncReadExt, AsyncSeekExt, SeekFrom};

#[derive(Debug)]
pub enum AsyncSource {
    Path(PathBuf),
    Reader,
}

/// Async FASTQ reader (plain/.gz), streaming, four lines per record.
pub struct AsyncFastqReader {
    src: AsyncSource,
    rdr: BufReader<Box<dyn AsyncBufRead + Unpin + Send>>,
    opts: ReaderOptions,
    line_num: u64,
    byte_pos: u64,
    malformed: u64,
    done: bool,
}

impl AsyncFastqReader {
    /// Open async from path; `.gz` auto-detect by extension or magic bytes.
    pub async fn from_path<P: AsRef<Path>>(
        path: P,
        opts: ReaderOptions,
    ) -> Result<Self, FastqError> {
        let path = path.as_ref().to_path_buf();
        let mut f = File::open(&path)
            .await
            .map_err(|e| FastqError::io_err(e, IoContext::START))?;

        let is_gz =
            has_gz_extension(&path) || looks_like_gzip_async(&mut f).await.unwrap_or(false);

        let inner: Box<dyn AsyncBufRead + Unpin + Send> = if is_gz {
            let mut gz = GzipDecoder::new(BufReader::with_capacity(256 * 1024, f));
            gz.multiple_members(true);
            Box::new(BufReader::with_capacity(256 * 1024, gz))
        } else {
            Box::new(BufReader::with_capacity(256 * 1024, f))
        };

        Ok(Self {
            src: AsyncSource::Path(path),
            rdr: BufReader::with_capacity(256 * 1024, inner),
            opts,
            line_num: 0,
            byte_pos: 0,
            malformed: 0,
            done: false,
        })
    }

    /// Wrap any async `AsyncBufRead`.
    pub fn from_async_bufread<R>(reader: R, opts: ReaderOptions) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let inner: Box<dyn AsyncBufRead + Unpin + Send> = Box::new(reader);
        Self {
            src: AsyncSource::Reader,
            rdr: BufReader::with_capacity(256 * 1024, inner),
            opts,
            line_num: 0,
            byte_pos: 0,
            malformed: 0,
            done: false,
        }
    }

    pub fn source(&self) -> &AsyncSource {
        &self.src
    }

    /// Number of malformed four-line groups seen so far.
    pub fn malformed(&self) -> u64 {
        self.malformed
    }

    /// Fetch next record (async).
    pub async fn next_record(&mut self) -> Option<Result<FastqRecord, FastqError>> {
        loop {
            if self.done {
                return None;
            }
            match self.read_one().await {
                Ok(Some(rec)) => return Some(Ok(rec)),
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(err) if err.is_format() => {
                    self.malformed += 1;
                    if self.opts.error_policy == ErrorPolicy::Return {
                        return Some(Err(err));
                    }
                    log::warn!("skipping malformed record: {err}");
                }
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }

    async fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        buf.clear();
        let n = self.rdr.read_until(b'\n', buf).await?;
        if n > 0 {
            self.line_num += 1;
            self.byte_pos += n as u64;
            chomp(buf);
        }
        Ok(n)
    }

    async fn read_one(&mut self) -> Result<Option<FastqRecord>, FastqError> {
        let start = self.ctx();
        let mut header = Vec::with_capacity(128);
        let n = self
            .read_line(&mut header)
            .await
            .map_err(|e| FastqError::io_err(e, self.ctx()))?;
        if n == 0 || header.trim_ascii().is_empty() {
            return Ok(None);
        }

        let mut rest: [Vec<u8>; 3] = Default::default();
        for line in rest.iter_mut() {
            let n = self
                .read_line(line)
                .await
                .map_err(|e| FastqError::io_err(e, self.ctx()))?;
            if n == 0 {
                return Err(FastqError::fmt_err(FormatError::UnexpectedEof, start));
            }
        }

        let [seq, plus, qual] = rest;
        parse_record(&header, &seq, &plus, &qual, &self.opts)
            .map(Some)
            .map_err(|e| FastqError::fmt_err(e, start))
    }

    #[inline]
    fn ctx(&self) -> IoContext {
        IoContext {
            byte_pos: self.byte_pos,
            line_num: self.line_num,
        }
    }
}

async fn looks_like_gzip_async(f: &mut File) -> io::Result<bool> {
    let pos = f.stream_position().await?;
    let mut magic = [0u8; 2];
    let n = f.read(&mut magic).await?;
    f.seek(SeekFrom::Start(pos)).await?;
    Ok(n >= 2 && magic == [0x1F, 0x8B])
}
