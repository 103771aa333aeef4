use crate::error::{FastqError, FormatError, IoContext};
use crate::policy::{ErrorPolicy, ReaderOptions};
use crate::record::FastqRecord;
use crate::util::{chomp, has_gz_extension, looks_like_gzip, open_file};

#[cfg(feature = "gzip")]
use flate2::read::MultiGzDecoder;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum Source {
    Path(PathBuf),
    Reader,
}

/// Sync FASTQ reader (plain/.gz), streaming, strictly four lines per record.
pub struct FastqReader {
    src: Source,
    rdr: Box<dyn BufRead + Send>,
    opts: ReaderOptions,
    line_num: u64,
    byte_pos: u64,
    malformed: u64,
    done: bool,
}

impl FastqReader {
    /// Open from a file path. Auto-detect `.gz` by extension or magic bytes.
    pub fn from_path<P: AsRef<Path>>(path: P, opts: ReaderOptions) -> Result<Self, FastqError> {
        let path = path.as_ref();
        let f = open_file(path).map_err(|e| FastqError::io_err(e, IoContext::START))?;

        let is_gz = has_gz_extension(path) || looks_like_gzip(&f).unwrap_or(false);

        let rdr: Box<dyn BufRead + Send> = if is_gz {
            #[cfg(feature = "gzip")]
            {
                let dec = MultiGzDecoder::new(f);
                Box::new(BufReader::with_capacity(256 * 1024, dec))
            }
            #[cfg(not(feature = "gzip"))]
            {
                return Err(FastqError::io_err(
                    io::Error::new(
                        io::ErrorKind::Unsupported,
                        "gzip input requires the `gzip` feature",
                    ),
                    IoContext::START,
                ));
            }
        } else {
            #[cfg(feature = "mmap")]
            {
                use memmap2::Mmap;
                use std::io::Cursor;
                // Own the Mmap inside Cursor to avoid self-ref problems
                let mmap = unsafe { Mmap::map(&f) }
                    .map_err(|e| FastqError::io_err(e, IoContext::START))?;
                Box::new(BufReader::with_capacity(512 * 1024, Cursor::new(mmap)))
            }
            #[cfg(not(feature = "mmap"))]
            {
                Box::new(BufReader::with_capacity(256 * 1024, f))
            }
        };

        log::debug!("opened {} (gzip: {is_gz})", path.display());

        Ok(Self {
            src: Source::Path(path.to_path_buf()),
            rdr,
            opts,
            line_num: 0,
            byte_pos: 0,
            malformed: 0,
            done: false,
        })
    }

    /// Wrap an arbitrary `BufRead` (stdin, etc.).
    pub fn from_bufread<R: BufRead + Send + 'static>(reader: R, opts: ReaderOptions) -> Self {
        Self {
            src: Source::Reader,
            rdr: Box::new(reader),
            opts,
            line_num: 0,
            byte_pos: 0,
            malformed: 0,
            done: false,
        }
    }

    pub fn source(&self) -> &Source {
        &self.src
    }

    /// Number of malformed four-line groups seen so far.
    pub fn malformed(&self) -> u64 {
        self.malformed
    }

    /// Iterator-style `next` record.
    pub fn next(&mut self) -> Option<Result<FastqRecord, FastqError>> {
        loop {
            if self.done {
                return None;
            }
            match self.read_one() {
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

    fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        buf.clear();
        let n = self.rdr.read_until(b'\n', buf)?;
        if n > 0 {
            self.line_num += 1;
            self.byte_pos += n as u64;
            chomp(buf);
        }
        Ok(n)
    }

    fn read_one(&mut self) -> Result<Option<FastqRecord>, FastqError> {
        let start = self.ctx();
        let mut lines: [Vec<u8>; 4] = [
            Vec::with_capacity(128),
            Vec::with_capacity(256),
            Vec::with_capacity(8),
            Vec::with_capacity(256),
        ];

        // Header: absent or blank ends the stream.
        let n = self
            .read_line(&mut lines[0])
            .map_err(|e| FastqError::io_err(e, self.ctx()))?;
        if n == 0 || lines[0].trim_ascii().is_empty() {
            return Ok(None);
        }

        for line in lines[1..].iter_mut() {
            let n = self
                .read_line(line)
                .map_err(|e| FastqError::io_err(e, self.ctx()))?;
            if n == 0 {
                return Err(FastqError::fmt_err(FormatError::UnexpectedEof, start));
            }
        }

        let [header, seq, plus, qual] = lines;
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

impl Iterator for FastqReader {
    type Item = Result<FastqRecord, FastqError>;
    fn next(&mut self) -> Option<Self::Item> {
        FastqReader::next(self)
    }
}

/// Validate one four-line group (terminators already stripped).
///
/// Lines stay raw bytes; only the header is decoded, so a stray non-UTF-8
/// byte makes the record malformed instead of failing the stream.
pub(crate) fn parse_record(
    header: &[u8],
    seq: &[u8],
    plus: &[u8],
    qual: &[u8],
    opts: &ReaderOptions,
) -> Result<FastqRecord, FormatError> {
    let header = header.trim_ascii();
    let Some(header) = header.strip_prefix(b"@") else {
        if header.starts_with(b">") {
            return Err(FormatError::FastaHeaderDetected);
        }
        return Err(FormatError::MissingHeader);
    };
    if !plus.trim_ascii_start().starts_with(b"+") {
        return Err(FormatError::MissingPlus);
    }
    let header = std::str::from_utf8(header).map_err(|_| FormatError::InvalidUtf8)?;
    let seq = seq.trim_ascii();
    let qual = qual.trim_ascii();
    if seq.len() != qual.len() {
        return Err(FormatError::LengthMismatch {
            seq: seq.len(),
            qual: qual.len(),
        });
    }

    if let Some(offset) = qual.iter().position(|q| !(b'!'..=b'~').contains(q)) {
        return Err(FormatError::InvalidQuality {
            byte: qual[offset],
            offset,
        });
    }
    if let Some(offset) = seq.iter().position(|b| !b.is_ascii()) {
        return Err(FormatError::InvalidBase {
            symbol: char::from(seq[offset]),
            offset,
        });
    }

    let rec = FastqRecord::new(header, seq, qual);
    if opts.check_alphabet {
        rec.check_alphabet()?;
    }
    Ok(rec)
}
