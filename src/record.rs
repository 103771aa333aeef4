use crate::error::FormatError;

/// Nucleotide symbols accepted when alphabet checking is on (IUPAC, upper case).
pub const VALID_BASES: &[u8] = b"ACGTNRYSWKMBDHV";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
}

impl FastqRecord {
    /// Build a record from the header text (without '@'), sequence and quality.
    pub fn new(header: &str, seq: impl Into<Vec<u8>>, qual: impl Into<Vec<u8>>) -> Self {
        let (id, desc) = split_header(header);
        Self {
            id,
            desc,
            seq: seq.into(),
            qual: qual.into(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.seq.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// First symbol outside [`VALID_BASES`], compared case-insensitively.
    pub fn check_alphabet(&self) -> Result<(), FormatError> {
        match self
            .seq
            .iter()
            .position(|b| !VALID_BASES.contains(&b.to_ascii_uppercase()))
        {
            Some(offset) => Err(FormatError::InvalidBase {
                symbol: self.seq[offset] as char,
                offset,
            }),
            None => Ok(()),
        }
    }
}

pub(crate) fn split_header(header: &str) -> (String, Option<String>) {
    let mut parts = header.splitn(2, char::is_whitespace);
    let id = parts.next().unwrap_or("").to_string();
    let desc = parts
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    (id, desc)
}
