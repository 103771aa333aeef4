/// What the reader does with a malformed four-line group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Skip and count the malformed record, keep going (default).
    Skip,
    /// Return the first malformed record to the caller (strict).
    Return,
}

#[derive(Debug, Clone)]
pub struct ReaderOptions {
    pub error_policy: ErrorPolicy,
    /// Reject sequences with symbols outside the IUPAC nucleotide alphabet.
    pub check_alphabet: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::Skip,
            check_alphabet: false,
        }
    }
}
