//! Address Stream Loader.
//!
//! Reads the logical addresses to translate. It performs:
//! 1. **Parsing:** One decimal address per line; surrounding whitespace is ignored.
//! 2. **Blank lines:** Skipped (a trailing newline is not a record).
//! 3. **Rejection:** Anything that is not a non-negative integer fitting in 32 bits is
//!    reported as `MalformedInput` with its line number. Range checking against the
//!    address space is left to the translator.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::common::addr::LogicalAddr;
use crate::common::error::{SimError, SimResult};

/// Iterator over the addresses of a line-oriented stream.
#[derive(Debug)]
pub struct AddressReader<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> AddressReader<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }
}

/// Parses one trimmed record.
///
/// # Errors
///
/// Returns [`SimError::MalformedInput`] for anything but a `u32` in decimal.
pub fn parse_address(record: &str, line: usize) -> SimResult<LogicalAddr> {
    record
        .parse::<u32>()
        .map(LogicalAddr::new)
        .map_err(|_| SimError::MalformedInput {
            line,
            record: record.to_string(),
        })
}

impl<R: BufRead> Iterator for AddressReader<R> {
    type Item = SimResult<LogicalAddr>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = match self.lines.next()? {
                Ok(raw) => raw,
                Err(e) => return Some(Err(SimError::Io(e))),
            };
            self.line += 1;
            let record = raw.trim();
            if record.is_empty() {
                continue;
            }
            return Some(parse_address(record, self.line));
        }
    }
}

/// Opens an address file.
///
/// # Errors
///
/// Returns [`SimError::Io`] if the file cannot be opened.
pub fn open_addresses(path: impl AsRef<Path>) -> SimResult<AddressReader<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(AddressReader::new(BufReader::new(file)))
}
