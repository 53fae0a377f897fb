//! Backing Store.
//!
//! The read-only secondary storage pages are loaded from on a fault. It is
//! addressed by byte offset; the translator only ever asks for page-aligned,
//! page-sized blocks at `page * page_size`. Two implementations are provided:
//! 1. **`MemoryBackingStore`:** the whole store held in a byte vector (a file read up front).
//! 2. **`FileBackingStore`:** random-access reads from an open file.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use crate::common::error::BackingStoreError;

/// Byte-addressable, read-only page source.
pub trait BackingStore: fmt::Debug {
    /// Fills `buf` with the bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`BackingStoreError::OutOfBounds`] if the block extends past
    /// the end of the store and [`BackingStoreError::Io`] on read failure.
    fn read_block(&mut self, offset: u64, buf: &mut [u8]) -> Result<(), BackingStoreError>;

    /// Store size in bytes.
    fn len(&self) -> u64;

    /// Returns `true` for an empty store.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Checks that `[offset, offset + len)` lies within a store of `size` bytes.
fn check_bounds(offset: u64, len: usize, size: u64) -> Result<(), BackingStoreError> {
    match offset.checked_add(len as u64) {
        Some(end) if end <= size => Ok(()),
        _ => Err(BackingStoreError::OutOfBounds { offset, len, size }),
    }
}

/// Backing store held entirely in memory.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MemoryBackingStore {
    data: Vec<u8>,
}

impl MemoryBackingStore {
    /// Wraps an existing byte vector.
    pub const fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Reads a whole file into memory.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(fs::read(path)?))
    }

    /// Raw contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for MemoryBackingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBackingStore")
            .field("len", &self.data.len())
            .finish()
    }
}

impl BackingStore for MemoryBackingStore {
    fn read_block(&mut self, offset: u64, buf: &mut [u8]) -> Result<(), BackingStoreError> {
        check_bounds(offset, buf.len(), self.len())?;
        let start = offset as usize;
        buf.copy_from_slice(&self.data[start..start + buf.len()]);
        Ok(())
    }

    fn len(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Backing store read on demand from an open file.
#[derive(Debug)]
pub struct FileBackingStore {
    file: File,
    size: u64,
}

impl FileBackingStore {
    /// Opens `path` for random-access reads.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be opened or stat'ed.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Ok(Self { file, size })
    }
}

impl BackingStore for FileBackingStore {
    fn read_block(&mut self, offset: u64, buf: &mut [u8]) -> Result<(), BackingStoreError> {
        check_bounds(offset, buf.len(), self.size)?;
        let _ = self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(buf)?;
        Ok(())
    }

    fn len(&self) -> u64 {
        self.size
    }
}

impl<B: BackingStore + ?Sized> BackingStore for Box<B> {
    fn read_block(&mut self, offset: u64, buf: &mut [u8]) -> Result<(), BackingStoreError> {
        (**self).read_block(offset, buf)
    }

    fn len(&self) -> u64 {
        (**self).len()
    }
}
