//! Physical main memory.
//!
//! A flat byte array of `frame_count * page_size` bytes, carved into
//! equal-sized frames. Frames are filled from the backing store on a page
//! fault and read one byte at a time by translations.

use crate::common::addr::{FrameNumber, PhysAddr};

/// Simulated main memory.
#[derive(Debug, Clone)]
pub struct PhysicalMemory {
    data: Vec<u8>,
    frame_size: usize,
}

impl PhysicalMemory {
    /// Creates zeroed memory of `frame_count` frames of `frame_size` bytes.
    pub fn new(frame_count: u32, frame_size: u32) -> Self {
        let frame_size = frame_size as usize;
        Self {
            data: vec![0; frame_count as usize * frame_size],
            frame_size,
        }
    }

    /// Mutable view of one whole frame, or `None` if the frame does not exist.
    pub fn frame_mut(&mut self, frame: FrameNumber) -> Option<&mut [u8]> {
        let start = frame as usize * self.frame_size;
        self.data.get_mut(start..start + self.frame_size)
    }

    /// View of one whole frame, or `None` if the frame does not exist.
    pub fn frame(&self, frame: FrameNumber) -> Option<&[u8]> {
        let start = frame as usize * self.frame_size;
        self.data.get(start..start + self.frame_size)
    }

    /// Reads the signed byte at `addr`, or `None` past the end of memory.
    #[inline]
    pub fn read_byte(&self, addr: PhysAddr) -> Option<i8> {
        self.data
            .get(usize::try_from(addr.val()).ok()?)
            .map(|&b| b as i8)
    }

    /// Total size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` for zero-sized memory.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes per frame.
    pub const fn frame_size(&self) -> usize {
        self.frame_size
    }
}
