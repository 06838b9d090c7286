//! Frame buffer shared by receive and every reply built from it
//!
//! The engine never copies a frame: it receives into one buffer, rewrites
//! headers in place, and transmits from the same bytes.

use core::ops::{Deref, DerefMut};

use crate::drivers::net::enc28j60::consts::MAX_FRAMELEN;

/// Read a big-endian 16-bit field
pub fn read_be16(buf: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([buf[at], buf[at + 1]])
}

/// Write a big-endian 16-bit field
pub fn write_be16(buf: &mut [u8], at: usize, value: u16) {
    buf[at..at + 2].copy_from_slice(&value.to_be_bytes());
}

/// Fixed-size, caller-owned frame buffer
///
/// `N` includes the spare byte the driver uses to terminate a received
/// frame, so a buffer of `N` bytes receives frames of at most `N - 1`.
#[derive(Clone)]
pub struct PacketBuffer<const N: usize> {
    data: [u8; N],
}

impl<const N: usize> PacketBuffer<N> {
    pub const fn new() -> Self {
        Self { data: [0; N] }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Largest frame `receive` can place in this buffer
    pub const fn max_frame_len(&self) -> usize {
        N.saturating_sub(1)
    }

    /// Zero the whole buffer
    pub fn clear(&mut self) {
        self.data = [0; N];
    }
}

impl<const N: usize> Default for PacketBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Deref for PacketBuffer<N> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl<const N: usize> DerefMut for PacketBuffer<N> {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// Room for one maximum-size Ethernet frame plus the terminator
pub type StandardFrameBuffer = PacketBuffer<{ MAX_FRAMELEN as usize + 1 }>;
