// SPDX-License-Identifier: MIT OR Apache-2.0

//! Byte ring buffer over caller-provided storage.
//!
//! Copies never cross the wrap point. A copy larger than the contiguous
//! window is truncated, the next call picks up the wrapped remainder.

/// Byte ring buffer over borrowed storage.
///
/// `pos_in == pos_out` is ambiguous. The `full` flag tells a full buffer
/// apart from an empty one.
#[derive(Debug)]
pub struct RingBuffer<'b> {
    data: &'b mut [u8],
    pos_in: usize,
    pos_out: usize,
    full: bool,
}

impl<'b> RingBuffer<'b> {
    /// Creates an empty buffer. `data` must not be empty.
    pub(crate) const fn new(data: &'b mut [u8]) -> Self {
        Self {
            data,
            pos_in: 0,
            pos_out: 0,
            full: false,
        }
    }

    /// Drops all content.
    pub(crate) const fn reset(&mut self) {
        self.pos_in = 0;
        self.pos_out = 0;
        self.full = false;
    }

    /// Returns the size of the storage.
    pub(crate) const fn capacity(&self) -> usize {
        self.data.len()
    }

    pub(crate) const fn is_full(&self) -> bool {
        self.full
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.pos_in == self.pos_out && !self.full
    }

    /// Returns the amount of stored bytes.
    #[cfg(test)]
    pub(crate) const fn len(&self) -> usize {
        if self.full {
            self.capacity()
        } else if self.pos_in >= self.pos_out {
            self.pos_in - self.pos_out
        } else {
            self.capacity() - self.pos_out + self.pos_in
        }
    }

    /// Returns the free window up to the wrap point.
    pub(crate) fn free_window(&mut self) -> &mut [u8] {
        let free = if self.full {
            0
        } else if self.pos_in >= self.pos_out {
            self.capacity() - self.pos_in
        } else {
            self.pos_out - self.pos_in
        };
        &mut self.data[self.pos_in..self.pos_in + free]
    }

    /// Marks `n` bytes of [`Self::free_window`] as written.
    pub(crate) fn commit_in(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        self.pos_in = (self.pos_in + n) % self.capacity();
        self.full = self.pos_in == self.pos_out;
    }

    /// Returns the stored window up to the wrap point.
    pub(crate) fn used_window(&self) -> &[u8] {
        let used = if self.is_empty() {
            0
        } else if self.pos_out >= self.pos_in {
            self.capacity() - self.pos_out
        } else {
            self.pos_in - self.pos_out
        };
        &self.data[self.pos_out..self.pos_out + used]
    }

    /// Marks `n` bytes of [`Self::used_window`] as consumed.
    pub(crate) fn commit_out(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        self.pos_out = (self.pos_out + n) % self.capacity();
        self.full = false;
    }

    /// Copies as much of `src` as fits into the free window. Returns the
    /// amount of bytes taken, zero if the buffer is full.
    pub(crate) fn push(&mut self, src: &[u8]) -> usize {
        let window = self.free_window();
        let n = window.len().min(src.len());
        window[..n].copy_from_slice(&src[..n]);
        self.commit_in(n);
        n
    }

    /// Copies as much of the used window as fits into `dst`. Returns the
    /// amount of bytes copied, zero if the buffer is empty.
    pub(crate) fn pop(&mut self, dst: &mut [u8]) -> usize {
        let window = self.used_window();
        let n = window.len().min(dst.len());
        dst[..n].copy_from_slice(&window[..n]);
        self.commit_out(n);
        n
    }
}
