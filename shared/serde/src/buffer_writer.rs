use crate::{constants::MTU_SIZE_BYTES, error::SerdeErr};

/// Sink for serialized bytes. Implemented by `BufferWriter`, which stores
/// them, and `ByteCounter`, which only measures them.
pub trait BufferWrite {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), SerdeErr>;

    fn write_byte(&mut self, byte: u8) -> Result<(), SerdeErr> {
        self.write_bytes(&[byte])
    }
}

/// A writable cursor over an owned, growable byte buffer.
///
/// The backing allocation starts at `initial_capacity` and grows on demand,
/// but the cursor can never pass `max_capacity`. A write that would cross
/// that bound fails with `SerdeErr::Overflow` and leaves the buffer untouched.
/// A writer built with `BufferWriter::fixed` has equal initial and maximum
/// capacity and never reallocates.
pub struct BufferWriter {
    buffer: Vec<u8>,
    position: usize,
    max_capacity: usize,
}

impl BufferWriter {
    pub fn new(initial_capacity: usize, max_capacity: usize) -> Self {
        let max_capacity = max_capacity.max(initial_capacity);
        Self {
            buffer: Vec::with_capacity(initial_capacity),
            position: 0,
            max_capacity,
        }
    }

    pub fn fixed(capacity: usize) -> Self {
        Self::new(capacity, capacity)
    }

    /// Cursor position, in bytes from the start of the buffer
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes that hold data, including any region skipped by `seek`
    pub fn length(&self) -> usize {
        self.buffer.len()
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn remaining_capacity(&self) -> usize {
        self.max_capacity - self.position
    }

    /// Whether `length` more bytes can be written at the cursor
    pub fn try_begin_write(&self, length: usize) -> bool {
        length <= self.remaining_capacity()
    }

    /// Moves the cursor. Seeking past the current length zero-fills the gap,
    /// which is how a fixed-size header region is reserved ahead of its
    /// contents.
    pub fn seek(&mut self, position: usize) -> Result<(), SerdeErr> {
        if position > self.max_capacity {
            return Err(SerdeErr::OutOfBounds {
                position,
                bound: self.max_capacity,
            });
        }
        if position > self.buffer.len() {
            self.buffer.resize(position, 0);
        }
        self.position = position;
        Ok(())
    }

    /// Overwrites bytes that were already written, without moving the cursor
    pub fn patch_at(&mut self, position: usize, bytes: &[u8]) -> Result<(), SerdeErr> {
        let end = position + bytes.len();
        if end > self.buffer.len() {
            return Err(SerdeErr::OutOfBounds {
                position: end,
                bound: self.buffer.len(),
            });
        }
        self.buffer[position..end].copy_from_slice(bytes);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn to_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Empties the buffer and rewinds the cursor, keeping the allocation
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.position = 0;
    }
}

impl Default for BufferWriter {
    fn default() -> Self {
        Self::fixed(MTU_SIZE_BYTES)
    }
}

impl BufferWrite for BufferWriter {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), SerdeErr> {
        if !self.try_begin_write(bytes.len()) {
            return Err(SerdeErr::Overflow {
                requested: bytes.len(),
                remaining: self.remaining_capacity(),
            });
        }

        let end = self.position + bytes.len();
        if end > self.buffer.len() {
            self.buffer.resize(end, 0);
        }
        self.buffer[self.position..end].copy_from_slice(bytes);
        self.position = end;
        Ok(())
    }
}

/// Measures how many bytes a sequence of writes would produce
#[derive(Default)]
pub struct ByteCounter {
    count: usize,
}

impl ByteCounter {
    pub fn new() -> Self {
        Self { count: 0 }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl BufferWrite for ByteCounter {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), SerdeErr> {
        self.count += bytes.len();
        Ok(())
    }
}
