use crate::error::SerdeErr;

/// A readable cursor borrowing a byte slice
#[derive(Clone)]
pub struct BufferReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> BufferReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn length(&self) -> usize {
        self.buffer.len()
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    /// Whether `length` more bytes can be read at the cursor
    pub fn try_begin_read(&self, length: usize) -> bool {
        length <= self.remaining()
    }

    pub fn seek(&mut self, position: usize) -> Result<(), SerdeErr> {
        if position > self.buffer.len() {
            return Err(SerdeErr::OutOfBounds {
                position,
                bound: self.buffer.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// Returns the next `length` bytes and advances past them. The returned
    /// slice borrows the underlying buffer, not the reader.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8], SerdeErr> {
        if !self.try_begin_read(length) {
            return Err(SerdeErr::Underflow {
                requested: length,
                remaining: self.remaining(),
            });
        }
        let start = self.position;
        self.position += length;
        Ok(&self.buffer[start..self.position])
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SerdeErr> {
        let bytes = self.read_bytes(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(bytes);
        Ok(array)
    }

    /// Everything from the cursor to the end, without advancing
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.buffer[self.position..]
    }
}

/// A reader that owns its bytes, so it can outlive the buffer it was copied
/// from. The memory is released when this value is dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedBufferReader {
    buffer: Box<[u8]>,
}

impl OwnedBufferReader {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            buffer: bytes.into(),
        }
    }

    pub fn borrow(&self) -> BufferReader<'_> {
        BufferReader::new(&self.buffer)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }
}

impl From<Vec<u8>> for OwnedBufferReader {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            buffer: bytes.into_boxed_slice(),
        }
    }
}
