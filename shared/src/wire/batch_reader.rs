use std::iter::FusedIterator;

use volley_serde::{BufferReader, Serde};

use super::{error::FramingError, BatchHeader, MessageHeader};

/// Parses a received batch, yielding each message header with a slice of
/// its payload. Every read is bounds-checked before it happens; the first
/// failure is yielded as an error and ends iteration, so nothing after a
/// corrupt header is ever trusted.
pub struct BatchReader<'a> {
    reader: BufferReader<'a>,
    header: BatchHeader,
    read_count: u16,
    failed: bool,
}

impl<'a> BatchReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self, FramingError> {
        let mut reader = BufferReader::new(bytes);
        if !reader.try_begin_read(BatchHeader::BYTE_LENGTH) {
            return Err(FramingError::TruncatedBatchHeader {
                length: bytes.len(),
            });
        }
        let header = BatchHeader::de(&mut reader)?;

        Ok(Self {
            reader,
            header,
            read_count: 0,
            failed: false,
        })
    }

    pub fn header(&self) -> BatchHeader {
        self.header
    }

    pub fn declared_count(&self) -> u16 {
        self.header.batch_size
    }

    /// Messages successfully read so far
    pub fn read_count(&self) -> u16 {
        self.read_count
    }

    pub fn byte_length(&self) -> usize {
        self.reader.length()
    }

    /// Bytes after the cursor; non-zero after a complete parse means the
    /// batch carried trailing data
    pub fn remaining(&self) -> usize {
        self.reader.remaining()
    }

    fn read_message(&mut self) -> Result<(MessageHeader, &'a [u8]), FramingError> {
        if !self.reader.try_begin_read(MessageHeader::BYTE_LENGTH) {
            return Err(FramingError::TruncatedMessageHeader {
                index: self.read_count,
                remaining: self.reader.remaining(),
            });
        }
        let header = MessageHeader::de(&mut self.reader)?;

        let corrupt_size = FramingError::CorruptSize {
            index: self.read_count,
            declared: header.message_size,
            remaining: self.reader.remaining(),
        };
        let Some(length) = header.payload_length() else {
            return Err(corrupt_size);
        };
        if !self.reader.try_begin_read(length) {
            return Err(corrupt_size);
        }
        let payload = self.reader.read_bytes(length)?;

        self.read_count += 1;
        Ok((header, payload))
    }
}

impl<'a> Iterator for BatchReader<'a> {
    type Item = Result<(MessageHeader, &'a [u8]), FramingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.read_count >= self.header.batch_size {
            return None;
        }

        let result = self.read_message();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

impl FusedIterator for BatchReader<'_> {}
