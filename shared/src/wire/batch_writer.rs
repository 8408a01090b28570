use volley_serde::{BufferWrite, BufferWriter, Serde};

use super::{error::FramingError, BatchHeader, MessageHeader};

/// Builds one batch. The first bytes of the buffer are reserved for the
/// `BatchHeader`, whose count is only known once every message has been
/// appended, and are filled in by `finish`.
pub struct BatchWriter {
    writer: BufferWriter,
    header: BatchHeader,
}

impl BatchWriter {
    pub fn new(initial_capacity: usize, max_capacity: usize) -> Result<Self, FramingError> {
        let mut writer = BufferWriter::new(initial_capacity, max_capacity);
        writer.seek(BatchHeader::BYTE_LENGTH)?;
        Ok(Self {
            writer,
            header: BatchHeader::default(),
        })
    }

    pub fn message_count(&self) -> u16 {
        self.header.batch_size
    }

    pub fn is_empty(&self) -> bool {
        self.header.batch_size == 0
    }

    /// Bytes written so far, header region included
    pub fn byte_length(&self) -> usize {
        self.writer.length()
    }

    pub fn max_capacity(&self) -> usize {
        self.writer.max_capacity()
    }

    /// Whether a message with a payload of `payload_length` bytes fits
    pub fn can_fit(&self, payload_length: usize) -> bool {
        self.header.batch_size < u16::MAX
            && self
                .writer
                .try_begin_write(MessageHeader::BYTE_LENGTH + payload_length)
    }

    pub fn write_message(
        &mut self,
        header: MessageHeader,
        payload: &[u8],
    ) -> Result<(), FramingError> {
        if !self.can_fit(payload.len()) {
            return Err(FramingError::BatchFull {
                requested: MessageHeader::BYTE_LENGTH + payload.len(),
                remaining: self.writer.remaining_capacity(),
            });
        }
        header.ser(&mut self.writer)?;
        self.writer.write_bytes(payload)?;
        self.header.batch_size += 1;
        Ok(())
    }

    /// Writes the final message count into the reserved header region and
    /// hands back the finished batch
    pub fn finish(mut self) -> Result<Vec<u8>, FramingError> {
        self.writer.patch_at(0, &self.header.to_bytes())?;
        Ok(self.writer.to_bytes())
    }
}
