use volley_serde::{BufferReader, BufferWrite, ConstByteLength, Serde, SerdeErr};

use crate::types::MessageTag;

/// Precedes each message payload inside a batch
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MessageHeader {
    pub message_type: MessageTag,
    pub message_size: i16,
}

impl MessageHeader {
    pub const BYTE_LENGTH: usize = 3;

    pub fn new(message_type: MessageTag, message_size: i16) -> Self {
        Self {
            message_type,
            message_size,
        }
    }

    /// Payload length, if the declared size is not negative
    pub fn payload_length(&self) -> Option<usize> {
        usize::try_from(self.message_size).ok()
    }
}

impl Serde for MessageHeader {
    fn ser(&self, writer: &mut dyn BufferWrite) -> Result<(), SerdeErr> {
        self.message_type.ser(writer)?;
        self.message_size.ser(writer)
    }

    fn de(reader: &mut BufferReader) -> Result<Self, SerdeErr> {
        let message_type = MessageTag::de(reader)?;
        let message_size = i16::de(reader)?;
        Ok(Self {
            message_type,
            message_size,
        })
    }

    fn byte_length(&self) -> usize {
        Self::BYTE_LENGTH
    }
}

impl ConstByteLength for MessageHeader {
    fn const_byte_length() -> usize {
        Self::BYTE_LENGTH
    }
}
