use volley_serde::{BufferReader, BufferWrite, ConstByteLength, Serde, SerdeErr};

/// Leads every batch; counts the messages that follow it
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchHeader {
    pub batch_size: u16,
}

impl BatchHeader {
    pub const BYTE_LENGTH: usize = 2;

    pub fn new(batch_size: u16) -> Self {
        Self { batch_size }
    }

    pub fn to_bytes(&self) -> [u8; Self::BYTE_LENGTH] {
        self.batch_size.to_le_bytes()
    }
}

impl Serde for BatchHeader {
    fn ser(&self, writer: &mut dyn BufferWrite) -> Result<(), SerdeErr> {
        self.batch_size.ser(writer)
    }

    fn de(reader: &mut BufferReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            batch_size: u16::de(reader)?,
        })
    }

    fn byte_length(&self) -> usize {
        Self::BYTE_LENGTH
    }
}

impl ConstByteLength for BatchHeader {
    fn const_byte_length() -> usize {
        Self::BYTE_LENGTH
    }
}
