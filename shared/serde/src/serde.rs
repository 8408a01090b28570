use crate::{buffer_reader::BufferReader, buffer_writer::BufferWrite, error::SerdeErr};

/// A type that can be written to and read back from a byte buffer
pub trait Serde: Sized + Clone + PartialEq {
    /// Writes the value into the writer
    fn ser(&self, writer: &mut dyn BufferWrite) -> Result<(), SerdeErr>;

    /// Parses a value from the reader
    fn de(reader: &mut BufferReader) -> Result<Self, SerdeErr>;

    /// Number of bytes `ser` will write for this value
    fn byte_length(&self) -> usize;
}

/// Implemented by types whose encoded length never varies
pub trait ConstByteLength {
    fn const_byte_length() -> usize;
}
