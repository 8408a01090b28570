//! The batch wire format.
//!
//! ```text
//! Batch         := BatchHeader Message*
//! BatchHeader   := batch_size: u16
//! Message       := MessageHeader payload: [u8; message_size]
//! MessageHeader := message_type: u8, message_size: i16
//! ```
//!
//! All integers are little-endian. There is no padding, alignment,
//! compression or checksum; integrity belongs to the transport.

mod batch_header;
mod batch_reader;
mod batch_writer;
pub mod error;
mod message_header;

pub use batch_header::BatchHeader;
pub use batch_reader::BatchReader;
pub use batch_writer::BatchWriter;
pub use error::FramingError;
pub use message_header::MessageHeader;
