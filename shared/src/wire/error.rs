use thiserror::Error;

use volley_serde::SerdeErr;

use crate::types::MessageTag;

/// Errors that can occur while building or parsing a batch.
///
/// SECURITY: the parsing variants describe untrusted network input. They end
/// parsing of the current batch only and never close the connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FramingError {
    /// Buffer is shorter than a batch header
    #[error("Received a packet of {length} bytes, too small to contain a batch header")]
    TruncatedBatchHeader { length: usize },

    /// Batch ended before the header of one of its declared messages
    #[error("Batch declared more messages than it contains: message {index} has no header ({remaining} bytes left)")]
    TruncatedMessageHeader { index: u16, remaining: usize },

    /// A message header claims more payload than the batch holds, or a negative size
    #[error("Message {index} claims a size of {declared} bytes but only {remaining} bytes remain in the batch")]
    CorruptSize {
        index: u16,
        declared: i16,
        remaining: usize,
    },

    /// A message carries a tag with no registered message type
    #[error("Received a message with unregistered type tag {tag}")]
    UnknownMessageType { tag: MessageTag },

    /// Appending a message would exceed the batch's capacity
    #[error("Batch cannot fit {requested} more bytes ({remaining} bytes of capacity remain)")]
    BatchFull { requested: usize, remaining: usize },

    /// Underlying buffer access failed
    #[error("Buffer error while framing batch: {0}")]
    Serde(#[from] SerdeErr),
}
