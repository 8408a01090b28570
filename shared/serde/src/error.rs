use thiserror::Error;

/// Errors produced while writing to or reading from a buffer view
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// A write would move the cursor past the writer's maximum capacity
    #[error("Write of {requested} bytes exceeds the remaining writer capacity of {remaining} bytes")]
    Overflow { requested: usize, remaining: usize },

    /// A read would move the cursor past the end of the buffer
    #[error("Read of {requested} bytes exceeds the {remaining} bytes remaining in the buffer")]
    Underflow { requested: usize, remaining: usize },

    /// A seek or patch targeted a position outside the buffer
    #[error("Position {position} is outside the buffer bound of {bound} bytes")]
    OutOfBounds { position: usize, bound: usize },

    /// The bytes read do not form a valid value of the expected type
    #[error("Invalid value for {type_name}: {reason}")]
    InvalidValue {
        type_name: &'static str,
        reason: &'static str,
    },

    /// A string or collection is too long for its length prefix
    #[error("Length {length} exceeds the maximum encodable length of {max}")]
    LengthExceeded { length: usize, max: usize },
}
