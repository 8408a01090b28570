/// The largest payload a single unfragmented datagram is assumed to carry
pub const MTU_SIZE_BYTES: usize = 1300;

/// Strings and collections are prefixed with a `u16` length
pub const MAX_COLLECTION_LENGTH: usize = u16::MAX as usize;
