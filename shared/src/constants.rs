use volley_serde::MTU_SIZE_BYTES;

use crate::types::PeerId;

/// Batch capacity for every delivery mode that must fit a single datagram
pub const DEFAULT_SMALL_BATCH_CAPACITY: usize = MTU_SIZE_BYTES;

/// Batch capacity for `NetworkDelivery::ReliableFragmentedSequenced`, where
/// the transport splits and reassembles the batch itself
pub const DEFAULT_FRAGMENTED_BATCH_CAPACITY: usize = 64_000;

/// The message header stores payload length in a signed 16-bit field
pub const MAX_MESSAGE_LENGTH: usize = i16::MAX as usize;

/// Tags are a single byte, and 255 is kept out of use
pub const MAX_MESSAGE_TYPES: usize = 255;

pub const DEFAULT_LOCAL_PEER_ID: PeerId = i64::MAX as PeerId;
