use crate::{
    constants::{
        DEFAULT_FRAGMENTED_BATCH_CAPACITY, DEFAULT_LOCAL_PEER_ID, DEFAULT_SMALL_BATCH_CAPACITY,
        MAX_MESSAGE_LENGTH,
    },
    delivery::NetworkDelivery,
    error::ConfigError,
    types::PeerId,
    wire::{BatchHeader, MessageHeader},
};

/// Contains Config properties which will be used by the MessagingSystem
#[derive(Clone, Debug)]
pub struct MessagingConfig {
    /// Messages addressed to this peer are looped back into the incoming
    /// queue instead of being batched
    pub local_peer_id: PeerId,
    /// Maximum batch size, in bytes, for every delivery mode except
    /// `ReliableFragmentedSequenced`
    pub small_batch_capacity: usize,
    /// Maximum batch size, in bytes, for `ReliableFragmentedSequenced`
    pub fragmented_batch_capacity: usize,
    /// Allocation made up front for each new batch, which grows on demand
    pub initial_batch_capacity: usize,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            local_peer_id: DEFAULT_LOCAL_PEER_ID,
            small_batch_capacity: DEFAULT_SMALL_BATCH_CAPACITY,
            fragmented_batch_capacity: DEFAULT_FRAGMENTED_BATCH_CAPACITY,
            initial_batch_capacity: DEFAULT_SMALL_BATCH_CAPACITY,
        }
    }
}

impl MessagingConfig {
    /// Smallest capacity that holds a batch with one single-byte message
    pub const MIN_BATCH_CAPACITY: usize = BatchHeader::BYTE_LENGTH + MessageHeader::BYTE_LENGTH + 1;

    pub fn batch_capacity(&self, delivery: NetworkDelivery) -> usize {
        if delivery.is_fragmented() {
            self.fragmented_batch_capacity
        } else {
            self.small_batch_capacity
        }
    }

    /// Largest payload a message sent with `delivery` may serialize to
    pub fn max_message_length(&self, delivery: NetworkDelivery) -> usize {
        self.batch_capacity(delivery)
            .saturating_sub(BatchHeader::BYTE_LENGTH + MessageHeader::BYTE_LENGTH)
            .min(MAX_MESSAGE_LENGTH)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (class, capacity) in [
            ("small", self.small_batch_capacity),
            ("fragmented", self.fragmented_batch_capacity),
        ] {
            if capacity < Self::MIN_BATCH_CAPACITY {
                return Err(ConfigError::BatchCapacityTooSmall {
                    class,
                    capacity,
                    minimum: Self::MIN_BATCH_CAPACITY,
                });
            }
        }
        if self.small_batch_capacity > self.fragmented_batch_capacity {
            return Err(ConfigError::SmallExceedsFragmented {
                small: self.small_batch_capacity,
                fragmented: self.fragmented_batch_capacity,
            });
        }
        Ok(())
    }
}
