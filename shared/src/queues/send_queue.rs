use std::collections::{hash_map, HashMap};

use crate::{
    config::MessagingConfig,
    delivery::NetworkDelivery,
    types::PeerId,
    wire::{BatchWriter, FramingError, MessageHeader},
};

/// One in-progress batch bound for a single peer
pub struct SendQueueItem {
    delivery: NetworkDelivery,
    batch: BatchWriter,
}

impl SendQueueItem {
    pub fn new(delivery: NetworkDelivery, config: &MessagingConfig) -> Result<Self, FramingError> {
        let max_capacity = config.batch_capacity(delivery);
        let initial_capacity = config.initial_batch_capacity.min(max_capacity);
        Ok(Self {
            delivery,
            batch: BatchWriter::new(initial_capacity, max_capacity)?,
        })
    }

    pub fn delivery(&self) -> NetworkDelivery {
        self.delivery
    }

    pub fn message_count(&self) -> u16 {
        self.batch.message_count()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    pub fn byte_length(&self) -> usize {
        self.batch.byte_length()
    }

    pub fn can_fit(&self, payload_length: usize) -> bool {
        self.batch.can_fit(payload_length)
    }

    pub fn write_message(
        &mut self,
        header: MessageHeader,
        payload: &[u8],
    ) -> Result<(), FramingError> {
        self.batch.write_message(header, payload)
    }

    /// Finalizes the batch header and releases the batch buffer to the caller
    pub fn finish(self) -> Result<Vec<u8>, FramingError> {
        self.batch.finish()
    }
}

/// The ordered batches waiting to be flushed to one peer
#[derive(Default)]
pub struct SendQueue {
    items: Vec<SendQueueItem>,
}

impl SendQueue {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[SendQueueItem] {
        &self.items
    }

    /// Total messages across every queued batch
    pub fn message_count(&self) -> usize {
        self.items
            .iter()
            .map(|item| usize::from(item.message_count()))
            .sum()
    }

    /// Starts a new tail batch, whatever the state of the current one
    pub fn open_batch(
        &mut self,
        delivery: NetworkDelivery,
        config: &MessagingConfig,
    ) -> Result<&mut SendQueueItem, FramingError> {
        self.items.push(SendQueueItem::new(delivery, config)?);
        let index = self.items.len() - 1;
        Ok(&mut self.items[index])
    }

    /// Returns the batch the next message should be appended to. The current
    /// tail is reused only if it has the same delivery mode and room for the
    /// payload; otherwise a new tail is started.
    pub fn tail_for(
        &mut self,
        delivery: NetworkDelivery,
        payload_length: usize,
        config: &MessagingConfig,
    ) -> Result<&mut SendQueueItem, FramingError> {
        let reuse_tail = matches!(
            self.items.last(),
            Some(tail) if tail.delivery == delivery && tail.can_fit(payload_length)
        );
        if !reuse_tail {
            return self.open_batch(delivery, config);
        }
        let index = self.items.len() - 1;
        Ok(&mut self.items[index])
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, SendQueueItem> {
        self.items.drain(..)
    }
}

/// Per-peer send queues. A peer has an entry from connect until disconnect.
#[derive(Default)]
pub struct SendQueues {
    queues: HashMap<PeerId, SendQueue>,
}

impl SendQueues {
    pub fn new() -> Self {
        Self {
            queues: HashMap::new(),
        }
    }

    /// Adds an empty queue for the peer. Returns false if one already exists,
    /// in which case it is left untouched.
    pub fn connect(&mut self, peer_id: PeerId) -> bool {
        match self.queues.entry(peer_id) {
            hash_map::Entry::Occupied(_) => false,
            hash_map::Entry::Vacant(entry) => {
                entry.insert(SendQueue::new());
                true
            }
        }
    }

    /// Removes the peer's queue, discarding every unsent batch. Returns the
    /// discarded queue, or None if the peer was not connected.
    pub fn disconnect(&mut self, peer_id: PeerId) -> Option<SendQueue> {
        self.queues.remove(&peer_id)
    }

    pub fn contains(&self, peer_id: PeerId) -> bool {
        self.queues.contains_key(&peer_id)
    }

    pub fn get(&self, peer_id: PeerId) -> Option<&SendQueue> {
        self.queues.get(&peer_id)
    }

    pub fn get_mut(&mut self, peer_id: PeerId) -> Option<&mut SendQueue> {
        self.queues.get_mut(&peer_id)
    }

    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    pub fn peers(&self) -> impl Iterator<Item = PeerId> + '_ {
        self.queues.keys().copied()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&PeerId, &mut SendQueue)> {
        self.queues.iter_mut()
    }
}
