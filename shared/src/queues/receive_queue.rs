use std::mem;

use volley_serde::OwnedBufferReader;

use crate::{
    types::{PeerId, Timestamp},
    wire::MessageHeader,
};

/// A parsed message waiting to be dispatched. The payload is a private copy,
/// so it outlives the transport buffer it arrived in.
#[derive(Clone, Debug)]
pub struct ReceiveQueueItem {
    pub header: MessageHeader,
    pub reader: OwnedBufferReader,
    pub sender_id: PeerId,
    pub timestamp: Timestamp,
}

impl ReceiveQueueItem {
    pub fn new(
        header: MessageHeader,
        payload: &[u8],
        sender_id: PeerId,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            header,
            reader: OwnedBufferReader::new(payload),
            sender_id,
            timestamp,
        }
    }
}

/// Messages in arrival order, decoupling receipt from dispatch
#[derive(Default)]
pub struct IncomingMessageQueue {
    items: Vec<ReceiveQueueItem>,
}

impl IncomingMessageQueue {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ReceiveQueueItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReceiveQueueItem> {
        self.items.iter()
    }

    /// Removes every queued item. Anything pushed afterwards waits for the
    /// next call.
    pub fn take(&mut self) -> Vec<ReceiveQueueItem> {
        mem::take(&mut self.items)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
