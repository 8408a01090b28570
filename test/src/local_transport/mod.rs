/// In-memory transport for E2E testing
/// Routes batches between two messaging systems without network I/O

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use volley_shared::{
    MessageSender, NetworkDelivery, NetworkEvent, PeerId, Transport, TransportError,
    DEFAULT_FRAGMENTED_BATCH_CAPACITY, DEFAULT_SMALL_BATCH_CAPACITY,
};

/// Drops a share of unreliable batches, the way a lossy link would.
/// Reliable modes are never dropped, since a real transport retransmits them.
pub struct LinkConditioner {
    loss: f32,
    rng: fastrand::Rng,
}

impl LinkConditioner {
    /// `loss` is the probability, from 0.0 to 1.0, that an unreliable batch
    /// is lost. The seed makes a test run reproducible.
    pub fn new(loss: f32, seed: u64) -> Self {
        Self {
            loss,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn lossless() -> Self {
        Self::new(0.0, 0)
    }

    fn should_drop(&mut self, delivery: NetworkDelivery) -> bool {
        !delivery.is_reliable() && self.rng.f32() < self.loss
    }
}

/// A batch as it was handed to `send`
#[derive(Clone, Debug, PartialEq)]
pub struct SentBatch {
    pub peer_id: PeerId,
    pub delivery: NetworkDelivery,
    pub bytes: Vec<u8>,
}

type PacketQueue = Arc<Mutex<VecDeque<Vec<u8>>>>;
type EventQueue = Arc<Mutex<VecDeque<NetworkEvent>>>;

/// One end of an in-memory link
pub struct LocalTransport {
    remote_id: PeerId,
    outgoing: PacketQueue,
    incoming: PacketQueue,
    events: EventQueue,
    remote_events: EventQueue,
    connected: Arc<Mutex<bool>>,
    conditioner: LinkConditioner,
    sent: Vec<SentBatch>,
    dropped: usize,
}

impl LocalTransport {
    pub fn remote_id(&self) -> PeerId {
        self.remote_id
    }

    pub fn set_conditioner(&mut self, conditioner: LinkConditioner) {
        self.conditioner = conditioner;
    }

    /// Every batch accepted by `send`, including ones the conditioner dropped
    pub fn sent_batches(&self) -> &[SentBatch] {
        &self.sent
    }

    pub fn dropped_count(&self) -> usize {
        self.dropped
    }

    /// Batches delivered to this end and not yet polled
    pub fn pending_count(&self) -> usize {
        self.incoming.lock().unwrap().len()
    }

    /// Delivers raw bytes to this end as though the remote had sent them
    pub fn inject(&mut self, bytes: &[u8]) {
        self.incoming.lock().unwrap().push_back(bytes.to_vec());
    }

    /// Closes the link. Both ends observe a `Disconnect` for the other.
    pub fn disconnect(&mut self, local_id: PeerId) {
        let mut connected = self.connected.lock().unwrap();
        if !*connected {
            return;
        }
        *connected = false;
        self.events
            .lock()
            .unwrap()
            .push_back(NetworkEvent::Disconnect(self.remote_id));
        self.remote_events
            .lock()
            .unwrap()
            .push_back(NetworkEvent::Disconnect(local_id));
    }

    pub fn is_connected(&self) -> bool {
        *self.connected.lock().unwrap()
    }
}

impl MessageSender for LocalTransport {
    fn send(
        &mut self,
        peer_id: PeerId,
        delivery: NetworkDelivery,
        batch: &[u8],
    ) -> Result<(), TransportError> {
        if peer_id != self.remote_id || !self.is_connected() {
            return Err(TransportError::PeerNotFound { peer_id });
        }
        let max = if delivery.is_fragmented() {
            DEFAULT_FRAGMENTED_BATCH_CAPACITY
        } else {
            DEFAULT_SMALL_BATCH_CAPACITY
        };
        if batch.len() > max {
            return Err(TransportError::PayloadTooLarge {
                length: batch.len(),
                max,
            });
        }

        self.sent.push(SentBatch {
            peer_id,
            delivery,
            bytes: batch.to_vec(),
        });
        if self.conditioner.should_drop(delivery) {
            log::trace!("Link conditioner dropped batch to peer {}", peer_id);
            self.dropped += 1;
            return Ok(());
        }
        self.outgoing.lock().unwrap().push_back(batch.to_vec());
        Ok(())
    }
}

impl Transport for LocalTransport {
    fn poll_event(&mut self) -> NetworkEvent {
        if let Some(event) = self.events.lock().unwrap().pop_front() {
            return event;
        }
        match self.incoming.lock().unwrap().pop_front() {
            Some(payload) => NetworkEvent::Data {
                peer_id: self.remote_id,
                payload,
            },
            None => NetworkEvent::Nothing,
        }
    }
}

/// Pair of connected transports for E2E testing
pub struct LocalTransportPair {
    pub a: LocalTransport,
    pub b: LocalTransport,
}

impl LocalTransportPair {
    /// Creates a link between peers `a_id` and `b_id`. Each end reports a
    /// `Connect` for the other on its first poll.
    pub fn new(a_id: PeerId, b_id: PeerId) -> Self {
        let a_to_b = Arc::new(Mutex::new(VecDeque::new()));
        let b_to_a = Arc::new(Mutex::new(VecDeque::new()));
        let a_events = Arc::new(Mutex::new(VecDeque::from([NetworkEvent::Connect(b_id)])));
        let b_events = Arc::new(Mutex::new(VecDeque::from([NetworkEvent::Connect(a_id)])));
        let connected = Arc::new(Mutex::new(true));

        let a = LocalTransport {
            remote_id: b_id,
            outgoing: a_to_b.clone(),
            incoming: b_to_a.clone(),
            events: a_events.clone(),
            remote_events: b_events.clone(),
            connected: connected.clone(),
            conditioner: LinkConditioner::lossless(),
            sent: Vec::new(),
            dropped: 0,
        };
        let b = LocalTransport {
            remote_id: a_id,
            outgoing: b_to_a,
            incoming: a_to_b,
            events: b_events,
            remote_events: a_events,
            connected,
            conditioner: LinkConditioner::lossless(),
            sent: Vec::new(),
            dropped: 0,
        };

        Self { a, b }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_cross_the_link() {
        let LocalTransportPair { mut a, mut b } = LocalTransportPair::new(1, 2);

        assert_eq!(b.poll_event(), NetworkEvent::Connect(1));
        a.send(2, NetworkDelivery::Reliable, &[0, 0]).unwrap();

        match b.poll_event() {
            NetworkEvent::Data {
                peer_id, payload, ..
            } => {
                assert_eq!(peer_id, 1);
                assert_eq!(payload, vec![0, 0]);
            }
            other => panic!("Expected Data event, got {:?}", other),
        }
        assert_eq!(b.poll_event(), NetworkEvent::Nothing);
    }

    #[test]
    fn send_to_wrong_peer_fails() {
        let LocalTransportPair { mut a, .. } = LocalTransportPair::new(1, 2);

        assert_eq!(
            a.send(3, NetworkDelivery::Reliable, &[0, 0]),
            Err(TransportError::PeerNotFound { peer_id: 3 })
        );
    }

    #[test]
    fn full_loss_spares_reliable_batches() {
        let LocalTransportPair { mut a, b } = LocalTransportPair::new(1, 2);
        a.set_conditioner(LinkConditioner::new(1.0, 7));

        a.send(2, NetworkDelivery::Unreliable, &[0, 0]).unwrap();
        a.send(2, NetworkDelivery::Reliable, &[0, 0]).unwrap();

        assert_eq!(a.dropped_count(), 1);
        assert_eq!(b.pending_count(), 1);
        assert_eq!(a.sent_batches().len(), 2);
    }
}
