pub mod error;

use crate::{delivery::NetworkDelivery, types::PeerId};

pub use error::TransportError;

/// The outgoing half of a transport: accepts one finished batch at a time
pub trait MessageSender {
    /// Sends a batch to a peer. The transport must deliver it as a unit, with
    /// the guarantees of `delivery`.
    fn send(
        &mut self,
        peer_id: PeerId,
        delivery: NetworkDelivery,
        batch: &[u8],
    ) -> Result<(), TransportError>;
}

/// Something that happened on the transport since it was last polled
#[derive(Clone, Debug, PartialEq)]
pub enum NetworkEvent {
    /// A batch arrived from a peer. The messaging system stamps it with its
    /// own clock when the event is handled.
    Data { peer_id: PeerId, payload: Vec<u8> },
    /// A peer connected
    Connect(PeerId),
    /// A peer disconnected or timed out
    Disconnect(PeerId),
    /// Nothing left to report this tick
    Nothing,
}

/// A full transport: sends batches and reports connection and data events
pub trait Transport: MessageSender {
    fn poll_event(&mut self) -> NetworkEvent;
}
