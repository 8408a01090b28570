use thiserror::Error;

use crate::types::PeerId;

/// Errors reported by a transport when handing off a batch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The transport has no connection to this peer
    #[error("Transport has no connection to peer {peer_id}")]
    PeerNotFound { peer_id: PeerId },

    /// The batch is larger than the transport accepts for its delivery mode
    #[error("Batch of {length} bytes exceeds the transport limit of {max} bytes")]
    PayloadTooLarge { length: usize, max: usize },

    /// The transport refused the batch
    #[error("Failed to send batch to peer {peer_id}: {reason}")]
    SendFailed { peer_id: PeerId, reason: String },
}
