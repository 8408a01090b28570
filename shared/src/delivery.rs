/// The reliability and ordering guarantee requested from the transport for a
/// batch. Every message in a batch shares its batch's delivery mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NetworkDelivery {
    /// May be dropped, duplicated or reordered
    Unreliable,
    /// May be dropped; anything older than the newest received is discarded
    UnreliableSequenced,
    /// Always arrives, in any order
    Reliable,
    /// Always arrives, in send order
    ReliableSequenced,
    /// Always arrives, in send order, and may exceed a single datagram
    ReliableFragmentedSequenced,
}

impl NetworkDelivery {
    pub const ALL: [NetworkDelivery; 5] = [
        NetworkDelivery::Unreliable,
        NetworkDelivery::UnreliableSequenced,
        NetworkDelivery::Reliable,
        NetworkDelivery::ReliableSequenced,
        NetworkDelivery::ReliableFragmentedSequenced,
    ];

    pub fn is_reliable(&self) -> bool {
        matches!(
            self,
            NetworkDelivery::Reliable
                | NetworkDelivery::ReliableSequenced
                | NetworkDelivery::ReliableFragmentedSequenced
        )
    }

    pub fn is_sequenced(&self) -> bool {
        matches!(
            self,
            NetworkDelivery::UnreliableSequenced
                | NetworkDelivery::ReliableSequenced
                | NetworkDelivery::ReliableFragmentedSequenced
        )
    }

    /// Whether batches in this mode belong to the large size class
    pub fn is_fragmented(&self) -> bool {
        *self == NetworkDelivery::ReliableFragmentedSequenced
    }
}
