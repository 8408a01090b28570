/// Identifies a peer on the transport. The local peer has an id too, so that
/// messages addressed to it can be recognised and looped back.
pub type PeerId = u64;

/// The compact wire identifier standing in for a message's type
pub type MessageTag = u8;

/// Seconds since the receiving messaging system was created
pub type Timestamp = f64;
