use std::{
    any::{type_name, TypeId},
    fmt,
    hash::{Hash, Hasher},
};

use volley_serde::{BufferReader, BufferWriter, SerdeErr};

use crate::{
    config::MessagingConfig,
    delivery::NetworkDelivery,
    error::SendError,
    messages::{
        error::HandlerError,
        message_registry::MessageRegistry,
        outbox::{EncodedMessage, Outbox},
    },
    types::{PeerId, Timestamp},
    wire::MessageHeader,
};

/// A type that can be serialized into a batch.
pub trait Message: 'static {
    /// Stable, fully qualified name. Tags are assigned in ascending order of
    /// this name, so it must be identical on every communicating process and
    /// must not change between releases.
    const NAME: &'static str;

    /// Writes the message payload
    fn serialize(&self, writer: &mut BufferWriter) -> Result<(), SerdeErr>;
}

/// A message that can be dispatched to an owner of type `O`.
///
/// Implementing this trait for an owner type is what makes a message
/// eligible to bind to that owner. `binds_to` can narrow that further at
/// registry build time, e.g. to keep production-only messages out of a test
/// owner.
pub trait NetworkMessage<O>: Message {
    /// Reads the payload and acts on it
    fn receive(reader: &mut BufferReader, context: &mut NetworkContext<O>)
        -> Result<(), HandlerError>;

    fn binds_to(_owner: &O) -> bool {
        true
    }
}

/// Handler entry point stored in the registry, indexed by tag
pub type MessageHandler<O> =
    fn(&mut BufferReader, &mut NetworkContext<O>) -> Result<(), HandlerError>;

/// Everything a handler knows about the message it is processing, plus a
/// way to send messages of its own
pub struct NetworkContext<'a, O> {
    pub owner: &'a mut O,
    pub sender_id: PeerId,
    pub timestamp: Timestamp,
    pub header: MessageHeader,
    registry: &'a MessageRegistry<O>,
    config: &'a MessagingConfig,
    outbox: &'a mut Outbox,
}

impl<'a, O> NetworkContext<'a, O> {
    pub(crate) fn new(
        owner: &'a mut O,
        sender_id: PeerId,
        timestamp: Timestamp,
        header: MessageHeader,
        registry: &'a MessageRegistry<O>,
        config: &'a MessagingConfig,
        outbox: &'a mut Outbox,
    ) -> Self {
        Self {
            owner,
            sender_id,
            timestamp,
            header,
            registry,
            config,
            outbox,
        }
    }

    pub fn local_peer_id(&self) -> PeerId {
        self.config.local_peer_id
    }

    /// Serializes `message` now and queues it for `destinations` once the
    /// current pass over the incoming queue ends. Fails the same way
    /// `MessagingSystem::send_message` does, before anything is queued.
    /// Messages sent to the local peer are dispatched on the next pass.
    pub fn send<M: Message>(
        &mut self,
        message: &M,
        delivery: NetworkDelivery,
        destinations: &[PeerId],
    ) -> Result<usize, SendError> {
        let encoded = EncodedMessage::encode(self.registry, self.config, message, delivery)?;
        let length = encoded.payload().len();
        self.outbox.push(encoded, delivery, destinations);
        Ok(length)
    }

    /// Sends `message` back to the peer that sent the one being handled
    pub fn reply<M: Message>(
        &mut self,
        message: &M,
        delivery: NetworkDelivery,
    ) -> Result<usize, SendError> {
        let sender_id = self.sender_id;
        self.send(message, delivery, &[sender_id])
    }
}

/// Runtime identity of a registered message type
#[derive(Copy, Clone)]
pub struct MessageKind {
    type_id: TypeId,
    name: &'static str,
    type_name: &'static str,
}

impl MessageKind {
    pub fn of<M: Message>() -> Self {
        Self {
            type_id: TypeId::of::<M>(),
            name: M::NAME,
            type_name: type_name::<M>(),
        }
    }

    /// The stable name used for tag ordering
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The Rust type name, for diagnostics only
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

impl PartialEq for MessageKind {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for MessageKind {}

impl Hash for MessageKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageKind({})", self.name)
    }
}
