use volley_serde::{BufferWriter, SerdeErr};

use crate::{
    config::MessagingConfig,
    delivery::NetworkDelivery,
    error::SendError,
    messages::{
        message::{Message, MessageKind},
        message_registry::MessageRegistry,
    },
    types::PeerId,
    wire::MessageHeader,
};

/// A message serialized once and ready to be queued for any number of
/// destinations
pub(crate) struct EncodedMessage {
    pub kind: MessageKind,
    pub header: MessageHeader,
    payload: BufferWriter,
}

impl EncodedMessage {
    /// Looks up the tag and serializes `message` within the size class of
    /// `delivery`
    pub fn encode<M: Message, O>(
        registry: &MessageRegistry<O>,
        config: &MessagingConfig,
        message: &M,
        delivery: NetworkDelivery,
    ) -> Result<Self, SendError> {
        let kind = MessageKind::of::<M>();
        let tag = registry.try_tag_of(&kind)?;

        let max_length = config.max_message_length(delivery);
        let mut payload =
            BufferWriter::new(config.initial_batch_capacity.min(max_length), max_length);
        let serialization_error = |source| SendError::Serialization {
            message: kind.name(),
            max_length,
            source,
        };
        message.serialize(&mut payload).map_err(serialization_error)?;

        let message_size = i16::try_from(payload.length()).map_err(|_| {
            serialization_error(SerdeErr::LengthExceeded {
                length: payload.length(),
                max: max_length,
            })
        })?;

        Ok(Self {
            kind,
            header: MessageHeader::new(tag, message_size),
            payload,
        })
    }

    pub fn payload(&self) -> &[u8] {
        self.payload.as_slice()
    }
}

pub(crate) struct PendingSend {
    pub message: EncodedMessage,
    pub delivery: NetworkDelivery,
    pub destinations: Vec<PeerId>,
}

/// Sends requested by handlers during one pass over the incoming queue.
/// They are routed once the pass ends, so a message a handler loops back to
/// its own peer is dispatched on the following pass.
#[derive(Default)]
pub(crate) struct Outbox {
    pending: Vec<PendingSend>,
}

impl Outbox {
    pub fn push(
        &mut self,
        message: EncodedMessage,
        delivery: NetworkDelivery,
        destinations: &[PeerId],
    ) {
        self.pending.push(PendingSend {
            message,
            delivery,
            destinations: destinations.to_vec(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Drops every send queued after the first `len`
    pub fn truncate(&mut self, len: usize) {
        self.pending.truncate(len);
    }

    pub fn into_pending(self) -> Vec<PendingSend> {
        self.pending
    }
}
