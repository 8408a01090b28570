//! # Volley Shared
//! Batched message delivery between peers: a message type registry, the
//! batch wire format, per-peer send queues, an incoming queue with
//! fault-isolated dispatch, and a hook chain around all of it.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

cfg_if! {
    if #[cfg(all(target_arch = "wasm32", not(feature = "wbindgen")))]
    {
        compile_error!("wasm target for 'volley_shared' crate requires the 'wbindgen' feature to be enabled.");
    }
}

pub use volley_serde::{
    BufferReader, BufferWrite, BufferWriter, ByteCounter, ConstByteLength, OwnedBufferReader,
    Serde, SerdeErr, MAX_COLLECTION_LENGTH, MTU_SIZE_BYTES,
};

mod backends;
mod config;
mod constants;
mod delivery;
mod error;
mod hooks;
mod messages;
mod messaging_system;
mod queues;
mod transport;
mod types;
mod wire;

pub use backends::Clock;
pub use config::MessagingConfig;
pub use constants::{
    DEFAULT_FRAGMENTED_BATCH_CAPACITY, DEFAULT_LOCAL_PEER_ID, DEFAULT_SMALL_BATCH_CAPACITY,
    MAX_MESSAGE_LENGTH, MAX_MESSAGE_TYPES,
};
pub use delivery::NetworkDelivery;
pub use error::{ConfigError, MessagingError, SendError};
pub use hooks::{HookChain, NetworkHooks};
pub use messages::{
    error::{HandlerError, HandlerFault, RegistryError},
    message::{Message, MessageHandler, MessageKind, NetworkContext, NetworkMessage},
    message_registry::{MessagePlugin, MessageRegistry, MessageRegistryBuilder},
};
pub use messaging_system::{BatchReceipt, MessagingSystem, ProcessReport};
pub use queues::{IncomingMessageQueue, ReceiveQueueItem, SendQueue, SendQueueItem, SendQueues};
pub use transport::{MessageSender, NetworkEvent, Transport, TransportError};
pub use types::{MessageTag, PeerId, Timestamp};
pub use wire::{BatchHeader, BatchReader, BatchWriter, FramingError, MessageHeader};
