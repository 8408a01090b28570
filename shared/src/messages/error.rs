use thiserror::Error;

use volley_serde::SerdeErr;

use crate::{error::SendError, types::MessageTag};

/// Errors that can occur while building or querying the message registry.
///
/// Everything except `FingerprintMismatch` is a programming error: a
/// malformed registration list, or a lookup for a type that was never
/// registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A message type has an empty name, so its tag order is undefined
    #[error("Message type {type_name} has an empty NAME. Every registered message needs a stable, unique name")]
    EmptyName { type_name: &'static str },

    /// The same message type was registered twice
    #[error("Message type {name:?} was registered more than once")]
    DuplicateMessageType { name: &'static str },

    /// Two different message types share a name
    #[error("Two different message types share the name {name:?}. Names decide tag order and must be unique")]
    DuplicateName { name: &'static str },

    /// More message types than tags
    #[error("{count} message types were registered but at most {max} fit in a one-byte tag")]
    TooManyMessageTypes { count: usize, max: usize },

    /// Lookup for a message type that is not in the registry
    #[error("Message type {name:?} not found in registry. It must be added with add_message() and bind to this owner")]
    MessageKindNotFound { name: &'static str },

    /// Lookup for a tag with no message type behind it
    #[error("Tag {tag} not found in message registry ({count} message types are registered)")]
    TagNotFound { tag: MessageTag, count: usize },

    /// The remote registry differs from the local one
    #[error("Message registry fingerprint {remote:#018x} does not match local fingerprint {local:#018x}. Both peers must register the same message types")]
    FingerprintMismatch { local: u64, remote: u64 },
}

/// Returned by a message handler that could not process its payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The payload could not be read
    #[error("Failed to read message payload: {0}")]
    Serde(#[from] SerdeErr),

    /// The payload was read but refused
    #[error("Message rejected by handler: {reason}")]
    Rejected { reason: String },

    /// A message sent through the handler's context could not be queued
    #[error("Failed to send from handler: {0}")]
    Send(#[from] SendError),
}

/// A handler that failed while processing a dispatched message. The fault is
/// logged and processing moves on to the next queued message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerFault {
    /// The handler returned an error
    #[error("Handler for {message} from peer {sender_id} failed: {source}")]
    Failed {
        message: &'static str,
        sender_id: u64,
        source: HandlerError,
    },

    /// The handler panicked
    #[error("Handler for {message} from peer {sender_id} panicked: {panic}")]
    Panicked {
        message: &'static str,
        sender_id: u64,
        panic: String,
    },
}
