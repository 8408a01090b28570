use thiserror::Error;

use volley_serde::SerdeErr;

use crate::{
    messages::error::RegistryError, transport::error::TransportError, wire::FramingError,
};

/// Errors in a `MessagingConfig`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("The {class} batch capacity of {capacity} bytes is below the minimum of {minimum} bytes")]
    BatchCapacityTooSmall {
        class: &'static str,
        capacity: usize,
        minimum: usize,
    },

    #[error("The small batch capacity ({small} bytes) exceeds the fragmented batch capacity ({fragmented} bytes)")]
    SmallExceedsFragmented { small: usize, fragmented: usize },
}

/// Errors that fail a `send_message` call. Serialization and registry
/// errors are raised before any destination is visited, so nothing is queued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// The message could not be serialized within its size-class bound
    #[error("Message {message} could not be serialized within {max_length} bytes: {source}")]
    Serialization {
        message: &'static str,
        max_length: usize,
        source: SerdeErr,
    },

    /// The message type was never registered
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The serialized message could not be framed into a batch
    #[error("Framing error: {0}")]
    Framing(#[from] FramingError),
}

/// General messaging errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagingError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Send error: {0}")]
    Send(#[from] SendError),

    #[error("Framing error: {0}")]
    Framing(#[from] FramingError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}
