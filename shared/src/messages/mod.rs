pub mod error;
pub mod message;
pub mod message_registry;
pub(crate) mod outbox;
