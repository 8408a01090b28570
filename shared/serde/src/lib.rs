//! # Volley Serde
//! Bounds-checked byte buffer views and the primitive serialization used by
//! the volley wire format.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod buffer_reader;
mod buffer_writer;
mod constants;
mod error;
mod impls;
mod serde;

pub use buffer_reader::{BufferReader, OwnedBufferReader};
pub use buffer_writer::{BufferWrite, BufferWriter, ByteCounter};
pub use constants::{MAX_COLLECTION_LENGTH, MTU_SIZE_BYTES};
pub use error::SerdeErr;
pub use serde::{ConstByteLength, Serde};
