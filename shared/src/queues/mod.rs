mod receive_queue;
mod send_queue;

pub use receive_queue::{IncomingMessageQueue, ReceiveQueueItem};
pub use send_queue::{SendQueue, SendQueueItem, SendQueues};
