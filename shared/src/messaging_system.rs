use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use log::{debug, error, info, trace, warn};

use volley_serde::BufferReader;

use crate::{
    backends::Clock,
    config::MessagingConfig,
    delivery::NetworkDelivery,
    error::{MessagingError, SendError},
    hooks::{HookChain, NetworkHooks},
    messages::{
        error::HandlerFault,
        message::{Message, MessageHandler, MessageKind, NetworkContext},
        message_registry::{MessageRegistry, MessageRegistryBuilder},
        outbox::{EncodedMessage, Outbox},
    },
    queues::{IncomingMessageQueue, ReceiveQueueItem, SendQueues},
    transport::{MessageSender, NetworkEvent, Transport},
    types::{PeerId, Timestamp},
    wire::{BatchReader, FramingError},
};

/// Outcome of parsing one received batch
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReceipt {
    /// Message count the batch header claimed
    pub declared: u16,
    /// Messages copied into the incoming queue
    pub queued: u16,
    /// Well-framed messages dropped for carrying an unregistered tag
    pub skipped: u16,
    /// The error that ended parsing early, if any
    pub error: Option<FramingError>,
}

impl BatchReceipt {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of one pass over the incoming queue
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProcessReport {
    /// Messages whose handler ran to completion
    pub dispatched: usize,
    /// Messages refused by a receive hook
    pub vetoed: usize,
    /// Messages whose handler returned an error or panicked
    pub faulted: usize,
}

/// Batches outgoing messages per peer, parses incoming batches and dispatches
/// their messages to handlers bound to an owner of type `O`.
///
/// All work happens on the thread that calls into it, driven by `tick` or by
/// the individual entry points. Nothing here blocks.
pub struct MessagingSystem<O> {
    registry: MessageRegistry<O>,
    owner: O,
    config: MessagingConfig,
    clock: Clock,
    send_queues: SendQueues,
    incoming: IncomingMessageQueue,
    hooks: HookChain,
}

impl<O> MessagingSystem<O> {
    /// Validates the config and builds the registry for `owner`. Fails
    /// without side effects if either is malformed.
    pub fn new(
        registry_builder: &MessageRegistryBuilder<O>,
        owner: O,
        config: MessagingConfig,
    ) -> Result<Self, MessagingError> {
        config.validate()?;
        let registry = registry_builder.build(&owner)?;
        debug!(
            "Messaging system ready with {} message types (fingerprint {:#018x})",
            registry.len(),
            registry.fingerprint()
        );

        Ok(Self {
            registry,
            owner,
            config,
            clock: Clock::new(),
            send_queues: SendQueues::new(),
            incoming: IncomingMessageQueue::new(),
            hooks: HookChain::new(),
        })
    }

    pub fn add_hooks<H: NetworkHooks + 'static>(&mut self, hooks: H) {
        self.hooks.add(hooks);
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    pub fn registry(&self) -> &MessageRegistry<O> {
        &self.registry
    }

    pub fn config(&self) -> &MessagingConfig {
        &self.config
    }

    pub fn owner(&self) -> &O {
        &self.owner
    }

    pub fn owner_mut(&mut self) -> &mut O {
        &mut self.owner
    }

    pub fn local_peer_id(&self) -> PeerId {
        self.config.local_peer_id
    }

    /// Changes which destination is looped back. A send queue held for the
    /// new id is left in place but no longer receives messages.
    pub fn set_local_peer_id(&mut self, peer_id: PeerId) {
        self.config.local_peer_id = peer_id;
    }

    /// Seconds since this system was created. Looped-back messages and
    /// batches delivered through `handle_event` are stamped with it, so every
    /// `NetworkContext::timestamp` shares one epoch.
    pub fn timestamp(&self) -> Timestamp {
        self.clock.elapsed_seconds()
    }

    // Peers

    pub fn peer_connected(&mut self, peer_id: PeerId) {
        if self.send_queues.connect(peer_id) {
            info!("Peer {} connected", peer_id);
        } else {
            debug!("Peer {} connected twice, keeping its send queue", peer_id);
        }
    }

    /// Removes the peer and discards every batch still queued for it
    pub fn peer_disconnected(&mut self, peer_id: PeerId) {
        match self.send_queues.disconnect(peer_id) {
            Some(queue) => info!(
                "Peer {} disconnected, discarding {} queued messages in {} batches",
                peer_id,
                queue.message_count(),
                queue.len()
            ),
            None => debug!("Disconnect for unknown peer {}", peer_id),
        }
    }

    pub fn is_connected(&self, peer_id: PeerId) -> bool {
        self.send_queues.contains(peer_id)
    }

    pub fn connected_peers(&self) -> Vec<PeerId> {
        self.send_queues.peers().collect()
    }

    pub fn queued_batch_count(&self, peer_id: PeerId) -> usize {
        self.send_queues
            .get(peer_id)
            .map_or(0, |queue| queue.len())
    }

    pub fn incoming_message_count(&self) -> usize {
        self.incoming.len()
    }

    // Outgoing

    /// Serializes `message` once and queues it for every destination.
    /// Destinations refused by a hook, or neither local nor connected, are
    /// skipped. Returns the serialized payload length.
    ///
    /// Fails before touching any queue if the message is not registered or
    /// does not serialize within the size class of `delivery`.
    pub fn send_message<M: Message>(
        &mut self,
        message: &M,
        delivery: NetworkDelivery,
        destinations: &[PeerId],
    ) -> Result<usize, SendError> {
        let encoded = EncodedMessage::encode(&self.registry, &self.config, message, delivery)?;
        self.route(&encoded, delivery, destinations)?;
        Ok(encoded.payload().len())
    }

    /// Queues an already serialized message for each destination, or loops
    /// it back to the incoming queue for the local peer
    fn route(
        &mut self,
        encoded: &EncodedMessage,
        delivery: NetworkDelivery,
        destinations: &[PeerId],
    ) -> Result<(), SendError> {
        let kind = &encoded.kind;
        let payload = encoded.payload();

        for &peer_id in destinations {
            let is_local = peer_id == self.config.local_peer_id;
            if !is_local && !self.send_queues.contains(peer_id) {
                warn!(
                    "Cannot send {} to peer {}: peer is not connected",
                    kind.name(),
                    peer_id
                );
                continue;
            }
            if !self.hooks.on_verify_can_send(peer_id, kind, delivery) {
                continue;
            }
            self.hooks.on_before_send_message(peer_id, kind, delivery);

            if is_local {
                trace!("Looping back {} to local peer {}", kind.name(), peer_id);
                self.incoming.push(ReceiveQueueItem::new(
                    encoded.header,
                    payload,
                    peer_id,
                    self.clock.elapsed_seconds(),
                ));
            } else if let Some(queue) = self.send_queues.get_mut(peer_id) {
                queue
                    .tail_for(delivery, payload.len(), &self.config)?
                    .write_message(encoded.header, payload)?;
            }

            self.hooks
                .on_after_send_message(peer_id, kind, delivery, payload.len());
        }

        Ok(())
    }

    pub fn send_message_to<M: Message>(
        &mut self,
        message: &M,
        delivery: NetworkDelivery,
        peer_id: PeerId,
    ) -> Result<usize, SendError> {
        self.send_message(message, delivery, &[peer_id])
    }

    /// Hands every non-empty queued batch to `sender` and empties all send
    /// queues. Empty batches are discarded without a transport call, and a
    /// batch the transport rejects is logged and dropped. The batch hooks
    /// run in pairs around every non-empty batch, sent or not. Returns the
    /// number of batches the transport accepted.
    pub fn process_send_queues<S: MessageSender + ?Sized>(&mut self, sender: &mut S) -> usize {
        let mut sent = 0;
        for (&peer_id, queue) in self.send_queues.iter_mut() {
            for item in queue.drain() {
                if item.is_empty() {
                    trace!("Discarding empty batch for peer {}", peer_id);
                    continue;
                }

                let delivery = item.delivery();
                let message_count = item.message_count();
                let byte_length = item.byte_length();
                self.hooks
                    .on_before_send_batch(peer_id, message_count, byte_length, delivery);

                match item.finish() {
                    Ok(batch) => match sender.send(peer_id, delivery, &batch) {
                        Ok(()) => sent += 1,
                        Err(err) => warn!(
                            "Dropping batch of {} messages for peer {}: {}",
                            message_count, peer_id, err
                        ),
                    },
                    Err(err) => error!("Failed to finish batch for peer {}: {}", peer_id, err),
                }

                self.hooks
                    .on_after_send_batch(peer_id, message_count, byte_length, delivery);
            }
        }
        if sent > 0 {
            debug!("Flushed {} batches", sent);
        }
        sent
    }

    // Incoming

    /// Parses a batch received from `sender_id` and copies each message into
    /// the incoming queue. Malformed input never fails the call: parsing of
    /// this batch stops at the first framing error, which is logged and
    /// reported in the returned `BatchReceipt`.
    pub fn handle_incoming_data(
        &mut self,
        sender_id: PeerId,
        bytes: &[u8],
        timestamp: Timestamp,
    ) -> BatchReceipt {
        let mut reader = match BatchReader::new(bytes) {
            Ok(reader) => reader,
            Err(err) => {
                warn!("Dropping packet from peer {}: {}", sender_id, err);
                return BatchReceipt {
                    error: Some(err),
                    ..BatchReceipt::default()
                };
            }
        };

        let declared = reader.declared_count();
        let mut receipt = BatchReceipt {
            declared,
            ..BatchReceipt::default()
        };
        self.hooks
            .on_before_receive_batch(sender_id, declared, bytes.len());

        for result in reader.by_ref() {
            let (header, payload) = match result {
                Ok(message) => message,
                Err(err) => {
                    warn!(
                        "Dropping rest of batch from peer {}: {}",
                        sender_id, err
                    );
                    receipt.error = Some(err);
                    break;
                }
            };

            if !self.registry.contains_tag(header.message_type) {
                warn!(
                    "Skipping message from peer {}: {}",
                    sender_id,
                    FramingError::UnknownMessageType {
                        tag: header.message_type
                    }
                );
                receipt.skipped += 1;
                continue;
            }

            self.incoming
                .push(ReceiveQueueItem::new(header, payload, sender_id, timestamp));
            receipt.queued += 1;
        }

        if receipt.is_complete() && reader.remaining() > 0 {
            debug!(
                "Ignoring {} trailing bytes in batch from peer {}",
                reader.remaining(),
                sender_id
            );
        }

        self.hooks.on_after_receive_batch(
            sender_id,
            declared,
            receipt.queued + receipt.skipped,
            bytes.len(),
        );
        receipt
    }

    /// Dispatches every queued message, in arrival order, to its handler.
    /// Messages that arrive while handlers run wait for the next call. A
    /// failing or panicking handler is logged and does not stop the pass.
    ///
    /// Sends made through `NetworkContext` are routed after the last handler
    /// returns; those of a faulted handler are discarded.
    pub fn process_incoming_message_queue(&mut self) -> ProcessReport {
        let mut report = ProcessReport::default();
        let mut outbox = Outbox::default();

        for item in self.incoming.take() {
            let tag = item.header.message_type;
            let (kind, handler) = match (
                self.registry.try_kind_of(tag),
                self.registry.try_handler_of(tag),
            ) {
                (Ok(kind), Ok(handler)) => (*kind, handler),
                (Err(err), _) | (_, Err(err)) => {
                    warn!("Dropping queued message from peer {}: {}", item.sender_id, err);
                    continue;
                }
            };

            if !self.hooks.on_verify_can_receive(item.sender_id, &kind) {
                report.vetoed += 1;
                continue;
            }

            let payload_length = item.reader.len();
            self.hooks
                .on_before_receive_message(item.sender_id, &kind, payload_length);

            let outbox_mark = outbox.len();
            let mut reader = item.reader.borrow();
            let mut context = NetworkContext::new(
                &mut self.owner,
                item.sender_id,
                item.timestamp,
                item.header,
                &self.registry,
                &self.config,
                &mut outbox,
            );
            match dispatch(handler, &mut reader, &mut context, &kind) {
                Ok(()) => report.dispatched += 1,
                Err(fault) => {
                    error!("{}", fault);
                    outbox.truncate(outbox_mark);
                    report.faulted += 1;
                }
            }

            self.hooks
                .on_after_receive_message(item.sender_id, &kind, payload_length);
        }

        if !outbox.is_empty() {
            trace!("Routing {} sends made by handlers", outbox.len());
        }
        for pending in outbox.into_pending() {
            if let Err(err) = self.route(&pending.message, pending.delivery, &pending.destinations)
            {
                error!(
                    "Failed to queue {} sent by a handler: {}",
                    pending.message.kind.name(),
                    err
                );
            }
        }

        report
    }

    // Driving

    pub fn handle_event(&mut self, event: NetworkEvent) {
        match event {
            NetworkEvent::Data { peer_id, payload } => {
                let timestamp = self.timestamp();
                self.handle_incoming_data(peer_id, &payload, timestamp);
            }
            NetworkEvent::Connect(peer_id) => self.peer_connected(peer_id),
            NetworkEvent::Disconnect(peer_id) => self.peer_disconnected(peer_id),
            NetworkEvent::Nothing => {}
        }
    }

    /// One network tick: drains the transport's events, dispatches what
    /// arrived, then flushes every send queue back through the transport
    pub fn tick<T: Transport + ?Sized>(&mut self, transport: &mut T) -> ProcessReport {
        loop {
            match transport.poll_event() {
                NetworkEvent::Nothing => break,
                event => self.handle_event(event),
            }
        }
        let report = self.process_incoming_message_queue();
        self.process_send_queues(transport);
        report
    }

    /// Disconnects every peer and drops all queued data, incoming and
    /// outgoing. Also runs on drop.
    pub fn shutdown(&mut self) {
        let peers = self.connected_peers();
        if peers.is_empty() && self.incoming.is_empty() {
            return;
        }
        for peer_id in peers {
            self.peer_disconnected(peer_id);
        }
        if !self.incoming.is_empty() {
            debug!(
                "Discarding {} undispatched incoming messages",
                self.incoming.len()
            );
            self.incoming.clear();
        }
    }
}

impl<O> Drop for MessagingSystem<O> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn dispatch<O>(
    handler: MessageHandler<O>,
    reader: &mut BufferReader,
    context: &mut NetworkContext<O>,
    kind: &MessageKind,
) -> Result<(), HandlerFault> {
    let sender_id = context.sender_id;
    match panic::catch_unwind(AssertUnwindSafe(|| handler(reader, context))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(source)) => Err(HandlerFault::Failed {
            message: kind.name(),
            sender_id,
            source,
        }),
        Err(panic) => Err(HandlerFault::Panicked {
            message: kind.name(),
            sender_id,
            panic: panic_message(panic.as_ref()),
        }),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
