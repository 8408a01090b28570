use log::trace;

use crate::{delivery::NetworkDelivery, messages::message::MessageKind, types::PeerId};

/// Observes, and can veto, message and batch traffic.
///
/// Every method has an empty default, so an implementation only overrides
/// the points it cares about. Hooks run synchronously on the thread driving
/// the `MessagingSystem`.
///
/// Send hooks only see destinations that are the local peer or connected.
/// A send to any other peer is logged and skipped before the first hook
/// runs.
pub trait NetworkHooks {
    /// Called once per destination before a message is queued or looped back
    fn on_before_send_message(
        &mut self,
        _peer_id: PeerId,
        _kind: &MessageKind,
        _delivery: NetworkDelivery,
    ) {
    }

    /// Called once per destination after a message is queued or looped back.
    /// `payload_length` is the serialized size, headers excluded.
    fn on_after_send_message(
        &mut self,
        _peer_id: PeerId,
        _kind: &MessageKind,
        _delivery: NetworkDelivery,
        _payload_length: usize,
    ) {
    }

    /// Called as a queued message is dequeued, before its handler runs
    fn on_before_receive_message(
        &mut self,
        _sender_id: PeerId,
        _kind: &MessageKind,
        _payload_length: usize,
    ) {
    }

    /// Called after the handler returns, whether or not it succeeded
    fn on_after_receive_message(
        &mut self,
        _sender_id: PeerId,
        _kind: &MessageKind,
        _payload_length: usize,
    ) {
    }

    /// Called before a non-empty batch is handed to the transport
    fn on_before_send_batch(
        &mut self,
        _peer_id: PeerId,
        _message_count: u16,
        _byte_length: usize,
        _delivery: NetworkDelivery,
    ) {
    }

    /// Always follows `on_before_send_batch`, whether or not the transport
    /// accepted the batch
    fn on_after_send_batch(
        &mut self,
        _peer_id: PeerId,
        _message_count: u16,
        _byte_length: usize,
        _delivery: NetworkDelivery,
    ) {
    }

    /// Called once the batch header is parsed, before any message is read
    fn on_before_receive_batch(
        &mut self,
        _sender_id: PeerId,
        _declared_count: u16,
        _byte_length: usize,
    ) {
    }

    /// Called after parsing ends. `received_count` is lower than
    /// `declared_count` when the batch was truncated or corrupt.
    fn on_after_receive_batch(
        &mut self,
        _sender_id: PeerId,
        _declared_count: u16,
        _received_count: u16,
        _byte_length: usize,
    ) {
    }

    /// Return false to drop the message for this destination only
    fn on_verify_can_send(
        &mut self,
        _peer_id: PeerId,
        _kind: &MessageKind,
        _delivery: NetworkDelivery,
    ) -> bool {
        true
    }

    /// Return false to drop the message before its handler runs
    fn on_verify_can_receive(&mut self, _sender_id: PeerId, _kind: &MessageKind) -> bool {
        true
    }
}

/// Ordered list of hooks. Notifications fan out to every hook in
/// registration order; a verification stops at the first hook that refuses.
#[derive(Default)]
pub struct HookChain {
    hooks: Vec<Box<dyn NetworkHooks>>,
}

impl HookChain {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    pub fn add<H: NetworkHooks + 'static>(&mut self, hooks: H) {
        self.hooks.push(Box::new(hooks));
    }

    pub fn add_boxed(&mut self, hooks: Box<dyn NetworkHooks>) {
        self.hooks.push(hooks);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    fn each(&mut self, mut visit: impl FnMut(&mut dyn NetworkHooks)) {
        for hooks in &mut self.hooks {
            visit(hooks.as_mut());
        }
    }
}

impl NetworkHooks for HookChain {
    fn on_before_send_message(
        &mut self,
        peer_id: PeerId,
        kind: &MessageKind,
        delivery: NetworkDelivery,
    ) {
        self.each(|hooks| hooks.on_before_send_message(peer_id, kind, delivery));
    }

    fn on_after_send_message(
        &mut self,
        peer_id: PeerId,
        kind: &MessageKind,
        delivery: NetworkDelivery,
        payload_length: usize,
    ) {
        self.each(|hooks| hooks.on_after_send_message(peer_id, kind, delivery, payload_length));
    }

    fn on_before_receive_message(
        &mut self,
        sender_id: PeerId,
        kind: &MessageKind,
        payload_length: usize,
    ) {
        self.each(|hooks| hooks.on_before_receive_message(sender_id, kind, payload_length));
    }

    fn on_after_receive_message(
        &mut self,
        sender_id: PeerId,
        kind: &MessageKind,
        payload_length: usize,
    ) {
        self.each(|hooks| hooks.on_after_receive_message(sender_id, kind, payload_length));
    }

    fn on_before_send_batch(
        &mut self,
        peer_id: PeerId,
        message_count: u16,
        byte_length: usize,
        delivery: NetworkDelivery,
    ) {
        self.each(|hooks| hooks.on_before_send_batch(peer_id, message_count, byte_length, delivery));
    }

    fn on_after_send_batch(
        &mut self,
        peer_id: PeerId,
        message_count: u16,
        byte_length: usize,
        delivery: NetworkDelivery,
    ) {
        self.each(|hooks| hooks.on_after_send_batch(peer_id, message_count, byte_length, delivery));
    }

    fn on_before_receive_batch(
        &mut self,
        sender_id: PeerId,
        declared_count: u16,
        byte_length: usize,
    ) {
        self.each(|hooks| hooks.on_before_receive_batch(sender_id, declared_count, byte_length));
    }

    fn on_after_receive_batch(
        &mut self,
        sender_id: PeerId,
        declared_count: u16,
        received_count: u16,
        byte_length: usize,
    ) {
        self.each(|hooks| {
            hooks.on_after_receive_batch(sender_id, declared_count, received_count, byte_length)
        });
    }

    fn on_verify_can_send(
        &mut self,
        peer_id: PeerId,
        kind: &MessageKind,
        delivery: NetworkDelivery,
    ) -> bool {
        let allowed = self
            .hooks
            .iter_mut()
            .all(|hooks| hooks.on_verify_can_send(peer_id, kind, delivery));
        if !allowed {
            trace!("Send of {} to peer {} vetoed by hook", kind.name(), peer_id);
        }
        allowed
    }

    fn on_verify_can_receive(&mut self, sender_id: PeerId, kind: &MessageKind) -> bool {
        let allowed = self
            .hooks
            .iter_mut()
            .all(|hooks| hooks.on_verify_can_receive(sender_id, kind));
        if !allowed {
            trace!(
                "Receive of {} from peer {} vetoed by hook",
                kind.name(),
                sender_id
            );
        }
        allowed
    }
}
