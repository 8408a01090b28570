use std::{cell::RefCell, rc::Rc};

use volley_shared::{MessageKind, NetworkDelivery, NetworkHooks, PeerId};

/// One hook invocation, as observed by `RecordingHooks`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookEvent {
    VerifySend { peer_id: PeerId, message: &'static str },
    BeforeSendMessage { peer_id: PeerId, message: &'static str },
    AfterSendMessage { peer_id: PeerId, message: &'static str, length: usize },
    BeforeSendBatch { peer_id: PeerId, count: u16, length: usize },
    AfterSendBatch { peer_id: PeerId, count: u16, length: usize },
    BeforeReceiveBatch { sender_id: PeerId, declared: u16 },
    AfterReceiveBatch { sender_id: PeerId, declared: u16, received: u16 },
    VerifyReceive { sender_id: PeerId, message: &'static str },
    BeforeReceiveMessage { sender_id: PeerId, message: &'static str },
    AfterReceiveMessage { sender_id: PeerId, message: &'static str },
}

/// Shared view of the events a `RecordingHooks` has seen, readable after the
/// hooks themselves have been moved into a messaging system
#[derive(Clone, Default)]
pub struct HookLog(Rc<RefCell<Vec<HookEvent>>>);

impl HookLog {
    pub fn events(&self) -> Vec<HookEvent> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn count(&self, predicate: impl Fn(&HookEvent) -> bool) -> usize {
        self.0.borrow().iter().filter(|event| predicate(event)).count()
    }

    fn push(&self, event: HookEvent) {
        self.0.borrow_mut().push(event);
    }
}

/// Records every callback, and can refuse sends to one peer or receipt of
/// one message type
#[derive(Default)]
pub struct RecordingHooks {
    log: HookLog,
    deny_send_to: Option<PeerId>,
    deny_receive_of: Option<&'static str>,
}

impl RecordingHooks {
    pub fn new() -> (Self, HookLog) {
        let hooks = Self::default();
        let log = hooks.log.clone();
        (hooks, log)
    }

    pub fn deny_send_to(mut self, peer_id: PeerId) -> Self {
        self.deny_send_to = Some(peer_id);
        self
    }

    pub fn deny_receive_of(mut self, message: &'static str) -> Self {
        self.deny_receive_of = Some(message);
        self
    }
}

impl NetworkHooks for RecordingHooks {
    fn on_before_send_message(
        &mut self,
        peer_id: PeerId,
        kind: &MessageKind,
        _delivery: NetworkDelivery,
    ) {
        self.log.push(HookEvent::BeforeSendMessage {
            peer_id,
            message: kind.name(),
        });
    }

    fn on_after_send_message(
        &mut self,
        peer_id: PeerId,
        kind: &MessageKind,
        _delivery: NetworkDelivery,
        payload_length: usize,
    ) {
        self.log.push(HookEvent::AfterSendMessage {
            peer_id,
            message: kind.name(),
            length: payload_length,
        });
    }

    fn on_before_receive_message(
        &mut self,
        sender_id: PeerId,
        kind: &MessageKind,
        _payload_length: usize,
    ) {
        self.log.push(HookEvent::BeforeReceiveMessage {
            sender_id,
            message: kind.name(),
        });
    }

    fn on_after_receive_message(
        &mut self,
        sender_id: PeerId,
        kind: &MessageKind,
        _payload_length: usize,
    ) {
        self.log.push(HookEvent::AfterReceiveMessage {
            sender_id,
            message: kind.name(),
        });
    }

    fn on_before_send_batch(
        &mut self,
        peer_id: PeerId,
        message_count: u16,
        byte_length: usize,
        _delivery: NetworkDelivery,
    ) {
        self.log.push(HookEvent::BeforeSendBatch {
            peer_id,
            count: message_count,
            length: byte_length,
        });
    }

    fn on_after_send_batch(
        &mut self,
        peer_id: PeerId,
        message_count: u16,
        byte_length: usize,
        _delivery: NetworkDelivery,
    ) {
        self.log.push(HookEvent::AfterSendBatch {
            peer_id,
            count: message_count,
            length: byte_length,
        });
    }

    fn on_before_receive_batch(&mut self, sender_id: PeerId, declared_count: u16, _byte_length: usize) {
        self.log.push(HookEvent::BeforeReceiveBatch {
            sender_id,
            declared: declared_count,
        });
    }

    fn on_after_receive_batch(
        &mut self,
        sender_id: PeerId,
        declared_count: u16,
        received_count: u16,
        _byte_length: usize,
    ) {
        self.log.push(HookEvent::AfterReceiveBatch {
            sender_id,
            declared: declared_count,
            received: received_count,
        });
    }

    fn on_verify_can_send(
        &mut self,
        peer_id: PeerId,
        kind: &MessageKind,
        _delivery: NetworkDelivery,
    ) -> bool {
        self.log.push(HookEvent::VerifySend {
            peer_id,
            message: kind.name(),
        });
        self.deny_send_to != Some(peer_id)
    }

    fn on_verify_can_receive(&mut self, sender_id: PeerId, kind: &MessageKind) -> bool {
        self.log.push(HookEvent::VerifyReceive {
            sender_id,
            message: kind.name(),
        });
        self.deny_receive_of != Some(kind.name())
    }
}
