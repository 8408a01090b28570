/// Minimal test protocol for E2E testing

use volley_shared::{
    BufferReader, BufferWriter, HandlerError, Message, MessagePlugin, MessageRegistry,
    MessageRegistryBuilder, NetworkContext, NetworkDelivery, NetworkMessage, PeerId, Serde,
    SerdeErr, Timestamp,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeerRole {
    /// Registers every test message
    Standard,
    /// Leaves out messages that bind only to standard peers
    Restricted,
}

/// What a handler saw, recorded by the owner in dispatch order
#[derive(Clone, Debug, PartialEq)]
pub enum Received {
    Chat { sender_id: PeerId, text: String },
    Position { sender_id: PeerId, x: f32, y: f32 },
    Ping { sender_id: PeerId, sequence: u32, timestamp: Timestamp },
    Kick { sender_id: PeerId, reason: String },
    Echo { sender_id: PeerId, sequence: u32, remaining: u8 },
}

/// Owner handed to every test handler
pub struct TestPeer {
    pub role: PeerRole,
    pub received: Vec<Received>,
}

impl TestPeer {
    pub fn new(role: PeerRole) -> Self {
        Self {
            role,
            received: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Chat {
    pub text: String,
}

impl Chat {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl Message for Chat {
    const NAME: &'static str = "volley_test.Chat";

    fn serialize(&self, writer: &mut BufferWriter) -> Result<(), SerdeErr> {
        self.text.ser(writer)
    }
}

impl NetworkMessage<TestPeer> for Chat {
    fn receive(
        reader: &mut BufferReader,
        context: &mut NetworkContext<TestPeer>,
    ) -> Result<(), HandlerError> {
        let text = String::de(reader)?;
        context.owner.received.push(Received::Chat {
            sender_id: context.sender_id,
            text,
        });
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Message for Position {
    const NAME: &'static str = "volley_test.Position";

    fn serialize(&self, writer: &mut BufferWriter) -> Result<(), SerdeErr> {
        self.x.ser(writer)?;
        self.y.ser(writer)
    }
}

impl NetworkMessage<TestPeer> for Position {
    fn receive(
        reader: &mut BufferReader,
        context: &mut NetworkContext<TestPeer>,
    ) -> Result<(), HandlerError> {
        let x = f32::de(reader)?;
        let y = f32::de(reader)?;
        context.owner.received.push(Received::Position {
            sender_id: context.sender_id,
            x,
            y,
        });
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ping {
    pub sequence: u32,
}

impl Message for Ping {
    const NAME: &'static str = "volley_test.Ping";

    fn serialize(&self, writer: &mut BufferWriter) -> Result<(), SerdeErr> {
        self.sequence.ser(writer)
    }
}

impl NetworkMessage<TestPeer> for Ping {
    fn receive(
        reader: &mut BufferReader,
        context: &mut NetworkContext<TestPeer>,
    ) -> Result<(), HandlerError> {
        let sequence = u32::de(reader)?;
        context.owner.received.push(Received::Ping {
            sender_id: context.sender_id,
            sequence,
            timestamp: context.timestamp,
        });
        Ok(())
    }
}

/// Handler replies to the sender with `remaining - 1` until it reaches zero.
/// Sent to the local peer, each reply loops back for the next pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Echo {
    pub sequence: u32,
    pub remaining: u8,
}

impl Message for Echo {
    const NAME: &'static str = "volley_test.Echo";

    fn serialize(&self, writer: &mut BufferWriter) -> Result<(), SerdeErr> {
        self.sequence.ser(writer)?;
        self.remaining.ser(writer)
    }
}

impl NetworkMessage<TestPeer> for Echo {
    fn receive(
        reader: &mut BufferReader,
        context: &mut NetworkContext<TestPeer>,
    ) -> Result<(), HandlerError> {
        let sequence = u32::de(reader)?;
        let remaining = u8::de(reader)?;
        context.owner.received.push(Received::Echo {
            sender_id: context.sender_id,
            sequence,
            remaining,
        });
        if remaining > 0 {
            let reply = Echo {
                sequence,
                remaining: remaining - 1,
            };
            context.reply(&reply, NetworkDelivery::Reliable)?;
        }
        Ok(())
    }
}

/// Handler fails with an error or a panic, depending on the payload. It
/// replies with a `Ping` first, which the fault discards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Faulty {
    Reject,
    Panic,
}

impl Message for Faulty {
    const NAME: &'static str = "volley_test.Faulty";

    fn serialize(&self, writer: &mut BufferWriter) -> Result<(), SerdeErr> {
        matches!(self, Faulty::Panic).ser(writer)
    }
}

impl NetworkMessage<TestPeer> for Faulty {
    fn receive(
        reader: &mut BufferReader,
        context: &mut NetworkContext<TestPeer>,
    ) -> Result<(), HandlerError> {
        context.reply(&Ping { sequence: 0 }, NetworkDelivery::Reliable)?;
        if bool::de(reader)? {
            panic!("Faulty handler panicked on purpose");
        }
        Err(HandlerError::Rejected {
            reason: "Faulty handler rejected on purpose".to_string(),
        })
    }
}

/// Bound only to standard peers
#[derive(Clone, Debug, PartialEq)]
pub struct Kick {
    pub reason: String,
}

impl Message for Kick {
    const NAME: &'static str = "volley_test.Kick";

    fn serialize(&self, writer: &mut BufferWriter) -> Result<(), SerdeErr> {
        self.reason.ser(writer)
    }
}

impl NetworkMessage<TestPeer> for Kick {
    fn receive(
        reader: &mut BufferReader,
        context: &mut NetworkContext<TestPeer>,
    ) -> Result<(), HandlerError> {
        let reason = String::de(reader)?;
        context.owner.received.push(Received::Kick {
            sender_id: context.sender_id,
            reason,
        });
        Ok(())
    }

    fn binds_to(owner: &TestPeer) -> bool {
        owner.role == PeerRole::Standard
    }
}

pub struct TestPlugin;

impl MessagePlugin<TestPeer> for TestPlugin {
    fn build(&self, builder: &mut MessageRegistryBuilder<TestPeer>) {
        builder
            .add_message::<Chat>()
            .add_message::<Echo>()
            .add_message::<Position>()
            .add_message::<Ping>()
            .add_message::<Faulty>()
            .add_message::<Kick>();
    }
}

pub fn registry_builder() -> MessageRegistryBuilder<TestPeer> {
    let mut builder = MessageRegistry::builder();
    builder.add_plugin(TestPlugin);
    builder
}
