use std::collections::HashMap;

use log::debug;

use crate::{
    constants::MAX_MESSAGE_TYPES,
    messages::{
        error::RegistryError,
        message::{MessageHandler, MessageKind, NetworkMessage},
    },
    types::MessageTag,
};

/// Adds a related set of message types to a registry builder
pub trait MessagePlugin<O> {
    fn build(&self, builder: &mut MessageRegistryBuilder<O>);
}

struct Candidate<O> {
    kind: MessageKind,
    handler: MessageHandler<O>,
    binds_to: fn(&O) -> bool,
}

impl<O> Clone for Candidate<O> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            handler: self.handler,
            binds_to: self.binds_to,
        }
    }
}

/// Collects the message types an owner can send and receive.
///
/// Registration order does not matter: `build` sorts by `Message::NAME`
/// before assigning tags, so two processes registering the same set of
/// types always agree on the mapping.
pub struct MessageRegistryBuilder<O> {
    candidates: Vec<Candidate<O>>,
}

impl<O> Default for MessageRegistryBuilder<O> {
    fn default() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }
}

impl<O> Clone for MessageRegistryBuilder<O> {
    fn clone(&self) -> Self {
        Self {
            candidates: self.candidates.clone(),
        }
    }
}

impl<O> MessageRegistryBuilder<O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_message<M: NetworkMessage<O>>(&mut self) -> &mut Self {
        self.candidates.push(Candidate {
            kind: MessageKind::of::<M>(),
            handler: M::receive,
            binds_to: M::binds_to,
        });
        self
    }

    pub fn add_plugin<P: MessagePlugin<O>>(&mut self, plugin: P) -> &mut Self {
        plugin.build(self);
        self
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Filters candidates through their binding to `owner`, orders them by
    /// name and assigns tags.
    pub fn build(&self, owner: &O) -> Result<MessageRegistry<O>, RegistryError> {
        let mut bound: Vec<Candidate<O>> = self
            .candidates
            .iter()
            .filter(|candidate| (candidate.binds_to)(owner))
            .cloned()
            .collect();

        for candidate in &bound {
            if candidate.kind.name().is_empty() {
                return Err(RegistryError::EmptyName {
                    type_name: candidate.kind.type_name(),
                });
            }
        }

        // ordinal comparison, so the order is identical on every platform
        bound.sort_by(|a, b| a.kind.name().as_bytes().cmp(b.kind.name().as_bytes()));

        for pair in bound.windows(2) {
            let (first, second) = (&pair[0].kind, &pair[1].kind);
            if first.name() != second.name() {
                continue;
            }
            if first == second {
                return Err(RegistryError::DuplicateMessageType {
                    name: first.name(),
                });
            }
            return Err(RegistryError::DuplicateName {
                name: first.name(),
            });
        }

        if bound.len() > MAX_MESSAGE_TYPES {
            return Err(RegistryError::TooManyMessageTypes {
                count: bound.len(),
                max: MAX_MESSAGE_TYPES,
            });
        }

        let mut tags = HashMap::with_capacity(bound.len());
        let mut entries = Vec::with_capacity(bound.len());
        for (index, candidate) in bound.into_iter().enumerate() {
            // bounded by MAX_MESSAGE_TYPES above
            let tag = index as MessageTag;
            debug!("Registered message {} as tag {}", candidate.kind.name(), tag);
            tags.insert(candidate.kind, tag);
            entries.push(RegistryEntry {
                kind: candidate.kind,
                handler: candidate.handler,
            });
        }

        Ok(MessageRegistry { tags, entries })
    }
}

struct RegistryEntry<O> {
    kind: MessageKind,
    handler: MessageHandler<O>,
}

/// Bidirectional mapping between message types and their wire tags, plus
/// the handler for each tag. Immutable once built.
pub struct MessageRegistry<O> {
    tags: HashMap<MessageKind, MessageTag>,
    entries: Vec<RegistryEntry<O>>,
}

impl<O> MessageRegistry<O> {
    pub fn builder() -> MessageRegistryBuilder<O> {
        MessageRegistryBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_tag(&self, tag: MessageTag) -> bool {
        usize::from(tag) < self.entries.len()
    }

    pub fn try_tag_of(&self, kind: &MessageKind) -> Result<MessageTag, RegistryError> {
        self.tags
            .get(kind)
            .copied()
            .ok_or(RegistryError::MessageKindNotFound { name: kind.name() })
    }

    /// # Panics
    /// Panics if the message type is not registered
    pub fn tag_of(&self, kind: &MessageKind) -> MessageTag {
        self.try_tag_of(kind)
            .expect("Message type not registered! Cannot find its tag.")
    }

    pub fn try_kind_of(&self, tag: MessageTag) -> Result<&MessageKind, RegistryError> {
        self.entry(tag).map(|entry| &entry.kind)
    }

    /// # Panics
    /// Panics if no message type has this tag
    pub fn kind_of(&self, tag: MessageTag) -> &MessageKind {
        self.try_kind_of(tag)
            .expect("Tag not registered! Cannot find its message type.")
    }

    pub fn try_handler_of(&self, tag: MessageTag) -> Result<MessageHandler<O>, RegistryError> {
        self.entry(tag).map(|entry| entry.handler)
    }

    /// Registered kinds in tag order
    pub fn kinds(&self) -> impl Iterator<Item = &MessageKind> {
        self.entries.iter().map(|entry| &entry.kind)
    }

    /// FNV-1a hash of the ordered message names. Peers that agree on this
    /// value agree on every tag.
    pub fn fingerprint(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;

        let mut hash = OFFSET_BASIS;
        for kind in self.kinds() {
            // terminator keeps ["ab", "c"] distinct from ["a", "bc"]
            for byte in kind.name().bytes().chain(std::iter::once(0)) {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(PRIME);
            }
        }
        hash
    }

    pub fn verify_fingerprint(&self, remote: u64) -> Result<(), RegistryError> {
        let local = self.fingerprint();
        if local != remote {
            return Err(RegistryError::FingerprintMismatch { local, remote });
        }
        Ok(())
    }

    fn entry(&self, tag: MessageTag) -> Result<&RegistryEntry<O>, RegistryError> {
        self.entries
            .get(usize::from(tag))
            .ok_or(RegistryError::TagNotFound {
                tag,
                count: self.entries.len(),
            })
    }
}
