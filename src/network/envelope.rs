use crate::protocol::{context::Identity, message::Message};

pub type Tag = u32;

/// Tag shared by greetings and acknowledgments.
pub const PROTOCOL_TAG: Tag = 0;

/// Addressing wrapped around a message while it is in flight. Created by a
/// send, consumed by exactly one matching receive.
#[derive(Clone, Debug)]
pub struct Envelope {
    pub sender: Identity,
    pub receiver: Identity,
    pub tag: Tag,
    pub body: Message,
}

impl Envelope {
    pub fn new(sender: Identity, receiver: Identity, tag: Tag, body: Message) -> Self {
        Envelope {
            sender,
            receiver,
            tag,
            body,
        }
    }
}
