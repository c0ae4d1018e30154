use async_trait::async_trait;

use super::envelope::Tag;
use crate::{
    common::error::GroupError,
    protocol::{
        context::{GroupContext, Identity},
        message::Message,
    },
};

/// Transport a member drives the protocol through.
///
/// Every operation suspends the calling member until it can complete. There
/// is no wildcard receive: each receive names the sender it expects.
#[async_trait]
pub trait GroupRuntime: Send {
    /// Discover this member's identity and the group size.
    async fn initialize(&mut self) -> Result<GroupContext, GroupError>;

    /// Hand `body` to the transport for `receiver`.
    async fn send(&mut self, receiver: Identity, tag: Tag, body: Message) -> Result<(), GroupError>;

    /// Wait for the next message from `sender` carrying `tag`.
    async fn receive(&mut self, sender: Identity, tag: Tag) -> Result<Message, GroupError>;

    /// Release transport resources. Must be the last call on the runtime.
    async fn teardown(&mut self) -> Result<(), GroupError>;
}
