use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info};

use super::{
    envelope::{Envelope, Tag},
    runtime::GroupRuntime,
};
use crate::{
    common::{config::GroupConfig, error::GroupError},
    protocol::{
        context::{GroupContext, Identity},
        message::Message,
    },
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum EndpointState {
    Ready,
    Initialized,
    TornDown,
}

/// One member's end of an in-process group.
///
/// `outgoing[r]` feeds the channel this member shares with receiver `r`,
/// `incoming[s]` drains the one it shares with sender `s`.
pub struct LocalEndpoint {
    identity: Identity,
    size: usize,
    outgoing: Vec<Sender<Envelope>>,
    incoming: Vec<Receiver<Envelope>>,
    // Envelopes pulled off a channel while waiting for a different tag.
    held: HashMap<(Identity, Tag), VecDeque<Message>>,
    recv_timeout: Option<Duration>,
    state: EndpointState,
}

/// Wire up a group: one bounded channel per ordered pair of members.
pub fn launch(config: &GroupConfig) -> Result<Vec<LocalEndpoint>, GroupError> {
    config.validate()?;
    let size = config.size;

    let mut outgoing: Vec<Vec<Sender<Envelope>>> = (0..size).map(|_| Vec::with_capacity(size)).collect();
    let mut incoming: Vec<Vec<Receiver<Envelope>>> = (0..size).map(|_| Vec::with_capacity(size)).collect();
    for sender in 0..size {
        for receiver in 0..size {
            let (tx, rx) = mpsc::channel(config.channel_capacity);
            outgoing[sender].push(tx);
            incoming[receiver].push(rx);
        }
    }

    info!(size, capacity = config.channel_capacity, "group formed");

    Ok(outgoing
        .into_iter()
        .zip(incoming)
        .enumerate()
        .map(|(identity, (outgoing, incoming))| LocalEndpoint {
            identity,
            size,
            outgoing,
            incoming,
            held: HashMap::new(),
            recv_timeout: config.recv_timeout,
            state: EndpointState::Ready,
        })
        .collect())
}

impl LocalEndpoint {
    pub fn identity(&self) -> Identity {
        self.identity
    }

    fn ensure_initialized(&self) -> Result<(), GroupError> {
        match self.state {
            EndpointState::Initialized => Ok(()),
            EndpointState::Ready => Err(GroupError::Uninitialized),
            EndpointState::TornDown => Err(GroupError::TornDown),
        }
    }

    fn check_member(&self, identity: Identity) -> Result<(), GroupError> {
        if identity >= self.size {
            return Err(GroupError::PeerOutOfRange {
                identity,
                size: self.size,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl GroupRuntime for LocalEndpoint {
    async fn initialize(&mut self) -> Result<GroupContext, GroupError> {
        if self.state == EndpointState::TornDown {
            return Err(GroupError::Init(format!(
                "endpoint of process {} is already torn down",
                self.identity
            )));
        }
        let ctx = GroupContext::new(self.identity, self.size)?;
        self.state = EndpointState::Initialized;
        debug!(identity = ctx.identity(), size = ctx.size(), "initialized");
        Ok(ctx)
    }

    async fn send(&mut self, receiver: Identity, tag: Tag, body: Message) -> Result<(), GroupError> {
        self.ensure_initialized()?;
        self.check_member(receiver)?;

        let envelope = Envelope::new(self.identity, receiver, tag, body);
        self.outgoing[receiver]
            .send(envelope)
            .await
            .map_err(|_| GroupError::Disconnected { peer: receiver })?;
        debug!(sender = self.identity, receiver, tag, "sent");
        Ok(())
    }

    async fn receive(&mut self, sender: Identity, tag: Tag) -> Result<Message, GroupError> {
        self.ensure_initialized()?;
        self.check_member(sender)?;

        if let Some(body) = self.held.get_mut(&(sender, tag)).and_then(VecDeque::pop_front) {
            debug!(receiver = self.identity, sender, tag, "received held message");
            return Ok(body);
        }

        let waited = self.recv_timeout;
        let deadline = waited.map(|timeout| Instant::now() + timeout);
        loop {
            let next = self.incoming[sender].recv();
            let envelope = match deadline {
                Some(deadline) => timeout_at(deadline, next).await.map_err(|_| GroupError::Timeout {
                    peer: sender,
                    tag,
                    waited: waited.unwrap_or_default(),
                })?,
                None => next.await,
            };

            let Some(envelope) = envelope else {
                return Err(GroupError::Disconnected { peer: sender });
            };
            debug_assert_eq!(envelope.sender, sender);
            debug_assert_eq!(envelope.receiver, self.identity);

            if envelope.tag == tag {
                debug!(receiver = self.identity, sender, tag, "received");
                return Ok(envelope.body);
            }
            self.held
                .entry((sender, envelope.tag))
                .or_default()
                .push_back(envelope.body);
        }
    }

    async fn teardown(&mut self) -> Result<(), GroupError> {
        if self.state == EndpointState::TornDown {
            return Err(GroupError::TornDown);
        }
        self.outgoing.clear();
        self.incoming.clear();
        self.held.clear();
        self.state = EndpointState::TornDown;
        debug!(identity = self.identity, "torn down");
        Ok(())
    }
}
