use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use super::{
    context::GroupContext,
    event::{Event, Transcript},
    message::Message,
};
use crate::{
    common::error::GroupError,
    network::{envelope::PROTOCOL_TAG, runtime::GroupRuntime},
};

/*
    Root:        START -> (for i in 1..size-1: RECEIVE_i -> SEND_ACK_i) -> DONE
    Non-root:    START -> SEND_GREETING -> AWAIT_ACK -> DONE

    Root serves peers strictly in ascending identity order. It never asks
    for peer i + 1 before it is done with peer i, so a slow peer holds up
    every peer above it no matter when those peers sent.
*/

#[derive(Clone, Copy, PartialEq, Eq, Debug, clap::ValueEnum)]
pub enum Mode {
    /// Every member reports its identity; no messaging.
    Announce,
    /// Peers greet root; root collects the greetings.
    Collect,
    /// Peers greet root and wait for root's acknowledgment.
    Exchange,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Role {
    Root,
    Peer,
}

pub struct Member<R: GroupRuntime> {
    pub runtime: R,
    pub mode: Mode,
    pub jitter: Duration,
}

impl<R: GroupRuntime> Member<R> {
    pub fn new(runtime: R, mode: Mode) -> Self {
        Member {
            runtime,
            mode,
            jitter: Duration::ZERO,
        }
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Runs the member to completion. The runtime is torn down on every path.
    pub async fn run(mut self) -> Result<Transcript, GroupError> {
        let outcome = self.drive().await;
        let teardown = self.runtime.teardown().await;

        match (outcome, teardown) {
            (Ok(transcript), Ok(())) => Ok(transcript),
            (Err(e), _) | (Ok(_), Err(e)) => {
                warn!(error = %e, "member failed");
                Err(e)
            }
        }
    }

    async fn drive(&mut self) -> Result<Transcript, GroupError> {
        let ctx = self.runtime.initialize().await?;
        let mut transcript = Transcript::new(ctx.identity());
        debug!(identity = ctx.identity(), size = ctx.size(), mode = ?self.mode, "starting");

        match (self.mode, ctx.role()) {
            (Mode::Announce, _) => self.announce(&ctx, &mut transcript),
            (Mode::Collect, Role::Root) => self.collect(&ctx, &mut transcript).await?,
            (Mode::Collect, Role::Peer) => self.greet_root(&ctx, &mut transcript).await?,
            (Mode::Exchange, Role::Root) => self.acknowledge_peers(&ctx, &mut transcript).await?,
            (Mode::Exchange, Role::Peer) => {
                self.greet_root(&ctx, &mut transcript).await?;
                self.await_acknowledgment(&ctx, &mut transcript).await?;
            }
        }

        Ok(transcript)
    }

    fn announce(&self, ctx: &GroupContext, transcript: &mut Transcript) {
        transcript.record(Event::Announced {
            identity: ctx.identity(),
            size: ctx.size(),
        });
    }

    async fn greet_root(&mut self, ctx: &GroupContext, transcript: &mut Transcript) -> Result<(), GroupError> {
        delay_send(self.jitter).await;

        let greeting = Message::greeting(ctx)?;
        transcript.record(Event::Sent {
            from: ctx.identity(),
            to: ctx.root(),
            payload: greeting.to_string(),
        });
        self.runtime.send(ctx.root(), PROTOCOL_TAG, greeting).await
    }

    async fn await_acknowledgment(&mut self, ctx: &GroupContext, transcript: &mut Transcript) -> Result<(), GroupError> {
        let ack = self.runtime.receive(ctx.root(), PROTOCOL_TAG).await?;
        transcript.record(Event::Acknowledged {
            by: ctx.identity(),
            from: ctx.root(),
            payload: ack.to_string(),
        });
        Ok(())
    }

    async fn collect(&mut self, ctx: &GroupContext, transcript: &mut Transcript) -> Result<(), GroupError> {
        for peer in ctx.peers() {
            let greeting = self.runtime.receive(peer, PROTOCOL_TAG).await?;
            transcript.record(Event::Received {
                by: ctx.identity(),
                from: peer,
                payload: greeting.to_string(),
            });
        }
        Ok(())
    }

    async fn acknowledge_peers(&mut self, ctx: &GroupContext, transcript: &mut Transcript) -> Result<(), GroupError> {
        for peer in ctx.peers() {
            let greeting = self.runtime.receive(peer, PROTOCOL_TAG).await?;
            transcript.record(Event::Received {
                by: ctx.identity(),
                from: peer,
                payload: greeting.to_string(),
            });

            let ack = Message::acknowledgment(ctx.identity(), peer)?;
            transcript.record(Event::Sent {
                from: ctx.identity(),
                to: peer,
                payload: ack.to_string(),
            });
            self.runtime.send(peer, PROTOCOL_TAG, ack).await?;
        }
        Ok(())
    }
}

async fn delay_send(jitter: Duration) {
    if jitter.is_zero() {
        return;
    }
    let millis = rand::thread_rng().gen_range(0..=jitter.as_millis() as u64);
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::GroupConfig;
    use crate::network::node::{launch, LocalEndpoint};

    fn members(size: usize, mode: Mode) -> Vec<Member<LocalEndpoint>> {
        launch(&GroupConfig::new().size(size))
            .unwrap()
            .into_iter()
            .map(|endpoint| Member::new(endpoint, mode))
            .collect()
    }

    #[tokio::test]
    async fn test_announce_is_local() {
        // Peer 1 never runs; announcing must not wait on it.
        let mut members = members(2, Mode::Announce);
        let root = members.remove(0);

        let transcript = root.run().await.unwrap();
        assert_eq!(transcript.events, vec![Event::Announced { identity: 0, size: 2 }]);
    }

    #[tokio::test]
    async fn test_peer_greets_root() {
        let mut members = members(3, Mode::Collect);
        let peer = members.remove(2);
        let mut root_endpoint = members.remove(0).runtime;
        let ctx = root_endpoint.initialize().await.unwrap();

        let transcript = peer.run().await.unwrap();
        assert_eq!(
            transcript.events,
            vec![Event::Sent {
                from: 2,
                to: 0,
                payload: "Hello from process 2 of 3!".to_string(),
            }]
        );

        let greeting = root_endpoint.receive(2, PROTOCOL_TAG).await.unwrap();
        assert_eq!(greeting, Message::greeting(&GroupContext::new(2, ctx.size()).unwrap()).unwrap());
    }

    #[tokio::test]
    async fn test_root_replies_before_next_receive() {
        let mut members = members(3, Mode::Exchange);
        let mut peer2 = members.pop().unwrap().runtime;
        let mut peer1 = members.pop().unwrap().runtime;
        let root = members.pop().unwrap();
        peer1.initialize().await.unwrap();
        peer2.initialize().await.unwrap();

        let root_task = tokio::spawn(root.run());

        // Peer 2 greets first, yet root answers peer 1 before it looks at peer 2.
        peer2.send(0, PROTOCOL_TAG, Message::new("two").unwrap()).await.unwrap();
        peer1.send(0, PROTOCOL_TAG, Message::new("one").unwrap()).await.unwrap();

        let ack1 = peer1.receive(0, PROTOCOL_TAG).await.unwrap();
        assert_eq!(ack1.as_str(), "Acknowledgment from process 0 to process 1");
        let ack2 = peer2.receive(0, PROTOCOL_TAG).await.unwrap();
        assert_eq!(ack2.as_str(), "Acknowledgment from process 0 to process 2");

        let transcript = root_task.await.unwrap().unwrap();
        assert_eq!(transcript.received_from(), vec![1, 2]);
        assert_eq!(
            transcript.events[0],
            Event::Received { by: 0, from: 1, payload: "one".to_string() }
        );
    }

    #[tokio::test]
    async fn test_root_fails_when_peer_leaves_silently() {
        let mut members = members(2, Mode::Collect);
        let mut peer = members.pop().unwrap().runtime;
        let root = members.pop().unwrap();
        peer.teardown().await.unwrap();

        let err = root.run().await.unwrap_err();
        assert!(matches!(err, GroupError::Disconnected { peer: 1 }));
    }
}
