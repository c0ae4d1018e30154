pub mod context;
pub mod event;
pub mod message;
pub mod processor;

pub use context::*;
pub use event::*;
pub use message::*;
pub use processor::*;

use tracing::{info, warn};

use crate::{
    common::{config::GroupConfig, error::GroupError},
    network::node::launch,
};

/// Forms a group, runs every member to completion and returns their
/// transcripts ordered by identity. The first member error wins.
pub async fn run_group(config: &GroupConfig, mode: Mode) -> Result<Vec<Transcript>, GroupError> {
    let endpoints = launch(config)?;
    info!(size = config.size, ?mode, "starting members");

    let handles: Vec<_> = endpoints
        .into_iter()
        .map(|endpoint| {
            let identity = endpoint.identity();
            let member = Member::new(endpoint, mode).with_jitter(config.jitter);
            (identity, tokio::spawn(member.run()))
        })
        .collect();

    let mut transcripts = Vec::with_capacity(handles.len());
    let mut first_error = None;
    for (identity, handle) in handles {
        match handle.await {
            Ok(Ok(transcript)) => transcripts.push(transcript),
            Ok(Err(e)) => {
                first_error.get_or_insert(e);
            }
            Err(join_error) => {
                warn!(identity, error = %join_error, "member task aborted");
                first_error.get_or_insert(GroupError::MemberAborted(identity));
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => {
            info!(members = transcripts.len(), "all members done");
            Ok(transcripts)
        }
    }
}
