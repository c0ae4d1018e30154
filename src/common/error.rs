use std::time::Duration;

use crate::{network::envelope::Tag, protocol::context::Identity};

/// Errors surfaced by the group runtime and the protocol driving it.
#[derive(Debug, thiserror::Error)]
pub enum GroupError {
    #[error("failed to initialize group transport: {0}")]
    Init(String),

    #[error("invalid group size: {0} (a group needs at least one member)")]
    InvalidSize(usize),

    #[error("process {identity} is outside the group of size {size}")]
    PeerOutOfRange { identity: Identity, size: usize },

    #[error("payload of {len} bytes does not fit a {capacity}-byte frame")]
    FrameOverflow { len: usize, capacity: usize },

    #[error("process {peer} disconnected")]
    Disconnected { peer: Identity },

    #[error("no message with tag {tag} from process {peer} after {waited:?}")]
    Timeout {
        peer: Identity,
        tag: Tag,
        waited: Duration,
    },

    #[error("endpoint used before initialization")]
    Uninitialized,

    #[error("endpoint is torn down")]
    TornDown,

    #[error("process {0} aborted")]
    MemberAborted(Identity),
}
