use std::ops::Range;

use super::processor::Role;
use crate::common::error::GroupError;

pub type Identity = usize;

/// Identity of the coordinating member.
pub const ROOT: Identity = 0;

/// What a member knows about itself and its group, fixed at initialization.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GroupContext {
    identity: Identity,
    size: usize,
}

impl GroupContext {
    pub fn new(identity: Identity, size: usize) -> Result<Self, GroupError> {
        if size == 0 {
            return Err(GroupError::InvalidSize(size));
        }
        if identity >= size {
            return Err(GroupError::PeerOutOfRange { identity, size });
        }
        Ok(GroupContext { identity, size })
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn root(&self) -> Identity {
        ROOT
    }

    pub fn is_root(&self) -> bool {
        self.identity == ROOT
    }

    pub fn role(&self) -> Role {
        if self.is_root() {
            Role::Root
        } else {
            Role::Peer
        }
    }

    /// Non-root identities in the order root serves them.
    pub fn peers(&self) -> Range<Identity> {
        ROOT + 1..self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_bounds() {
        assert!(matches!(GroupContext::new(0, 0), Err(GroupError::InvalidSize(0))));
        assert!(matches!(
            GroupContext::new(4, 4),
            Err(GroupError::PeerOutOfRange { identity: 4, size: 4 })
        ));

        let ctx = GroupContext::new(3, 4).unwrap();
        assert_eq!(ctx.identity(), 3);
        assert_eq!(ctx.size(), 4);
        assert!(!ctx.is_root());
        assert_eq!(ctx.role(), Role::Peer);
    }

    #[test]
    fn test_peers_ascending() {
        let root = GroupContext::new(0, 4).unwrap();
        assert_eq!(root.role(), Role::Root);
        assert_eq!(root.peers().collect::<Vec<_>>(), vec![1, 2, 3]);

        let alone = GroupContext::new(0, 1).unwrap();
        assert_eq!(alone.peers().count(), 0);
    }
}
