use std::time::Duration;

use super::error::GroupError;

/// Configuration for launching a process group.
///
/// Defaults describe a group of four with unbounded receive waits:
///
/// ```ignore
/// let config = GroupConfig::new()
///     .size(8)
///     .recv_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Number of members, root included.
    pub(crate) size: usize,
    /// Depth of each point-to-point channel.
    pub(crate) channel_capacity: usize,
    /// Upper bound on a single receive. `None` waits forever.
    pub(crate) recv_timeout: Option<Duration>,
    /// Upper bound of the random delay a non-root member takes before its first send.
    pub(crate) jitter: Duration,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupConfig {
    pub fn new() -> Self {
        Self {
            size: 4,
            channel_capacity: 16,
            recv_timeout: None,
            jitter: Duration::ZERO,
        }
    }

    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn recv_timeout(mut self, timeout: Duration) -> Self {
        self.recv_timeout = Some(timeout);
        self
    }

    pub fn jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn validate(&self) -> Result<(), GroupError> {
        if self.size == 0 {
            return Err(GroupError::InvalidSize(self.size));
        }
        // tokio refuses zero-capacity channels
        if self.channel_capacity == 0 {
            return Err(GroupError::Init(
                "channel capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
