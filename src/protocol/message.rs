use std::fmt;

use super::context::{GroupContext, Identity};
use crate::common::error::GroupError;

/*
    A message is a fixed-size text frame. The payload is stored at the
    front of the frame and the rest is zero filled, so a payload always
    leaves at least one zero byte behind it. Sender, receiver and tag
    travel in the envelope, never in the frame.
*/

pub const MESSAGE_CAPACITY: usize = 100;

pub type FrameData = [u8; MESSAGE_CAPACITY];

#[derive(Clone, PartialEq, Eq)]
pub struct Message {
    data: FrameData,
    len: usize,
}

impl Message {
    pub fn new(text: &str) -> Result<Self, GroupError> {
        let bytes = text.as_bytes();
        if bytes.len() >= MESSAGE_CAPACITY {
            return Err(GroupError::FrameOverflow {
                len: bytes.len(),
                capacity: MESSAGE_CAPACITY,
            });
        }

        let mut data = [0u8; MESSAGE_CAPACITY];
        data[..bytes.len()].copy_from_slice(bytes);
        Ok(Message {
            data,
            len: bytes.len(),
        })
    }

    /// Greeting a non-root member sends to root.
    pub fn greeting(ctx: &GroupContext) -> Result<Self, GroupError> {
        Message::new(&format!(
            "Hello from process {} of {}!",
            ctx.identity(),
            ctx.size()
        ))
    }

    /// Reply root sends back for a greeting.
    pub fn acknowledgment(root: Identity, to: Identity) -> Result<Self, GroupError> {
        Message::new(&format!(
            "Acknowledgment from process {} to process {}",
            root, to
        ))
    }

    pub fn as_str(&self) -> &str {
        // Frames are only ever filled from a &str.
        std::str::from_utf8(&self.data[..self.len]).unwrap_or_default()
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Message").field(&self.as_str()).finish()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_capacity() {
        let fits = "x".repeat(MESSAGE_CAPACITY - 1);
        let message = Message::new(&fits).unwrap();
        assert_eq!(message.as_str().len(), MESSAGE_CAPACITY - 1);
        assert_eq!(message.as_str(), fits);

        let too_long = "x".repeat(MESSAGE_CAPACITY);
        assert!(matches!(
            Message::new(&too_long),
            Err(GroupError::FrameOverflow { len: 100, capacity: 100 })
        ));

        assert_eq!(Message::new("").unwrap().as_str(), "");
    }

    #[test]
    fn test_greeting_and_acknowledgment_text() {
        let ctx = GroupContext::new(2, 4).unwrap();
        let greeting = Message::greeting(&ctx).unwrap();
        assert_eq!(greeting.to_string(), "Hello from process 2 of 4!");

        let ack = Message::acknowledgment(0, 2).unwrap();
        assert_eq!(ack.as_str(), "Acknowledgment from process 0 to process 2");
        assert_eq!(format!("{:?}", ack), "Message(\"Acknowledgment from process 0 to process 2\")");
    }
}
