use std::fmt;

use tracing::debug;

use super::context::Identity;

/// Something a member did that is worth reporting on stdout.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Event {
    Announced {
        identity: Identity,
        size: usize,
    },
    Sent {
        from: Identity,
        to: Identity,
        payload: String,
    },
    Received {
        by: Identity,
        from: Identity,
        payload: String,
    },
    /// A non-root member got root's reply to its greeting.
    Acknowledged {
        by: Identity,
        from: Identity,
        payload: String,
    },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Announced { identity, size } => {
                write!(f, "Hello World from process {} of {}", identity, size)
            }
            Event::Sent { from, to, payload } => write!(
                f,
                "(Process {}) Sending message: \"{}\" to process {}.",
                from, payload, to
            ),
            Event::Received { by, from, payload } => write!(
                f,
                "(Process {}) Received message: \"{}\" from process {}",
                by, payload, from
            ),
            Event::Acknowledged { by, from, payload } => write!(
                f,
                "(Process {}) Received response: \"{}\" from process {}.",
                by, payload, from
            ),
        }
    }
}

/// Ordered record of the events one member emitted.
#[derive(Clone, Debug)]
pub struct Transcript {
    pub identity: Identity,
    pub events: Vec<Event>,
}

impl Transcript {
    pub fn new(identity: Identity) -> Self {
        Transcript {
            identity,
            events: Vec::new(),
        }
    }

    /// Prints the event line and keeps it.
    pub fn record(&mut self, event: Event) {
        debug!(identity = self.identity, ?event, "event");
        println!("{}", event);
        self.events.push(event);
    }

    /// Senders of the messages this member received, in processing order.
    #[cfg(test)]
    pub fn received_from(&self) -> Vec<Identity> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Received { from, .. } | Event::Acknowledged { from, .. } => Some(*from),
                _ => None,
            })
            .collect()
    }
}
