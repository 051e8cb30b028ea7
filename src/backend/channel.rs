//! Status-update push channel.
//!
//! The backend pushes full-site replacement events whenever a monitor's state
//! changes. Consumers subscribe by holding a [`ChannelSource`] and unsubscribe
//! by dropping it: once the receiver is gone, sends fail on the backend side
//! and no further updates can be observed, so no callback outlives its session.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::model::Site;

/// One status-update push event: the complete new state of one site.
///
/// The site is always replaced atomically — there is no partial merge, so an
/// update arriving mid-edit cannot corrupt fields it does not carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Identifier of the site the event concerns.
    pub site_identifier: String,
    /// The full new site object, histories included.
    pub site: Site,
}

/// Trait for receiving status updates from the backend.
///
/// Implementations deliver events from whatever transport the backend uses;
/// `poll` must be non-blocking so a UI loop can interleave it with input.
pub trait UpdateSource: Send + Debug {
    /// Take the next pending update, if any.
    fn poll(&mut self) -> Option<StatusUpdate>;

    /// Human-readable description of where updates come from.
    fn description(&self) -> &str;

    /// The error message from the last poll, if the source failed.
    fn error(&self) -> Option<&str>;
}

/// An [`UpdateSource`] fed through an in-process tokio channel.
///
/// An unbounded mpsc channel (rather than a latest-value watch) because
/// updates for different sites interleave and each one must be applied, not
/// just the most recent.
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::UnboundedReceiver<StatusUpdate>,
    description: String,
}

impl ChannelSource {
    /// Create a sender/source pair.
    ///
    /// The sender goes to whatever bridges the backend transport; the source
    /// goes to the store/session owner and is dropped on teardown.
    pub fn create(source_description: &str) -> (mpsc::UnboundedSender<StatusUpdate>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        let source = Self {
            receiver: rx,
            description: format!("channel: {}", source_description),
        };
        (tx, source)
    }
}

impl UpdateSource for ChannelSource {
    fn poll(&mut self) -> Option<StatusUpdate> {
        self.receiver.try_recv().ok()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        // Connection failures belong to the transport bridging the backend;
        // a closed channel simply stops yielding updates.
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(identifier: &str) -> StatusUpdate {
        StatusUpdate {
            site_identifier: identifier.to_string(),
            site: Site {
                identifier: identifier.to_string(),
                name: None,
                monitors: Vec::new(),
            },
        }
    }

    #[test]
    fn test_poll_drains_in_order() {
        let (tx, mut source) = ChannelSource::create("test");
        assert!(source.poll().is_none());

        tx.send(update("a")).unwrap();
        tx.send(update("b")).unwrap();

        assert_eq!(source.poll().unwrap().site_identifier, "a");
        assert_eq!(source.poll().unwrap().site_identifier, "b");
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let (tx, source) = ChannelSource::create("test");
        drop(source);
        // Receiver gone: the backend side sees the failure and stops pushing
        assert!(tx.send(update("a")).is_err());
    }

    #[test]
    fn test_description() {
        let (_tx, source) = ChannelSource::create("backend ipc");
        assert_eq!(source.description(), "channel: backend ipc");
        assert!(source.error().is_none());
    }
}
