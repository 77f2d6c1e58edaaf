//! Ordered conduit between one search worker and one consumer.
//!
//! Unbounded so the worker never waits on the foreground.

use crate::kernel::services::ports::search::{ResultEvent, SearchMessage};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

pub fn event_channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel();
    (EventSender { tx }, EventReceiver { rx })
}

#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<SearchMessage>,
}

/// The consumer dropped its receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disconnected;

impl EventSender {
    pub fn send(&self, search_id: u64, event: ResultEvent) -> Result<(), Disconnected> {
        self.tx
            .send(SearchMessage { search_id, event })
            .map_err(|_| Disconnected)
    }
}

#[derive(Debug)]
pub struct EventReceiver {
    rx: Receiver<SearchMessage>,
}

impl EventReceiver {
    /// Everything produced so far, in production order.
    pub fn drain(&self) -> Vec<SearchMessage> {
        self.rx.try_iter().collect()
    }

    /// `None` on timeout or once every sender is gone and the queue is empty.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<SearchMessage> {
        match self.rx.recv_timeout(timeout) {
            Ok(msg) => Some(msg),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/search/channel.rs"]
mod tests;
