//! Ingest progress reporting over a channel.
//!
//! Events mark real stage transitions of one ingest call. Nothing here is
//! timer-driven, and a dropped receiver never affects the ingest itself.

use tokio::sync::mpsc;

use crate::error::UploadErrorKind;

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Decoding,
    Cropped {
        side: u32,
    },
    CompressionAttempt {
        attempt: u32,
        quality: f32,
        max_dimension: u32,
        size_bytes: usize,
    },
    Compressed {
        size_bytes: usize,
        attempts: u32,
        within_budget: bool,
    },
    Deduplicating {
        digest: String,
    },
    Reused {
        path: String,
    },
    Uploaded {
        path: String,
    },
    Failed {
        kind: UploadErrorKind,
    },
}

#[derive(Debug, Clone)]
pub struct ProgressSender {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ProgressSender {
    pub fn send(&self, event: ProgressEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("Progress receiver dropped");
        }
    }
}

pub type ProgressReceiver = mpsc::UnboundedReceiver<ProgressEvent>;

pub fn channel() -> (ProgressSender, ProgressReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ProgressSender { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_arrive_in_order() {
        let (tx, mut rx) = channel();
        tx.send(ProgressEvent::Decoding);
        tx.send(ProgressEvent::Cropped { side: 10 });
        drop(tx);

        assert_eq!(rx.recv().await, Some(ProgressEvent::Decoding));
        assert_eq!(rx.recv().await, Some(ProgressEvent::Cropped { side: 10 }));
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn closed_receiver_is_ignored() {
        let (tx, rx) = channel();
        drop(rx);
        tx.send(ProgressEvent::Decoding);
    }
}
