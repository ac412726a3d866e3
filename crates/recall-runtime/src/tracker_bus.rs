use std::sync::Arc;

use tokio::sync::watch;

use recall_core::cursor::{LandmarkName, RawLandmark, TrackerFrame};

/// Latest-known tracker snapshot shared between the tracker callback and the
/// tick loop.
///
/// Publishing overwrites the previous snapshot (last-write-wins); readers
/// never wait for a new one. Until something is published, readers see the
/// empty frame with `seq == 0`, so no cursor is ever visible.
#[derive(Debug, Clone)]
pub struct TrackerBus {
    tx: Arc<watch::Sender<TrackerFrame>>,
}

impl Default for TrackerBus {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackerBus {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(TrackerFrame::empty());
        Self { tx: Arc::new(tx) }
    }

    /// Replace the snapshot with `points`, stamping the next sequence number.
    /// Returns the stamped `seq`.
    pub fn publish(&self, points: Vec<(LandmarkName, RawLandmark)>) -> u64 {
        let mut seq = 0;
        self.tx.send_modify(|frame| {
            frame.seq += 1;
            frame.points = points;
            seq = frame.seq;
        });
        seq
    }

    /// The tracker lost every point (user walked out of frame).
    pub fn publish_empty(&self) -> u64 {
        self.publish(Vec::new())
    }

    pub fn subscribe(&self) -> TrackerReader {
        TrackerReader { rx: self.tx.subscribe() }
    }

    /// Whether any [`TrackerReader`] is still alive.
    pub fn has_readers(&self) -> bool {
        self.tx.receiver_count() > 0
    }

    /// Sequence number of the current snapshot.
    pub fn seq(&self) -> u64 {
        self.tx.borrow().seq
    }
}

/// Read side of a [`TrackerBus`].
#[derive(Debug, Clone)]
pub struct TrackerReader {
    rx: watch::Receiver<TrackerFrame>,
}

impl TrackerReader {
    /// Clone of the most recent snapshot. Never blocks.
    pub fn latest(&mut self) -> TrackerFrame {
        self.rx.borrow_and_update().clone()
    }

    /// Whether a snapshot newer than the last `latest()` call exists.
    pub fn has_new(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }
}
