//! Progress samples and sinks.
//!
//! The controller emits one [`ProgressSample`] per iteration. Sinks are
//! fire-and-forget: recording never blocks and never fails the run.

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};

/// Snapshot emitted after each iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressSample {
    /// 1-based iteration number, strictly increasing within a run.
    pub iteration: usize,
    /// Total cost of the current (accepted) schedule.
    pub current_cost: f64,
    /// Total cost of the best schedule so far. Non-increasing.
    pub best_cost: f64,
}

/// Receives progress samples from a running controller.
pub trait ProgressSink {
    fn record(&mut self, sample: ProgressSample);
}

impl ProgressSink for Vec<ProgressSample> {
    fn record(&mut self, sample: ProgressSample) {
        self.push(sample);
    }
}

impl<S: ProgressSink + ?Sized> ProgressSink for &mut S {
    fn record(&mut self, sample: ProgressSample) {
        (**self).record(sample);
    }
}

/// Discards every sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn record(&mut self, _sample: ProgressSample) {}
}

/// Forwards samples to a closure.
pub struct FnSink<F>(pub F);

impl<F: FnMut(ProgressSample)> ProgressSink for FnSink<F> {
    fn record(&mut self, sample: ProgressSample) {
        (self.0)(sample);
    }
}

/// Forwards samples over a bounded channel without blocking.
///
/// When the channel is full or the receiver is gone, the sample is dropped
/// and counted.
#[derive(Debug)]
pub struct ChannelSink {
    tx: SyncSender<ProgressSample>,
    dropped: usize,
}

impl ChannelSink {
    pub fn new(tx: SyncSender<ProgressSample>) -> Self {
        Self { tx, dropped: 0 }
    }

    /// Creates a sink and its receiver with room for `capacity` samples.
    pub fn bounded(capacity: usize) -> (Self, Receiver<ProgressSample>) {
        let (tx, rx) = mpsc::sync_channel(capacity);
        (Self::new(tx), rx)
    }

    /// Samples lost to backpressure or a disconnected receiver.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl ProgressSink for ChannelSink {
    fn record(&mut self, sample: ProgressSample) {
        match self.tx.try_send(sample) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                self.dropped += 1;
            }
        }
    }
}
