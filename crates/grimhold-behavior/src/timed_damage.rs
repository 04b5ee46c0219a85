//! Timed damage delivery.
//!
//! Walks a sorted list of time offsets and asks the caller to deliver one
//! damage instance at each. The caller validates right before every
//! delivery and can stop the walk; the applier guarantees each offset is
//! visited at most once and that a stopped walk has delivered a strict
//! prefix of its instances.

use serde::{Deserialize, Serialize};

use crate::clock::Suspension;

/// What the caller did at an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// One instance was delivered.
    Delivered,
    /// Validation failed; stop without delivering.
    Stop,
}

/// Result of feeding time to the applier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApplierStatus {
    /// Waiting for the next offset.
    Waiting,
    /// Every offset delivered. `overflow` is the unused part of the time fed.
    Finished {
        /// Seconds left over past the last offset
        overflow: f32,
    },
    /// The caller stopped the walk.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum Progress {
    Running,
    Finished,
    Stopped,
}

/// Delivers one damage instance per configured offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedDamageApplier {
    offsets: Vec<f32>,
    next: usize,
    wait: Suspension,
    delivered: u32,
    progress: Progress,
}

impl TimedDamageApplier {
    /// Create an applier from raw offsets. Negative offsets clamp to zero,
    /// the list is sorted ascending, and an empty list becomes a single
    /// immediate instance.
    #[must_use]
    pub fn new(offsets: impl IntoIterator<Item = f32>) -> Self {
        let mut offsets: Vec<f32> = offsets.into_iter().map(|o| o.max(0.0)).collect();
        offsets.sort_by(f32::total_cmp);
        if offsets.is_empty() {
            offsets.push(0.0);
        }
        let first = offsets[0];
        Self {
            offsets,
            next: 0,
            wait: Suspension::new(first),
            delivered: 0,
            progress: Progress::Running,
        }
    }

    /// `count` instances (at least one) spaced `interval` seconds apart,
    /// starting immediately.
    #[must_use]
    pub fn evenly_spaced(count: u32, interval: f32) -> Self {
        let interval = interval.max(0.0);
        Self::new((0..count.max(1)).map(|i| i as f32 * interval))
    }

    /// Sorted, clamped offsets.
    #[must_use]
    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    /// Waits between consecutive instances (first entry is the wait before
    /// the first instance).
    #[must_use]
    pub fn deltas(&self) -> Vec<f32> {
        let mut previous = 0.0;
        self.offsets
            .iter()
            .map(|&o| {
                let delta = o - previous;
                previous = o;
                delta
            })
            .collect()
    }

    /// Offset of the last instance; the total time the walk occupies.
    #[must_use]
    pub fn span(&self) -> f32 {
        self.offsets.last().copied().unwrap_or(0.0)
    }

    /// Number of configured instances.
    #[must_use]
    pub fn instance_count(&self) -> u32 {
        self.offsets.len() as u32
    }

    /// Instances delivered so far.
    #[must_use]
    pub fn delivered(&self) -> u32 {
        self.delivered
    }

    /// Index of the next instance, if the walk is still running.
    #[must_use]
    pub fn next_index(&self) -> Option<usize> {
        (self.progress == Progress::Running).then_some(self.next)
    }

    /// Whether every instance was delivered.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.progress == Progress::Finished
    }

    /// Whether the walk ended early.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.progress == Progress::Stopped
    }

    /// Stop the walk from outside (owner death, destruction).
    pub fn stop(&mut self) {
        if self.progress == Progress::Running {
            self.progress = Progress::Stopped;
        }
    }

    /// Feed `dt` seconds. `tick` is called with the instance index at each
    /// offset reached, immediately before delivery, and decides whether the
    /// instance lands.
    pub fn advance<F>(&mut self, dt: f32, mut tick: F) -> ApplierStatus
    where
        F: FnMut(usize) -> TickOutcome,
    {
        match self.progress {
            Progress::Finished => return ApplierStatus::Finished { overflow: dt.max(0.0) },
            Progress::Stopped => return ApplierStatus::Stopped,
            Progress::Running => {},
        }

        let mut budget = dt;
        loop {
            let Some(overflow) = self.wait.advance(budget) else {
                return ApplierStatus::Waiting;
            };

            match tick(self.next) {
                TickOutcome::Delivered => {
                    self.delivered += 1;
                    self.next += 1;
                },
                TickOutcome::Stop => {
                    self.progress = Progress::Stopped;
                    return ApplierStatus::Stopped;
                },
            }

            if self.next >= self.offsets.len() {
                self.progress = Progress::Finished;
                return ApplierStatus::Finished { overflow };
            }

            let delta = self.offsets[self.next] - self.offsets[self.next - 1];
            self.wait = Suspension::new(delta);
            budget = overflow;
        }
    }
}
