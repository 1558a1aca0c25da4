//! Bookkeeping for packets awaiting acknowledgment.
//!
//! Ids are inserted when a locally originated packet asks for an ack and
//! removed when a matching ack frame arrives. Entries never time out and
//! nothing is retransmitted; the tracker only records what is in flight.

use std::collections::HashSet;
use std::num::NonZeroU16;

/// Statistics about acknowledgment traffic.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TrackerStats {
    /// Ids registered as pending.
    pub registered: u64,

    /// Pending ids cleared by a matching ack.
    pub acknowledged: u64,

    /// Acks received for ids that were not pending.
    pub unmatched_acks: u64,
}

impl TrackerStats {
    /// Creates new empty statistics.
    pub const fn new() -> Self {
        Self {
            registered: 0,
            acknowledged: 0,
            unmatched_acks: 0,
        }
    }

    /// Returns the share of registered ids that have been acknowledged, in percent.
    pub fn ack_rate(&self) -> f32 {
        if self.registered == 0 {
            100.0
        } else {
            (self.acknowledged as f32 / self.registered as f32) * 100.0
        }
    }
}

/// Set of packet ids awaiting acknowledgment.
#[derive(Debug, Default, Clone)]
pub struct AckTracker {
    pending: HashSet<NonZeroU16>,
    stats: TrackerStats,
}

impl AckTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `id` as awaiting acknowledgment.
    ///
    /// Returns false if the id was already pending. Two in-flight packets
    /// sharing an id are indistinguishable; one ack clears both.
    pub fn mark_pending(&mut self, id: NonZeroU16) -> bool {
        let inserted = self.pending.insert(id);
        if inserted {
            self.stats.registered += 1;
        } else {
            log::warn!("packet id {} is already awaiting an ack", id);
        }
        inserted
    }

    /// Clears `id` if it is pending.
    ///
    /// Returns true if an entry was removed. Unknown ids are ignored.
    pub fn acknowledge(&mut self, id: NonZeroU16) -> bool {
        let removed = self.pending.remove(&id);
        if removed {
            self.stats.acknowledged += 1;
        } else {
            self.stats.unmatched_acks += 1;
        }
        removed
    }

    /// Returns true if `id` is awaiting acknowledgment.
    pub fn is_pending(&self, id: NonZeroU16) -> bool {
        self.pending.contains(&id)
    }

    /// Returns the number of pending ids.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Returns the pending ids in ascending order.
    pub fn pending(&self) -> impl Iterator<Item = NonZeroU16> {
        let mut ids: Vec<NonZeroU16> = self.pending.iter().copied().collect();
        ids.sort_unstable();
        ids.into_iter()
    }

    /// Forgets every pending id.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Returns the statistics.
    pub const fn stats(&self) -> &TrackerStats {
        &self.stats
    }
}
