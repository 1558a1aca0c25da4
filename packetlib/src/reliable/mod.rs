//! Acknowledgment bookkeeping.
//!
//! This module provides:
//! - AckTracker: set of packet ids awaiting an acknowledgment

mod tracker;

pub use tracker::{AckTracker, TrackerStats};
