//! Per-slot ice time accumulation.
//!
//! Every clock tick adds one second of current shift and total ice
//! time for every slot present on either team's on-ice roster, the
//! goalie included. Shift resets are performed only by the line-change
//! pass, and only for slots that actually leave the ice.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::PlayerSlotKey;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceTime {
    pub current_shift: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Default)]
pub struct IceTimeTracker {
    times: HashMap<PlayerSlotKey, IceTime>,
}

impl IceTimeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// One simulated second elapsed for every given on-ice slot.
    pub fn record_tick(&mut self, on_ice: impl Iterator<Item = PlayerSlotKey>) {
        for slot in on_ice {
            let entry = self.times.entry(slot).or_default();
            entry.current_shift += 1;
            entry.total += 1;
        }
    }

    /// Accumulated times for a slot; zero for a slot that has never
    /// been on the ice.
    pub fn time(&self, slot: PlayerSlotKey) -> IceTime {
        self.times.get(&slot).copied().unwrap_or_default()
    }

    pub fn current_shift(&self, slot: PlayerSlotKey) -> u32 {
        self.time(slot).current_shift
    }

    pub fn total(&self, slot: PlayerSlotKey) -> u32 {
        self.time(slot).total
    }

    /// Start a fresh shift for a slot that just left the ice. Total
    /// ice time is unaffected.
    pub fn reset_shift(&mut self, slot: PlayerSlotKey) {
        if let Some(entry) = self.times.get_mut(&slot) {
            entry.current_shift = 0;
        }
    }
}
