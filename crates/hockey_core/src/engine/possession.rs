//! Puck possession projection for the status widget.
//!
//! A pure last-write-wins record updated as a side effect of every
//! phase transition; it holds no state of its own beyond the last
//! write.

use serde::{Deserialize, Serialize};

use crate::models::TeamSide;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Neutral,
    /// Offensive zone of the named attacking team.
    Offensive(TeamSide),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuckPossessionState {
    pub team: Option<TeamSide>,
    pub zone: Option<Zone>,
    pub has_puck: bool,
}

impl PuckPossessionState {
    /// A team controls the puck in the given zone.
    pub fn held(team: TeamSide, zone: Zone) -> Self {
        Self { team: Some(team), zone: Some(zone), has_puck: true }
    }

    /// Loose puck in the given zone, no controlling team.
    pub fn loose(zone: Zone) -> Self {
        Self { team: None, zone: Some(zone), has_puck: false }
    }

    /// No possession context, e.g. before a face-off.
    pub fn cleared() -> Self {
        Self::default()
    }
}
