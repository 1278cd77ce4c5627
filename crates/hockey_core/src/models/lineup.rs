//! Lineups, on-ice rosters and the slot key that identifies a player
//! for the whole match.
//!
//! A [`Lineup`] is built once before the match from external roster
//! selection and is read-only during simulation. The [`OnIceRoster`]
//! is the subset currently on the ice and is mutated only by line
//! changes. Stat and ice-time accumulation is keyed by
//! [`PlayerSlotKey`] instead of player identity: lineup order is fixed,
//! so the key stays valid across substitutions.

use serde::{Deserialize, Serialize};

use super::player::{Player, Position, Role};
use crate::error::{MatchError, Result};

/// Maximum skaters on the ice per team.
pub const ON_ICE_DEFENDERS: usize = 2;
pub const ON_ICE_FORWARDS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn opponent(&self) -> TeamSide {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }
}

/// Stable identifier `(team, position, index within lineup unit)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerSlotKey {
    pub team: TeamSide,
    pub position: Position,
    pub index: usize,
}

impl PlayerSlotKey {
    pub fn new(team: TeamSide, position: Position, index: usize) -> Self {
        Self { team, position, index }
    }
}

/// Renderable reference to a slot: the key plus the display name
/// resolved at emission time. Event payloads carry this so consumers
/// never need to look players up again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotRef {
    pub slot: PlayerSlotKey,
    pub name: String,
}

/// One goalie plus ordered defender and forward units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lineup {
    pub team_name: String,
    goalie: Player,
    defenders: Vec<Player>,
    forwards: Vec<Player>,
}

impl Lineup {
    pub fn new(
        team_name: impl Into<String>,
        goalie: Player,
        defenders: Vec<Player>,
        forwards: Vec<Player>,
    ) -> Result<Self> {
        if goalie.position != Position::Goalie {
            return Err(MatchError::InvalidLineup("goalie slot holds a skater".into()));
        }
        if defenders.len() < ON_ICE_DEFENDERS {
            return Err(MatchError::InvalidUnitSize {
                unit: "defender",
                expected: ON_ICE_DEFENDERS,
                found: defenders.len(),
            });
        }
        if forwards.len() < ON_ICE_FORWARDS {
            return Err(MatchError::InvalidUnitSize {
                unit: "forward",
                expected: ON_ICE_FORWARDS,
                found: forwards.len(),
            });
        }
        if let Some(p) = defenders.iter().find(|p| p.position != Position::Defender) {
            return Err(MatchError::InvalidLineup(format!(
                "{} is not a defender",
                p.name
            )));
        }
        if let Some(p) = forwards.iter().find(|p| p.position != Position::Forward) {
            return Err(MatchError::InvalidLineup(format!(
                "{} is not a forward",
                p.name
            )));
        }
        Ok(Self { team_name: team_name.into(), goalie, defenders, forwards })
    }

    pub fn goalie(&self) -> &Player {
        &self.goalie
    }

    pub fn defenders(&self) -> &[Player] {
        &self.defenders
    }

    pub fn forwards(&self) -> &[Player] {
        &self.forwards
    }

    pub fn unit_len(&self, position: Position) -> usize {
        match position {
            Position::Goalie => 1,
            Position::Defender => self.defenders.len(),
            Position::Forward => self.forwards.len(),
        }
    }

    /// Resolve a slot key against this lineup. Returns `None` for an
    /// out-of-range index; callers fall back to a synthetic default.
    pub fn player(&self, key: PlayerSlotKey) -> Option<&Player> {
        match key.position {
            Position::Goalie => (key.index == 0).then_some(&self.goalie),
            Position::Defender => self.defenders.get(key.index),
            Position::Forward => self.forwards.get(key.index),
        }
    }
}

/// Subset of a lineup currently on the ice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnIceRoster {
    pub goalie: PlayerSlotKey,
    pub defenders: Vec<PlayerSlotKey>,
    pub forwards: Vec<PlayerSlotKey>,
}

impl OnIceRoster {
    /// Seed the opening roster from role tags: the first available
    /// C/LW/RW forwards and LD/RD defenders, topped up in lineup order
    /// when a role is missing.
    pub fn initial(team: TeamSide, lineup: &Lineup) -> Self {
        let forwards = pick_by_roles(
            team,
            Position::Forward,
            lineup.forwards(),
            &[Role::C, Role::LW, Role::RW],
            ON_ICE_FORWARDS,
        );
        let defenders = pick_by_roles(
            team,
            Position::Defender,
            lineup.defenders(),
            &[Role::LD, Role::RD],
            ON_ICE_DEFENDERS,
        );

        Self {
            goalie: PlayerSlotKey::new(team, Position::Goalie, 0),
            defenders,
            forwards,
        }
    }

    pub fn contains(&self, key: PlayerSlotKey) -> bool {
        self.goalie == key || self.defenders.contains(&key) || self.forwards.contains(&key)
    }

    /// Every slot currently on the ice, goalie first.
    pub fn all_slots(&self) -> impl Iterator<Item = PlayerSlotKey> + '_ {
        std::iter::once(self.goalie)
            .chain(self.defenders.iter().copied())
            .chain(self.forwards.iter().copied())
    }

    pub fn unit(&self, position: Position) -> &[PlayerSlotKey] {
        match position {
            Position::Goalie => std::slice::from_ref(&self.goalie),
            Position::Defender => &self.defenders,
            Position::Forward => &self.forwards,
        }
    }
}

fn pick_by_roles(
    team: TeamSide,
    position: Position,
    unit: &[Player],
    roles: &[Role],
    limit: usize,
) -> Vec<PlayerSlotKey> {
    let mut picked: Vec<usize> = Vec::with_capacity(limit);

    for role in roles {
        if let Some(idx) = unit
            .iter()
            .enumerate()
            .position(|(i, p)| p.role == *role && !picked.contains(&i))
        {
            picked.push(idx);
        }
    }

    // Top up in lineup order when role tags did not fill the unit.
    for idx in 0..unit.len() {
        if picked.len() >= limit {
            break;
        }
        if !picked.contains(&idx) {
            picked.push(idx);
        }
    }

    picked.truncate(limit);
    picked
        .into_iter()
        .map(|idx| PlayerSlotKey::new(team, position, idx))
        .collect()
}
