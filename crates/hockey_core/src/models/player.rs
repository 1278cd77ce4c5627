//! Player data for the match engine.
//!
//! Players are immutable for the duration of a match: accumulated
//! statistics and ice time live in per-slot records keyed by
//! [`crate::models::PlayerSlotKey`], never on the player itself.

use serde::{Deserialize, Serialize};

/// Fallback value used when a player or attribute cannot be resolved.
/// Resolvers must keep working against a synthetic depth player instead
/// of failing the phase.
pub const DEFAULT_ATTRIBUTE: u8 = 70;

/// Broad position category. The unit a player belongs to inside a
/// lineup, and the grouping used by line changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Goalie,
    Defender,
    Forward,
}

impl Position {
    pub fn is_skater(&self) -> bool {
        !matches!(self, Position::Goalie)
    }
}

/// Assigned role letter within the lineup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    C,
    LW,
    RW,
    LD,
    RD,
    G,
}

impl Role {
    pub fn position(&self) -> Position {
        match self {
            Role::C | Role::LW | Role::RW => Position::Forward,
            Role::LD | Role::RD => Position::Defender,
            Role::G => Position::Goalie,
        }
    }
}

/// Attribute map on a 0-100 scale.
///
/// Skater attributes and goalie attributes share one struct; the
/// resolver formulas pick the fields they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAttributes {
    pub speed: u8,
    pub strength: u8,
    pub shooting: u8,
    pub puck_control: u8,
    pub stealing: u8,
    pub checking: u8,
    pub agility: u8,
    pub technique: u8,
    pub defense: u8,
    pub reflexes: u8,
    pub positioning: u8,
    pub glove: u8,
    pub blocker: u8,
}

impl Default for PlayerAttributes {
    fn default() -> Self {
        Self::uniform(DEFAULT_ATTRIBUTE)
    }
}

impl PlayerAttributes {
    /// All attributes set to the same value.
    pub fn uniform(value: u8) -> Self {
        Self {
            speed: value,
            strength: value,
            shooting: value,
            puck_control: value,
            stealing: value,
            checking: value,
            agility: value,
            technique: value,
            defense: value,
            reflexes: value,
            positioning: value,
            glove: value,
            blocker: value,
        }
    }

    fn skater_overall(&self) -> u8 {
        let sum = self.speed as u32
            + self.strength as u32
            + self.shooting as u32
            + self.puck_control as u32
            + self.stealing as u32
            + self.checking as u32
            + self.agility as u32
            + self.technique as u32
            + self.defense as u32;
        (sum / 9) as u8
    }

    fn goalie_overall(&self) -> u8 {
        let sum = self.reflexes as u32
            + self.positioning as u32
            + self.glove as u32
            + self.blocker as u32
            + self.speed as u32;
        (sum / 5) as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub jersey_number: u8,
    pub position: Position,
    pub role: Role,
    pub attributes: PlayerAttributes,
    #[serde(default)]
    pub is_user_controlled: bool,
}

impl Player {
    pub fn new(name: impl Into<String>, jersey_number: u8, role: Role) -> Self {
        Self {
            name: name.into(),
            jersey_number,
            position: role.position(),
            role,
            attributes: PlayerAttributes::default(),
            is_user_controlled: false,
        }
    }

    pub fn with_attributes(mut self, attributes: PlayerAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn user_controlled(mut self) -> Self {
        self.is_user_controlled = true;
        self
    }

    /// Derived overall rating, weighted by position category.
    pub fn overall(&self) -> u8 {
        match self.position {
            Position::Goalie => self.attributes.goalie_overall(),
            _ => self.attributes.skater_overall(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_maps_to_position() {
        assert_eq!(Role::C.position(), Position::Forward);
        assert_eq!(Role::LW.position(), Position::Forward);
        assert_eq!(Role::RW.position(), Position::Forward);
        assert_eq!(Role::LD.position(), Position::Defender);
        assert_eq!(Role::RD.position(), Position::Defender);
        assert_eq!(Role::G.position(), Position::Goalie);
    }

    #[test]
    fn test_default_attributes_use_fallback_value() {
        let attrs = PlayerAttributes::default();
        assert_eq!(attrs.speed, DEFAULT_ATTRIBUTE);
        assert_eq!(attrs.blocker, DEFAULT_ATTRIBUTE);
    }

    #[test]
    fn test_overall_uniform_attributes() {
        let skater =
            Player::new("A", 9, Role::C).with_attributes(PlayerAttributes::uniform(80));
        assert_eq!(skater.overall(), 80);

        let goalie =
            Player::new("B", 30, Role::G).with_attributes(PlayerAttributes::uniform(64));
        assert_eq!(goalie.overall(), 64);
    }

    #[test]
    fn test_player_serialization_round_trip() {
        let player = Player::new("Jean Petit", 17, Role::LW)
            .with_attributes(PlayerAttributes::uniform(55))
            .user_controlled();

        let json = serde_json::to_string(&player).unwrap();
        let back: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(back, player);
        assert!(back.is_user_controlled);
    }
}
