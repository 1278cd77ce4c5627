//! Match event feed types.
//!
//! The engine emits one [`MatchEvent`] per resolved phase, in
//! chronological order, into an append-only feed. Every event carries
//! a globally unique id and a self-contained renderable payload:
//! consumers never read resolution details from anywhere else.

use serde::{Deserialize, Serialize};

use super::lineup::{SlotRef, TeamSide};
use super::player::Position;

/// Save classification, drawn with fixed weights on every non-goal
/// shot (cover 40%, corner 30%, rebound 30%). The type decides the
/// follow-up phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveType {
    Cover,
    Corner,
    Rebound,
}

/// How a puck battle was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    /// Speed gap of 10+ points: the faster skater wins outright.
    Clear,
    /// Close speeds: decided by weighted rolls.
    Lucky,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceoffKind {
    Opening,
    Center,
    OffensiveZone,
}

/// Deke challenge matchup, drawn uniformly per attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DekeChallenge {
    Speed,
    PuckControl,
    Agility,
    Technique,
}

/// The two options presented when entering the offensive zone with
/// the puck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneEntryChoice {
    Dump,
    Deke,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub id: u64,
    /// Seconds since the opening puck drop (0..=3600).
    pub match_time: u32,
    pub period: u8,
    #[serde(flatten)]
    pub payload: EventPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum EventPayload {
    MatchStart,
    Faceoff(FaceoffDetails),
    ZoneEntry(ZoneEntryDetails),
    PuckBattle(PuckBattleDetails),
    Shot(ShotDetails),
    Substitution(SubstitutionDetails),
    PeriodEnd { period: u8 },
    MatchEnd { score: (u8, u8) },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceoffDetails {
    pub kind: FaceoffKind,
    pub winning_team: TeamSide,
    pub winner: SlotRef,
    pub loser: SlotRef,
    pub winner_roll: f64,
    pub loser_roll: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneEntryDetails {
    pub team: TeamSide,
    pub carrier: SlotRef,
    pub choice: ZoneEntryChoice,
    /// True when the carrier was not user-controlled and the entry
    /// auto-resolved to a dump.
    pub auto: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deke: Option<DekeDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DekeDetails {
    pub challenge: DekeChallenge,
    pub defender: SlotRef,
    pub carrier_total: f64,
    pub defender_total: f64,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuckBattleDetails {
    pub attacking_team: TeamSide,
    pub attacker: SlotRef,
    pub defender: SlotRef,
    pub outcome: BattleOutcome,
    pub attacker_won: bool,
    pub attacker_roll: f64,
    pub defender_roll: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotDetails {
    pub team: TeamSide,
    pub shooter: SlotRef,
    pub goalie: SlotRef,
    pub attack_roll: f64,
    pub goalie_roll: f64,
    pub goal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_type: Option<SaveType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assist: Option<SlotRef>,
    /// Score after this shot, home first.
    pub score: (u8, u8),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionDetails {
    pub team: TeamSide,
    pub position: Position,
    pub player_out: SlotRef,
    pub player_in: SlotRef,
    /// Length of the shift the outgoing player just finished.
    pub shift_seconds: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerSlotKey;

    fn slot_ref(name: &str) -> SlotRef {
        SlotRef {
            slot: PlayerSlotKey::new(TeamSide::Home, Position::Forward, 0),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_event_payload_tagging() {
        let event = MatchEvent {
            id: 7,
            match_time: 61,
            period: 1,
            payload: EventPayload::Faceoff(FaceoffDetails {
                kind: FaceoffKind::Opening,
                winning_team: TeamSide::Home,
                winner: slot_ref("A"),
                loser: slot_ref("B"),
                winner_roll: 210.0,
                loser_roll: 180.0,
            }),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["phase"], "faceoff");
        assert_eq!(json["kind"], "opening");
        assert_eq!(json["match_time"], 61);

        let back: MatchEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_shot_payload_optional_fields_omitted() {
        let event = MatchEvent {
            id: 1,
            match_time: 100,
            period: 1,
            payload: EventPayload::Shot(ShotDetails {
                team: TeamSide::Away,
                shooter: slot_ref("S"),
                goalie: slot_ref("G"),
                attack_roll: 90.0,
                goalie_roll: 120.0,
                goal: false,
                save_type: Some(SaveType::Cover),
                assist: None,
                score: (0, 0),
            }),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"save_type\":\"cover\""));
        assert!(!json.contains("assist"));
    }

    #[test]
    fn test_match_end_round_trip() {
        let event = MatchEvent {
            id: 99,
            match_time: 3600,
            period: 3,
            payload: EventPayload::MatchEnd { score: (3, 2) },
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: MatchEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
