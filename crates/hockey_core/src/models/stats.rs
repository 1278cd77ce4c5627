//! Statistic records exposed to scoreboard and box-score displays.

use serde::{Deserialize, Serialize};

use super::lineup::{PlayerSlotKey, TeamSide};

/// Monotonic counters for one team or one player slot. All counters
/// start at zero and only accumulate for the match's duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRecord {
    pub shots: u32,
    pub goals: u32,
    pub assists: u32,
    pub saves: u32,
    pub shots_against: u32,
    pub faceoffs_won: u32,
    pub faceoffs_total: u32,
    /// Tracked but not yet resolved into game effects.
    pub penalties: u32,
}

/// Per-slot box score line with the display name resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatLine {
    pub slot: PlayerSlotKey,
    pub name: String,
    pub record: StatRecord,
    pub total_ice_seconds: u32,
}

/// Final output handed to the external save collaborator when the
/// match ends. The engine itself persists nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub home_team: String,
    pub away_team: String,
    /// Home first.
    pub score: (u8, u8),
    pub home: StatRecord,
    pub away: StatRecord,
    pub players: Vec<PlayerStatLine>,
}

impl MatchSummary {
    pub fn team(&self, side: TeamSide) -> &StatRecord {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    pub fn winner(&self) -> Option<TeamSide> {
        match self.score.0.cmp(&self.score.1) {
            std::cmp::Ordering::Greater => Some(TeamSide::Home),
            std::cmp::Ordering::Less => Some(TeamSide::Away),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_record_starts_at_zero() {
        let record = StatRecord::default();
        assert_eq!(record.shots, 0);
        assert_eq!(record.faceoffs_total, 0);
        assert_eq!(record.penalties, 0);
    }

    #[test]
    fn test_summary_winner() {
        let summary = MatchSummary {
            home_team: "H".into(),
            away_team: "A".into(),
            score: (2, 3),
            home: StatRecord::default(),
            away: StatRecord::default(),
            players: vec![],
        };
        assert_eq!(summary.winner(), Some(TeamSide::Away));

        let tied = MatchSummary { score: (1, 1), ..summary };
        assert_eq!(tied.winner(), None);
    }
}
