//! Live stat accumulation for teams and player slots.

use std::collections::HashMap;

use crate::models::{PlayerSlotKey, StatRecord, TeamSide};

#[derive(Debug, Clone, Default)]
pub struct StatAccumulator {
    score: (u8, u8),
    home: StatRecord,
    away: StatRecord,
    players: HashMap<PlayerSlotKey, StatRecord>,
}

impl StatAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> (u8, u8) {
        self.score
    }

    pub fn team(&self, side: TeamSide) -> &StatRecord {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    fn team_mut(&mut self, side: TeamSide) -> &mut StatRecord {
        match side {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        }
    }

    /// Per-slot record; zeroed for slots that have not appeared yet.
    pub fn player(&self, slot: PlayerSlotKey) -> StatRecord {
        self.players.get(&slot).copied().unwrap_or_default()
    }

    fn player_mut(&mut self, slot: PlayerSlotKey) -> &mut StatRecord {
        self.players.entry(slot).or_default()
    }

    pub fn player_records(&self) -> impl Iterator<Item = (PlayerSlotKey, StatRecord)> + '_ {
        self.players.iter().map(|(k, v)| (*k, *v))
    }

    /// Every face-off counts for both sides; only the winner gets the
    /// win.
    pub fn record_faceoff(
        &mut self,
        winning_team: TeamSide,
        winner: PlayerSlotKey,
        loser: PlayerSlotKey,
    ) {
        self.team_mut(winning_team).faceoffs_total += 1;
        self.team_mut(winning_team).faceoffs_won += 1;
        self.team_mut(winning_team.opponent()).faceoffs_total += 1;

        let w = self.player_mut(winner);
        w.faceoffs_total += 1;
        w.faceoffs_won += 1;
        self.player_mut(loser).faceoffs_total += 1;
    }

    /// Record a shot. The goalie's slot takes a shot against in every
    /// case and a save when the shot did not score.
    pub fn record_shot(
        &mut self,
        team: TeamSide,
        shooter: PlayerSlotKey,
        goalie: PlayerSlotKey,
        goal: bool,
        assist: Option<PlayerSlotKey>,
    ) {
        self.team_mut(team).shots += 1;
        self.player_mut(shooter).shots += 1;

        self.team_mut(team.opponent()).shots_against += 1;
        self.player_mut(goalie).shots_against += 1;

        if goal {
            match team {
                TeamSide::Home => self.score.0 = self.score.0.saturating_add(1),
                TeamSide::Away => self.score.1 = self.score.1.saturating_add(1),
            }
            self.team_mut(team).goals += 1;
            self.player_mut(shooter).goals += 1;
            if let Some(assist) = assist {
                self.team_mut(team).assists += 1;
                self.player_mut(assist).assists += 1;
            }
        } else {
            self.team_mut(team.opponent()).saves += 1;
            self.player_mut(goalie).saves += 1;
        }
    }

    pub fn record_penalty(&mut self, team: TeamSide, slot: PlayerSlotKey) {
        self.team_mut(team).penalties += 1;
        self.player_mut(slot).penalties += 1;
    }
}
