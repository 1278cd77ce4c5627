//! Phase scheduling and transitions.
//!
//! The engine keeps at most one scheduled phase in flight. Each
//! resolved phase schedules exactly one successor at `now + delay`
//! (delay 0 fires within the same tick), so the match is a single
//! chain of phases from the opening face-off to the final horn.
//! Dispatch triggers on `match_time >= scheduled`, never on equality,
//! and a processed-id set drops any duplicate so no phase resolves
//! twice.

use super::MatchEngine;
use crate::engine::possession::{PuckPossessionState, Zone};
use crate::engine::resolvers::{
    resolve_deke, resolve_faceoff, resolve_puck_battle, resolve_shot,
};
use crate::models::{
    DekeDetails, EventPayload, FaceoffDetails, FaceoffKind, PlayerSlotKey, PuckBattleDetails,
    Role, SaveType, ShotDetails, TeamSide, ZoneEntryChoice, ZoneEntryDetails,
};

use super::ZoneEntryPending;

// Simulated-second delays between a resolved phase and its successor.
const FACEOFF_ENTRY_DELAY_MIN_S: u32 = 3;
const FACEOFF_ENTRY_DELAY_SPAN_S: usize = 8; // uniform 3..=10
const DUMP_BATTLE_DELAY_S: u32 = 4;
const DEKE_SHOT_DELAY_S: u32 = 2;
const TURNOVER_ENTRY_DELAY_S: u32 = 3;
const GOAL_FACEOFF_DELAY_S: u32 = 1;
const SAVE_FACEOFF_DELAY_S: u32 = 3;
const CORNER_BATTLE_DELAY_S: u32 = 4;

/// The single scheduled phase waiting for its match time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingEvent {
    pub id: u64,
    /// Match time at which the phase becomes due.
    pub scheduled: u32,
    pub phase: PendingPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PendingPhase {
    /// Center-ice face-off: opening or after a goal.
    Faceoff(FaceoffKind),
    NeutralZoneEntry { team: TeamSide },
    PuckBattle { attacking_team: TeamSide },
    Shot { attacking_team: TeamSide },
    OffensiveZoneFaceoff { attacking_team: TeamSide },
}

/// Idempotency key for everything the engine resolves at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum EventKey {
    Scheduled(u64),
    PeriodEnd(u8),
    MatchEnd,
}

impl MatchEngine {
    pub(crate) fn schedule(&mut self, delay: u32, phase: PendingPhase) {
        let at = self.clock.match_time().saturating_add(delay);
        self.schedule_at(at, phase);
    }

    /// Arm the next phase. Scheduling over an unresolved phase means
    /// the transition chain forked, which the state machine cannot
    /// recover from; the engine halts rather than corrupt the feed.
    pub(crate) fn schedule_at(&mut self, at: u32, phase: PendingPhase) {
        if self.halted || self.finished {
            return;
        }
        if let Some(existing) = &self.pending {
            log::error!(
                "inconsistent schedule: {:?} requested while {:?} (at {}s) is still in flight; halting match",
                phase,
                existing.phase,
                existing.scheduled
            );
            self.halted = true;
            return;
        }
        let id = self.next_id();
        log::debug!("scheduled {:?} for {}s (id {})", phase, at, id);
        self.pending = Some(PendingEvent { id, scheduled: at, phase });
    }

    /// Resolve every due phase. Loops because a resolution may
    /// schedule a successor with delay 0 (a won offensive-zone
    /// face-off turns into a shot within the same second).
    pub(crate) fn run_due_events(&mut self) {
        loop {
            if self.halted || self.finished || self.pending_entry.is_some() {
                return;
            }
            let now = self.clock.match_time();
            let event = match self.pending.take() {
                Some(event) if now >= event.scheduled => event,
                other => {
                    self.pending = other;
                    return;
                }
            };
            if !self.processed.insert(EventKey::Scheduled(event.id)) {
                log::warn!("phase id {} already resolved, dropping duplicate", event.id);
                continue;
            }
            self.dispatch(event.phase);
        }
    }

    /// Period horn: drop whatever was in flight, emit the period end
    /// once, and close the match after the third period.
    pub(crate) fn handle_period_end(&mut self) {
        let period = self.clock.period();
        self.pending = None;
        self.pending_entry = None;
        self.possession = PuckPossessionState::cleared();
        self.last_possession_winner = None;

        if self.processed.insert(EventKey::PeriodEnd(period)) {
            self.emit(EventPayload::PeriodEnd { period });
        }
        if self.clock.is_match_over() && self.processed.insert(EventKey::MatchEnd) {
            self.emit(EventPayload::MatchEnd { score: self.stats.score() });
            self.finished = true;
            log::info!(
                "match over: {} {} - {} {}",
                self.home_lineup.team_name,
                self.stats.score().0,
                self.stats.score().1,
                self.away_lineup.team_name
            );
        }
    }

    fn dispatch(&mut self, phase: PendingPhase) {
        match phase {
            PendingPhase::Faceoff(kind) => self.run_center_ice_faceoff(kind),
            PendingPhase::NeutralZoneEntry { team } => self.run_zone_entry(team),
            PendingPhase::PuckBattle { attacking_team } => self.run_puck_battle(attacking_team),
            PendingPhase::Shot { attacking_team } => self.run_shot(attacking_team),
            PendingPhase::OffensiveZoneFaceoff { attacking_team } => {
                self.run_offensive_zone_faceoff(attacking_team)
            }
        }
    }

    // ------------------------------------------------------------------
    // Phase handlers
    // ------------------------------------------------------------------

    fn run_center_ice_faceoff(&mut self, kind: FaceoffKind) {
        self.process_substitutions();

        let home = self.pick_center(TeamSide::Home);
        let away = self.pick_center(TeamSide::Away);
        let home_attrs = self.attrs(home);
        let away_attrs = self.attrs(away);
        let resolution = resolve_faceoff(kind, &home_attrs, &away_attrs, self.rng.as_mut());

        let (winner, loser, winning_team, winner_roll, loser_roll) = if resolution.first_won {
            (home, away, TeamSide::Home, resolution.first_roll, resolution.second_roll)
        } else {
            (away, home, TeamSide::Away, resolution.second_roll, resolution.first_roll)
        };

        self.stats.record_faceoff(winning_team, winner, loser);
        self.last_possession_winner = Some(winner);
        self.possession = PuckPossessionState::held(winning_team, Zone::Neutral);
        self.emit(EventPayload::Faceoff(FaceoffDetails {
            kind,
            winning_team,
            winner: self.slot_ref(winner),
            loser: self.slot_ref(loser),
            winner_roll,
            loser_roll,
        }));

        let delay = FACEOFF_ENTRY_DELAY_MIN_S + self.rng.index(FACEOFF_ENTRY_DELAY_SPAN_S) as u32;
        self.schedule(delay, PendingPhase::NeutralZoneEntry { team: winning_team });
    }

    /// The winning side carries the puck to the offensive blue line.
    /// A user-controlled carrier pauses the clock and waits for the
    /// dump/deke decision; an AI carrier dumps after a short real-time
    /// delay.
    fn run_zone_entry(&mut self, team: TeamSide) {
        let carrier = self.pick_on_ice_forward(team);
        self.possession = PuckPossessionState::held(team, Zone::Neutral);

        if self.is_user_controlled(carrier) {
            self.clock.pause();
            self.pending_entry = Some(ZoneEntryPending { team, carrier, auto_remaining_ms: None });
            log::debug!("clock paused: zone-entry decision for {:?}", carrier);
        } else {
            self.pending_entry = Some(ZoneEntryPending {
                team,
                carrier,
                auto_remaining_ms: Some(super::AUTO_DUMP_DELAY_MS),
            });
        }
    }

    /// Resolve the dump/deke choice for the pending zone entry,
    /// whether supplied by the user or by the auto-dump countdown.
    pub(crate) fn apply_zone_entry(&mut self, choice: ZoneEntryChoice, auto: bool) {
        let entry = match self.pending_entry.take() {
            Some(entry) => entry,
            None => return,
        };
        let team = entry.team;
        let carrier = entry.carrier;

        match choice {
            ZoneEntryChoice::Dump => {
                self.possession = PuckPossessionState::loose(Zone::Offensive(team));
                self.emit(EventPayload::ZoneEntry(ZoneEntryDetails {
                    team,
                    carrier: self.slot_ref(carrier),
                    choice,
                    auto,
                    deke: None,
                }));
                self.schedule(DUMP_BATTLE_DELAY_S, PendingPhase::PuckBattle { attacking_team: team });
            }
            ZoneEntryChoice::Deke => {
                let defender = self.pick_on_ice_defender(team.opponent());
                let carrier_attrs = self.attrs(carrier);
                let defender_attrs = self.attrs(defender);
                let resolution =
                    resolve_deke(&carrier_attrs, &defender_attrs, self.rng.as_mut());

                self.emit(EventPayload::ZoneEntry(ZoneEntryDetails {
                    team,
                    carrier: self.slot_ref(carrier),
                    choice,
                    auto,
                    deke: Some(DekeDetails {
                        challenge: resolution.challenge,
                        defender: self.slot_ref(defender),
                        carrier_total: resolution.carrier_total,
                        defender_total: resolution.defender_total,
                        success: resolution.success,
                    }),
                }));

                if resolution.success {
                    self.last_possession_winner = Some(carrier);
                    self.possession = PuckPossessionState::held(team, Zone::Offensive(team));
                    self.schedule(DEKE_SHOT_DELAY_S, PendingPhase::Shot { attacking_team: team });
                } else {
                    let opponent = team.opponent();
                    self.last_possession_winner = Some(defender);
                    self.possession = PuckPossessionState::held(opponent, Zone::Neutral);
                    self.schedule(
                        TURNOVER_ENTRY_DELAY_S,
                        PendingPhase::NeutralZoneEntry { team: opponent },
                    );
                }
            }
        }
    }

    fn run_puck_battle(&mut self, attacking_team: TeamSide) {
        let attacker = self.pick_on_ice_forward(attacking_team);
        let defender = self.pick_on_ice_defender(attacking_team.opponent());
        let attacker_attrs = self.attrs(attacker);
        let defender_attrs = self.attrs(defender);
        let resolution = resolve_puck_battle(&attacker_attrs, &defender_attrs, self.rng.as_mut());

        self.emit(EventPayload::PuckBattle(PuckBattleDetails {
            attacking_team,
            attacker: self.slot_ref(attacker),
            defender: self.slot_ref(defender),
            outcome: resolution.outcome,
            attacker_won: resolution.attacker_won,
            attacker_roll: resolution.attacker_roll,
            defender_roll: resolution.defender_roll,
        }));

        if resolution.attacker_won {
            self.last_possession_winner = Some(attacker);
            self.possession =
                PuckPossessionState::held(attacking_team, Zone::Offensive(attacking_team));
            self.schedule(DEKE_SHOT_DELAY_S, PendingPhase::Shot { attacking_team });
        } else {
            let opponent = attacking_team.opponent();
            self.last_possession_winner = Some(defender);
            self.possession = PuckPossessionState::held(opponent, Zone::Neutral);
            self.schedule(
                TURNOVER_ENTRY_DELAY_S,
                PendingPhase::NeutralZoneEntry { team: opponent },
            );
        }
    }

    fn run_shot(&mut self, attacking_team: TeamSide) {
        let shooter = self.pick_on_ice_forward(attacking_team);
        let goalie = self.roster(attacking_team.opponent()).goalie;
        let shooter_attrs = self.attrs(shooter);
        let goalie_attrs = self.attrs(goalie);
        let resolution = resolve_shot(&shooter_attrs, &goalie_attrs, self.rng.as_mut());

        let assist = if resolution.goal {
            self.last_possession_winner.filter(|slot| *slot != shooter)
        } else {
            None
        };
        self.stats
            .record_shot(attacking_team, shooter, goalie, resolution.goal, assist);

        self.emit(EventPayload::Shot(ShotDetails {
            team: attacking_team,
            shooter: self.slot_ref(shooter),
            goalie: self.slot_ref(goalie),
            attack_roll: resolution.attack_roll,
            goalie_roll: resolution.goalie_roll,
            goal: resolution.goal,
            save_type: resolution.save_type,
            assist: assist.map(|slot| self.slot_ref(slot)),
            score: self.stats.score(),
        }));

        if resolution.goal {
            self.possession = PuckPossessionState::cleared();
            self.last_possession_winner = None;
            self.schedule(GOAL_FACEOFF_DELAY_S, PendingPhase::Faceoff(FaceoffKind::Center));
            return;
        }

        match resolution.save_type {
            Some(SaveType::Corner) => {
                // Puck deflected to the boards, still live.
                self.possession = PuckPossessionState::loose(Zone::Offensive(attacking_team));
                self.schedule(CORNER_BATTLE_DELAY_S, PendingPhase::PuckBattle { attacking_team });
            }
            Some(SaveType::Cover) | Some(SaveType::Rebound) | None => {
                self.possession = PuckPossessionState::cleared();
                self.schedule(
                    SAVE_FACEOFF_DELAY_S,
                    PendingPhase::OffensiveZoneFaceoff { attacking_team },
                );
            }
        }
    }

    /// Face-off in the attacking team's offensive zone. A win turns
    /// straight into a shot in the same second; a loss hands the puck
    /// to the defending side at mid-ice.
    fn run_offensive_zone_faceoff(&mut self, attacking_team: TeamSide) {
        self.process_substitutions();

        let attacker = self.pick_on_ice_forward(attacking_team);
        let defender = self.pick_on_ice_forward(attacking_team.opponent());
        let attacker_attrs = self.attrs(attacker);
        let defender_attrs = self.attrs(defender);
        let resolution = resolve_faceoff(
            FaceoffKind::OffensiveZone,
            &attacker_attrs,
            &defender_attrs,
            self.rng.as_mut(),
        );

        if resolution.first_won {
            self.stats.record_faceoff(attacking_team, attacker, defender);
            self.last_possession_winner = Some(attacker);
            self.possession =
                PuckPossessionState::held(attacking_team, Zone::Offensive(attacking_team));
            self.emit(EventPayload::Faceoff(FaceoffDetails {
                kind: FaceoffKind::OffensiveZone,
                winning_team: attacking_team,
                winner: self.slot_ref(attacker),
                loser: self.slot_ref(defender),
                winner_roll: resolution.first_roll,
                loser_roll: resolution.second_roll,
            }));
            self.schedule(0, PendingPhase::Shot { attacking_team });
        } else {
            let opponent = attacking_team.opponent();
            self.stats.record_faceoff(opponent, defender, attacker);
            self.last_possession_winner = Some(defender);
            self.possession = PuckPossessionState::held(opponent, Zone::Neutral);
            self.emit(EventPayload::Faceoff(FaceoffDetails {
                kind: FaceoffKind::OffensiveZone,
                winning_team: opponent,
                winner: self.slot_ref(defender),
                loser: self.slot_ref(attacker),
                winner_roll: resolution.second_roll,
                loser_roll: resolution.first_roll,
            }));
            self.schedule(
                TURNOVER_ENTRY_DELAY_S,
                PendingPhase::NeutralZoneEntry { team: opponent },
            );
        }
    }

    // ------------------------------------------------------------------
    // Participant selection
    // ------------------------------------------------------------------

    /// Center for a center-ice draw: the on-ice forward tagged C, or a
    /// random on-ice forward when no center is out.
    fn pick_center(&mut self, team: TeamSide) -> PlayerSlotKey {
        let lineup = self.lineup(team);
        let center = self
            .roster(team)
            .forwards
            .iter()
            .copied()
            .find(|slot| lineup.player(*slot).map(|p| p.role == Role::C).unwrap_or(false));
        match center {
            Some(slot) => slot,
            None => self.pick_on_ice_forward(team),
        }
    }

    fn pick_on_ice_forward(&mut self, team: TeamSide) -> PlayerSlotKey {
        let forwards = self.roster(team).forwards.clone();
        if !forwards.is_empty() {
            return forwards[self.rng.index(forwards.len())];
        }
        log::warn!("no forwards on the ice for {:?}, using a defender", team);
        let defenders = self.roster(team).defenders.clone();
        if !defenders.is_empty() {
            return defenders[self.rng.index(defenders.len())];
        }
        self.roster(team).goalie
    }

    fn pick_on_ice_defender(&mut self, team: TeamSide) -> PlayerSlotKey {
        let defenders = self.roster(team).defenders.clone();
        if !defenders.is_empty() {
            return defenders[self.rng.index(defenders.len())];
        }
        log::warn!("no defenders on the ice for {:?}, using a forward", team);
        let forwards = self.roster(team).forwards.clone();
        if !forwards.is_empty() {
            return forwards[self.rng.index(forwards.len())];
        }
        self.roster(team).goalie
    }
}
