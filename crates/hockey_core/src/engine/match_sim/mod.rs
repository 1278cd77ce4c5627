//! Match engine: the timer-driven state machine that plays out a
//! hockey match.
//!
//! The engine is passive and single-threaded. An external driver
//! calls [`MatchEngine::tick`] once per simulated second at the
//! cadence recommended by [`MatchEngine::tick_interval_ms`], and
//! feeds elapsed wall time into [`MatchEngine::advance_real`] for the
//! two real-time rules (the intermission pause and the AI carrier's
//! auto-dump delay). All phase resolution runs synchronously inside
//! those calls; there is no parallel mutation of shared state.
//!
//! The only suspension point is the zone-entry decision for a
//! user-controlled carrier: the engine pauses the clock and waits for
//! [`MatchEngine::resolve_choice`]. Dropping the engine (or calling
//! [`MatchEngine::abort`]) discards every accumulator, so no partial
//! state can leak into a subsequently started match.

pub mod scheduler;

use std::collections::HashSet;

use self::scheduler::{EventKey, PendingEvent, PendingPhase};
use super::clock::{GameClock, SpeedMultiplier, TickOutcome};
use super::ice_time::IceTimeTracker;
use super::possession::PuckPossessionState;
use super::rng::{RandomSource, SeededRng};
use super::stats::StatAccumulator;
use crate::error::{MatchError, Result};
use crate::models::{
    EventPayload, FaceoffKind, Lineup, MatchEvent, MatchSummary, OnIceRoster, Player,
    PlayerAttributes, PlayerSlotKey, PlayerStatLine, Position, SlotRef, TeamSide,
    ZoneEntryChoice,
};
use serde::{Deserialize, Serialize};

/// Real-time delay before a non-user-controlled carrier auto-resolves
/// the zone entry to a dump. Costs no simulated time and does not
/// pause the clock.
pub const AUTO_DUMP_DELAY_MS: u64 = 1500;

/// A zone entry waiting for its dump/deke resolution. `auto_remaining_ms`
/// is `Some` for an AI carrier counting down real time, `None` for a
/// user-controlled carrier blocking on external input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ZoneEntryPending {
    pub team: TeamSide,
    pub carrier: PlayerSlotKey,
    pub auto_remaining_ms: Option<u64>,
}

/// Snapshot of a blocked user decision, exposed to the caller while
/// the clock is paused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingDecision {
    pub team: TeamSide,
    pub carrier: SlotRef,
}

pub struct MatchEngine {
    pub(crate) home_lineup: Lineup,
    pub(crate) away_lineup: Lineup,
    pub(crate) home_roster: OnIceRoster,
    pub(crate) away_roster: OnIceRoster,
    pub(crate) clock: GameClock,
    pub(crate) ice_time: IceTimeTracker,
    pub(crate) stats: StatAccumulator,
    pub(crate) possession: PuckPossessionState,
    pub(crate) events: Vec<MatchEvent>,
    pub(crate) pending: Option<PendingEvent>,
    pub(crate) processed: HashSet<EventKey>,
    pub(crate) next_event_id: u64,
    pub(crate) pending_entry: Option<ZoneEntryPending>,
    /// Winner of the sequence's last possession change; feeds the
    /// assist credit on a goal. Passed through payloads, never read
    /// back from display state.
    pub(crate) last_possession_winner: Option<PlayerSlotKey>,
    pub(crate) rng: Box<dyn RandomSource>,
    pub(crate) halted: bool,
    pub(crate) finished: bool,
    pub(crate) started: bool,
}

impl MatchEngine {
    /// Production constructor: ChaCha8 stream seeded per match.
    pub fn new(home_lineup: Lineup, away_lineup: Lineup, seed: u64) -> Self {
        Self::with_rng(home_lineup, away_lineup, Box::new(SeededRng::new(seed)))
    }

    /// Constructor with an injected random source, for tests and the
    /// debug harness.
    pub fn with_rng(
        home_lineup: Lineup,
        away_lineup: Lineup,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let home_roster = OnIceRoster::initial(TeamSide::Home, &home_lineup);
        let away_roster = OnIceRoster::initial(TeamSide::Away, &away_lineup);
        Self {
            home_lineup,
            away_lineup,
            home_roster,
            away_roster,
            clock: GameClock::new(),
            ice_time: IceTimeTracker::new(),
            stats: StatAccumulator::new(),
            possession: PuckPossessionState::cleared(),
            events: Vec::new(),
            pending: None,
            processed: HashSet::new(),
            next_event_id: 0,
            pending_entry: None,
            last_possession_winner: None,
            rng,
            halted: false,
            finished: false,
            started: false,
        }
    }

    /// Begin the match: emits `MatchStart` at match time 0 and arms
    /// the opening face-off for match time 1.
    pub fn start(&mut self) {
        if self.started || self.halted {
            return;
        }
        self.started = true;
        self.clock.start();
        self.emit(EventPayload::MatchStart);
        self.schedule_at(1, PendingPhase::Faceoff(FaceoffKind::Opening));
    }

    /// Advance one simulated second and resolve any phase whose
    /// scheduled time has arrived.
    pub fn tick(&mut self) {
        if self.finished || self.halted {
            return;
        }
        match self.clock.tick() {
            TickOutcome::Idle => {}
            TickOutcome::Advanced => {
                self.accumulate_ice_time();
                self.run_due_events();
            }
            TickOutcome::PeriodExpired => {
                self.accumulate_ice_time();
                self.handle_period_end();
            }
        }
    }

    /// Feed elapsed real time into the real-time rules: the AI
    /// carrier's auto-dump countdown and the intermission.
    pub fn advance_real(&mut self, elapsed_ms: u64) {
        if self.finished || self.halted {
            return;
        }

        let auto_fired = match self.pending_entry.as_mut() {
            Some(entry) => match entry.auto_remaining_ms {
                Some(remaining) if elapsed_ms >= remaining => {
                    entry.auto_remaining_ms = None;
                    true
                }
                Some(remaining) => {
                    entry.auto_remaining_ms = Some(remaining - elapsed_ms);
                    false
                }
                None => false,
            },
            None => false,
        };
        if auto_fired {
            self.apply_zone_entry(ZoneEntryChoice::Dump, true);
        }

        if let Some(period) = self.clock.advance_real(elapsed_ms) {
            let at = (period as u32 - 1) * super::clock::PERIOD_SECONDS + 1;
            self.schedule_at(at, PendingPhase::Faceoff(FaceoffKind::Opening));
            // The clock resumes one second into the period, so the
            // opening face-off is already due.
            self.run_due_events();
        }
    }

    /// Supply the blocked zone-entry decision and resume the clock.
    pub fn resolve_choice(&mut self, choice: ZoneEntryChoice) -> Result<()> {
        if self.finished {
            return Err(MatchError::MatchFinished);
        }
        match self.pending_entry {
            Some(entry) if entry.auto_remaining_ms.is_none() => {
                self.clock.resume();
                self.apply_zone_entry(choice, false);
                Ok(())
            }
            _ => Err(MatchError::NoPendingDecision),
        }
    }

    /// Cancel the match: clears the in-flight event and any blocked
    /// decision and stops all further scheduling. Dropping the engine
    /// afterwards discards every accumulator.
    pub fn abort(&mut self) {
        self.pending = None;
        self.pending_entry = None;
        self.clock.pause();
        self.halted = true;
    }

    pub fn cycle_speed(&mut self) {
        self.clock.cycle_speed();
    }

    pub fn speed(&self) -> SpeedMultiplier {
        self.clock.speed()
    }

    /// Recommended real interval between `tick()` calls.
    pub fn tick_interval_ms(&self) -> u64 {
        self.clock.tick_interval_ms()
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn possession(&self) -> &PuckPossessionState {
        &self.possession
    }

    pub fn stats(&self) -> &StatAccumulator {
        &self.stats
    }

    pub fn score(&self) -> (u8, u8) {
        self.stats.score()
    }

    /// Chronological append-only event feed.
    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    /// The event feed as a JSON array, for engine-agnostic consumers.
    pub fn events_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.events)?)
    }

    pub fn summary_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.summary())?)
    }

    pub fn roster(&self, team: TeamSide) -> &OnIceRoster {
        match team {
            TeamSide::Home => &self.home_roster,
            TeamSide::Away => &self.away_roster,
        }
    }

    pub fn lineup(&self, team: TeamSide) -> &Lineup {
        match team {
            TeamSide::Home => &self.home_lineup,
            TeamSide::Away => &self.away_lineup,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// The blocked user decision, if the engine is suspended on one.
    pub fn pending_decision(&self) -> Option<PendingDecision> {
        let entry = self.pending_entry.as_ref()?;
        if entry.auto_remaining_ms.is_some() {
            return None;
        }
        Some(PendingDecision { team: entry.team, carrier: self.slot_ref(entry.carrier) })
    }

    /// Final output for the external save collaborator. Valid at any
    /// time; authoritative once `is_finished()` returns true.
    pub fn summary(&self) -> MatchSummary {
        let mut players = Vec::new();
        for team in [TeamSide::Home, TeamSide::Away] {
            let lineup = self.lineup(team);
            let mut push = |position: Position, index: usize, player: &Player| {
                let slot = PlayerSlotKey::new(team, position, index);
                players.push(PlayerStatLine {
                    slot,
                    name: player.name.clone(),
                    record: self.stats.player(slot),
                    total_ice_seconds: self.ice_time.total(slot),
                });
            };
            push(Position::Goalie, 0, lineup.goalie());
            for (index, player) in lineup.defenders().iter().enumerate() {
                push(Position::Defender, index, player);
            }
            for (index, player) in lineup.forwards().iter().enumerate() {
                push(Position::Forward, index, player);
            }
        }

        MatchSummary {
            home_team: self.home_lineup.team_name.clone(),
            away_team: self.away_lineup.team_name.clone(),
            score: self.stats.score(),
            home: *self.stats.team(TeamSide::Home),
            away: *self.stats.team(TeamSide::Away),
            players,
        }
    }

    // ------------------------------------------------------------------
    // Internal helpers shared by the scheduler and the line-change pass
    // ------------------------------------------------------------------

    pub(crate) fn roster_mut(&mut self, team: TeamSide) -> &mut OnIceRoster {
        match team {
            TeamSide::Home => &mut self.home_roster,
            TeamSide::Away => &mut self.away_roster,
        }
    }

    pub(crate) fn accumulate_ice_time(&mut self) {
        let slots: Vec<PlayerSlotKey> = self
            .home_roster
            .all_slots()
            .chain(self.away_roster.all_slots())
            .collect();
        self.ice_time.record_tick(slots.into_iter());
    }

    /// Attributes for a slot, tolerating missing players via the
    /// synthetic default.
    pub(crate) fn attrs(&self, slot: PlayerSlotKey) -> PlayerAttributes {
        self.lineup(slot.team)
            .player(slot)
            .map(|p| p.attributes)
            .unwrap_or_default()
    }

    pub(crate) fn slot_ref(&self, slot: PlayerSlotKey) -> SlotRef {
        let name = self
            .lineup(slot.team)
            .player(slot)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "Depth Player".to_string());
        SlotRef { slot, name }
    }

    pub(crate) fn is_user_controlled(&self, slot: PlayerSlotKey) -> bool {
        self.lineup(slot.team)
            .player(slot)
            .map(|p| p.is_user_controlled)
            .unwrap_or(false)
    }

    pub(crate) fn next_id(&mut self) -> u64 {
        let id = self.next_event_id;
        self.next_event_id += 1;
        id
    }

    pub(crate) fn emit(&mut self, payload: EventPayload) {
        let event = MatchEvent {
            id: self.next_id(),
            match_time: self.clock.match_time(),
            period: self.clock.period(),
            payload,
        };
        log::debug!("event #{} at {}s: {:?}", event.id, event.match_time, event.payload);
        self.events.push(event);
    }
}
