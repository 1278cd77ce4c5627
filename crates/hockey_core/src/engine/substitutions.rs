//! Line changes.
//!
//! Substitutions happen only at the stoppage before a face-off. A
//! skater whose current shift has reached the limit comes off for the
//! bench player with the least total ice time; the most tired skater
//! pairs with the freshest replacement. Defenders swap with defenders
//! and forwards with forwards, and the goalie never rotates.

use super::ice_time::IceTimeTracker;
use super::match_sim::MatchEngine;
use crate::models::{
    EventPayload, Lineup, OnIceRoster, PlayerSlotKey, Position, SubstitutionDetails, TeamSide,
};

/// Shift length at which a skater comes off at the next stoppage.
pub const SHIFT_LIMIT_SECONDS: u32 = 30;

/// A planned swap within one position group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LineChange {
    pub position: Position,
    pub out_slot: PlayerSlotKey,
    pub in_slot: PlayerSlotKey,
    /// Shift the outgoing skater just finished.
    pub shift_seconds: u32,
}

/// Plan the line changes for one team at a stoppage. Pure over the
/// lineup, roster and tracker; applying the swaps is the engine's job.
pub(crate) fn plan_line_changes(
    team: TeamSide,
    lineup: &Lineup,
    roster: &OnIceRoster,
    ice_time: &IceTimeTracker,
) -> Vec<LineChange> {
    let mut changes = Vec::new();

    for position in [Position::Defender, Position::Forward] {
        let mut tired: Vec<(PlayerSlotKey, u32)> = roster
            .unit(position)
            .iter()
            .copied()
            .map(|slot| (slot, ice_time.current_shift(slot)))
            .filter(|(_, shift)| *shift >= SHIFT_LIMIT_SECONDS)
            .collect();
        // Longest shift first; slot index as the deterministic tie break.
        tired.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.index.cmp(&b.0.index)));

        let mut bench: Vec<(PlayerSlotKey, u32)> = (0..lineup.unit_len(position))
            .map(|index| PlayerSlotKey::new(team, position, index))
            .filter(|slot| !roster.contains(*slot))
            .map(|slot| (slot, ice_time.total(slot)))
            .collect();
        // Least total ice time first.
        bench.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.index.cmp(&b.0.index)));

        // Pairwise up to whichever side runs out.
        for ((out_slot, shift_seconds), (in_slot, _)) in tired.into_iter().zip(bench) {
            changes.push(LineChange { position, out_slot, in_slot, shift_seconds });
        }
    }

    changes
}

impl MatchEngine {
    /// Run the line-change pass for both teams. Called at every
    /// face-off stoppage before the draw resolves.
    pub(crate) fn process_substitutions(&mut self) {
        for team in [TeamSide::Home, TeamSide::Away] {
            let changes =
                plan_line_changes(team, self.lineup(team), self.roster(team), &self.ice_time);
            for change in changes {
                self.apply_line_change(team, change);
            }
        }
    }

    fn apply_line_change(&mut self, team: TeamSide, change: LineChange) {
        let player_out = self.slot_ref(change.out_slot);
        let player_in = self.slot_ref(change.in_slot);

        {
            let roster = self.roster_mut(team);
            let unit = match change.position {
                Position::Defender => &mut roster.defenders,
                Position::Forward => &mut roster.forwards,
                Position::Goalie => return,
            };
            match unit.iter().position(|slot| *slot == change.out_slot) {
                Some(idx) => unit[idx] = change.in_slot,
                None => {
                    log::warn!("stale line change, {:?} is no longer on the ice", change.out_slot);
                    return;
                }
            }
        }

        // Only the player leaving the ice starts a fresh shift; bench
        // time never counted toward one.
        self.ice_time.reset_shift(change.out_slot);
        log::debug!(
            "{:?} line change: {} off after {}s, {} on",
            team,
            player_out.name,
            change.shift_seconds,
            player_in.name
        );
        self.emit(EventPayload::Substitution(SubstitutionDetails {
            team,
            position: change.position,
            player_out,
            player_in,
            shift_seconds: change.shift_seconds,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Player, Role};

    fn lineup() -> Lineup {
        Lineup::new(
            "Testers",
            Player::new("G", 30, Role::G),
            vec![
                Player::new("LD", 2, Role::LD),
                Player::new("RD", 3, Role::RD),
                Player::new("D3", 4, Role::LD),
            ],
            vec![
                Player::new("C", 10, Role::C),
                Player::new("LW", 11, Role::LW),
                Player::new("RW", 12, Role::RW),
                Player::new("F4", 13, Role::C),
                Player::new("F5", 14, Role::RW),
            ],
        )
        .unwrap()
    }

    fn slot(position: Position, index: usize) -> PlayerSlotKey {
        PlayerSlotKey::new(TeamSide::Home, position, index)
    }

    fn tracker_with_shifts(roster: &OnIceRoster, ticks: u32) -> IceTimeTracker {
        let mut tracker = IceTimeTracker::new();
        for _ in 0..ticks {
            tracker.record_tick(roster.all_slots());
        }
        tracker
    }

    #[test]
    fn test_no_changes_under_shift_limit() {
        let lineup = lineup();
        let roster = OnIceRoster::initial(TeamSide::Home, &lineup);
        let tracker = tracker_with_shifts(&roster, SHIFT_LIMIT_SECONDS - 1);

        let changes = plan_line_changes(TeamSide::Home, &lineup, &roster, &tracker);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_tired_skaters_swap_with_fresh_bench() {
        let lineup = lineup();
        let roster = OnIceRoster::initial(TeamSide::Home, &lineup);
        let tracker = tracker_with_shifts(&roster, 31);

        let changes = plan_line_changes(TeamSide::Home, &lineup, &roster, &tracker);

        // 2 on-ice defenders with 1 bench defender, 3 on-ice forwards
        // with 2 bench forwards: the bench caps the swap count.
        let defender_changes: Vec<_> =
            changes.iter().filter(|c| c.position == Position::Defender).collect();
        let forward_changes: Vec<_> =
            changes.iter().filter(|c| c.position == Position::Forward).collect();
        assert_eq!(defender_changes.len(), 1);
        assert_eq!(forward_changes.len(), 2);

        for change in &changes {
            assert_eq!(change.shift_seconds, 31);
            assert!(!roster.contains(change.in_slot));
            assert!(roster.contains(change.out_slot));
            assert_ne!(change.position, Position::Goalie);
        }
    }

    #[test]
    fn test_most_tired_pairs_with_freshest() {
        let lineup = lineup();
        let roster = OnIceRoster::initial(TeamSide::Home, &lineup);

        // Forwards on ice: C (idx 0), LW (idx 1), RW (idx 2). Give C a
        // 50-second shift, the others 31. Bench forward F4 (idx 3) has
        // 40 total seconds, F5 (idx 4) has 10.
        let mut tracker = tracker_with_shifts(&roster, 31);
        for _ in 0..19 {
            tracker.record_tick(std::iter::once(slot(Position::Forward, 0)));
        }
        for _ in 0..40 {
            tracker.record_tick(std::iter::once(slot(Position::Forward, 3)));
        }
        tracker.reset_shift(slot(Position::Forward, 3));
        for _ in 0..10 {
            tracker.record_tick(std::iter::once(slot(Position::Forward, 4)));
        }
        tracker.reset_shift(slot(Position::Forward, 4));

        let changes = plan_line_changes(TeamSide::Home, &lineup, &roster, &tracker);
        let forward_changes: Vec<_> =
            changes.iter().filter(|c| c.position == Position::Forward).collect();

        // C (shift 50) takes F5 (total 10); next most tired forward
        // takes F4 (total 40).
        assert_eq!(forward_changes[0].out_slot, slot(Position::Forward, 0));
        assert_eq!(forward_changes[0].in_slot, slot(Position::Forward, 4));
        assert_eq!(forward_changes[0].shift_seconds, 50);
        assert_eq!(forward_changes[1].in_slot, slot(Position::Forward, 3));
    }

    #[test]
    fn test_no_bench_means_no_changes() {
        let lineup = Lineup::new(
            "Short Bench",
            Player::new("G", 30, Role::G),
            vec![Player::new("LD", 2, Role::LD), Player::new("RD", 3, Role::RD)],
            vec![
                Player::new("C", 10, Role::C),
                Player::new("LW", 11, Role::LW),
                Player::new("RW", 12, Role::RW),
            ],
        )
        .unwrap();
        let roster = OnIceRoster::initial(TeamSide::Home, &lineup);
        let tracker = tracker_with_shifts(&roster, 500);

        let changes = plan_line_changes(TeamSide::Home, &lineup, &roster, &tracker);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_goalie_is_never_planned() {
        let lineup = lineup();
        let roster = OnIceRoster::initial(TeamSide::Home, &lineup);
        let tracker = tracker_with_shifts(&roster, 2000);

        let changes = plan_line_changes(TeamSide::Home, &lineup, &roster, &tracker);
        assert!(changes.iter().all(|c| c.position != Position::Goalie));
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_engine_applies_changes_and_resets_shift() {
        use crate::engine::rng::ScriptedRng;

        let mut engine = MatchEngine::with_rng(
            lineup(),
            lineup(),
            Box::new(ScriptedRng::new([])),
        );
        for _ in 0..31 {
            engine.accumulate_ice_time();
        }

        let before_home = engine.roster(TeamSide::Home).clone();
        engine.process_substitutions();

        let subs: Vec<_> = engine
            .events()
            .iter()
            .filter_map(|e| match &e.payload {
                EventPayload::Substitution(details) => Some(details.clone()),
                _ => None,
            })
            .collect();
        // One defender and two forwards per team.
        assert_eq!(subs.len(), 6);

        let after_home = engine.roster(TeamSide::Home);
        assert_ne!(*after_home, before_home);
        assert_eq!(after_home.goalie, before_home.goalie);
        assert_eq!(after_home.defenders.len(), before_home.defenders.len());
        assert_eq!(after_home.forwards.len(), before_home.forwards.len());

        for sub in &subs {
            // Outgoing skater starts a fresh shift; the total is
            // untouched by the reset.
            assert_eq!(engine.ice_time.current_shift(sub.player_out.slot), 0);
            assert_eq!(engine.ice_time.total(sub.player_out.slot), 31);
            assert!(engine.roster(sub.team).contains(sub.player_in.slot));
            assert!(!engine.roster(sub.team).contains(sub.player_out.slot));
        }
    }
}
