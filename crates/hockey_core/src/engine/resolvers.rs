//! Stochastic phase resolvers.
//!
//! Pure functions over `(attributes, random draws)`: identical inputs
//! reproduce identical outcomes. All randomness flows through the
//! injected [`RandomSource`]; nothing here touches engine state.
//!
//! Draw order is part of each resolver's contract (tests script the
//! exact sequence):
//! - face-off: first contestant's roll, then second's
//! - deke: challenge kind, carrier roll, defender roll
//! - puck battle ("lucky" path): attacker roll, then defender roll
//! - shot: attacker roll, goalie roll, then (on a save) the save type

use super::rng::RandomSource;
use crate::models::{BattleOutcome, DekeChallenge, FaceoffKind, PlayerAttributes, SaveType};

/// Weighted save-type split on non-goal shots.
const SAVE_COVER_WEIGHT: f64 = 0.4;
const SAVE_CORNER_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceoffResolution {
    /// True when the first contestant won. Ties break to the first
    /// operand.
    pub first_won: bool,
    pub first_roll: f64,
    pub second_roll: f64,
}

/// Face-off strength depends on the spot: opening and center draws
/// reward puck-handling, offensive-zone draws reward raw pace.
fn faceoff_strength(kind: FaceoffKind, attrs: &PlayerAttributes) -> f64 {
    match kind {
        FaceoffKind::Opening | FaceoffKind::Center => {
            (attrs.stealing as u32 + attrs.puck_control as u32 + attrs.strength as u32) as f64
        }
        FaceoffKind::OffensiveZone => (attrs.strength as u32 + attrs.speed as u32) as f64,
    }
}

pub fn resolve_faceoff(
    kind: FaceoffKind,
    first: &PlayerAttributes,
    second: &PlayerAttributes,
    rng: &mut dyn RandomSource,
) -> FaceoffResolution {
    let first_roll = faceoff_strength(kind, first) * rng.uniform(0.8, 1.2);
    let second_roll = faceoff_strength(kind, second) * rng.uniform(0.8, 1.2);
    FaceoffResolution { first_won: first_roll >= second_roll, first_roll, second_roll }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DekeResolution {
    pub challenge: DekeChallenge,
    pub carrier_total: f64,
    pub defender_total: f64,
    /// Success only when the carrier's total strictly exceeds the
    /// defender's.
    pub success: bool,
}

const DEKE_CHALLENGES: [DekeChallenge; 4] = [
    DekeChallenge::Speed,
    DekeChallenge::PuckControl,
    DekeChallenge::Agility,
    DekeChallenge::Technique,
];

fn deke_stats(
    challenge: DekeChallenge,
    carrier: &PlayerAttributes,
    defender: &PlayerAttributes,
) -> (f64, f64) {
    match challenge {
        DekeChallenge::Speed => (carrier.speed as f64, defender.speed as f64),
        DekeChallenge::PuckControl => (carrier.puck_control as f64, defender.stealing as f64),
        DekeChallenge::Agility => (carrier.agility as f64, defender.agility as f64),
        DekeChallenge::Technique => (carrier.technique as f64, defender.defense as f64),
    }
}

pub fn resolve_deke(
    carrier: &PlayerAttributes,
    defender: &PlayerAttributes,
    rng: &mut dyn RandomSource,
) -> DekeResolution {
    let challenge = DEKE_CHALLENGES[rng.index(DEKE_CHALLENGES.len())];
    let (carrier_stat, defender_stat) = deke_stats(challenge, carrier, defender);
    let carrier_total = carrier_stat + rng.uniform(0.0, 100.0);
    let defender_total = defender_stat + rng.uniform(0.0, 100.0);
    DekeResolution {
        challenge,
        carrier_total,
        defender_total,
        success: carrier_total > defender_total,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BattleResolution {
    pub outcome: BattleOutcome,
    pub attacker_won: bool,
    pub attacker_roll: f64,
    pub defender_roll: f64,
}

/// Corner battle. A speed gap of 10+ points decides outright; close
/// matchups come down to speed-weighted rolls.
pub fn resolve_puck_battle(
    attacker: &PlayerAttributes,
    defender: &PlayerAttributes,
    rng: &mut dyn RandomSource,
) -> BattleResolution {
    let attacker_speed = attacker.speed as f64;
    let defender_speed = defender.speed as f64;

    if (attacker_speed - defender_speed).abs() >= 10.0 {
        return BattleResolution {
            outcome: BattleOutcome::Clear,
            attacker_won: attacker_speed > defender_speed,
            attacker_roll: attacker_speed,
            defender_roll: defender_speed,
        };
    }

    let attacker_roll = rng.uniform(0.0, attacker_speed);
    let defender_roll = rng.uniform(0.0, defender_speed);
    BattleResolution {
        outcome: BattleOutcome::Lucky,
        attacker_won: attacker_roll >= defender_roll,
        attacker_roll,
        defender_roll,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotResolution {
    pub attack_roll: f64,
    pub goalie_roll: f64,
    pub goal: bool,
    pub save_type: Option<SaveType>,
}

pub fn resolve_shot(
    shooter: &PlayerAttributes,
    goalie: &PlayerAttributes,
    rng: &mut dyn RandomSource,
) -> ShotResolution {
    let attack_power = (shooter.shooting as u32 + shooter.strength as u32) as f64;
    let goalie_power = (goalie.reflexes as u32 + goalie.positioning as u32) as f64
        + (goalie.glove as u32 + goalie.blocker as u32) as f64 / 2.0;

    let attack_roll = rng.uniform(0.0, attack_power);
    let goalie_roll = rng.uniform(0.0, goalie_power);
    let goal = attack_roll > goalie_roll;

    let save_type = if goal {
        None
    } else {
        let draw = rng.next_f64();
        Some(if draw < SAVE_COVER_WEIGHT {
            SaveType::Cover
        } else if draw < SAVE_COVER_WEIGHT + SAVE_CORNER_WEIGHT {
            SaveType::Corner
        } else {
            SaveType::Rebound
        })
    };

    ShotResolution { attack_roll, goalie_roll, goal, save_type }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::ScriptedRng;

    fn attrs(value: u8) -> PlayerAttributes {
        PlayerAttributes::uniform(value)
    }

    #[test]
    fn test_faceoff_strength_formulas() {
        let mut a = attrs(0);
        a.stealing = 10;
        a.puck_control = 20;
        a.strength = 30;
        a.speed = 40;

        assert_eq!(faceoff_strength(FaceoffKind::Opening, &a), 60.0);
        assert_eq!(faceoff_strength(FaceoffKind::Center, &a), 60.0);
        assert_eq!(faceoff_strength(FaceoffKind::OffensiveZone, &a), 70.0);
    }

    #[test]
    fn test_faceoff_tie_goes_to_first_operand() {
        // Equal strengths, equal multipliers: identical rolls.
        let mut rng = ScriptedRng::new([0.5, 0.5]);
        let resolution = resolve_faceoff(FaceoffKind::Opening, &attrs(60), &attrs(60), &mut rng);
        assert_eq!(resolution.first_roll, resolution.second_roll);
        assert!(resolution.first_won);
    }

    #[test]
    fn test_faceoff_higher_roll_wins() {
        // First draws the 0.8 end, second the 1.2 end.
        let mut rng = ScriptedRng::new([0.0, 1.0 - f64::EPSILON]);
        let resolution = resolve_faceoff(FaceoffKind::Center, &attrs(60), &attrs(60), &mut rng);
        assert!(!resolution.first_won);
        assert!(resolution.second_roll > resolution.first_roll);
    }

    #[test]
    fn test_faceoff_pure_given_same_draws() {
        let first = attrs(72);
        let second = attrs(65);
        let a = resolve_faceoff(
            FaceoffKind::OffensiveZone,
            &first,
            &second,
            &mut ScriptedRng::new([0.3, 0.8]),
        );
        let b = resolve_faceoff(
            FaceoffKind::OffensiveZone,
            &first,
            &second,
            &mut ScriptedRng::new([0.3, 0.8]),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_deke_challenge_selection_and_totals() {
        let mut carrier = attrs(0);
        carrier.puck_control = 80;
        let mut defender = attrs(0);
        defender.stealing = 40;

        // Draws: challenge index 1 (PuckControl), carrier 0.5, defender 0.5.
        let mut rng = ScriptedRng::new([0.25, 0.5, 0.5]);
        let resolution = resolve_deke(&carrier, &defender, &mut rng);
        assert_eq!(resolution.challenge, DekeChallenge::PuckControl);
        assert_eq!(resolution.carrier_total, 130.0);
        assert_eq!(resolution.defender_total, 90.0);
        assert!(resolution.success);
    }

    #[test]
    fn test_deke_equal_totals_fail() {
        // Same stat, same draw: not strictly greater, so the deke fails.
        let mut rng = ScriptedRng::new([0.0, 0.5, 0.5]);
        let resolution = resolve_deke(&attrs(50), &attrs(50), &mut rng);
        assert_eq!(resolution.carrier_total, resolution.defender_total);
        assert!(!resolution.success);
    }

    #[test]
    fn test_puck_battle_clear_outcome() {
        let mut fast = attrs(50);
        fast.speed = 90;
        let mut slow = attrs(50);
        slow.speed = 60;

        // No draws consumed on the deterministic path.
        let mut rng = ScriptedRng::new([]);
        let resolution = resolve_puck_battle(&fast, &slow, &mut rng);
        assert_eq!(resolution.outcome, BattleOutcome::Clear);
        assert!(resolution.attacker_won);

        let resolution = resolve_puck_battle(&slow, &fast, &mut rng);
        assert_eq!(resolution.outcome, BattleOutcome::Clear);
        assert!(!resolution.attacker_won);
    }

    #[test]
    fn test_puck_battle_lucky_outcome_scenario() {
        // Attacker speed 9 vs defender speed 4 (gap below 10), attacker
        // draws 0.9 of max, defender 0.1 of max: attacker wins lucky.
        let mut attacker = attrs(50);
        attacker.speed = 9;
        let mut defender = attrs(50);
        defender.speed = 4;

        let mut rng = ScriptedRng::new([0.9, 0.1]);
        let resolution = resolve_puck_battle(&attacker, &defender, &mut rng);
        assert_eq!(resolution.outcome, BattleOutcome::Lucky);
        assert!(resolution.attacker_won);
        assert!((resolution.attacker_roll - 8.1).abs() < 1e-9);
        assert!((resolution.defender_roll - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_shot_goal_scenario() {
        // attackPower 10 rolling 7, goaliePower 8 rolling 2: goal.
        let mut shooter = attrs(0);
        shooter.shooting = 6;
        shooter.strength = 4;
        let mut goalie = attrs(0);
        goalie.reflexes = 4;
        goalie.positioning = 2;
        goalie.glove = 2;
        goalie.blocker = 2;

        let mut rng = ScriptedRng::new([0.7, 0.25]);
        let resolution = resolve_shot(&shooter, &goalie, &mut rng);
        assert!((resolution.attack_roll - 7.0).abs() < 1e-9);
        assert!((resolution.goalie_roll - 2.0).abs() < 1e-9);
        assert!(resolution.goal);
        assert_eq!(resolution.save_type, None);
    }

    #[test]
    fn test_shot_save_type_weights() {
        let shooter = attrs(50);
        let goalie = attrs(50);

        // Saved shot (attacker rolls low), then the save-type draw.
        let saved = |type_draw: f64| {
            let mut rng = ScriptedRng::new([0.0, 0.9, type_draw]);
            resolve_shot(&shooter, &goalie, &mut rng)
        };

        assert_eq!(saved(0.0).save_type, Some(SaveType::Cover));
        assert_eq!(saved(0.39).save_type, Some(SaveType::Cover));
        assert_eq!(saved(0.4).save_type, Some(SaveType::Corner));
        assert_eq!(saved(0.69).save_type, Some(SaveType::Corner));
        assert_eq!(saved(0.7).save_type, Some(SaveType::Rebound));
        assert_eq!(saved(0.99).save_type, Some(SaveType::Rebound));
    }

    #[test]
    fn test_shot_equal_rolls_is_a_save() {
        // Both powers are 100, both sides draw 0.5: equal rolls, and a
        // goal requires strictly greater, so this is a save.
        let mut shooter = attrs(0);
        shooter.shooting = 55;
        shooter.strength = 45;
        let mut goalie = attrs(0);
        goalie.reflexes = 40;
        goalie.positioning = 40;
        goalie.glove = 20;
        goalie.blocker = 20;

        let mut rng = ScriptedRng::new([0.5, 0.5, 0.0]);
        let resolution = resolve_shot(&shooter, &goalie, &mut rng);
        assert_eq!(resolution.attack_roll, resolution.goalie_roll);
        assert!(!resolution.goal);
        assert_eq!(resolution.save_type, Some(SaveType::Cover));
    }
}
