//! Built-in demo teams for the CLI runner, examples and quick
//! experiments. Two balanced squads with enough bench depth to
//! exercise line changes.

use crate::models::{Lineup, Player, PlayerAttributes, Role};

fn skater(name: &str, number: u8, role: Role, base: u8) -> Player {
    let mut attrs = PlayerAttributes::uniform(base);
    match role {
        Role::C => {
            attrs.puck_control = base.saturating_add(8);
            attrs.stealing = base.saturating_add(5);
        }
        Role::LW | Role::RW => {
            attrs.speed = base.saturating_add(8);
            attrs.shooting = base.saturating_add(6);
        }
        Role::LD | Role::RD => {
            attrs.defense = base.saturating_add(8);
            attrs.strength = base.saturating_add(6);
            attrs.checking = base.saturating_add(5);
        }
        Role::G => {}
    }
    Player::new(name, number, role).with_attributes(attrs)
}

fn goalie(name: &str, number: u8, base: u8) -> Player {
    let mut attrs = PlayerAttributes::uniform(base);
    attrs.reflexes = base.saturating_add(8);
    attrs.positioning = base.saturating_add(6);
    attrs.glove = base.saturating_add(4);
    attrs.blocker = base.saturating_add(4);
    Player::new(name, number, Role::G).with_attributes(attrs)
}

pub fn home_lineup() -> Lineup {
    Lineup::new(
        "Polar Bears",
        goalie("M. Lindqvist", 31, 70),
        vec![
            skater("E. Korhonen", 4, Role::LD, 72),
            skater("J. Novak", 7, Role::RD, 70),
            skater("A. Bergstrom", 22, Role::LD, 66),
            skater("T. Walker", 28, Role::RD, 64),
        ],
        vec![
            skater("L. Tremblay", 91, Role::C, 74),
            skater("P. Kovacs", 13, Role::LW, 71),
            skater("D. Ferraro", 17, Role::RW, 70),
            skater("S. Okafor", 44, Role::C, 67),
            skater("R. Jansen", 21, Role::LW, 65),
            skater("K. Tanaka", 88, Role::RW, 64),
        ],
    )
    // The demo rosters are statically well formed.
    .expect("demo home lineup is valid")
}

pub fn away_lineup() -> Lineup {
    Lineup::new(
        "Iron Wolves",
        goalie("V. Petrov", 35, 71),
        vec![
            skater("H. Magnusson", 5, Role::LD, 71),
            skater("O. Dubois", 2, Role::RD, 69),
            skater("C. Reyes", 24, Role::LD, 65),
            skater("B. Kowalski", 6, Role::RD, 63),
        ],
        vec![
            skater("N. Laine", 9, Role::C, 73),
            skater("G. Romano", 11, Role::LW, 70),
            skater("F. Andersen", 16, Role::RW, 69),
            skater("I. Novotny", 27, Role::C, 66),
            skater("W. Baker", 19, Role::LW, 64),
            skater("Y. Sato", 72, Role::RW, 63),
        ],
    )
    .expect("demo away lineup is valid")
}

/// A lineup with every forward flagged user-controlled, for driving
/// the zone-entry decision path.
pub fn user_controlled(lineup: Lineup) -> Lineup {
    let forwards = lineup
        .forwards()
        .iter()
        .cloned()
        .map(Player::user_controlled)
        .collect();
    Lineup::new(
        lineup.team_name.clone(),
        lineup.goalie().clone(),
        lineup.defenders().to_vec(),
        forwards,
    )
    .expect("control flag does not change lineup shape")
}
