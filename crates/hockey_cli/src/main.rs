//! Headless runner for the hockey match engine.
//!
//! `hockey run` plays a single seeded match and prints the event feed
//! and box score; `hockey sweep` plays a batch of seeds and reports
//! aggregate results.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use hockey_core::demo;
use hockey_core::engine::MatchEngine;
use hockey_core::models::{EventPayload, MatchEvent, ZoneEntryChoice};

#[derive(Parser)]
#[command(name = "hockey")]
#[command(about = "Deterministic hockey match simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one match
    Run {
        /// Match seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Presentation speed multiplier
        #[arg(long, default_value = "16")]
        speed: Speed,

        /// Pace ticks in real time instead of running flat out
        #[arg(long, default_value = "false")]
        real_time: bool,

        /// Team whose forwards take zone-entry decisions
        #[arg(long)]
        control: Option<Side>,

        /// Answer given to every zone-entry decision
        #[arg(long, default_value = "dump")]
        choice: Choice,

        /// Emit the event feed as JSON lines instead of text
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Simulate a batch of seeded matches and summarize
    Sweep {
        /// Number of matches
        #[arg(long, default_value = "100")]
        games: u32,

        /// Seed of the first match; successive matches increment it
        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Speed {
    #[value(name = "1")]
    X1,
    #[value(name = "2")]
    X2,
    #[value(name = "4")]
    X4,
    #[value(name = "8")]
    X8,
    #[value(name = "16")]
    X16,
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    Home,
    Away,
}

#[derive(Clone, Copy, ValueEnum)]
enum Choice {
    Dump,
    Deke,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { seed, speed, real_time, control, choice, json } => {
            run_match(seed, speed, real_time, control, choice, json)
        }
        Commands::Sweep { games, seed } => sweep(games, seed),
    }
}

fn run_match(
    seed: u64,
    speed: Speed,
    real_time: bool,
    control: Option<Side>,
    choice: Choice,
    json: bool,
) -> Result<()> {
    let mut home = demo::home_lineup();
    let mut away = demo::away_lineup();
    match control {
        Some(Side::Home) => home = demo::user_controlled(home),
        Some(Side::Away) => away = demo::user_controlled(away),
        None => {}
    }
    let answer = match choice {
        Choice::Dump => ZoneEntryChoice::Dump,
        Choice::Deke => ZoneEntryChoice::Deke,
    };

    let mut engine = MatchEngine::new(home, away, seed);
    for _ in 0..cycles_to(speed) {
        engine.cycle_speed();
    }
    engine.start();

    let mut printed = 0;
    while !engine.is_finished() && !engine.is_halted() {
        let interval = engine.tick_interval_ms();
        if real_time {
            std::thread::sleep(std::time::Duration::from_millis(interval));
        }
        engine.tick();
        engine.advance_real(interval);
        if engine.pending_decision().is_some() {
            engine.resolve_choice(answer)?;
        }
        printed = print_new_events(&engine, printed, json)?;
    }
    print_new_events(&engine, printed, json)?;

    if engine.is_halted() {
        anyhow::bail!("match halted before completion (seed {})", seed);
    }

    if json {
        println!("{}", serde_json::to_string(&engine.summary())?);
    } else {
        print_box_score(&engine);
    }
    Ok(())
}

fn cycles_to(speed: Speed) -> u8 {
    match speed {
        Speed::X1 => 0,
        Speed::X2 => 1,
        Speed::X4 => 2,
        Speed::X8 => 3,
        Speed::X16 => 4,
    }
}

fn print_new_events(engine: &MatchEngine, from: usize, json: bool) -> Result<usize> {
    let events = engine.events();
    for event in &events[from..] {
        if json {
            println!("{}", serde_json::to_string(event)?);
        } else {
            println!("[{:>4}s P{}] {}", event.match_time, event.period, describe(event));
        }
    }
    Ok(events.len())
}

fn describe(event: &MatchEvent) -> String {
    match &event.payload {
        EventPayload::MatchStart => "puck drop, match under way".to_string(),
        EventPayload::Faceoff(d) => format!(
            "{:?} face-off ({:?}) won by {} ({:.0} vs {:.0})",
            d.winning_team, d.kind, d.winner.name, d.winner_roll, d.loser_roll
        ),
        EventPayload::ZoneEntry(d) => match &d.deke {
            Some(deke) if deke.success => format!(
                "{} dekes past {} ({:?} duel, {:.0} vs {:.0})",
                d.carrier.name, deke.defender.name, deke.challenge, deke.carrier_total,
                deke.defender_total
            ),
            Some(deke) => format!(
                "{} stripped by {} on the deke ({:?} duel)",
                d.carrier.name, deke.defender.name, deke.challenge
            ),
            None => format!(
                "{} dumps it in{}",
                d.carrier.name,
                if d.auto { "" } else { " on the call" }
            ),
        },
        EventPayload::PuckBattle(d) => format!(
            "board battle: {} {} it from {} ({:?})",
            if d.attacker_won { &d.attacker.name } else { &d.defender.name },
            if d.attacker_won { "wins" } else { "takes" },
            if d.attacker_won { &d.defender.name } else { &d.attacker.name },
            d.outcome
        ),
        EventPayload::Shot(d) => {
            if d.goal {
                let assist = d
                    .assist
                    .as_ref()
                    .map(|a| format!(" (assist {})", a.name))
                    .unwrap_or_default();
                format!("GOAL! {} beats {}{} -- {}:{}", d.shooter.name, d.goalie.name, assist,
                    d.score.0, d.score.1)
            } else {
                let save = d
                    .save_type
                    .map(|s| format!("{:?}", s))
                    .unwrap_or_else(|| "save".to_string());
                format!("{} denied by {} ({})", d.shooter.name, d.goalie.name, save)
            }
        }
        EventPayload::Substitution(d) => format!(
            "{:?} line change: {} off ({}s shift), {} on",
            d.team, d.player_out.name, d.shift_seconds, d.player_in.name
        ),
        EventPayload::PeriodEnd { period } => format!("end of period {}", period),
        EventPayload::MatchEnd { score } => format!("final horn -- {}:{}", score.0, score.1),
    }
}

fn print_box_score(engine: &MatchEngine) {
    let summary = engine.summary();
    println!();
    println!(
        "FINAL  {} {} - {} {}",
        summary.home_team, summary.score.0, summary.score.1, summary.away_team
    );
    for (label, record) in [("home", &summary.home), ("away", &summary.away)] {
        println!(
            "  {}: {} shots, {} goals, {} saves, {}/{} face-offs",
            label, record.shots, record.goals, record.saves, record.faceoffs_won,
            record.faceoffs_total
        );
    }

    println!("  scorers:");
    for line in summary
        .players
        .iter()
        .filter(|line| line.record.goals > 0 || line.record.assists > 0)
    {
        println!(
            "    {} ({:?}) {}G {}A, {}s on ice",
            line.name, line.slot.team, line.record.goals, line.record.assists,
            line.total_ice_seconds
        );
    }
}

fn sweep(games: u32, first_seed: u64) -> Result<()> {
    let mut home_wins = 0u32;
    let mut away_wins = 0u32;
    let mut draws = 0u32;
    let mut total_goals = 0u64;

    for offset in 0..games {
        let seed = first_seed + offset as u64;
        let mut engine = MatchEngine::new(demo::home_lineup(), demo::away_lineup(), seed);
        // Sweeps always run flat out.
        for _ in 0..4 {
            engine.cycle_speed();
        }
        engine.start();
        while !engine.is_finished() && !engine.is_halted() {
            engine.tick();
            engine.advance_real(engine.tick_interval_ms());
            if engine.pending_decision().is_some() {
                engine.resolve_choice(ZoneEntryChoice::Dump)?;
            }
        }
        if engine.is_halted() {
            anyhow::bail!("seed {} halted before completion", seed);
        }

        let (h, a) = engine.score();
        total_goals += h as u64 + a as u64;
        match h.cmp(&a) {
            std::cmp::Ordering::Greater => home_wins += 1,
            std::cmp::Ordering::Less => away_wins += 1,
            std::cmp::Ordering::Equal => draws += 1,
        }
        log::debug!("seed {}: {}-{}", seed, h, a);
    }

    println!("{} matches from seed {}", games, first_seed);
    println!("  home {} / draw {} / away {}", home_wins, draws, away_wins);
    if games > 0 {
        println!("  {:.2} goals per match", total_goals as f64 / games as f64);
    }
    Ok(())
}
