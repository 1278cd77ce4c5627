//! # hockey_core - Deterministic Hockey Match Simulation Engine
//!
//! A timer-driven state machine that plays out a three-period hockey
//! match: face-offs, zone entries, puck battles and shots resolved
//! from player attributes and seeded randomness, with ice-time-driven
//! line changes at every stoppage.
//!
//! The engine is passive: an external driver owns the real-time loop
//! and feeds ticks in. Same seed, same driver inputs, same match.
//!
//! ```
//! use hockey_core::demo;
//! use hockey_core::engine::MatchEngine;
//! use hockey_core::models::ZoneEntryChoice;
//!
//! let mut engine = MatchEngine::new(demo::home_lineup(), demo::away_lineup(), 42);
//! engine.start();
//! while !engine.is_finished() {
//!     engine.tick();
//!     engine.advance_real(engine.tick_interval_ms());
//!     if engine.pending_decision().is_some() {
//!         engine.resolve_choice(ZoneEntryChoice::Dump).unwrap();
//!     }
//! }
//! let summary = engine.summary();
//! println!("{} {:?} {}", summary.home_team, summary.score, summary.away_team);
//! ```

pub mod demo;
pub mod engine;
pub mod error;
pub mod models;

pub use engine::{MatchEngine, PendingDecision};
pub use error::{MatchError, Result};
pub use models::{Lineup, MatchEvent, MatchSummary, Player, TeamSide};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
