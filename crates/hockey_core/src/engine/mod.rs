//! Simulation engine: clock, scheduler, resolvers and accumulators.

pub mod clock;
pub mod ice_time;
pub mod match_sim;
pub mod possession;
pub mod resolvers;
pub mod rng;
pub mod stats;
pub mod substitutions;

pub use clock::{GameClock, SpeedMultiplier, TickOutcome};
pub use ice_time::{IceTime, IceTimeTracker};
pub use match_sim::{MatchEngine, PendingDecision, AUTO_DUMP_DELAY_MS};
pub use possession::{PuckPossessionState, Zone};
pub use rng::{RandomSource, ScriptedRng, SeededRng};
pub use stats::StatAccumulator;
pub use substitutions::SHIFT_LIMIT_SECONDS;
