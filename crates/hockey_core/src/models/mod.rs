pub mod events;
pub mod lineup;
pub mod player;
pub mod stats;

pub use events::{
    BattleOutcome, DekeChallenge, DekeDetails, EventPayload, FaceoffDetails, FaceoffKind,
    MatchEvent, PuckBattleDetails, SaveType, ShotDetails, SubstitutionDetails, ZoneEntryChoice,
    ZoneEntryDetails,
};
pub use lineup::{
    Lineup, OnIceRoster, PlayerSlotKey, SlotRef, TeamSide, ON_ICE_DEFENDERS, ON_ICE_FORWARDS,
};
pub use player::{Player, PlayerAttributes, Position, Role, DEFAULT_ATTRIBUTE};
pub use stats::{MatchSummary, PlayerStatLine, StatRecord};
