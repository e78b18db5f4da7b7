//! Copa Core - standings and match logic for the Copa Paizão tournament.
//!
//! Every function here works on plain snapshots of teams, players, matches
//! and match events handed over by the application; nothing is fetched or
//! stored. Python bindings are available with the `python` feature.

pub mod clock;
pub mod constants;
pub mod error;
pub mod matches;
pub mod rules;
pub mod schedule;
pub mod scorers;
pub mod standings;
pub mod team;

#[cfg(feature = "python")]
mod python;

pub use clock::{format_elapsed, ClockTicker, MatchClock};
pub use constants::{POINTS_PER_DRAW, POINTS_PER_LOSS, POINTS_PER_WIN};
pub use error::{CopaError, Result};
pub use matches::{finished_results, live_match_for, LiveMatchInfo, MatchRecord, MatchResult, MatchStatus};
pub use rules::ScoringRules;
pub use schedule::{round_robin, schedule_stage, Fixture};
pub use scorers::{match_timeline, top_scorers, EventType, MatchEvent, TopScorer};
pub use standings::{
    attach_live_info, compute_standings, compute_standings_from_records, compute_standings_strict,
    compute_standings_with_rules, rank_order, standings_by_stage, StageStandings, TeamStanding,
};
pub use team::{lineup, validate_player, validate_roster, Lineup, Player, Team};
