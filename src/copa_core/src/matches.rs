//! Match records as the store keeps them, and the views the calculators need.

#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CopaError, Result};
use crate::scorers::MatchEvent;
use crate::team::Team;

/// Lifecycle of a match record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Live,
    Finished,
    Postponed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Live => "live",
            MatchStatus::Finished => "finished",
            MatchStatus::Postponed => "postponed",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = CopaError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(MatchStatus::Scheduled),
            "live" => Ok(MatchStatus::Live),
            "finished" => Ok(MatchStatus::Finished),
            "postponed" => Ok(MatchStatus::Postponed),
            other => Err(CopaError::InvalidStatus(other.to_string())),
        }
    }
}

/// A completed match with both final scores, the unit the standings fold over.
#[cfg_attr(feature = "python", pyclass)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub home_team_id: String,

    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub away_team_id: String,

    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub home_score: u32,

    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub away_score: u32,
}

impl MatchResult {
    pub fn new(
        home_team_id: impl Into<String>,
        away_team_id: impl Into<String>,
        home_score: u32,
        away_score: u32,
    ) -> Self {
        MatchResult {
            home_team_id: home_team_id.into(),
            away_team_id: away_team_id.into(),
            home_score,
            away_score,
        }
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl MatchResult {
    #[new]
    fn py_new(home_team_id: String, away_team_id: String, home_score: u32, away_score: u32) -> Self {
        MatchResult::new(home_team_id, away_team_id, home_score, away_score)
    }

    fn __repr__(&self) -> String {
        format!(
            "MatchResult({} {}-{} {})",
            self.home_team_id, self.home_score, self.away_score, self.away_team_id
        )
    }
}

/// A row of the `matches` table. Scores are null until kickoff.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: String,
    pub home_team_id: String,
    pub away_team_id: String,
    #[serde(default)]
    pub home_score: Option<u32>,
    #[serde(default)]
    pub away_score: Option<u32>,
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl MatchRecord {
    pub fn new(
        id: impl Into<String>,
        home_team_id: impl Into<String>,
        away_team_id: impl Into<String>,
    ) -> Self {
        MatchRecord {
            id: id.into(),
            home_team_id: home_team_id.into(),
            away_team_id: away_team_id.into(),
            home_score: None,
            away_score: None,
            status: MatchStatus::Scheduled,
            stage: None,
            location: None,
        }
    }

    pub fn with_score(mut self, home: u32, away: u32) -> Self {
        self.home_score = Some(home);
        self.away_score = Some(away);
        self
    }

    pub fn with_status(mut self, status: MatchStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn involves(&self, team_id: &str) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    fn transition_error(&self, action: &'static str) -> CopaError {
        CopaError::InvalidTransition {
            match_id: self.id.clone(),
            status: self.status,
            action,
        }
    }

    /// Kick off a scheduled match: goes live at 0-0.
    ///
    /// Returns the kickoff event to log on the timeline.
    pub fn start(&mut self) -> Result<MatchEvent> {
        if self.status != MatchStatus::Scheduled {
            return Err(self.transition_error("start"));
        }
        self.status = MatchStatus::Live;
        self.home_score = Some(0);
        self.away_score = Some(0);
        log::debug!("match {} is live", self.id);
        Ok(MatchEvent::kickoff(self.id.clone()))
    }

    /// End a live match, keeping the current score as final.
    ///
    /// Returns the fulltime event to log on the timeline.
    pub fn finish(&mut self) -> Result<MatchEvent> {
        if self.status != MatchStatus::Live {
            return Err(self.transition_error("finish"));
        }
        self.status = MatchStatus::Finished;
        self.home_score.get_or_insert(0);
        self.away_score.get_or_insert(0);
        log::debug!("match {} finished", self.id);
        Ok(MatchEvent::fulltime(self.id.clone()))
    }

    /// Overwrite both scores. Live matches and corrections to finished ones only.
    pub fn set_score(&mut self, home: u32, away: u32) -> Result<()> {
        match self.status {
            MatchStatus::Live | MatchStatus::Finished => {
                self.home_score = Some(home);
                self.away_score = Some(away);
                Ok(())
            }
            _ => Err(self.transition_error("update the score of")),
        }
    }

    /// The result this record contributes to the standings, if any.
    ///
    /// Only finished matches carrying both scores count.
    pub fn as_result(&self) -> Option<MatchResult> {
        if self.status != MatchStatus::Finished {
            return None;
        }
        match (self.home_score, self.away_score) {
            (Some(home), Some(away)) => Some(MatchResult::new(
                self.home_team_id.clone(),
                self.away_team_id.clone(),
                home,
                away,
            )),
            _ => None,
        }
    }
}

/// Results of all finished records, in input order.
pub fn finished_results(records: &[MatchRecord]) -> Vec<MatchResult> {
    records.iter().filter_map(MatchRecord::as_result).collect()
}

/// Score line of a match a team is currently playing.
#[cfg_attr(feature = "python", pyclass)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveMatchInfo {
    #[cfg_attr(feature = "python", pyo3(get))]
    pub match_id: String,

    #[cfg_attr(feature = "python", pyo3(get))]
    pub opponent_name: String,

    #[cfg_attr(feature = "python", pyo3(get))]
    pub home_score: u32,

    #[cfg_attr(feature = "python", pyo3(get))]
    pub away_score: u32,

    #[cfg_attr(feature = "python", pyo3(get))]
    pub is_home: bool,
}

impl LiveMatchInfo {
    /// Score as seen from the team's side, e.g. "2-1" when it leads.
    pub fn team_score_line(&self) -> String {
        if self.is_home {
            format!("{}-{}", self.home_score, self.away_score)
        } else {
            format!("{}-{}", self.away_score, self.home_score)
        }
    }
}

/// First live match involving `team_id`.
///
/// Returns `None` when the team is idle or the opponent is not a known team.
pub fn live_match_for(team_id: &str, records: &[MatchRecord], teams: &[Team]) -> Option<LiveMatchInfo> {
    let record = records
        .iter()
        .find(|m| m.status == MatchStatus::Live && m.involves(team_id))?;

    let is_home = record.home_team_id == team_id;
    let opponent_id = if is_home {
        &record.away_team_id
    } else {
        &record.home_team_id
    };
    let opponent = teams.iter().find(|t| &t.id == opponent_id)?;

    Some(LiveMatchInfo {
        match_id: record.id.clone(),
        opponent_name: opponent.name.clone(),
        home_score: record.home_score.unwrap_or(0),
        away_score: record.away_score.unwrap_or(0),
        is_home,
    })
}
