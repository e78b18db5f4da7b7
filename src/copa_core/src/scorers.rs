//! Match events and the rankings derived from them.

#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::constants::FULL_TIME_MINUTE;
use crate::team::{Player, Team};

/// What happened at a given minute. Unrecognised kinds are kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Goal,
    YellowCard,
    RedCard,
    Substitution,
    Corner,
    Kickoff,
    Halftime,
    Fulltime,
    Other(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::Goal => "goal",
            EventType::YellowCard => "yellow_card",
            EventType::RedCard => "red_card",
            EventType::Substitution => "substitution",
            EventType::Corner => "corner",
            EventType::Kickoff => "kickoff",
            EventType::Halftime => "halftime",
            EventType::Fulltime => "fulltime",
            EventType::Other(s) => s,
        }
    }
}

impl From<String> for EventType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "goal" => EventType::Goal,
            "yellow_card" => EventType::YellowCard,
            "red_card" => EventType::RedCard,
            "substitution" => EventType::Substitution,
            "corner" => EventType::Corner,
            "kickoff" => EventType::Kickoff,
            "halftime" => EventType::Halftime,
            "fulltime" => EventType::Fulltime,
            _ => EventType::Other(s),
        }
    }
}

impl From<EventType> for String {
    fn from(event_type: EventType) -> Self {
        event_type.as_str().to_string()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the `match_events` table.
#[cfg_attr(feature = "python", pyclass)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub match_id: String,

    pub event_type: EventType,

    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub minute: u32,

    #[cfg_attr(feature = "python", pyo3(get, set))]
    #[serde(default)]
    pub player_id: Option<String>,

    #[cfg_attr(feature = "python", pyo3(get, set))]
    #[serde(default)]
    pub description: Option<String>,
}

impl MatchEvent {
    pub fn new(match_id: impl Into<String>, event_type: EventType, minute: u32) -> Self {
        MatchEvent {
            match_id: match_id.into(),
            event_type,
            minute,
            player_id: None,
            description: None,
        }
    }

    pub fn goal(match_id: impl Into<String>, player_id: impl Into<String>, minute: u32) -> Self {
        let mut event = MatchEvent::new(match_id, EventType::Goal, minute);
        event.player_id = Some(player_id.into());
        event
    }

    /// Event logged when a match goes live.
    pub fn kickoff(match_id: impl Into<String>) -> Self {
        let mut event = MatchEvent::new(match_id, EventType::Kickoff, 0);
        event.description = Some("Início da partida".to_string());
        event
    }

    /// Event logged when a match is finished.
    pub fn fulltime(match_id: impl Into<String>) -> Self {
        let mut event = MatchEvent::new(match_id, EventType::Fulltime, FULL_TIME_MINUTE);
        event.description = Some("Fim da partida".to_string());
        event
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl MatchEvent {
    #[new]
    #[pyo3(signature = (match_id, event_type, minute, player_id = None, description = None))]
    fn py_new(
        match_id: String,
        event_type: String,
        minute: u32,
        player_id: Option<String>,
        description: Option<String>,
    ) -> Self {
        MatchEvent {
            match_id,
            event_type: EventType::from(event_type),
            minute,
            player_id,
            description,
        }
    }

    #[getter(event_type)]
    fn py_event_type(&self) -> String {
        self.event_type.to_string()
    }

    fn __repr__(&self) -> String {
        format!("MatchEvent({}, {}')", self.event_type, self.minute)
    }
}

/// A player's goal tally.
#[cfg_attr(feature = "python", pyclass)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopScorer {
    #[cfg_attr(feature = "python", pyo3(get))]
    pub player_id: String,

    #[cfg_attr(feature = "python", pyo3(get))]
    pub player_name: String,

    #[cfg_attr(feature = "python", pyo3(get))]
    pub team_name: Option<String>,

    #[cfg_attr(feature = "python", pyo3(get))]
    pub jersey_number: u32,

    #[cfg_attr(feature = "python", pyo3(get))]
    pub goals: u32,
}

/// Rank players by goals scored, most first.
///
/// Only `goal` events with a known player count. Players level on goals keep
/// the order in which they first scored.
pub fn top_scorers(events: &[MatchEvent], players: &[Player], teams: &[Team]) -> Vec<TopScorer> {
    let players_by_id: HashMap<&str, &Player> = players.iter().map(|p| (p.id.as_str(), p)).collect();
    let team_names: HashMap<&str, &str> = teams.iter().map(|t| (t.id.as_str(), t.name.as_str())).collect();

    let mut scorers: Vec<TopScorer> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for event in events.iter().filter(|e| e.event_type == EventType::Goal) {
        let Some(player_id) = event.player_id.as_deref() else {
            log::debug!("goal at {}' in match {} has no scorer", event.minute, event.match_id);
            continue;
        };
        let Some(player) = players_by_id.get(player_id) else {
            log::warn!("goal credited to unknown player {}", player_id);
            continue;
        };

        match positions.get(player_id) {
            Some(&i) => scorers[i].goals += 1,
            None => {
                positions.insert(player.id.as_str(), scorers.len());
                scorers.push(TopScorer {
                    player_id: player.id.clone(),
                    player_name: player.name.clone(),
                    team_name: team_names.get(player.team_id.as_str()).map(|n| n.to_string()),
                    jersey_number: player.jersey_number,
                    goals: 1,
                });
            }
        }
    }

    scorers.sort_by(|a, b| b.goals.cmp(&a.goals));
    scorers
}

/// Events of one match, latest first.
pub fn match_timeline<'a>(events: &'a [MatchEvent], match_id: &str) -> Vec<&'a MatchEvent> {
    let mut timeline: Vec<&MatchEvent> = events.iter().filter(|e| e.match_id == match_id).collect();
    timeline.sort_by(|a, b| b.minute.cmp(&a.minute));
    timeline
}
