#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::{JERSEY_MAX, JERSEY_MIN};
use crate::error::{CopaError, Result};

/// A registered team, as stored in the `teams` table.
#[cfg_attr(feature = "python", pyclass)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub id: String,

    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub name: String,

    /// Public URL of the uploaded logo, if any
    #[cfg_attr(feature = "python", pyo3(get, set))]
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Team {
            id: id.into(),
            name: name.into(),
            logo_url: None,
        }
    }

    pub fn with_logo(mut self, logo_url: impl Into<String>) -> Self {
        self.logo_url = Some(logo_url.into());
        self
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl Team {
    #[new]
    #[pyo3(signature = (id, name, logo_url = None))]
    fn py_new(id: String, name: String, logo_url: Option<String>) -> Self {
        Team { id, name, logo_url }
    }

    /// Create a copy of this team
    pub fn copy(&self) -> Self {
        self.clone()
    }

    fn __str__(&self) -> String {
        self.name.clone()
    }

    fn __repr__(&self) -> String {
        format!("Team({:?}, {:?})", self.id, self.name)
    }
}

/// A rostered player. Jersey numbers run 1 to 99 and are unique within a team;
/// see [`validate_roster`].
#[cfg_attr(feature = "python", pyclass)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub id: String,

    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub name: String,

    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub team_id: String,

    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub jersey_number: u32,

    /// Field position ("Goleiro", "Zagueiro", ...), free text
    #[cfg_attr(feature = "python", pyo3(get, set))]
    #[serde(default)]
    pub position: Option<String>,
}

impl Player {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        team_id: impl Into<String>,
        jersey_number: u32,
    ) -> Self {
        Player {
            id: id.into(),
            name: name.into(),
            team_id: team_id.into(),
            jersey_number,
            position: None,
        }
    }
}

/// Check a player against the rest of the roster before saving it.
///
/// `roster` may contain the player itself (an edit); that entry is ignored.
pub fn validate_player(player: &Player, roster: &[Player]) -> Result<()> {
    if !(JERSEY_MIN..=JERSEY_MAX).contains(&player.jersey_number) {
        return Err(CopaError::InvalidJersey {
            player_id: player.id.clone(),
            number: player.jersey_number,
        });
    }

    let taken = roster.iter().any(|other| {
        other.id != player.id && other.team_id == player.team_id && other.jersey_number == player.jersey_number
    });
    if taken {
        return Err(CopaError::DuplicateJersey {
            team_id: player.team_id.clone(),
            number: player.jersey_number,
        });
    }
    Ok(())
}

/// Validate a whole roster: numbers in range, no team reusing a number.
pub fn validate_roster(players: &[Player]) -> Result<()> {
    let mut seen: HashMap<(&str, u32), &str> = HashMap::new();
    for player in players {
        validate_player(player, &[])?;
        if let Some(first) = seen.insert((player.team_id.as_str(), player.jersey_number), player.id.as_str()) {
            log::warn!("players {} and {} share jersey {}", first, player.id, player.jersey_number);
            return Err(CopaError::DuplicateJersey {
                team_id: player.team_id.clone(),
                number: player.jersey_number,
            });
        }
    }
    Ok(())
}

/// A team's players by line, each line ordered by jersey number.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lineup<'a> {
    pub goalkeepers: Vec<&'a Player>,
    pub defenders: Vec<&'a Player>,
    pub midfielders: Vec<&'a Player>,
    pub forwards: Vec<&'a Player>,
    /// No position, or one that fits no line
    pub others: Vec<&'a Player>,
}

impl<'a> Lineup<'a> {
    pub fn len(&self) -> usize {
        self.goalkeepers.len() + self.defenders.len() + self.midfielders.len() + self.forwards.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Group `team_id`'s players into lines. Positions match case-insensitively;
/// full-backs ("Lateral") line up with the defenders.
pub fn lineup<'a>(team_id: &str, players: &'a [Player]) -> Lineup<'a> {
    let mut squad: Vec<&Player> = players.iter().filter(|p| p.team_id == team_id).collect();
    squad.sort_by_key(|p| p.jersey_number);

    let mut lineup = Lineup::default();
    for player in squad {
        let position = player.position.as_deref().unwrap_or_default().to_lowercase();
        let line = if position.contains("goleiro") {
            &mut lineup.goalkeepers
        } else if position.contains("zagueiro") || position.contains("lateral") {
            &mut lineup.defenders
        } else if position.contains("meio-campo") {
            &mut lineup.midfielders
        } else if position.contains("atacante") {
            &mut lineup.forwards
        } else {
            &mut lineup.others
        };
        line.push(player);
    }
    lineup
}

#[cfg(feature = "python")]
#[pymethods]
impl Player {
    #[new]
    #[pyo3(signature = (id, name, team_id, jersey_number, position = None))]
    fn py_new(
        id: String,
        name: String,
        team_id: String,
        jersey_number: u32,
        position: Option<String>,
    ) -> Self {
        Player {
            id,
            name,
            team_id,
            jersey_number,
            position,
        }
    }

    fn __repr__(&self) -> String {
        format!("Player({:?}, #{}, team={:?})", self.name, self.jersey_number, self.team_id)
    }
}
