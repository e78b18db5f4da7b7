#[cfg(feature = "python")]
use pyo3::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{CopaError, Result};
use crate::matches::MatchRecord;

/// A pairing to be played in a given round.
#[cfg_attr(feature = "python", pyclass)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    #[cfg_attr(feature = "python", pyo3(get))]
    pub home_team_id: String,

    #[cfg_attr(feature = "python", pyo3(get))]
    pub away_team_id: String,

    /// 1-based round number
    #[cfg_attr(feature = "python", pyo3(get))]
    pub round: u32,
}

impl Fixture {
    /// Fails if both sides are the same team.
    pub fn new(home_team_id: impl Into<String>, away_team_id: impl Into<String>, round: u32) -> Result<Self> {
        let home_team_id = home_team_id.into();
        let away_team_id = away_team_id.into();
        if home_team_id == away_team_id {
            return Err(CopaError::SameTeamFixture(home_team_id));
        }
        Ok(Fixture {
            home_team_id,
            away_team_id,
            round,
        })
    }

    pub fn involves(&self, team_id: &str) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    /// A scheduled match record for this fixture.
    pub fn to_record(&self, id: impl Into<String>, stage: impl Into<String>) -> MatchRecord {
        MatchRecord::new(id, self.home_team_id.clone(), self.away_team_id.clone()).with_stage(stage)
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl Fixture {
    fn __repr__(&self) -> String {
        format!("Fixture(round {}: {} vs {})", self.round, self.home_team_id, self.away_team_id)
    }
}

/// Single round robin using the circle method.
///
/// Every pair of teams meets once. With an odd number of teams one team sits
/// out each round. If `seed` is given, team order is shuffled deterministically
/// first; otherwise the input order fixes the draw.
pub fn round_robin(team_ids: &[String], seed: Option<u64>) -> Result<Vec<Fixture>> {
    let mut slots: Vec<Option<&str>> = team_ids.iter().map(|id| Some(id.as_str())).collect();

    if let Some(s) = seed {
        let mut rng = ChaCha8Rng::seed_from_u64(s);
        slots.shuffle(&mut rng);
    }
    if slots.len() % 2 == 1 {
        // Bye
        slots.push(None);
    }

    let n = slots.len();
    if n < 2 {
        return Ok(Vec::new());
    }

    let mut fixtures = Vec::with_capacity(n * (n - 1) / 2);
    for round in 0..n - 1 {
        for i in 0..n / 2 {
            let (a, b) = (slots[i], slots[n - 1 - i]);
            let (Some(a), Some(b)) = (a, b) else {
                continue;
            };
            // Alternate home side of the fixed slot so it doesn't always host
            let (home, away) = if i == 0 && round % 2 == 1 { (b, a) } else { (a, b) };
            fixtures.push(Fixture::new(home, away, round as u32 + 1)?);
        }
        slots[1..].rotate_right(1);
    }

    log::debug!("scheduled {} fixtures over {} rounds", fixtures.len(), n - 1);
    Ok(fixtures)
}

/// Round robin for one stage as scheduled match records.
///
/// Record ids are provisional (`r<round>-<n>`); the store assigns real ones.
pub fn schedule_stage(team_ids: &[String], seed: Option<u64>, stage: &str) -> Result<Vec<MatchRecord>> {
    let fixtures = round_robin(team_ids, seed)?;
    let mut records = Vec::with_capacity(fixtures.len());
    let (mut round, mut n) = (0, 0);
    for fixture in &fixtures {
        if fixture.round != round {
            round = fixture.round;
            n = 0;
        }
        n += 1;
        records.push(fixture.to_record(format!("r{}-{}", round, n), stage));
    }
    Ok(records)
}
