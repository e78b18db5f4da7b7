#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::constants::{POINTS_PER_DRAW, POINTS_PER_LOSS, POINTS_PER_WIN};
use crate::error::Result;

/// Points awarded per match outcome.
///
/// Defaults to association-football rules (3/1/0). Tie-breaks are not
/// configurable: points, then goal difference, then goals scored.
#[cfg_attr(feature = "python", pyclass)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub points_per_win: u32,

    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub points_per_draw: u32,

    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub points_per_loss: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        ScoringRules {
            points_per_win: POINTS_PER_WIN,
            points_per_draw: POINTS_PER_DRAW,
            points_per_loss: POINTS_PER_LOSS,
        }
    }
}

impl ScoringRules {
    /// Parse rules from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read rules from a JSON file.
    /// Format: {"points_per_win": 3, "points_per_draw": 1, "points_per_loss": 0}
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let rules = serde_json::from_reader(BufReader::new(file))?;
        log::debug!("loaded scoring rules from {}", path.as_ref().display());
        Ok(rules)
    }

    /// Total points for a win/draw/loss record.
    pub fn points(&self, wins: u32, draws: u32, losses: u32) -> u32 {
        wins.saturating_mul(self.points_per_win)
            .saturating_add(draws.saturating_mul(self.points_per_draw))
            .saturating_add(losses.saturating_mul(self.points_per_loss))
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl ScoringRules {
    #[new]
    #[pyo3(signature = (points_per_win = POINTS_PER_WIN, points_per_draw = POINTS_PER_DRAW, points_per_loss = POINTS_PER_LOSS))]
    fn py_new(points_per_win: u32, points_per_draw: u32, points_per_loss: u32) -> Self {
        ScoringRules {
            points_per_win,
            points_per_draw,
            points_per_loss,
        }
    }

    /// Load rules from a JSON file.
    #[staticmethod]
    #[pyo3(name = "read_from_file")]
    fn py_read_from_file(filepath: &str) -> PyResult<Self> {
        Ok(ScoringRules::read_from_file(filepath)?)
    }

    fn __repr__(&self) -> String {
        format!(
            "ScoringRules(win={}, draw={}, loss={})",
            self.points_per_win, self.points_per_draw, self.points_per_loss
        )
    }
}
