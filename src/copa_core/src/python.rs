//! Python bindings, built with the `python` feature.

use pyo3::prelude::*;
use std::time::Duration;

use crate::clock::format_elapsed;
use crate::constants::{HALF_LENGTH_MINUTES, POINTS_PER_DRAW, POINTS_PER_LOSS, POINTS_PER_WIN, STAGES};
use crate::matches::{LiveMatchInfo, MatchResult};
use crate::rules::ScoringRules;
use crate::schedule::{round_robin, Fixture};
use crate::scorers::{top_scorers, MatchEvent, TopScorer};
use crate::standings::{compute_standings, compute_standings_strict, compute_standings_with_rules, TeamStanding};
use crate::team::{Player, Team};

/// Compute the league table with standard scoring.
#[pyfunction]
#[pyo3(name = "compute_standings")]
fn py_compute_standings(teams: Vec<Team>, matches: Vec<MatchResult>) -> Vec<TeamStanding> {
    compute_standings(&teams, &matches)
}

/// Compute the league table with custom rules.
///
/// With `strict = True`, a match naming an unknown team raises `ValueError`
/// instead of being skipped.
#[pyfunction]
#[pyo3(name = "compute_standings_with_rules", signature = (teams, matches, rules, strict = false))]
fn py_compute_standings_with_rules(
    teams: Vec<Team>,
    matches: Vec<MatchResult>,
    rules: ScoringRules,
    strict: bool,
) -> PyResult<Vec<TeamStanding>> {
    if strict {
        Ok(compute_standings_strict(&teams, &matches, &rules)?)
    } else {
        Ok(compute_standings_with_rules(&teams, &matches, &rules))
    }
}

#[pyfunction]
#[pyo3(name = "top_scorers")]
fn py_top_scorers(events: Vec<MatchEvent>, players: Vec<Player>, teams: Vec<Team>) -> Vec<TopScorer> {
    top_scorers(&events, &players, &teams)
}

#[pyfunction]
#[pyo3(name = "round_robin", signature = (team_ids, seed = None))]
fn py_round_robin(team_ids: Vec<String>, seed: Option<u64>) -> PyResult<Vec<Fixture>> {
    Ok(round_robin(&team_ids, seed)?)
}

/// Clock display for a number of elapsed seconds.
#[pyfunction]
#[pyo3(name = "format_elapsed_seconds")]
fn py_format_elapsed_seconds(seconds: u64) -> String {
    format_elapsed(Duration::from_secs(seconds))
}

/// Python module definition
#[pymodule]
fn copa_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Classes
    m.add_class::<Team>()?;
    m.add_class::<Player>()?;
    m.add_class::<MatchResult>()?;
    m.add_class::<LiveMatchInfo>()?;
    m.add_class::<ScoringRules>()?;
    m.add_class::<TeamStanding>()?;
    m.add_class::<MatchEvent>()?;
    m.add_class::<TopScorer>()?;
    m.add_class::<Fixture>()?;

    // Functions
    m.add_function(wrap_pyfunction!(py_compute_standings, m)?)?;
    m.add_function(wrap_pyfunction!(py_compute_standings_with_rules, m)?)?;
    m.add_function(wrap_pyfunction!(py_top_scorers, m)?)?;
    m.add_function(wrap_pyfunction!(py_round_robin, m)?)?;
    m.add_function(wrap_pyfunction!(py_format_elapsed_seconds, m)?)?;

    // Constants
    m.add("POINTS_PER_WIN", POINTS_PER_WIN)?;
    m.add("POINTS_PER_DRAW", POINTS_PER_DRAW)?;
    m.add("POINTS_PER_LOSS", POINTS_PER_LOSS)?;
    m.add("HALF_LENGTH_MINUTES", HALF_LENGTH_MINUTES)?;
    m.add("STAGES", STAGES.to_vec())?;

    Ok(())
}
