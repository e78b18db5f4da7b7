/// Points awarded for a win under standard association-football rules
pub const POINTS_PER_WIN: u32 = 3;

/// Points awarded to each side for a draw
pub const POINTS_PER_DRAW: u32 = 1;

/// Points awarded for a loss
pub const POINTS_PER_LOSS: u32 = 0;

/// Length of one half in minutes; the live clock never displays past this
pub const HALF_LENGTH_MINUTES: u64 = 45;

/// Minute recorded on the fulltime event
pub const FULL_TIME_MINUTE: u32 = 90;

/// Default refresh period of the live clock in milliseconds
pub const CLOCK_TICK_MILLIS: u64 = 1000;

/// Lowest jersey number a player may wear
pub const JERSEY_MIN: u32 = 1;

/// Highest jersey number a player may wear
pub const JERSEY_MAX: u32 = 99;

/// Stage labels used by the tournament, in bracket order
pub const STAGES: [&str; 5] = [
    "Fase de Grupos",
    "Oitavas de Final",
    "Quartas de Final",
    "Semifinal",
    "Final",
];

/// Position of a stage label in the bracket, if it is a known stage.
pub fn stage_order(stage: &str) -> Option<usize> {
    STAGES.iter().position(|&s| s == stage)
}
