use thiserror::Error;
use tileworld_stream::LevelError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PacerError {
    #[error("monotonic clock is unavailable")]
    ClockUnavailable,
    #[error("frame pacer was not started")]
    NotStarted,
}

/// Failures that stop the simulation from starting or continuing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Pacer(#[from] PacerError),
}
