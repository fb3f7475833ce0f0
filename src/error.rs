//! Error type shared by the planner, the event builder and the scenario I/O.

use thiserror::Error;

use crate::event::EventKind;

/// Errors raised by the delivery planner.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// A coordinate was NaN or infinite.
    #[error("invalid {kind} point ({x}, {y}): coordinates must be finite")]
    InvalidInput { kind: EventKind, x: f64, y: f64 },

    /// Random scenario extent that is not finite or whose range `[-extent, extent]` overflows.
    #[error("invalid extent {0}: the range [-extent, extent] must be finite")]
    InvalidExtent(f64),

    #[error("scenario line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
