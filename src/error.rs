use thiserror::Error;

/// Result type for pipeline operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that abort a modelling run. All of these are fatal: the pipeline
/// is a deterministic single pass, so there is nothing to retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Input grids disagree in shape
    #[error("input grid {grid} has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        grid: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// A velocity or density sample that would make impedance undefined
    #[error("{grid} must be positive, got {value} at depth sample {row}, trace {trace}")]
    NonPositiveInput {
        grid: &'static str,
        row: usize,
        trace: usize,
        value: f64,
    },

    /// A velocity sample that would break the travel-time integration
    #[error("velocity must be positive, got {value} m/s at depth sample {row}, trace {trace}")]
    NonPositiveVelocity { row: usize, trace: usize, value: f64 },

    /// The depth axis repeats or reverses direction mid-column
    #[error("depth axis is not strictly monotonic at sample {row}")]
    NonMonotonicDepth { row: usize },

    /// A configuration parameter rejected before any grid computation
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The run was cancelled between traces
    #[error("modelling run cancelled")]
    Cancelled,
}
