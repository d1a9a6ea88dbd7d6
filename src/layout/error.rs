use thiserror::Error;

/// Failures that abort a whole layout request. No partial layout is ever
/// returned alongside one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid layout configuration: {0}")]
    InvalidConfig(String),

    #[error("text metrics unavailable: {0}")]
    EnvironmentUnavailable(String),

    #[error(
        "cannot place '{text}' on the canvas (gave up at {font_size:.2}px after {attempts} attempts)"
    )]
    PlacementUnsatisfiable {
        text: String,
        font_size: f64,
        attempts: u64,
    },

    #[error("layout cancelled")]
    Cancelled,
}

pub type LayoutResult<T> = Result<T, LayoutError>;
