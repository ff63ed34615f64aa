use crate::validation::InputError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BodygraphError {
    #[error("Table integrity error: {0}")]
    TableIntegrity(String),

    #[error("Ephemeris unavailable: {0}")]
    EphemerisUnavailable(String),

    #[error("Solver failed to converge: {0}")]
    SolverConvergence(String),

    #[error("Computation cancelled")]
    Cancelled,

    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BodygraphError {
    /// Startup-class failures; a process hitting one must not serve charts.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BodygraphError::TableIntegrity(_))
    }
}

pub type Result<T> = std::result::Result<T, BodygraphError>;
