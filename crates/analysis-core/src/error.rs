use thiserror::Error;

/// Failures at the collaborator boundary (ingest, persistence). Analytical
/// degeneracy — missing history, zero sales, short series — is never an
/// error; it is represented as `PatternVariant::SinDatos` with a zero score.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("calculation error: {0}")]
    CalculationError(String),

    #[error("ingest error: {0}")]
    IngestError(String),

    #[error("persist error: {0}")]
    PersistError(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}
