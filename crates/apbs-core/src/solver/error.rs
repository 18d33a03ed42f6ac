use super::library::CalculationKind;
use crate::core::io::pqr::PqrError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Error while parsing input deck: {0}")]
    InputParse(String),

    #[error("Failed to read molecule: {0}")]
    Molecule(#[from] PqrError),

    #[error("Error setting up calculations: {0}")]
    Setup(String),

    #[error("Only multigrid calculations supported (calculation #{number} is {kind})")]
    UnsupportedCalculation { number: usize, kind: CalculationKind },

    #[error("Error solving calculation #{number}: {reason}")]
    Solve { number: usize, reason: String },

    #[error("Calculation index {index} is out of range ({count} calculations)")]
    CalculationOutOfRange { index: usize, count: usize },

    #[error("Solver library error: {0}")]
    Library(String),
}
