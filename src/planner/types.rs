use crate::io::ImportError;
use crate::vacation::VacationError;
use thiserror::Error;

/// Ligne d'analyse par créneau : couverture face au besoin.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketRow {
    pub index: usize,
    pub label: String,
    pub coverage: u32,
    pub expected: f64,
    pub required: u32,
    /// `coverage - required` (négatif : sous-effectif).
    pub gap: i64,
}

impl BucketRow {
    pub fn is_short(&self) -> bool {
        self.gap < 0
    }
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("agent name cannot be empty")]
    EmptyAgentName,
    #[error("unknown agent: {0}")]
    UnknownAgent(String),
    #[error("agent already exists: {0}")]
    DuplicateAgent(String),
    #[error(transparent)]
    Vacation(#[from] VacationError),
    #[error(transparent)]
    Import(#[from] ImportError),
    /// Échec d'écriture (export CSV).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
