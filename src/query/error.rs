use thiserror::Error;

use crate::models::QueryKind;

/// Caller-contract violations surfaced by the query layer
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{parameter} is required for {kind} queries")]
    MissingParameter {
        kind: QueryKind,
        parameter: &'static str,
    },
}
