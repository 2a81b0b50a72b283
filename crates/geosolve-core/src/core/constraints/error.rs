use super::arity::Arity;
use crate::core::models::ids::BoxId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConstraintError {
    #[error("Constraint '{kind}' takes {expected} arguments, got {actual}")]
    Arity {
        kind: &'static str,
        expected: Arity,
        actual: usize,
    },

    #[error("Invalid parameter '{parameter}' for constraint '{kind}': {reason}")]
    InvalidParameter {
        kind: &'static str,
        parameter: &'static str,
        reason: String,
    },

    #[error("Unknown {selector} '{value}'")]
    UnknownSelector {
        selector: &'static str,
        value: String,
    },

    #[error("Constraint '{kind}' references box {id:?} which is not in the scene")]
    UnknownBox { kind: &'static str, id: BoxId },
}
