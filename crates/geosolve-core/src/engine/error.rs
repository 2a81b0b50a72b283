use thiserror::Error;

use super::config::ConfigError;
use crate::core::constraints::ConstraintError;
use crate::core::geometry::GeometryError;
use crate::core::io::records::RecordError;
use crate::core::models::ids::BoxId;
use crate::core::models::scene::SceneError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No optimizable objects are registered")]
    EmptyRegistry,

    #[error("Optimizable object id '{0}' is already registered")]
    DuplicateObjectId(String),

    #[error("Box {box_id:?} is already registered as optimizable object '{existing}'")]
    DuplicateBox { box_id: BoxId, existing: String },

    #[error("Box {0:?} is not in the scene")]
    BoxNotFound(BoxId),

    #[error("Constraint weight must be finite and non-negative, got {0}")]
    InvalidWeight(f64),

    #[error("Decision vector has {actual} components, expected {expected}")]
    VectorLength { expected: usize, actual: usize },

    #[error("Invalid scene bounds: {0}")]
    InvalidBounds(String),

    #[error("Constraint evaluation failed: {source}")]
    Constraint {
        #[from]
        source: ConstraintError,
    },

    #[error("Geometry error: {source}")]
    Geometry {
        #[from]
        source: GeometryError,
    },

    #[error("Scene error: {source}")]
    Scene {
        #[from]
        source: SceneError,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Record error: {source}")]
    Record {
        #[from]
        source: RecordError,
    },
}
