use crate::core::constraints::{Anchor, Axis, AxisTargets, ConstraintError, Direction};
use crate::core::geometry::{Cuboid, GeometryError};
use crate::core::models::scene::SceneError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Unknown constraint type '{0}'")]
    UnknownKind(String),
    #[error("Constraint '{kind}' requires parameter '{parameter}'")]
    MissingParameter {
        kind: &'static str,
        parameter: &'static str,
    },
    #[error("Constraint '{kind}' references unknown object '{name}'")]
    UnknownObject { kind: String, name: String },
    #[error("Constraint '{kind}' has an invalid weight {weight}")]
    InvalidWeight { kind: String, weight: f64 },
    #[error("Invalid object: {0}")]
    Geometry(#[from] GeometryError),
    #[error("Invalid scene: {0}")]
    Scene(#[from] SceneError),
    #[error("Invalid constraint: {0}")]
    Constraint(#[from] ConstraintError),
}

/// Serialized form of a box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectRecord {
    pub name: String,
    pub position: [f64; 3],
    pub orientation: [f64; 3],
    pub size: [f64; 3],
}

impl ObjectRecord {
    pub fn from_cuboid(cuboid: &Cuboid) -> Self {
        Self {
            name: cuboid.name.clone(),
            position: cuboid.loc.into(),
            orientation: cuboid.rot.into(),
            size: (*cuboid.scale()).into(),
        }
    }

    pub fn to_cuboid(&self) -> Result<Cuboid, GeometryError> {
        Cuboid::new(self.position, self.orientation, self.size, self.name.as_str())
    }
}

/// Keyword parameters of a constraint record. Which ones are read depends on
/// the constraint type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Anchor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<AxisTargets>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_difference: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clamp: Option<bool>,
}

fn default_weight() -> f64 {
    1.0
}

/// Serialized form of a weighted constraint; arguments are object names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub arguments: Vec<String>,
    #[serde(default)]
    pub params: ConstraintParams,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

/// A full layout problem as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDocument {
    #[serde(default)]
    pub objects: Vec<ObjectRecord>,
    #[serde(default)]
    pub constraints: Vec<ConstraintRecord>,
}

impl SceneDocument {
    pub fn load(path: &Path) -> Result<Self, RecordError> {
        let content = std::fs::read_to_string(path).map_err(|e| RecordError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| RecordError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn to_toml_string(&self) -> Result<String, RecordError> {
        Ok(toml::to_string(self)?)
    }
}
