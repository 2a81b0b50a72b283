use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
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
}

/// Search strategy used by [`crate::engine::problem::Problem::solve`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Method {
    /// Powell's direction-set search with golden-section line searches.
    #[default]
    Powell,
    /// Metropolis random walk under a cooling schedule, then a Powell polish.
    Annealing(AnnealingConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AnnealingConfig {
    pub initial_temperature: f64,
    pub final_temperature: f64,
    /// Geometric factor applied to the temperature after each stage.
    pub cooling_rate: f64,
    pub steps_per_temperature: usize,
    /// Move size as a multiple of the per-dimension step scale.
    pub step_size: f64,
    pub seed: Option<u64>,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1.0,
            final_temperature: 1e-3,
            cooling_rate: 0.9,
            steps_per_temperature: 50,
            step_size: 0.5,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct LineSearchConfig {
    /// First trial step, in units of the search direction.
    pub initial_step: f64,
    /// Bracket width at which the golden-section search stops.
    pub x_tolerance: f64,
    /// Cap on bracket expansions and on golden-section shrinks, each.
    pub max_iterations: usize,
}

impl Default for LineSearchConfig {
    fn default() -> Self {
        Self {
            initial_step: 1.0,
            x_tolerance: 1e-4,
            max_iterations: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SolverConfig {
    pub method: Method,
    /// Outer iterations of the direction-set search.
    pub max_iterations: usize,
    /// Total objective evaluations across all phases.
    pub max_evaluations: usize,
    /// Relative decrease per outer iteration below which the search stops.
    pub f_tolerance: f64,
    pub line_search: LineSearchConfig,
    /// Step scale for location dimensions, in world units.
    pub location_step: f64,
    /// Step scale for rotation dimensions, in degrees.
    pub rotation_step: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            method: Method::Powell,
            max_iterations: 100,
            max_evaluations: 20_000,
            f_tolerance: 1e-6,
            line_search: LineSearchConfig::default(),
            location_step: 1.0,
            rotation_step: 15.0,
        }
    }
}

fn positive(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            parameter,
            reason: format!("must be finite and positive, got {value}"),
        })
    }
}

fn non_zero(parameter: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::InvalidValue {
            parameter,
            reason: "must be at least 1".to_string(),
        })
    } else {
        Ok(())
    }
}

impl SolverConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_zero("max_iterations", self.max_iterations)?;
        non_zero("max_evaluations", self.max_evaluations)?;
        positive("f_tolerance", self.f_tolerance)?;
        positive("line_search.initial_step", self.line_search.initial_step)?;
        positive("line_search.x_tolerance", self.line_search.x_tolerance)?;
        non_zero("line_search.max_iterations", self.line_search.max_iterations)?;
        positive("location_step", self.location_step)?;
        positive("rotation_step", self.rotation_step)?;

        if let Method::Annealing(annealing) = &self.method {
            positive("annealing.initial_temperature", annealing.initial_temperature)?;
            positive("annealing.final_temperature", annealing.final_temperature)?;
            positive("annealing.step_size", annealing.step_size)?;
            non_zero(
                "annealing.steps_per_temperature",
                annealing.steps_per_temperature,
            )?;
            if annealing.final_temperature >= annealing.initial_temperature {
                return Err(ConfigError::InvalidValue {
                    parameter: "annealing.final_temperature",
                    reason: "must be below the initial temperature".to_string(),
                });
            }
            if !(annealing.cooling_rate > 0.0 && annealing.cooling_rate < 1.0) {
                return Err(ConfigError::InvalidValue {
                    parameter: "annealing.cooling_rate",
                    reason: format!("must lie in (0, 1), got {}", annealing.cooling_rate),
                });
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct SolverConfigBuilder {
    method: Option<Method>,
    max_iterations: Option<usize>,
    max_evaluations: Option<usize>,
    f_tolerance: Option<f64>,
    line_search: Option<LineSearchConfig>,
    location_step: Option<f64>,
    rotation_step: Option<f64>,
}

impl SolverConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }
    pub fn max_evaluations(mut self, evaluations: usize) -> Self {
        self.max_evaluations = Some(evaluations);
        self
    }
    pub fn f_tolerance(mut self, tolerance: f64) -> Self {
        self.f_tolerance = Some(tolerance);
        self
    }
    pub fn line_search(mut self, line_search: LineSearchConfig) -> Self {
        self.line_search = Some(line_search);
        self
    }
    pub fn location_step(mut self, step: f64) -> Self {
        self.location_step = Some(step);
        self
    }
    pub fn rotation_step(mut self, step: f64) -> Self {
        self.rotation_step = Some(step);
        self
    }

    /// Builds the configuration. The evaluation budget has no default here;
    /// every other field falls back to [`SolverConfig::default`].
    pub fn build(self) -> Result<SolverConfig, ConfigError> {
        let defaults = SolverConfig::default();
        let config = SolverConfig {
            method: self.method.unwrap_or(defaults.method),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            max_evaluations: self
                .max_evaluations
                .ok_or(ConfigError::MissingParameter("max_evaluations"))?,
            f_tolerance: self.f_tolerance.unwrap_or(defaults.f_tolerance),
            line_search: self.line_search.unwrap_or(defaults.line_search),
            location_step: self.location_step.unwrap_or(defaults.location_step),
            rotation_step: self.rotation_step.unwrap_or(defaults.rotation_step),
        };
        config.validate()?;
        Ok(config)
    }
}
