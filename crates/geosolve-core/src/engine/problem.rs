use super::config::SolverConfig;
use super::error::EngineError;
use super::minimizer::{self, SearchSpace};
use super::progress::{Progress, ProgressReporter};
use crate::core::constraints::Constraint;
use crate::core::geometry::OPTIMIZABLE_WIDTH;
use crate::core::geometry::rotation::canonical_degrees;
use crate::core::models::ids::BoxId;
use crate::core::models::scene::Scene;
use tracing::{info, instrument};

/// Region the centers of optimizable boxes are confined to during a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
    /// Upper limit for the z coordinate; the floor is at zero.
    pub z_max: f64,
}

impl SceneBounds {
    pub fn new(x: (f64, f64), y: (f64, f64), z_max: f64) -> Result<Self, EngineError> {
        let ordered = |(lo, hi): (f64, f64)| lo.is_finite() && hi.is_finite() && lo <= hi;
        if !ordered(x) {
            return Err(EngineError::InvalidBounds(format!("x range {x:?} is not ordered")));
        }
        if !ordered(y) {
            return Err(EngineError::InvalidBounds(format!("y range {y:?} is not ordered")));
        }
        if !(z_max.is_finite() && z_max >= 0.0) {
            return Err(EngineError::InvalidBounds(format!(
                "z_max must be finite and non-negative, got {z_max}"
            )));
        }
        Ok(Self { x, y, z_max })
    }

    /// Per-dimension limits for one box, in optimizable-vector layout.
    fn limits(&self) -> [(f64, f64); OPTIMIZABLE_WIDTH] {
        let free = (f64::NEG_INFINITY, f64::INFINITY);
        [self.x, self.y, (0.0, self.z_max), free, free, free]
    }
}

/// Outcome of [`Problem::solve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport {
    pub initial_badness: f64,
    pub final_badness: f64,
    pub evaluations: usize,
}

/// A weighted set of constraints and the boxes allowed to move.
///
/// Boxes referenced by constraints but not registered as optimizable keep
/// their state and act as fixed context. Registration order fixes the layout of
/// the decision vector.
#[derive(Debug, Clone, Default)]
pub struct Problem {
    objects: Vec<(String, BoxId)>,
    constraints: Vec<(Constraint, f64)>,
    bounds: Option<SceneBounds>,
}

impl Problem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(bounds: SceneBounds) -> Self {
        Self {
            bounds: Some(bounds),
            ..Self::default()
        }
    }

    pub fn bounds(&self) -> Option<&SceneBounds> {
        self.bounds.as_ref()
    }

    /// Registers `box_id` as optimizable under the identifier `id`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateObjectId`] or [`EngineError::DuplicateBox`]
    /// if either the identifier or the box is already registered.
    pub fn add_optimizable_object(
        &mut self,
        id: impl Into<String>,
        box_id: BoxId,
    ) -> Result<(), EngineError> {
        let id = id.into();
        if self.objects.iter().any(|(existing, _)| *existing == id) {
            return Err(EngineError::DuplicateObjectId(id));
        }
        if let Some((existing, _)) = self.objects.iter().find(|(_, b)| *b == box_id) {
            return Err(EngineError::DuplicateBox {
                box_id,
                existing: existing.clone(),
            });
        }
        self.objects.push((id, box_id));
        Ok(())
    }

    pub fn optimizable_object(&self, id: &str) -> Option<BoxId> {
        self.objects
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, box_id)| *box_id)
    }

    pub fn optimizable_objects(&self) -> impl Iterator<Item = (&str, BoxId)> {
        self.objects.iter().map(|(id, box_id)| (id.as_str(), *box_id))
    }

    /// # Errors
    ///
    /// Returns [`EngineError::InvalidWeight`] unless `weight` is finite and
    /// non-negative.
    pub fn add_constraint(&mut self, constraint: Constraint, weight: f64) -> Result<(), EngineError> {
        if !(weight.is_finite() && weight >= 0.0) {
            return Err(EngineError::InvalidWeight(weight));
        }
        self.constraints.push((constraint, weight));
        Ok(())
    }

    pub fn constraints(&self) -> &[(Constraint, f64)] {
        &self.constraints
    }

    /// Length of the decision vector.
    pub fn dimension(&self) -> usize {
        self.objects.len() * OPTIMIZABLE_WIDTH
    }

    /// Concatenates the optimizable vectors of all registered boxes.
    pub fn flatten(&self, scene: &Scene) -> Result<Vec<f64>, EngineError> {
        if self.objects.is_empty() {
            return Err(EngineError::EmptyRegistry);
        }
        let mut values = Vec::with_capacity(self.dimension());
        for &(_, box_id) in &self.objects {
            let cuboid = scene.get(box_id).ok_or(EngineError::BoxNotFound(box_id))?;
            values.extend_from_slice(&cuboid.optimizable_vector());
        }
        Ok(values)
    }

    /// Writes a decision vector back into the registered boxes.
    pub fn unflatten(&self, scene: &mut Scene, values: &[f64]) -> Result<(), EngineError> {
        if values.len() != self.dimension() {
            return Err(EngineError::VectorLength {
                expected: self.dimension(),
                actual: values.len(),
            });
        }
        for (&(_, box_id), chunk) in self.objects.iter().zip(values.chunks_exact(OPTIMIZABLE_WIDTH)) {
            scene
                .get_mut(box_id)
                .ok_or(EngineError::BoxNotFound(box_id))?
                .apply_optimizable_vector(chunk)?;
        }
        Ok(())
    }

    /// Weighted badness of the scene as it stands.
    pub fn total_badness(&self, scene: &Scene) -> Result<f64, EngineError> {
        self.constraints
            .iter()
            .try_fold(0.0, |total, (constraint, weight)| {
                Ok(total + weight * constraint.badness(scene)?)
            })
    }

    /// Unweighted badness of every constraint, in registration order.
    pub fn constraint_badness(&self, scene: &Scene) -> Result<Vec<f64>, EngineError> {
        self.constraints
            .iter()
            .map(|(constraint, _)| Ok(constraint.badness(scene)?))
            .collect()
    }

    /// Applies `values` to the scene, then scores it.
    pub fn objective(&self, scene: &mut Scene, values: &[f64]) -> Result<f64, EngineError> {
        self.unflatten(scene, values)?;
        self.total_badness(scene)
    }

    /// Seed, bounds and step scales for the current scene state.
    pub fn search_space(&self, scene: &Scene, config: &SolverConfig) -> Result<SearchSpace, EngineError> {
        let seed = self.flatten(scene)?;
        let limits = self.bounds.map(|b| b.limits());
        let free = (f64::NEG_INFINITY, f64::INFINITY);
        let bounds = (0..seed.len())
            .map(|i| limits.map_or(free, |l| l[i % OPTIMIZABLE_WIDTH]))
            .collect();
        let scales = (0..seed.len())
            .map(|i| {
                if i % OPTIMIZABLE_WIDTH < 3 {
                    config.location_step
                } else {
                    config.rotation_step
                }
            })
            .collect();
        Ok(SearchSpace {
            seed,
            bounds,
            scales,
        })
    }

    pub fn solve(&self, scene: &mut Scene, config: &SolverConfig) -> Result<SolveReport, EngineError> {
        self.solve_with_progress(scene, config, &ProgressReporter::new())
    }

    /// Searches for a lower-badness arrangement of the optimizable boxes and
    /// leaves the best one found in `scene`.
    ///
    /// The search starts from the current state, so repeated calls refine the
    /// previous result and never increase the total badness. Rotations are
    /// wrapped into `(-180, 180]` afterwards when that does not raise badness.
    #[instrument(skip_all, name = "solve")]
    pub fn solve_with_progress(
        &self,
        scene: &mut Scene,
        config: &SolverConfig,
        reporter: &ProgressReporter,
    ) -> Result<SolveReport, EngineError> {
        config.validate()?;
        let space = self.search_space(scene, config)?;
        let initial_badness = self.total_badness(scene)?;

        reporter.report(Progress::PhaseStart { name: "Solve" });
        info!(
            objects = self.objects.len(),
            constraints = self.constraints.len(),
            dimension = space.dimension(),
            initial_badness,
            "Starting solve."
        );

        let minimum = minimizer::minimize(
            |values: &[f64]| self.objective(scene, values),
            &space,
            config,
            reporter,
        )?;

        if minimum.value <= initial_badness {
            self.unflatten(scene, &minimum.x)?;
        } else {
            self.unflatten(scene, &space.seed)?;
        }
        self.canonicalize_rotations(scene)?;
        let final_badness = self.total_badness(scene)?;

        info!(
            final_badness,
            evaluations = minimum.evaluations,
            "Solve finished."
        );
        reporter.report(Progress::PhaseFinish);

        Ok(SolveReport {
            initial_badness,
            final_badness,
            evaluations: minimum.evaluations,
        })
    }

    fn canonicalize_rotations(&self, scene: &mut Scene) -> Result<(), EngineError> {
        let before = self.flatten(scene)?;
        let badness_before = self.total_badness(scene)?;

        let mut wrapped = before.clone();
        for (i, value) in wrapped.iter_mut().enumerate() {
            if i % OPTIMIZABLE_WIDTH >= 3 {
                *value = canonical_degrees(*value);
            }
        }
        if wrapped == before {
            return Ok(());
        }
        if self.objective(scene, &wrapped)? > badness_before {
            self.unflatten(scene, &before)?;
        }
        Ok(())
    }
}
