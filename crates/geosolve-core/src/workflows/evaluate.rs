use crate::core::constraints::Constraint;
use crate::core::io::records::SceneDocument;
use crate::core::io::registry::hydrate;
use crate::core::models::scene::Scene;
use crate::engine::error::EngineError;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Weighted badness of an arrangement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// Sum over constraint kinds of the mean weighted badness within each kind.
    ///
    /// Kinds with many instances count as much as kinds with one, so a scene
    /// with twenty `NoOverlap` terms is not dominated by them.
    pub total: f64,
    /// Plain sum of weighted badness, the quantity the solver minimizes.
    pub weighted_sum: f64,
    /// Weighted badness of each constraint, grouped by kind tag in document
    /// order.
    pub by_kind: BTreeMap<String, Vec<f64>>,
}

impl Evaluation {
    /// Mean weighted badness of one kind, if any constraint of it was scored.
    pub fn kind_mean(&self, kind: &str) -> Option<f64> {
        self.by_kind.get(kind).and_then(|values| mean(values))
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

/// Scores `constraints` against the current state of `scene`.
pub fn evaluate_scene(
    scene: &Scene,
    constraints: &[(Constraint, f64)],
) -> Result<Evaluation, EngineError> {
    let mut by_kind: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (constraint, weight) in constraints {
        let value = weight * constraint.badness(scene)?;
        by_kind
            .entry(constraint.kind().tag().to_string())
            .or_default()
            .push(value);
    }

    let weighted_sum = by_kind.values().flatten().sum();
    let total = by_kind.values().filter_map(|values| mean(values)).sum();
    Ok(Evaluation {
        total,
        weighted_sum,
        by_kind,
    })
}

/// Hydrates `document` and scores it as stored.
#[instrument(skip_all, name = "evaluate_workflow")]
pub fn evaluate_document(document: &SceneDocument) -> Result<Evaluation, EngineError> {
    let hydrated = hydrate(document)?;
    let evaluation = evaluate_scene(&hydrated.scene, &hydrated.constraints)?;
    debug!(
        total = evaluation.total,
        weighted_sum = evaluation.weighted_sum,
        kinds = evaluation.by_kind.len(),
        "Scene evaluated."
    );
    Ok(evaluation)
}
