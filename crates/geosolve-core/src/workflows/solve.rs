use crate::core::io::records::{ObjectRecord, SceneDocument};
use crate::core::io::registry::{HydratedScene, hydrate};
use crate::engine::config::SolverConfig;
use crate::engine::error::EngineError;
use crate::engine::problem::{Problem, SceneBounds, SolveReport};
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of solving one document.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedDocument {
    /// Objects in document order, with their solved location and rotation.
    pub objects: Vec<ObjectRecord>,
    /// Unweighted badness of every constraint after the solve, in document
    /// order.
    pub constraint_badness: Vec<f64>,
    pub report: SolveReport,
}

impl SolvedDocument {
    /// `original` with its objects replaced by the solved ones.
    pub fn to_document(&self, original: &SceneDocument) -> SceneDocument {
        SceneDocument {
            objects: self.objects.clone(),
            constraints: original.constraints.clone(),
        }
    }
}

fn build_problem(
    hydrated: HydratedScene,
    bounds: Option<SceneBounds>,
) -> Result<(HydratedScene, Problem), EngineError> {
    let mut problem = bounds.map_or_else(Problem::new, Problem::with_bounds);
    for &box_id in &hydrated.objects {
        problem.add_optimizable_object(hydrated.scene[box_id].name.clone(), box_id)?;
    }
    for (constraint, weight) in &hydrated.constraints {
        problem.add_constraint(constraint.clone(), *weight)?;
    }
    Ok((hydrated, problem))
}

/// Hydrates `document`, lets every object move and solves.
///
/// # Errors
///
/// Returns [`EngineError`] if the document does not hydrate, has no objects,
/// or the configuration is invalid.
#[instrument(skip_all, name = "solve_workflow")]
pub fn solve_document(
    document: &SceneDocument,
    bounds: Option<SceneBounds>,
    config: &SolverConfig,
    reporter: &ProgressReporter,
) -> Result<SolvedDocument, EngineError> {
    reporter.report(Progress::PhaseStart { name: "Hydration" });
    let (mut hydrated, problem) = build_problem(hydrate(document)?, bounds)?;
    reporter.report(Progress::PhaseFinish);

    let report = problem.solve_with_progress(&mut hydrated.scene, config, reporter)?;
    let constraint_badness = problem.constraint_badness(&hydrated.scene)?;
    let objects = hydrated
        .objects
        .iter()
        .map(|&box_id| ObjectRecord::from_cuboid(&hydrated.scene[box_id]))
        .collect();

    info!(
        objects = document.objects.len(),
        constraints = document.constraints.len(),
        initial_badness = report.initial_badness,
        final_badness = report.final_badness,
        "Document solved."
    );
    Ok(SolvedDocument {
        objects,
        constraint_badness,
        report,
    })
}

/// Solves independent documents, in parallel with the `parallel` feature.
///
/// Each document gets its own result, in input order; one failure does not
/// stop the others.
#[instrument(skip_all, name = "solve_batch_workflow")]
pub fn solve_batch(
    documents: &[SceneDocument],
    bounds: Option<SceneBounds>,
    config: &SolverConfig,
    reporter: &ProgressReporter,
) -> Vec<Result<SolvedDocument, EngineError>> {
    info!(documents = documents.len(), "Starting batch solve.");

    #[cfg(not(feature = "parallel"))]
    let iterator = documents.iter();

    #[cfg(feature = "parallel")]
    let iterator = documents.par_iter();

    let results: Vec<_> = iterator
        .map(|document| solve_document(document, bounds, config, reporter))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    reporter.report(Progress::Message(format!(
        "Solved {} of {} documents",
        results.len() - failed,
        results.len()
    )));
    info!(failed, "Batch solve finished.");
    results
}
