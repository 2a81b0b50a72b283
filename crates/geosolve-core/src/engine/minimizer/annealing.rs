use super::{Evaluator, SearchSpace};
use crate::engine::config::AnnealingConfig;
use crate::engine::progress::{Progress, ProgressReporter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Simulated annealing over single-coordinate moves.
///
/// Each move perturbs one random dimension by up to `step_size` times its step
/// scale. Worse moves are accepted with the Metropolis probability
/// `exp(-delta / T)`; the temperature falls geometrically from the initial to
/// the final value.
pub fn run<F, E>(
    evaluator: &mut Evaluator<F>,
    space: &SearchSpace,
    config: &AnnealingConfig,
    reporter: &ProgressReporter,
) -> Result<(), E>
where
    F: FnMut(&[f64]) -> Result<f64, E>,
{
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut current = space.seed.clone();
    space.clamp(&mut current);
    let mut f_current = evaluator.evaluate(&current)?;
    let n = current.len();
    if n == 0 {
        return Ok(());
    }

    let mut candidate = current.clone();
    let mut temperature = config.initial_temperature;
    let mut stage = 0;

    while temperature > config.final_temperature && !evaluator.exhausted() {
        let mut accepted = 0usize;
        for _ in 0..config.steps_per_temperature {
            if evaluator.exhausted() {
                break;
            }
            let dim = rng.gen_range(0..n);
            candidate.copy_from_slice(&current);
            let (lower, upper) = space.bounds[dim];
            let offset = rng.gen_range(-1.0..=1.0) * config.step_size * space.scales[dim];
            candidate[dim] = (candidate[dim] + offset).clamp(lower, upper);

            let f_candidate = evaluator.evaluate(&candidate)?;
            let delta = f_candidate - f_current;
            if delta < 0.0 || rng.r#gen::<f64>() < (-delta / temperature).exp() {
                std::mem::swap(&mut current, &mut candidate);
                f_current = f_candidate;
                accepted += 1;
            }
        }

        let best = evaluator.best().1;
        debug!(stage, temperature, accepted, best, "Annealing stage finished.");
        reporter.report(Progress::Iteration { index: stage, best });

        temperature *= config.cooling_rate;
        stage += 1;
    }

    Ok(())
}
