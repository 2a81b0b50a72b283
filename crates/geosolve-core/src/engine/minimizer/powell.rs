use super::line_search::{self, feasible_steps};
use super::{Evaluator, SearchSpace};
use crate::engine::config::SolverConfig;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::debug;

const TINY: f64 = 1e-25;

fn step_along(x: &mut [f64], direction: &[f64], step: f64, space: &SearchSpace) {
    for (xi, di) in x.iter_mut().zip(direction) {
        *xi += step * di;
    }
    space.clamp(x);
}

/// Powell's conjugate direction method, starting from `start`.
///
/// The direction set begins as the coordinate axes scaled by the search
/// space's step scales. After each sweep the net displacement replaces the
/// direction that gave the largest decrease, unless doing so would make the set
/// degenerate.
pub fn run<F, E>(
    evaluator: &mut Evaluator<F>,
    space: &SearchSpace,
    start: &[f64],
    config: &SolverConfig,
    reporter: &ProgressReporter,
) -> Result<(), E>
where
    F: FnMut(&[f64]) -> Result<f64, E>,
{
    let n = start.len();
    let mut directions: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            let mut direction = vec![0.0; n];
            direction[i] = space.scales[i];
            direction
        })
        .collect();

    let mut x = start.to_vec();
    space.clamp(&mut x);
    let mut fx = evaluator.evaluate(&x)?;
    if n == 0 {
        return Ok(());
    }

    for iteration in 0..config.max_iterations {
        if evaluator.exhausted() {
            break;
        }
        let (x_start, f_start) = (x.clone(), fx);
        let (mut largest_drop, mut largest_index) = (0.0, 0);

        for (i, direction) in directions.iter().enumerate() {
            let f_before = fx;
            let found = line_search::search(
                evaluator,
                &x,
                direction,
                fx,
                &space.bounds,
                &config.line_search,
            )?;
            if found.value < fx {
                step_along(&mut x, direction, found.step, space);
                fx = found.value;
            }
            if f_before - fx > largest_drop {
                largest_drop = f_before - fx;
                largest_index = i;
            }
            if evaluator.exhausted() {
                break;
            }
        }

        debug!(iteration, best = fx, "Powell sweep finished.");
        reporter.report(Progress::Iteration {
            index: iteration,
            best: fx,
        });

        if 2.0 * (f_start - fx) <= config.f_tolerance * (f_start.abs() + fx.abs()) + TINY {
            break;
        }
        if evaluator.exhausted() {
            break;
        }

        let displacement: Vec<f64> = x.iter().zip(&x_start).map(|(a, b)| a - b).collect();
        if displacement.iter().all(|d| *d == 0.0) {
            continue;
        }

        let mut extrapolated: Vec<f64> = x.iter().zip(&x_start).map(|(a, b)| 2.0 * a - b).collect();
        space.clamp(&mut extrapolated);
        let f_extrapolated = evaluator.evaluate(&extrapolated)?;

        if f_extrapolated < f_start {
            let t = 2.0 * (f_start - 2.0 * fx + f_extrapolated)
                * (f_start - fx - largest_drop).powi(2)
                - largest_drop * (f_start - f_extrapolated).powi(2);
            if t < 0.0 {
                let (t_min, t_max) = feasible_steps(&x, &displacement, &space.bounds);
                if t_min < t_max {
                    let found = line_search::search(
                        evaluator,
                        &x,
                        &displacement,
                        fx,
                        &space.bounds,
                        &config.line_search,
                    )?;
                    if found.value < fx {
                        step_along(&mut x, &displacement, found.step, space);
                        fx = found.value;
                    }
                }
                directions.swap_remove(largest_index);
                directions.push(displacement);
            }
        }
    }

    Ok(())
}
