//! Derivative-free minimization over a box-bounded decision vector.
//!
//! Every strategy here treats the objective as a black box that may be
//! non-smooth, and returns the best vector it ever evaluated.

pub mod annealing;
pub mod line_search;
pub mod powell;

use super::config::{Method, SolverConfig};
use super::progress::ProgressReporter;
use tracing::warn;

/// Starting point, per-dimension bounds and per-dimension step scales.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSpace {
    pub seed: Vec<f64>,
    /// Inclusive `(lower, upper)` per dimension; infinite ends are unbounded.
    pub bounds: Vec<(f64, f64)>,
    /// Characteristic step per dimension.
    pub scales: Vec<f64>,
}

impl SearchSpace {
    /// An unbounded space with unit scales.
    pub fn unbounded(seed: Vec<f64>) -> Self {
        let n = seed.len();
        Self {
            seed,
            bounds: vec![(f64::NEG_INFINITY, f64::INFINITY); n],
            scales: vec![1.0; n],
        }
    }

    pub fn dimension(&self) -> usize {
        self.seed.len()
    }

    /// Projects `x` onto the bounds in place.
    pub fn clamp(&self, x: &mut [f64]) {
        for (value, &(lower, upper)) in x.iter_mut().zip(&self.bounds) {
            *value = value.clamp(lower, upper);
        }
    }
}

/// Best point found by a minimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub x: Vec<f64>,
    pub value: f64,
    pub evaluations: usize,
}

/// Wraps the objective with a strict evaluation budget and remembers the best
/// point seen.
///
/// Once the budget is spent, further requests return `+inf` without calling
/// the objective, so every caller sees them as non-improving.
pub struct Evaluator<F> {
    objective: F,
    evaluations: usize,
    max_evaluations: usize,
    best_x: Vec<f64>,
    best_value: f64,
}

impl<F, E> Evaluator<F>
where
    F: FnMut(&[f64]) -> Result<f64, E>,
{
    pub fn new(objective: F, max_evaluations: usize) -> Self {
        Self {
            objective,
            evaluations: 0,
            max_evaluations,
            best_x: Vec::new(),
            best_value: f64::INFINITY,
        }
    }

    /// Evaluates the objective at `x`. NaN results are treated as `+inf`.
    pub fn evaluate(&mut self, x: &[f64]) -> Result<f64, E> {
        if self.exhausted() {
            return Ok(f64::INFINITY);
        }
        self.evaluations += 1;
        let value = (self.objective)(x)?;
        let value = if value.is_nan() { f64::INFINITY } else { value };
        if value < self.best_value || self.best_x.is_empty() {
            self.best_value = value;
            self.best_x.clear();
            self.best_x.extend_from_slice(x);
        }
        Ok(value)
    }

    pub fn exhausted(&self) -> bool {
        self.evaluations >= self.max_evaluations
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn best(&self) -> (&[f64], f64) {
        (&self.best_x, self.best_value)
    }

    pub fn into_minimum(self) -> Minimum {
        Minimum {
            x: self.best_x,
            value: self.best_value,
            evaluations: self.evaluations,
        }
    }
}

/// Minimizes `objective` over `space` with the strategy chosen in `config`.
///
/// The seed is always evaluated first, so the returned value never exceeds the
/// objective at the seed. Errors from the objective abort the search and are
/// returned unchanged.
pub fn minimize<F, E>(
    objective: F,
    space: &SearchSpace,
    config: &SolverConfig,
    reporter: &ProgressReporter,
) -> Result<Minimum, E>
where
    F: FnMut(&[f64]) -> Result<f64, E>,
{
    let mut evaluator = Evaluator::new(objective, config.max_evaluations.max(1));

    match &config.method {
        Method::Powell => {
            powell::run(&mut evaluator, space, &space.seed, config, reporter)?;
        }
        Method::Annealing(annealing) => {
            annealing::run(&mut evaluator, space, annealing, reporter)?;
            let start = evaluator.best().0.to_vec();
            powell::run(&mut evaluator, space, &start, config, reporter)?;
        }
    }

    if evaluator.exhausted() {
        warn!(
            evaluations = evaluator.evaluations(),
            "Evaluation budget exhausted before convergence."
        );
    }
    Ok(evaluator.into_minimum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::AnnealingConfig;
    use std::convert::Infallible;

    fn sphere(x: &[f64]) -> Result<f64, Infallible> {
        Ok(x.iter().enumerate().map(|(i, v)| (v - i as f64).powi(2)).sum())
    }

    #[test]
    fn evaluator_enforces_budget_and_tracks_best() {
        let mut calls = 0;
        let mut evaluator = Evaluator::new(
            |x: &[f64]| -> Result<f64, Infallible> {
                calls += 1;
                Ok(x[0].abs())
            },
            2,
        );
        assert_eq!(evaluator.evaluate(&[3.0]).unwrap(), 3.0);
        assert_eq!(evaluator.evaluate(&[-1.0]).unwrap(), 1.0);
        assert_eq!(evaluator.evaluate(&[0.0]).unwrap(), f64::INFINITY);
        assert!(evaluator.exhausted());
        let minimum = evaluator.into_minimum();
        assert_eq!(minimum.x, vec![-1.0]);
        assert_eq!(minimum.evaluations, 2);
        assert_eq!(calls, 2);
    }

    #[test]
    fn evaluator_treats_nan_as_worst() {
        let mut evaluator = Evaluator::new(|_: &[f64]| Ok::<_, Infallible>(f64::NAN), 10);
        assert_eq!(evaluator.evaluate(&[1.0]).unwrap(), f64::INFINITY);
    }

    #[test]
    fn objective_errors_propagate() {
        let space = SearchSpace::unbounded(vec![0.0, 0.0]);
        let result = minimize(
            |_: &[f64]| Err::<f64, _>("boom"),
            &space,
            &SolverConfig::default(),
            &ProgressReporter::new(),
        );
        assert_eq!(result.unwrap_err(), "boom");
    }

    #[test]
    fn powell_finds_shifted_sphere_minimum() {
        let space = SearchSpace::unbounded(vec![5.0, -3.0, 2.0]);
        let minimum = minimize(
            sphere,
            &space,
            &SolverConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap();
        assert!(minimum.value < 1e-6, "value {}", minimum.value);
        for (i, v) in minimum.x.iter().enumerate() {
            assert!((v - i as f64).abs() < 1e-3);
        }
    }

    #[test]
    fn annealing_is_reproducible_with_seed() {
        let config = SolverConfig {
            method: Method::Annealing(AnnealingConfig {
                seed: Some(42),
                steps_per_temperature: 10,
                ..AnnealingConfig::default()
            }),
            max_evaluations: 5_000,
            ..SolverConfig::default()
        };
        let space = SearchSpace::unbounded(vec![4.0, 4.0]);
        let run = || minimize(sphere, &space, &config, &ProgressReporter::new()).unwrap();
        let (first, second) = (run(), run());
        assert_eq!(first, second);
        assert!(first.value < 1e-4);
    }

    #[test]
    fn budget_caps_evaluations() {
        let config = SolverConfig {
            max_evaluations: 25,
            ..SolverConfig::default()
        };
        let space = SearchSpace::unbounded(vec![10.0; 4]);
        let minimum = minimize(sphere, &space, &config, &ProgressReporter::new()).unwrap();
        assert!(minimum.evaluations <= 25);
        assert!(minimum.value <= sphere(&[10.0; 4]).unwrap());
    }
}
