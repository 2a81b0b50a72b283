use super::Evaluator;
use crate::engine::config::LineSearchConfig;

/// The golden ratio: φ = (1 + √5) / 2
const PHI: f64 = 1.618_033_988_749_895;

/// The inverse golden ratio: 1/φ = φ - 1
const INV_PHI: f64 = PHI - 1.0;

/// Best step found along a line. A step of zero means no improvement on the
/// starting value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMinimum {
    pub step: f64,
    pub value: f64,
}

/// Golden section search bracket with two interior points.
#[derive(Debug, Clone, Copy)]
struct GoldenBracket {
    left: f64,
    right: f64,
    inner_left: f64,
    inner_right: f64,
}

impl GoldenBracket {
    fn new(bracket: [f64; 2]) -> Self {
        let [a, b] = bracket;
        let (left, right) = if a <= b { (a, b) } else { (b, a) };
        let width = right - left;
        Self {
            left,
            right,
            inner_left: left + (1.0 - INV_PHI) * width,
            inner_right: left + INV_PHI * width,
        }
    }

    fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Shrinks to `[left, inner_right]`; the old `inner_left` becomes `inner_right`.
    fn shrink_right(&mut self) {
        self.right = self.inner_right;
        self.inner_right = self.inner_left;
        self.inner_left = self.left + (1.0 - INV_PHI) * self.width();
    }

    /// Shrinks to `[inner_left, right]`; the old `inner_right` becomes `inner_left`.
    fn shrink_left(&mut self) {
        self.left = self.inner_left;
        self.inner_left = self.inner_right;
        self.inner_right = self.left + INV_PHI * self.width();
    }
}

/// Range of steps `t` keeping `x + t * direction` inside `bounds`.
///
/// The range always contains zero, so a start point sitting on a bound can
/// still move inward.
pub fn feasible_steps(x: &[f64], direction: &[f64], bounds: &[(f64, f64)]) -> (f64, f64) {
    let mut t_min = f64::NEG_INFINITY;
    let mut t_max = f64::INFINITY;
    for ((&xi, &di), &(lower, upper)) in x.iter().zip(direction).zip(bounds) {
        if di == 0.0 {
            continue;
        }
        let (a, b) = ((lower - xi) / di, (upper - xi) / di);
        let (lo, hi) = if di > 0.0 { (a, b) } else { (b, a) };
        t_min = t_min.max(lo);
        t_max = t_max.min(hi);
    }
    (t_min.min(0.0), t_max.max(0.0))
}

/// A line through `origin` along `direction`, evaluated through the shared
/// evaluator.
struct Line<'a, F> {
    evaluator: &'a mut Evaluator<F>,
    origin: &'a [f64],
    direction: &'a [f64],
    bounds: &'a [(f64, f64)],
    point: Vec<f64>,
    best: LineMinimum,
}

impl<F, E> Line<'_, F>
where
    F: FnMut(&[f64]) -> Result<f64, E>,
{
    fn at(&mut self, step: f64) -> Result<f64, E> {
        for (i, value) in self.point.iter_mut().enumerate() {
            let (lower, upper) = self.bounds[i];
            *value = (self.origin[i] + step * self.direction[i]).clamp(lower, upper);
        }
        let value = self.evaluator.evaluate(&self.point)?;
        if value < self.best.value {
            self.best = LineMinimum { step, value };
        }
        Ok(value)
    }

    /// Walks from zero towards `limit` (signed), growing each step by the golden
    /// ratio while the objective keeps decreasing. Returns the bracket found.
    fn expand(
        &mut self,
        first: f64,
        value_at_first: f64,
        limit: f64,
        max_iterations: usize,
    ) -> Result<Option<[f64; 2]>, E> {
        let (mut a, mut b, mut fb) = (0.0, first, value_at_first);
        for _ in 0..max_iterations {
            if b == limit || self.evaluator.exhausted() {
                return Ok(None);
            }
            let grown = b + PHI * (b - a);
            let c = if limit > 0.0 { grown.min(limit) } else { grown.max(limit) };
            let fc = self.at(c)?;
            if fc >= fb {
                return Ok(Some([a, c]));
            }
            (a, b, fb) = (b, c, fc);
        }
        Ok(None)
    }
}

/// Minimizes along `direction` from `x`, where `f0` is the objective at `x`.
///
/// A minimum is first bracketed by golden expansion inside the feasible step
/// range, then narrowed by golden-section search. The best evaluated step is
/// returned, never one worse than `f0`.
pub fn search<F, E>(
    evaluator: &mut Evaluator<F>,
    x: &[f64],
    direction: &[f64],
    f0: f64,
    bounds: &[(f64, f64)],
    config: &LineSearchConfig,
) -> Result<LineMinimum, E>
where
    F: FnMut(&[f64]) -> Result<f64, E>,
{
    let (t_min, t_max) = feasible_steps(x, direction, bounds);
    let mut line = Line {
        evaluator,
        origin: x,
        direction,
        bounds,
        point: x.to_vec(),
        best: LineMinimum {
            step: 0.0,
            value: f0,
        },
    };
    if t_min == t_max {
        return Ok(line.best);
    }

    let forward = config.initial_step.min(t_max);
    let backward = (-config.initial_step).max(t_min);

    let f_forward = if forward > 0.0 { line.at(forward)? } else { f64::INFINITY };
    let bracket = if f_forward < f0 {
        line.expand(forward, f_forward, t_max, config.max_iterations)?
    } else {
        let f_backward = if backward < 0.0 { line.at(backward)? } else { f64::INFINITY };
        if f_backward < f0 {
            line.expand(backward, f_backward, t_min, config.max_iterations)?
        } else {
            Some([backward.min(0.0), forward.max(0.0)])
        }
    };

    let Some(bracket) = bracket else {
        return Ok(line.best);
    };

    let mut golden = GoldenBracket::new(bracket);
    let mut f_left = line.at(golden.inner_left)?;
    let mut f_right = line.at(golden.inner_right)?;
    for _ in 0..config.max_iterations {
        if golden.width() <= config.x_tolerance || line.evaluator.exhausted() {
            break;
        }
        if f_left <= f_right {
            golden.shrink_right();
            f_right = f_left;
            f_left = line.at(golden.inner_left)?;
        } else {
            golden.shrink_left();
            f_left = f_right;
            f_right = line.at(golden.inner_right)?;
        }
    }

    Ok(line.best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn config() -> LineSearchConfig {
        LineSearchConfig {
            initial_step: 1.0,
            x_tolerance: 1e-8,
            max_iterations: 200,
        }
    }

    fn parabola(center: f64) -> impl FnMut(&[f64]) -> Result<f64, Infallible> {
        move |x: &[f64]| Ok((x[0] - center).powi(2))
    }

    const UNBOUNDED: [(f64, f64); 1] = [(f64::NEG_INFINITY, f64::INFINITY)];

    #[test]
    fn bracket_shrinks_keep_golden_ratio() {
        let mut bracket = GoldenBracket::new([0.0, 1.0]);
        assert!((bracket.inner_left - (1.0 - INV_PHI)).abs() < 1e-12);
        let old_inner_left = bracket.inner_left;
        bracket.shrink_right();
        assert!((bracket.right - INV_PHI).abs() < 1e-12);
        assert!((bracket.inner_right - old_inner_left).abs() < 1e-12);
        assert!((bracket.inner_left - (1.0 - INV_PHI) * bracket.width()).abs() < 1e-12);
    }

    #[test]
    fn feasible_steps_respect_bounds_in_both_directions() {
        let (lo, hi) = feasible_steps(&[1.0, 0.0], &[2.0, -1.0], &[(0.0, 5.0), (-3.0, 3.0)]);
        assert!((lo - -0.5).abs() < 1e-12);
        assert!((hi - 2.0).abs() < 1e-12);

        let (lo, hi) = feasible_steps(&[0.0], &[0.0], &[(0.0, 0.0)]);
        assert_eq!((lo, hi), (f64::NEG_INFINITY, f64::INFINITY));
    }

    #[test]
    fn finds_minimum_after_forward_expansion() {
        let mut evaluator = Evaluator::new(parabola(7.3), 1_000);
        let f0 = evaluator.evaluate(&[0.0]).unwrap();
        let result = search(&mut evaluator, &[0.0], &[1.0], f0, &UNBOUNDED, &config()).unwrap();
        assert!((result.step - 7.3).abs() < 1e-4);
    }

    #[test]
    fn finds_minimum_behind_start() {
        let mut evaluator = Evaluator::new(parabola(-2.5), 1_000);
        let f0 = evaluator.evaluate(&[0.0]).unwrap();
        let result = search(&mut evaluator, &[0.0], &[1.0], f0, &UNBOUNDED, &config()).unwrap();
        assert!((result.step + 2.5).abs() < 1e-4);
    }

    #[test]
    fn refines_inside_initial_bracket() {
        let mut evaluator = Evaluator::new(parabola(0.2), 1_000);
        let f0 = evaluator.evaluate(&[0.0]).unwrap();
        let result = search(&mut evaluator, &[0.0], &[1.0], f0, &UNBOUNDED, &config()).unwrap();
        assert!((result.step - 0.2).abs() < 1e-4);
    }

    #[test]
    fn stops_at_bound() {
        let mut evaluator = Evaluator::new(parabola(10.0), 1_000);
        let f0 = evaluator.evaluate(&[0.0]).unwrap();
        let bounds = [(-1.0, 3.0)];
        let result = search(&mut evaluator, &[0.0], &[1.0], f0, &bounds, &config()).unwrap();
        assert!(result.step <= 3.0 + 1e-12);
        assert!((result.step - 3.0).abs() < 1e-4);
    }

    #[test]
    fn never_returns_worse_than_start() {
        let mut evaluator = Evaluator::new(parabola(0.0), 1_000);
        let f0 = evaluator.evaluate(&[0.0]).unwrap();
        let result = search(&mut evaluator, &[0.0], &[1.0], f0, &UNBOUNDED, &config()).unwrap();
        assert_eq!(result.value, f0);
    }
}
