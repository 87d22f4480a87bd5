//! Sampling of the Lissajous curve.

use crate::params::LissajousParams;

/// The parameter values `t_i = start + i * step` for `i` in `0..count`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRange {
    pub start: f64,
    pub step: f64,
    pub count: usize,
}

impl Default for SampleRange {
    /// 0 to 100 inclusive in steps of 0.01.
    fn default() -> Self {
        Self {
            start: 0.0,
            step: 0.01,
            count: 10001,
        }
    }
}

impl SampleRange {
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.count).map(move |i| self.start + i as f64 * self.step)
    }
}

/// Axis limits for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Curve {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

pub fn x_at(params: &LissajousParams, t: f64) -> f64 {
    params.amplitude_x * (params.frequency_x * t + params.phase).sin()
}

pub fn y_at(params: &LissajousParams, t: f64) -> f64 {
    params.amplitude_y * (params.frequency_y * t).sin()
}

/// Evaluate both oscillations over `range`.
pub fn sample(params: &LissajousParams, range: &SampleRange) -> Curve {
    let (xs, ys) = range
        .iter()
        .map(|t| (x_at(params, t), y_at(params, t)))
        .unzip();
    Curve { xs, ys }
}

impl Curve {
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn points(&self) -> Vec<[f64; 2]> {
        self.xs.iter().zip(&self.ys).map(|(&x, &y)| [x, y]).collect()
    }

    /// Min/max of X and Y. A zero-width span is widened by one unit each way so
    /// a flat line still gets a usable view.
    pub fn bounds(&self) -> Option<Bounds> {
        let (x_min, x_max) = min_max(&self.xs)?;
        let (y_min, y_max) = min_max(&self.ys)?;
        let (x_min, x_max) = pad_degenerate(x_min, x_max);
        let (y_min, y_max) = pad_degenerate(y_min, y_max);
        Some(Bounds {
            min: [x_min, y_min],
            max: [x_max, y_max],
        })
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

fn pad_degenerate(lo: f64, hi: f64) -> (f64, f64) {
    if hi - lo > f64::EPSILON {
        (lo, hi)
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::PI;

    fn classic() -> LissajousParams {
        LissajousParams {
            amplitude_x: 10.0,
            amplitude_y: 10.0,
            frequency_x: 3.0,
            frequency_y: 2.0,
            phase: 0.0,
        }
    }

    #[test]
    fn test_known_points() {
        let params = classic();
        assert_eq!(x_at(&params, 0.0), 0.0);
        assert_eq!(y_at(&params, 0.0), 0.0);
        assert_relative_eq!(x_at(&params, PI / 6.0), 10.0, epsilon = 1e-12);
        assert_relative_eq!(y_at(&params, PI / 4.0), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_samples_follow_formulas() {
        let params = LissajousParams {
            amplitude_x: 2.5,
            amplitude_y: -4.0,
            frequency_x: 1.75,
            frequency_y: 5.0 / 3.0,
            phase: 0.7,
        };
        let range = SampleRange::default();
        let curve = sample(&params, &range);

        assert_eq!(curve.len(), 10001);
        let points = curve.points();
        assert_eq!(points.len(), 10001);
        for (i, t) in range.iter().enumerate().step_by(37) {
            assert_abs_diff_eq!(points[i][0], 2.5 * (1.75 * t + 0.7).sin(), epsilon = 1e-12);
            assert_abs_diff_eq!(points[i][1], -4.0 * (5.0 / 3.0 * t).sin(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_default_range_covers_zero_to_hundred() {
        let range = SampleRange::default();
        let ts: Vec<f64> = range.iter().collect();
        assert_eq!(ts[0], 0.0);
        assert_relative_eq!(ts[1], 0.01);
        assert_relative_eq!(*ts.last().unwrap(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sampling_is_idempotent() {
        let params = classic();
        let range = SampleRange::default();
        assert_eq!(sample(&params, &range), sample(&params, &range));
    }

    #[test]
    fn test_bounds_track_amplitudes() {
        let curve = sample(&classic(), &SampleRange::default());
        let bounds = curve.bounds().unwrap();
        assert_abs_diff_eq!(bounds.min[0], -10.0, epsilon = 1e-2);
        assert_abs_diff_eq!(bounds.max[0], 10.0, epsilon = 1e-2);
        assert_abs_diff_eq!(bounds.min[1], -10.0, epsilon = 1e-2);
        assert_abs_diff_eq!(bounds.max[1], 10.0, epsilon = 1e-2);
    }

    #[test]
    fn test_flat_curve_bounds_are_padded() {
        let params = LissajousParams {
            amplitude_x: 0.0,
            ..classic()
        };
        let bounds = sample(&params, &SampleRange::default()).bounds().unwrap();
        assert_eq!(bounds.min[0], -1.0);
        assert_eq!(bounds.max[0], 1.0);
    }

    #[test]
    fn test_empty_range() {
        let range = SampleRange {
            count: 0,
            ..SampleRange::default()
        };
        let curve = sample(&classic(), &range);
        assert!(curve.is_empty());
        assert!(curve.points().is_empty());
        assert_eq!(curve.bounds(), None);
    }

    #[test]
    fn test_non_finite_inputs_do_not_panic() {
        let params = LissajousParams {
            frequency_x: f64::NAN,
            ..classic()
        };
        let curve = sample(&params, &SampleRange { start: 0.0, step: 1.0, count: 3 });
        let points = curve.points();
        assert!(points.iter().all(|p| p[0].is_nan()));
        assert_eq!(points[0][1], 0.0);
    }
}
