//! Per-step speed samples over a trajectory and the statistics derived from them.

use crate::session::Point;

/// Speed samples (pixels/second) between consecutive points.
///
/// Pairs whose elapsed time is not positive emit no sample and are counted in
/// `skipped_pairs`. The sample count is `points - 1 - skipped_pairs`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeedProfile {
    pub samples: Vec<f64>,
    pub skipped_pairs: usize,
}

impl SpeedProfile {
    pub fn from_points(points: &[Point]) -> Self {
        let mut profile = SpeedProfile {
            samples: Vec::with_capacity(points.len().saturating_sub(1)),
            skipped_pairs: 0,
        };
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let dt = elapsed_secs(a.t, b.t);
            if dt > 0.0 {
                let (dx, dy) = (b.x - a.x, b.y - a.y);
                let dist = (dx * dx + dy * dy).sqrt();
                profile.samples.push(dist / dt);
            } else {
                profile.skipped_pairs += 1;
            }
        }
        profile
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Population standard deviation; `None` when there are no samples.
    pub fn std(&self) -> Option<f64> {
        population_std(&self.samples)
    }

    pub fn max(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::max)
    }
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub(crate) fn population_std(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// Seconds from `from` to `to` (milliseconds). Computed in f64 so any pair of
/// `i64` timestamps is representable.
fn elapsed_secs(from: i64, to: i64) -> f64 {
    (to as f64 - from as f64) / 1000.0
}

/// Session length in seconds from the first and last timestamps; 0 below two points.
pub fn duration_from_timestamps(points: &[Point]) -> f64 {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() >= 2 => elapsed_secs(first.t, last.t),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, t: i64) -> Point {
        Point::new(x, y, t)
    }

    #[test]
    fn constant_speed_has_zero_std() {
        let pts: Vec<Point> = (0..5).map(|i| p(i as f64 * 10.0, 0.0, i * 100)).collect();
        let prof = SpeedProfile::from_points(&pts);
        assert_eq!(prof.len(), 4);
        assert!((prof.max().unwrap() - 100.0).abs() < 1e-9);
        assert!(prof.std().unwrap().abs() < 1e-9);
    }

    #[test]
    fn zero_and_negative_deltas_are_skipped() {
        let pts = [p(0.0, 0.0, 0), p(3.0, 4.0, 0), p(6.0, 8.0, 1000), p(9.0, 12.0, 500)];
        let prof = SpeedProfile::from_points(&pts);
        assert_eq!(prof.samples, vec![5.0]);
        assert_eq!(prof.skipped_pairs, 2);
    }

    #[test]
    fn extreme_timestamps_do_not_overflow() {
        let pts = [p(0.0, 0.0, i64::MIN + 1), p(3.0, 4.0, i64::MAX)];
        let prof = SpeedProfile::from_points(&pts);
        assert_eq!(prof.len(), 1);
        assert_eq!(prof.skipped_pairs, 0);
        assert!(prof.samples[0].is_finite() && prof.samples[0] > 0.0);

        let dur = duration_from_timestamps(&pts);
        assert!((dur - 2.0 * i64::MAX as f64 / 1000.0).abs() / dur < 1e-12);

        let backwards = [p(0.0, 0.0, i64::MAX), p(3.0, 4.0, i64::MIN)];
        assert_eq!(SpeedProfile::from_points(&backwards).skipped_pairs, 1);
    }

    #[test]
    fn population_not_sample_std() {
        assert_eq!(population_std(&[2.0, 4.0]), Some(1.0));
        assert_eq!(population_std(&[]), None);
    }

    #[test]
    fn duration_below_two_points_is_zero() {
        assert_eq!(duration_from_timestamps(&[]), 0.0);
        assert_eq!(duration_from_timestamps(&[p(0.0, 0.0, 500)]), 0.0);
        assert_eq!(duration_from_timestamps(&[p(0.0, 0.0, 500), p(1.0, 1.0, 1750)]), 1.25);
    }
}
