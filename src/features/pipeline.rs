//! Feature extraction: trajectory → speed profile → fixed four-feature vector.

use super::kinematics::{duration_from_timestamps, SpeedProfile};
use super::FeatureVector;
use crate::error::{Error, Result};
use crate::session::{Point, PredictInput, Session};
use tracing::debug;

/// Fewest points a trajectory may have.
pub const MIN_POINTS: usize = 2;

/// Stateless extractor; cheap to copy into every consumer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract features from a trajectory. `duration_hint` (seconds) overrides the
    /// timestamp-derived session duration.
    pub fn extract(&self, points: &[Point], duration_hint: Option<f64>) -> Result<FeatureVector> {
        if points.len() < MIN_POINTS {
            return Err(Error::InsufficientData {
                required: MIN_POINTS,
                actual: points.len(),
            });
        }

        let profile = SpeedProfile::from_points(points);
        let (Some(std_speed), Some(max_speed)) = (profile.std(), profile.max()) else {
            return Err(Error::DegenerateSession {
                points: points.len(),
            });
        };

        let session_duration = duration_hint.unwrap_or_else(|| duration_from_timestamps(points));

        debug!(
            num_points = points.len(),
            speed_samples = profile.len(),
            skipped_pairs = profile.skipped_pairs,
            "extracted features"
        );

        Ok(FeatureVector {
            std_speed,
            max_speed,
            num_points: points.len(),
            session_duration,
        })
    }

    pub fn extract_session(&self, session: &Session) -> Result<FeatureVector> {
        self.extract(&session.movements, session.duration_hint())
    }

    pub fn extract_input(&self, input: &PredictInput) -> Result<FeatureVector> {
        self.extract(input.points(), input.duration_hint())
    }
}

/// Free-function form of [`FeatureExtractor::extract`].
pub fn extract(points: &[Point], duration_hint: Option<f64>) -> Result<FeatureVector> {
    FeatureExtractor.extract(points, duration_hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionKind;

    fn line() -> Vec<Point> {
        (0..5)
            .map(|i| Point::new(i as f64 * 10.0, 0.0, i * 100))
            .collect()
    }

    #[test]
    fn straight_line_scenario() {
        let fv = extract(&line(), None).unwrap();
        assert_eq!(fv.num_points, 5);
        assert!(fv.std_speed.abs() < 1e-9);
        assert!((fv.max_speed - 100.0).abs() < 1e-9);
        assert!((fv.session_duration - 0.4).abs() < 1e-12);
    }

    #[test]
    fn hint_overrides_duration() {
        let fv = extract(&line(), Some(3.0)).unwrap();
        assert_eq!(fv.session_duration, 3.0);
    }

    #[test]
    fn single_point_is_insufficient() {
        let err = extract(&[Point::new(1.0, 1.0, 0)], None).unwrap_err();
        assert!(matches!(err, Error::InsufficientData { required: 2, actual: 1 }));
        assert!(matches!(extract(&[], None), Err(Error::InsufficientData { .. })));
    }

    #[test]
    fn extreme_timestamps_extract() {
        let pts = [Point::new(0.0, 0.0, i64::MIN + 1), Point::new(3.0, 4.0, i64::MAX)];
        let fv = extract(&pts, None).unwrap();
        assert_eq!(fv.num_points, 2);
        assert!(fv.session_duration > 0.0 && fv.session_duration.is_finite());
        assert_eq!(fv.std_speed, 0.0);
    }

    #[test]
    fn all_zero_deltas_are_degenerate() {
        let pts = vec![Point::new(0.0, 0.0, 10), Point::new(5.0, 5.0, 10), Point::new(9.0, 1.0, 10)];
        assert!(matches!(
            extract(&pts, None),
            Err(Error::DegenerateSession { points: 3 })
        ));
    }

    #[test]
    fn num_points_counts_skipped_points() {
        let pts = vec![
            Point::new(0.0, 0.0, 0),
            Point::new(1.0, 0.0, 0),
            Point::new(2.0, 0.0, 100),
        ];
        let fv = extract(&pts, None).unwrap();
        assert_eq!(fv.num_points, 3);
        assert!((fv.max_speed - 10.0).abs() < 1e-9);
        assert_eq!(fv.std_speed, 0.0);
    }

    #[test]
    fn session_uses_metadata_hint() {
        let s = Session::new("human_001", SessionKind::Human, line()).with_duration(7.5);
        let fv = FeatureExtractor::new().extract_session(&s).unwrap();
        assert_eq!(fv.session_duration, 7.5);

        let bare = PredictInput::Bare(line());
        assert!((FeatureExtractor::new().extract_input(&bare).unwrap().session_duration - 0.4).abs() < 1e-12);
    }
}
