//! Predictor input: either a bare point sequence or a full session record.

use super::{Point, Session};
use crate::error::{Error, Result};
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum PredictInput {
    Bare(Vec<Point>),
    Session(Session),
}

impl PredictInput {
    pub fn points(&self) -> &[Point] {
        match self {
            PredictInput::Bare(points) => points,
            PredictInput::Session(s) => &s.movements,
        }
    }

    /// Only a wrapped session carries a duration hint.
    pub fn duration_hint(&self) -> Option<f64> {
        match self {
            PredictInput::Bare(_) => None,
            PredictInput::Session(s) => s.duration_hint(),
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        match self {
            PredictInput::Bare(_) => None,
            PredictInput::Session(s) => Some(&s.session_id),
        }
    }

    /// A JSON array is a bare trajectory, a JSON object is a session record.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(_) => Ok(PredictInput::Bare(serde_json::from_value(value)?)),
            Value::Object(_) => Ok(PredictInput::Session(serde_json::from_value(value)?)),
            other => Err(Error::Schema(format!(
                "predictor input must be a point array or a session object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ArtifactNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

impl From<Session> for PredictInput {
    fn from(s: Session) -> Self {
        PredictInput::Session(s)
    }
}

impl From<Vec<Point>> for PredictInput {
    fn from(points: Vec<Point>) -> Self {
        PredictInput::Bare(points)
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_is_bare_trajectory() {
        let input = PredictInput::from_json_str(r#"[{"x":0,"y":0,"t":0},{"x":1,"y":1,"t":5}]"#).unwrap();
        assert!(matches!(input, PredictInput::Bare(_)));
        assert_eq!(input.points().len(), 2);
        assert_eq!(input.duration_hint(), None);
    }

    #[test]
    fn object_is_session_with_hint() {
        let input = PredictInput::from_json_str(
            r#"{"session_id":"bot_001","type":"bot","metadata":{"session_duration":2.5},
                "movements":[{"x":0,"y":0,"t":0},{"x":1,"y":1,"t":5}]}"#,
        )
        .unwrap();
        assert_eq!(input.session_id(), Some("bot_001"));
        assert_eq!(input.duration_hint(), Some(2.5));
    }

    #[test]
    fn scalar_is_rejected() {
        assert!(matches!(PredictInput::from_json_str("42"), Err(Error::Schema(_))));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = PredictInput::load(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, Error::ArtifactNotFound(_)));
    }
}
