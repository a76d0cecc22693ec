//! Session records and trajectory points as exchanged with the session source.
//! Fields beyond the known ones are carried through untouched.

mod input;
mod io;

pub use input::PredictInput;
pub use io::{load_sessions, parse_sessions, save_sessions};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One sampled pointer position. `t` is in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub t: i64,
}

impl Point {
    pub fn new(x: f64, y: f64, t: i64) -> Self {
        Self { x, y, t }
    }
}

/// Ground-truth class of a session. Serialized as `"human"` / `"bot"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Human,
    Bot,
}

impl SessionKind {
    /// Numeric class label: human 0, bot 1.
    pub fn label(self) -> u8 {
        match self {
            SessionKind::Human => 0,
            SessionKind::Bot => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionKind::Human => "human",
            SessionKind::Bot => "bot",
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Reported session length in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_duration: Option<f64>,
    /// Free-form fields (browser, os, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    #[serde(default)]
    pub metadata: SessionMetadata,
    pub movements: Vec<Point>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Session {
    pub fn new(session_id: impl Into<String>, kind: SessionKind, movements: Vec<Point>) -> Self {
        Self {
            session_id: session_id.into(),
            kind,
            metadata: SessionMetadata::default(),
            movements,
            extra: Map::new(),
        }
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.metadata.session_duration = Some(seconds);
        self
    }

    /// Duration hint for feature extraction, taken from metadata when present.
    pub fn duration_hint(&self) -> Option<f64> {
        self.metadata.session_duration
    }

    pub fn label(&self) -> u8 {
        self.kind.label()
    }
}
