//! Session interchange: a JSON array of session records.

use super::Session;
use crate::error::{Error, Result};
use crate::storage;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

/// Parse a session document. Unknown `type` values and duplicate ids are schema errors.
pub fn parse_sessions(raw: &str) -> Result<Vec<Session>> {
    let doc: Value = serde_json::from_str(raw)?;
    let Value::Array(items) = doc else {
        return Err(Error::Schema("session document must be a JSON array".into()));
    };

    let mut seen = HashSet::with_capacity(items.len());
    let mut sessions = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let id = item
            .get("session_id")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| format!("#{}", i));
        let session: Session = serde_json::from_value(item)
            .map_err(|e| Error::Schema(format!("session {}: {}", id, e)))?;
        if !seen.insert(session.session_id.clone()) {
            return Err(Error::Schema(format!("duplicate session_id {}", session.session_id)));
        }
        sessions.push(session);
    }
    Ok(sessions)
}

pub fn load_sessions(path: &Path) -> Result<Vec<Session>> {
    if !path.exists() {
        return Err(Error::ArtifactNotFound(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path)?;
    let sessions = parse_sessions(&raw)?;
    tracing::info!(path = %path.display(), count = sessions.len(), "loaded sessions");
    Ok(sessions)
}

pub fn save_sessions(path: &Path, sessions: &[Session]) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(sessions)?;
    storage::write_atomic(path, &bytes)?;
    tracing::info!(path = %path.display(), count = sessions.len(), "saved sessions");
    Ok(())
}
