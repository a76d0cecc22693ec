//! Tracing setup and ndjson prediction records for audit.

use crate::predict::Prediction;
use chrono::Utc;
use serde::Serialize;
use std::io::Write;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// One line per prediction attempt.
#[derive(Serialize)]
pub struct PredictionRecord<'a> {
    pub ts: String,
    pub source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

impl<'a> PredictionRecord<'a> {
    pub fn success(source: &'a str, session_id: Option<&'a str>, p: &Prediction) -> Self {
        Self {
            ts: Utc::now().to_rfc3339(),
            source,
            session_id,
            label: Some(p.label.as_str()),
            confidence: Some(p.confidence),
            bot_probability: Some(p.bot_probability),
            error: None,
        }
    }

    pub fn failure(source: &'a str, error: &'a str) -> Self {
        Self {
            ts: Utc::now().to_rfc3339(),
            source,
            session_id: None,
            label: None,
            confidence: None,
            bot_probability: None,
            error: Some(error),
        }
    }
}

pub struct StructuredLogger;

impl StructuredLogger {
    /// Install global subscriber on stderr; level from RUST_LOG or `default_level`.
    pub fn init(json: bool, default_level: &str) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        if json {
            let fmt = tracing_subscriber::fmt::layer()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_writer(std::io::stderr);
            let _ = tracing_subscriber::registry().with(filter).with(fmt).try_init();
        } else {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init();
        }
    }

    /// Emit a single structured line (e.g. a prediction record) without going through tracing
    pub fn emit_json(event: &impl Serialize, w: &mut impl Write) -> std::io::Result<()> {
        serde_json::to_writer(&mut *w, event)?;
        writeln!(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_record_omits_prediction_fields() {
        let mut out = Vec::new();
        StructuredLogger::emit_json(&PredictionRecord::failure("a.json", "insufficient data"), &mut out)
            .unwrap();
        let line = String::from_utf8(out).unwrap();
        let v: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(v["source"], "a.json");
        assert_eq!(v["error"], "insufficient data");
        assert!(v.get("label").is_none());
        assert!(line.ends_with('\n'));
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_reported() {
        let err = StructuredLogger::emit_json(&PredictionRecord::failure("a.json", "x"), &mut ClosedPipe)
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
    }
}
