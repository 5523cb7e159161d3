use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{DecisionRecord, MemberProfile, Progress};

/// Reasons a model response could not be turned into a typed record
#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("no {0} span found in model output")]
    NoJsonSpan(&'static str),
    #[error("model output is not valid json: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("model output does not match the expected shape: {0}")]
    SchemaMismatch(String),
}

/// Greedy span from the first `open` to the last `close`, inclusive.
///
/// Over-captures when narration around the payload contains the same
/// delimiters; callers rely on the parse fallback in that case.
pub fn extract_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Parse a member profile out of raw model output
pub fn parse_profile(raw: &str) -> Result<MemberProfile, ParseFailure> {
    let span = extract_span(raw, '{', '}').ok_or(ParseFailure::NoJsonSpan("{...}"))?;
    let value: Value = serde_json::from_str(span)?;
    let wire: WireProfile =
        serde_json::from_value(value).map_err(|e| ParseFailure::SchemaMismatch(e.to_string()))?;

    Ok(MemberProfile {
        name: wire.name,
        current_plan: wire.current_plan,
        medications: wire.medications,
        exercise_plan: wire.exercise_plan,
        health_goals: wire.health_goals,
        challenges: wire.challenges,
        progress: Progress {
            adherence: coerce_adherence(&wire.progress.adherence)?,
            improvements: wire.progress.improvements,
            setbacks: wire.progress.setbacks,
        },
    })
}

/// Parse a decision list out of raw model output.
///
/// One malformed element rejects the whole list.
pub fn parse_decisions(raw: &str) -> Result<Vec<DecisionRecord>, ParseFailure> {
    let span = extract_span(raw, '[', ']').ok_or(ParseFailure::NoJsonSpan("[...]"))?;
    let value: Value = serde_json::from_str(span)?;
    if !value.is_array() {
        return Err(ParseFailure::SchemaMismatch("expected an array".to_string()));
    }
    serde_json::from_value(value).map_err(|e| ParseFailure::SchemaMismatch(e.to_string()))
}

/// Accept integers, integral floats and numeric strings within 0-100
fn coerce_adherence(value: &Value) -> Result<u8, ParseFailure> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| ParseFailure::SchemaMismatch(format!("adherence is not numeric: {value}")))?;

    let rounded = number.round();
    if !(0.0..=100.0).contains(&rounded) {
        return Err(ParseFailure::SchemaMismatch(format!(
            "adherence {number} outside 0-100"
        )));
    }
    Ok(rounded as u8)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireProfile {
    name: String,
    current_plan: String,
    medications: Vec<String>,
    exercise_plan: String,
    health_goals: Vec<String>,
    challenges: Vec<String>,
    progress: WireProgress,
}

#[derive(Debug, Deserialize)]
struct WireProgress {
    adherence: Value,
    improvements: Vec<String>,
    setbacks: Vec<String>,
}
