//! Turning a completion into an [`AnalysisResult`]

use serde_json::{Map, Value};

use crate::types::AnalysisResult;

const FALLBACK_DESCRIPTION: &str = "Image analysis completed";
const FALLBACK_STYLE: &str = "realistic";
const FALLBACK_MOOD: &str = "atmospheric";

/// Parse the model's reply
///
/// String fields of a JSON object are taken verbatim, empty ones included;
/// a missing field takes its fallback value. The prompt is never empty: when
/// absent or blank it falls back to the raw reply. Keys beyond the four known
/// ones are kept. Anything that is not a JSON object is a plain-text prompt.
pub(crate) fn parse_analysis(raw: &str) -> AnalysisResult {
    let mut fields = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(fields)) => fields,
        _ => {
            tracing::debug!("completion is not a JSON object, using it as the prompt");
            Map::new()
        }
    };

    let description = take(&mut fields, "description").unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string());
    let prompt = take(&mut fields, "prompt")
        .filter(|prompt| !prompt.is_empty())
        .unwrap_or_else(|| raw.to_string());
    let style = take(&mut fields, "style").unwrap_or_else(|| FALLBACK_STYLE.to_string());
    let mood = take(&mut fields, "mood").unwrap_or_else(|| FALLBACK_MOOD.to_string());

    // reserved by the response envelope
    fields.remove("success");

    AnalysisResult {
        description,
        prompt,
        style,
        mood,
        extra: fields,
    }
}

fn take(fields: &mut Map<String, Value>, name: &str) -> Option<String> {
    match fields.remove(name)? {
        Value::String(value) => Some(value),
        _ => None,
    }
}
