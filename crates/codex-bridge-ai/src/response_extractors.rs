use serde_json::Value;

use crate::ApiError;

/// One known place a generated answer may live in an endpoint response.
pub trait ResponseTextExtractor: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract_text(&self, response: &Value) -> Option<String>;
}

/// Top-level `output_text`, either a string or an array of strings.
pub struct OutputTextField;

/// `output[]` message items whose `content[]` holds `output_text` parts.
pub struct OutputMessageItems;

/// Completion-era `choices[0].message.content` / `choices[0].text`.
pub struct LegacyCompletionChoices;

/// Chat-completions `choices[0].message.content`, string or text parts.
pub struct ChatMessageContent;

pub static PRIMARY_EXTRACTORS: &[&dyn ResponseTextExtractor] = &[
    &OutputTextField,
    &OutputMessageItems,
    &LegacyCompletionChoices,
];

pub static SECONDARY_EXTRACTORS: &[&dyn ResponseTextExtractor] = &[&ChatMessageContent];

impl ResponseTextExtractor for OutputTextField {
    fn name(&self) -> &'static str {
        "output_text"
    }

    fn extract_text(&self, response: &Value) -> Option<String> {
        match response.get("output_text")? {
            Value::String(text) => Some(text.clone()),
            Value::Array(parts) => join_non_empty(parts.iter().filter_map(Value::as_str)),
            _ => None,
        }
    }
}

impl ResponseTextExtractor for OutputMessageItems {
    fn name(&self) -> &'static str {
        "output[].content[]"
    }

    fn extract_text(&self, response: &Value) -> Option<String> {
        let items = response.get("output")?.as_array()?;
        let texts = items
            .iter()
            .filter(|item| {
                item.get("type")
                    .and_then(Value::as_str)
                    .map_or(true, |kind| kind == "message")
            })
            .filter_map(|item| item.get("content"))
            .flat_map(content_part_texts);
        join_non_empty(texts)
    }
}

impl ResponseTextExtractor for LegacyCompletionChoices {
    fn name(&self) -> &'static str {
        "choices[0]"
    }

    fn extract_text(&self, response: &Value) -> Option<String> {
        let choice = response.get("choices")?.as_array()?.first()?;
        if let Some(text) = choice
            .get("message")
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
        {
            return Some(text.to_string());
        }
        choice.get("text").and_then(Value::as_str).map(str::to_string)
    }
}

impl ResponseTextExtractor for ChatMessageContent {
    fn name(&self) -> &'static str {
        "choices[0].message.content"
    }

    fn extract_text(&self, response: &Value) -> Option<String> {
        let content = response
            .get("choices")?
            .as_array()?
            .first()?
            .get("message")?
            .get("content")?;
        match content {
            Value::String(text) => Some(text.clone()),
            Value::Array(_) => join_non_empty(content_part_texts(content)),
            _ => None,
        }
    }
}

fn content_part_texts(content: &Value) -> Vec<&str> {
    match content {
        Value::String(text) => vec![text.as_str()],
        Value::Array(parts) => parts
            .iter()
            .filter(|part| {
                part.get("type")
                    .and_then(Value::as_str)
                    .map_or(true, |kind| matches!(kind, "output_text" | "text"))
            })
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect(),
        _ => Vec::new(),
    }
}

fn join_non_empty<'a>(parts: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let joined = parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    (!joined.is_empty()).then_some(joined)
}

fn response_error_message(response: &Value) -> Option<String> {
    match response.get("error") {
        None | Some(Value::Null) => {}
        Some(Value::String(message)) => return Some(message.trim().to_string()),
        Some(error) => {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|message| !message.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Some(message);
        }
    }
    if response.get("status").and_then(Value::as_str) == Some("failed") {
        return Some("response status is 'failed'".to_string());
    }
    None
}

/// Applies `extractors` in order and returns the first non-blank text.
pub fn extract_response_text(
    extractors: &[&dyn ResponseTextExtractor],
    response: &Value,
) -> Result<String, ApiError> {
    if let Some(message) = response_error_message(response) {
        return Err(ApiError::ErrorPayload(message));
    }

    for extractor in extractors {
        let Some(text) = extractor.extract_text(response) else {
            continue;
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        tracing::debug!(extractor = extractor.name(), "extracted response text");
        return Ok(text.to_string());
    }

    Err(ApiError::NoText {
        tried: extractors
            .iter()
            .map(|extractor| extractor.name())
            .collect::<Vec<_>>()
            .join(", "),
    })
}
