//! Tolerant extraction of `{"score": .., "reasoning": ..}` from free-form judge output

use serde::Deserialize;

/// What could be recovered from raw judge output
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedVerdict {
    /// A JSON verdict was found; `score` is not yet clamped
    Scored { score: f64, reasoning: String },
    /// No JSON object carrying a `score` key appears in the output
    Unparseable,
    /// A candidate object was found but does not decode as a verdict
    Invalid(String),
}

#[derive(Debug, Deserialize)]
struct RawVerdict {
    score: f64,
    #[serde(default, alias = "reason")]
    reasoning: Option<String>,
}

/// Clamp a score into `[0.0, 1.0]`; NaN maps to 0.0
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}

/// Find the first balanced `{...}` substring that mentions a `"score"` key.
///
/// Braces inside JSON string literals are ignored, so prose or markdown fences around the
/// object do not matter.
pub fn extract_json_object(text: &str) -> Option<&str> {
    for (start, _) in text.char_indices().filter(|(_, c)| *c == '{') {
        if let Some(end) = matching_brace(&text[start..]) {
            let candidate = &text[start..start + end + 1];
            if candidate.contains("\"score\"") {
                return Some(candidate);
            }
        }
    }

    None
}

/// Byte offset of the brace closing the one at offset 0
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }

    None
}

pub fn parse_verdict(text: &str) -> ParsedVerdict {
    let Some(candidate) = extract_json_object(text) else {
        return ParsedVerdict::Unparseable;
    };

    match serde_json::from_str::<RawVerdict>(candidate) {
        Ok(raw) => ParsedVerdict::Scored {
            score: raw.score,
            reasoning: raw.reasoning.unwrap_or_default(),
        },
        Err(e) => ParsedVerdict::Invalid(e.to_string()),
    }
}
