//! Strict extraction of generated copy from free-form model output.
//!
//! The backend is an untrusted text source: it may wrap the JSON in prose or
//! code fences, or return no JSON at all. The contract is extract-then-parse
//! or fail; raw model text is never exposed to callers on success.

use crate::generator::GeneratedDescription;
use crate::project::ProjectDetails;
use crate::{AtelierError, Result};
use serde::Deserialize;

/// The four fields the backend is asked to produce, as a flat object
#[derive(Debug, Deserialize)]
struct RawGenerated {
    description: String,
    problem: String,
    approach: String,
    outcome: String,
}

/// Find the first brace-delimited JSON object substring in `text`.
///
/// Scans by brace depth, ignoring braces inside string literals, and returns
/// the slice from the first `{` to its matching `}`. `None` if no balanced
/// object exists.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in text.bytes().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse raw completion text into a `GeneratedDescription`.
///
/// Fails with `GenerationFailed` (carrying a human-readable diagnostic) when
/// no object can be extracted, the object is not valid JSON, or any of the
/// four fields is missing or not a string.
pub fn parse_generated(raw: &str) -> Result<GeneratedDescription> {
    let trimmed = raw.trim();
    let object = extract_json_object(trimmed).ok_or_else(|| {
        AtelierError::GenerationFailed("no JSON object found in model output".to_string())
    })?;

    let parsed: RawGenerated = serde_json::from_str(object)
        .map_err(|e| AtelierError::GenerationFailed(format!("model output is not valid generated copy: {e}")))?;

    Ok(GeneratedDescription {
        description: parsed.description,
        details: ProjectDetails {
            problem: parsed.problem,
            approach: parsed.approach,
            outcome: parsed.outcome,
        },
    })
}
