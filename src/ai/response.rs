//! Reply parsing: locate the first balanced JSON object and decode it.
//!
//! Models wrap JSON in prose or code fences, so the scanner walks brace
//! depth explicitly, skipping braces inside string literals and honoring
//! backslash escapes. A greedy first-`{`-to-last-`}` match misfires on
//! nested objects and on braces inside string values.

use serde::{Deserialize, Serialize};

use crate::error::AnalyzerError;

/// Structured record decoded from the model reply.
///
/// `classification` and `summary` are required; a reply that omits `actions`
/// decodes with an empty list. Never partially populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub classification: String,
    pub summary: String,
    #[serde(default)]
    pub actions: Vec<String>,
}

/// First balanced JSON object substring of `reply`, if any.
///
/// Candidate `{` positions are tried left to right; an opening brace that
/// never balances (for example a stray `{` in prose) is skipped rather than
/// poisoning the whole reply.
pub fn first_json_object(reply: &str) -> Option<&str> {
    let mut search_from = 0;
    while let Some(offset) = reply[search_from..].find('{') {
        let start = search_from + offset;
        if let Some(len) = balanced_len(&reply[start..]) {
            return Some(&reply[start..start + len]);
        }
        search_from = start + 1;
    }
    None
}

/// Byte length of the balanced object starting at the first char of `s`,
/// which must be `{`.
fn balanced_len(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in s.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx + ch.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

/// Decode the first balanced JSON object in `reply` into an analysis result.
pub fn parse_analysis(reply: &str) -> Result<AnalysisResult, AnalyzerError> {
    let object = first_json_object(reply).ok_or_else(|| AnalyzerError::MalformedResponse {
        raw_reply: reply.to_string(),
    })?;

    serde_json::from_str(object).map_err(|source| AnalyzerError::JsonDecode {
        raw_reply: reply.to_string(),
        source,
    })
}
