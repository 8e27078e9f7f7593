//! Analysis instruction template.
//!
//! The instruction text and the JSON shape it requests are a lockstep
//! contract with the reply parser in [`response`](super::response); change
//! one, change both.

use crate::extract::NormalizedText;

/// Fixed instruction prefixed to every analysis prompt.
pub const ANALYSIS_INSTRUCTION: &str = r#"I'm sending you a document to analyze. Please:
1. Classify what type of document this is (e.g. invoice, contract, memo, report, etc.)
2. Provide a short summary of the key points (3-5 sentences)
3. List any specific actions or follow-ups required based on the document

Respond with a JSON object with the following structure:
{
  "classification": "Document Type",
  "summary": "Summary of the document...",
  "actions": ["Action 1", "Action 2", ...]
}

Here is the document content: "#;

/// Embed the normalized text verbatim after the fixed instruction.
pub fn build_analysis_prompt(normalized: &NormalizedText) -> String {
    format!("{}{}", ANALYSIS_INSTRUCTION, normalized.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{ExtractOptions, Extractor};
    use crate::source::SourceFile;

    #[test]
    fn test_normalized_text_is_embedded_verbatim() {
        let source = SourceFile::from_bytes("memo.txt", b"Quarterly targets were missed.".to_vec());
        let normalized = Extractor::new(ExtractOptions::default())
            .normalize(&source)
            .unwrap();

        let prompt = build_analysis_prompt(&normalized);
        assert!(prompt.starts_with(ANALYSIS_INSTRUCTION));
        assert!(prompt.ends_with("Quarterly targets were missed."));
    }

    #[test]
    fn test_instruction_names_the_expected_fields() {
        assert!(ANALYSIS_INSTRUCTION.contains("\"classification\""));
        assert!(ANALYSIS_INSTRUCTION.contains("\"summary\""));
        assert!(ANALYSIS_INSTRUCTION.contains("\"actions\""));
    }
}
