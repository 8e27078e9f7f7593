//! Per-format extraction strategies and the shared normalization step.
//!
//! Extraction dispatches over [`FormatTag`]; every strategy produces
//! unbounded text, which [`Extractor::normalize`] bounds with the truncation
//! policy. PDF and DOCX go through a pluggable [`DocumentBackend`] slot so a
//! real extraction library can be substituted without touching the pipeline
//! contract.

pub mod document;
mod table;
mod truncate;
mod workbook;

pub use document::{DocumentBackend, PlaceholderBackend};
pub use truncate::{truncate, TRUNCATION_MARKER};

use std::fmt;

use crate::error::AnalyzerError;
use crate::source::{extension_of, FormatTag, SourceFile};

/// Bounded textual representation of a source file, post-truncation.
///
/// Only produced by [`Extractor::normalize`]; holding one means the character
/// budget has already been enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sampling and budget knobs shared by the extraction strategies.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Maximum characters forwarded to the model.
    pub max_chars: usize,
    /// Rows sampled from each end of a table, and per workbook sheet.
    pub sample_rows: usize,
    /// Sheets detailed per workbook.
    pub max_sheets: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_chars: 50_000,
            sample_rows: 3,
            max_sheets: 3,
        }
    }
}

/// Format dispatch plus the pluggable document backends.
pub struct Extractor {
    opts: ExtractOptions,
    pdf: Box<dyn DocumentBackend>,
    word: Box<dyn DocumentBackend>,
}

impl Extractor {
    pub fn new(opts: ExtractOptions) -> Self {
        Self {
            opts,
            pdf: Box::new(PlaceholderBackend::pdf()),
            word: Box::new(PlaceholderBackend::word_document()),
        }
    }

    /// Replace the PDF extraction backend.
    pub fn with_pdf_backend(mut self, backend: Box<dyn DocumentBackend>) -> Self {
        self.pdf = backend;
        self
    }

    /// Replace the word-processor extraction backend.
    pub fn with_word_backend(mut self, backend: Box<dyn DocumentBackend>) -> Self {
        self.word = backend;
        self
    }

    /// Raw, unbounded extraction for `source`, dispatched on its format tag.
    pub fn extract(&self, source: &SourceFile) -> Result<String, AnalyzerError> {
        match source.format() {
            FormatTag::PlainText => Ok(source.as_text().into_owned()),
            FormatTag::DelimitedTable => table::summarize(source, self.opts.sample_rows),
            FormatTag::Spreadsheet => {
                workbook::summarize(source, self.opts.max_sheets, self.opts.sample_rows)
            }
            FormatTag::PortableDocument => self.pdf.extract(source),
            FormatTag::WordDocument => self.word.extract(source),
            FormatTag::Unsupported => Err(AnalyzerError::UnsupportedFormat {
                extension: extension_of(source.name()),
            }),
        }
    }

    /// Extraction followed by the truncation policy.
    pub fn normalize(&self, source: &SourceFile) -> Result<NormalizedText, AnalyzerError> {
        let raw = self.extract(source)?;
        let bounded = truncate::truncate(&raw, self.opts.max_chars);
        tracing::debug!(
            "[Extractor] {} ({}) -> {} chars normalized",
            source.name(),
            source.format().as_str(),
            bounded.chars().count()
        );
        Ok(NormalizedText(bounded))
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractOptions::default())
    }
}
