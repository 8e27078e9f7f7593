//! Document ingestion and LLM analysis pipeline.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  1. DETECT: map the file name to a format tag                  │
//! │  2. EXTRACT: per-format text extraction (csv, calamine, ...)   │
//! │  3. TRUNCATE: enforce the character budget, mark the cut       │
//! │  4. PROMPT: wrap the text in the fixed analysis instruction    │
//! │  5. COMPLETE: Anthropic Messages API, single attempt           │
//! │  6. PARSE: first balanced JSON object → AnalysisResult         │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`DocumentAnalyzer`] sequences the stages and owns the per-upload state
//! machine (idle → loading → success/error). The completion endpoint sits
//! behind the [`CompletionBackend`] trait; PDF and DOCX extraction sit behind
//! [`extract::DocumentBackend`] so real libraries can be swapped in without
//! changing the pipeline contract.
//!
//! ```no_run
//! use doclens::{AnalyzerConfig, DocumentAnalyzer, SourceFile};
//!
//! # async fn run() -> Result<(), doclens::AnalyzerError> {
//! let mut analyzer = DocumentAnalyzer::new(AnalyzerConfig::from_env());
//! let source = SourceFile::from_path("reports/q3.csv").await?;
//! let report = analyzer.upload_and_analyze(source).await?;
//! println!("{}: {}", report.result.classification, report.result.summary);
//! # Ok(())
//! # }
//! ```

pub mod ai;
mod analyzer;
mod config;
mod error;
pub mod extract;
mod source;

pub use ai::client::{AnthropicClient, CompletionBackend};
pub use ai::response::AnalysisResult;
pub use analyzer::{AnalysisReport, AnalysisState, DocumentAnalyzer};
pub use config::AnalyzerConfig;
pub use error::AnalyzerError;
pub use extract::{ExtractOptions, Extractor, NormalizedText};
pub use source::{FormatTag, SourceFile};
