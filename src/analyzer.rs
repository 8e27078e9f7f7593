//! Upload-cycle orchestration.
//!
//! One logical pipeline per upload: detect → extract → truncate → prompt →
//! completion call → parse. Stages run as a strict sequential chain; any
//! failure short-circuits into the error state and nothing is retried.
//! A new upload while one is loading is rejected, not queued.

use serde::{Deserialize, Serialize};

use crate::ai::client::{AnthropicClient, CompletionBackend};
use crate::ai::prompts::build_analysis_prompt;
use crate::ai::response::{parse_analysis, AnalysisResult};
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::extract::Extractor;
use crate::source::SourceFile;

/// Successful analysis plus passthrough file metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

/// Lifecycle of the current upload cycle.
#[derive(Debug, Clone, Default)]
pub enum AnalysisState {
    /// Nothing has run since construction or the last [`DocumentAnalyzer::clear`].
    #[default]
    Idle,
    /// A pipeline is in flight.
    Loading,
    /// The last cycle completed; the report is retained.
    Success(AnalysisReport),
    /// The last cycle failed; the message is retained.
    Error(String),
}

/// Pipeline orchestrator: owns the extractor, the completion backend, and
/// the per-upload state machine.
pub struct DocumentAnalyzer {
    extractor: Extractor,
    backend: Box<dyn CompletionBackend>,
    state: AnalysisState,
}

impl DocumentAnalyzer {
    /// Analyzer backed by the Anthropic client described by `config`.
    pub fn new(config: AnalyzerConfig) -> Self {
        let backend = Box::new(AnthropicClient::new(&config));
        Self::with_backend(config, backend)
    }

    /// Analyzer with an explicit completion backend (tests, other providers).
    pub fn with_backend(config: AnalyzerConfig, backend: Box<dyn CompletionBackend>) -> Self {
        Self {
            extractor: Extractor::new(config.extract),
            backend,
            state: AnalysisState::Idle,
        }
    }

    /// Replace the extractor, keeping backend and state.
    ///
    /// Used to install non-default document backends.
    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    /// Run one full upload cycle for `source`.
    ///
    /// The source is owned for the duration of the cycle and dropped when it
    /// completes. A call while a cycle is loading fails with
    /// [`AnalyzerError::AnalysisInProgress`]; the caller re-invokes once the
    /// cycle has settled.
    pub async fn upload_and_analyze(
        &mut self,
        source: SourceFile,
    ) -> Result<AnalysisReport, AnalyzerError> {
        if matches!(self.state, AnalysisState::Loading) {
            return Err(AnalyzerError::AnalysisInProgress);
        }
        self.state = AnalysisState::Loading;

        tracing::info!(
            "[Analyzer] Analyzing {} ({}, {} bytes)",
            source.name(),
            source.format().as_str(),
            source.size_bytes()
        );

        match self.run_pipeline(&source).await {
            Ok(report) => {
                tracing::info!(
                    "[Analyzer] {} classified as {}",
                    source.name(),
                    report.result.classification
                );
                self.state = AnalysisState::Success(report.clone());
                Ok(report)
            }
            Err(err) => {
                tracing::warn!("[Analyzer] Analysis of {} failed: {}", source.name(), err);
                if let Some(raw) = err.raw_reply() {
                    tracing::debug!("[Analyzer] Raw model reply: {}", raw);
                }
                self.state = AnalysisState::Error(err.to_string());
                Err(err)
            }
        }
    }

    /// Reset to idle, discarding any retained report or error.
    pub fn clear(&mut self) {
        self.state = AnalysisState::Idle;
    }

    async fn run_pipeline(&self, source: &SourceFile) -> Result<AnalysisReport, AnalyzerError> {
        let normalized = self.extractor.normalize(source)?;
        let prompt = build_analysis_prompt(&normalized);
        let reply = self.backend.complete(&prompt).await?;
        let result = parse_analysis(&reply)?;

        Ok(AnalysisReport {
            result,
            file_name: source.name().to_string(),
            mime_type: source.mime_type().to_string(),
            size_bytes: source.size_bytes(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::prompts::ANALYSIS_INSTRUCTION;
    use crate::extract::{ExtractOptions, TRUNCATION_MARKER};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    const REPLY: &str = r#"Here is my analysis:
{"classification":"Report","summary":"A quarterly report.","actions":["File it"]}"#;

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }

    /// Backend returning a canned reply and recording every prompt it sees.
    #[derive(Clone)]
    struct CannedBackend {
        reply: String,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl CannedBackend {
        fn new(reply: &str) -> (Self, Arc<Mutex<Vec<String>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    reply: reply.to_string(),
                    seen: Arc::clone(&seen),
                },
                seen,
            )
        }
    }

    #[async_trait]
    impl CompletionBackend for CannedBackend {
        async fn complete(&self, prompt: &str) -> Result<String, AnalyzerError> {
            self.seen.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    /// Backend that always fails at the transport boundary.
    struct FailingBackend;

    #[async_trait]
    impl CompletionBackend for FailingBackend {
        async fn complete(&self, _prompt: &str) -> Result<String, AnalyzerError> {
            Err(AnalyzerError::RemoteCall {
                message: "connection refused".to_string(),
                source: None,
            })
        }
    }

    fn analyzer_with(reply: &str) -> (DocumentAnalyzer, Arc<Mutex<Vec<String>>>) {
        let (backend, seen) = CannedBackend::new(reply);
        (
            DocumentAnalyzer::with_backend(AnalyzerConfig::default(), Box::new(backend)),
            seen,
        )
    }

    #[tokio::test]
    async fn test_plain_text_upload_succeeds() {
        init_logging();
        let (mut analyzer, _) = analyzer_with(REPLY);
        assert!(matches!(analyzer.state(), AnalysisState::Idle));

        let source = SourceFile::from_bytes("q3.txt", b"Q3 revenue was flat.".to_vec());
        let report = analyzer.upload_and_analyze(source).await.unwrap();

        assert_eq!(report.result.classification, "Report");
        assert_eq!(report.result.actions, vec!["File it".to_string()]);
        assert_eq!(report.file_name, "q3.txt");
        assert_eq!(report.mime_type, "text/plain");
        assert_eq!(report.size_bytes, 20);
        assert!(matches!(analyzer.state(), AnalysisState::Success(_)));
    }

    #[tokio::test]
    async fn test_oversized_upload_is_truncated_into_the_prompt() {
        let config = AnalyzerConfig {
            extract: ExtractOptions {
                max_chars: 50_000,
                ..ExtractOptions::default()
            },
            ..AnalyzerConfig::default()
        };
        let (backend, seen) = CannedBackend::new(REPLY);
        let mut analyzer = DocumentAnalyzer::with_backend(config, Box::new(backend));

        let source = SourceFile::from_bytes("big.txt", "x".repeat(200_000).into_bytes());
        analyzer.upload_and_analyze(source).await.unwrap();

        let prompts = seen.lock().unwrap();
        let prompt = &prompts[0];
        assert!(prompt.starts_with(ANALYSIS_INSTRUCTION));
        assert!(prompt.ends_with(TRUNCATION_MARKER));

        let embedded_chars = prompt.chars().count() - ANALYSIS_INSTRUCTION.chars().count();
        assert_eq!(
            embedded_chars,
            (50_000 - 100) + TRUNCATION_MARKER.chars().count()
        );
    }

    #[tokio::test]
    async fn test_unsupported_extension_fails_before_the_backend() {
        let (mut analyzer, seen) = analyzer_with(REPLY);

        let source = SourceFile::from_bytes("video.mp4", vec![0, 1, 2, 3]);
        let err = analyzer.upload_and_analyze(source).await.unwrap_err();

        assert!(matches!(err, AnalyzerError::UnsupportedFormat { .. }));
        assert!(matches!(analyzer.state(), AnalysisState::Error(_)));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_garbage_reply_reaches_error_state() {
        let (mut analyzer, _) = analyzer_with("I could not find anything useful.");

        let source = SourceFile::from_bytes("memo.txt", b"hello".to_vec());
        let err = analyzer.upload_and_analyze(source).await.unwrap_err();

        assert!(matches!(err, AnalyzerError::MalformedResponse { .. }));
        match analyzer.state() {
            AnalysisState::Error(message) => {
                assert!(message.contains("no JSON object"));
            }
            other => panic!("expected error state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_remote_failure_reaches_error_state() {
        let mut analyzer =
            DocumentAnalyzer::with_backend(AnalyzerConfig::default(), Box::new(FailingBackend));

        let source = SourceFile::from_bytes("memo.txt", b"hello".to_vec());
        let err = analyzer.upload_and_analyze(source).await.unwrap_err();

        assert!(matches!(err, AnalyzerError::RemoteCall { .. }));
        assert!(matches!(analyzer.state(), AnalysisState::Error(_)));
    }

    #[tokio::test]
    async fn test_reupload_after_error_restarts_the_cycle() {
        let (mut analyzer, _) = analyzer_with(REPLY);

        let bad = SourceFile::from_bytes("bad.zip", vec![]);
        analyzer.upload_and_analyze(bad).await.unwrap_err();
        assert!(matches!(analyzer.state(), AnalysisState::Error(_)));

        let good = SourceFile::from_bytes("good.txt", b"fine".to_vec());
        analyzer.upload_and_analyze(good).await.unwrap();
        assert!(matches!(analyzer.state(), AnalysisState::Success(_)));
    }

    #[tokio::test]
    async fn test_clear_resets_to_idle() {
        let (mut analyzer, _) = analyzer_with(REPLY);

        let source = SourceFile::from_bytes("memo.txt", b"hello".to_vec());
        analyzer.upload_and_analyze(source).await.unwrap();
        assert!(matches!(analyzer.state(), AnalysisState::Success(_)));

        analyzer.clear();
        assert!(matches!(analyzer.state(), AnalysisState::Idle));
    }

    #[test]
    fn test_report_serializes_flat_with_camel_case_metadata() {
        let report = AnalysisReport {
            result: AnalysisResult {
                classification: "Invoice".to_string(),
                summary: "S".to_string(),
                actions: vec!["Pay".to_string()],
            },
            file_name: "inv.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            size_bytes: 42,
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["classification"], "Invoice");
        assert_eq!(value["fileName"], "inv.pdf");
        assert_eq!(value["mimeType"], "application/pdf");
        assert_eq!(value["sizeBytes"], 42);
    }
}
