//! Source file payload and format detection.

use std::borrow::Cow;
use std::path::Path;

use crate::error::AnalyzerError;

/// Closed classification of a source file's extraction strategy.
///
/// Every file name maps to exactly one tag; unrecognized extensions map to
/// [`FormatTag::Unsupported`] and make extraction fail fast, never fall back
/// to a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTag {
    PlainText,
    DelimitedTable,
    Spreadsheet,
    PortableDocument,
    WordDocument,
    Unsupported,
}

impl FormatTag {
    /// Map a file name's trailing extension to a format tag.
    ///
    /// Total over all inputs: lower-cases the suffix after the last `.`;
    /// a missing or empty extension yields `Unsupported`.
    pub fn detect(file_name: &str) -> Self {
        let ext = extension_of(file_name);
        match ext.as_deref() {
            Some("txt") | Some("text") | Some("md") | Some("markdown") | Some("log") => {
                Self::PlainText
            }
            Some("csv") | Some("tsv") => Self::DelimitedTable,
            Some("xlsx") | Some("xlsm") | Some("xls") => Self::Spreadsheet,
            Some("pdf") => Self::PortableDocument,
            Some("docx") => Self::WordDocument,
            _ => Self::Unsupported,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlainText => "plain-text",
            Self::DelimitedTable => "delimited-table",
            Self::Spreadsheet => "spreadsheet",
            Self::PortableDocument => "portable-document",
            Self::WordDocument => "word-document",
            Self::Unsupported => "unsupported",
        }
    }
}

/// Lower-cased trailing extension of `file_name`, if it has one.
pub(crate) fn extension_of(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Opaque payload plus metadata for one upload cycle.
///
/// Immutable once constructed. The analyzer borrows it for the duration of a
/// cycle and does not retain it afterwards.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl SourceFile {
    /// Wrap an in-memory payload with explicit metadata.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Wrap an in-memory payload, inferring the MIME type from the name.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self::new(name, mime_type, bytes)
    }

    /// Read a file from disk, inferring the MIME type from the name.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, AnalyzerError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| AnalyzerError::FileRead {
                name: name.clone(),
                source,
            })?;
        tracing::debug!("[Source] Read {} ({} bytes)", name, bytes.len());
        Ok(Self::from_bytes(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Payload decoded as UTF-8 text, lossily.
    pub fn as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Format tag derived from the file name.
    pub fn format(&self) -> FormatTag {
        FormatTag::detect(&self.name)
    }
}
