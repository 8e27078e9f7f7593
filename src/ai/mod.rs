//! LLM collaborator: prompt construction, the completion client boundary,
//! and reply parsing.

pub mod client;
mod http_client;
pub mod prompts;
pub mod response;

pub use client::{AnthropicClient, CompletionBackend};
pub use prompts::{build_analysis_prompt, ANALYSIS_INSTRUCTION};
pub use response::{first_json_object, parse_analysis, AnalysisResult};
