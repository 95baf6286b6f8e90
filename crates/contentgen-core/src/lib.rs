//! contentgen-core: categorized prompt dispatch to a hosted chat-completion API, plus the
//! Interaction Surface controller (form state, in-flight guard, bounded history) and its HTML.

pub mod category;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod history;
pub mod provider;
pub mod render;
pub mod surface;
pub mod types;

pub use category::ContentCategory;
pub use config::GeneratorConfig;
pub use dispatcher::PromptDispatcher;
pub use error::{ErrorReport, GenerateError, GenerateResult};
pub use history::{History, HistoryEntry};
pub use provider::{CompletionBackend, HttpCompletionBackend};
pub use render::{html_escape, render_page};
pub use surface::{Outcome, Phase, SubmitRejected, Surface};
pub use types::{GenerateBody, GenerateResponse, GenerationRequest, GenerationResult};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
