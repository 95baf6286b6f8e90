//! Interaction Surface controller: form state, in-flight guard, result/error panels, history.
//!
//! Per submission: `Idle → Submitting → {Success, Failed} → Idle`. `begin_submit` and `finish`
//! are split so a caller holding the surface behind a lock can release it across the provider
//! call; `submit` runs the whole cycle for a single owner.

use thiserror::Error;

use crate::category::ContentCategory;
use crate::dispatcher::PromptDispatcher;
use crate::error::ErrorReport;
use crate::history::{History, HistoryEntry};
use crate::types::{GenerationRequest, GenerationResult};

pub const MSG_ENTER_PROMPT: &str = "请输入提示词";
pub const MSG_IN_FLIGHT: &str = "上一个请求仍在处理中";
/// Shown when a failure carries no message of its own.
pub const MSG_GENERATION_FAILED: &str = "内容生成失败，请稍后重试";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
}

/// How the last finished submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed,
}

/// Why a submission was not started.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("{}", MSG_IN_FLIGHT)]
    InFlight,
    #[error("{}", MSG_ENTER_PROMPT)]
    EmptyPrompt,
}

/// State behind one user's form. Not shared between users.
#[derive(Debug, Clone)]
pub struct Surface {
    prompt: String,
    category: ContentCategory,
    result: Option<String>,
    error: Option<ErrorReport>,
    history: History,
    phase: Phase,
    last_outcome: Option<Outcome>,
    pending: Option<GenerationRequest>,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(crate::history::DEFAULT_HISTORY_LIMIT)
    }
}

impl Surface {
    pub fn new(history_limit: usize) -> Self {
        Self {
            prompt: String::new(),
            category: ContentCategory::General,
            result: None,
            error: None,
            history: History::new(history_limit),
            phase: Phase::Idle,
            last_outcome: None,
            pending: None,
        }
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn set_category(&mut self, category: ContentCategory) {
        self.category = category;
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn category(&self) -> ContentCategory {
        self.category
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn error(&self) -> Option<&ErrorReport> {
        self.error.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Submit control is enabled only when idle with a non-blank prompt.
    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Idle && !self.prompt.trim().is_empty()
    }

    /// Moves to `Submitting` and hands back the request to dispatch.
    ///
    /// An in-flight rejection leaves the surface untouched; an empty prompt sets the
    /// "enter a prompt" error.
    pub fn begin_submit(&mut self) -> Result<GenerationRequest, SubmitRejected> {
        if self.phase == Phase::Submitting {
            return Err(SubmitRejected::InFlight);
        }
        if self.prompt.trim().is_empty() {
            self.error = Some(ErrorReport::new(MSG_ENTER_PROMPT));
            return Err(SubmitRejected::EmptyPrompt);
        }
        self.error = None;
        self.phase = Phase::Submitting;
        let request = GenerationRequest::new(self.prompt.clone(), self.category);
        self.pending = Some(request.clone());
        Ok(request)
    }

    /// Applies the outcome of the request handed out by `begin_submit` and returns to `Idle`.
    /// Ignored when nothing is in flight.
    pub fn finish(&mut self, outcome: Result<GenerationResult, ErrorReport>) {
        let Some(request) = self.pending.take() else {
            return;
        };
        self.phase = Phase::Idle;
        match outcome {
            Ok(result) => {
                self.result = Some(result.content().to_string());
                self.history.push(HistoryEntry::from_result(request.prompt, &result));
                self.last_outcome = Some(Outcome::Success);
            }
            Err(mut report) => {
                if report.message.trim().is_empty() {
                    report.message = MSG_GENERATION_FAILED.to_string();
                }
                self.error = Some(report);
                self.result = None;
                self.last_outcome = Some(Outcome::Failed);
            }
        }
    }

    /// Full cycle against an in-process dispatcher.
    pub async fn submit(&mut self, dispatcher: &PromptDispatcher) -> Result<Outcome, SubmitRejected> {
        let request = self.begin_submit()?;
        let expose = dispatcher.config().expose_details();
        let outcome = dispatcher.generate(request).await.map_err(|e| e.report(expose));
        self.finish(outcome);
        Ok(self.last_outcome.unwrap_or(Outcome::Failed))
    }
}
