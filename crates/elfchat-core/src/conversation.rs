//! One request/response cycle at a time: `Idle -> Busy -> Idle`.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::ai::ModelClient;
use crate::mood::{classify, Mood};
use crate::sentences::split_sentences;
use crate::state::{SessionState, TurnStatus};
use crate::suggestions;
use crate::surface::ChatSurface;

/// Shown instead of a reply when the model call fails.
pub const FALLBACK_REPLY: &str = "Oops! Something went wrong.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Replied,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    pub outcome: TurnOutcome,
    pub mood: Mood,
    pub bubbles: usize,
}

pub struct Conversation {
    client: Arc<dyn ModelClient>,
    state: SessionState,
    suggestions: Vec<String>,
}

impl Conversation {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            client,
            state: SessionState::default(),
            suggestions: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn client(&self) -> &Arc<dyn ModelClient> {
        &self.client
    }

    /// Currently displayed suggestions.
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Session start: first set of suggestions, input ready.
    pub fn start<S: ChatSurface + ?Sized>(&mut self, surface: &mut S) {
        self.refresh_suggestions(surface);
        surface.set_input_enabled(self.state.input_enabled());
        surface.focus_input();
    }

    /// Accept `raw` as the next prompt.
    ///
    /// Returns `None`, touching nothing, when a turn is already running or
    /// the trimmed text is empty. Otherwise shows the user bubble, resets
    /// the input and suggestions, disables input, and hands back the turn
    /// to run.
    pub fn submit<S: ChatSurface + ?Sized>(&mut self, surface: &mut S, raw: &str) -> Option<Turn> {
        if self.state.is_busy() {
            tracing::debug!("submit ignored: turn in progress");
            return None;
        }
        let prompt = raw.trim();
        if prompt.is_empty() {
            return None;
        }

        surface.append_user_bubble(prompt);
        surface.clear_input();
        self.refresh_suggestions(surface);

        self.state.turn = TurnStatus::Busy;
        surface.set_input_enabled(self.state.input_enabled());
        tracing::info!(chars = prompt.chars().count(), "turn started");

        Some(Turn {
            prompt: prompt.to_string(),
            client: Arc::clone(&self.client),
            cancel: CancellationToken::new(),
        })
    }

    /// End the running turn. Returns `false` (and does nothing) when idle.
    pub fn complete<S: ChatSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if !self.state.is_busy() {
            return false;
        }
        self.state.turn = TurnStatus::Idle;
        surface.set_input_enabled(self.state.input_enabled());
        surface.focus_input();
        tracing::info!("turn finished");
        true
    }

    /// Submit, run and complete in one go.
    pub async fn converse<S: ChatSurface + ?Sized>(&mut self, surface: &mut S, raw: &str) -> Option<TurnReport> {
        let turn = self.submit(surface, raw)?;
        let report = turn.run(surface).await;
        self.complete(surface);
        Some(report)
    }

    fn refresh_suggestions<S: ChatSurface + ?Sized>(&mut self, surface: &mut S) {
        self.suggestions = suggestions::sample();
        surface.show_suggestions(&self.suggestions);
    }
}

/// A turn that has been accepted but not yet answered.
pub struct Turn {
    prompt: String,
    client: Arc<dyn ModelClient>,
    // Never cancelled yet; threaded through so a reveal can be stopped later.
    cancel: CancellationToken,
}

impl Turn {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Ask the model and render the answer, sentence by sentence.
    ///
    /// Never fails: a service error is logged and replaced by a single
    /// fallback bubble.
    pub async fn run<S: ChatSurface + ?Sized>(self, surface: &mut S) -> TurnReport {
        match self.client.generate(&self.prompt).await {
            Ok(reply) => {
                let mood = classify(&reply);
                let sentences = split_sentences(&reply);
                tracing::debug!(%mood, sentences = sentences.len(), "rendering reply");

                for sentence in &sentences {
                    surface.append_assistant_bubble(sentence, mood, &self.cancel).await;
                }
                TurnReport {
                    outcome: TurnOutcome::Replied,
                    mood,
                    bubbles: sentences.len(),
                }
            }
            Err(err) => {
                tracing::error!(
                    provider = %err.provider(),
                    model = self.client.model(),
                    error = %err,
                    "generate failed"
                );
                surface.append_assistant_bubble(FALLBACK_REPLY, Mood::Default, &self.cancel).await;
                TurnReport {
                    outcome: TurnOutcome::Failed,
                    mood: Mood::Default,
                    bubbles: 1,
                }
            }
        }
    }
}
