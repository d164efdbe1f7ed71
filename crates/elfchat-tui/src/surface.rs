use std::io::{self, Write};
use std::time::Duration;

use async_trait::async_trait;
use elfchat_core::{plain_text, reveal, ChatSurface, Mood, RevealOutcome, TurnReport, PERSONA_NAME};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::tui::AppEvent;

/// View changes requested by the conversation, applied by `App`.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    UserBubble(String),
    /// Opens an empty assistant bubble; `Reveal` fills it in.
    AssistantBubble(Mood),
    Reveal(char),
    ScrollToLatest,
    InputEnabled(bool),
    ClearInput,
    FocusInput,
    Suggestions(Vec<String>),
    TurnFinished(TurnReport),
}

/// `ChatSurface` for the terminal UI.
///
/// Cloneable handle that forwards every operation to the event loop, so a
/// turn can run on its own task while the UI keeps drawing.
#[derive(Clone)]
pub struct TuiSurface {
    tx: mpsc::UnboundedSender<AppEvent>,
    speed: Duration,
}

impl TuiSurface {
    pub fn new(tx: mpsc::UnboundedSender<AppEvent>, speed: Duration) -> Self {
        Self { tx, speed }
    }

    fn send(&self, event: SurfaceEvent) {
        // The receiver only goes away on shutdown.
        let _ = self.tx.send(AppEvent::Surface(event));
    }

    pub fn turn_finished(&self, report: TurnReport) {
        self.send(SurfaceEvent::TurnFinished(report));
    }
}

#[async_trait]
impl ChatSurface for TuiSurface {
    fn append_user_bubble(&mut self, text: &str) {
        self.send(SurfaceEvent::UserBubble(plain_text(text)));
        self.scroll_to_latest();
    }

    async fn append_assistant_bubble(&mut self, text: &str, mood: Mood, cancel: &CancellationToken) -> RevealOutcome {
        self.send(SurfaceEvent::AssistantBubble(mood));
        self.scroll_to_latest();

        let text = plain_text(text);
        let this = self.clone();
        reveal(&text, self.speed, cancel, |c| {
            this.send(SurfaceEvent::Reveal(c));
            this.send(SurfaceEvent::ScrollToLatest);
        })
        .await
    }

    fn scroll_to_latest(&mut self) {
        self.send(SurfaceEvent::ScrollToLatest);
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.send(SurfaceEvent::InputEnabled(enabled));
    }

    fn clear_input(&mut self) {
        self.send(SurfaceEvent::ClearInput);
    }

    fn focus_input(&mut self) {
        self.send(SurfaceEvent::FocusInput);
    }

    fn show_suggestions(&mut self, suggestions: &[String]) {
        self.send(SurfaceEvent::Suggestions(suggestions.to_vec()));
    }
}

/// `ChatSurface` that types straight onto stdout, for `--once`.
pub struct ConsoleSurface<W: Write + Send> {
    out: W,
    speed: Duration,
}

impl ConsoleSurface<io::Stdout> {
    pub fn stdout(speed: Duration) -> Self {
        Self::new(io::stdout(), speed)
    }
}

impl<W: Write + Send> ConsoleSurface<W> {
    pub fn new(out: W, speed: Duration) -> Self {
        Self { out, speed }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[async_trait]
impl<W: Write + Send> ChatSurface for ConsoleSurface<W> {
    fn append_user_bubble(&mut self, text: &str) {
        let _ = writeln!(self.out, "you> {}", plain_text(text));
        self.scroll_to_latest();
    }

    async fn append_assistant_bubble(&mut self, text: &str, mood: Mood, cancel: &CancellationToken) -> RevealOutcome {
        let _ = write!(self.out, "{} {}> ", mood.avatar().face, PERSONA_NAME);
        let text = plain_text(text);
        let out = &mut self.out;
        let outcome = reveal(&text, self.speed, cancel, |c| {
            let _ = write!(out, "{c}");
            let _ = out.flush();
        })
        .await;
        let _ = writeln!(self.out);
        outcome
    }

    fn scroll_to_latest(&mut self) {
        let _ = self.out.flush();
    }

    // A one-shot console run has no input line or buttons to manage.
    fn set_input_enabled(&mut self, _enabled: bool) {}

    fn clear_input(&mut self) {}

    fn focus_input(&mut self) {}

    fn show_suggestions(&mut self, _suggestions: &[String]) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tui_surface_forwards_reveal_char_by_char() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut surface = TuiSurface::new(tx, Duration::ZERO);

        let outcome = surface
            .append_assistant_bubble("Hi\u{1b}!", Mood::Happy, &CancellationToken::new())
            .await;
        assert_eq!(outcome, RevealOutcome::Completed);
        drop(surface);

        let mut events = Vec::new();
        while let Some(AppEvent::Surface(event)) = rx.recv().await {
            events.push(event);
        }
        let revealed: String = events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Reveal(c) => Some(*c),
                _ => None,
            })
            .collect();

        assert_eq!(events[0], SurfaceEvent::AssistantBubble(Mood::Happy));
        assert_eq!(revealed, "Hi!");
        // One scroll when the bubble opens, then one per character.
        let scrolls = events.iter().filter(|e| **e == SurfaceEvent::ScrollToLatest).count();
        assert_eq!(scrolls, 1 + 3);
    }

    #[tokio::test]
    async fn test_console_surface_prints_bubbles() {
        let mut surface = ConsoleSurface::new(Vec::new(), Duration::ZERO);
        surface.append_user_bubble("Tell me a story");
        surface
            .append_assistant_bubble("Once upon a time.", Mood::Default, &CancellationToken::new())
            .await;

        let printed = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(printed, "you> Tell me a story\n(・_・) Frieren> Once upon a time.\n");
    }
}
