use ratatui::layout::Rect;
use elfchat_core::{ChatMessage, ChatRole, Conversation, TurnReport};

use crate::surface::{SurfaceEvent, TuiSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Landing,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Input,
    Suggestions,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub focus: FocusPane,

    // Input line
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars
    pub input_enabled: bool,

    // Chat history (only for this session)
    pub messages: Vec<ChatMessage>,
    pub chat_scroll: u16,
    pub follow_latest: bool,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations

    // Suggestion buttons
    pub suggestions: Vec<String>,
    pub selected_suggestion: usize,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Areas for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,
    pub suggestion_areas: Vec<Rect>,
    pub send_area: Option<Rect>,

    // Header label, e.g. "gemini · gemini-2.0-flash"
    pub model_label: String,

    pub conversation: Conversation,
    pub surface: TuiSurface,
}

impl App {
    pub fn new(conversation: Conversation, surface: TuiSurface) -> Self {
        let model_label = format!(
            "{} · {}",
            conversation.client().provider(),
            conversation.client().model()
        );

        Self {
            should_quit: false,
            screen: Screen::Landing,
            focus: FocusPane::Input,

            input: String::new(),
            cursor: 0,
            input_enabled: false,

            messages: Vec::new(),
            chat_scroll: 0,
            follow_latest: true,
            chat_height: 0,
            chat_width: 0,

            suggestions: Vec::new(),
            selected_suggestion: 0,

            animation_frame: 0,

            chat_area: None,
            suggestion_areas: Vec::new(),
            send_area: None,

            model_label,

            conversation,
            surface,
        }
    }

    /// Leave the landing view and start the session.
    pub fn begin_chat(&mut self) {
        if self.screen == Screen::Chat {
            return;
        }
        self.screen = Screen::Chat;
        let mut surface = self.surface.clone();
        self.conversation.start(&mut surface);
    }

    /// Submit whatever is in the input line.
    pub fn send_input(&mut self) {
        let text = self.input.clone();
        self.submit(&text);
    }

    /// Same as typing `suggestion` and pressing send.
    pub fn send_suggestion(&mut self, index: usize) {
        if !self.accepts_input() {
            return;
        }
        if let Some(suggestion) = self.suggestions.get(index).cloned() {
            self.input = suggestion;
            self.cursor = self.input.chars().count();
            self.send_input();
        }
    }

    fn submit(&mut self, text: &str) {
        if !self.accepts_input() {
            return;
        }
        let mut surface = self.surface.clone();
        let Some(turn) = self.conversation.submit(&mut surface, text) else {
            return;
        };

        tokio::spawn(async move {
            let report = turn.run(&mut surface).await;
            surface.turn_finished(report);
        });
    }

    /// Input is taken only in the chat view while no turn is running.
    /// `input_enabled` mirrors this for drawing.
    pub fn accepts_input(&self) -> bool {
        self.screen == Screen::Chat && !self.conversation.is_busy()
    }

    /// Apply a view change sent by the running turn.
    pub fn apply_surface_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::UserBubble(text) => self.messages.push(ChatMessage::user(text)),
            SurfaceEvent::AssistantBubble(mood) => self.messages.push(ChatMessage::assistant("", mood)),
            SurfaceEvent::Reveal(c) => {
                if let Some(msg) = self.messages.last_mut() {
                    if msg.role == ChatRole::Assistant {
                        msg.content.push(c);
                    }
                }
            }
            SurfaceEvent::ScrollToLatest => self.follow_latest = true,
            SurfaceEvent::InputEnabled(enabled) => self.input_enabled = enabled,
            SurfaceEvent::ClearInput => {
                self.input.clear();
                self.cursor = 0;
            }
            SurfaceEvent::FocusInput => self.focus = FocusPane::Input,
            SurfaceEvent::Suggestions(suggestions) => {
                self.suggestions = suggestions;
                self.selected_suggestion = 0;
            }
            SurfaceEvent::TurnFinished(report) => self.finish_turn(report),
        }
    }

    fn finish_turn(&mut self, report: TurnReport) {
        tracing::debug!(?report, "turn report");
        let mut surface = self.surface.clone();
        self.conversation.complete(&mut surface);
    }

    /// Waiting on the model: the turn is running but no reply bubble exists yet.
    pub fn is_thinking(&self) -> bool {
        self.conversation.is_busy()
            && matches!(self.messages.last(), Some(msg) if msg.role == ChatRole::User)
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_thinking() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Suggestion bar navigation
    pub fn suggestion_next(&mut self) {
        let len = self.suggestions.len();
        if len > 0 {
            self.selected_suggestion = (self.selected_suggestion + 1) % len;
        }
    }

    pub fn suggestion_prev(&mut self) {
        let len = self.suggestions.len();
        if len > 0 {
            self.selected_suggestion = (self.selected_suggestion + len - 1) % len;
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPane::Input if !self.suggestions.is_empty() => FocusPane::Suggestions,
            _ => FocusPane::Input,
        };
    }

    // Chat history scrolling; manual scrolling stops following new text
    pub fn scroll_up(&mut self, lines: u16) {
        self.follow_latest = false;
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16, total_lines: u16) {
        let max_scroll = total_lines.saturating_sub(self.chat_height);
        self.chat_scroll = (self.chat_scroll + lines).min(max_scroll);
        self.follow_latest = self.chat_scroll >= max_scroll;
    }
}
