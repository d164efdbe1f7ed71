use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};
use elfchat_core::{ChatMessage, ChatRole, Mood, PERSONA_NAME};

use crate::app::{App, FocusPane, Screen};

const USER_FACE: &str = "(•ᴗ•)";

/// Wrap text to fit within a given width, returning multiple lines
/// Uses word boundaries for wrapping; words longer than a line are split.
/// Newlines in the text always start a new line.
fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current_line = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            // Hard-break words that can never fit
            while word.len() > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current_line));
                    current_len = 0;
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let word_len = word.len();
            let word: String = word.into_iter().collect();

            if current_len == 0 {
                // First word on line
                current_line = word;
                current_len = word_len;
            } else if current_len + 1 + word_len <= width {
                // Word fits on current line
                current_line.push(' ');
                current_line.push_str(&word);
                current_len += 1 + word_len;
            } else {
                // Word doesn't fit, start new line
                lines.push(std::mem::replace(&mut current_line, word));
                current_len = word_len;
            }
        }

        // Don't forget the last line (an empty paragraph still takes one)
        if !current_line.is_empty() || lines.is_empty() || paragraph.trim().is_empty() {
            lines.push(current_line);
        }
    }

    lines
}

pub fn mood_color(mood: Mood) -> Color {
    match mood {
        Mood::Default => Color::Green,
        Mood::Happy => Color::Yellow,
        Mood::Thoughtful => Color::Blue,
        Mood::Teasing => Color::Magenta,
        Mood::Sad => Color::Cyan,
    }
}

/// Bubbles take up to three quarters of the chat width.
fn bubble_width(chat_width: u16) -> usize {
    let width = chat_width as usize;
    (width * 3 / 4).max(10).min(width.max(1))
}

fn message_lines(msg: &ChatMessage, chat_width: u16) -> Vec<Line<'static>> {
    let wrap_width = bubble_width(chat_width);
    let mut lines = Vec::new();

    match msg.role {
        ChatRole::User => {
            lines.push(
                Line::from(Span::styled(
                    format!("You {USER_FACE}"),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Right),
            );
            for line in wrap_text_to_width(&msg.content, wrap_width) {
                lines.push(Line::from(line).alignment(Alignment::Right));
            }
        }
        ChatRole::Assistant => {
            let mood = msg.mood.unwrap_or_default();
            let color = mood_color(mood);
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{} {PERSONA_NAME}", mood.avatar().face),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" · {mood}"), Style::default().fg(Color::DarkGray)),
            ]));
            for line in wrap_text_to_width(&msg.content, wrap_width) {
                lines.push(Line::from(Span::styled(line, Style::default().fg(color))));
            }
        }
    }

    lines.push(Line::default());
    lines
}

fn chat_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = app
        .messages
        .iter()
        .flat_map(|msg| message_lines(msg, app.chat_width))
        .collect();

    if app.is_thinking() {
        let face = Mood::Thoughtful.avatar().face;
        lines.push(Line::from(Span::styled(
            format!("{face} {PERSONA_NAME}"),
            Style::default().fg(mood_color(Mood::Thoughtful)).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

/// Total rendered lines of the chat history at the current width.
pub fn chat_line_count(app: &App) -> u16 {
    chat_lines(app).len().min(u16::MAX as usize) as u16
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.screen {
        Screen::Landing => render_landing(frame, body_area),
        Screen::Chat => render_chat_screen(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(format!(" {PERSONA_NAME} "), Style::default().fg(Color::Green).bold()),
        Span::styled(format!("[{}]", app.model_label), Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = match (app.screen, app.focus) {
        (Screen::Landing, _) => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" begin chat ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
        (Screen::Chat, FocusPane::Input) => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
            Span::styled(" Tab ", key_style),
            Span::styled(" suggestions ", label_style),
            Span::styled(" Alt+1-4 ", key_style),
            Span::styled(" ask suggestion ", label_style),
            Span::styled(" PgUp/PgDn ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" quit ", label_style),
        ],
        (Screen::Chat, FocusPane::Suggestions) => vec![
            Span::styled(" ←/→ ", key_style),
            Span::styled(" choose ", label_style),
            Span::styled(" Enter ", key_style),
            Span::styled(" ask ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" back to input ", label_style),
        ],
    };

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

fn render_landing(frame: &mut Frame, area: Rect) {
    let face = Mood::Default.avatar().face;
    let text = Text::from(vec![
        Line::default(),
        Line::from(Span::styled(face, Style::default().fg(Color::Green))),
        Line::default(),
        Line::from(Span::styled(
            format!("{PERSONA_NAME}, the elf mage"),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "She has wandered for a thousand years and has time to listen.",
            Style::default().fg(Color::Gray),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Press Enter to begin chat",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center);

    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage(25),
        Constraint::Min(0),
        Constraint::Percentage(25),
    ])
    .areas(area);

    frame.render_widget(Paragraph::new(text), middle);
}

fn render_chat_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [chat_area, suggestions_area, input_row] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(suggestion_rows(app.suggestions.len()) + 2),
        Constraint::Length(3),
    ])
    .areas(area);

    render_chat(app, frame, chat_area);
    render_suggestions(app, frame, suggestions_area);
    render_input(app, frame, input_row);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    app.chat_area = Some(area);
    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Chat ");

    let lines = if app.messages.is_empty() && !app.is_thinking() {
        vec![Line::from(Span::styled(
            "Say something, or pick a suggestion below...",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        chat_lines(app)
    };

    let total_lines = lines.len().min(u16::MAX as usize) as u16;
    let max_scroll = total_lines.saturating_sub(app.chat_height);
    if app.follow_latest {
        app.chat_scroll = max_scroll;
    } else {
        app.chat_scroll = app.chat_scroll.min(max_scroll);
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(block)
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_suggestions(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FocusPane::Suggestions;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }))
        .title(" Suggestions ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    app.suggestion_areas.clear();

    // Grid of buttons, SUGGESTION_COLUMNS per row, each cell an equal share
    let rows = Layout::vertical(vec![Constraint::Length(1); suggestion_rows(app.suggestions.len()) as usize])
        .split(inner);
    let ratio = Constraint::Ratio(1, SUGGESTION_COLUMNS as u32);
    let cells: Vec<Rect> = rows
        .iter()
        .flat_map(|row| Layout::horizontal(vec![ratio; SUGGESTION_COLUMNS]).split(*row).to_vec())
        .collect();

    for (i, (suggestion, cell)) in app.suggestions.iter().zip(cells).enumerate() {
        // One column gap between neighbours
        let rect = Rect { width: cell.width.saturating_sub(1), ..cell };
        let label = truncate_label(&format!(" {}:{} ", i + 1, suggestion), rect.width as usize);

        let style = if !app.input_enabled {
            Style::default().fg(Color::DarkGray)
        } else if focused && i == app.selected_suggestion {
            Style::default().bg(Color::Cyan).fg(Color::Black).add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::Gray).fg(Color::Black)
        };
        frame.render_widget(Paragraph::new(label).style(style), rect);

        app.suggestion_areas.push(rect);
    }
}

const SUGGESTION_COLUMNS: usize = 2;

/// Button rows needed for `count` suggestions (at least one).
fn suggestion_rows(count: usize) -> u16 {
    count.div_ceil(SUGGESTION_COLUMNS).max(1) as u16
}

/// Cut `label` to `width` columns, ending in an ellipsis when shortened.
fn truncate_label(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        return label.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = label.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

fn render_input(app: &mut App, frame: &mut Frame, area: Rect) {
    let [input_area, send_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(8),
    ])
    .areas(area);
    app.send_area = Some(send_area);

    let input_focused = app.focus == FocusPane::Input && app.input_enabled;
    let input_border_color = if input_focused { Color::Yellow } else { Color::DarkGray };

    let title = if app.input_enabled { " Message " } else { " Message (waiting...) " };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(input_border_color))
        .title(title);

    // Calculate visible portion of input with horizontal scrolling
    // Inner width = total width - 2 (for borders)
    let inner_width = input_area.width.saturating_sub(2) as usize;
    let cursor_pos = app.cursor;

    // Calculate scroll offset to keep cursor visible
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    // Get the visible slice of the input
    let visible_text: String = app.input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let text_color = if app.input_enabled { Color::Cyan } else { Color::DarkGray };
    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(text_color))
        .block(input_block);

    frame.render_widget(input, input_area);

    let send_style = if app.input_enabled {
        Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let send = Paragraph::new(Line::from(Span::styled(" Send ", send_style)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    frame.render_widget(send, send_area);

    // Show cursor while the input can be edited
    if input_focused {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((
            input_area.x + cursor_x + 1,
            input_area.y + 1,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_wrap_respects_width_and_newlines() {
        assert_eq!(wrap_text_to_width("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text_to_width("a\nb", 10), vec!["a", "b"]);
        assert_eq!(wrap_text_to_width("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text_to_width("", 5), vec![""]);
    }

    #[test]
    fn test_wrap_keeps_blank_paragraph() {
        assert_eq!(wrap_text_to_width("a\n\nb", 10), vec!["a", "", "b"]);
    }

    #[test]
    fn test_landing_screen() {
        let (mut app, _rx) = test_app();
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Press Enter to begin chat"));
        assert!(text.contains("ollama · echo"));
    }

    #[test]
    fn test_chat_bubbles_render_with_mood_avatar() {
        let (mut app, _rx) = test_app();
        app.screen = Screen::Chat;
        app.input_enabled = true;
        app.suggestions = vec!["Tell me a story".to_string()];
        app.messages = vec![
            ChatMessage::user("Tell me a story"),
            ChatMessage::assistant("Once upon a time.", Mood::Teasing),
        ];

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        let text = buffer_text(terminal.backend().buffer());

        assert!(text.contains("Once upon a time."));
        assert!(text.contains("(¬‿¬) Frieren"));
        assert!(text.contains("teasing"));
        assert!(text.contains("1:Tell me a story"));
        assert_eq!(app.suggestion_areas.len(), 1);
        assert!(app.send_area.is_some());
    }

    fn area_text(buffer: &Buffer, rect: Rect) -> String {
        (rect.x..rect.x + rect.width)
            .map(|x| buffer[(x, rect.y)].symbol().to_string())
            .collect()
    }

    fn chat_app_with(suggestions: &[&str]) -> App {
        let (mut app, _rx) = test_app();
        app.screen = Screen::Chat;
        app.input_enabled = true;
        app.suggestions = suggestions.iter().map(|s| s.to_string()).collect();
        app
    }

    #[test]
    fn test_four_suggestions_fit_on_standard_terminal() {
        let mut app = chat_app_with(&[
            "How can I stay calm and focused?",
            "What is your favorite spell?",
            "What's the meaning of life?",
            "Do you believe in spirits?",
        ]);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        let buffer = terminal.backend().buffer();

        assert_eq!(app.suggestion_areas.len(), 4);
        for (i, (rect, suggestion)) in app.suggestion_areas.iter().zip(&app.suggestions).enumerate() {
            let shown = area_text(buffer, *rect);
            assert!(shown.contains(&format!("{}:{}", i + 1, suggestion)), "{shown:?}");
        }
        // Two rows of two, no overlap
        let a = app.suggestion_areas[0];
        let d = app.suggestion_areas[3];
        assert_eq!(a.y, app.suggestion_areas[1].y);
        assert_eq!(d.y, a.y + 1);
        assert!(app.suggestion_areas[1].x >= a.x + a.width);
    }

    #[test]
    fn test_narrow_terminal_truncates_instead_of_dropping() {
        let mut app = chat_app_with(&[
            "Tell me a story",
            "Do you like magic?",
            "Tell me a fun fact",
            "How can I stay calm and focused?",
        ]);
        let mut terminal = Terminal::new(TestBackend::new(40, 24)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        let buffer = terminal.backend().buffer();

        assert_eq!(app.suggestion_areas.len(), 4);
        for (i, rect) in app.suggestion_areas.iter().enumerate() {
            assert!(rect.width > 0);
            assert!(area_text(buffer, *rect).contains(&format!("{}:", i + 1)));
        }
        assert!(area_text(buffer, app.suggestion_areas[3]).ends_with('…'));
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("abc", 3), "abc");
        assert_eq!(truncate_label("abcdef", 4), "abc…");
        assert_eq!(truncate_label("abc", 0), "");
    }

    #[test]
    fn test_follow_latest_scrolls_to_bottom() {
        let (mut app, _rx) = test_app();
        app.screen = Screen::Chat;
        app.messages = (0..30).map(|i| ChatMessage::user(format!("message {i}"))).collect();

        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let total = chat_line_count(&app);
        assert_eq!(app.chat_scroll, total - app.chat_height);
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("message 29"));
        assert!(!text.contains("message 0 "));
    }
}
