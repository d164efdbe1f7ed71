//! The capability a UI offers the conversation controller.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::mood::Mood;
use crate::reveal::RevealOutcome;

/// Somewhere chat bubbles can be drawn.
///
/// Implemented by the terminal UI, the plain console, and test doubles.
/// Text passed in is plain data; implementations run it through
/// [`plain_text`] before display.
#[async_trait]
pub trait ChatSurface: Send {
    /// Right-aligned user bubble, shown at once, then scroll to it.
    fn append_user_bubble(&mut self, text: &str);

    /// Left-aligned assistant bubble with the avatar for `mood`, revealed
    /// one character at a time. Resolves when the last character is shown.
    async fn append_assistant_bubble(&mut self, text: &str, mood: Mood, cancel: &CancellationToken) -> RevealOutcome;

    fn scroll_to_latest(&mut self);

    fn set_input_enabled(&mut self, enabled: bool);

    fn clear_input(&mut self);

    fn focus_input(&mut self);

    fn show_suggestions(&mut self, suggestions: &[String]);
}

/// Strip control characters (escape sequences included) except newline and tab.
pub fn plain_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_drops_escape_sequences() {
        assert_eq!(plain_text("\u{1b}[2Jboo"), "[2Jboo");
        assert_eq!(plain_text("a\u{7}b\rc"), "abc");
    }

    #[test]
    fn test_plain_text_keeps_markup_and_layout() {
        let text = "<img src=x onerror=alert(1)>\n\tindented";
        assert_eq!(plain_text(text), text);
    }
}
