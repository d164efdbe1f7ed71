//! Character-by-character typing animation.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Delay after each revealed character.
pub const DEFAULT_REVEAL_SPEED: Duration = Duration::from_millis(40);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    Completed,
    Cancelled,
}

/// Reveal `text` one `char` at a time.
///
/// `on_char` runs for each character, then the task sleeps `speed`. The
/// future resolves after the last character's delay, or early with
/// `Cancelled` once `cancel` fires. Empty text completes immediately.
pub async fn reveal<F>(text: &str, speed: Duration, cancel: &CancellationToken, mut on_char: F) -> RevealOutcome
where
    F: FnMut(char),
{
    for ch in text.chars() {
        if cancel.is_cancelled() {
            return RevealOutcome::Cancelled;
        }
        on_char(ch);

        tokio::select! {
            _ = cancel.cancelled() => return RevealOutcome::Cancelled,
            _ = tokio::time::sleep(speed) => {}
        }
    }
    RevealOutcome::Completed
}
