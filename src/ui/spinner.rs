use std::time::Duration;

/// Spinner animation frames, advanced once per [`FRAME_MS`].
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Milliseconds per spinner frame.
pub const FRAME_MS: u128 = 100;

/// Terminal icon shown after a successful finish.
pub const CHECK_MARK: &str = "✔";

/// Terminal icon shown after a failed finish.
pub const WARNING_MARK: &str = "⚠";

/// Glyph of the dismiss control.
pub const CLOSE_MARK: &str = "✕";

/// Spinner frame for a widget that has been alive for `elapsed`.
pub fn frame_at(elapsed: Duration) -> &'static str {
    let idx = (elapsed.as_millis() / FRAME_MS) as usize % SPINNER_FRAMES.len();
    SPINNER_FRAMES[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_cycle() {
        assert_eq!(frame_at(Duration::ZERO), SPINNER_FRAMES[0]);
        assert_eq!(frame_at(Duration::from_millis(150)), SPINNER_FRAMES[1]);
        let full_cycle = Duration::from_millis((FRAME_MS * SPINNER_FRAMES.len() as u128) as u64);
        assert_eq!(frame_at(full_cycle), SPINNER_FRAMES[0]);
    }
}
