use anyhow::Context;
use crossterm::{
    ExecutableCommand, cursor,
    terminal::{self, ClearType},
};
use std::io::{Stdout, Write, stdout};

/// Alternate screen with a hidden cursor for the lifetime of the guard.
///
/// Raw mode is left off: the preview reads no input, so Ctrl-C keeps working.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn new() -> anyhow::Result<Self> {
        let mut out = stdout();
        out.execute(terminal::EnterAlternateScreen)
            .context("enter alternate screen")?;
        // From here on Drop restores the primary screen if a later step fails.
        let guard = Self { _private: () };

        out.execute(terminal::Clear(ClearType::All))
            .context("clear screen")?;
        out.execute(cursor::Hide).context("hide cursor")?;
        Ok(guard)
    }

    pub fn stdout() -> Stdout {
        stdout()
    }

    /// Terminal size in cells, falling back to 80x24 when it cannot be queried.
    pub fn size() -> (u16, u16) {
        match terminal::size() {
            Ok(sz) => sz,
            Err(err) => {
                tracing::warn!(%err, "terminal size unavailable; assuming 80x24");
                (80, 24)
            }
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = stdout();
        // Best-effort: undo sync output, autowrap and color state.
        let _ = out.write_all(b"\x1b[?2026l\x1b[?7h\x1b[0m");
        let _ = out.flush();
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
    }
}
