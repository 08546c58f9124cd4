//! Terminal lifecycle and painting.
//!
//! [`TerminalSession`] puts the terminal in raw mode on the alternate screen
//! and restores it when dropped, including when the host loop returns an
//! error.

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::Print;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};
use std::panic;
use tracing::debug;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub struct TerminalSession {
    stdout: Stdout,
}

impl TerminalSession {
    /// Enter raw mode and the alternate screen.
    pub fn enter() -> Result<Self> {
        install_panic_hook();
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide).context("Failed to enter alternate screen")?;
        debug!("terminal session entered");
        Ok(Self { stdout })
    }

    /// Redraw the whole screen from `lines`.
    ///
    /// Lines are wrapped to the terminal width. When they do not fit, the
    /// newest ones stay visible.
    pub fn paint(&mut self, lines: &[String]) -> Result<()> {
        let (width, height) = terminal::size().context("Failed to read terminal size")?;
        let wrapped = wrap_lines(lines, usize::from(width));
        let visible = &wrapped[wrapped.len().saturating_sub(usize::from(height))..];

        queue!(self.stdout, Clear(ClearType::All))?;
        for (row, line) in (0u16..).zip(visible) {
            queue!(self.stdout, MoveTo(0, row), Print(line))?;
        }
        self.stdout.flush().context("Failed to flush terminal")?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

fn restore_terminal() -> Result<()> {
    execute!(io::stdout(), Show, LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    disable_raw_mode().context("Failed to disable raw mode")?;
    Ok(())
}

fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

/// Break `lines` into rows at most `width` columns wide.
///
/// Widths are display columns, so wide glyphs count double. A glyph wider
/// than `width` gets a row of its own. Empty lines stay as empty rows and a
/// zero width leaves lines unwrapped.
pub fn wrap_lines(lines: &[String], width: usize) -> Vec<String> {
    if width == 0 {
        return lines.to_vec();
    }
    let mut rows = Vec::with_capacity(lines.len());
    for line in lines {
        if UnicodeWidthStr::width(line.as_str()) <= width {
            rows.push(line.clone());
            continue;
        }
        let mut row = String::new();
        let mut row_width = 0;
        for ch in line.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if row_width + ch_width > width && !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }
            row.push(ch);
            row_width += ch_width;
        }
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn test_wrap_lines() {
        assert_eq!(
            wrap_lines(&owned(&["abcdefg", "", "hi"]), 3),
            owned(&["abc", "def", "g", "", "hi"])
        );
    }

    #[test]
    fn test_wrap_accented_chars() {
        assert_eq!(wrap_lines(&owned(&["ééé"]), 2), owned(&["éé", "é"]));
    }

    #[test]
    fn test_wrap_counts_display_columns() {
        let rows = wrap_lines(&owned(&["日本語テキスト"]), 4);
        assert_eq!(rows, owned(&["日本", "語テ", "キス", "ト"]));
        assert!(rows.iter().all(|row| UnicodeWidthStr::width(row.as_str()) <= 4));
    }

    #[test]
    fn test_wide_glyph_in_narrow_terminal() {
        assert_eq!(wrap_lines(&owned(&["a日b"]), 1), owned(&["a", "日", "b"]));
    }

    #[test]
    fn test_zero_width_keeps_lines() {
        assert_eq!(wrap_lines(&owned(&["abc"]), 0), owned(&["abc"]));
    }
}
