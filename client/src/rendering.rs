//! Terminal frame drawing via crossterm.

use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use std::io::{self, Stdout, Write};

/// Owns the terminal: raw mode plus the alternate screen while alive,
/// restored on drop even when the main loop errors out.
pub struct Renderer {
    out: Stdout,
}

impl Renderer {
    pub fn new() -> io::Result<Renderer> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, cursor::Hide)?;
        Ok(Renderer { out })
    }

    /// Usable frame size; the last terminal row is kept for the status line.
    pub fn frame_size(&self) -> io::Result<(u16, u16)> {
        let (width, height) = terminal::size()?;
        Ok((width, height.saturating_sub(1)))
    }

    pub fn draw(&mut self, rows: &[String], status: &str) -> io::Result<()> {
        for (index, row) in rows.iter().enumerate() {
            queue!(
                self.out,
                cursor::MoveTo(0, index as u16),
                Clear(ClearType::CurrentLine),
                Print(row)
            )?;
        }
        queue!(
            self.out,
            cursor::MoveTo(0, rows.len() as u16),
            Clear(ClearType::CurrentLine),
            Print(status)
        )?;
        self.out.flush()
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        let _ = execute!(self.out, cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
