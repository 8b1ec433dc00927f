//! Terminal plumbing: screen clearing, sizing, and the input prompt.

use std::io::{self, BufRead, Write};

use crossterm::style::Stylize;
use crossterm::{cursor, execute, terminal};

const FALLBACK_WIDTH: usize = 80;
const FALLBACK_HEIGHT: usize = 24;

/// Current terminal (width, height) in cells, with a conventional fallback
/// when stdout is not a tty.
pub fn terminal_size() -> (usize, usize) {
    terminal::size()
        .map(|(w, h)| (w as usize, h as usize))
        .unwrap_or((FALLBACK_WIDTH, FALLBACK_HEIGHT))
}

/// Clear the screen and home the cursor.
pub fn clear_screen() -> io::Result<()> {
    execute!(
        io::stdout(),
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )
}

/// Print blank lines so the prompt ends up on the bottom row.
pub fn pad_to_bottom<W: Write>(out: &mut W, lines_printed: usize, height: usize) -> io::Result<()> {
    // Leave one row for the prompt itself.
    for _ in lines_printed..height.saturating_sub(1) {
        writeln!(out)?;
    }
    Ok(())
}

/// Print `prompt` and read one line from stdin.
///
/// Returns `None` on EOF (ctrl-d). The returned line is trimmed of
/// surrounding whitespace; internal whitespace is preserved.
pub fn read_prompt(prompt: &str, color: bool) -> io::Result<Option<String>> {
    let mut out = io::stdout();
    if color {
        write!(out, "{} ", prompt.bold())?;
    } else {
        write!(out, "{} ", prompt)?;
    }
    out.flush()?;
    read_line()
}

/// Read one trimmed line from stdin, `None` on EOF.
pub fn read_line() -> io::Result<Option<String>> {
    let mut line = String::new();
    let bytes = io::stdin().lock().read_line(&mut line)?;
    if bytes == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
