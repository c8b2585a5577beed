//! Terminal output for boards and move lists.

use crossterm::queue;
use crossterm::style::{Print, PrintStyledContent, Stylize};
use std::io::{self, Write};

use crate::puzzle::{Board, Move, EMPTY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Bare digits, one row per line.
    Plain,
    /// Dim hole, green upright pieces, yellow everything else.
    #[default]
    Colored,
}

pub fn write_board<W: Write>(w: &mut W, board: &Board, style: Style) -> io::Result<()> {
    if style == Style::Plain {
        return write!(w, "{}", board);
    }
    for row in board.rows() {
        for &val in row {
            let cell = val.to_string();
            let styled = match val {
                EMPTY => cell.dark_grey(),
                1 => cell.green().bold(),
                _ => cell.yellow(),
            };
            queue!(w, PrintStyledContent(styled), Print(" "))?;
        }
        queue!(w, Print("\n"))?;
    }
    w.flush()
}

pub fn write_moves<W: Write>(w: &mut W, moves: &[Move]) -> io::Result<()> {
    for m in moves {
        writeln!(w, "{}", m)?;
    }
    Ok(())
}
