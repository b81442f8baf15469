use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};

use crate::board::Board;
use crate::search::Outcome;
use crate::solvability::{inversions, is_solvable};

/// Writes solver results for a human. Formatting only; nothing here decides
/// anything about the puzzle.
pub struct Report<W: Write> {
    out: W,
    color: bool,
    quiet: bool,
}

impl<W: Write> Report<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            color: true,
            quiet: false,
        }
    }

    /// Disable escape codes.
    pub fn plain(mut self, plain: bool) -> Self {
        self.color = !plain;
        self
    }

    /// Print only the move count, not every intermediate board.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// State tuple, inversion count and solvability verdict.
    pub fn summary(&mut self, board: &Board) -> io::Result<()> {
        let tiles: Vec<String> = board.tiles().iter().map(|t| t.to_string()).collect();
        writeln!(self.out, "State: ({})", tiles.join(", "))?;
        writeln!(self.out, "Inversions: {}", inversions(board))?;
        writeln!(self.out, "Solvable: {}", is_solvable(board))?;
        writeln!(self.out)
    }

    pub fn outcome(&mut self, outcome: &Outcome) -> io::Result<()> {
        match outcome {
            Outcome::Unsolvable => writeln!(self.out, "No solution\n"),
            Outcome::Cancelled { expanded } => {
                writeln!(self.out, "Search cancelled after {} expansions\n", expanded)
            }
            Outcome::Solved(solution) => {
                writeln!(
                    self.out,
                    "Solution in {} moves ({} expanded, {} generated, frontier peak {}):\n",
                    solution.len(),
                    solution.stats.expanded,
                    solution.stats.generated,
                    solution.stats.max_frontier
                )?;
                if self.quiet {
                    return Ok(());
                }

                self.board(solution.start(), None)?;
                for (pair, mv) in solution.states.windows(2).zip(&solution.moves) {
                    writeln!(self.out, "{}:", mv)?;
                    self.board(&pair[1], Some(pair[0].blank()))?;
                }
                self.out.flush()
            }
        }
    }

    /// One grid followed by a blank line; `moved` is the flat index of the
    /// tile that just slid, highlighted in colour mode.
    fn board(&mut self, board: &Board, moved: Option<usize>) -> io::Result<()> {
        if !self.color {
            return writeln!(self.out, "{}", board);
        }

        let width = (board.tiles().len() - 1).to_string().len();
        for (i, &tile) in board.tiles().iter().enumerate() {
            let col = i % board.size();
            if col > 0 {
                queue!(self.out, Print(" "))?;
            }
            if tile == 0 {
                queue!(
                    self.out,
                    SetForegroundColor(Color::DarkGrey),
                    Print(format!("{:>width$}", ".")),
                    ResetColor
                )?;
            } else if moved == Some(i) {
                queue!(
                    self.out,
                    SetForegroundColor(Color::Yellow),
                    SetAttribute(Attribute::Bold),
                    Print(format!("{:>width$}", tile)),
                    SetAttribute(Attribute::Reset),
                    ResetColor
                )?;
            } else {
                queue!(self.out, Print(format!("{:>width$}", tile)))?;
            }
            if col == board.size() - 1 {
                queue!(self.out, Print("\n"))?;
            }
        }
        queue!(self.out, Print("\n"))
    }
}
