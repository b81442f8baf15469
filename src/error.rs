use thiserror::Error;

/// Reasons a tile sequence is not a usable board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error(
        "unsupported board size {0} (expected {min}..={max})",
        min = crate::board::MIN_SIZE,
        max = crate::board::MAX_SIZE
    )]
    UnsupportedSize(usize),
    #[error("expected {expected} tiles, found {found}")]
    WrongLength { expected: usize, found: usize },
    #[error("tile {tile} out of range (max {max})")]
    OutOfRange { tile: usize, max: usize },
    #[error("tile {0} appears more than once")]
    Duplicate(usize),
    #[error("cannot parse tile {0:?}")]
    Parse(String),
    #[error("{0} tiles do not form a square board")]
    NotSquare(usize),
}

#[derive(Error, Debug)]
pub enum SolveError {
    #[error("invalid board: {0}")]
    InvalidInput(#[from] BoardError),
    /// The frontier ran dry on a board the classifier accepted. Only a bug in
    /// move generation or the classifier can get here.
    #[error("frontier exhausted after {expanded} expansions on a solvable board")]
    Exhausted { expanded: usize },
}
