use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::BoardError;
use crate::solvability;

pub type Tile = u8;

/// Largest supported width; every tile of a 16x16 board still fits in a byte.
pub const MAX_SIZE: usize = 16;
pub const MIN_SIZE: usize = 2;

/// Direction the moved tile slides into the blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Left,
    Down,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Offset of the tile that moves, relative to the blank.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (1, 0),
            Move::Left => (0, 1),
            Move::Down => (-1, 0),
            Move::Right => (0, -1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    /// The single slide that turns `from` into `to`, if the boards are adjacent.
    pub fn between(from: &Board, to: &Board) -> Option<Move> {
        if from.size != to.size {
            return None;
        }
        Move::ALL
            .into_iter()
            .find(|&mv| from.slide(mv).as_ref() == Some(to))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Left => "Left",
            Move::Down => "Down",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// An N x N arrangement of tiles, `0` being the blank, stored row-major.
///
/// Boards are values: nothing mutates one after construction, so they are
/// safe to use as map keys. Every transition produces a fresh board.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    tiles: Box<[Tile]>,
    blank: usize,
}

impl Board {
    /// Validates that `tiles` is a permutation of `0..size*size`.
    pub fn new(size: usize, tiles: &[Tile]) -> Result<Self, BoardError> {
        check_size(size)?;
        let cells = size * size;
        if tiles.len() != cells {
            return Err(BoardError::WrongLength {
                expected: cells,
                found: tiles.len(),
            });
        }

        let mut seen = vec![false; cells];
        for &tile in tiles {
            let tile = tile as usize;
            if tile >= cells {
                return Err(BoardError::OutOfRange {
                    tile,
                    max: cells - 1,
                });
            }
            if seen[tile] {
                return Err(BoardError::Duplicate(tile));
            }
            seen[tile] = true;
        }

        Ok(Self::from_valid(size, tiles.into()))
    }

    /// The solved board: tiles in reading order, blank last.
    pub fn goal(size: usize) -> Result<Self, BoardError> {
        check_size(size)?;
        Ok(Self::goal_unchecked(size))
    }

    /// The solved board of the same width as `self`.
    pub fn target(&self) -> Self {
        Self::goal_unchecked(self.size)
    }

    fn goal_unchecked(size: usize) -> Self {
        let cells = size * size;
        let tiles = (1..cells)
            .map(|t| t as Tile)
            .chain(std::iter::once(0))
            .collect();
        Self::from_valid(size, tiles)
    }

    fn from_valid(size: usize, tiles: Box<[Tile]>) -> Self {
        let blank = tiles.iter().position(|&t| t == 0).unwrap_or_default();
        Self { size, tiles, blank }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Flat index of the blank.
    pub fn blank(&self) -> usize {
        self.blank
    }

    /// `(row, column)` of the blank.
    pub fn blank_position(&self) -> (usize, usize) {
        (self.blank / self.size, self.blank % self.size)
    }

    pub fn is_goal(&self) -> bool {
        let last = self.tiles.len() - 1;
        self.tiles
            .iter()
            .enumerate()
            .all(|(i, &t)| if i == last { t == 0 } else { t as usize == i + 1 })
    }

    /// Board after sliding a neighbour of the blank into it, or `None` when
    /// that neighbour would be off the grid.
    pub fn slide(&self, movement: Move) -> Option<Self> {
        let (dr, dc) = movement.as_offset();
        let (row, col) = self.blank_position();

        let new_row = row as isize + dr;
        let new_col = col as isize + dc;
        let bound = self.size as isize;
        if new_row < 0 || new_row >= bound || new_col < 0 || new_col >= bound {
            return None;
        }

        let target = new_row as usize * self.size + new_col as usize;
        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, target);
        Some(Self {
            size: self.size,
            tiles,
            blank: target,
        })
    }

    /// Every board one slide away: four from the interior, three from an
    /// edge, two from a corner.
    pub fn successors(&self) -> Vec<(Move, Self)> {
        let mut out = Vec::with_capacity(4);
        for mv in Move::ALL {
            if let Some(next) = self.slide(mv) {
                out.push((mv, next));
            }
        }
        out
    }

    /// Uniformly shuffled board, redrawn until it can reach the goal.
    pub fn random_solvable<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self, BoardError> {
        let mut tiles = Self::goal(size)?.tiles.into_vec();
        loop {
            tiles.shuffle(rng);
            let board = Self::from_valid(size, tiles.clone().into_boxed_slice());
            if solvability::is_solvable(&board) {
                return Ok(board);
            }
        }
    }

    /// Random walk of `steps` slides away from the goal. The walk never undoes
    /// its previous slide, but it can still wander back towards the goal, so
    /// `steps` is an upper bound on the optimal solution length.
    pub fn scrambled<R: Rng + ?Sized>(
        size: usize,
        steps: usize,
        rng: &mut R,
    ) -> Result<Self, BoardError> {
        let mut board = Self::goal(size)?;
        let mut last: Option<Move> = None;
        for _ in 0..steps {
            let options: Vec<(Move, Board)> = board
                .successors()
                .into_iter()
                .filter(|(mv, _)| last.map_or(true, |l| *mv != l.opposite()))
                .collect();
            // Any cell has at least two neighbours, so one survives the filter.
            if let Some((mv, next)) = options.choose(rng) {
                last = Some(*mv);
                board = next.clone();
            }
        }
        Ok(board)
    }
}

fn check_size(size: usize) -> Result<(), BoardError> {
    if (MIN_SIZE..=MAX_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(BoardError::UnsupportedSize(size))
    }
}

impl Index<(usize, usize)> for Board {
    type Output = Tile;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.tiles[row * self.size + col]
    }
}

/// Parses a whitespace or comma separated tile list; the width is inferred
/// from the number of tiles.
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .map(|t| t.trim_matches(|c| c == '(' || c == ')' || c == '[' || c == ']'))
            .filter(|t| !t.is_empty())
            .map(|t| t.parse::<usize>().map_err(|_| BoardError::Parse(t.to_string())))
            .collect::<Result<Vec<usize>, _>>()?;

        let size = (values.len() as f64).sqrt().round() as usize;
        if size * size != values.len() {
            return Err(BoardError::NotSquare(values.len()));
        }
        check_size(size)?;

        // Range-check against this board before narrowing to `Tile`.
        let cells = size * size;
        let tiles = values
            .into_iter()
            .map(|tile| {
                Tile::try_from(tile)
                    .ok()
                    .filter(|&t| (t as usize) < cells)
                    .ok_or(BoardError::OutOfRange {
                        tile,
                        max: cells - 1,
                    })
            })
            .collect::<Result<Vec<Tile>, _>>()?;
        Board::new(size, &tiles)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board{:?}", &self.tiles[..])
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.tiles.len() - 1).to_string().len();
        for row in self.tiles.chunks(self.size) {
            for (col, &val) in row.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                if val == 0 {
                    write!(f, "{:>width$}", ".")?;
                } else {
                    write!(f, "{:>width$}", val)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
