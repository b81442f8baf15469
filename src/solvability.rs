use crate::board::{Board, Tile};
use crate::error::BoardError;

/// Number of tile pairs that appear in the opposite order to the goal,
/// ignoring the blank.
pub fn inversions(board: &Board) -> usize {
    count_inversions(board.tiles())
}

fn count_inversions(flattened: &[Tile]) -> usize {
    flattened
        .iter()
        .enumerate()
        .filter(|&(_, &val)| val != 0)
        .map(|(i, &val)| {
            flattened[i + 1..]
                .iter()
                .filter(|&&next| next != 0 && next < val)
                .count()
        })
        .sum()
}

/// Whether any sequence of slides takes `board` to the goal.
///
/// Odd widths: every slide preserves inversion parity, so the board is
/// solvable iff the inversion count is even. Even widths: a vertical slide
/// flips inversion parity and the blank's row together, so the board is
/// solvable iff inversion parity differs from the parity of the blank's row
/// counted from the bottom starting at 1.
pub fn is_solvable(board: &Board) -> bool {
    let inversions = inversions(board);
    let size = board.size();

    if size % 2 == 1 {
        inversions % 2 == 0
    } else {
        let (blank_row, _) = board.blank_position();
        let row_from_bottom = size - blank_row;
        inversions % 2 != row_from_bottom % 2
    }
}

/// Validates raw tiles, then classifies them.
pub fn is_solvable_tiles(tiles: &[Tile], size: usize) -> Result<bool, BoardError> {
    Board::new(size, tiles).map(|board| is_solvable(&board))
}
