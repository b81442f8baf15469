use crate::board::Board;

/// Sum over every non-blank tile of its Manhattan distance to its goal cell.
///
/// Each slide moves one tile by one cell, so this never overestimates the
/// remaining number of moves, and it changes by exactly one per slide.
pub fn manhattan_distance(board: &Board) -> usize {
    let size = board.size();
    board
        .tiles()
        .iter()
        .enumerate()
        .filter(|&(_, &value)| value != 0)
        .map(|(i, &value)| {
            let (row, col) = (i / size, i % size);
            let target = value as usize - 1;
            let (target_row, target_col) = (target / size, target % size);
            row.abs_diff(target_row) + col.abs_diff(target_col)
        })
        .sum()
}
