//! Cross-checks the closed-form parts of the solver against breadth-first
//! search over the whole 3x3 (and 2x2) state space.

use std::collections::{HashMap, VecDeque};
use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::SeedableRng;

use slider_puzzle::heuristic::manhattan_distance;
use slider_puzzle::{is_solvable, solve, Board, Move, Outcome, Solution, Tile};

/// Exact distance to the goal for every board that can reach it.
fn distances(size: usize) -> HashMap<Board, usize> {
    let goal = Board::goal(size).unwrap();
    let mut dist = HashMap::from([(goal.clone(), 0)]);
    let mut queue = VecDeque::from([goal]);
    while let Some(board) = queue.pop_front() {
        let d = dist[&board];
        for (_, next) in board.successors() {
            if !dist.contains_key(&next) {
                dist.insert(next.clone(), d + 1);
                queue.push_back(next);
            }
        }
    }
    dist
}

fn eight_puzzle() -> &'static HashMap<Board, usize> {
    static DIST: OnceLock<HashMap<Board, usize>> = OnceLock::new();
    DIST.get_or_init(|| distances(3))
}

fn permutations(items: &mut Vec<Tile>, k: usize, out: &mut Vec<Vec<Tile>>) {
    if k == items.len() {
        out.push(items.clone());
        return;
    }
    for i in k..items.len() {
        items.swap(k, i);
        permutations(items, k + 1, out);
        items.swap(k, i);
    }
}

fn solved(outcome: Outcome) -> Solution {
    outcome
        .solution()
        .cloned()
        .unwrap_or_else(|| panic!("expected a solution, got {:?}", outcome))
}

fn assert_adjacent_steps(solution: &Solution) {
    for pair in solution.states.windows(2) {
        assert!(
            Move::between(&pair[0], &pair[1]).is_some(),
            "{:?} -> {:?} is not one slide",
            pair[0],
            pair[1]
        );
    }
}

#[test_log::test]
fn reachable_half_of_three_by_three() {
    assert_eq!(eight_puzzle().len(), 181_440);
}

#[test_log::test]
fn classifier_matches_reachability() {
    let reachable = eight_puzzle();
    let mut all = Vec::new();
    permutations(&mut (0..9).collect::<Vec<Tile>>(), 0, &mut all);
    assert_eq!(all.len(), 362_880);

    for tiles in all {
        let board = Board::new(3, &tiles).unwrap();
        assert_eq!(
            is_solvable(&board),
            reachable.contains_key(&board),
            "{:?}",
            board
        );
    }
}

#[test_log::test]
fn classifier_matches_reachability_on_two_by_two() {
    let reachable = distances(2);
    let mut all = Vec::new();
    permutations(&mut (0..4).collect::<Vec<Tile>>(), 0, &mut all);
    for tiles in all {
        let board = Board::new(2, &tiles).unwrap();
        assert_eq!(is_solvable(&board), reachable.contains_key(&board));
    }
}

#[test_log::test]
fn manhattan_never_overestimates() {
    for (board, &d) in eight_puzzle() {
        assert!(manhattan_distance(board) <= d, "{:?}", board);
    }
}

#[test_log::test]
fn astar_matches_bfs_distance() {
    let mut boards: Vec<(&Board, usize)> = eight_puzzle().iter().map(|(b, &d)| (b, d)).collect();
    boards.sort_by(|a, b| a.0.tiles().cmp(b.0.tiles()));

    for (board, d) in boards.into_iter().step_by(1_500) {
        let solution = solved(solve(board).unwrap());
        assert_eq!(solution.len(), d, "{:?}", board);
        assert_eq!(solution.start(), board);
        assert!(solution.states.last().unwrap().is_goal());
        assert_adjacent_steps(&solution);
    }
}

#[test_log::test]
fn hardest_eight_puzzle_takes_thirty_one_moves() {
    let board = Board::new(3, &[8, 6, 7, 2, 5, 4, 3, 0, 1]).unwrap();
    assert_eq!(eight_puzzle()[&board], 31);
    let solution = solved(solve(&board).unwrap());
    assert_eq!(solution.len(), 31);
    assert_adjacent_steps(&solution);
}

#[test_log::test]
fn every_two_by_two_board_solves_optimally() {
    for (board, d) in distances(2) {
        assert_eq!(solved(solve(&board).unwrap()).len(), d);
    }
}

#[test_log::test]
fn outcome_exposes_solution_only_when_solved() {
    let unsolvable = Board::new(3, &[1, 2, 3, 4, 5, 6, 8, 7, 0]).unwrap();
    assert!(solve(&unsolvable).unwrap().solution().is_none());

    let goal = Board::goal(3).unwrap();
    let outcome = solve(&goal).unwrap();
    assert_eq!(outcome.solution().map(Solution::len), Some(0));
}

#[test_log::test]
fn short_fifteen_puzzle_walks() {
    let mut rng = StdRng::seed_from_u64(15);
    for _ in 0..10 {
        let board = Board::scrambled(4, 20, &mut rng).unwrap();
        let solution = solved(solve(&board).unwrap());
        assert!(solution.len() <= 20);
        // Every slide moves the blank to a cell of the other colour.
        assert_eq!(solution.len() % 2, 0);
        assert_adjacent_steps(&solution);
    }
}
