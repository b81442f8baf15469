//! A* over board states.
//!
//! The frontier is a min-heap keyed on `(f, tag)` where `tag` is a running
//! insertion counter, so equal-cost entries come out in the order they went
//! in. A state may sit in the heap several times; an entry whose `g` is worse
//! than the state's recorded cost is stale and skipped when popped.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use log::{debug, error, info, trace};

use crate::board::{Board, Move, Tile};
use crate::error::SolveError;
use crate::heuristic::manhattan_distance;
use crate::solvability::is_solvable;

/// Knobs for a single solve. A fresh engine is built per call, so nothing
/// here is shared between searches except the cancel flag the caller hands in.
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Stop with [`Outcome::Cancelled`] after this many expansions.
    pub max_expansions: Option<usize>,
    /// Checked before every expansion; setting it stops the search.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl SolverConfig {
    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn should_stop(&self, expanded: usize) -> bool {
        if self.max_expansions.is_some_and(|limit| expanded >= limit) {
            return true;
        }
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(AtomicOrdering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States taken off the frontier and expanded (stale entries excluded).
    pub expanded: usize,
    /// Frontier insertions, including re-insertions at a better cost.
    pub generated: usize,
    /// Largest frontier length seen.
    pub max_frontier: usize,
    /// Popped entries dropped because a cheaper path had already been found.
    pub stale: usize,
    /// Expansions of a board that had been expanded before. Stays zero under
    /// a consistent heuristic.
    pub reopened: usize,
}

/// An optimal path from the start board to the goal.
#[derive(Debug, Clone)]
pub struct Solution {
    /// `[start, ..., goal]`.
    pub states: Vec<Board>,
    /// `moves[i]` turns `states[i]` into `states[i + 1]`.
    pub moves: Vec<Move>,
    pub stats: SearchStats,
}

impl Solution {
    /// Number of slides.
    pub fn len(&self) -> usize {
        self.states.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn start(&self) -> &Board {
        &self.states[0]
    }
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Solved(Solution),
    /// Parity says the goal is unreachable. Decided before any search.
    Unsolvable,
    /// Stopped by the expansion limit or the cancel flag.
    Cancelled { expanded: usize },
}

impl Outcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Outcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct FrontierEntry {
    f: usize,
    tag: u64,
    g: usize,
    node: usize,
}

// Reversed so the max-heap pops the lowest (f, tag) first.
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.tag.cmp(&self.tag))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Node {
    board: Board,
    /// Best known cost from the start.
    g: usize,
    /// Node this one was reached from on its best known path.
    parent: Option<usize>,
    expanded: bool,
}

/// State for one A* run. Boards are interned into `nodes`; `index` maps a
/// board to its slot, so the slot's `g` is the cost map and its `parent`
/// the predecessor map.
struct Search<'a> {
    config: &'a SolverConfig,
    goal: Board,
    nodes: Vec<Node>,
    index: HashMap<Board, usize>,
    frontier: BinaryHeap<FrontierEntry>,
    next_tag: u64,
    stats: SearchStats,
}

enum SearchEnd {
    Found(usize),
    Exhausted,
    Cancelled,
}

impl<'a> Search<'a> {
    fn new(config: &'a SolverConfig, start: &Board) -> Self {
        let mut search = Self {
            config,
            goal: start.target(),
            nodes: Vec::new(),
            index: HashMap::new(),
            frontier: BinaryHeap::new(),
            next_tag: 0,
            stats: SearchStats::default(),
        };
        search.index.insert(start.clone(), 0);
        search.nodes.push(Node {
            board: start.clone(),
            g: 0,
            parent: None,
            expanded: false,
        });
        search.push(0, 0, manhattan_distance(start));
        search
    }

    fn push(&mut self, node: usize, g: usize, h: usize) {
        self.frontier.push(FrontierEntry {
            f: g + h,
            tag: self.next_tag,
            g,
            node,
        });
        self.next_tag += 1;
        self.stats.generated += 1;
        self.stats.max_frontier = self.stats.max_frontier.max(self.frontier.len());
    }

    fn run(&mut self) -> SearchEnd {
        while let Some(entry) = self.frontier.pop() {
            if entry.g > self.nodes[entry.node].g {
                trace!("skipping stale entry g={} f={}", entry.g, entry.f);
                self.stats.stale += 1;
                continue;
            }
            if self.nodes[entry.node].board == self.goal {
                return SearchEnd::Found(entry.node);
            }
            if self.config.should_stop(self.stats.expanded) {
                return SearchEnd::Cancelled;
            }

            let node = &mut self.nodes[entry.node];
            if node.expanded {
                trace!("reopening {:?} at g={}", node.board, entry.g);
                self.stats.reopened += 1;
            }
            node.expanded = true;

            self.stats.expanded += 1;
            self.expand(entry.node, entry.g);
        }
        SearchEnd::Exhausted
    }

    fn expand(&mut self, current: usize, g: usize) {
        let tentative = g + 1;
        for (_, next) in self.nodes[current].board.successors() {
            let node = match self.index.entry(next) {
                Entry::Occupied(slot) => {
                    let node = *slot.get();
                    if tentative >= self.nodes[node].g {
                        continue;
                    }
                    self.nodes[node].g = tentative;
                    self.nodes[node].parent = Some(current);
                    node
                }
                Entry::Vacant(slot) => {
                    let node = self.nodes.len();
                    self.nodes.push(Node {
                        board: slot.key().clone(),
                        g: tentative,
                        parent: Some(current),
                        expanded: false,
                    });
                    slot.insert(node);
                    node
                }
            };
            let h = manhattan_distance(&self.nodes[node].board);
            self.push(node, tentative, h);
        }
    }

    /// Walks predecessors back from `end` and returns the boards start-first.
    fn reconstruct(&self, end: usize) -> Vec<Board> {
        let mut path = vec![self.nodes[end].board.clone()];
        let mut current = end;
        while let Some(parent) = self.nodes[current].parent {
            path.push(self.nodes[parent].board.clone());
            current = parent;
        }
        path.reverse();
        path
    }
}

/// Moves connecting each consecutive pair of boards in `path`.
pub fn moves_along(path: &[Board]) -> Vec<Move> {
    path.windows(2)
        .filter_map(|pair| Move::between(&pair[0], &pair[1]))
        .collect()
}

/// Runs A* without consulting the parity check. On an unsolvable board this
/// explores the whole reachable half of the state space before giving up.
pub fn astar(start: &Board, config: &SolverConfig) -> Result<Outcome, SolveError> {
    let mut search = Search::new(config, start);
    match search.run() {
        SearchEnd::Found(end) => {
            let states = search.reconstruct(end);
            let moves = moves_along(&states);
            info!(
                "solved in {} moves ({} expanded, {} generated)",
                moves.len(),
                search.stats.expanded,
                search.stats.generated
            );
            Ok(Outcome::Solved(Solution {
                states,
                moves,
                stats: search.stats,
            }))
        }
        SearchEnd::Cancelled => {
            info!("search cancelled after {} expansions", search.stats.expanded);
            Ok(Outcome::Cancelled {
                expanded: search.stats.expanded,
            })
        }
        SearchEnd::Exhausted => Err(SolveError::Exhausted {
            expanded: search.stats.expanded,
        }),
    }
}

/// Gates on solvability, then searches for an optimal path.
pub fn solve_with(start: &Board, config: &SolverConfig) -> Result<Outcome, SolveError> {
    debug!("solving {:?}", start);
    if !is_solvable(start) {
        info!("{:?} is unsolvable", start);
        return Ok(Outcome::Unsolvable);
    }
    astar(start, config).inspect_err(|err| {
        error!("{}", err);
    })
}

pub fn solve(start: &Board) -> Result<Outcome, SolveError> {
    solve_with(start, &SolverConfig::default())
}

/// Validates raw tiles, then solves them.
pub fn solve_tiles(tiles: &[Tile], size: usize) -> Result<Outcome, SolveError> {
    let start = Board::new(size, tiles)?;
    solve(&start)
}
