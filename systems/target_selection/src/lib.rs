#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ranks the board's collectibles by distance from an agent.
//!
//! The selector rescans the whole board on every call rather than keeping an
//! index, which keeps it trivially correct under concurrent tile consumption
//! at O(size²) cost per call.

use maze_chase_core::{Grid, GridPos, Tile};

/// Binary min-heap keyed by a numeric priority.
///
/// `insert` and `extract_min` are O(log n). No ordering is guaranteed among
/// entries with equal priorities.
#[derive(Clone, Debug, Default)]
pub struct MinHeap<T> {
    slots: Vec<Slot<T>>,
}

#[derive(Clone, Debug)]
struct Slot<T> {
    priority: f64,
    value: T,
}

impl<T> MinHeap<T> {
    /// Creates an empty heap.
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Reports whether the heap holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Puts a value into the heap. A smaller priority is served earlier.
    pub fn insert(&mut self, priority: f64, value: T) {
        self.slots.push(Slot { priority, value });
        self.sift_up(self.slots.len() - 1);
    }

    /// Retrieves and removes the entry with the smallest priority, or `None`
    /// when the heap is empty.
    pub fn extract_min(&mut self) -> Option<T> {
        if self.slots.is_empty() {
            return None;
        }
        let last = self.slots.len() - 1;
        self.slots.swap(0, last);
        let root = self.slots.pop()?;
        if !self.slots.is_empty() {
            self.sift_down(0);
        }
        Some(root.value)
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.slots[index].priority >= self.slots[parent].priority {
                break;
            }
            self.slots.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.slots.len();
        loop {
            let left = index * 2 + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.slots[left].priority < self.slots[smallest].priority {
                smallest = left;
            }
            if right < len && self.slots[right].priority < self.slots[smallest].priority {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.slots.swap(index, smallest);
            index = smallest;
        }
    }
}

/// Outcome of one collectible scan: the ranked destinations and the count of
/// tokens still on the board.
#[derive(Clone, Debug)]
pub struct Ranking {
    destinations: MinHeap<GridPos>,
    tokens_remaining: u32,
}

impl Ranking {
    /// Retrieves and removes the nearest remaining destination.
    pub fn next_destination(&mut self) -> Option<GridPos> {
        self.destinations.extract_min()
    }

    /// Number of destinations not yet dequeued.
    #[must_use]
    pub fn destination_count(&self) -> usize {
        self.destinations.len()
    }

    /// Count of token tiles observed during the scan.
    ///
    /// A zero count is the terminal signal that the collectible phase of the
    /// game has ended; the caller surfaces it to the game-over collaborator.
    #[must_use]
    pub const fn tokens_remaining(&self) -> u32 {
        self.tokens_remaining
    }
}

/// Scans the board and ranks every collectible cell by Euclidean distance
/// from `agent_pos`, nearest first.
///
/// Hazard and occupant cells are never destinations. The returned ranking
/// also reports how many tokens remain on the board.
#[must_use]
pub fn rank_collectibles(grid: &Grid, agent_pos: GridPos) -> Ranking {
    let mut destinations = MinHeap::new();
    let mut tokens_remaining = 0;

    for row in 0..grid.size() {
        for col in 0..grid.size() {
            let pos = GridPos::new(row, col);
            let tile = grid.tile_at(pos);
            if tile.is_collectible() {
                destinations.insert(agent_pos.euclidean_distance(pos), pos);
            }
            if tile == Tile::Token {
                tokens_remaining += 1;
            }
        }
    }

    Ranking {
        destinations,
        tokens_remaining,
    }
}
