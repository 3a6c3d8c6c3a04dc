#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic board generation: maze carving and collectible seeding.
//!
//! Generation is reproducible under a fixed seed: a SHA-256 digest of the
//! seed, board size and attempt index yields a base seed, and labeled
//! streams derived from it feed independent SplitMix64 generators for the
//! carve walk, token placement and power-up placement.

use maze_chase_core::{BoardLayout, Grid, GridPos, GridSize, PowerUpKind, Tile};
use sha2::{Digest, Sha256};

const RNG_STREAM_CARVE: &str = "carve";
const RNG_STREAM_TOKENS: &str = "tokens";
const RNG_STREAM_POWER_UPS: &str = "power-ups";

const DEFAULT_BOARD_SIZE: u32 = 21;
const DEFAULT_BRANCH_FACTOR_ONE: u64 = 3;
const DEFAULT_BRANCH_FACTOR_TWO: u64 = 4;
const DEFAULT_TOKEN_RATE: u64 = 7;
const DEFAULT_POWER_UP_RATE: u64 = 20;

/// Minimum count of orthogonal wall neighbors that qualifies a cell for the
/// carve heuristic, which biases the walk toward cells that would otherwise
/// remain isolated pockets.
const CANDIDATE_WALL_THRESHOLD: u32 = 3;

const POWER_UP_KINDS: [PowerUpKind; 4] = [
    PowerUpKind::MoneyBag,
    PowerUpKind::Shoe,
    PowerUpKind::Shield,
    PowerUpKind::Mystery,
];

/// Configuration parameters required to generate a board.
#[derive(Clone, Copy, Debug)]
pub struct GenerationConfig {
    size: GridSize,
    seed: u64,
    branch_factor_one: u64,
    branch_factor_two: u64,
    token_rate: u64,
    power_up_rate: u64,
}

impl GenerationConfig {
    /// Creates a configuration with the default carve factors and
    /// collectible rates.
    #[must_use]
    pub const fn new(size: GridSize, seed: u64) -> Self {
        Self {
            size,
            seed,
            branch_factor_one: DEFAULT_BRANCH_FACTOR_ONE,
            branch_factor_two: DEFAULT_BRANCH_FACTOR_TWO,
            token_rate: DEFAULT_TOKEN_RATE,
            power_up_rate: DEFAULT_POWER_UP_RATE,
        }
    }

    /// Returns the configuration with the two carve branch probabilities
    /// replaced. A factor of `n` means a 1-in-`n` chance per carved cell.
    #[must_use]
    pub const fn with_branch_factors(mut self, first: u64, second: u64) -> Self {
        self.branch_factor_one = first;
        self.branch_factor_two = second;
        self
    }

    /// Returns the configuration with the collectible placement rates
    /// replaced. A rate of `n` means a 1-in-`n` chance per open cell.
    #[must_use]
    pub const fn with_collectible_rates(mut self, token_rate: u64, power_up_rate: u64) -> Self {
        self.token_rate = token_rate;
        self.power_up_rate = power_up_rate;
        self
    }

    /// Side length the generated board will have.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(GridSize::new(DEFAULT_BOARD_SIZE), 0)
    }
}

/// Generates a complete board: carved maze, spawn cells, tokens, power-ups.
///
/// Layouts without a valid spawn cell for each player are discarded and
/// generation retries under the next derived attempt seed, so the returned
/// layout always carries both spawns.
#[must_use]
pub fn generate(config: &GenerationConfig) -> BoardLayout {
    debug_assert!(
        config.size.get() >= 5,
        "board size must leave interior room for both spawn rows"
    );

    let mut attempt: u32 = 0;
    loop {
        let base_seed = derive_base_seed(config.seed, config.size.get(), attempt);
        let mut grid = Grid::new_filled(config.size, Tile::Wall);

        let mut carve_rng = SplitMix64::new(derive_labeled_seed(base_seed, RNG_STREAM_CARVE));
        carve_maze(&mut grid, config, &mut carve_rng);

        if let Some((hero_spawn, villain_spawn)) = place_players(&mut grid) {
            let mut token_rng =
                SplitMix64::new(derive_labeled_seed(base_seed, RNG_STREAM_TOKENS));
            place_tokens(&mut grid, config.token_rate, &mut token_rng);

            let mut power_up_rng =
                SplitMix64::new(derive_labeled_seed(base_seed, RNG_STREAM_POWER_UPS));
            place_power_ups(&mut grid, config.power_up_rate, &mut power_up_rng);

            return BoardLayout::new(grid, hero_spawn, villain_spawn);
        }

        attempt = attempt.wrapping_add(1);
    }
}

/// Carves the maze interior with an explicit work stack.
///
/// Each popped cell is processed atomically: it is opened, the two
/// probabilistic branch pushes are drawn, and every orthogonal neighbor
/// whose own wall-neighbor count meets [`CANDIDATE_WALL_THRESHOLD`] is
/// pushed, with one or two of those candidates re-pushed at random. Border
/// cells and already-open cells are discarded on pop, which terminates every
/// chain.
fn carve_maze(grid: &mut Grid, config: &GenerationConfig, rng: &mut SplitMix64) {
    let interior_span = u64::from(grid.size().saturating_sub(2));
    if interior_span == 0 {
        return;
    }

    let seed_row = (rng.next_u64() % interior_span) as u32 + 1;
    let seed_col = (rng.next_u64() % interior_span) as u32 + 1;

    let mut stack = vec![GridPos::new(seed_row, seed_col)];
    while let Some(pos) = stack.pop() {
        if !grid.interior_contains(pos) || grid.tile_at(pos) == Tile::Open {
            continue;
        }
        grid.set_tile(pos, Tile::Open);

        let left = GridPos::new(pos.row(), pos.col() - 1);
        let down = GridPos::new(pos.row() + 1, pos.col());

        if config.branch_factor_one != 0 && rng.next_u64() % config.branch_factor_one == 0 {
            stack.push(if rng.next_u64() % 2 == 0 { left } else { down });
        }
        if config.branch_factor_two != 0 && rng.next_u64() % config.branch_factor_two == 0 {
            stack.push(if rng.next_u64() % 2 == 0 { down } else { left });
        }

        let mut candidates = [None; 4];
        let mut candidate_count = 0;
        for neighbor in probe_neighbors(pos) {
            if wall_neighbor_count(grid, neighbor) >= CANDIDATE_WALL_THRESHOLD {
                candidates[candidate_count] = Some(neighbor);
                candidate_count += 1;
            }
        }

        // Last pushed pops first, so reversing preserves the probe order.
        for candidate in candidates.iter().take(candidate_count).rev().flatten() {
            stack.push(*candidate);
        }

        if candidate_count > 0 {
            let first = (rng.next_u64() % candidate_count as u64) as usize;
            if let Some(candidate) = candidates[first] {
                stack.push(candidate);
            }
            let second = (rng.next_u64() % candidate_count as u64) as usize;
            if second != first {
                if let Some(candidate) = candidates[second] {
                    stack.push(candidate);
                }
            }
        }
    }
}

/// Probe order matches the carve walk: +row, +col, -row, -col.
fn probe_neighbors(pos: GridPos) -> [GridPos; 4] {
    [
        GridPos::new(pos.row() + 1, pos.col()),
        GridPos::new(pos.row(), pos.col() + 1),
        GridPos::new(pos.row() - 1, pos.col()),
        GridPos::new(pos.row(), pos.col() - 1),
    ]
}

/// Counts the orthogonal neighbors of `pos` that hold walls. Neighbors
/// outside the board are not counted.
fn wall_neighbor_count(grid: &Grid, pos: GridPos) -> u32 {
    let mut count = 0;

    if let Some(row) = pos.row().checked_sub(1) {
        if grid.tile_at(GridPos::new(row, pos.col())) == Tile::Wall {
            count += 1;
        }
    }
    if let Some(col) = pos.col().checked_sub(1) {
        if grid.tile_at(GridPos::new(pos.row(), col)) == Tile::Wall {
            count += 1;
        }
    }

    let below = GridPos::new(pos.row() + 1, pos.col());
    if grid.contains(below) && grid.tile_at(below) == Tile::Wall {
        count += 1;
    }
    let right = GridPos::new(pos.row(), pos.col() + 1);
    if grid.contains(right) && grid.tile_at(right) == Tile::Wall {
        count += 1;
    }

    count
}

/// Stamps the spawn cells: the villain takes the first open cell of the top
/// interior row scanning left to right, the hero the first open cell of the
/// bottom interior row scanning right to left. Returns `None` when either
/// row carries no open cell.
fn place_players(grid: &mut Grid) -> Option<(GridPos, GridPos)> {
    let size = grid.size();
    let villain_row = 1;
    let hero_row = size - 2;

    let mut villain_spawn = None;
    for col in 1..size - 1 {
        let pos = GridPos::new(villain_row, col);
        if grid.tile_at(pos) == Tile::Open {
            villain_spawn = Some(pos);
            break;
        }
    }

    let mut hero_spawn = None;
    for col in (1..size - 1).rev() {
        let pos = GridPos::new(hero_row, col);
        if grid.tile_at(pos) == Tile::Open {
            hero_spawn = Some(pos);
            break;
        }
    }

    match (hero_spawn, villain_spawn) {
        (Some(hero), Some(villain)) => {
            grid.set_tile(hero, Tile::Hero);
            grid.set_tile(villain, Tile::Villain);
            Some((hero, villain))
        }
        _ => None,
    }
}

/// Scatters tokens over the open interior. After a placement the adjacent
/// column is skipped to spread tokens out.
fn place_tokens(grid: &mut Grid, token_rate: u64, rng: &mut SplitMix64) {
    if token_rate == 0 {
        return;
    }
    let size = grid.size();
    for row in 1..size - 1 {
        let mut col = 1;
        while col < size - 1 {
            let pos = GridPos::new(row, col);
            if grid.tile_at(pos) == Tile::Open && rng.next_u64() % token_rate == 0 {
                grid.set_tile(pos, Tile::Token);
                col += 1;
            }
            col += 1;
        }
    }
}

/// Scatters power-ups over the remaining open interior, drawing the kind
/// uniformly. Two columns are skipped after a placement to spread them out.
fn place_power_ups(grid: &mut Grid, power_up_rate: u64, rng: &mut SplitMix64) {
    if power_up_rate == 0 {
        return;
    }
    let size = grid.size();
    for row in 1..size - 1 {
        let mut col = 1;
        while col < size - 1 {
            let pos = GridPos::new(row, col);
            if grid.tile_at(pos) == Tile::Open && rng.next_u64() % power_up_rate == 0 {
                let kind = POWER_UP_KINDS[(rng.next_u64() % 4) as usize];
                grid.set_tile(pos, Tile::PowerUp(kind));
                col += 2;
            }
            col += 1;
        }
    }
}

fn derive_base_seed(seed: u64, size: u32, attempt: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(size.to_le_bytes());
    hasher.update(attempt.to_le_bytes());
    finalize_seed(hasher)
}

fn derive_labeled_seed(base: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(label.as_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}

#[derive(Debug)]
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9e37_79b9_7f4a_7c15 } else { seed };
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}
