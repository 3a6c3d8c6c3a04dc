#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! adapters to react to deterministically. Systems consume immutable
//! snapshots and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Chase.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation clock by one tick.
    Tick,
    /// Requests that a player advance a single step in the given direction.
    MovePlayer {
        /// Player attempting the move.
        player: PlayerId,
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that a player plant a hazard on its current cell.
    DropHazard {
        /// Player planting the hazard.
        player: PlayerId,
    },
    /// Requests that the game end and the outcome be decided by score.
    EndGame,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Tick index reached after the advance.
        tick: u64,
    },
    /// Confirms that a player moved between two cells.
    PlayerMoved {
        /// Player that moved.
        player: PlayerId,
        /// Cell the player occupied before moving.
        from: GridPos,
        /// Cell the player occupies after the move.
        to: GridPos,
    },
    /// Reports that a collectible tile was consumed by a player.
    TileConsumed {
        /// Player that consumed the tile.
        player: PlayerId,
        /// Cell the tile occupied.
        position: GridPos,
        /// Tile code that was consumed.
        tile: Tile,
    },
    /// Reports a player's score after it changed.
    ScoreChanged {
        /// Player whose score changed.
        player: PlayerId,
        /// Score after the change.
        score: u32,
    },
    /// Reports the villain step cadence after it changed.
    DifficultyChanged {
        /// Cadence value now in effect.
        difficulty: Difficulty,
    },
    /// Announces that a player picked up shield protection.
    ShieldRaised {
        /// Player now protected.
        player: PlayerId,
    },
    /// Announces that a shield absorbed a hazard hit.
    ShieldBroken {
        /// Player whose shield was spent.
        player: PlayerId,
    },
    /// Announces that a player was stunned by a hazard.
    TimeoutStarted {
        /// Player frozen in place.
        player: PlayerId,
        /// Tick at which the player may move again.
        until_tick: u64,
    },
    /// Announces that a player's stun expired.
    TimeoutEnded {
        /// Player free to move again.
        player: PlayerId,
    },
    /// Confirms that a hazard was planted on the board.
    HazardPlaced {
        /// Player that planted the hazard.
        player: PlayerId,
        /// Cell now holding the hazard.
        position: GridPos,
    },
    /// Reports that an armed hazard detonated.
    HazardDetonated {
        /// Cell the hazard occupied.
        position: GridPos,
        /// Player that planted the hazard.
        owner: PlayerId,
    },
    /// Reports that a spent hazard burned out and left the board.
    HazardCleared {
        /// Cell the hazard vacated.
        position: GridPos,
    },
    /// Reports that a forfeited token returned to its original cell.
    TokenReplaced {
        /// Cell holding the token again.
        position: GridPos,
    },
    /// Announces that the game ended.
    GameEnded {
        /// Final outcome decided by score comparison.
        outcome: GameOutcome,
    },
}

/// Semantic content code of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Walkable cell with nothing on it.
    Open,
    /// Impassable cell.
    Wall,
    /// Collectible token worth one point.
    Token,
    /// Collectible power-up of the given kind.
    PowerUp(PowerUpKind),
    /// Planted hazard awaiting detonation.
    Hazard,
    /// Cell occupied by the villain.
    Villain,
    /// Cell occupied by the hero.
    Hero,
}

impl Tile {
    /// Reports whether the tile belongs to the collectible band.
    #[must_use]
    pub const fn is_collectible(self) -> bool {
        matches!(self, Self::Token | Self::PowerUp(_))
    }

    /// Reports whether a player may step onto the tile.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Wall)
    }
}

/// Kinds of power-up collectibles scattered across the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Grants a five point score bonus.
    MoneyBag,
    /// Shifts the villain step cadence in the consumer's favor.
    Shoe,
    /// Protects the consumer from the next hazard hit.
    Shield,
    /// Resolves to one of the other effects at random.
    Mystery,
}

/// Location of a single grid cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    row: u32,
    col: u32,
}

impl GridPos {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn col(&self) -> u32 {
        self.col
    }

    /// Computes the Euclidean distance between two positions.
    #[must_use]
    pub fn euclidean_distance(self, other: GridPos) -> f64 {
        let row_delta = f64::from(self.row.abs_diff(other.row));
        let col_delta = f64::from(self.col.abs_diff(other.col));
        (row_delta * row_delta + col_delta * col_delta).sqrt()
    }

    /// Reports whether `other` lies within the Chebyshev box of the given
    /// radius centred on this position.
    #[must_use]
    pub fn within_box(self, other: GridPos, radius: u32) -> bool {
        self.row.abs_diff(other.row) <= radius && self.col.abs_diff(other.col) <= radius
    }

    /// Returns the neighboring position one step in the given direction, or
    /// `None` when the step would leave the coordinate space.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<GridPos> {
        match direction {
            Direction::Up => self.row.checked_sub(1).map(|row| Self::new(row, self.col)),
            Direction::Left => self.col.checked_sub(1).map(|col| Self::new(self.row, col)),
            Direction::Down => self.row.checked_add(1).map(|row| Self::new(row, self.col)),
            Direction::Right => self.col.checked_add(1).map(|col| Self::new(self.row, col)),
        }
    }
}

/// Cardinal movement directions available to players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward increasing column indices.
    Right,
}

/// Identifies one of the two players inhabiting the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    /// The human-driven player.
    Hero,
    /// The computer-driven player.
    Villain,
}

impl PlayerId {
    /// Retrieves the other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Hero => Self::Villain,
            Self::Villain => Self::Hero,
        }
    }
}

/// Final result of a finished game, decided by score comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// The hero collected the higher score.
    HeroWins,
    /// The villain collected the higher score.
    VillainWins,
    /// Both players finished on equal scores.
    Draw,
}

/// Villain step cadence: the villain acts on ticks divisible by this value,
/// so larger values mean a slower opponent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Difficulty(u32);

impl Difficulty {
    /// Smallest permitted cadence. The villain never acts more than once per
    /// tick, so adjustments saturate here rather than reaching zero.
    pub const MIN: Difficulty = Difficulty(1);

    /// Creates a new cadence value, clamped to the permitted minimum.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        if value < Self::MIN.0 {
            Self::MIN
        } else {
            Self(value)
        }
    }

    /// Retrieves the underlying cadence value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the cadence raised by the given amount (a slower villain).
    #[must_use]
    pub fn increased_by(self, amount: u32) -> Self {
        Self::new(self.0.saturating_add(amount))
    }

    /// Returns the cadence lowered by the given amount (a faster villain),
    /// saturating at the permitted minimum.
    #[must_use]
    pub fn decreased_by(self, amount: u32) -> Self {
        Self::new(self.0.saturating_sub(amount))
    }
}

/// Side length of the square board measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridSize(u32);

impl GridSize {
    /// Creates a new board size wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying cell count per side.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Square board of tiles stored in row-major order.
///
/// Reads outside the board yield [`Tile::Wall`], consistent with the
/// permanent border; writes outside the board are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Creates a new board with every cell set to the provided tile.
    #[must_use]
    pub fn new_filled(size: GridSize, tile: Tile) -> Self {
        let side = size.get();
        let capacity_u64 = u64::from(side) * u64::from(side);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            size: side,
            tiles: vec![tile; capacity],
        }
    }

    /// Side length of the board in cells.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Reports whether the position lies on the board.
    #[must_use]
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.row() < self.size && pos.col() < self.size
    }

    /// Reports whether the position lies strictly inside the border walls.
    #[must_use]
    pub fn interior_contains(&self, pos: GridPos) -> bool {
        pos.row() >= 1
            && pos.row() + 1 < self.size
            && pos.col() >= 1
            && pos.col() + 1 < self.size
    }

    /// Tile code stored at the position. Out-of-bounds reads yield
    /// [`Tile::Wall`].
    #[must_use]
    pub fn tile_at(&self, pos: GridPos) -> Tile {
        match self.index(pos) {
            Some(index) => self.tiles.get(index).copied().unwrap_or(Tile::Wall),
            None => Tile::Wall,
        }
    }

    /// Stores a tile code at the position. Out-of-bounds writes are ignored.
    pub fn set_tile(&mut self, pos: GridPos, tile: Tile) {
        if let Some(index) = self.index(pos) {
            if let Some(slot) = self.tiles.get_mut(index) {
                *slot = tile;
            }
        }
    }

    /// Enumerates the positions of every wall cell in row-major order.
    ///
    /// Collaborators instantiate one wall entity per returned position.
    #[must_use]
    pub fn wall_positions(&self) -> Vec<GridPos> {
        let mut walls = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                let pos = GridPos::new(row, col);
                if self.tile_at(pos) == Tile::Wall {
                    walls.push(pos);
                }
            }
        }
        walls
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let row = usize::try_from(pos.row()).ok()?;
        let col = usize::try_from(pos.col()).ok()?;
        let width = usize::try_from(self.size).ok()?;
        row.checked_mul(width)?.checked_add(col)
    }
}

/// Freshly generated board together with the player spawn cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLayout {
    grid: Grid,
    hero_spawn: GridPos,
    villain_spawn: GridPos,
}

impl BoardLayout {
    /// Creates a new layout descriptor.
    #[must_use]
    pub const fn new(grid: Grid, hero_spawn: GridPos, villain_spawn: GridPos) -> Self {
        Self {
            grid,
            hero_spawn,
            villain_spawn,
        }
    }

    /// Board carved and seeded by the generator.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cell the hero starts the game on.
    #[must_use]
    pub const fn hero_spawn(&self) -> GridPos {
        self.hero_spawn
    }

    /// Cell the villain starts the game on.
    #[must_use]
    pub const fn villain_spawn(&self) -> GridPos {
        self.villain_spawn
    }

    /// Consumes the layout, yielding the board and both spawn cells.
    #[must_use]
    pub fn into_parts(self) -> (Grid, GridPos, GridPos) {
        (self.grid, self.hero_spawn, self.villain_spawn)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Difficulty, Direction, GameOutcome, Grid, GridPos, GridSize, PlayerId, PowerUpKind, Tile,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn euclidean_distance_matches_expectation() {
        let origin = GridPos::new(1, 1);
        let destination = GridPos::new(4, 5);
        assert!((origin.euclidean_distance(destination) - 5.0).abs() < f64::EPSILON);
        assert!((destination.euclidean_distance(origin) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn chebyshev_box_requires_both_axes() {
        let centre = GridPos::new(10, 10);
        assert!(centre.within_box(GridPos::new(14, 6), 4));
        assert!(centre.within_box(centre, 4));
        assert!(!centre.within_box(GridPos::new(15, 10), 4));
        assert!(!centre.within_box(GridPos::new(10, 15), 4));
    }

    #[test]
    fn step_follows_direction_deltas() {
        let origin = GridPos::new(3, 3);
        assert_eq!(origin.step(Direction::Up), Some(GridPos::new(2, 3)));
        assert_eq!(origin.step(Direction::Left), Some(GridPos::new(3, 2)));
        assert_eq!(origin.step(Direction::Down), Some(GridPos::new(4, 3)));
        assert_eq!(origin.step(Direction::Right), Some(GridPos::new(3, 4)));
    }

    #[test]
    fn step_rejects_leaving_coordinate_space() {
        assert_eq!(GridPos::new(0, 5).step(Direction::Up), None);
        assert_eq!(GridPos::new(5, 0).step(Direction::Left), None);
    }

    #[test]
    fn collectible_band_covers_tokens_and_power_ups() {
        assert!(Tile::Token.is_collectible());
        assert!(Tile::PowerUp(PowerUpKind::Shield).is_collectible());
        assert!(!Tile::Open.is_collectible());
        assert!(!Tile::Wall.is_collectible());
        assert!(!Tile::Hazard.is_collectible());
        assert!(!Tile::Villain.is_collectible());
        assert!(!Tile::Hero.is_collectible());
    }

    #[test]
    fn only_walls_are_impassable() {
        assert!(!Tile::Wall.is_passable());
        assert!(Tile::Open.is_passable());
        assert!(Tile::Hazard.is_passable());
    }

    #[test]
    fn difficulty_saturates_at_minimum() {
        let cadence = Difficulty::new(15);
        assert_eq!(cadence.decreased_by(20), Difficulty::MIN);
        assert_eq!(cadence.increased_by(10).get(), 25);
        assert_eq!(Difficulty::new(0), Difficulty::MIN);
    }

    #[test]
    fn grid_reads_out_of_bounds_as_wall() {
        let grid = Grid::new_filled(GridSize::new(4), Tile::Open);
        assert_eq!(grid.tile_at(GridPos::new(4, 0)), Tile::Wall);
        assert_eq!(grid.tile_at(GridPos::new(0, 4)), Tile::Wall);
        assert_eq!(grid.tile_at(GridPos::new(1, 1)), Tile::Open);
    }

    #[test]
    fn grid_ignores_out_of_bounds_writes() {
        let mut grid = Grid::new_filled(GridSize::new(3), Tile::Wall);
        grid.set_tile(GridPos::new(9, 9), Tile::Token);
        assert_eq!(grid.tile_at(GridPos::new(9, 9)), Tile::Wall);
        grid.set_tile(GridPos::new(1, 1), Tile::Token);
        assert_eq!(grid.tile_at(GridPos::new(1, 1)), Tile::Token);
    }

    #[test]
    fn interior_excludes_border_cells() {
        let grid = Grid::new_filled(GridSize::new(5), Tile::Wall);
        assert!(grid.interior_contains(GridPos::new(1, 1)));
        assert!(grid.interior_contains(GridPos::new(3, 3)));
        assert!(!grid.interior_contains(GridPos::new(0, 2)));
        assert!(!grid.interior_contains(GridPos::new(4, 2)));
        assert!(!grid.interior_contains(GridPos::new(2, 0)));
        assert!(!grid.interior_contains(GridPos::new(2, 4)));
    }

    #[test]
    fn wall_positions_cover_the_border() {
        let mut grid = Grid::new_filled(GridSize::new(3), Tile::Wall);
        grid.set_tile(GridPos::new(1, 1), Tile::Open);
        let walls = grid.wall_positions();
        assert_eq!(walls.len(), 8);
        assert!(!walls.contains(&GridPos::new(1, 1)));
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn grid_pos_round_trips_through_bincode() {
        assert_round_trip(&GridPos::new(7, 12));
    }

    #[test]
    fn tile_round_trips_through_bincode() {
        assert_round_trip(&Tile::PowerUp(PowerUpKind::Mystery));
    }

    #[test]
    fn player_id_round_trips_through_bincode() {
        assert_round_trip(&PlayerId::Villain);
    }

    #[test]
    fn outcome_round_trips_through_bincode() {
        assert_round_trip(&GameOutcome::Draw);
    }

    #[test]
    fn grid_round_trips_through_bincode() {
        let mut grid = Grid::new_filled(GridSize::new(4), Tile::Wall);
        grid.set_tile(GridPos::new(1, 2), Tile::Token);
        grid.set_tile(GridPos::new(2, 1), Tile::Hazard);
        assert_round_trip(&grid);
    }
}
