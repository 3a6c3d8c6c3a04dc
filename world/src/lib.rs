#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state management for Maze Chase.
//!
//! The [`World`] aggregate owns the board, both player states, the planted
//! hazards, the villain cadence and the tick counter. Adapters submit
//! [`Command`] values through [`apply`], which mutates the aggregate
//! deterministically and broadcasts [`Event`] values describing every
//! observable change. Read access goes through the [`query`] module.

use maze_chase_core::{
    BoardLayout, Command, Difficulty, Direction, Event, GameOutcome, Grid, GridPos, PlayerId,
    PowerUpKind, Tile, WELCOME_BANNER,
};

/// Ticks a player stays frozen after a hazard hit.
const TIMEOUT_TICKS: u64 = 75;
/// Moves that must elapse between two hazard drops by the same player.
const HAZARD_COOLDOWN_MOVES: u32 = 6;
/// Ticks a hazard must age before it can detonate.
const HAZARD_ARM_TICKS: u64 = 100;
/// Ticks a detonated hazard keeps burning before its cell clears.
const HAZARD_BURN_TICKS: u64 = 45;
/// Chebyshev radius within which an armed hazard detonates on its victim.
const HAZARD_TRIGGER_RADIUS: u32 = 2;
/// Largest score loss a hazard hit can inflict.
const HAZARD_SCORE_PENALTY: u32 = 5;
/// Cadence shift applied when a shoe power-up is consumed.
const SHOE_CADENCE_SHIFT: u32 = 10;
/// Score bonus granted by a money bag power-up.
const MONEY_BAG_BONUS: u32 = 5;

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Represents the authoritative Maze Chase game state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    hero: PlayerState,
    villain: PlayerState,
    hazards: Vec<HazardEntity>,
    difficulty: Difficulty,
    tick_index: u64,
    outcome: Option<GameOutcome>,
    rng_state: u64,
}

impl World {
    /// Creates a new world from a generated board layout.
    ///
    /// The layout's spawn cells already carry the occupant codes stamped by
    /// the generator; the world takes them as authoritative.
    #[must_use]
    pub fn new(layout: BoardLayout, difficulty: Difficulty, rng_seed: u64) -> Self {
        let (grid, hero_spawn, villain_spawn) = layout.into_parts();
        Self {
            banner: WELCOME_BANNER,
            grid,
            hero: PlayerState::at(hero_spawn),
            villain: PlayerState::at(villain_spawn),
            hazards: Vec::new(),
            difficulty,
            tick_index: 0,
            outcome: None,
            rng_state: rng_seed,
        }
    }

    fn player(&self, id: PlayerId) -> &PlayerState {
        match id {
            PlayerId::Hero => &self.hero,
            PlayerId::Villain => &self.villain,
        }
    }

    fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        match id {
            PlayerId::Hero => &mut self.hero,
            PlayerId::Villain => &mut self.villain,
        }
    }

    fn next_random(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.rng_state
    }

    fn advance_time(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });
        self.advance_hazards(out_events);
    }

    fn advance_hazards(&mut self, out_events: &mut Vec<Event>) {
        let mut index = 0;
        while index < self.hazards.len() {
            let position = self.hazards[index].position;
            let owner = self.hazards[index].owner;

            if let Some(remaining) = self.hazards[index].burn_remaining {
                if remaining <= 1 {
                    if self.grid.tile_at(position) == Tile::Hazard {
                        self.grid.set_tile(position, Tile::Open);
                    }
                    out_events.push(Event::HazardCleared { position });
                    let _ = self.hazards.remove(index);
                    continue;
                }
                self.hazards[index].burn_remaining = Some(remaining - 1);
            } else {
                self.hazards[index].age += 1;
                let armed = self.hazards[index].age >= HAZARD_ARM_TICKS;
                // The jitter draw doubles as a dud chance per check.
                if armed && self.next_random() % 10 != 1 {
                    let victim_id = owner.opponent();
                    let victim_pos = self.player(victim_id).position;
                    if position.within_box(victim_pos, HAZARD_TRIGGER_RADIUS) {
                        self.hazards[index].burn_remaining = Some(HAZARD_BURN_TICKS);
                        out_events.push(Event::HazardDetonated { position, owner });
                        self.resolve_hazard_hit(victim_id, out_events);
                    }
                }
            }

            index += 1;
        }
    }

    fn resolve_hazard_hit(&mut self, victim_id: PlayerId, out_events: &mut Vec<Event>) {
        let now = self.tick_index;

        if self.player(victim_id).protected {
            self.player_mut(victim_id).protected = false;
            out_events.push(Event::ShieldBroken { player: victim_id });
            return;
        }

        let until_tick = now + TIMEOUT_TICKS;
        let victim = self.player_mut(victim_id);
        victim.timeout_until = Some(until_tick);
        let lost = victim.score.min(HAZARD_SCORE_PENALTY);
        victim.score -= lost;
        let score = victim.score;
        out_events.push(Event::TimeoutStarted {
            player: victim_id,
            until_tick,
        });
        out_events.push(Event::ScoreChanged {
            player: victim_id,
            score,
        });

        // Forfeited tokens return to their original cells when still free.
        let mut banked = std::mem::take(&mut self.player_mut(victim_id).banked_tokens);
        for _ in 0..lost {
            if banked.is_empty() {
                break;
            }
            let chosen = (self.next_random() % banked.len() as u64) as usize;
            let position = banked.swap_remove(chosen);
            if self.grid.tile_at(position) == Tile::Open {
                self.grid.set_tile(position, Tile::Token);
                out_events.push(Event::TokenReplaced { position });
            }
        }
        self.player_mut(victim_id).banked_tokens = banked;
    }

    fn move_player(&mut self, id: PlayerId, direction: Direction, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() {
            return;
        }

        let now = self.tick_index;
        let state = self.player_mut(id);
        if let Some(until) = state.timeout_until {
            if now > until {
                state.timeout_until = None;
                out_events.push(Event::TimeoutEnded { player: id });
            } else {
                return;
            }
        }

        let from = self.player(id).position;
        let Some(to) = from.step(direction) else {
            return;
        };
        let destination_tile = self.grid.tile_at(to);
        if !destination_tile.is_passable() {
            return;
        }

        if destination_tile.is_collectible() {
            self.consume_tile(id, to, destination_tile, out_events);
            self.grid.set_tile(to, Tile::Open);
        }

        if self.grid.tile_at(from) == occupant_tile(id) {
            self.grid.set_tile(from, Tile::Open);
        }
        if self.grid.tile_at(to) == Tile::Open {
            self.grid.set_tile(to, occupant_tile(id));
        }

        let state = self.player_mut(id);
        state.position = to;
        state.total_moves = state.total_moves.saturating_add(1);
        out_events.push(Event::PlayerMoved {
            player: id,
            from,
            to,
        });
    }

    fn consume_tile(
        &mut self,
        id: PlayerId,
        position: GridPos,
        tile: Tile,
        out_events: &mut Vec<Event>,
    ) {
        out_events.push(Event::TileConsumed {
            player: id,
            position,
            tile,
        });

        match tile {
            Tile::Token => {
                let state = self.player_mut(id);
                state.score += 1;
                state.banked_tokens.push(position);
                let score = state.score;
                out_events.push(Event::ScoreChanged { player: id, score });
            }
            Tile::PowerUp(kind) => self.apply_power_up(id, kind, out_events),
            _ => {}
        }
    }

    fn apply_power_up(&mut self, id: PlayerId, kind: PowerUpKind, out_events: &mut Vec<Event>) {
        match kind {
            PowerUpKind::MoneyBag => {
                let state = self.player_mut(id);
                state.score += MONEY_BAG_BONUS;
                let score = state.score;
                out_events.push(Event::ScoreChanged { player: id, score });
            }
            PowerUpKind::Shield => {
                self.player_mut(id).protected = true;
                out_events.push(Event::ShieldRaised { player: id });
            }
            PowerUpKind::Shoe => {
                // The cadence shifts in the consumer's favor: a slower
                // villain for the hero, a faster one for the villain.
                self.difficulty = match id {
                    PlayerId::Hero => self.difficulty.increased_by(SHOE_CADENCE_SHIFT),
                    PlayerId::Villain => self.difficulty.decreased_by(SHOE_CADENCE_SHIFT),
                };
                out_events.push(Event::DifficultyChanged {
                    difficulty: self.difficulty,
                });
            }
            PowerUpKind::Mystery => {
                let resolved = match self.next_random() % 3 {
                    0 => PowerUpKind::MoneyBag,
                    1 => PowerUpKind::Shield,
                    _ => PowerUpKind::Shoe,
                };
                self.apply_power_up(id, resolved, out_events);
            }
        }
    }

    fn drop_hazard(&mut self, id: PlayerId, out_events: &mut Vec<Event>) {
        let state = self.player(id);
        let position = state.position;
        let total_moves = state.total_moves;
        if total_moves <= state.last_hazard_move + HAZARD_COOLDOWN_MOVES {
            return;
        }

        let tile = self.grid.tile_at(position);
        if tile != Tile::Open && tile != occupant_tile(id) {
            return;
        }

        self.player_mut(id).last_hazard_move = total_moves;
        self.grid.set_tile(position, Tile::Hazard);
        self.hazards.push(HazardEntity {
            position,
            owner: id,
            age: 0,
            burn_remaining: None,
        });
        out_events.push(Event::HazardPlaced {
            player: id,
            position,
        });
    }

    fn end_game(&mut self, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() {
            return;
        }
        let outcome = if self.hero.score > self.villain.score {
            GameOutcome::HeroWins
        } else if self.villain.score > self.hero.score {
            GameOutcome::VillainWins
        } else {
            GameOutcome::Draw
        };
        self.outcome = Some(outcome);
        out_events.push(Event::GameEnded { outcome });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => world.advance_time(out_events),
        Command::MovePlayer { player, direction } => {
            world.move_player(player, direction, out_events);
        }
        Command::DropHazard { player } => world.drop_hazard(player, out_events),
        Command::EndGame => world.end_game(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use maze_chase_core::{Difficulty, GameOutcome, Grid, GridPos, PlayerId};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the board.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Current position of the given player.
    #[must_use]
    pub fn player_position(world: &World, id: PlayerId) -> GridPos {
        world.player(id).position
    }

    /// Current score of the given player.
    #[must_use]
    pub fn player_score(world: &World, id: PlayerId) -> u32 {
        world.player(id).score
    }

    /// Reports whether the player holds an unspent shield.
    #[must_use]
    pub fn is_protected(world: &World, id: PlayerId) -> bool {
        world.player(id).protected
    }

    /// Reports whether the player is currently frozen by a hazard hit.
    #[must_use]
    pub fn is_timed_out(world: &World, id: PlayerId) -> bool {
        world
            .player(id)
            .timeout_until
            .is_some_and(|until| world.tick_index <= until)
    }

    /// Villain step cadence currently in effect.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.difficulty
    }

    /// Tick index reached by the simulation clock.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Reports whether the villain acts on the current tick.
    #[must_use]
    pub fn villain_acts_this_tick(world: &World) -> bool {
        world.tick_index % u64::from(world.difficulty.get()) == 0
    }

    /// Final outcome, present once the game has ended.
    #[must_use]
    pub fn outcome(world: &World) -> Option<GameOutcome> {
        world.outcome
    }

    /// Positions of every hazard currently planted on the board.
    #[must_use]
    pub fn hazard_positions(world: &World) -> Vec<GridPos> {
        world.hazards.iter().map(|hazard| hazard.position).collect()
    }
}

#[derive(Clone, Debug)]
struct PlayerState {
    position: GridPos,
    score: u32,
    banked_tokens: Vec<GridPos>,
    total_moves: u32,
    last_hazard_move: u32,
    protected: bool,
    timeout_until: Option<u64>,
}

impl PlayerState {
    fn at(position: GridPos) -> Self {
        Self {
            position,
            score: 0,
            banked_tokens: Vec::new(),
            total_moves: 0,
            last_hazard_move: 0,
            protected: false,
            timeout_until: None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct HazardEntity {
    position: GridPos,
    owner: PlayerId,
    age: u64,
    burn_remaining: Option<u64>,
}

const fn occupant_tile(id: PlayerId) -> Tile {
    match id {
        PlayerId::Hero => Tile::Hero,
        PlayerId::Villain => Tile::Villain,
    }
}
