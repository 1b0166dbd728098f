//! Space Invaders, played by the computer on both sides
//!
//! The player ship chases the nearest enemy column and fires on a cooldown.
//! Enemies march sideways, drop a row at each edge, and fire from a random
//! member on their own cooldown. After a grace period the game speeds up a
//! little every frame up to fixed caps.
//!
//! A round ends when every enemy is destroyed (player wins), or when an enemy
//! bullet hits the player or an enemy reaches the player's row (invaders win).

use core::time::Duration;

use heapless::Vec;
use rand::Rng as _;
use rand::rngs::SmallRng;

use super::{Simulation, rng};
use crate::config::Dimensions;
use crate::framebuffer::FrameBuffer;
use crate::geometry::{Point, Rect};

/// Upper bound on the enemy formation size
const MAX_ENEMIES: usize = 32;

/// Upper bound on player bullets in flight
const MAX_BULLETS: usize = 8;

/// Upper bound on enemy bullets in flight
const MAX_ENEMY_BULLETS: usize = 16;

/// Invaders tuning
///
/// The speed and interval fields are the starting difficulty; the running
/// values live in [`Difficulty`] and ramp toward the `max_`/`min_` caps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InvadersConfig {
    /// Player ship width
    pub player_width: i32,
    /// Player ship height
    pub player_height: i32,
    /// Enemy width
    pub enemy_width: i32,
    /// Enemy height
    pub enemy_height: i32,
    /// Rows in the starting formation
    pub enemy_rows: usize,
    /// Enemies per row
    pub enemies_per_row: usize,
    /// Gap between neighbouring enemies, both axes
    pub enemy_gap: i32,
    /// Player bullets allowed in flight
    pub max_bullets: usize,
    /// Pixels a bullet moves per frame
    pub bullet_speed: i32,
    /// Pixels the formation drops at an edge
    pub enemy_drop: i32,
    /// Probability per frame that the formation reverses on its own
    pub direction_flip_chance: f32,
    /// Starting player speed
    pub player_speed: f32,
    /// Starting enemy speed
    pub enemy_speed: f32,
    /// Starting player cooldown
    pub player_fire_interval: Duration,
    /// Starting enemy cooldown
    pub enemy_fire_interval: Duration,
    /// Play time before the difficulty starts to ramp
    pub ramp_after: Duration,
    /// Player speed cap
    pub max_player_speed: f32,
    /// Enemy speed cap
    pub max_enemy_speed: f32,
    /// Player cooldown floor
    pub min_player_fire_interval: Duration,
    /// Enemy cooldown floor
    pub min_enemy_fire_interval: Duration,
    /// Seed for enemy fire and direction changes
    pub seed: u64,
}

impl Default for InvadersConfig {
    fn default() -> Self {
        Self {
            player_width: 5,
            player_height: 3,
            enemy_width: 5,
            enemy_height: 3,
            enemy_rows: 2,
            enemies_per_row: 5,
            enemy_gap: 3,
            max_bullets: 3,
            bullet_speed: 6,
            enemy_drop: 2,
            direction_flip_chance: 0.05,
            player_speed: 6.0,
            enemy_speed: 1.0,
            player_fire_interval: Duration::from_millis(150),
            enemy_fire_interval: Duration::from_millis(3500),
            ramp_after: Duration::from_secs(10),
            max_player_speed: 7.0,
            max_enemy_speed: 3.0,
            min_player_fire_interval: Duration::from_millis(100),
            min_enemy_fire_interval: Duration::from_millis(2500),
            seed: rng::DEFAULT_SEED,
        }
    }
}

/// Current speeds and cooldowns
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Difficulty {
    /// Player pixels per frame (fraction dropped when moving)
    pub player_speed: f32,
    /// Enemy pixels per frame (fraction dropped when moving)
    pub enemy_speed: f32,
    /// Minimum time between player shots
    pub player_fire_interval: Duration,
    /// Minimum time between enemy shots
    pub enemy_fire_interval: Duration,
}

impl Difficulty {
    fn base(config: &InvadersConfig) -> Self {
        Self {
            player_speed: config.player_speed,
            enemy_speed: config.enemy_speed,
            player_fire_interval: config.player_fire_interval,
            enemy_fire_interval: config.enemy_fire_interval,
        }
    }

    /// One frame's worth of speed-up, clamped to the caps in `config`
    fn ramp(&mut self, config: &InvadersConfig) {
        self.player_speed = (self.player_speed + 0.1).min(config.max_player_speed);
        self.enemy_speed = (self.enemy_speed + 0.1).min(config.max_enemy_speed);
        self.player_fire_interval = self
            .player_fire_interval
            .saturating_sub(Duration::from_millis(10))
            .max(config.min_player_fire_interval);
        self.enemy_fire_interval = self
            .enemy_fire_interval
            .saturating_sub(Duration::from_millis(50))
            .max(config.min_enemy_fire_interval);
    }
}

/// How a round ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every enemy was destroyed
    PlayerWins,
    /// The player was hit or overrun
    InvadersWin,
}

impl Outcome {
    /// Result screen text
    pub const fn message(self) -> &'static str {
        match self {
            Self::PlayerWins => "Player Wins!",
            Self::InvadersWin => "Invaders Win!",
        }
    }
}

/// Round tally across resets
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    /// Rounds won by the player
    pub player_wins: u32,
    /// Rounds won by the invaders
    pub invader_wins: u32,
}

impl Scoreboard {
    /// Record a finished round
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::PlayerWins => self.player_wins += 1,
            Outcome::InvadersWin => self.invader_wins += 1,
        }
    }

    /// Rounds played
    pub fn total(&self) -> u32 {
        self.player_wins + self.invader_wins
    }

    /// Player win rate in percent; 0 before any round
    pub fn win_percentage(&self) -> f32 {
        match self.total() {
            0 => 0.0,
            total => self.player_wins as f32 / total as f32 * 100.0,
        }
    }
}

/// Space Invaders simulation
#[derive(Clone, Debug)]
pub struct Invaders {
    config: InvadersConfig,
    difficulty: Difficulty,
    width: i32,
    height: i32,
    player: Point,
    enemies: Vec<Point, MAX_ENEMIES>,
    bullets: Vec<Point, MAX_BULLETS>,
    enemy_bullets: Vec<Point, MAX_ENEMY_BULLETS>,
    direction: i32,
    elapsed: Duration,
    since_player_fire: Duration,
    since_enemy_fire: Duration,
    game_over: bool,
    outcome: Option<Outcome>,
    scoreboard: Scoreboard,
    rng: SmallRng,
}

impl Invaders {
    /// Set up the first round
    pub fn new(dimensions: Dimensions, config: InvadersConfig) -> Self {
        let mut game = Self {
            config,
            difficulty: Difficulty::base(&config),
            width: i32::from(dimensions.width()),
            height: i32::from(dimensions.height()),
            player: Point::default(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            direction: 1,
            elapsed: Duration::ZERO,
            since_player_fire: Duration::MAX,
            since_enemy_fire: Duration::MAX,
            game_over: false,
            outcome: None,
            scoreboard: Scoreboard::default(),
            rng: rng::seeded(config.seed),
        };
        game.start_round();
        game
    }

    fn start_round(&mut self) {
        let c = self.config;
        self.difficulty = Difficulty::base(&c);
        self.player = Point::new(
            self.width / 2 - c.player_width / 2,
            self.height - c.player_height - 1,
        );
        self.enemies.clear();
        for row in 0..c.enemy_rows {
            for col in 0..c.enemies_per_row {
                let enemy = Point::new(
                    col as i32 * (c.enemy_width + c.enemy_gap),
                    row as i32 * (c.enemy_height + c.enemy_gap),
                );
                if self.enemies.push(enemy).is_err() {
                    log::warn!("invaders: formation truncated to {} enemies", MAX_ENEMIES);
                    break;
                }
            }
        }
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.direction = 1;
        self.elapsed = Duration::ZERO;
        self.since_player_fire = Duration::MAX;
        self.since_enemy_fire = Duration::MAX;
        self.game_over = false;
        self.outcome = None;
    }

    fn enemy_rect(&self, enemy: Point) -> Rect {
        Rect::new(
            enemy.x,
            enemy.y,
            self.config.enemy_width,
            self.config.enemy_height,
        )
    }

    fn move_player(&mut self) {
        // Nearest column first, lowest enemy on ties
        let target = self
            .enemies
            .iter()
            .min_by_key(|e| ((e.x - self.player.x).abs(), -e.y))
            .copied();
        if let Some(target) = target {
            let step = self.difficulty.player_speed as i32;
            self.player.x += step * (target.x - self.player.x).signum();
        }
        self.player.x = self
            .player
            .x
            .clamp(0, self.width - self.config.player_width);
    }

    fn fire_bullet(&mut self) {
        let max = self.config.max_bullets.min(MAX_BULLETS);
        if self.bullets.len() < max && self.since_player_fire >= self.difficulty.player_fire_interval
        {
            let bullet = Point::new(self.player.x + self.config.player_width / 2, self.player.y);
            if self.bullets.push(bullet).is_ok() {
                self.since_player_fire = Duration::ZERO;
            }
        }
    }

    fn move_bullets(&mut self) {
        let speed = self.config.bullet_speed;
        self.bullets.retain(|b| b.y > 0);
        for b in &mut self.bullets {
            b.y -= speed;
        }
    }

    fn move_enemies(&mut self) {
        let step = self.direction * self.difficulty.enemy_speed as i32;
        let right_limit = self.width - self.config.enemy_width;
        let mut edge_hit = false;
        for e in &mut self.enemies {
            e.x += step;
            if e.x <= 0 || e.x >= right_limit {
                edge_hit = true;
            }
        }
        if edge_hit {
            self.direction = -self.direction;
            for e in &mut self.enemies {
                e.y += self.config.enemy_drop;
            }
        }
        if rng::chance(&mut self.rng, self.config.direction_flip_chance) {
            self.direction = -self.direction;
        }
    }

    fn enemy_fire(&mut self) {
        if self.enemies.is_empty() || self.since_enemy_fire < self.difficulty.enemy_fire_interval {
            return;
        }
        let shooter = self.enemies[self.rng.gen_range(0..self.enemies.len())];
        let bullet = Point::new(
            shooter.x + self.config.enemy_width / 2,
            shooter.y + self.config.enemy_height,
        );
        if self.enemy_bullets.push(bullet).is_ok() {
            self.since_enemy_fire = Duration::ZERO;
        }
    }

    fn move_enemy_bullets(&mut self) {
        let (speed, height) = (self.config.bullet_speed, self.height);
        self.enemy_bullets.retain(|b| b.y < height);
        for b in &mut self.enemy_bullets {
            b.y += speed;
        }
    }

    fn check_collisions(&mut self) {
        let mut i = 0;
        while i < self.bullets.len() {
            let bullet = self.bullets[i];
            let hit = self
                .enemies
                .iter()
                .copied()
                .find(|&e| self.enemy_rect(e).contains(bullet));
            match hit {
                Some(enemy) => {
                    remove_first(&mut self.enemies, enemy);
                    self.bullets.remove(i);
                }
                None => i += 1,
            }
        }

        let ship = Rect::new(
            self.player.x,
            self.player.y,
            self.config.player_width,
            self.config.player_height,
        );
        if self.enemy_bullets.iter().any(|&b| ship.contains(b)) {
            self.game_over = true;
        }

        let player_row = self.player.y;
        let enemy_height = self.config.enemy_height;
        if self.enemies.iter().any(|e| e.y + enemy_height >= player_row) {
            self.game_over = true;
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        self.scoreboard.record(outcome);
        log::info!(
            "invaders: {} player {} invaders {} ({:.2}%)",
            outcome.message(),
            self.scoreboard.player_wins,
            self.scoreboard.invader_wins,
            self.scoreboard.win_percentage()
        );
    }

    /// Result of the current round, once decided
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Tally of finished rounds
    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Current speeds and cooldowns
    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    /// Top-left corner of the player ship
    pub fn player(&self) -> Point {
        self.player
    }

    /// Top-left corners of the remaining enemies
    pub fn enemies(&self) -> &[Point] {
        &self.enemies
    }

    /// Player bullets in flight
    pub fn bullets(&self) -> &[Point] {
        &self.bullets
    }

    /// Enemy bullets in flight
    pub fn enemy_bullets(&self) -> &[Point] {
        &self.enemy_bullets
    }
}

/// Remove the first element equal to `value`
///
/// Entities are plain coordinates, so two enemies on the same spot are
/// indistinguishable here.
fn remove_first<const N: usize>(list: &mut Vec<Point, N>, value: Point) {
    if let Some(index) = list.iter().position(|&p| p == value) {
        list.remove(index);
    }
}

impl Simulation for Invaders {
    fn advance(&mut self, dt: Duration) -> bool {
        if self.outcome.is_some() {
            return true;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        self.since_player_fire = self.since_player_fire.saturating_add(dt);
        self.since_enemy_fire = self.since_enemy_fire.saturating_add(dt);

        self.move_player();
        self.fire_bullet();
        self.move_bullets();
        self.move_enemies();
        self.enemy_fire();
        self.move_enemy_bullets();
        if self.elapsed > self.config.ramp_after {
            self.difficulty.ramp(&self.config);
        }
        self.check_collisions();

        if self.game_over {
            self.finish(Outcome::InvadersWin);
        } else if self.enemies.is_empty() {
            self.finish(Outcome::PlayerWins);
        }
        self.outcome.is_some()
    }

    fn render<B>(&mut self, frame: &mut FrameBuffer<B>)
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        frame.clear();
        if let Some(outcome) = self.outcome {
            frame.draw_text(0, self.height / 2 - 4, outcome.message(), 1);
            return;
        }

        let c = &self.config;
        frame.fill_rect(
            self.player.x,
            self.player.y,
            c.player_width,
            c.player_height,
            true,
        );
        for e in &self.enemies {
            frame.fill_rect(e.x, e.y, c.enemy_width, c.enemy_height, true);
        }
        for b in self.bullets.iter().chain(&self.enemy_bullets) {
            frame.set_pixel(b.x, b.y, true);
        }
    }

    fn reset(&mut self) {
        self.start_round();
    }
}
