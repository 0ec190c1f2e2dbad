//! Spawn scheduling
//!
//! One independent tick counter per entity kind. A counter increments once per
//! running tick; when it exceeds its threshold a spawn fires and the counter
//! resets to zero. The scheduler is simply not advanced outside the running
//! phase, so there is no catch-up after a pause.

use rand::Rng;

use super::entities::{Coin, Enemy, Heart, Obstacle, PowerUp, PowerUpKind};
use crate::consts::*;

/// Kinds of timer the scheduler maintains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Obstacle,
    Coin,
    PowerUp,
    Heart,
    Enemy,
    Background,
}

impl SpawnKind {
    pub const ALL: [SpawnKind; 6] = [
        SpawnKind::Obstacle,
        SpawnKind::Coin,
        SpawnKind::PowerUp,
        SpawnKind::Heart,
        SpawnKind::Enemy,
        SpawnKind::Background,
    ];
}

/// An entity (or background change) produced by a scheduler tick
#[derive(Debug, Clone)]
pub enum SpawnRequest {
    Obstacle(Obstacle),
    Coin(Coin),
    PowerUp(PowerUp),
    Heart(Heart),
    Enemy(Enemy),
    /// Sky color advanced to this phase index
    Background(usize),
}

/// A single counter/threshold pair
#[derive(Debug, Clone, Copy)]
struct SpawnTimer {
    elapsed: u32,
    threshold: u32,
}

impl SpawnTimer {
    fn new(threshold: u32) -> Self {
        Self {
            elapsed: 0,
            threshold,
        }
    }

    /// Count one tick; returns `true` when the spawn fires
    fn step(&mut self) -> bool {
        self.elapsed += 1;
        if self.elapsed > self.threshold {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }
}

/// Per-kind spawn timers
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    obstacle: SpawnTimer,
    coin: SpawnTimer,
    power_up: SpawnTimer,
    heart: SpawnTimer,
    enemy: SpawnTimer,
    background: SpawnTimer,
    background_phase: usize,
}

impl SpawnScheduler {
    /// `enemy_interval` comes from the session difficulty
    pub fn new(enemy_interval: u32) -> Self {
        Self {
            obstacle: SpawnTimer::new(OBSTACLE_INTERVAL),
            coin: SpawnTimer::new(COIN_INTERVAL),
            power_up: SpawnTimer::new(POWER_UP_INTERVAL),
            heart: SpawnTimer::new(HEART_INTERVAL),
            enemy: SpawnTimer::new(enemy_interval),
            background: SpawnTimer::new(BACKGROUND_INTERVAL),
            background_phase: 0,
        }
    }

    /// Current sky color index
    pub fn background_phase(&self) -> usize {
        self.background_phase
    }

    /// Ticks counted so far toward the next spawn of `kind`
    pub fn elapsed(&self, kind: SpawnKind) -> u32 {
        match kind {
            SpawnKind::Obstacle => self.obstacle.elapsed,
            SpawnKind::Coin => self.coin.elapsed,
            SpawnKind::PowerUp => self.power_up.elapsed,
            SpawnKind::Heart => self.heart.elapsed,
            SpawnKind::Enemy => self.enemy.elapsed,
            SpawnKind::Background => self.background.elapsed,
        }
    }

    /// Count one running tick and return everything that spawns on it.
    ///
    /// New entities enter at the right edge of the visible area.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) -> Vec<SpawnRequest> {
        let mut spawned = Vec::new();

        if self.obstacle.step() {
            spawned.push(SpawnRequest::Obstacle(Obstacle::spawn(WIDTH, rng)));
        }

        if self.coin.step() {
            spawned.push(SpawnRequest::Coin(Coin::new(WIDTH, random_lane(rng))));
        }

        if self.power_up.step() {
            let kind = PowerUpKind::random(rng);
            spawned.push(SpawnRequest::PowerUp(PowerUp::new(WIDTH, random_lane(rng), kind)));
        }

        if self.heart.step() {
            spawned.push(SpawnRequest::Heart(Heart::new(WIDTH, random_lane(rng))));
        }

        if self.enemy.step() {
            let y = random_lane(rng);
            spawned.push(SpawnRequest::Enemy(Enemy::spawn(WIDTH, y, rng)));
        }

        if self.background.step() {
            self.background_phase = (self.background_phase + 1) % BACKGROUND_PHASES;
            spawned.push(SpawnRequest::Background(self.background_phase));
        }

        spawned
    }
}

/// Vertical placement for collectibles and enemies
fn random_lane<R: Rng>(rng: &mut R) -> f32 {
    rng.random_range(SPAWN_MARGIN..=HEIGHT as i32 - SPAWN_MARGIN) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn count_obstacles(requests: &[SpawnRequest]) -> usize {
        requests
            .iter()
            .filter(|r| matches!(r, SpawnRequest::Obstacle(_)))
            .count()
    }

    #[test]
    fn test_obstacle_fires_after_threshold() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut scheduler = SpawnScheduler::new(400);

        for _ in 0..OBSTACLE_INTERVAL {
            let spawned = scheduler.advance(&mut rng);
            assert_eq!(count_obstacles(&spawned), 0);
        }
        assert_eq!(scheduler.elapsed(SpawnKind::Obstacle), OBSTACLE_INTERVAL);

        let spawned = scheduler.advance(&mut rng);
        assert_eq!(count_obstacles(&spawned), 1);
        assert_eq!(scheduler.elapsed(SpawnKind::Obstacle), 0);
    }

    #[test]
    fn test_enemy_interval_follows_difficulty() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut scheduler = SpawnScheduler::new(250);
        let mut first_enemy_tick = None;
        for tick in 1..=600u32 {
            let spawned = scheduler.advance(&mut rng);
            if spawned.iter().any(|r| matches!(r, SpawnRequest::Enemy(_))) {
                first_enemy_tick = Some(tick);
                break;
            }
        }
        assert_eq!(first_enemy_tick, Some(251));
    }

    #[test]
    fn test_spawns_enter_at_right_edge_within_lanes() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut scheduler = SpawnScheduler::new(250);
        let mut seen = 0;
        for _ in 0..2000 {
            for request in scheduler.advance(&mut rng) {
                let (x, y) = match request {
                    SpawnRequest::Coin(c) => (c.pos.x, c.pos.y),
                    SpawnRequest::Heart(h) => (h.pos.x, h.pos.y),
                    SpawnRequest::PowerUp(p) => (p.pos.x, p.pos.y),
                    SpawnRequest::Enemy(e) => (e.pos.x, e.pos.y),
                    SpawnRequest::Obstacle(o) => (o.x, o.gap_top),
                    SpawnRequest::Background(_) => continue,
                };
                assert_eq!(x, WIDTH);
                assert!((SPAWN_MARGIN as f32..=HEIGHT - SPAWN_MARGIN as f32).contains(&y));
                seen += 1;
            }
        }
        assert!(seen > 0);
    }

    #[test]
    fn test_background_cycles() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut scheduler = SpawnScheduler::new(400);
        let ticks = (BACKGROUND_INTERVAL + 1) * BACKGROUND_PHASES as u32;
        for _ in 0..ticks {
            scheduler.advance(&mut rng);
        }
        assert_eq!(scheduler.background_phase(), 0);
        for _ in 0..=BACKGROUND_INTERVAL {
            scheduler.advance(&mut rng);
        }
        assert_eq!(scheduler.background_phase(), 1);
    }
}
