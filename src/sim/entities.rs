//! Spawned entities: obstacle pairs, collectibles and hazards
//!
//! Every entity scrolls left each tick and shares one contract (`Spawned`):
//! advance, bounding-box interaction, and expiry once fully off the left edge.

use glam::Vec2;
use rand::Rng;

use super::geometry::{Aabb, Latch};
use crate::consts::*;

/// Uniform update/collide/expire contract
pub trait Spawned {
    /// Move left by one tick's worth of scrolling
    fn advance(&mut self, world_speed: f32);

    /// Rectangles the avatar can touch
    fn hitboxes(&self) -> Vec<Aabb>;

    /// Right-most edge, used for expiry
    fn right_edge(&self) -> f32;

    /// Axis-aligned overlap with the avatar's box
    fn interacts(&self, avatar: &Aabb) -> bool {
        self.hitboxes().iter().any(|hitbox| hitbox.overlaps(avatar))
    }

    /// Fully off-screen on the left
    fn is_expired(&self) -> bool {
        self.right_edge() < 0.0
    }
}

/// Two rectangles forming a vertical gap
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub x: f32,
    pub width: f32,
    /// Bottom of the top rectangle
    pub gap_top: f32,
    /// Top of the bottom rectangle
    pub gap_bottom: f32,
    /// Cosmetic: drawn in the danger color
    pub danger: bool,
    passed: Latch,
}

impl Obstacle {
    pub fn new(x: f32, gap_top: f32, danger: bool) -> Self {
        Self {
            x,
            width: OBSTACLE_WIDTH,
            gap_top,
            gap_bottom: gap_top + OBSTACLE_GAP,
            danger,
            passed: Latch::default(),
        }
    }

    /// Random gap placement keeping the full gap inside the play area
    pub fn spawn<R: Rng>(x: f32, rng: &mut R) -> Self {
        let gap_top = rng.random_range(OBSTACLE_GAP_TOP_MIN..=OBSTACLE_GAP_TOP_MAX) as f32;
        let danger = rng.random_bool(DANGER_CHANCE);
        Self::new(x, gap_top, danger)
    }

    pub fn top_rect(&self) -> Aabb {
        Aabb::new(self.x, 0.0, self.width, self.gap_top)
    }

    pub fn bottom_rect(&self) -> Aabb {
        Aabb::new(self.x, self.gap_bottom, self.width, HEIGHT)
    }

    pub fn is_passed(&self) -> bool {
        self.passed.is_done()
    }

    /// Mark the obstacle passed once its trailing edge is behind the avatar.
    /// Returns `true` exactly once per obstacle.
    pub fn try_pass(&mut self, avatar_x: f32) -> bool {
        self.x + self.width < avatar_x && self.passed.trip()
    }
}

impl Spawned for Obstacle {
    fn advance(&mut self, world_speed: f32) {
        self.x -= world_speed;
    }

    fn hitboxes(&self) -> Vec<Aabb> {
        vec![self.top_rect(), self.bottom_rect()]
    }

    fn right_edge(&self) -> f32 {
        self.x + self.width
    }
}

/// Currency pickup
#[derive(Debug, Clone)]
pub struct Coin {
    pub pos: Vec2,
    collected: Latch,
}

impl Coin {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            collected: Latch::default(),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, COIN_SIZE, COIN_SIZE)
    }

    pub fn is_collected(&self) -> bool {
        self.collected.is_done()
    }

    /// Returns `true` only on the first call
    pub fn collect(&mut self) -> bool {
        self.collected.trip()
    }
}

impl Spawned for Coin {
    fn advance(&mut self, world_speed: f32) {
        self.pos.x -= world_speed;
    }

    fn hitboxes(&self) -> Vec<Aabb> {
        vec![self.bounds()]
    }

    fn right_edge(&self) -> f32 {
        self.bounds().right()
    }
}

/// Extra-life pickup
#[derive(Debug, Clone)]
pub struct Heart {
    pub pos: Vec2,
    collected: Latch,
}

impl Heart {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            collected: Latch::default(),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, HEART_SIZE, HEART_SIZE)
    }

    pub fn is_collected(&self) -> bool {
        self.collected.is_done()
    }

    /// Returns `true` only on the first call
    pub fn collect(&mut self) -> bool {
        self.collected.trip()
    }
}

impl Spawned for Heart {
    fn advance(&mut self, world_speed: f32) {
        self.pos.x -= world_speed;
    }

    fn hitboxes(&self) -> Vec<Aabb> {
        vec![self.bounds()]
    }

    fn right_edge(&self) -> f32 {
        self.bounds().right()
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    Shield,
    Magnet,
}

impl PowerUpKind {
    /// Uniform pick between the two kinds
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            PowerUpKind::Shield
        } else {
            PowerUpKind::Magnet
        }
    }
}

/// Timed-effect pickup
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn new(x: f32, y: f32, kind: PowerUpKind) -> Self {
        Self {
            pos: Vec2::new(x, y),
            kind,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, POWER_UP_SIZE, POWER_UP_SIZE)
    }
}

impl Spawned for PowerUp {
    fn advance(&mut self, world_speed: f32) {
        self.pos.x -= world_speed;
    }

    fn hitboxes(&self) -> Vec<Aabb> {
        vec![self.bounds()]
    }

    fn right_edge(&self) -> f32 {
        self.bounds().right()
    }
}

/// Hazard flying at its own constant speed
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    /// Pixels per tick, fixed at creation
    pub speed: f32,
}

impl Enemy {
    pub fn new(x: f32, y: f32, speed: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            speed,
        }
    }

    pub fn spawn<R: Rng>(x: f32, y: f32, rng: &mut R) -> Self {
        let speed = rng.random_range(ENEMY_SPEED_MIN..=ENEMY_SPEED_MAX) as f32;
        Self::new(x, y, speed)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, ENEMY_SIZE, ENEMY_SIZE)
    }
}

impl Spawned for Enemy {
    /// Enemies ignore the world scroll speed
    fn advance(&mut self, _world_speed: f32) {
        self.pos.x -= self.speed;
    }

    fn hitboxes(&self) -> Vec<Aabb> {
        vec![self.bounds()]
    }

    fn right_edge(&self) -> f32 {
        self.bounds().right()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_obstacle_gap_in_safe_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..500 {
            let obstacle = Obstacle::spawn(WIDTH, &mut rng);
            assert!(obstacle.gap_top >= OBSTACLE_GAP_TOP_MIN as f32);
            assert!(obstacle.gap_top <= OBSTACLE_GAP_TOP_MAX as f32);
            assert_eq!(obstacle.gap_bottom - obstacle.gap_top, OBSTACLE_GAP);
            assert!(obstacle.gap_bottom < HEIGHT);
        }
    }

    #[test]
    fn test_obstacle_hits_either_rect_but_not_gap() {
        let obstacle = Obstacle::new(50.0, 200.0, false);
        let in_gap = Aabb::new(60.0, 250.0, 40.0, 30.0);
        let top = Aabb::new(60.0, 180.0, 40.0, 30.0);
        let bottom = Aabb::new(60.0, 340.0, 40.0, 30.0);
        assert!(!obstacle.interacts(&in_gap));
        assert!(obstacle.interacts(&top));
        assert!(obstacle.interacts(&bottom));
    }

    #[test]
    fn test_obstacle_passes_once() {
        let mut obstacle = Obstacle::new(0.0, 200.0, false);
        assert!(!obstacle.try_pass(AVATAR_X)); // trailing edge at 70, not behind 60
        obstacle.advance(20.0);
        assert!(obstacle.try_pass(AVATAR_X));
        assert!(obstacle.is_passed());
        for _ in 0..5 {
            obstacle.advance(4.0);
            assert!(!obstacle.try_pass(AVATAR_X));
        }
    }

    #[test]
    fn test_expiry_requires_fully_off_screen() {
        let mut coin = Coin::new(0.0, 100.0);
        coin.advance(COIN_SIZE);
        assert!(!coin.is_expired()); // right edge exactly 0
        coin.advance(1.0);
        assert!(coin.is_expired());
    }

    #[test]
    fn test_collect_is_idempotent() {
        let mut coin = Coin::new(10.0, 10.0);
        assert!(coin.collect());
        assert!(!coin.collect());
        assert!(coin.is_collected());

        let mut heart = Heart::new(10.0, 10.0);
        assert!(heart.collect());
        assert!(!heart.collect());
    }

    #[test]
    fn test_enemy_uses_own_speed() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..100 {
            let mut enemy = Enemy::spawn(WIDTH, 100.0, &mut rng);
            assert!((2.0..=4.0).contains(&enemy.speed));
            let before = enemy.pos.x;
            enemy.advance(5.0);
            assert_eq!(before - enemy.pos.x, enemy.speed);
        }
    }

    #[test]
    fn test_power_up_kind_covers_both() {
        let mut rng = Pcg32::seed_from_u64(11);
        let kinds: Vec<_> = (0..64).map(|_| PowerUpKind::random(&mut rng)).collect();
        assert!(kinds.contains(&PowerUpKind::Shield));
        assert!(kinds.contains(&PowerUpKind::Magnet));
    }
}
