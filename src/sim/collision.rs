//! Collision and effect resolution
//!
//! Advances every live entity and applies its interaction with the avatar.
//! Evaluation order is fixed: floor, obstacles, coins, power-ups, hearts,
//! enemies. Scoring events re-evaluate missions synchronously. Once the last
//! life is gone, entities still move but collectibles no longer apply.

use super::avatar::{Avatar, DamageOutcome};
use super::entities::{PowerUpKind, Spawned};
use super::state::{GameEvent, GameState};
use crate::consts::HIT_DAMAGE;
use crate::progression::Progression;

/// Outcome of one resolver pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    /// The last life was lost during this pass
    pub exhausted: bool,
}

/// Apply a hit and report it
fn hit(avatar: &mut Avatar, events: &mut Vec<GameEvent>, resolution: &mut Resolution) -> bool {
    let outcome = avatar.take_damage(HIT_DAMAGE);
    match outcome {
        DamageOutcome::Blocked => {}
        DamageOutcome::Hit => events.push(GameEvent::Damaged {
            health: avatar.health,
        }),
        DamageOutcome::LifeLost => events.push(GameEvent::LifeLost {
            lives: avatar.lives,
        }),
        DamageOutcome::Exhausted => {
            events.push(GameEvent::LifeLost {
                lives: avatar.lives,
            });
            resolution.exhausted = true;
        }
    }
    outcome.applied()
}

/// Re-evaluate missions after a scoring event
fn score(progression: &mut Progression, avatar: &mut Avatar, events: &mut Vec<GameEvent>) {
    for kind in progression.on_scoring_event(avatar) {
        events.push(GameEvent::MissionCompleted(kind));
    }
}

/// Advance all entities one tick and resolve their interactions with the avatar
pub fn resolve(state: &mut GameState, events: &mut Vec<GameEvent>) -> Resolution {
    let speed = state.world_speed();
    let GameState {
        avatar,
        obstacles,
        coins,
        power_ups,
        hearts,
        enemies,
        progression,
        ..
    } = state;
    let mut resolution = Resolution::default();

    // Falling out the bottom counts as a hit
    if avatar.is_below_floor() {
        hit(avatar, events, &mut resolution);
        avatar.clamp_to_floor();
        events.push(GameEvent::HitFloor);
    }

    // Obstacles: contact damages every tick, limited only by immunity
    for obstacle in obstacles.iter_mut() {
        obstacle.advance(speed);
        if obstacle.interacts(&avatar.bounds()) {
            hit(avatar, events, &mut resolution);
        }
        if obstacle.try_pass(avatar.x) {
            avatar.score = avatar.score.saturating_add(1);
            events.push(GameEvent::ObstaclePassed {
                score: avatar.score,
            });
            score(progression, avatar, events);
        }
    }
    obstacles.retain(|o| !o.is_expired());

    // Coins collected on the previous pass leave now
    coins.retain(|c| !c.is_collected());
    for coin in coins.iter_mut() {
        coin.advance(speed);
        if !resolution.exhausted && coin.interacts(&avatar.bounds()) && coin.collect() {
            avatar.coins = avatar.coins.saturating_add(1);
            events.push(GameEvent::CoinCollected {
                coins: avatar.coins,
            });
            score(progression, avatar, events);
        }
    }
    coins.retain(|c| !c.is_expired());

    power_ups.retain_mut(|power_up| {
        power_up.advance(speed);
        if !resolution.exhausted && power_up.interacts(&avatar.bounds()) {
            match power_up.kind {
                PowerUpKind::Shield => avatar.activate_shield(),
                PowerUpKind::Magnet => avatar.activate_magnet(),
            }
            events.push(GameEvent::PowerUpCollected(power_up.kind));
            return false;
        }
        !power_up.is_expired()
    });

    hearts.retain_mut(|heart| {
        heart.advance(speed);
        if !resolution.exhausted && heart.interacts(&avatar.bounds()) && heart.collect() {
            avatar.gain_life();
            progression.record_heart();
            events.push(GameEvent::HeartCollected {
                lives: avatar.lives,
            });
            score(progression, avatar, events);
            return false;
        }
        !heart.is_expired()
    });

    // An enemy that lands a hit is spent; a blocked one keeps flying
    enemies.retain_mut(|enemy| {
        enemy.advance(speed);
        if enemy.interacts(&avatar.bounds()) && hit(avatar, events, &mut resolution) {
            return false;
        }
        !enemy.is_expired()
    });

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::progression::MissionKind;
    use crate::settings::{AvatarColor, Difficulty};
    use crate::sim::entities::{Coin, Enemy, Heart, Obstacle, PowerUp};

    fn state() -> GameState {
        GameState::new(9, Difficulty::Easy, AvatarColor::Yellow)
    }

    /// Obstacle whose top rectangle covers the avatar after one advance
    fn blocking_obstacle() -> Obstacle {
        Obstacle::new(AVATAR_X + 3.0, HEIGHT - 200.0, false)
    }

    #[test]
    fn test_floor_hit_damages_once_and_clamps() {
        let mut state = state();
        state.avatar.y = HEIGHT + 5.0;
        state.avatar.vel = 10.0;
        let mut events = Vec::new();

        resolve(&mut state, &mut events);
        assert_eq!(state.avatar.health, MAX_HEALTH - HIT_DAMAGE);
        assert_eq!(state.avatar.y, HEIGHT - AVATAR_HEIGHT);
        assert_eq!(state.avatar.vel, 0.0);
        assert_eq!(state.avatar.lives, START_LIVES);
        assert!(events.contains(&GameEvent::HitFloor));
    }

    #[test]
    fn test_floor_clamps_even_when_shielded() {
        let mut state = state();
        state.avatar.activate_shield();
        state.avatar.y = HEIGHT + 1.0;
        resolve(&mut state, &mut Vec::new());
        assert_eq!(state.avatar.health, MAX_HEALTH);
        assert_eq!(state.avatar.y, HEIGHT - AVATAR_HEIGHT);
    }

    #[test]
    fn test_obstacle_contact_rate_limited_by_immunity() {
        let mut state = state();
        state.obstacles.push(blocking_obstacle());
        let mut events = Vec::new();

        resolve(&mut state, &mut events);
        assert_eq!(state.avatar.health, 75);
        for _ in 0..5 {
            // Keep the obstacle in place under the avatar
            state.obstacles[0].x = AVATAR_X + 3.0;
            resolve(&mut state, &mut events);
        }
        assert_eq!(state.avatar.health, 75);

        // Cooldown over, contact continues: damage again
        state.avatar.immunity_ticks = 0;
        state.obstacles[0].x = AVATAR_X + 3.0;
        resolve(&mut state, &mut events);
        assert_eq!(state.avatar.health, 50);
    }

    #[test]
    fn test_obstacle_scores_exactly_once() {
        let mut state = state();
        // Trailing edge at 58 after one advance of 3: already behind the avatar
        state.obstacles.push(Obstacle::new(-9.0, 200.0, false));
        let mut events = Vec::new();
        for _ in 0..10 {
            resolve(&mut state, &mut events);
        }
        assert_eq!(state.avatar.score, 1);
        let passes = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ObstaclePassed { .. }))
            .count();
        assert_eq!(passes, 1);
    }

    #[test]
    fn test_expired_obstacles_removed() {
        let mut state = state();
        state.obstacles.push(Obstacle::new(-OBSTACLE_WIDTH + 1.0, 200.0, false));
        resolve(&mut state, &mut Vec::new());
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_coin_collected_once_then_removed() {
        let mut state = state();
        let avatar_box = state.avatar.bounds();
        state.coins.push(Coin::new(avatar_box.left() + 5.0, avatar_box.top()));

        resolve(&mut state, &mut Vec::new());
        assert_eq!(state.avatar.coins, 1);
        assert_eq!(state.coins.len(), 1);
        assert!(state.coins[0].is_collected());

        // Still overlapping on the next tick: no double grant, and it leaves
        resolve(&mut state, &mut Vec::new());
        assert_eq!(state.avatar.coins, 1);
        assert!(state.coins.is_empty());
    }

    #[test]
    fn test_coin_completes_mission() {
        let mut state = state();
        state.avatar.coins = 9;
        let avatar_box = state.avatar.bounds();
        state.coins.push(Coin::new(avatar_box.left() + 5.0, avatar_box.top()));
        let mut events = Vec::new();

        resolve(&mut state, &mut events);
        assert_eq!(state.avatar.coins, 20);
        assert!(events.contains(&GameEvent::MissionCompleted(MissionKind::CollectCoins)));
    }

    #[test]
    fn test_power_ups_use_upgrade_durations() {
        let mut state = state();
        state.avatar.effects.shield_duration = 900;
        state.avatar.effects.magnet_duration = 600;
        let avatar_box = state.avatar.bounds();
        state.power_ups.push(PowerUp::new(avatar_box.left() + 5.0, avatar_box.top(), PowerUpKind::Shield));
        state.power_ups.push(PowerUp::new(avatar_box.left() + 5.0, avatar_box.top(), PowerUpKind::Magnet));

        resolve(&mut state, &mut Vec::new());
        assert_eq!(state.avatar.shield, Some(900));
        assert_eq!(state.avatar.magnet_ticks, 600);
        assert!(state.power_ups.is_empty());
    }

    #[test]
    fn test_heart_adds_life_capped() {
        let mut state = state();
        state.avatar.lives = MAX_LIVES;
        let avatar_box = state.avatar.bounds();
        state.hearts.push(Heart::new(avatar_box.left() + 5.0, avatar_box.top()));

        resolve(&mut state, &mut Vec::new());
        assert_eq!(state.avatar.lives, MAX_LIVES);
        assert_eq!(state.progression.metrics.hearts_collected, 1);
        assert!(state.hearts.is_empty());
    }

    #[test]
    fn test_exhaustion_stops_collectibles() {
        let mut state = state();
        state.avatar.lives = 1;
        state.avatar.health = HIT_DAMAGE;
        state.obstacles.push(blocking_obstacle());
        let avatar_box = state.avatar.bounds();
        state.coins.push(Coin::new(avatar_box.left() + 5.0, avatar_box.top()));
        state.power_ups.push(PowerUp::new(avatar_box.left() + 5.0, avatar_box.top(), PowerUpKind::Shield));
        state.hearts.push(Heart::new(avatar_box.left() + 5.0, avatar_box.top()));
        let mut events = Vec::new();

        let resolution = resolve(&mut state, &mut events);
        assert!(resolution.exhausted);
        assert_eq!(state.avatar.lives, 0);
        assert_eq!(state.avatar.coins, 0);
        assert_eq!(state.avatar.shield, None);
        assert_eq!(state.progression.metrics.hearts_collected, 0);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::HeartCollected { .. })));
    }

    #[test]
    fn test_enemy_removed_only_when_hit_lands() {
        let mut state = state();
        let avatar_box = state.avatar.bounds();
        state.enemies.push(Enemy::new(avatar_box.left() + 10.0, avatar_box.top(), 2.0));
        state.avatar.activate_shield();

        resolve(&mut state, &mut Vec::new());
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.avatar.health, MAX_HEALTH);

        state.avatar.shield = None;
        resolve(&mut state, &mut Vec::new());
        assert!(state.enemies.is_empty());
        assert_eq!(state.avatar.health, MAX_HEALTH - HIT_DAMAGE);
    }

    #[test]
    fn test_exhaustion_reported() {
        let mut state = state();
        state.avatar.lives = 1;
        state.avatar.health = HIT_DAMAGE;
        state.obstacles.push(blocking_obstacle());
        let resolution = resolve(&mut state, &mut Vec::new());
        assert!(resolution.exhausted);
        assert_eq!(state.avatar.lives, 0);
    }

    #[test]
    fn test_obstacles_resolve_before_collectibles() {
        let mut state = state();
        state.obstacles.push(blocking_obstacle());
        let avatar_box = state.avatar.bounds();
        state.coins.push(Coin::new(avatar_box.left() + 5.0, avatar_box.top()));
        let mut events = Vec::new();

        resolve(&mut state, &mut events);
        let damage = events.iter().position(|e| matches!(e, GameEvent::Damaged { .. }));
        let coin = events.iter().position(|e| matches!(e, GameEvent::CoinCollected { .. }));
        assert!(damage.unwrap() < coin.unwrap());
    }
}
