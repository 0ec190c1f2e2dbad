//! Rendering boundary
//!
//! The simulation never draws. A frontend implements `Canvas`, and
//! `draw_frame` translates an immutable `GameState` into draw calls.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::progression::UpgradeKind;
use crate::sim::entities::{PowerUpKind, Spawned};
use crate::sim::{GameState, SessionPhase, WeatherKind};

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

// ── Palette ──────────────────────────────────────────────────────────────────

pub const OBSTACLE_COLOR: Rgb = Rgb(0, 255, 0);
pub const OBSTACLE_DANGER_COLOR: Rgb = Rgb(255, 0, 0);
pub const COIN_COLOR: Rgb = Rgb(255, 215, 0);
pub const SHIELD_COLOR: Rgb = Rgb(135, 206, 250);
pub const MAGNET_COLOR: Rgb = Rgb(255, 20, 147);
pub const HEART_COLOR: Rgb = Rgb(255, 0, 0);
pub const ENEMY_COLOR: Rgb = Rgb(139, 0, 0);
pub const IMMUNE_COLOR: Rgb = Rgb(255, 100, 100);
pub const RAGE_COLOR: Rgb = Rgb(255, 50, 50);
pub const TEXT_COLOR: Rgb = Rgb(0, 0, 0);
pub const ALERT_COLOR: Rgb = Rgb(255, 0, 0);
pub const RAIN_COLOR: Rgb = Rgb(0, 0, 255);
pub const FOG_COLOR: Rgb = Rgb(200, 200, 200);
pub const SKY_COLORS: [Rgb; BACKGROUND_PHASES] = [
    Rgb(135, 206, 250),
    Rgb(250, 250, 210),
    Rgb(255, 140, 0),
    Rgb(25, 25, 112),
];

/// Drawable primitives; `position` passed to `Canvas::draw` is the top-left
/// corner (or the center for `Ring`, the start for `Line`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rect { size: Vec2 },
    RectOutline { size: Vec2 },
    Ellipse { size: Vec2 },
    Ring { radius: f32 },
    Line { to: Vec2 },
    /// Translucent wash over an area
    Veil { size: Vec2 },
}

/// Output sink implemented by a frontend
pub trait Canvas {
    fn draw(&mut self, shape: Shape, position: Vec2, color: Rgb);
    fn draw_text(&mut self, text: &str, position: Vec2, color: Rgb);
}

/// Draw one complete frame
pub fn draw_frame<C: Canvas>(state: &GameState, canvas: &mut C) {
    let sky = SKY_COLORS[state.scheduler.background_phase() % SKY_COLORS.len()];
    canvas.draw(
        Shape::Rect {
            size: Vec2::new(WIDTH, HEIGHT),
        },
        Vec2::ZERO,
        sky,
    );

    match state.phase {
        SessionPhase::Running => draw_scene(state, canvas),
        SessionPhase::Paused => {
            canvas.draw_text(
                "Paused. Press P to resume.",
                Vec2::new(WIDTH / 2.0 - 150.0, HEIGHT / 2.0),
                TEXT_COLOR,
            );
        }
        SessionPhase::UpgradeMenu => draw_upgrade_menu(state, canvas),
        SessionPhase::GameOver => {
            canvas.draw_text(
                "Game over!",
                Vec2::new(WIDTH / 2.0 - 70.0, HEIGHT / 2.0 - 30.0),
                ALERT_COLOR,
            );
            canvas.draw_text(
                "Press SPACE for a new game",
                Vec2::new(WIDTH / 2.0 - 140.0, HEIGHT / 2.0 + 10.0),
                ALERT_COLOR,
            );
        }
    }
}

fn draw_scene<C: Canvas>(state: &GameState, canvas: &mut C) {
    for obstacle in &state.obstacles {
        let color = if obstacle.danger {
            OBSTACLE_DANGER_COLOR
        } else {
            OBSTACLE_COLOR
        };
        for rect in obstacle.hitboxes() {
            canvas.draw(Shape::Rect { size: rect.size }, rect.min, color);
        }
    }

    for coin in state.coins.iter().filter(|c| !c.is_collected()) {
        let b = coin.bounds();
        canvas.draw(Shape::Ellipse { size: b.size }, b.min, COIN_COLOR);
    }

    for power_up in &state.power_ups {
        let color = match power_up.kind {
            PowerUpKind::Shield => SHIELD_COLOR,
            PowerUpKind::Magnet => MAGNET_COLOR,
        };
        let b = power_up.bounds();
        canvas.draw(Shape::Rect { size: b.size }, b.min, color);
    }

    for heart in state.hearts.iter().filter(|h| !h.is_collected()) {
        let b = heart.bounds();
        canvas.draw(Shape::Ellipse { size: b.size }, b.min, HEART_COLOR);
    }

    for enemy in &state.enemies {
        let b = enemy.bounds();
        canvas.draw(Shape::Rect { size: b.size }, b.min, ENEMY_COLOR);
    }

    draw_hud(state, canvas);
    draw_weather(state, canvas);
    draw_avatar(state, canvas);
}

fn draw_hud<C: Canvas>(state: &GameState, canvas: &mut C) {
    let avatar = &state.avatar;
    let lines = [
        format!("Score: {}", avatar.score),
        format!("Coins: {}", avatar.coins),
        format!("Lives: {}", avatar.lives),
        format!("Health: {}", avatar.health),
        format!("Weather: {}", state.weather.kind.as_str()),
    ];
    for (i, line) in lines.iter().enumerate() {
        canvas.draw_text(line, Vec2::new(10.0, 10.0 + 30.0 * i as f32), TEXT_COLOR);
    }

    draw_health_bar(canvas, Vec2::new(120.0, 100.0), avatar.health);

    let x = WIDTH - 230.0;
    canvas.draw_text("Missions:", Vec2::new(x, 5.0), TEXT_COLOR);
    for (i, (kind, current, target)) in state.progression.mission_progress().iter().enumerate() {
        canvas.draw_text(
            &format!("{}: {}/{}", kind.description(), current, target),
            Vec2::new(x, 30.0 + 25.0 * i as f32),
            TEXT_COLOR,
        );
    }
}

fn draw_health_bar<C: Canvas>(canvas: &mut C, pos: Vec2, health: u32) {
    let size = Vec2::new(100.0, 10.0);
    canvas.draw(
        Shape::Rect {
            size: size + Vec2::splat(4.0),
        },
        pos - Vec2::splat(2.0),
        Rgb(0, 0, 0),
    );
    canvas.draw(Shape::Rect { size }, pos, Rgb(255, 0, 0));
    let filled = (health.min(MAX_HEALTH) as f32 / MAX_HEALTH as f32 * size.x).floor();
    if filled > 0.0 {
        canvas.draw(
            Shape::Rect {
                size: Vec2::new(filled, size.y),
            },
            pos,
            Rgb(0, 255, 0),
        );
    }
}

fn draw_weather<C: Canvas>(state: &GameState, canvas: &mut C) {
    match state.weather.kind {
        WeatherKind::Clear => {}
        WeatherKind::Rain => {
            // Streaks reshuffle every tick but are reproducible for a given tick
            let mut rng = Pcg32::seed_from_u64(state.seed ^ state.time_ticks);
            for _ in 0..20 {
                let x = rng.random_range(0.0..=WIDTH);
                let y = rng.random_range(0.0..=HEIGHT);
                canvas.draw(
                    Shape::Line {
                        to: Vec2::new(x, y + 10.0),
                    },
                    Vec2::new(x, y),
                    RAIN_COLOR,
                );
            }
        }
        WeatherKind::Fog => canvas.draw(
            Shape::Veil {
                size: Vec2::new(WIDTH, HEIGHT),
            },
            Vec2::ZERO,
            FOG_COLOR,
        ),
        WeatherKind::Wind => {
            canvas.draw_text("The wind is blowing!", Vec2::new(WIDTH - 120.0, 10.0), RAIN_COLOR)
        }
    }
}

fn draw_avatar<C: Canvas>(state: &GameState, canvas: &mut C) {
    let avatar = &state.avatar;
    let b = avatar.bounds();
    let color = if avatar.is_raging() {
        RAGE_COLOR
    } else if avatar.is_immune() {
        IMMUNE_COLOR
    } else {
        state.color.rgb()
    };
    canvas.draw(Shape::Rect { size: b.size }, b.min, color);

    if avatar.is_shielded() {
        let ring = b.inflate(5.0);
        canvas.draw(Shape::RectOutline { size: ring.size }, ring.min, SHIELD_COLOR);
    }
    if avatar.is_magnetized() {
        canvas.draw(Shape::Ring { radius: 50.0 }, b.center(), MAGNET_COLOR);
    }
}

fn draw_upgrade_menu<C: Canvas>(state: &GameState, canvas: &mut C) {
    canvas.draw_text(
        &format!("Coins: {}", state.avatar.coins),
        Vec2::new(50.0, 10.0),
        TEXT_COLOR,
    );
    for (i, kind) in UpgradeKind::ALL.iter().enumerate() {
        let upgrade = state.progression.upgrade(*kind);
        canvas.draw_text(
            &format!(
                "{} ({}): level {} - cost {}",
                kind.label(),
                i + 1,
                upgrade.level,
                upgrade.cost
            ),
            Vec2::new(50.0, 50.0 + 40.0 * i as f32),
            TEXT_COLOR,
        );
    }
    canvas.draw_text("Press M to close the shop", Vec2::new(50.0, HEIGHT - 40.0), TEXT_COLOR);
}
