//! Terminal frontend built on crossterm
//!
//! The 400x600 play area is scaled onto the terminal's character grid.
//! No game logic lives here: this module runs the pre-game menu, maps keys
//! to `InputEvent`s and rasterises draw calls into cells.

use std::io::Write;
use std::time::Duration;

use crossterm::{
    QueueableCommand, cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{self, Color, Print},
};
use glam::Vec2;

use crate::consts::{HEIGHT, WIDTH};
use crate::progression::UpgradeKind;
use crate::render::{Canvas, Rgb, Shape};
use crate::settings::{AvatarColor, Difficulty, MenuSelection, NameInput};
use crate::sim::{InputEvent, SessionPhase};

fn digit(key: &KeyEvent) -> Option<u8> {
    match key.code {
        KeyCode::Char(c @ '0'..='9') => Some(c as u8 - b'0'),
        _ => None,
    }
}

/// Map one key press to an input event for the current phase
pub fn map_key(key: KeyEvent, phase: SessionPhase) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Some(InputEvent::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputEvent::Quit)
        }
        KeyCode::Char(' ') | KeyCode::Up => match phase {
            SessionPhase::GameOver => Some(InputEvent::Restart),
            _ => Some(InputEvent::Jump),
        },
        KeyCode::Char('p') => Some(InputEvent::TogglePause),
        KeyCode::Char('m') => Some(InputEvent::ToggleUpgradeMenu),
        KeyCode::Char('0'..='9') => digit(&key)
            .and_then(UpgradeKind::from_key)
            .map(InputEvent::PurchaseUpgrade),
        _ => None,
    }
}

/// Drain pending terminal events, waiting at most `timeout` for the first
pub fn poll_input(timeout: Duration, phase: SessionPhase) -> std::io::Result<Vec<InputEvent>> {
    let mut inputs = Vec::new();
    let mut wait = timeout;
    while event::poll(wait)? {
        if let Event::Key(key) = event::read()? {
            inputs.extend(map_key(key, phase));
        }
        wait = Duration::ZERO;
    }
    Ok(inputs)
}

/// Menu text sits on the bare (black) terminal
const MENU_TEXT: Rgb = Rgb(255, 255, 255);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuStage {
    Name,
    Difficulty,
    Color,
}

/// Result of one menu keystroke
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuStep {
    Continue,
    Done(MenuSelection),
    Quit,
}

/// Pre-game menu: name entry, then difficulty (keys 1-3), then color
/// (keys 1-7). Enter on an empty name or a choice screen keeps the default.
#[derive(Debug, Clone)]
pub struct Menu {
    stage: MenuStage,
    defaults: MenuSelection,
    name: NameInput,
    player_name: Option<String>,
    difficulty: Option<Difficulty>,
}

impl Menu {
    pub fn new(defaults: MenuSelection) -> Self {
        Self {
            stage: MenuStage::Name,
            defaults,
            name: NameInput::default(),
            player_name: None,
            difficulty: None,
        }
    }

    fn finish(&self, color: AvatarColor) -> MenuStep {
        MenuStep::Done(MenuSelection {
            player_name: self
                .player_name
                .clone()
                .unwrap_or_else(|| self.defaults.player_name.clone()),
            difficulty: self.difficulty.unwrap_or(self.defaults.difficulty),
            color,
        })
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> MenuStep {
        if key.kind == KeyEventKind::Release {
            return MenuStep::Continue;
        }
        if key.code == KeyCode::Esc {
            return MenuStep::Quit;
        }

        match self.stage {
            MenuStage::Name => match key.code {
                KeyCode::Enter if self.name.as_str().is_empty() => {
                    self.stage = MenuStage::Difficulty;
                }
                KeyCode::Enter => match self.name.submit() {
                    Some(name) => {
                        self.player_name = Some(name);
                        self.stage = MenuStage::Difficulty;
                    }
                    None => log::debug!("Rejected name {:?}", self.name.as_str()),
                },
                KeyCode::Backspace => self.name.backspace(),
                KeyCode::Char(c) => {
                    self.name.push(c);
                }
                _ => {}
            },
            MenuStage::Difficulty => {
                let chosen = match key.code {
                    KeyCode::Enter => Some(self.defaults.difficulty),
                    _ => digit(&key).and_then(Difficulty::from_key),
                };
                if let Some(difficulty) = chosen {
                    self.difficulty = Some(difficulty);
                    self.stage = MenuStage::Color;
                }
            }
            MenuStage::Color => {
                let chosen = match key.code {
                    KeyCode::Enter => Some(self.defaults.color),
                    _ => digit(&key).and_then(AvatarColor::from_key),
                };
                if let Some(color) = chosen {
                    return self.finish(color);
                }
            }
        }
        MenuStep::Continue
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C) {
        let line = |i: usize| Vec2::new(40.0, 120.0 + 30.0 * i as f32);
        match self.stage {
            MenuStage::Name => {
                canvas.draw_text("Enter your name:", line(0), MENU_TEXT);
                canvas.draw_text(&format!("> {}_", self.name.as_str()), line(1), MENU_TEXT);
                canvas.draw_text(
                    &format!("Enter keeps \"{}\"", self.defaults.player_name),
                    line(3),
                    MENU_TEXT,
                );
            }
            MenuStage::Difficulty => {
                canvas.draw_text("Choose difficulty:", line(0), MENU_TEXT);
                for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
                    let text = format!("{}. {}", i + 1, difficulty.as_str());
                    canvas.draw_text(&text, line(i + 1), MENU_TEXT);
                }
            }
            MenuStage::Color => {
                canvas.draw_text("Choose your color:", line(0), MENU_TEXT);
                for (i, color) in AvatarColor::ALL.iter().enumerate() {
                    canvas.draw_text(&format!("{}. {:?}", i + 1, color), line(i + 1), color.rgb());
                }
            }
        }
    }
}

/// Run the menu until a selection is made. `None` means the player quit.
pub fn run_menu<W: Write>(out: &mut W, defaults: MenuSelection) -> std::io::Result<Option<MenuSelection>> {
    let mut menu = Menu::new(defaults);
    loop {
        let (cols, rows) = crossterm::terminal::size()?;
        let mut canvas = TerminalCanvas::new(cols, rows);
        menu.draw(&mut canvas);
        canvas.present(out)?;

        if let Event::Key(key) = event::read()? {
            match menu.handle_key(key) {
                MenuStep::Continue => {}
                MenuStep::Done(selection) => return Ok(Some(selection)),
                MenuStep::Quit => return Ok(None),
            }
        }
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

/// A cell: glyph plus foreground and background colors
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    fg: Rgb,
    bg: Rgb,
}

/// Character-grid canvas
#[derive(Debug, Clone)]
pub struct TerminalCanvas {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl TerminalCanvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        let blank = Cell {
            glyph: ' ',
            fg: Rgb(0, 0, 0),
            bg: Rgb(0, 0, 0),
        };
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
            cells: vec![blank; usize::from(cols.max(1)) * usize::from(rows.max(1))],
        }
    }

    /// Logical position to (column, row), unclamped
    fn to_cell(&self, p: Vec2) -> (i32, i32) {
        let col = (p.x / WIDTH * f32::from(self.cols)).floor() as i32;
        let row = (p.y / HEIGHT * f32::from(self.rows)).floor() as i32;
        (col, row)
    }

    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= i32::from(self.cols) || row >= i32::from(self.rows) {
            return None;
        }
        let index = row as usize * usize::from(self.cols) + col as usize;
        self.cells.get_mut(index)
    }

    fn fill(&mut self, min: Vec2, size: Vec2, color: Rgb) {
        let (c0, r0) = self.to_cell(min);
        let (c1, r1) = self.to_cell(min + size);
        for row in r0..=r1.max(r0) {
            for col in c0..=c1.max(c0) {
                if let Some(cell) = self.cell_mut(col, row) {
                    *cell = Cell {
                        glyph: ' ',
                        fg: color,
                        bg: color,
                    };
                }
            }
        }
    }

    fn plot(&mut self, p: Vec2, glyph: char, color: Rgb) {
        let (col, row) = self.to_cell(p);
        if let Some(cell) = self.cell_mut(col, row) {
            cell.glyph = glyph;
            cell.fg = color;
        }
    }

    /// Write the whole grid to the terminal
    pub fn present<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            let start = usize::from(row) * usize::from(self.cols);
            for cell in &self.cells[start..start + usize::from(self.cols)] {
                out.queue(style::SetForegroundColor(to_color(cell.fg)))?;
                out.queue(style::SetBackgroundColor(to_color(cell.bg)))?;
                out.queue(Print(cell.glyph))?;
            }
        }
        out.queue(style::ResetColor)?;
        out.flush()
    }
}

impl Canvas for TerminalCanvas {
    fn draw(&mut self, shape: Shape, position: Vec2, color: Rgb) {
        match shape {
            Shape::Rect { size } | Shape::Ellipse { size } => self.fill(position, size, color),
            Shape::RectOutline { size } => {
                let corners = [
                    position,
                    position + Vec2::new(size.x, 0.0),
                    position + Vec2::new(0.0, size.y),
                    position + size,
                ];
                for corner in corners {
                    self.plot(corner, '+', color);
                }
            }
            Shape::Ring { radius } => {
                for step in 0..16 {
                    let angle = step as f32 / 16.0 * std::f32::consts::TAU;
                    self.plot(position + Vec2::from_angle(angle) * radius, '·', color);
                }
            }
            Shape::Line { to } => {
                self.plot(position, '|', color);
                self.plot(to, '|', color);
            }
            Shape::Veil { size } => {
                let (c0, r0) = self.to_cell(position);
                let (c1, r1) = self.to_cell(position + size);
                for row in r0..r1 {
                    for col in c0..c1 {
                        if (row + col) % 3 == 0
                            && let Some(cell) = self.cell_mut(col, row)
                            && cell.glyph == ' '
                        {
                            cell.glyph = '░';
                            cell.fg = color;
                        }
                    }
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, position: Vec2, color: Rgb) {
        let (col, row) = self.to_cell(position);
        for (i, glyph) in text.chars().enumerate() {
            if let Some(cell) = self.cell_mut(col + i as i32, row) {
                cell.glyph = glyph;
                cell.fg = color;
            }
        }
    }
}
