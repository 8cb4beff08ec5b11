//! Main UI Application
//!
//! Maps terminal input onto game input events and draws the world from
//! the game's view snapshot.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton as TermButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
};

use crate::entities::{Category, EntityView, Entity, Position};
use crate::entities::player::SPECIAL_COOLDOWN;
use crate::game::{Game, GameMode, InputEvent, Key, MouseButton};
use crate::progression::level_title;
use crate::world::dungeon::CELL_SIZE;
use crate::world::{is_underwater, MapId};

/// Terminals only report presses; a held key is let go after this long
/// without a repeat
const HOLD_TIMEOUT: Duration = Duration::from_millis(350);

/// World units per terminal column and row in the main view
const UNITS_PER_COLUMN: f32 = 0.5;
const UNITS_PER_ROW: f32 = 1.0;

const MOVEMENT_KEYS: [Key; 4] = [Key::Forward, Key::Back, Key::Left, Key::Right];

/// Draw order; later categories end up on top
fn layer(category: Category) -> u8 {
    match category {
        Category::Grass | Category::Bush => 0,
        Category::Tree | Category::Rock | Category::Wall | Category::House => 1,
        Category::Item | Category::Portal | Category::Npc => 2,
        Category::Enemy | Category::Boss => 3,
        Category::Player => 4,
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

/// Dim a color toward black
fn shade((r, g, b): (u8, u8, u8), factor: f32) -> Color {
    Color::Rgb(
        (r as f32 * factor) as u8,
        (g as f32 * factor) as u8,
        (b as f32 * factor) as u8,
    )
}

/// Maps world coordinates into a screen rectangle
struct Viewport {
    area: Rect,
    center: Position,
    units_per_column: f32,
    units_per_row: f32,
}

impl Viewport {
    fn to_screen(&self, x: f32, z: f32) -> Option<(u16, u16)> {
        let col = ((x - self.center.x) / self.units_per_column).round() as i32 + self.area.width as i32 / 2;
        let row = ((z - self.center.z) / self.units_per_row).round() as i32 + self.area.height as i32 / 2;
        if col < 0 || row < 0 || col >= self.area.width as i32 || row >= self.area.height as i32 {
            return None;
        }
        Some((self.area.x + col as u16, self.area.y + row as u16))
    }

    fn to_world(&self, col: u16, row: u16) -> (f32, f32) {
        let dx = col as f32 - (self.area.x + self.area.width / 2) as f32;
        let dz = row as f32 - (self.area.y + self.area.height / 2) as f32;
        (self.center.x + dx * self.units_per_column, self.center.z + dz * self.units_per_row)
    }

    fn put(&self, buf: &mut Buffer, x: f32, z: f32, ch: char, style: Style) {
        if let Some(cell) = self.to_screen(x, z) {
            buf[cell].set_char(ch).set_style(style);
        }
    }
}

/// Main UI application
pub struct App {
    /// When each held movement key was last pressed or repeated
    held: HashMap<Key, Instant>,
}

impl App {
    pub fn new() -> Self {
        Self { held: HashMap::new() }
    }

    /// Handle a key event. Returns true if the app should quit.
    pub fn handle_input(&mut self, key: KeyEvent, game: &mut Game) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        let mode = game.mode();
        let in_panel = mode.is_paused() || mode == GameMode::GameOver;

        if key.kind == KeyEventKind::Release {
            if let Some(logical) = movement_key(key.code) {
                self.release(logical, game);
            }
            return false;
        }
        if key.kind == KeyEventKind::Repeat && movement_key(key.code).is_none() {
            return false;
        }

        // Number keys pick menu entries and skills directly
        if let KeyCode::Char(c @ '1'..='9') = key.code {
            let index = c as usize - '1' as usize;
            match mode {
                GameMode::Menu | GameMode::GameOver => {
                    game.select_menu_button(index);
                }
                GameMode::SkillTree => {
                    game.learn_skill(index);
                }
                _ => {}
            }
            return false;
        }

        if in_panel {
            let logical = match key.code {
                KeyCode::Up | KeyCode::Char('w') => Some(Key::CursorUp),
                KeyCode::Down | KeyCode::Char('s') => Some(Key::CursorDown),
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('e') => Some(Key::Confirm),
                other => toggle_key(other),
            };
            if let Some(logical) = logical {
                tap(game, logical);
            }
            return false;
        }

        if key.code == KeyCode::Char('q') {
            return true;
        }

        if let Some(logical) = movement_key(key.code) {
            if self.held.insert(logical, Instant::now()).is_none() {
                game.queue_input(InputEvent::KeyDown(logical));
            }
            return false;
        }

        let logical = match key.code {
            KeyCode::Char(' ') | KeyCode::Char('j') => Some(Key::Attack),
            KeyCode::Char('k') | KeyCode::Char('f') => Some(Key::Special),
            KeyCode::Enter | KeyCode::Char('e') => Some(Key::Confirm),
            other => toggle_key(other),
        };
        if let Some(logical) = logical {
            if toggle_key(key.code).is_some() {
                self.release_all(game);
            }
            tap(game, logical);
        }
        false
    }

    /// Forward mouse buttons: left attacks, right casts the special
    pub fn handle_mouse(&mut self, mouse: MouseEvent, game: &mut Game) {
        match mouse.kind {
            MouseEventKind::Down(TermButton::Left) => game.queue_input(InputEvent::MouseClick(MouseButton::Left)),
            MouseEventKind::Down(TermButton::Right) => game.queue_input(InputEvent::MouseClick(MouseButton::Right)),
            _ => {}
        }
    }

    /// Let go of movement keys that stopped repeating
    pub fn release_stale_keys(&mut self, game: &mut Game, now: Instant) {
        let stale: Vec<Key> = self
            .held
            .iter()
            .filter(|(_, &pressed)| now.duration_since(pressed) > HOLD_TIMEOUT)
            .map(|(&key, _)| key)
            .collect();
        for key in stale {
            self.release(key, game);
        }
    }

    fn release(&mut self, key: Key, game: &mut Game) {
        if self.held.remove(&key).is_some() {
            game.queue_input(InputEvent::KeyUp(key));
        }
    }

    fn release_all(&mut self, game: &mut Game) {
        for key in MOVEMENT_KEYS {
            self.release(key, game);
        }
    }

    // === Rendering ===

    pub fn render(&self, frame: &mut Frame, game: &Game) {
        // Clear the entire screen first to prevent artifacts
        frame.render_widget(Clear, frame.area());

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(8)])
            .split(frame.area());
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(30), Constraint::Length(30)])
            .split(rows[0]);

        self.render_world(frame, game, columns[0]);
        self.render_sidebar(frame, game, columns[1]);
        self.render_messages(frame, game, rows[1]);

        match game.mode() {
            GameMode::Menu => self.render_menu(frame, game, " PAUSED ", Color::White),
            GameMode::GameOver => self.render_menu(frame, game, " YOU HAVE FALLEN ", Color::Red),
            GameMode::SkillTree => self.render_skill_tree(frame, game),
            GameMode::TopDownMap => self.render_overview(frame, game),
            GameMode::Exploration | GameMode::Combat => {}
        }
    }

    fn render_world(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let border = if game.mode() == GameMode::Combat { Color::Red } else { rgb(game.sky_color()) };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", game.map().name()))
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let view = Viewport {
            area: inner,
            center: game.player().position(),
            units_per_column: UNITS_PER_COLUMN,
            units_per_row: UNITS_PER_ROW,
        };
        draw_ground(frame.buffer_mut(), &view, game, false);

        let mut views: Vec<EntityView> = game.entity_views().collect();
        views.sort_by_key(|v| layer(v.category));
        for v in views.iter() {
            draw_entity(frame.buffer_mut(), &view, v);
        }

        let player = game.player();
        let style = Style::default().fg(rgb(Category::Player.color())).add_modifier(Modifier::BOLD);
        view.put(frame.buffer_mut(), player.position().x, player.position().z, Category::Player.glyph(), style);
    }

    fn render_sidebar(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Status ")
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let player = game.player();
        let hp_pct = player.combat.health_fraction();
        let hp_color = if hp_pct > 0.6 {
            Color::Green
        } else if hp_pct > 0.3 {
            Color::Yellow
        } else {
            Color::Red
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(hp_color))
            .ratio(hp_pct.clamp(0.0, 1.0) as f64)
            .label(format!("{:.0}/{:.0}", player.health(), player.combat.max_health));
        frame.render_widget(gauge, chunks[0]);

        let special = if player.special_timer > 0.0 {
            format!("{:.1}s", player.special_timer)
        } else {
            "ready".to_string()
        };

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("Level {} {}", player.level, level_title(player.level)),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("XP {}/{}", player.experience, player.experience_to_next_level)),
            Line::from(format!("Skill points: {}", player.skills.points())),
            Line::from(format!("Bolt: {} ({:.0}s)", special, SPECIAL_COOLDOWN)),
            Line::from(""),
            Line::from(Span::styled(
                game.mode().name(),
                Style::default().fg(if game.mode() == GameMode::Combat { Color::Red } else { Color::Cyan }),
            )),
        ];

        if let Some(boss) = game.entities().iter().filter(|e| e.is_active()).find_map(|e| e.as_boss()) {
            lines.push(Line::from(""));
            let color = if boss.is_enraged() { Color::LightRed } else { Color::Red };
            lines.push(Line::from(Span::styled(boss.name(), Style::default().fg(color).add_modifier(Modifier::BOLD))));
            lines.push(Line::from(format!(
                "{:.0}/{:.0}{}",
                boss.combat.health,
                boss.combat.max_health,
                if boss.is_enraged() { " ENRAGED" } else { "" }
            )));
        }

        lines.push(Line::from(""));
        for hint in ["WASD move  Space attack", "F bolt  E use", "Tab skills  M map", "Esc menu  Q quit"] {
            lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));
        }

        frame.render_widget(Paragraph::new(lines), chunks[1]);
    }

    fn render_messages(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Messages ")
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);

        let messages: Vec<&str> = game.messages().collect();
        let lines: Vec<Line> = messages
            .iter()
            .rev()
            .take(inner.height as usize)
            .rev()
            .map(|msg| Line::from(Span::styled(*msg, Style::default().fg(Color::Gray))))
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_menu(&self, frame: &mut Frame, game: &Game, title: &str, color: Color) {
        let area = centered_rect(30, 40, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(color));

        let mut lines = vec![Line::from("")];
        for (i, label) in game.menu_buttons().iter().enumerate() {
            let selected = i == game.menu_cursor();
            let style = if selected {
                Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            lines.push(Line::from(Span::styled(format!(" [{}] {} ", i + 1, label), style)));
            lines.push(Line::from(""));
        }

        let menu = Paragraph::new(lines).alignment(Alignment::Center).block(block);
        frame.render_widget(menu, area);
    }

    fn render_skill_tree(&self, frame: &mut Frame, game: &Game) {
        let area = centered_rect(60, 70, frame.area());
        frame.render_widget(Clear, area);

        let tree = &game.player().skills;
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Skills - {} point(s) ", tree.points()))
            .border_style(Style::default().fg(Color::Yellow));

        let mut lines = vec![Line::from("")];
        for (i, skill) in tree.skills().iter().enumerate() {
            let color = if skill.is_maxed() {
                Color::Yellow
            } else if tree.can_learn(&skill.name) {
                Color::Green
            } else {
                Color::DarkGray
            };
            let mut style = Style::default().fg(color);
            if i == game.skill_cursor() {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let requires = if skill.prerequisites.is_empty() {
                String::new()
            } else {
                format!("  needs {}", skill.prerequisites.join(", "))
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {} {:<13} {}/{} ", i + 1, skill.name, skill.level, skill.max_level),
                    style,
                ),
                Span::styled(
                    format!(" {} {:.1}{}", skill.category.name(), skill.value, requires),
                    Style::default().fg(Color::Gray),
                ),
            ]));
            lines.push(Line::from(Span::styled(
                format!("     {}", skill.description),
                Style::default().fg(Color::DarkGray),
            )));
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_overview(&self, frame: &mut Frame, game: &Game) {
        let area = fullscreen_overlay(frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Map - {} ", game.map().name()))
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        // Fit the whole map into the panel
        let extent = game.map().bounds(game.config().world_size) * 2.0;
        let view = Viewport {
            area: inner,
            center: Position::default(),
            units_per_column: extent / inner.width as f32,
            units_per_row: extent / inner.height as f32,
        };
        draw_ground(frame.buffer_mut(), &view, game, true);

        for v in game.entity_views().filter(|v| layer(v.category) >= 2) {
            draw_entity(frame.buffer_mut(), &view, &v);
        }
        let p = game.player().position();
        view.put(frame.buffer_mut(), p.x, p.z, '@', Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

fn movement_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char('w') | KeyCode::Up => Some(Key::Forward),
        KeyCode::Char('s') | KeyCode::Down => Some(Key::Back),
        KeyCode::Char('a') | KeyCode::Left => Some(Key::Left),
        KeyCode::Char('d') | KeyCode::Right => Some(Key::Right),
        _ => None,
    }
}

fn toggle_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Esc => Some(Key::Menu),
        KeyCode::Tab | KeyCode::Char('t') => Some(Key::SkillTree),
        KeyCode::Char('m') => Some(Key::Map),
        _ => None,
    }
}

/// Press and release in one go
fn tap(game: &mut Game, key: Key) {
    game.queue_input(InputEvent::KeyDown(key));
    game.queue_input(InputEvent::KeyUp(key));
}

/// Floor, water and trail under the entities
fn draw_ground(buf: &mut Buffer, view: &Viewport, game: &Game, coarse: bool) {
    let map = game.map();
    let bounds = map.bounds(game.config().world_size);
    let ground = if map == MapId::Overworld { (45, 70, 35) } else { game.sky_color() };

    for row in view.area.y..view.area.y + view.area.height {
        for col in view.area.x..view.area.x + view.area.width {
            let (x, z) = view.to_world(col, row);
            let outside = x.abs() > bounds || z.abs() > bounds;
            let cell = &mut buf[(col, row)];
            if outside {
                cell.set_char(' ').set_bg(Color::Black);
            } else if map.has_terrain() && is_underwater(x, z) {
                cell.set_char('~').set_fg(Color::LightBlue).set_bg(Color::Blue);
            } else {
                cell.set_char(' ').set_bg(shade(ground, 0.6));
            }
        }
    }

    let trail_style = Style::default().fg(Color::Rgb(170, 140, 90)).bg(Color::Rgb(95, 75, 45));
    for point in game.trail().points.iter() {
        view.put(buf, point.x, point.z, if coarse { '·' } else { '░' }, trail_style);
    }

    let floor_style = Style::default().fg(Color::DarkGray).bg(shade(ground, 1.6));
    let half = CELL_SIZE * 0.5;
    for &(cx, cz) in game.floor() {
        let mut z = cz - half;
        while z < cz + half {
            let mut x = cx - half;
            while x < cx + half {
                view.put(buf, x, z, '.', floor_style);
                x += view.units_per_column.max(0.25);
            }
            z += view.units_per_row.max(0.25);
        }
    }
}

fn draw_entity(buf: &mut Buffer, view: &Viewport, v: &EntityView) {
    let mut style = Style::default().fg(rgb(v.category.color()));
    let mut glyph = v.category.glyph();

    if let Some(fraction) = v.health_fraction {
        if fraction < 0.3 {
            style = style.fg(Color::LightRed);
        }
        if v.anim_toggle {
            style = style.add_modifier(Modifier::BOLD);
        }
    }
    if v.enraged {
        style = style.fg(Color::Rgb(255, 140, 0)).add_modifier(Modifier::BOLD);
        if v.anim_toggle {
            glyph = 'b';
        }
    }

    view.put(buf, v.position.x, v.position.z, glyph, style);
}

/// Create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Near-fullscreen overlay with a small margin
fn fullscreen_overlay(r: Rect) -> Rect {
    let margin = if r.width > 100 && r.height > 40 { 2 } else { 1 };
    Rect {
        x: r.x + margin,
        y: r.y + margin,
        width: r.width.saturating_sub(margin * 2),
        height: r.height.saturating_sub(margin * 2),
    }
}
