//! Game state machine
//!
//! [`Game`] owns the world: the player, the current map's entities, the
//! mode, the RNG and the input and audio queues. It is built once in
//! `main` and handed to the input, tick and render code by reference.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::collision::resolve_collisions;
use super::input::{translate, Action, InputEvent};
use crate::audio::{AudioCue, AudioRequest};
use crate::combat::AttackKind;
use crate::config::GameConfig;
use crate::entities::player::PLAYER_RADIUS;
use crate::entities::{Entity, EntityView, Player, Portal, Position, WorldEntity};
use crate::progression::Skill;
use crate::world::{height, is_underwater, load_map, MapId, Trail};

/// Messages kept for the HUD
const MAX_MESSAGES: usize = 6;

/// Buttons on the pause menu, in order
pub const MENU_BUTTONS: [&str; 4] = ["Resume", "Skill Tree", "Restart", "Quit"];

/// Buttons on the game-over screen, in order
pub const GAME_OVER_BUTTONS: [&str; 2] = ["Try Again", "Quit"];

/// What the game is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Walking around, nothing hostile nearby
    Exploration,
    /// At least one hostile has noticed the player
    Combat,
    /// Pause menu
    Menu,
    SkillTree,
    GameOver,
    /// Overview of the whole map
    TopDownMap,
}

impl GameMode {
    /// Modes that freeze the simulation
    pub fn is_paused(&self) -> bool {
        matches!(self, GameMode::Menu | GameMode::SkillTree | GameMode::TopDownMap)
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameMode::Exploration => "Exploring",
            GameMode::Combat => "Combat",
            GameMode::Menu => "Paused",
            GameMode::SkillTree => "Skill Tree",
            GameMode::GameOver => "Game Over",
            GameMode::TopDownMap => "Map",
        }
    }
}

/// The main game struct that holds all game data
pub struct Game {
    config: GameConfig,
    rng: StdRng,
    mode: GameMode,
    map: MapId,
    player: Player,
    /// Everything on the current map except the player
    entities: Vec<WorldEntity>,
    trail: Trail,
    floor: Vec<(f32, f32)>,
    sky: (u8, u8, u8),
    /// Raw events since the last update
    input: VecDeque<InputEvent>,
    audio: Vec<AudioRequest>,
    messages: VecDeque<String>,
    menu_cursor: usize,
    skill_cursor: usize,
    quit_requested: bool,
}

impl Game {
    /// Create a new game on a freshly generated overworld
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => {
                log::info!("Using fixed seed {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };

        let mut game = Self {
            config,
            rng,
            mode: GameMode::Exploration,
            map: MapId::Overworld,
            player: Player::new(MapId::Overworld.spawn_point()),
            entities: Vec::new(),
            trail: Trail::default(),
            floor: Vec::new(),
            sky: MapId::Overworld.sky_color(),
            input: VecDeque::new(),
            audio: Vec::new(),
            messages: VecDeque::new(),
            menu_cursor: 0,
            skill_cursor: 0,
            quit_requested: false,
        };
        game.change_map(MapId::Overworld);
        game.add_message("You wake at the edge of the Emberwild.");
        game
    }

    // === Accessors ===

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn map(&self) -> MapId {
        self.map
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn entities(&self) -> &[WorldEntity] {
        &self.entities
    }

    /// Render snapshot of every active entity
    pub fn entity_views(&self) -> impl Iterator<Item = EntityView> + '_ {
        self.entities.iter().filter(|e| e.is_active()).map(|e| e.view())
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// Dungeon floor cell centers
    pub fn floor(&self) -> &[(f32, f32)] {
        &self.floor
    }

    pub fn sky_color(&self) -> (u8, u8, u8) {
        self.sky
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn menu_cursor(&self) -> usize {
        self.menu_cursor
    }

    pub fn skill_cursor(&self) -> usize {
        self.skill_cursor
    }

    /// Buttons offered in the current mode
    pub fn menu_buttons(&self) -> &'static [&'static str] {
        match self.mode {
            GameMode::Menu => &MENU_BUTTONS,
            GameMode::GameOver => &GAME_OVER_BUTTONS,
            _ => &[],
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit_requested
    }

    // === Queues ===

    /// Queue a raw input event for the next update
    pub fn queue_input(&mut self, event: InputEvent) {
        self.input.push_back(event);
    }

    /// Take every audio request made since the last call
    pub fn drain_audio_requests(&mut self) -> Vec<AudioRequest> {
        std::mem::take(&mut self.audio)
    }

    fn cue(&mut self, cue: AudioCue) {
        self.audio.push(AudioRequest::Play(cue));
    }

    fn add_message(&mut self, text: impl Into<String>) {
        self.messages.push_back(text.into());
        while self.messages.len() > MAX_MESSAGES {
            self.messages.pop_front();
        }
    }

    /// Translate queued events into held intent plus one-shot actions
    fn collect_input(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        while let Some(event) = self.input.pop_front() {
            if let Some(action) = translate(event, &mut self.player.intent) {
                actions.push(action);
            }
        }
        actions
    }

    // === Frame update ===

    /// Advance the simulation by one fixed step of `dt` seconds
    pub fn update(&mut self, dt: f32) {
        let actions = self.collect_input();

        if self.player.is_dead() && self.mode != GameMode::GameOver {
            self.enter_game_over();
        }
        if self.mode == GameMode::GameOver {
            self.handle_menu_actions(&actions);
            return;
        }

        // Actions that close a paused screen do not also reach the world
        let was_paused = self.mode.is_paused();
        self.handle_mode_actions(&actions);
        if was_paused || self.mode.is_paused() {
            return;
        }

        self.move_player(dt);
        for action in actions.iter() {
            match action {
                Action::Attack => self.player_attack(AttackKind::Melee),
                Action::Special => self.player_attack(AttackKind::Ranged),
                _ => {}
            }
        }

        self.player.update(dt);

        let in_combat = self.update_entities(dt);
        if self.player.is_dead() {
            self.enter_game_over();
            return;
        }

        let next = if in_combat { GameMode::Combat } else { GameMode::Exploration };
        if next != self.mode {
            log::debug!("Mode {:?} -> {:?}", self.mode, next);
            self.mode = next;
        }

        let before = self.player.position();
        let rewards = resolve_collisions(&mut self.player, &mut self.entities, &mut self.rng);
        let pushed = self.player.position();
        if pushed.x != before.x || pushed.z != before.z {
            self.settle_player(before, pushed.x, pushed.z);
        }
        for (heal, experience) in rewards {
            self.player.heal(heal);
            self.cue(AudioCue::ItemPickup);
            self.add_message(format!("A healing draught! +{} XP", experience));
            self.grant_experience(experience);
        }

        if !in_combat && actions.contains(&Action::Confirm) {
            self.try_portal();
        }
    }

    /// Mode toggles, plus cursor work in the paused modes
    fn handle_mode_actions(&mut self, actions: &[Action]) {
        for &action in actions {
            match action {
                Action::ToggleMenu => self.toggle_mode(GameMode::Menu),
                Action::ToggleSkillTree => self.toggle_mode(GameMode::SkillTree),
                Action::ToggleMap => self.toggle_mode(GameMode::TopDownMap),
                _ => match self.mode {
                    GameMode::Menu => self.handle_menu_actions(&[action]),
                    GameMode::SkillTree => self.handle_skill_actions(action),
                    _ => {}
                },
            }
        }
    }

    /// Swap between `target` and exploration
    fn toggle_mode(&mut self, target: GameMode) {
        if self.mode == GameMode::GameOver {
            return;
        }
        if self.mode == target {
            self.mode = GameMode::Exploration;
            self.cue(AudioCue::MenuClose);
        } else {
            self.mode = target;
            self.menu_cursor = 0;
            self.cue(AudioCue::MenuOpen);
        }
        self.player.intent.clear();
        log::debug!("Mode now {:?}", self.mode);
    }

    fn handle_menu_actions(&mut self, actions: &[Action]) {
        let count = self.menu_buttons().len();
        for &action in actions {
            match action {
                Action::CursorUp if count > 0 => {
                    self.menu_cursor = (self.menu_cursor + count - 1) % count;
                }
                Action::CursorDown if count > 0 => {
                    self.menu_cursor = (self.menu_cursor + 1) % count;
                }
                Action::Confirm | Action::Attack => {
                    self.select_menu_button(self.menu_cursor);
                }
                _ => {}
            }
        }
    }

    /// Press menu button `index` of the current mode.
    ///
    /// Returns false, changing nothing, when there is no such button.
    pub fn select_menu_button(&mut self, index: usize) -> bool {
        let Some(&label) = self.menu_buttons().get(index) else {
            return false;
        };
        self.cue(AudioCue::MenuSelect);
        match label {
            "Resume" => self.mode = GameMode::Exploration,
            "Skill Tree" => self.mode = GameMode::SkillTree,
            "Restart" | "Try Again" => self.reset_all(),
            "Quit" => self.quit_requested = true,
            _ => return false,
        }
        true
    }

    fn handle_skill_actions(&mut self, action: Action) {
        let count = self.player.skills.skills().len();
        if count == 0 {
            return;
        }
        match action {
            Action::CursorUp => self.skill_cursor = (self.skill_cursor + count - 1) % count,
            Action::CursorDown => self.skill_cursor = (self.skill_cursor + 1) % count,
            Action::Confirm | Action::Attack => {
                self.learn_skill(self.skill_cursor);
            }
            _ => {}
        }
    }

    /// Spend a point on the skill at `index`. False if it cannot be learned.
    pub fn learn_skill(&mut self, index: usize) -> bool {
        let Some(name) = self.player.skills.skills().get(index).map(|s: &Skill| s.name.clone()) else {
            return false;
        };
        if !self.player.skills.use_skill_point(&name) {
            return false;
        }
        self.cue(AudioCue::SkillLearned);
        self.add_message(format!("Learned {}", name));
        true
    }

    /// Apply held movement intent, respecting water and map bounds
    fn move_player(&mut self, dt: f32) {
        let (dx, dz) = self.player.intent.direction();
        if dx == 0.0 && dz == 0.0 {
            return;
        }

        let step = self.player.move_speed() * dt;
        let from = self.player.position();
        self.settle_player(from, from.x + dx * step, from.z + dz * step);
    }

    /// Move the player from `from` toward `(x, z)`, clamped to the map and
    /// sliding along water edges
    fn settle_player(&mut self, from: Position, x: f32, z: f32) {
        let limit = self.map.bounds(self.config.world_size) - PLAYER_RADIUS;
        let nx = x.clamp(-limit, limit);
        let nz = z.clamp(-limit, limit);

        let (x, z) = if !self.map.has_terrain() || !is_underwater(nx, nz) {
            (nx, nz)
        } else if !is_underwater(nx, from.z) {
            (nx, from.z)
        } else if !is_underwater(from.x, nz) {
            (from.x, nz)
        } else {
            (from.x, from.z)
        };

        self.place_player(Position::new(x, 0.0, z));
    }

    /// Put the player at `pos`, snapping Y to the ground
    fn place_player(&mut self, pos: Position) {
        let y = if self.map.has_terrain() { height(pos.x, pos.z) } else { 0.0 };
        self.player.body.position = Position::new(pos.x, y, pos.z);
    }

    /// Strike the nearest hostile if the attack gate allows
    fn player_attack(&mut self, kind: AttackKind) {
        let origin = self.player.position();
        let Some((index, distance)) = self
            .entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_active() && e.is_hostile())
            .map(|(i, e)| (i, e.position().distance_xz(&origin)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
        else {
            return;
        };

        let ready = match kind {
            AttackKind::Ranged => self.player.can_special(distance),
            _ => self.player.combat.can_attack(distance),
        };
        if !ready {
            return;
        }

        match kind {
            AttackKind::Ranged => {
                self.player.arm_special();
                self.cue(AudioCue::SpecialCast);
            }
            _ => self.player.combat.arm(),
        }

        let amount = self.player.attack_power(kind);
        let target = &mut self.entities[index];
        let was_enraged = target.as_boss().map(|b| b.is_enraged()).unwrap_or(false);
        target.take_damage(amount, kind);
        let enraged = target.as_boss().map(|b| b.is_enraged()).unwrap_or(false);

        self.cue(AudioCue::AttackHit);
        if enraged && !was_enraged {
            self.cue(AudioCue::BossEnraged);
            self.add_message("The Warden's embers flare white-hot!");
        }
        log::debug!("Player {} for {:.1} at {:.1}m", kind.name(), amount, distance);
    }

    /// Tick timers, run AI and hand out kill rewards.
    /// Returns whether any hostile is engaged with the player.
    fn update_entities(&mut self, dt: f32) -> bool {
        let target = self.player.position();
        let mut in_combat = false;
        let mut hurt = false;
        let mut kills: Vec<(u32, bool, Position)> = Vec::new();

        for entity in self.entities.iter_mut() {
            if entity.is_active() {
                entity.update(dt);
                let outcome = entity.think(target, dt);
                in_combat |= outcome.in_combat;
                if let Some((amount, kind)) = outcome.attack {
                    if self.player.take_damage(amount, kind) > 0.0 {
                        hurt = true;
                    }
                }
                continue;
            }

            let experience = entity.experience_value();
            let is_boss = entity.as_boss().is_some();
            let position = entity.position();
            if let (Some(experience), Some(combat)) = (experience, entity.combat_mut()) {
                if combat.claim_experience() {
                    kills.push((experience, is_boss, position));
                }
            }
        }

        if hurt {
            self.cue(AudioCue::PlayerHurt);
        }
        for (experience, is_boss, position) in kills {
            if is_boss {
                self.cue(AudioCue::BossDefeated);
                self.add_message("The Cinder Warden crumbles. A gate of light opens.");
                self.entities.push(Portal::new(position, MapId::Paradise).into());
            } else {
                self.cue(AudioCue::EnemyDefeated);
            }
            self.add_message(format!("Victory! +{} XP", experience));
            self.grant_experience(experience);
        }

        in_combat
    }

    fn grant_experience(&mut self, amount: u32) {
        let levels = self.player.add_experience(amount);
        if levels > 0 {
            self.cue(AudioCue::LevelUp);
            self.add_message(format!(
                "You are now level {}, {}",
                self.player.level,
                crate::progression::level_title(self.player.level)
            ));
        }
    }

    fn enter_game_over(&mut self) {
        log::info!("Player died on {}", self.map.name());
        self.mode = GameMode::GameOver;
        self.menu_cursor = 0;
        self.player.intent.clear();
        self.cue(AudioCue::GameOver);
        self.add_message("You have fallen.");
    }

    /// Use the first portal in reach
    fn try_portal(&mut self) {
        let player = self.player.position();
        let Some((destination, target)) = self
            .entities
            .iter()
            .filter(|e| e.is_active())
            .filter_map(|e| e.as_portal())
            .find(|p| p.in_reach(&player))
            .map(|p| (p.destination, p.destination_position))
        else {
            return;
        };

        self.cue(AudioCue::PortalUsed);
        if destination == self.map {
            log::debug!("Waystone to ({:.1}, {:.1})", target.x, target.z);
            self.place_player(target);
        } else {
            self.change_map(destination);
            self.add_message(format!("You enter {}.", destination.name()));
        }
    }

    /// Build map `id`, then swap it in and move the player to its spawn
    pub fn change_map(&mut self, id: MapId) {
        let contents = load_map(id, &self.config, &mut self.rng);

        self.audio.push(AudioRequest::StopLoop(self.map.ambient()));
        self.audio.push(AudioRequest::PlayLoop(id.ambient()));

        self.map = contents.id;
        self.entities = contents.entities;
        self.trail = contents.trail;
        self.floor = contents.floor;
        self.sky = contents.sky;
        self.player.intent.clear();
        self.place_player(id.spawn_point());
        if !self.mode.is_paused() && self.mode != GameMode::GameOver {
            self.mode = GameMode::Exploration;
        }
    }

    /// Start over: fresh player, fresh overworld
    pub fn reset_all(&mut self) {
        log::info!("Resetting world");
        self.entities.clear();
        self.player = Player::new(MapId::Overworld.spawn_point());
        self.mode = GameMode::Exploration;
        self.menu_cursor = 0;
        self.skill_cursor = 0;
        self.input.clear();
        self.messages.clear();
        self.change_map(MapId::Overworld);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Enemy, EnemyKind, Pickup, Scenery, Category};
    use crate::game::input::Key;

    const DT: f32 = 1.0 / 60.0;

    fn game() -> Game {
        let config = GameConfig { seed: Some(42), ..GameConfig::default() };
        let mut game = Game::new(config);
        game.entities.clear();
        game.drain_audio_requests();
        game
    }

    fn press(game: &mut Game, key: Key) {
        game.queue_input(InputEvent::KeyDown(key));
        game.queue_input(InputEvent::KeyUp(key));
    }

    fn near_player(game: &Game, dx: f32) -> Position {
        let p = game.player.position();
        Position::new(p.x + dx, 0.0, p.z)
    }

    #[test]
    fn test_kill_grants_experience_once() {
        let mut g = game();
        let mut enemy = Enemy::new(EnemyKind::Skeleton, 2, near_player(&g, 1.0));
        enemy.combat.health = 1.0;
        g.entities.push(enemy.into());

        press(&mut g, Key::Attack);
        g.update(DT);
        assert_eq!(g.player.experience, 40);
        assert!(!g.entities[0].is_active());

        g.update(DT);
        g.update(DT);
        assert_eq!(g.player.experience, 40);
    }

    #[test]
    fn test_level_up_from_kill() {
        let mut g = game();
        g.player.experience = 90;
        let mut enemy = Enemy::new(EnemyKind::Skeleton, 1, near_player(&g, 1.0));
        enemy.combat.health = 1.0;
        g.entities.push(enemy.into());

        press(&mut g, Key::Attack);
        g.update(DT);

        // 90 + 20 crosses the 100 threshold
        assert_eq!(g.player.level, 2);
        assert_eq!(g.player.experience, 10);
        assert!(g.drain_audio_requests().contains(&AudioRequest::Play(AudioCue::LevelUp)));
    }

    #[test]
    fn test_portal_moves_player_to_dungeon_spawn() {
        let mut g = game();
        let here = near_player(&g, 0.5);
        g.entities.push(Portal::new(here, MapId::DungeonOne).into());
        g.entities.push(Scenery::solid(Category::House, near_player(&g, -8.0), 2.0).into());

        press(&mut g, Key::Confirm);
        g.update(DT);

        assert_eq!(g.map(), MapId::DungeonOne);

        // The overworld population is gone, replaced by the dungeon's own
        assert!(g.entities.iter().all(|e| e.category() != Category::House));
        let portals: Vec<&Portal> = g.entities.iter().filter_map(|e| e.as_portal()).collect();
        assert_eq!(portals.len(), 1);
        assert_eq!(portals[0].destination, MapId::DungeonTwo);
        assert!(g.entities.iter().any(|e| e.category() == Category::Wall));

        let spawn = MapId::DungeonOne.spawn_point();
        assert_eq!((g.player.position().x, g.player.position().z), (spawn.x, spawn.z));
        let requests = g.drain_audio_requests();
        assert!(requests.contains(&AudioRequest::PlayLoop(AudioCue::DungeonAmbience)));
        assert!(requests.contains(&AudioRequest::StopLoop(AudioCue::ForestAmbience)));
    }

    #[test]
    fn test_portal_needs_confirm() {
        let mut g = game();
        let here = near_player(&g, 0.5);
        g.entities.push(Portal::new(here, MapId::DungeonOne).into());
        g.update(DT);
        assert_eq!(g.map(), MapId::Overworld);
    }

    #[test]
    fn test_waystone_teleports_within_map() {
        let mut g = game();
        let here = near_player(&g, 0.5);
        let target = Position::new(10.0, 0.0, -5.0);
        g.entities.push(Portal::waystone(here, MapId::Overworld, target).into());

        press(&mut g, Key::Confirm);
        g.update(DT);

        assert_eq!(g.map(), MapId::Overworld);
        assert_eq!(g.player.position().x, 10.0);
        assert_eq!(g.player.position().z, -5.0);
        assert_eq!(g.player.position().y, height(10.0, -5.0));
        // The map was not rebuilt
        assert_eq!(g.entities.len(), 1);
    }

    #[test]
    fn test_combat_mode_follows_detection() {
        let mut g = game();
        g.entities.push(Enemy::new(EnemyKind::Wolf, 1, near_player(&g, 5.0)).into());
        g.update(DT);
        assert_eq!(g.mode(), GameMode::Combat);

        g.entities.clear();
        g.update(DT);
        assert_eq!(g.mode(), GameMode::Exploration);
    }

    #[test]
    fn test_no_portal_during_combat() {
        let mut g = game();
        g.entities.push(Enemy::new(EnemyKind::Wolf, 1, near_player(&g, 5.0)).into());
        g.entities.push(Portal::new(near_player(&g, 0.5), MapId::DungeonOne).into());
        press(&mut g, Key::Confirm);
        g.update(DT);
        assert_eq!(g.map(), MapId::Overworld);
    }

    #[test]
    fn test_death_enters_game_over_and_freezes() {
        let mut g = game();
        g.entities.push(Enemy::new(EnemyKind::Wraith, 1, near_player(&g, 5.0)).into());
        g.player.take_damage(10_000.0, AttackKind::Melee);
        g.update(DT);
        assert_eq!(g.mode(), GameMode::GameOver);

        let before = g.entities[0].position();
        g.queue_input(InputEvent::KeyDown(Key::Forward));
        g.update(DT);
        assert_eq!(g.entities[0].position(), before);
        assert_eq!(g.mode(), GameMode::GameOver);
    }

    #[test]
    fn test_game_over_restart_resets_world() {
        let mut g = game();
        g.player.take_damage(10_000.0, AttackKind::Melee);
        g.update(DT);

        assert!(g.select_menu_button(0));
        assert_eq!(g.mode(), GameMode::Exploration);
        assert_eq!(g.map(), MapId::Overworld);
        assert_eq!(g.player.health(), g.player.combat.max_health);
        assert_eq!(g.player.level, 1);
        assert!(!g.entities.is_empty());
    }

    #[test]
    fn test_menu_pauses_simulation() {
        let mut g = game();
        g.entities.push(Enemy::new(EnemyKind::Wolf, 1, near_player(&g, 5.0)).into());
        press(&mut g, Key::Menu);
        g.update(DT);
        assert_eq!(g.mode(), GameMode::Menu);

        let before = g.entities[0].position();
        g.update(DT);
        assert_eq!(g.entities[0].position(), before);

        press(&mut g, Key::Menu);
        g.update(DT);
        assert_ne!(g.mode(), GameMode::Menu);
    }

    #[test]
    fn test_menu_button_out_of_range_is_noop() {
        let mut g = game();
        assert!(!g.select_menu_button(0));
        press(&mut g, Key::Menu);
        g.update(DT);
        assert!(!g.select_menu_button(MENU_BUTTONS.len()));
        assert_eq!(g.mode(), GameMode::Menu);
        assert!(g.select_menu_button(0));
        assert_eq!(g.mode(), GameMode::Exploration);
    }

    #[test]
    fn test_skill_tree_learning() {
        let mut g = game();
        g.player.skills.add_points(1);
        press(&mut g, Key::SkillTree);
        g.update(DT);
        assert_eq!(g.mode(), GameMode::SkillTree);

        // First entry is a root skill
        press(&mut g, Key::Confirm);
        g.update(DT);
        assert_eq!(g.player.skills.points(), 0);
        assert_eq!(g.player.skills.skills()[0].level, 1);

        assert!(!g.learn_skill(99));
    }

    #[test]
    fn test_pickup_heals_and_rewards() {
        let mut g = game();
        g.player.combat.health = 50.0;
        g.entities.push(Pickup::new(near_player(&g, 0.3)).into());
        g.update(DT);
        assert_eq!(g.player.health(), 80.0);
        assert_eq!(g.player.experience, 50);
    }

    #[test]
    fn test_walls_push_player_back() {
        let mut g = game();
        g.entities.push(Scenery::solid(Category::Wall, near_player(&g, 0.6), 0.8).into());
        g.update(DT);
        let wall = g.entities[0].position();
        assert!(g.player.position().distance_xz(&wall) >= PLAYER_RADIUS + 0.8);
    }

    #[test]
    fn test_push_never_shoves_player_into_water() {
        use crate::world::terrain::LAKE_CENTERS;

        let mut g = game();
        let (lx, lz) = LAKE_CENTERS[0];
        // First dry spot east of the lake center
        let mut x = lx;
        while is_underwater(x, lz) {
            x += 0.05;
        }
        assert!(is_underwater(x - 0.5, lz));

        g.player.body.position = Position::new(x, height(x, lz), lz);
        g.entities.push(Scenery::solid(Category::Rock, Position::new(x + 0.6, 0.0, lz), 0.6).into());
        g.update(DT);

        let p = g.player.position();
        assert!(!is_underwater(p.x, p.z));
        assert_eq!(p.y, height(p.x, p.z));
    }

    #[test]
    fn test_push_snaps_to_ground() {
        let mut g = game();
        g.entities.push(Scenery::solid(Category::Rock, near_player(&g, 0.4), 0.6).into());
        g.update(DT);

        let p = g.player.position();
        assert_ne!(p.x, 0.0);
        assert_eq!(p.y, height(p.x, p.z));
    }

    #[test]
    fn test_boss_death_opens_paradise() {
        let mut g = game();
        let mut boss = crate::entities::Boss::new(near_player(&g, 1.5), g.config.boss);
        boss.combat.health = 1.0;
        g.entities.push(boss.into());

        press(&mut g, Key::Attack);
        g.update(DT);

        assert!(g
            .entities
            .iter()
            .filter_map(|e| e.as_portal())
            .any(|p| p.destination == MapId::Paradise));
        // 500 XP: 100 to level 2, 200 to level 3, 200 left over
        assert_eq!(g.player.level, 3);
        assert_eq!(g.player.experience, 200);
    }

    #[test]
    fn test_movement_stays_in_bounds() {
        let mut g = game();
        g.queue_input(InputEvent::KeyDown(Key::Right));
        for _ in 0..2_000 {
            g.update(0.1);
        }
        let limit = g.config.world_size - PLAYER_RADIUS;
        assert!(g.player.position().x <= limit + 1e-4);
    }
}
