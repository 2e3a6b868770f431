//! Session state machine
//!
//! `Game` owns the simulation context, both scripted managers, the timer
//! service and the persisted configuration. Boards and play modes change
//! through `change_board`/`change_mode`: re-entering the current state does
//! nothing, entering a new one runs its initializer exactly once.

use std::collections::HashMap;

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::board::{Board, Canvas, Mode, PaintRoutine, SetupMode};
use super::input::{Action, Key};
use super::layout::Layout;
use super::timers::{TimerId, Timers};
use crate::consts::*;
use crate::settings::{Config, Difficulty, Language};
use crate::sim::assets::{Assets, Sprite};
use crate::sim::collision::PowerUp;
use crate::sim::director::Director;
use crate::sim::entity::{FireballDirection, FlyingObject, MissileKind, Star};
use crate::sim::scenario::STAR_MATRIX;
use crate::sim::spawner::Spawner;
use crate::sim::tick;
use crate::sim::world::{LifeEvent, World};

/// Welcome board ticks before the menu shows up on its own
const WELCOME_TICKS: u32 = 1;
/// Get-ready countdown start
const GET_READY: u32 = 3;
/// Enemies blown up by one TNT charge
const TNT_BLAST: usize = 3;

pub struct Game {
    config: Config,
    assets: Box<dyn Assets>,
    rng: Pcg32,
    timers: Timers,
    layout: Layout,
    actions: HashMap<Key, Action>,

    board: Board,
    mode: Mode,
    setup_mode: SetupMode,

    world: World,
    director: Director,
    spawner: Spawner,
    stars: Vec<Star>,

    menu_pos: usize,
    options_pos: usize,
    player_index: usize,
    nick: String,
    /// Pending bindings while the setup board captures keys
    temp_setup: [Key; 7],
    temp_pos: usize,

    welcome_counter: u32,
    get_ready: u32,
    game_counter: u32,
    setup_counter: u32,
    newscore_counter: u32,
    smoke_counter: u32,
    frames: u64,

    bomb_lock: bool,
    missile_lock: bool,
    quit_requested: bool,
}

impl Game {
    pub fn new(config: Config, assets: Box<dyn Assets>, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = Star::from_matrix(&STAR_MATRIX, &mut rng, assets.as_ref());
        let actions = config.actions();
        let options_pos = config.lastmode.index();
        let world = World::new(config.lastmode);
        Self {
            config,
            assets,
            rng,
            timers: Timers::new(),
            layout: Layout::default(),
            actions,
            board: Board::None,
            mode: Mode::None,
            setup_mode: SetupMode::Display,
            world,
            director: Director::new(),
            spawner: Spawner::new(),
            stars,
            menu_pos: 0,
            options_pos,
            player_index: 0,
            nick: String::new(),
            temp_setup: [Key::None; 7],
            temp_pos: 0,
            welcome_counter: WELCOME_TICKS,
            get_ready: GET_READY,
            game_counter: 0,
            setup_counter: 0,
            newscore_counter: 0,
            smoke_counter: 0,
            frames: 0,
            bomb_lock: false,
            missile_lock: false,
            quit_requested: false,
        }
    }

    /// Show the welcome splash
    pub fn start(&mut self) {
        self.change_board(Board::Welcome);
    }

    // === Accessors ===

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn setup_mode(&self) -> SetupMode {
        self.setup_mode
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn director(&self) -> &Director {
        &self.director
    }

    pub fn director_mut(&mut self) -> &mut Director {
        &mut self.director
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    pub fn menu_pos(&self) -> usize {
        self.menu_pos
    }

    pub fn options_pos(&self) -> usize {
        self.options_pos
    }

    pub fn player_index(&self) -> usize {
        self.player_index
    }

    pub fn nick(&self) -> &str {
        &self.nick
    }

    pub fn temp_setup(&self) -> &[Key; 7] {
        &self.temp_setup
    }

    pub fn temp_pos(&self) -> usize {
        self.temp_pos
    }

    pub fn get_ready(&self) -> u32 {
        self.get_ready
    }

    pub fn game_counter(&self) -> u32 {
        self.game_counter
    }

    pub fn setup_counter(&self) -> u32 {
        self.setup_counter
    }

    pub fn newscore_counter(&self) -> u32 {
        self.newscore_counter
    }

    pub fn smoke_counter(&self) -> u32 {
        self.smoke_counter
    }

    /// Paint timer ticks so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Set once the Quit board has saved the configuration
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn paint_routine(&self) -> PaintRoutine {
        PaintRoutine::select(self.board, self.mode, self.setup_mode)
    }

    // === State changes ===

    pub fn change_board(&mut self, board: Board) {
        if board == self.board {
            return;
        }
        log::info!("Board {:?} -> {:?}", self.board, board);
        self.board = board;
        match board {
            Board::None => {}
            Board::Welcome => self.init_welcome(),
            Board::Menu => self.init_menu(),
            Board::Game => self.change_mode(Mode::Init),
            Board::Options => self.options_pos = self.config.lastmode.index(),
            Board::HiScores => self.timers.stop(TimerId::NewScore),
            Board::Setup => self.init_display(),
            Board::Help | Board::About | Board::Player => {}
            Board::Quit => self.init_quit(),
            Board::NewScore => self.timers.start(TimerId::NewScore, TIMEOUT_NEWSCORE),
        }
    }

    fn change_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        log::info!("Mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        match mode {
            Mode::None => {}
            Mode::Init => self.init_session(),
            Mode::Prepare => self.init_prepare(),
            Mode::Play => self.init_play(),
            Mode::Paused => self.init_paused(),
            Mode::Killed => self.init_killed(),
            Mode::Gameover => self.timers.stop_all(&TimerId::GAMEPLAY),
            Mode::Congrats => self.timers.stop_all(&TimerId::GAMEPLAY),
        }
    }

    fn change_setup(&mut self, setup: SetupMode) {
        if setup == self.setup_mode {
            return;
        }
        self.setup_mode = setup;
        match setup {
            SetupMode::Display => self.init_display(),
            SetupMode::Enter => self.init_enter(),
        }
    }

    // === Board initializers ===

    fn init_welcome(&mut self) {
        self.welcome_counter = WELCOME_TICKS;
        self.timers.start(TimerId::Welcome, TIMEOUT_WELCOME);
        self.timers.start(TimerId::Paint, TIMEOUT_PAINT);
    }

    fn leave_welcome(&mut self) {
        self.timers.stop(TimerId::Welcome);
        self.timers.start(TimerId::StarsUpdate, TIMEOUT_PAINT);
        self.change_board(Board::Menu);
    }

    fn init_menu(&mut self) {
        self.world.player = None;
        self.timers.stop_all(&TimerId::GAMEPLAY);
    }

    fn init_quit(&mut self) {
        self.save_config();
        self.quit_requested = true;
    }

    fn init_display(&mut self) {
        self.setup_mode = SetupMode::Display;
        self.timers.stop(TimerId::SetupEnter);
    }

    fn init_enter(&mut self) {
        for (slot, action) in self.temp_setup.iter_mut().zip(Action::SETUP_ORDER) {
            *slot = self.config.get_key(action).unwrap_or(Key::None);
        }
        self.temp_pos = 0;
        self.setup_counter = 0;
        self.timers.start(TimerId::SetupEnter, TIMEOUT_SETUP_ENTER);
    }

    fn save_config(&self) {
        if let Err(e) = self.config.save() {
            log::warn!("Failed to save settings: {}", e);
        }
    }

    // === Mode initializers ===

    fn init_session(&mut self) {
        self.world = World::new(self.config.lastmode);
        self.world.start_session();
        self.director = Director::new();
        self.spawner = Spawner::new();
        self.bomb_lock = false;
        self.missile_lock = false;
        log::info!(
            "New session: player {}, {}",
            self.player_index,
            self.config.lastmode.as_str()
        );
        self.change_mode(Mode::Prepare);
        self.timers.start(TimerId::Smoke, TIMEOUT_SMOKE);
    }

    fn init_prepare(&mut self) {
        // Nothing moves during the countdown
        self.timers.stop_all(&TimerId::GAMEPLAY);
        if self.world.level < MAX_LEVEL {
            self.world.level += 1;
        }
        let level = self.world.level;
        let difficulty = self.world.difficulty;
        self.director.set_level(level, difficulty);
        self.spawner.set_level(level, difficulty);
        self.world.prepare_level(self.player_index, self.assets.as_ref());
        self.get_ready = GET_READY;
        self.timers.start(TimerId::GetReady, TIMEOUT_GET_READY);
        log::info!("Level {} ready", level + 1);
    }

    /// Scripted cadence, shortened per difficulty step and per level
    fn cadence(&self, base: u32) -> u32 {
        let steps = self.world.difficulty.cadence_step() + self.world.level.max(0) as u32;
        base.saturating_sub(100 * steps).max(MIN_CADENCE)
    }

    fn init_play(&mut self) {
        self.game_counter = 0;
        let events = self.cadence(TIMEOUT_GAME_EVENTS);
        let enemies = self.cadence(TIMEOUT_ENEMIES_EVENTS);
        self.timers.start(TimerId::GameUpdate, TIMEOUT_GAME_UPDATE);
        self.timers.start(TimerId::GameCounter, TIMEOUT_GAME_COUNTER);
        self.timers.start(TimerId::GameEvents, events);
        self.timers.start(TimerId::EnemiesEvents, enemies);
        self.timers.start(TimerId::Smoke, TIMEOUT_SMOKE);
    }

    fn init_paused(&mut self) {
        self.timers.stop_all(&[
            TimerId::GameUpdate,
            TimerId::GameCounter,
            TimerId::GameEvents,
            TimerId::EnemiesEvents,
            TimerId::Smoke,
        ]);
    }

    fn init_killed(&mut self) {
        self.timers.stop_all(&TimerId::GAMEPLAY);
        self.director.clear();
        self.world.clear_transient();
        self.world.clear_power_ups();
    }

    // === Input ===

    /// Key press. Only movement reacts to presses, everything else to releases.
    pub fn key_pressed(&mut self, key: Key) {
        if self.board != Board::Game || self.mode != Mode::Play {
            return;
        }
        let Some(action) = self.actions.get(&key).copied() else {
            return;
        };
        let Some(player) = self.world.player.as_mut() else {
            return;
        };
        match action {
            Action::Left => player.go_left(),
            Action::Right => player.go_right(),
            Action::Up => player.go_up(),
            Action::Down => player.go_down(),
            Action::Fire | Action::Bomb | Action::Tnt => {}
        }
    }

    pub fn key_released(&mut self, key: Key) {
        match self.board {
            Board::None => {}
            Board::Welcome => self.leave_welcome(),
            Board::Menu => self.key_menu(key),
            Board::Player => self.key_player(key),
            Board::Game => self.key_game(key),
            Board::Options => self.key_options(key),
            Board::HiScores | Board::Help | Board::About => {
                if matches!(key, Key::Q | Key::Escape) {
                    self.change_board(Board::Menu);
                }
            }
            Board::Setup => self.key_setup(key),
            Board::Quit => self.quit_requested = true,
            Board::NewScore => self.key_newscore(key),
        }
    }

    fn key_menu(&mut self, key: Key) {
        match key {
            Key::Q => self.change_board(Board::Quit),
            Key::Up => self.menu_pos = self.menu_pos.saturating_sub(1),
            Key::Down => self.menu_pos = (self.menu_pos + 1).min(Board::MENU.len() - 1),
            Key::Enter => self.change_board(Board::MENU[self.menu_pos]),
            _ => {}
        }
    }

    fn key_player(&mut self, key: Key) {
        match key {
            Key::Q | Key::Escape => self.change_board(Board::Menu),
            Key::Enter => self.change_board(Board::Game),
            Key::Left => self.player_index = self.player_index.saturating_sub(1),
            Key::Right => self.player_index = (self.player_index + 1).min(MAX_PLAYER_INDEX),
            _ => {}
        }
    }

    fn key_options(&mut self, key: Key) {
        match key {
            Key::Q => self.change_board(Board::Menu),
            Key::Up => self.options_pos = self.options_pos.saturating_sub(1),
            Key::Down => {
                self.options_pos = (self.options_pos + 1).min(Difficulty::ALL.len() - 1)
            }
            Key::Enter => self.select_option(self.options_pos),
            _ => {}
        }
    }

    fn select_option(&mut self, pos: usize) {
        if let Some(difficulty) = Difficulty::from_index(pos) {
            self.config.lastmode = difficulty;
        }
        self.change_board(Board::Menu);
    }

    fn key_setup(&mut self, key: Key) {
        match self.setup_mode {
            SetupMode::Display => match key {
                Key::Q | Key::Escape => self.change_board(Board::Menu),
                Key::F1 => self.change_setup(SetupMode::Enter),
                _ => {}
            },
            SetupMode::Enter => match key {
                Key::Enter => self.commit_setup(),
                Key::Escape => self.change_setup(SetupMode::Display),
                key if key.is_bindable() && !self.temp_setup.contains(&key) => {
                    self.temp_setup[self.temp_pos] = key;
                    self.temp_pos = (self.temp_pos + 1).min(self.temp_setup.len() - 1);
                }
                _ => {}
            },
        }
    }

    fn commit_setup(&mut self) {
        for (action, key) in Action::SETUP_ORDER.iter().zip(self.temp_setup) {
            self.config.set_key(*action, key);
        }
        self.save_config();
        self.actions = self.config.actions();
        self.change_setup(SetupMode::Display);
    }

    fn key_newscore(&mut self, key: Key) {
        match key {
            Key::Escape => self.change_board(Board::HiScores),
            Key::Backspace => {
                self.nick.pop();
            }
            Key::Enter => {
                if !self.nick.is_empty() {
                    let points = self.world.points;
                    self.config.add_hiscore(&self.nick, points);
                    log::info!("New hiscore {} by {}", points, self.nick);
                }
                self.change_board(Board::HiScores);
            }
            key => {
                if let Some(c) = key.to_char() {
                    if self.nick.chars().count() >= MAX_NICK_LEN {
                        self.nick.pop();
                    }
                    self.nick.push(c);
                }
            }
        }
    }

    fn key_game(&mut self, key: Key) {
        match self.mode {
            Mode::None => {}
            Mode::Init | Mode::Prepare => {
                if key == Key::Q {
                    self.change_board(Board::Menu);
                }
            }
            Mode::Play => self.key_play(key),
            Mode::Paused => match key {
                Key::Q => self.change_board(Board::Menu),
                Key::Enter => {
                    self.timers.start(TimerId::MovableUpdate, TIMEOUT_PAINT);
                    self.change_mode(Mode::Play);
                }
                _ => {}
            },
            Mode::Killed => match key {
                Key::Q => self.change_board(Board::Menu),
                Key::Enter => {
                    self.world.process_killed();
                    self.director.clear();
                    self.timers.stop_all(&TimerId::GAMEPLAY);
                    self.timers.start(TimerId::MovableUpdate, TIMEOUT_PAINT);
                    self.change_mode(Mode::Play);
                }
                _ => {}
            },
            Mode::Gameover | Mode::Congrats => {
                if matches!(key, Key::Q | Key::Escape) {
                    self.finish_session();
                }
            }
        }
    }

    fn finish_session(&mut self) {
        let points = self.world.points;
        if self.config.is_hiscore(points) {
            self.change_board(Board::NewScore);
        } else {
            self.change_board(Board::HiScores);
        }
    }

    fn key_play(&mut self, key: Key) {
        match key {
            Key::Q => {
                self.timers.stop_all(&TimerId::GAMEPLAY);
                self.change_board(Board::Menu);
            }
            Key::Escape => {
                self.timers.stop(TimerId::MovableUpdate);
                self.change_mode(Mode::Paused);
            }
            key => match self.actions.get(&key).copied() {
                Some(Action::Fire) => self.fire(),
                Some(Action::Bomb) => self.drop_bomb(),
                Some(Action::Tnt) => self.explode_tnt(),
                _ => {}
            },
        }
    }

    fn fire(&mut self) {
        if self.missile_lock {
            return;
        }
        let Some(muzzle) = self.world.player.as_ref().map(|p| p.muzzle()) else {
            return;
        };
        self.missile_lock = true;
        self.timers.start(TimerId::MissileLock, TIMEOUT_MISSILE_LOCK);
        let assets = self.assets.as_ref();
        if self.world.lightball_timer > 0 {
            for direction in FireballDirection::ALL {
                self.world
                    .fire_missiles
                    .push(FlyingObject::fireball(muzzle.x, muzzle.y, direction, assets));
            }
        } else {
            self.world
                .missiles
                .push(FlyingObject::missile(muzzle.x, muzzle.y, MissileKind::From, assets));
        }
    }

    fn drop_bomb(&mut self) {
        if self.bomb_lock {
            return;
        }
        let Some(bay) = self.world.player.as_ref().map(|p| p.bomb_bay()) else {
            return;
        };
        self.bomb_lock = true;
        self.timers.start(TimerId::BombLock, TIMEOUT_BOMB_LOCK);
        self.world
            .bombs
            .push(FlyingObject::bomb(bay.x, bay.y, self.assets.as_ref()));
    }

    fn explode_tnt(&mut self) {
        if self.world.tnt == 0 || self.director.enemies.is_empty() {
            return;
        }
        let count = self.director.enemies.len().min(TNT_BLAST);
        for enemy in self.director.enemies.drain(..count) {
            self.world.explode(enemy.rect.center(), self.assets.as_ref());
        }
        self.world.tnt -= 1;
        log::debug!("TNT: {} enemies blown up, {} charges left", count, self.world.tnt);
    }

    /// Mouse press at a board-relative point
    pub fn mouse_pressed(&mut self, p: IVec2) {
        match self.board {
            Board::None | Board::Quit => {}
            Board::Welcome => self.leave_welcome(),
            Board::Menu => {
                if let Some(pos) = self.layout.menu_hit(p) {
                    self.change_board(Board::MENU[pos.min(Board::MENU.len() - 1)]);
                } else {
                    self.switch_language(p);
                }
            }
            Board::Player => self.mouse_player(p),
            Board::Game => {
                if matches!(self.mode, Mode::Gameover | Mode::Congrats) {
                    self.switch_language(p);
                }
            }
            Board::Options => {
                if let Some(pos) = self.layout.options_hit(p) {
                    self.select_option(pos);
                } else {
                    self.switch_language(p);
                }
            }
            Board::HiScores | Board::Help | Board::About => {
                if !self.switch_language(p) {
                    self.change_board(Board::Menu);
                }
            }
            Board::Setup | Board::NewScore => {
                self.switch_language(p);
            }
        }
    }

    fn mouse_player(&mut self, p: IVec2) {
        if self.switch_language(p) {
            return;
        }
        let rects = self.layout.player;
        if rects.prev.contains(p.x, p.y) {
            self.player_index = self.player_index.saturating_sub(1);
        } else if rects.next.contains(p.x, p.y) {
            self.player_index = (self.player_index + 1).min(MAX_PLAYER_INDEX);
        } else if rects.big.contains(p.x, p.y) {
            self.change_board(Board::Game);
        }
    }

    /// Returns true when `p` hit a language switch
    fn switch_language(&mut self, p: IVec2) -> bool {
        match Layout::language_hit(p) {
            Some(lang) => {
                self.set_language(lang);
                true
            }
            None => false,
        }
    }

    pub fn set_language(&mut self, lang: Language) {
        if self.config.lang != lang {
            log::info!("Language: {}", lang.as_str());
        }
        self.config.lang = lang;
    }

    // === Timers ===

    /// Advance logical time by `elapsed_ms`, firing due timers in order
    pub fn advance(&mut self, elapsed_ms: u32) {
        let mut left = elapsed_ms;
        while left > 0 {
            let step = self.timers.next_due().map_or(left, |due| due.min(left));
            for id in self.timers.advance(step) {
                // An earlier handler in this batch may have stopped it
                if self.timers.is_running(id) {
                    self.on_timer(id);
                }
            }
            left -= step;
        }
    }

    /// Run the handler of one timer
    pub fn on_timer(&mut self, id: TimerId) {
        match id {
            TimerId::Paint => self.frames += 1,
            TimerId::Welcome => {
                if self.welcome_counter > 0 {
                    self.welcome_counter -= 1;
                } else {
                    self.leave_welcome();
                }
            }
            TimerId::StarsUpdate => {
                for star in self.stars.iter_mut() {
                    star.step();
                }
            }
            TimerId::MovableUpdate => self.world.scroll_movables(self.assets.as_ref()),
            TimerId::GetReady => {
                if self.get_ready > 0 {
                    self.get_ready -= 1;
                } else {
                    self.timers.stop(TimerId::GetReady);
                    self.timers.start(TimerId::MovableUpdate, TIMEOUT_PAINT);
                    self.change_mode(Mode::Play);
                }
            }
            TimerId::GameUpdate => self.game_update(),
            TimerId::GameCounter => self.game_counter += 1,
            TimerId::GameEvents => {
                self.spawner.run(
                    &mut self.world,
                    &self.director.enemies,
                    &mut self.rng,
                    self.assets.as_ref(),
                );
            }
            TimerId::EnemiesEvents => self.enemies_event(),
            TimerId::Shield => countdown(&mut self.world.shield_timer, &mut self.timers, id),
            TimerId::Freeze => countdown(&mut self.world.frozen_timer, &mut self.timers, id),
            TimerId::Light => countdown(&mut self.world.lightball_timer, &mut self.timers, id),
            TimerId::BombLock => {
                self.bomb_lock = false;
                self.timers.stop(id);
            }
            TimerId::MissileLock => {
                self.missile_lock = false;
                self.timers.stop(id);
            }
            TimerId::SetupEnter => self.setup_counter += 1,
            TimerId::NewScore => self.newscore_counter ^= 1,
            TimerId::Smoke => self.smoke_counter = (self.smoke_counter + 1) % 4,
        }
    }

    fn game_update(&mut self) {
        let res = tick::update(&mut self.world, &mut self.director, self.assets.as_ref());
        for power_up in res.power_ups {
            let (id, interval) = match power_up {
                PowerUp::Shield => (TimerId::Shield, TIMEOUT_SHIELD),
                PowerUp::Freeze => (TimerId::Freeze, TIMEOUT_FREEZE),
                PowerUp::LightBall => (TimerId::Light, TIMEOUT_LIGHT),
            };
            self.timers.start(id, interval);
        }
        match res.life {
            Some(LifeEvent::Killed) => {
                log::info!("Player killed, {} lives left", self.world.lives);
                self.change_mode(Mode::Killed);
            }
            Some(LifeEvent::GameOver) => {
                log::info!("Game over with {} points", self.world.points);
                self.change_mode(Mode::Gameover);
            }
            None => {}
        }
    }

    fn enemies_event(&mut self) {
        let assets = self.assets.as_ref();
        if self.director.run(&mut self.world, &mut self.rng, assets) {
            return;
        }
        if self.world.level < MAX_LEVEL {
            self.change_mode(Mode::Prepare);
        } else if self.world.lives == 0 {
            self.change_mode(Mode::Gameover);
        } else {
            if let Some(boss) = self.director.boss.as_ref() {
                let center = boss.rect.center();
                self.world.explode(center, assets);
            }
            log::info!("Boss defeated with {} points", self.world.points);
            self.change_mode(Mode::Congrats);
        }
    }

    // === Drawing ===

    /// Emit draw calls for every live entity visible in the current state
    pub fn draw_world(&self, canvas: &mut dyn Canvas) {
        for star in &self.stars {
            canvas.draw_sprite(Sprite::Star, star.rect.x, star.rect.y);
        }
        let routine = self.paint_routine();
        if !routine.shows_terrain() {
            return;
        }
        let world = &self.world;
        draw_objects(canvas, &world.drops);
        for movable in &world.movables {
            canvas.draw_sprite(movable.sprite(), movable.rect.x, movable.rect.y);
        }
        if routine != PaintRoutine::GamePlay {
            return;
        }

        for objects in [
            &world.ice_boxes,
            &world.bombs,
            &world.medkits,
            &world.light_balls,
            &world.tnts,
            &world.shields,
            &world.meteorites,
        ] {
            draw_objects(canvas, objects);
        }
        if let Some(player) = world.player.as_ref() {
            canvas.draw_sprite(player.sprite, player.rect.x, player.rect.y);
            if world.is_shielded() {
                canvas.draw_shield(player.shield);
            }
        }
        for enemy in &self.director.enemies {
            canvas.draw_sprite(enemy.sprite, enemy.rect.x, enemy.rect.y);
        }
        draw_objects(canvas, &world.missiles);
        draw_objects(canvas, &world.fire_missiles);
        if let Some(boss) = self.director.boss.as_ref().filter(|b| b.valid) {
            canvas.draw_sprite(Sprite::Boss, boss.rect.x, boss.rect.y);
        }
        for explosion in &world.explosions {
            // Anchored at the blast center
            let size = self.assets.size(explosion.sprite);
            let c = explosion.rect.center();
            canvas.draw_sprite(explosion.sprite, c.x - size.x / 2, c.y - size.y / 2);
        }
    }
}

fn draw_objects(canvas: &mut dyn Canvas, objects: &[FlyingObject]) {
    for object in objects {
        canvas.draw_sprite(object.sprite, object.rect.x, object.rect.y);
    }
}

/// One power-up second; the timer stops once the count is spent
fn countdown(counter: &mut u32, timers: &mut Timers, id: TimerId) {
    if *counter > 0 {
        *counter -= 1;
    } else {
        timers.stop(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::assets::StaticAssets;
    use crate::sim::enemy::{Boss, Enemy};

    fn game() -> Game {
        let mut g = Game::new(Config::default(), Box::new(StaticAssets), 7);
        g.start();
        g
    }

    fn release(g: &mut Game, keys: &[Key]) {
        for key in keys {
            g.key_released(*key);
        }
    }

    /// Menu -> Player -> Game, then run out the get-ready countdown
    fn playing() -> Game {
        let mut g = game();
        release(&mut g, &[Key::Space, Key::Enter, Key::Enter]);
        assert_eq!(g.mode(), Mode::Prepare);
        g.advance(4 * TIMEOUT_GET_READY);
        assert_eq!(g.mode(), Mode::Play);
        g
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(Sprite, i32, i32)>,
        shields: usize,
    }

    impl Canvas for Recorder {
        fn draw_sprite(&mut self, sprite: Sprite, x: i32, y: i32) {
            self.calls.push((sprite, x, y));
        }

        fn draw_shield(&mut self, _rect: crate::sim::rect::Rect) {
            self.shields += 1;
        }
    }

    #[test]
    fn test_welcome_times_out_to_menu() {
        let mut g = game();
        assert_eq!(g.board(), Board::Welcome);
        g.advance(TIMEOUT_WELCOME);
        assert_eq!(g.board(), Board::Welcome);
        g.advance(TIMEOUT_WELCOME);
        assert_eq!(g.board(), Board::Menu);
        assert!(g.timers().is_running(TimerId::StarsUpdate));
        assert!(!g.timers().is_running(TimerId::Welcome));
    }

    #[test]
    fn test_welcome_skipped_by_click() {
        let mut g = game();
        g.mouse_pressed(IVec2::new(5, 5));
        assert_eq!(g.board(), Board::Menu);
        assert!(!g.timers().is_running(TimerId::Welcome));
    }

    #[test]
    fn test_menu_navigation() {
        let mut g = game();
        release(&mut g, &[Key::Space, Key::Up, Key::Down, Key::Down]);
        assert_eq!(g.menu_pos(), 2);
        release(&mut g, &[Key::Enter]);
        assert_eq!(g.board(), Board::HiScores);
        release(&mut g, &[Key::Escape]);
        assert_eq!(g.board(), Board::Menu);
        for _ in 0..10 {
            g.key_released(Key::Down);
        }
        assert_eq!(g.menu_pos(), Board::MENU.len() - 1);
    }

    #[test]
    fn test_player_select_bounds() {
        let mut g = game();
        release(&mut g, &[Key::Space, Key::Enter]);
        assert_eq!(g.board(), Board::Player);
        release(&mut g, &[Key::Left]);
        assert_eq!(g.player_index(), 0);
        release(&mut g, &[Key::Right, Key::Right, Key::Right, Key::Right]);
        assert_eq!(g.player_index(), MAX_PLAYER_INDEX);
        let prev = g.layout.player.prev.center();
        g.mouse_pressed(prev);
        assert_eq!(g.player_index(), MAX_PLAYER_INDEX - 1);
        let big = g.layout.player.big.center();
        g.mouse_pressed(big);
        assert_eq!(g.board(), Board::Game);
        assert_eq!(g.world().player.as_ref().map(|p| p.sprite), Some(Sprite::Player(2)));
    }

    #[test]
    fn test_session_init_and_prepare() {
        let g = playing();
        let w = g.world();
        assert_eq!(w.level, 0);
        assert_eq!((w.lives, w.indicators, w.tnt, w.points), (3, 10, 3, 0));
        assert!(g.timers().is_running(TimerId::GameUpdate));
        assert!(g.timers().is_running(TimerId::MovableUpdate));
        assert!(!g.timers().is_running(TimerId::GetReady));
        // Normal, level 0: one step off the base cadence
        assert_eq!(g.timers().interval(TimerId::GameEvents), Some(900));
        assert_eq!(g.timers().interval(TimerId::EnemiesEvents), Some(900));
    }

    #[test]
    fn test_get_ready_counts_down() {
        let mut g = game();
        release(&mut g, &[Key::Space, Key::Enter, Key::Enter]);
        assert_eq!(g.get_ready(), 3);
        g.advance(TIMEOUT_GET_READY);
        assert_eq!(g.get_ready(), 2);
        g.advance(2 * TIMEOUT_GET_READY);
        assert_eq!(g.get_ready(), 0);
        assert_eq!(g.mode(), Mode::Prepare);
        g.advance(TIMEOUT_GET_READY);
        assert_eq!(g.mode(), Mode::Play);
    }

    #[test]
    fn test_movement_uses_bindings() {
        let mut g = playing();
        let x = g.world().player.as_ref().map(|p| p.rect.x);
        g.key_pressed(Key::Right);
        assert_eq!(g.world().player.as_ref().map(|p| p.rect.x), x.map(|x| x + 20));
        // Unbound key
        g.key_pressed(Key::K);
        assert_eq!(g.world().player.as_ref().map(|p| p.rect.x), x.map(|x| x + 20));
    }

    #[test]
    fn test_fire_is_rate_limited() {
        let mut g = playing();
        g.key_released(Key::Space);
        g.key_released(Key::Space);
        assert_eq!(g.world().missiles.len(), 1);
        g.advance(TIMEOUT_MISSILE_LOCK);
        g.key_released(Key::Space);
        assert_eq!(g.world().missiles.len(), 2);
        assert!(g.timers().is_running(TimerId::MissileLock));
    }

    #[test]
    fn test_lightball_fires_spread() {
        let mut g = playing();
        g.world_mut().lightball_timer = 5;
        g.key_released(Key::Space);
        assert_eq!(g.world().fire_missiles.len(), 3);
        assert!(g.world().missiles.is_empty());
    }

    #[test]
    fn test_bomb_drop_position() {
        let mut g = playing();
        let bay = g.world().player.as_ref().map(|p| p.bomb_bay());
        g.key_released(Key::B);
        g.key_released(Key::B);
        assert_eq!(g.world().bombs.len(), 1);
        assert_eq!(g.world().bombs.first().map(|b| b.rect.top_left()), bay);
    }

    #[test]
    fn test_tnt_blows_first_three() {
        let mut g = playing();
        g.director_mut().clear();
        for i in 0..5 {
            let e = Enemy::new(1500, 100 + i * 100, i % 2 == 0, Sprite::Enemy(0), &StaticAssets);
            g.director_mut().enemies.push(e);
        }
        let points = g.world().points;
        g.key_released(Key::T);
        assert_eq!(g.director().enemies.len(), 2);
        assert_eq!(g.world().tnt, START_TNT - 1);
        assert_eq!(g.world().explosions.len(), 3);
        assert_eq!(g.world().points, points);

        g.director_mut().clear();
        g.key_released(Key::T);
        assert_eq!(g.world().tnt, START_TNT - 1);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut g = playing();
        g.key_released(Key::Escape);
        assert_eq!(g.mode(), Mode::Paused);
        assert!(!g.timers().is_running(TimerId::GameUpdate));
        assert!(!g.timers().is_running(TimerId::MovableUpdate));
        let counter = g.game_counter();
        g.advance(5000);
        assert_eq!(g.game_counter(), counter);

        g.key_released(Key::Enter);
        assert_eq!(g.mode(), Mode::Play);
        assert!(g.timers().is_running(TimerId::GameUpdate));
        assert!(g.timers().is_running(TimerId::MovableUpdate));
    }

    #[test]
    fn test_killed_then_acknowledged() {
        let mut g = playing();
        g.world_mut().indicators = 1;
        let at = g.world().player.as_ref().map(|p| p.rect.top_left()).unwrap_or_default();
        g.world_mut()
            .missiles
            .push(FlyingObject::missile(at.x + 20, at.y + 10, MissileKind::To, &StaticAssets));
        g.world_mut().drops.push(FlyingObject::drop(1500, 0, &StaticAssets));
        g.on_timer(TimerId::GameUpdate);
        assert_eq!(g.mode(), Mode::Killed);
        assert_eq!(g.world().lives, START_LIVES - 1);
        assert!(g.world().drops.is_empty());
        assert!(!g.timers().is_running(TimerId::GameUpdate));

        g.key_released(Key::Enter);
        assert_eq!(g.mode(), Mode::Play);
        assert_eq!(g.world().indicators, MAX_INDICATORS);
        assert!(g.world().missiles.is_empty());
        assert!(g.timers().is_running(TimerId::MovableUpdate));
    }

    #[test]
    fn test_game_over_routes_to_newscore() {
        let mut g = playing();
        g.world_mut().lives = 1;
        g.world_mut().indicators = 1;
        g.world_mut().points = 42;
        let at = g.world().player.as_ref().map(|p| p.rect.top_left()).unwrap_or_default();
        g.world_mut()
            .missiles
            .push(FlyingObject::missile(at.x + 20, at.y + 10, MissileKind::To, &StaticAssets));
        g.on_timer(TimerId::GameUpdate);
        assert_eq!(g.mode(), Mode::Gameover);
        assert_eq!(g.paint_routine(), PaintRoutine::GameOver);

        g.key_released(Key::Q);
        assert_eq!(g.board(), Board::NewScore);
        release(&mut g, &[Key::A, Key::C, Key::E, Key::Enter]);
        assert_eq!(g.board(), Board::HiScores);
        assert_eq!(g.config().hiscores.get(0).map(|e| e.name.as_str()), Some("ACE"));
        assert_eq!(g.config().hiscores.top_score(), Some(42));
    }

    #[test]
    fn test_level_done_prepares_next() {
        let mut g = playing();
        while g.director_mut().pop().is_some() {}
        g.on_timer(TimerId::EnemiesEvents);
        assert_eq!(g.mode(), Mode::Prepare);
        assert_eq!(g.world().level, 1);
        assert!(!g.timers().is_running(TimerId::GameUpdate));
        g.advance(4 * TIMEOUT_GET_READY);
        // Level 1 on Normal: two steps off the base cadence
        assert_eq!(g.timers().interval(TimerId::EnemiesEvents), Some(800));
    }

    #[test]
    fn test_boss_defeat_congrats() {
        let mut g = playing();
        g.world_mut().level = MAX_LEVEL;
        g.director_mut().set_level(MAX_LEVEL, Difficulty::Normal);
        while g.director_mut().pop().is_some() {}
        let mut boss = Boss::new(1200, 300, &StaticAssets);
        for _ in 0..BOSS_HP {
            boss.decrease_hp();
        }
        g.director_mut().boss = Some(boss);

        g.on_timer(TimerId::EnemiesEvents);
        assert_eq!(g.mode(), Mode::Congrats);
        assert_eq!(g.world().explosions.len(), 1);
        assert!(!g.timers().is_running(TimerId::GameUpdate));
    }

    #[test]
    fn test_power_up_timer_started_and_expires() {
        let mut g = playing();
        let at = g.world().player.as_ref().map(|p| p.rect.top_left()).unwrap_or_default();
        // One sine step later it sits on the player
        g.world_mut().shields.push(FlyingObject::pickup(
            crate::sim::entity::PickupKind::Shield,
            at.x + 100,
            at.y,
            &StaticAssets,
        ));
        g.on_timer(TimerId::GameUpdate);
        assert_eq!(g.world().shield_timer, SHIELD_TIMER);
        assert!(g.timers().is_running(TimerId::Shield));
        for _ in 0..=SHIELD_TIMER {
            g.on_timer(TimerId::Shield);
        }
        assert_eq!(g.world().shield_timer, 0);
        assert!(!g.timers().is_running(TimerId::Shield));
    }

    #[test]
    fn test_options_persist_lastmode() {
        let mut g = game();
        release(&mut g, &[Key::Space, Key::Down, Key::Enter]);
        assert_eq!(g.board(), Board::Options);
        assert_eq!(g.options_pos(), Difficulty::Normal.index());
        release(&mut g, &[Key::Down, Key::Enter]);
        assert_eq!(g.board(), Board::Menu);
        assert_eq!(g.config().lastmode, Difficulty::Hard);

        g.change_board(Board::Options);
        let easy = g.layout.options[0].center();
        g.mouse_pressed(easy);
        assert_eq!(g.config().lastmode, Difficulty::Easy);
        assert_eq!(g.board(), Board::Menu);
    }

    #[test]
    fn test_setup_remap_commit_and_discard() {
        let mut g = game();
        release(&mut g, &[Key::Space]);
        g.change_board(Board::Setup);
        release(&mut g, &[Key::F1]);
        assert_eq!(g.setup_mode(), SetupMode::Enter);
        // Already bound, rejected
        release(&mut g, &[Key::Right]);
        assert_eq!(g.temp_pos(), 0);
        release(&mut g, &[Key::A, Key::D]);
        assert_eq!(g.temp_setup()[..2], [Key::A, Key::D]);
        release(&mut g, &[Key::Enter]);
        assert_eq!(g.setup_mode(), SetupMode::Display);
        assert_eq!(g.config().get_key(Action::Left), Some(Key::A));

        release(&mut g, &[Key::F1, Key::J, Key::Escape]);
        assert_eq!(g.config().get_key(Action::Left), Some(Key::A));
        release(&mut g, &[Key::Q]);
        assert_eq!(g.board(), Board::Menu);
    }

    #[test]
    fn test_nick_entry_limits() {
        let mut g = game();
        g.change_board(Board::NewScore);
        for _ in 0..12 {
            g.key_released(Key::X);
        }
        g.key_released(Key::Num1);
        assert_eq!(g.nick(), "XXXXXXXXX1");
        g.key_released(Key::Backspace);
        assert_eq!(g.nick().len(), MAX_NICK_LEN - 1);
        assert!(g.timers().is_running(TimerId::NewScore));
        g.advance(TIMEOUT_NEWSCORE);
        assert_eq!(g.newscore_counter(), 1);
        g.key_released(Key::Escape);
        assert_eq!(g.board(), Board::HiScores);
        assert!(!g.timers().is_running(TimerId::NewScore));
        assert!(g.config().hiscores.is_empty());
    }

    #[test]
    fn test_language_toggle() {
        let mut g = game();
        g.mouse_pressed(IVec2::ZERO);
        g.mouse_pressed(IVec2::new(ARENA_WIDTH - 120, ARENA_HEIGHT - 30));
        assert_eq!(g.config().lang, Language::Pl);
        g.change_board(Board::Help);
        g.mouse_pressed(IVec2::new(ARENA_WIDTH - 20, ARENA_HEIGHT - 30));
        assert_eq!(g.config().lang, Language::En);
        assert_eq!(g.board(), Board::Help);
        g.mouse_pressed(IVec2::new(500, 500));
        assert_eq!(g.board(), Board::Menu);
    }

    #[test]
    fn test_quit_requests_close() {
        let mut g = game();
        release(&mut g, &[Key::Space, Key::Q]);
        assert_eq!(g.board(), Board::Quit);
        assert!(g.quit_requested());
    }

    #[test]
    fn test_draw_world_emits_entities() {
        let mut g = playing();
        g.world_mut().shield_timer = 3;
        g.key_released(Key::Space);
        let mut canvas = Recorder::default();
        g.draw_world(&mut canvas);
        let has = |s: Sprite| canvas.calls.iter().any(|(sprite, _, _)| *sprite == s);
        assert!(has(Sprite::Star));
        assert!(has(Sprite::Player(0)));
        assert!(has(Sprite::Missile(MissileKind::From)));
        assert_eq!(canvas.shields, 1);

        g.key_released(Key::Escape);
        let mut paused = Recorder::default();
        g.draw_world(&mut paused);
        assert!(!paused.calls.iter().any(|(s, _, _)| *s == Sprite::Player(0)));
        assert!(paused.calls.len() > g.stars().len());
    }

    #[test]
    fn test_same_seed_same_session() {
        let run = || {
            let mut g = playing();
            g.advance(20_000);
            (g.world().points, g.world().drops.len(), g.world().missiles.len(), g.spawner().remaining())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_quit_from_play_returns_to_menu() {
        let mut g = playing();
        g.key_released(Key::Q);
        assert_eq!(g.board(), Board::Menu);
        assert!(g.world().player.is_none());
        assert!(!g.timers().is_running(TimerId::GameUpdate));
        release(&mut g, &[Key::Enter, Key::Enter]);
        assert_eq!(g.mode(), Mode::Prepare);
        assert_eq!(g.world().level, 0);
    }
}
