use crate::stats::{PuzzleResult, StatsManager};
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use rand::Rng;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use switches_core::{
    Configuration, ModuleHost, PuzzleConfig, PuzzleSeeds, SimpleRng, SwitchModule, ToggleOutcome,
};

/// Delay between replayed flips during auto-solve
pub const REPLAY_INTERVAL: Duration = Duration::from_millis(400);

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Current screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    Playing,
    Stats,
}

/// Input mode for the playing screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Digit keys flip switches
    Normal,
    /// Typing a chat-style command after `:`
    Command,
}

/// How new puzzles are seeded
#[derive(Debug, Clone)]
pub struct GameOptions {
    pub rule_seed: i32,
    /// Draw a fresh rule seed for every puzzle
    pub random_rules: bool,
    /// Instance seed for the first puzzle only
    pub instance_seed: Option<u64>,
    pub config: PuzzleConfig,
}

impl GameOptions {
    fn next_seeds(&mut self) -> PuzzleSeeds {
        let rule_seed = if self.random_rules {
            rand::thread_rng().gen::<i32>()
        } else {
            self.rule_seed
        };
        let instance_seed = self
            .instance_seed
            .take()
            .unwrap_or_else(SimpleRng::entropy_seed);
        PuzzleSeeds {
            rule_seed,
            instance_seed,
        }
    }
}

/// Collects the module's signals during one key press
#[derive(Default)]
struct Signals {
    passed: bool,
}

impl ModuleHost for Signals {
    fn handle_pass(&mut self) {
        self.passed = true;
    }

    fn handle_strike(&mut self) {
        log::debug!("strike signalled");
    }
}

/// The main application state
pub struct App {
    pub module: SwitchModule,
    pub seeds: PuzzleSeeds,
    options: GameOptions,
    pub mode: InputMode,
    pub screen_state: ScreenState,
    /// Text typed after `:`
    pub command_buffer: String,
    pub theme: Theme,
    /// Message to display
    pub message: Option<String>,
    message_timer: u32,
    /// Whether the forbidden list is on screen
    pub show_manual: bool,
    /// The last forbidden configuration tried, shown until the next move
    pub last_strike: Option<Configuration>,
    pub stats: StatsManager,
    replay: VecDeque<usize>,
    last_replay: Instant,
    auto_solving: bool,
    started: Instant,
    finished_secs: Option<u64>,
    recorded: bool,
    modules_created: usize,
}

impl App {
    /// Create an app with its first puzzle
    pub fn new(options: GameOptions, stats: StatsManager) -> switches_core::Result<Self> {
        let mut options = options;
        let seeds = options.next_seeds();
        let module = SwitchModule::from_seeds(seeds, &options.config, 1)?;
        Ok(Self {
            module,
            seeds,
            options,
            mode: InputMode::Normal,
            screen_state: ScreenState::Playing,
            command_buffer: String::new(),
            theme: Theme::dark(),
            message: None,
            message_timer: 0,
            show_manual: true,
            last_strike: None,
            stats,
            replay: VecDeque::new(),
            last_replay: Instant::now(),
            auto_solving: false,
            started: Instant::now(),
            finished_secs: None,
            recorded: false,
            modules_created: 1,
        })
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(100)
    }

    /// Update timers and step any auto-solve replay (called every tick)
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }

        if !self.replay.is_empty() && self.last_replay.elapsed() >= REPLAY_INTERVAL {
            if let Some(index) = self.replay.pop_front() {
                self.flip(index);
            }
            self.last_replay = Instant::now();
        }
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30; // ~3 seconds at 100ms poll
    }

    pub fn is_replaying(&self) -> bool {
        !self.replay.is_empty()
    }

    /// Flips still queued by auto-solve
    pub fn replay_remaining(&self) -> usize {
        self.replay.len()
    }

    /// Seconds on the clock, frozen once solved
    pub fn elapsed_secs(&self) -> u64 {
        self.finished_secs
            .unwrap_or_else(|| self.started.elapsed().as_secs())
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match self.screen_state {
            ScreenState::Stats => {
                if matches!(key.code, KeyCode::Char('i') | KeyCode::Char('q') | KeyCode::Esc) {
                    self.screen_state = ScreenState::Playing;
                }
                AppAction::Continue
            }
            ScreenState::Playing => match self.mode {
                InputMode::Normal => self.handle_game_key(key),
                InputMode::Command => self.handle_command_key(key),
            },
        }
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => {
                self.record(PuzzleResult::Abandoned);
                return AppAction::Quit;
            }
            KeyCode::Char(c @ '1'..='9') => {
                if self.is_replaying() {
                    self.show_message("Auto-solve in progress");
                    return AppAction::Continue;
                }
                let index = (c as u8 - b'1') as usize;
                if index < self.module.switch_count() {
                    self.flip(index);
                } else {
                    self.show_message(&format!(
                        "There are only {} switches",
                        self.module.switch_count()
                    ));
                }
            }
            KeyCode::Char(':') => {
                if !self.is_replaying() {
                    self.mode = InputMode::Command;
                    self.command_buffer.clear();
                }
            }
            KeyCode::Char('a') => self.start_auto_solve(),
            KeyCode::Char('n') => self.new_puzzle(),
            KeyCode::Char('m') => self.show_manual = !self.show_manual,
            KeyCode::Char('t') => {
                self.theme = self.theme.next();
                self.show_message(&format!("Theme: {}", self.theme.name));
            }
            KeyCode::Char('i') => self.screen_state = ScreenState::Stats,
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_command_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                self.command_buffer.clear();
            }
            KeyCode::Enter => {
                self.mode = InputMode::Normal;
                let command = std::mem::take(&mut self.command_buffer);
                self.run_command(&command);
            }
            KeyCode::Backspace => {
                self.command_buffer.pop();
            }
            KeyCode::Char(c) => self.command_buffer.push(c),
            _ => {}
        }
        AppAction::Continue
    }

    /// Flip one switch and react to what the module reports
    fn flip(&mut self, index: usize) {
        let mut signals = Signals::default();
        match self.module.toggle_with(index, &mut signals) {
            Ok(outcome) => self.react(outcome, &signals),
            Err(err) => self.show_message(&err.to_string()),
        }
    }

    fn run_command(&mut self, command: &str) {
        let mut signals = Signals::default();
        match self.module.execute_command(command, &mut signals) {
            Ok(outcomes) => {
                if let Some(&last) = outcomes.last() {
                    self.react(last, &signals);
                }
            }
            Err(err) => {
                log::warn!("{}", err);
                self.show_message(&err.to_string());
            }
        }
    }

    fn react(&mut self, outcome: ToggleOutcome, signals: &Signals) {
        if signals.passed {
            self.finished_secs = Some(self.started.elapsed().as_secs());
            let result = if self.auto_solving {
                PuzzleResult::AutoSolved
            } else {
                PuzzleResult::Solved
            };
            self.record(result);
        }

        match outcome {
            ToggleOutcome::Moved(_) => self.last_strike = None,
            ToggleOutcome::Solved => {
                self.last_strike = None;
                self.show_message("Module solved!");
            }
            ToggleOutcome::Strike { attempted } => {
                self.last_strike = Some(attempted);
                self.show_message(&format!(
                    "Strike! {} is forbidden ({} so far)",
                    attempted,
                    self.module.strikes()
                ));
            }
            ToggleOutcome::Inert => {}
        }
    }

    /// Queue the solver's flips for paced replay
    fn start_auto_solve(&mut self) {
        if self.module.is_solved() {
            self.show_message("Already solved");
            return;
        }
        if self.is_replaying() {
            return;
        }
        match self.module.solve() {
            Ok(flips) => {
                self.auto_solving = true;
                self.replay = flips.into();
                self.last_replay = Instant::now();
                self.show_message(&format!("Auto-solving in {} flips", self.replay.len()));
            }
            Err(err) => self.show_message(&err.to_string()),
        }
    }

    /// Record the current puzzle once, unless nothing was done
    fn record(&mut self, result: PuzzleResult) {
        if self.recorded {
            return;
        }
        if result == PuzzleResult::Abandoned && self.module.toggles() == 0 {
            return;
        }
        self.recorded = true;
        self.stats.record(
            self.seeds,
            result,
            self.module.toggles(),
            self.module.strikes(),
            self.elapsed_secs(),
        );
    }

    fn new_puzzle(&mut self) {
        if !self.module.is_solved() {
            self.record(PuzzleResult::Abandoned);
        }
        let seeds = self.options.next_seeds();
        match SwitchModule::from_seeds(seeds, &self.options.config, self.modules_created + 1) {
            Ok(module) => {
                self.modules_created += 1;
                self.module = module;
                self.seeds = seeds;
                self.replay.clear();
                self.auto_solving = false;
                self.last_strike = None;
                self.started = Instant::now();
                self.finished_secs = None;
                self.recorded = false;
                self.show_message("New puzzle");
            }
            Err(err) => {
                log::error!("could not set up rule seed {}: {}", seeds.rule_seed, err);
                self.show_message(&err.to_string());
            }
        }
    }
}
