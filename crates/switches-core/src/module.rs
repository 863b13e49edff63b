//! The live module: switch positions and the pass/strike state machine.

use crate::command::parse_command;
use crate::{
    Configuration, ConfigurationSet, Error, Puzzle, PuzzleConfig, PuzzleSeeds, Result, Solver,
};
use serde::{Deserialize, Serialize};

/// Whether the module still accepts meaningful input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleState {
    Unsolved,
    Solved,
}

/// What a single toggle did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToggleOutcome {
    /// Landed on a safe configuration that is not the goal
    Moved(Configuration),
    /// Landed on the goal; the module is now solved
    Solved,
    /// Tried to enter a forbidden configuration; the switch was put back
    Strike { attempted: Configuration },
    /// The module was already solved; the switch moved without effect
    Inert,
}

/// Receives pass and strike signals from a module.
pub trait ModuleHost {
    fn handle_pass(&mut self);
    fn handle_strike(&mut self);
}

/// A host that ignores every signal
impl ModuleHost for () {
    fn handle_pass(&mut self) {}
    fn handle_strike(&mut self) {}
}

/// Serializable view of a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSnapshot {
    pub module_id: usize,
    pub rule_seed: Option<i32>,
    pub switches: Vec<bool>,
    pub goal: Configuration,
    pub forbidden: Vec<u32>,
    pub state: ModuleState,
    pub strikes: usize,
    pub toggles: usize,
}

/// One Switches module on a bomb
#[derive(Debug, Clone)]
pub struct SwitchModule {
    id: usize,
    puzzle: Puzzle,
    switches: Vec<bool>,
    state: ModuleState,
    strikes: usize,
    toggles: usize,
}

impl SwitchModule {
    /// Place the switches at the puzzle's initial configuration.
    pub fn new(puzzle: Puzzle, id: usize) -> Self {
        puzzle.log_setup(id);
        let switches = puzzle.initial().to_bits();
        Self {
            id,
            puzzle,
            switches,
            state: ModuleState::Unsolved,
            strikes: 0,
            toggles: 0,
        }
    }

    pub fn from_seeds(seeds: PuzzleSeeds, config: &PuzzleConfig, id: usize) -> Result<Self> {
        Ok(Self::new(Puzzle::from_seeds(seeds, config)?, id))
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn state(&self) -> ModuleState {
        self.state
    }

    pub fn is_solved(&self) -> bool {
        self.state == ModuleState::Solved
    }

    pub fn strikes(&self) -> usize {
        self.strikes
    }

    /// Number of toggles received, including reverted and inert ones
    pub fn toggles(&self) -> usize {
        self.toggles
    }

    pub fn switch_count(&self) -> usize {
        self.switches.len()
    }

    /// Physical switch positions, left to right
    pub fn switch_states(&self) -> &[bool] {
        &self.switches
    }

    /// The configuration the switches currently show
    pub fn current_configuration(&self) -> Configuration {
        let mut value = 0;
        for (i, &up) in self.switches.iter().enumerate() {
            if up {
                value |= 1 << i;
            }
        }
        Configuration::from_raw(value, self.switches.len() as u8)
    }

    pub fn goal_configuration(&self) -> Configuration {
        self.puzzle.goal()
    }

    pub fn forbidden_set(&self) -> &ConfigurationSet {
        self.puzzle.forbidden()
    }

    /// "up"/"down" per switch, left to right
    pub fn describe_configuration(&self, config: &Configuration) -> Vec<&'static str> {
        config.describe()
    }

    /// Flip one switch and judge the result.
    pub fn toggle(&mut self, index: usize) -> Result<ToggleOutcome> {
        self.toggle_with(index, &mut ())
    }

    /// Flip one switch, reporting a pass or strike to `host`.
    pub fn toggle_with(&mut self, index: usize, host: &mut impl ModuleHost) -> Result<ToggleOutcome> {
        if index >= self.switches.len() {
            return Err(Error::SwitchOutOfRange {
                index,
                count: self.switches.len(),
            });
        }

        self.toggles += 1;
        self.switches[index] = !self.switches[index];
        if self.is_solved() {
            return Ok(ToggleOutcome::Inert);
        }

        let config = self.current_configuration();
        if config == self.puzzle.goal() {
            log::info!("[Switches #{}] Module solved.", self.id);
            self.state = ModuleState::Solved;
            host.handle_pass();
            Ok(ToggleOutcome::Solved)
        } else if self.puzzle.forbidden().contains(&config) {
            log::warn!(
                "[Switches #{}] You tried to flip switch #{}, yielding {}, which is forbidden. Strike!",
                self.id,
                index + 1,
                config
            );
            self.strikes += 1;
            self.switches[index] = !self.switches[index];
            host.handle_strike();
            Ok(ToggleOutcome::Strike { attempted: config })
        } else {
            log::info!(
                "[Switches #{}] You flipped switch #{}, yielding {}.",
                self.id,
                index + 1,
                config
            );
            Ok(ToggleOutcome::Moved(config))
        }
    }

    /// Parse a text command and apply its toggles in order.
    ///
    /// Nothing is toggled unless the whole command parses. Application stops
    /// after the first strike or once the module is solved.
    pub fn execute_command(
        &mut self,
        command: &str,
        host: &mut impl ModuleHost,
    ) -> Result<Vec<ToggleOutcome>> {
        let flips = parse_command(command, self.switches.len())?;
        let mut outcomes = Vec::with_capacity(flips.len());
        for index in flips {
            let outcome = self.toggle_with(index, host)?;
            outcomes.push(outcome);
            if matches!(outcome, ToggleOutcome::Strike { .. } | ToggleOutcome::Solved) {
                break;
            }
        }
        Ok(outcomes)
    }

    /// Flips that take the current switches to the goal.
    pub fn solve(&self) -> Result<Vec<usize>> {
        Solver::new().solve(
            self.current_configuration(),
            self.puzzle.goal(),
            self.puzzle.forbidden(),
        )
    }

    pub fn snapshot(&self) -> ModuleSnapshot {
        ModuleSnapshot {
            module_id: self.id,
            rule_seed: self.puzzle.rules().seed(),
            switches: self.switches.clone(),
            goal: self.puzzle.goal(),
            forbidden: self.puzzle.forbidden().values(),
            state: self.state,
            strikes: self.strikes,
            toggles: self.toggles,
        }
    }
}
