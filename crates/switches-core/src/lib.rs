//! Switches puzzle engine.
//!
//! A row of switches must be brought from a starting arrangement to a goal
//! arrangement without ever passing through a forbidden one. Arrangements
//! are vertices of a hypercube; the forbidden ones are the complement of a
//! connected safe region grown from a rule seed, so a safe route always
//! exists.
//!
//! ```
//! use switches_core::{PuzzleConfig, PuzzleSeeds, SwitchModule, ToggleOutcome};
//!
//! let seeds = PuzzleSeeds { rule_seed: 1, instance_seed: 7 };
//! let mut module = SwitchModule::from_seeds(seeds, &PuzzleConfig::classic(), 1).unwrap();
//! for index in module.solve().unwrap() {
//!     module.toggle(index).unwrap();
//! }
//! assert!(module.is_solved());
//! assert_eq!(module.toggle(0).unwrap(), ToggleOutcome::Inert);
//! ```

pub mod command;
mod config;
mod configuration;
mod error;
mod module;
mod puzzle;
pub mod region;
pub mod rng;
mod rules;
mod set;
mod solver;

pub use command::{parse_command, HELP_MESSAGE};
pub use config::PuzzleConfig;
pub use configuration::{vertex_count, Configuration, MAX_DIMENSION, SWITCH_COUNT};
pub use error::{Error, Result};
pub use module::{ModuleHost, ModuleSnapshot, ModuleState, SwitchModule, ToggleOutcome};
pub use puzzle::{pick_goal, pick_initial, Puzzle, PuzzleSeeds};
pub use region::{generate_safe_region, visit_configurations, RegionWalk, WALK_LIMIT};
pub use rng::{MonoRandom, SeededRng, SimpleRng};
pub use rules::{RuleSet, DEFAULT_RULE_SEED, PUBLISHED_FORBIDDEN};
pub use set::ConfigurationSet;
pub use solver::{apply_flips, Solver};
