use crate::Configuration;

/// Errors produced while generating, playing or solving a Switches puzzle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("value {value} does not fit in {width} switches")]
    OutOfRange { value: u32, width: u8 },
    #[error("a hypercube needs between 1 and {max} dimensions, got {width}")]
    InvalidDimension { width: usize, max: u8 },
    #[error("cannot forbid {forbidden} of {total} configurations")]
    InvalidForbiddenCount { forbidden: usize, total: usize },
    #[error("no configuration is eligible as the initial state")]
    NoCandidate,
    #[error("cannot start at {initial} with goal {goal}: both must be safe and at least two flips apart")]
    InvalidStart {
        goal: Configuration,
        initial: Configuration,
    },
    #[error("goal {goal} is not reachable from {from} without passing a forbidden configuration")]
    Unreachable {
        from: Configuration,
        goal: Configuration,
    },
    #[error("a set over {width} switches needs {expected} words, got {found}")]
    MalformedSet {
        width: u8,
        expected: usize,
        found: usize,
    },
    #[error("region walk stopped after visiting {visited} of {target} configurations")]
    GenerationBudgetExceeded { visited: usize, target: usize },
    #[error("switch {index} does not exist, the module has {count} switches")]
    SwitchOutOfRange { index: usize, count: usize },
    #[error("command not understood: \"{0}\"")]
    CommandNotUnderstood(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
