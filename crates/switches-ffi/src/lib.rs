use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use switches_core::{
    parse_command, Configuration, Error, PuzzleConfig, PuzzleSeeds, RuleSet, SimpleRng,
    SwitchModule, ToggleOutcome, HELP_MESSAGE,
};

uniffi::setup_scaffolding!();

/// Module ids count up across every module created in the process
static MODULE_ID_COUNTER: AtomicU32 = AtomicU32::new(1);

/// Errors surfaced to the host
#[derive(Debug, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum SwitchesError {
    /// Rules or puzzle could not be set up for these parameters
    #[error("setup failed: {0}")]
    Setup(String),
    /// A switch index or configuration outside the module
    #[error("{0}")]
    OutOfRange(String),
    #[error("{0}")]
    CommandNotUnderstood(String),
    /// No safe route to the goal
    #[error("{0}")]
    Unreachable(String),
    #[error("could not export state: {0}")]
    Export(String),
}

impl From<Error> for SwitchesError {
    fn from(err: Error) -> Self {
        let message = err.to_string();
        match err {
            Error::InvalidDimension { .. }
            | Error::InvalidForbiddenCount { .. }
            | Error::NoCandidate
            | Error::InvalidStart { .. }
            | Error::MalformedSet { .. }
            | Error::GenerationBudgetExceeded { .. } => Self::Setup(message),
            Error::OutOfRange { .. } | Error::SwitchOutOfRange { .. } => Self::OutOfRange(message),
            Error::CommandNotUnderstood(_) => Self::CommandNotUnderstood(message),
            Error::Unreachable { .. } => Self::Unreachable(message),
        }
    }
}

/// What a toggle did
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum ToggleResult {
    /// Now showing `configuration`, which is safe
    Moved { configuration: u32 },
    /// Reached the goal
    Solved,
    /// `attempted` is forbidden; the switch went back
    Strike { attempted: u32 },
    /// The module was already solved
    Inert,
}

impl From<ToggleOutcome> for ToggleResult {
    fn from(outcome: ToggleOutcome) -> Self {
        match outcome {
            ToggleOutcome::Moved(config) => Self::Moved {
                configuration: config.value(),
            },
            ToggleOutcome::Solved => Self::Solved,
            ToggleOutcome::Strike { attempted } => Self::Strike {
                attempted: attempted.value(),
            },
            ToggleOutcome::Inert => Self::Inert,
        }
    }
}

/// Pass and strike notifications, implemented by the host
#[uniffi::export(callback_interface)]
pub trait ModuleListener: Send + Sync {
    fn on_pass(&self);
    fn on_strike(&self, switch_index: u8);
}

/// One Switches module for a host game
#[derive(uniffi::Object)]
pub struct SwitchesModule {
    module: Mutex<SwitchModule>,
    listener: Mutex<Option<Arc<dyn ModuleListener>>>,
}

impl SwitchesModule {
    fn create(rule_seed: i32, instance_seed: u64, forbidden_count: u32) -> Result<Arc<Self>, SwitchesError> {
        let seeds = PuzzleSeeds {
            rule_seed,
            instance_seed,
        };
        let config = PuzzleConfig::with_forbidden(forbidden_count as usize);
        let id = MODULE_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        let module = SwitchModule::from_seeds(seeds, &config, id as usize)?;
        Ok(Arc::new(Self {
            module: Mutex::new(module),
            listener: Mutex::new(None),
        }))
    }

    /// Tell the listener about one outcome. Called with no locks held so
    /// the listener may call back into the module.
    fn notify(&self, before: Configuration, outcome: ToggleOutcome) {
        let listener = self.listener.lock().unwrap().clone();
        let Some(listener) = listener else {
            return;
        };
        match outcome {
            ToggleOutcome::Solved => listener.on_pass(),
            ToggleOutcome::Strike { attempted } => {
                if let Some(switch) = before.flipped_switch(&attempted) {
                    listener.on_strike(switch as u8);
                }
            }
            ToggleOutcome::Moved(_) | ToggleOutcome::Inert => {}
        }
    }
}

#[uniffi::export]
impl SwitchesModule {
    /// Create a module with a random instance seed
    #[uniffi::constructor]
    pub fn new(rule_seed: i32, forbidden_count: u32) -> Result<Arc<Self>, SwitchesError> {
        Self::create(rule_seed, SimpleRng::entropy_seed(), forbidden_count)
    }

    /// Create a reproducible module
    #[uniffi::constructor]
    pub fn with_seed(
        rule_seed: i32,
        instance_seed: u64,
        forbidden_count: u32,
    ) -> Result<Arc<Self>, SwitchesError> {
        Self::create(rule_seed, instance_seed, forbidden_count)
    }

    pub fn set_listener(&self, listener: Box<dyn ModuleListener>) {
        *self.listener.lock().unwrap() = Some(Arc::from(listener));
    }

    pub fn clear_listener(&self) {
        *self.listener.lock().unwrap() = None;
    }

    pub fn module_id(&self) -> u32 {
        self.module.lock().unwrap().id() as u32
    }

    /// Flip switch `index` (0 = leftmost)
    pub fn toggle(&self, index: u8) -> Result<ToggleResult, SwitchesError> {
        let (before, outcome) = {
            let mut module = self.module.lock().unwrap();
            let before = module.current_configuration();
            (before, module.toggle(index as usize)?)
        };
        self.notify(before, outcome);
        Ok(outcome.into())
    }

    /// Parse a chat command into 0-based switch indices without applying it
    pub fn process_command(&self, command: String) -> Result<Vec<u8>, SwitchesError> {
        let switch_count = self.module.lock().unwrap().switch_count();
        let flips = parse_command(&command, switch_count)?;
        Ok(flips.into_iter().map(|i| i as u8).collect())
    }

    /// Parse and apply a chat command, stopping after a strike or the solve.
    /// The whole command runs under one lock; the listener hears about it
    /// afterwards.
    pub fn execute_command(&self, command: String) -> Result<Vec<ToggleResult>, SwitchesError> {
        let mut applied = Vec::new();
        {
            let mut module = self.module.lock().unwrap();
            let flips = parse_command(&command, module.switch_count())?;
            for index in flips {
                let before = module.current_configuration();
                let outcome = module.toggle(index)?;
                applied.push((before, outcome));
                if matches!(outcome, ToggleOutcome::Solved | ToggleOutcome::Strike { .. }) {
                    break;
                }
            }
        }
        Ok(applied
            .into_iter()
            .map(|(before, outcome)| {
                self.notify(before, outcome);
                outcome.into()
            })
            .collect())
    }

    pub fn is_solved(&self) -> bool {
        self.module.lock().unwrap().is_solved()
    }

    pub fn strikes(&self) -> u32 {
        self.module.lock().unwrap().strikes() as u32
    }

    /// Switch positions, left to right, `true` = up
    pub fn switch_states(&self) -> Vec<bool> {
        self.module.lock().unwrap().switch_states().to_vec()
    }

    /// Goal indicator lights, left to right
    pub fn goal_states(&self) -> Vec<bool> {
        self.module.lock().unwrap().goal_configuration().to_bits()
    }

    /// Forbidden configurations in ascending order
    pub fn forbidden_configurations(&self) -> Vec<u32> {
        self.module.lock().unwrap().forbidden_set().values()
    }

    /// "up"/"down" per switch for a configuration value
    pub fn describe_configuration(&self, configuration: u32) -> Result<Vec<String>, SwitchesError> {
        let module = self.module.lock().unwrap();
        let config = Configuration::from_int(configuration, module.switch_count())?;
        Ok(module
            .describe_configuration(&config)
            .into_iter()
            .map(String::from)
            .collect())
    }

    /// Shortest safe sequence of 0-based flips from the current switches to the goal
    pub fn solve(&self) -> Result<Vec<u8>, SwitchesError> {
        let flips = self.module.lock().unwrap().solve()?;
        Ok(flips.into_iter().map(|i| i as u8).collect())
    }

    /// Snapshot of the module as JSON
    pub fn export_state_json(&self) -> Result<String, SwitchesError> {
        let snapshot = self.module.lock().unwrap().snapshot();
        serde_json::to_string(&snapshot).map_err(|e| SwitchesError::Export(e.to_string()))
    }
}

/// The forbidden list a manual for `rule_seed` prints
#[uniffi::export]
pub fn forbidden_for_rule_seed(
    rule_seed: i32,
    forbidden_count: u32,
) -> Result<Vec<u32>, SwitchesError> {
    let config = PuzzleConfig::with_forbidden(forbidden_count as usize);
    let rules = RuleSet::from_seed(rule_seed, &config)?;
    log::debug!("rule seed {} forbids {:?}", rule_seed, rules.forbidden());
    Ok(rules.forbidden().values())
}

/// Command help with `prefix` in place of the host's command prefix
#[uniffi::export]
pub fn help_message(prefix: String) -> String {
    HELP_MESSAGE.replace("{0}", &prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct Recorded {
        passes: AtomicUsize,
        strikes: Mutex<Vec<u8>>,
    }

    struct RecordingListener(Arc<Recorded>);

    impl ModuleListener for RecordingListener {
        fn on_pass(&self) {
            self.0.passes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_strike(&self, switch_index: u8) {
            self.0.strikes.lock().unwrap().push(switch_index);
        }
    }

    fn listened(instance_seed: u64) -> (Arc<SwitchesModule>, Arc<Recorded>) {
        let module = SwitchesModule::with_seed(1, instance_seed, 10).unwrap();
        let recorded = Arc::new(Recorded::default());
        module.set_listener(Box::new(RecordingListener(recorded.clone())));
        (module, recorded)
    }

    #[test]
    fn test_solve_notifies_pass_once() {
        let (module, recorded) = listened(17);
        for index in module.solve().unwrap() {
            module.toggle(index).unwrap();
        }
        assert!(module.is_solved());
        assert_eq!(module.switch_states(), module.goal_states());
        assert_eq!(module.toggle(0).unwrap(), ToggleResult::Inert);
        assert_eq!(recorded.passes.load(Ordering::SeqCst), 1);
        assert!(recorded.strikes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_strike_reports_switch() {
        // Search a few instances for one whose start touches a forbidden configuration
        for seed in 0..50 {
            let (module, recorded) = listened(seed);
            let current: u32 = module
                .switch_states()
                .iter()
                .enumerate()
                .map(|(i, &up)| (up as u32) << i)
                .sum();
            let forbidden = module.forbidden_configurations();
            let Some(switch) = (0..5u8).find(|&i| forbidden.contains(&(current ^ (1 << i)))) else {
                continue;
            };

            let result = module.toggle(switch).unwrap();
            assert_eq!(
                result,
                ToggleResult::Strike {
                    attempted: current ^ (1 << switch)
                }
            );
            assert_eq!(module.strikes(), 1);
            assert_eq!(*recorded.strikes.lock().unwrap(), vec![switch]);
            return;
        }
        panic!("no instance started next to a forbidden configuration");
    }

    #[test]
    fn test_process_command_does_not_toggle() {
        let module = SwitchesModule::with_seed(1, 3, 10).unwrap();
        let before = module.switch_states();
        assert_eq!(
            module.process_command("flip 1 5 3 2".into()).unwrap(),
            vec![0, 4, 2, 1]
        );
        assert_eq!(module.switch_states(), before);
        assert!(matches!(
            module.process_command("flip 6".into()),
            Err(SwitchesError::CommandNotUnderstood(_))
        ));
    }

    #[test]
    fn test_execute_command_solves() {
        let module = SwitchesModule::with_seed(1, 3, 10).unwrap();
        let command: String = module
            .solve()
            .unwrap()
            .iter()
            .map(|i| char::from(b'1' + i))
            .collect();
        let results = module.execute_command(format!("toggle {command}")).unwrap();
        assert_eq!(results.last(), Some(&ToggleResult::Solved));
        assert!(module.is_solved());
    }

    #[derive(Default)]
    struct Reentered {
        module: Mutex<Option<Arc<SwitchesModule>>>,
        solved_on_pass: Mutex<Vec<bool>>,
    }

    /// Reads the module back from inside its own callbacks
    struct ReentrantListener(Arc<Reentered>);

    impl ModuleListener for ReentrantListener {
        fn on_pass(&self) {
            let module = self.0.module.lock().unwrap().clone();
            if let Some(module) = module {
                self.0.solved_on_pass.lock().unwrap().push(module.is_solved());
            }
        }

        fn on_strike(&self, _switch_index: u8) {}
    }

    #[test]
    fn test_execute_command_is_one_step_for_the_listener() {
        let module = SwitchesModule::with_seed(1, 17, 10).unwrap();
        let listener = Arc::new(Reentered::default());
        *listener.module.lock().unwrap() = Some(module.clone());
        module.set_listener(Box::new(ReentrantListener(listener.clone())));

        let solution = module.solve().unwrap();
        let command: Vec<String> = solution.iter().map(|i| (i + 1).to_string()).collect();
        // The trailing flip comes after the solve and is never applied
        let results = module
            .execute_command(format!("flip {} 1", command.join(" ")))
            .unwrap();
        assert_eq!(results.len(), solution.len());
        assert_eq!(results.last(), Some(&ToggleResult::Solved));
        assert_eq!(module.switch_states(), module.goal_states());
        assert_eq!(*listener.solved_on_pass.lock().unwrap(), vec![true]);
        listener.module.lock().unwrap().take();
    }

    #[test]
    fn test_execute_command_rejects_before_toggling() {
        let (module, recorded) = listened(3);
        let before = module.switch_states();
        assert!(matches!(
            module.execute_command("flip 1 9".into()),
            Err(SwitchesError::CommandNotUnderstood(_))
        ));
        assert_eq!(module.switch_states(), before);
        assert_eq!(recorded.passes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_setup_errors() {
        assert!(matches!(
            SwitchesModule::with_seed(5, 1, 32),
            Err(SwitchesError::Setup(_))
        ));
        assert!(matches!(
            SwitchesModule::new(12, 30),
            Err(SwitchesError::Setup(_))
        ));
    }

    #[test]
    fn test_out_of_range() {
        let module = SwitchesModule::with_seed(1, 3, 10).unwrap();
        assert!(matches!(module.toggle(5), Err(SwitchesError::OutOfRange(_))));
        assert!(matches!(
            module.describe_configuration(32),
            Err(SwitchesError::OutOfRange(_))
        ));
        assert_eq!(
            module.describe_configuration(1).unwrap(),
            vec!["up", "down", "down", "down", "down"]
        );
    }

    #[test]
    fn test_manual_and_export() {
        assert_eq!(
            forbidden_for_rule_seed(1, 10).unwrap(),
            vec![3, 4, 7, 9, 11, 15, 25, 26, 29, 30]
        );
        assert_eq!(
            forbidden_for_rule_seed(42, 10).unwrap(),
            vec![2, 4, 6, 10, 12, 14, 20, 22, 26, 30]
        );

        let module = SwitchesModule::with_seed(1, 3, 10).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&module.export_state_json().unwrap()).unwrap();
        assert_eq!(json["rule_seed"], 1);
        assert_eq!(json["strikes"], 0);
        assert_eq!(help_message("switches".into()), HELP_MESSAGE.replace("{0}", "switches"));
    }
}
