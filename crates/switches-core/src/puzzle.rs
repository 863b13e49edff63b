use crate::rng::{SeededRng, SimpleRng};
use crate::{Configuration, ConfigurationSet, Error, PuzzleConfig, Result, RuleSet};
use serde::{Deserialize, Serialize};

/// Pick the goal uniformly among the safe configurations.
pub fn pick_goal(safe: &ConfigurationSet, rng: &mut impl SeededRng) -> Result<Configuration> {
    let candidates = safe.to_vec();
    if candidates.is_empty() {
        return Err(Error::NoCandidate);
    }
    Ok(candidates[rng.pick_index(candidates.len())])
}

/// Pick the starting configuration: safe, not the goal, and not one flip
/// away from the goal.
pub fn pick_initial(
    safe: &ConfigurationSet,
    goal: Configuration,
    rng: &mut impl SeededRng,
) -> Result<Configuration> {
    let mut pool = safe.clone();
    pool.remove(&goal);
    for neighbor in goal.neighbors() {
        pool.remove(&neighbor);
    }

    let candidates = pool.to_vec();
    if candidates.is_empty() {
        return Err(Error::NoCandidate);
    }
    Ok(candidates[rng.pick_index(candidates.len())])
}

/// One generated puzzle: the rules plus this bomb's goal and start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    rules: RuleSet,
    goal: Configuration,
    initial: Configuration,
}

/// Seeds that reproduce a puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleSeeds {
    pub rule_seed: i32,
    pub instance_seed: u64,
}

impl PuzzleSeeds {
    /// Published rules with a fresh instance seed
    pub fn random() -> Self {
        Self {
            rule_seed: crate::DEFAULT_RULE_SEED,
            instance_seed: SimpleRng::entropy_seed(),
        }
    }
}

impl Puzzle {
    /// Choose a goal and an initial configuration for `rules`.
    pub fn generate(rules: RuleSet, rng: &mut impl SeededRng) -> Result<Self> {
        let goal = pick_goal(rules.safe(), rng)?;
        let initial = pick_initial(rules.safe(), goal, rng)?;
        Ok(Self {
            rules,
            goal,
            initial,
        })
    }

    /// Rules from `seeds.rule_seed`, goal and start from `seeds.instance_seed`.
    pub fn from_seeds(seeds: PuzzleSeeds, config: &PuzzleConfig) -> Result<Self> {
        let rules = RuleSet::from_seed(seeds.rule_seed, config)?;
        let mut rng = SimpleRng::with_seed(seeds.instance_seed);
        Self::generate(rules, &mut rng)
    }

    /// Reassemble a puzzle from known choices. Fails with
    /// [`Error::InvalidStart`] unless `initial` is one generation could pick.
    pub fn from_parts(rules: RuleSet, goal: Configuration, initial: Configuration) -> Result<Self> {
        if !rules.safe().contains(&goal)
            || !rules.safe().contains(&initial)
            || initial.distance(&goal) < 2
        {
            return Err(Error::InvalidStart { goal, initial });
        }
        Ok(Self {
            rules,
            goal,
            initial,
        })
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn goal(&self) -> Configuration {
        self.goal
    }

    pub fn initial(&self) -> Configuration {
        self.initial
    }

    pub fn forbidden(&self) -> &ConfigurationSet {
        self.rules.forbidden()
    }

    pub fn switch_count(&self) -> usize {
        self.rules.switch_count()
    }

    /// Log the rules and choices for this puzzle, one line each.
    pub fn log_setup(&self, module_id: usize) {
        if let Some(seed) = self.rules.seed() {
            log::info!("[Switches #{}] Using rule seed: {}", module_id, seed);
        }
        log::info!("[Switches #{}] Forbidden configurations are:", module_id);
        for config in self.forbidden().iter() {
            log::info!("[Switches #{}] • {}", module_id, config);
        }
        log::info!("[Switches #{}] Intended solution: {}", module_id, self.goal);
        log::info!("[Switches #{}] Initial configuration: {}", module_id, self.initial);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_is_far_from_goal() {
        for instance_seed in 0..200 {
            let seeds = PuzzleSeeds {
                rule_seed: (instance_seed % 7) as i32,
                instance_seed,
            };
            let puzzle = Puzzle::from_seeds(seeds, &PuzzleConfig::classic()).unwrap();
            assert!(puzzle.rules().safe().contains(&puzzle.goal()));
            assert!(puzzle.rules().safe().contains(&puzzle.initial()));
            assert!(puzzle.initial().distance(&puzzle.goal()) >= 2);
        }
    }

    #[test]
    fn test_same_seeds_same_puzzle() {
        let seeds = PuzzleSeeds {
            rule_seed: 314,
            instance_seed: 2718,
        };
        let a = Puzzle::from_seeds(seeds, &PuzzleConfig::classic()).unwrap();
        let b = Puzzle::from_seeds(seeds, &PuzzleConfig::classic()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_small_cube_example() {
        let forbidden = ConfigurationSet::from_values(3, [5, 6]).unwrap();
        let rules = RuleSet::from_forbidden(forbidden).unwrap();
        assert_eq!(rules.safe().values(), vec![0, 1, 2, 3, 4, 7]);

        let first = Puzzle::generate(rules.clone(), &mut SimpleRng::with_seed(11)).unwrap();
        let second = Puzzle::generate(rules, &mut SimpleRng::with_seed(11)).unwrap();
        assert_eq!(first, second);
        assert!(first.initial().distance(&first.goal()) >= 2);
        assert!(!first.forbidden().contains(&first.initial()));
    }

    #[test]
    fn test_no_candidate() {
        // Only 0 and its neighbour 1 are safe
        let forbidden = ConfigurationSet::from_values(2, [2, 3]).unwrap();
        let rules = RuleSet::from_forbidden(forbidden).unwrap();
        let goal = Configuration::from_int(0, 2).unwrap();
        assert_eq!(
            pick_initial(rules.safe(), goal, &mut SimpleRng::with_seed(0)),
            Err(Error::NoCandidate)
        );
        assert_eq!(
            Puzzle::generate(rules, &mut SimpleRng::with_seed(0)),
            Err(Error::NoCandidate)
        );
    }

    #[test]
    fn test_two_safe_configurations_leave_no_start() {
        // The two survivors of thirty forbidden configurations are always adjacent
        let seeds = PuzzleSeeds {
            rule_seed: 12,
            instance_seed: 5,
        };
        let result = Puzzle::from_seeds(seeds, &PuzzleConfig::with_forbidden(30));
        assert_eq!(result, Err(Error::NoCandidate));
    }

    #[test]
    fn test_from_parts_checks_constraints() {
        let rules = RuleSet::from_seed(1, &PuzzleConfig::classic()).unwrap();
        let c = |v| Configuration::new(v).unwrap();
        assert!(Puzzle::from_parts(rules.clone(), c(31), c(0)).is_ok());
        // 4 is forbidden
        assert_eq!(
            Puzzle::from_parts(rules.clone(), c(31), c(4)),
            Err(Error::InvalidStart {
                goal: c(31),
                initial: c(4)
            })
        );
        assert_eq!(
            Puzzle::from_parts(rules.clone(), c(4), c(31)),
            Err(Error::InvalidStart {
                goal: c(4),
                initial: c(31)
            })
        );
        // 1 is adjacent to 0
        assert!(matches!(
            Puzzle::from_parts(rules, c(0), c(1)),
            Err(Error::InvalidStart { .. })
        ));
    }

    #[test]
    fn test_pick_goal_empty() {
        let empty = ConfigurationSet::empty(5).unwrap();
        assert_eq!(
            pick_goal(&empty, &mut SimpleRng::with_seed(3)),
            Err(Error::NoCandidate)
        );
    }
}
