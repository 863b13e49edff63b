//! Rule sets: which configurations are forbidden for a given rule seed.

use crate::region::generate_safe_region;
use crate::rng::MonoRandom;
use crate::{ConfigurationSet, Error, PuzzleConfig, Result};

/// Rule seed of the published manual
pub const DEFAULT_RULE_SEED: i32 = 1;

/// Forbidden configurations listed in the published manual
pub const PUBLISHED_FORBIDDEN: [u32; 10] = [4, 26, 30, 9, 25, 29, 3, 11, 7, 15];

/// The forbidden/safe partition shared by every bomb using one rule seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    seed: Option<i32>,
    forbidden: ConfigurationSet,
    safe: ConfigurationSet,
}

impl RuleSet {
    /// Derive the rules for `seed`.
    ///
    /// With the classic shape, [`DEFAULT_RULE_SEED`] returns the published
    /// forbidden set instead of running the walk, whatever the walk limit. Any other seed grows a safe
    /// region with [`MonoRandom`]. An undersized region is an error: a
    /// different seed is a different puzzle, so there is no retry.
    pub fn from_seed(seed: i32, config: &PuzzleConfig) -> Result<Self> {
        config.validate()?;

        if seed == DEFAULT_RULE_SEED && config.is_classic_shape() {
            let forbidden = ConfigurationSet::from_values(config.switch_count, PUBLISHED_FORBIDDEN)?;
            return Ok(Self::with_seed(Some(seed), forbidden));
        }

        let mut rng = MonoRandom::new(seed);
        let walk = generate_safe_region(
            config.switch_count,
            config.forbidden_count,
            config.walk_limit,
            &mut rng,
        )?;
        if walk.budget_exceeded {
            return Err(Error::GenerationBudgetExceeded {
                visited: walk.visited.len(),
                target: walk.target,
            });
        }

        log::debug!("rule seed {} grew its safe region from {}", seed, walk.start);
        Ok(Self::with_seed(Some(seed), walk.region().complement()))
    }

    /// Rules from an explicit forbidden set.
    pub fn from_forbidden(forbidden: ConfigurationSet) -> Result<Self> {
        if forbidden.len() >= forbidden.capacity() {
            return Err(Error::InvalidForbiddenCount {
                forbidden: forbidden.len(),
                total: forbidden.capacity(),
            });
        }
        let rules = Self::with_seed(None, forbidden);
        if !rules.is_connected() {
            log::warn!("safe configurations {:?} are not connected", rules.safe);
        }
        Ok(rules)
    }

    fn with_seed(seed: Option<i32>, forbidden: ConfigurationSet) -> Self {
        let safe = forbidden.complement();
        Self {
            seed,
            forbidden,
            safe,
        }
    }

    /// The rule seed these rules came from, if any
    pub fn seed(&self) -> Option<i32> {
        self.seed
    }

    pub fn forbidden(&self) -> &ConfigurationSet {
        &self.forbidden
    }

    pub fn safe(&self) -> &ConfigurationSet {
        &self.safe
    }

    pub fn switch_count(&self) -> usize {
        self.forbidden.width()
    }

    /// Whether every safe configuration reaches every other through safe ones.
    pub fn is_connected(&self) -> bool {
        let Some(first) = self.safe.iter().next() else {
            return true;
        };
        let mut reached = ConfigurationSet::for_width(self.switch_count() as u8);
        reached.insert(first);
        let mut stack = vec![first];
        while let Some(config) = stack.pop() {
            for neighbor in config.neighbors() {
                if self.safe.contains(&neighbor) && reached.insert(neighbor) {
                    stack.push(neighbor);
                }
            }
        }
        reached.len() == self.safe.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_seed_is_published_set() {
        let rules = RuleSet::from_seed(DEFAULT_RULE_SEED, &PuzzleConfig::classic()).unwrap();
        let mut expected = PUBLISHED_FORBIDDEN.to_vec();
        expected.sort_unstable();
        assert_eq!(rules.forbidden().values(), expected);
        assert_eq!(rules.safe().len(), 22);
        assert!(rules.is_connected());
        assert_eq!(rules.seed(), Some(1));
    }

    #[rstest]
    #[case(2)]
    #[case(6000)]
    fn test_default_seed_ignores_walk_limit(#[case] walk_limit: usize) {
        let config = PuzzleConfig {
            walk_limit,
            ..PuzzleConfig::classic()
        };
        let rules = RuleSet::from_seed(DEFAULT_RULE_SEED, &config).unwrap();
        assert_eq!(rules.forbidden().values(), vec![3, 4, 7, 9, 11, 15, 25, 26, 29, 30]);
    }

    #[rstest]
    #[case(2)]
    #[case(3)]
    #[case(77)]
    #[case(-5)]
    #[case(i32::MAX)]
    #[case(i32::MIN)]
    fn test_seeded_rules_partition_and_connect(#[case] seed: i32) {
        let config = PuzzleConfig::classic();
        let rules = RuleSet::from_seed(seed, &config).unwrap();
        assert_eq!(rules.forbidden().len(), 10);
        assert_eq!(rules.safe().len(), 22);
        assert!(rules.safe().is_disjoint(rules.forbidden()));
        assert_eq!(rules.safe().len() + rules.forbidden().len(), 32);
        assert!(rules.is_connected());
    }

    #[test]
    fn test_same_seed_same_rules() {
        let config = PuzzleConfig::with_forbidden(16);
        assert_eq!(
            RuleSet::from_seed(99, &config).unwrap(),
            RuleSet::from_seed(99, &config).unwrap()
        );
    }

    #[test]
    fn test_seed_one_with_other_shape_runs_generation() {
        let rules = RuleSet::from_seed(1, &PuzzleConfig::with_forbidden(30)).unwrap();
        assert_eq!(rules.forbidden().len(), 30);
        assert!(rules.is_connected());
    }

    #[test]
    fn test_walk_budget_is_fatal() {
        let config = PuzzleConfig {
            walk_limit: 2,
            ..PuzzleConfig::classic()
        };
        assert!(matches!(
            RuleSet::from_seed(7, &config),
            Err(Error::GenerationBudgetExceeded { target: 22, .. })
        ));
    }

    #[test]
    fn test_from_forbidden() {
        let forbidden = ConfigurationSet::from_values(3, [5, 6]).unwrap();
        let rules = RuleSet::from_forbidden(forbidden).unwrap();
        assert_eq!(rules.safe().values(), vec![0, 1, 2, 3, 4, 7]);
        assert!(rules.is_connected());
        assert_eq!(rules.seed(), None);

        let everything = ConfigurationSet::full(3).unwrap();
        assert!(RuleSet::from_forbidden(everything).is_err());
    }
}
