use crate::{Configuration, ConfigurationSet, Error, Result};
use std::collections::{HashMap, VecDeque};

/// Shortest-path solver over the safe configurations.
pub struct Solver;

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    pub fn new() -> Self {
        Self
    }

    /// Switch indices to flip, in order, to get from `current` to `goal`
    /// without ever standing on a forbidden configuration.
    ///
    /// Breadth-first, exploring neighbours in switch order, so the path is
    /// shortest and ties go to the lowest switch index first discovered.
    pub fn solve(
        &self,
        current: Configuration,
        goal: Configuration,
        forbidden: &ConfigurationSet,
    ) -> Result<Vec<usize>> {
        if current == goal {
            return Ok(Vec::new());
        }

        let mut parents: HashMap<Configuration, Configuration> = HashMap::new();
        let mut discovered = ConfigurationSet::for_width(current.width() as u8);
        let mut queue = VecDeque::new();
        discovered.insert(current);
        queue.push_back(current);

        while let Some(config) = queue.pop_front() {
            if config == goal {
                return Ok(Self::reconstruct(current, goal, &parents));
            }
            for neighbor in config.neighbors() {
                if forbidden.contains(&neighbor) || !discovered.insert(neighbor) {
                    continue;
                }
                parents.insert(neighbor, config);
                queue.push_back(neighbor);
            }
        }

        log::error!("no safe path from {} to {}", current, goal);
        Err(Error::Unreachable {
            from: current,
            goal,
        })
    }

    fn reconstruct(
        start: Configuration,
        goal: Configuration,
        parents: &HashMap<Configuration, Configuration>,
    ) -> Vec<usize> {
        let mut path = Vec::new();
        let mut state = goal;
        while state != start {
            let parent = parents[&state];
            if let Some(switch) = parent.flipped_switch(&state) {
                path.push(switch);
            }
            state = parent;
        }
        path.reverse();
        path
    }
}

/// Replay `flips` from `start`, returning every configuration passed
/// through (start excluded).
pub fn apply_flips(start: Configuration, flips: &[usize]) -> Result<Vec<Configuration>> {
    let mut state = start;
    let mut trail = Vec::with_capacity(flips.len());
    for &switch in flips {
        state = state.toggled(switch)?;
        trail.push(state);
    }
    Ok(trail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PuzzleConfig, RuleSet};

    /// Distances from `goal` over safe configurations, for checking optimality
    fn distances(goal: Configuration, forbidden: &ConfigurationSet) -> HashMap<Configuration, usize> {
        let mut dist = HashMap::new();
        let mut queue = VecDeque::from([goal]);
        dist.insert(goal, 0);
        while let Some(config) = queue.pop_front() {
            let d = dist[&config];
            for neighbor in config.neighbors() {
                if !forbidden.contains(&neighbor) && !dist.contains_key(&neighbor) {
                    dist.insert(neighbor, d + 1);
                    queue.push_back(neighbor);
                }
            }
        }
        dist
    }

    #[test]
    fn test_solve_every_pair_is_safe_and_shortest() {
        let rules = RuleSet::from_seed(1, &PuzzleConfig::classic()).unwrap();
        let solver = Solver::new();
        for goal in rules.safe().iter() {
            let dist = distances(goal, rules.forbidden());
            for start in rules.safe().iter() {
                let path = solver.solve(start, goal, rules.forbidden()).unwrap();
                let trail = apply_flips(start, &path).unwrap();
                assert!(trail.iter().all(|c| !rules.forbidden().contains(c)));
                assert_eq!(trail.last().copied().unwrap_or(start), goal);
                assert_eq!(path.len(), dist[&start]);
            }
        }
    }

    #[test]
    fn test_solve_at_goal_is_empty() {
        let config = Configuration::new(7).unwrap();
        let forbidden = ConfigurationSet::empty(5).unwrap();
        assert_eq!(Solver::new().solve(config, config, &forbidden), Ok(vec![]));
    }

    #[test]
    fn test_ties_prefer_lower_switches() {
        let forbidden = ConfigurationSet::empty(3).unwrap();
        let start = Configuration::from_int(0, 3).unwrap();
        let goal = Configuration::from_int(0b111, 3).unwrap();
        assert_eq!(Solver::new().solve(start, goal, &forbidden), Ok(vec![0, 1, 2]));
    }

    #[test]
    fn test_detour_around_forbidden() {
        // 0 -> 3 directly goes through 1 or 2; forbid both and the path must
        // detour through the third switch
        let forbidden = ConfigurationSet::from_values(3, [1, 2]).unwrap();
        let start = Configuration::from_int(0, 3).unwrap();
        let goal = Configuration::from_int(3, 3).unwrap();
        let path = Solver::new().solve(start, goal, &forbidden).unwrap();
        assert_eq!(path, vec![2, 0, 1, 2]);
    }

    #[test]
    fn test_unreachable() {
        let forbidden = ConfigurationSet::from_values(2, [1, 2]).unwrap();
        let start = Configuration::from_int(0, 2).unwrap();
        let goal = Configuration::from_int(3, 2).unwrap();
        assert_eq!(
            Solver::new().solve(start, goal, &forbidden),
            Err(Error::Unreachable { from: start, goal })
        );
    }
}
