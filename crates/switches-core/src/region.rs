//! Safe-region generation.
//!
//! The safe region is grown by a depth-first walk over the hypercube that
//! pushes each vertex's neighbours in random order. Since every vertex joins
//! the region from an already visited neighbour, the region is connected and
//! any two safe configurations can be joined without touching a forbidden one.

use crate::configuration::{check_width, vertex_count};
use crate::rng::SeededRng;
use crate::{Configuration, ConfigurationSet, Result};

/// Ceiling on pop cycles before a walk gives up
pub const WALK_LIMIT: usize = 5000;

/// Result of a reachability walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionWalk {
    /// Where the walk started
    pub start: Configuration,
    /// Visited configurations in visit order
    pub visited: Vec<Configuration>,
    /// Number of configurations the walk tried to reach
    pub target: usize,
    /// Whether the walk hit [`WALK_LIMIT`] (or ran dry) before reaching `target`
    pub budget_exceeded: bool,
}

impl RegionWalk {
    /// The visited configurations as a set
    pub fn region(&self) -> ConfigurationSet {
        let mut set = ConfigurationSet::for_width(self.start.width() as u8);
        set.extend(self.visited.iter().copied());
        set
    }
}

/// Walk from `start` until `target` configurations have been visited.
///
/// Neighbours of each newly visited configuration are pushed in an order
/// drawn from `rng` without replacement: an index into the remaining
/// neighbours (kept in switch order) is drawn, that neighbour is pushed and
/// removed, and so on until none remain.
pub fn visit_configurations(
    start: Configuration,
    target: usize,
    limit: usize,
    rng: &mut impl SeededRng,
) -> RegionWalk {
    let target = target.min(vertex_count(start.width()));
    let mut visited = Vec::with_capacity(target);
    let mut seen = ConfigurationSet::for_width(start.width() as u8);
    let mut stack = vec![start];
    let mut loops = 0;

    while visited.len() < target {
        let Some(config) = stack.pop() else {
            log::error!(
                "region walk ran out of configurations after visiting {} of {}",
                visited.len(),
                target
            );
            break;
        };

        loops += 1;
        if loops > limit {
            log::error!(
                "too many loops while generating the safe region: visited {} of {}",
                visited.len(),
                target
            );
            break;
        }

        if !seen.insert(config) {
            continue;
        }
        visited.push(config);

        let mut neighbors: Vec<Configuration> = config.neighbors().collect();
        while !neighbors.is_empty() {
            let ix = rng.pick_index(neighbors.len());
            stack.push(neighbors.remove(ix));
        }
    }

    let budget_exceeded = visited.len() < target;
    RegionWalk {
        start,
        visited,
        target,
        budget_exceeded,
    }
}

/// Grow a safe region of `2^width - forbidden_count` configurations from a
/// start vertex drawn with `rng`.
pub fn generate_safe_region(
    width: usize,
    forbidden_count: usize,
    limit: usize,
    rng: &mut impl SeededRng,
) -> Result<RegionWalk> {
    let width = check_width(width)?;
    let total = vertex_count(width as usize);
    let start = Configuration::from_raw(rng.next_int(0, total as u32), width);
    let target = total.saturating_sub(forbidden_count);
    Ok(visit_configurations(start, target, limit, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{MonoRandom, SimpleRng};

    fn is_connected(region: &ConfigurationSet) -> bool {
        let Some(first) = region.iter().next() else {
            return true;
        };
        let mut reached = ConfigurationSet::empty(region.width()).unwrap();
        reached.insert(first);
        let mut stack = vec![first];
        while let Some(config) = stack.pop() {
            for neighbor in config.neighbors() {
                if region.contains(&neighbor) && reached.insert(neighbor) {
                    stack.push(neighbor);
                }
            }
        }
        reached == *region
    }

    #[test]
    fn test_region_size_and_connectivity() {
        for width in 1..=7 {
            let total = vertex_count(width);
            for forbidden in [0, 1, total / 3, total / 2, total - 1] {
                let mut rng = SimpleRng::with_seed((width * 100 + forbidden) as u64);
                let walk = generate_safe_region(width, forbidden, WALK_LIMIT, &mut rng).unwrap();
                assert!(!walk.budget_exceeded);
                let region = walk.region();
                assert_eq!(region.len(), total - forbidden, "width {width}, forbidden {forbidden}");
                assert!(is_connected(&region), "width {width}, forbidden {forbidden}");
                assert!(region.contains(&walk.start));
            }
        }
    }

    #[test]
    fn test_walk_order_starts_at_start() {
        let mut rng = MonoRandom::new(5);
        let start = Configuration::new(13).unwrap();
        let walk = visit_configurations(start, 20, WALK_LIMIT, &mut rng);
        assert_eq!(walk.visited[0], start);
        assert_eq!(walk.visited.len(), 20);
        for pair in walk.visited.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_walk_limit_reports_partial_region() {
        let mut rng = MonoRandom::new(5);
        let start = Configuration::new(0).unwrap();
        let walk = visit_configurations(start, 32, 3, &mut rng);
        assert!(walk.budget_exceeded);
        assert!(walk.visited.len() <= 3);
        assert_eq!(walk.visited[0], start);
    }

    #[test]
    fn test_target_is_capped_at_space_size() {
        let mut rng = SimpleRng::with_seed(1);
        let start = Configuration::from_int(2, 2).unwrap();
        let walk = visit_configurations(start, 100, WALK_LIMIT, &mut rng);
        assert_eq!(walk.target, 4);
        assert_eq!(walk.visited.len(), 4);
        assert!(!walk.budget_exceeded);
    }

    #[test]
    fn test_rule_seed_walks_match_reference() {
        // Start vertices and forbidden complements produced by an independent
        // implementation of the same walk
        let cases: [(i32, u32, [u32; 10]); 4] = [
            (2, 24, [2, 5, 6, 7, 12, 13, 15, 19, 23, 28]),
            (3, 9, [2, 7, 12, 18, 19, 20, 26, 27, 28, 30]),
            (42, 21, [2, 4, 6, 10, 12, 14, 20, 22, 26, 30]),
            (1000, 4, [3, 11, 12, 13, 14, 15, 19, 27, 28, 30]),
        ];
        for (seed, start, forbidden) in cases {
            let mut rng = MonoRandom::new(seed);
            let walk = generate_safe_region(5, 10, WALK_LIMIT, &mut rng).unwrap();
            assert_eq!(walk.start.value(), start, "seed {seed}");
            assert_eq!(walk.region().complement().values(), forbidden.to_vec(), "seed {seed}");
        }
    }
}
