use crate::configuration::{check_width, vertex_count, SWITCH_COUNT};
use crate::region::WALK_LIMIT;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for rule generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// Number of switches (hypercube dimension)
    pub switch_count: usize,
    /// How many configurations are forbidden
    pub forbidden_count: usize,
    /// Maximum pop cycles of the region walk
    pub walk_limit: usize,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl PuzzleConfig {
    /// Five switches, ten forbidden configurations. This is the shape every
    /// rule-seeded copy of the module agrees on.
    pub fn classic() -> Self {
        Self {
            switch_count: SWITCH_COUNT,
            forbidden_count: 10,
            walk_limit: WALK_LIMIT,
        }
    }

    /// Same module with a custom forbidden count
    pub fn with_forbidden(forbidden_count: usize) -> Self {
        Self {
            forbidden_count,
            ..Self::classic()
        }
    }

    /// Five switches and ten forbidden configurations, any walk limit.
    pub fn is_classic_shape(&self) -> bool {
        let classic = Self::classic();
        self.switch_count == classic.switch_count && self.forbidden_count == classic.forbidden_count
    }

    /// Number of configurations in the space, saturating for oversized
    /// dimensions.
    pub fn total(&self) -> usize {
        vertex_count(self.switch_count)
    }

    /// Size of the safe region, zero when everything is forbidden.
    pub fn safe_count(&self) -> usize {
        self.total().saturating_sub(self.forbidden_count)
    }

    /// Check the dimension and that at least one configuration stays safe.
    pub fn validate(&self) -> Result<()> {
        check_width(self.switch_count)?;
        if self.forbidden_count >= self.total() {
            return Err(Error::InvalidForbiddenCount {
                forbidden: self.forbidden_count,
                total: self.total(),
            });
        }
        Ok(())
    }
}
