use crate::configuration::{check_width, vertex_count};
use crate::{Configuration, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A set of configurations of one hypercube, one bit per vertex.
///
/// Iteration always runs in ascending integer order. Random picks over a set
/// index into that order, which keeps draws reproducible across
/// implementations.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ConfigurationSetRepr", into = "ConfigurationSetRepr")]
pub struct ConfigurationSet {
    width: u8,
    words: Vec<u64>,
}

#[derive(Serialize, Deserialize)]
struct ConfigurationSetRepr {
    width: u8,
    words: Vec<u64>,
}

impl TryFrom<ConfigurationSetRepr> for ConfigurationSet {
    type Error = Error;

    fn try_from(repr: ConfigurationSetRepr) -> Result<Self> {
        let mut set = Self::empty(repr.width as usize)?;
        if repr.words.len() != set.words.len() {
            return Err(Error::MalformedSet {
                width: repr.width,
                expected: set.words.len(),
                found: repr.words.len(),
            });
        }
        set.words = repr.words;
        set.mask_tail();
        Ok(set)
    }
}

impl From<ConfigurationSet> for ConfigurationSetRepr {
    fn from(set: ConfigurationSet) -> Self {
        Self {
            width: set.width,
            words: set.words,
        }
    }
}

impl ConfigurationSet {
    /// An empty set over the hypercube with `width` dimensions
    pub fn empty(width: usize) -> Result<Self> {
        Ok(Self::for_width(check_width(width)?))
    }

    /// Caller guarantees a width already accepted by `check_width`.
    pub(crate) fn for_width(width: u8) -> Self {
        Self {
            width,
            words: vec![0; vertex_count(width as usize).div_ceil(64)],
        }
    }

    /// Every configuration of the hypercube
    pub fn full(width: usize) -> Result<Self> {
        Ok(Self::empty(width)?.complement())
    }

    /// Build a set from raw integer values, rejecting any out of range.
    pub fn from_values(width: usize, values: impl IntoIterator<Item = u32>) -> Result<Self> {
        let mut set = Self::empty(width)?;
        for value in values {
            set.insert(Configuration::from_int(value, width)?);
        }
        Ok(set)
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    /// Total number of vertices in the underlying space
    pub fn capacity(&self) -> usize {
        vertex_count(self.width())
    }

    fn slot(config: &Configuration) -> (usize, u64) {
        let value = config.value() as usize;
        (value / 64, 1u64 << (value % 64))
    }

    /// Insert a configuration, returning `true` if it was not yet present.
    pub fn insert(&mut self, config: Configuration) -> bool {
        debug_assert_eq!(config.width(), self.width());
        let (word, mask) = Self::slot(&config);
        let fresh = self.words[word] & mask == 0;
        self.words[word] |= mask;
        fresh
    }

    /// Remove a configuration, returning `true` if it was present.
    pub fn remove(&mut self, config: &Configuration) -> bool {
        if !self.contains(config) {
            return false;
        }
        let (word, mask) = Self::slot(config);
        self.words[word] &= !mask;
        true
    }

    pub fn contains(&self, config: &Configuration) -> bool {
        if config.width() != self.width() {
            return false;
        }
        let (word, mask) = Self::slot(config);
        self.words[word] & mask != 0
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Every configuration of the space not in this set
    pub fn complement(&self) -> Self {
        let mut set = Self {
            width: self.width,
            words: self.words.iter().map(|w| !w).collect(),
        };
        set.mask_tail();
        set
    }

    /// Clear bits past the last vertex of the space.
    fn mask_tail(&mut self) {
        let capacity = self.capacity();
        if capacity % 64 != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << (capacity % 64)) - 1;
            }
        }
    }

    /// Configurations in ascending integer order
    pub fn iter(&self) -> impl Iterator<Item = Configuration> + '_ {
        let width = self.width;
        (0..self.capacity() as u32)
            .map(move |value| Configuration::from_raw(value, width))
            .filter(move |config| self.contains(config))
    }

    /// Materialize the set in ascending order.
    pub fn to_vec(&self) -> Vec<Configuration> {
        self.iter().collect()
    }

    /// The raw integer values in ascending order.
    pub fn values(&self) -> Vec<u32> {
        self.iter().map(|c| c.value()).collect()
    }

    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.width == other.width && self.words.iter().zip(&other.words).all(|(a, b)| a & b == 0)
    }
}

impl fmt::Debug for ConfigurationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values()).finish()
    }
}

impl Extend<Configuration> for ConfigurationSet {
    fn extend<I: IntoIterator<Item = Configuration>>(&mut self, iter: I) {
        for config in iter {
            self.insert(config);
        }
    }
}
