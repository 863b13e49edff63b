use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of switches on the module
pub const SWITCH_COUNT: usize = 5;

/// Largest hypercube dimension the engine accepts
pub const MAX_DIMENSION: u8 = 16;

/// Validate a hypercube dimension and narrow it to the stored width.
pub(crate) fn check_width(width: usize) -> Result<u8> {
    if width == 0 || width > MAX_DIMENSION as usize {
        return Err(Error::InvalidDimension {
            width,
            max: MAX_DIMENSION,
        });
    }
    Ok(width as u8)
}

/// Number of vertices of the hypercube with `width` dimensions, saturating
/// at `usize::MAX` for widths past the pointer size.
pub fn vertex_count(width: usize) -> usize {
    u32::try_from(width)
        .ok()
        .and_then(|width| 1usize.checked_shl(width))
        .unwrap_or(usize::MAX)
}

/// One arrangement of up/down positions across all switches.
///
/// Stored as a single integer: bit `i` is switch `i`, counted from the
/// far-left switch, and a set bit means the switch is up. Every conversion
/// to and from bit arrays uses this least-significant-first order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "ConfigurationRepr", into = "ConfigurationRepr")]
pub struct Configuration {
    value: u32,
    width: u8,
}

#[derive(Serialize, Deserialize)]
struct ConfigurationRepr {
    value: u32,
    width: u8,
}

impl TryFrom<ConfigurationRepr> for Configuration {
    type Error = Error;

    fn try_from(repr: ConfigurationRepr) -> Result<Self> {
        Configuration::from_int(repr.value, repr.width as usize)
    }
}

impl From<Configuration> for ConfigurationRepr {
    fn from(config: Configuration) -> Self {
        Self {
            value: config.value,
            width: config.width,
        }
    }
}

impl Configuration {
    /// A configuration of the standard five-switch module
    pub fn new(value: u32) -> Result<Self> {
        Self::from_int(value, SWITCH_COUNT)
    }

    /// Wrap an integer as a configuration of `width` switches.
    pub fn from_int(value: u32, width: usize) -> Result<Self> {
        let width = check_width(width)?;
        if value as usize >= vertex_count(width as usize) {
            return Err(Error::OutOfRange { value, width });
        }
        Ok(Self { value, width })
    }

    /// Caller guarantees `value < 2^width` and a valid width.
    pub(crate) fn from_raw(value: u32, width: u8) -> Self {
        debug_assert!((value as usize) < vertex_count(width as usize));
        Self { value, width }
    }

    /// Pack switch positions, `bits[i]` being switch `i`.
    pub fn from_bits(bits: &[bool]) -> Result<Self> {
        let width = check_width(bits.len())?;
        let mut value = 0u32;
        for (i, up) in bits.iter().enumerate() {
            if *up {
                value |= 1 << i;
            }
        }
        Ok(Self { value, width })
    }

    /// Unpack into one position per switch, inverse of [`Configuration::from_bits`].
    pub fn to_bits(&self) -> Vec<bool> {
        (0..self.width()).map(|i| self.is_up(i)).collect()
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Number of switches
    pub fn width(&self) -> usize {
        self.width as usize
    }

    /// Whether switch `switch` is up. Out-of-range switches read as down.
    pub fn is_up(&self, switch: usize) -> bool {
        switch < self.width() && self.value & (1 << switch) != 0
    }

    /// The configuration reached by flipping one switch.
    pub fn toggled(&self, switch: usize) -> Result<Self> {
        if switch >= self.width() {
            return Err(Error::SwitchOutOfRange {
                index: switch,
                count: self.width(),
            });
        }
        Ok(Self::from_raw(self.value ^ (1 << switch), self.width))
    }

    /// All configurations one flip away, in switch order.
    pub fn neighbors(&self) -> impl Iterator<Item = Configuration> + '_ {
        (0..self.width()).map(move |i| Self::from_raw(self.value ^ (1 << i), self.width))
    }

    /// Two configurations are adjacent when exactly one switch differs.
    pub fn is_adjacent(&self, other: &Configuration) -> bool {
        self.width == other.width && (self.value ^ other.value).is_power_of_two()
    }

    /// Hamming distance: how many switches differ
    pub fn distance(&self, other: &Configuration) -> u32 {
        (self.value ^ other.value).count_ones()
    }

    /// The switch separating two adjacent configurations.
    pub fn flipped_switch(&self, other: &Configuration) -> Option<usize> {
        self.is_adjacent(other)
            .then(|| (self.value ^ other.value).trailing_zeros() as usize)
    }

    /// Human-readable position of each switch, left to right.
    pub fn describe(&self) -> Vec<&'static str> {
        (0..self.width())
            .map(|i| if self.is_up(i) { "up" } else { "down" })
            .collect()
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe().join("/"))
    }
}
