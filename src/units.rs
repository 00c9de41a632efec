// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Units of measure carried by TCE quantities.
//!
//! Two dimensions are modelled:
//!
//! | Dimension | Units | Canonical |
//! |-----------|-------|-----------|
//! | [`Dimension::Time`] | `d`, `h`, `min`, `s` | day |
//! | [`Dimension::Dimensionless`] | `""`, `ppm`, `%` | fraction |
//!
//! Unit algebra is delegated to [`qtty`] for the time dimension; the
//! dimensionless scales are plain multiplicative factors.
//!
//! The [`UnitSystem`] trait is the seam through which records parse unit
//! symbols and resolve named epoch offsets. [`StandardUnits`] is the
//! implementation used when no other system is supplied.

use qtty::{Day, Days, Hours, Minutes, Seconds};

use crate::error::{TceError, TceResult};
use crate::time_system::EpochOffset;

/// Physical dimension of a [`Unit`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Dimension {
    Time,
    Dimensionless,
}

/// A unit of measure understood by the record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Unit {
    Day,
    Hour,
    Minute,
    Second,
    /// Plain fraction (`1e-6` is one part per million).
    Dimensionless,
    PartsPerMillion,
    Percent,
}

impl Unit {
    /// Every supported unit, in a stable order.
    pub const ALL: [Unit; 7] = [
        Unit::Day,
        Unit::Hour,
        Unit::Minute,
        Unit::Second,
        Unit::Dimensionless,
        Unit::PartsPerMillion,
        Unit::Percent,
    ];

    /// Canonical symbol written to the serial form.
    pub const fn symbol(self) -> &'static str {
        match self {
            Unit::Day => "d",
            Unit::Hour => "h",
            Unit::Minute => "min",
            Unit::Second => "s",
            Unit::Dimensionless => "",
            Unit::PartsPerMillion => "ppm",
            Unit::Percent => "%",
        }
    }

    pub const fn dimension(self) -> Dimension {
        match self {
            Unit::Day | Unit::Hour | Unit::Minute | Unit::Second => Dimension::Time,
            Unit::Dimensionless | Unit::PartsPerMillion | Unit::Percent => {
                Dimension::Dimensionless
            }
        }
    }

    /// Express `value` (in `self`) in the canonical unit of the dimension.
    pub fn to_canonical(self, value: f64) -> f64 {
        match self {
            Unit::Day => value,
            Unit::Hour => Hours::new(value).to::<Day>().value(),
            Unit::Minute => Minutes::new(value).to::<Day>().value(),
            Unit::Second => Seconds::new(value).to::<Day>().value(),
            Unit::Dimensionless => value,
            Unit::PartsPerMillion => value * 1e-6,
            Unit::Percent => value * 1e-2,
        }
    }

    /// Express a canonical `value` in `self`.
    pub fn from_canonical(self, value: f64) -> f64 {
        let days = Days::new(value);
        match self {
            Unit::Day => value,
            Unit::Hour => days.to::<qtty::Hour>().value(),
            Unit::Minute => days.to::<qtty::Minute>().value(),
            Unit::Second => days.to::<qtty::Second>().value(),
            Unit::Dimensionless => value,
            Unit::PartsPerMillion => value * 1e6,
            Unit::Percent => value * 1e2,
        }
    }

    /// Convert `value` from `self` to `target`.
    ///
    /// Returns `None` when the two units have different dimensions.
    pub fn convert(self, value: f64, target: Unit) -> Option<f64> {
        if self == target {
            return Some(value);
        }
        if self.dimension() != target.dimension() {
            return None;
        }
        Some(target.from_canonical(self.to_canonical(value)))
    }

    /// Parse a symbol or one of its common spellings.
    ///
    /// Matching is case-sensitive for the canonical symbols and accepts the
    /// long names written by other tools (`"day"`, `"hours"`, ...).
    pub fn from_symbol(symbol: &str) -> Option<Unit> {
        let unit = match symbol.trim() {
            "d" | "day" | "days" => Unit::Day,
            "h" | "hr" | "hour" | "hours" => Unit::Hour,
            "min" | "minute" | "minutes" => Unit::Minute,
            "s" | "sec" | "second" | "seconds" => Unit::Second,
            "" | "dimensionless" | "fraction" => Unit::Dimensionless,
            "ppm" => Unit::PartsPerMillion,
            "%" | "percent" => Unit::Percent,
            _ => return None,
        };
        Some(unit)
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unit-system service used by a record to parse symbols and resolve
/// named epoch offsets.
pub trait UnitSystem {
    /// Resolve a serialised unit symbol.
    fn parse_unit(&self, symbol: &str) -> TceResult<Unit>;

    /// Symbol written to the serial form for `unit`. Whatever this returns
    /// must be accepted back by [`UnitSystem::parse_unit`].
    fn symbol(&self, unit: Unit) -> &'static str {
        unit.symbol()
    }

    /// Resolve a named time system (`"bkjd"`, `"btjd"`, ...) to its offset.
    fn named_offset(&self, label: &str) -> TceResult<EpochOffset>;
}

/// The built-in unit system: the [`Unit`] set plus the offsets registered
/// in [`crate::time_system`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct StandardUnits;

impl UnitSystem for StandardUnits {
    fn parse_unit(&self, symbol: &str) -> TceResult<Unit> {
        Unit::from_symbol(symbol).ok_or_else(|| TceError::UnknownUnit {
            symbol: symbol.to_string(),
        })
    }

    fn named_offset(&self, label: &str) -> TceResult<EpochOffset> {
        EpochOffset::from_label(label)
    }
}
