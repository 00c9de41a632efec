// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time systems and their epoch offsets.
//!
//! Transit searches report epochs in truncated day counts whose zero-point
//! is shifted from the Julian Date. The shift is the **epoch offset**:
//!
//! ```text
//! value_in_system = JD + offset
//! ```
//!
//! | Marker | Label | Offset (d) |
//! |--------|-------|------------|
//! | [`BJD`] | `bjd` | 0.0 |
//! | [`BKJD`] | `bkjd` | −2 454 833.0 |
//! | [`BTJD`] | `btjd` | −2 457 000.0 |
//! | [`MJD`] | `mjd` | −2 400 000.5 |
//! | [`JD`] | `jd` | 0.0 |
//!
//! Barycentric corrections are out of scope: `BJD` and `JD` share the
//! zero offset and only differ by label.

use qtty::Days;

use crate::error::{TceError, TceResult};
use crate::quantity::Quantity;
use crate::units::Unit;

/// Marker trait for a named time system.
pub trait TimeSystem: Copy + Clone + std::fmt::Debug + 'static {
    /// Lower-case label used by catalogs and [`EpochOffset::from_label`].
    const LABEL: &'static str;

    /// Offset of the system relative to Julian Date.
    const OFFSET: Days;

    /// Convert a value in this system to a Julian Date.
    #[inline]
    fn to_jd(value: Days) -> Days {
        value - Self::OFFSET
    }

    /// Convert a Julian Date to this system.
    #[inline]
    fn from_jd(jd: Days) -> Days {
        jd + Self::OFFSET
    }
}

/// Julian Date.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct JD;

/// Barycentric Julian Date.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BJD;

/// Modified Julian Date — JD minus 2 400 000.5.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MJD;

/// Barycentric Kepler Julian Date — BJD minus 2 454 833.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BKJD;

/// Barycentric TESS Julian Date — BJD minus 2 457 000.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BTJD;

macro_rules! impl_time_system {
    ($($marker:ty => ($label:literal, $offset:expr)),+ $(,)?) => {
        $(
            impl TimeSystem for $marker {
                const LABEL: &'static str = $label;
                const OFFSET: Days = Days::new($offset);
            }
        )+

        /// `(label, offset in days)` for every registered system.
        const REGISTRY: &[(&str, f64)] = &[$(($label, $offset)),+];
    };
}

impl_time_system!(
    BJD => ("bjd", 0.0),
    BKJD => ("bkjd", -2_454_833.0),
    BTJD => ("btjd", -2_457_000.0),
    MJD => ("mjd", -2_400_000.5),
    JD => ("jd", 0.0),
);

/// Zero-point of the time system an epoch is expressed in.
///
/// Always carried next to the epoch: two epochs are comparable only after
/// each is shifted back by its own offset.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EpochOffset(Quantity);

impl EpochOffset {
    /// The zero offset (raw Julian Date).
    pub const ZERO: Self = Self::days(0.0);

    #[inline]
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self(Quantity::new(value, unit))
    }

    #[inline]
    pub const fn days(value: f64) -> Self {
        Self(Quantity::days(value))
    }

    #[inline]
    pub const fn from_quantity(quantity: Quantity) -> Self {
        Self(quantity)
    }

    /// The offset registered for time system `S`.
    #[inline]
    pub const fn of<S: TimeSystem>() -> Self {
        Self::days(S::OFFSET.value())
    }

    /// Look up a registered time system by label, ignoring case.
    pub fn from_label(label: &str) -> TceResult<Self> {
        let wanted = label.trim().to_ascii_lowercase();
        REGISTRY
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|&(_, offset)| Self::days(offset))
            .ok_or_else(|| TceError::UnknownTimeSystem {
                label: label.to_string(),
            })
    }

    /// Label of the registered system with this offset.
    ///
    /// `None` when no system matches, and also when several do: BJD and JD
    /// both sit at zero, so a zero offset carries no label.
    pub fn label(&self) -> Option<&'static str> {
        let mut matches = REGISTRY
            .iter()
            .filter(|&&(_, offset)| Self::days(offset) == *self)
            .map(|&(name, _)| name);
        match (matches.next(), matches.next()) {
            (Some(name), None) => Some(name),
            _ => None,
        }
    }

    #[inline]
    pub const fn quantity(&self) -> Quantity {
        self.0
    }

    #[inline]
    pub const fn value(&self) -> f64 {
        self.0.value()
    }

    #[inline]
    pub const fn unit(&self) -> Unit {
        self.0.unit()
    }

    /// The offset in days, if its unit is a time unit.
    #[inline]
    pub fn as_days(&self) -> Option<Days> {
        self.0.value_in(Unit::Day).map(Days::new)
    }

    /// Move `epoch` (a time quantity in the `self` system) into `target`.
    ///
    /// The result keeps the unit of `epoch`. Returns `None` if any operand
    /// is not a time quantity.
    pub fn shift(&self, epoch: Quantity, target: EpochOffset) -> Option<Quantity> {
        let from = self.as_days()?;
        let to = target.as_days()?;
        let days = Days::new(epoch.value_in(Unit::Day)?) - from + to;
        days_in(days, epoch.unit())
    }
}

fn days_in(days: Days, unit: Unit) -> Option<Quantity> {
    Quantity::days(days.value()).to(unit)
}

impl From<Quantity> for EpochOffset {
    fn from(quantity: Quantity) -> Self {
        Self(quantity)
    }
}

impl std::fmt::Display for EpochOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.label() {
            Some(label) => write!(f, "{} ({label})", self.0),
            None => write!(f, "{}", self.0),
        }
    }
}
