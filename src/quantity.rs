// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! A numeric value tagged with its [`Unit`].
//!
//! A [`Quantity`] keeps the unit it was built with: nothing in the crate
//! converts a stored value implicitly. Conversion only happens on request
//! ([`Quantity::to`]) and for comparison, where both sides are normalised
//! to the canonical unit of their dimension.

use crate::units::{Dimension, Unit};

/// Relative tolerance applied when comparing canonicalised values.
///
/// Converting between units costs at most a few ulps, so two quantities
/// that describe the same physical value compare equal even if one side
/// went through a unit conversion.
const REL_TOLERANCE: f64 = 8.0 * f64::EPSILON;

#[derive(Debug, Copy, Clone)]
pub struct Quantity {
    value: f64,
    unit: Unit,
}

impl Quantity {
    #[inline]
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    #[inline]
    pub const fn days(value: f64) -> Self {
        Self::new(value, Unit::Day)
    }

    #[inline]
    pub const fn hours(value: f64) -> Self {
        Self::new(value, Unit::Hour)
    }

    /// A plain fractional amplitude.
    #[inline]
    pub const fn fraction(value: f64) -> Self {
        Self::new(value, Unit::Dimensionless)
    }

    #[inline]
    pub const fn ppm(value: f64) -> Self {
        Self::new(value, Unit::PartsPerMillion)
    }

    /// The stored value, in [`Quantity::unit`].
    #[inline]
    pub const fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub const fn unit(&self) -> Unit {
        self.unit
    }

    #[inline]
    pub const fn dimension(&self) -> Dimension {
        self.unit.dimension()
    }

    /// The value expressed in the canonical unit of the dimension
    /// (days or fraction).
    #[inline]
    pub fn canonical_value(&self) -> f64 {
        self.unit.to_canonical(self.value)
    }

    /// Re-express this quantity in `target`.
    ///
    /// Returns `None` when `target` belongs to another dimension.
    pub fn to(&self, target: Unit) -> Option<Quantity> {
        self.unit
            .convert(self.value, target)
            .map(|value| Quantity::new(value, target))
    }

    /// The value in `target`, if the dimensions agree.
    #[inline]
    pub fn value_in(&self, target: Unit) -> Option<f64> {
        self.unit.convert(self.value, target)
    }

    /// `true` for a finite value.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.value.is_finite()
    }
}

fn nearly_equal(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    (a - b).abs() <= REL_TOLERANCE * a.abs().max(b.abs())
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.dimension() == other.dimension()
            && nearly_equal(self.canonical_value(), other.canonical_value())
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.unit.symbol().is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.unit)
        }
    }
}
