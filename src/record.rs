// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The Threshold Crossing Event record.
//!
//! A [`Tce`] holds five required quantities (period, epoch, epoch offset,
//! depth, duration), a few optional descriptive fields, and an ordered bag
//! of named extension [`Field`]s.
//!
//! Records may be built incomplete. [`Tce::validate`] is the gate a caller
//! checks before handing a record to a vetter; it never fails, it answers.
//!
//! # Equality
//!
//! Equality is field-wise with unit normalisation: `5.3 d` equals `127.2 h`.
//! The epoch and its offset are compared as two separate fields, so the same
//! instant written in BKJD and in BTJD yields *unequal* records. Use
//! [`Tce::same_transit_epoch`] to compare transit times across systems.

use chrono::{DateTime, Utc};
use qtty::{Days, Second};

use crate::error::{TceError, TceResult};
use crate::quantity::Quantity;
use crate::time_system::EpochOffset;
use crate::units::{Dimension, Unit};

/// Names of the fixed fields, in declaration (and serialisation) order.
pub const FIXED_FIELDS: [&str; 9] = [
    "period",
    "epoch",
    "epoch_offset",
    "depth",
    "duration",
    "snr",
    "event_name",
    "target_name",
    "comment",
];

/// The five fields [`Tce::validate`] requires.
pub const REQUIRED_FIELDS: [&str; 5] = ["period", "epoch", "epoch_offset", "depth", "duration"];

/// Suffix of the companion key holding a quantity's unit in the serial form.
pub const UNIT_SUFFIX: &str = "_unit";

/// JD of the Unix epoch (1970-01-01T00:00:00Z).
const UNIX_EPOCH_JD: Days = Days::new(2_440_587.5);

/// Value of an extension field.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Quantity(Quantity),
    Number(f64),
    Text(String),
}

impl From<Quantity> for Field {
    fn from(q: Quantity) -> Self {
        Field::Quantity(q)
    }
}

impl From<f64> for Field {
    fn from(v: f64) -> Self {
        Field::Number(v)
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field::Text(s.to_string())
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Field::Text(s)
    }
}

/// `true` if `name` cannot be used for an extension field.
pub fn is_reserved_name(name: &str) -> bool {
    FIXED_FIELDS.contains(&name) || name.ends_with(UNIT_SUFFIX) || name.is_empty()
}

/// A Threshold Crossing Event.
#[derive(Debug, Clone, Default)]
pub struct Tce {
    pub(crate) period: Option<Quantity>,
    pub(crate) epoch: Option<Quantity>,
    pub(crate) epoch_offset: Option<EpochOffset>,
    pub(crate) depth: Option<Quantity>,
    pub(crate) duration: Option<Quantity>,
    pub(crate) snr: Option<f64>,
    pub(crate) event_name: Option<String>,
    pub(crate) target_name: Option<String>,
    pub(crate) comment: Option<String>,
    pub(crate) extensions: Vec<(String, Field)>,
}

impl Tce {
    // ── constructors ──────────────────────────────────────────────────

    /// A record with every required field populated.
    pub fn new(
        period: Quantity,
        epoch: Quantity,
        epoch_offset: EpochOffset,
        depth: Quantity,
        duration: Quantity,
    ) -> Self {
        Self {
            period: Some(period),
            epoch: Some(epoch),
            epoch_offset: Some(epoch_offset),
            depth: Some(depth),
            duration: Some(duration),
            ..Self::default()
        }
    }

    /// A record with no field set, to be populated later.
    pub fn empty() -> Self {
        Self::default()
    }

    // ── builders ──────────────────────────────────────────────────────

    /// Set the orbital period.
    pub fn with_period(mut self, period: Quantity) -> Self {
        self.period = Some(period);
        self
    }

    /// Set the transit epoch together with the offset it is counted from.
    pub fn with_epoch(mut self, epoch: Quantity, offset: EpochOffset) -> Self {
        self.epoch = Some(epoch);
        self.epoch_offset = Some(offset);
        self
    }

    /// Set the transit depth, a dimensionless fraction.
    pub fn with_depth(mut self, depth: Quantity) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Set the transit duration.
    pub fn with_duration(mut self, duration: Quantity) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Set the detection signal-to-noise ratio.
    pub fn with_snr(mut self, snr: f64) -> Self {
        self.snr = Some(snr);
        self
    }

    /// Set the event identifier, e.g. `K00010.01`.
    pub fn with_event_name(mut self, name: impl Into<String>) -> Self {
        self.event_name = Some(name.into());
        self
    }

    /// Set the name of the observed star.
    pub fn with_target_name(mut self, name: impl Into<String>) -> Self {
        self.target_name = Some(name.into());
        self
    }

    /// Attach a free-text note.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Attach an extension field, see [`Tce::insert_extension`].
    pub fn with_extension(mut self, name: &str, field: impl Into<Field>) -> TceResult<Self> {
        self.insert_extension(name, field)?;
        Ok(self)
    }

    // ── setters ───────────────────────────────────────────────────────

    /// Replace or clear the period.
    pub fn set_period(&mut self, period: Option<Quantity>) {
        self.period = period;
    }

    /// Replace or clear the epoch, leaving the offset untouched.
    pub fn set_epoch(&mut self, epoch: Option<Quantity>) {
        self.epoch = epoch;
    }

    /// Replace or clear the epoch offset.
    pub fn set_epoch_offset(&mut self, offset: Option<EpochOffset>) {
        self.epoch_offset = offset;
    }

    /// Replace or clear the depth.
    pub fn set_depth(&mut self, depth: Option<Quantity>) {
        self.depth = depth;
    }

    /// Replace or clear the duration.
    pub fn set_duration(&mut self, duration: Option<Quantity>) {
        self.duration = duration;
    }

    /// Replace or clear the signal-to-noise ratio.
    pub fn set_snr(&mut self, snr: Option<f64>) {
        self.snr = snr;
    }

    /// Replace or clear the event identifier.
    pub fn set_event_name(&mut self, name: Option<String>) {
        self.event_name = name;
    }

    /// Replace or clear the target name.
    pub fn set_target_name(&mut self, name: Option<String>) {
        self.target_name = name;
    }

    /// Replace or clear the comment.
    pub fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
    }

    /// Insert or replace a named extension field.
    ///
    /// A replaced field keeps its original position. Names of fixed fields
    /// and names ending in `_unit` are refused, and so are plain numbers that
    /// are NaN or infinite: none of them could survive the serial form.
    pub fn insert_extension(&mut self, name: &str, field: impl Into<Field>) -> TceResult<()> {
        if is_reserved_name(name) {
            tracing::warn!(field = name, "refusing reserved extension field name");
            return Err(TceError::ReservedFieldName {
                name: name.to_string(),
            });
        }
        let field = field.into();
        if matches!(field, Field::Number(v) if !v.is_finite()) {
            tracing::warn!(field = name, "refusing non-finite numeric extension");
            return Err(TceError::NonFiniteExtension {
                name: name.to_string(),
            });
        }
        match self.extensions.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = field,
            None => self.extensions.push((name.to_string(), field)),
        }
        Ok(())
    }

    /// Remove an extension field, returning it if it was present.
    pub fn remove_extension(&mut self, name: &str) -> Option<Field> {
        let index = self.extensions.iter().position(|(key, _)| key == name)?;
        Some(self.extensions.remove(index).1)
    }

    // ── accessors ─────────────────────────────────────────────────────

    /// Orbital period in its stored unit.
    #[inline]
    pub fn period(&self) -> Option<Quantity> {
        self.period
    }

    /// Transit epoch, counted from [`Tce::epoch_offset`].
    #[inline]
    pub fn epoch(&self) -> Option<Quantity> {
        self.epoch
    }

    /// Offset added to a Julian Date to get the epoch's time system.
    #[inline]
    pub fn epoch_offset(&self) -> Option<EpochOffset> {
        self.epoch_offset
    }

    /// Transit depth in its stored unit.
    #[inline]
    pub fn depth(&self) -> Option<Quantity> {
        self.depth
    }

    /// Transit duration in its stored unit.
    #[inline]
    pub fn duration(&self) -> Option<Quantity> {
        self.duration
    }

    /// Detection signal-to-noise ratio.
    #[inline]
    pub fn snr(&self) -> Option<f64> {
        self.snr
    }

    /// Event identifier, if set.
    pub fn event_name(&self) -> Option<&str> {
        self.event_name.as_deref()
    }

    /// Name of the observed star, if set.
    pub fn target_name(&self) -> Option<&str> {
        self.target_name.as_deref()
    }

    /// Free-text note, if set.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Look up an extension field by name.
    pub fn extension(&self, name: &str) -> Option<&Field> {
        self.extensions
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, field)| field)
    }

    /// Extension fields in insertion order.
    pub fn extensions(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.extensions.iter().map(|(k, v)| (k.as_str(), v))
    }

    // ── unit-converted views ─────────────────────────────────────────

    pub fn period_days(&self) -> Option<f64> {
        self.period?.value_in(Unit::Day)
    }

    pub fn duration_days(&self) -> Option<f64> {
        self.duration?.value_in(Unit::Day)
    }

    pub fn duration_hours(&self) -> Option<f64> {
        self.duration?.value_in(Unit::Hour)
    }

    /// Depth as a plain fraction.
    pub fn depth_fraction(&self) -> Option<f64> {
        self.depth?.value_in(Unit::Dimensionless)
    }

    pub fn depth_ppm(&self) -> Option<f64> {
        self.depth?.value_in(Unit::PartsPerMillion)
    }

    // ── validation ────────────────────────────────────────────────────

    /// `true` iff every required field is present with a finite value and a
    /// unit of the expected dimension.
    ///
    /// Physical plausibility (positive period, duration shorter than the
    /// period, ...) is not checked here.
    pub fn validate(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Required fields that are absent or unusable, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let checks = [
            (REQUIRED_FIELDS[0], usable(self.period, Dimension::Time)),
            (REQUIRED_FIELDS[1], usable(self.epoch, Dimension::Time)),
            (
                REQUIRED_FIELDS[2],
                usable(self.epoch_offset.map(|o| o.quantity()), Dimension::Time),
            ),
            (REQUIRED_FIELDS[3], usable(self.depth, Dimension::Dimensionless)),
            (REQUIRED_FIELDS[4], usable(self.duration, Dimension::Time)),
        ];
        checks
            .into_iter()
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| name)
            .collect()
    }

    // ── epochs across time systems ───────────────────────────────────

    /// The epoch re-expressed in the time system defined by `target`.
    ///
    /// Computed as `epoch − epoch_offset + target`, keeping the epoch's unit.
    pub fn epoch_in(&self, target: EpochOffset) -> Option<Quantity> {
        self.epoch_offset?.shift(self.epoch?, target)
    }

    /// Absolute Julian Date of the reference transit.
    pub fn julian_epoch(&self) -> Option<Days> {
        self.epoch_in(EpochOffset::ZERO)?
            .value_in(Unit::Day)
            .map(Days::new)
    }

    /// Calendar instant of the reference transit.
    ///
    /// The Julian Date is read as UTC without a ΔT or barycentric
    /// correction. Returns `None` for an incomplete record or a date chrono
    /// cannot represent.
    pub fn epoch_utc(&self) -> Option<DateTime<Utc>> {
        let jd = self.julian_epoch()?;
        let seconds = (jd - UNIX_EPOCH_JD).to::<Second>().value();
        if !seconds.is_finite() {
            return None;
        }
        let secs = seconds.floor() as i64;
        let nanos = ((seconds - secs as f64) * 1e9) as u32;
        DateTime::<Utc>::from_timestamp(secs, nanos)
    }

    /// `true` if both records place the reference transit at the same
    /// absolute time, whatever time systems they use.
    pub fn same_transit_epoch(&self, other: &Tce) -> bool {
        match (self.julian_epoch(), other.julian_epoch()) {
            (Some(a), Some(b)) => Quantity::days(a.value()) == Quantity::days(b.value()),
            _ => false,
        }
    }

    /// Phase of `time_days` (in the `times_offset` system) relative to the
    /// reference transit, folded into `[-period/2, period/2)`, in days.
    pub(crate) fn phase_days(&self, time_days: f64, times_offset: EpochOffset) -> Option<f64> {
        let period = self.period_days()?;
        let epoch = self.epoch_in(times_offset)?.value_in(Unit::Day)?;
        let half = 0.5 * period;
        Some((time_days - epoch + half).rem_euclid(period) - half)
    }
}

fn usable(quantity: Option<Quantity>, dimension: Dimension) -> bool {
    quantity.is_some_and(|q| q.is_finite() && q.dimension() == dimension)
}

impl PartialEq for Tce {
    fn eq(&self, other: &Self) -> bool {
        self.period == other.period
            && self.epoch == other.epoch
            && self.epoch_offset == other.epoch_offset
            && self.depth == other.depth
            && self.duration == other.duration
            && self.snr == other.snr
            && self.event_name == other.event_name
            && self.target_name == other.target_name
            && self.comment == other.comment
            && self.extensions.len() == other.extensions.len()
            && self
                .extensions
                .iter()
                .all(|(name, field)| other.extension(name) == Some(field))
    }
}

impl std::fmt::Display for Tce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.event_name().unwrap_or("TCE");
        write!(f, "{name}:")?;
        if let Some(period) = self.period {
            write!(f, " P={period}")?;
        }
        if let Some(epoch) = self.epoch {
            write!(f, " T0={epoch}")?;
        }
        if let Some(offset) = self.epoch_offset.and_then(|o| o.label()) {
            write!(f, " [{offset}]")?;
        }
        if let Some(depth) = self.depth {
            write!(f, " depth={depth}")?;
        }
        if let Some(duration) = self.duration {
            write!(f, " dur={duration}")?;
        }
        Ok(())
    }
}
