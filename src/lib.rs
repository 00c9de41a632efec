// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Threshold Crossing Event records
//!
//! A **TCE** is a candidate transit signal found by a search pipeline. This
//! crate models it as a plain value carrying unit-tagged quantities and the
//! time system its epoch is expressed in, and writes it to a flat,
//! human-readable JSON form that reads back to an equal record.
//!
//! # Core types
//!
//! - [`Tce`] — the record: five required quantities, optional descriptive
//!   fields, and named extension [`Field`]s.
//! - [`Quantity`] — an `f64` tagged with a [`Unit`].
//! - [`EpochOffset`] — zero-point of the time system of an epoch.
//! - [`TimeSystem`] — marker trait for named time systems.
//! - [`UnitSystem`] — service resolving unit symbols and named offsets;
//!   [`StandardUnits`] is the built-in one.
//! - [`CatalogEntry`] / [`CatalogLookup`] — bridge from archive rows to
//!   records.
//!
//! # Time systems
//!
//! | Marker | Offset from JD (d) |
//! |--------|--------------------|
//! | [`JD`] | 0 |
//! | [`BJD`] | 0 |
//! | [`MJD`] | −2 400 000.5 |
//! | [`BKJD`] | −2 454 833 |
//! | [`BTJD`] | −2 457 000 |
//!
//! # Example
//!
//! ```
//! use tce_record::{EpochOffset, Quantity, Tce, BKJD};
//!
//! let tce = Tce::new(
//!     Quantity::days(5.3),
//!     Quantity::days(133.4),
//!     EpochOffset::of::<BKJD>(),
//!     Quantity::fraction(1e-6),
//!     Quantity::hours(24.0),
//! )
//! .with_comment("example");
//!
//! assert!(tce.validate());
//! let text = tce.to_serial_form();
//! assert_eq!(Tce::from_serial_form(&text).unwrap(), tce);
//! ```

mod catalog;
mod error;
mod model;
mod quantity;
mod record;
mod serial;
pub(crate) mod time_system;
pub(crate) mod units;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use catalog::{tces_from_catalog, tces_from_entries, CatalogEntry, CatalogLookup, CATALOG_FIELD};
pub use error::{TceError, TceResult};
pub use quantity::Quantity;
pub use record::{is_reserved_name, Field, Tce, FIXED_FIELDS, REQUIRED_FIELDS, UNIT_SUFFIX};
pub use time_system::{EpochOffset, TimeSystem, BJD, BKJD, BTJD, JD, MJD};
pub use units::{Dimension, StandardUnits, Unit, UnitSystem};
