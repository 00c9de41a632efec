// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Mapping catalog rows into TCE records.
//!
//! Fetching rows from an archive is left to the caller through the
//! [`CatalogLookup`] trait; this module only turns the returned
//! [`CatalogEntry`] values into [`Tce`]s, choosing the epoch offset that
//! matches each entry's time system.

use serde::{Deserialize, Serialize};

use crate::error::{TceError, TceResult};
use crate::quantity::Quantity;
use crate::record::{Field, Tce};
use crate::units::UnitSystem;

/// Name of the extension field recording which catalog a record came from.
pub const CATALOG_FIELD: &str = "catalog";

/// One candidate row returned by a catalog lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Label of the catalog the row comes from.
    pub catalog_name: String,
    /// Candidate or planet designation within the catalog.
    #[serde(default)]
    pub name: Option<String>,
    pub period_days: f64,
    /// Transit time, in the system named by `time_system`.
    pub epoch_days: f64,
    /// Label of the time system of `epoch_days` (`"bkjd"`, `"btjd"`, ...).
    pub time_system: String,
    /// Transit depth as a fraction.
    pub depth: f64,
    pub duration_days: f64,
    #[serde(default)]
    pub snr: Option<f64>,
}

impl CatalogEntry {
    /// Build the record for this row; `target` becomes the target name.
    pub fn to_tce(&self, target: &str, units: &dyn UnitSystem) -> TceResult<Tce> {
        let offset = units.named_offset(&self.time_system).map_err(|err| {
            tracing::warn!(
                catalog = %self.catalog_name,
                time_system = %self.time_system,
                "catalog entry uses an unknown time system"
            );
            err
        })?;

        let mut tce = Tce::new(
            Quantity::days(self.period_days),
            Quantity::days(self.epoch_days),
            offset,
            Quantity::fraction(self.depth),
            Quantity::days(self.duration_days),
        )
        .with_target_name(target);
        if let Some(name) = &self.name {
            tce.set_event_name(Some(name.clone()));
        }
        tce.set_snr(self.snr);
        tce.insert_extension(CATALOG_FIELD, Field::Text(self.catalog_name.clone()))?;
        Ok(tce)
    }
}

/// Source of catalog rows for a candidate name.
pub trait CatalogLookup {
    type Error: From<TceError>;

    /// Rows matching `name`; an unknown name yields an empty list.
    fn lookup(&self, name: &str) -> Result<Vec<CatalogEntry>, Self::Error>;
}

/// Map every entry into a record. No entries means no records.
pub fn tces_from_entries(
    target: &str,
    entries: &[CatalogEntry],
    units: &dyn UnitSystem,
) -> TceResult<Vec<Tce>> {
    let tces = entries
        .iter()
        .map(|entry| entry.to_tce(target, units))
        .collect::<TceResult<Vec<_>>>()?;
    tracing::debug!(candidate = target, records = tces.len(), "mapped catalog entries");
    Ok(tces)
}

/// Look `name` up and map the returned rows.
pub fn tces_from_catalog<L: CatalogLookup>(
    lookup: &L,
    name: &str,
    units: &dyn UnitSystem,
) -> Result<Vec<Tce>, L::Error> {
    let entries = lookup.lookup(name)?;
    Ok(tces_from_entries(name, &entries, units)?)
}
