// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Box-shaped transit model of a [`Tce`].
//!
//! The model is zero out of transit and `-depth` (as a fraction) during
//! transit. A sample is in transit when its phase, folded on the period and
//! measured from the epoch, lies in `(-duration/2, +duration/2]`.

use crate::record::Tce;
use crate::time_system::EpochOffset;

impl Tce {
    /// Evaluate the box model at `times` (in days, expressed in the time
    /// system of `times_offset`).
    ///
    /// Returns `None` unless the record is complete.
    pub fn box_model(&self, times: &[f64], times_offset: EpochOffset) -> Option<Vec<f64>> {
        if !self.validate() {
            return None;
        }
        let half_duration = 0.5 * self.duration_days()?;
        let depth = self.depth_fraction()?;
        times
            .iter()
            .map(|&t| {
                let phase = self.phase_days(t, times_offset)?;
                let in_transit = phase > -half_duration && phase <= half_duration;
                Some(if in_transit { -depth } else { 0.0 })
            })
            .collect()
    }

    /// Phases (in days, within `[-period/2, period/2)`) of `times` relative
    /// to the reference transit.
    pub fn phases(&self, times: &[f64], times_offset: EpochOffset) -> Option<Vec<f64>> {
        times
            .iter()
            .map(|&t| self.phase_days(t, times_offset))
            .collect()
    }
}
