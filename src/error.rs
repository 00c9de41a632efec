// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error type shared by every fallible operation of the crate.
//!
//! Only deserialisation, catalog mapping and extension insertion can fail.
//! An incomplete record is not an error: see [`Tce::validate`](crate::Tce::validate).

use thiserror::Error;

pub type TceResult<T> = Result<T, TceError>;

#[derive(Error, Debug)]
pub enum TceError {
    /// The serialised text is structurally inconsistent, or not JSON at all.
    #[error("malformed TCE record: {reason}")]
    MalformedRecord { reason: String },

    /// A unit symbol the unit system does not recognise.
    #[error("unknown unit symbol {symbol:?}")]
    UnknownUnit { symbol: String },

    /// A time-system label with no registered epoch offset.
    #[error("unknown time system {label:?}")]
    UnknownTimeSystem { label: String },

    /// An extension field whose name collides with the fixed field set or
    /// with the `_unit` suffix used by the serial form.
    #[error("extension field name {name:?} is reserved")]
    ReservedFieldName { name: String },

    /// A plain numeric extension holding NaN or an infinity. The serial form
    /// writes those as strings, which would load back as text.
    #[error("extension field {name:?} holds a non-finite number")]
    NonFiniteExtension { name: String },
}

impl TceError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            reason: reason.into(),
        }
    }

    /// `true` for every failure caused by structurally invalid serial input.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedRecord { .. })
    }
}
