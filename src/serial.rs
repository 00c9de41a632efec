// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Flat serial form of a [`Tce`].
//!
//! A record is written as a single JSON object of primitive values. Every
//! quantity expands to two entries:
//!
//! ```text
//! "duration": 24.0, "duration_unit": "h"
//! ```
//!
//! The value is the one the record stores, in its own unit. Numbers are
//! written with the shortest representation that parses back to the same
//! `f64`; non-finite numbers are written as the strings `"NaN"`, `"inf"`
//! and `"-inf"`. Entries follow the fixed field order, then extensions in
//! insertion order, so equal records built the same way serialise to
//! identical bytes.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::error::{TceError, TceResult};
use crate::quantity::Quantity;
use crate::record::{Field, Tce, UNIT_SUFFIX};
use crate::time_system::EpochOffset;
use crate::units::{StandardUnits, Unit, UnitSystem};

impl Tce {
    /// Serialise with the [`StandardUnits`] symbols.
    pub fn to_serial_form(&self) -> String {
        self.to_serial_form_with(&StandardUnits)
    }

    pub fn to_serial_form_with(&self, units: &dyn UnitSystem) -> String {
        Value::Object(self.to_serial_map(units)).to_string()
    }

    /// Pretty-printed variant of [`Tce::to_serial_form`], one entry per line.
    pub fn to_serial_form_pretty(&self) -> String {
        let object = Value::Object(self.to_serial_map(&StandardUnits));
        serde_json::to_string_pretty(&object).unwrap_or_else(|_| object.to_string())
    }

    /// The flat key/value mapping behind the serial form.
    pub fn to_serial_map(&self, units: &dyn UnitSystem) -> Map<String, Value> {
        let mut map = Map::new();
        let mut put_quantity = |name: &str, q: Option<Quantity>| {
            if let Some(q) = q {
                map.insert(name.to_string(), number(q.value()));
                map.insert(
                    format!("{name}{UNIT_SUFFIX}"),
                    Value::String(units.symbol(q.unit()).to_string()),
                );
            }
        };
        put_quantity("period", self.period);
        put_quantity("epoch", self.epoch);
        put_quantity("epoch_offset", self.epoch_offset.map(|o| o.quantity()));
        put_quantity("depth", self.depth);
        put_quantity("duration", self.duration);

        if let Some(snr) = self.snr {
            map.insert("snr".into(), number(snr));
        }
        for (name, text) in [
            ("event_name", &self.event_name),
            ("target_name", &self.target_name),
            ("comment", &self.comment),
        ] {
            if let Some(text) = text {
                map.insert(name.into(), Value::String(text.clone()));
            }
        }

        for (name, field) in &self.extensions {
            match field {
                Field::Quantity(q) => {
                    map.insert(name.clone(), number(q.value()));
                    map.insert(
                        format!("{name}{UNIT_SUFFIX}"),
                        Value::String(units.symbol(q.unit()).to_string()),
                    );
                }
                Field::Number(v) => {
                    map.insert(name.clone(), number(*v));
                }
                Field::Text(s) => {
                    map.insert(name.clone(), Value::String(s.clone()));
                }
            }
        }
        map
    }

    /// Parse a record written by [`Tce::to_serial_form`], resolving unit
    /// symbols with [`StandardUnits`].
    ///
    /// The result is not validated: an incomplete record loads fine.
    pub fn from_serial_form(text: &str) -> TceResult<Tce> {
        Self::from_serial_form_with(text, &StandardUnits)
    }

    pub fn from_serial_form_with(text: &str, units: &dyn UnitSystem) -> TceResult<Tce> {
        let document = serde_json::from_str::<Value>(text)
            .map_err(|err| TceError::malformed(format!("not a JSON document: {err}")))?;
        match document {
            Value::Object(map) => Self::from_serial_map(&map, units),
            other => Err(TceError::malformed(format!(
                "expected a JSON object, found {}",
                kind(&other)
            ))),
        }
    }

    /// Rebuild a record from its flat key/value mapping.
    pub fn from_serial_map(map: &Map<String, Value>, units: &dyn UnitSystem) -> TceResult<Tce> {
        // First pass: every `<name>_unit` entry must name a sibling.
        let mut unit_of: Vec<(&str, Unit)> = Vec::new();
        for (key, value) in map {
            let Some(base) = key.strip_suffix(UNIT_SUFFIX) else {
                continue;
            };
            if base.ends_with(UNIT_SUFFIX) {
                return Err(TceError::malformed(format!(
                    "unit entry `{key}` is attached to another unit entry"
                )));
            }
            if !map.contains_key(base) {
                return Err(TceError::malformed(format!(
                    "unit entry `{key}` has no matching `{base}` entry"
                )));
            }
            let Value::String(symbol) = value else {
                return Err(TceError::malformed(format!(
                    "unit entry `{key}` must be a string, found {}",
                    kind(value)
                )));
            };
            unit_of.push((base, units.parse_unit(symbol)?));
        }
        let lookup_unit = |name: &str| {
            unit_of
                .iter()
                .find(|(base, _)| *base == name)
                .map(|&(_, unit)| unit)
        };

        let mut tce = Tce::empty();
        for (key, value) in map {
            if key.ends_with(UNIT_SUFFIX) {
                continue;
            }
            let key = key.as_str();
            match (key, lookup_unit(key)) {
                ("period", Some(unit)) => tce.period = Some(quantity(key, value, unit)?),
                ("epoch", Some(unit)) => tce.epoch = Some(quantity(key, value, unit)?),
                ("epoch_offset", Some(unit)) => {
                    tce.epoch_offset = Some(EpochOffset::from_quantity(quantity(key, value, unit)?))
                }
                ("depth", Some(unit)) => tce.depth = Some(quantity(key, value, unit)?),
                ("duration", Some(unit)) => tce.duration = Some(quantity(key, value, unit)?),
                ("period" | "epoch" | "epoch_offset" | "depth" | "duration", None) => {
                    return Err(TceError::malformed(format!(
                        "`{key}` has no `{key}{UNIT_SUFFIX}` entry"
                    )));
                }
                ("snr" | "event_name" | "target_name" | "comment", Some(_)) => {
                    return Err(TceError::malformed(format!("`{key}` does not carry a unit")));
                }
                ("snr", None) => tce.snr = Some(parse_number(key, value)?),
                ("event_name", None) => tce.event_name = Some(text(key, value)?),
                ("target_name", None) => tce.target_name = Some(text(key, value)?),
                ("comment", None) => tce.comment = Some(text(key, value)?),
                (_, Some(unit)) => tce
                    .extensions
                    .push((key.to_string(), Field::Quantity(quantity(key, value, unit)?))),
                (_, None) => {
                    let field = match value {
                        Value::Number(_) => Field::Number(parse_number(key, value)?),
                        Value::String(s) => Field::Text(s.clone()),
                        other => {
                            return Err(TceError::malformed(format!(
                                "`{key}` must be a number or a string, found {}",
                                kind(other)
                            )))
                        }
                    };
                    tce.extensions.push((key.to_string(), field));
                }
            }
        }

        tracing::debug!(
            entries = map.len(),
            extensions = tce.extensions.len(),
            "deserialized TCE record"
        );
        Ok(tce)
    }
}

fn number(value: f64) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(value.to_string()))
}

fn parse_number(key: &str, value: &Value) -> TceResult<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| TceError::malformed(format!("`{key}` is out of f64 range"))),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            TceError::malformed(format!("`{key}` is not a number: {s:?}"))
        }),
        other => Err(TceError::malformed(format!(
            "`{key}` must be a number, found {}",
            kind(other)
        ))),
    }
}

fn quantity(key: &str, value: &Value, unit: Unit) -> TceResult<Quantity> {
    Ok(Quantity::new(parse_number(key, value)?, unit))
}

fn text(key: &str, value: &Value) -> TceResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(TceError::malformed(format!(
            "`{key}` must be a string, found {}",
            kind(other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

impl Serialize for Tce {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let map = self.to_serial_map(&StandardUnits);
        let mut s = serializer.serialize_map(Some(map.len()))?;
        for (key, value) in &map {
            s.serialize_entry(key, value)?;
        }
        s.end()
    }
}

impl<'de> Deserialize<'de> for Tce {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Tce::from_serial_map(&map, &StandardUnits).map_err(D::Error::custom)
    }
}
