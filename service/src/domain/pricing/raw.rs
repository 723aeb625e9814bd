//! [`RawPricing`] definitions.

use std::str::FromStr as _;

use common::Money;
use rust_decimal::{prelude::ToPrimitive as _, Decimal};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[cfg(doc)]
use super::Pricing;
use super::{field, PriceHistoryEntry, ValidationError};

/// Untyped [`Pricing`] fields, as relayed from a client request.
///
/// Numeric fields may be JSON numbers or numeric strings (multipart form
/// fields). `null` values and blank strings count as absent fields. Fields
/// unknown to a listing mode are kept, but never read.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawPricing(Map<String, Value>);

impl RawPricing {
    /// Creates a new empty [`RawPricing`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the provided `field` to the provided `value`.
    #[must_use]
    pub fn with(
        mut self,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        _ = self.0.insert(field.into(), value.into());
        self
    }

    /// Returns the value of the provided `field`, unless it's absent.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(is_present)
    }

    /// Overlays the `incoming` fields on top of these ones.
    ///
    /// An incoming `null` removes the field.
    pub fn merge(&mut self, incoming: Self) {
        for (field, value) in incoming.0 {
            if value.is_null() {
                _ = self.0.remove(&field);
            } else {
                _ = self.0.insert(field, value);
            }
        }
    }

    /// Coerces the provided numeric `field` into a [`Decimal`].
    ///
    /// # Errors
    ///
    /// With [`ValidationError::InvalidType`] if the `field` is present, but is
    /// neither a number nor a numeric string.
    pub(super) fn decimal(
        &self,
        field: &str,
    ) -> Result<Option<Decimal>, ValidationError> {
        self.get(field)
            .map(|v| {
                to_decimal(v)
                    .ok_or_else(|| ValidationError::InvalidType(field.into()))
            })
            .transpose()
    }

    /// Coerces the [`field::PRICE_HISTORY`] into a list of
    /// [`PriceHistoryEntry`]s, preserving their order.
    ///
    /// A JSON array encoded into a string is accepted as well.
    ///
    /// # Errors
    ///
    /// With [`ValidationError::InvalidType`] naming the indexed path of the
    /// first invalid entry.
    pub(super) fn price_history(
        &self,
    ) -> Result<Vec<PriceHistoryEntry>, ValidationError> {
        use ValidationError as E;

        let Some(value) = self.get(field::PRICE_HISTORY) else {
            return Ok(Vec::new());
        };
        let decoded;
        let entries = match value {
            Value::Array(entries) => entries,
            Value::String(s) => {
                decoded = serde_json::from_str::<Vec<Value>>(s)
                    .map_err(|_| E::InvalidType(field::PRICE_HISTORY.into()))?;
                &decoded
            }
            Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::Object(_) => {
                return Err(E::InvalidType(field::PRICE_HISTORY.into()));
            }
        };

        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let path =
                    |f: &str| format!("{}[{i}].{f}", field::PRICE_HISTORY);

                let entry = entry.as_object().ok_or_else(|| {
                    E::InvalidType(format!("{}[{i}]", field::PRICE_HISTORY))
                })?;
                let year = entry
                    .get(field::YEAR)
                    .filter(is_present)
                    .and_then(to_decimal)
                    .filter(Decimal::is_integer)
                    .and_then(|y| y.to_i32())
                    .ok_or_else(|| E::InvalidType(path(field::YEAR)))?;
                let cost = entry
                    .get(field::COST)
                    .filter(is_present)
                    .and_then(to_decimal)
                    .and_then(Money::new)
                    .ok_or_else(|| E::InvalidType(path(field::COST)))?;

                Ok(PriceHistoryEntry { year, cost })
            })
            .collect()
    }
}

impl From<Map<String, Value>> for RawPricing {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Checks whether the provided `value` counts as a present field.
fn is_present(value: &&Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Bool(_)
        | Value::Number(_)
        | Value::Array(_)
        | Value::Object(_) => true,
    }
}

/// Coerces the provided JSON `value` into a [`Decimal`].
///
/// [`None`] is returned if the `value` is neither a number nor a numeric
/// string, or doesn't fit into a [`Decimal`].
fn to_decimal(value: &Value) -> Option<Decimal> {
    let parse = |s: &str| {
        Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .ok()
    };
    match value {
        Value::Number(n) => parse(&n.to_string()),
        Value::String(s) => parse(s.trim()),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            None
        }
    }
}
