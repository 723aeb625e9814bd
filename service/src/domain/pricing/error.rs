//! [`ValidationError`] definitions.

use common::define_kind;
use derive_more::{Display, Error};
use rust_decimal::Decimal;

#[cfg(doc)]
use super::{ListingMode, Pricing};

/// Error of validating raw [`Pricing`] fields.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum ValidationError {
    /// Provided listing mode is not a [`ListingMode`].
    #[display("`{_0}` is not a listing mode, expected `Buy` or `Rent`")]
    InvalidMode(#[error(not(source))] String),

    /// Field required by the listing mode is absent, or violates its
    /// positivity constraint.
    #[display("`{_0}` is required")]
    MissingRequiredField(#[error(not(source))] String),

    /// Field cannot be coerced to its numeric type.
    #[display("`{_0}` is not a valid number")]
    InvalidType(#[error(not(source))] String),

    /// Numeric field violates its bounds.
    #[display("`{field}` is out of range: {value}")]
    OutOfRange {
        /// Name of the offending field.
        field: String,

        /// Offending value.
        value: Decimal,
    },
}

impl ValidationError {
    /// Returns [`ErrorKind`] of this [`ValidationError`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidMode(_) => ErrorKind::InvalidMode,
            Self::MissingRequiredField(_) => ErrorKind::MissingRequiredField,
            Self::InvalidType(_) => ErrorKind::InvalidType,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
        }
    }

    /// Returns the name (or the indexed path) of the offending field, if
    /// any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidMode(_) => None,
            Self::MissingRequiredField(f)
            | Self::InvalidType(f)
            | Self::OutOfRange { field: f, .. } => Some(f),
        }
    }
}

define_kind! {
    #[doc = "Kind of a [`ValidationError`]."]
    enum ErrorKind {
        #[doc = "Listing mode is neither `Buy` nor `Rent`."]
        InvalidMode = 1,

        #[doc = "Required field is absent or not positive."]
        MissingRequiredField = 2,

        #[doc = "Field cannot be coerced to a number."]
        InvalidType = 3,

        #[doc = "Numeric field violates its bounds."]
        OutOfRange = 4,
    }
}
