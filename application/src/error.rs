//! [`Error`]-related definitions.

use std::fmt;

use derive_more::Error as StdError;
use itertools::Itertools as _;
use serde::{Serialize, Serializer};
use service::{command, domain::pricing, infra::database};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            status_code: ::http::StatusCode::$status_code,
                            message: $message.to_string(),
                            field: None,
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// Client-facing [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// [`Error`] message.
    pub message: String,

    /// Name of the offending input field, if any.
    pub field: Option<String>,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,
}

impl Error {
    /// Create a new [`Error`] representing an internal error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_SERVER_ERROR",
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            field: None,
            backtrace: None,
        }
    }

    /// Names the offending input `field` of this [`Error`].
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Returns a JSON document describing this [`Error`] to a client.
    #[must_use]
    pub fn to_document(&self) -> serde_json::Value {
        serde_json::json!({ "error": self })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            message,
            field,
            backtrace,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}{}",
            field.iter().format_with("", |field, f| f(&format_args!(
                " (`{field}`)"
            ))),
            backtrace
                .iter()
                .format_with("", |trace, f| f(&format_args!("\n{trace}"))),
        )
    }
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        /// Client-facing shape of an [`Error`].
        #[derive(Serialize)]
        struct Document<'a> {
            code: Code,
            status: u16,
            message: &'a str,
            field: Option<&'a str>,
        }

        Document {
            code: self.code,
            status: self.status_code.as_u16(),
            message: &self.message,
            field: self.field.as_deref(),
        }
        .serialize(serializer)
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for pricing::ValidationError {
    fn try_as_error(&self) -> Option<Error> {
        use pricing::ErrorKind as K;

        Some(Error {
            code: match self.kind() {
                K::InvalidMode => "INVALID_MODE",
                K::MissingRequiredField => "MISSING_REQUIRED_FIELD",
                K::InvalidType => "INVALID_TYPE",
                K::OutOfRange => "OUT_OF_RANGE",
            },
            status_code: http::StatusCode::BAD_REQUEST,
            message: self.to_string(),
            field: self.field().map(ToOwned::to_owned),
            backtrace: None,
        })
    }
}

define_error! {
    enum PropertyError {
        #[code = "PROPERTY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Property` with the provided ID does not exist"]
        NotExists,
    }
}

impl AsError for command::create_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Pricing(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::update_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Pricing(e) => e.try_as_error(),
            Self::PropertyNotExists(_) => Some(PropertyError::NotExists.into()),
        }
    }
}

impl AsError for command::delete_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PropertyNotExists(_) => Some(PropertyError::NotExists.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use service::domain::pricing::{RawPricing, ValidationError};

    use super::{AsError as _, PropertyError};

    #[test]
    fn maps_validation_errors() {
        let err = service::domain::Pricing::validate_and_compute(
            "Buy",
            &RawPricing::new().with("stampDutyPercentage", 150),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::MissingRequiredField(_)));

        let error = err.as_error();
        assert_eq!(error.status_code, http::StatusCode::BAD_REQUEST);
        assert_eq!(
            error.to_document(),
            json!({"error": {
                "code": "MISSING_REQUIRED_FIELD",
                "status": 400,
                "message": "`askingPrice` is required",
                "field": "askingPrice",
            }}),
        );
    }

    #[test]
    fn maps_out_of_range_with_field() {
        let error = ValidationError::OutOfRange {
            field: "stampDutyPercentage".into(),
            value: 150.into(),
        }
        .as_error();

        assert_eq!(error.code, "OUT_OF_RANGE");
        assert_eq!(error.field.as_deref(), Some("stampDutyPercentage"));
        assert_eq!(
            error.to_string(),
            "[OUT_OF_RANGE]: `stampDutyPercentage` is out of range: 150 \
             (`stampDutyPercentage`)",
        );
    }

    #[test]
    fn defined_errors_have_no_field() {
        let error = super::Error::from(PropertyError::NotExists);

        assert_eq!(error.status_code, http::StatusCode::NOT_FOUND);
        assert_eq!(error.to_document()["error"]["field"], json!(null));
    }
}
