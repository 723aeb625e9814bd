//! [`Property`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::pricing::{ListingMode, Pricing};

/// Property listed for sale or for lease.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// ID of this [`Property`].
    pub id: Id,

    /// [`Title`] of this [`Property`].
    pub title: Title,

    /// [`Description`] of this [`Property`], if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,

    /// [`Location`] of this [`Property`].
    pub location: Location,

    /// [`Khatauni`] of this [`Property`].
    pub khatauni: Khatauni,

    /// [`Khasra`] of this [`Property`].
    pub khasra: Khasra,

    /// [`Pricing`] of this [`Property`].
    pub pricing: Pricing,

    /// [`DateTime`] when this [`Property`] was created.
    #[serde(with = "common::datetime::serde::unix_timestamp")]
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Property`] was last modified.
    #[serde(with = "common::datetime::serde::unix_timestamp")]
    pub updated_at: ModificationDateTime,
}

impl Property {
    /// Returns [`ListingMode`] this [`Property`] is listed for.
    ///
    /// Always agrees with the [`Pricing`] of this [`Property`].
    #[must_use]
    pub fn listing_mode(&self) -> ListingMode {
        self.pricing.listing_mode()
    }
}

/// ID of a [`Property`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Defines a trimmed, non-empty and length-bounded text attribute of a
/// [`Property`].
macro_rules! define_text {
    ($(#[doc = $doc:literal])* $name:ident, max = $max:literal) => {
        $(#[doc = $doc])*
        #[derive(
            AsRef, Clone, Debug, Display, Eq, Hash, PartialEq, Serialize,
        )]
        #[as_ref(forward)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new [`", stringify!($name), "`] ")]
            #[doc = "if the given `text` is valid, trimming it."]
            #[must_use]
            pub fn new(text: impl AsRef<str>) -> Option<Self> {
                let text = text.as_ref().trim();
                Self::check(text).then(|| Self(text.to_owned()))
            }

            #[doc = concat!(
                "Checks whether the given `text` is a valid [`",
                stringify!($name),
                "`].",
            )]
            fn check(text: &str) -> bool {
                !text.is_empty() && text.len() <= $max
            }
        }

        impl FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
                    .ok_or(concat!("invalid `", stringify!($name), "`"))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                use serde::de::Error as _;

                Self::new(String::deserialize(deserializer)?).ok_or_else(|| {
                    D::Error::custom(concat!(
                        "invalid `",
                        stringify!($name),
                        "`",
                    ))
                })
            }
        }
    };
}

define_text!(
    /// Title a [`Property`] is listed under.
    Title,
    max = 512
);

define_text!(
    /// Free-form description of a [`Property`].
    Description,
    max = 8192
);

define_text!(
    /// Human-readable location of a [`Property`], like a locality and a city.
    Location,
    max = 512
);

define_text!(
    /// Khatauni (ownership register entry) of a [`Property`].
    ///
    /// Opaque land record reference, never interpreted.
    Khatauni,
    max = 512
);

define_text!(
    /// Khasra (survey number) of a [`Property`].
    ///
    /// Opaque land record reference, never interpreted.
    Khasra,
    max = 512
);

/// [`DateTime`] when a [`Property`] was created.
pub type CreationDateTime = DateTimeOf<(Property, unit::Creation)>;

/// [`DateTime`] when a [`Property`] was last modified.
pub type ModificationDateTime = DateTimeOf<(Property, unit::Modification)>;
