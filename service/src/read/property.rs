//! [`Property`]-related read definitions.

#[cfg(doc)]
use crate::domain::Property;

pub mod list {
    //! [`Property`] list definitions.

    use common::{define_pagination, Money};
    use derive_more::{From, Into};

    use crate::domain::{pricing::ListingMode, property, Property};

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = Property;

    /// Cursor pointing to a specific [`Property`] in a list.
    pub type Cursor = property::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`ListingMode`] to list [`Property`]s of.
        pub listing_mode: Option<ListingMode>,

        /// Minimal listed price (inclusive).
        ///
        /// See [`Pricing::listed_price()`] for details.
        ///
        /// [`Pricing::listed_price()`]: crate::domain::Pricing::listed_price
        pub min_price: Option<Money>,

        /// Maximal listed price (inclusive).
        pub max_price: Option<Money>,

        /// [`property::Location`] (or its part) to search for, ignoring
        /// case.
        pub location: Option<property::Location>,
    }

    impl Filter {
        /// Checks whether the provided [`Property`] passes this [`Filter`].
        #[must_use]
        pub fn matches(&self, property: &Property) -> bool {
            let price = property.pricing.listed_price();
            self.listing_mode.map_or(true, |m| property.listing_mode() == m)
                && self.min_price.map_or(true, |min| price >= min)
                && self.max_price.map_or(true, |max| price <= max)
                && self.location.as_ref().map_or(true, |needle| {
                    let (haystack, needle): (&str, &str) =
                        (property.location.as_ref(), needle.as_ref());
                    haystack.to_lowercase().contains(&needle.to_lowercase())
                })
        }
    }

    /// Total count of [`Property`] list items.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(usize);

}
