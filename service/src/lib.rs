//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;

use smart_default::SmartDefault;

#[cfg(doc)]
use infra::Database;

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Number of [`read::property::list`] items returned when not requested
    /// explicitly.
    #[default(20)]
    pub default_page_size: usize,

    /// Maximal number of [`read::property::list`] items returned at once.
    #[default(100)]
    pub max_page_size: usize,
}

impl Config {
    /// Builds [`read::property::list::Arguments`] out of the requested ones,
    /// applying the default page size and capping it to the maximal one.
    ///
    /// [`None`] is returned if forward and backward arguments are mixed.
    #[must_use]
    pub fn list_arguments(
        &self,
        first: Option<usize>,
        after: Option<domain::property::Id>,
        last: Option<usize>,
        before: Option<domain::property::Id>,
    ) -> Option<read::property::list::Arguments> {
        read::property::list::Arguments::new(
            first,
            after,
            last,
            before,
            self.default_page_size,
        )
        .map(|args| args.capped(self.max_page_size))
    }
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,
}

impl<Db> Service<Db> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, database: Db) -> Self {
        Self { config, database }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }
}
