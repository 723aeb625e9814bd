//! [`Args`] definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use common::Money;
use service::domain::{pricing::ListingMode, property};

/// Property listings catalog.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// [`Command`] to execute.
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Command to execute.
#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Validates pricing fields and prints the computed pricing, without
    /// storing anything.
    Price {
        /// Listing mode to validate the pricing for (`Buy` or `Rent`).
        #[arg(short, long)]
        mode: String,

        /// File to read the pricing JSON object from, instead of stdin.
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Creates a new property from a JSON request.
    Create {
        /// File to read the JSON request from, instead of stdin.
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Updates an existing property from a partial JSON request.
    Update {
        /// ID of the property to update.
        id: property::Id,

        /// File to read the JSON request from, instead of stdin.
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Deletes a property.
    Delete {
        /// ID of the property to delete.
        id: property::Id,
    },

    /// Prints a property.
    Show {
        /// ID of the property to print.
        id: property::Id,
    },

    /// Prints a page of properties, ordered by their IDs.
    List {
        /// Listing mode to list properties of.
        #[arg(long)]
        mode: Option<ListingMode>,

        /// Minimal listed price (final price or monthly rent).
        #[arg(long)]
        min_price: Option<Money>,

        /// Maximal listed price (final price or monthly rent).
        #[arg(long)]
        max_price: Option<Money>,

        /// Part of the location to search for, ignoring case.
        #[arg(long)]
        location: Option<String>,

        /// Number of properties to print after the `after` cursor.
        #[arg(long, conflicts_with_all = ["last", "before"])]
        first: Option<usize>,

        /// Cursor to print properties after.
        #[arg(long, conflicts_with_all = ["last", "before"])]
        after: Option<property::Id>,

        /// Number of properties to print before the `before` cursor.
        #[arg(long)]
        last: Option<usize>,

        /// Cursor to print properties before.
        #[arg(long)]
        before: Option<property::Id>,
    },
}
