//! Domain definitions.

pub mod pricing;
pub mod property;

pub use self::{pricing::Pricing, property::Property};
